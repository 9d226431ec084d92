use serde_json::Value;

use crate::schema::{RawExtractionResult, Trace};

/// Result of best-effort numeric coercion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Coerced {
    pub values: Vec<f64>,
    /// Elements that could not be read as a finite number.
    pub dropped: usize,
}

/// Counters describing what normalization threw away.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub entries_seen: usize,
    pub entries_skipped: usize,
    pub values_dropped: usize,
    pub points_clipped: usize,
}

fn scalar_to_f64(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        _ => None,
    };
    number.filter(|number| number.is_finite())
}

/// Read `value` as a flat list of floats.
///
/// Arrays are read element by element and scalars become a one-element
/// list. Elements that do not convert are dropped individually.
pub fn coerce_floats(value: &Value) -> Coerced {
    let items = match value {
        Value::Null => return Coerced::default(),
        Value::Array(items) => items.as_slice(),
        scalar => std::slice::from_ref(scalar),
    };

    let mut coerced = Coerced::default();
    for item in items {
        match scalar_to_f64(item) {
            Some(number) => coerced.values.push(number),
            None => coerced.dropped += 1,
        }
    }
    coerced
}

pub fn trace_label(index: usize, mz: Option<f64>) -> String {
    match mz {
        Some(mz) => format!("m/z {mz:.4}"),
        None => format!("Trace {}", index + 1),
    }
}

/// Turn engine output into aligned traces.
///
/// Never fails: malformed entries are omitted. An empty result is the
/// caller's problem to report.
pub fn normalize_traces(raw: Option<&RawExtractionResult>, target_mz: &[f64]) -> Vec<Trace> {
    normalize_traces_with_report(raw, target_mz).0
}

pub fn normalize_traces_with_report(
    raw: Option<&RawExtractionResult>,
    target_mz: &[f64],
) -> (Vec<Trace>, NormalizeReport) {
    let mut report = NormalizeReport::default();
    let Some(raw) = raw else {
        return (Vec::new(), report);
    };

    let mut traces = Vec::new();
    for (index, entry) in raw.entries().iter().enumerate() {
        report.entries_seen += 1;
        match normalize_entry(index, entry, target_mz, &mut report) {
            Some(trace) => traces.push(trace),
            None => report.entries_skipped += 1,
        }
    }

    (traces, report)
}

fn normalize_entry(
    index: usize,
    entry: &Value,
    target_mz: &[f64],
    report: &mut NormalizeReport,
) -> Option<Trace> {
    let parts = entry.as_array().filter(|parts| parts.len() >= 2)?;

    let time = coerce_floats(&parts[0]);
    let intensity = coerce_floats(&parts[1]);
    let scan_index = parts.get(2).map(coerce_floats).unwrap_or_default();
    report.values_dropped += time.dropped + intensity.dropped + scan_index.dropped;

    let (mut time, mut intensity, mut scan_index) =
        (time.values, intensity.values, scan_index.values);
    if time.is_empty() || intensity.is_empty() {
        return None;
    }

    let aligned = time.len().min(intensity.len());
    report.points_clipped += time.len() + intensity.len() - 2 * aligned;
    time.truncate(aligned);
    intensity.truncate(aligned);
    scan_index.truncate(aligned);

    let mz = target_mz.get(index).copied();
    Some(Trace {
        label: trace_label(index, mz),
        mz,
        time,
        intensity,
        scan_index,
    })
}
