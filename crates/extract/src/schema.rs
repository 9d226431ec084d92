use serde::Serialize;
use serde_json::Value;

/// One plottable chromatogram. `time`, `intensity` and a non-empty
/// `scan_index` always have the same length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub label: String,
    pub mz: Option<f64>,
    pub time: Vec<f64>,
    pub intensity: Vec<f64>,
    pub scan_index: Vec<f64>,
}

/// Engine output with its outer shape resolved.
///
/// Engines answer a single-target request with one bare
/// `(time, intensity, scan_index?)` triple and a multi-target request with
/// a list of them.
#[derive(Debug, Clone, PartialEq)]
pub enum RawExtractionResult {
    SingleTriple(Value),
    SequenceOfTriples(Vec<Value>),
}

impl RawExtractionResult {
    /// Resolve the shape of `value` given how many targets were requested.
    ///
    /// With one target a value that looks like a bare triple (its first
    /// element is a flat array) is taken as `SingleTriple`. Everything else
    /// goes through [`RawExtractionResult::from_value`].
    pub fn resolve(value: Value, requested_targets: usize) -> Option<Self> {
        if requested_targets == 1 && is_bare_triple(&value) {
            return Some(Self::SingleTriple(value));
        }
        Self::from_value(value)
    }

    /// Untagged shape inference: a non-array is wrapped in a one-element
    /// sequence, and an array whose first element is a number is itself one
    /// entry. A leading boolean is treated like a number.
    pub fn from_value(value: Value) -> Option<Self> {
        let entries = match value {
            Value::Null => return None,
            Value::Array(items) => items,
            other => vec![other],
        };

        if entries
            .first()
            .is_some_and(|first| first.is_number() || first.is_boolean())
        {
            return Some(Self::SingleTriple(Value::Array(entries)));
        }
        Some(Self::SequenceOfTriples(entries))
    }

    pub fn entries(&self) -> &[Value] {
        match self {
            Self::SingleTriple(entry) => std::slice::from_ref(entry),
            Self::SequenceOfTriples(entries) => entries,
        }
    }
}

fn is_bare_triple(value: &Value) -> bool {
    let Some(items) = value.as_array() else {
        return false;
    };
    if !(2..=3).contains(&items.len()) {
        return false;
    }
    items[0]
        .as_array()
        .is_some_and(|time| time.first().is_none_or(|first| !first.is_array()))
}
