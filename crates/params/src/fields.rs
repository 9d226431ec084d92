use crate::error::ValidationError;

/// Names of the two form fields that make up a bounded pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairFields {
    pub start: &'static str,
    pub end: &'static str,
}

pub const RT_RANGE: PairFields = PairFields {
    start: "rt_range_start",
    end: "rt_range_end",
};

pub const Y_LIMIT: PairFields = PairFields {
    start: "ylim_min",
    end: "ylim_max",
};

fn parse_finite(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Parse a comma and/or semicolon separated list of target m/z values.
///
/// Order is preserved because it indexes into the engine output.
pub fn parse_mz_list(raw: &str) -> Result<Vec<f64>, ValidationError> {
    let parts: Vec<&str> = raw
        .split([',', ';'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        return Err(ValidationError::new("target_mz_arr is required."));
    }

    parts
        .into_iter()
        .map(|part| match parse_finite(part) {
            Some(value) if value > 0.0 => Ok(value),
            _ => Err(ValidationError::new(format!("Invalid m/z value: {part}"))),
        })
        .collect()
}

/// Blank or missing input is "not supplied", not an error.
pub fn parse_optional_float(
    raw: Option<&str>,
    field: &str,
) -> Result<Option<f64>, ValidationError> {
    let Some(text) = raw.map(str::trim).filter(|text| !text.is_empty()) else {
        return Ok(None);
    };

    parse_finite(text)
        .map(Some)
        .ok_or_else(|| ValidationError::invalid_number(field))
}

pub fn parse_float_or(
    raw: Option<&str>,
    field: &str,
    default: f64,
) -> Result<f64, ValidationError> {
    Ok(parse_optional_float(raw, field)?.unwrap_or(default))
}

pub fn parse_flag(raw: Option<&str>, field: &str, default: bool) -> Result<bool, ValidationError> {
    let Some(text) = raw.map(str::trim).filter(|text| !text.is_empty()) else {
        return Ok(default);
    };

    match text.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" | "on" => Ok(true),
        "false" | "f" | "0" | "no" | "n" | "off" => Ok(false),
        _ => Err(ValidationError::invalid_flag(field)),
    }
}

pub fn validate_tolerances(mz_tol: f64, rt_tol: f64) -> Result<(), ValidationError> {
    if mz_tol.is_nan() || mz_tol <= 0.0 {
        return Err(ValidationError::new("mz_tol must be positive."));
    }
    if rt_tol.is_nan() || rt_tol <= 0.0 {
        return Err(ValidationError::new("rt_tol must be positive."));
    }
    Ok(())
}

/// Validate a both-or-neither pair of bounds with `start < end`.
pub fn validate_paired_range(
    start_raw: Option<&str>,
    end_raw: Option<&str>,
    fields: PairFields,
) -> Result<Option<(f64, f64)>, ValidationError> {
    let start = parse_optional_float(start_raw, fields.start)?;
    let end = parse_optional_float(end_raw, fields.end)?;

    match (start, end) {
        (None, None) => Ok(None),
        (Some(start), Some(end)) if start < end => Ok(Some((start, end))),
        (Some(_), Some(_)) => Err(ValidationError::new(format!(
            "{} must be smaller than {}.",
            fields.start, fields.end
        ))),
        _ => Err(ValidationError::new(format!(
            "Provide both {} and {}.",
            fields.start, fields.end
        ))),
    }
}
