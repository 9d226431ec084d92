use serde::Serialize;

use crate::error::ValidationError;
use crate::fields::{
    RT_RANGE, Y_LIMIT, parse_flag, parse_float_or, parse_mz_list, parse_optional_float,
    validate_paired_range, validate_tolerances,
};

pub const DEFAULT_MZ_TOL: f64 = 0.005;
pub const DEFAULT_RT_TOL: f64 = 0.3;
pub const DEFAULT_SHOW_TARGET_RT: bool = true;

/// Text form fields exactly as they arrived, before any interpretation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawForm {
    pub target_mz_arr: Option<String>,
    pub target_rt: Option<String>,
    pub mz_tol: Option<String>,
    pub rt_tol: Option<String>,
    pub rt_range_start: Option<String>,
    pub rt_range_end: Option<String>,
    pub ylim_min: Option<String>,
    pub ylim_max: Option<String>,
    pub show_target_rt: Option<String>,
}

impl RawForm {
    /// Store a named field. Returns `false` for names this form does not know.
    pub fn set(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "target_mz_arr" => &mut self.target_mz_arr,
            "target_rt" => &mut self.target_rt,
            "mz_tol" => &mut self.mz_tol,
            "rt_tol" => &mut self.rt_tol,
            "rt_range_start" => &mut self.rt_range_start,
            "rt_range_end" => &mut self.rt_range_end,
            "ylim_min" => &mut self.ylim_min,
            "ylim_max" => &mut self.ylim_max,
            "show_target_rt" => &mut self.show_target_rt,
            _ => return false,
        };
        *slot = Some(value);
        true
    }
}

/// Validated extraction parameters.
///
/// Serializes with the field names echoed back in the EIC response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionRequest {
    #[serde(rename = "target_mz_values")]
    target_mz: Vec<f64>,
    target_rt: Option<f64>,
    #[serde(rename = "mz_tol")]
    mz_tolerance: f64,
    #[serde(rename = "rt_tol")]
    rt_tolerance: f64,
    rt_range: Option<(f64, f64)>,
    #[serde(rename = "ylim")]
    y_limit: Option<(f64, f64)>,
    show_target_rt: bool,
}

impl ExtractionRequest {
    /// Validate a raw form. The first failing rule is reported.
    pub fn from_form(form: &RawForm) -> Result<Self, ValidationError> {
        let mz_tolerance = parse_float_or(form.mz_tol.as_deref(), "mz_tol", DEFAULT_MZ_TOL)?;
        let rt_tolerance = parse_float_or(form.rt_tol.as_deref(), "rt_tol", DEFAULT_RT_TOL)?;
        let show_target_rt = parse_flag(
            form.show_target_rt.as_deref(),
            "show_target_rt",
            DEFAULT_SHOW_TARGET_RT,
        )?;

        validate_tolerances(mz_tolerance, rt_tolerance)?;

        let target_mz = parse_mz_list(form.target_mz_arr.as_deref().unwrap_or_default())?;
        let target_rt = parse_optional_float(form.target_rt.as_deref(), "target_rt")?;
        let rt_range = validate_paired_range(
            form.rt_range_start.as_deref(),
            form.rt_range_end.as_deref(),
            RT_RANGE,
        )?;
        let y_limit =
            validate_paired_range(form.ylim_min.as_deref(), form.ylim_max.as_deref(), Y_LIMIT)?;

        Ok(Self {
            target_mz,
            target_rt,
            mz_tolerance,
            rt_tolerance,
            rt_range,
            y_limit,
            show_target_rt,
        })
    }

    pub fn target_mz(&self) -> &[f64] {
        &self.target_mz
    }

    pub fn target_rt(&self) -> Option<f64> {
        self.target_rt
    }

    pub fn mz_tolerance(&self) -> f64 {
        self.mz_tolerance
    }

    pub fn rt_tolerance(&self) -> f64 {
        self.rt_tolerance
    }

    pub fn rt_range(&self) -> Option<(f64, f64)> {
        self.rt_range
    }

    pub fn y_limit(&self) -> Option<(f64, f64)> {
        self.y_limit
    }

    pub fn show_target_rt(&self) -> bool {
        self.show_target_rt
    }
}
