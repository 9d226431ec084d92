use std::path::Path;

use async_trait::async_trait;
use params::ExtractionRequest;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Engines take a bare m/z for a single target and a list otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MzTarget {
    Single(f64),
    Many(Vec<f64>),
}

impl MzTarget {
    pub fn from_values(values: &[f64]) -> Self {
        match values {
            [single] => Self::Single(*single),
            many => Self::Many(many.to_vec()),
        }
    }
}

/// Parameters handed to the extraction engine alongside the raw file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineParams {
    pub target_mz_arr: MzTarget,
    pub target_rt: Option<f64>,
    pub mz_tol: f64,
    pub rt_tol: f64,
    pub rt_range: Option<(f64, f64)>,
    pub show_target_rt: bool,
    pub ylim: Option<(f64, f64)>,
}

impl EngineParams {
    pub fn from_request(request: &ExtractionRequest) -> Self {
        Self {
            target_mz_arr: MzTarget::from_values(request.target_mz()),
            target_rt: request.target_rt(),
            mz_tol: request.mz_tolerance(),
            rt_tol: request.rt_tolerance(),
            rt_range: request.rt_range(),
            show_target_rt: request.show_target_rt(),
            ylim: request.y_limit(),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{message}")]
    Failed { message: String },

    #[error("invalid engine output: {0}")]
    InvalidOutput(#[from] serde_json::Error),

    #[error("engine request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl EngineError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}

/// External capability that reads a raw instrument file and extracts
/// chromatograms for the requested targets.
///
/// The returned JSON is opaque; its shape is resolved by
/// [`crate::RawExtractionResult::resolve`].
#[async_trait]
pub trait ExtractionEngine: Send + Sync {
    fn name(&self) -> &str;

    async fn extract(&self, file: &Path, params: &EngineParams) -> Result<Value, EngineError>;
}
