pub mod command;
pub mod engine;
pub mod normalizer;
pub mod remote;
pub mod schema;

pub use command::CommandEngine;
pub use engine::{EngineError, EngineParams, ExtractionEngine, MzTarget};
pub use normalizer::{NormalizeReport, coerce_floats, normalize_traces, normalize_traces_with_report};
pub use remote::HttpEngine;
pub use schema::{RawExtractionResult, Trace};

use std::path::Path;
use std::sync::Arc;

use params::ExtractionRequest;
use tracing::debug;

/// Runs the engine for a validated request and normalizes its output.
#[derive(Clone)]
pub struct Extractor {
    engine: Arc<dyn ExtractionEngine>,
}

impl Extractor {
    pub fn new(engine: Arc<dyn ExtractionEngine>) -> Self {
        Self { engine }
    }

    /// Extract traces from `file`. An empty vector means the engine produced
    /// nothing usable, which is not an engine error.
    pub async fn extract_traces(
        &self,
        file: &Path,
        request: &ExtractionRequest,
    ) -> Result<Vec<Trace>, EngineError> {
        let params = EngineParams::from_request(request);
        let value = self.engine.extract(file, &params).await?;

        let raw = RawExtractionResult::resolve(value, request.target_mz().len());
        let (traces, report) = normalize_traces_with_report(raw.as_ref(), request.target_mz());

        debug!(
            engine = self.engine.name(),
            entries_seen = report.entries_seen,
            entries_skipped = report.entries_skipped,
            values_dropped = report.values_dropped,
            points_clipped = report.points_clipped,
            "Normalized engine output"
        );

        Ok(traces)
    }
}
