use crate::report::types::Report;
use tracing::instrument;

/// Verify the candidates without generating any output.
#[instrument(skip_all, level = "trace")]
pub fn report(report: &Report) {
    tracing::debug!(candidates = report.candidates.len(), "silent report");
}
