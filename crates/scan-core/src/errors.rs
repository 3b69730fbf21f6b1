use thiserror::Error;

/// Synchronous, programmer-error paths only (spec.md §7: "unexpected
/// programmer errors... raise synchronously"). Every *expected* operational
/// failure — scope violations, tool errors, workspace failures surfaced to
/// a caller — is represented as data (a `SYSTEM` [`Finding`](crate::Finding)
/// or a [`ScanStatus`](crate::ScanStatus) variant), never as a
/// `PipelineError`.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("missing required field: {0}")]
    InvalidInput(&'static str),

    #[error("scope violation: {0}")]
    ScopeViolation(String),

    #[error("workspace unavailable: {0}")]
    WorkspaceUnavailable(String),
}
