use crate::types::ScenarioKind;

/// Errors surfaced by the handle types themselves.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandleError {
    /// Upgrade attempted on an observer whose target is already destroyed.
    #[error("observer target expired")]
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogError {
    /// The hash chain does not recompute; the log was tampered with or
    /// corrupted. Not recoverable.
    #[error("trace log integrity violation at event index {index}")]
    IntegrityViolation { index: usize },
}

/// An expected-vs-actual mismatch detected by a scenario check. Fatal at the
/// CLI boundary; library callers receive it as an `Err`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{scenario} scenario: {check}: expected {expected}, got {actual}")]
pub struct InvariantViolation {
    pub scenario: ScenarioKind,
    pub check: &'static str,
    pub expected: String,
    pub actual: String,
}

/// Umbrella error for the demonstrator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DemoError {
    #[error("handle error: {0}")]
    Handle(#[from] HandleError),

    #[error("log error: {0}")]
    Log(#[from] LogError),

    #[error("invariant violation: {0}")]
    Invariant(#[from] InvariantViolation),
}

impl DemoError {
    /// A handle-level refusal (expired observer) is something callers can
    /// handle; a broken log chain or a failed invariant check is not.
    pub fn is_recoverable(&self) -> bool {
        match self {
            DemoError::Handle(_) => true,
            DemoError::Log(_) => false,
            DemoError::Invariant(_) => false,
        }
    }
}
