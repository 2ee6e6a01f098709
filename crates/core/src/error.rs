use thiserror::Error;

pub type BanditResult<T> = Result<T, BanditError>;

/// Caller-facing failures. Numerical degeneracies (empty actions,
/// rank-deficient designs) never surface here; the model layer absorbs them.
#[derive(Error, Debug)]
pub enum BanditError {
    #[error("Dimension mismatch: expected {expected} features, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Action {action} out of range [0, {num_actions})")]
    ActionOutOfRange { action: usize, num_actions: usize },

    #[error("Policy has no model state; call reset or fit_offline first")]
    UninitializedState,

    #[error("Non-finite {field} at position {index}")]
    NonFinite { field: &'static str, index: usize },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BanditError {
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            BanditError::DimensionMismatch { .. }
                | BanditError::ActionOutOfRange { .. }
                | BanditError::NonFinite { .. }
                | BanditError::UninitializedState
        )
    }
}
