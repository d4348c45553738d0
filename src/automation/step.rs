use crate::errors::{FloodscopeError, Result};

/// Declared outcome of an automation step that is allowed to fail.
///
/// Required steps return plain `Result` and abort the run on error. Optional
/// steps go through [`optional`], which records absence as `Skipped` instead
/// of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Completed,
    Skipped,
}

impl StepOutcome {
    pub fn was_skipped(self) -> bool {
        self == StepOutcome::Skipped
    }
}

/// Absorb absence-shaped failures for a step declared optional. Anything
/// other than a missing element or an expired wait still propagates.
pub fn optional(result: Result<()>) -> Result<StepOutcome> {
    match result {
        Ok(()) => Ok(StepOutcome::Completed),
        Err(FloodscopeError::ElementNotFound(_)) | Err(FloodscopeError::TimeoutError(_)) => {
            Ok(StepOutcome::Skipped)
        }
        Err(e) => Err(e),
    }
}
