use crate::automation::step::{self, StepOutcome};
use crate::core::PageOps;
use crate::errors::Result;
use tracing::debug;

pub const CLOSE_BUTTON: &str = "button[aria-label='Close']";

/// Close the disclaimer modal if one is showing. The modal only appears on
/// some sessions; its absence is the normal case, not a failure.
pub async fn dismiss<P: PageOps>(page: &P, timeout_ms: u64) -> Result<StepOutcome> {
    let outcome = step::optional(try_dismiss(page, timeout_ms).await)?;
    if outcome.was_skipped() {
        debug!("no disclaimer to dismiss");
    }
    Ok(outcome)
}

async fn try_dismiss<P: PageOps>(page: &P, timeout_ms: u64) -> Result<()> {
    page.wait_for(CLOSE_BUTTON, timeout_ms).await?;
    page.click(CLOSE_BUTTON).await
}
