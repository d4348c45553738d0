use crate::automation::tokenizer::tokenize;
use crate::core::{MapConfig, PageOps};
use crate::errors::Result;
use std::time::Duration;
use tracing::debug;

/// The host app exposes the search control under either of two labels
/// depending on build; match both.
pub const SEARCH_INPUT: &str = r#"input[aria-label="Search for an address"], input[placeholder="Search for an address"]"#;

/// Rows rendered inside the live-suggestion dropdown.
pub const SUGGESTION_ROWS: &str = ".esri-search__form div.interaction-container";

/// The dropdown renders exactly one meaningful suggestion as three sibling
/// interaction containers. This ties the driver to the current DOM shape of
/// the target site; if the widget markup changes, retune this first.
pub const SUGGESTION_MATCH_COUNT: usize = 3;

/// Of the three containers, index 1 is the first real suggestion entry.
const SUGGESTION_ROW_INDEX: usize = 1;

/// Any count other than the expected shape means the dropdown is absent or
/// mid-render, so the driver keeps typing. Larger counts included.
pub fn has_suggestion_match(count: usize) -> bool {
    count == SUGGESTION_MATCH_COUNT
}

/// How the typing loop exited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A suggestion appeared after `tokens_typed` tokens and was clicked;
    /// the remaining tokens were never typed.
    SuggestionSelected { tokens_typed: usize },
    /// No suggestion ever matched; the typed text was submitted with Enter.
    SubmittedDirectly,
}

/// Types an address into the search control one token at a time, polling for
/// live suggestions after every token and selecting the first one that
/// appears. Falls back to direct submission when none does.
pub struct SearchDriver {
    input_timeout_ms: u64,
    token_settle: Duration,
    select_settle: Duration,
}

impl SearchDriver {
    pub fn new(config: &MapConfig) -> Self {
        Self {
            input_timeout_ms: config.search_input_timeout_ms,
            token_settle: Duration::from_millis(config.token_settle_ms),
            select_settle: Duration::from_millis(config.select_settle_ms),
        }
    }

    /// The search input never appearing is a hard failure; everything past
    /// that point resolves to one of the two [`SearchOutcome`]s.
    pub async fn run<P: PageOps>(&self, page: &P, address: &str) -> Result<SearchOutcome> {
        page.wait_for(SEARCH_INPUT, self.input_timeout_ms).await?;

        let tokens = tokenize(address);
        for (position, token) in tokens.iter().enumerate() {
            let current = page.value(SEARCH_INPUT).await?;
            page.fill(SEARCH_INPUT, &format!("{current}{token}")).await?;
            tokio::time::sleep(self.token_settle).await;

            let rows = page.count(SUGGESTION_ROWS).await?;
            if has_suggestion_match(rows) {
                page.click_nth(SUGGESTION_ROWS, SUGGESTION_ROW_INDEX).await?;
                tokio::time::sleep(self.select_settle).await;
                let tokens_typed = position + 1;
                debug!(tokens_typed, "suggestion selected");
                return Ok(SearchOutcome::SuggestionSelected { tokens_typed });
            }
        }

        debug!("no suggestion matched, submitting typed text");
        page.press_enter().await?;
        tokio::time::sleep(self.select_settle).await;
        Ok(SearchOutcome::SubmittedDirectly)
    }
}
