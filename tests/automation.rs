//! Automation sequence tests against a scripted page.
//!
//! The real `MapPage` talks to Chrome; these tests swap in a `MockPage`
//! whose suggestion counts, missing elements, and failures are scripted,
//! which is enough to pin down the control flow of every step.

use async_trait::async_trait;
use floodscope::automation::layers::{LayerActivator, LAYER_NAMES};
use floodscope::automation::search::{SearchDriver, SearchOutcome, SUGGESTION_ROWS};
use floodscope::automation::{run_with_page, StepOutcome};
use floodscope::core::PageOps;
use floodscope::errors::{FloodscopeError, Result};
use floodscope::Config;
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

const PNG_BYTES: [u8; 4] = [0x89, b'P', b'N', b'G'];

#[derive(Default)]
struct PageState {
    gotos: Vec<String>,
    fills: Vec<String>,
    clicks: Vec<String>,
    enter_presses: usize,
    closes: usize,
    field_value: String,
    /// Counts returned for the suggestion-row selector, one per query;
    /// exhausted entries read as zero.
    suggestion_counts: VecDeque<usize>,
    /// Selectors that behave as absent from the page.
    missing: HashSet<String>,
    fail_goto: bool,
    fail_screenshot: bool,
}

#[derive(Clone)]
struct MockPage {
    state: Arc<Mutex<PageState>>,
}

impl MockPage {
    fn new(state: Arc<Mutex<PageState>>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl PageOps for MockPage {
    async fn goto(&self, url: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_goto {
            return Err(FloodscopeError::NavigationFailed(url.to_string()));
        }
        state.gotos.push(url.to_string());
        Ok(())
    }

    async fn wait_for(&self, selector: &str, timeout_ms: u64) -> Result<()> {
        if self.state.lock().unwrap().missing.contains(selector) {
            return Err(FloodscopeError::TimeoutError(format!(
                "no element matched '{selector}' within {timeout_ms}ms"
            )));
        }
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.missing.contains(selector) {
            return Err(FloodscopeError::ElementNotFound(selector.to_string()));
        }
        state.clicks.push(selector.to_string());
        Ok(())
    }

    async fn click_nth(&self, selector: &str, index: usize) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.missing.contains(selector) {
            return Err(FloodscopeError::ElementNotFound(selector.to_string()));
        }
        state.clicks.push(format!("{selector}@{index}"));
        Ok(())
    }

    async fn fill(&self, _selector: &str, value: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.fills.push(value.to_string());
        state.field_value = value.to_string();
        Ok(())
    }

    async fn value(&self, _selector: &str) -> Result<String> {
        Ok(self.state.lock().unwrap().field_value.clone())
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        let mut state = self.state.lock().unwrap();
        if selector == SUGGESTION_ROWS {
            return Ok(state.suggestion_counts.pop_front().unwrap_or(0));
        }
        Ok(1)
    }

    async fn press_enter(&self) -> Result<()> {
        self.state.lock().unwrap().enter_presses += 1;
        Ok(())
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        let state = self.state.lock().unwrap();
        if state.fail_screenshot {
            return Err(FloodscopeError::ScreenshotFailed("capture refused".into()));
        }
        Ok(PNG_BYTES.to_vec())
    }

    async fn close(self) -> Result<()> {
        self.state.lock().unwrap().closes += 1;
        Ok(())
    }
}

/// Full defaults minus the pacing, so tests run instantly.
fn fast_config() -> Config {
    let mut config = Config::default();
    config.map.token_settle_ms = 0;
    config.map.select_settle_ms = 0;
    config.map.post_search_settle_ms = 0;
    config.map.panel_settle_ms = 0;
    config.map.layer_settle_ms = 0;
    config.map.zoom_settle_ms = 0;
    config.map.final_settle_ms = 0;
    config
}

#[tokio::test]
async fn suggestion_match_stops_typing() {
    let state = Arc::new(Mutex::new(PageState {
        suggestion_counts: VecDeque::from([0, 3]),
        ..Default::default()
    }));
    let page = MockPage::new(state.clone());

    let config = fast_config();
    let outcome = SearchDriver::new(&config.map)
        .run(&page, "1 Main Street")
        .await
        .unwrap();

    assert_eq!(outcome, SearchOutcome::SuggestionSelected { tokens_typed: 2 });

    let state = state.lock().unwrap();
    // Two tokens typed, then the suggestion click; the remaining three
    // tokens are never typed and the fallback never fires.
    assert_eq!(state.fills, vec!["1", "1 "]);
    assert_eq!(state.clicks, vec![format!("{SUGGESTION_ROWS}@1")]);
    assert_eq!(state.enter_presses, 0);
}

#[tokio::test]
async fn no_suggestions_falls_back_to_one_submission() {
    let state = Arc::new(Mutex::new(PageState::default()));
    let page = MockPage::new(state.clone());

    let config = fast_config();
    let outcome = SearchDriver::new(&config.map)
        .run(&page, "1 Main Street")
        .await
        .unwrap();

    assert_eq!(outcome, SearchOutcome::SubmittedDirectly);

    let state = state.lock().unwrap();
    assert_eq!(
        state.fills,
        vec!["1", "1 ", "1 Main", "1 Main ", "1 Main Street"]
    );
    assert_eq!(state.enter_presses, 1);
    assert!(state.clicks.is_empty());
}

#[tokio::test]
async fn oversized_suggestion_counts_do_not_match() {
    let state = Arc::new(Mutex::new(PageState {
        suggestion_counts: VecDeque::from([6, 6, 6, 6, 6]),
        ..Default::default()
    }));
    let page = MockPage::new(state.clone());

    let config = fast_config();
    let outcome = SearchDriver::new(&config.map)
        .run(&page, "1 Main Street")
        .await
        .unwrap();

    assert_eq!(outcome, SearchOutcome::SubmittedDirectly);
    assert_eq!(state.lock().unwrap().enter_presses, 1);
}

#[tokio::test]
async fn missing_search_input_is_fatal() {
    let mut missing = HashSet::new();
    missing.insert(floodscope::automation::search::SEARCH_INPUT.to_string());
    let state = Arc::new(Mutex::new(PageState {
        missing,
        ..Default::default()
    }));
    let page = MockPage::new(state);

    let config = fast_config();
    let result = SearchDriver::new(&config.map).run(&page, "1 Main Street").await;
    assert!(matches!(result, Err(FloodscopeError::TimeoutError(_))));
}

#[tokio::test]
async fn absent_layer_is_skipped_but_all_are_attempted() {
    let absent = "div[aria-label='Fill Exclusion Zones']";
    let mut missing = HashSet::new();
    missing.insert(absent.to_string());
    let state = Arc::new(Mutex::new(PageState {
        missing,
        ..Default::default()
    }));
    let page = MockPage::new(state.clone());

    let config = fast_config();
    let outcomes = LayerActivator::new(&config.map).run(&page).await.unwrap();

    let names: Vec<&str> = outcomes.iter().map(|(name, _)| *name).collect();
    assert_eq!(names, LAYER_NAMES);

    let skipped: Vec<&str> = outcomes
        .iter()
        .filter(|(_, outcome)| outcome.was_skipped())
        .map(|(name, _)| *name)
        .collect();
    assert_eq!(skipped, vec!["Fill Exclusion Zones"]);

    // The eight present layers were clicked, in declaration order.
    let layer_clicks: Vec<String> = state
        .lock()
        .unwrap()
        .clicks
        .iter()
        .filter(|click| click.contains("aria-label='F") || click.contains("aria-label='N") || click.contains("aria-label='B"))
        .cloned()
        .collect();
    assert_eq!(layer_clicks.len(), 1 + 1 + 8); // category + expander + layers
}

#[tokio::test]
async fn navigation_failure_still_closes_the_session_once() {
    let state = Arc::new(Mutex::new(PageState {
        fail_goto: true,
        ..Default::default()
    }));
    let page = MockPage::new(state.clone());

    let config = fast_config();
    let result = run_with_page(page, &config, "1 Main Street").await;

    assert!(matches!(result, Err(FloodscopeError::NavigationFailed(_))));
    assert_eq!(state.lock().unwrap().closes, 1);
}

#[tokio::test]
async fn vanished_search_input_aborts_the_run_but_releases_the_session() {
    let mut missing = HashSet::new();
    missing.insert(floodscope::automation::search::SEARCH_INPUT.to_string());
    let state = Arc::new(Mutex::new(PageState {
        missing,
        ..Default::default()
    }));
    let page = MockPage::new(state.clone());

    let config = fast_config();
    let result = run_with_page(page, &config, "1 Main Street").await;

    assert!(matches!(result, Err(FloodscopeError::TimeoutError(_))));
    let state = state.lock().unwrap();
    assert_eq!(state.closes, 1);
    assert!(state.fills.is_empty(), "nothing was typed");
}

#[tokio::test]
async fn fatal_failure_still_closes_the_session_once() {
    let state = Arc::new(Mutex::new(PageState {
        fail_screenshot: true,
        ..Default::default()
    }));
    let page = MockPage::new(state.clone());

    let config = fast_config();
    let result = run_with_page(page, &config, "1 Main Street").await;

    assert!(matches!(result, Err(FloodscopeError::ScreenshotFailed(_))));
    assert_eq!(state.lock().unwrap().closes, 1);
}

#[tokio::test]
async fn full_run_with_no_suggestions_produces_the_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let artifact = dir.path().join("flood_zone.png");

    // No disclaimer this session, and the dropdown never renders.
    let mut missing = HashSet::new();
    missing.insert(floodscope::automation::disclaimer::CLOSE_BUTTON.to_string());
    let state = Arc::new(Mutex::new(PageState {
        missing,
        ..Default::default()
    }));
    let page = MockPage::new(state.clone());

    let mut config = fast_config();
    config.map.screenshot_path = artifact.clone();

    let path = run_with_page(page, &config, "1 Main Street").await.unwrap();
    assert_eq!(path, artifact);
    assert_eq!(std::fs::read(&artifact).unwrap(), PNG_BYTES.to_vec());

    let state = state.lock().unwrap();
    assert_eq!(state.gotos.len(), 1);
    assert_eq!(state.enter_presses, 1, "fallback submission exactly once");
    assert_eq!(state.closes, 1, "session released exactly once");

    // Zoom happened after the layers, the configured number of times.
    let zoom_clicks = state
        .clicks
        .iter()
        .filter(|click| click.as_str() == "button[aria-label='Zoom in']")
        .count();
    assert_eq!(zoom_clicks, config.map.zoom_clicks as usize);
}

#[tokio::test]
async fn optional_outcomes_distinguish_skip_from_completion() {
    assert!(StepOutcome::Skipped.was_skipped());
    assert!(!StepOutcome::Completed.was_skipped());
}
