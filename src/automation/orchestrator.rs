use crate::automation::disclaimer;
use crate::automation::layers::LayerActivator;
use crate::automation::search::{self, SearchDriver};
use crate::browser::{screenshot, ChromeBrowser, MapPage};
use crate::core::{Config, MapConfig, PageOps};
use crate::errors::Result;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

const ZOOM_IN: &str = "button[aria-label='Zoom in']";

/// Run the full capture sequence against a freshly launched Chrome session.
/// Returns the path of the screenshot artifact on success. The session is
/// released on every exit path.
pub async fn run_automation(config: &Config, address: &str) -> Result<PathBuf> {
    info!(address, "launching browser session");
    let page = MapPage::launch(ChromeBrowser::new(), &config.browser).await?;
    run_with_page(page, config, address).await
}

/// Drive an already-acquired page through the sequence, closing it exactly
/// once whether the drive succeeds or fails.
pub async fn run_with_page<P: PageOps>(page: P, config: &Config, address: &str) -> Result<PathBuf> {
    let result = drive(&page, config, address).await;
    let closed = page.close().await;

    match result {
        Ok(path) => {
            closed?;
            Ok(path)
        }
        Err(e) => {
            if let Err(close_err) = closed {
                warn!(error = %close_err, "browser close failed after aborted run");
            }
            Err(e)
        }
    }
}

/// Navigate → Stabilize → DismissDisclaimer → Search → PostSearchSettle →
/// ActivateLayers → Zoom → FinalSettle → Capture. Strictly sequential; the
/// only branches live inside the search and layer steps.
async fn drive<P: PageOps>(page: &P, config: &Config, address: &str) -> Result<PathBuf> {
    let map = &config.map;

    page.goto(&map.app_url).await?;
    stabilize(page, map).await;

    disclaimer::dismiss(page, map.disclaimer_timeout_ms).await?;

    let outcome = SearchDriver::new(map).run(page, address).await?;
    info!(?outcome, "search completed");
    settle(map.post_search_settle_ms).await;

    let layer_outcomes = LayerActivator::new(map).run(page).await?;
    let toggled = layer_outcomes.iter().filter(|(_, o)| !o.was_skipped()).count();
    info!(toggled, attempted = layer_outcomes.len(), "layers activated");

    for _ in 0..map.zoom_clicks {
        page.click(ZOOM_IN).await?;
        settle(map.zoom_settle_ms).await;
    }

    // Tile rendering exposes no readiness signal; a fixed pause is all the
    // host app gives us before the capture is representative.
    settle(map.final_settle_ms).await;

    let png = page.screenshot().await?;
    screenshot::save_to_file(&png, &map.screenshot_path).await?;
    info!(path = %map.screenshot_path.display(), "screenshot captured");

    Ok(map.screenshot_path.clone())
}

/// The app shell is ready once the search control renders. When that never
/// happens inside the budget the failure is owned by the search step, which
/// waits again with its own bound.
async fn stabilize<P: PageOps>(page: &P, map: &MapConfig) {
    if page
        .wait_for(search::SEARCH_INPUT, map.stabilize_timeout_ms)
        .await
        .is_err()
    {
        debug!("app shell readiness not observed within budget");
    }
}

async fn settle(millis: u64) {
    tokio::time::sleep(Duration::from_millis(millis)).await;
}
