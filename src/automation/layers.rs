use crate::automation::step::{self, StepOutcome};
use crate::core::{MapConfig, PageOps};
use crate::errors::Result;
use std::time::Duration;
use tracing::{debug, warn};

pub const LAYER_PANEL_BUTTON: &str = r#"button[aria-label="Layers"]"#;

/// The trailing space inside the label is present in the target DOM.
pub const FLOOD_CATEGORY: &str = "div[aria-label='Flood Information ']";

const CATEGORY_EXPANDER: &str = "div[aria-label='Flood Information '] div.open-container";

/// Flood layers toggled before capture, in a fixed order so runs are
/// reproducible. Labels are exact-match targets against the panel entries.
pub const LAYER_NAMES: [&str; 9] = [
    "Flood model catchments",
    "Fill Exclusion Zones",
    "Floor Level Survey 2016 2019",
    "Flood Planning Area (West Byron)",
    "Flood Planning Area (Areas Affected by Flood - refer to Byron Shire Development Control Plan  2014 Chapter C2)",
    "Flood Prone (Liable) Lands (land susceptible to flooding by the PMF event Refer to Byron Shire Development Control Plan 2010 Chapter 1: Part K)",
    "North Byron 2020 100yr 2100 CC Hazard",
    "North Byron 2020 Existing Climate Hazard",
    "Belongil 2015 Flood Hazard Layers",
];

/// Opens the layer panel, expands the flood category, and toggles each named
/// layer. The panel and category are required; individual layers are not,
/// since the council reshuffles them between map releases.
pub struct LayerActivator {
    panel_settle: Duration,
    layer_settle: Duration,
}

impl LayerActivator {
    pub fn new(config: &MapConfig) -> Self {
        Self {
            panel_settle: Duration::from_millis(config.panel_settle_ms),
            layer_settle: Duration::from_millis(config.layer_settle_ms),
        }
    }

    /// Toggles are "attempted", not "confirmed active"; no state readback.
    pub async fn run<P: PageOps>(&self, page: &P) -> Result<Vec<(&'static str, StepOutcome)>> {
        page.click(LAYER_PANEL_BUTTON).await?;
        tokio::time::sleep(self.panel_settle).await;

        page.click_nth(FLOOD_CATEGORY, 0).await?;
        page.click_nth(CATEGORY_EXPANDER, 0).await?;

        let mut outcomes = Vec::with_capacity(LAYER_NAMES.len());
        for name in LAYER_NAMES {
            let selector = format!("div[aria-label='{name}']");
            let outcome = step::optional(page.click_nth(&selector, 0).await)?;
            match outcome {
                StepOutcome::Completed => debug!(layer = name, "layer toggled"),
                StepOutcome::Skipped => warn!(layer = name, "layer control not found, skipping"),
            }
            tokio::time::sleep(self.layer_settle).await;
            outcomes.push((name, outcome));
        }

        Ok(outcomes)
    }
}
