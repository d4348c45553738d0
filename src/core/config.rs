use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub browser: BrowserConfig,
    pub map: MapConfig,
    pub storage: StorageConfig,
    pub summarizer: SummarizerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    pub headless: bool,
    pub viewport: Viewport,
    pub user_agent: Option<String>,
    pub args: Vec<String>,
    /// Default timeout applied to tab operations, navigation included.
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Everything about the target map application: where it lives, where the
/// artifact goes, and the pacing of the interaction sequence. All pauses are
/// fixed by design; the host UI exposes no readiness signal for most of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    pub app_url: String,
    pub screenshot_path: PathBuf,
    /// Budget for the app shell to render after navigation.
    pub stabilize_timeout_ms: u64,
    /// Bound on the search input appearing. Exceeding it is fatal.
    pub search_input_timeout_ms: u64,
    /// Bound on the disclaimer close control. Exceeding it is tolerated.
    pub disclaimer_timeout_ms: u64,
    /// Pause after each typed token, letting live suggestions render.
    pub token_settle_ms: u64,
    /// Pause after suggestion selection or direct submission, letting the
    /// map pan to the result.
    pub select_settle_ms: u64,
    pub post_search_settle_ms: u64,
    pub panel_settle_ms: u64,
    pub layer_settle_ms: u64,
    pub zoom_clicks: u32,
    pub zoom_settle_ms: u64,
    /// Pause before capture while map tiles finish rendering.
    pub final_settle_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    /// Path-style endpoint override for S3-compatible services. Virtual
    /// hosted AWS addressing is used when unset.
    pub endpoint: Option<String>,
    pub key_prefix: String,
    pub presign_expiry_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizerConfig {
    pub api_base: String,
    pub model: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport: Viewport::default(),
            user_agent: None,
            args: vec![],
            timeout_ms: 60_000,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            app_url: "https://byron-council.maps.arcgis.com/apps/instant/sidebar/index.html?appid=c741bd7f05e2485fb288bd45cc1a2c5c".to_string(),
            screenshot_path: PathBuf::from("flood_zone.png"),
            stabilize_timeout_ms: 10_000,
            search_input_timeout_ms: 10_000,
            disclaimer_timeout_ms: 5_000,
            token_settle_ms: 2_000,
            select_settle_ms: 1_500,
            post_search_settle_ms: 3_000,
            panel_settle_ms: 500,
            layer_settle_ms: 300,
            zoom_clicks: 7,
            zoom_settle_ms: 200,
            final_settle_ms: 20_000,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            region: "ap-southeast-2".to_string(),
            endpoint: None,
            key_prefix: "flood_maps".to_string(),
            presign_expiry_secs: 3_600,
        }
    }
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o".to_string(),
        }
    }
}
