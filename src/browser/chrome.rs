use crate::core::{BrowserConfig, BrowserTrait};
use crate::errors::{FloodscopeError, Result};
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use serde_json::Value;
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;

/// Chrome browser implementation
pub struct ChromeBrowser {
    browser: Option<Browser>,
    tab_timeout_ms: u64,
}

impl ChromeBrowser {
    pub fn new() -> Self {
        Self {
            browser: None,
            tab_timeout_ms: 60_000,
        }
    }
}

impl Default for ChromeBrowser {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrowserTrait for ChromeBrowser {
    type TabHandle = Arc<Tab>;

    async fn launch(&mut self, config: &BrowserConfig) -> Result<()> {
        let window_size_arg = format!(
            "--window-size={},{}",
            config.viewport.width, config.viewport.height
        );

        let user_agent_arg = config
            .user_agent
            .as_ref()
            .map(|ua| format!("--user-agent={}", ua));

        let mut args = vec![
            OsStr::new("--no-sandbox"),
            OsStr::new("--disable-dev-shm-usage"),
            OsStr::new(&window_size_arg),
        ];

        if let Some(ref ua_arg) = user_agent_arg {
            args.push(OsStr::new(ua_arg));
        }

        for arg in &config.args {
            args.push(OsStr::new(arg));
        }

        let launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .args(args)
            .build()
            .map_err(|e| FloodscopeError::LaunchFailed(e.to_string()))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| FloodscopeError::LaunchFailed(e.to_string()))?;

        self.browser = Some(browser);
        self.tab_timeout_ms = config.timeout_ms;
        Ok(())
    }

    async fn new_tab(&self) -> Result<Self::TabHandle> {
        let browser = self
            .browser
            .as_ref()
            .ok_or(FloodscopeError::BrowserNotLaunched)?;

        let tab = browser
            .new_tab()
            .map_err(|e| FloodscopeError::TabCreationFailed(e.to_string()))?;

        tab.set_default_timeout(Duration::from_millis(self.tab_timeout_ms));

        Ok(tab)
    }

    async fn navigate(&self, tab: &Self::TabHandle, url: &str) -> Result<()> {
        tab.navigate_to(url)
            .map_err(|e| FloodscopeError::NavigationFailed(e.to_string()))?;

        tab.wait_until_navigated()
            .map_err(|e| FloodscopeError::NavigationFailed(e.to_string()))?;

        Ok(())
    }

    async fn execute_script(&self, tab: &Self::TabHandle, script: &str) -> Result<Value> {
        let result = tab
            .evaluate(script, false)
            .map_err(|e| FloodscopeError::JavaScriptFailed(e.to_string()))?;

        Ok(result.value.unwrap_or(Value::Null))
    }

    async fn press_key(&self, tab: &Self::TabHandle, key: &str) -> Result<()> {
        tab.press_key(key)
            .map_err(|e| FloodscopeError::ChromeError(e.to_string()))?;
        Ok(())
    }

    async fn take_screenshot(&self, tab: &Self::TabHandle) -> Result<Vec<u8>> {
        let screenshot = tab
            .capture_screenshot(
                headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption::Png,
                None,
                None,
                true,
            )
            .map_err(|e| FloodscopeError::ScreenshotFailed(e.to_string()))?;

        Ok(screenshot)
    }

    async fn close(self) -> Result<()> {
        drop(self.browser);
        Ok(())
    }
}
