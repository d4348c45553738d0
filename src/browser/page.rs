use crate::core::{BrowserConfig, BrowserTrait, PageOps};
use crate::errors::{FloodscopeError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::{Duration, Instant};

/// One exclusively-owned browser page, driven through injected JavaScript.
/// Owns the browser process for its lifetime; `close` releases it.
pub struct MapPage<B: BrowserTrait> {
    browser: B,
    tab: B::TabHandle,
}

impl<B: BrowserTrait> MapPage<B> {
    pub async fn launch(mut browser: B, config: &BrowserConfig) -> Result<Self> {
        browser.launch(config).await?;
        let tab = browser.new_tab().await?;
        Ok(Self { browser, tab })
    }

    async fn eval(&self, script: &str) -> Result<Value> {
        self.browser.execute_script(&self.tab, script).await
    }

    /// Quote a string as a JavaScript literal, selector text included.
    fn js_string(text: &str) -> Result<String> {
        Ok(serde_json::to_string(text)?)
    }
}

#[async_trait]
impl<B: BrowserTrait> PageOps for MapPage<B> {
    async fn goto(&self, url: &str) -> Result<()> {
        self.browser.navigate(&self.tab, url).await
    }

    async fn wait_for(&self, selector: &str, timeout_ms: u64) -> Result<()> {
        let start = Instant::now();
        let timeout = Duration::from_millis(timeout_ms);
        let mut backoff = Duration::from_millis(50);

        loop {
            // Script errors while the page is still loading count as "not
            // yet"; only the deadline fails the wait.
            match self.count(selector).await {
                Ok(n) if n > 0 => return Ok(()),
                Ok(_) | Err(_) => {}
            }

            if start.elapsed() >= timeout {
                return Err(FloodscopeError::TimeoutError(format!(
                    "no element matched '{}' within {}ms",
                    selector, timeout_ms
                )));
            }

            tokio::time::sleep(backoff).await;
            backoff = (backoff * 2).min(Duration::from_millis(500));
        }
    }

    async fn click(&self, selector: &str) -> Result<()> {
        let script = format!(
            r#"
            (function() {{
                const element = document.querySelector({sel});
                if (!element) return false;

                element.scrollIntoView({{ block: 'center' }});
                element.focus();

                const rect = element.getBoundingClientRect();
                const cx = rect.left + rect.width / 2;
                const cy = rect.top + rect.height / 2;
                for (const type of ['mousedown', 'mouseup', 'click']) {{
                    element.dispatchEvent(new MouseEvent(type, {{
                        bubbles: true,
                        cancelable: true,
                        clientX: cx,
                        clientY: cy
                    }}));
                }}
                return true;
            }})()
            "#,
            sel = Self::js_string(selector)?
        );

        match self.eval(&script).await?.as_bool() {
            Some(true) => Ok(()),
            _ => Err(FloodscopeError::ElementNotFound(selector.to_string())),
        }
    }

    async fn click_nth(&self, selector: &str, index: usize) -> Result<()> {
        let script = format!(
            r#"
            (function() {{
                const element = document.querySelectorAll({sel})[{index}];
                if (!element) return false;

                element.scrollIntoView({{ block: 'center' }});
                const rect = element.getBoundingClientRect();
                const cx = rect.left + rect.width / 2;
                const cy = rect.top + rect.height / 2;
                for (const type of ['mousedown', 'mouseup', 'click']) {{
                    element.dispatchEvent(new MouseEvent(type, {{
                        bubbles: true,
                        cancelable: true,
                        clientX: cx,
                        clientY: cy
                    }}));
                }}
                return true;
            }})()
            "#,
            sel = Self::js_string(selector)?,
            index = index
        );

        match self.eval(&script).await?.as_bool() {
            Some(true) => Ok(()),
            _ => Err(FloodscopeError::ElementNotFound(format!(
                "{} (index {})",
                selector, index
            ))),
        }
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<()> {
        let script = format!(
            r#"
            (function() {{
                const element = document.querySelector({sel});
                if (!element) return false;

                element.focus();
                element.value = {val};
                element.dispatchEvent(new InputEvent('input', {{
                    bubbles: true,
                    cancelable: true,
                    inputType: 'insertText',
                    data: {val}
                }}));
                element.dispatchEvent(new Event('change', {{ bubbles: true, cancelable: true }}));
                return true;
            }})()
            "#,
            sel = Self::js_string(selector)?,
            val = Self::js_string(value)?
        );

        match self.eval(&script).await?.as_bool() {
            Some(true) => Ok(()),
            _ => Err(FloodscopeError::ElementNotFound(selector.to_string())),
        }
    }

    async fn value(&self, selector: &str) -> Result<String> {
        let script = format!(
            r#"
            (function() {{
                const element = document.querySelector({sel});
                return element ? String(element.value || '') : null;
            }})()
            "#,
            sel = Self::js_string(selector)?
        );

        match self.eval(&script).await? {
            Value::String(value) => Ok(value),
            _ => Err(FloodscopeError::ElementNotFound(selector.to_string())),
        }
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        let script = format!(
            "document.querySelectorAll({sel}).length",
            sel = Self::js_string(selector)?
        );

        let result = self.eval(&script).await?;
        result
            .as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| FloodscopeError::JavaScriptFailed(format!(
                "expected a count for '{}', got {}",
                selector, result
            )))
    }

    async fn press_enter(&self) -> Result<()> {
        self.browser.press_key(&self.tab, "Enter").await
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        self.browser.take_screenshot(&self.tab).await
    }

    async fn close(self) -> Result<()> {
        self.browser.close().await
    }
}
