use crate::errors::Result;
use async_trait::async_trait;

/// High-level operations against one live page. The automation components are
/// generic over this trait; tests drive them against a scripted fake.
#[async_trait]
pub trait PageOps: Send + Sync {
    async fn goto(&self, url: &str) -> Result<()>;

    /// Wait until at least one element matches `selector`, bounded by
    /// `timeout_ms`. Times out with `FloodscopeError::TimeoutError`.
    async fn wait_for(&self, selector: &str, timeout_ms: u64) -> Result<()>;

    async fn click(&self, selector: &str) -> Result<()>;

    /// Click the `index`-th element matching `selector`.
    async fn click_nth(&self, selector: &str, index: usize) -> Result<()>;

    /// Replace the value of an input field, dispatching input events so the
    /// host application sees it as typing.
    async fn fill(&self, selector: &str, value: &str) -> Result<()>;

    /// Current value of an input field.
    async fn value(&self, selector: &str) -> Result<String>;

    /// Number of elements currently matching `selector`.
    async fn count(&self, selector: &str) -> Result<usize>;

    async fn press_enter(&self) -> Result<()>;

    async fn screenshot(&self) -> Result<Vec<u8>>;

    /// Consume the page and release the browser session exactly once.
    async fn close(self) -> Result<()>;
}
