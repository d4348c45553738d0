use thiserror::Error;

#[derive(Error, Debug)]
pub enum FloodscopeError {
    #[error("Browser launch failed: {0}")]
    LaunchFailed(String),

    #[error("Browser not launched")]
    BrowserNotLaunched,

    #[error("Tab creation failed: {0}")]
    TabCreationFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("JavaScript execution failed: {0}")]
    JavaScriptFailed(String),

    #[error("Timeout: {0}")]
    TimeoutError(String),

    #[error("Screenshot failed: {0}")]
    ScreenshotFailed(String),

    #[error("Chrome error: {0}")]
    ChromeError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Summarizer error: {0}")]
    SummarizerError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FloodscopeError>;
