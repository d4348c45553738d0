pub mod browser;
pub mod config;
pub mod page;

pub use browser::BrowserTrait;
pub use config::{BrowserConfig, Config, MapConfig, StorageConfig, SummarizerConfig, Viewport};
pub use page::PageOps;
