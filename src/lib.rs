pub mod automation;
pub mod browser;
pub mod core;
pub mod errors;
pub mod storage;
pub mod vision;

pub use automation::{run_automation, run_with_page, SearchOutcome, StepOutcome};
pub use browser::{ChromeBrowser, MapPage};
pub use core::{BrowserTrait, Config, PageOps};
pub use errors::{FloodscopeError, Result};
pub use storage::{ObjectStore, S3Store, StoredObject, UrlSigner};
pub use vision::{ImageSource, OpenAiVision, Summarizer};
