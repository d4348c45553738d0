use crate::browser::screenshot;
use crate::core::SummarizerConfig;
use crate::errors::{FloodscopeError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Instruction sent with every map image. The report has to stand on its
/// own, since readers get the text without the screenshot.
pub const REPORT_INSTRUCTION: &str = "Please generate a comprehensive, self-contained flood \
risk report for the property shown in the map image. Your summary should include: a clear \
statement on whether the property lies within any identified flood zones; specific details on \
which areas of the property (e.g., front boundary, driveway, central lot, backyard) are \
affected; the types of flood hazards or scenarios depicted (e.g., existing climate hazard, \
100-year future flood, local flood hazard layer); any notable severity or depth indications \
visible on the map; and a concise conclusion that allows a reader to fully understand the \
property's flood exposure without viewing the map.";

/// Where the summarizer should read the image from.
pub enum ImageSource {
    /// Fetchable URL, normally a presigned one.
    Url(String),
    /// Raw PNG bytes, inlined as a data URL when no storage is available.
    Png(Vec<u8>),
}

impl ImageSource {
    fn into_url(self) -> String {
        match self {
            ImageSource::Url(url) => url,
            ImageSource::Png(bytes) => screenshot::to_data_url(&bytes),
        }
    }
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Produce the free-text flood-risk report for one map image. The text
    /// is displayed verbatim, never parsed.
    async fn summarize(&self, image: ImageSource) -> Result<String>;
}

/// Chat-completions client for any OpenAI-compatible vision endpoint.
pub struct OpenAiVision {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: Vec<ContentPart>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    ImageUrl { image_url: ImageUrlPart },
    Text { text: String },
}

#[derive(Serialize)]
struct ImageUrlPart {
    url: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiVision {
    pub fn new(api_base: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Construct from `OPENAI_API_KEY` and the configured base/model.
    pub fn from_env(config: &SummarizerConfig) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            FloodscopeError::ConfigurationError("OPENAI_API_KEY is not set".to_string())
        })?;
        Ok(Self::new(config.api_base.clone(), api_key, config.model.clone()))
    }
}

#[async_trait]
impl Summarizer for OpenAiVision {
    async fn summarize(&self, image: ImageSource) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user",
                content: vec![
                    ContentPart::ImageUrl {
                        image_url: ImageUrlPart {
                            url: image.into_url(),
                        },
                    },
                    ContentPart::Text {
                        text: REPORT_INSTRUCTION.to_string(),
                    },
                ],
            }],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FloodscopeError::SummarizerError(format!(
                "request rejected with {}: {}",
                status,
                body.trim()
            )));
        }

        let parsed: ChatResponse = response.json().await?;
        debug!(choices = parsed.choices.len(), "summary response received");

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                FloodscopeError::SummarizerError("response carried no report text".to_string())
            })
    }
}
