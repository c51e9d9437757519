//! Prompt hosted vision models with an image and a text prompt.
//!
//! The endpoint speaks the OpenAI chat-completions wire format. Each prompt
//! is a single request with two messages:
//!
//! 1. **System message**: [`VisionConfig::system_prompt`]
//! 2. **User message**: the prompt text, then the image as a PNG data URL
//!    at [`VisionConfig::detail`]
//!
//! The answer is the content of the first choice. Nothing is retried; every
//! failure is returned to the caller as a [`SlideError`].

use crate::config::{ImageDetail, VisionConfig};
use crate::error::SlideError;
use crate::models::VisionModel;
use crate::pipeline::encode::load_image_data_url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub(crate) enum ChatMessage<'a> {
    System { content: &'a str },
    User { content: Vec<ContentPart<'a>> },
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
pub(crate) struct ImageUrl {
    pub url: String,
    pub detail: ImageDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Build the request body for one image prompt.
pub(crate) fn build_request<'a>(
    config: &'a VisionConfig,
    model: &VisionModel,
    prompt: &'a str,
    image_url: String,
) -> ChatRequest<'a> {
    ChatRequest {
        model: model.id(),
        messages: vec![
            ChatMessage::System {
                content: &config.system_prompt,
            },
            ChatMessage::User {
                content: vec![
                    ContentPart::Text { text: prompt },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: image_url,
                            detail: config.detail,
                        },
                    },
                ],
            },
        ],
    }
}

/// Take the first choice's content.
pub(crate) fn first_choice_content(
    response: ChatResponse,
    model: &VisionModel,
) -> Result<String, SlideError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| SlideError::EmptyResponse {
            model: model.id().to_string(),
        })
}

// ── Client ───────────────────────────────────────────────────────────────

/// Client for the hosted inference endpoint.
///
/// # Example
/// ```rust,no_run
/// use slide_vlm::{VisionClient, VisionConfig, VisionModel};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = VisionClient::from_env(VisionConfig::default())?;
/// let answer = client
///     .prompt("downloads/images/talk_slide1.png", "Describe this slide.", &VisionModel::Gpt4oMini)
///     .await?;
/// println!("{answer}");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct VisionClient {
    http: reqwest::Client,
    config: VisionConfig,
    token: String,
}

impl fmt::Debug for VisionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisionClient")
            .field("config", &self.config)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl VisionClient {
    /// Read the bearer token from `config.token_env`.
    ///
    /// Fails with [`SlideError::MissingCredential`] when the variable is
    /// unset or empty; no request is attempted.
    pub fn from_env(config: VisionConfig) -> Result<Self, SlideError> {
        let token = std::env::var(&config.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| SlideError::MissingCredential {
                var: config.token_env.clone(),
            })?;
        Ok(Self::with_token(config, token))
    }

    /// Use an explicit bearer token.
    pub fn with_token(config: VisionConfig, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            token: token.into(),
        }
    }

    pub fn config(&self) -> &VisionConfig {
        &self.config
    }

    /// Send `prompt` and the image at `image` to `model`; return its answer.
    pub async fn prompt(
        &self,
        image: impl AsRef<Path>,
        prompt: &str,
        model: &VisionModel,
    ) -> Result<String, SlideError> {
        let image = image.as_ref();
        let image_url = load_image_data_url(image).await?;
        let body = build_request(&self.config, model, prompt, image_url);
        let url = self.config.completions_url();

        info!("Prompting {} with {}", model, image.display());

        let http_err = |source: reqwest::Error| SlideError::Http {
            url: url.clone(),
            source,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(http_err)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SlideError::ApiError {
                model: model.id().to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(http_err)?;
        let answer = first_choice_content(parsed, model)?;
        debug!("{} answered with {} chars", model, answer.chars().count());
        Ok(answer)
    }
}

/// One-shot prompt with the default endpoint and the token from `GITHUB_TOKEN`.
pub async fn prompt_model(
    image: impl AsRef<Path>,
    prompt: &str,
    model: VisionModel,
) -> Result<String, SlideError> {
    VisionClient::from_env(VisionConfig::default())?
        .prompt(image, prompt, &model)
        .await
}
