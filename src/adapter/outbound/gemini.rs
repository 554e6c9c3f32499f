//! Gemini image generation client.
//!
//! Implements [`ImageGenerator`] against the `generateContent` REST endpoint.
//! The API key travels in the `x-goog-api-key` header and is never logged.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::Credential;
use crate::error::{CredentialError, Error, Result, TransformError, EXCERPT_LEN};
use crate::infrastructure::config::gemini::GeminiConfig;
use crate::port::outbound::generator::{GenerateRequest, GeneratedImage, ImageGenerator};

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Prompt used by the connection test.
const TEST_PROMPT: &str = "Test connection";

/// Error markers Gemini uses for a bad key (it answers 400, not 401).
const KEY_REJECTION_MARKERS: [&str; 2] = ["API_KEY_INVALID", "API key not valid"];

/// Gemini REST client.
#[derive(Debug, Clone)]
pub struct Gemini {
    client: Client,
    config: GeminiConfig,
}

impl Gemini {
    #[must_use]
    pub fn new(config: GeminiConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Use a preconfigured HTTP client (proxies, custom TLS).
    #[must_use]
    pub fn with_client(client: Client, config: GeminiConfig) -> Self {
        Self { client, config }
    }

    #[must_use]
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{model}:generateContent",
            self.config.base_url.trim_end_matches('/')
        )
    }

    async fn post(&self, model: &str, credential: &Credential, body: &Request<'_>) -> Result<Response> {
        let response = self
            .client
            .post(self.endpoint(model))
            .header(API_KEY_HEADER, credential.expose())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &text));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            TransformError::remote(format!("invalid response format from Gemini API: {e}")).into()
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Request<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum RequestPart<'a> {
    InlineData {
        #[serde(rename = "mimeType")]
        mime_type: &'a str,
        data: String,
    },
    Text(&'a str),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: [&'static str; 2],
    temperature: f64,
    top_p: f64,
    top_k: u32,
    max_output_tokens: u32,
}

#[derive(Deserialize, Default)]
struct Response {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    inline_data: Option<InlineData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: Option<String>,
    data: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl Response {
    /// The first inline image of the first candidate.
    fn into_image(self) -> Option<InlineData> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .find_map(|part| part.inline_data)
    }
}

/// Map an HTTP failure to a credential or transform error.
fn classify_failure(status: StatusCode, body: &str) -> Error {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string());

    let rejected = matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        || KEY_REJECTION_MARKERS.iter().any(|m| body.contains(m));

    if rejected {
        let reason = if message.is_empty() {
            status.to_string()
        } else {
            crate::error::excerpt(&message, EXCERPT_LEN)
        };
        return CredentialError::Rejected(reason).into();
    }
    TransformError::remote(format!("{status}: {message}")).into()
}

#[async_trait]
impl ImageGenerator for Gemini {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, request: GenerateRequest<'_>) -> Result<Option<GeneratedImage>> {
        let body = Request {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    RequestPart::InlineData {
                        mime_type: request.mime_type,
                        data: STANDARD.encode(request.image),
                    },
                    RequestPart::Text(request.prompt),
                ],
            }],
            generation_config: Some(GenerationConfig {
                response_modalities: ["Text", "Image"],
                temperature: self.config.temperature,
                top_p: self.config.top_p,
                top_k: self.config.top_k,
                max_output_tokens: self.config.max_output_tokens,
            }),
        };

        debug!(model = %self.config.model, bytes = request.image.len(), "calling generateContent");
        let response = self.post(&self.config.model, request.credential, &body).await?;

        let Some(inline) = response.into_image() else {
            debug!("response contained no image part");
            return Ok(None);
        };
        let data = STANDARD
            .decode(inline.data.as_bytes())
            .map_err(|e| TransformError::Decode(e.to_string()))?;
        Ok(Some(GeneratedImage {
            mime_type: inline.mime_type,
            data,
        }))
    }

    async fn test_connection(&self, credential: &Credential) -> Result<()> {
        let body = Request {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart::Text(TEST_PROMPT)],
            }],
            generation_config: None,
        };
        debug!(model = %self.config.test_model, "testing API key");
        self.post(&self.config.test_model, credential, &body).await?;
        Ok(())
    }
}
