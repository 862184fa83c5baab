/// Poe chat-completions engine (fallback)
///
/// Poe exposes an OpenAI-compatible `/v1/chat/completions` endpoint with no
/// enforced output schema, so the model is asked for a JSON object and we parse
/// the message content ourselves. This is the last engine in every chain: it
/// degrades to placeholder text or a fixed apology instead of returning errors.
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::{lenient, AnalysisNarrative, SourceEngine, UNAVAILABLE_PLACEHOLDER},
    services::engines::{prompts, strip_code_fence, AnalysisEngine, EngineAnalysis, TitleContext},
};

/// Returned by `chat` when the backend cannot be reached
pub const CONNECTION_APOLOGY: &str =
    "I'm having trouble connecting to my scholarly database. Please try again in a moment.";

/// Returned by `chat` when the backend answers with nothing
pub const EMPTY_REPLY_APOLOGY: &str =
    "I'm sorry, I couldn't generate an analysis at this moment.";

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

impl ChatMessage {
    fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: content.to_string(),
        }
    }

    fn user(content: String) -> Self {
        Self {
            role: "user".to_string(),
            content,
        }
    }
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Option<Vec<Choice>>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

/// The JSON object the model is asked to produce. Nothing on the backend
/// enforces the shape, so a field that is missing or not a string is read as
/// absent without affecting the others.
#[derive(Debug, Default, Deserialize)]
struct AnalysisPayload {
    #[serde(default, deserialize_with = "lenient")]
    resonance: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    divisiveness: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    misunderstandings: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    legacy: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    trailer_url: Option<String>,
}

impl AnalysisPayload {
    fn into_analysis(self) -> EngineAnalysis {
        let field = |value: Option<String>| {
            value
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| UNAVAILABLE_PLACEHOLDER.to_string())
        };

        EngineAnalysis {
            narrative: AnalysisNarrative {
                resonance: field(self.resonance),
                divisiveness: field(self.divisiveness),
                misunderstandings: field(self.misunderstandings),
                legacy: field(self.legacy),
            },
            trailer_url: self.trailer_url.filter(|url| !url.trim().is_empty()),
        }
    }
}

/// Parses the model's message content, or `None` if it is not a JSON object
fn parse_analysis(content: &str) -> Option<EngineAnalysis> {
    serde_json::from_str::<AnalysisPayload>(strip_code_fence(content))
        .ok()
        .map(AnalysisPayload::into_analysis)
}

fn placeholder_analysis() -> EngineAnalysis {
    EngineAnalysis {
        narrative: AnalysisNarrative::unavailable(),
        trailer_url: None,
    }
}

#[derive(Clone)]
pub struct PoeEngine {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

impl PoeEngine {
    pub fn new(http_client: HttpClient, api_key: String, api_url: String, model: String) -> Self {
        Self {
            http_client,
            api_key,
            api_url,
            model,
        }
    }

    /// Sends a chat completion and returns the first choice's text content
    async fn complete(&self, request: &ChatRequest) -> AppResult<Option<String>> {
        let url = format!("{}/v1/chat/completions", self.api_url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Poe API returned status {}: {}",
                status, body
            )));
        }

        let data: ChatResponse = response.json().await?;
        Ok(data
            .choices
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.message)
            .and_then(|m| m.content))
    }
}

#[async_trait::async_trait]
impl AnalysisEngine for PoeEngine {
    async fn analyze_title(&self, title: &TitleContext) -> AppResult<EngineAnalysis> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(prompts::FALLBACK_ANALYSIS_SYSTEM_PROMPT),
                ChatMessage::user(prompts::fallback_analyze_title(title)),
            ],
            response_format: Some(ResponseFormat {
                format_type: "json_object".to_string(),
            }),
        };

        let content = match self.complete(&request).await {
            Ok(Some(content)) => content,
            Ok(None) => {
                tracing::warn!(title = %title.title, engine = "poe", "Analysis response had no content");
                return Ok(placeholder_analysis());
            }
            Err(e) => {
                tracing::error!(error = %e, title = %title.title, engine = "poe", "Analysis request failed");
                return Ok(placeholder_analysis());
            }
        };

        match parse_analysis(&content) {
            Some(analysis) => {
                tracing::info!(
                    title = %title.title,
                    engine = "poe",
                    trailer_found = analysis.trailer_url.is_some(),
                    "Title analysis completed"
                );
                Ok(analysis)
            }
            None => {
                tracing::warn!(
                    title = %title.title,
                    engine = "poe",
                    content_length = content.len(),
                    "Analysis response was not valid JSON"
                );
                Ok(placeholder_analysis())
            }
        }
    }

    async fn chat(&self, message: &str) -> AppResult<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(prompts::FALLBACK_CHAT_SYSTEM_PROMPT),
                ChatMessage::user(message.to_string()),
            ],
            response_format: None,
        };

        match self.complete(&request).await {
            Ok(Some(content)) if !content.trim().is_empty() => Ok(content),
            Ok(_) => Ok(EMPTY_REPLY_APOLOGY.to_string()),
            Err(e) => {
                tracing::error!(error = %e, engine = "poe", "Chat request failed");
                Ok(CONNECTION_APOLOGY.to_string())
            }
        }
    }

    fn source(&self) -> SourceEngine {
        SourceEngine::Fallback
    }

    fn name(&self) -> &'static str {
        "poe"
    }
}
