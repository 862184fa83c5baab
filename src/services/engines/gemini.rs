/// Gemini `generateContent` engine (primary)
///
/// Structured operations declare a response schema so the backend validates the
/// JSON for us; trailer discovery and open questions enable Google Search
/// grounding and read the web citations that come back with the answer.
///
/// Any transport error, non-success status or payload that does not match the
/// expected shape is reported as `AppError::EngineUnavailable`.
use reqwest::Client as HttpClient;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::{
        AnalysisNarrative, ComparisonResult, SourceEngine, TrendResult, UNAVAILABLE_PLACEHOLDER,
    },
    services::{
        engines::{
            prompts, strip_code_fence, AnalysisEngine, EditorialEngine, EngineAnalysis,
            TitleContext,
        },
        trailer::{self, Citation},
    },
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    #[serde(default)]
    web: Option<Citation>,
}

/// Generated text plus the web sources it was grounded on
#[derive(Debug, Default)]
struct GroundedAnswer {
    text: String,
    citations: Vec<Citation>,
}

impl From<GenerateContentResponse> for GroundedAnswer {
    fn from(response: GenerateContentResponse) -> Self {
        let Some(candidate) = response.candidates.into_iter().next() else {
            return GroundedAnswer::default();
        };

        let text = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        let citations = candidate
            .grounding_metadata
            .map(|metadata| {
                metadata
                    .grounding_chunks
                    .into_iter()
                    .filter_map(|chunk| chunk.web)
                    .collect()
            })
            .unwrap_or_default();

        GroundedAnswer { text, citations }
    }
}

#[derive(Clone)]
pub struct GeminiEngine {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

impl GeminiEngine {
    pub fn new(http_client: HttpClient, api_key: String, api_url: String, model: String) -> Self {
        Self {
            http_client,
            api_key,
            api_url,
            model,
        }
    }

    fn user_request(prompt: String) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text: Some(prompt) }],
            }],
            system_instruction: None,
            tools: Vec::new(),
            generation_config: None,
        }
    }

    fn grounded_request(prompt: String) -> GenerateContentRequest {
        GenerateContentRequest {
            tools: vec![Tool {
                google_search: GoogleSearch {},
            }],
            ..Self::user_request(prompt)
        }
    }

    async fn generate(&self, request: &GenerateContentRequest) -> AppResult<GroundedAnswer> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_url, self.model
        );

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::EngineUnavailable(format!(
                "Gemini API returned status {}: {}",
                status, body
            )));
        }

        let payload: GenerateContentResponse = response.json().await?;
        Ok(payload.into())
    }

    /// Runs a schema-constrained request and deserializes the answer text
    async fn generate_structured<T: DeserializeOwned>(
        &self,
        prompt: String,
        schema: Value,
    ) -> AppResult<T> {
        let request = GenerateContentRequest {
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: schema,
            }),
            ..Self::user_request(prompt)
        };

        let answer = self
            .generate(&request)
            .await
            .map_err(AppError::into_engine_unavailable)?;

        serde_json::from_str(strip_code_fence(&answer.text)).map_err(|e| {
            tracing::warn!(
                error = %e,
                engine = "gemini",
                "Structured response did not match schema"
            );
            AppError::EngineUnavailable(format!("Gemini response failed validation: {}", e))
        })
    }
}

/// Appends the first trailer citation when the answer text carries no link of its own
fn with_trailer_link(text: String, citations: &[Citation]) -> String {
    let lowered = text.to_ascii_lowercase();
    if lowered.contains("youtube.com") || lowered.contains("youtu.be") {
        return text;
    }

    match trailer::trailer_citation(citations) {
        Some(citation) => format!("{}\n\nOfficial Trailer Link: {}", text, citation.uri),
        None => text,
    }
}

#[async_trait::async_trait]
impl AnalysisEngine for GeminiEngine {
    async fn analyze_title(&self, title: &TitleContext) -> AppResult<EngineAnalysis> {
        let narrative: AnalysisNarrative = self
            .generate_structured(prompts::analyze_title(title), prompts::analysis_schema())
            .await?;

        if !narrative.is_complete() {
            return Err(AppError::EngineUnavailable(
                "Gemini analysis left a narrative field empty".to_string(),
            ));
        }

        tracing::info!(title = %title.title, engine = "gemini", "Title analysis completed");

        Ok(EngineAnalysis {
            narrative,
            trailer_url: None,
        })
    }

    async fn chat(&self, message: &str) -> AppResult<String> {
        let request = GenerateContentRequest {
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part {
                    text: Some(prompts::EXPLAINER_SYSTEM_INSTRUCTION.to_string()),
                }],
            }),
            ..Self::grounded_request(message.to_string())
        };

        let answer = self
            .generate(&request)
            .await
            .map_err(AppError::into_engine_unavailable)?;

        let text = if answer.text.trim().is_empty() {
            UNAVAILABLE_PLACEHOLDER.to_string()
        } else {
            answer.text
        };

        Ok(with_trailer_link(text, &answer.citations))
    }

    fn source(&self) -> SourceEngine {
        SourceEngine::Primary
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

#[async_trait::async_trait]
impl EditorialEngine for GeminiEngine {
    async fn find_trailer_url(&self, title: &str, year: i32) -> AppResult<Option<String>> {
        let request = Self::grounded_request(prompts::find_trailer(title, year));
        let answer = self
            .generate(&request)
            .await
            .map_err(AppError::into_engine_unavailable)?;

        let video_id = trailer::resolve_grounded(&answer.citations, &answer.text);

        tracing::debug!(
            title = %title,
            citations = answer.citations.len(),
            found = video_id.is_some(),
            engine = "gemini",
            "Trailer search completed"
        );

        Ok(video_id.map(|id| trailer::watch_url(&id)))
    }

    async fn compare(&self, first: &str, second: &str) -> AppResult<ComparisonResult> {
        self.generate_structured(prompts::compare(first, second), prompts::comparison_schema())
            .await
    }

    async fn explain_trend(&self, topic: &str) -> AppResult<TrendResult> {
        self.generate_structured(prompts::explain_trend(topic), prompts::trend_schema())
            .await
    }
}
