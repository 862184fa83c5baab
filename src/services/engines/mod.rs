/// Generative analysis engines
///
/// Two backends produce the same single-title analysis: Gemini (primary, with
/// enforced JSON schemas and search grounding) and Poe (fallback, plain chat
/// completions whose JSON we have to parse ourselves). Each implementation owns
/// its own request construction and response parsing; choosing between them is
/// the orchestrator's job.
use crate::{
    error::AppResult,
    models::{AnalysisNarrative, ComparisonResult, SourceEngine, TrendResult},
};

pub mod gemini;
pub mod poe;
pub mod prompts;

pub use gemini::GeminiEngine;
pub use poe::PoeEngine;

/// What the engines are told about a title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleContext {
    pub title: String,
    pub year: i32,
    pub description: String,
}

impl TitleContext {
    pub fn new(title: impl Into<String>, year: i32, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            year,
            description: description.into(),
        }
    }
}

/// Narrative produced by one engine, plus any trailer link it found along the way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineAnalysis {
    pub narrative: AnalysisNarrative,
    pub trailer_url: Option<String>,
}

/// Capability shared by both engines
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait AnalysisEngine: Send + Sync {
    /// Four-part analysis of a single title.
    ///
    /// The primary engine returns `EngineUnavailable` on any failure; the
    /// fallback engine degrades to placeholder text instead.
    async fn analyze_title(&self, title: &TitleContext) -> AppResult<EngineAnalysis>;

    /// Open-ended single-turn question about film or TV
    async fn chat(&self, message: &str) -> AppResult<String>;

    /// Provenance tag attached to results from this engine
    fn source(&self) -> SourceEngine;

    /// Engine name for logging
    fn name(&self) -> &'static str;
}

/// Operations only the primary engine offers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait EditorialEngine: Send + Sync {
    /// Searches the web for the official trailer and returns its watch URL
    async fn find_trailer_url(&self, title: &str, year: i32) -> AppResult<Option<String>>;

    /// Neutral comparison; never declares a winner
    async fn compare(&self, first: &str, second: &str) -> AppResult<ComparisonResult>;

    async fn explain_trend(&self, topic: &str) -> AppResult<TrendResult>;
}

/// Strips a surrounding Markdown code fence (```json ... ```) if present
pub(crate) fn strip_code_fence(content: &str) -> &str {
    let content = content.trim();
    content
        .strip_prefix("```json")
        .or_else(|| content.strip_prefix("```JSON"))
        .or_else(|| content.strip_prefix("```"))
        .and_then(|s| s.trim_end().strip_suffix("```"))
        .unwrap_or(content)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{}\n```  "), "{}");
        assert_eq!(strip_code_fence("  {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn test_unterminated_fence_is_left_alone() {
        assert_eq!(strip_code_fence("```json\n{"), "```json\n{");
    }
}
