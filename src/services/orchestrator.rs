/// Analysis orchestration
///
/// Every user action goes through here: search, detail lookup, single-title
/// analysis (primary engine with fallback), comparison, trend explanation and
/// chat. Single-title analysis always resolves to a displayable result; the
/// other flows surface primary engine failures to the caller, except chat which
/// ends in a fixed apology.
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{
        AnalysisNarrative, AnalysisReport, ChatReply, ComparisonOutcome, TitleDetail,
        TitleSummary, TrendResult,
    },
    services::{
        engines::{AnalysisEngine, EditorialEngine, EngineAnalysis, TitleContext},
        metadata::MetadataProvider,
        trailer,
    },
};

/// Returned when both chat engines fail
pub const TERMINAL_CHAT_APOLOGY: &str =
    "I encountered an error with both my scholarly engines. Please try again.";

/// Canned topics offered on the trends screen
pub const TREND_TOPICS: [&str; 6] = [
    "Why are slow-burn movies more popular now?",
    "Why do miniseries outperform long-running shows?",
    "Why do modern blockbusters feel longer?",
    "The rise of the anti-hero in streaming TV",
    "Why practical effects are making a comeback",
    "The 'Prestige Horror' movement",
];

pub struct AnalysisOrchestrator {
    metadata: Arc<dyn MetadataProvider>,
    primary: Arc<dyn AnalysisEngine>,
    editorial: Arc<dyn EditorialEngine>,
    fallback: Arc<dyn AnalysisEngine>,
}

impl AnalysisOrchestrator {
    /// `primary` and `editorial` are normally the same backend seen through
    /// its two traits.
    pub fn new(
        metadata: Arc<dyn MetadataProvider>,
        primary: Arc<dyn AnalysisEngine>,
        editorial: Arc<dyn EditorialEngine>,
        fallback: Arc<dyn AnalysisEngine>,
    ) -> Self {
        Self {
            metadata,
            primary,
            editorial,
            fallback,
        }
    }

    pub async fn search(&self, query: &str) -> Vec<TitleSummary> {
        let results = self.metadata.search(query).await;
        tracing::debug!(
            query = %query,
            results = results.len(),
            provider = self.metadata.name(),
            "Search finished"
        );
        results
    }

    pub async fn title_detail(&self, id: &str) -> AppResult<TitleDetail> {
        match self.metadata.get_detail(id).await {
            Some(detail) => Ok(detail),
            None => {
                tracing::info!(title_id = %id, provider = self.metadata.name(), "Title not found");
                Err(AppError::NotFound(format!("Title {} not found", id)))
            }
        }
    }

    /// Looks up a title and runs the full analysis flow on it
    pub async fn analyze_title(&self, id: &str) -> AppResult<(TitleDetail, AnalysisReport)> {
        let detail = self.title_detail(id).await?;

        let context = TitleContext::new(
            detail.summary.title.clone(),
            detail.summary.year,
            detail.description.clone(),
        );
        let report = self
            .analyze(&context, detail.catalog_trailer_url.as_deref())
            .await;

        Ok((detail, report))
    }

    /// Primary analysis and trailer search run together; if the analysis fails
    /// the fallback engine takes over. Never fails.
    pub async fn analyze(
        &self,
        title: &TitleContext,
        catalog_trailer_url: Option<&str>,
    ) -> AnalysisReport {
        let (analysis, trailer_search) = tokio::join!(
            self.primary.analyze_title(title),
            self.editorial.find_trailer_url(&title.title, title.year),
        );

        match analysis {
            Ok(analysis) => {
                let found_trailer = trailer_search.unwrap_or_else(|e| {
                    tracing::warn!(
                        error = %e,
                        title = %title.title,
                        "Trailer search failed, keeping primary analysis"
                    );
                    None
                });

                let report = AnalysisReport {
                    analysis: analysis.narrative.tagged(self.primary.source()),
                    trailer: trailer::resolve_first([
                        found_trailer.as_deref(),
                        analysis.trailer_url.as_deref(),
                        catalog_trailer_url,
                    ]),
                };

                tracing::info!(
                    title = %title.title,
                    engine = self.primary.name(),
                    trailer_found = report.trailer.is_some(),
                    "Analysis ready"
                );

                report
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    title = %title.title,
                    primary = self.primary.name(),
                    fallback = self.fallback.name(),
                    "Primary engine unavailable, falling back"
                );
                self.analyze_with_fallback(title, catalog_trailer_url).await
            }
        }
    }

    async fn analyze_with_fallback(
        &self,
        title: &TitleContext,
        catalog_trailer_url: Option<&str>,
    ) -> AnalysisReport {
        let analysis = match self.fallback.analyze_title(title).await {
            Ok(analysis) if analysis.narrative.is_complete() => analysis,
            Ok(analysis) => {
                tracing::warn!(
                    title = %title.title,
                    engine = self.fallback.name(),
                    "Fallback analysis incomplete, filling blank fields"
                );
                EngineAnalysis {
                    narrative: analysis.narrative.filled(),
                    trailer_url: analysis.trailer_url,
                }
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    title = %title.title,
                    engine = self.fallback.name(),
                    "Fallback engine produced no usable analysis"
                );
                EngineAnalysis {
                    narrative: AnalysisNarrative::unavailable(),
                    trailer_url: None,
                }
            }
        };

        let report = AnalysisReport {
            analysis: analysis.narrative.tagged(self.fallback.source()),
            trailer: trailer::resolve_first([
                analysis.trailer_url.as_deref(),
                catalog_trailer_url,
            ]),
        };

        tracing::info!(
            title = %title.title,
            engine = self.fallback.name(),
            trailer_found = report.trailer.is_some(),
            "Analysis ready"
        );

        report
    }

    /// Resolves both queries to their best search hit and compares them.
    /// Primary engine only.
    pub async fn compare(&self, first: &str, second: &str) -> AppResult<ComparisonOutcome> {
        let (first, second) = (first.trim(), second.trim());
        if first.is_empty() || second.is_empty() {
            return Err(AppError::InvalidInput(
                "Two titles are required for a comparison".to_string(),
            ));
        }

        let (first_hits, second_hits) =
            tokio::join!(self.metadata.search(first), self.metadata.search(second));

        let first = first_hits
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("No title matches \"{}\"", first)))?;
        let second = second_hits
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("No title matches \"{}\"", second)))?;

        let comparison = self
            .editorial
            .compare(&first.title, &second.title)
            .await
            .map_err(AppError::into_engine_unavailable)?;

        tracing::info!(first = %first.title, second = %second.title, "Comparison ready");

        Ok(ComparisonOutcome {
            first,
            second,
            comparison,
        })
    }

    /// Primary engine only
    pub async fn explain_trend(&self, topic: &str) -> AppResult<TrendResult> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(AppError::InvalidInput("Trend topic cannot be empty".to_string()));
        }

        self.editorial
            .explain_trend(topic)
            .await
            .map_err(AppError::into_engine_unavailable)
    }

    pub fn trend_topics(&self) -> &'static [&'static str] {
        &TREND_TOPICS
    }

    /// Primary, then fallback, then a fixed apology
    pub async fn chat(&self, message: &str) -> AppResult<ChatReply> {
        let message = message.trim();
        if message.is_empty() {
            return Err(AppError::InvalidInput("Message cannot be empty".to_string()));
        }

        let (reply, source_engine) = match self.primary.chat(message).await {
            Ok(reply) => (reply, Some(self.primary.source())),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    primary = self.primary.name(),
                    fallback = self.fallback.name(),
                    "Primary chat failed, falling back"
                );
                match self.fallback.chat(message).await {
                    Ok(reply) => (reply, Some(self.fallback.source())),
                    Err(e) => {
                        tracing::error!(error = %e, "Both chat engines failed");
                        (TERMINAL_CHAT_APOLOGY.to_string(), None)
                    }
                }
            }
        };

        let trailer = trailer::resolve_first([Some(reply.as_str())]);

        Ok(ChatReply {
            reply,
            source_engine,
            trailer,
        })
    }
}
