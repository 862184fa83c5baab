use serde::{Deserialize, Serialize};

use super::TitleSummary;

/// Text substituted for any narrative field an engine could not supply
pub const UNAVAILABLE_PLACEHOLDER: &str = "Analysis unavailable.";

/// Which engine produced an answer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceEngine {
    Primary,
    Fallback,
}

impl std::fmt::Display for SourceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceEngine::Primary => write!(f, "primary"),
            SourceEngine::Fallback => write!(f, "fallback"),
        }
    }
}

/// The four narrative paragraphs of a single-title analysis
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisNarrative {
    pub resonance: String,
    pub divisiveness: String,
    pub misunderstandings: String,
    pub legacy: String,
}

impl AnalysisNarrative {
    /// Every field set to the placeholder text
    pub fn unavailable() -> Self {
        Self {
            resonance: UNAVAILABLE_PLACEHOLDER.to_string(),
            divisiveness: UNAVAILABLE_PLACEHOLDER.to_string(),
            misunderstandings: UNAVAILABLE_PLACEHOLDER.to_string(),
            legacy: UNAVAILABLE_PLACEHOLDER.to_string(),
        }
    }

    /// Replaces blank fields with the placeholder, keeping the rest
    pub fn filled(self) -> Self {
        let fill = |field: String| {
            if field.trim().is_empty() {
                UNAVAILABLE_PLACEHOLDER.to_string()
            } else {
                field
            }
        };

        Self {
            resonance: fill(self.resonance),
            divisiveness: fill(self.divisiveness),
            misunderstandings: fill(self.misunderstandings),
            legacy: fill(self.legacy),
        }
    }

    pub fn is_complete(&self) -> bool {
        [
            &self.resonance,
            &self.divisiveness,
            &self.misunderstandings,
            &self.legacy,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }

    pub fn tagged(self, source_engine: SourceEngine) -> AnalysisResult {
        AnalysisResult {
            narrative: self,
            source_engine,
        }
    }
}

/// Single-title analysis, identical in shape whichever engine produced it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisResult {
    #[serde(flatten)]
    pub narrative: AnalysisNarrative,
    pub source_engine: SourceEngine,
}

/// Neutral side-by-side comparison of two titles
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComparisonResult {
    pub tone: String,
    pub storytelling: String,
    pub reception: String,
    pub context: String,
}

/// Editorial explanation of a viewing trend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrendResult {
    pub background: String,
    pub impact: String,
    #[serde(alias = "whyNow")]
    pub why_now: String,
}

/// A trailer video id and the embeddable player URL built from it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedTrailer {
    pub video_id: String,
    pub embed_url: String,
}

/// Outcome of the analyze flow for one title
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AnalysisReport {
    pub analysis: AnalysisResult,
    pub trailer: Option<ResolvedTrailer>,
}

impl AnalysisReport {
    pub fn source_engine(&self) -> SourceEngine {
        self.analysis.source_engine
    }
}

/// Two resolved titles and the comparison written about them
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ComparisonOutcome {
    pub first: TitleSummary,
    pub second: TitleSummary,
    pub comparison: ComparisonResult,
}

/// Answer to an open question, with any trailer link found in it
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChatReply {
    pub reply: String,
    /// `None` when neither engine produced an answer
    pub source_engine: Option<SourceEngine>,
    pub trailer: Option<ResolvedTrailer>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_is_complete() {
        let narrative = AnalysisNarrative::unavailable();
        assert!(narrative.is_complete());
        assert_eq!(narrative.legacy, UNAVAILABLE_PLACEHOLDER);
    }

    #[test]
    fn test_blank_field_is_incomplete() {
        let narrative = AnalysisNarrative {
            resonance: "a".to_string(),
            divisiveness: "b".to_string(),
            misunderstandings: "   ".to_string(),
            legacy: "d".to_string(),
        };
        assert!(!narrative.is_complete());
    }

    #[test]
    fn test_filled_only_replaces_blank_fields() {
        let narrative = AnalysisNarrative {
            resonance: "a".to_string(),
            divisiveness: "".to_string(),
            misunderstandings: "c".to_string(),
            legacy: "\n".to_string(),
        }
        .filled();

        assert!(narrative.is_complete());
        assert_eq!(narrative.resonance, "a");
        assert_eq!(narrative.divisiveness, UNAVAILABLE_PLACEHOLDER);
        assert_eq!(narrative.legacy, UNAVAILABLE_PLACEHOLDER);
    }

    #[test]
    fn test_analysis_result_serializes_flat() {
        let result = AnalysisNarrative::unavailable().tagged(SourceEngine::Fallback);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["resonance"], UNAVAILABLE_PLACEHOLDER);
        assert_eq!(value["source_engine"], "fallback");
    }

    #[test]
    fn test_trend_result_accepts_camel_case_why_now() {
        let trend: TrendResult =
            serde_json::from_str(r#"{"background": "b", "impact": "i", "whyNow": "w"}"#).unwrap();
        assert_eq!(trend.why_now, "w");
    }
}
