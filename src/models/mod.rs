use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};

pub mod analysis;

pub use analysis::{
    AnalysisNarrative, AnalysisReport, AnalysisResult, ChatReply, ComparisonOutcome,
    ComparisonResult, ResolvedTrailer, SourceEngine, TrendResult, UNAVAILABLE_PLACEHOLDER,
};

/// Shown when the metadata source has no poster for a title
pub const POSTER_PLACEHOLDER_URL: &str = "https://picsum.photos/300/450";

/// Movie or TV show, as reported by the metadata source
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TitleKind {
    Movie,
    Show,
}

impl TitleKind {
    /// Anything the source does not call a movie is treated as a show
    pub fn from_source(raw: Option<&str>) -> Self {
        match raw {
            Some(kind) if kind.eq_ignore_ascii_case("movie") => TitleKind::Movie,
            _ => TitleKind::Show,
        }
    }
}

/// Identifiers of the same title in other catalogs
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExternalIds {
    pub imdb: Option<String>,
    pub tmdb: Option<String>,
}

/// Search-result-level record for a movie or TV show
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TitleSummary {
    pub id: String,
    pub external_ids: ExternalIds,
    pub title: String,
    pub year: i32,
    pub kind: TitleKind,
    pub poster_url: String,
    pub popularity_score: Option<f64>,
}

/// Scores per rating source. A source that did not report leaves its field empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ratings {
    pub imdb: Option<String>,
    pub critics_aggregate: Option<String>,
    pub metacritic_aggregate: Option<String>,
    pub audience_aggregate: Option<String>,
}

impl Ratings {
    /// Picks the first entry per known source; unknown sources are ignored.
    pub fn from_entries(entries: &[MdblistRating]) -> Self {
        let first = |source: &str| {
            entries
                .iter()
                .find(|r| r.source.eq_ignore_ascii_case(source))
                .and_then(|r| r.value.clone())
        };

        Ratings {
            imdb: first("imdb"),
            critics_aggregate: first("tomatoes"),
            metacritic_aggregate: first("metacritic"),
            audience_aggregate: first("popcorn"),
        }
    }
}

/// Full record for the detail view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TitleDetail {
    #[serde(flatten)]
    pub summary: TitleSummary,
    pub description: String,
    pub genres: Vec<String>,
    pub runtime_minutes: i32,
    pub certification: String,
    pub ratings: Ratings,
    pub cast: Vec<String>,
    /// The catalog's own trailer pointer, used only when the engines find nothing
    pub catalog_trailer_url: Option<String>,
}

// ============================================================================
// MDBList API Types
// ============================================================================

/// Raw search response. A missing `search` key means zero results.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MdblistSearchResponse {
    #[serde(default)]
    pub search: Vec<serde_json::Value>,
}

/// Raw search hit or detail payload from MDBList.
///
/// Every field tolerates the wrong JSON type: a malformed scalar reads as
/// absent, and malformed list entries are dropped one by one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MdblistTitle {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub imdbid: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub tmdbid: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub year: Option<i32>,
    #[serde(default, rename = "type", deserialize_with = "lenient")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub poster: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub genres: Option<Vec<MdblistGenre>>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub runtime: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub certification: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub ratings: Option<Vec<MdblistRating>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub cast: Option<Vec<MdblistCastMember>>,
    #[serde(default, deserialize_with = "lenient")]
    pub trailer: Option<String>,
}

/// One `{source, value}` rating pair
#[derive(Debug, Clone, Deserialize)]
pub struct MdblistRating {
    pub source: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub value: Option<String>,
}

/// Genres arrive either as bare strings or as `{title}` objects
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MdblistGenre {
    Name(String),
    Object { title: String },
}

/// Cast entries arrive either as bare names or as `{name}` objects
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MdblistCastMember {
    Name(String),
    Object { name: String },
}

impl MdblistTitle {
    /// Converts a hit into a summary; hits without an id are unusable
    pub fn into_summary(self) -> Option<TitleSummary> {
        self.split().map(|(summary, _)| summary)
    }

    /// Converts a detail payload; `None` means the source did not find the title
    pub fn into_detail(self) -> Option<TitleDetail> {
        let (summary, rest) = self.split()?;

        let genres = rest
            .genres
            .unwrap_or_default()
            .into_iter()
            .map(|g| match g {
                MdblistGenre::Name(name) | MdblistGenre::Object { title: name } => name,
            })
            .collect();

        let cast = rest
            .cast
            .unwrap_or_default()
            .into_iter()
            .map(|c| match c {
                MdblistCastMember::Name(name) | MdblistCastMember::Object { name } => name,
            })
            .collect();

        Some(TitleDetail {
            summary,
            description: rest.description.unwrap_or_default(),
            genres,
            runtime_minutes: rest.runtime.unwrap_or_default(),
            certification: rest.certification.unwrap_or_default(),
            ratings: Ratings::from_entries(rest.ratings.as_deref().unwrap_or_default()),
            cast,
            catalog_trailer_url: rest.trailer.filter(|t| !t.trim().is_empty()),
        })
    }

    fn split(self) -> Option<(TitleSummary, MdblistTitle)> {
        let id = self.id.clone().filter(|id| !id.is_empty())?;

        let summary = TitleSummary {
            id,
            external_ids: ExternalIds {
                imdb: self.imdbid.clone(),
                tmdb: self.tmdbid.clone(),
            },
            title: self.title.clone().unwrap_or_default(),
            year: self.year.unwrap_or_default(),
            kind: TitleKind::from_source(self.kind.as_deref()),
            poster_url: self
                .poster
                .clone()
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| POSTER_PLACEHOLDER_URL.to_string()),
            popularity_score: self.score,
        };

        Some((summary, self))
    }
}

/// Accepts a JSON string or number (MDBList is inconsistent about which it sends)
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Reads the value as `T`, or `None` if it has some other shape
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Keeps the array entries that read as `T`; a non-array is `None`
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        _ => None,
    })
}

/// Integer given as a JSON number or a numeric string
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(|n| i32::try_from(n).ok()),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
