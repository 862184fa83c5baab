/// Trailer resolution
///
/// Pulls an 11-character YouTube video id out of free text, URLs or grounding
/// citations, and builds the embeddable player URL for it. Everything here is
/// pure string work; no network calls.
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::ResolvedTrailer;

/// Watch pages (`?v=` / `&v=`), short links, embed paths, shorts and live broadcasts
static VIDEO_ID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:youtube\.com/(?:[^/\s]+/\S+/|(?:v|e(?:mbed)?)/|shorts/|live/|\S*?[?&]v=)|youtu\.be/)([a-z0-9_-]{11})",
    )
    .expect("Failed to compile YouTube video id regex")
});

/// URL fragments a citation must contain to count as trailer evidence
const CITATION_SHAPES: [&str; 3] = ["youtube.com/watch", "youtu.be/", "youtube.com/live/"];

const EMBED_BASE_URL: &str = "https://www.youtube.com/embed";
const EMBED_PARAMS: &str = "autoplay=1&rel=0&modestbranding=1&enablejsapi=1";

/// A web source returned alongside a grounded answer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Citation {
    pub uri: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl Citation {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            title: None,
        }
    }
}

/// Returns the first video id referenced anywhere in `text`
pub fn extract_video_id(text: Option<&str>) -> Option<String> {
    let text = text?;
    VIDEO_ID_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_owned())
}

/// Embeddable player URL with autoplay on, related videos off and minimal branding
pub fn to_embed_url(video_id: &str) -> String {
    format!("{}/{}?{}", EMBED_BASE_URL, video_id, EMBED_PARAMS)
}

/// Canonical watch-page URL for a video id
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

fn is_trailer_shape(uri: &str) -> bool {
    let lowered = uri.to_ascii_lowercase();
    CITATION_SHAPES.iter().any(|shape| lowered.contains(shape))
}

/// First citation pointing at a watch, short-link or live URL
pub fn trailer_citation(citations: &[Citation]) -> Option<&Citation> {
    citations.iter().find(|c| is_trailer_shape(&c.uri))
}

/// Video id of the first citation with a recognized trailer URL
pub fn resolve_from_citations(citations: &[Citation]) -> Option<String> {
    citations
        .iter()
        .filter(|c| is_trailer_shape(&c.uri))
        .find_map(|c| extract_video_id(Some(&c.uri)))
}

/// Picks the id from citations first, then from the answer text
pub fn resolve_grounded(citations: &[Citation], text: &str) -> Option<String> {
    resolve_from_citations(citations).or_else(|| extract_video_id(Some(text)))
}

/// Builds a trailer from the first candidate URL that yields a video id
pub fn resolve_first<'a, I>(candidates: I) -> Option<ResolvedTrailer>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .find_map(extract_video_id)
        .map(|video_id| ResolvedTrailer {
            embed_url: to_embed_url(&video_id),
            video_id,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "dQw4w9WgXcQ";

    #[test]
    fn test_extract_watch_url() {
        let text = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
        assert_eq!(extract_video_id(Some(text)), Some(ID.to_string()));
    }

    #[test]
    fn test_extract_watch_url_with_leading_params() {
        let text = "see https://youtube.com/watch?feature=share&v=dQw4w9WgXcQ&t=10";
        assert_eq!(extract_video_id(Some(text)), Some(ID.to_string()));
    }

    #[test]
    fn test_extract_short_link() {
        assert_eq!(
            extract_video_id(Some("https://youtu.be/dQw4w9WgXcQ?si=abc")),
            Some(ID.to_string())
        );
    }

    #[test]
    fn test_extract_embed_url() {
        assert_eq!(
            extract_video_id(Some("https://www.youtube.com/embed/dQw4w9WgXcQ")),
            Some(ID.to_string())
        );
    }

    #[test]
    fn test_extract_live_url() {
        assert_eq!(
            extract_video_id(Some("https://www.youtube.com/live/dQw4w9WgXcQ?feature=share")),
            Some(ID.to_string())
        );
    }

    #[test]
    fn test_extract_is_case_insensitive_on_host_and_scheme() {
        assert_eq!(
            extract_video_id(Some("HTTPS://WWW.YOUTUBE.COM/watch?v=dQw4w9WgXcQ")),
            Some(ID.to_string())
        );
        assert_eq!(
            extract_video_id(Some("Https://YouTu.Be/dQw4w9WgXcQ")),
            Some(ID.to_string())
        );
    }

    #[test]
    fn test_extract_keeps_id_case() {
        let id = extract_video_id(Some("youtu.be/AbCdEfGhIjK")).unwrap();
        assert_eq!(id, "AbCdEfGhIjK");
        assert_eq!(id.len(), 11);
    }

    #[test]
    fn test_extract_from_prose_returns_first() {
        let text = "Trailer: https://youtu.be/dQw4w9WgXcQ and teaser https://youtu.be/aaaaaaaaaaa";
        assert_eq!(extract_video_id(Some(text)), Some(ID.to_string()));
    }

    #[test]
    fn test_extract_absent_inputs() {
        assert_eq!(extract_video_id(None), None);
        assert_eq!(extract_video_id(Some("no url here")), None);
        assert_eq!(extract_video_id(Some("https://vimeo.com/123456789")), None);
        assert_eq!(extract_video_id(Some("https://youtu.be/short")), None);
    }

    #[test]
    fn test_embed_url_is_deterministic() {
        let first = to_embed_url(ID);
        assert_eq!(first, to_embed_url(ID));
        assert_eq!(
            first,
            "https://www.youtube.com/embed/dQw4w9WgXcQ?autoplay=1&rel=0&modestbranding=1&enablejsapi=1"
        );
    }

    #[test]
    fn test_resolve_from_short_link_citation() {
        let citations = vec![Citation::new("https://youtu.be/dQw4w9WgXcQ")];
        assert_eq!(resolve_from_citations(&citations), Some(ID.to_string()));
    }

    #[test]
    fn test_resolve_from_citations_skips_unrelated_sources() {
        let citations = vec![
            Citation::new("https://www.imdb.com/title/tt15398776/"),
            Citation::new("https://www.youtube.com/embed/aaaaaaaaaaa"),
            Citation::new("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
        ];
        // embed paths are not accepted as citation evidence
        assert_eq!(resolve_from_citations(&citations), Some(ID.to_string()));
        assert_eq!(
            trailer_citation(&citations).map(|c| c.uri.as_str()),
            Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_resolve_from_empty_citations() {
        assert_eq!(resolve_from_citations(&[]), None);
        assert!(trailer_citation(&[]).is_none());
    }

    #[test]
    fn test_resolve_grounded_prefers_citations() {
        let citations = vec![Citation::new("https://youtube.com/live/dQw4w9WgXcQ")];
        let text = "Watch it at https://youtu.be/bbbbbbbbbbb";
        assert_eq!(resolve_grounded(&citations, text), Some(ID.to_string()));
        assert_eq!(
            resolve_grounded(&[], text),
            Some("bbbbbbbbbbb".to_string())
        );
    }

    #[test]
    fn test_resolve_first_skips_unresolvable_candidates() {
        let trailer = resolve_first([
            None,
            Some("https://example.com/trailer.mp4"),
            Some("https://youtu.be/dQw4w9WgXcQ"),
        ])
        .unwrap();
        assert_eq!(trailer.video_id, ID);
        assert_eq!(trailer.embed_url, to_embed_url(ID));
        assert!(resolve_first([None, Some("nothing")]).is_none());
    }

    #[test]
    fn test_watch_url_round_trips_through_extract() {
        assert_eq!(extract_video_id(Some(&watch_url(ID))), Some(ID.to_string()));
    }
}
