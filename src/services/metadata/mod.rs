use crate::models::{TitleDetail, TitleSummary};

pub mod mdblist;

pub use mdblist::MdblistProvider;

/// Title search and lookup against a metadata catalog
///
/// Neither operation returns an error: a failed search is an empty list and a
/// failed lookup is `None`, whether the cause was "not found" or a transport
/// problem. Implementations log the difference.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Search titles by free text, in the source's relevance order
    async fn search(&self, query: &str) -> Vec<TitleSummary>;

    /// Full detail record for one title id
    async fn get_detail(&self, id: &str) -> Option<TitleDetail>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
