//! Job sources — anything that can search for and fetch raw postings.
//!
//! Browser-driven scrapers live outside this crate; they plug in by
//! implementing `JobSource`. `FileJobSource` replays postings from disk.

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::RawJobPosting;

pub mod file;

pub use file::FileJobSource;

/// Placeholders a scraper writes when the detail page hides a field.
pub const UNKNOWN_COMPANY: &str = "Unknown Company";
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

#[async_trait]
pub trait JobSource: Send + Sync {
    /// Site tag carried on every posting this source produces.
    fn name(&self) -> &str;

    /// Up to `limit` postings matching `query` in `location`.
    async fn search(
        &self,
        query: &str,
        location: &str,
        limit: usize,
    ) -> Result<Vec<RawJobPosting>, AppError>;

    /// Full posting for `url`, or `None` when it cannot be retrieved.
    async fn fetch_posting(&self, url: &str) -> Result<Option<RawJobPosting>, AppError>;
}
