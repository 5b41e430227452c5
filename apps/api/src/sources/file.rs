#![allow(dead_code)]
use std::path::Path;

use async_trait::async_trait;
use tracing::info;

use crate::errors::AppError;
use crate::models::RawJobPosting;
use crate::sources::JobSource;

/// Serves postings from a JSON array, e.g. a scraper dump.
#[derive(Debug, Clone, Default)]
pub struct FileJobSource {
    postings: Vec<RawJobPosting>,
}

impl FileJobSource {
    pub fn new(postings: Vec<RawJobPosting>) -> Self {
        Self { postings }
    }

    pub async fn load(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            return Err(AppError::NotFound(format!(
                "Postings file not found: {}",
                path.display()
            )));
        }
        let bytes = tokio::fs::read(path).await?;
        let postings: Vec<RawJobPosting> = serde_json::from_slice(&bytes)?;
        info!("Loaded {} postings from {}", postings.len(), path.display());
        Ok(Self::new(postings))
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}

#[async_trait]
impl JobSource for FileJobSource {
    fn name(&self) -> &str {
        "file"
    }

    /// Empty `query`/`location` match everything. `query` is checked against
    /// title and description, `location` against the location string.
    async fn search(
        &self,
        query: &str,
        location: &str,
        limit: usize,
    ) -> Result<Vec<RawJobPosting>, AppError> {
        let query = query.trim().to_lowercase();
        let location = location.trim().to_lowercase();

        Ok(self
            .postings
            .iter()
            .filter(|p| {
                query.is_empty()
                    || p.title.to_lowercase().contains(&query)
                    || p.description.to_lowercase().contains(&query)
            })
            .filter(|p| location.is_empty() || p.location.to_lowercase().contains(&location))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn fetch_posting(&self, url: &str) -> Result<Option<RawJobPosting>, AppError> {
        Ok(self.postings.iter().find(|p| p.url == url).cloned())
    }
}
