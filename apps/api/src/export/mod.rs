// Export: joins normalized jobs back to their raw postings and writes CSV.
// No scoring logic lives here; rows carry whatever the batch pipeline computed.

pub mod csv_exporter;
pub mod summary;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{NormalizedJob, RawJobPosting, VisaSignal};
use crate::otpm::engine::{Recommendation, ScoreResult};

pub use csv_exporter::{analysis_path, export_analysis, export_jobs};
pub use summary::BatchSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostingStatus {
    Fresh,
    Repost,
}

impl PostingStatus {
    /// A posting is a repost when the source's "posted" label says so.
    pub fn detect(posting: &RawJobPosting) -> Self {
        if posting.posted_text().to_lowercase().contains("repost") {
            PostingStatus::Repost
        } else {
            PostingStatus::Fresh
        }
    }
}

impl fmt::Display for PostingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostingStatus::Fresh => f.write_str("Fresh"),
            PostingStatus::Repost => f.write_str("Repost"),
        }
    }
}

/// One exported line: raw posting metadata plus normalized attributes and score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub job_id: String,
    pub company: String,
    pub role: String,
    pub location: String,
    pub status: PostingStatus,
    pub posted_text: String,
    pub probability: Option<f64>,
    pub recommendation: Option<Recommendation>,
    pub visa_sponsorship: VisaSignal,
    pub experience_years: f64,
    pub skills: Vec<String>,
    pub url: String,
}

impl ExportRow {
    pub fn new(posting: &RawJobPosting, job: &NormalizedJob, score: Option<&ScoreResult>) -> Self {
        Self {
            job_id: job.job_id.clone(),
            company: posting.company.clone(),
            role: posting.title.clone(),
            location: posting.location.clone(),
            status: PostingStatus::detect(posting),
            posted_text: posting.posted_text().to_string(),
            probability: score.map(|s| s.probability),
            recommendation: score.map(|s| s.recommendation),
            visa_sponsorship: job.visa_sponsorship,
            experience_years: job.experience_years,
            skills: job.keywords.clone(),
            url: posting.url.clone(),
        }
    }
}

/// Joins normalized jobs (with optional scores, index-aligned) to postings by id.
/// Jobs whose id has no posting are dropped.
pub fn join_rows(
    jobs: &[NormalizedJob],
    scores: &[Option<ScoreResult>],
    postings: &[RawJobPosting],
) -> Vec<ExportRow> {
    let by_id: HashMap<&str, &RawJobPosting> =
        postings.iter().map(|p| (p.id.as_str(), p)).collect();

    jobs.iter()
        .enumerate()
        .filter_map(|(i, job)| {
            let posting = by_id.get(job.job_id.as_str())?;
            let score = scores.get(i).and_then(|s| s.as_ref());
            Some(ExportRow::new(posting, job, score))
        })
        .collect()
}
