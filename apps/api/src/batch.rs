//! Batch pipeline — search a source, fetch details, normalize, score, summarize.
//!
//! Flow: source.search → source.fetch_posting (per result) → normalize_job →
//!       scorer.score (when a résumé is supplied) → join → summary.
//!
//! Writing files is left to the caller (`export`), so the HTTP API and CLI
//! share this pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::{join_rows, BatchSummary, ExportRow};
use crate::models::{NormalizedJob, NormalizedResume, RawJobPosting};
use crate::normalization::JobParser;
use crate::otpm::engine::{ScoreResult, Scorer};
use crate::sources::{JobSource, UNKNOWN_COMPANY, UNKNOWN_LOCATION};

pub const DEFAULT_LIMIT: usize = 10;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    pub query: String,
    pub location: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

/// A posting together with everything derived from it.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredJob {
    pub posting: RawJobPosting,
    pub job: NormalizedJob,
    pub score: Option<ScoreResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub jobs: Vec<ScoredJob>,
    pub rows: Vec<ExportRow>,
    pub summary: BatchSummary,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs the full batch against `source`.
///
/// Steps:
/// 1. search → candidate postings
/// 2. fetch_posting per candidate; failures are skipped, placeholders filled from search
/// 3. normalize each posting
/// 4. score each job when `resume` is given
/// 5. join rows + summary
pub async fn run_batch(
    source: &dyn JobSource,
    request: &BatchRequest,
    resume: Option<&NormalizedResume>,
    scorer: &dyn Scorer,
) -> Result<BatchReport, AppError> {
    let run_id = Uuid::new_v4();

    // Step 1: Search
    info!(
        %run_id,
        "Searching {} for '{}' in '{}' (limit {})",
        source.name(),
        request.query,
        request.location,
        request.limit
    );
    let results = source
        .search(&request.query, &request.location, request.limit)
        .await?;
    info!(%run_id, "Found {} jobs", results.len());

    // Step 2: Fetch details
    let mut postings = Vec::with_capacity(results.len());
    for (i, summary) in results.iter().enumerate() {
        info!(
            "[{}/{}] Fetching: {} @ {}",
            i + 1,
            results.len(),
            summary.title,
            summary.company
        );
        match source.fetch_posting(&summary.url).await {
            Ok(Some(full)) => postings.push(merge_search_metadata(full, summary)),
            Ok(None) => warn!("Failed to fetch details for {}", summary.url),
            Err(e) => warn!("Error fetching {}: {e}", summary.url),
        }
    }

    // Steps 3–5
    let report = score_postings(run_id, postings, resume, scorer);
    info!(
        %run_id,
        total = report.summary.total_jobs,
        strong_apply = report.summary.strong_apply,
        apply = report.summary.apply,
        "Batch complete"
    );
    Ok(report)
}

/// Normalizes and scores postings that are already in hand.
pub fn score_postings(
    run_id: Uuid,
    postings: Vec<RawJobPosting>,
    resume: Option<&NormalizedResume>,
    scorer: &dyn Scorer,
) -> BatchReport {
    let parser = JobParser::default();

    let jobs: Vec<ScoredJob> = postings
        .into_iter()
        .map(|posting| {
            let job = parser.parse(&posting);
            let score = resume.map(|r| scorer.score(&job, r));
            ScoredJob {
                posting,
                job,
                score,
            }
        })
        .collect();

    let normalized: Vec<NormalizedJob> = jobs.iter().map(|j| j.job.clone()).collect();
    let scores: Vec<Option<ScoreResult>> = jobs.iter().map(|j| j.score).collect();
    let originals: Vec<RawJobPosting> = jobs.iter().map(|j| j.posting.clone()).collect();

    let rows = join_rows(&normalized, &scores, &originals);
    let summary = BatchSummary::from_rows(&rows);

    BatchReport {
        run_id,
        generated_at: Utc::now(),
        jobs,
        rows,
        summary,
    }
}

/// Detail pages sometimes hide company/location; the search card still has them.
fn merge_search_metadata(mut full: RawJobPosting, summary: &RawJobPosting) -> RawJobPosting {
    if full.company == UNKNOWN_COMPANY {
        full.company = summary.company.clone();
    }
    if full.location == UNKNOWN_LOCATION {
        full.location = summary.location.clone();
    }
    full
}
