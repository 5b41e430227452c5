use std::sync::Arc;

use crate::config::Config;
use crate::normalization::{JobParser, ResumeParser};
use crate::otpm::engine::{HeuristicScorer, Scorer};

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is immutable; handlers never coordinate with each other.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub job_parser: JobParser,
    pub resume_parser: ResumeParser,
    /// Pluggable scorer. Default: HeuristicScorer.
    pub scorer: Arc<dyn Scorer>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            job_parser: JobParser::default(),
            resume_parser: ResumeParser::default(),
            scorer: Arc::new(HeuristicScorer),
        }
    }
}
