#![allow(dead_code)]
//! Job Parser — turns a raw posting into a `NormalizedJob`.

use tracing::debug;

use crate::models::{NormalizedJob, RawJobPosting};
use crate::normalization::extractor::Extractor;

#[derive(Debug, Clone, Default)]
pub struct JobParser {
    extractor: Extractor,
}

impl JobParser {
    pub fn new(extractor: Extractor) -> Self {
        Self { extractor }
    }

    /// Never fails: an empty description yields empty skills, 0.0 years, `UNCLEAR`.
    pub fn parse(&self, job: &RawJobPosting) -> NormalizedJob {
        let description_lower = job.description.to_lowercase();

        let required_skills = self.extractor.skills(&description_lower);
        let experience_years = self.extractor.experience_years(&description_lower);
        let visa_sponsorship = self.extractor.visa_signal(&description_lower);

        debug!(
            job_id = %job.id,
            skills = required_skills.len(),
            experience_years,
            visa = %visa_sponsorship,
            "normalized job"
        );

        NormalizedJob {
            job_id: job.id.clone(),
            keywords: required_skills.clone(),
            required_skills,
            experience_years,
            visa_sponsorship,
        }
    }
}

/// Normalizes a posting with the built-in vocabulary.
pub fn normalize_job(job: &RawJobPosting) -> NormalizedJob {
    JobParser::default().parse(job)
}
