//! OTPM engine — OA Trigger Probability Metric.
//!
//! A hand-weighted additive heuristic, not a learned model:
//! base 0.5, then experience, skill coverage, visa and entry-level adjustments,
//! clamped to [0, 1].
//!
//! Adjustments are accumulated in hundredths so that, e.g., 0.5 + 0.2 + 0.1 is
//! exactly 0.8 and lands on the STRONG APPLY threshold.
//!
//! `AppState` holds an `Arc<dyn Scorer>`; `HeuristicScorer` is the only backend.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{NormalizedJob, NormalizedResume, VisaSignal};

const BASE: i32 = 50;

const MEETS_EXPERIENCE: i32 = 20;
const SLIGHTLY_UNDER_EXPERIENCE: i32 = -10;
const WELL_UNDER_EXPERIENCE: i32 = -30;

const HIGH_COVERAGE: i32 = 30;
const PARTIAL_COVERAGE: i32 = 10;
const LOW_COVERAGE: i32 = -20;

const VISA_KILL_SWITCH: i32 = -50;
const VISA_SPONSOR_BONUS: i32 = 10;

const ENTRY_LEVEL_BONUS: i32 = 10;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// Discrete action derived from a probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "STRONG APPLY")]
    StrongApply,
    #[serde(rename = "APPLY")]
    Apply,
    #[serde(rename = "LOW PRIORITY")]
    LowPriority,
    #[serde(rename = "SKIP")]
    Skip,
}

impl Recommendation {
    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::StrongApply => "STRONG APPLY",
            Recommendation::Apply => "APPLY",
            Recommendation::LowPriority => "LOW PRIORITY",
            Recommendation::Skip => "SKIP",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Always within [0, 1].
    pub probability: f64,
    pub recommendation: Recommendation,
}

/// Each signed term of the score, before clamping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub base: f64,
    pub experience: f64,
    pub skill_overlap_ratio: f64,
    pub skills: f64,
    pub visa: f64,
    pub entry_level: f64,
    /// Sum of all terms; may fall outside [0, 1].
    pub raw: f64,
    pub probability: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Scores a résumé against a job. Implementations must be pure.
pub trait Scorer: Send + Sync {
    fn score(&self, job: &NormalizedJob, resume: &NormalizedResume) -> ScoreResult;
}

/// The additive OTPM heuristic.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicScorer;

impl Scorer for HeuristicScorer {
    fn score(&self, job: &NormalizedJob, resume: &NormalizedResume) -> ScoreResult {
        evaluate(job, resume)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core algorithm
// ────────────────────────────────────────────────────────────────────────────

/// Probability in [0, 1] that applying to `job` with `resume` triggers an OA.
pub fn score(job: &NormalizedJob, resume: &NormalizedResume) -> f64 {
    breakdown(job, resume).probability
}

pub fn recommend(probability: f64) -> Recommendation {
    if probability >= 0.8 {
        Recommendation::StrongApply
    } else if probability >= 0.6 {
        Recommendation::Apply
    } else if probability >= 0.4 {
        Recommendation::LowPriority
    } else {
        Recommendation::Skip
    }
}

pub fn evaluate(job: &NormalizedJob, resume: &NormalizedResume) -> ScoreResult {
    let probability = score(job, resume);
    ScoreResult {
        probability,
        recommendation: recommend(probability),
    }
}

pub fn breakdown(job: &NormalizedJob, resume: &NormalizedResume) -> ScoreBreakdown {
    let experience = experience_adjustment(resume.years_of_experience - job.experience_years);

    let ratio = skill_overlap_ratio(&job.required_skills, &resume.skills);
    let skills = coverage_adjustment(ratio);

    let visa = match job.visa_sponsorship {
        VisaSignal::Unlikely if resume.requires_visa() => VISA_KILL_SWITCH,
        VisaSignal::Likely if resume.requires_visa() => VISA_SPONSOR_BONUS,
        _ => 0,
    };

    let entry_level = if job.experience_years == 0.0 {
        ENTRY_LEVEL_BONUS
    } else {
        0
    };

    let raw = BASE + experience + skills + visa + entry_level;

    ScoreBreakdown {
        base: hundredths(BASE),
        experience: hundredths(experience),
        skill_overlap_ratio: ratio,
        skills: hundredths(skills),
        visa: hundredths(visa),
        entry_level: hundredths(entry_level),
        raw: hundredths(raw),
        probability: hundredths(raw.clamp(0, 100)),
    }
}

/// |job ∩ résumé| / |job|. A job with no parsed skills gives no signal, so 1.0.
pub fn skill_overlap_ratio(job_skills: &[String], resume_skills: &[String]) -> f64 {
    let job_set: BTreeSet<&str> = job_skills.iter().map(String::as_str).collect();
    if job_set.is_empty() {
        return 1.0;
    }
    let resume_set: BTreeSet<&str> = resume_skills.iter().map(String::as_str).collect();
    let matched = job_set.intersection(&resume_set).count();
    matched as f64 / job_set.len() as f64
}

fn experience_adjustment(gap: f64) -> i32 {
    if gap >= 0.0 {
        MEETS_EXPERIENCE
    } else if gap >= -1.0 {
        SLIGHTLY_UNDER_EXPERIENCE
    } else {
        WELL_UNDER_EXPERIENCE
    }
}

/// [0.2, 0.5) is a dead zone with no adjustment.
fn coverage_adjustment(ratio: f64) -> i32 {
    if ratio >= 0.8 {
        HIGH_COVERAGE
    } else if ratio >= 0.5 {
        PARTIAL_COVERAGE
    } else if ratio < 0.2 {
        LOW_COVERAGE
    } else {
        0
    }
}

fn hundredths(value: i32) -> f64 {
    f64::from(value) / 100.0
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::VISA_REQUIRED;

    fn skills(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn make_job(required: &[&str], years: f64, visa: VisaSignal) -> NormalizedJob {
        NormalizedJob {
            job_id: "job-1".to_string(),
            required_skills: skills(required),
            experience_years: years,
            visa_sponsorship: visa,
            keywords: skills(required),
        }
    }

    fn make_resume(have: &[&str], years: f64, visa_status: &str) -> NormalizedResume {
        NormalizedResume {
            skills: skills(have),
            years_of_experience: years,
            visa_status: visa_status.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_half_overlap_meets_experience_is_point_eight() {
        let job = make_job(&["python", "aws", "docker", "kubernetes"], 3.0, VisaSignal::Unclear);
        let resume = make_resume(&["python", "aws"], 3.0, "US Citizen");

        let b = breakdown(&job, &resume);
        assert_eq!(b.skill_overlap_ratio, 0.5);
        assert_eq!(b.skills, 0.1);
        assert_eq!(b.experience, 0.2);
        assert_eq!(b.probability, 0.8);
        assert_eq!(recommend(b.probability), Recommendation::StrongApply);
    }

    #[test]
    fn test_entry_level_without_skills_clamps_to_one() {
        let job = make_job(&[], 0.0, VisaSignal::Unclear);
        let resume = make_resume(&[], 0.0, "US Citizen");

        let b = breakdown(&job, &resume);
        assert_eq!(b.skill_overlap_ratio, 1.0);
        assert!((b.raw - 1.1).abs() < 1e-9);
        assert_eq!(b.probability, 1.0);
        assert_eq!(
            evaluate(&job, &resume).recommendation,
            Recommendation::StrongApply
        );
    }

    #[test]
    fn test_experience_gap_bands() {
        let resume_with = |years| make_resume(&["rust"], years, "US Citizen");
        let job = make_job(&["rust"], 5.0, VisaSignal::Unclear);

        assert_eq!(breakdown(&job, &resume_with(7.0)).experience, 0.2);
        assert_eq!(breakdown(&job, &resume_with(5.0)).experience, 0.2);
        assert_eq!(breakdown(&job, &resume_with(4.0)).experience, -0.1);
        assert_eq!(breakdown(&job, &resume_with(4.5)).experience, -0.1);
        assert_eq!(breakdown(&job, &resume_with(3.5)).experience, -0.3);
    }

    #[test]
    fn test_coverage_bands_including_dead_zone() {
        let job = make_job(&["a", "b", "c", "d", "e"], 1.0, VisaSignal::Unclear);
        let with = |have: &[&str]| breakdown(&job, &make_resume(have, 1.0, "US Citizen")).skills;

        assert_eq!(with(&["a", "b", "c", "d"]), 0.3); // 0.8
        assert_eq!(with(&["a", "b", "c"]), 0.1); // 0.6
        assert_eq!(with(&["a", "b"]), 0.0); // 0.4 dead zone
        assert_eq!(with(&["a"]), 0.0); // 0.2 dead zone lower edge
        assert_eq!(with(&[]), -0.2); // 0.0
    }

    #[test]
    fn test_overlap_ignores_duplicate_and_extra_resume_skills() {
        let ratio = skill_overlap_ratio(
            &skills(&["python", "python", "go"]),
            &skills(&["python", "rust", "java"]),
        );
        assert_eq!(ratio, 0.5);
    }

    #[test]
    fn test_visa_kill_switch_and_bonus() {
        let resume = make_resume(&["python"], 5.0, VISA_REQUIRED);

        let unlikely = breakdown(&make_job(&["python"], 2.0, VisaSignal::Unlikely), &resume);
        assert_eq!(unlikely.visa, -0.5);
        // 0.5 + 0.2 + 0.3 - 0.5
        assert_eq!(unlikely.probability, 0.5);

        let likely = breakdown(&make_job(&["python"], 2.0, VisaSignal::Likely), &resume);
        assert_eq!(likely.visa, 0.1);
        assert_eq!(likely.probability, 1.0);

        let unclear = breakdown(&make_job(&["python"], 2.0, VisaSignal::Unclear), &resume);
        assert_eq!(unclear.visa, 0.0);
    }

    #[test]
    fn test_visa_rules_require_exact_status() {
        let job = make_job(&["python"], 2.0, VisaSignal::Unlikely);
        for status in ["US Citizen", "visa required", "Green Card", ""] {
            let b = breakdown(&job, &make_resume(&["python"], 5.0, status));
            assert_eq!(b.visa, 0.0, "status {status:?}");
        }
    }

    #[test]
    fn test_kill_switch_always_applies_even_when_maxed() {
        let resume = make_resume(&[], 10.0, VISA_REQUIRED);
        let sponsored = make_job(&[], 0.0, VisaSignal::Unclear);
        let citizens_only = make_job(&[], 0.0, VisaSignal::Unlikely);

        let without = breakdown(&sponsored, &resume);
        let with = breakdown(&citizens_only, &resume);
        assert!((without.raw - with.raw - 0.5).abs() < 1e-9);
        assert!(with.probability <= without.probability);
        assert_eq!(with.probability, 0.6);
    }

    #[test]
    fn test_worst_case_clamps_to_zero() {
        let job = make_job(&["a", "b", "c"], 10.0, VisaSignal::Unlikely);
        let resume = make_resume(&[], 0.0, VISA_REQUIRED);
        let b = breakdown(&job, &resume);
        // 0.5 - 0.3 - 0.2 - 0.5
        assert!((b.raw + 0.5).abs() < 1e-9);
        assert_eq!(b.probability, 0.0);
        assert_eq!(recommend(b.probability), Recommendation::Skip);
    }

    #[test]
    fn test_score_always_in_unit_interval() {
        let visas = [VisaSignal::Likely, VisaSignal::Unlikely, VisaSignal::Unclear];
        let statuses = ["US Citizen", VISA_REQUIRED, "Other"];
        let job_skill_sets: [&[&str]; 3] = [&[], &["python"], &["python", "go", "rust"]];
        for &visa in &visas {
            for status in statuses {
                for job_skills in job_skill_sets {
                    for job_years in [0.0, 1.0, 5.0, 19.0] {
                        for resume_years in [0.0, 0.5, 4.0, 30.0] {
                            let job = make_job(job_skills, job_years, visa);
                            let resume = make_resume(&["python"], resume_years, status);
                            let p = score(&job, &resume);
                            assert!((0.0..=1.0).contains(&p), "p={p}");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_raising_overlap_never_lowers_score() {
        let job = make_job(&["a", "b", "c", "d", "e"], 3.0, VisaSignal::Unlikely);
        for status in ["US Citizen", VISA_REQUIRED] {
            for years in [0.0, 2.5, 3.0] {
                let low = score(&job, &make_resume(&[], years, status));
                let high = score(&job, &make_resume(&["a", "b", "c", "d"], years, status));
                assert!(high >= low, "high={high} low={low}");
            }
        }
    }

    #[test]
    fn test_recommendation_thresholds_inclusive() {
        assert_eq!(recommend(1.0), Recommendation::StrongApply);
        assert_eq!(recommend(0.8), Recommendation::StrongApply);
        assert_eq!(recommend(0.79), Recommendation::Apply);
        assert_eq!(recommend(0.6), Recommendation::Apply);
        assert_eq!(recommend(0.59), Recommendation::LowPriority);
        assert_eq!(recommend(0.4), Recommendation::LowPriority);
        assert_eq!(recommend(0.39), Recommendation::Skip);
        assert_eq!(recommend(0.0), Recommendation::Skip);
    }

    #[test]
    fn test_recommendation_labels_and_serde() {
        assert_eq!(Recommendation::StrongApply.to_string(), "STRONG APPLY");
        assert_eq!(Recommendation::LowPriority.label(), "LOW PRIORITY");
        assert_eq!(
            serde_json::to_string(&Recommendation::StrongApply).unwrap(),
            r#""STRONG APPLY""#
        );
    }

    #[test]
    fn test_scorer_trait_matches_free_functions_and_is_deterministic() {
        let job = make_job(&["python", "aws"], 2.0, VisaSignal::Likely);
        let resume = make_resume(&["python"], 1.5, VISA_REQUIRED);
        let scorer: &dyn Scorer = &HeuristicScorer;

        let first = scorer.score(&job, &resume);
        let second = scorer.score(&job, &resume);
        assert_eq!(first, second);
        assert_eq!(first, evaluate(&job, &resume));
        assert_eq!(first.recommendation, recommend(score(&job, &resume)));
    }
}
