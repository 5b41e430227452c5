use serde::{Deserialize, Serialize};

use crate::export::{ExportRow, PostingStatus};
use crate::otpm::engine::Recommendation;

const TOP_SKILLS: usize = 5;

/// Aggregate view of a batch, written as the analysis sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_jobs: usize,
    pub fresh_jobs: usize,
    pub reposts: usize,
    /// Mean probability over scored rows; `None` when nothing was scored.
    pub average_score: Option<f64>,
    pub strong_apply: usize,
    pub apply: usize,
    /// Most requested skills, by count then first appearance.
    pub top_skills: Vec<(String, usize)>,
}

impl BatchSummary {
    pub fn from_rows(rows: &[ExportRow]) -> Self {
        let fresh_jobs = rows
            .iter()
            .filter(|r| r.status == PostingStatus::Fresh)
            .count();

        let scores: Vec<f64> = rows.iter().filter_map(|r| r.probability).collect();
        let average_score = if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<f64>() / scores.len() as f64)
        };

        let count_rec = |rec: Recommendation| {
            rows.iter()
                .filter(|r| r.recommendation == Some(rec))
                .count()
        };

        Self {
            total_jobs: rows.len(),
            fresh_jobs,
            reposts: rows.len() - fresh_jobs,
            average_score,
            strong_apply: count_rec(Recommendation::StrongApply),
            apply: count_rec(Recommendation::Apply),
            top_skills: top_skills(rows, TOP_SKILLS),
        }
    }

    /// (Metric, Value) pairs in display order.
    pub fn metrics(&self) -> Vec<(&'static str, String)> {
        let top = self
            .top_skills
            .iter()
            .map(|(skill, count)| format!("{skill} ({count})"))
            .collect::<Vec<_>>()
            .join(", ");

        vec![
            ("Total Jobs Found", self.total_jobs.to_string()),
            ("Fresh Jobs", self.fresh_jobs.to_string()),
            ("Reposts", self.reposts.to_string()),
            (
                "Average OTPM Score",
                self.average_score
                    .map(|s| format!("{s:.2}"))
                    .unwrap_or_else(|| "N/A".to_string()),
            ),
            ("Strong Apply Candidates", self.strong_apply.to_string()),
            ("Apply Candidates", self.apply.to_string()),
            ("Top 5 Needed Skills", top),
        ]
    }
}

fn top_skills(rows: &[ExportRow], n: usize) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for skill in rows.iter().flat_map(|r| r.skills.iter()) {
        match counts.iter_mut().find(|(s, _)| s == skill) {
            Some((_, count)) => *count += 1,
            None => counts.push((skill.clone(), 1)),
        }
    }
    // Stable sort keeps first-appearance order among ties.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(n);
    counts
}
