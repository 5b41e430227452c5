// OTPM: OA Trigger Probability Metric.
// engine is pure and synchronous; handlers expose it over HTTP.

pub mod engine;
pub mod handlers;

pub use engine::{evaluate, recommend, score, HeuristicScorer, Recommendation, ScoreResult, Scorer};
