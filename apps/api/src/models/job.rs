use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A job posting as produced by a `JobSource`. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawJobPosting {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    /// Full description text (HTML already flattened by the source).
    pub description: String,
    pub url: String,
    /// Originating site, e.g. "linkedin", "jobright", "simplify".
    pub source: String,
    #[serde(default)]
    pub posted_date: Option<DateTime<Utc>>,
    /// Source-specific extras, e.g. `posted_text`.
    #[serde(default)]
    pub raw_data: HashMap<String, Value>,
}

impl RawJobPosting {
    /// The source's free-form "posted" label, if it recorded one.
    pub fn posted_text(&self) -> &str {
        self.raw_data
            .get("posted_text")
            .and_then(|v| v.as_str())
            .unwrap_or("")
    }
}

/// Inferred visa sponsorship stance of a posting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisaSignal {
    Likely,
    Unlikely,
    #[default]
    Unclear,
}

impl VisaSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisaSignal::Likely => "LIKELY",
            VisaSignal::Unlikely => "UNLIKELY",
            VisaSignal::Unclear => "UNCLEAR",
        }
    }
}

impl fmt::Display for VisaSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured attributes derived from a `RawJobPosting` description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedJob {
    /// Joins back to `RawJobPosting::id`.
    pub job_id: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    /// 0.0 means unspecified / entry level.
    #[serde(default)]
    pub experience_years: f64,
    #[serde(default)]
    pub visa_sponsorship: VisaSignal,
    #[serde(default)]
    pub keywords: Vec<String>,
}
