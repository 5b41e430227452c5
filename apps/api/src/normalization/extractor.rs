#![allow(dead_code)]
//! Extractor — rule-based text → attribute functions shared by job and résumé normalization.
//!
//! All functions expect lower-cased input. The vocabulary and phrase lists are
//! immutable; compiled patterns live in statics and are shared without locking.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::VisaSignal;

/// Technology terms recognized in job descriptions and résumés.
pub const COMMON_SKILLS: &[&str] = &[
    "python",
    "java",
    "c++",
    "javascript",
    "typescript",
    "react",
    "angular",
    "vue",
    "aws",
    "azure",
    "gcp",
    "docker",
    "kubernetes",
    "sql",
    "nosql",
    "redis",
    "mongodb",
    "postgresql",
    "mysql",
    "django",
    "flask",
    "fastapi",
    "spring",
    "node.js",
    "go",
    "golang",
    "rust",
    "ruby",
    "rails",
    "php",
    "swift",
    "kotlin",
    "terraform",
    "jenkins",
    "gitlab",
    "github",
    "linux",
    "git",
    "ansible",
    "bash",
    "shell",
    "scripting",
    "sre",
    "ci/cd",
    "circleci",
    "prometheus",
    "grafana",
    "elasticsearch",
    "kafka",
];

/// Checked first; any hit means the posting will not sponsor.
const VISA_KEYWORDS_NEGATIVE: &[&str] = &[
    "us citizen",
    "green card",
    "permanent resident",
    "no sponsorship",
    "not sponsor",
];

const VISA_KEYWORDS_POSITIVE: &[&str] = &["visa sponsorship", "sponsor", "h1b"];

/// Tried in order: "5+ years", "3-5 years", "2 to 3 years", "4 years".
static EXPERIENCE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)([0-9]+)\s*\+\s*years",
        r"(?i)([0-9]+)\s*-\s*[0-9]+\s*years",
        r"(?i)([0-9]+)\s*to\s*[0-9]+\s*years",
        r"(?i)([0-9]+)\s*years",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static BUILTIN_VOCABULARY: LazyLock<SkillVocabulary> =
    LazyLock::new(|| SkillVocabulary::new(COMMON_SKILLS.iter().copied()).unwrap());

/// Values at or beyond this are treated as noise ("2024 years").
const MAX_PLAUSIBLE_YEARS: f64 = 20.0;

#[derive(Debug, Clone)]
enum SkillPattern {
    /// Terms with punctuation ("c++", "node.js") break `\b`, so plain containment.
    Substring,
    WordBounded(Regex),
}

#[derive(Debug, Clone)]
struct SkillEntry {
    term: String,
    pattern: SkillPattern,
}

/// A fixed set of skill terms with their precompiled matchers.
#[derive(Debug, Clone)]
pub struct SkillVocabulary {
    entries: Vec<SkillEntry>,
}

impl SkillVocabulary {
    /// Builds a vocabulary from arbitrary terms. Terms are lower-cased and deduplicated.
    pub fn new<I, S>(terms: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries: Vec<SkillEntry> = Vec::new();
        for term in terms {
            let term = term.as_ref().trim().to_lowercase();
            if term.is_empty() || entries.iter().any(|e| e.term == term) {
                continue;
            }
            let pattern = if has_non_word_char(&term) {
                SkillPattern::Substring
            } else {
                SkillPattern::WordBounded(Regex::new(&format!(r"\b{}\b", regex::escape(&term)))?)
            };
            entries.push(SkillEntry { term, pattern });
        }
        Ok(Self { entries })
    }

    /// The built-in technology vocabulary.
    pub fn builtin() -> &'static SkillVocabulary {
        &BUILTIN_VOCABULARY
    }

    pub fn contains(&self, term: &str) -> bool {
        self.entries.iter().any(|e| e.term == term)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the sorted vocabulary terms present in `text`.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let mut found: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| match &entry.pattern {
                SkillPattern::Substring => text.contains(entry.term.as_str()),
                SkillPattern::WordBounded(re) => re.is_match(text),
            })
            .map(|entry| entry.term.clone())
            .collect();
        found.sort();
        found.dedup();
        found
    }
}

fn has_non_word_char(term: &str) -> bool {
    term.chars().any(|c| !(c.is_alphanumeric() || c == '_'))
}

/// Skill, experience and visa extraction over lower-cased text.
#[derive(Debug, Clone)]
pub struct Extractor {
    vocabulary: SkillVocabulary,
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            vocabulary: SkillVocabulary::builtin().clone(),
        }
    }
}

impl Extractor {
    pub fn with_vocabulary(vocabulary: SkillVocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &SkillVocabulary {
        &self.vocabulary
    }

    pub fn skills(&self, text: &str) -> Vec<String> {
        self.vocabulary.extract(text)
    }

    pub fn experience_years(&self, text: &str) -> f64 {
        extract_experience(text)
    }

    pub fn visa_signal(&self, text: &str) -> VisaSignal {
        extract_visa_signal(text)
    }
}

/// Skills from the built-in vocabulary.
pub fn extract_skills(text: &str) -> Vec<String> {
    SkillVocabulary::builtin().extract(text)
}

/// Required years of experience, 0.0 when nothing plausible is stated.
///
/// The first mention is usually the minimum requirement, so within a pattern
/// family the leftmost in-range number wins. Families are tried in order and a
/// family whose matches are all out of range falls through to the next.
pub fn extract_experience(text: &str) -> f64 {
    for pattern in EXPERIENCE_PATTERNS.iter() {
        let years = pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .filter_map(|m| m.as_str().parse::<f64>().ok())
            .find(|&y| y > 0.0 && y < MAX_PLAUSIBLE_YEARS);
        if let Some(years) = years {
            return years;
        }
    }
    0.0
}

/// Negative phrases take precedence over positive ones.
pub fn extract_visa_signal(text: &str) -> VisaSignal {
    if VISA_KEYWORDS_NEGATIVE.iter().any(|k| text.contains(k)) {
        return VisaSignal::Unlikely;
    }
    if VISA_KEYWORDS_POSITIVE.iter().any(|k| text.contains(k)) {
        return VisaSignal::Likely;
    }
    VisaSignal::Unclear
}
