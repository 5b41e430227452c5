#![allow(dead_code)]
//! Résumé Parser — raw résumé text or file → `NormalizedResume`.
//!
//! Skills and experience come from the shared `Extractor` run over the whole
//! document. Education and experience bullets come from a line-oriented
//! section heuristic, since résumés have no reliable structure.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::errors::AppError;
use crate::models::resume::{DEFAULT_ROLE_FAMILY, DEFAULT_VISA_STATUS};
use crate::models::{NormalizedResume, ResumeOverrides};
use crate::normalization::extractor::Extractor;
use crate::normalization::text_extract::{
    decode_utf8_ignoring_errors, is_pdf, PdfTextExtractor, TextExtractor,
};

pub const EDUCATION_KEYWORDS: &[&str] = &["education", "academic"];
pub const EXPERIENCE_KEYWORDS: &[&str] = &["experience", "employment", "work history", "projects"];

/// Header lines are short; longer lines mentioning a keyword are content.
const MAX_HEADER_CHARS: usize = 30;
/// An all-caps line in this length window ends the current section.
const NEXT_HEADER_MIN_CHARS: usize = 4;
const NEXT_HEADER_MAX_CHARS: usize = 19;
/// Lines longer than this count as content even without a bullet glyph.
const MIN_CONTENT_CHARS: usize = 10;
const BULLET_GLYPHS: &[char] = &['•', '-', '*', '·'];

/// Where the résumé text comes from.
#[derive(Debug, Clone, Copy)]
pub enum ResumeInput<'a> {
    Text(&'a str),
    File(&'a Path),
}

#[derive(Clone)]
pub struct ResumeParser {
    extractor: Extractor,
    text_extractor: Arc<dyn TextExtractor>,
}

impl Default for ResumeParser {
    fn default() -> Self {
        Self {
            extractor: Extractor::default(),
            text_extractor: Arc::new(PdfTextExtractor),
        }
    }
}

impl ResumeParser {
    pub fn new(extractor: Extractor, text_extractor: Arc<dyn TextExtractor>) -> Self {
        Self {
            extractor,
            text_extractor,
        }
    }

    pub fn parse(
        &self,
        input: ResumeInput<'_>,
        overrides: Option<&ResumeOverrides>,
    ) -> Result<NormalizedResume, AppError> {
        match input {
            ResumeInput::Text(text) => self.parse_text(text, overrides),
            ResumeInput::File(path) => self.parse_file(path, overrides),
        }
    }

    /// Reads a PDF or plain-text résumé. A missing path is `NotFound`; a PDF
    /// that fails to extract is treated as an empty document.
    pub fn parse_file(
        &self,
        path: &Path,
        overrides: Option<&ResumeOverrides>,
    ) -> Result<NormalizedResume, AppError> {
        if !path.exists() {
            return Err(AppError::NotFound(format!(
                "Resume file not found: {}",
                path.display()
            )));
        }

        let text = if is_pdf(path) {
            self.text_extractor.extract(path)
        } else {
            decode_utf8_ignoring_errors(&std::fs::read(path)?)
        };

        self.parse_text(&text, overrides)
    }

    pub fn parse_text(
        &self,
        text: &str,
        overrides: Option<&ResumeOverrides>,
    ) -> Result<NormalizedResume, AppError> {
        let text_lower = text.to_lowercase();

        let skills = self.extractor.skills(&text_lower);
        let mut years_of_experience = self.extractor.experience_years(&text_lower);

        let education = extract_section_bullets(text, EDUCATION_KEYWORDS);
        let experience_bullets = extract_section_bullets(text, EXPERIENCE_KEYWORDS);

        let mut visa_status = DEFAULT_VISA_STATUS.to_string();
        let mut role_family = DEFAULT_ROLE_FAMILY.to_string();

        if let Some(overrides) = overrides {
            if let Some(raw) = &overrides.years_of_experience {
                years_of_experience = parse_years_override(raw)?;
            }
            if let Some(visa) = &overrides.visa_status {
                visa_status = visa.clone();
            }
            if let Some(role) = &overrides.role {
                role_family = role.clone();
            }
        }

        debug!(
            skills = skills.len(),
            years_of_experience,
            education = education.len(),
            experience_bullets = experience_bullets.len(),
            "normalized resume"
        );

        Ok(NormalizedResume {
            skills,
            years_of_experience,
            visa_status,
            role_family,
            education,
            experience_bullets,
        })
    }
}

/// Normalizes résumé text or a file with the default extractors.
pub fn normalize_resume(
    input: ResumeInput<'_>,
    overrides: Option<&ResumeOverrides>,
) -> Result<NormalizedResume, AppError> {
    ResumeParser::default().parse(input, overrides)
}

fn parse_years_override(raw: &str) -> Result<f64, AppError> {
    let malformed = || AppError::MalformedOverride {
        key: "years_of_experience",
        value: raw.to_string(),
    };
    let years = raw.trim().parse::<f64>().map_err(|_| malformed())?;
    if !years.is_finite() || years < 0.0 {
        return Err(malformed());
    }
    Ok(years)
}

/// Collects bullet-like lines following a header that mentions one of `keywords`.
///
/// - Header: trimmed, lower-cased line containing a keyword and shorter than
///   30 chars. Not captured.
/// - End: a 4–19 char fully upper-case line while in-section. Not captured.
/// - Captured: lines starting with a bullet glyph or longer than 10 chars.
pub fn extract_section_bullets(text: &str, keywords: &[&str]) -> Vec<String> {
    let mut in_section = false;
    let mut bullets = Vec::new();

    for line in text.split('\n') {
        let trimmed = line.trim();
        let len = trimmed.chars().count();
        let clean_line = trimmed.to_lowercase();

        let is_header = keywords.iter().any(|k| clean_line.contains(k))
            && clean_line.chars().count() < MAX_HEADER_CHARS;
        if is_header {
            in_section = true;
            continue;
        }

        if !in_section {
            continue;
        }

        if is_upper(trimmed) && (NEXT_HEADER_MIN_CHARS..=NEXT_HEADER_MAX_CHARS).contains(&len) {
            in_section = false;
            continue;
        }

        if trimmed.starts_with(BULLET_GLYPHS) || len > MIN_CONTENT_CHARS {
            bullets.push(trimmed.to_string());
        }
    }

    bullets
}

/// At least one cased character and no lower-case ones.
fn is_upper(s: &str) -> bool {
    s.chars().any(char::is_uppercase) && !s.chars().any(char::is_lowercase)
}
