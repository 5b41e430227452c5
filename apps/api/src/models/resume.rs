use serde::{Deserialize, Serialize};

pub const DEFAULT_VISA_STATUS: &str = "US Citizen";
pub const DEFAULT_ROLE_FAMILY: &str = "Software Engineer";

/// Visa status value that triggers the sponsorship rules in scoring.
pub const VISA_REQUIRED: &str = "Visa Required";

/// Structured résumé attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResume {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub years_of_experience: f64,
    #[serde(default = "default_visa_status")]
    pub visa_status: String,
    #[serde(default = "default_role_family")]
    pub role_family: String,
    #[serde(default)]
    pub education: Vec<String>,
    #[serde(default)]
    pub experience_bullets: Vec<String>,
}

impl Default for NormalizedResume {
    fn default() -> Self {
        Self {
            skills: vec![],
            years_of_experience: 0.0,
            visa_status: default_visa_status(),
            role_family: default_role_family(),
            education: vec![],
            experience_bullets: vec![],
        }
    }
}

impl NormalizedResume {
    pub fn requires_visa(&self) -> bool {
        self.visa_status == VISA_REQUIRED
    }
}

fn default_visa_status() -> String {
    DEFAULT_VISA_STATUS.to_string()
}

fn default_role_family() -> String {
    DEFAULT_ROLE_FAMILY.to_string()
}

/// User-supplied values that replace derived résumé fields.
/// Unrecognized keys are ignored on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeOverrides {
    /// Numeric string, parsed when applied.
    #[serde(default)]
    pub years_of_experience: Option<String>,
    #[serde(default)]
    pub visa_status: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl ResumeOverrides {
    pub fn is_empty(&self) -> bool {
        self.years_of_experience.is_none() && self.visa_status.is_none() && self.role.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_defaults() {
        let resume = NormalizedResume::default();
        assert_eq!(resume.visa_status, "US Citizen");
        assert_eq!(resume.role_family, "Software Engineer");
        assert_eq!(resume.years_of_experience, 0.0);
        assert!(!resume.requires_visa());
    }

    #[test]
    fn test_resume_deserializes_with_missing_fields() {
        let resume: NormalizedResume =
            serde_json::from_str(r#"{"skills": ["rust"], "visa_status": "Visa Required"}"#)
                .unwrap();
        assert_eq!(resume.skills, vec!["rust"]);
        assert!(resume.requires_visa());
        assert_eq!(resume.role_family, "Software Engineer");
    }

    #[test]
    fn test_overrides_ignore_unknown_keys() {
        let overrides: ResumeOverrides = serde_json::from_str(
            r#"{"years_of_experience": "3", "favourite_colour": "green"}"#,
        )
        .unwrap();
        assert_eq!(overrides.years_of_experience.as_deref(), Some("3"));
        assert!(overrides.visa_status.is_none());
        assert!(!overrides.is_empty());
        assert!(ResumeOverrides::default().is_empty());
    }
}
