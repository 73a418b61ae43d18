//! Subject profile — the care recipient a caregiver is asking about.
//!
//! The profile is owned by the caller; the assistant only reads it.

use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use tracing::warn;

use crate::error::ProfileError;

/// Severity stage of the subject's condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Early,
    #[default]
    Moderate,
    Advanced,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Early => "early",
            Self::Moderate => "moderate",
            Self::Advanced => "advanced",
        }
    }

    /// Lenient parse: anything outside the enumerated set becomes `Moderate`.
    ///
    /// Logs a warning instead of failing.
    pub fn coerce(value: &str) -> Self {
        match value.parse() {
            Ok(stage) => stage,
            Err(ProfileError::InvalidStageValue(raw)) => {
                warn!(stage = %raw, "Unrecognized stage value, using 'moderate'");
                Self::Moderate
            }
        }
    }
}

impl FromStr for Stage {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "early" => Ok(Self::Early),
            "moderate" => Ok(Self::Moderate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(ProfileError::InvalidStageValue(s.to_string())),
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Stage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::coerce(&raw))
    }
}

/// Identifying and clinical summary data for the care recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectProfile {
    pub id: String,

    /// Name used when addressing or describing the subject
    pub name: String,

    pub age: u32,

    /// Free-text diagnosis label (e.g., "Alzheimer's disease")
    pub diagnosis: String,

    #[serde(default)]
    pub stage: Stage,

    /// Optional free-text case narrative kept with the profile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_narrative: Option<String>,
}

impl SubjectProfile {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        age: u32,
        diagnosis: impl Into<String>,
        stage: Stage,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            age,
            diagnosis: diagnosis.into(),
            stage,
            case_narrative: None,
        }
    }

    pub fn with_case_narrative(mut self, narrative: impl Into<String>) -> Self {
        self.case_narrative = Some(narrative.into());
        self
    }

    /// The case narrative, if present and not blank.
    pub fn narrative(&self) -> Option<&str> {
        self.case_narrative
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_parse_accepts_known_stages() {
        assert_eq!("early".parse::<Stage>().unwrap(), Stage::Early);
        assert_eq!(" Advanced ".parse::<Stage>().unwrap(), Stage::Advanced);
    }

    #[test]
    fn strict_parse_rejects_unknown_stage() {
        let err = "terminal".parse::<Stage>().unwrap_err();
        assert!(matches!(err, ProfileError::InvalidStageValue(ref v) if v == "terminal"));
    }

    #[test]
    fn unknown_stages_coerce_to_moderate() {
        for raw in ["", "severe", "MILD", "3", "late-stage", "ранний"] {
            assert_eq!(Stage::coerce(raw), Stage::Moderate, "input: {raw:?}");
        }
        assert_eq!(Stage::coerce("EARLY"), Stage::Early);
    }

    #[test]
    fn profile_deserializes_with_coerced_stage() {
        let json = r#"{
            "id": "p1",
            "name": "Harold",
            "age": 78,
            "diagnosis": "Alzheimer's disease",
            "stage": "mid"
        }"#;
        let profile: SubjectProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.stage, Stage::Moderate);
        assert!(profile.case_narrative.is_none());
    }

    #[test]
    fn profile_loads_from_toml() {
        let src = r#"
id = "p2"
name = "June"
age = 81
diagnosis = "Vascular dementia"
stage = "advanced"
case_narrative = "Needs help with meals."
"#;
        let profile: SubjectProfile = toml::from_str(src).unwrap();
        assert_eq!(profile.stage, Stage::Advanced);
        assert_eq!(profile.narrative(), Some("Needs help with meals."));
    }

    #[test]
    fn blank_narrative_is_treated_as_absent() {
        let profile = SubjectProfile::new("p3", "Ann", 70, "MCI", Stage::Early)
            .with_case_narrative("   ");
        assert!(profile.narrative().is_none());
    }
}
