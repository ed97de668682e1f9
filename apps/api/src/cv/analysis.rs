//! CV analysis schema and the validated parse of LLM output into it.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::llm_client::{extract_json_object, strip_json_fences};
use crate::mbti::normalize_type_code;
use crate::models::null_as_default;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("not valid JSON: {reason}")]
    NotJson { raw: String, reason: String },

    #[error("JSON does not match the CV schema: {reason}")]
    Schema { raw: String, reason: String },

    #[error("{0}")]
    Invalid(String),
}

/// A skill the model inferred rather than read verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HiddenSkill {
    #[serde(deserialize_with = "null_as_default")]
    pub skill: String,
    #[serde(deserialize_with = "null_as_default")]
    pub inferred_from: String,
    #[serde(deserialize_with = "null_as_default")]
    pub explanation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkExperience {
    pub company: Option<String>,
    pub position: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizationalExperience {
    pub organization: Option<String>,
    pub role: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

/// The derived analysis document stored next to every uploaded CV.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CvAnalysis {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub mbti: Option<String>,
    pub summary: Option<String>,
    #[serde(deserialize_with = "lenient_years")]
    pub years_of_experience: Option<f32>,
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub soft_skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub hard_skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub hidden_skills: Vec<HiddenSkill>,
    #[serde(deserialize_with = "null_as_default")]
    pub education: Vec<Education>,
    #[serde(deserialize_with = "null_as_default")]
    pub work_experience: Vec<WorkExperience>,
    #[serde(deserialize_with = "null_as_default")]
    pub organizational_experience: Vec<OrganizationalExperience>,
}

/// Accepts `3`, `3.5`, `"3"`, `"3+ years"` or null.
fn lenient_years<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64().map(|f| f as f32),
        Some(Value::String(s)) => {
            let digits: String = s
                .trim()
                .chars()
                .take_while(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            digits.parse::<f32>().ok()
        }
        _ => None,
    }
    .filter(|y| y.is_finite() && *y >= 0.0))
}

impl CvAnalysis {
    /// Overrides location and MBTI with values the user supplied alongside the upload.
    pub fn merge_user_fields(&mut self, location: Option<String>, mbti: Option<String>) {
        if let Some(location) = location {
            self.location = Some(location);
        }
        if let Some(mbti) = mbti {
            self.mbti = Some(mbti);
        }
    }

    /// Every skill the analysis knows about, explicit or inferred.
    pub fn all_skills(&self) -> impl Iterator<Item = &str> {
        self.skills
            .iter()
            .chain(&self.hard_skills)
            .chain(&self.soft_skills)
            .map(String::as_str)
            .chain(self.hidden_skills.iter().map(|h| h.skill.as_str()))
    }

    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.all_skills().next().is_none()
            && self.education.is_empty()
            && self.work_experience.is_empty()
            && self.organizational_experience.is_empty()
    }

    fn normalize(&mut self) {
        for field in [
            &mut self.name,
            &mut self.email,
            &mut self.phone,
            &mut self.location,
            &mut self.mbti,
            &mut self.summary,
        ] {
            clean_opt(field);
        }
        // Variants like "INTJ-A" are not one of the 16 codes.
        self.mbti = self.mbti.as_deref().and_then(normalize_type_code);
        for list in [
            &mut self.skills,
            &mut self.soft_skills,
            &mut self.hard_skills,
        ] {
            clean_list(list);
        }
        self.hidden_skills.retain_mut(|h| {
            h.skill = h.skill.trim().to_string();
            !h.skill.is_empty()
        });
        self.education.retain(|e| *e != Education::default());
        self.work_experience.retain(|w| *w != WorkExperience::default());
        self.organizational_experience
            .retain(|o| *o != OrganizationalExperience::default());
    }
}

fn clean_opt(field: &mut Option<String>) {
    *field = field
        .take()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("null"));
}

/// Trims entries, drops blanks, and removes case-insensitive duplicates keeping the
/// first spelling.
fn clean_list(list: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    list.retain_mut(|s| {
        *s = s.trim().to_string();
        !s.is_empty() && seen.insert(s.to_lowercase())
    });
}

/// Parses an LLM reply into a validated `CvAnalysis`.
///
/// Accepts bare JSON, fenced JSON, or JSON surrounded by prose. The top-level value
/// must be an object; fields are type-checked against the schema and normalized.
pub fn parse_cv_analysis(reply: &str) -> Result<CvAnalysis, AnalysisError> {
    let value: Value = match serde_json::from_str(strip_json_fences(reply)) {
        Ok(value) => value,
        Err(first_err) => extract_json_object(reply)
            .and_then(|obj| serde_json::from_str(obj).ok())
            .ok_or_else(|| AnalysisError::NotJson {
                raw: reply.to_string(),
                reason: first_err.to_string(),
            })?,
    };

    if !value.is_object() {
        return Err(AnalysisError::Schema {
            raw: reply.to_string(),
            reason: "expected a JSON object at the top level".to_string(),
        });
    }

    let mut analysis: CvAnalysis =
        serde_json::from_value(value).map_err(|e| AnalysisError::Schema {
            raw: reply.to_string(),
            reason: e.to_string(),
        })?;

    analysis.normalize();

    if analysis.is_empty() {
        return Err(AnalysisError::Invalid(
            "no name, skills, education or experience could be recognised".to_string(),
        ));
    }

    Ok(analysis)
}
