use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A job posting as returned by the job board (Remotive-style field names are
/// accepted as aliases).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobPosting {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(alias = "company_name")]
    pub company: String,
    #[serde(alias = "candidate_required_location")]
    pub location: String,
    pub url: String,
    pub category: String,
    pub job_type: String,
    pub salary: String,
    pub tags: Vec<String>,
    pub description: String,
    #[serde(alias = "publication_date")]
    pub published_at: Option<String>,
}

impl JobPosting {
    /// Key used to join LLM output back to a posting.
    pub fn title_key(&self) -> String {
        normalize_title(&self.title)
    }
}

pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remotive_fields_are_aliased() {
        let posting: JobPosting = serde_json::from_str(
            r#"{
                "id": 1843021,
                "title": "Senior Data Analyst",
                "company_name": "Acme",
                "candidate_required_location": "Worldwide",
                "url": "https://example.com/jobs/1",
                "tags": ["sql", "python"],
                "publication_date": "2024-05-01T10:00:00",
                "unknown_field": true
            }"#,
        )
        .unwrap();
        assert_eq!(posting.id, "1843021");
        assert_eq!(posting.company, "Acme");
        assert_eq!(posting.location, "Worldwide");
        assert_eq!(posting.published_at.as_deref(), Some("2024-05-01T10:00:00"));
        assert!(posting.salary.is_empty());
    }

    #[test]
    fn test_title_key_ignores_case_and_padding() {
        let posting = JobPosting {
            title: "  Backend Engineer ".to_string(),
            ..Default::default()
        };
        assert_eq!(posting.title_key(), "backend engineer");
    }
}
