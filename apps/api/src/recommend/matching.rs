//! Parsing of the job-match reply.
//!
//! The model is asked for a JSON array of `{job_title, percent, pros, cons}`. Each item
//! is joined back to an input posting by normalized title; anything that cannot be
//! joined or validated is dropped, but a reply with no parseable array is an error.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::jobs::models::{normalize_title, JobPosting};
use crate::llm_client::extract_json_array;
use crate::models::null_as_default;

/// Postings sent to the model per request.
pub const MAX_MATCH_BATCH: usize = 10;

/// Failure to read a ranked list (jobs or courses) out of an LLM reply.
#[derive(Debug, Error)]
pub enum MatchParseError {
    #[error("LLM reply contains no JSON array")]
    NoArray { raw: String },

    #[error("LLM reply array is not valid JSON: {reason}")]
    InvalidJson { raw: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMatch {
    pub job: JobPosting,
    pub percent: u8,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawMatch {
    job_title: String,
    #[serde(deserialize_with = "lenient_percent")]
    percent: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pros: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    cons: Vec<String>,
}

/// `87`, `87.5`, `"87"` and `"87%"` are all accepted.
fn lenient_percent<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    })
}

/// Returns the first balanced JSON array in `reply`, parsed into raw items.
pub fn extract_items(reply: &str) -> Result<Vec<Value>, MatchParseError> {
    let array = extract_json_array(reply).ok_or_else(|| MatchParseError::NoArray {
        raw: reply.to_string(),
    })?;
    serde_json::from_str(array).map_err(|e| MatchParseError::InvalidJson {
        raw: reply.to_string(),
        reason: e.to_string(),
    })
}

/// Parses the reply and joins it to `jobs`.
///
/// Output is sorted by percent descending (ties keep reply order), holds each posting
/// at most once, and is never longer than `jobs`.
pub fn parse_match_response(
    reply: &str,
    jobs: &[JobPosting],
) -> Result<Vec<JobMatch>, MatchParseError> {
    let items = extract_items(reply)?;
    let mut used = HashSet::new();
    let mut matches = Vec::with_capacity(jobs.len());

    for item in items {
        let raw: RawMatch = match serde_json::from_value(item) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("Dropping malformed match item: {e}");
                continue;
            }
        };

        let Some(percent) = raw.percent.filter(|p| (0.0..=100.0).contains(p)) else {
            debug!(title = %raw.job_title, "Dropping match with missing or out-of-range percent");
            continue;
        };

        let key = normalize_title(&raw.job_title);
        let Some(index) = jobs
            .iter()
            .enumerate()
            .position(|(i, job)| !used.contains(&i) && job.title_key() == key)
        else {
            debug!(title = %raw.job_title, "Dropping match with no matching posting");
            continue;
        };
        used.insert(index);

        matches.push(JobMatch {
            job: jobs[index].clone(),
            percent: percent.round() as u8,
            pros: clean(raw.pros),
            cons: clean(raw.cons),
        });
    }

    matches.sort_by(|a, b| b.percent.cmp(&a.percent));
    matches.truncate(jobs.len());
    Ok(matches)
}

fn clean(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(title: &str) -> JobPosting {
        JobPosting {
            id: title.to_lowercase(),
            title: title.to_string(),
            ..Default::default()
        }
    }

    fn batch() -> Vec<JobPosting> {
        vec![job("Data Analyst"), job("Backend Engineer"), job("Product Manager")]
    }

    #[test]
    fn test_joins_filters_and_sorts() {
        let reply = r#"Here you go:
[
  {"job_title": "backend engineer ", "percent": 72, "pros": ["Python"], "cons": []},
  {"job_title": "Astronaut", "percent": 99, "pros": [], "cons": []},
  {"job_title": "Data Analyst", "percent": "88%", "pros": ["SQL", " "], "cons": ["No BI tools"]},
  {"job_title": "Product Manager", "percent": 140, "pros": [], "cons": []}
]"#;
        let matches = parse_match_response(reply, &batch()).unwrap();
        let titles: Vec<&str> = matches.iter().map(|m| m.job.title.as_str()).collect();
        assert_eq!(titles, vec!["Data Analyst", "Backend Engineer"]);
        assert_eq!(matches[0].percent, 88);
        assert_eq!(matches[0].pros, vec!["SQL"]);
    }

    #[test]
    fn test_each_posting_matched_once() {
        let reply = r#"[
            {"job_title": "Data Analyst", "percent": 80},
            {"job_title": "DATA ANALYST", "percent": 95}
        ]"#;
        let matches = parse_match_response(reply, &batch()).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].percent, 80);
    }

    #[test]
    fn test_duplicate_titles_in_batch_match_separately() {
        let jobs = vec![job("Engineer"), job("Engineer")];
        let reply = r#"[{"job_title": "Engineer", "percent": 60}, {"job_title": "Engineer", "percent": 70}]"#;
        let matches = parse_match_response(reply, &jobs).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].percent, 70);
    }

    #[test]
    fn test_ties_keep_reply_order() {
        let reply = r#"[
            {"job_title": "Product Manager", "percent": 50},
            {"job_title": "Data Analyst", "percent": 50}
        ]"#;
        let matches = parse_match_response(reply, &batch()).unwrap();
        assert_eq!(matches[0].job.title, "Product Manager");
        assert_eq!(matches[1].job.title, "Data Analyst");
    }

    #[test]
    fn test_malformed_items_dropped() {
        let reply = r#"[{"percent": 50}, "text", {"job_title": "Data Analyst", "percent": null}, {"job_title": "Backend Engineer", "percent": 40.6}]"#;
        let matches = parse_match_response(reply, &batch()).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].percent, 41);
    }

    #[test]
    fn test_null_pros_or_cons_keep_the_match() {
        let reply = r#"[
            {"job_title": "Data Analyst", "percent": 88, "pros": ["SQL"], "cons": null},
            {"job_title": "Backend Engineer", "percent": 60, "pros": null}
        ]"#;
        let matches = parse_match_response(reply, &batch()).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].pros, vec!["SQL"]);
        assert!(matches[0].cons.is_empty());
        assert!(matches[1].pros.is_empty());
    }

    #[test]
    fn test_bracketed_aside_before_array_skipped() {
        let reply = "Scores [0-100] for each job:\n[{\"job_title\": \"Data Analyst\", \"percent\": 88, \"pros\": [\"SQL\"], \"cons\": []}]";
        let matches = parse_match_response(reply, &batch()).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].percent, 88);
    }

    #[test]
    fn test_non_json_reply_is_error() {
        let err = parse_match_response("I could not score these jobs.", &batch()).unwrap_err();
        assert!(matches!(err, MatchParseError::NoArray { raw } if raw.contains("could not")));
    }

    #[test]
    fn test_truncated_reply_is_error() {
        let reply = r#"[{"job_title": "Data Analyst", "percent": 88, "pros": ["SQL"#;
        assert!(matches!(
            parse_match_response(reply, &batch()),
            Err(MatchParseError::NoArray { .. })
        ));
    }

    #[test]
    fn test_invalid_array_is_error() {
        let reply = "[{job_title: Data Analyst}]";
        assert!(matches!(
            parse_match_response(reply, &batch()),
            Err(MatchParseError::InvalidJson { .. })
        ));
    }

    #[test]
    fn test_empty_array_is_empty_success() {
        assert!(parse_match_response("[]", &batch()).unwrap().is_empty());
    }
}
