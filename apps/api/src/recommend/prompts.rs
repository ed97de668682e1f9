// Prompts for job matching, course suggestions and the skill summary.

use serde::Serialize;

use crate::cv::analysis::CvAnalysis;
use crate::jobs::models::JobPosting;
use crate::llm_client::prompts::{as_prompt_json, JSON_ONLY_SYSTEM, NO_INVENTION_INSTRUCTION};

/// Posting descriptions are cut to this many characters before prompting.
const DESCRIPTION_CHARS: usize = 600;

/// Job match prompt template. Replace `{cv_json}` and `{jobs_json}` before sending.
pub const JOB_MATCH_PROMPT_TEMPLATE: &str = r#"Score how well the candidate fits each job below.

Return a JSON array with one object per job, using this EXACT schema:
[
  {
    "job_title": "Exact title of the job as given",
    "percent": 85,
    "pros": ["Why the candidate fits"],
    "cons": ["What the candidate is missing"]
  }
]

Rules:
- "job_title" MUST be copied exactly from the job list.
- "percent" is an integer from 0 to 100.
- Give 1 to 3 short pros and 1 to 3 short cons per job.
- Consider skills, hidden skills, experience, education and MBTI type.

CANDIDATE:
{cv_json}

JOBS:
{jobs_json}"#;

/// Course prompt template. Replace `{cv_json}` and `{skill_gap}` before sending.
pub const COURSE_PROMPT_TEMPLATE: &str = r#"Recommend online courses that close the candidate's skill gap.

Return a JSON array of at most 6 objects using this EXACT schema:
[
  {
    "title": "Course title",
    "provider": "Coursera, edX, Udemy, ...",
    "url": "https://...",
    "duration": "4 weeks",
    "level": "Beginner | Intermediate | Advanced",
    "description": "One sentence on what the course covers",
    "relevance_reason": "Which missing skill it addresses and why"
  }
]

Only recommend real, publicly available courses.

CANDIDATE:
{cv_json}

SKILLS REQUESTED BY JOBS BUT MISSING FROM THE CV (most requested first):
{skill_gap}"#;

/// Skill summary prompt template. Replace `{cv_json}` before sending.
pub const SKILL_SUMMARY_PROMPT_TEMPLATE: &str = r#"Write a short summary (3 to 4 sentences) of the candidate's strongest skills and the kind of roles they suit.
Write in the second person ("You ..."). Plain prose only: no lists, no markdown, no JSON.
{no_invention}

CANDIDATE:
{cv_json}"#;

pub const SKILL_SUMMARY_SYSTEM: &str =
    "You are a friendly career coach who summarises CVs honestly and concisely.";

pub fn job_match_system() -> String {
    format!("You are an experienced technical recruiter. {JSON_ONLY_SYSTEM}")
}

pub fn course_system() -> String {
    format!("You are a career development advisor. {JSON_ONLY_SYSTEM}")
}

/// The slice of a posting the model needs.
#[derive(Serialize)]
struct PromptJob<'a> {
    title: &'a str,
    company: &'a str,
    location: &'a str,
    tags: &'a [String],
    description: String,
}

fn prompt_jobs(jobs: &[JobPosting]) -> String {
    let jobs: Vec<PromptJob<'_>> = jobs
        .iter()
        .map(|job| PromptJob {
            title: &job.title,
            company: &job.company,
            location: &job.location,
            tags: &job.tags,
            description: job.description.chars().take(DESCRIPTION_CHARS).collect(),
        })
        .collect();
    as_prompt_json(&jobs)
}

pub fn build_job_match_prompt(cv: &CvAnalysis, jobs: &[JobPosting]) -> String {
    JOB_MATCH_PROMPT_TEMPLATE
        .replace("{jobs_json}", &prompt_jobs(jobs))
        .replace("{cv_json}", &as_prompt_json(cv))
}

pub fn build_course_prompt(cv: &CvAnalysis, skill_gap: &[String]) -> String {
    let gap = if skill_gap.is_empty() {
        "(none found; suggest courses that deepen the candidate's existing strengths)".to_string()
    } else {
        skill_gap.join(", ")
    };
    COURSE_PROMPT_TEMPLATE
        .replace("{skill_gap}", &gap)
        .replace("{cv_json}", &as_prompt_json(cv))
}

pub fn build_skill_summary_prompt(cv: &CvAnalysis) -> String {
    SKILL_SUMMARY_PROMPT_TEMPLATE
        .replace("{no_invention}", NO_INVENTION_INSTRUCTION)
        .replace("{cv_json}", &as_prompt_json(cv))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_prompt_lists_titles_and_truncates_descriptions() {
        let jobs = vec![JobPosting {
            title: "Data Analyst".to_string(),
            description: "x".repeat(5000),
            ..Default::default()
        }];
        let prompt = build_job_match_prompt(&CvAnalysis::default(), &jobs);
        assert!(prompt.contains("\"title\": \"Data Analyst\""));
        assert!(!prompt.contains(&"x".repeat(DESCRIPTION_CHARS + 1)));
        assert!(!prompt.contains("{jobs_json}"));
    }

    #[test]
    fn test_course_prompt_lists_gap() {
        let prompt = build_course_prompt(
            &CvAnalysis::default(),
            &["Docker".to_string(), "AWS".to_string()],
        );
        assert!(prompt.ends_with("Docker, AWS"));
    }
}
