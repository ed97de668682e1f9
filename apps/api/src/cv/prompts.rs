// Prompts for the CV extraction call.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, NO_INVENTION_INSTRUCTION};

/// Extraction prompt template. Replace `{cv_text}` before sending.
pub const CV_EXTRACT_PROMPT_TEMPLATE: &str = r#"Extract structured information from the CV below.

Return a JSON object with this EXACT schema (no extra fields):
{
  "name": "Full name or null",
  "email": "Email address or null",
  "phone": "Phone number or null",
  "location": "City / country or null",
  "summary": "Two-sentence professional summary or null",
  "years_of_experience": 3,
  "skills": ["Python", "SQL"],
  "hard_skills": ["Data visualisation"],
  "soft_skills": ["Communication"],
  "hidden_skills": [
    {
      "skill": "Stakeholder management",
      "inferred_from": "Coordinated quarterly reviews with three departments",
      "explanation": "Regular cross-team coordination implies managing expectations"
    }
  ],
  "education": [
    {
      "institution": "Universitas Indonesia",
      "degree": "Bachelor",
      "field_of_study": "Computer Science",
      "start_date": "2017",
      "end_date": "2021",
      "gpa": "3.6"
    }
  ],
  "work_experience": [
    {
      "company": "Acme",
      "position": "Data Analyst",
      "start_date": "2021-08",
      "end_date": "Present",
      "description": "What the role involved",
      "achievements": ["Cut reporting time by 40%"]
    }
  ],
  "organizational_experience": [
    {
      "organization": "Student Union",
      "role": "Treasurer",
      "start_date": "2019",
      "end_date": "2020",
      "description": "What the role involved"
    }
  ]
}

Rules:
- "skills" lists every skill stated explicitly in the CV.
- "hidden_skills" lists skills NOT stated explicitly but strongly implied by an
  experience or achievement. Quote the source line in "inferred_from".
- "years_of_experience" is the total of professional work experience as a number.
- Keep dates as written in the CV.
- {no_invention}

CV TEXT:
{cv_text}"#;

pub fn cv_extract_system() -> String {
    format!(
        "You are an experienced recruiter who reads CVs and extracts their content \
        into structured data. {JSON_ONLY_SYSTEM}"
    )
}

pub fn build_cv_extract_prompt(cv_text: &str) -> String {
    CV_EXTRACT_PROMPT_TEMPLATE
        .replace("{no_invention}", NO_INVENTION_INSTRUCTION)
        .replace("{cv_text}", cv_text)
}
