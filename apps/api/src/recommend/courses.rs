//! Course suggestions: the static catalog, skill-gap analysis, and the optional remote
//! course feed.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cv::analysis::CvAnalysis;
use crate::jobs::models::JobPosting;
use crate::models::null_as_default;
use crate::recommend::matching::{extract_items, MatchParseError};

const FEED_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Course {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub provider: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub duration: String,
    #[serde(deserialize_with = "null_as_default")]
    pub level: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    pub relevance_reason: Option<String>,
}

struct CatalogEntry {
    title: &'static str,
    provider: &'static str,
    url: &'static str,
    duration: &'static str,
    level: &'static str,
    description: &'static str,
}

static CATALOG: [CatalogEntry; 6] = [
    CatalogEntry {
        title: "Google Data Analytics Professional Certificate",
        provider: "Coursera",
        url: "https://www.coursera.org/professional-certificates/google-data-analytics",
        duration: "6 months",
        level: "Beginner",
        description: "Spreadsheets, SQL, Tableau and R for entry-level data analysis.",
    },
    CatalogEntry {
        title: "CS50's Introduction to Computer Science",
        provider: "edX",
        url: "https://www.edx.org/course/introduction-computer-science-harvardx-cs50x",
        duration: "12 weeks",
        level: "Beginner",
        description: "Foundations of programming, algorithms and data structures.",
    },
    CatalogEntry {
        title: "Machine Learning Specialization",
        provider: "Coursera",
        url: "https://www.coursera.org/specializations/machine-learning-introduction",
        duration: "3 months",
        level: "Intermediate",
        description: "Supervised and unsupervised learning with Python and scikit-learn.",
    },
    CatalogEntry {
        title: "The Complete JavaScript Course",
        provider: "Udemy",
        url: "https://www.udemy.com/course/the-complete-javascript-course/",
        duration: "69 hours",
        level: "Beginner",
        description: "Modern JavaScript from the fundamentals to asynchronous code.",
    },
    CatalogEntry {
        title: "Foundations of Project Management",
        provider: "Coursera",
        url: "https://www.coursera.org/learn/project-management-foundations",
        duration: "4 weeks",
        level: "Beginner",
        description: "Project lifecycles, stakeholders and planning basics.",
    },
    CatalogEntry {
        title: "Effective Communication in the Workplace",
        provider: "LinkedIn Learning",
        url: "https://www.linkedin.com/learning/topics/communication",
        duration: "2 hours",
        level: "All levels",
        description: "Clear writing, presenting and feedback for professional settings.",
    },
];

/// The fixed course list served when no personalised suggestions are available.
pub fn course_catalog() -> Vec<Course> {
    CATALOG
        .iter()
        .map(|entry| Course {
            title: entry.title.to_string(),
            provider: entry.provider.to_string(),
            url: entry.url.to_string(),
            duration: entry.duration.to_string(),
            level: entry.level.to_string(),
            description: entry.description.to_string(),
            relevance_reason: None,
        })
        .collect()
}

/// Job tags not covered by any CV skill, most frequently requested first; ties are
/// ordered by name. Comparison is case-insensitive.
pub fn skill_gap(cv: &CvAnalysis, jobs: &[JobPosting]) -> Vec<String> {
    let known: HashSet<String> = cv
        .all_skills()
        .map(|s| s.trim().to_lowercase())
        .collect();

    // lowercased tag -> (first spelling seen, count)
    let mut missing: HashMap<String, (String, usize)> = HashMap::new();
    for tag in jobs.iter().flat_map(|job| &job.tags) {
        let tag = tag.trim();
        let key = tag.to_lowercase();
        if tag.is_empty() || known.contains(&key) {
            continue;
        }
        missing
            .entry(key)
            .or_insert_with(|| (tag.to_string(), 0))
            .1 += 1;
    }

    let mut gap: Vec<(String, String, usize)> = missing
        .into_iter()
        .map(|(key, (spelling, count))| (key, spelling, count))
        .collect();
    gap.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.0.cmp(&b.0)));
    gap.into_iter().map(|(_, spelling, _)| spelling).collect()
}

/// Parses an LLM course reply. Items without a title are dropped.
pub fn parse_course_response(reply: &str) -> Result<Vec<Course>, MatchParseError> {
    Ok(extract_items(reply)?
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Course>(item) {
            Ok(course) if !course.title.trim().is_empty() => Some(course),
            Ok(_) => None,
            Err(e) => {
                debug!("Dropping malformed course item: {e}");
                None
            }
        })
        .collect())
}

/// Remote course listing: a JSON array of courses at a fixed URL.
#[derive(Clone)]
pub struct CourseFeed {
    client: reqwest::Client,
    url: String,
}

impl CourseFeed {
    pub fn new(url: &str) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder()
                .timeout(FEED_TIMEOUT)
                .build()
                .context("failed to build course feed client")?,
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn fetch(&self) -> Result<Vec<Course>> {
        let courses: Vec<Course> = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("course feed request failed")?
            .error_for_status()
            .context("course feed returned an error status")?
            .json()
            .await
            .context("course feed returned invalid JSON")?;

        let courses: Vec<Course> = courses
            .into_iter()
            .filter(|c| !c.title.trim().is_empty())
            .collect();
        info!(count = courses.len(), "Fetched course feed");
        Ok(courses)
    }
}
