//! Static demo data, served whenever live recommendations are unavailable.

use async_trait::async_trait;

use crate::cv::analysis::CvAnalysis;
use crate::errors::AppError;
use crate::jobs::models::JobPosting;
use crate::recommend::courses::{course_catalog, Course};
use crate::recommend::matching::JobMatch;
use crate::recommend::source::Recommender;

struct DemoJob {
    id: &'static str,
    title: &'static str,
    company: &'static str,
    location: &'static str,
    category: &'static str,
    tags: &'static [&'static str],
    description: &'static str,
    percent: u8,
    pros: &'static [&'static str],
    cons: &'static [&'static str],
}

// Sorted by percent, highest first.
static DEMO_JOBS: [DemoJob; 4] = [
    DemoJob {
        id: "demo-1",
        title: "Junior Data Analyst",
        company: "Nusantara Retail",
        location: "Jakarta, Indonesia",
        category: "Data",
        tags: &["SQL", "Excel", "Tableau"],
        description: "Build weekly sales dashboards and support the merchandising team with ad-hoc analysis.",
        percent: 86,
        pros: &["Analytical background", "Comfortable with spreadsheets"],
        cons: &["Limited BI tool experience"],
    },
    DemoJob {
        id: "demo-2",
        title: "Business Operations Associate",
        company: "Kopi Kita",
        location: "Bandung, Indonesia",
        category: "Operations",
        tags: &["Excel", "Communication", "Process improvement"],
        description: "Coordinate store operations data and help standardise processes across branches.",
        percent: 78,
        pros: &["Organised and detail-oriented", "Good communicator"],
        cons: &["Little operations experience"],
    },
    DemoJob {
        id: "demo-3",
        title: "Frontend Developer",
        company: "Lumbung Tech",
        location: "Remote",
        category: "Software Development",
        tags: &["JavaScript", "React", "CSS"],
        description: "Ship features for a B2B marketplace web app together with designers and backend engineers.",
        percent: 64,
        pros: &["Eager to learn new tools"],
        cons: &["No production JavaScript projects yet"],
    },
    DemoJob {
        id: "demo-4",
        title: "Customer Success Specialist",
        company: "Awan Cloud",
        location: "Surabaya, Indonesia",
        category: "Customer Service",
        tags: &["Communication", "CRM", "Problem solving"],
        description: "Onboard new SaaS customers and turn their feedback into product requests.",
        percent: 59,
        pros: &["Strong interpersonal skills"],
        cons: &["No CRM experience"],
    },
];

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn posting(job: &DemoJob) -> JobPosting {
    JobPosting {
        id: job.id.to_string(),
        title: job.title.to_string(),
        company: job.company.to_string(),
        location: job.location.to_string(),
        category: job.category.to_string(),
        job_type: "full_time".to_string(),
        tags: to_strings(job.tags),
        description: job.description.to_string(),
        ..Default::default()
    }
}

/// Postings used when the job board is unreachable.
pub fn demo_postings() -> Vec<JobPosting> {
    DEMO_JOBS.iter().map(posting).collect()
}

pub fn demo_matches() -> Vec<JobMatch> {
    DEMO_JOBS
        .iter()
        .map(|job| JobMatch {
            job: posting(job),
            percent: job.percent,
            pros: to_strings(job.pros),
            cons: to_strings(job.cons),
        })
        .collect()
}

/// Generic summary assembled from the CV itself, without a model.
pub fn demo_summary(cv: &CvAnalysis) -> String {
    let skills: Vec<&str> = cv.all_skills().take(5).collect();
    let opening = match cv.name.as_deref() {
        Some(name) => format!("{name}, your CV"),
        None => "Your CV".to_string(),
    };
    if skills.is_empty() {
        return format!(
            "{opening} is ready for review. Add your key skills so we can suggest matching roles."
        );
    }
    format!(
        "{opening} highlights {}. These skills suit entry to mid-level roles that value them.",
        skills.join(", ")
    )
}

/// Serves the static demo data; never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoRecommender;

#[async_trait]
impl Recommender for DemoRecommender {
    async fn match_jobs(
        &self,
        _cv: &CvAnalysis,
        _jobs: &[JobPosting],
    ) -> Result<Vec<JobMatch>, AppError> {
        Ok(demo_matches())
    }

    async fn recommend_courses(
        &self,
        _cv: &CvAnalysis,
        _jobs: &[JobPosting],
    ) -> Result<Vec<Course>, AppError> {
        Ok(course_catalog())
    }

    async fn summarize_skills(&self, cv: &CvAnalysis) -> Result<String, AppError> {
        Ok(demo_summary(cv))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_matches_sorted_and_in_range() {
        let matches = demo_matches();
        assert!(matches.windows(2).all(|w| w[0].percent >= w[1].percent));
        assert!(matches.iter().all(|m| m.percent <= 100));
        assert_eq!(matches.len(), demo_postings().len());
    }

    #[test]
    fn test_demo_summary_mentions_skills() {
        let cv = CvAnalysis {
            name: Some("Budi".to_string()),
            skills: vec!["Go".to_string(), "Postgres".to_string()],
            ..Default::default()
        };
        let summary = demo_summary(&cv);
        assert!(summary.starts_with("Budi, your CV"));
        assert!(summary.contains("Go, Postgres"));
        assert!(demo_summary(&CvAnalysis::default()).starts_with("Your CV is ready"));
    }
}
