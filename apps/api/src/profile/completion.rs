use serde::{Deserialize, Serialize};

/// Pipeline stages that count towards profile completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileStage {
    Registered,
    Contact,
    CvAnalyzed,
    MbtiCompleted,
}

impl ProfileStage {
    pub const ALL: [ProfileStage; 4] = [
        ProfileStage::Registered,
        ProfileStage::Contact,
        ProfileStage::CvAnalyzed,
        ProfileStage::MbtiCompleted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProfileStage::Registered => "registered",
            ProfileStage::Contact => "contact",
            ProfileStage::CvAnalyzed => "cv_analyzed",
            ProfileStage::MbtiCompleted => "mbti_completed",
        }
    }

    /// Percentage points the stage contributes. Weights sum to 100.
    pub fn weight(self) -> i32 {
        match self {
            ProfileStage::Registered => 20,
            ProfileStage::Contact => 20,
            ProfileStage::CvAnalyzed => 40,
            ProfileStage::MbtiCompleted => 20,
        }
    }
}

/// Sum of weights of the distinct known stages in `stages`.
pub fn completion_for(stages: &[String]) -> i32 {
    ProfileStage::ALL
        .into_iter()
        .filter(|stage| stages.iter().any(|s| s == stage.as_str()))
        .map(ProfileStage::weight)
        .sum::<i32>()
        .clamp(0, 100)
}

/// Adds `new_stages` to `stages` (deduplicated, stable order) and returns the new
/// completion. Never lower than `current`.
pub fn advance(current: i32, stages: &mut Vec<String>, new_stages: &[ProfileStage]) -> i32 {
    for stage in new_stages {
        if !stages.iter().any(|s| s == stage.as_str()) {
            stages.push(stage.as_str().to_string());
        }
    }
    current.max(completion_for(stages)).clamp(0, 100)
}
