use serde::Serialize;
use ts_rs::TS;

use super::entities::{
    Lab, LabScore, LabScoreWithStudent, LabSession, LabSubmission, RubricCriterion,
    ScoreAnnotation,
};

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/lab.ts")]
pub struct LabDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub lab: Lab,
    pub criteria: Vec<RubricCriterion>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/lab.ts")]
pub struct LabResponse {
    pub lab: LabDetail,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/lab.ts")]
pub struct LabListResponse {
    pub items: Vec<Lab>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/lab.ts")]
pub struct StartLabResponse {
    pub session: LabSession,
    pub lab: Lab,
    pub criteria: Vec<RubricCriterion>,
    pub is_resuming: bool,
    pub simulation_url: Option<String>,
}

// 超出尝试次数时返回
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/lab.ts")]
pub struct AttemptsExceeded {
    pub attempts_used: i64,
    pub max_attempts: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/lab.ts")]
pub struct SubmitLabResponse {
    pub submission: LabSubmission,
    pub session: LabSession,
    pub is_autosave: bool,
    pub score: Option<LabScore>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/lab.ts")]
pub struct StopLabResponse {
    pub session: LabSession,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/lab.ts")]
pub struct ScoreResponse {
    pub score: LabScore,
    pub criteria: Vec<RubricCriterion>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/lab.ts")]
pub struct StudentScoreResponse {
    pub score: Option<LabScore>,
    pub annotations: Vec<ScoreAnnotation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/lab.ts")]
pub struct ScoreStatistics {
    pub count: i64,
    pub graded_count: i64,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/lab.ts")]
pub struct LabScoresResponse {
    pub scores: Vec<LabScoreWithStudent>,
    pub statistics: ScoreStatistics,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/lab.ts")]
pub struct AnalyticsRow {
    pub student_id: i64,
    pub name: String,
    pub final_score: Option<f64>,
    pub max_score: f64,
    pub percentage: f64,
    pub letter_grade: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/lab.ts")]
pub struct GradeDistribution {
    #[serde(rename = "A")]
    pub a: i64,
    #[serde(rename = "B")]
    pub b: i64,
    #[serde(rename = "C")]
    pub c: i64,
    #[serde(rename = "D")]
    pub d: i64,
    #[serde(rename = "F")]
    pub f: i64,
    #[serde(rename = "Not Graded")]
    pub not_graded: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/lab.ts")]
pub struct LabAnalyticsResponse {
    pub rows: Vec<AnalyticsRow>,
    pub distribution: GradeDistribution,
    pub average_percentage: f64,
    pub submission_count: i64,
}
