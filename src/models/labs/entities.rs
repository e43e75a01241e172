use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 实验
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/lab.ts")]
pub struct Lab {
    pub id: i64,
    pub course_id: i64,
    pub simulation_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub duration_minutes: Option<i32>,
    pub max_attempts: Option<i32>,
    pub is_published: bool,
    pub created_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 评分标准
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/lab.ts")]
pub struct RubricCriterion {
    pub id: i64,
    pub lab_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub max_points: f64,
    pub weight: f64,
    pub order_index: i32,
    pub response_key: Option<String>,
    pub expected_value: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/lab.ts")]
pub enum LabSessionStatus {
    InProgress,
    Submitted,
    Abandoned,
}

crate::impl_str_enum!(LabSessionStatus {
    InProgress => "in_progress",
    Submitted => "submitted",
    Abandoned => "abandoned",
});

// 实验会话（一次作答尝试）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/lab.ts")]
pub struct LabSession {
    pub id: i64,
    pub lab_id: i64,
    pub student_id: i64,
    pub status: LabSessionStatus,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub end_time: Option<chrono::DateTime<chrono::Utc>>,
    pub duration_minutes: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl LabSession {
    pub fn is_ended(&self) -> bool {
        self.end_time.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/lab.ts")]
pub struct LabSubmission {
    pub id: i64,
    pub session_id: i64,
    pub lab_id: i64,
    pub student_id: i64,
    pub responses: Option<serde_json::Value>,
    pub autosave_data: Option<serde_json::Value>,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 单项评分明细
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/lab.ts")]
pub struct BreakdownEntry {
    pub criterion_id: i64,
    pub name: String,
    pub max_points: f64,
    pub awarded_points: f64,
    pub teacher_comment: Option<String>,
    pub annotation_type: String,
    pub percentage: f64,
}

// 实验成绩
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/lab.ts")]
pub struct LabScore {
    pub id: i64,
    pub lab_id: i64,
    pub student_id: i64,
    pub submission_id: Option<i64>,
    pub auto_score: Option<f64>,
    pub manual_score: Option<f64>,
    pub final_score: Option<f64>,
    pub max_score: f64,
    pub rubric_breakdown: Vec<BreakdownEntry>,
    pub teacher_comments: Option<String>,
    pub graded_by: Option<i64>,
    pub graded_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 教师逐项批注
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/lab.ts")]
pub struct ScoreAnnotation {
    pub id: i64,
    pub score_id: i64,
    pub criterion_id: i64,
    pub points_awarded: f64,
    pub teacher_comment: Option<String>,
    pub annotation_type: String,
    pub created_by: Option<i64>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 成绩及学生姓名
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/lab.ts")]
pub struct LabScoreWithStudent {
    #[serde(flatten)]
    #[ts(flatten)]
    pub score: LabScore,
    pub student_name: String,
}
