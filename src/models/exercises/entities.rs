use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/exercise.ts")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
    Numeric,
}

crate::impl_str_enum!(QuestionType {
    MultipleChoice => "multiple_choice",
    TrueFalse => "true_false",
    ShortAnswer => "short_answer",
    Numeric => "numeric",
});

// 练习题
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exercise.ts")]
pub struct Exercise {
    pub id: i64,
    pub simulation_id: i64,
    pub question: String,
    pub question_type: QuestionType,
    pub options: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    pub points: f64,
    pub order_index: i32,
    pub created_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Exercise {
    /// 学生视图隐藏答案
    pub fn without_answer(mut self) -> Self {
        self.correct_answer = None;
        self
    }
}

// 单题判分结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exercise.ts")]
pub struct AnswerDetail {
    pub answer: serde_json::Value,
    pub is_correct: bool,
    pub score: f64,
    pub max_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

// 练习提交（details 以题目 ID 为键）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exercise.ts")]
pub struct ExerciseSubmission {
    pub id: i64,
    pub simulation_id: i64,
    pub student_id: i64,
    pub answers: serde_json::Value,
    pub details: BTreeMap<String, AnswerDetail>,
    pub total_score: f64,
    pub max_score: f64,
    pub teacher_feedback: Option<String>,
    pub is_graded: bool,
    pub graded_by: Option<i64>,
    pub graded_at: Option<chrono::DateTime<chrono::Utc>>,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

impl ExerciseSubmission {
    pub fn percentage(&self) -> f64 {
        if self.max_score > 0.0 {
            self.total_score / self.max_score * 100.0
        } else {
            0.0
        }
    }
}
