use std::collections::HashMap;

use serde::Deserialize;
use ts_rs::TS;

use super::entities::QuestionType;
use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exercise.ts")]
pub struct ExerciseListParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub simulation_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exercise.ts")]
pub struct CreateExerciseRequest {
    pub simulation_id: i64,
    #[serde(default)]
    pub question: String,
    pub question_type: QuestionType,
    pub options: Option<serde_json::Value>,
    pub correct_answer: Option<String>,
    pub points: Option<f64>,
    pub order_index: Option<i32>,
}

impl CreateExerciseRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.question.trim().is_empty() {
            return Err("question is required".to_string());
        }
        if self.points.is_some_and(|p| !(p > 0.0)) {
            return Err("points must be greater than 0".to_string());
        }
        match self.question_type {
            QuestionType::MultipleChoice => match &self.options {
                Some(serde_json::Value::Array(items)) if items.len() >= 2 => Ok(()),
                _ => Err("multiple_choice questions need at least two options".to_string()),
            },
            QuestionType::TrueFalse => match self.correct_answer.as_deref().map(str::trim) {
                None => Ok(()),
                Some(a) if a.eq_ignore_ascii_case("true") || a.eq_ignore_ascii_case("false") => {
                    Ok(())
                }
                Some(_) => Err("true_false answer must be 'true' or 'false'".to_string()),
            },
            QuestionType::Numeric => match self.correct_answer.as_deref() {
                Some(a) if a.trim().parse::<f64>().is_err() => {
                    Err("numeric answer must be a number".to_string())
                }
                _ => Ok(()),
            },
            QuestionType::ShortAnswer => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exercise.ts")]
pub struct UpdateExerciseRequest {
    pub question: Option<String>,
    pub question_type: Option<QuestionType>,
    pub options: Option<serde_json::Value>,
    pub correct_answer: Option<String>,
    pub points: Option<f64>,
    pub order_index: Option<i32>,
}

// 学生提交：answers 以题目 ID 为键
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exercise.ts")]
pub struct SubmitExercisesRequest {
    pub simulation_id: i64,
    pub answers: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exercise.ts")]
pub struct SubmissionListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub simulation_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub student_id: Option<i64>,
}

// 教师批改
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exercise.ts")]
pub struct GradeSubmissionRequest {
    pub scores: HashMap<String, f64>,
    pub feedbacks: Option<HashMap<String, String>>,
    pub teacher_feedback: Option<String>,
    #[serde(default)]
    pub is_draft: bool,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exercise.ts")]
pub struct ExerciseStatisticsParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub simulation_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(question_type: QuestionType) -> CreateExerciseRequest {
        CreateExerciseRequest {
            simulation_id: 1,
            question: "What is g on Earth?".into(),
            question_type,
            options: None,
            correct_answer: None,
            points: None,
            order_index: None,
        }
    }

    #[test]
    fn test_question_required() {
        let mut req = request(QuestionType::ShortAnswer);
        req.question = "   ".into();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_type_specific_rules() {
        let mut mc = request(QuestionType::MultipleChoice);
        assert!(mc.validate().is_err());
        mc.options = Some(serde_json::json!(["9.8", "1.6"]));
        assert!(mc.validate().is_ok());

        let mut numeric = request(QuestionType::Numeric);
        numeric.correct_answer = Some("nine".into());
        assert!(numeric.validate().is_err());
        numeric.correct_answer = Some("9.81".into());
        assert!(numeric.validate().is_ok());

        let mut tf = request(QuestionType::TrueFalse);
        tf.correct_answer = Some("TRUE".into());
        assert!(tf.validate().is_ok());
    }
}
