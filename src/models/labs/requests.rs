use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::pagination::deserialize_optional_i64;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/lab.ts")]
pub struct LabListParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub course_id: Option<i64>,
}

// 评分标准输入
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/lab.ts")]
pub struct CriterionInput {
    pub name: String,
    pub description: Option<String>,
    pub max_points: f64,
    pub weight: Option<f64>,
    pub response_key: Option<String>,
    pub expected_value: Option<String>,
}

impl CriterionInput {
    pub const DEFAULT_WEIGHT: f64 = 1.0;

    pub fn weight(&self) -> f64 {
        self.weight.unwrap_or(Self::DEFAULT_WEIGHT)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("criterion name is required".to_string());
        }
        if !(self.max_points > 0.0) {
            return Err(format!(
                "criterion '{}': max_points must be greater than 0",
                self.name
            ));
        }
        if !(self.weight() > 0.0) {
            return Err(format!(
                "criterion '{}': weight must be greater than 0",
                self.name
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/lab.ts")]
pub struct CreateLabRequest {
    pub course_id: i64,
    pub simulation_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub duration_minutes: Option<i32>,
    pub max_attempts: Option<i32>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub criteria: Vec<CriterionInput>,
}

impl CreateLabRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title is required".to_string());
        }
        if self.max_attempts.is_some_and(|n| n < 1) {
            return Err("max_attempts must be at least 1".to_string());
        }
        self.criteria.iter().try_for_each(CriterionInput::validate)
    }
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/lab.ts")]
pub struct UpdateLabRequest {
    pub simulation_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub duration_minutes: Option<i32>,
    pub max_attempts: Option<i32>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/lab.ts")]
pub struct SubmitLabRequest {
    pub session_id: i64,
    pub responses: Option<serde_json::Value>,
    #[serde(default)]
    pub is_autosave: bool,
}

impl SubmitLabRequest {
    /// 作答内容不能缺失或为空
    pub fn has_responses(&self) -> bool {
        match &self.responses {
            None | Some(serde_json::Value::Null) => false,
            Some(serde_json::Value::Object(map)) => !map.is_empty(),
            Some(serde_json::Value::Array(items)) => !items.is_empty(),
            Some(serde_json::Value::String(s)) => !s.trim().is_empty(),
            Some(_) => true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/lab.ts")]
pub struct StopLabRequest {
    pub session_id: i64,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/lab.ts")]
pub struct ScoreLabRequest {
    pub student_id: i64,
    pub submission_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/lab.ts")]
pub struct ManualScoreRequest {
    pub manual_score: Option<f64>,
    pub teacher_comments: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/lab.ts")]
pub struct AnnotateRequest {
    pub criterion_id: i64,
    pub points_awarded: f64,
    pub teacher_comment: Option<String>,
    pub annotation_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criterion(max_points: f64, weight: Option<f64>) -> CriterionInput {
        CriterionInput {
            name: "Accuracy".into(),
            description: None,
            max_points,
            weight,
            response_key: None,
            expected_value: None,
        }
    }

    #[test]
    fn test_criterion_validation() {
        assert!(criterion(10.0, None).validate().is_ok());
        assert_eq!(criterion(10.0, None).weight(), 1.0);
        assert!(criterion(0.0, None).validate().is_err());
        assert!(criterion(5.0, Some(0.0)).validate().is_err());
        assert!(criterion(f64::NAN, None).validate().is_err());
    }

    #[test]
    fn test_empty_responses_rejected() {
        let mut req = SubmitLabRequest {
            session_id: 1,
            responses: Some(serde_json::json!({})),
            is_autosave: false,
        };
        assert!(!req.has_responses());
        req.responses = Some(serde_json::json!({"q1": "4.9"}));
        assert!(req.has_responses());
        req.responses = None;
        assert!(!req.has_responses());
    }
}
