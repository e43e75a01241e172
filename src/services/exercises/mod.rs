pub mod crud;
pub mod grading;
pub mod submissions;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::models::{
    achievements::entities::Achievement,
    exercises::{
        entities::{AnswerDetail, Exercise},
        requests::{
            CreateExerciseRequest, ExerciseListParams, ExerciseStatisticsParams,
            GradeSubmissionRequest, SubmissionListParams, SubmitExercisesRequest,
            UpdateExerciseRequest,
        },
    },
};
use crate::services::labs::scoring::{answers_match, response_text};
use crate::storage::Storage;

pub struct ExerciseService {
    storage: Option<Arc<dyn Storage>>,
}

/// 自动批改结果
#[derive(Debug, Clone, PartialEq)]
pub struct AutoGrade {
    pub details: BTreeMap<String, AnswerDetail>,
    pub total_score: f64,
    pub max_score: f64,
}

/// 逐题判分；未作答或没有标准答案的题记 0 分
pub fn auto_grade(exercises: &[Exercise], answers: &HashMap<String, serde_json::Value>) -> AutoGrade {
    let mut details = BTreeMap::new();
    let mut total_score = 0.0;
    let mut max_score = 0.0;

    for exercise in exercises {
        let key = exercise.id.to_string();
        let answer = answers.get(&key).cloned().unwrap_or(serde_json::Value::Null);
        let is_correct = match (response_text(&answer), &exercise.correct_answer) {
            (Some(given), Some(expected)) => answers_match(&given, expected),
            _ => false,
        };
        let score = if is_correct { exercise.points } else { 0.0 };

        total_score += score;
        max_score += exercise.points;
        details.insert(
            key,
            AnswerDetail {
                answer,
                is_correct,
                score,
                max_score: exercise.points,
                feedback: None,
            },
        );
    }

    AutoGrade {
        details,
        total_score,
        max_score,
    }
}

/// 合并教师给分与评语，返回新的明细与总分
pub fn merge_grades(
    mut details: BTreeMap<String, AnswerDetail>,
    answers: &serde_json::Value,
    grade: &GradeSubmissionRequest,
) -> Result<(BTreeMap<String, AnswerDetail>, f64), String> {
    for (exercise_id, score) in &grade.scores {
        if !score.is_finite() || *score < 0.0 {
            return Err(format!("score for exercise {exercise_id} must be non-negative"));
        }
        let detail = details
            .entry(exercise_id.clone())
            .or_insert_with(|| AnswerDetail {
                answer: answers
                    .get(exercise_id)
                    .cloned()
                    .unwrap_or(serde_json::Value::Null),
                is_correct: false,
                score: 0.0,
                max_score: *score,
                feedback: None,
            });
        if *score > detail.max_score {
            return Err(format!(
                "score for exercise {exercise_id} exceeds its maximum of {}",
                detail.max_score
            ));
        }
        detail.score = *score;
        detail.is_correct = *score > 0.0;
    }

    if let Some(feedbacks) = &grade.feedbacks {
        for (exercise_id, feedback) in feedbacks {
            if let Some(detail) = details.get_mut(exercise_id) {
                detail.feedback = Some(feedback.clone());
            }
        }
    }

    let total = details.values().map(|d| d.score).sum();
    Ok((details, total))
}

/// 分数阈值成就是否满足；已获得的由存储层判重
pub fn threshold_reached(achievement: &Achievement, percentage: f64, simulation_id: i64) -> bool {
    if !achievement.is_active || achievement.achievement_type != Achievement::SCORE_THRESHOLD {
        return false;
    }
    let Some(criteria) = &achievement.criteria else {
        return false;
    };
    let Some(min_percentage) = criteria.get("min_percentage").and_then(|v| v.as_f64()) else {
        return false;
    };
    if let Some(required) = criteria.get("simulation_id").and_then(|v| v.as_i64())
        && required != simulation_id
    {
        return false;
    }
    percentage >= min_percentage
}

impl ExerciseService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn list_exercises(
        &self,
        query: ExerciseListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        crud::list_exercises(self, query, request).await
    }

    pub async fn create_exercise(
        &self,
        exercise: CreateExerciseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        crud::create_exercise(self, exercise, request).await
    }

    pub async fn update_exercise(
        &self,
        exercise_id: i64,
        update: UpdateExerciseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        crud::update_exercise(self, exercise_id, update, request).await
    }

    pub async fn delete_exercise(
        &self,
        exercise_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        crud::delete_exercise(self, exercise_id, request).await
    }

    // 学生提交并自动批改
    pub async fn submit(
        &self,
        submit: SubmitExercisesRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submissions::submit_exercises(self, submit, request).await
    }

    pub async fn list_submissions(
        &self,
        query: SubmissionListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submissions::list_submissions(self, query, request).await
    }

    pub async fn get_submission(
        &self,
        submission_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submissions::get_submission(self, submission_id, request).await
    }

    // 教师批改
    pub async fn grade_submission(
        &self,
        submission_id: i64,
        grade: GradeSubmissionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        grading::grade_submission(self, submission_id, grade, request).await
    }

    pub async fn statistics(
        &self,
        query: ExerciseStatisticsParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        grading::statistics(self, query, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::exercises::entities::QuestionType;
    use serde_json::json;

    fn exercise(id: i64, answer: Option<&str>, points: f64) -> Exercise {
        Exercise {
            id,
            simulation_id: 5,
            question: format!("q{id}"),
            question_type: QuestionType::ShortAnswer,
            options: None,
            correct_answer: answer.map(str::to_string),
            points,
            order_index: id as i32,
            created_by: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn achievement(criteria: serde_json::Value) -> Achievement {
        Achievement {
            id: 1,
            name: "Sharp".into(),
            description: None,
            achievement_type: Achievement::SCORE_THRESHOLD.into(),
            criteria: Some(criteria),
            points: 10,
            badge_icon: None,
            badge_color: None,
            is_active: true,
            created_by: None,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_auto_grade() {
        let exercises = vec![
            exercise(1, Some("9.8"), 2.0),
            exercise(2, Some("Oxygen"), 1.0),
            exercise(3, None, 1.0),
        ];
        let answers = HashMap::from([
            ("1".to_string(), json!(9.79)),
            ("2".to_string(), json!("nitrogen")),
            ("99".to_string(), json!("ignored")),
        ]);
        let graded = auto_grade(&exercises, &answers);

        assert_eq!(graded.total_score, 2.0);
        assert_eq!(graded.max_score, 4.0);
        assert_eq!(graded.details.len(), 3);
        assert!(graded.details["1"].is_correct);
        assert!(!graded.details["2"].is_correct);
        assert_eq!(graded.details["3"].answer, serde_json::Value::Null);
        assert!(!graded.details.contains_key("99"));
    }

    #[test]
    fn test_merge_grades() {
        let graded = auto_grade(
            &[exercise(1, Some("a"), 2.0), exercise(2, None, 3.0)],
            &HashMap::from([("1".to_string(), json!("a")), ("2".to_string(), json!("essay"))]),
        );
        let request = GradeSubmissionRequest {
            scores: HashMap::from([("2".to_string(), 1.5)]),
            feedbacks: Some(HashMap::from([("2".to_string(), "partly right".to_string())])),
            teacher_feedback: None,
            is_draft: false,
        };
        let (details, total) = merge_grades(graded.details.clone(), &json!({}), &request).unwrap();
        assert_eq!(total, 3.5);
        assert!(details["2"].is_correct);
        assert_eq!(details["2"].feedback.as_deref(), Some("partly right"));

        let too_high = GradeSubmissionRequest {
            scores: HashMap::from([("1".to_string(), 5.0)]),
            feedbacks: None,
            teacher_feedback: None,
            is_draft: true,
        };
        assert!(merge_grades(graded.details, &json!({}), &too_high).is_err());
    }

    #[test]
    fn test_threshold_reached() {
        let any_sim = achievement(json!({ "min_percentage": 80 }));
        assert!(threshold_reached(&any_sim, 80.0, 3));
        assert!(!threshold_reached(&any_sim, 79.9, 3));

        let one_sim = achievement(json!({ "min_percentage": 50, "simulation_id": 7 }));
        assert!(threshold_reached(&one_sim, 60.0, 7));
        assert!(!threshold_reached(&one_sim, 60.0, 8));

        let mut other = achievement(json!({ "min_percentage": 10 }));
        other.achievement_type = "streak".into();
        assert!(!threshold_reached(&other, 100.0, 1));
    }
}
