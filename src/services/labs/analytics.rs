use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{LabService, scoring};
use crate::models::{
    ApiResponse, ErrorCode,
    labs::{
        entities::{LabScore, RubricCriterion},
        responses::{AnalyticsRow, GradeDistribution, LabAnalyticsResponse},
    },
};
use crate::services::{internal_error, not_found};

const STATUS_GRADED: &str = "graded";
const STATUS_SUBMITTED: &str = "submitted";
const STATUS_NOT_SUBMITTED: &str = "not_submitted";

fn rubric_max(criteria: &[RubricCriterion]) -> f64 {
    criteria.iter().map(|c| c.max_points * c.weight).sum()
}

/// 课程名单与成绩合并为分析结果
pub fn build_analytics(
    students: Vec<(i64, String)>,
    scores: Vec<LabScore>,
    default_max: f64,
) -> LabAnalyticsResponse {
    let mut by_student: HashMap<i64, LabScore> =
        scores.into_iter().map(|s| (s.student_id, s)).collect();

    let mut distribution = GradeDistribution::default();
    let mut submission_count = 0;
    let mut graded_percentages = Vec::new();

    let rows = students
        .into_iter()
        .map(|(student_id, name)| {
            let score = by_student.remove(&student_id);
            let max_score = score.as_ref().map_or(default_max, |s| s.max_score);
            let final_score = score.as_ref().and_then(|s| s.final_score);
            let status = match &score {
                Some(_) if final_score.is_some() => STATUS_GRADED,
                Some(_) => STATUS_SUBMITTED,
                None => STATUS_NOT_SUBMITTED,
            };
            if score.as_ref().is_some_and(|s| s.submission_id.is_some()) {
                submission_count += 1;
            }

            let percentage = final_score.map_or(0.0, |f| scoring::percentage(f, max_score));
            if final_score.is_some() {
                graded_percentages.push(percentage);
            }
            let letter_grade = scoring::letter_grade(final_score, max_score);
            scoring::tally_grade(&mut distribution, letter_grade);

            AnalyticsRow {
                student_id,
                name,
                final_score,
                max_score,
                percentage,
                letter_grade: letter_grade.to_string(),
                status: status.to_string(),
            }
        })
        .collect();

    let average_percentage = if graded_percentages.is_empty() {
        0.0
    } else {
        graded_percentages.iter().sum::<f64>() / graded_percentages.len() as f64
    };

    LabAnalyticsResponse {
        rows,
        distribution,
        average_percentage,
        submission_count,
    }
}

pub async fn lab_analytics(
    service: &LabService,
    lab_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let detail = match storage.get_lab_detail(lab_id).await {
        Ok(Some(detail)) => detail,
        Ok(None) => return Ok(not_found(ErrorCode::LabNotFound, "Lab not found")),
        Err(e) => return Ok(internal_error("Failed to build lab analytics", &e)),
    };

    let students = match storage.list_course_students(detail.lab.course_id).await {
        Ok(students) => students,
        Err(e) => return Ok(internal_error("Failed to build lab analytics", &e)),
    };
    let scores = match storage.list_lab_scores(lab_id).await {
        Ok(scores) => scores.into_iter().map(|s| s.score).collect(),
        Err(e) => return Ok(internal_error("Failed to build lab analytics", &e)),
    };

    let analytics = build_analytics(students, scores, rubric_max(&detail.criteria));
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        analytics,
        "Lab analytics retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(student_id: i64, final_score: Option<f64>) -> LabScore {
        LabScore {
            id: student_id,
            lab_id: 1,
            student_id,
            submission_id: Some(student_id * 10),
            auto_score: final_score,
            manual_score: None,
            final_score,
            max_score: 20.0,
            rubric_breakdown: Vec::new(),
            teacher_comments: None,
            graded_by: None,
            graded_at: None,
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_build_analytics() {
        let students = vec![
            (1, "Ada".to_string()),
            (2, "Ben".to_string()),
            (3, "Cy".to_string()),
            (4, "Di".to_string()),
        ];
        let scores = vec![score(1, Some(19.0)), score(2, Some(11.0)), score(3, None)];
        let result = build_analytics(students, scores, 30.0);

        assert_eq!(result.rows.len(), 4);
        assert_eq!(result.rows[0].letter_grade, "A");
        assert_eq!(result.rows[0].percentage, 95.0);
        assert_eq!(result.rows[1].letter_grade, "F");
        assert_eq!(result.rows[2].status, STATUS_SUBMITTED);
        assert_eq!(result.rows[3].status, STATUS_NOT_SUBMITTED);
        assert_eq!(result.rows[3].max_score, 30.0);
        assert_eq!(result.submission_count, 3);
        assert_eq!(result.distribution.a, 1);
        assert_eq!(result.distribution.f, 1);
        assert_eq!(result.distribution.not_graded, 2);
        assert_eq!(result.average_percentage, 75.0);
    }
}
