use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ExerciseService, merge_grades};
use crate::models::{
    ApiResponse, ErrorCode,
    exercises::{
        requests::{ExerciseStatisticsParams, GradeSubmissionRequest},
        responses::{ExerciseStatisticsResponse, SubmissionResponse},
    },
};
use crate::services::{
    activity::ActivityLogger, bad_request, internal_error, not_found, require_identity,
};
use crate::storage::GradedSubmission;

pub async fn grade_submission(
    service: &ExerciseService,
    submission_id: i64,
    grade: GradeSubmissionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = require_identity!(request);
    let storage = service.get_storage(request);

    let submission = match storage.get_exercise_submission(submission_id).await {
        Ok(Some(submission)) => submission,
        Ok(None) => {
            return Ok(not_found(
                ErrorCode::ExerciseSubmissionNotFound,
                "Submission not found",
            ));
        }
        Err(e) => return Ok(internal_error("Failed to grade submission", &e)),
    };

    let (details, total_score) = match merge_grades(submission.details, &submission.answers, &grade)
    {
        Ok(merged) => merged,
        Err(msg) => return Ok(bad_request(ErrorCode::ExerciseValidationFailed, msg)),
    };

    let action = if grade.is_draft {
        "exercise.grade_draft"
    } else {
        "exercise.grade_submit"
    };
    let log = ActivityLogger::entry(request, action)
        .resource("exercise_submission", submission_id)
        .details(serde_json::json!({
            "student_id": submission.student_id,
            "total_score": total_score,
            "is_draft": grade.is_draft,
        }));

    let graded = GradedSubmission {
        details,
        total_score,
        teacher_feedback: grade.teacher_feedback,
        graded_by: identity.user_id,
        is_draft: grade.is_draft,
    };

    match storage
        .grade_exercise_submission(submission_id, graded, log)
        .await
    {
        Ok(Some(submission)) => {
            let message = if grade.is_draft {
                "Draft grade saved"
            } else {
                "Submission graded successfully"
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SubmissionResponse { submission },
                message,
            )))
        }
        Ok(None) => Ok(not_found(
            ErrorCode::ExerciseSubmissionNotFound,
            "Submission not found",
        )),
        Err(e) => Ok(internal_error("Failed to grade submission", &e)),
    }
}

pub async fn statistics(
    service: &ExerciseService,
    query: ExerciseStatisticsParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(simulation_id) = query.simulation_id else {
        return Ok(bad_request(
            ErrorCode::BadRequest,
            "simulation_id is required",
        ));
    };

    let storage = service.get_storage(request);
    match storage.exercise_statistics(simulation_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ExerciseStatisticsResponse { items },
            "Exercise statistics retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve exercise statistics", &e)),
    }
}
