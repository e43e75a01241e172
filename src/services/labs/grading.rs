use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{LabService, is_grader, score_actor, scoring};
use crate::models::{
    ApiResponse, ErrorCode,
    labs::{
        requests::{AnnotateRequest, ManualScoreRequest, ScoreLabRequest},
        responses::{LabScoresResponse, ScoreResponse, StudentScoreResponse},
    },
};
use crate::services::{
    activity::ActivityLogger, bad_request, forbidden, internal_error, not_found, require_identity,
};
use crate::storage::{AnnotateOutcome, LabScoreOutcome};

pub async fn score_lab(
    service: &LabService,
    lab_id: i64,
    score: ScoreLabRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = require_identity!(request);
    let storage = service.get_storage(request);

    let log = ActivityLogger::entry(request, "lab.score")
        .resource("lab", lab_id)
        .details(serde_json::json!({
            "student_id": score.student_id,
            "submission_id": score.submission_id,
        }));

    match storage
        .score_lab(lab_id, score, score_actor(&identity), log)
        .await
    {
        Ok(LabScoreOutcome::Scored { score, criteria }) => Ok(HttpResponse::Ok().json(
            ApiResponse::success(ScoreResponse { score, criteria }, "Lab scored successfully"),
        )),
        Ok(LabScoreOutcome::LabNotFound) => Ok(not_found(ErrorCode::LabNotFound, "Lab not found")),
        Ok(LabScoreOutcome::Forbidden) => {
            Ok(forbidden("You do not have access to grade this course"))
        }
        Ok(LabScoreOutcome::SubmissionNotFound) => Ok(not_found(
            ErrorCode::LabSubmissionNotFound,
            "Submission not found",
        )),
        Err(e) => Ok(internal_error("Failed to score lab", &e)),
    }
}

pub async fn get_scores(
    service: &LabService,
    lab_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = require_identity!(request);
    let storage = service.get_storage(request);

    match storage.get_lab_by_id(lab_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::LabNotFound, "Lab not found")),
        Err(e) => return Ok(internal_error("Failed to retrieve scores", &e)),
    }

    if !is_grader(&identity) {
        return match storage.get_lab_score(lab_id, identity.user_id).await {
            Ok(found) => {
                let (score, annotations) = match found {
                    Some((score, annotations)) => (Some(score), annotations),
                    None => (None, Vec::new()),
                };
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    StudentScoreResponse { score, annotations },
                    "Score retrieved successfully",
                )))
            }
            Err(e) => Ok(internal_error("Failed to retrieve score", &e)),
        };
    }

    match storage.list_lab_scores(lab_id).await {
        Ok(scores) => {
            let finals: Vec<Option<f64>> = scores.iter().map(|s| s.score.final_score).collect();
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                LabScoresResponse {
                    statistics: scoring::statistics(&finals),
                    scores,
                },
                "Scores retrieved successfully",
            )))
        }
        Err(e) => Ok(internal_error("Failed to retrieve scores", &e)),
    }
}

pub async fn set_manual_score(
    service: &LabService,
    lab_id: i64,
    student_id: i64,
    score: ManualScoreRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = require_identity!(request);

    if score.manual_score.is_some_and(|s| !s.is_finite() || s < 0.0) {
        return Ok(bad_request(
            ErrorCode::BadRequest,
            "manual_score must be a non-negative number",
        ));
    }

    let storage = service.get_storage(request);
    let manual = score.manual_score;

    match storage
        .set_manual_score(lab_id, student_id, score, identity.user_id)
        .await
    {
        Ok(Some(score)) => {
            let entry = ActivityLogger::entry(request, "lab.manual_score")
                .resource("lab", lab_id)
                .details(serde_json::json!({
                    "student_id": student_id,
                    "manual_score": manual,
                }));
            ActivityLogger::log(storage.as_ref(), entry).await;

            let criteria = match storage.list_lab_criteria(lab_id).await {
                Ok(criteria) => criteria,
                Err(e) => return Ok(internal_error("Failed to retrieve criteria", &e)),
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                ScoreResponse { score, criteria },
                "Score updated successfully",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::LabScoreNotFound, "Score not found")),
        Err(e) => Ok(internal_error("Failed to update score", &e)),
    }
}

pub async fn annotate(
    service: &LabService,
    lab_id: i64,
    student_id: i64,
    annotation: AnnotateRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = require_identity!(request);

    if !annotation.points_awarded.is_finite() {
        return Ok(bad_request(
            ErrorCode::BadRequest,
            "points_awarded must be a number",
        ));
    }

    let storage = service.get_storage(request);
    let criterion_id = annotation.criterion_id;

    match storage
        .annotate_score(lab_id, student_id, annotation, identity.user_id)
        .await
    {
        Ok(AnnotateOutcome::Annotated(score)) => {
            let entry = ActivityLogger::entry(request, "lab.annotate")
                .resource("lab", lab_id)
                .details(serde_json::json!({
                    "student_id": student_id,
                    "criterion_id": criterion_id,
                }));
            ActivityLogger::log(storage.as_ref(), entry).await;

            let criteria = match storage.list_lab_criteria(lab_id).await {
                Ok(criteria) => criteria,
                Err(e) => return Ok(internal_error("Failed to retrieve criteria", &e)),
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                ScoreResponse { score, criteria },
                "Annotation saved successfully",
            )))
        }
        Ok(AnnotateOutcome::ScoreNotFound) => {
            Ok(not_found(ErrorCode::LabScoreNotFound, "Score not found"))
        }
        Ok(AnnotateOutcome::CriterionNotFound) => Ok(not_found(
            ErrorCode::RubricCriterionNotFound,
            "Rubric criterion not found",
        )),
        Ok(AnnotateOutcome::OutOfRange { max_points }) => Ok(bad_request(
            ErrorCode::BadRequest,
            format!("points_awarded must be between 0 and {max_points}"),
        )),
        Err(e) => Ok(internal_error("Failed to save annotation", &e)),
    }
}
