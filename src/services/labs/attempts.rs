//! 学生作答流程：开始、提交、结束

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::warn;

use super::LabService;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::entities::Identity,
    labs::{
        entities::LabScore,
        requests::{ScoreLabRequest, StopLabRequest, SubmitLabRequest},
        responses::{StartLabResponse, StopLabResponse, SubmitLabResponse},
    },
};
use crate::services::{
    activity::ActivityLogger, bad_request, forbidden, internal_error, not_found, require_identity,
};
use crate::storage::{LabScoreOutcome, LabStartOutcome, LabSubmitOutcome, ScoreActor, Storage};

pub async fn start_lab(
    service: &LabService,
    lab_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = require_identity!(request);
    let storage = service.get_storage(request);

    let outcome = match storage.start_lab(lab_id, identity.user_id).await {
        Ok(outcome) => outcome,
        Err(e) => return Ok(internal_error("Failed to start lab", &e)),
    };

    match outcome {
        LabStartOutcome::LabNotFound => Ok(not_found(ErrorCode::LabNotFound, "Lab not found")),
        LabStartOutcome::NotEnrolled => {
            Ok(forbidden("You are not enrolled in the course of this lab"))
        }
        LabStartOutcome::AttemptsExceeded(attempts) => {
            Ok(HttpResponse::BadRequest().json(ApiResponse::error(
                ErrorCode::LabMaxAttemptsReached,
                attempts,
                "Maximum number of attempts reached",
            )))
        }
        LabStartOutcome::Started {
            session,
            lab,
            criteria,
            is_resuming,
        } => {
            let simulation_url = match lab.simulation_id {
                Some(simulation_id) => match storage.get_simulation_by_id(simulation_id).await {
                    Ok(simulation) => simulation.and_then(|s| s.simulation_url),
                    Err(e) => return Ok(internal_error("Failed to start lab", &e)),
                },
                None => None,
            };

            if !is_resuming {
                let entry = ActivityLogger::entry(request, "lab.start")
                    .resource("lab", lab.id)
                    .details(serde_json::json!({ "lab_session_id": session.id }));
                ActivityLogger::log(storage.as_ref(), entry).await;
            }

            let message = if is_resuming {
                "Lab session resumed"
            } else {
                "Lab session started"
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                StartLabResponse {
                    session,
                    lab,
                    criteria,
                    is_resuming,
                    simulation_url,
                },
                message,
            )))
        }
    }
}

/// 正式提交后的自动评分；失败只记录日志
async fn auto_score_submission(
    storage: &dyn Storage,
    identity: &Identity,
    lab_id: i64,
    submission_id: i64,
    request: &HttpRequest,
) -> Option<LabScore> {
    let actor = ScoreActor {
        user_id: identity.user_id,
        can_grade_all: true,
    };
    let score_request = ScoreLabRequest {
        student_id: identity.user_id,
        submission_id: Some(submission_id),
    };
    let log = ActivityLogger::entry(request, "lab.auto_score").resource("lab", lab_id);

    match storage.score_lab(lab_id, score_request, actor, log).await {
        Ok(LabScoreOutcome::Scored { score, .. }) => Some(score),
        Ok(other) => {
            warn!("Auto-scoring lab {} skipped: {:?}", lab_id, other);
            None
        }
        Err(e) => {
            warn!("Auto-scoring lab {} failed: {}", lab_id, e);
            None
        }
    }
}

pub async fn submit_lab(
    service: &LabService,
    lab_id: i64,
    submit: SubmitLabRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = require_identity!(request);

    if !submit.has_responses() {
        return Ok(bad_request(
            ErrorCode::LabValidationFailed,
            "responses must not be empty",
        ));
    }

    let storage = service.get_storage(request);
    let is_autosave = submit.is_autosave;
    let responses = submit.responses.unwrap_or_default();

    let result = if is_autosave {
        storage
            .autosave_lab(lab_id, identity.user_id, submit.session_id, responses)
            .await
    } else {
        storage
            .submit_lab(lab_id, identity.user_id, submit.session_id, responses)
            .await
    };

    let (submission, session) = match result {
        Ok(LabSubmitOutcome::Saved {
            submission,
            session,
        }) => (submission, session),
        Ok(LabSubmitOutcome::SessionNotFound) => {
            return Ok(not_found(
                ErrorCode::LabSessionNotFound,
                "Lab session not found",
            ));
        }
        Ok(LabSubmitOutcome::NotInProgress(session)) => {
            return Ok(bad_request(
                ErrorCode::LabSessionNotInProgress,
                format!("Lab session is already {}", session.status),
            ));
        }
        Err(e) => return Ok(internal_error("Failed to submit lab", &e)),
    };

    if is_autosave {
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            SubmitLabResponse {
                submission,
                session,
                is_autosave,
                score: None,
            },
            "Progress saved",
        )));
    }

    let entry = ActivityLogger::entry(request, "lab.submit")
        .resource("lab", lab_id)
        .details(serde_json::json!({
            "lab_session_id": session.id,
            "submission_id": submission.id,
            "duration_minutes": session.duration_minutes,
        }));
    ActivityLogger::log(storage.as_ref(), entry).await;

    let score =
        auto_score_submission(storage.as_ref(), &identity, lab_id, submission.id, request).await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SubmitLabResponse {
            submission,
            session,
            is_autosave,
            score,
        },
        "Lab submitted successfully",
    )))
}

pub async fn stop_lab(
    service: &LabService,
    lab_id: i64,
    stop: StopLabRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = require_identity!(request);
    let storage = service.get_storage(request);

    match storage
        .stop_lab(lab_id, identity.user_id, stop.session_id)
        .await
    {
        Ok(Some(session)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            StopLabResponse { session },
            "Lab session stopped",
        ))),
        Ok(None) => Ok(not_found(
            ErrorCode::LabSessionNotFound,
            "Lab session not found",
        )),
        Err(e) => Ok(internal_error("Failed to stop lab", &e)),
    }
}
