use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::{ExerciseService, auto_grade, threshold_reached};
use crate::models::{
    ApiResponse, ErrorCode,
    achievements::requests::AwardAchievementRequest,
    exercises::{
        requests::{SubmissionListParams, SubmitExercisesRequest},
        responses::{SubmissionResponse, SubmitExercisesResponse},
    },
};
use crate::services::{
    activity::ActivityLogger, bad_request, forbidden, internal_error, labs::is_grader, not_found,
    require_identity,
};
use crate::storage::{AwardOutcome, NewExerciseSubmission, Storage};

/// 提交后检查分数阈值成就，返回新获得的成就名
async fn award_threshold_achievements(
    storage: &dyn Storage,
    request: &HttpRequest,
    student_id: i64,
    simulation_id: i64,
    percentage: f64,
) -> Vec<String> {
    let achievements = match storage.list_active_achievements().await {
        Ok(achievements) => achievements,
        Err(e) => {
            warn!("Failed to load achievements for threshold check: {}", e);
            return Vec::new();
        }
    };

    let mut awarded = Vec::new();
    for achievement in achievements
        .into_iter()
        .filter(|a| threshold_reached(a, percentage, simulation_id))
    {
        let award = AwardAchievementRequest {
            student_id,
            achievement_id: achievement.id,
            simulation_id: Some(simulation_id),
        };
        let log = ActivityLogger::entry(request, "achievement.award")
            .resource("achievement", achievement.id)
            .details(serde_json::json!({
                "student_id": student_id,
                "simulation_id": simulation_id,
                "automatic": true,
            }));
        match storage.award_achievement(award, log).await {
            Ok(AwardOutcome::Awarded(_)) => {
                info!(
                    "Student {} earned achievement '{}'",
                    student_id, achievement.name
                );
                awarded.push(achievement.name);
            }
            Ok(_) => {}
            Err(e) => warn!(
                "Failed to award achievement {} to student {}: {}",
                achievement.id, student_id, e
            ),
        }
    }
    awarded
}

pub async fn submit_exercises(
    service: &ExerciseService,
    submit: SubmitExercisesRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = require_identity!(request);

    if submit.answers.is_empty() {
        return Ok(bad_request(
            ErrorCode::ExerciseValidationFailed,
            "answers must not be empty",
        ));
    }

    let storage = service.get_storage(request);

    let exercises = match storage.list_exercises(submit.simulation_id).await {
        Ok(exercises) if exercises.is_empty() => {
            return Ok(not_found(
                ErrorCode::ExerciseNotFound,
                "No exercises found for this simulation",
            ));
        }
        Ok(exercises) => exercises,
        Err(e) => return Ok(internal_error("Failed to submit exercises", &e)),
    };

    let graded = auto_grade(&exercises, &submit.answers);
    let answers = match serde_json::to_value(&submit.answers) {
        Ok(value) => value,
        Err(e) => {
            return Ok(bad_request(
                ErrorCode::ExerciseValidationFailed,
                format!("Invalid answers: {e}"),
            ));
        }
    };

    let new_submission = NewExerciseSubmission {
        simulation_id: submit.simulation_id,
        student_id: identity.user_id,
        answers,
        details: graded.details,
        total_score: graded.total_score,
        max_score: graded.max_score,
    };
    let submission = match storage.insert_exercise_submission(new_submission).await {
        Ok(submission) => submission,
        Err(e) => return Ok(internal_error("Failed to submit exercises", &e)),
    };

    let percentage = submission.percentage();
    let entry = ActivityLogger::entry(request, "exercise.submit")
        .resource("simulation", submission.simulation_id)
        .details(serde_json::json!({
            "submission_id": submission.id,
            "total_score": submission.total_score,
            "max_score": submission.max_score,
        }));
    ActivityLogger::log(storage.as_ref(), entry).await;

    let awarded_achievements = award_threshold_achievements(
        storage.as_ref(),
        request,
        identity.user_id,
        submission.simulation_id,
        percentage,
    )
    .await;

    Ok(HttpResponse::Created().json(ApiResponse::success(
        SubmitExercisesResponse {
            submission,
            percentage,
            awarded_achievements,
        },
        "Exercises submitted successfully",
    )))
}

pub async fn list_submissions(
    service: &ExerciseService,
    mut query: SubmissionListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = require_identity!(request);

    // 非教师只能看自己的提交
    if !is_grader(&identity) {
        query.student_id = Some(identity.user_id);
    }

    let storage = service.get_storage(request);
    match storage.list_exercise_submissions(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Submissions retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve submissions", &e)),
    }
}

pub async fn get_submission(
    service: &ExerciseService,
    submission_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = require_identity!(request);
    let storage = service.get_storage(request);

    match storage.get_exercise_submission(submission_id).await {
        Ok(Some(submission))
            if submission.student_id != identity.user_id && !is_grader(&identity) =>
        {
            Ok(forbidden("You can only view your own submissions"))
        }
        Ok(Some(submission)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SubmissionResponse { submission },
            "Submission retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(
            ErrorCode::ExerciseSubmissionNotFound,
            "Submission not found",
        )),
        Err(e) => Ok(internal_error("Failed to retrieve submission", &e)),
    }
}
