use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ExerciseService;
use crate::models::{
    ApiResponse, ErrorCode,
    exercises::{
        entities::Exercise,
        requests::{CreateExerciseRequest, ExerciseListParams, UpdateExerciseRequest},
        responses::{ExerciseListResponse, ExerciseResponse},
    },
};
use crate::services::{
    activity::ActivityLogger, bad_request, internal_error, labs::is_grader, not_found,
    require_identity,
};

pub async fn list_exercises(
    service: &ExerciseService,
    query: ExerciseListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = require_identity!(request);

    let Some(simulation_id) = query.simulation_id else {
        return Ok(bad_request(
            ErrorCode::BadRequest,
            "simulation_id is required",
        ));
    };

    let storage = service.get_storage(request);
    match storage.list_exercises(simulation_id).await {
        Ok(items) => {
            let items = if is_grader(&identity) {
                items
            } else {
                items.into_iter().map(Exercise::without_answer).collect()
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                ExerciseListResponse { items },
                "Exercises retrieved successfully",
            )))
        }
        Err(e) => Ok(internal_error("Failed to retrieve exercises", &e)),
    }
}

pub async fn create_exercise(
    service: &ExerciseService,
    exercise: CreateExerciseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = require_identity!(request);

    if let Err(msg) = exercise.validate() {
        return Ok(bad_request(ErrorCode::ExerciseValidationFailed, msg));
    }

    let storage = service.get_storage(request);

    match storage.get_simulation_by_id(exercise.simulation_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(not_found(
                ErrorCode::SimulationNotFound,
                "Simulation not found",
            ));
        }
        Err(e) => return Ok(internal_error("Failed to create exercise", &e)),
    }

    match storage.create_exercise(exercise, Some(identity.user_id)).await {
        Ok(exercise) => {
            let entry = ActivityLogger::entry(request, "exercise.create")
                .resource("exercise", exercise.id)
                .details(serde_json::json!({ "simulation_id": exercise.simulation_id }));
            ActivityLogger::log(storage.as_ref(), entry).await;

            Ok(HttpResponse::Created().json(ApiResponse::success(
                ExerciseResponse { exercise },
                "Exercise created successfully",
            )))
        }
        Err(e) => Ok(internal_error("Failed to create exercise", &e)),
    }
}

pub async fn update_exercise(
    service: &ExerciseService,
    exercise_id: i64,
    update: UpdateExerciseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if update.question.as_deref().is_some_and(|q| q.trim().is_empty()) {
        return Ok(bad_request(
            ErrorCode::ExerciseValidationFailed,
            "question must not be empty",
        ));
    }
    if update.points.is_some_and(|p| !(p > 0.0)) {
        return Ok(bad_request(
            ErrorCode::ExerciseValidationFailed,
            "points must be greater than 0",
        ));
    }

    let storage = service.get_storage(request);

    match storage.update_exercise(exercise_id, update).await {
        Ok(Some(exercise)) => {
            let entry =
                ActivityLogger::entry(request, "exercise.update").resource("exercise", exercise.id);
            ActivityLogger::log(storage.as_ref(), entry).await;

            Ok(HttpResponse::Ok().json(ApiResponse::success(
                ExerciseResponse { exercise },
                "Exercise updated successfully",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::ExerciseNotFound, "Exercise not found")),
        Err(e) => Ok(internal_error("Failed to update exercise", &e)),
    }
}

pub async fn delete_exercise(
    service: &ExerciseService,
    exercise_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_exercise(exercise_id).await {
        Ok(true) => {
            let entry =
                ActivityLogger::entry(request, "exercise.delete").resource("exercise", exercise_id);
            ActivityLogger::log(storage.as_ref(), entry).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Exercise deleted successfully",
            )))
        }
        Ok(false) => Ok(not_found(ErrorCode::ExerciseNotFound, "Exercise not found")),
        Err(e) => Ok(internal_error("Failed to delete exercise", &e)),
    }
}
