use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AchievementService;
use crate::models::{
    ApiResponse, ErrorCode,
    achievements::{
        requests::{AwardAchievementRequest, CreateAchievementRequest},
        responses::{AchievementResponse, AwardResponse},
    },
};
use crate::services::{
    activity::ActivityLogger, bad_request, internal_error, not_found, require_identity,
};
use crate::storage::AwardOutcome;

pub async fn create_achievement(
    service: &AchievementService,
    achievement: CreateAchievementRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = require_identity!(request);

    if let Err(msg) = achievement.validate() {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    let storage = service.get_storage(request);
    match storage
        .create_achievement(achievement, Some(identity.user_id))
        .await
    {
        Ok(achievement) => {
            let entry = ActivityLogger::entry(request, "achievement.create")
                .resource("achievement", achievement.id);
            ActivityLogger::log(storage.as_ref(), entry).await;

            Ok(HttpResponse::Created().json(ApiResponse::success(
                AchievementResponse { achievement },
                "Achievement created successfully",
            )))
        }
        Err(e) => Ok(internal_error("Failed to create achievement", &e)),
    }
}

pub async fn award_achievement(
    service: &AchievementService,
    award: AwardAchievementRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let log = ActivityLogger::entry(request, "achievement.award")
        .resource("achievement", award.achievement_id)
        .details(serde_json::json!({
            "student_id": award.student_id,
            "simulation_id": award.simulation_id,
        }));

    match storage.award_achievement(award, log).await {
        Ok(AwardOutcome::Awarded(student_achievement)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                AwardResponse {
                    student_achievement,
                },
                "Achievement awarded successfully",
            )))
        }
        Ok(AwardOutcome::AchievementNotFound) => Ok(not_found(
            ErrorCode::AchievementNotFound,
            "Achievement not found or inactive",
        )),
        Ok(AwardOutcome::AlreadyAwarded) => Ok(bad_request(
            ErrorCode::AchievementAlreadyAwarded,
            "Student has already earned this achievement",
        )),
        Err(e) => Ok(internal_error("Failed to award achievement", &e)),
    }
}
