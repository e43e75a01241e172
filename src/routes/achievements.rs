use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequirePermission};
use crate::models::achievements::requests::{AwardAchievementRequest, CreateAchievementRequest};
use crate::services::AchievementService;
use crate::utils::SafeIDI64;

static ACHIEVEMENT_SERVICE: Lazy<AchievementService> = Lazy::new(AchievementService::new_lazy);

pub async fn list_achievements(req: HttpRequest) -> ActixResult<HttpResponse> {
    ACHIEVEMENT_SERVICE.list_achievements(&req).await
}

pub async fn create_achievement(
    req: HttpRequest,
    achievement: web::Json<CreateAchievementRequest>,
) -> ActixResult<HttpResponse> {
    ACHIEVEMENT_SERVICE
        .create_achievement(achievement.into_inner(), &req)
        .await
}

pub async fn award_achievement(
    req: HttpRequest,
    award: web::Json<AwardAchievementRequest>,
) -> ActixResult<HttpResponse> {
    ACHIEVEMENT_SERVICE
        .award_achievement(award.into_inner(), &req)
        .await
}

pub async fn student_achievements(
    req: HttpRequest,
    student_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    ACHIEVEMENT_SERVICE
        .student_achievements(student_id.0, &req)
        .await
}

pub fn configure_achievement_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/achievements")
            .wrap(middlewares::RequireSession::new())
            .service(
                web::resource("")
                    .route(web::get().to(list_achievements))
                    .route(
                        web::post()
                            .to(create_achievement)
                            .wrap(RequirePermission::new("achievements.create")),
                    ),
            )
            .service(
                web::resource("/award").route(
                    web::put()
                        .to(award_achievement)
                        .wrap(RequirePermission::new("achievements.award")),
                ),
            )
            // 访问权限在业务层检查（本人、关联家长、教职工）
            .route("/student/{id}", web::get().to(student_achievements)),
    );
}
