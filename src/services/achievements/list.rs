use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AchievementService;
use crate::models::{
    ApiResponse,
    achievements::responses::{AchievementListResponse, StudentAchievementsResponse},
    auth::entities::Identity,
};
use crate::services::{forbidden, internal_error, require_identity};

pub async fn list_achievements(
    service: &AchievementService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_active_achievements().await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AchievementListResponse { items },
            "Achievements retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve achievements", &e)),
    }
}

/// 教职工：非学生、非家长的登录用户
fn is_staff(identity: &Identity) -> bool {
    !identity.is_guest && !identity.is_student() && !identity.is_parent()
}

pub async fn student_achievements(
    service: &AchievementService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = require_identity!(request);
    let storage = service.get_storage(request);

    let allowed = if identity.user_id == student_id || is_staff(&identity) {
        true
    } else if identity.is_parent() {
        match storage.is_parent_of(identity.user_id, student_id).await {
            Ok(linked) => linked,
            Err(e) => return Ok(internal_error("Failed to retrieve achievements", &e)),
        }
    } else {
        false
    };
    if !allowed {
        return Ok(forbidden("You cannot view this student's achievements"));
    }

    match storage.list_student_achievements(student_id).await {
        Ok(items) => {
            let total_points = items.iter().map(|a| a.earned.points_earned as i64).sum();
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                StudentAchievementsResponse {
                    items,
                    total_points,
                },
                "Student achievements retrieved successfully",
            )))
        }
        Err(e) => Ok(internal_error("Failed to retrieve achievements", &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::entities::fixtures::identity_with;

    #[test]
    fn test_staff_detection() {
        assert!(is_staff(&identity_with(2, &["teacher"], &[])));
        assert!(is_staff(&identity_with(1, &["admin"], &[])));
        assert!(!is_staff(&identity_with(3, &["student"], &[])));
        assert!(!is_staff(&identity_with(4, &["guardian"], &[])));
    }
}
