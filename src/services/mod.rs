pub mod achievements;
pub mod activity;
pub mod activity_logs;
pub mod admin;
pub mod auth;
pub mod courses;
pub mod exercises;
pub mod labs;
pub mod permissions;
pub mod portal;
pub mod schools;
pub mod sessions;
pub mod simulations;
pub mod users;

pub use achievements::AchievementService;
pub use activity_logs::ActivityLogService;
pub use admin::AdminService;
pub use auth::AuthService;
pub use courses::CourseService;
pub use exercises::ExerciseService;
pub use labs::LabService;
pub use portal::PortalService;
pub use schools::SchoolService;
pub use sessions::SessionService;
pub use simulations::SimulationService;
pub use users::UserService;

use actix_web::HttpResponse;

use crate::errors::VLabError;
use crate::models::{ApiResponse, ErrorCode};

/// 存储层错误转换为 500，附带内部错误详情
pub(crate) fn internal_error(context: &str, err: &VLabError) -> HttpResponse {
    tracing::error!("{}: {}", context, err);
    HttpResponse::InternalServerError().json(ApiResponse::error_with_details(
        ErrorCode::from_error(err),
        context,
        err.to_string(),
    ))
}

pub(crate) fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::Unauthorized,
        "Authentication required",
    ))
}

pub(crate) fn forbidden(message: impl Into<String>) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(ErrorCode::Forbidden, message))
}

pub(crate) fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn not_found(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(code, message))
}

/// 取出当前身份，缺失时提前返回 401
macro_rules! require_identity {
    ($request:expr) => {
        match $crate::middlewares::RequireSession::extract_identity($request) {
            Some(identity) => identity,
            None => return Ok($crate::services::unauthorized()),
        }
    };
}

pub(crate) use require_identity;
