use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{entities::UserRole, requests::CreateUserRequest, responses::UserResponse},
};
use crate::services::{activity::ActivityLogger, bad_request, internal_error};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password_simple, validate_username};

/// 校验字段并把明文密码替换为哈希
fn prepare(mut user_data: CreateUserRequest) -> Result<CreateUserRequest, HttpResponse> {
    user_data.username = user_data.username.trim().to_string();
    user_data.email = user_data.email.trim().to_lowercase();

    if let Err(msg) = validate_username(&user_data.username) {
        return Err(bad_request(ErrorCode::UserNameInvalid, msg));
    }
    if let Err(msg) = validate_email(&user_data.email) {
        return Err(bad_request(ErrorCode::UserEmailInvalid, msg));
    }
    if let Err(msg) = validate_password_simple(&user_data.password) {
        return Err(bad_request(ErrorCode::PasswordPolicyViolation, msg));
    }
    if user_data.role == UserRole::Guest {
        return Err(bad_request(ErrorCode::RoleInvalid, "The guest role cannot be assigned"));
    }

    user_data.password = hash_password(&user_data.password)
        .map_err(|e| internal_error("Password hashing failed", &e))?;
    Ok(user_data)
}

pub async fn create_user(
    service: &UserService,
    user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user_data = match prepare(user_data) {
        Ok(data) => data,
        Err(response) => return Ok(response),
    };

    let storage = service.get_storage(request);

    match storage.create_user(user_data).await {
        Ok(user) => {
            info!("User {} created with role {}", user.username, user.role);
            let entry = ActivityLogger::entry(request, "user.create")
                .resource("user", user.id)
                .details(serde_json::json!({ "username": user.username, "role": user.role }));
            ActivityLogger::log(storage.as_ref(), entry).await;

            Ok(HttpResponse::Created()
                .json(ApiResponse::success(UserResponse { user }, "User created successfully")))
        }
        Err(e) if e.is_conflict() => Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::UserAlreadyExists,
            "Username or email already exists",
        ))),
        Err(e) => Ok(internal_error("User creation failed", &e)),
    }
}

pub async fn upsert_user(
    service: &UserService,
    user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user_data = match prepare(user_data) {
        Ok(data) => data,
        Err(response) => return Ok(response),
    };

    let storage = service.get_storage(request);

    match storage.upsert_user(user_data).await {
        Ok(user) => {
            let entry = ActivityLogger::entry(request, "user.upsert").resource("user", user.id);
            ActivityLogger::log(storage.as_ref(), entry).await;

            Ok(HttpResponse::Ok()
                .json(ApiResponse::success(UserResponse { user }, "User saved successfully")))
        }
        Err(e) if e.is_conflict() => Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::UserAlreadyExists,
            "Email already belongs to another user",
        ))),
        Err(e) => Ok(internal_error("User upsert failed", &e)),
    }
}
