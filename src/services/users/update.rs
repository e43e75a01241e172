use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{
        entities::{UserRole, UserStatus},
        requests::UpdateUserRequest,
        responses::UserResponse,
    },
};
use crate::services::{activity::ActivityLogger, bad_request, internal_error, not_found};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password_simple};

pub async fn update_user(
    service: &UserService,
    user_id: i64,
    mut update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(email) = &update_data.email {
        let email = email.trim().to_lowercase();
        if let Err(msg) = validate_email(&email) {
            return Ok(bad_request(ErrorCode::UserEmailInvalid, msg));
        }
        update_data.email = Some(email);
    }
    if update_data.role == Some(UserRole::Guest) {
        return Ok(bad_request(ErrorCode::RoleInvalid, "The guest role cannot be assigned"));
    }

    if let Some(password) = update_data.password.take() {
        if let Err(msg) = validate_password_simple(&password) {
            return Ok(bad_request(ErrorCode::PasswordPolicyViolation, msg));
        }
        match hash_password(&password) {
            Ok(hash) => update_data.password = Some(hash),
            Err(e) => return Ok(internal_error("Password hashing failed", &e)),
        }
    }
    let password_changed = update_data.password.is_some();
    // 密码、角色变更或停用后旧会话不再可信
    let revoke_sessions = password_changed
        || update_data.role.is_some()
        || update_data
            .status
            .is_some_and(|status| status != UserStatus::Active);

    let storage = service.get_storage(request);

    match storage.update_user(user_id, update_data).await {
        Ok(Some(user)) => {
            let revoked = if revoke_sessions {
                match service.revoke_sessions(request, user.id).await {
                    Ok(count) => count,
                    Err(e) => return Ok(internal_error("Failed to revoke user sessions", &e)),
                }
            } else {
                0
            };

            let entry = ActivityLogger::entry(request, "user.update")
                .resource("user", user.id)
                .details(serde_json::json!({
                    "password_changed": password_changed,
                    "revoked_sessions": revoked,
                }));
            ActivityLogger::log(storage.as_ref(), entry).await;

            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user },
                "User information updated successfully",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) if e.is_conflict() => Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::UserAlreadyExists,
            "Email already belongs to another user",
        ))),
        Err(e) => Ok(internal_error("Failed to update user information", &e)),
    }
}
