use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use crate::models::{
    ApiResponse, ErrorCode,
    activity_logs::entities::ActivityStatus,
    auth::{
        entities::Identity,
        requests::LoginRequest,
        responses::{AuthUser, LoginResponse},
    },
    sessions::requests::NewSession,
};
use crate::services::{activity::ActivityLogger, internal_error};
use crate::utils::password::{verify_password, verify_placeholder};
use crate::utils::session_token;

use super::AuthService;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

fn invalid_credentials() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::AuthFailed,
        INVALID_CREDENTIALS,
    ))
}

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (Some(username), Some(password)) = (
        login_request.username.filter(|u| !u.trim().is_empty()),
        login_request.password.filter(|p| !p.is_empty()),
    ) else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AuthMissingCredentials,
            "Username and password are required",
        )));
    };
    let username = username.trim().to_string();

    let storage = service.get_storage(request);
    let config = service.get_config();

    // 1. 按用户名或邮箱查找
    let user = match storage.get_user_by_username_or_email(&username).await {
        Ok(user) => user,
        Err(e) => return Ok(internal_error("Login failed", &e)),
    };

    // 2. 校验密码与状态，失败统一返回相同信息
    let failure_reason = match &user {
        None => {
            verify_placeholder(&password);
            Some("unknown user")
        }
        Some(user) if !verify_password(&password, &user.password_hash) => Some("wrong password"),
        Some(user) if !user.is_active() => Some("inactive user"),
        Some(_) => None,
    };
    let user = match (user, failure_reason) {
        (Some(user), None) => user,
        (user, reason) => {
            let reason = reason.unwrap_or("unknown user");
            warn!("Login failed for '{}': {}", username, reason);
            let entry = ActivityLogger::entry(request, "auth.login")
                .user(user.as_ref().map(|u| u.id))
                .status(ActivityStatus::Failure)
                .details(serde_json::json!({ "username": username, "reason": reason }));
            ActivityLogger::log(storage.as_ref(), entry).await;
            return Ok(invalid_credentials());
        }
    };

    // 3. 创建会话
    let token = session_token::generate_token();
    let expires_at = chrono::Utc::now() + chrono::Duration::hours(config.session.ttl_hours);
    let session = match storage
        .create_session(NewSession {
            token: token.clone(),
            user_id: Some(user.id),
            is_guest: false,
            ip_address: session_token::client_ip(request),
            user_agent: session_token::user_agent(request),
            expires_at,
        })
        .await
    {
        Ok(session) => session,
        Err(e) => return Ok(internal_error("Login failed, unable to create session", &e)),
    };

    if let Err(e) = storage.update_last_login(user.id).await {
        warn!("Failed to update last login of user {}: {}", user.id, e);
    }

    let parts = match storage
        .load_identity_parts(user.id, user.role.as_str())
        .await
    {
        Ok(parts) => parts,
        Err(e) => return Ok(internal_error("Login failed, unable to load roles", &e)),
    };

    let identity = Identity {
        user_id: user.id,
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        email: user.email.clone(),
        primary_role: user.role.to_string(),
        roles: parts.roles,
        permissions: parts.permissions,
        school_access: parts.school_access,
        session_id: session.id,
        is_guest: false,
        expires_at: session.expires_at,
    };

    let entry = ActivityLogger::entry(request, "auth.login")
        .user(Some(user.id))
        .session(session.id)
        .details(serde_json::json!({ "username": user.username }));
    ActivityLogger::log(storage.as_ref(), entry).await;

    info!("User {} logged in successfully", user.username);

    Ok(HttpResponse::Ok()
        .cookie(session_token::session_cookie(&token, config.session.ttl_hours))
        .json(ApiResponse::success(
            LoginResponse {
                user: AuthUser::from(&identity),
            },
            "Login successful",
        )))
}
