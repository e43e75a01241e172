use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::models::{
    ApiResponse,
    auth::{
        entities::Identity,
        responses::{AuthUser, GuestSessionResponse},
    },
    sessions::requests::NewSession,
};
use crate::services::{activity::ActivityLogger, internal_error};
use crate::utils::session_token;

use super::AuthService;

pub async fn handle_create_guest_session(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let ttl_hours = service.get_config().session.guest_ttl_hours;

    let token = session_token::generate_token();
    let session = match storage
        .create_session(NewSession {
            token: token.clone(),
            user_id: None,
            is_guest: true,
            ip_address: session_token::client_ip(request),
            user_agent: session_token::user_agent(request),
            expires_at: chrono::Utc::now() + chrono::Duration::hours(ttl_hours),
        })
        .await
    {
        Ok(session) => session,
        Err(e) => return Ok(internal_error("Failed to create guest session", &e)),
    };

    let identity = Identity::guest(session.id, session.expires_at);

    let entry = ActivityLogger::entry(request, "auth.guest_session")
        .session(session.id)
        .resource("session", session.id);
    ActivityLogger::log(storage.as_ref(), entry).await;

    info!("Guest session {} created", session.id);

    Ok(HttpResponse::Created()
        .cookie(session_token::session_cookie(&token, ttl_hours))
        .json(ApiResponse::success(
            GuestSessionResponse {
                user: AuthUser::from(&identity),
                session_token: token,
                expires_at: session.expires_at,
                message: format!("Guest session valid for {ttl_hours} hours"),
            },
            "Guest session created",
        )))
}
