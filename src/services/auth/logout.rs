use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::warn;

use crate::models::ApiResponse;
use crate::services::activity::ActivityLogger;
use crate::utils::session_token;

use super::session::SessionResolver;

use super::AuthService;

/// 注销当前会话并清除 Cookie，始终返回成功
pub async fn handle_logout(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(token) = session_token::token_from_request(request) {
        let storage = service.get_storage(request);

        let identity = match super::session::resolver_from_request(request) {
            Some(resolver) => resolver.resolve(&token).await.ok().flatten(),
            None => None,
        };

        if let Err(e) = storage.deactivate_session_by_token(&token).await {
            warn!("Failed to deactivate session on logout: {}", e);
        }
        service.forget_tokens(request, std::slice::from_ref(&token)).await;

        let mut entry = ActivityLogger::entry(request, "auth.logout");
        if let Some(identity) = identity.filter(|i| !i.is_guest) {
            entry = entry.user(Some(identity.user_id)).session(identity.session_id);
        }
        ActivityLogger::log(storage.as_ref(), entry).await;
    }

    Ok(HttpResponse::Ok()
        .cookie(session_token::clear_session_cookie())
        .json(ApiResponse::<()>::success_empty("Logged out")))
}
