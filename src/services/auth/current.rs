use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{
    ApiResponse,
    auth::responses::{AuthUser, SessionInfo, SessionResponse},
};
use crate::services::require_identity;

pub async fn handle_current_session(request: &HttpRequest) -> ActixResult<HttpResponse> {
    let identity = require_identity!(request);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SessionResponse {
            user: AuthUser::from(&identity),
            session: SessionInfo {
                id: identity.session_id,
                expires_at: identity.expires_at,
                is_guest: identity.is_guest,
            },
        },
        "Session is valid",
    )))
}
