use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SessionService;
use crate::models::{ApiResponse, sessions::requests::SessionListParams};
use crate::services::internal_error;

pub async fn list_sessions(
    service: &SessionService,
    query: SessionListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_sessions_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Session list retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve session list", &e)),
    }
}
