use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{
    activity::ActivityLogger, bad_request, internal_error, not_found, require_identity,
};

pub async fn delete_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = require_identity!(request);

    // 禁止删除当前用户
    if user_id == identity.user_id {
        return Ok(bad_request(
            ErrorCode::CanNotDeleteCurrentUser,
            "Cannot delete current user",
        ));
    }

    let storage = service.get_storage(request);

    // 先注销会话，删除后令牌无从查起
    if let Err(e) = service.revoke_sessions(request, user_id).await {
        return Ok(internal_error("User deletion failed", &e));
    }

    match storage.delete_user(user_id).await {
        Ok(true) => {
            let entry = ActivityLogger::entry(request, "user.delete").resource("user", user_id);
            ActivityLogger::log(storage.as_ref(), entry).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("User deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => Ok(internal_error("User deletion failed", &e)),
    }
}
