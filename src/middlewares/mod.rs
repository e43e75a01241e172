//! 请求中间件
//!
//! - `RequireSession`: API 路由的会话认证
//! - `RequireRole` / `RequirePermission`: 角色与权限检查（需在 RequireSession 之后）
//! - `SessionGate`: 页面路由的会话网关
//! - `RateLimit`: 请求频率限制

pub mod rate_limit;
pub mod require_permission;
pub mod require_role;
pub mod require_session;
pub mod session_gate;

pub use rate_limit::RateLimit;
pub use require_permission::RequirePermission;
pub use require_role::RequireRole;
pub use require_session::RequireSession;
pub use session_gate::SessionGate;

use actix_web::{HttpResponse, http::StatusCode, http::header::CONTENT_TYPE};

use crate::models::{ApiResponse, ErrorCode};

// 辅助函数：创建错误响应
pub(crate) fn create_error_response(
    status: StatusCode,
    code: ErrorCode,
    message: &str,
) -> HttpResponse {
    match status {
        StatusCode::NO_CONTENT => HttpResponse::build(status)
            .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
            .finish(),
        _ => HttpResponse::build(status)
            .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
            .json(ApiResponse::<()>::error_empty(code, message)),
    }
}
