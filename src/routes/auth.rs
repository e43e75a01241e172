use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::auth::requests::{ChangePasswordRequest, LoginRequest, PermissionCheckParams};
use crate::services::AuthService;

// 懒加载的全局 AuthService 实例
static AUTH_SERVICE: Lazy<AuthService> = Lazy::new(AuthService::new_lazy);

pub async fn login(
    req: HttpRequest,
    login_data: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.login(login_data.into_inner(), &req).await
}

pub async fn logout(req: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.logout(&req).await
}

pub async fn current_session(req: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.current_session(&req).await
}

pub async fn create_guest_session(req: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.create_guest_session(&req).await
}

pub async fn check_permission_query(
    req: HttpRequest,
    query: web::Query<PermissionCheckParams>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.check_permission(query.into_inner(), &req).await
}

pub async fn check_permission_body(
    req: HttpRequest,
    body: web::Json<PermissionCheckParams>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.check_permission(body.into_inner(), &req).await
}

pub async fn change_password(
    req: HttpRequest,
    body: web::Json<ChangePasswordRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.change_password(body.into_inner(), &req).await
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .service(
                web::resource("/login")
                    .wrap(middlewares::RateLimit::login())
                    .route(web::post().to(login)),
            )
            .service(
                web::resource("/logout")
                    .route(web::post().to(logout))
                    .route(web::get().to(logout)),
            )
            .service(
                web::resource("/guest")
                    .wrap(middlewares::RateLimit::guest_session())
                    .route(web::post().to(create_guest_session)),
            )
            // 未登录时返回 allowed=false，由处理程序自行解析会话
            .service(
                web::resource("/check-permission")
                    .route(web::get().to(check_permission_query))
                    .route(web::post().to(check_permission_body)),
            )
            .service(
                web::resource("/session")
                    .wrap(middlewares::RequireSession::allow_guest())
                    .route(web::get().to(current_session)),
            )
            .service(
                web::resource("/password")
                    .wrap(middlewares::RequireSession::new())
                    .route(web::put().to(change_password)),
            ),
    );
}
