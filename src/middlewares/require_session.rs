/*!
 * 会话认证中间件
 *
 * 读取 `session` Cookie，经 `SessionResolver` 解析为 `Identity` 并放入请求扩展。
 * 没有有效会话时返回 401。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * web::scope("/api/courses")
 *     .wrap(RequireSession::new())          // 访客会话不通过
 *     .route("", web::get().to(list_courses))
 *
 * web::scope("/api/simulations")
 *     .wrap(RequireSession::allow_guest())  // 访客会话也可通过
 * ```
 *
 * 处理程序中读取身份：
 *
 * ```rust,ignore
 * let identity = RequireSession::extract_identity(&req);
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpRequest,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{debug, error, info};

use super::create_error_response;
use crate::models::{ErrorCode, auth::entities::Identity};
use crate::services::auth::session::resolver_from_request;
use crate::utils::session_token;

#[derive(Clone)]
pub struct RequireSession {
    allow_guest: bool,
}

impl RequireSession {
    pub fn new() -> Self {
        Self { allow_guest: false }
    }

    pub fn allow_guest() -> Self {
        Self { allow_guest: true }
    }
}

impl Default for RequireSession {
    fn default() -> Self {
        Self::new()
    }
}

// 解析请求中的会话
async fn resolve_identity(req: &ServiceRequest) -> Result<Identity, &'static str> {
    let token = session_token::token_from_request(req.request()).ok_or("Not authenticated")?;

    let Some(resolver) = resolver_from_request(req.request()) else {
        error!("Session resolver not found in app data");
        return Err("Not authenticated");
    };

    match resolver.resolve(&token).await {
        Ok(Some(identity)) => Ok(identity),
        Ok(None) => Err("Session is invalid or expired"),
        Err(e) => {
            error!("Session resolution failed: {}", e);
            Err("Not authenticated")
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireSession
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireSessionMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireSessionMiddleware {
            service: Rc::new(service),
            allow_guest: self.allow_guest,
        }))
    }
}

pub struct RequireSessionMiddleware<S> {
    service: Rc<S>,
    allow_guest: bool,
}

impl<S, B> Service<ServiceRequest> for RequireSessionMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let allow_guest = self.allow_guest;

        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match resolve_identity(&req).await {
                Ok(identity) if identity.is_guest && !allow_guest => {
                    info!("Guest session rejected for {}", req.path());
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            "Login required",
                        )
                        .map_into_right_body(),
                    ))
                }
                Ok(identity) => {
                    debug!("Session authentication successful for ID: {}", identity.user_id);
                    req.extensions_mut().insert(identity);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(reason) => {
                    info!(
                        "Session authentication failed for request to {}: {}",
                        req.path(),
                        reason
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            reason,
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

// 辅助函数：从请求中提取身份信息
impl RequireSession {
    /// 从请求扩展中提取身份
    /// 此函数应该在应用了 RequireSession 或 SessionGate 的路由处理程序中使用
    pub fn extract_identity(req: &HttpRequest) -> Option<Identity> {
        req.extensions().get::<Identity>().cloned()
    }

    pub fn extract_user_id(req: &HttpRequest) -> Option<i64> {
        req.extensions()
            .get::<Identity>()
            .filter(|identity| !identity.is_guest)
            .map(|identity| identity.user_id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, HttpResponse, test, web};

    use super::*;
    use crate::models::auth::entities::fixtures::identity_with;
    use crate::services::auth::session::{SessionResolver, fakes::FakeResolver};

    const TOKEN: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    async fn whoami(req: HttpRequest) -> HttpResponse {
        match RequireSession::extract_identity(&req) {
            Some(identity) => HttpResponse::Ok().body(identity.username),
            None => HttpResponse::InternalServerError().finish(),
        }
    }

    fn resolver() -> Arc<dyn SessionResolver> {
        let guest = Identity::guest(9, chrono::Utc::now() + chrono::Duration::hours(1));
        Arc::new(
            FakeResolver::default()
                .with(TOKEN, identity_with(4, &["teacher"], &[]))
                .with("guest-token", guest),
        )
    }

    #[actix_web::test]
    async fn test_missing_cookie_is_unauthorized() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(resolver()))
                .service(web::scope("/api").wrap(RequireSession::new()).route("/me", web::get().to(whoami))),
        )
        .await;
        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/me").to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_valid_cookie_places_identity() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(resolver()))
                .service(web::scope("/api").wrap(RequireSession::new()).route("/me", web::get().to(whoami))),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/api/me")
            .cookie(actix_web::cookie::Cookie::new("session", TOKEN))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "user4");
    }

    #[actix_web::test]
    async fn test_guest_session_needs_opt_in() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(resolver()))
                .service(web::scope("/strict").wrap(RequireSession::new()).route("", web::get().to(whoami)))
                .service(
                    web::scope("/open")
                        .wrap(RequireSession::allow_guest())
                        .route("", web::get().to(whoami)),
                ),
        )
        .await;
        let cookie = actix_web::cookie::Cookie::new("session", "guest-token");
        let strict = test::TestRequest::get().uri("/strict").cookie(cookie.clone()).to_request();
        assert_eq!(test::call_service(&app, strict).await.status(), StatusCode::UNAUTHORIZED);
        let open = test::TestRequest::get().uri("/open").cookie(cookie).to_request();
        assert_eq!(test::call_service(&app, open).await.status(), StatusCode::OK);
    }
}
