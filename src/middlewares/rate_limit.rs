/*!
 * 速率限制中间件
 *
 * 固定窗口计数：键中带窗口起点，窗口切换后使用新键，旧计数随缓存过期淘汰。
 * 计数存放在进程内 moka 缓存中。已认证请求按用户计数，其余按客户端 IP 计数。
 * 超过限制返回 429，Retry-After 为当前窗口剩余秒数。
 *
 * ```rust,ignore
 * web::resource("/login")
 *     .wrap(RateLimit::login())  // 5次/分钟
 *     .route(web::post().to(login))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::CONTENT_TYPE,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::rc::Rc;
use std::time::Duration;
use tracing::warn;

use crate::models::{ApiResponse, ErrorCode, auth::entities::Identity};
use crate::utils::session_token;

/// 计数保留时长，需不短于最长的窗口
const MAX_WINDOW_SECS: u64 = 3600;

/// 键: 前缀:user|ip:窗口起点，值: 窗口内请求计数
static RATE_LIMIT_CACHE: Lazy<Cache<String, u32>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(MAX_WINDOW_SECS))
        .max_capacity(100_000)
        .build()
});

#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    window_secs: u64,
    key_prefix: &'static str,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_secs: u64, key_prefix: &'static str) -> Self {
        Self {
            max_requests,
            window_secs: window_secs.clamp(1, MAX_WINDOW_SECS),
            key_prefix,
        }
    }

    /// 当前时刻所在窗口的起点与剩余秒数
    fn window_at(&self, now_secs: u64) -> (u64, u64) {
        let start = now_secs - now_secs % self.window_secs;
        (start, start + self.window_secs - now_secs)
    }

    /// 登录：5次/分钟/IP
    pub fn login() -> Self {
        Self::new(5, 60, "login")
    }

    /// 访客会话：10次/分钟/IP
    pub fn guest_session() -> Self {
        Self::new(10, 60, "guest")
    }

    /// 文件上传：10次/分钟/用户
    pub fn file_upload() -> Self {
        Self::new(10, 60, "upload")
    }

    /// 客户端事件上报：100次/分钟/用户
    pub fn api() -> Self {
        Self::new(100, 60, "api")
    }
}

/// 计数键：有用户时按用户，否则按 IP
fn limit_key(prefix: &str, user_id: Option<i64>, ip: Option<&str>, window_start: u64) -> String {
    let identifier = match user_id {
        Some(id) => format!("user:{id}"),
        None => format!("ip:{}", ip.unwrap_or("unknown")),
    };
    format!("{prefix}:{identifier}:{window_start}")
}

fn unix_now() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

fn create_rate_limit_response(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please try again later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
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
        let limit = self.limit.clone();

        Box::pin(async move {
            let user_id = req
                .extensions()
                .get::<Identity>()
                .filter(|identity| !identity.is_guest)
                .map(|identity| identity.user_id);
            let ip = session_token::client_ip(req.request());
            let (window_start, remaining_secs) = limit.window_at(unix_now());
            let cache_key = limit_key(limit.key_prefix, user_id, ip.as_deref(), window_start);

            let current_count = RATE_LIMIT_CACHE.get(&cache_key).await.unwrap_or(0);
            if current_count >= limit.max_requests {
                warn!(
                    "Rate limit exceeded for key: {} (count: {}/{})",
                    cache_key, current_count, limit.max_requests
                );
                return Ok(req.into_response(
                    create_rate_limit_response(remaining_secs).map_into_right_body(),
                ));
            }

            RATE_LIMIT_CACHE.insert(cache_key, current_count + 1).await;

            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{App, web};

    use super::*;

    #[test]
    fn test_presets() {
        let login = RateLimit::login();
        assert_eq!((login.max_requests, login.window_secs), (5, 60));
        assert_eq!(RateLimit::file_upload().max_requests, 10);
        assert_eq!(RateLimit::api().key_prefix, "api");
        assert_eq!(RateLimit::new(1, 0, "zero").window_secs, 1);
    }

    #[test]
    fn test_limit_key() {
        assert_eq!(
            limit_key("login", None, Some("10.0.0.1"), 120),
            "login:ip:10.0.0.1:120"
        );
        assert_eq!(
            limit_key("upload", Some(7), Some("10.0.0.1"), 120),
            "upload:user:7:120"
        );
        assert_eq!(limit_key("guest", None, None, 0), "guest:ip:unknown:0");
    }

    #[test]
    fn test_fixed_window_boundaries() {
        let limit = RateLimit::new(5, 60, "window");
        assert_eq!(limit.window_at(120), (120, 60));
        assert_eq!(limit.window_at(150), (120, 30));
        assert_eq!(limit.window_at(179), (120, 1));
        // 下一个窗口换用新键，计数从零开始
        assert_eq!(limit.window_at(180), (180, 60));
        assert_ne!(
            limit_key("window", None, Some("10.0.0.1"), limit.window_at(179).0),
            limit_key("window", None, Some("10.0.0.1"), limit.window_at(180).0)
        );
    }

    #[actix_web::test]
    async fn test_blocks_after_limit() {
        let app = actix_web::test::init_service(
            App::new().service(
                web::resource("/limited")
                    .wrap(RateLimit::new(2, 60, "limited-test"))
                    .route(web::get().to(|| async { HttpResponse::Ok().finish() })),
            ),
        )
        .await;

        let request = || {
            actix_web::test::TestRequest::get()
                .uri("/limited")
                .insert_header(("X-Forwarded-For", "198.51.100.77"))
                .to_request()
        };
        let mut statuses = Vec::new();
        for _ in 0..3 {
            let resp = actix_web::test::call_service(&app, request()).await;
            statuses.push(resp.status());
            if resp.status() == StatusCode::TOO_MANY_REQUESTS {
                let retry_after: u64 = resp
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
                    .expect("Retry-After header");
                assert!((1..=60).contains(&retry_after));
            }
        }
        // 三次请求可能跨越窗口边界，至少前两次放行
        assert_eq!(&statuses[..2], &[StatusCode::OK, StatusCode::OK]);
    }
}
