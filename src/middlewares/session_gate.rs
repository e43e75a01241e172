/*!
 * 页面会话网关
 *
 * 包裹前端页面路由（SPA fallback）。`classify_request` 根据路径与会话决定放行、
 * 重定向或转发身份；中间件执行该决定。
 *
 * 判定顺序：
 * 1. 公开前缀直接放行
 * 2. 访客前缀（仿真预览）有无会话均放行
 * 3. 根路径重定向到登录页或角色落地页
 * 4. 其余路径需要非访客会话，并按角色限制区域
 *
 * 转发时写入 `x-user-id`、`x-user-roles`、`x-user-permissions`、`x-session-id`
 * 请求头，并把 `Identity` 放入请求扩展。
 */

use std::rc::Rc;
use std::sync::Arc;

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::{self, HeaderName, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{debug, warn};

use crate::models::{
    activity_logs::entities::{ActivityEntry, Severity},
    auth::entities::Identity,
    users::entities::UserRole,
};
use crate::services::activity::ActivityLogger;
use crate::services::auth::session::{SessionResolver, resolver_from_request};
use crate::services::permissions::{
    DASHBOARD_PAGE, LOGIN_PAGE, PARENT_PAGE, STUDENT_PAGE, landing_page_for, path_has_prefix,
};
use crate::storage::Storage;
use crate::utils::session_token;

/// 无需会话的前缀
pub const PUBLIC_PREFIXES: &[&str] = &[
    "/auth/login",
    "/auth/signin",
    "/auth/callback",
    "/auth/register",
    "/api/auth/login",
    "/api/auth/register",
    "/api/auth/guest",
    "/_next",
    "/assets",
    "/static",
    "/uploads",
    "/favicon.ico",
    "/showcase",
    "/about",
    "/simulations",
    "/api/public",
];

/// 访客可访问的前缀
pub const GUEST_PREFIXES: &[&str] = &["/simulation/", "/preview/"];

const ADMIN_PREFIXES: &[&str] = &["/dashboard/admin", "/admin"];

pub const AUDIT_ACTION: &str = "security.unauthorized_admin_access";

#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    Public,
    Guest(Option<Identity>),
    Forward(Identity),
    Redirect {
        location: String,
        clear_cookie: bool,
    },
    UnauthorizedAdmin(Identity),
}

impl GateDecision {
    fn redirect(location: impl Into<String>) -> Self {
        GateDecision::Redirect {
            location: location.into(),
            clear_cookie: false,
        }
    }
}

fn matches_any(path: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|p| path_has_prefix(path, p))
}

/// 登录页地址，附带原路径
pub fn login_redirect(path: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(path.as_bytes()).collect();
    format!("{LOGIN_PAGE}?redirect={encoded}")
}

/// 解析失败与存储错误一律视为无会话
async fn resolve(resolver: &dyn SessionResolver, token: &str) -> Option<Identity> {
    match resolver.resolve(token).await {
        Ok(identity) => identity,
        Err(e) => {
            warn!("Session lookup failed in gate, treating as anonymous: {}", e);
            None
        }
    }
}

pub async fn classify_request(
    path: &str,
    cookie: Option<&str>,
    resolver: &dyn SessionResolver,
) -> GateDecision {
    if matches_any(path, PUBLIC_PREFIXES) {
        return GateDecision::Public;
    }

    let cookie = cookie.filter(|c| !c.is_empty());

    if matches_any(path, GUEST_PREFIXES) {
        return match cookie {
            None => GateDecision::Guest(None),
            Some(token) => GateDecision::Guest(resolve(resolver, token).await),
        };
    }

    if path == "/" {
        let Some(token) = cookie else {
            return GateDecision::redirect(LOGIN_PAGE);
        };
        return match resolve(resolver, token).await {
            Some(identity) => GateDecision::redirect(landing_page_for(&identity.roles)),
            None => GateDecision::Redirect {
                location: LOGIN_PAGE.to_string(),
                clear_cookie: true,
            },
        };
    }

    let Some(token) = cookie else {
        return GateDecision::redirect(login_redirect(path));
    };
    let identity = match resolve(resolver, token).await {
        Some(identity) if !identity.is_guest => identity,
        _ => return GateDecision::redirect(login_redirect(path)),
    };

    if identity.is_student() && !path_has_prefix(path, STUDENT_PAGE) {
        return GateDecision::redirect(STUDENT_PAGE);
    }
    if !identity.is_student() && identity.is_parent() && !path_has_prefix(path, PARENT_PAGE) {
        return GateDecision::redirect(PARENT_PAGE);
    }
    if matches_any(path, ADMIN_PREFIXES) && !identity.has_any_role(UserRole::admin_roles()) {
        return GateDecision::UnauthorizedAdmin(identity);
    }

    GateDecision::Forward(identity)
}

/// 身份请求头
fn identity_headers(identity: &Identity) -> Vec<(HeaderName, String)> {
    let to_json = |values: &[String]| serde_json::to_string(values).unwrap_or_else(|_| "[]".into());
    vec![
        (HeaderName::from_static("x-user-id"), identity.user_id.to_string()),
        (HeaderName::from_static("x-user-roles"), to_json(&identity.roles)),
        (
            HeaderName::from_static("x-user-permissions"),
            to_json(&identity.permissions),
        ),
        (HeaderName::from_static("x-session-id"), identity.session_id.to_string()),
    ]
}

fn propagate_identity(req: &mut ServiceRequest, identity: Identity) {
    for (name, value) in identity_headers(&identity) {
        if let Ok(value) = HeaderValue::from_str(&value) {
            req.headers_mut().insert(name, value);
        }
    }
    req.extensions_mut().insert(identity);
}

fn redirect_response(location: &str, clear_cookie: bool) -> HttpResponse {
    let mut response = HttpResponse::TemporaryRedirect();
    response.insert_header((header::LOCATION, location.to_string()));
    if clear_cookie {
        response.cookie(session_token::clear_session_cookie());
    }
    response.finish()
}

/// 越权访问管理页面的审计记录（后台写入）
fn audit_unauthorized_admin(req: &ServiceRequest, identity: &Identity) {
    let Some(storage) = req
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
    else {
        warn!("Storage not available, skipping admin access audit");
        return;
    };
    let entry = ActivityEntry::new(AUDIT_ACTION)
        .user(Some(identity.user_id))
        .session(identity.session_id)
        .resource_type("page")
        .client(
            session_token::client_ip(req.request()),
            session_token::user_agent(req.request()),
        )
        .severity(Severity::High)
        .details(serde_json::json!({
            "path": req.path(),
            "roles": identity.roles,
        }));
    ActivityLogger::spawn(storage, entry);
}

#[derive(Clone, Default)]
pub struct SessionGate;

impl<S, B> Transform<S, ServiceRequest> for SessionGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionGateMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct SessionGateMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SessionGateMiddleware<S>
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

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();

        Box::pin(async move {
            let path = req.path().to_string();
            let cookie = session_token::token_from_request(req.request());

            let decision = match resolver_from_request(req.request()) {
                Some(resolver) => classify_request(&path, cookie.as_deref(), resolver.as_ref()).await,
                None => {
                    warn!("Session resolver not found in app data, gate runs without sessions");
                    classify_request(&path, None, &NoSessions).await
                }
            };
            debug!("Gate decision for {}: {:?}", path, decision);

            match decision {
                GateDecision::Public | GateDecision::Guest(None) => {}
                GateDecision::Guest(Some(identity)) | GateDecision::Forward(identity) => {
                    propagate_identity(&mut req, identity);
                }
                GateDecision::Redirect {
                    location,
                    clear_cookie,
                } => {
                    return Ok(req.into_response(
                        redirect_response(&location, clear_cookie).map_into_right_body(),
                    ));
                }
                GateDecision::UnauthorizedAdmin(identity) => {
                    audit_unauthorized_admin(&req, &identity);
                    return Ok(req.into_response(
                        redirect_response(DASHBOARD_PAGE, false).map_into_right_body(),
                    ));
                }
            }

            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}

/// 未配置解析器时使用
struct NoSessions;

#[async_trait::async_trait]
impl SessionResolver for NoSessions {
    async fn resolve(&self, _token: &str) -> crate::errors::Result<Option<Identity>> {
        Ok(None)
    }

    async fn forget(&self, _token: &str) {}
}

#[cfg(test)]
mod tests {
    use actix_web::{App, HttpRequest, http::StatusCode, test, web};

    use super::*;
    use crate::models::auth::entities::fixtures::identity_with;
    use crate::services::auth::session::fakes::FakeResolver;

    fn resolver() -> FakeResolver {
        let guest = Identity::guest(40, chrono::Utc::now() + chrono::Duration::hours(4));
        FakeResolver::default()
            .with("teacher", identity_with(2, &["teacher"], &["pages.dashboard"]))
            .with("admin", identity_with(1, &["admin"], &[]))
            .with("student", identity_with(3, &["student"], &[]))
            .with("parent", identity_with(4, &["guardian"], &[]))
            .with("both", identity_with(5, &["parent", "student"], &[]))
            .with("guest", guest)
    }

    fn redirect_to(location: &str) -> GateDecision {
        GateDecision::Redirect {
            location: location.to_string(),
            clear_cookie: false,
        }
    }

    #[actix_web::test]
    async fn test_public_paths_skip_lookup() {
        let r = resolver();
        for path in ["/auth/login", "/_next/static/app.js", "/simulations", "/api/public/simulations"] {
            assert_eq!(classify_request(path, Some("boom"), &r).await, GateDecision::Public);
        }
    }

    #[actix_web::test]
    async fn test_guest_paths() {
        let r = resolver();
        assert_eq!(
            classify_request("/simulation/pendulum", None, &r).await,
            GateDecision::Guest(None)
        );
        match classify_request("/preview/circuit", Some("guest"), &r).await {
            GateDecision::Guest(Some(identity)) => assert!(identity.is_guest),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            classify_request("/simulation/x", Some("unknown"), &r).await,
            GateDecision::Guest(None)
        );
        assert_eq!(
            classify_request("/simulation/x", Some("boom"), &r).await,
            GateDecision::Guest(None)
        );
    }

    #[actix_web::test]
    async fn test_root_redirects() {
        let r = resolver();
        assert_eq!(classify_request("/", None, &r).await, redirect_to("/auth/login"));
        assert_eq!(classify_request("/", Some("student"), &r).await, redirect_to("/student"));
        assert_eq!(classify_request("/", Some("parent"), &r).await, redirect_to("/parent"));
        assert_eq!(classify_request("/", Some("teacher"), &r).await, redirect_to("/dashboard"));
        assert_eq!(
            classify_request("/", Some("stale"), &r).await,
            GateDecision::Redirect {
                location: "/auth/login".into(),
                clear_cookie: true
            }
        );
    }

    #[actix_web::test]
    async fn test_protected_paths() {
        let r = resolver();
        assert_eq!(
            classify_request("/dashboard/labs", None, &r).await,
            redirect_to("/auth/login?redirect=%2Fdashboard%2Flabs")
        );
        assert_eq!(
            classify_request("/dashboard", Some("boom"), &r).await,
            redirect_to("/auth/login?redirect=%2Fdashboard")
        );
        assert_eq!(
            classify_request("/dashboard", Some("guest"), &r).await,
            redirect_to("/auth/login?redirect=%2Fdashboard")
        );
        assert_eq!(
            classify_request("/dashboard", Some("student"), &r).await,
            redirect_to("/student")
        );
        assert_eq!(
            classify_request("/dashboard", Some("both"), &r).await,
            redirect_to("/student")
        );
        assert_eq!(
            classify_request("/student/labs", Some("parent"), &r).await,
            redirect_to("/parent")
        );
        assert!(matches!(
            classify_request("/student/labs/3", Some("student"), &r).await,
            GateDecision::Forward(_)
        ));
    }

    #[actix_web::test]
    async fn test_admin_area() {
        let r = resolver();
        assert!(matches!(
            classify_request("/dashboard/admin/users", Some("teacher"), &r).await,
            GateDecision::UnauthorizedAdmin(_)
        ));
        assert!(matches!(
            classify_request("/admin", Some("admin"), &r).await,
            GateDecision::Forward(_)
        ));
    }

    async fn echo_headers(req: HttpRequest) -> String {
        let get = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-")
                .to_string()
        };
        format!("{}|{}|{}", get("x-user-id"), get("x-user-roles"), get("x-session-id"))
    }

    #[actix_web::test]
    async fn test_gate_propagates_identity_headers() {
        let resolver: Arc<dyn SessionResolver> = Arc::new(resolver());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(resolver))
                .service(
                    web::scope("")
                        .wrap(SessionGate)
                        .route("/{tail:.*}", web::get().to(echo_headers)),
                ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/dashboard/courses")
            .cookie(actix_web::cookie::Cookie::new("session", "teacher"))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, r#"2|["teacher"]|1"#);

        let req = test::TestRequest::get().uri("/dashboard").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "/auth/login?redirect=%2Fdashboard"
        );
    }

    #[actix_web::test]
    async fn test_stale_cookie_on_root_is_cleared() {
        let resolver: Arc<dyn SessionResolver> = Arc::new(resolver());
        let app = test::init_service(
            App::new().app_data(web::Data::new(resolver)).service(
                web::scope("")
                    .wrap(SessionGate)
                    .route("/{tail:.*}", web::get().to(echo_headers)),
            ),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/")
            .cookie(actix_web::cookie::Cookie::new("session", "stale"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let cleared = resp
            .response()
            .cookies()
            .find(|c| c.name() == "session")
            .expect("cookie should be cleared");
        assert_eq!(cleared.max_age(), Some(actix_web::cookie::time::Duration::ZERO));
    }
}
