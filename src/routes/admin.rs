use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::{
    activity_logs::requests::{ActivityLogListParams, SecurityEventRequest},
    schools::requests::{SchoolListParams, SchoolPayload, UpdateSchoolRequest},
    sessions::requests::{BulkRevokeRequest, SessionListParams},
    users::{
        entities::UserRole,
        requests::{
            AssignRolesRequest, CreateUserRequest, GrantSchoolAccessRequest, LinkChildRequest,
            UpdateUserRequest, UserListParams,
        },
    },
};
use crate::services::{AdminService, SchoolService, SessionService, UserService};
use crate::utils::SafeIDI64;

static SCHOOL_SERVICE: Lazy<SchoolService> = Lazy::new(SchoolService::new_lazy);
static USER_SERVICE: Lazy<UserService> = Lazy::new(UserService::new_lazy);
static SESSION_SERVICE: Lazy<SessionService> = Lazy::new(SessionService::new_lazy);
static ADMIN_SERVICE: Lazy<AdminService> = Lazy::new(AdminService::new_lazy);

// 学校
pub async fn list_schools(
    req: HttpRequest,
    query: web::Query<SchoolListParams>,
) -> ActixResult<HttpResponse> {
    SCHOOL_SERVICE.list_schools(query.into_inner(), &req).await
}

pub async fn create_school(
    req: HttpRequest,
    payload: web::Json<SchoolPayload>,
) -> ActixResult<HttpResponse> {
    SCHOOL_SERVICE.create_school(payload.into_inner(), &req).await
}

pub async fn upsert_school(
    req: HttpRequest,
    payload: web::Json<SchoolPayload>,
) -> ActixResult<HttpResponse> {
    SCHOOL_SERVICE.upsert_school(payload.into_inner(), &req).await
}

pub async fn get_school(req: HttpRequest, school_id: SafeIDI64) -> ActixResult<HttpResponse> {
    SCHOOL_SERVICE.get_school(school_id.0, &req).await
}

pub async fn update_school(
    req: HttpRequest,
    school_id: SafeIDI64,
    update: web::Json<UpdateSchoolRequest>,
) -> ActixResult<HttpResponse> {
    SCHOOL_SERVICE
        .update_school(school_id.0, update.into_inner(), &req)
        .await
}

pub async fn delete_school(req: HttpRequest, school_id: SafeIDI64) -> ActixResult<HttpResponse> {
    SCHOOL_SERVICE.delete_school(school_id.0, &req).await
}

// 用户
pub async fn list_users(
    req: HttpRequest,
    query: web::Query<UserListParams>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.list_users(query.into_inner(), &req).await
}

pub async fn create_user(
    req: HttpRequest,
    user_data: web::Json<CreateUserRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.create_user(user_data.into_inner(), &req).await
}

pub async fn upsert_user(
    req: HttpRequest,
    user_data: web::Json<CreateUserRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.upsert_user(user_data.into_inner(), &req).await
}

pub async fn get_user(req: HttpRequest, user_id: SafeIDI64) -> ActixResult<HttpResponse> {
    USER_SERVICE.get_user(user_id.0, &req).await
}

pub async fn update_user(
    req: HttpRequest,
    user_id: SafeIDI64,
    update_data: web::Json<UpdateUserRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE
        .update_user(user_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_user(req: HttpRequest, user_id: SafeIDI64) -> ActixResult<HttpResponse> {
    USER_SERVICE.delete_user(user_id.0, &req).await
}

pub async fn assign_roles(
    req: HttpRequest,
    user_id: SafeIDI64,
    roles: web::Json<AssignRolesRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE
        .assign_roles(user_id.0, roles.into_inner(), &req)
        .await
}

pub async fn grant_school_access(
    req: HttpRequest,
    user_id: SafeIDI64,
    grant: web::Json<GrantSchoolAccessRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE
        .grant_school_access(user_id.0, grant.into_inner(), &req)
        .await
}

pub async fn link_child(
    req: HttpRequest,
    parent_id: SafeIDI64,
    link: web::Json<LinkChildRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE
        .link_child(parent_id.0, link.into_inner(), &req)
        .await
}

// 会话
pub async fn list_sessions(
    req: HttpRequest,
    query: web::Query<SessionListParams>,
) -> ActixResult<HttpResponse> {
    SESSION_SERVICE.list_sessions(query.into_inner(), &req).await
}

pub async fn revoke_session(req: HttpRequest, session_id: SafeIDI64) -> ActixResult<HttpResponse> {
    SESSION_SERVICE.revoke_session(session_id.0, &req).await
}

pub async fn bulk_revoke(
    req: HttpRequest,
    bulk: web::Json<BulkRevokeRequest>,
) -> ActixResult<HttpResponse> {
    SESSION_SERVICE.bulk_revoke(bulk.into_inner(), &req).await
}

pub async fn cleanup_sessions(req: HttpRequest) -> ActixResult<HttpResponse> {
    SESSION_SERVICE.cleanup_expired(&req).await
}

// 仪表盘与审计
pub async fn dashboard(req: HttpRequest) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.dashboard(&req).await
}

pub async fn list_activity(
    req: HttpRequest,
    query: web::Query<ActivityLogListParams>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.list_activity(query.into_inner(), &req).await
}

pub async fn log_security_event(
    req: HttpRequest,
    event: web::Json<SecurityEventRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .log_security_event(event.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/admin")
            .wrap(middlewares::RequireSession::new())
            .service(
                web::scope("/schools")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route("", web::get().to(list_schools))
                    .route("", web::post().to(create_school))
                    .route("/upsert", web::put().to(upsert_school))
                    .route("/{id}", web::get().to(get_school))
                    .route("/{id}", web::put().to(update_school))
                    .route("/{id}", web::delete().to(delete_school)),
            )
            .service(
                web::scope("/users")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route("", web::get().to(list_users))
                    .route("", web::post().to(create_user))
                    .route("/upsert", web::put().to(upsert_user))
                    .route("/{id}", web::get().to(get_user))
                    .route("/{id}", web::put().to(update_user))
                    .route("/{id}", web::delete().to(delete_user))
                    .route("/{id}/roles", web::put().to(assign_roles))
                    .route("/{id}/school-access", web::post().to(grant_school_access))
                    .route("/{id}/children", web::post().to(link_child)),
            )
            .service(
                web::scope("/sessions")
                    .wrap(middlewares::RequireRole::new_any(UserRole::super_admin_roles()))
                    .route("", web::get().to(list_sessions))
                    .route("", web::delete().to(bulk_revoke))
                    .route("/cleanup", web::post().to(cleanup_sessions))
                    .route("/{id}", web::delete().to(revoke_session)),
            )
            .service(
                web::resource("/dashboard")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route(web::get().to(dashboard)),
            )
            .service(
                web::resource("/activity")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route(web::get().to(list_activity)),
            )
            // 任意已登录用户可上报，始终返回成功
            .service(
                web::resource("/log-security-event")
                    .route(web::post().to(log_security_event)),
            ),
    );
}
