//! 集成测试共用：内存 SQLite 存储、测试用户与应用装配

#![allow(dead_code)]

use std::sync::Arc;

use rust_vlab_next::cache::ObjectCache;
use rust_vlab_next::cache::object_cache::moka::MokaCacheWrapper;
use rust_vlab_next::models::users::entities::{User, UserRole};
use rust_vlab_next::models::users::requests::CreateUserRequest;
use rust_vlab_next::services::permissions;
use rust_vlab_next::storage::Storage;
use rust_vlab_next::storage::sea_orm_storage::SeaOrmStorage;
use rust_vlab_next::utils::password::hash_password;

pub const PASSWORD: &str = "Lab-Passw0rd";

/// 已迁移并写入角色矩阵的内存数据库
pub async fn memory_storage() -> Arc<dyn Storage> {
    let storage = SeaOrmStorage::connect("sqlite::memory:")
        .await
        .expect("in-memory storage");
    let storage: Arc<dyn Storage> = Arc::new(storage);
    storage
        .seed_rbac(&permissions::role_seeds())
        .await
        .expect("seed roles");
    storage
}

pub async fn create_user(storage: &Arc<dyn Storage>, username: &str, role: UserRole) -> User {
    storage
        .create_user(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@lab.test"),
            password: hash_password(PASSWORD).expect("hash"),
            first_name: username.to_string(),
            last_name: "Tester".to_string(),
            phone: None,
            role,
            school_id: None,
        })
        .await
        .expect("create user")
}

/// 与生产配置相同 TTL 的身份缓存
pub fn session_cache() -> Option<Arc<dyn ObjectCache>> {
    Some(Arc::new(MokaCacheWrapper::with_capacity(100, 300)))
}

/// 装配全部路由的测试应用；第二个参数为会话身份缓存，缺省不带缓存
#[macro_export]
macro_rules! test_app {
    ($storage:expr) => {
        test_app!($storage, None)
    };
    ($storage:expr, $cache:expr) => {{
        let storage: std::sync::Arc<dyn rust_vlab_next::storage::Storage> = $storage.clone();
        let resolver =
            rust_vlab_next::services::auth::session::StorageSessionResolver::shared(
                storage.clone(),
                $cache,
            );
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new(storage))
                .app_data(actix_web::web::Data::new(resolver))
                .app_data(
                    actix_web::web::JsonConfig::default()
                        .error_handler(rust_vlab_next::utils::json_error_handler),
                )
                .app_data(
                    actix_web::web::QueryConfig::default()
                        .error_handler(rust_vlab_next::utils::query_error_handler),
                )
                .configure(rust_vlab_next::routes::configure_auth_routes)
                .configure(rust_vlab_next::routes::configure_admin_routes)
                .configure(rust_vlab_next::routes::configure_activity_log_routes)
                .configure(rust_vlab_next::routes::configure_course_routes)
                .configure(rust_vlab_next::routes::configure_simulation_routes)
                .configure(rust_vlab_next::routes::configure_lab_routes)
                .configure(rust_vlab_next::routes::configure_exercise_routes)
                .configure(rust_vlab_next::routes::configure_achievement_routes)
                .configure(rust_vlab_next::routes::configure_portal_routes),
        )
        .await
    }};
}

/// 登录并返回会话令牌；每个用例使用不同的客户端 IP 以避开登录限流
#[macro_export]
macro_rules! login {
    ($app:expr, $username:expr, $ip:expr) => {{
        let req = actix_web::test::TestRequest::post()
            .uri("/api/auth/login")
            .insert_header(("X-Forwarded-For", $ip))
            .set_json(serde_json::json!({
                "username": $username,
                "password": common::PASSWORD,
            }))
            .to_request();
        let resp = actix_web::test::call_service(&$app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
        resp.response()
            .cookies()
            .find(|c| c.name() == "session")
            .map(|c| c.value().to_string())
            .expect("session cookie")
    }};
}
