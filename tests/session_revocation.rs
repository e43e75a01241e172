//! 带身份缓存的会话失效：登出、吊销、停用、删除、改角色与改密码

#[macro_use]
mod common;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test;
use rust_vlab_next::models::users::entities::{UserRole, UserStatus};
use rust_vlab_next::models::users::requests::UpdateUserRequest;
use rust_vlab_next::services::auth::session::{SessionResolver, StorageSessionResolver};
use rust_vlab_next::storage::Storage;

/// 当前会话是否仍然有效
macro_rules! session_status {
    ($app:expr, $token:expr) => {{
        let req = test::TestRequest::get()
            .uri("/api/auth/session")
            .cookie(Cookie::new("session", $token.clone()))
            .to_request();
        test::call_service(&$app, req).await.status()
    }};
}

#[actix_web::test]
async fn test_cached_identity_rechecks_user_status() {
    let storage = common::memory_storage().await;
    common::create_user(&storage, "lina", UserRole::Student).await;
    let app = test_app!(storage);
    let token = login!(app, "lina", "198.51.100.20");

    let resolver = StorageSessionResolver::shared(storage.clone(), common::session_cache());
    let identity = resolver.resolve(&token).await.expect("resolve");
    let user_id = identity.as_ref().map(|i| i.user_id).expect("identity");
    assert!(resolver.resolve(&token).await.expect("resolve").is_some());

    // 直接改库停用，缓存中的身份也不再放行
    storage
        .update_user(
            user_id,
            UpdateUserRequest {
                status: Some(UserStatus::Suspended),
                ..Default::default()
            },
        )
        .await
        .expect("suspend");
    assert!(resolver.resolve(&token).await.expect("resolve").is_none());

    storage
        .update_user(
            user_id,
            UpdateUserRequest {
                status: Some(UserStatus::Active),
                ..Default::default()
            },
        )
        .await
        .expect("reactivate");
    assert!(resolver.resolve(&token).await.expect("resolve").is_some());
}

#[actix_web::test]
async fn test_cached_identity_rechecks_session() {
    let storage = common::memory_storage().await;
    common::create_user(&storage, "dalin", UserRole::Student).await;
    let app = test_app!(storage);
    let token = login!(app, "dalin", "198.51.100.19");

    let resolver = StorageSessionResolver::shared(storage.clone(), common::session_cache());
    assert!(resolver.resolve(&token).await.expect("resolve").is_some());

    // 绕过 forget 直接注销会话
    assert!(
        storage
            .deactivate_session_by_token(&token)
            .await
            .expect("deactivate")
    );
    assert!(resolver.resolve(&token).await.expect("resolve").is_none());
}

#[actix_web::test]
async fn test_suspending_user_ends_cached_session() {
    let storage = common::memory_storage().await;
    common::create_user(&storage, "admin.kim", UserRole::Admin).await;
    let student = common::create_user(&storage, "rithy", UserRole::Student).await;
    let app = test_app!(storage, common::session_cache());

    let admin = login!(app, "admin.kim", "198.51.100.21");
    let token = login!(app, "rithy", "198.51.100.22");
    assert_eq!(session_status!(app, token), StatusCode::OK);

    let req = test::TestRequest::put()
        .uri(&format!("/api/admin/users/{}", student.id))
        .cookie(Cookie::new("session", admin.clone()))
        .set_json(serde_json::json!({ "status": "suspended" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    assert_eq!(session_status!(app, token), StatusCode::UNAUTHORIZED);
    assert_eq!(session_status!(app, admin), StatusCode::OK);
}

#[actix_web::test]
async fn test_profile_edit_keeps_session() {
    let storage = common::memory_storage().await;
    common::create_user(&storage, "admin.ly", UserRole::Admin).await;
    let student = common::create_user(&storage, "malis", UserRole::Student).await;
    let app = test_app!(storage, common::session_cache());

    let admin = login!(app, "admin.ly", "198.51.100.23");
    let token = login!(app, "malis", "198.51.100.24");

    let req = test::TestRequest::put()
        .uri(&format!("/api/admin/users/{}", student.id))
        .cookie(Cookie::new("session", admin))
        .set_json(serde_json::json!({ "phone": "012 345 678" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    assert_eq!(session_status!(app, token), StatusCode::OK);
}

#[actix_web::test]
async fn test_admin_password_reset_ends_cached_session() {
    let storage = common::memory_storage().await;
    common::create_user(&storage, "admin.ny", UserRole::Admin).await;
    let student = common::create_user(&storage, "piseth", UserRole::Student).await;
    let app = test_app!(storage, common::session_cache());

    let admin = login!(app, "admin.ny", "198.51.100.25");
    let token = login!(app, "piseth", "198.51.100.26");
    assert_eq!(session_status!(app, token), StatusCode::OK);

    let req = test::TestRequest::put()
        .uri(&format!("/api/admin/users/{}", student.id))
        .cookie(Cookie::new("session", admin))
        .set_json(serde_json::json!({ "password": "Reset-Passw0rd" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    assert_eq!(session_status!(app, token), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_role_change_ends_cached_session() {
    let storage = common::memory_storage().await;
    common::create_user(&storage, "admin.so", UserRole::Admin).await;
    let user = common::create_user(&storage, "chenda", UserRole::Student).await;
    let app = test_app!(storage, common::session_cache());

    let admin = login!(app, "admin.so", "198.51.100.27");
    let token = login!(app, "chenda", "198.51.100.28");
    assert_eq!(session_status!(app, token), StatusCode::OK);

    let req = test::TestRequest::put()
        .uri(&format!("/api/admin/users/{}/roles", user.id))
        .cookie(Cookie::new("session", admin))
        .set_json(serde_json::json!({ "roles": ["teacher"] }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    assert_eq!(session_status!(app, token), StatusCode::UNAUTHORIZED);

    // 重新登录后拿到新角色
    let token = login!(app, "chenda", "198.51.100.29");
    let req = test::TestRequest::get()
        .uri("/api/auth/session")
        .cookie(Cookie::new("session", token))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["user"]["primary_role"], "teacher");
}

#[actix_web::test]
async fn test_deleting_user_ends_cached_session() {
    let storage = common::memory_storage().await;
    common::create_user(&storage, "admin.vy", UserRole::Admin).await;
    let user = common::create_user(&storage, "sreyneang", UserRole::Student).await;
    let app = test_app!(storage, common::session_cache());

    let admin = login!(app, "admin.vy", "198.51.100.30");
    let token = login!(app, "sreyneang", "198.51.100.31");
    assert_eq!(session_status!(app, token), StatusCode::OK);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/users/{}", user.id))
        .cookie(Cookie::new("session", admin))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    assert_eq!(session_status!(app, token), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_logout_ends_cached_session() {
    let storage = common::memory_storage().await;
    common::create_user(&storage, "bopha", UserRole::Teacher).await;
    let app = test_app!(storage, common::session_cache());

    let token = login!(app, "bopha", "198.51.100.32");
    assert_eq!(session_status!(app, token), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/auth/logout")
        .cookie(Cookie::new("session", token.clone()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    assert_eq!(session_status!(app, token), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_admin_revoke_ends_cached_session() {
    let storage = common::memory_storage().await;
    common::create_user(&storage, "root.admin", UserRole::SuperAdmin).await;
    common::create_user(&storage, "visal", UserRole::Student).await;
    let app = test_app!(storage, common::session_cache());

    let admin = login!(app, "root.admin", "198.51.100.33");
    let token = login!(app, "visal", "198.51.100.34");
    assert_eq!(session_status!(app, token), StatusCode::OK);

    let session = storage
        .get_session_by_token(&token)
        .await
        .expect("lookup")
        .expect("session");
    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/sessions/{}", session.id))
        .cookie(Cookie::new("session", admin))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    assert_eq!(session_status!(app, token), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_password_change_ends_every_session() {
    let storage = common::memory_storage().await;
    common::create_user(&storage, "sokunthea", UserRole::Teacher).await;
    let app = test_app!(storage, common::session_cache());

    let laptop = login!(app, "sokunthea", "198.51.100.35");
    let phone = login!(app, "sokunthea", "198.51.100.36");
    assert_eq!(session_status!(app, laptop), StatusCode::OK);
    assert_eq!(session_status!(app, phone), StatusCode::OK);

    let req = test::TestRequest::put()
        .uri("/api/auth/password")
        .cookie(Cookie::new("session", laptop.clone()))
        .set_json(serde_json::json!({
            "current_password": common::PASSWORD,
            "new_password": "Changed-Passw0rd",
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    assert_eq!(session_status!(app, laptop), StatusCode::UNAUTHORIZED);
    assert_eq!(session_status!(app, phone), StatusCode::UNAUTHORIZED);

    // 旧密码失效，新密码可登录
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .insert_header(("X-Forwarded-For", "198.51.100.37"))
        .set_json(serde_json::json!({
            "username": "sokunthea",
            "password": common::PASSWORD,
        }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .insert_header(("X-Forwarded-For", "198.51.100.37"))
        .set_json(serde_json::json!({
            "username": "sokunthea",
            "password": "Changed-Passw0rd",
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}
