//! HTTP 契约测试：会话认证、权限与基本 CRUD 状态码

#[macro_use]
mod common;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test;
use rust_vlab_next::models::users::entities::UserRole;

#[actix_web::test]
async fn test_api_requires_session() {
    let storage = common::memory_storage().await;
    let app = test_app!(storage);

    for uri in [
        "/api/courses",
        "/api/labs",
        "/api/admin/users",
        "/api/activity-logs",
        "/api/student/stats",
        "/api/parent/children",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }

    let req = test::TestRequest::get()
        .uri("/api/public/simulations")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_unknown_token_is_rejected() {
    let storage = common::memory_storage().await;
    let app = test_app!(storage);

    let req = test::TestRequest::get()
        .uri("/api/courses")
        .cookie(Cookie::new("session", "not-a-real-token"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn test_login_session_logout() {
    let storage = common::memory_storage().await;
    common::create_user(&storage, "ms.chan", UserRole::Teacher).await;
    let app = test_app!(storage);

    let token = login!(app, "ms.chan", "203.0.113.10");

    let req = test::TestRequest::get()
        .uri("/api/auth/session")
        .cookie(Cookie::new("session", token.clone()))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user"]["username"], "ms.chan");
    assert_eq!(body["data"]["user"]["primary_role"], "teacher");

    let req = test::TestRequest::post()
        .uri("/api/auth/logout")
        .cookie(Cookie::new("session", token.clone()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/auth/session")
        .cookie(Cookie::new("session", token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn test_login_rejects_wrong_password() {
    let storage = common::memory_storage().await;
    common::create_user(&storage, "dara", UserRole::Student).await;
    let app = test_app!(storage);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .insert_header(("X-Forwarded-For", "203.0.113.11"))
        .set_json(serde_json::json!({ "username": "dara", "password": "wrong" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .insert_header(("X-Forwarded-For", "203.0.113.11"))
        .set_json(serde_json::json!({ "username": "dara" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[actix_web::test]
async fn test_check_permission_without_session() {
    let storage = common::memory_storage().await;
    let app = test_app!(storage);

    let req = test::TestRequest::get()
        .uri("/api/auth/check-permission?type=page&path=/dashboard")
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["allowed"], false);
    assert_eq!(body["data"]["fallback_page"], "/auth/login");
}

#[actix_web::test]
async fn test_course_permissions_and_lookup() {
    let storage = common::memory_storage().await;
    common::create_user(&storage, "mr.sok", UserRole::Teacher).await;
    common::create_user(&storage, "vanna", UserRole::Student).await;
    let app = test_app!(storage);

    let teacher = login!(app, "mr.sok", "203.0.113.12");
    let student = login!(app, "vanna", "203.0.113.13");

    let course = serde_json::json!({
        "code": "PHY-101",
        "title": "Physics I",
        "schedules": [{ "day_of_week": 1, "start_time": "08:00", "end_time": "09:30" }],
    });

    let req = test::TestRequest::post()
        .uri("/api/courses")
        .cookie(Cookie::new("session", student.clone()))
        .set_json(&course)
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    let req = test::TestRequest::post()
        .uri("/api/courses")
        .cookie(Cookie::new("session", teacher.clone()))
        .set_json(&course)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    let course_id = body["data"]["course"]["id"].as_i64().expect("course id");
    assert_eq!(body["data"]["course"]["schedules"].as_array().map(Vec::len), Some(1));

    let req = test::TestRequest::get()
        .uri(&format!("/api/courses/{course_id}"))
        .cookie(Cookie::new("session", teacher.clone()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/courses/99999")
        .cookie(Cookie::new("session", teacher.clone()))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    // 重复的课程代码
    let req = test::TestRequest::post()
        .uri("/api/courses")
        .cookie(Cookie::new("session", teacher))
        .set_json(&course)
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CONFLICT
    );
}

#[actix_web::test]
async fn test_student_cannot_reach_admin_routes() {
    let storage = common::memory_storage().await;
    common::create_user(&storage, "sophea", UserRole::Student).await;
    let app = test_app!(storage);

    let student = login!(app, "sophea", "203.0.113.14");
    let req = test::TestRequest::get()
        .uri("/api/admin/users")
        .cookie(Cookie::new("session", student))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );
}

#[actix_web::test]
async fn test_unknown_user_and_wrong_password_look_alike() {
    let storage = common::memory_storage().await;
    common::create_user(&storage, "thida", UserRole::Student).await;
    let app = test_app!(storage);

    let mut bodies = Vec::new();
    for username in ["thida", "nobody.here"] {
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .insert_header(("X-Forwarded-For", "203.0.113.15"))
            .set_json(serde_json::json!({ "username": username, "password": "Wrong-Passw0rd" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{username}");
        let body: serde_json::Value = test::read_body_json(resp).await;
        bodies.push(body);
    }
    assert_eq!(bodies[0], bodies[1]);
}
