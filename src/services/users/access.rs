//! 角色、学校访问与家长关联

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{
        entities::UserRole,
        requests::{AssignRolesRequest, GrantSchoolAccessRequest, LinkChildRequest},
    },
};
use crate::services::{activity::ActivityLogger, bad_request, internal_error, not_found};

pub async fn assign_roles(
    service: &UserService,
    user_id: i64,
    assign: AssignRolesRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if assign.roles.is_empty() {
        return Ok(bad_request(ErrorCode::RoleInvalid, "At least one role is required"));
    }
    if assign.roles.contains(&UserRole::Guest) {
        return Ok(bad_request(ErrorCode::RoleInvalid, "The guest role cannot be assigned"));
    }

    let storage = service.get_storage(request);

    match storage.replace_user_roles(user_id, &assign.roles).await {
        Ok(roles) => {
            let revoked = match service.revoke_sessions(request, user_id).await {
                Ok(count) => count,
                Err(e) => return Ok(internal_error("Failed to revoke user sessions", &e)),
            };

            let entry = ActivityLogger::entry(request, "user.roles_update")
                .resource("user", user_id)
                .details(serde_json::json!({ "roles": roles, "revoked_sessions": revoked }));
            ActivityLogger::log(storage.as_ref(), entry).await;

            Ok(HttpResponse::Ok().json(ApiResponse::success(roles, "Roles updated successfully")))
        }
        Err(e) if e.is_not_found() => Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => Ok(internal_error("Failed to update roles", &e)),
    }
}

pub async fn grant_school_access(
    service: &UserService,
    user_id: i64,
    grant: GrantSchoolAccessRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_user_by_id(user_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => return Ok(internal_error("Failed to grant school access", &e)),
    }
    match storage.get_school_by_id(grant.school_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::SchoolNotFound, "School not found")),
        Err(e) => return Ok(internal_error("Failed to grant school access", &e)),
    }

    match storage
        .grant_school_access(user_id, grant.school_id, grant.access_level)
        .await
    {
        Ok(access) => {
            let entry = ActivityLogger::entry(request, "user.school_access_grant")
                .resource("user", user_id)
                .details(serde_json::json!({
                    "school_id": access.school_id,
                    "access_level": access.access_level,
                }));
            ActivityLogger::log(storage.as_ref(), entry).await;

            Ok(HttpResponse::Ok().json(ApiResponse::success(access, "School access granted")))
        }
        Err(e) => Ok(internal_error("Failed to grant school access", &e)),
    }
}

pub async fn link_child(
    service: &UserService,
    parent_id: i64,
    link: LinkChildRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let parent = match storage.get_user_with_roles(parent_id).await {
        Ok(Some(parent)) => parent,
        Ok(None) => return Ok(not_found(ErrorCode::UserNotFound, "Parent not found")),
        Err(e) => return Ok(internal_error("Failed to link child", &e)),
    };
    let is_parent = UserRole::parent_roles()
        .iter()
        .any(|role| parent.roles.iter().any(|r| r == role.as_str()));
    if !is_parent {
        return Ok(bad_request(
            ErrorCode::RoleInvalid,
            "User does not hold a parent or guardian role",
        ));
    }

    let student = match storage.get_user_with_roles(link.student_id).await {
        Ok(Some(student)) => student,
        Ok(None) => return Ok(not_found(ErrorCode::UserNotFound, "Student not found")),
        Err(e) => return Ok(internal_error("Failed to link child", &e)),
    };
    if !student.roles.iter().any(|r| r == UserRole::STUDENT) {
        return Ok(bad_request(ErrorCode::RoleInvalid, "User is not a student"));
    }

    let relationship = link.relationship.trim();
    let relationship = if relationship.is_empty() { "parent" } else { relationship };

    match storage
        .link_parent_student(parent_id, link.student_id, relationship)
        .await
    {
        Ok(()) => {
            let entry = ActivityLogger::entry(request, "user.child_link")
                .resource("user", parent_id)
                .details(serde_json::json!({
                    "student_id": link.student_id,
                    "relationship": relationship,
                }));
            ActivityLogger::log(storage.as_ref(), entry).await;

            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Child linked successfully")))
        }
        Err(e) => Ok(internal_error("Failed to link child", &e)),
    }
}
