use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PortalService;
use crate::models::{
    ApiResponse,
    portal::responses::{ChildGradesResponse, ChildrenResponse, GradeItem},
};
use crate::services::{forbidden, internal_error, require_identity};

pub async fn list_children(
    service: &PortalService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = require_identity!(request);
    let storage = service.get_storage(request);

    match storage.list_children(identity.user_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ChildrenResponse { items },
            "Children retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve children", &e)),
    }
}

pub async fn child_grades(
    service: &PortalService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = require_identity!(request);
    let storage = service.get_storage(request);

    // 只能查看已关联的学生
    let child = match storage.list_children(identity.user_id).await {
        Ok(children) => children.into_iter().find(|c| c.id == student_id),
        Err(e) => return Ok(internal_error("Failed to retrieve grades", &e)),
    };
    let Some(child) = child else {
        return Ok(forbidden("You are not linked to this student"));
    };

    match storage.student_grade_items(student_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ChildGradesResponse {
                child,
                items: GradeItem::merge_newest_first(items),
            },
            "Grades retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve grades", &e)),
    }
}
