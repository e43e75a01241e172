use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequirePermission};
use crate::models::courses::requests::{
    CourseListParams, CreateCourseRequest, EnrollStudentRequest, UpdateCourseRequest,
};
use crate::services::CourseService;
use crate::utils::{SafeIDI64, SafeStudentIdI64};

static COURSE_SERVICE: Lazy<CourseService> = Lazy::new(CourseService::new_lazy);

pub async fn list_courses(
    req: HttpRequest,
    query: web::Query<CourseListParams>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_courses(query.into_inner(), &req).await
}

pub async fn create_course(
    req: HttpRequest,
    course: web::Json<CreateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.create_course(course.into_inner(), &req).await
}

pub async fn get_course(req: HttpRequest, course_id: SafeIDI64) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.get_course(course_id.0, &req).await
}

pub async fn update_course(
    req: HttpRequest,
    course_id: SafeIDI64,
    update: web::Json<UpdateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .update_course(course_id.0, update.into_inner(), &req)
        .await
}

pub async fn delete_course(req: HttpRequest, course_id: SafeIDI64) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.delete_course(course_id.0, &req).await
}

pub async fn list_enrollments(
    req: HttpRequest,
    course_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_enrollments(course_id.0, &req).await
}

pub async fn enroll_student(
    req: HttpRequest,
    course_id: SafeIDI64,
    enroll: web::Json<EnrollStudentRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .enroll_student(course_id.0, enroll.into_inner(), &req)
        .await
}

pub async fn drop_enrollment(
    req: HttpRequest,
    course_id: SafeIDI64,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .drop_enrollment(course_id.0, student_id.0, &req)
        .await
}

pub fn configure_course_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/courses")
            .wrap(middlewares::RequireSession::new())
            .service(
                web::resource("")
                    // 可见范围在业务层按角色过滤
                    .route(
                        web::get()
                            .to(list_courses)
                            .wrap(RequirePermission::new("courses.read")),
                    )
                    .route(
                        web::post()
                            .to(create_course)
                            .wrap(RequirePermission::new("courses.create")),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::get()
                            .to(get_course)
                            .wrap(RequirePermission::new("courses.read")),
                    )
                    .route(
                        web::put()
                            .to(update_course)
                            .wrap(RequirePermission::new("courses.update")),
                    )
                    .route(
                        web::delete()
                            .to(delete_course)
                            .wrap(RequirePermission::new("courses.delete")),
                    ),
            )
            .service(
                web::resource("/{id}/enrollments")
                    .route(
                        web::get()
                            .to(list_enrollments)
                            .wrap(RequirePermission::new("courses.manage_enrollment")),
                    )
                    .route(
                        web::post()
                            .to(enroll_student)
                            .wrap(RequirePermission::new("courses.manage_enrollment")),
                    ),
            )
            .service(
                web::resource("/{id}/enrollments/{student_id}").route(
                    web::delete()
                        .to(drop_enrollment)
                        .wrap(RequirePermission::new("courses.manage_enrollment")),
                ),
            ),
    );
}
