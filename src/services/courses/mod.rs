pub mod create;
pub mod enrollments;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    auth::entities::Identity,
    courses::{
        entities::Course,
        requests::{
            CourseListParams, CourseVisibility, CreateCourseRequest, EnrollStudentRequest,
            UpdateCourseRequest,
        },
    },
};
use crate::storage::Storage;

pub struct CourseService {
    storage: Option<Arc<dyn Storage>>,
}

/// 列表可见范围：学生看已选课程，持有 courses.read_all 看全部，其余看自己任教的课程
pub fn course_visibility(identity: &Identity) -> CourseVisibility {
    if identity.is_admin() || identity.has_permission("courses.read_all") {
        CourseVisibility::All
    } else if identity.is_student() {
        CourseVisibility::EnrolledStudent(identity.user_id)
    } else {
        CourseVisibility::Instructor(identity.user_id)
    }
}

/// 修改课程：管理员、持有 courses.read_all 或任课教师
pub fn can_manage_course(identity: &Identity, course: &Course) -> bool {
    identity.is_admin()
        || identity.has_permission("courses.read_all")
        || course.instructor_id == Some(identity.user_id)
}

impl CourseService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn list_courses(
        &self,
        query: CourseListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_courses(self, query, request).await
    }

    // 创建课程及时间表
    pub async fn create_course(
        &self,
        course: CreateCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_course(self, course, request).await
    }

    pub async fn get_course(
        &self,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_course(self, course_id, request).await
    }

    pub async fn update_course(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_course(self, course_id, update, request).await
    }

    pub async fn delete_course(
        &self,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::delete_course(self, course_id, request).await
    }

    // 选课名单
    pub async fn list_enrollments(
        &self,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        enrollments::list_enrollments(self, course_id, request).await
    }

    // 学生选课
    pub async fn enroll_student(
        &self,
        course_id: i64,
        enroll: EnrollStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        enrollments::enroll_student(self, course_id, enroll, request).await
    }

    // 退课
    pub async fn drop_enrollment(
        &self,
        course_id: i64,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        enrollments::drop_enrollment(self, course_id, student_id, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::entities::fixtures::identity_with;
    use crate::models::courses::entities::CourseStatus;

    fn course(instructor_id: Option<i64>) -> Course {
        Course {
            id: 1,
            code: "PHY-101".into(),
            title: "Physics".into(),
            description: None,
            subject: Some("physics".into()),
            grade_level: None,
            school_id: None,
            instructor_id,
            status: CourseStatus::Active,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_visibility_by_role() {
        assert_eq!(
            course_visibility(&identity_with(3, &["student"], &["courses.read"])),
            CourseVisibility::EnrolledStudent(3)
        );
        assert_eq!(
            course_visibility(&identity_with(2, &["teacher"], &["courses.read"])),
            CourseVisibility::Instructor(2)
        );
        assert_eq!(
            course_visibility(&identity_with(4, &["principal"], &["courses.read_all"])),
            CourseVisibility::All
        );
        assert_eq!(course_visibility(&identity_with(1, &["admin"], &[])), CourseVisibility::All);
    }

    #[test]
    fn test_course_management() {
        let teacher = identity_with(2, &["teacher"], &["courses.update"]);
        assert!(can_manage_course(&teacher, &course(Some(2))));
        assert!(!can_manage_course(&teacher, &course(Some(9))));
        assert!(!can_manage_course(&teacher, &course(None)));
        assert!(can_manage_course(&identity_with(1, &["admin"], &[]), &course(Some(9))));
    }
}
