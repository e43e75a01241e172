//! 课程、时间表与选课存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, commit, now_ts};
use crate::entity::course_enrollments::{
    ActiveModel as EnrollmentActiveModel, Column as EnrollmentColumn, Entity as CourseEnrollments,
};
use crate::entity::course_schedules::{
    ActiveModel as ScheduleActiveModel, Column as ScheduleColumn, Entity as CourseSchedules,
};
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{Result, VLabError};
use crate::models::{
    PaginationInfo,
    courses::{
        entities::{Course, CourseDetail, CourseStatus, EnrollmentStatus, EnrollmentWithStudent},
        requests::{CourseListParams, CourseVisibility, CreateCourseRequest, UpdateCourseRequest},
        responses::CourseListResponse,
    },
    users::entities::UserRole,
};
use crate::storage::EnrollOutcome;
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
    sea_query::{Expr, ExprTrait, Query},
};

impl SeaOrmStorage {
    /// 创建课程及时间表（单事务，任一失败整体回滚）
    pub async fn create_course_impl(&self, req: CreateCourseRequest) -> Result<CourseDetail> {
        let now = now_ts();
        let txn = self.begin().await?;

        let course = ActiveModel {
            code: Set(req.code.trim().to_string()),
            title: Set(req.title.trim().to_string()),
            description: Set(req.description),
            subject: Set(req.subject),
            grade_level: Set(req.grade_level),
            school_id: Set(req.school_id),
            instructor_id: Set(req.instructor_id),
            status: Set(req.status.unwrap_or(CourseStatus::Active).to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| VLabError::from_db("创建课程失败", e))?;

        let mut schedules = Vec::with_capacity(req.schedules.len());
        for schedule in req.schedules {
            let model = ScheduleActiveModel {
                course_id: Set(course.id),
                day_of_week: Set(schedule.day_of_week),
                start_time: Set(schedule.start_time),
                end_time: Set(schedule.end_time),
                room: Set(schedule.room),
                instructor_id: Set(schedule.instructor_id),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| VLabError::from_db("创建课程时间表失败", e))?;
            schedules.push(model.into_schedule());
        }

        commit(txn).await?;

        Ok(CourseDetail {
            course: course.into_course(),
            schedules,
            enrollment_count: 0,
        })
    }

    /// 通过 ID 获取课程
    pub async fn get_course_by_id_impl(&self, id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 课程详情：时间表与在读人数
    pub async fn get_course_detail_impl(&self, id: i64) -> Result<Option<CourseDetail>> {
        let Some(course) = self.get_course_by_id_impl(id).await? else {
            return Ok(None);
        };

        let schedules = CourseSchedules::find()
            .filter(ScheduleColumn::CourseId.eq(id))
            .order_by_asc(ScheduleColumn::DayOfWeek)
            .order_by_asc(ScheduleColumn::StartTime)
            .all(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询课程时间表失败: {e}")))?
            .into_iter()
            .map(|m| m.into_schedule())
            .collect();

        let enrollment_count = CourseEnrollments::find()
            .filter(EnrollmentColumn::CourseId.eq(id))
            .filter(EnrollmentColumn::Status.eq(EnrollmentStatus::Enrolled.as_str()))
            .count(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("统计选课人数失败: {e}")))?;

        Ok(Some(CourseDetail {
            course,
            schedules,
            enrollment_count: enrollment_count as i64,
        }))
    }

    /// 学生在读课程的子查询条件
    pub(crate) fn enrolled_course_condition(student_id: i64, column: impl ColumnTrait) -> Condition {
        Condition::all().add(
            column.in_subquery(
                Query::select()
                    .column(EnrollmentColumn::CourseId)
                    .from(CourseEnrollments)
                    .and_where(Expr::col(EnrollmentColumn::StudentId).eq(student_id))
                    .and_where(
                        Expr::col(EnrollmentColumn::Status).eq(EnrollmentStatus::Enrolled.as_str()),
                    )
                    .to_owned(),
            ),
        )
    }

    /// 分页列出课程
    pub async fn list_courses_with_pagination_impl(
        &self,
        params: CourseListParams,
        visibility: CourseVisibility,
    ) -> Result<CourseListResponse> {
        let (page, size) = params.pagination.normalized();

        let mut select = Courses::find();
        match visibility {
            CourseVisibility::All => {}
            CourseVisibility::Instructor(user_id) => {
                select = select.filter(Column::InstructorId.eq(user_id));
            }
            CourseVisibility::EnrolledStudent(student_id) => {
                select = select.filter(Self::enrolled_course_condition(student_id, Column::Id));
            }
        }

        if let Some(school_id) = params.school_id {
            select = select.filter(Column::SchoolId.eq(school_id));
        }
        if let Some(instructor_id) = params.instructor_id {
            select = select.filter(Column::InstructorId.eq(instructor_id));
        }
        if let Some(status) = params.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(ref search) = params.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Code.contains(&escaped))
                    .add(Column::Title.contains(&escaped))
                    .add(Column::Subject.contains(&escaped)),
            );
        }
        select = select.order_by_desc(Column::CreatedAt);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| VLabError::database_operation(format!("查询课程总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| VLabError::database_operation(format!("查询课程页数失败: {e}")))?;
        let courses = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询课程列表失败: {e}")))?;

        Ok(CourseListResponse {
            items: courses.into_iter().map(|m| m.into_course()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新课程
    pub async fn update_course_impl(
        &self,
        id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        if self.get_course_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };
        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(subject) = update.subject {
            model.subject = Set(Some(subject));
        }
        if let Some(grade_level) = update.grade_level {
            model.grade_level = Set(Some(grade_level));
        }
        if let Some(school_id) = update.school_id {
            model.school_id = Set(Some(school_id));
        }
        if let Some(instructor_id) = update.instructor_id {
            model.instructor_id = Set(Some(instructor_id));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| VLabError::from_db("更新课程失败", e))?;
        Ok(Some(updated.into_course()))
    }

    /// 删除课程
    pub async fn delete_course_impl(&self, id: i64) -> Result<bool> {
        let result = Courses::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| VLabError::from_db("删除课程失败", e))?;
        Ok(result.rows_affected > 0)
    }

    /// 课程选课名单（附学生信息）
    pub async fn list_enrollments_impl(&self, course_id: i64) -> Result<Vec<EnrollmentWithStudent>> {
        let enrollments = CourseEnrollments::find()
            .filter(EnrollmentColumn::CourseId.eq(course_id))
            .order_by_asc(EnrollmentColumn::EnrolledAt)
            .all(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询选课失败: {e}")))?;
        if enrollments.is_empty() {
            return Ok(Vec::new());
        }

        let student_ids: Vec<i64> = enrollments.iter().map(|e| e.student_id).collect();
        let students: HashMap<i64, _> = Users::find()
            .filter(UserColumn::Id.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询学生失败: {e}")))?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(enrollments
            .into_iter()
            .filter_map(|enrollment| {
                let student = students.get(&enrollment.student_id)?;
                Some(EnrollmentWithStudent {
                    username: student.username.clone(),
                    first_name: student.first_name.clone(),
                    last_name: student.last_name.clone(),
                    email: student.email.clone(),
                    enrollment: enrollment.into_enrollment(),
                })
            })
            .collect())
    }

    /// 学生选课；已退课的记录重新激活
    pub async fn enroll_student_impl(
        &self,
        course_id: i64,
        student_id: i64,
    ) -> Result<EnrollOutcome> {
        let Some(student) = self.get_user_by_id_impl(student_id).await? else {
            return Ok(EnrollOutcome::StudentNotFound);
        };
        let roles = self
            .user_role_names(student.id, student.role.as_str())
            .await?;
        if !roles.iter().any(|r| r == UserRole::STUDENT) {
            return Ok(EnrollOutcome::NotAStudent);
        }

        let existing = CourseEnrollments::find()
            .filter(EnrollmentColumn::CourseId.eq(course_id))
            .filter(EnrollmentColumn::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询选课失败: {e}")))?;

        let now = now_ts();
        let enrollment = match existing {
            Some(e) if e.status == EnrollmentStatus::Enrolled.as_str() => {
                return Ok(EnrollOutcome::AlreadyEnrolled);
            }
            Some(e) => EnrollmentActiveModel {
                id: Set(e.id),
                status: Set(EnrollmentStatus::Enrolled.to_string()),
                enrolled_at: Set(now),
                ..Default::default()
            }
            .update(&self.db)
            .await
            .map_err(|e| VLabError::from_db("恢复选课失败", e))?,
            None => match (EnrollmentActiveModel {
                course_id: Set(course_id),
                student_id: Set(student_id),
                status: Set(EnrollmentStatus::Enrolled.to_string()),
                enrolled_at: Set(now),
                ..Default::default()
            })
            .insert(&self.db)
            .await
            {
                Ok(model) => model,
                Err(e) => {
                    let err = VLabError::from_db("选课失败", e);
                    // 并发选课撞上唯一约束
                    if err.is_conflict() {
                        return Ok(EnrollOutcome::AlreadyEnrolled);
                    }
                    return Err(err);
                }
            },
        };

        Ok(EnrollOutcome::Enrolled(enrollment.into_enrollment()))
    }

    /// 退课
    pub async fn drop_enrollment_impl(&self, course_id: i64, student_id: i64) -> Result<bool> {
        let result = CourseEnrollments::update_many()
            .col_expr(
                EnrollmentColumn::Status,
                Expr::value(EnrollmentStatus::Dropped.as_str()),
            )
            .filter(EnrollmentColumn::CourseId.eq(course_id))
            .filter(EnrollmentColumn::StudentId.eq(student_id))
            .filter(EnrollmentColumn::Status.eq(EnrollmentStatus::Enrolled.as_str()))
            .exec(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("退课失败: {e}")))?;
        Ok(result.rows_affected > 0)
    }

    pub async fn is_enrolled_impl(&self, course_id: i64, student_id: i64) -> Result<bool> {
        let count = CourseEnrollments::find()
            .filter(EnrollmentColumn::CourseId.eq(course_id))
            .filter(EnrollmentColumn::StudentId.eq(student_id))
            .filter(EnrollmentColumn::Status.eq(EnrollmentStatus::Enrolled.as_str()))
            .count(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询选课失败: {e}")))?;
        Ok(count > 0)
    }
}
