use std::sync::Arc;

use crate::errors::Result;
use crate::models::{
    achievements::{
        entities::{Achievement, EarnedAchievement},
        requests::{AwardAchievementRequest, CreateAchievementRequest},
    },
    activity_logs::{
        entities::ActivityEntry, requests::ActivityLogListParams,
        responses::ActivityLogListResponse,
    },
    admin::responses::DashboardResponse,
    auth::entities::{AccessLevel, SchoolAccess},
    courses::{
        entities::{Course, CourseDetail, EnrollmentWithStudent},
        requests::{CourseListParams, CourseVisibility, CreateCourseRequest, UpdateCourseRequest},
        responses::CourseListResponse,
    },
    exercises::{
        entities::{Exercise, ExerciseSubmission},
        requests::{CreateExerciseRequest, SubmissionListParams, UpdateExerciseRequest},
        responses::{ExerciseStatistic, SubmissionListResponse},
    },
    labs::{
        entities::{Lab, LabScore, LabScoreWithStudent, LabSession, RubricCriterion, ScoreAnnotation},
        requests::{
            AnnotateRequest, CreateLabRequest, ManualScoreRequest, ScoreLabRequest,
            UpdateLabRequest,
        },
        responses::LabDetail,
    },
    portal::responses::{ChildSummary, CourseProgressItem, GradeItem, StudentStatsResponse},
    schools::{
        entities::School,
        requests::{SchoolListParams, SchoolRecord, UpdateSchoolRequest},
        responses::SchoolListResponse,
    },
    sessions::{
        entities::Session,
        requests::{NewSession, SessionListParams},
        responses::SessionListResponse,
    },
    simulations::{
        entities::{Simulation, SimulationProgress},
        requests::{
            CreateSimulationRequest, SimulationFilter, UpdateProgressRequest,
            UpdateSimulationRequest,
        },
        responses::{PublicStatsResponse, SimulationListResponse, SimulationUsage},
    },
    users::{
        entities::{User, UserRole, UserWithRoles},
        requests::{CreateUserRequest, UpdateUserRequest, UserListParams},
        responses::UserListResponse,
    },
};

pub mod outcomes;
pub mod sea_orm_storage;

pub use outcomes::*;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 学校管理方法
    // 创建学校（school_code 重复返回 Conflict）
    async fn create_school(&self, school: SchoolRecord) -> Result<School>;
    // 按 school_code upsert
    async fn upsert_school(&self, school: SchoolRecord) -> Result<School>;
    // 通过ID获取学校
    async fn get_school_by_id(&self, id: i64) -> Result<Option<School>>;
    // 分页列出学校（附带教师/学生数量与汇总）
    async fn list_schools_with_pagination(
        &self,
        params: SchoolListParams,
    ) -> Result<SchoolListResponse>;
    // 更新学校
    async fn update_school(&self, id: i64, update: UpdateSchoolRequest)
    -> Result<Option<School>>;
    // 删除学校
    async fn delete_school(&self, id: i64) -> Result<bool>;

    /// 用户管理方法
    // 创建用户并写入主角色（password 字段为哈希）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 按 username upsert
    async fn upsert_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 获取用户及其全部角色
    async fn get_user_with_roles(&self, id: i64) -> Result<Option<UserWithRoles>>;
    // 分页列出用户
    async fn list_users_with_pagination(&self, params: UserListParams)
    -> Result<UserListResponse>;
    // 更新用户（password 字段为哈希）
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除用户
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 更新最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 更新密码并注销该用户全部会话，返回被注销的令牌
    async fn change_password(&self, user_id: i64, password_hash: String) -> Result<Vec<String>>;

    /// 角色与权限
    // 幂等写入角色、权限与授权关系
    async fn seed_rbac(&self, seeds: &[RoleSeed]) -> Result<()>;
    // 替换用户角色
    async fn replace_user_roles(&self, user_id: i64, roles: &[UserRole]) -> Result<Vec<String>>;
    // 用户的角色、权限与学校访问
    async fn load_identity_parts(&self, user_id: i64, primary_role: &str)
    -> Result<IdentityParts>;
    // 授予或更新学校访问级别
    async fn grant_school_access(
        &self,
        user_id: i64,
        school_id: i64,
        level: AccessLevel,
    ) -> Result<SchoolAccess>;
    // 关联家长与学生
    async fn link_parent_student(
        &self,
        parent_id: i64,
        student_id: i64,
        relationship: &str,
    ) -> Result<()>;
    // 家长是否关联该学生
    async fn is_parent_of(&self, parent_id: i64, student_id: i64) -> Result<bool>;
    // 家长关联的学生
    async fn list_children(&self, parent_id: i64) -> Result<Vec<ChildSummary>>;

    /// 会话
    // 创建会话
    async fn create_session(&self, session: NewSession) -> Result<Session>;
    // 通过令牌获取会话
    async fn get_session_by_token(&self, token: &str) -> Result<Option<Session>>;
    // 刷新最后访问时间
    async fn touch_session(&self, id: i64) -> Result<()>;
    // 通过令牌注销会话
    async fn deactivate_session_by_token(&self, token: &str) -> Result<bool>;
    // 批量注销会话，返回被注销的令牌
    async fn deactivate_sessions(&self, ids: &[i64]) -> Result<Vec<String>>;
    // 注销某用户的全部活跃会话，返回被注销的令牌
    async fn revoke_user_sessions(&self, user_id: i64) -> Result<Vec<String>>;
    // 注销所有已过期会话
    async fn cleanup_expired_sessions(&self) -> Result<u64>;
    // 分页列出会话及统计
    async fn list_sessions_with_pagination(
        &self,
        params: SessionListParams,
    ) -> Result<SessionListResponse>;

    /// 活动日志与仪表盘
    // 写入活动日志
    async fn insert_activity_log(&self, entry: ActivityEntry) -> Result<()>;
    // 分页查询活动日志
    async fn list_activity_logs(
        &self,
        params: ActivityLogListParams,
    ) -> Result<ActivityLogListResponse>;
    // 管理仪表盘统计
    async fn dashboard_stats(&self) -> Result<DashboardResponse>;

    /// 课程
    // 创建课程及时间表（单事务）
    async fn create_course(&self, course: CreateCourseRequest) -> Result<CourseDetail>;
    // 通过ID获取课程
    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>>;
    // 课程详情（时间表与选课人数）
    async fn get_course_detail(&self, id: i64) -> Result<Option<CourseDetail>>;
    // 分页列出课程
    async fn list_courses_with_pagination(
        &self,
        params: CourseListParams,
        visibility: CourseVisibility,
    ) -> Result<CourseListResponse>;
    // 更新课程
    async fn update_course(&self, id: i64, update: UpdateCourseRequest) -> Result<Option<Course>>;
    // 删除课程
    async fn delete_course(&self, id: i64) -> Result<bool>;
    // 课程选课名单
    async fn list_enrollments(&self, course_id: i64) -> Result<Vec<EnrollmentWithStudent>>;
    // 学生选课
    async fn enroll_student(&self, course_id: i64, student_id: i64) -> Result<EnrollOutcome>;
    // 退课（标记 dropped）
    async fn drop_enrollment(&self, course_id: i64, student_id: i64) -> Result<bool>;
    // 学生是否在读该课程
    async fn is_enrolled(&self, course_id: i64, student_id: i64) -> Result<bool>;

    /// 仿真
    // 创建仿真
    async fn create_simulation(
        &self,
        simulation: CreateSimulationRequest,
        created_by: Option<i64>,
    ) -> Result<Simulation>;
    // 通过ID获取仿真
    async fn get_simulation_by_id(&self, id: i64) -> Result<Option<Simulation>>;
    // 分页列出仿真
    async fn list_simulations_with_pagination(
        &self,
        filter: SimulationFilter,
        page: u64,
        size: u64,
    ) -> Result<SimulationListResponse>;
    // 更新仿真
    async fn update_simulation(
        &self,
        id: i64,
        update: UpdateSimulationRequest,
    ) -> Result<Option<Simulation>>;
    // 删除仿真
    async fn delete_simulation(&self, id: i64) -> Result<bool>;
    // 公开仿真按学科统计
    async fn public_simulation_stats(&self) -> Result<PublicStatsResponse>;
    // 记录一次开始（attempts + 1）
    async fn record_simulation_start(
        &self,
        student_id: i64,
        simulation_id: i64,
    ) -> Result<SimulationProgress>;
    // 更新仿真进度
    async fn update_simulation_progress(
        &self,
        student_id: i64,
        simulation_id: i64,
        update: UpdateProgressRequest,
    ) -> Result<SimulationProgress>;
    // 各仿真的使用统计
    async fn simulation_usage_stats(&self) -> Result<Vec<SimulationUsage>>;

    /// 实验
    // 创建实验及评分标准（单事务）
    async fn create_lab(&self, lab: CreateLabRequest, created_by: Option<i64>)
    -> Result<LabDetail>;
    // 通过ID获取实验
    async fn get_lab_by_id(&self, id: i64) -> Result<Option<Lab>>;
    // 实验详情（评分标准按 order_index 排序）
    async fn get_lab_detail(&self, id: i64) -> Result<Option<LabDetail>>;
    // 列出实验
    async fn list_labs(&self, course_id: Option<i64>, visibility: LabVisibility)
    -> Result<Vec<Lab>>;
    // 更新实验
    async fn update_lab(&self, id: i64, update: UpdateLabRequest) -> Result<Option<Lab>>;
    // 删除实验
    async fn delete_lab(&self, id: i64) -> Result<bool>;
    // 开始或恢复实验会话（单事务）
    async fn start_lab(&self, lab_id: i64, student_id: i64) -> Result<LabStartOutcome>;
    // 自动保存作答
    async fn autosave_lab(
        &self,
        lab_id: i64,
        student_id: i64,
        session_id: i64,
        responses: serde_json::Value,
    ) -> Result<LabSubmitOutcome>;
    // 正式提交（单事务）
    async fn submit_lab(
        &self,
        lab_id: i64,
        student_id: i64,
        session_id: i64,
        responses: serde_json::Value,
    ) -> Result<LabSubmitOutcome>;
    // 结束实验会话（幂等，单事务）
    async fn stop_lab(
        &self,
        lab_id: i64,
        student_id: i64,
        session_id: i64,
    ) -> Result<Option<LabSession>>;
    // 自动评分并写入成绩（单事务）
    async fn score_lab(
        &self,
        lab_id: i64,
        request: ScoreLabRequest,
        actor: ScoreActor,
        log: ActivityEntry,
    ) -> Result<LabScoreOutcome>;
    // 学生成绩及批注
    async fn get_lab_score(
        &self,
        lab_id: i64,
        student_id: i64,
    ) -> Result<Option<(LabScore, Vec<ScoreAnnotation>)>>;
    // 实验全部成绩
    async fn list_lab_scores(&self, lab_id: i64) -> Result<Vec<LabScoreWithStudent>>;
    // 设置人工成绩（单事务）
    async fn set_manual_score(
        &self,
        lab_id: i64,
        student_id: i64,
        request: ManualScoreRequest,
        graded_by: i64,
    ) -> Result<Option<LabScore>>;
    // 按标准批注并重算成绩（单事务）
    async fn annotate_score(
        &self,
        lab_id: i64,
        student_id: i64,
        request: AnnotateRequest,
        graded_by: i64,
    ) -> Result<AnnotateOutcome>;
    // 课程在读学生（id, 姓名）
    async fn list_course_students(&self, course_id: i64) -> Result<Vec<(i64, String)>>;
    // 实验评分标准
    async fn list_lab_criteria(&self, lab_id: i64) -> Result<Vec<RubricCriterion>>;

    /// 练习
    // 创建练习题
    async fn create_exercise(
        &self,
        exercise: CreateExerciseRequest,
        created_by: Option<i64>,
    ) -> Result<Exercise>;
    // 通过ID获取练习题
    async fn get_exercise_by_id(&self, id: i64) -> Result<Option<Exercise>>;
    // 列出仿真下的练习题
    async fn list_exercises(&self, simulation_id: i64) -> Result<Vec<Exercise>>;
    // 更新练习题
    async fn update_exercise(
        &self,
        id: i64,
        update: UpdateExerciseRequest,
    ) -> Result<Option<Exercise>>;
    // 删除练习题
    async fn delete_exercise(&self, id: i64) -> Result<bool>;
    // 保存自动批改的提交并更新最好成绩
    async fn insert_exercise_submission(
        &self,
        submission: NewExerciseSubmission,
    ) -> Result<ExerciseSubmission>;
    // 通过ID获取提交
    async fn get_exercise_submission(&self, id: i64) -> Result<Option<ExerciseSubmission>>;
    // 分页列出提交
    async fn list_exercise_submissions(
        &self,
        params: SubmissionListParams,
    ) -> Result<SubmissionListResponse>;
    // 教师批改（与活动日志同一事务）
    async fn grade_exercise_submission(
        &self,
        id: i64,
        graded: GradedSubmission,
        log: ActivityEntry,
    ) -> Result<Option<ExerciseSubmission>>;
    // 每道题的作答统计
    async fn exercise_statistics(&self, simulation_id: i64) -> Result<Vec<ExerciseStatistic>>;

    /// 成就
    // 有效成就
    async fn list_active_achievements(&self) -> Result<Vec<Achievement>>;
    // 创建成就
    async fn create_achievement(
        &self,
        achievement: CreateAchievementRequest,
        created_by: Option<i64>,
    ) -> Result<Achievement>;
    // 颁发成就（与活动日志同一事务）
    async fn award_achievement(
        &self,
        request: AwardAchievementRequest,
        log: ActivityEntry,
    ) -> Result<AwardOutcome>;
    // 学生已获得的成就
    async fn list_student_achievements(&self, student_id: i64) -> Result<Vec<EarnedAchievement>>;

    /// 学生与家长门户
    // 学生学习统计
    async fn student_stats(&self, student_id: i64) -> Result<StudentStatsResponse>;
    // 学生各课程进度
    async fn student_course_progress(&self, student_id: i64) -> Result<Vec<CourseProgressItem>>;
    // 学生成绩条目（实验与练习，最新在前）
    async fn student_grade_items(&self, student_id: i64) -> Result<Vec<GradeItem>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
