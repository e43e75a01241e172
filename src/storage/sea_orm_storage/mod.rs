//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod achievements;
mod activity_logs;
mod courses;
mod dashboard;
mod exercises;
mod lab_scores;
mod labs;
mod portal;
mod rbac;
mod schools;
mod sessions;
mod simulations;
mod users;

use crate::config::AppConfig;
use crate::errors::{Result, VLabError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ConnectOptions, Database, DatabaseConnection, DatabaseTransaction, TransactionTrait,
};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 按全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(&config.database.url).await
    }

    /// 连接指定 URL 并执行迁移
    pub async fn connect(url: &str) -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if Self::is_in_memory(&db_url) {
            Self::connect_sqlite_memory(&db_url).await?
        } else if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| VLabError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    fn is_in_memory(url: &str) -> bool {
        url == "sqlite::memory:" || url.contains(":memory:") || url.contains("mode=memory")
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| VLabError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| VLabError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 内存 SQLite：单连接且永不回收，否则数据库随连接消失
    async fn connect_sqlite_memory(url: &str) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| VLabError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opt)
            .await
            .map_err(|e| VLabError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| VLabError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(VLabError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 开启事务
    pub(crate) async fn begin(&self) -> Result<DatabaseTransaction> {
        self.db
            .begin()
            .await
            .map_err(|e| VLabError::transaction(format!("开启事务失败: {e}")))
    }
}

/// 提交事务
pub(crate) async fn commit(txn: DatabaseTransaction) -> Result<()> {
    txn.commit()
        .await
        .map_err(|e| VLabError::transaction(format!("提交事务失败: {e}")))
}

pub(crate) fn now_ts() -> i64 {
    chrono::Utc::now().timestamp()
}

/// 序列化 JSON 到 text 列
pub(crate) fn to_json_text<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(VLabError::from)
}

// Storage trait 实现
use super::{
    AnnotateOutcome, AwardOutcome, EnrollOutcome, GradedSubmission, IdentityParts,
    LabScoreOutcome, LabStartOutcome, LabSubmitOutcome, LabVisibility, NewExerciseSubmission,
    RoleSeed, ScoreActor, Storage,
};
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
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 学校模块
    async fn create_school(&self, school: SchoolRecord) -> Result<School> {
        self.create_school_impl(school).await
    }

    async fn upsert_school(&self, school: SchoolRecord) -> Result<School> {
        self.upsert_school_impl(school).await
    }

    async fn get_school_by_id(&self, id: i64) -> Result<Option<School>> {
        self.get_school_by_id_impl(id).await
    }

    async fn list_schools_with_pagination(
        &self,
        params: SchoolListParams,
    ) -> Result<SchoolListResponse> {
        self.list_schools_with_pagination_impl(params).await
    }

    async fn update_school(
        &self,
        id: i64,
        update: UpdateSchoolRequest,
    ) -> Result<Option<School>> {
        self.update_school_impl(id, update).await
    }

    async fn delete_school(&self, id: i64) -> Result<bool> {
        self.delete_school_impl(id).await
    }

    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn upsert_user(&self, user: CreateUserRequest) -> Result<User> {
        self.upsert_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn get_user_with_roles(&self, id: i64) -> Result<Option<UserWithRoles>> {
        self.get_user_with_roles_impl(id).await
    }

    async fn list_users_with_pagination(
        &self,
        params: UserListParams,
    ) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(params).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn change_password(&self, user_id: i64, password_hash: String) -> Result<Vec<String>> {
        self.change_password_impl(user_id, password_hash).await
    }

    // 角色与权限
    async fn seed_rbac(&self, seeds: &[RoleSeed]) -> Result<()> {
        self.seed_rbac_impl(seeds).await
    }

    async fn replace_user_roles(&self, user_id: i64, roles: &[UserRole]) -> Result<Vec<String>> {
        self.replace_user_roles_impl(user_id, roles).await
    }

    async fn load_identity_parts(
        &self,
        user_id: i64,
        primary_role: &str,
    ) -> Result<IdentityParts> {
        self.load_identity_parts_impl(user_id, primary_role).await
    }

    async fn grant_school_access(
        &self,
        user_id: i64,
        school_id: i64,
        level: AccessLevel,
    ) -> Result<SchoolAccess> {
        self.grant_school_access_impl(user_id, school_id, level)
            .await
    }

    async fn link_parent_student(
        &self,
        parent_id: i64,
        student_id: i64,
        relationship: &str,
    ) -> Result<()> {
        self.link_parent_student_impl(parent_id, student_id, relationship)
            .await
    }

    async fn is_parent_of(&self, parent_id: i64, student_id: i64) -> Result<bool> {
        self.is_parent_of_impl(parent_id, student_id).await
    }

    async fn list_children(&self, parent_id: i64) -> Result<Vec<ChildSummary>> {
        self.list_children_impl(parent_id).await
    }

    // 会话模块
    async fn create_session(&self, session: NewSession) -> Result<Session> {
        self.create_session_impl(session).await
    }

    async fn get_session_by_token(&self, token: &str) -> Result<Option<Session>> {
        self.get_session_by_token_impl(token).await
    }

    async fn touch_session(&self, id: i64) -> Result<()> {
        self.touch_session_impl(id).await
    }

    async fn deactivate_session_by_token(&self, token: &str) -> Result<bool> {
        self.deactivate_session_by_token_impl(token).await
    }

    async fn deactivate_sessions(&self, ids: &[i64]) -> Result<Vec<String>> {
        self.deactivate_sessions_impl(ids).await
    }

    async fn revoke_user_sessions(&self, user_id: i64) -> Result<Vec<String>> {
        self.revoke_user_sessions_impl(user_id).await
    }

    async fn cleanup_expired_sessions(&self) -> Result<u64> {
        self.cleanup_expired_sessions_impl().await
    }

    async fn list_sessions_with_pagination(
        &self,
        params: SessionListParams,
    ) -> Result<SessionListResponse> {
        self.list_sessions_with_pagination_impl(params).await
    }

    // 活动日志与仪表盘
    async fn insert_activity_log(&self, entry: ActivityEntry) -> Result<()> {
        self.insert_activity_log_impl(entry).await
    }

    async fn list_activity_logs(
        &self,
        params: ActivityLogListParams,
    ) -> Result<ActivityLogListResponse> {
        self.list_activity_logs_impl(params).await
    }

    async fn dashboard_stats(&self) -> Result<DashboardResponse> {
        self.dashboard_stats_impl().await
    }

    // 课程模块
    async fn create_course(&self, course: CreateCourseRequest) -> Result<CourseDetail> {
        self.create_course_impl(course).await
    }

    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(id).await
    }

    async fn get_course_detail(&self, id: i64) -> Result<Option<CourseDetail>> {
        self.get_course_detail_impl(id).await
    }

    async fn list_courses_with_pagination(
        &self,
        params: CourseListParams,
        visibility: CourseVisibility,
    ) -> Result<CourseListResponse> {
        self.list_courses_with_pagination_impl(params, visibility)
            .await
    }

    async fn update_course(
        &self,
        id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        self.update_course_impl(id, update).await
    }

    async fn delete_course(&self, id: i64) -> Result<bool> {
        self.delete_course_impl(id).await
    }

    async fn list_enrollments(&self, course_id: i64) -> Result<Vec<EnrollmentWithStudent>> {
        self.list_enrollments_impl(course_id).await
    }

    async fn enroll_student(&self, course_id: i64, student_id: i64) -> Result<EnrollOutcome> {
        self.enroll_student_impl(course_id, student_id).await
    }

    async fn drop_enrollment(&self, course_id: i64, student_id: i64) -> Result<bool> {
        self.drop_enrollment_impl(course_id, student_id).await
    }

    async fn is_enrolled(&self, course_id: i64, student_id: i64) -> Result<bool> {
        self.is_enrolled_impl(course_id, student_id).await
    }

    // 仿真模块
    async fn create_simulation(
        &self,
        simulation: CreateSimulationRequest,
        created_by: Option<i64>,
    ) -> Result<Simulation> {
        self.create_simulation_impl(simulation, created_by).await
    }

    async fn get_simulation_by_id(&self, id: i64) -> Result<Option<Simulation>> {
        self.get_simulation_by_id_impl(id).await
    }

    async fn list_simulations_with_pagination(
        &self,
        filter: SimulationFilter,
        page: u64,
        size: u64,
    ) -> Result<SimulationListResponse> {
        self.list_simulations_with_pagination_impl(filter, page, size)
            .await
    }

    async fn update_simulation(
        &self,
        id: i64,
        update: UpdateSimulationRequest,
    ) -> Result<Option<Simulation>> {
        self.update_simulation_impl(id, update).await
    }

    async fn delete_simulation(&self, id: i64) -> Result<bool> {
        self.delete_simulation_impl(id).await
    }

    async fn public_simulation_stats(&self) -> Result<PublicStatsResponse> {
        self.public_simulation_stats_impl().await
    }

    async fn record_simulation_start(
        &self,
        student_id: i64,
        simulation_id: i64,
    ) -> Result<SimulationProgress> {
        self.record_simulation_start_impl(student_id, simulation_id)
            .await
    }

    async fn update_simulation_progress(
        &self,
        student_id: i64,
        simulation_id: i64,
        update: UpdateProgressRequest,
    ) -> Result<SimulationProgress> {
        self.update_simulation_progress_impl(student_id, simulation_id, update)
            .await
    }

    async fn simulation_usage_stats(&self) -> Result<Vec<SimulationUsage>> {
        self.simulation_usage_stats_impl().await
    }

    // 实验模块
    async fn create_lab(
        &self,
        lab: CreateLabRequest,
        created_by: Option<i64>,
    ) -> Result<LabDetail> {
        self.create_lab_impl(lab, created_by).await
    }

    async fn get_lab_by_id(&self, id: i64) -> Result<Option<Lab>> {
        self.get_lab_by_id_impl(id).await
    }

    async fn get_lab_detail(&self, id: i64) -> Result<Option<LabDetail>> {
        self.get_lab_detail_impl(id).await
    }

    async fn list_labs(
        &self,
        course_id: Option<i64>,
        visibility: LabVisibility,
    ) -> Result<Vec<Lab>> {
        self.list_labs_impl(course_id, visibility).await
    }

    async fn update_lab(&self, id: i64, update: UpdateLabRequest) -> Result<Option<Lab>> {
        self.update_lab_impl(id, update).await
    }

    async fn delete_lab(&self, id: i64) -> Result<bool> {
        self.delete_lab_impl(id).await
    }

    async fn start_lab(&self, lab_id: i64, student_id: i64) -> Result<LabStartOutcome> {
        self.start_lab_impl(lab_id, student_id).await
    }

    async fn autosave_lab(
        &self,
        lab_id: i64,
        student_id: i64,
        session_id: i64,
        responses: serde_json::Value,
    ) -> Result<LabSubmitOutcome> {
        self.autosave_lab_impl(lab_id, student_id, session_id, responses)
            .await
    }

    async fn submit_lab(
        &self,
        lab_id: i64,
        student_id: i64,
        session_id: i64,
        responses: serde_json::Value,
    ) -> Result<LabSubmitOutcome> {
        self.submit_lab_impl(lab_id, student_id, session_id, responses)
            .await
    }

    async fn stop_lab(
        &self,
        lab_id: i64,
        student_id: i64,
        session_id: i64,
    ) -> Result<Option<LabSession>> {
        self.stop_lab_impl(lab_id, student_id, session_id).await
    }

    async fn score_lab(
        &self,
        lab_id: i64,
        request: ScoreLabRequest,
        actor: ScoreActor,
        log: ActivityEntry,
    ) -> Result<LabScoreOutcome> {
        self.score_lab_impl(lab_id, request, actor, log).await
    }

    async fn get_lab_score(
        &self,
        lab_id: i64,
        student_id: i64,
    ) -> Result<Option<(LabScore, Vec<ScoreAnnotation>)>> {
        self.get_lab_score_impl(lab_id, student_id).await
    }

    async fn list_lab_scores(&self, lab_id: i64) -> Result<Vec<LabScoreWithStudent>> {
        self.list_lab_scores_impl(lab_id).await
    }

    async fn set_manual_score(
        &self,
        lab_id: i64,
        student_id: i64,
        request: ManualScoreRequest,
        graded_by: i64,
    ) -> Result<Option<LabScore>> {
        self.set_manual_score_impl(lab_id, student_id, request, graded_by)
            .await
    }

    async fn annotate_score(
        &self,
        lab_id: i64,
        student_id: i64,
        request: AnnotateRequest,
        graded_by: i64,
    ) -> Result<AnnotateOutcome> {
        self.annotate_score_impl(lab_id, student_id, request, graded_by)
            .await
    }

    async fn list_course_students(&self, course_id: i64) -> Result<Vec<(i64, String)>> {
        self.list_course_students_impl(course_id).await
    }

    async fn list_lab_criteria(&self, lab_id: i64) -> Result<Vec<RubricCriterion>> {
        self.list_lab_criteria_impl(lab_id).await
    }

    // 练习模块
    async fn create_exercise(
        &self,
        exercise: CreateExerciseRequest,
        created_by: Option<i64>,
    ) -> Result<Exercise> {
        self.create_exercise_impl(exercise, created_by).await
    }

    async fn get_exercise_by_id(&self, id: i64) -> Result<Option<Exercise>> {
        self.get_exercise_by_id_impl(id).await
    }

    async fn list_exercises(&self, simulation_id: i64) -> Result<Vec<Exercise>> {
        self.list_exercises_impl(simulation_id).await
    }

    async fn update_exercise(
        &self,
        id: i64,
        update: UpdateExerciseRequest,
    ) -> Result<Option<Exercise>> {
        self.update_exercise_impl(id, update).await
    }

    async fn delete_exercise(&self, id: i64) -> Result<bool> {
        self.delete_exercise_impl(id).await
    }

    async fn insert_exercise_submission(
        &self,
        submission: NewExerciseSubmission,
    ) -> Result<ExerciseSubmission> {
        self.insert_exercise_submission_impl(submission).await
    }

    async fn get_exercise_submission(&self, id: i64) -> Result<Option<ExerciseSubmission>> {
        self.get_exercise_submission_impl(id).await
    }

    async fn list_exercise_submissions(
        &self,
        params: SubmissionListParams,
    ) -> Result<SubmissionListResponse> {
        self.list_exercise_submissions_impl(params).await
    }

    async fn grade_exercise_submission(
        &self,
        id: i64,
        graded: GradedSubmission,
        log: ActivityEntry,
    ) -> Result<Option<ExerciseSubmission>> {
        self.grade_exercise_submission_impl(id, graded, log).await
    }

    async fn exercise_statistics(&self, simulation_id: i64) -> Result<Vec<ExerciseStatistic>> {
        self.exercise_statistics_impl(simulation_id).await
    }

    // 成就模块
    async fn list_active_achievements(&self) -> Result<Vec<Achievement>> {
        self.list_active_achievements_impl().await
    }

    async fn create_achievement(
        &self,
        achievement: CreateAchievementRequest,
        created_by: Option<i64>,
    ) -> Result<Achievement> {
        self.create_achievement_impl(achievement, created_by).await
    }

    async fn award_achievement(
        &self,
        request: AwardAchievementRequest,
        log: ActivityEntry,
    ) -> Result<AwardOutcome> {
        self.award_achievement_impl(request, log).await
    }

    async fn list_student_achievements(
        &self,
        student_id: i64,
    ) -> Result<Vec<EarnedAchievement>> {
        self.list_student_achievements_impl(student_id).await
    }

    // 门户模块
    async fn student_stats(&self, student_id: i64) -> Result<StudentStatsResponse> {
        self.student_stats_impl(student_id).await
    }

    async fn student_course_progress(
        &self,
        student_id: i64,
    ) -> Result<Vec<CourseProgressItem>> {
        self.student_course_progress_impl(student_id).await
    }

    async fn student_grade_items(&self, student_id: i64) -> Result<Vec<GradeItem>> {
        self.student_grade_items_impl(student_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("vlab.db").unwrap(),
            "sqlite://vlab.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            "sqlite::memory:"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@localhost/vlab").unwrap(),
            "postgres://u:p@localhost/vlab"
        );
        assert!(SeaOrmStorage::build_database_url("ftp://nope").is_err());
    }

    #[test]
    fn test_in_memory_detection() {
        assert!(SeaOrmStorage::is_in_memory("sqlite::memory:"));
        assert!(SeaOrmStorage::is_in_memory("sqlite://file?mode=memory&cache=shared"));
        assert!(!SeaOrmStorage::is_in_memory("sqlite://vlab.db?mode=rwc"));
    }
}
