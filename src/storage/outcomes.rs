//! 存储层多分支操作的结果类型
//!
//! 事务内的业务前置检查（存在性、归属、状态）以枚举返回，由服务层映射为 HTTP 状态。

use std::collections::BTreeMap;

use crate::models::{
    achievements::entities::StudentAchievement,
    auth::entities::SchoolAccess,
    courses::entities::CourseEnrollment,
    exercises::entities::AnswerDetail,
    labs::{
        entities::{Lab, LabScore, LabSession, LabSubmission, RubricCriterion},
        responses::AttemptsExceeded,
    },
};

/// 会话解析所需的角色、权限与学校访问
#[derive(Debug, Clone, Default)]
pub struct IdentityParts {
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
    pub school_access: Vec<SchoolAccess>,
}

/// 启动时写入的角色及其权限
#[derive(Debug, Clone)]
pub struct RoleSeed {
    pub name: &'static str,
    pub description: &'static str,
    pub permissions: Vec<&'static str>,
}

#[derive(Debug)]
pub enum EnrollOutcome {
    StudentNotFound,
    NotAStudent,
    AlreadyEnrolled,
    Enrolled(CourseEnrollment),
}

/// 实验列表可见范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabVisibility {
    All,
    PublishedForStudent(i64),
}

#[derive(Debug)]
pub enum LabStartOutcome {
    LabNotFound,
    NotEnrolled,
    AttemptsExceeded(AttemptsExceeded),
    Started {
        session: LabSession,
        lab: Lab,
        criteria: Vec<RubricCriterion>,
        is_resuming: bool,
    },
}

#[derive(Debug)]
pub enum LabSubmitOutcome {
    SessionNotFound,
    NotInProgress(LabSession),
    Saved {
        submission: LabSubmission,
        session: LabSession,
    },
}

/// 评分人及其是否可跨课程评分
#[derive(Debug, Clone, Copy)]
pub struct ScoreActor {
    pub user_id: i64,
    pub can_grade_all: bool,
}

#[derive(Debug)]
pub enum LabScoreOutcome {
    LabNotFound,
    Forbidden,
    SubmissionNotFound,
    Scored {
        score: LabScore,
        criteria: Vec<RubricCriterion>,
    },
}

#[derive(Debug)]
pub enum AnnotateOutcome {
    ScoreNotFound,
    CriterionNotFound,
    OutOfRange { max_points: f64 },
    Annotated(LabScore),
}

#[derive(Debug)]
pub enum AwardOutcome {
    AchievementNotFound,
    AlreadyAwarded,
    Awarded(StudentAchievement),
}

/// 自动批改后的练习提交
#[derive(Debug, Clone)]
pub struct NewExerciseSubmission {
    pub simulation_id: i64,
    pub student_id: i64,
    pub answers: serde_json::Value,
    pub details: BTreeMap<String, AnswerDetail>,
    pub total_score: f64,
    pub max_score: f64,
}

/// 教师批改结果
#[derive(Debug, Clone)]
pub struct GradedSubmission {
    pub details: BTreeMap<String, AnswerDetail>,
    pub total_score: f64,
    pub teacher_feedback: Option<String>,
    pub graded_by: i64,
    pub is_draft: bool,
}
