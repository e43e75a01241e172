//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod achievements;
pub mod activity_logs;
pub mod course_enrollments;
pub mod course_schedules;
pub mod courses;
pub mod exercise_submissions;
pub mod exercises;
pub mod lab_rubric_criteria;
pub mod lab_score_annotations;
pub mod lab_scores;
pub mod lab_sessions;
pub mod lab_submissions;
pub mod labs;
pub mod parent_students;
pub mod permissions;
pub mod role_permissions;
pub mod roles;
pub mod schools;
pub mod sessions;
pub mod simulation_progress;
pub mod simulations;
pub mod student_achievements;
pub mod student_progress;
pub mod user_roles;
pub mod user_school_access;
pub mod users;

use chrono::{DateTime, Utc};

/// 秒级时间戳转 UTC 时间
pub(crate) fn to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}

/// 解析 text 列中的 JSON，损坏内容按空值处理
pub(crate) fn parse_json(text: Option<&str>) -> Option<serde_json::Value> {
    text.and_then(|t| serde_json::from_str(t).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_tolerates_garbage() {
        assert_eq!(parse_json(Some("{\"a\":1}")), Some(serde_json::json!({"a": 1})));
        assert_eq!(parse_json(Some("not json")), None);
        assert_eq!(parse_json(None), None);
    }

    #[test]
    fn test_to_datetime() {
        assert_eq!(to_datetime(0).timestamp(), 0);
        assert_eq!(to_datetime(1_700_000_000).timestamp(), 1_700_000_000);
    }
}
