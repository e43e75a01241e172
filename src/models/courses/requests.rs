use serde::Deserialize;
use ts_rs::TS;

use super::entities::CourseStatus;
use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;
use crate::utils::validate::validate_time_of_day;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub school_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub instructor_id: Option<i64>,
    pub status: Option<CourseStatus>,
    pub search: Option<String>,
}

/// 课程可见范围（由服务层按身份决定）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseVisibility {
    All,
    Instructor(i64),
    EnrolledStudent(i64),
}

// 时间表输入
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct ScheduleInput {
    pub day_of_week: i32,
    pub start_time: String,
    pub end_time: String,
    pub room: Option<String>,
    pub instructor_id: Option<i64>,
}

impl ScheduleInput {
    pub fn validate(&self) -> Result<(), String> {
        if !(0..=6).contains(&self.day_of_week) {
            return Err(format!(
                "day_of_week must be between 0 and 6, got {}",
                self.day_of_week
            ));
        }
        let start = validate_time_of_day(&self.start_time)?;
        let end = validate_time_of_day(&self.end_time)?;
        if start >= end {
            return Err(format!(
                "start_time {} must be before end_time {}",
                self.start_time, self.end_time
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CreateCourseRequest {
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub grade_level: Option<String>,
    pub school_id: Option<i64>,
    pub instructor_id: Option<i64>,
    pub status: Option<CourseStatus>,
    #[serde(default)]
    pub schedules: Vec<ScheduleInput>,
}

impl CreateCourseRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.code.trim().is_empty() {
            return Err("code is required".to_string());
        }
        if self.title.trim().is_empty() {
            return Err("title is required".to_string());
        }
        for (idx, schedule) in self.schedules.iter().enumerate() {
            schedule
                .validate()
                .map_err(|e| format!("schedules[{idx}]: {e}"))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub grade_level: Option<String>,
    pub school_id: Option<i64>,
    pub instructor_id: Option<i64>,
    pub status: Option<CourseStatus>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct EnrollStudentRequest {
    pub student_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(day: i32, start: &str, end: &str) -> ScheduleInput {
        ScheduleInput {
            day_of_week: day,
            start_time: start.to_string(),
            end_time: end.to_string(),
            room: None,
            instructor_id: None,
        }
    }

    #[test]
    fn test_schedule_validation() {
        assert!(schedule(1, "08:00", "09:30").validate().is_ok());
        assert!(schedule(7, "08:00", "09:30").validate().is_err());
        assert!(schedule(-1, "08:00", "09:30").validate().is_err());
        assert!(schedule(2, "10:00", "09:00").validate().is_err());
        assert!(schedule(2, "10:00", "10:00").validate().is_err());
        assert!(schedule(2, "8am", "09:00").validate().is_err());
    }

    #[test]
    fn test_course_request_reports_bad_schedule_index() {
        let req = CreateCourseRequest {
            code: "PHY-101".into(),
            title: "Physics".into(),
            description: None,
            subject: None,
            grade_level: None,
            school_id: None,
            instructor_id: None,
            status: None,
            schedules: vec![schedule(1, "08:00", "09:00"), schedule(9, "08:00", "09:00")],
        };
        assert!(req.validate().unwrap_err().starts_with("schedules[1]"));
    }
}
