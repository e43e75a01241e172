use serde::Serialize;
use ts_rs::TS;

/// 业务错误码，按模块分段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用 1xxx
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,
    DatabaseError = 1501,

    // 认证 2xxx
    AuthMissingCredentials = 2000,
    AuthFailed = 2001,
    SessionInvalid = 2002,
    SessionExpired = 2003,
    PasswordPolicyViolation = 2004,

    // 用户 3xxx
    UserNotFound = 3000,
    UserAlreadyExists = 3001,
    UserNameInvalid = 3002,
    UserEmailInvalid = 3003,
    UserCreationFailed = 3004,
    UserUpdateFailed = 3005,
    CanNotDeleteCurrentUser = 3006,
    RoleInvalid = 3007,

    // 学校 4xxx
    SchoolNotFound = 4000,
    SchoolAlreadyExists = 4001,
    SchoolValidationFailed = 4002,

    // 课程 5xxx
    CourseNotFound = 5000,
    CourseAlreadyExists = 5001,
    CourseValidationFailed = 5002,
    EnrollmentExists = 5003,
    EnrollmentRequired = 5004,

    // 仿真与上传 6xxx
    SimulationNotFound = 6000,
    SimulationAlreadyExists = 6001,
    FileNotFound = 6100,
    FileTypeNotAllowed = 6101,
    FileSizeExceeded = 6102,
    FileUploadFailed = 6103,
    MultifileUploadNotAllowed = 6104,

    // 实验 7xxx
    LabNotFound = 7000,
    LabNotPublished = 7001,
    LabSessionNotFound = 7002,
    LabSessionNotInProgress = 7003,
    LabMaxAttemptsReached = 7004,
    LabSubmissionNotFound = 7005,
    LabScoreNotFound = 7006,
    RubricCriterionNotFound = 7007,
    LabValidationFailed = 7008,

    // 练习 8xxx
    ExerciseNotFound = 8000,
    ExerciseValidationFailed = 8001,
    ExerciseSubmissionNotFound = 8002,

    // 成就 9xxx
    AchievementNotFound = 9000,
    AchievementAlreadyAwarded = 9001,
}

impl ErrorCode {
    /// 根据业务错误推断通用错误码
    pub fn from_error(err: &crate::errors::VLabError) -> Self {
        use crate::errors::VLabError;
        match err {
            VLabError::Validation(_) | VLabError::DateParse(_) => ErrorCode::BadRequest,
            VLabError::NotFound(_) => ErrorCode::NotFound,
            VLabError::Conflict(_) => ErrorCode::Conflict,
            VLabError::Authentication(_) => ErrorCode::Unauthorized,
            VLabError::Authorization(_) => ErrorCode::Forbidden,
            VLabError::DatabaseOperation(_)
            | VLabError::DatabaseConnection(_)
            | VLabError::Transaction(_) => ErrorCode::DatabaseError,
            _ => ErrorCode::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::VLabError;

    #[test]
    fn test_numeric_values() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::Unauthorized as i32, 1001);
        assert_eq!(ErrorCode::LabMaxAttemptsReached as i32, 7004);
    }

    #[test]
    fn test_from_error() {
        assert_eq!(
            ErrorCode::from_error(&VLabError::conflict("dup")),
            ErrorCode::Conflict
        );
        assert_eq!(
            ErrorCode::from_error(&VLabError::not_found("x")),
            ErrorCode::NotFound
        );
        assert_eq!(
            ErrorCode::from_error(&VLabError::transaction("x")),
            ErrorCode::DatabaseError
        );
    }
}
