//! 实体预导入

pub use super::achievements::{
    ActiveModel as AchievementActiveModel, Entity as Achievements, Model as AchievementModel,
};
pub use super::activity_logs::{
    ActiveModel as ActivityLogActiveModel, Entity as ActivityLogs, Model as ActivityLogModel,
};
pub use super::course_enrollments::{
    ActiveModel as CourseEnrollmentActiveModel, Entity as CourseEnrollments,
    Model as CourseEnrollmentModel,
};
pub use super::course_schedules::{
    ActiveModel as CourseScheduleActiveModel, Entity as CourseSchedules,
    Model as CourseScheduleModel,
};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::exercise_submissions::{
    ActiveModel as ExerciseSubmissionActiveModel, Entity as ExerciseSubmissions,
    Model as ExerciseSubmissionModel,
};
pub use super::exercises::{
    ActiveModel as ExerciseActiveModel, Entity as Exercises, Model as ExerciseModel,
};
pub use super::lab_rubric_criteria::{
    ActiveModel as LabRubricCriterionActiveModel, Entity as LabRubricCriteria,
    Model as LabRubricCriterionModel,
};
pub use super::lab_score_annotations::{
    ActiveModel as LabScoreAnnotationActiveModel, Entity as LabScoreAnnotations,
    Model as LabScoreAnnotationModel,
};
pub use super::lab_scores::{
    ActiveModel as LabScoreActiveModel, Entity as LabScores, Model as LabScoreModel,
};
pub use super::lab_sessions::{
    ActiveModel as LabSessionActiveModel, Entity as LabSessions, Model as LabSessionModel,
};
pub use super::lab_submissions::{
    ActiveModel as LabSubmissionActiveModel, Entity as LabSubmissions, Model as LabSubmissionModel,
};
pub use super::labs::{ActiveModel as LabActiveModel, Entity as Labs, Model as LabModel};
pub use super::parent_students::{
    ActiveModel as ParentStudentActiveModel, Entity as ParentStudents, Model as ParentStudentModel,
};
pub use super::permissions::{
    ActiveModel as PermissionActiveModel, Entity as Permissions, Model as PermissionModel,
};
pub use super::role_permissions::{
    ActiveModel as RolePermissionActiveModel, Entity as RolePermissions,
    Model as RolePermissionModel,
};
pub use super::roles::{ActiveModel as RoleActiveModel, Entity as Roles, Model as RoleModel};
pub use super::schools::{ActiveModel as SchoolActiveModel, Entity as Schools, Model as SchoolModel};
pub use super::sessions::{
    ActiveModel as SessionActiveModel, Entity as Sessions, Model as SessionModel,
};
pub use super::simulation_progress::{
    ActiveModel as SimulationProgressActiveModel, Entity as SimulationProgress,
    Model as SimulationProgressModel,
};
pub use super::simulations::{
    ActiveModel as SimulationActiveModel, Entity as Simulations, Model as SimulationModel,
};
pub use super::student_achievements::{
    ActiveModel as StudentAchievementActiveModel, Entity as StudentAchievements,
    Model as StudentAchievementModel,
};
pub use super::student_progress::{
    ActiveModel as StudentProgressActiveModel, Entity as StudentProgress,
    Model as StudentProgressModel,
};
pub use super::user_roles::{
    ActiveModel as UserRoleActiveModel, Entity as UserRoles, Model as UserRoleModel,
};
pub use super::user_school_access::{
    ActiveModel as UserSchoolAccessActiveModel, Entity as UserSchoolAccess,
    Model as UserSchoolAccessModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
