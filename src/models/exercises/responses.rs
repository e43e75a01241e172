use serde::Serialize;
use ts_rs::TS;

use super::entities::{Exercise, ExerciseSubmission};
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exercise.ts")]
pub struct ExerciseResponse {
    pub exercise: Exercise,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exercise.ts")]
pub struct ExerciseListResponse {
    pub items: Vec<Exercise>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exercise.ts")]
pub struct SubmitExercisesResponse {
    pub submission: ExerciseSubmission,
    pub percentage: f64,
    pub awarded_achievements: Vec<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exercise.ts")]
pub struct SubmissionResponse {
    pub submission: ExerciseSubmission,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exercise.ts")]
pub struct SubmissionListResponse {
    pub items: Vec<ExerciseSubmission>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exercise.ts")]
pub struct ExerciseStatistic {
    pub exercise_id: i64,
    pub question: String,
    pub attempts: i64,
    pub correct: i64,
    pub correct_rate: f64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exercise.ts")]
pub struct ExerciseStatisticsResponse {
    pub items: Vec<ExerciseStatistic>,
}
