use serde::Serialize;
use ts_rs::TS;

use super::entities::{Achievement, EarnedAchievement, StudentAchievement};

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/achievement.ts")]
pub struct AchievementResponse {
    pub achievement: Achievement,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/achievement.ts")]
pub struct AchievementListResponse {
    pub items: Vec<Achievement>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/achievement.ts")]
pub struct StudentAchievementsResponse {
    pub items: Vec<EarnedAchievement>,
    pub total_points: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/achievement.ts")]
pub struct AwardResponse {
    pub student_achievement: StudentAchievement,
}
