use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 成就
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/achievement.ts")]
pub struct Achievement {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub achievement_type: String,
    pub criteria: Option<serde_json::Value>,
    pub points: i32,
    pub badge_icon: Option<String>,
    pub badge_color: Option<String>,
    pub is_active: bool,
    pub created_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Achievement {
    pub const SCORE_THRESHOLD: &'static str = "score_threshold";
}

// 学生已获得的成就
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/achievement.ts")]
pub struct StudentAchievement {
    pub id: i64,
    pub student_id: i64,
    pub achievement_id: i64,
    pub simulation_id: Option<i64>,
    pub points_earned: i32,
    pub earned_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/achievement.ts")]
pub struct EarnedAchievement {
    #[serde(flatten)]
    #[ts(flatten)]
    pub earned: StudentAchievement,
    pub name: String,
    pub description: Option<String>,
    pub badge_icon: Option<String>,
    pub badge_color: Option<String>,
}
