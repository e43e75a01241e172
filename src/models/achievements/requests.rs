use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/achievement.ts")]
pub struct CreateAchievementRequest {
    pub name: String,
    pub description: Option<String>,
    pub achievement_type: String,
    pub criteria: Option<serde_json::Value>,
    #[serde(default)]
    pub points: i32,
    pub badge_icon: Option<String>,
    pub badge_color: Option<String>,
}

impl CreateAchievementRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name is required".to_string());
        }
        if self.achievement_type.trim().is_empty() {
            return Err("achievement_type is required".to_string());
        }
        if self.points < 0 {
            return Err("points must not be negative".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/achievement.ts")]
pub struct AwardAchievementRequest {
    pub student_id: i64,
    pub achievement_id: i64,
    pub simulation_id: Option<i64>,
}
