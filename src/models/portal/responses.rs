use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 仿真汇总
#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/portal.ts")]
pub struct SimulationTotals {
    pub attempted: i64,
    pub completed: i64,
    pub average_best_score: f64,
    pub total_time_minutes: i64,
}

#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/portal.ts")]
pub struct LabTotals {
    pub completed_labs: i64,
    pub time_spent_minutes: i64,
}

#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/portal.ts")]
pub struct AchievementTotals {
    pub count: i64,
    pub points: i64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/portal.ts")]
pub struct SubjectBreakdown {
    pub subject: String,
    pub attempted: i64,
    pub completed: i64,
    pub average_score: f64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/portal.ts")]
pub struct RecentSimulation {
    pub simulation_id: i64,
    pub title: String,
    pub subject: Option<String>,
    pub progress_percentage: f64,
    pub best_score: f64,
    pub completed: bool,
    pub last_accessed: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/portal.ts")]
pub struct StudentStatsResponse {
    pub simulations: SimulationTotals,
    pub labs: LabTotals,
    pub achievements: AchievementTotals,
    pub subjects: Vec<SubjectBreakdown>,
    pub recent_activity: Vec<RecentSimulation>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/portal.ts")]
pub struct CourseProgressItem {
    pub course_id: i64,
    pub course_title: String,
    pub completed_labs: i32,
    pub total_labs: i64,
    pub time_spent_minutes: i64,
    pub last_activity: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/portal.ts")]
pub struct StudentProgressResponse {
    pub items: Vec<CourseProgressItem>,
}

// 家长关联的学生
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/portal.ts")]
pub struct ChildSummary {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub school_id: Option<i64>,
    pub relationship: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/portal.ts")]
pub struct ChildrenResponse {
    pub items: Vec<ChildSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/portal.ts")]
pub enum GradeKind {
    Lab,
    Exercise,
}

// 成绩条目（实验成绩与练习提交合并）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/portal.ts")]
pub struct GradeItem {
    pub id: i64,
    pub course: String,
    pub assignment: String,
    pub score: f64,
    pub max_score: f64,
    pub percentage: i64,
    pub date: chrono::DateTime<chrono::Utc>,
    pub teacher: Option<String>,
    pub kind: GradeKind,
}

impl GradeItem {
    pub const MAX_ITEMS: usize = 50;

    pub fn rounded_percentage(score: f64, max_score: f64) -> i64 {
        if max_score > 0.0 {
            (score / max_score * 100.0).round() as i64
        } else {
            0
        }
    }

    /// 按日期倒序合并并截断
    pub fn merge_newest_first(mut items: Vec<GradeItem>) -> Vec<GradeItem> {
        items.sort_by(|a, b| b.date.cmp(&a.date));
        items.truncate(Self::MAX_ITEMS);
        items
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/portal.ts")]
pub struct ChildGradesResponse {
    pub child: ChildSummary,
    pub items: Vec<GradeItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn item(id: i64, days_ago: i64) -> GradeItem {
        GradeItem {
            id,
            course: "Physics".into(),
            assignment: format!("Lab {id}"),
            score: 7.0,
            max_score: 9.0,
            percentage: GradeItem::rounded_percentage(7.0, 9.0),
            date: Utc::now() - Duration::days(days_ago),
            teacher: None,
            kind: GradeKind::Lab,
        }
    }

    #[test]
    fn test_rounded_percentage() {
        assert_eq!(GradeItem::rounded_percentage(7.0, 9.0), 78);
        assert_eq!(GradeItem::rounded_percentage(1.0, 0.0), 0);
    }

    #[test]
    fn test_merge_newest_first_and_cap() {
        let items: Vec<GradeItem> = (0..60).map(|i| item(i, i)).collect();
        let merged = GradeItem::merge_newest_first(items);
        assert_eq!(merged.len(), GradeItem::MAX_ITEMS);
        assert_eq!(merged[0].id, 0);
        assert!(merged.windows(2).all(|w| w[0].date >= w[1].date));
    }
}
