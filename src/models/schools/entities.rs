use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 学校实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct School {
    pub id: i64,
    pub school_code: String,
    pub school_name: String,
    pub school_name_en: Option<String>,
    pub province: String,
    pub district: Option<String>,
    pub commune: Option<String>,
    pub village: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 学校及其师生统计
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct SchoolWithCounts {
    #[serde(flatten)]
    #[ts(flatten)]
    pub school: School,
    pub teacher_count: i64,
    pub student_count: i64,
}
