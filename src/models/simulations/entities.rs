use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 仿真实验
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/simulation.ts")]
pub struct Simulation {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub grade_level: Option<String>,
    pub simulation_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub is_published: bool,
    pub allow_guest: bool,
    pub created_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 学生仿真进度
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/simulation.ts")]
pub struct SimulationProgress {
    pub id: i64,
    pub student_id: i64,
    pub simulation_id: i64,
    pub progress_percentage: f64,
    pub best_score: f64,
    pub completed: bool,
    pub time_spent_minutes: i64,
    pub attempts: i32,
    pub last_accessed: chrono::DateTime<chrono::Utc>,
}

// 上传类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/simulation.ts")]
pub enum UploadKind {
    Simulation,
    Image,
}

crate::impl_str_enum!(UploadKind {
    Simulation => "simulation",
    Image => "image",
});

impl UploadKind {
    pub const ALL: [UploadKind; 2] = [UploadKind::Simulation, UploadKind::Image];

    /// 存储子目录
    pub fn directory(&self) -> &'static str {
        match self {
            UploadKind::Simulation => "simulations",
            UploadKind::Image => "images",
        }
    }

    pub fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            UploadKind::Simulation => &[".html", ".htm"],
            UploadKind::Image => &[".jpg", ".jpeg", ".png", ".gif", ".webp"],
        }
    }

    pub fn allowed_mime_types(&self) -> &'static [&'static str] {
        match self {
            UploadKind::Simulation => &["text/html", "application/xhtml+xml"],
            UploadKind::Image => &["image/jpeg", "image/png", "image/gif", "image/webp"],
        }
    }

    /// MIME 是否匹配（忽略 charset 等参数）
    pub fn accepts_mime(&self, mime: &str) -> bool {
        let essence = mime.split(';').next().unwrap_or("").trim().to_lowercase();
        match self {
            UploadKind::Simulation => self.allowed_mime_types().contains(&essence.as_str()),
            UploadKind::Image => essence.starts_with("image/"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_acceptance() {
        assert!(UploadKind::Simulation.accepts_mime("text/html; charset=utf-8"));
        assert!(UploadKind::Simulation.accepts_mime("application/xhtml+xml"));
        assert!(!UploadKind::Simulation.accepts_mime("image/png"));
        assert!(UploadKind::Image.accepts_mime("image/webp"));
        assert!(!UploadKind::Image.accepts_mime("text/html"));
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("image".parse::<UploadKind>(), Ok(UploadKind::Image));
        assert!("video".parse::<UploadKind>().is_err());
        assert_eq!(UploadKind::Simulation.directory(), "simulations");
    }
}
