use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;
use crate::utils::validate::validate_slug;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/simulation.ts")]
pub struct SimulationListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub subject: Option<String>,
    pub search: Option<String>,
}

/// 列表查询条件（服务层组装）
#[derive(Debug, Clone, Default)]
pub struct SimulationFilter {
    pub subject: Option<String>,
    pub search: Option<String>,
    pub published_only: bool,
    pub guest_only: bool,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/simulation.ts")]
pub struct CreateSimulationRequest {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub grade_level: Option<String>,
    pub simulation_url: Option<String>,
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub allow_guest: bool,
}

impl CreateSimulationRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_slug(&self.slug)?;
        if self.title.trim().is_empty() {
            return Err("title is required".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/simulation.ts")]
pub struct UpdateSimulationRequest {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub grade_level: Option<String>,
    pub simulation_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub is_published: Option<bool>,
    pub allow_guest: Option<bool>,
}

// 进度上报
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/simulation.ts")]
pub struct UpdateProgressRequest {
    pub progress_percentage: f64,
    pub score: Option<f64>,
    pub time_spent_minutes: Option<i64>,
}

impl UpdateProgressRequest {
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=100.0).contains(&self.progress_percentage) {
            return Err("progress_percentage must be between 0 and 100".to_string());
        }
        if self.time_spent_minutes.is_some_and(|m| m < 0) {
            return Err("time_spent_minutes must not be negative".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bounds() {
        let mut req = UpdateProgressRequest {
            progress_percentage: 100.0,
            score: Some(80.0),
            time_spent_minutes: Some(5),
        };
        assert!(req.validate().is_ok());
        req.progress_percentage = 120.0;
        assert!(req.validate().is_err());
    }
}
