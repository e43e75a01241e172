use serde::Serialize;
use ts_rs::TS;

use super::entities::{Simulation, SimulationProgress, UploadKind};
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/simulation.ts")]
pub struct SimulationResponse {
    pub simulation: Simulation,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/simulation.ts")]
pub struct SimulationListResponse {
    pub items: Vec<Simulation>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/simulation.ts")]
pub struct StartSimulationResponse {
    pub simulation_url: Option<String>,
    pub progress: Option<SimulationProgress>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/simulation.ts")]
pub struct ProgressResponse {
    pub progress: SimulationProgress,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/simulation.ts")]
pub struct SubjectCount {
    pub subject: String,
    pub count: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/simulation.ts")]
pub struct PublicStatsResponse {
    pub total: i64,
    pub by_subject: Vec<SubjectCount>,
}

// 单个仿真的使用统计
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/simulation.ts")]
pub struct SimulationUsage {
    pub simulation_id: i64,
    pub title: String,
    pub students: i64,
    pub attempts: i64,
    pub completions: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/simulation.ts")]
pub struct SimulationStatsResponse {
    pub items: Vec<SimulationUsage>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/simulation.ts")]
pub struct UploadKindConfig {
    pub kind: UploadKind,
    pub extensions: Vec<String>,
    pub mime_types: Vec<String>,
    pub max_size: usize,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/simulation.ts")]
pub struct UploadConfigResponse {
    pub kinds: Vec<UploadKindConfig>,
    pub max_size: usize,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/simulation.ts")]
pub struct UploadResponse {
    pub url: String,
    pub file_name: String,
    pub size: usize,
    pub content_type: String,
}
