use serde::Serialize;
use ts_rs::TS;

use super::entities::{School, SchoolWithCounts};
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct SchoolResponse {
    pub school: School,
}

#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct SchoolSummary {
    pub total_schools: i64,
    pub total_teachers: i64,
    pub total_students: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct SchoolListResponse {
    pub items: Vec<SchoolWithCounts>,
    pub pagination: PaginationInfo,
    pub summary: SchoolSummary,
}
