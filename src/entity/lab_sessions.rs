//! 实验会话实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "lab_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub lab_id: i64,
    pub student_id: i64,
    pub status: String,
    pub start_time: i64,
    pub end_time: Option<i64>,
    pub duration_minutes: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::labs::Entity",
        from = "Column::LabId",
        to = "super::labs::Column::Id",
        on_delete = "Cascade"
    )]
    Lab,
}

impl Related<super::labs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lab.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_lab_session(self) -> crate::models::labs::entities::LabSession {
        use super::to_datetime;
        use crate::models::labs::entities::{LabSession, LabSessionStatus};

        LabSession {
            id: self.id,
            lab_id: self.lab_id,
            student_id: self.student_id,
            status: self
                .status
                .parse::<LabSessionStatus>()
                .unwrap_or(LabSessionStatus::Abandoned),
            start_time: to_datetime(self.start_time),
            end_time: self.end_time.map(to_datetime),
            duration_minutes: self.duration_minutes,
            created_at: to_datetime(self.created_at),
        }
    }
}
