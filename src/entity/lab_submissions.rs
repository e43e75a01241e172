//! 实验提交实体（每个实验会话一行）

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "lab_submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub session_id: i64,
    pub lab_id: i64,
    pub student_id: i64,
    #[sea_orm(column_type = "Text", nullable)]
    pub responses: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub autosave_data: Option<String>,
    pub submitted_at: Option<i64>,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::lab_sessions::Entity",
        from = "Column::SessionId",
        to = "super::lab_sessions::Column::Id",
        on_delete = "Cascade"
    )]
    Session,
}

impl Related<super::lab_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_submission(self) -> crate::models::labs::entities::LabSubmission {
        use super::{parse_json, to_datetime};
        crate::models::labs::entities::LabSubmission {
            id: self.id,
            session_id: self.session_id,
            lab_id: self.lab_id,
            student_id: self.student_id,
            responses: parse_json(self.responses.as_deref()),
            autosave_data: parse_json(self.autosave_data.as_deref()),
            submitted_at: self.submitted_at.map(to_datetime),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
