//! 练习提交实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exercise_submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub simulation_id: i64,
    pub student_id: i64,
    #[sea_orm(column_type = "Text")]
    pub answers: String,
    #[sea_orm(column_type = "Text")]
    pub details: String,
    pub total_score: f64,
    pub max_score: f64,
    #[sea_orm(column_type = "Text", nullable)]
    pub teacher_feedback: Option<String>,
    pub is_graded: bool,
    pub graded_by: Option<i64>,
    pub graded_at: Option<i64>,
    pub submitted_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::simulations::Entity",
        from = "Column::SimulationId",
        to = "super::simulations::Column::Id",
        on_delete = "Cascade"
    )]
    Simulation,
}

impl Related<super::simulations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Simulation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_submission(self) -> crate::models::exercises::entities::ExerciseSubmission {
        use super::to_datetime;
        crate::models::exercises::entities::ExerciseSubmission {
            id: self.id,
            simulation_id: self.simulation_id,
            student_id: self.student_id,
            answers: serde_json::from_str(&self.answers).unwrap_or(serde_json::Value::Null),
            details: serde_json::from_str(&self.details).unwrap_or_default(),
            total_score: self.total_score,
            max_score: self.max_score,
            teacher_feedback: self.teacher_feedback,
            is_graded: self.is_graded,
            graded_by: self.graded_by,
            graded_at: self.graded_at.map(to_datetime),
            submitted_at: to_datetime(self.submitted_at),
        }
    }
}
