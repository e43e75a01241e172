//! 仿真进度实体（每个学生每个仿真一行）

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "simulation_progress")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub simulation_id: i64,
    pub progress_percentage: f64,
    pub best_score: f64,
    pub completed: bool,
    pub time_spent_minutes: i64,
    pub attempts: i32,
    pub last_accessed: i64,
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
    pub fn into_progress(self) -> crate::models::simulations::entities::SimulationProgress {
        crate::models::simulations::entities::SimulationProgress {
            id: self.id,
            student_id: self.student_id,
            simulation_id: self.simulation_id,
            progress_percentage: self.progress_percentage,
            best_score: self.best_score,
            completed: self.completed,
            time_spent_minutes: self.time_spent_minutes,
            attempts: self.attempts,
            last_accessed: super::to_datetime(self.last_accessed),
        }
    }
}
