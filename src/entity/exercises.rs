//! 练习题实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exercises")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub simulation_id: i64,
    #[sea_orm(column_type = "Text")]
    pub question: String,
    pub question_type: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub options: Option<String>,
    pub correct_answer: Option<String>,
    pub points: f64,
    pub order_index: i32,
    pub created_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
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
    pub fn into_exercise(self) -> crate::models::exercises::entities::Exercise {
        use super::{parse_json, to_datetime};
        use crate::models::exercises::entities::{Exercise, QuestionType};

        Exercise {
            id: self.id,
            simulation_id: self.simulation_id,
            question: self.question,
            question_type: self
                .question_type
                .parse::<QuestionType>()
                .unwrap_or(QuestionType::ShortAnswer),
            options: parse_json(self.options.as_deref()),
            correct_answer: self.correct_answer,
            points: self.points,
            order_index: self.order_index,
            created_by: self.created_by,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
