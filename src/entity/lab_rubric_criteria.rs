//! 评分标准实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "lab_rubric_criteria")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub lab_id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub max_points: f64,
    pub weight: f64,
    pub order_index: i32,
    pub response_key: Option<String>,
    pub expected_value: Option<String>,
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
    pub fn into_criterion(self) -> crate::models::labs::entities::RubricCriterion {
        crate::models::labs::entities::RubricCriterion {
            id: self.id,
            lab_id: self.lab_id,
            name: self.name,
            description: self.description,
            max_points: self.max_points,
            weight: self.weight,
            order_index: self.order_index,
            response_key: self.response_key,
            expected_value: self.expected_value,
        }
    }
}
