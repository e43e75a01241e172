//! 成就实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "achievements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub achievement_type: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub criteria: Option<String>,
    pub points: i32,
    pub badge_icon: Option<String>,
    pub badge_color: Option<String>,
    pub is_active: bool,
    pub created_by: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::student_achievements::Entity")]
    StudentAchievements,
}

impl Related<super::student_achievements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudentAchievements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_achievement(self) -> crate::models::achievements::entities::Achievement {
        use super::{parse_json, to_datetime};
        crate::models::achievements::entities::Achievement {
            id: self.id,
            name: self.name,
            description: self.description,
            achievement_type: self.achievement_type,
            criteria: parse_json(self.criteria.as_deref()),
            points: self.points,
            badge_icon: self.badge_icon,
            badge_color: self.badge_color,
            is_active: self.is_active,
            created_by: self.created_by,
            created_at: to_datetime(self.created_at),
        }
    }
}
