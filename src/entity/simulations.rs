//! 仿真实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "simulations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub slug: String,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub subject: Option<String>,
    pub grade_level: Option<String>,
    pub simulation_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub is_published: bool,
    pub allow_guest: bool,
    pub created_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::simulation_progress::Entity")]
    Progress,
    #[sea_orm(has_many = "super::exercises::Entity")]
    Exercises,
}

impl Related<super::simulation_progress::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Progress.def()
    }
}

impl Related<super::exercises::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Exercises.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_simulation(self) -> crate::models::simulations::entities::Simulation {
        use super::to_datetime;
        crate::models::simulations::entities::Simulation {
            id: self.id,
            slug: self.slug,
            title: self.title,
            description: self.description,
            subject: self.subject,
            grade_level: self.grade_level,
            simulation_url: self.simulation_url,
            thumbnail_url: self.thumbnail_url,
            is_published: self.is_published,
            allow_guest: self.allow_guest,
            created_by: self.created_by,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
