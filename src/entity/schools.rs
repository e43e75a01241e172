//! 学校实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "schools")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub school_code: String,
    pub school_name: String,
    pub school_name_en: Option<String>,
    pub province: String,
    pub district: Option<String>,
    pub commune: Option<String>,
    pub village: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::users::Entity")]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_school(self) -> crate::models::schools::entities::School {
        use super::to_datetime;
        crate::models::schools::entities::School {
            id: self.id,
            school_code: self.school_code,
            school_name: self.school_name,
            school_name_en: self.school_name_en,
            province: self.province,
            district: self.district,
            commune: self.commune,
            village: self.village,
            phone: self.phone,
            email: self.email,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
