//! 用户学校访问权限实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_school_access")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub school_id: i64,
    pub access_level: String,
    pub granted_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::schools::Entity",
        from = "Column::SchoolId",
        to = "super::schools::Column::Id",
        on_delete = "Cascade"
    )]
    School,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 无法识别的级别按只读处理
    pub fn into_school_access(self) -> crate::models::auth::entities::SchoolAccess {
        use crate::models::auth::entities::{AccessLevel, SchoolAccess};
        SchoolAccess {
            school_id: self.school_id,
            access_level: self
                .access_level
                .parse::<AccessLevel>()
                .unwrap_or(AccessLevel::Read),
        }
    }
}
