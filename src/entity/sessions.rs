//! 会话实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub token: String,
    pub user_id: Option<i64>,
    pub is_guest: bool,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub expires_at: i64,
    pub last_accessed_at: i64,
    pub is_active: bool,
    pub created_at: i64,
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
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_session(self) -> crate::models::sessions::entities::Session {
        use super::to_datetime;
        crate::models::sessions::entities::Session {
            id: self.id,
            token: self.token,
            user_id: self.user_id,
            is_guest: self.is_guest,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            expires_at: to_datetime(self.expires_at),
            last_accessed_at: to_datetime(self.last_accessed_at),
            is_active: self.is_active,
            created_at: to_datetime(self.created_at),
        }
    }
}
