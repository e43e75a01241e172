//! 学生获得的成就

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "student_achievements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub achievement_id: i64,
    pub simulation_id: Option<i64>,
    pub points_earned: i32,
    pub earned_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::achievements::Entity",
        from = "Column::AchievementId",
        to = "super::achievements::Column::Id",
        on_delete = "Cascade"
    )]
    Achievement,
}

impl Related<super::achievements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Achievement.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_student_achievement(
        self,
    ) -> crate::models::achievements::entities::StudentAchievement {
        crate::models::achievements::entities::StudentAchievement {
            id: self.id,
            student_id: self.student_id,
            achievement_id: self.achievement_id,
            simulation_id: self.simulation_id,
            points_earned: self.points_earned,
            earned_at: super::to_datetime(self.earned_at),
        }
    }
}
