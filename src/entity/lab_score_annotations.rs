//! 评分批注实体（每个成绩每条标准一行）

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "lab_score_annotations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub score_id: i64,
    pub criterion_id: i64,
    pub points_awarded: f64,
    #[sea_orm(column_type = "Text", nullable)]
    pub teacher_comment: Option<String>,
    pub annotation_type: String,
    pub created_by: Option<i64>,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::lab_scores::Entity",
        from = "Column::ScoreId",
        to = "super::lab_scores::Column::Id",
        on_delete = "Cascade"
    )]
    Score,
}

impl Related<super::lab_scores::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Score.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_annotation(self) -> crate::models::labs::entities::ScoreAnnotation {
        crate::models::labs::entities::ScoreAnnotation {
            id: self.id,
            score_id: self.score_id,
            criterion_id: self.criterion_id,
            points_awarded: self.points_awarded,
            teacher_comment: self.teacher_comment,
            annotation_type: self.annotation_type,
            created_by: self.created_by,
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
