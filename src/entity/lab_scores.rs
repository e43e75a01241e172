//! 实验成绩实体（每个学生每个实验一行）

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "lab_scores")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub lab_id: i64,
    pub student_id: i64,
    pub submission_id: Option<i64>,
    pub auto_score: Option<f64>,
    pub manual_score: Option<f64>,
    pub final_score: Option<f64>,
    pub max_score: f64,
    #[sea_orm(column_type = "Text", nullable)]
    pub rubric_breakdown: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub teacher_comments: Option<String>,
    pub graded_by: Option<i64>,
    pub graded_at: Option<i64>,
    pub updated_at: i64,
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
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::StudentId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
    #[sea_orm(has_many = "super::lab_score_annotations::Entity")]
    Annotations,
}

impl Related<super::labs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lab.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::lab_score_annotations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Annotations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_score(self) -> crate::models::labs::entities::LabScore {
        use super::to_datetime;
        let rubric_breakdown = self
            .rubric_breakdown
            .as_deref()
            .and_then(|text| serde_json::from_str(text).ok())
            .unwrap_or_default();

        crate::models::labs::entities::LabScore {
            id: self.id,
            lab_id: self.lab_id,
            student_id: self.student_id,
            submission_id: self.submission_id,
            auto_score: self.auto_score,
            manual_score: self.manual_score,
            final_score: self.final_score,
            max_score: self.max_score,
            rubric_breakdown,
            teacher_comments: self.teacher_comments,
            graded_by: self.graded_by,
            graded_at: self.graded_at.map(to_datetime),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
