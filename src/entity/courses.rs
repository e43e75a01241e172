//! 课程实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub code: String,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub subject: Option<String>,
    pub grade_level: Option<String>,
    pub school_id: Option<i64>,
    pub instructor_id: Option<i64>,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::course_schedules::Entity")]
    Schedules,
    #[sea_orm(has_many = "super::course_enrollments::Entity")]
    Enrollments,
    #[sea_orm(has_many = "super::labs::Entity")]
    Labs,
}

impl Related<super::course_schedules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Schedules.def()
    }
}

impl Related<super::course_enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl Related<super::labs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Labs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_course(self) -> crate::models::courses::entities::Course {
        use super::to_datetime;
        use crate::models::courses::entities::{Course, CourseStatus};

        Course {
            id: self.id,
            code: self.code,
            title: self.title,
            description: self.description,
            subject: self.subject,
            grade_level: self.grade_level,
            school_id: self.school_id,
            instructor_id: self.instructor_id,
            status: self
                .status
                .parse::<CourseStatus>()
                .unwrap_or(CourseStatus::Draft),
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
