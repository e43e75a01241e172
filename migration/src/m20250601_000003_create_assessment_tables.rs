use sea_orm_migration::prelude::*;

use crate::{pk_column, plain_index, unique_index};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 练习题表
        manager
            .create_table(
                Table::create()
                    .table(Exercises::Table)
                    .if_not_exists()
                    .col(pk_column(Exercises::Id))
                    .col(
                        ColumnDef::new(Exercises::SimulationId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Exercises::Question).text().not_null())
                    .col(ColumnDef::new(Exercises::QuestionType).string().not_null())
                    .col(ColumnDef::new(Exercises::Options).text().null())
                    .col(ColumnDef::new(Exercises::CorrectAnswer).string().null())
                    .col(
                        ColumnDef::new(Exercises::Points)
                            .double()
                            .not_null()
                            .default(1.0),
                    )
                    .col(
                        ColumnDef::new(Exercises::OrderIndex)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Exercises::CreatedBy).big_integer().null())
                    .col(ColumnDef::new(Exercises::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Exercises::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Exercises::Table, Exercises::SimulationId)
                            .to(Simulations::Table, Simulations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 练习提交表
        manager
            .create_table(
                Table::create()
                    .table(ExerciseSubmissions::Table)
                    .if_not_exists()
                    .col(pk_column(ExerciseSubmissions::Id))
                    .col(
                        ColumnDef::new(ExerciseSubmissions::SimulationId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExerciseSubmissions::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExerciseSubmissions::Answers).text().not_null())
                    .col(ColumnDef::new(ExerciseSubmissions::Details).text().not_null())
                    .col(
                        ColumnDef::new(ExerciseSubmissions::TotalScore)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(ExerciseSubmissions::MaxScore)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(ExerciseSubmissions::TeacherFeedback)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ExerciseSubmissions::IsGraded)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ExerciseSubmissions::GradedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ExerciseSubmissions::GradedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ExerciseSubmissions::SubmittedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExerciseSubmissions::Table, ExerciseSubmissions::SimulationId)
                            .to(Simulations::Table, Simulations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExerciseSubmissions::Table, ExerciseSubmissions::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 成就表
        manager
            .create_table(
                Table::create()
                    .table(Achievements::Table)
                    .if_not_exists()
                    .col(pk_column(Achievements::Id))
                    .col(ColumnDef::new(Achievements::Name).string().not_null())
                    .col(ColumnDef::new(Achievements::Description).text().null())
                    .col(
                        ColumnDef::new(Achievements::AchievementType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Achievements::Criteria).text().null())
                    .col(
                        ColumnDef::new(Achievements::Points)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Achievements::BadgeIcon).string().null())
                    .col(ColumnDef::new(Achievements::BadgeColor).string().null())
                    .col(
                        ColumnDef::new(Achievements::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Achievements::CreatedBy).big_integer().null())
                    .col(
                        ColumnDef::new(Achievements::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 学生成就表
        manager
            .create_table(
                Table::create()
                    .table(StudentAchievements::Table)
                    .if_not_exists()
                    .col(pk_column(StudentAchievements::Id))
                    .col(
                        ColumnDef::new(StudentAchievements::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentAchievements::AchievementId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentAchievements::SimulationId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(StudentAchievements::PointsEarned)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(StudentAchievements::EarnedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentAchievements::Table, StudentAchievements::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                StudentAchievements::Table,
                                StudentAchievements::AchievementId,
                            )
                            .to(Achievements::Table, Achievements::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(plain_index(
                "idx_exercises_simulation_id",
                Exercises::Table,
                Exercises::SimulationId,
            ))
            .await?;
        manager
            .create_index(plain_index(
                "idx_exercise_submissions_student_id",
                ExerciseSubmissions::Table,
                ExerciseSubmissions::StudentId,
            ))
            .await?;
        // simulation_id 为空时由应用层查重
        manager
            .create_index(unique_index(
                "idx_student_achievements_triple",
                StudentAchievements::Table,
                vec![
                    StudentAchievements::StudentId,
                    StudentAchievements::AchievementId,
                    StudentAchievements::SimulationId,
                ],
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StudentAchievements::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Achievements::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExerciseSubmissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Exercises::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Simulations {
    #[sea_orm(iden = "simulations")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Exercises {
    #[sea_orm(iden = "exercises")]
    Table,
    Id,
    SimulationId,
    Question,
    QuestionType,
    Options,
    CorrectAnswer,
    Points,
    OrderIndex,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ExerciseSubmissions {
    #[sea_orm(iden = "exercise_submissions")]
    Table,
    Id,
    SimulationId,
    StudentId,
    Answers,
    Details,
    TotalScore,
    MaxScore,
    TeacherFeedback,
    IsGraded,
    GradedBy,
    GradedAt,
    SubmittedAt,
}

#[derive(DeriveIden)]
enum Achievements {
    #[sea_orm(iden = "achievements")]
    Table,
    Id,
    Name,
    Description,
    AchievementType,
    Criteria,
    Points,
    BadgeIcon,
    BadgeColor,
    IsActive,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum StudentAchievements {
    #[sea_orm(iden = "student_achievements")]
    Table,
    Id,
    StudentId,
    AchievementId,
    SimulationId,
    PointsEarned,
    EarnedAt,
}
