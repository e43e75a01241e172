use sea_orm_migration::prelude::*;

use crate::{pk_column, plain_index, unique_index};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 课程表
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(pk_column(Courses::Id))
                    .col(ColumnDef::new(Courses::Code).string().not_null().unique_key())
                    .col(ColumnDef::new(Courses::Title).string().not_null())
                    .col(ColumnDef::new(Courses::Description).text().null())
                    .col(ColumnDef::new(Courses::Subject).string().null())
                    .col(ColumnDef::new(Courses::GradeLevel).string().null())
                    .col(ColumnDef::new(Courses::SchoolId).big_integer().null())
                    .col(ColumnDef::new(Courses::InstructorId).big_integer().null())
                    .col(ColumnDef::new(Courses::Status).string().not_null())
                    .col(ColumnDef::new(Courses::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Courses::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Courses::Table, Courses::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Courses::Table, Courses::InstructorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 课程时间表
        manager
            .create_table(
                Table::create()
                    .table(CourseSchedules::Table)
                    .if_not_exists()
                    .col(pk_column(CourseSchedules::Id))
                    .col(
                        ColumnDef::new(CourseSchedules::CourseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CourseSchedules::DayOfWeek)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CourseSchedules::StartTime).string().not_null())
                    .col(ColumnDef::new(CourseSchedules::EndTime).string().not_null())
                    .col(ColumnDef::new(CourseSchedules::Room).string().null())
                    .col(
                        ColumnDef::new(CourseSchedules::InstructorId)
                            .big_integer()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CourseSchedules::Table, CourseSchedules::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CourseSchedules::Table, CourseSchedules::InstructorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 选课表
        manager
            .create_table(
                Table::create()
                    .table(CourseEnrollments::Table)
                    .if_not_exists()
                    .col(pk_column(CourseEnrollments::Id))
                    .col(
                        ColumnDef::new(CourseEnrollments::CourseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CourseEnrollments::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CourseEnrollments::Status).string().not_null())
                    .col(
                        ColumnDef::new(CourseEnrollments::EnrolledAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CourseEnrollments::Table, CourseEnrollments::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CourseEnrollments::Table, CourseEnrollments::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 仿真实验表
        manager
            .create_table(
                Table::create()
                    .table(Simulations::Table)
                    .if_not_exists()
                    .col(pk_column(Simulations::Id))
                    .col(
                        ColumnDef::new(Simulations::Slug)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Simulations::Title).string().not_null())
                    .col(ColumnDef::new(Simulations::Description).text().null())
                    .col(ColumnDef::new(Simulations::Subject).string().null())
                    .col(ColumnDef::new(Simulations::GradeLevel).string().null())
                    .col(ColumnDef::new(Simulations::SimulationUrl).string().null())
                    .col(ColumnDef::new(Simulations::ThumbnailUrl).string().null())
                    .col(
                        ColumnDef::new(Simulations::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Simulations::AllowGuest)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Simulations::CreatedBy).big_integer().null())
                    .col(
                        ColumnDef::new(Simulations::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Simulations::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Simulations::Table, Simulations::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 学生仿真进度表
        manager
            .create_table(
                Table::create()
                    .table(SimulationProgress::Table)
                    .if_not_exists()
                    .col(pk_column(SimulationProgress::Id))
                    .col(
                        ColumnDef::new(SimulationProgress::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SimulationProgress::SimulationId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SimulationProgress::ProgressPercentage)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(SimulationProgress::BestScore)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(SimulationProgress::Completed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(SimulationProgress::TimeSpentMinutes)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SimulationProgress::Attempts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SimulationProgress::LastAccessed)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SimulationProgress::Table, SimulationProgress::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SimulationProgress::Table, SimulationProgress::SimulationId)
                            .to(Simulations::Table, Simulations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 实验表
        manager
            .create_table(
                Table::create()
                    .table(Labs::Table)
                    .if_not_exists()
                    .col(pk_column(Labs::Id))
                    .col(ColumnDef::new(Labs::CourseId).big_integer().not_null())
                    .col(ColumnDef::new(Labs::SimulationId).big_integer().null())
                    .col(ColumnDef::new(Labs::Title).string().not_null())
                    .col(ColumnDef::new(Labs::Description).text().null())
                    .col(ColumnDef::new(Labs::Instructions).text().null())
                    .col(ColumnDef::new(Labs::DurationMinutes).integer().null())
                    .col(ColumnDef::new(Labs::MaxAttempts).integer().null())
                    .col(
                        ColumnDef::new(Labs::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Labs::CreatedBy).big_integer().null())
                    .col(ColumnDef::new(Labs::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Labs::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Labs::Table, Labs::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Labs::Table, Labs::SimulationId)
                            .to(Simulations::Table, Simulations::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 评分标准表
        manager
            .create_table(
                Table::create()
                    .table(LabRubricCriteria::Table)
                    .if_not_exists()
                    .col(pk_column(LabRubricCriteria::Id))
                    .col(
                        ColumnDef::new(LabRubricCriteria::LabId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LabRubricCriteria::Name).string().not_null())
                    .col(ColumnDef::new(LabRubricCriteria::Description).text().null())
                    .col(
                        ColumnDef::new(LabRubricCriteria::MaxPoints)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LabRubricCriteria::Weight)
                            .double()
                            .not_null()
                            .default(1.0),
                    )
                    .col(
                        ColumnDef::new(LabRubricCriteria::OrderIndex)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(LabRubricCriteria::ResponseKey).string().null())
                    .col(
                        ColumnDef::new(LabRubricCriteria::ExpectedValue)
                            .string()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(LabRubricCriteria::Table, LabRubricCriteria::LabId)
                            .to(Labs::Table, Labs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 实验会话表
        manager
            .create_table(
                Table::create()
                    .table(LabSessions::Table)
                    .if_not_exists()
                    .col(pk_column(LabSessions::Id))
                    .col(ColumnDef::new(LabSessions::LabId).big_integer().not_null())
                    .col(
                        ColumnDef::new(LabSessions::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LabSessions::Status).string().not_null())
                    .col(
                        ColumnDef::new(LabSessions::StartTime)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LabSessions::EndTime).big_integer().null())
                    .col(
                        ColumnDef::new(LabSessions::DurationMinutes)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(LabSessions::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(LabSessions::Table, LabSessions::LabId)
                            .to(Labs::Table, Labs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(LabSessions::Table, LabSessions::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 实验提交表
        manager
            .create_table(
                Table::create()
                    .table(LabSubmissions::Table)
                    .if_not_exists()
                    .col(pk_column(LabSubmissions::Id))
                    .col(
                        ColumnDef::new(LabSubmissions::SessionId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(LabSubmissions::LabId).big_integer().not_null())
                    .col(
                        ColumnDef::new(LabSubmissions::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LabSubmissions::Responses).text().null())
                    .col(ColumnDef::new(LabSubmissions::AutosaveData).text().null())
                    .col(
                        ColumnDef::new(LabSubmissions::SubmittedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(LabSubmissions::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(LabSubmissions::Table, LabSubmissions::SessionId)
                            .to(LabSessions::Table, LabSessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 实验成绩表
        manager
            .create_table(
                Table::create()
                    .table(LabScores::Table)
                    .if_not_exists()
                    .col(pk_column(LabScores::Id))
                    .col(ColumnDef::new(LabScores::LabId).big_integer().not_null())
                    .col(ColumnDef::new(LabScores::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(LabScores::SubmissionId).big_integer().null())
                    .col(ColumnDef::new(LabScores::AutoScore).double().null())
                    .col(ColumnDef::new(LabScores::ManualScore).double().null())
                    .col(ColumnDef::new(LabScores::FinalScore).double().null())
                    .col(
                        ColumnDef::new(LabScores::MaxScore)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(LabScores::RubricBreakdown).text().null())
                    .col(ColumnDef::new(LabScores::TeacherComments).text().null())
                    .col(ColumnDef::new(LabScores::GradedBy).big_integer().null())
                    .col(ColumnDef::new(LabScores::GradedAt).big_integer().null())
                    .col(ColumnDef::new(LabScores::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(LabScores::Table, LabScores::LabId)
                            .to(Labs::Table, Labs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(LabScores::Table, LabScores::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 评分批注表
        manager
            .create_table(
                Table::create()
                    .table(LabScoreAnnotations::Table)
                    .if_not_exists()
                    .col(pk_column(LabScoreAnnotations::Id))
                    .col(
                        ColumnDef::new(LabScoreAnnotations::ScoreId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LabScoreAnnotations::CriterionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LabScoreAnnotations::PointsAwarded)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LabScoreAnnotations::TeacherComment)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(LabScoreAnnotations::AnnotationType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LabScoreAnnotations::CreatedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(LabScoreAnnotations::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(LabScoreAnnotations::Table, LabScoreAnnotations::ScoreId)
                            .to(LabScores::Table, LabScores::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                LabScoreAnnotations::Table,
                                LabScoreAnnotations::CriterionId,
                            )
                            .to(LabRubricCriteria::Table, LabRubricCriteria::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 学生课程进度表
        manager
            .create_table(
                Table::create()
                    .table(StudentProgress::Table)
                    .if_not_exists()
                    .col(pk_column(StudentProgress::Id))
                    .col(
                        ColumnDef::new(StudentProgress::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentProgress::CourseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentProgress::CompletedLabs)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(StudentProgress::TimeSpentMinutes)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(StudentProgress::LastActivity)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentProgress::Table, StudentProgress::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentProgress::Table, StudentProgress::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 索引
        manager
            .create_index(unique_index(
                "idx_course_enrollments_pair",
                CourseEnrollments::Table,
                vec![CourseEnrollments::CourseId, CourseEnrollments::StudentId],
            ))
            .await?;
        manager
            .create_index(unique_index(
                "idx_simulation_progress_pair",
                SimulationProgress::Table,
                vec![SimulationProgress::StudentId, SimulationProgress::SimulationId],
            ))
            .await?;
        manager
            .create_index(unique_index(
                "idx_lab_scores_pair",
                LabScores::Table,
                vec![LabScores::StudentId, LabScores::LabId],
            ))
            .await?;
        manager
            .create_index(unique_index(
                "idx_lab_score_annotations_pair",
                LabScoreAnnotations::Table,
                vec![LabScoreAnnotations::ScoreId, LabScoreAnnotations::CriterionId],
            ))
            .await?;
        manager
            .create_index(unique_index(
                "idx_student_progress_pair",
                StudentProgress::Table,
                vec![StudentProgress::StudentId, StudentProgress::CourseId],
            ))
            .await?;
        manager
            .create_index(plain_index(
                "idx_labs_course_id",
                Labs::Table,
                Labs::CourseId,
            ))
            .await?;
        manager
            .create_index(plain_index(
                "idx_lab_sessions_lab_id",
                LabSessions::Table,
                LabSessions::LabId,
            ))
            .await?;
        manager
            .create_index(plain_index(
                "idx_course_schedules_course_id",
                CourseSchedules::Table,
                CourseSchedules::CourseId,
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StudentProgress::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LabScoreAnnotations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LabScores::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LabSubmissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LabSessions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LabRubricCriteria::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Labs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SimulationProgress::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Simulations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CourseEnrollments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CourseSchedules::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Schools {
    #[sea_orm(iden = "schools")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Courses {
    #[sea_orm(iden = "courses")]
    Table,
    Id,
    Code,
    Title,
    Description,
    Subject,
    GradeLevel,
    SchoolId,
    InstructorId,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CourseSchedules {
    #[sea_orm(iden = "course_schedules")]
    Table,
    Id,
    CourseId,
    DayOfWeek,
    StartTime,
    EndTime,
    Room,
    InstructorId,
}

#[derive(DeriveIden)]
enum CourseEnrollments {
    #[sea_orm(iden = "course_enrollments")]
    Table,
    Id,
    CourseId,
    StudentId,
    Status,
    EnrolledAt,
}

#[derive(DeriveIden)]
enum Simulations {
    #[sea_orm(iden = "simulations")]
    Table,
    Id,
    Slug,
    Title,
    Description,
    Subject,
    GradeLevel,
    SimulationUrl,
    ThumbnailUrl,
    IsPublished,
    AllowGuest,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SimulationProgress {
    #[sea_orm(iden = "simulation_progress")]
    Table,
    Id,
    StudentId,
    SimulationId,
    ProgressPercentage,
    BestScore,
    Completed,
    TimeSpentMinutes,
    Attempts,
    LastAccessed,
}

#[derive(DeriveIden)]
enum Labs {
    #[sea_orm(iden = "labs")]
    Table,
    Id,
    CourseId,
    SimulationId,
    Title,
    Description,
    Instructions,
    DurationMinutes,
    MaxAttempts,
    IsPublished,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum LabRubricCriteria {
    #[sea_orm(iden = "lab_rubric_criteria")]
    Table,
    Id,
    LabId,
    Name,
    Description,
    MaxPoints,
    Weight,
    OrderIndex,
    ResponseKey,
    ExpectedValue,
}

#[derive(DeriveIden)]
enum LabSessions {
    #[sea_orm(iden = "lab_sessions")]
    Table,
    Id,
    LabId,
    StudentId,
    Status,
    StartTime,
    EndTime,
    DurationMinutes,
    CreatedAt,
}

#[derive(DeriveIden)]
enum LabSubmissions {
    #[sea_orm(iden = "lab_submissions")]
    Table,
    Id,
    SessionId,
    LabId,
    StudentId,
    Responses,
    AutosaveData,
    SubmittedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum LabScores {
    #[sea_orm(iden = "lab_scores")]
    Table,
    Id,
    LabId,
    StudentId,
    SubmissionId,
    AutoScore,
    ManualScore,
    FinalScore,
    MaxScore,
    RubricBreakdown,
    TeacherComments,
    GradedBy,
    GradedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum LabScoreAnnotations {
    #[sea_orm(iden = "lab_score_annotations")]
    Table,
    Id,
    ScoreId,
    CriterionId,
    PointsAwarded,
    TeacherComment,
    AnnotationType,
    CreatedBy,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum StudentProgress {
    #[sea_orm(iden = "student_progress")]
    Table,
    Id,
    StudentId,
    CourseId,
    CompletedLabs,
    TimeSpentMinutes,
    LastActivity,
}
