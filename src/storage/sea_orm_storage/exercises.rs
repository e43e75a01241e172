//! 练习题与练习提交存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, commit, now_ts, to_json_text};
use crate::entity::exercise_submissions::{
    ActiveModel as SubmissionActiveModel, Column as SubmissionColumn,
    Entity as ExerciseSubmissions,
};
use crate::entity::exercises::{ActiveModel, Column, Entity as Exercises};
use crate::entity::simulation_progress::{
    ActiveModel as ProgressActiveModel, Column as ProgressColumn, Entity as SimulationProgresses,
};
use crate::errors::{Result, VLabError};
use crate::models::{
    PaginationInfo,
    activity_logs::entities::ActivityEntry,
    exercises::{
        entities::{Exercise, ExerciseSubmission},
        requests::{CreateExerciseRequest, SubmissionListParams, UpdateExerciseRequest},
        responses::{ExerciseStatistic, SubmissionListResponse},
    },
};
use crate::storage::{GradedSubmission, NewExerciseSubmission};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

/// 未指定分值时每题 1 分
const DEFAULT_POINTS: f64 = 1.0;

impl SeaOrmStorage {
    pub async fn create_exercise_impl(
        &self,
        req: CreateExerciseRequest,
        created_by: Option<i64>,
    ) -> Result<Exercise> {
        let now = now_ts();
        let options = req.options.as_ref().map(to_json_text).transpose()?;

        let model = ActiveModel {
            simulation_id: Set(req.simulation_id),
            question: Set(req.question.trim().to_string()),
            question_type: Set(req.question_type.to_string()),
            options: Set(options),
            correct_answer: Set(req.correct_answer),
            points: Set(req.points.unwrap_or(DEFAULT_POINTS)),
            order_index: Set(req.order_index.unwrap_or(0)),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| VLabError::from_db("创建练习题失败", e))?;
        Ok(result.into_exercise())
    }

    pub async fn get_exercise_by_id_impl(&self, id: i64) -> Result<Option<Exercise>> {
        let result = Exercises::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询练习题失败: {e}")))?;
        Ok(result.map(|m| m.into_exercise()))
    }

    /// 仿真下的练习题（按 order_index）
    pub async fn list_exercises_impl(&self, simulation_id: i64) -> Result<Vec<Exercise>> {
        let exercises = Exercises::find()
            .filter(Column::SimulationId.eq(simulation_id))
            .order_by_asc(Column::OrderIndex)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询练习题失败: {e}")))?;
        Ok(exercises.into_iter().map(|m| m.into_exercise()).collect())
    }

    pub async fn update_exercise_impl(
        &self,
        id: i64,
        update: UpdateExerciseRequest,
    ) -> Result<Option<Exercise>> {
        if self.get_exercise_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };
        if let Some(question) = update.question {
            model.question = Set(question);
        }
        if let Some(question_type) = update.question_type {
            model.question_type = Set(question_type.to_string());
        }
        if let Some(ref options) = update.options {
            model.options = Set(Some(to_json_text(options)?));
        }
        if let Some(answer) = update.correct_answer {
            model.correct_answer = Set(Some(answer));
        }
        if let Some(points) = update.points {
            model.points = Set(points);
        }
        if let Some(order_index) = update.order_index {
            model.order_index = Set(order_index);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| VLabError::from_db("更新练习题失败", e))?;
        Ok(Some(updated.into_exercise()))
    }

    pub async fn delete_exercise_impl(&self, id: i64) -> Result<bool> {
        let result = Exercises::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| VLabError::from_db("删除练习题失败", e))?;
        Ok(result.rows_affected > 0)
    }

    /// 提高仿真最好成绩（不存在进度时创建）
    async fn raise_best_score<C: ConnectionTrait>(
        conn: &C,
        student_id: i64,
        simulation_id: i64,
        score: f64,
        now: i64,
    ) -> Result<()> {
        let existing = SimulationProgresses::find()
            .filter(ProgressColumn::StudentId.eq(student_id))
            .filter(ProgressColumn::SimulationId.eq(simulation_id))
            .one(conn)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询仿真进度失败: {e}")))?;

        match existing {
            Some(progress) => {
                ProgressActiveModel {
                    id: Set(progress.id),
                    best_score: Set(progress.best_score.max(score)),
                    last_accessed: Set(now),
                    ..Default::default()
                }
                .update(conn)
                .await
                .map_err(|e| VLabError::from_db("更新最好成绩失败", e))?;
            }
            None => {
                ProgressActiveModel {
                    student_id: Set(student_id),
                    simulation_id: Set(simulation_id),
                    progress_percentage: Set(0.0),
                    best_score: Set(score),
                    completed: Set(false),
                    time_spent_minutes: Set(0),
                    attempts: Set(1),
                    last_accessed: Set(now),
                    ..Default::default()
                }
                .insert(conn)
                .await
                .map_err(|e| VLabError::from_db("创建仿真进度失败", e))?;
            }
        }
        Ok(())
    }

    /// 保存自动批改的提交，同时更新仿真最好成绩
    pub async fn insert_exercise_submission_impl(
        &self,
        submission: NewExerciseSubmission,
    ) -> Result<ExerciseSubmission> {
        let now = now_ts();
        let percentage = if submission.max_score > 0.0 {
            submission.total_score / submission.max_score * 100.0
        } else {
            0.0
        };

        let txn = self.begin().await?;
        let saved = SubmissionActiveModel {
            simulation_id: Set(submission.simulation_id),
            student_id: Set(submission.student_id),
            answers: Set(to_json_text(&submission.answers)?),
            details: Set(to_json_text(&submission.details)?),
            total_score: Set(submission.total_score),
            max_score: Set(submission.max_score),
            teacher_feedback: Set(None),
            is_graded: Set(false),
            graded_by: Set(None),
            graded_at: Set(None),
            submitted_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| VLabError::from_db("保存练习提交失败", e))?;

        Self::raise_best_score(
            &txn,
            submission.student_id,
            submission.simulation_id,
            percentage,
            now,
        )
        .await?;
        commit(txn).await?;

        Ok(saved.into_submission())
    }

    pub async fn get_exercise_submission_impl(&self, id: i64) -> Result<Option<ExerciseSubmission>> {
        let result = ExerciseSubmissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询练习提交失败: {e}")))?;
        Ok(result.map(|m| m.into_submission()))
    }

    /// 分页列出练习提交
    pub async fn list_exercise_submissions_impl(
        &self,
        params: SubmissionListParams,
    ) -> Result<SubmissionListResponse> {
        let (page, size) = params.pagination.normalized();

        let mut select = ExerciseSubmissions::find();
        if let Some(simulation_id) = params.simulation_id {
            select = select.filter(SubmissionColumn::SimulationId.eq(simulation_id));
        }
        if let Some(student_id) = params.student_id {
            select = select.filter(SubmissionColumn::StudentId.eq(student_id));
        }
        select = select
            .order_by_desc(SubmissionColumn::SubmittedAt)
            .order_by_desc(SubmissionColumn::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| VLabError::database_operation(format!("查询提交总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| VLabError::database_operation(format!("查询提交页数失败: {e}")))?;
        let submissions = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(SubmissionListResponse {
            items: submissions
                .into_iter()
                .map(|m| m.into_submission())
                .collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 教师批改，与活动日志同一事务
    pub async fn grade_exercise_submission_impl(
        &self,
        id: i64,
        graded: GradedSubmission,
        log: ActivityEntry,
    ) -> Result<Option<ExerciseSubmission>> {
        let txn = self.begin().await?;

        let exists = ExerciseSubmissions::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询练习提交失败: {e}")))?;
        if exists.is_none() {
            return Ok(None);
        }

        let graded_at = if graded.is_draft {
            None
        } else {
            Some(now_ts())
        };
        let updated = SubmissionActiveModel {
            id: Set(id),
            details: Set(to_json_text(&graded.details)?),
            total_score: Set(graded.total_score),
            teacher_feedback: Set(graded.teacher_feedback),
            is_graded: Set(!graded.is_draft),
            graded_by: Set(Some(graded.graded_by)),
            graded_at: Set(graded_at),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(|e| VLabError::from_db("批改练习提交失败", e))?;

        Self::write_activity(&txn, log).await?;
        commit(txn).await?;

        Ok(Some(updated.into_submission()))
    }

    /// 每道题的作答次数与正确率
    pub async fn exercise_statistics_impl(
        &self,
        simulation_id: i64,
    ) -> Result<Vec<ExerciseStatistic>> {
        let exercises = self.list_exercises_impl(simulation_id).await?;
        let submissions = ExerciseSubmissions::find()
            .filter(SubmissionColumn::SimulationId.eq(simulation_id))
            .all(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询练习提交失败: {e}")))?;

        let mut counts: HashMap<String, (i64, i64)> = HashMap::new();
        for submission in submissions {
            for (exercise_id, detail) in submission.into_submission().details {
                let entry = counts.entry(exercise_id).or_default();
                entry.0 += 1;
                if detail.is_correct {
                    entry.1 += 1;
                }
            }
        }

        Ok(exercises
            .into_iter()
            .map(|exercise| {
                let (attempts, correct) = counts
                    .get(&exercise.id.to_string())
                    .copied()
                    .unwrap_or_default();
                let correct_rate = if attempts > 0 {
                    correct as f64 / attempts as f64 * 100.0
                } else {
                    0.0
                };
                ExerciseStatistic {
                    exercise_id: exercise.id,
                    question: exercise.question,
                    attempts,
                    correct,
                    correct_rate,
                }
            })
            .collect())
    }
}
