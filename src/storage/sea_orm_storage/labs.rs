//! 实验、评分标准与实验会话存储操作

use super::{SeaOrmStorage, commit, now_ts, to_json_text};
use crate::entity::courses::{Column as CourseColumn, Entity as Courses};
use crate::entity::lab_rubric_criteria::{
    ActiveModel as CriterionActiveModel, Column as CriterionColumn, Entity as LabRubricCriteria,
};
use crate::entity::lab_sessions::{
    ActiveModel as SessionActiveModel, Column as SessionColumn, Entity as LabSessions,
};
use crate::entity::lab_submissions::{
    ActiveModel as SubmissionActiveModel, Column as SubmissionColumn, Entity as LabSubmissions,
};
use crate::entity::labs::{ActiveModel, Column, Entity as Labs};
use crate::entity::student_progress::{
    ActiveModel as ProgressActiveModel, Column as ProgressColumn, Entity as StudentProgress,
};
use crate::errors::{Result, VLabError};
use crate::models::labs::{
    entities::{Lab, LabSession, LabSessionStatus, RubricCriterion},
    requests::{CreateLabRequest, UpdateLabRequest},
    responses::{AttemptsExceeded, LabDetail},
};
use crate::storage::{LabStartOutcome, LabSubmitOutcome, LabVisibility};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
    sea_query::{Expr, ExprTrait, OnConflict},
};

/// 会话时长（分钟，四舍五入）
pub(crate) fn session_minutes(start: i64, end: i64) -> i64 {
    (Ord::max(end - start, 0) as f64 / 60.0).round() as i64
}

impl SeaOrmStorage {
    /// 创建实验及评分标准（单事务）
    pub async fn create_lab_impl(
        &self,
        req: CreateLabRequest,
        created_by: Option<i64>,
    ) -> Result<LabDetail> {
        let now = now_ts();
        let txn = self.begin().await?;

        let lab = ActiveModel {
            course_id: Set(req.course_id),
            simulation_id: Set(req.simulation_id),
            title: Set(req.title.trim().to_string()),
            description: Set(req.description),
            instructions: Set(req.instructions),
            duration_minutes: Set(req.duration_minutes),
            max_attempts: Set(req.max_attempts),
            is_published: Set(req.is_published),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| VLabError::from_db("创建实验失败", e))?;

        let mut criteria = Vec::with_capacity(req.criteria.len());
        for (idx, input) in req.criteria.into_iter().enumerate() {
            let weight = input.weight();
            let model = CriterionActiveModel {
                lab_id: Set(lab.id),
                name: Set(input.name.trim().to_string()),
                description: Set(input.description),
                max_points: Set(input.max_points),
                weight: Set(weight),
                order_index: Set(idx as i32),
                response_key: Set(input.response_key),
                expected_value: Set(input.expected_value),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| VLabError::from_db("创建评分标准失败", e))?;
            criteria.push(model.into_criterion());
        }

        commit(txn).await?;

        Ok(LabDetail {
            lab: lab.into_lab(),
            criteria,
        })
    }

    pub async fn get_lab_by_id_impl(&self, id: i64) -> Result<Option<Lab>> {
        let result = Labs::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询实验失败: {e}")))?;
        Ok(result.map(|m| m.into_lab()))
    }

    pub(crate) async fn criteria_for<C: ConnectionTrait>(
        conn: &C,
        lab_id: i64,
    ) -> Result<Vec<RubricCriterion>> {
        let criteria = LabRubricCriteria::find()
            .filter(CriterionColumn::LabId.eq(lab_id))
            .order_by_asc(CriterionColumn::OrderIndex)
            .order_by_asc(CriterionColumn::Id)
            .all(conn)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询评分标准失败: {e}")))?;
        Ok(criteria.into_iter().map(|m| m.into_criterion()).collect())
    }

    pub async fn list_lab_criteria_impl(&self, lab_id: i64) -> Result<Vec<RubricCriterion>> {
        Self::criteria_for(&self.db, lab_id).await
    }

    pub async fn get_lab_detail_impl(&self, id: i64) -> Result<Option<LabDetail>> {
        let Some(lab) = self.get_lab_by_id_impl(id).await? else {
            return Ok(None);
        };
        let criteria = Self::criteria_for(&self.db, id).await?;
        Ok(Some(LabDetail { lab, criteria }))
    }

    /// 列出实验；学生只能看到在读课程中已发布的实验
    pub async fn list_labs_impl(
        &self,
        course_id: Option<i64>,
        visibility: LabVisibility,
    ) -> Result<Vec<Lab>> {
        let mut select = Labs::find();
        if let Some(course_id) = course_id {
            select = select.filter(Column::CourseId.eq(course_id));
        }
        if let LabVisibility::PublishedForStudent(student_id) = visibility {
            select = select
                .filter(Column::IsPublished.eq(true))
                .filter(Self::enrolled_course_condition(student_id, Column::CourseId));
        }

        let labs = select
            .order_by_asc(Column::CourseId)
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询实验列表失败: {e}")))?;
        Ok(labs.into_iter().map(|m| m.into_lab()).collect())
    }

    pub async fn update_lab_impl(&self, id: i64, update: UpdateLabRequest) -> Result<Option<Lab>> {
        if self.get_lab_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };
        if let Some(simulation_id) = update.simulation_id {
            model.simulation_id = Set(Some(simulation_id));
        }
        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(instructions) = update.instructions {
            model.instructions = Set(Some(instructions));
        }
        if let Some(duration) = update.duration_minutes {
            model.duration_minutes = Set(Some(duration));
        }
        if let Some(max_attempts) = update.max_attempts {
            model.max_attempts = Set(Some(max_attempts));
        }
        if let Some(is_published) = update.is_published {
            model.is_published = Set(is_published);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| VLabError::from_db("更新实验失败", e))?;
        Ok(Some(updated.into_lab()))
    }

    pub async fn delete_lab_impl(&self, id: i64) -> Result<bool> {
        let result = Labs::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| VLabError::from_db("删除实验失败", e))?;
        Ok(result.rows_affected > 0)
    }

    /// 开始或恢复实验会话
    pub async fn start_lab_impl(&self, lab_id: i64, student_id: i64) -> Result<LabStartOutcome> {
        let txn = self.begin().await?;

        let lab = Labs::find_by_id(lab_id)
            .filter(Column::IsPublished.eq(true))
            .one(&txn)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询实验失败: {e}")))?;
        let Some(lab) = lab else {
            return Ok(LabStartOutcome::LabNotFound);
        };

        let enrolled = Courses::find()
            .filter(CourseColumn::Id.eq(lab.course_id))
            .filter(Self::enrolled_course_condition(student_id, CourseColumn::Id))
            .count(&txn)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询选课失败: {e}")))?;
        if enrolled == 0 {
            return Ok(LabStartOutcome::NotEnrolled);
        }

        let criteria = Self::criteria_for(&txn, lab.id).await?;

        let open = LabSessions::find()
            .filter(SessionColumn::LabId.eq(lab_id))
            .filter(SessionColumn::StudentId.eq(student_id))
            .filter(SessionColumn::Status.eq(LabSessionStatus::InProgress.as_str()))
            .order_by_desc(SessionColumn::StartTime)
            .one(&txn)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询实验会话失败: {e}")))?;
        if let Some(session) = open {
            commit(txn).await?;
            return Ok(LabStartOutcome::Started {
                session: session.into_lab_session(),
                lab: lab.into_lab(),
                criteria,
                is_resuming: true,
            });
        }

        if let Some(max_attempts) = lab.max_attempts {
            let attempts_used = LabSessions::find()
                .filter(SessionColumn::LabId.eq(lab_id))
                .filter(SessionColumn::StudentId.eq(student_id))
                .count(&txn)
                .await
                .map_err(|e| VLabError::database_operation(format!("统计实验尝试失败: {e}")))?
                as i64;
            if attempts_used >= i64::from(max_attempts) {
                return Ok(LabStartOutcome::AttemptsExceeded(AttemptsExceeded {
                    attempts_used,
                    max_attempts: i64::from(max_attempts),
                }));
            }
        }

        let now = now_ts();
        let session = SessionActiveModel {
            lab_id: Set(lab_id),
            student_id: Set(student_id),
            status: Set(LabSessionStatus::InProgress.to_string()),
            start_time: Set(now),
            end_time: Set(None),
            duration_minutes: Set(None),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| VLabError::from_db("创建实验会话失败", e))?;

        commit(txn).await?;

        Ok(LabStartOutcome::Started {
            session: session.into_lab_session(),
            lab: lab.into_lab(),
            criteria,
            is_resuming: false,
        })
    }

    async fn owned_session<C: ConnectionTrait>(
        conn: &C,
        lab_id: i64,
        student_id: i64,
        session_id: i64,
    ) -> Result<Option<crate::entity::lab_sessions::Model>> {
        LabSessions::find_by_id(session_id)
            .filter(SessionColumn::LabId.eq(lab_id))
            .filter(SessionColumn::StudentId.eq(student_id))
            .one(conn)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询实验会话失败: {e}")))
    }

    async fn submission_by_session<C: ConnectionTrait>(
        conn: &C,
        session_id: i64,
    ) -> Result<crate::entity::lab_submissions::Model> {
        LabSubmissions::find()
            .filter(SubmissionColumn::SessionId.eq(session_id))
            .one(conn)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询实验提交失败: {e}")))?
            .ok_or_else(|| VLabError::database_operation("保存实验提交后未找到记录"))
    }

    /// 自动保存：只写 autosave_data，不改变会话状态
    pub async fn autosave_lab_impl(
        &self,
        lab_id: i64,
        student_id: i64,
        session_id: i64,
        responses: serde_json::Value,
    ) -> Result<LabSubmitOutcome> {
        let Some(session) = Self::owned_session(&self.db, lab_id, student_id, session_id).await?
        else {
            return Ok(LabSubmitOutcome::SessionNotFound);
        };

        let now = now_ts();
        let data = to_json_text(&responses)?;
        let model = SubmissionActiveModel {
            session_id: Set(session_id),
            lab_id: Set(lab_id),
            student_id: Set(student_id),
            responses: Set(None),
            autosave_data: Set(Some(data)),
            submitted_at: Set(None),
            updated_at: Set(now),
            ..Default::default()
        };

        LabSubmissions::insert(model)
            .on_conflict(
                OnConflict::column(SubmissionColumn::SessionId)
                    .update_columns([SubmissionColumn::AutosaveData, SubmissionColumn::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| VLabError::from_db("自动保存失败", e))?;

        let submission = Self::submission_by_session(&self.db, session_id).await?;
        Ok(LabSubmitOutcome::Saved {
            submission: submission.into_submission(),
            session: session.into_lab_session(),
        })
    }

    /// 正式提交：写入作答、结束会话、累计课程进度
    pub async fn submit_lab_impl(
        &self,
        lab_id: i64,
        student_id: i64,
        session_id: i64,
        responses: serde_json::Value,
    ) -> Result<LabSubmitOutcome> {
        let txn = self.begin().await?;

        let Some(session) = Self::owned_session(&txn, lab_id, student_id, session_id).await? else {
            return Ok(LabSubmitOutcome::SessionNotFound);
        };
        if session.status != LabSessionStatus::InProgress.as_str() {
            return Ok(LabSubmitOutcome::NotInProgress(session.into_lab_session()));
        }
        let lab = Labs::find_by_id(lab_id)
            .one(&txn)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询实验失败: {e}")))?
            .ok_or_else(|| VLabError::not_found(format!("实验 {lab_id} 不存在")))?;

        let now = now_ts();
        let model = SubmissionActiveModel {
            session_id: Set(session_id),
            lab_id: Set(lab_id),
            student_id: Set(student_id),
            responses: Set(Some(to_json_text(&responses)?)),
            autosave_data: Set(None),
            submitted_at: Set(Some(now)),
            updated_at: Set(now),
            ..Default::default()
        };
        LabSubmissions::insert(model)
            .on_conflict(
                OnConflict::column(SubmissionColumn::SessionId)
                    .update_columns([
                        SubmissionColumn::Responses,
                        SubmissionColumn::SubmittedAt,
                        SubmissionColumn::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await
            .map_err(|e| VLabError::from_db("保存实验提交失败", e))?;

        let session = SessionActiveModel {
            id: Set(session.id),
            status: Set(LabSessionStatus::Submitted.to_string()),
            end_time: Set(Some(now)),
            duration_minutes: Set(Some(session_minutes(session.start_time, now))),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(|e| VLabError::from_db("更新实验会话失败", e))?;

        Self::bump_student_progress(&txn, student_id, lab.course_id, 1, 0, now).await?;

        let submission = Self::submission_by_session(&txn, session_id).await?;
        commit(txn).await?;

        Ok(LabSubmitOutcome::Saved {
            submission: submission.into_submission(),
            session: session.into_lab_session(),
        })
    }

    /// 累加课程进度（完成实验数、用时）
    async fn bump_student_progress<C: ConnectionTrait>(
        conn: &C,
        student_id: i64,
        course_id: i64,
        completed_labs: i32,
        minutes: i64,
        now: i64,
    ) -> Result<()> {
        let model = ProgressActiveModel {
            student_id: Set(student_id),
            course_id: Set(course_id),
            completed_labs: Set(completed_labs),
            time_spent_minutes: Set(minutes),
            last_activity: Set(now),
            ..Default::default()
        };

        StudentProgress::insert(model)
            .on_conflict(
                OnConflict::columns([ProgressColumn::StudentId, ProgressColumn::CourseId])
                    .value(
                        ProgressColumn::CompletedLabs,
                        Expr::col((StudentProgress, ProgressColumn::CompletedLabs))
                            .add(completed_labs),
                    )
                    .value(
                        ProgressColumn::TimeSpentMinutes,
                        Expr::col((StudentProgress, ProgressColumn::TimeSpentMinutes)).add(minutes),
                    )
                    .value(ProgressColumn::LastActivity, now)
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await
            .map_err(|e| VLabError::from_db("更新课程进度失败", e))?;
        Ok(())
    }

    /// 结束会话；已结束的会话原样返回
    pub async fn stop_lab_impl(
        &self,
        lab_id: i64,
        student_id: i64,
        session_id: i64,
    ) -> Result<Option<LabSession>> {
        let txn = self.begin().await?;

        let Some(session) = Self::owned_session(&txn, lab_id, student_id, session_id).await? else {
            return Ok(None);
        };
        if session.end_time.is_some() {
            return Ok(Some(session.into_lab_session()));
        }

        let lab = Labs::find_by_id(lab_id)
            .one(&txn)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询实验失败: {e}")))?
            .ok_or_else(|| VLabError::not_found(format!("实验 {lab_id} 不存在")))?;

        let now = now_ts();
        let minutes = session_minutes(session.start_time, now);
        let mut model = SessionActiveModel {
            id: Set(session.id),
            end_time: Set(Some(now)),
            duration_minutes: Set(Some(minutes)),
            ..Default::default()
        };
        if session.status == LabSessionStatus::InProgress.as_str() {
            model.status = Set(LabSessionStatus::Abandoned.to_string());
        }
        let stopped = model
            .update(&txn)
            .await
            .map_err(|e| VLabError::from_db("结束实验会话失败", e))?;

        Self::bump_student_progress(&txn, student_id, lab.course_id, 0, minutes, now).await?;
        commit(txn).await?;

        Ok(Some(stopped.into_lab_session()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_minutes_rounds() {
        assert_eq!(session_minutes(0, 89), 1);
        assert_eq!(session_minutes(0, 90), 2);
        assert_eq!(session_minutes(0, 29), 0);
        assert_eq!(session_minutes(100, 50), 0);
    }
}
