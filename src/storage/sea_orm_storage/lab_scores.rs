//! 实验成绩与批注存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, commit, now_ts, to_json_text};
use crate::entity::course_enrollments::{Column as EnrollmentColumn, Entity as CourseEnrollments};
use crate::entity::courses::Entity as Courses;
use crate::entity::lab_rubric_criteria::{Column as CriterionColumn, Entity as LabRubricCriteria};
use crate::entity::lab_score_annotations::{
    ActiveModel as AnnotationActiveModel, Column as AnnotationColumn,
    Entity as LabScoreAnnotations,
};
use crate::entity::lab_scores::{ActiveModel, Column, Entity as LabScores, Model as ScoreModel};
use crate::entity::lab_submissions::{Column as SubmissionColumn, Entity as LabSubmissions};
use crate::entity::labs::Entity as Labs;
use crate::entity::parse_json;
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{Result, VLabError};
use crate::models::activity_logs::entities::ActivityEntry;
use crate::models::courses::entities::EnrollmentStatus;
use crate::models::labs::{
    entities::{LabScore, LabScoreWithStudent, RubricCriterion, ScoreAnnotation},
    requests::{AnnotateRequest, ManualScoreRequest, ScoreLabRequest},
};
use crate::services::labs::scoring;
use crate::storage::{AnnotateOutcome, LabScoreOutcome, ScoreActor};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::OnConflict,
};

impl SeaOrmStorage {
    async fn score_row<C: ConnectionTrait>(
        conn: &C,
        lab_id: i64,
        student_id: i64,
    ) -> Result<Option<ScoreModel>> {
        LabScores::find()
            .filter(Column::LabId.eq(lab_id))
            .filter(Column::StudentId.eq(student_id))
            .one(conn)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询实验成绩失败: {e}")))
    }

    /// 自动评分并写入成绩
    pub async fn score_lab_impl(
        &self,
        lab_id: i64,
        request: ScoreLabRequest,
        actor: ScoreActor,
        log: ActivityEntry,
    ) -> Result<LabScoreOutcome> {
        let txn = self.begin().await?;

        let Some(lab) = Labs::find_by_id(lab_id)
            .one(&txn)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询实验失败: {e}")))?
        else {
            return Ok(LabScoreOutcome::LabNotFound);
        };

        if !actor.can_grade_all {
            let course = Courses::find_by_id(lab.course_id)
                .one(&txn)
                .await
                .map_err(|e| VLabError::database_operation(format!("查询课程失败: {e}")))?;
            let is_instructor = course.is_some_and(|c| c.instructor_id == Some(actor.user_id));
            if !is_instructor {
                return Ok(LabScoreOutcome::Forbidden);
            }
        }

        let mut select = LabSubmissions::find()
            .filter(SubmissionColumn::LabId.eq(lab_id))
            .filter(SubmissionColumn::StudentId.eq(request.student_id));
        select = match request.submission_id {
            Some(id) => select.filter(SubmissionColumn::Id.eq(id)),
            None => select
                .filter(SubmissionColumn::SubmittedAt.is_not_null())
                .order_by_desc(SubmissionColumn::SubmittedAt)
                .order_by_desc(SubmissionColumn::Id),
        };
        let Some(submission) = select
            .one(&txn)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询实验提交失败: {e}")))?
        else {
            return Ok(LabScoreOutcome::SubmissionNotFound);
        };

        let criteria = Self::criteria_for(&txn, lab_id).await?;
        let responses = parse_json(submission.responses.as_deref())
            .or_else(|| parse_json(submission.autosave_data.as_deref()))
            .unwrap_or(serde_json::Value::Null);
        let computed = scoring::auto_score(&criteria, &responses);

        let now = now_ts();
        let existing = Self::score_row(&txn, lab_id, request.student_id).await?;
        let manual = existing.as_ref().and_then(|s| s.manual_score);
        let breakdown = to_json_text(&computed.breakdown)?;

        let model = ActiveModel {
            lab_id: Set(lab_id),
            student_id: Set(request.student_id),
            submission_id: Set(Some(submission.id)),
            auto_score: Set(Some(computed.auto_score)),
            manual_score: Set(manual),
            final_score: Set(scoring::final_score(manual, Some(computed.auto_score))),
            max_score: Set(computed.max_score),
            rubric_breakdown: Set(Some(breakdown)),
            teacher_comments: Set(existing.as_ref().and_then(|s| s.teacher_comments.clone())),
            graded_by: Set(Some(actor.user_id)),
            graded_at: Set(Some(now)),
            updated_at: Set(now),
            ..Default::default()
        };
        LabScores::insert(model)
            .on_conflict(
                OnConflict::columns([Column::StudentId, Column::LabId])
                    .update_columns([
                        Column::SubmissionId,
                        Column::AutoScore,
                        Column::FinalScore,
                        Column::MaxScore,
                        Column::RubricBreakdown,
                        Column::GradedBy,
                        Column::GradedAt,
                        Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await
            .map_err(|e| VLabError::from_db("保存实验成绩失败", e))?;

        Self::write_activity(&txn, log).await?;

        let score = Self::score_row(&txn, lab_id, request.student_id)
            .await?
            .ok_or_else(|| VLabError::database_operation("保存实验成绩后未找到记录"))?;
        commit(txn).await?;

        Ok(LabScoreOutcome::Scored {
            score: score.into_score(),
            criteria,
        })
    }

    async fn annotations_for<C: ConnectionTrait>(
        conn: &C,
        score_id: i64,
    ) -> Result<Vec<ScoreAnnotation>> {
        let rows = LabScoreAnnotations::find()
            .filter(AnnotationColumn::ScoreId.eq(score_id))
            .order_by_asc(AnnotationColumn::CriterionId)
            .all(conn)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询成绩批注失败: {e}")))?;
        Ok(rows.into_iter().map(|m| m.into_annotation()).collect())
    }

    /// 学生成绩及批注
    pub async fn get_lab_score_impl(
        &self,
        lab_id: i64,
        student_id: i64,
    ) -> Result<Option<(LabScore, Vec<ScoreAnnotation>)>> {
        let Some(score) = Self::score_row(&self.db, lab_id, student_id).await? else {
            return Ok(None);
        };
        let annotations = Self::annotations_for(&self.db, score.id).await?;
        Ok(Some((score.into_score(), annotations)))
    }

    /// 实验全部成绩（附学生姓名）
    pub async fn list_lab_scores_impl(&self, lab_id: i64) -> Result<Vec<LabScoreWithStudent>> {
        let scores = LabScores::find()
            .filter(Column::LabId.eq(lab_id))
            .order_by_asc(Column::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询实验成绩失败: {e}")))?;
        if scores.is_empty() {
            return Ok(Vec::new());
        }

        let student_ids: Vec<i64> = scores.iter().map(|s| s.student_id).collect();
        let names: HashMap<i64, String> = Users::find()
            .filter(UserColumn::Id.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询学生失败: {e}")))?
            .into_iter()
            .map(|u| (u.id, u.full_name()))
            .collect();

        Ok(scores
            .into_iter()
            .map(|s| LabScoreWithStudent {
                student_name: names.get(&s.student_id).cloned().unwrap_or_default(),
                score: s.into_score(),
            })
            .collect())
    }

    /// 设置人工成绩；未给出人工分时保留原值
    pub async fn set_manual_score_impl(
        &self,
        lab_id: i64,
        student_id: i64,
        request: ManualScoreRequest,
        graded_by: i64,
    ) -> Result<Option<LabScore>> {
        let txn = self.begin().await?;

        let Some(existing) = Self::score_row(&txn, lab_id, student_id).await? else {
            return Ok(None);
        };

        let manual = request.manual_score.or(existing.manual_score);
        let now = now_ts();
        let mut model = ActiveModel {
            id: Set(existing.id),
            manual_score: Set(manual),
            final_score: Set(scoring::final_score(manual, existing.auto_score)),
            graded_by: Set(Some(graded_by)),
            graded_at: Set(Some(now)),
            updated_at: Set(now),
            ..Default::default()
        };
        if let Some(comments) = request.teacher_comments {
            model.teacher_comments = Set(Some(comments));
        }

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| VLabError::from_db("更新实验成绩失败", e))?;
        commit(txn).await?;

        Ok(Some(updated.into_score()))
    }

    /// 逐项批注并按批注重算人工成绩
    pub async fn annotate_score_impl(
        &self,
        lab_id: i64,
        student_id: i64,
        request: AnnotateRequest,
        graded_by: i64,
    ) -> Result<AnnotateOutcome> {
        let txn = self.begin().await?;

        let Some(existing) = Self::score_row(&txn, lab_id, student_id).await? else {
            return Ok(AnnotateOutcome::ScoreNotFound);
        };

        let criterion = LabRubricCriteria::find_by_id(request.criterion_id)
            .filter(CriterionColumn::LabId.eq(lab_id))
            .one(&txn)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询评分标准失败: {e}")))?;
        let Some(criterion) = criterion else {
            return Ok(AnnotateOutcome::CriterionNotFound);
        };
        if !(0.0..=criterion.max_points).contains(&request.points_awarded) {
            return Ok(AnnotateOutcome::OutOfRange {
                max_points: criterion.max_points,
            });
        }

        let now = now_ts();
        let annotation = AnnotationActiveModel {
            score_id: Set(existing.id),
            criterion_id: Set(criterion.id),
            points_awarded: Set(request.points_awarded),
            teacher_comment: Set(request.teacher_comment),
            annotation_type: Set(request
                .annotation_type
                .unwrap_or_else(|| scoring::ANNOTATION_MANUAL.to_string())),
            created_by: Set(Some(graded_by)),
            updated_at: Set(now),
            ..Default::default()
        };
        LabScoreAnnotations::insert(annotation)
            .on_conflict(
                OnConflict::columns([AnnotationColumn::ScoreId, AnnotationColumn::CriterionId])
                    .update_columns([
                        AnnotationColumn::PointsAwarded,
                        AnnotationColumn::TeacherComment,
                        AnnotationColumn::AnnotationType,
                        AnnotationColumn::CreatedBy,
                        AnnotationColumn::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await
            .map_err(|e| VLabError::from_db("保存成绩批注失败", e))?;

        let criteria: Vec<RubricCriterion> = Self::criteria_for(&txn, lab_id).await?;
        let annotations = Self::annotations_for(&txn, existing.id).await?;
        let previous = existing.clone().into_score().rubric_breakdown;
        let breakdown = scoring::rebuild_breakdown(&criteria, &annotations, &previous);
        let manual = scoring::breakdown_total(&breakdown);

        let updated = ActiveModel {
            id: Set(existing.id),
            manual_score: Set(Some(manual)),
            final_score: Set(Some(manual)),
            rubric_breakdown: Set(Some(to_json_text(&breakdown)?)),
            graded_by: Set(Some(graded_by)),
            graded_at: Set(Some(now)),
            updated_at: Set(now),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(|e| VLabError::from_db("更新实验成绩失败", e))?;

        commit(txn).await?;
        Ok(AnnotateOutcome::Annotated(updated.into_score()))
    }

    /// 课程在读学生（id, 姓名）
    pub async fn list_course_students_impl(&self, course_id: i64) -> Result<Vec<(i64, String)>> {
        let student_ids: Vec<i64> = CourseEnrollments::find()
            .filter(EnrollmentColumn::CourseId.eq(course_id))
            .filter(EnrollmentColumn::Status.eq(EnrollmentStatus::Enrolled.as_str()))
            .all(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询选课失败: {e}")))?
            .into_iter()
            .map(|e| e.student_id)
            .collect();
        if student_ids.is_empty() {
            return Ok(Vec::new());
        }

        let students = Users::find()
            .filter(UserColumn::Id.is_in(student_ids))
            .order_by_asc(UserColumn::LastName)
            .order_by_asc(UserColumn::FirstName)
            .all(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询学生失败: {e}")))?;
        Ok(students.into_iter().map(|u| (u.id, u.full_name())).collect())
    }
}
