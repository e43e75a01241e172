//! 学生与家长门户的聚合查询

use std::collections::{BTreeMap, HashMap};

use super::SeaOrmStorage;
use crate::entity::courses::{Column as CourseColumn, Entity as Courses};
use crate::entity::exercise_submissions::{
    Column as SubmissionColumn, Entity as ExerciseSubmissions,
};
use crate::entity::lab_scores::{Column as ScoreColumn, Entity as LabScores};
use crate::entity::labs::{Column as LabColumn, Entity as Labs};
use crate::entity::simulation_progress::{Column as ProgressColumn, Entity as SimulationProgresses};
use crate::entity::simulations::{Column as SimulationColumn, Entity as Simulations};
use crate::entity::student_achievements::{Column as EarnedColumn, Entity as StudentAchievements};
use crate::entity::student_progress::{Column as CourseProgressColumn, Entity as StudentProgress};
use crate::entity::to_datetime;
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{Result, VLabError};
use crate::models::portal::responses::{
    AchievementTotals, CourseProgressItem, GradeItem, GradeKind, LabTotals, RecentSimulation,
    SimulationTotals, StudentStatsResponse, SubjectBreakdown,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

/// 最近活动条数
const RECENT_LIMIT: usize = 5;
const GENERAL_SUBJECT: &str = "general";

impl SeaOrmStorage {
    /// 学生学习统计
    pub async fn student_stats_impl(&self, student_id: i64) -> Result<StudentStatsResponse> {
        let progress = SimulationProgresses::find()
            .filter(ProgressColumn::StudentId.eq(student_id))
            .order_by_desc(ProgressColumn::LastAccessed)
            .all(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询仿真进度失败: {e}")))?;

        let simulation_ids: Vec<i64> = progress.iter().map(|p| p.simulation_id).collect();
        let simulations: HashMap<i64, _> = if simulation_ids.is_empty() {
            HashMap::new()
        } else {
            Simulations::find()
                .filter(SimulationColumn::Id.is_in(simulation_ids))
                .all(&self.db)
                .await
                .map_err(|e| VLabError::database_operation(format!("查询仿真失败: {e}")))?
                .into_iter()
                .map(|s| (s.id, s))
                .collect()
        };

        let mut totals = SimulationTotals::default();
        let mut by_subject: BTreeMap<String, (i64, i64, f64)> = BTreeMap::new();
        for row in &progress {
            totals.attempted += 1;
            totals.total_time_minutes += row.time_spent_minutes;
            totals.average_best_score += row.best_score;
            if row.completed {
                totals.completed += 1;
            }

            let subject = simulations
                .get(&row.simulation_id)
                .and_then(|s| s.subject.clone())
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| GENERAL_SUBJECT.to_string());
            let entry = by_subject.entry(subject).or_default();
            entry.0 += 1;
            if row.completed {
                entry.1 += 1;
            }
            entry.2 += row.best_score;
        }
        if totals.attempted > 0 {
            totals.average_best_score /= totals.attempted as f64;
        }

        let subjects = by_subject
            .into_iter()
            .map(|(subject, (attempted, completed, score_sum))| SubjectBreakdown {
                subject,
                attempted,
                completed,
                average_score: score_sum / attempted as f64,
            })
            .collect();

        let recent_activity = progress
            .iter()
            .take(RECENT_LIMIT)
            .filter_map(|row| {
                let sim = simulations.get(&row.simulation_id)?;
                Some(RecentSimulation {
                    simulation_id: sim.id,
                    title: sim.title.clone(),
                    subject: sim.subject.clone(),
                    progress_percentage: row.progress_percentage,
                    best_score: row.best_score,
                    completed: row.completed,
                    last_accessed: to_datetime(row.last_accessed),
                })
            })
            .collect();

        let labs = StudentProgress::find()
            .filter(CourseProgressColumn::StudentId.eq(student_id))
            .all(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询课程进度失败: {e}")))?
            .into_iter()
            .fold(LabTotals::default(), |mut acc, row| {
                acc.completed_labs += i64::from(row.completed_labs);
                acc.time_spent_minutes += row.time_spent_minutes;
                acc
            });

        let achievements = StudentAchievements::find()
            .filter(EarnedColumn::StudentId.eq(student_id))
            .all(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询已获成就失败: {e}")))?
            .into_iter()
            .fold(AchievementTotals::default(), |mut acc, row| {
                acc.count += 1;
                acc.points += i64::from(row.points_earned);
                acc
            });

        Ok(StudentStatsResponse {
            simulations: totals,
            labs,
            achievements,
            subjects,
            recent_activity,
        })
    }

    /// 学生各课程进度（附课程名与实验总数）
    pub async fn student_course_progress_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<CourseProgressItem>> {
        let rows = StudentProgress::find()
            .filter(CourseProgressColumn::StudentId.eq(student_id))
            .order_by_desc(CourseProgressColumn::LastActivity)
            .all(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询课程进度失败: {e}")))?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let course_ids: Vec<i64> = rows.iter().map(|r| r.course_id).collect();
        let titles: HashMap<i64, String> = Courses::find()
            .filter(CourseColumn::Id.is_in(course_ids.clone()))
            .all(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询课程失败: {e}")))?
            .into_iter()
            .map(|c| (c.id, c.title))
            .collect();

        let lab_counts: HashMap<i64, i64> = Labs::find()
            .select_only()
            .column(LabColumn::CourseId)
            .column_as(LabColumn::Id.count(), "count")
            .filter(LabColumn::CourseId.is_in(course_ids))
            .group_by(LabColumn::CourseId)
            .into_tuple::<(i64, i64)>()
            .all(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("统计实验数量失败: {e}")))?
            .into_iter()
            .collect();

        Ok(rows
            .into_iter()
            .map(|row| CourseProgressItem {
                course_id: row.course_id,
                course_title: titles.get(&row.course_id).cloned().unwrap_or_default(),
                completed_labs: row.completed_labs,
                total_labs: lab_counts.get(&row.course_id).copied().unwrap_or(0),
                time_spent_minutes: row.time_spent_minutes,
                last_activity: to_datetime(row.last_activity),
            })
            .collect())
    }

    async fn user_names(&self, ids: Vec<i64>) -> Result<HashMap<i64, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        Ok(Users::find()
            .filter(UserColumn::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询用户失败: {e}")))?
            .into_iter()
            .map(|u| (u.id, u.full_name()))
            .collect())
    }

    /// 学生成绩条目：已出分的实验成绩与练习提交，最新在前
    pub async fn student_grade_items_impl(&self, student_id: i64) -> Result<Vec<GradeItem>> {
        let scores = LabScores::find()
            .filter(ScoreColumn::StudentId.eq(student_id))
            .filter(ScoreColumn::FinalScore.is_not_null())
            .all(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询实验成绩失败: {e}")))?;
        let submissions = ExerciseSubmissions::find()
            .filter(SubmissionColumn::StudentId.eq(student_id))
            .order_by_desc(SubmissionColumn::SubmittedAt)
            .limit(GradeItem::MAX_ITEMS as u64)
            .all(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询练习提交失败: {e}")))?;

        let lab_ids: Vec<i64> = scores.iter().map(|s| s.lab_id).collect();
        let labs: HashMap<i64, _> = Labs::find()
            .filter(LabColumn::Id.is_in(lab_ids))
            .all(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询实验失败: {e}")))?
            .into_iter()
            .map(|l| (l.id, l))
            .collect();
        let course_ids: Vec<i64> = labs.values().map(|l| l.course_id).collect();
        let courses: HashMap<i64, String> = Courses::find()
            .filter(CourseColumn::Id.is_in(course_ids))
            .all(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询课程失败: {e}")))?
            .into_iter()
            .map(|c| (c.id, c.title))
            .collect();
        let simulation_ids: Vec<i64> = submissions.iter().map(|s| s.simulation_id).collect();
        let simulations: HashMap<i64, _> = Simulations::find()
            .filter(SimulationColumn::Id.is_in(simulation_ids))
            .all(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询仿真失败: {e}")))?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let grader_ids: Vec<i64> = scores
            .iter()
            .filter_map(|s| s.graded_by)
            .chain(submissions.iter().filter_map(|s| s.graded_by))
            .collect();
        let graders = self.user_names(grader_ids).await?;

        let mut items = Vec::with_capacity(scores.len() + submissions.len());
        for score in scores {
            let Some(lab) = labs.get(&score.lab_id) else {
                continue;
            };
            let final_score = score.final_score.unwrap_or(0.0);
            items.push(GradeItem {
                id: score.id,
                course: courses.get(&lab.course_id).cloned().unwrap_or_default(),
                assignment: lab.title.clone(),
                score: final_score,
                max_score: score.max_score,
                percentage: GradeItem::rounded_percentage(final_score, score.max_score),
                date: to_datetime(score.graded_at.unwrap_or(score.updated_at)),
                teacher: score.graded_by.and_then(|id| graders.get(&id).cloned()),
                kind: GradeKind::Lab,
            });
        }
        for submission in submissions {
            let simulation = simulations.get(&submission.simulation_id);
            items.push(GradeItem {
                id: submission.id,
                course: simulation
                    .and_then(|s| s.subject.clone())
                    .unwrap_or_else(|| GENERAL_SUBJECT.to_string()),
                assignment: simulation.map(|s| s.title.clone()).unwrap_or_default(),
                score: submission.total_score,
                max_score: submission.max_score,
                percentage: GradeItem::rounded_percentage(
                    submission.total_score,
                    submission.max_score,
                ),
                date: to_datetime(submission.graded_at.unwrap_or(submission.submitted_at)),
                teacher: submission.graded_by.and_then(|id| graders.get(&id).cloned()),
                kind: GradeKind::Exercise,
            });
        }

        Ok(GradeItem::merge_newest_first(items))
    }
}
