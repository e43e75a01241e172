//! 仿真与仿真进度存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, now_ts};
use crate::entity::simulation_progress::{
    ActiveModel as ProgressActiveModel, Column as ProgressColumn, Entity as SimulationProgresses,
};
use crate::entity::simulations::{ActiveModel, Column, Entity as Simulations};
use crate::errors::{Result, VLabError};
use crate::models::{
    PaginationInfo,
    simulations::{
        entities::{Simulation, SimulationProgress},
        requests::{
            CreateSimulationRequest, SimulationFilter, UpdateProgressRequest,
            UpdateSimulationRequest,
        },
        responses::{PublicStatsResponse, SimulationListResponse, SimulationUsage, SubjectCount},
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
    sea_query::{Expr, ExprTrait, OnConflict},
};

impl SeaOrmStorage {
    /// 创建仿真
    pub async fn create_simulation_impl(
        &self,
        req: CreateSimulationRequest,
        created_by: Option<i64>,
    ) -> Result<Simulation> {
        let now = now_ts();
        let model = ActiveModel {
            slug: Set(req.slug),
            title: Set(req.title.trim().to_string()),
            description: Set(req.description),
            subject: Set(req.subject),
            grade_level: Set(req.grade_level),
            simulation_url: Set(req.simulation_url),
            thumbnail_url: Set(req.thumbnail_url),
            is_published: Set(req.is_published),
            allow_guest: Set(req.allow_guest),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| VLabError::from_db("创建仿真失败", e))?;
        Ok(result.into_simulation())
    }

    pub async fn get_simulation_by_id_impl(&self, id: i64) -> Result<Option<Simulation>> {
        let result = Simulations::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询仿真失败: {e}")))?;
        Ok(result.map(|m| m.into_simulation()))
    }

    /// 分页列出仿真
    pub async fn list_simulations_with_pagination_impl(
        &self,
        filter: SimulationFilter,
        page: u64,
        size: u64,
    ) -> Result<SimulationListResponse> {
        let mut select = Simulations::find();

        if filter.published_only {
            select = select.filter(Column::IsPublished.eq(true));
        }
        if filter.guest_only {
            select = select.filter(Column::AllowGuest.eq(true));
        }
        if let Some(ref subject) = filter.subject
            && !subject.trim().is_empty()
        {
            select = select.filter(Column::Subject.eq(subject.trim()));
        }
        if let Some(ref search) = filter.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Title.contains(&escaped))
                    .add(Column::Description.contains(&escaped))
                    .add(Column::Slug.contains(&escaped)),
            );
        }
        select = select.order_by_asc(Column::Title);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| VLabError::database_operation(format!("查询仿真总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| VLabError::database_operation(format!("查询仿真页数失败: {e}")))?;
        let simulations = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询仿真列表失败: {e}")))?;

        Ok(SimulationListResponse {
            items: simulations
                .into_iter()
                .map(|m| m.into_simulation())
                .collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新仿真
    pub async fn update_simulation_impl(
        &self,
        id: i64,
        update: UpdateSimulationRequest,
    ) -> Result<Option<Simulation>> {
        if self.get_simulation_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };
        if let Some(slug) = update.slug {
            model.slug = Set(slug);
        }
        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(subject) = update.subject {
            model.subject = Set(Some(subject));
        }
        if let Some(grade_level) = update.grade_level {
            model.grade_level = Set(Some(grade_level));
        }
        if let Some(url) = update.simulation_url {
            model.simulation_url = Set(Some(url));
        }
        if let Some(url) = update.thumbnail_url {
            model.thumbnail_url = Set(Some(url));
        }
        if let Some(is_published) = update.is_published {
            model.is_published = Set(is_published);
        }
        if let Some(allow_guest) = update.allow_guest {
            model.allow_guest = Set(allow_guest);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| VLabError::from_db("更新仿真失败", e))?;
        Ok(Some(updated.into_simulation()))
    }

    pub async fn delete_simulation_impl(&self, id: i64) -> Result<bool> {
        let result = Simulations::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| VLabError::from_db("删除仿真失败", e))?;
        Ok(result.rows_affected > 0)
    }

    /// 已发布仿真按学科统计（无学科归入 general）
    pub async fn public_simulation_stats_impl(&self) -> Result<PublicStatsResponse> {
        let rows: Vec<(Option<String>, i64)> = Simulations::find()
            .select_only()
            .column(Column::Subject)
            .column_as(Column::Id.count(), "count")
            .filter(Column::IsPublished.eq(true))
            .group_by(Column::Subject)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("统计仿真失败: {e}")))?;

        let mut merged: HashMap<String, i64> = HashMap::new();
        for (subject, count) in rows {
            let key = subject
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "general".to_string());
            *merged.entry(key).or_default() += count;
        }

        let total = merged.values().sum();
        let mut by_subject: Vec<SubjectCount> = merged
            .into_iter()
            .map(|(subject, count)| SubjectCount { subject, count })
            .collect();
        by_subject.sort_by(|a, b| b.count.cmp(&a.count).then(a.subject.cmp(&b.subject)));

        Ok(PublicStatsResponse { total, by_subject })
    }

    async fn find_progress(
        &self,
        student_id: i64,
        simulation_id: i64,
    ) -> Result<Option<crate::entity::simulation_progress::Model>> {
        SimulationProgresses::find()
            .filter(ProgressColumn::StudentId.eq(student_id))
            .filter(ProgressColumn::SimulationId.eq(simulation_id))
            .one(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询仿真进度失败: {e}")))
    }

    /// 记录一次开始：不存在则创建，存在则 attempts + 1
    pub async fn record_simulation_start_impl(
        &self,
        student_id: i64,
        simulation_id: i64,
    ) -> Result<SimulationProgress> {
        let now = now_ts();
        let model = ProgressActiveModel {
            student_id: Set(student_id),
            simulation_id: Set(simulation_id),
            progress_percentage: Set(0.0),
            best_score: Set(0.0),
            completed: Set(false),
            time_spent_minutes: Set(0),
            attempts: Set(1),
            last_accessed: Set(now),
            ..Default::default()
        };

        SimulationProgresses::insert(model)
            .on_conflict(
                OnConflict::columns([ProgressColumn::StudentId, ProgressColumn::SimulationId])
                    .value(
                        ProgressColumn::Attempts,
                        Expr::col((SimulationProgresses, ProgressColumn::Attempts)).add(1),
                    )
                    .value(ProgressColumn::LastAccessed, now)
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| VLabError::from_db("记录仿真开始失败", e))?;

        self.find_progress(student_id, simulation_id)
            .await?
            .map(|m| m.into_progress())
            .ok_or_else(|| VLabError::database_operation("记录仿真开始后未找到进度"))
    }

    /// 更新仿真进度
    pub async fn update_simulation_progress_impl(
        &self,
        student_id: i64,
        simulation_id: i64,
        update: UpdateProgressRequest,
    ) -> Result<SimulationProgress> {
        let now = now_ts();
        let added_minutes = Ord::max(update.time_spent_minutes.unwrap_or(0), 0);
        let completed = update.progress_percentage >= 100.0;

        let saved = match self.find_progress(student_id, simulation_id).await? {
            Some(existing) => {
                let best_score = match update.score {
                    Some(score) => existing.best_score.max(score),
                    None => existing.best_score,
                };
                ProgressActiveModel {
                    id: Set(existing.id),
                    progress_percentage: Set(update.progress_percentage),
                    best_score: Set(best_score),
                    completed: Set(completed),
                    time_spent_minutes: Set(existing.time_spent_minutes + added_minutes),
                    last_accessed: Set(now),
                    ..Default::default()
                }
                .update(&self.db)
                .await
                .map_err(|e| VLabError::from_db("更新仿真进度失败", e))?
            }
            None => ProgressActiveModel {
                student_id: Set(student_id),
                simulation_id: Set(simulation_id),
                progress_percentage: Set(update.progress_percentage),
                best_score: Set(update.score.unwrap_or(0.0).max(0.0)),
                completed: Set(completed),
                time_spent_minutes: Set(added_minutes),
                attempts: Set(1),
                last_accessed: Set(now),
                ..Default::default()
            }
            .insert(&self.db)
            .await
            .map_err(|e| VLabError::from_db("创建仿真进度失败", e))?,
        };

        Ok(saved.into_progress())
    }

    /// 各仿真的学生数、尝试次数与完成数
    pub async fn simulation_usage_stats_impl(&self) -> Result<Vec<SimulationUsage>> {
        let simulations = Simulations::find()
            .order_by_asc(Column::Title)
            .all(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询仿真失败: {e}")))?;

        let rows = SimulationProgresses::find()
            .all(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询仿真进度失败: {e}")))?;

        let mut usage: HashMap<i64, (i64, i64, i64)> = HashMap::new();
        for row in rows {
            let entry = usage.entry(row.simulation_id).or_default();
            entry.0 += 1;
            entry.1 += i64::from(row.attempts);
            if row.completed {
                entry.2 += 1;
            }
        }

        Ok(simulations
            .into_iter()
            .map(|sim| {
                let (students, attempts, completions) =
                    usage.get(&sim.id).copied().unwrap_or_default();
                SimulationUsage {
                    simulation_id: sim.id,
                    title: sim.title,
                    students,
                    attempts,
                    completions,
                }
            })
            .collect())
    }
}
