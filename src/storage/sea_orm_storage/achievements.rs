//! 成就存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, commit, now_ts, to_json_text};
use crate::entity::achievements::{ActiveModel, Column, Entity as Achievements};
use crate::entity::student_achievements::{
    ActiveModel as EarnedActiveModel, Column as EarnedColumn, Entity as StudentAchievements,
};
use crate::errors::{Result, VLabError};
use crate::models::{
    achievements::{
        entities::{Achievement, EarnedAchievement},
        requests::{AwardAchievementRequest, CreateAchievementRequest},
    },
    activity_logs::entities::ActivityEntry,
};
use crate::storage::AwardOutcome;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn list_active_achievements_impl(&self) -> Result<Vec<Achievement>> {
        let rows = Achievements::find()
            .filter(Column::IsActive.eq(true))
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询成就失败: {e}")))?;
        Ok(rows.into_iter().map(|m| m.into_achievement()).collect())
    }

    pub async fn create_achievement_impl(
        &self,
        req: CreateAchievementRequest,
        created_by: Option<i64>,
    ) -> Result<Achievement> {
        let criteria = req.criteria.as_ref().map(to_json_text).transpose()?;
        let model = ActiveModel {
            name: Set(req.name.trim().to_string()),
            description: Set(req.description),
            achievement_type: Set(req.achievement_type.trim().to_string()),
            criteria: Set(criteria),
            points: Set(req.points),
            badge_icon: Set(req.badge_icon),
            badge_color: Set(req.badge_color),
            is_active: Set(true),
            created_by: Set(created_by),
            created_at: Set(now_ts()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| VLabError::from_db("创建成就失败", e))?;
        Ok(result.into_achievement())
    }

    /// 颁发成就；同一 (学生, 成就, 仿真) 只能获得一次
    pub async fn award_achievement_impl(
        &self,
        request: AwardAchievementRequest,
        log: ActivityEntry,
    ) -> Result<AwardOutcome> {
        let txn = self.begin().await?;

        let achievement = Achievements::find_by_id(request.achievement_id)
            .filter(Column::IsActive.eq(true))
            .one(&txn)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询成就失败: {e}")))?;
        let Some(achievement) = achievement else {
            return Ok(AwardOutcome::AchievementNotFound);
        };

        let mut duplicate = StudentAchievements::find()
            .filter(EarnedColumn::StudentId.eq(request.student_id))
            .filter(EarnedColumn::AchievementId.eq(achievement.id));
        duplicate = match request.simulation_id {
            Some(simulation_id) => duplicate.filter(EarnedColumn::SimulationId.eq(simulation_id)),
            None => duplicate.filter(EarnedColumn::SimulationId.is_null()),
        };
        let existing = duplicate
            .count(&txn)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询已获成就失败: {e}")))?;
        if existing > 0 {
            return Ok(AwardOutcome::AlreadyAwarded);
        }

        let inserted = EarnedActiveModel {
            student_id: Set(request.student_id),
            achievement_id: Set(achievement.id),
            simulation_id: Set(request.simulation_id),
            points_earned: Set(achievement.points),
            earned_at: Set(now_ts()),
            ..Default::default()
        }
        .insert(&txn)
        .await;
        let earned = match inserted {
            Ok(model) => model,
            Err(e) => {
                let err = VLabError::from_db("颁发成就失败", e);
                if err.is_conflict() {
                    return Ok(AwardOutcome::AlreadyAwarded);
                }
                return Err(err);
            }
        };

        Self::write_activity(&txn, log).await?;
        commit(txn).await?;

        Ok(AwardOutcome::Awarded(earned.into_student_achievement()))
    }

    /// 学生已获得的成就（最新在前）
    pub async fn list_student_achievements_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<EarnedAchievement>> {
        let earned = StudentAchievements::find()
            .filter(EarnedColumn::StudentId.eq(student_id))
            .order_by_desc(EarnedColumn::EarnedAt)
            .all(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询已获成就失败: {e}")))?;
        if earned.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = earned.iter().map(|e| e.achievement_id).collect();
        let achievements: HashMap<i64, _> = Achievements::find()
            .filter(Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询成就失败: {e}")))?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();

        Ok(earned
            .into_iter()
            .filter_map(|row| {
                let achievement = achievements.get(&row.achievement_id)?;
                Some(EarnedAchievement {
                    name: achievement.name.clone(),
                    description: achievement.description.clone(),
                    badge_icon: achievement.badge_icon.clone(),
                    badge_color: achievement.badge_color.clone(),
                    earned: row.into_student_achievement(),
                })
            })
            .collect())
    }
}
