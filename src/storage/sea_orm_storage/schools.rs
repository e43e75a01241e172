//! 学校存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, now_ts};
use crate::entity::schools::{ActiveModel, Column, Entity as Schools};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{Result, VLabError};
use crate::models::{
    PaginationInfo,
    schools::{
        entities::{School, SchoolWithCounts},
        requests::{SchoolListParams, SchoolRecord, UpdateSchoolRequest},
        responses::{SchoolListResponse, SchoolSummary},
    },
    users::entities::UserRole,
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, sea_query::OnConflict,
};

impl SeaOrmStorage {
    fn school_active_model(record: SchoolRecord, now: i64) -> ActiveModel {
        ActiveModel {
            school_code: Set(record.school_code),
            school_name: Set(record.school_name),
            school_name_en: Set(record.school_name_en),
            province: Set(record.province),
            district: Set(record.district),
            commune: Set(record.commune),
            village: Set(record.village),
            phone: Set(record.phone),
            email: Set(record.email),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }

    /// 创建学校
    pub async fn create_school_impl(&self, record: SchoolRecord) -> Result<School> {
        let model = Self::school_active_model(record, now_ts())
            .insert(&self.db)
            .await
            .map_err(|e| VLabError::from_db("创建学校失败", e))?;

        Ok(model.into_school())
    }

    /// 按 school_code 插入或更新
    pub async fn upsert_school_impl(&self, record: SchoolRecord) -> Result<School> {
        let code = record.school_code.clone();
        let on_conflict = OnConflict::column(Column::SchoolCode)
            .update_columns([
                Column::SchoolName,
                Column::SchoolNameEn,
                Column::Province,
                Column::District,
                Column::Commune,
                Column::Village,
                Column::Phone,
                Column::Email,
                Column::UpdatedAt,
            ])
            .to_owned();

        Schools::insert(Self::school_active_model(record, now_ts()))
            .on_conflict(on_conflict)
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| VLabError::from_db("写入学校失败", e))?;

        Schools::find()
            .filter(Column::SchoolCode.eq(&code))
            .one(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询学校失败: {e}")))?
            .map(|m| m.into_school())
            .ok_or_else(|| VLabError::not_found(format!("学校 {code} 写入后未找到")))
    }

    /// 通过 ID 获取学校
    pub async fn get_school_by_id_impl(&self, id: i64) -> Result<Option<School>> {
        let result = Schools::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询学校失败: {e}")))?;

        Ok(result.map(|m| m.into_school()))
    }

    /// 分页列出学校，附带教师与学生数量
    pub async fn list_schools_with_pagination_impl(
        &self,
        params: SchoolListParams,
    ) -> Result<SchoolListResponse> {
        let (page, size) = params.pagination.normalized();

        let mut select = Schools::find();

        if let Some(ref search) = params.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::SchoolCode.contains(&escaped))
                    .add(Column::SchoolName.contains(&escaped))
                    .add(Column::SchoolNameEn.contains(&escaped)),
            );
        }

        if let Some(ref province) = params.province
            && !province.trim().is_empty()
        {
            select = select.filter(Column::Province.eq(province.trim()));
        }

        select = select.order_by_asc(Column::SchoolName);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| VLabError::database_operation(format!("查询学校总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| VLabError::database_operation(format!("查询学校页数失败: {e}")))?;
        let schools = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询学校列表失败: {e}")))?;

        // 当前页各校的教师/学生数量
        let school_ids: Vec<i64> = schools.iter().map(|s| s.id).collect();
        let mut counts: HashMap<(i64, String), i64> = HashMap::new();
        if !school_ids.is_empty() {
            let rows = Users::find()
                .select_only()
                .column(UserColumn::SchoolId)
                .column(UserColumn::Role)
                .column_as(UserColumn::Id.count(), "count")
                .filter(UserColumn::SchoolId.is_in(school_ids))
                .filter(UserColumn::Role.is_in([UserRole::TEACHER, UserRole::STUDENT]))
                .group_by(UserColumn::SchoolId)
                .group_by(UserColumn::Role)
                .into_tuple::<(Option<i64>, String, i64)>()
                .all(&self.db)
                .await
                .map_err(|e| VLabError::database_operation(format!("统计学校人数失败: {e}")))?;
            for (school_id, role, count) in rows {
                if let Some(school_id) = school_id {
                    counts.insert((school_id, role), count);
                }
            }
        }

        let count_of = |school_id: i64, role: &str| {
            counts
                .get(&(school_id, role.to_string()))
                .copied()
                .unwrap_or(0)
        };

        let items = schools
            .into_iter()
            .map(|m| {
                let id = m.id;
                SchoolWithCounts {
                    school: m.into_school(),
                    teacher_count: count_of(id, UserRole::TEACHER),
                    student_count: count_of(id, UserRole::STUDENT),
                }
            })
            .collect();

        let summary = SchoolSummary {
            total_schools: total as i64,
            total_teachers: self.count_school_members(UserRole::TEACHER).await?,
            total_students: self.count_school_members(UserRole::STUDENT).await?,
        };

        Ok(SchoolListResponse {
            items,
            pagination: PaginationInfo::new(page, size, total, pages),
            summary,
        })
    }

    async fn count_school_members(&self, role: &str) -> Result<i64> {
        let count = Users::find()
            .filter(UserColumn::Role.eq(role))
            .filter(UserColumn::SchoolId.is_not_null())
            .count(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("统计学校人数失败: {e}")))?;
        Ok(count as i64)
    }

    /// 更新学校
    pub async fn update_school_impl(
        &self,
        id: i64,
        update: UpdateSchoolRequest,
    ) -> Result<Option<School>> {
        if self.get_school_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };

        if let Some(name) = update.school_name {
            model.school_name = Set(name);
        }
        if let Some(name_en) = update.school_name_en {
            model.school_name_en = Set(Some(name_en));
        }
        if let Some(province) = update.province {
            model.province = Set(province);
        }
        if let Some(district) = update.district {
            model.district = Set(Some(district));
        }
        if let Some(commune) = update.commune {
            model.commune = Set(Some(commune));
        }
        if let Some(village) = update.village {
            model.village = Set(Some(village));
        }
        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(email) = update.email {
            model.email = Set(Some(email));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| VLabError::from_db("更新学校失败", e))?;

        Ok(Some(updated.into_school()))
    }

    /// 删除学校
    pub async fn delete_school_impl(&self, id: i64) -> Result<bool> {
        let result = Schools::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| VLabError::from_db("删除学校失败", e))?;

        Ok(result.rows_affected > 0)
    }
}
