use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;

// 学校写入请求（创建与 upsert 共用）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct SchoolPayload {
    #[serde(default)]
    pub school_code: Option<String>,
    #[serde(default)]
    pub school_name: Option<String>,
    pub school_name_en: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    pub district: Option<String>,
    pub commune: Option<String>,
    pub village: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

// 校验后的学校数据
#[derive(Debug, Clone)]
pub struct SchoolRecord {
    pub school_code: String,
    pub school_name: String,
    pub school_name_en: Option<String>,
    pub province: String,
    pub district: Option<String>,
    pub commune: Option<String>,
    pub village: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl SchoolPayload {
    /// 校验必填字段：school_code、school_name、province
    pub fn into_record(self) -> Result<SchoolRecord, String> {
        let required = |value: Option<String>, name: &str| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| format!("{name} is required"))
        };
        Ok(SchoolRecord {
            school_code: required(self.school_code, "school_code")?,
            school_name: required(self.school_name, "school_name")?,
            province: required(self.province, "province")?,
            school_name_en: self.school_name_en,
            district: self.district,
            commune: self.commune,
            village: self.village,
            phone: self.phone,
            email: self.email,
        })
    }
}

// 学校更新请求
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct UpdateSchoolRequest {
    pub school_name: Option<String>,
    pub school_name_en: Option<String>,
    pub province: Option<String>,
    pub district: Option<String>,
    pub commune: Option<String>,
    pub village: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct SchoolListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    pub province: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_required_fields() {
        let payload = SchoolPayload {
            school_code: Some("PP-001".into()),
            school_name: Some("  ".into()),
            province: Some("Phnom Penh".into()),
            ..Default::default()
        };
        assert_eq!(
            payload.into_record().unwrap_err(),
            "school_name is required"
        );
    }

    #[test]
    fn test_fields_are_trimmed() {
        let payload = SchoolPayload {
            school_code: Some(" PP-001 ".into()),
            school_name: Some("Hun Sen High School".into()),
            province: Some("Phnom Penh".into()),
            ..Default::default()
        };
        let record = payload.into_record().unwrap();
        assert_eq!(record.school_code, "PP-001");
    }
}
