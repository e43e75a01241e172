use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 分页查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationQuery {
    #[serde(
        default = "default_page",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub page: i64,
    #[serde(
        default = "default_size",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub size: i64,
}

// 分页响应信息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

// 分页列表响应
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginatedResponse<T: TS> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}

// 自定义反序列化函数，支持字符串到i64的转换
pub(crate) fn deserialize_string_to_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{Error, Unexpected, Visitor};
    use std::fmt;

    struct I64Visitor;

    impl<'de> Visitor<'de> for I64Visitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer or a string containing an integer")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            if value <= i64::MAX as u64 {
                Ok(value as i64)
            } else {
                Err(Error::invalid_value(Unexpected::Unsigned(value), &self))
            }
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            value
                .parse()
                .map_err(|_| Error::invalid_value(Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_any(I64Visitor)
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    20
}

impl PaginationQuery {
    /// 规范化页码与每页数量
    pub fn normalized(&self) -> (u64, u64) {
        let page = self.page.max(1) as u64;
        let size = self.size.clamp(1, 100) as u64;
        (page, size)
    }
}

impl PaginationInfo {
    pub fn new(page: u64, size: u64, total: u64, total_pages: u64) -> Self {
        Self {
            page: page as i64,
            page_size: size as i64,
            total: total as i64,
            total_pages: total_pages as i64,
        }
    }
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self { page: 1, size: 20 }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawI64 {
    Int(i64),
    Text(String),
}

/// 可选 i64 参数：查询串中为字符串，JSON 请求体中为数字
pub(crate) fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<RawI64>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawI64::Int(value)) => Ok(Some(value)),
        Some(RawI64::Text(s)) => match s.trim() {
            "" => Ok(None),
            trimmed => trimmed
                .parse::<i64>()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("invalid integer: '{trimmed}'"))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(flatten)]
        pagination: PaginationQuery,
        #[serde(default, deserialize_with = "deserialize_optional_i64")]
        school_id: Option<i64>,
    }

    #[test]
    fn test_query_string_numbers() {
        let sample: Sample =
            serde_urlencoded_like("page=3&size=500&school_id=7");
        assert_eq!(sample.pagination.normalized(), (3, 100));
        assert_eq!(sample.school_id, Some(7));
    }

    #[test]
    fn test_defaults_when_absent() {
        let sample: Sample = serde_urlencoded_like("");
        assert_eq!(sample.pagination.normalized(), (1, 20));
        assert_eq!(sample.school_id, None);
    }

    #[test]
    fn test_json_numbers() {
        #[derive(Deserialize)]
        struct Body {
            #[serde(default, deserialize_with = "deserialize_optional_i64")]
            school_id: Option<i64>,
        }
        let body: Body = serde_json::from_str(r#"{"school_id": 12}"#).unwrap();
        assert_eq!(body.school_id, Some(12));
        let body: Body = serde_json::from_str(r#"{"school_id": null}"#).unwrap();
        assert_eq!(body.school_id, None);
        assert!(serde_json::from_str::<Body>(r#"{"school_id": "x"}"#).is_err());
    }

    fn serde_urlencoded_like(query: &str) -> Sample {
        actix_web::web::Query::<Sample>::from_query(query)
            .expect("query should parse")
            .into_inner()
    }
}
