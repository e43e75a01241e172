//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_vlab_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum VLabError {
            $($variant(String),)*
        }

        impl VLabError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(VLabError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(VLabError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(VLabError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl VLabError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        VLabError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_vlab_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    Conflict("E010", "Resource Conflict"),
    DateParse("E011", "Date Parse Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
    Transaction("E014", "Transaction Error"),
}

impl VLabError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 将数据库错误映射为业务错误，唯一约束冲突单独识别
    pub fn from_db(context: &str, err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(detail)) => {
                VLabError::Conflict(format!("{context}: {detail}"))
            }
            Some(sea_orm::SqlErr::ForeignKeyConstraintViolation(detail)) => {
                VLabError::Validation(format!("{context}: {detail}"))
            }
            _ => VLabError::DatabaseOperation(format!("{context}: {err}")),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, VLabError::Conflict(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, VLabError::NotFound(_))
    }
}

impl fmt::Display for VLabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for VLabError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for VLabError {
    fn from(err: sea_orm::DbErr) -> Self {
        VLabError::from_db("数据库操作失败", err)
    }
}

impl From<std::io::Error> for VLabError {
    fn from(err: std::io::Error) -> Self {
        VLabError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for VLabError {
    fn from(err: serde_json::Error) -> Self {
        VLabError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for VLabError {
    fn from(err: chrono::ParseError) -> Self {
        VLabError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, VLabError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(VLabError::cache_connection("test").code(), "E001");
        assert_eq!(VLabError::database_config("test").code(), "E003");
        assert_eq!(VLabError::validation("test").code(), "E007");
        assert_eq!(VLabError::conflict("test").code(), "E010");
        assert_eq!(VLabError::authentication("test").code(), "E012");
        assert_eq!(VLabError::transaction("test").code(), "E014");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            VLabError::not_found("test").error_type(),
            "Resource Not Found"
        );
        assert_eq!(VLabError::conflict("test").error_type(), "Resource Conflict");
    }

    #[test]
    fn test_plain_db_error_is_operation_error() {
        let err = VLabError::from_db("查询学校失败", sea_orm::DbErr::Custom("boom".into()));
        assert_eq!(err.code(), "E005");
        assert!(err.message().starts_with("查询学校失败"));
        assert!(!err.is_conflict());
    }

    #[test]
    fn test_format_simple() {
        let err = VLabError::validation("day_of_week out of range");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("day_of_week"));
    }
}
