//! 路径参数提取器
//!
//! 非法 ID（非数字或非正数）直接返回 400 统一响应，处理程序无需再校验。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

macro_rules! define_safe_i64_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                ready(parse_positive_i64(req.match_info().get($param), $param).map($name))
            }
        }
    };
}

define_safe_i64_extractor!(SafeIDI64, "id");
define_safe_i64_extractor!(SafeStudentIdI64, "student_id");

fn parse_positive_i64(raw: Option<&str>, param: &str) -> Result<i64, actix_web::Error> {
    match raw.and_then(|s| s.parse::<i64>().ok()) {
        Some(id) if id > 0 => Ok(id),
        _ => {
            let message = format!("Invalid path parameter '{param}'");
            let response = HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
            Err(InternalError::from_response(message, response).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive_i64() {
        assert_eq!(parse_positive_i64(Some("42"), "id").ok(), Some(42));
        assert!(parse_positive_i64(Some("0"), "id").is_err());
        assert!(parse_positive_i64(Some("-3"), "id").is_err());
        assert!(parse_positive_i64(Some("abc"), "id").is_err());
        assert!(parse_positive_i64(None, "id").is_err());
    }

    #[actix_web::test]
    async fn test_extract_from_path() {
        let req = actix_web::test::TestRequest::default()
            .param("student_id", "17")
            .to_http_request();
        let extracted = SafeStudentIdI64::extract(&req).await.ok();
        assert_eq!(extracted, Some(SafeStudentIdI64(17)));
    }
}
