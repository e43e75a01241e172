//! 会话令牌与 Cookie 工具

use actix_web::HttpRequest;
use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use rand::RngCore;

use crate::config::AppConfig;

pub const TOKEN_BYTES: usize = 32;

/// 生成 32 字节随机令牌（64 位小写十六进制）
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

pub fn is_well_formed(token: &str) -> bool {
    token.len() == TOKEN_BYTES * 2
        && token
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

pub fn cookie_name() -> &'static str {
    &AppConfig::get().session.cookie_name
}

/// 从请求中读取会话令牌
pub fn token_from_request(req: &HttpRequest) -> Option<String> {
    req.cookie(cookie_name())
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// 构造会话 Cookie
pub fn session_cookie(token: &str, ttl_hours: i64) -> Cookie<'static> {
    Cookie::build(cookie_name().to_string(), token.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(AppConfig::get().secure_cookie())
        .max_age(CookieDuration::hours(ttl_hours))
        .finish()
}

/// 清除会话 Cookie（Max-Age=0）
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build(cookie_name().to_string(), "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(AppConfig::get().secure_cookie())
        .max_age(CookieDuration::ZERO)
        .finish()
}

/// 客户端 IP：连接信息优先，其次 X-Forwarded-For 第一项
pub fn client_ip(req: &HttpRequest) -> Option<String> {
    if let Some(ip) = req.connection_info().realip_remote_addr() {
        return Some(strip_port(ip).to_string());
    }
    req.headers()
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn user_agent(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(actix_web::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn strip_port(addr: &str) -> &str {
    if addr.parse::<std::net::IpAddr>().is_ok() {
        return addr;
    }
    match addr.parse::<std::net::SocketAddr>() {
        Ok(_) => addr
            .rsplit_once(':')
            .map(|(host, _)| host.trim_start_matches('[').trim_end_matches(']'))
            .unwrap_or(addr),
        Err(_) => addr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_format() {
        let token = generate_token();
        assert_eq!(token.len(), 64);
        assert!(is_well_formed(&token));
        assert_ne!(token, generate_token());
        assert!(!is_well_formed("ABC"));
        assert!(!is_well_formed(&"Z".repeat(64)));
    }

    #[test]
    fn test_strip_port() {
        assert_eq!(strip_port("10.0.0.1:5432"), "10.0.0.1");
        assert_eq!(strip_port("10.0.0.1"), "10.0.0.1");
        assert_eq!(strip_port("[::1]:8080"), "::1");
        assert_eq!(strip_port("::1"), "::1");
    }

    #[test]
    fn test_clear_cookie_attributes() {
        let cookie = clear_session_cookie();
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn test_forwarded_for_first_hop() {
        let req = actix_web::test::TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.9, 10.0.0.2"))
            .to_http_request();
        assert_eq!(client_ip(&req).as_deref(), Some("203.0.113.9"));
    }
}
