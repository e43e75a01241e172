//! 活动日志记录
//!
//! 写入失败只记录警告，不影响调用方。

use std::sync::Arc;

use actix_web::HttpRequest;
use tracing::warn;

use crate::middlewares::RequireSession;
use crate::models::activity_logs::entities::ActivityEntry;
use crate::storage::Storage;
use crate::utils::session_token;

pub struct ActivityLogger;

impl ActivityLogger {
    pub async fn log(storage: &dyn Storage, entry: ActivityEntry) {
        let action = entry.action.clone();
        if let Err(e) = storage.insert_activity_log(entry).await {
            warn!("Failed to write activity log '{}': {}", action, e);
        }
    }

    /// 后台写入，不等待结果
    pub fn spawn(storage: Arc<dyn Storage>, entry: ActivityEntry) {
        actix_web::rt::spawn(async move {
            Self::log(storage.as_ref(), entry).await;
        });
    }

    /// 以请求上下文（客户端、当前身份）初始化一条记录
    pub fn entry(request: &HttpRequest, action: &str) -> ActivityEntry {
        let entry = ActivityEntry::new(action).client(
            session_token::client_ip(request),
            session_token::user_agent(request),
        );
        match RequireSession::extract_identity(request) {
            Some(identity) => entry
                .user(Some(identity.user_id))
                .session(identity.session_id),
            None => entry,
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{HttpMessage, test::TestRequest};

    use super::*;
    use crate::models::auth::entities::fixtures::identity_with;

    #[test]
    fn test_entry_carries_request_context() {
        let req = TestRequest::default()
            .insert_header(("User-Agent", "lab-client/1.0"))
            .insert_header(("X-Forwarded-For", "192.0.2.4"))
            .to_http_request();
        req.extensions_mut()
            .insert(identity_with(12, &["teacher"], &[]));

        let entry = ActivityLogger::entry(&req, "lab.score");
        assert_eq!(entry.action, "lab.score");
        assert_eq!(entry.user_id, Some(12));
        assert_eq!(entry.session_id.as_deref(), Some("1"));
        assert_eq!(entry.ip_address.as_deref(), Some("192.0.2.4"));
        assert_eq!(entry.user_agent.as_deref(), Some("lab-client/1.0"));
    }

    #[test]
    fn test_entry_without_identity() {
        let req = TestRequest::default().to_http_request();
        let entry = ActivityLogger::entry(&req, "auth.login");
        assert_eq!(entry.user_id, None);
        assert_eq!(entry.session_id, None);
    }
}
