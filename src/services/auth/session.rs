//! 会话解析
//!
//! 由 Cookie 中的不透明令牌解析出请求身份。结果缓存在 `session:<token>` 下，
//! 注销、吊销与改密时通过 `forget` 失效。

use std::sync::Arc;

use actix_web::HttpRequest;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::cache::{CacheResult, ObjectCache, ObjectCacheExt};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::auth::entities::Identity;
use crate::storage::Storage;
use crate::utils::session_token;

#[async_trait]
pub trait SessionResolver: Send + Sync {
    /// 无效、过期或未知的令牌返回 `Ok(None)`，存储故障返回 `Err`
    async fn resolve(&self, token: &str) -> Result<Option<Identity>>;

    /// 使缓存的解析结果失效
    async fn forget(&self, token: &str);
}

pub fn cache_key(token: &str) -> String {
    format!("session:{token}")
}

/// 从应用数据中取得解析器
pub fn resolver_from_request(req: &HttpRequest) -> Option<Arc<dyn SessionResolver>> {
    req.app_data::<actix_web::web::Data<Arc<dyn SessionResolver>>>()
        .map(|data| data.get_ref().clone())
}

/// 使一组令牌的缓存失效（解析器未注册时忽略）
pub async fn forget_tokens(req: &HttpRequest, tokens: &[String]) {
    let Some(resolver) = resolver_from_request(req) else {
        return;
    };
    for token in tokens {
        resolver.forget(token).await;
    }
}

/// 基于存储层的解析器
pub struct StorageSessionResolver {
    storage: Arc<dyn Storage>,
    cache: Option<Arc<dyn ObjectCache>>,
}

impl StorageSessionResolver {
    pub fn new(storage: Arc<dyn Storage>, cache: Option<Arc<dyn ObjectCache>>) -> Self {
        Self { storage, cache }
    }

    pub fn shared(
        storage: Arc<dyn Storage>,
        cache: Option<Arc<dyn ObjectCache>>,
    ) -> Arc<dyn SessionResolver> {
        Arc::new(Self::new(storage, cache))
    }

    /// 缓存命中后复核会话与用户状态，角色权限沿用缓存
    async fn still_valid(&self, token: &str, identity: &Identity) -> Result<bool> {
        let now = chrono::Utc::now();
        let Some(session) = self.storage.get_session_by_token(token).await? else {
            return Ok(false);
        };
        if !session.is_valid_at(now) || session.id != identity.session_id {
            return Ok(false);
        }
        if identity.is_guest {
            return Ok(true);
        }
        Ok(self
            .storage
            .get_user_by_id(identity.user_id)
            .await?
            .is_some_and(|user| user.is_active()))
    }

    async fn load(&self, token: &str) -> Result<Option<Identity>> {
        let now = chrono::Utc::now();

        let Some(session) = self.storage.get_session_by_token(token).await? else {
            return Ok(None);
        };
        if !session.is_valid_at(now) {
            debug!("Session {} is inactive or expired", session.id);
            return Ok(None);
        }

        let identity = if session.is_guest {
            Identity::guest(session.id, session.expires_at)
        } else {
            let Some(user_id) = session.user_id else {
                return Ok(None);
            };
            let Some(user) = self.storage.get_user_by_id(user_id).await? else {
                return Ok(None);
            };
            if !user.is_active() {
                debug!("User {} is not active, rejecting session", user.id);
                return Ok(None);
            }
            let parts = self
                .storage
                .load_identity_parts(user.id, user.role.as_str())
                .await?;
            Identity {
                user_id: user.id,
                username: user.username,
                first_name: user.first_name,
                last_name: user.last_name,
                email: user.email,
                primary_role: user.role.to_string(),
                roles: parts.roles,
                permissions: parts.permissions,
                school_access: parts.school_access,
                session_id: session.id,
                is_guest: false,
                expires_at: session.expires_at,
            }
        };

        if let Err(e) = self.storage.touch_session(session.id).await {
            warn!("Failed to update last access of session {}: {}", session.id, e);
        }

        Ok(Some(identity))
    }
}

#[async_trait]
impl SessionResolver for StorageSessionResolver {
    async fn resolve(&self, token: &str) -> Result<Option<Identity>> {
        if !session_token::is_well_formed(token) {
            return Ok(None);
        }

        let key = cache_key(token);
        if let Some(cache) = &self.cache
            && let CacheResult::Found(identity) = cache.get_json::<Identity>(&key).await
        {
            if identity.expires_at > chrono::Utc::now()
                && self.still_valid(token, &identity).await?
            {
                return Ok(Some(identity));
            }
            debug!("Cached identity for session {} is stale", identity.session_id);
            cache.remove(&key).await;
        }

        let identity = self.load(token).await?;

        if let (Some(cache), Some(identity)) = (&self.cache, &identity) {
            cache
                .insert_json(key, identity, AppConfig::get().cache.default_ttl)
                .await;
        }

        Ok(identity)
    }

    async fn forget(&self, token: &str) {
        if let Some(cache) = &self.cache {
            cache.remove(&cache_key(token)).await;
        }
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::collections::HashMap;

    use super::*;
    use crate::errors::VLabError;

    /// 测试用解析器：令牌到身份的固定映射，"boom" 模拟存储故障
    #[derive(Default)]
    pub struct FakeResolver {
        pub sessions: HashMap<String, Identity>,
    }

    impl FakeResolver {
        pub fn with(mut self, token: &str, identity: Identity) -> Self {
            self.sessions.insert(token.to_string(), identity);
            self
        }
    }

    #[async_trait]
    impl SessionResolver for FakeResolver {
        async fn resolve(&self, token: &str) -> Result<Option<Identity>> {
            if token == "boom" {
                return Err(VLabError::database_connection("connection refused"));
            }
            Ok(self.sessions.get(token).cloned())
        }

        async fn forget(&self, _token: &str) {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key() {
        assert_eq!(cache_key("abc"), "session:abc");
    }
}
