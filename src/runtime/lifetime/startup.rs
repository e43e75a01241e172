use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::services::auth::session::{SessionResolver, StorageSessionResolver};
use crate::services::permissions;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::random_code::random_alphanumeric;
use std::sync::Arc;
use tracing::{debug, info, warn};

const ADMIN_USERNAME: &str = "admin";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub sessions: Arc<dyn SessionResolver>,
}

/// 按配置创建缓存后端，失败或未注册时回退到进程内 moka
async fn create_cache() -> Result<Arc<dyn ObjectCache>, String> {
    let cache_type = AppConfig::get().cache.cache_type.as_str();
    let mut candidates = vec![cache_type];
    if cache_type != "moka" {
        candidates.push("moka");
    }

    for name in candidates {
        let Some(constructor) = get_object_cache_plugin(name) else {
            warn!("Cache backend '{}' not found in registry", name);
            continue;
        };
        match constructor().await {
            Ok(cache) => {
                if name != cache_type {
                    warn!("Falling back to {} cache backend", name);
                }
                return Ok(Arc::from(cache));
            }
            Err(e) => warn!("Failed to create {} cache: {}", name, e),
        }
    }

    Err(format!("No cache backend available (tried: {cache_type})"))
}

/// 管理员初始密码：字母数字，便于从日志中复制
fn generate_random_password(length: usize) -> String {
    random_alphanumeric(length)
}

/// 同步角色与权限矩阵（幂等）
async fn seed_permissions(storage: &Arc<dyn Storage>) {
    let seeds = permissions::role_seeds();
    match storage.seed_rbac(&seeds).await {
        Ok(()) => debug!("RBAC matrix synchronized ({} roles)", seeds.len()),
        Err(e) => warn!("Failed to seed roles and permissions: {}", e),
    }
}

/// 初始化超级管理员账号
/// 数据库中不存在 admin 用户时创建
async fn seed_admin(storage: &Arc<dyn Storage>) {
    match storage.get_user_by_username_or_email(ADMIN_USERNAME).await {
        Ok(Some(user)) => {
            debug!("Admin account already exists (ID: {}), skipping seed", user.id);
            return;
        }
        Ok(None) => {
            info!("No admin account found, creating default super admin...");
        }
        Err(e) => {
            warn!("Failed to look up admin account: {}, skipping admin seed", e);
            return;
        }
    }

    // 获取密码：优先从环境变量，否则生成随机密码
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let pwd = generate_random_password(16);
        warn!("==========================================================");
        warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
        warn!("  Generated admin password: {}", pwd);
        warn!("  Please save this password or set ADMIN_PASSWORD env var");
        warn!("==========================================================");
        pwd
    });

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return;
        }
    };

    let admin_request = CreateUserRequest {
        username: ADMIN_USERNAME.to_string(),
        email: "admin@localhost".to_string(),
        password: password_hash,
        first_name: "System".to_string(),
        last_name: "Administrator".to_string(),
        phone: None,
        role: UserRole::SuperAdmin,
        school_id: None,
    };

    match storage.create_user(admin_request).await {
        Ok(user) => {
            info!(
                "Default admin account created successfully (ID: {}, username: {})",
                user.id, user.username
            );
        }
        Err(e) => {
            warn!("Failed to create admin account: {}", e);
        }
    }
}

/// 准备服务器启动的上下文
/// 包括存储、权限种子、缓存与会话解析器
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    if cfg!(debug_assertions) {
        debug!(
            "Registered cache backends: {:?}",
            crate::cache::register::registered_object_cache_plugins()
        );
    }

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    // 角色需先于管理员账号写入
    seed_permissions(&storage).await;
    seed_admin(&storage).await;

    // 创建缓存实例
    let cache = create_cache().await.expect("Failed to create cache");
    warn!("Cache backend initialized");

    let sessions = StorageSessionResolver::shared(storage.clone(), Some(cache.clone()));

    StartupContext {
        storage,
        cache,
        sessions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_password() {
        let pwd = generate_random_password(16);
        assert_eq!(pwd.chars().count(), 16);
        assert_ne!(pwd, generate_random_password(16));
    }
}
