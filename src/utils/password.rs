use crate::config::AppConfig;
use crate::errors::VLabError;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use once_cell::sync::Lazy;

/// 用户不存在时参与比对的哈希，参数与真实用户一致
static PLACEHOLDER_HASH: Lazy<String> =
    Lazy::new(|| hash_password("placeholder-password-never-matches").unwrap_or_default());

fn configured_argon2() -> Result<Argon2<'static>, VLabError> {
    let config = &AppConfig::get().argon2;
    let params = Params::new(
        config.memory_cost,
        config.time_cost,
        config.parallelism,
        None,
    )
    .map_err(|e| VLabError::validation(format!("Argon2 参数错误: {e}")))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// 哈希密码（argon2id，参数来自配置）
pub fn hash_password(password: &str) -> Result<String, VLabError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = configured_argon2()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| VLabError::validation(format!("密码哈希失败: {e}")))?;
    Ok(hash.to_string())
}

/// 验证密码，参数从哈希串本身读取
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// 对占位哈希做一次完整校验，使未知用户与密码错误耗时一致
pub fn verify_placeholder(password: &str) {
    let _ = verify_password(password, &PLACEHOLDER_HASH);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("Secret123").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("Secret123", &hash));
        assert!(!verify_password("secret123", &hash));
    }

    #[test]
    fn test_verify_garbage_hash() {
        assert!(!verify_password("anything", "not-a-hash"));
        assert!(!verify_password("anything", ""));
    }

    #[test]
    fn test_placeholder_hash_is_real_argon2() {
        assert!(PLACEHOLDER_HASH.starts_with("$argon2id$"));
        assert!(PasswordHash::new(&PLACEHOLDER_HASH).is_ok());
        verify_placeholder("Secret123");
    }
}
