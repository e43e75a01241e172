use rand::Rng;
use rand::distr::Alphanumeric;

/// 生成指定长度的随机字母数字串
pub fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// 小写随机串（用于上传文件名后缀）
pub fn random_lower_alphanumeric(len: usize) -> String {
    random_alphanumeric(len).to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lengths_and_charset() {
        let code = random_alphanumeric(16);
        assert_eq!(code.len(), 16);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));

        let lower = random_lower_alphanumeric(6);
        assert_eq!(lower.len(), 6);
        assert!(!lower.chars().any(|c| c.is_ascii_uppercase()));
    }
}
