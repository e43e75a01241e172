//! 上传文件的存储命名

use super::random_code::random_lower_alphanumeric;

pub const MAX_STEM_LEN: usize = 50;

/// 文件名主干：小写 ASCII 字母数字、`-`、`_`，其余字符替换为 `_`
pub fn sanitize_stem(stem: &str) -> String {
    let mut sanitized: String = stem
        .chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(MAX_STEM_LEN)
        .collect();
    if sanitized.is_empty() {
        sanitized.push_str("file");
    }
    sanitized
}

/// 拆分主干与小写扩展名（含点号）
pub fn split_extension(file_name: &str) -> (&str, Option<String>) {
    // 去掉客户端可能携带的目录部分
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);
    match base.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            (stem, Some(format!(".{}", ext.to_ascii_lowercase())))
        }
        _ => (base, None),
    }
}

/// `<stem>_<unix-millis>_<6 位随机>.<ext>`
pub fn stored_file_name(stem: &str, extension: &str, unix_millis: i64) -> String {
    format!(
        "{}_{}_{}{}",
        sanitize_stem(stem),
        unix_millis,
        random_lower_alphanumeric(6),
        extension
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_stem() {
        assert_eq!(sanitize_stem("Pendulum Lab (v2)"), "pendulum_lab__v2_");
        assert_eq!(sanitize_stem("ok-name_1"), "ok-name_1");
        assert_eq!(sanitize_stem("ផ្ទះ"), "____");
        assert_eq!(sanitize_stem(""), "file");
        assert_eq!(sanitize_stem(&"a".repeat(80)).len(), MAX_STEM_LEN);
    }

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("Wave.HTML"), ("Wave", Some(".html".to_string())));
        assert_eq!(split_extension("../../etc/passwd"), ("passwd", None));
        assert_eq!(split_extension("C:\\tmp\\img.png"), ("img", Some(".png".to_string())));
        assert_eq!(split_extension(".hidden"), (".hidden", None));
    }

    #[test]
    fn test_stored_file_name_shape() {
        let name = stored_file_name("My Sim", ".html", 1_700_000_000_000);
        assert!(name.starts_with("my_sim_1700000000000_"));
        assert!(name.ends_with(".html"));
        let suffix = name
            .trim_start_matches("my_sim_1700000000000_")
            .trim_end_matches(".html");
        assert_eq!(suffix.len(), 6);
    }
}
