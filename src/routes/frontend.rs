//! 前端页面路由
//!
//! SPA fallback 经 `SessionGate` 包裹：未登录访问受保护页面时重定向到登录页，
//! 已登录时按角色限制区域。页面资源由 rust-embed 嵌入，`frontend-custom/`
//! 目录中的同名文件优先（开发用）。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use rust_embed::Embed;
use std::path::Path;

use crate::middlewares::SessionGate;

#[derive(Embed)]
#[folder = "frontend/dist/"]
struct FrontendAssets;

const CUSTOM_DIR: &str = "./frontend-custom";
const INDEX: &str = "index.html";

/// 按扩展名推断 MIME 类型（上传文件读取也使用）
pub(crate) fn get_mime_type(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("");

    match ext {
        "html" | "htm" => "text/html; charset=utf-8",
        "js" => "application/javascript; charset=utf-8",
        "mjs" => "application/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "json" => "application/json; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "eot" => "application/vnd.ms-fontobject",
        "webp" => "image/webp",
        "webm" => "video/webm",
        "mp4" => "video/mp4",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "pdf" => "application/pdf",
        "xml" => "application/xml",
        "txt" => "text/plain; charset=utf-8",
        "wasm" => "application/wasm",
        "map" => "application/json",
        _ => "application/octet-stream",
    }
}

/// 带 hash 的静态资源可以长期缓存
fn is_immutable_asset(path: &str) -> bool {
    path.starts_with("assets/") || path.starts_with("_next/static/")
}

fn load_file(path: &str) -> Option<Vec<u8>> {
    // 拒绝越出资源目录的路径
    if path.split('/').any(|segment| segment == "..") {
        return None;
    }
    std::fs::read(Path::new(CUSTOM_DIR).join(path))
        .ok()
        .or_else(|| FrontendAssets::get(path).map(|f| f.data.to_vec()))
}

/// 请求路径对应的资源；找不到时回退到 index.html
fn resolve_asset(path: &str) -> Option<(Vec<u8>, String)> {
    let path = path.trim_start_matches('/');
    if !path.is_empty()
        && let Some(data) = load_file(path)
    {
        return Some((data, path.to_string()));
    }
    load_file(INDEX).map(|data| (data, INDEX.to_string()))
}

pub async fn serve_frontend(req: HttpRequest) -> ActixResult<HttpResponse> {
    let tail = req.match_info().query("tail");

    let Some((data, file_path)) = resolve_asset(tail) else {
        return Ok(HttpResponse::NotFound()
            .content_type("text/html; charset=utf-8")
            .body(
                r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Virtual Lab</title></head>
<body>
    <h1>Frontend Not Found</h1>
    <p>The frontend assets have not been built or embedded.</p>
</body>
</html>"#,
            ));
    };

    let cache_control = if is_immutable_asset(&file_path) {
        "public, max-age=31536000, immutable"
    } else {
        "no-cache, no-store, must-revalidate"
    };

    Ok(HttpResponse::Ok()
        .content_type(get_mime_type(&file_path))
        .insert_header(("Cache-Control", cache_control))
        .body(data))
}

/// 所有未被 API 路由匹配的 GET 请求交给前端，并经过会话网关
pub fn configure_frontend_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/{tail:.*}")
            .wrap(SessionGate)
            .route(web::get().to(serve_frontend)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_mime_type() {
        assert_eq!(get_mime_type("index.html"), "text/html; charset=utf-8");
        assert_eq!(get_mime_type("wave.htm"), "text/html; charset=utf-8");
        assert_eq!(get_mime_type("style.css"), "text/css; charset=utf-8");
        assert_eq!(get_mime_type("images/a.webp"), "image/webp");
        assert_eq!(get_mime_type("unknown.xyz"), "application/octet-stream");
    }

    #[test]
    fn test_immutable_assets() {
        assert!(is_immutable_asset("assets/app-3f2a.js"));
        assert!(!is_immutable_asset("index.html"));
        assert!(!is_immutable_asset("favicon.ico"));
    }

    #[test]
    fn test_traversal_rejected() {
        assert!(load_file("../Cargo.toml").is_none());
        assert!(load_file("assets/../../Cargo.toml").is_none());
    }
}
