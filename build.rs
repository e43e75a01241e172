use std::env;
use std::fs;
use std::path::Path;

// 前端产物未构建时生成占位页面，保证 rust-embed 目录存在
fn main() {
    println!("cargo:rerun-if-changed=frontend/dist");

    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    let dist_path = Path::new(&manifest_dir).join("frontend/dist");

    if !dist_path.join("index.html").exists() {
        println!("cargo:warning=frontend/dist not found, embedding placeholder pages");
        write_placeholder(&dist_path);
    }
}

fn write_placeholder(dist_path: &Path) {
    fs::create_dir_all(dist_path.join("assets")).expect("Failed to create dist directory");

    let index_html = r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>虚拟实验室</title>
    <style>
        body { font-family: system-ui, sans-serif; max-width: 640px; margin: 80px auto; padding: 20px; }
        .notice { background: #eef6ff; border: 1px solid #b6d4fe; padding: 16px 20px; border-radius: 8px; }
        code { background: #f1f3f4; padding: 2px 6px; border-radius: 4px; }
    </style>
</head>
<body>
    <h1>虚拟实验室</h1>
    <div class="notice">
        <p>页面资源尚未构建，API 服务可正常使用。</p>
        <p>构建前端：<code>cd frontend && bun install && bun run build</code></p>
        <p><a href="/auth/login">登录</a> · <a href="/api/public/simulations">公开仿真列表</a></p>
    </div>
</body>
</html>"#;

    fs::write(dist_path.join("index.html"), index_html).expect("Failed to write index.html");
    fs::write(dist_path.join("favicon.ico"), []).expect("Failed to write favicon.ico");
}
