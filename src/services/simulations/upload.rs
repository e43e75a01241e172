//! 仿真页面与图片上传，以及已上传文件的读取

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};
use futures_util::StreamExt;
use futures_util::TryStreamExt;
use std::path::{Component, Path, PathBuf};
use tracing::{error, info};

use super::SimulationService;
use crate::config::AppConfig;
use crate::errors::VLabError;
use crate::models::{
    ApiResponse, ErrorCode,
    simulations::{
        entities::UploadKind,
        responses::{UploadConfigResponse, UploadKindConfig, UploadResponse},
    },
};
use crate::routes::frontend::get_mime_type;
use crate::services::{activity::ActivityLogger, bad_request};
use crate::utils::upload_name::{split_extension, stored_file_name};
use crate::utils::validate_magic_bytes;

const MAX_TYPE_FIELD_LEN: usize = 32;

fn kind_max_size(kind: UploadKind, config: &AppConfig) -> usize {
    match kind {
        UploadKind::Simulation => config.upload.max_size,
        UploadKind::Image => config.upload.max_image_size.min(config.upload.max_size),
    }
}

pub async fn upload_config() -> ActixResult<HttpResponse> {
    let config = AppConfig::get();
    let kinds = UploadKind::ALL
        .iter()
        .map(|kind| UploadKindConfig {
            kind: *kind,
            extensions: kind.allowed_extensions().iter().map(|s| s.to_string()).collect(),
            mime_types: kind.allowed_mime_types().iter().map(|s| s.to_string()).collect(),
            max_size: kind_max_size(*kind, config),
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UploadConfigResponse {
            kinds,
            max_size: config.upload.max_size,
        },
        "Upload configuration retrieved successfully",
    )))
}

/// 校验文件名、MIME、大小与魔术字节，返回小写扩展名
pub fn validate_upload(
    kind: UploadKind,
    file_name: &str,
    content_type: &str,
    data: &[u8],
    max_size: usize,
) -> Result<String, (ErrorCode, String)> {
    let (_, extension) = split_extension(file_name);
    let Some(extension) = extension.filter(|ext| kind.allowed_extensions().contains(&ext.as_str()))
    else {
        return Err((
            ErrorCode::FileTypeNotAllowed,
            format!(
                "File extension not allowed for {kind}, expected one of: {}",
                kind.allowed_extensions().join(", ")
            ),
        ));
    };
    if !kind.accepts_mime(content_type) {
        return Err((
            ErrorCode::FileTypeNotAllowed,
            format!("Content type '{content_type}' is not allowed for {kind}"),
        ));
    }
    if data.is_empty() {
        return Err((ErrorCode::FileNotFound, "Uploaded file is empty".to_string()));
    }
    if data.len() > max_size {
        return Err((
            ErrorCode::FileSizeExceeded,
            format!("File size exceeds the limit of {max_size} bytes"),
        ));
    }
    if !validate_magic_bytes(data, &extension) {
        return Err((
            ErrorCode::FileTypeNotAllowed,
            "File content does not match its extension".to_string(),
        ));
    }
    Ok(extension)
}

pub async fn handle_upload(
    service: &SimulationService,
    req: &HttpRequest,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let config = AppConfig::get();
    let overall_max = config.upload.max_size;

    let mut kind_field: Option<String> = None;
    let mut file: Option<(String, String, Vec<u8>)> = None;

    while let Ok(Some(mut field)) = payload.try_next().await {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        match name.as_str() {
            "type" => {
                let mut value = Vec::new();
                while let Some(chunk) = field.next().await {
                    let data = chunk?;
                    if value.len() + data.len() > MAX_TYPE_FIELD_LEN {
                        return Ok(bad_request(ErrorCode::BadRequest, "Invalid upload type"));
                    }
                    value.extend_from_slice(&data);
                }
                kind_field = Some(String::from_utf8_lossy(&value).trim().to_string());
            }
            "file" => {
                if file.is_some() {
                    return Ok(bad_request(
                        ErrorCode::MultifileUploadNotAllowed,
                        "Only one file can be uploaded at a time",
                    ));
                }
                let original_name = content_disposition
                    .and_then(|cd| cd.get_filename())
                    .map(|s| s.to_string())
                    .unwrap_or_default();
                let content_type = field
                    .content_type()
                    .map(|ct| ct.to_string())
                    .unwrap_or_default();

                let mut data = Vec::new();
                while let Some(chunk) = field.next().await {
                    let chunk = chunk?;
                    if data.len() + chunk.len() > overall_max {
                        return Ok(bad_request(
                            ErrorCode::FileSizeExceeded,
                            "File size exceeds the limit",
                        ));
                    }
                    data.extend_from_slice(&chunk);
                }
                file = Some((original_name, content_type, data));
            }
            // 其余字段忽略
            _ => while field.next().await.is_some() {},
        }
    }

    let Some((original_name, content_type, data)) = file else {
        return Ok(bad_request(
            ErrorCode::FileNotFound,
            "No file found in upload payload",
        ));
    };
    let kind = match kind_field.as_deref().map(str::parse::<UploadKind>) {
        Some(Ok(kind)) => kind,
        _ => {
            return Ok(bad_request(
                ErrorCode::BadRequest,
                "Field 'type' must be 'simulation' or 'image'",
            ));
        }
    };

    let extension = match validate_upload(
        kind,
        &original_name,
        &content_type,
        &data,
        kind_max_size(kind, config),
    ) {
        Ok(extension) => extension,
        Err((code, msg)) => return Ok(bad_request(code, msg)),
    };

    let (stem, _) = split_extension(&original_name);
    let stored_name = stored_file_name(stem, &extension, chrono::Utc::now().timestamp_millis());
    let target_dir = Path::new(&config.upload.dir).join(kind.directory());
    let target = target_dir.join(&stored_name);

    let write_result = std::fs::create_dir_all(&target_dir).and_then(|_| std::fs::write(&target, &data));
    if let Err(e) = write_result {
        error!("{}", VLabError::file_operation(format!("{}: {e}", target.display())));
        return Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::FileUploadFailed,
                "Failed to store uploaded file",
            )),
        );
    }

    let url = format!("/uploads/{}/{}", kind.directory(), stored_name);
    info!("Stored {} upload {} ({} bytes)", kind, url, data.len());

    let storage = service.get_storage(req);
    let entry = ActivityLogger::entry(req, "simulation.upload")
        .resource_type("upload")
        .details(serde_json::json!({
            "kind": kind,
            "url": url,
            "original_name": original_name,
            "size": data.len(),
        }));
    ActivityLogger::log(storage.as_ref(), entry).await;

    Ok(HttpResponse::Created().json(ApiResponse::success(
        UploadResponse {
            url,
            file_name: stored_name,
            size: data.len(),
            content_type,
        },
        "File uploaded successfully",
    )))
}

/// 上传目录下的相对路径；含 `..`、绝对路径或反斜杠时返回 None
pub fn resolve_upload_path(upload_dir: &str, tail: &str) -> Option<PathBuf> {
    if tail.is_empty() || tail.contains('\\') || tail.contains('\0') {
        return None;
    }
    let relative = Path::new(tail);
    if !relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        return None;
    }
    Some(Path::new(upload_dir).join(relative))
}

pub async fn serve_upload(req: HttpRequest) -> ActixResult<HttpResponse> {
    let tail = req.match_info().query("tail");
    let config = AppConfig::get();

    let Some(path) = resolve_upload_path(&config.upload.dir, tail) else {
        return Ok(bad_request(ErrorCode::BadRequest, "Invalid file path"));
    };

    match std::fs::read(&path) {
        Ok(data) => Ok(HttpResponse::Ok()
            .content_type(get_mime_type(tail))
            .insert_header((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
            .insert_header((header::CACHE_CONTROL, "public, max-age=3600"))
            .body(data)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::FileNotFound, "File not found"))),
        Err(e) => {
            error!("{}", VLabError::file_operation(format!("{}: {e}", path.display())));
            Ok(HttpResponse::NotFound()
                .json(ApiResponse::error_empty(ErrorCode::FileNotFound, "File not found")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x01];

    #[test]
    fn test_validate_image_upload() {
        assert_eq!(
            validate_upload(UploadKind::Image, "Photo.PNG", "image/png", PNG, 1024),
            Ok(".png".to_string())
        );
        let err = validate_upload(UploadKind::Image, "photo.png", "text/html", PNG, 1024)
            .unwrap_err();
        assert_eq!(err.0, ErrorCode::FileTypeNotAllowed);
        let err = validate_upload(UploadKind::Image, "photo.jpg", "image/jpeg", PNG, 1024)
            .unwrap_err();
        assert_eq!(err.0, ErrorCode::FileTypeNotAllowed);
        let err = validate_upload(UploadKind::Image, "photo.png", "image/png", PNG, 4)
            .unwrap_err();
        assert_eq!(err.0, ErrorCode::FileSizeExceeded);
    }

    #[test]
    fn test_validate_simulation_upload() {
        let html = b"<!doctype html><html></html>";
        assert!(validate_upload(UploadKind::Simulation, "wave.htm", "text/html", html, 1024).is_ok());
        assert!(
            validate_upload(UploadKind::Simulation, "wave.png", "text/html", html, 1024).is_err()
        );
        assert!(
            validate_upload(UploadKind::Simulation, "wave.html", "text/html", b"", 1024).is_err()
        );
    }

    #[test]
    fn test_resolve_upload_path() {
        assert_eq!(
            resolve_upload_path("uploads", "images/a.png"),
            Some(PathBuf::from("uploads/images/a.png"))
        );
        assert_eq!(resolve_upload_path("uploads", "../secret.txt"), None);
        assert_eq!(resolve_upload_path("uploads", "images/../../x"), None);
        assert_eq!(resolve_upload_path("uploads", "/etc/passwd"), None);
        assert_eq!(resolve_upload_path("uploads", "images\\..\\x"), None);
        assert_eq!(resolve_upload_path("uploads", ""), None);
    }
}
