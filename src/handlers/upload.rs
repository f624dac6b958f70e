// src/handlers/upload.rs

use std::path::Path;

use axum::{
    Json,
    extract::{Multipart, State},
    response::IntoResponse,
};

use crate::{
    config::{Config, MAX_UPLOAD_FILES},
    error::AppError,
    models::upload::{UploadResponse, UploadedFile},
    utils::upload::{UPLOADS_PREFIX, random_file_name, resolve_public_path},
};

/// Stores profile pictures sent as multipart field `photos`.
///
/// * Each file gets a random name that keeps its extension.
/// * An optional `oldPath` field (e.g. `/uploads/old.png`) names the previous
///   picture, which is deleted once the new files are stored.
pub async fn upload_photos(
    State(config): State<Config>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let upload_dir = Path::new(&config.upload_dir);
    tokio::fs::create_dir_all(upload_dir).await?;

    let mut files = Vec::new();
    let mut old_path: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("photos") => {
                if files.len() >= MAX_UPLOAD_FILES {
                    return Err(AppError::BadRequest(format!(
                        "At most {} files per upload",
                        MAX_UPLOAD_FILES
                    )));
                }

                let originalname = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                let filename = random_file_name(&originalname);

                tokio::fs::write(upload_dir.join(&filename), &bytes)
                    .await
                    .map_err(|e| {
                        tracing::error!("Upload failed: {:?}", e);
                        AppError::InternalServerError("Upload failed".to_string())
                    })?;

                files.push(UploadedFile {
                    originalname,
                    size: bytes.len(),
                    path: format!("{}/{}", UPLOADS_PREFIX, filename),
                });
            }
            Some("oldPath") => {
                old_path = Some(field.text().await?).filter(|p| !p.is_empty());
            }
            _ => {}
        }
    }

    if let Some(old) = old_path {
        match resolve_public_path(upload_dir, &old) {
            Some(full) => match tokio::fs::remove_file(&full).await {
                Ok(()) => tracing::info!("Old file deleted: {}", old),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => tracing::error!("Failed to delete old file: {:?}", e),
            },
            None => tracing::warn!("Ignoring oldPath outside uploads: {}", old),
        }
    }

    Ok(Json(UploadResponse {
        message: "Files uploaded successfully!".to_string(),
        files,
    }))
}
