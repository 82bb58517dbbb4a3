//! Image upload handler
//!
//! Staff upload menu item photos here. Files land under the work
//! directory's uploads/ tree and are served back by the static route.

use std::fs;
use std::path::PathBuf;

use axum::Json;
use axum::extract::{Multipart, State};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// Maximum file size (5MB)
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub filename: String,
    pub size: usize,
    pub url: String,
}

fn validate_image(data: &[u8], ext: &str) -> Result<(), AppError> {
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::validation(format!(
            "File too large. Maximum size is {}MB",
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }

    let ext_lower = ext.to_lowercase();
    if !SUPPORTED_FORMATS.contains(&ext_lower.as_str()) {
        return Err(AppError::validation(format!(
            "Unsupported file format '{}'. Supported: {}",
            ext_lower,
            SUPPORTED_FORMATS.join(", ")
        )));
    }

    // The extension alone proves nothing, decode to be sure
    image::load_from_memory(data)
        .map_err(|e| AppError::validation(format!("Invalid image file ({ext_lower}): {e}")))?;

    Ok(())
}

/// POST /api/upload - multipart upload, field name "image"
pub async fn upload(
    State(state): State<ServerState>,
    _admin: AdminUser,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let uploads_dir = state.config.uploads_dir();
    fs::create_dir_all(&uploads_dir)
        .map_err(|e| AppError::internal(format!("Failed to create uploads directory: {e}")))?;

    let mut field_data: Option<Vec<u8>> = None;
    let mut original_filename = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart request: {e}")))?
    {
        if field.name() == Some("image") {
            original_filename = field.file_name().map(|s| s.to_string());
            field_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
                    .to_vec(),
            );
            break;
        }
    }

    let data = field_data
        .ok_or_else(|| AppError::validation("No 'image' field found in upload"))?;
    let filename = original_filename
        .ok_or_else(|| AppError::validation("No filename provided in image field"))?;

    if data.is_empty() {
        return Err(AppError::validation("Empty file provided"));
    }

    let ext = PathBuf::from(&filename)
        .extension()
        .and_then(|ext| ext.to_str().map(|s| s.to_lowercase()))
        .ok_or_else(|| AppError::validation(format!("Invalid file extension for: {filename}")))?;

    validate_image(&data, &ext)?;

    let stored_name = format!("{}.{}", Uuid::new_v4(), ext);
    let file_path = uploads_dir.join(&stored_name);
    fs::write(&file_path, &data)
        .map_err(|e| AppError::internal(format!("Failed to save file: {e}")))?;

    tracing::info!(
        original_name = %filename,
        stored_name = %stored_name,
        size = data.len(),
        "Image uploaded"
    );

    Ok(Json(UploadResponse {
        url: format!("/uploads/{stored_name}"),
        filename: stored_name,
        size: data.len(),
    }))
}
