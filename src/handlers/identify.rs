use crate::{AppError, AppState, Result};
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::models::IdentificationResult;
use crate::normalize::normalize;

const NO_IMAGE: &str = "no image";
const MISSING_API_KEY: &str = "set PLANT_ID_API_KEY in env";

pub async fn identify_plant(
    State(state): State<Arc<AppState>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<IdentificationResult>> {
    tracing::info!("Received identification request");

    let multipart = multipart.map_err(|e| {
        tracing::debug!("Identification request is not multipart: {}", e);
        AppError::BadRequest(NO_IMAGE.to_string())
    })?;

    let image = read_image(multipart, state.config.max_upload_size_mb)
        .await?
        .ok_or_else(|| AppError::BadRequest(NO_IMAGE.to_string()))?;

    let Some(client) = &state.plant_id else {
        return Err(AppError::Configuration(MISSING_API_KEY.to_string()));
    };

    tracing::info!("Identifying uploaded image ({} bytes)", image.len());

    let response = client.identify(&image).await?;
    let result = normalize(&response);

    tracing::info!(
        "Top suggestion: {} ({:?})",
        result.scientific_name.as_deref().unwrap_or("none"),
        result.probability
    );

    Ok(Json(result))
}

/// First non-empty `image` file part of the form, if any.
async fn read_image(mut multipart: Multipart, max_upload_mb: u64) -> Result<Option<Vec<u8>>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Failed to read form field", e, max_upload_mb))?
    {
        // Only file parts count, a plain text field named `image` is not an upload.
        if field.name() != Some("image") || field.file_name().is_none() {
            continue;
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error("Failed to read image", e, max_upload_mb))?;

        if !data.is_empty() {
            return Ok(Some(data.to_vec()));
        }
    }

    Ok(None)
}

fn multipart_error(context: &str, err: MultipartError, max_upload_mb: u64) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::UploadTooLarge(max_upload_mb);
    }

    tracing::error!("{}: {}", context, err);
    AppError::BadRequest(format!("{}: {}", context, err))
}
