//! Axum route handlers for the Tailoring API.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;

use crate::errors::AppError;
use crate::state::AppState;
use crate::tailoring::models::{JobDescription, ResumeImage, TailoredResult};
use crate::tailoring::tailor;

const RESUME_PART: &str = "resume";
const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailorJsonRequest {
    pub image_base64: String,
    pub media_type: String,
    pub job_description: JobDescription,
}

/// POST /api/v1/tailor
///
/// Multipart form: a `resume` file part plus `title`, `company`, `description`
/// and `requirements` text parts. Unknown parts are ignored.
pub async fn handle_tailor(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TailoredResult>, AppError> {
    let mut image: Option<ResumeImage> = None;
    let mut title = None;
    let mut company = None;
    let mut description = None;
    let mut requirements = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            RESUME_PART => {
                let media_type = field
                    .content_type()
                    .unwrap_or(UNKNOWN_MEDIA_TYPE)
                    .to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                image = Some(ResumeImage::new(media_type, bytes));
            }
            "title" => title = Some(field.text().await.map_err(multipart_error)?),
            "company" => company = Some(field.text().await.map_err(multipart_error)?),
            "description" => description = Some(field.text().await.map_err(multipart_error)?),
            "requirements" => requirements = Some(field.text().await.map_err(multipart_error)?),
            _ => {}
        }
    }

    let image = image
        .filter(|i| !i.bytes.is_empty())
        .ok_or_else(|| AppError::Validation("A non-empty 'resume' image part is required".to_string()))?;

    let jd = JobDescription {
        title: title.unwrap_or_default(),
        company: company.unwrap_or_default(),
        description: description.unwrap_or_default(),
        requirements: requirements.unwrap_or_default(),
    };

    let result = tailor(state.model.as_ref(), &image, &jd).await?;
    Ok(Json(result))
}

/// POST /api/v1/tailor/json
///
/// Same operation for clients that already hold the image as base64.
pub async fn handle_tailor_json(
    State(state): State<AppState>,
    Json(request): Json<TailorJsonRequest>,
) -> Result<Json<TailoredResult>, AppError> {
    let bytes = STANDARD
        .decode(request.image_base64.trim())
        .map_err(|e| AppError::Validation(format!("imageBase64 is not valid base64: {e}")))?;

    if bytes.is_empty() {
        return Err(AppError::Validation("imageBase64 cannot be empty".to_string()));
    }

    let image = ResumeImage::new(request.media_type, bytes);
    let result = tailor(state.model.as_ref(), &image, &request.job_description).await?;
    Ok(Json(result))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(format!("Malformed multipart body: {}", e.body_text()))
    }
}
