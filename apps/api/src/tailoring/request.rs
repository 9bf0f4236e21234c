//! Request Builder: turns an uploaded image and a job description into the
//! payload sent to the model. Pure; performs no I/O.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;
use tracing::debug;

use crate::tailoring::models::{JobDescription, ResumeImage, SupportedMediaType};
use crate::tailoring::prompts::tailor_prompt;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("Job description field '{0}' cannot be empty")]
    BlankField(&'static str),

    #[error("Unsupported media type: {0}. Supported types: image/jpeg, image/png, image/gif")]
    UnsupportedMediaType(String),
}

/// Everything the model call needs: one image and one prompt.
#[derive(Debug, Clone)]
pub struct RequestPayload {
    pub media_type: SupportedMediaType,
    pub image_base64: String,
    pub prompt: String,
}

/// Validates the inputs and assembles the model payload.
///
/// Job description fields are checked before the media type.
pub fn build(image: &ResumeImage, jd: &JobDescription) -> Result<RequestPayload, InvalidInput> {
    if let Some(field) = jd.first_blank_field() {
        return Err(InvalidInput::BlankField(field));
    }

    let media_type = SupportedMediaType::from_declared(&image.media_type)
        .ok_or_else(|| InvalidInput::UnsupportedMediaType(image.media_type.clone()))?;

    let image_base64 = STANDARD.encode(&image.bytes);
    let prompt = tailor_prompt(jd);

    debug!(
        "Built tailoring payload: media_type={}, image_base64_len={}, prompt_len={}",
        media_type.as_str(),
        image_base64.len(),
        prompt.len()
    );

    Ok(RequestPayload {
        media_type,
        image_base64,
        prompt,
    })
}
