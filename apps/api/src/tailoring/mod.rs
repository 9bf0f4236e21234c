//! Resume tailoring: build the request, call the model, normalize the answer.
//!
//! Flow: request::build → TailorModel::complete → normalizer::normalize.
//! The model is the only async step; building and normalizing are pure.

pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod prompts;
pub mod request;

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::{ImageInput, LlmClient, LlmError};
use crate::tailoring::models::{JobDescription, ResumeImage, TailoredResult};
use crate::tailoring::normalizer::normalize;
use crate::tailoring::request::{build, RequestPayload};

/// The model behind a tailoring request. Returns the raw text the model produced.
///
/// Carried in `AppState` as `Arc<dyn TailorModel>`.
#[async_trait]
pub trait TailorModel: Send + Sync {
    async fn complete(&self, payload: &RequestPayload) -> Result<String, LlmError>;
}

#[async_trait]
impl TailorModel for LlmClient {
    async fn complete(&self, payload: &RequestPayload) -> Result<String, LlmError> {
        let image = ImageInput {
            media_type: payload.media_type.as_str(),
            data: &payload.image_base64,
        };
        self.raw_text(image, &payload.prompt).await
    }
}

/// Tailors one resume against one job description.
///
/// Invalid input is rejected before the model is called. A transport failure
/// means there is no raw text, so the normalizer never runs.
pub async fn tailor(
    model: &dyn TailorModel,
    image: &ResumeImage,
    jd: &JobDescription,
) -> Result<TailoredResult, AppError> {
    let request_id = Uuid::new_v4();

    let payload = build(image, jd).map_err(|e| {
        warn!(%request_id, "Rejected tailoring request: {e}");
        AppError::from(e)
    })?;

    info!(
        %request_id,
        "Tailoring resume for '{}' at '{}' ({})",
        jd.title,
        jd.company,
        payload.media_type.as_str()
    );

    let raw = model
        .complete(&payload)
        .await
        .map_err(|e| AppError::Llm(format!("Resume tailoring failed: {e}")))?;

    let result = normalize(&raw);
    info!(
        %request_id,
        "Tailoring complete: {} suggestions, {} keywords, {} skills",
        result.suggestions.len(),
        result.keywords_to_add.len(),
        result.skills_to_highlight.len()
    );

    Ok(result)
}
