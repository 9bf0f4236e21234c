use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// The job a resume is being tailored for. All four fields are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescription {
    pub title: String,
    pub company: String,
    pub description: String,
    pub requirements: String,
}

impl JobDescription {
    /// Returns the name of the first blank field, checked in declaration order.
    pub fn first_blank_field(&self) -> Option<&'static str> {
        [
            ("title", &self.title),
            ("company", &self.company),
            ("description", &self.description),
            ("requirements", &self.requirements),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }
}

/// Image media types the upstream model accepts. WebP is deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportedMediaType {
    Jpeg,
    Png,
    Gif,
}

impl SupportedMediaType {
    /// Matches a declared media type against the allow-list.
    /// Case-insensitive; parameters after `;` are ignored.
    pub fn from_declared(declared: &str) -> Option<Self> {
        let essence = declared.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/gif" => Some(Self::Gif),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
        }
    }
}

/// An uploaded resume image. The declared media type is kept exactly as the
/// uploader supplied it; the request builder decides whether it is acceptable.
#[derive(Debug, Clone)]
pub struct ResumeImage {
    pub media_type: String,
    pub bytes: Bytes,
}

impl ResumeImage {
    pub fn new(media_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }
}

/// The normalized answer handed back to the caller.
///
/// All four fields are always present, whatever the model returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailoredResult {
    pub suggestions: Vec<String>,
    pub keywords_to_add: Vec<String>,
    pub skills_to_highlight: Vec<String>,
    pub updated_content: String,
}
