use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sequence number assigned to a submission. Later submissions always get a
/// larger id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One in-flight submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub id: RequestId,
    pub query: String,
}

/// A non-empty URL or path naming a generated image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageReference(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    DataUrl,
    Remote,
    LocalPath,
}

impl ImageReference {
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn source(&self) -> ImageSource {
        let lower = self.0.trim_start().to_ascii_lowercase();
        if lower.starts_with("data:") {
            ImageSource::DataUrl
        } else if lower.starts_with("http://") || lower.starts_with("https://") {
            ImageSource::Remote
        } else {
            ImageSource::LocalPath
        }
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of one request, posted back into the controller's queue.
#[derive(Debug)]
pub struct Completion {
    pub request: GenerationRequest,
    pub outcome: Result<ImageReference>,
}

// Wire bodies exchanged with the generation service

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequestBody {
    pub query: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateResponseBody {
    #[serde(default)]
    pub img_url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponseBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_reference_rejects_empty() {
        assert!(ImageReference::new("").is_none());
        assert!(ImageReference::new("   ").is_none());
        assert_eq!(
            ImageReference::new("https://x/1.png").unwrap().as_str(),
            "https://x/1.png"
        );
    }

    #[test]
    fn test_image_source() {
        let data = ImageReference::new("data:image/png;base64,iVBORw0KGgo=").unwrap();
        let remote = ImageReference::new("HTTPS://mermaid.ink/img/Zmxvd2NoYXJ0").unwrap();
        let local = ImageReference::new("/tmp/out/1700000000.png").unwrap();
        assert_eq!(data.source(), ImageSource::DataUrl);
        assert_eq!(remote.source(), ImageSource::Remote);
        assert_eq!(local.source(), ImageSource::LocalPath);
    }

    #[test]
    fn test_response_body_tolerates_extra_fields() {
        let body: GenerateResponseBody = serde_json::from_str(
            r#"{"img_url":"https://x/1.png","message":"Flowchart generated successfully."}"#,
        )
        .unwrap();
        assert_eq!(body.img_url.as_deref(), Some("https://x/1.png"));

        let body: ErrorResponseBody =
            serde_json::from_str(r#"{"message":"Input query cannot be empty."}"#).unwrap();
        assert!(body.error.is_none());
        assert_eq!(body.message.as_deref(), Some("Input query cannot be empty."));
    }
}
