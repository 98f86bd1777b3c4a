//! Meter photo intake
//!
//! Photos arrive base64-encoded in JSON bodies, optionally as a `data:` URL.
//! They are stored as-is in the `meter-photos` bucket, under the declared
//! content type and an extension derived from it.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::domain::{DomainError, DomainResult};

pub const METER_PHOTO_BUCKET: &str = "meter-photos";
/// Upper bound on a single photo, 10 MB
pub const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;
/// Assumed when a plain base64 photo comes without a content type
pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

/// Which end of the trip a photo documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoStage {
    Start,
    End,
}

impl PhotoStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

#[derive(Debug, Clone)]
pub struct MeterPhoto {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl MeterPhoto {
    /// Decode a base64 payload.
    ///
    /// A `data:<type>;base64,` prefix wins over `content_type`.
    pub fn from_base64(data: &str, content_type: Option<&str>) -> DomainResult<Self> {
        let (declared, payload) = match data.strip_prefix("data:") {
            Some(rest) => {
                let (meta, payload) = rest.split_once(',').ok_or_else(|| {
                    DomainError::Validation("Malformed data URL for photo".into())
                })?;
                let mime = meta.strip_suffix(";base64").unwrap_or(meta);
                (Some(mime), payload)
            }
            None => (content_type, data),
        };

        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| DomainError::Validation(format!("Photo is not valid base64: {}", e)))?;

        let photo = Self {
            content_type: declared
                .map(normalize_content_type)
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            bytes,
        };
        photo.validate()?;
        Ok(photo)
    }

    pub fn validate(&self) -> DomainResult<()> {
        if !self.content_type.starts_with("image/") {
            return Err(DomainError::Validation(
                "Please select an image file".into(),
            ));
        }
        if self.bytes.is_empty() {
            return Err(DomainError::Validation("Photo is empty".into()));
        }
        if self.bytes.len() > MAX_PHOTO_BYTES {
            return Err(DomainError::Validation(
                "Image size should be less than 10MB".into(),
            ));
        }
        Ok(())
    }

    /// File extension matching the content type, e.g. `jpg` for `image/jpeg`.
    pub fn extension(&self) -> String {
        let subtype = self
            .content_type
            .strip_prefix("image/")
            .unwrap_or_default();
        match subtype {
            "jpeg" | "jpg" | "pjpeg" => "jpg".to_string(),
            "svg+xml" => "svg".to_string(),
            other => {
                let ext: String = other
                    .chars()
                    .take_while(|c| c.is_ascii_alphanumeric())
                    .collect();
                if ext.is_empty() {
                    "img".to_string()
                } else {
                    ext
                }
            }
        }
    }
}

/// `Image/PNG; q=1` -> `image/png`
fn normalize_content_type(raw: &str) -> String {
    raw.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Object path of a meter photo: `<employee>/<stage>-<request>-<millis>.<ext>`.
pub fn photo_object_path(
    employee_id: &str,
    stage: PhotoStage,
    request_id: &str,
    millis: i64,
    extension: &str,
) -> String {
    format!(
        "{}/{}-{}-{}.{}",
        employee_id,
        stage.as_str(),
        request_id,
        millis,
        extension
    )
}
