use base64::Engine;
use image::ImageFormat;
use reqwest::multipart::Part;
use std::path::Path;

use crate::services::client::ApiError;

/// Upload size limit shared by diagnosis, community and diary images (10 MiB).
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// MIME types the backend accepts for uploads.
pub const ACCEPTED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// An image that passed client-side checks and can be attached to a request.
///
/// The only way to build one is through validation, so every upload the
/// services send is already known to be JPEG, PNG or WEBP and within
/// [`MAX_IMAGE_BYTES`].
#[derive(Debug, Clone)]
pub struct ImageUpload {
    file_name: String,
    bytes: Vec<u8>,
    format: ImageFormat,
}

impl ImageUpload {
    /// Validate raw bytes, sniffing the format from the content.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ValidationError> {
        let format = validate_image(&bytes, None)?;
        Ok(Self {
            file_name: file_name.into(),
            bytes,
            format,
        })
    }

    /// Validate bytes against the MIME type the picker reported as well.
    pub fn with_declared_type(
        file_name: impl Into<String>,
        bytes: Vec<u8>,
        declared_mime: &str,
    ) -> Result<Self, ValidationError> {
        let format = validate_image(&bytes, Some(declared_mime))?;
        Ok(Self {
            file_name: file_name.into(),
            bytes,
            format,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, ValidationError> {
        let size = std::fs::metadata(path)?.len();
        if size > MAX_IMAGE_BYTES as u64 {
            return Err(ValidationError::TooLarge {
                size: size as usize,
                max: MAX_IMAGE_BYTES,
            });
        }

        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        Self::new(file_name, bytes)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    /// Multipart part carrying the file name and MIME type.
    pub fn to_part(&self) -> Result<Part, ApiError> {
        Part::bytes(self.bytes.clone())
            .file_name(self.file_name.clone())
            .mime_str(self.mime_type())
            .map_err(ApiError::Http)
    }

    /// `data:` URL for previews.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type(),
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// Check size and format before anything touches the network.
pub fn validate_image(
    bytes: &[u8],
    declared_mime: Option<&str>,
) -> Result<ImageFormat, ValidationError> {
    if bytes.is_empty() {
        return Err(ValidationError::Empty);
    }

    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(ValidationError::TooLarge {
            size: bytes.len(),
            max: MAX_IMAGE_BYTES,
        });
    }

    if let Some(mime) = declared_mime {
        if !ACCEPTED_MIME_TYPES.contains(&mime) {
            return Err(ValidationError::UnsupportedType(mime.to_string()));
        }
    }

    let format = image::guess_format(bytes)
        .map_err(|_| ValidationError::UnsupportedType("unrecognized image data".to_string()))?;

    match format {
        ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::WebP => Ok(format),
        other => Err(ValidationError::UnsupportedType(
            other.to_mime_type().to_string(),
        )),
    }
}

/// Enforce the per-post (or per-entry) image cap.
pub fn check_image_count(count: usize, max: usize) -> Result<(), ValidationError> {
    if count > max {
        return Err(ValidationError::TooManyImages { count, max });
    }
    Ok(())
}

/// Kept image URLs travel as a JSON-array string in the `existing_images`
/// multipart field.
pub(crate) fn encode_image_urls(urls: &[String]) -> Result<String, ValidationError> {
    serde_json::to_string(urls).map_err(ValidationError::Encode)
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Image file is empty")]
    Empty,

    #[error("Image is {size} bytes; uploads are limited to {max} bytes")]
    TooLarge { size: usize, max: usize },

    #[error("Only JPG, PNG and WEBP images are supported (got {0})")]
    UnsupportedType(String),

    #[error("At most {max} images are allowed (got {count})")]
    TooManyImages { count: usize, max: usize },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to encode request field: {0}")]
    Encode(serde_json::Error),

    #[error("Invalid form: {0}")]
    Form(#[from] garde::Report),

    #[error("Failed to read image: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of a validate-then-send call.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl From<garde::Report> for SubmitError {
    fn from(report: garde::Report) -> Self {
        SubmitError::Invalid(ValidationError::Form(report))
    }
}
