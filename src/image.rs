use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::GenericImageView;
use thiserror::Error;

use crate::error::ApiError;
use crate::storage::{ObjectStore, ObjectStoreError};

/// Upload ceiling, enforced while the multipart field streams in and again
/// before normalization.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
/// Bounding box for normalized images. Inputs already inside it are never
/// upscaled.
pub const MAX_DIMENSION: u32 = 1200;
const JPEG_QUALITY: u8 = 80;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("not an image")]
    Unsupported,
    #[error("image exceeds {MAX_UPLOAD_BYTES} bytes")]
    TooLarge,
    #[error("undecodable image payload")]
    Decode,
    #[error("object store: {0}")]
    Store(String),
}

impl From<UploadError> for ApiError {
    fn from(e: UploadError) -> Self {
        match e {
            UploadError::Unsupported => ApiError::UnsupportedMedia,
            UploadError::TooLarge => ApiError::PayloadTooLarge,
            UploadError::Decode => ApiError::UnprocessableImage,
            UploadError::Store(cause) => {
                log::error!("image store failure: {cause}");
                ApiError::Dependency
            }
        }
    }
}

/// Decode, fit into the bounding box, and re-encode as JPEG.
///
/// Alpha is flattened since the target format has none. Decode failure is
/// terminal and reported to the caller, never retried.
pub fn normalize(bytes: &[u8]) -> Result<Vec<u8>, UploadError> {
    let img = image::load_from_memory(bytes).map_err(|_| UploadError::Decode)?;
    let (w, h) = img.dimensions();
    let img = if w > MAX_DIMENSION || h > MAX_DIMENSION {
        img.resize(MAX_DIMENSION, MAX_DIMENSION, FilterType::Lanczos3)
    } else {
        img
    };
    let rgb = img.to_rgb8();
    let mut out = Vec::new();
    let mut enc = JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
    enc.encode_image(&rgb).map_err(|_| UploadError::Decode)?;
    Ok(out)
}

/// Full pipeline for one upload: validate, normalize, name, store.
///
/// The stored name is a random UUID with the fixed target extension, so
/// client-supplied file names never reach storage and collisions are
/// practically impossible (and still treated as failure, not overwrite).
pub async fn process_upload(
    objects: &dyn ObjectStore,
    bytes: &[u8],
) -> Result<String, UploadError> {
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge);
    }
    let is_image = infer::get(bytes)
        .map(|t| t.mime_type().starts_with("image/"))
        .unwrap_or(false);
    if !is_image {
        return Err(UploadError::Unsupported);
    }
    let jpeg = normalize(bytes)?;
    let name = format!("{}.jpg", uuid::Uuid::new_v4());
    match objects.put(&name, "image/jpeg", &jpeg).await {
        Ok(url) => Ok(url),
        Err(ObjectStoreError::Collision) => {
            Err(UploadError::Store(format!("key collision on {name}")))
        }
        Err(e) => Err(UploadError::Store(e.to_string())),
    }
}
