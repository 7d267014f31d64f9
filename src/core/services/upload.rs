//! Image upload service.
//!
//! Uploaded images are validated and written to the [`BlobStore`] under
//! `images/<user id>/<uuid>.<ext>`. Nothing else is touched, so a failed
//! upload leaves no partial state in the document store.
//!
//! The extension is derived from the content type, never from the client's
//! file name, because the blob directory is served with a content type
//! guessed from the extension. Only raster formats are accepted: an SVG can
//! carry script.
use url::Url;
use uuid::Uuid;

use crate::core::blobs::BlobStore;
use crate::core::error::Error;
use crate::core::users::user::UserId;

/// A file received from a client.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// It validates and stores an uploaded image, returning its public URL.
///
/// # Errors
///
/// Will return:
///
/// - `Error::UnsupportedFileType` if the content type is not one of the
///   accepted image formats.
/// - `Error::NoFileUploaded` if the file is empty.
/// - `Error::FileTooLarge` if it exceeds `max_upload_size`.
/// - `Error::Blob` if the blob store fails.
pub async fn upload_image(
    blobs: &dyn BlobStore,
    user_id: &UserId,
    upload: ImageUpload,
    max_upload_size: usize,
) -> Result<Url, Error> {
    let content_type = upload.content_type.clone().unwrap_or_default();

    let Some(extension) = extension(&content_type) else {
        return Err(Error::UnsupportedFileType { content_type });
    };

    if upload.bytes.is_empty() {
        return Err(Error::NoFileUploaded);
    }

    if upload.bytes.len() > max_upload_size {
        return Err(Error::FileTooLarge { max_upload_size });
    }

    let path = format!(
        "images/{}/{}.{}",
        path_segment(user_id.as_str()),
        Uuid::new_v4().simple(),
        extension
    );

    Ok(blobs.put(path, upload.bytes).await?)
}

/// User ids come from the identity verifier; keep only characters that are
/// safe in a single path segment.
fn path_segment(value: &str) -> String {
    let segment: String = value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();

    if segment.is_empty() {
        "_".to_string()
    } else {
        segment
    }
}

/// Parameters such as `; charset=binary` are ignored.
fn extension(content_type: &str) -> Option<&'static str> {
    let mime = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();

    match mime.as_str() {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}
