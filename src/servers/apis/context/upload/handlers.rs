//! API handlers for the [`upload`](crate::servers::apis::context::upload) API context.
use std::sync::Arc;

use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Extension;
use serde::Serialize;
use url::Url;

use crate::core::error::Error;
use crate::core::services::upload::ImageUpload;
use crate::core::Campus;
use crate::servers::apis::middlewares::auth::Caller;
use crate::servers::apis::responses::{bad_request_response, error_response, ok_response};

/// The name of the multipart field with the file.
pub const IMAGE_FIELD: &str = "image";

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ImageUploaded<'a> {
    pub message: &'a str,
    pub image_url: &'a Url,
}

/// It handles the upload of an image to the blob store.
///
/// Refer to the [API endpoint documentation](crate::servers::apis::context::upload#upload-an-image)
/// for more information about this endpoint.
pub async fn upload_image_handler(
    State(campus): State<Arc<Campus>>,
    Extension(Caller(caller)): Extension<Caller>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => return bad_request_response(&Error::NoFileUploaded.to_string(), Some(rejection.body_text())),
    };

    let upload = match read_image_field(multipart, campus.max_upload_size()).await {
        Ok(upload) => upload,
        Err(err) => return error_response(&err),
    };

    match campus.upload_image(&caller, upload).await {
        Ok(image_url) => ok_response(&ImageUploaded {
            message: "Image uploaded",
            image_url: &image_url,
        }),
        Err(err) => error_response(&err),
    }
}

/// It reads the first field named `image`, skipping any other field.
async fn read_image_field(mut multipart: Multipart, max_upload_size: usize) -> Result<ImageUpload, Error> {
    let too_large = |err: &MultipartError| err.status() == StatusCode::PAYLOAD_TOO_LARGE;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Err(Error::NoFileUploaded),
            Err(err) if too_large(&err) => return Err(Error::FileTooLarge { max_upload_size }),
            Err(_) => return Err(Error::NoFileUploaded),
        };

        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(ToOwned::to_owned);
        let content_type = field.content_type().map(ToOwned::to_owned);

        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(err) if too_large(&err) => return Err(Error::FileTooLarge { max_upload_size }),
            Err(_) => return Err(Error::NoFileUploaded),
        };

        return Ok(ImageUpload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }
}
