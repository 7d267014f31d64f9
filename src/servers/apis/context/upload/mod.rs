//! Upload API context.
//!
//! Images are uploaded before they are referenced by a quest or a
//! submission. The returned URL is what clients put in `imageUrl`.
//!
//! # Upload an image
//!
//! `POST /upload/image` (auth), a `multipart/form-data` body with one file
//! field named `image`:
//!
//! ```bash
//! curl -X POST http://127.0.0.1:3000/upload/image \
//!   -H "Authorization: Bearer PlayerToken" \
//!   -F "image=@clock.png;type=image/png"
//! ```
//!
//! **Example response** `200`
//!
//! ```json
//! {
//!   "message": "Image uploaded",
//!   "imageUrl": "http://127.0.0.1:3000/blobs/images/u1/5f0c1c3e9b0c4f7e8f0a1b2c3d4e5f60.png"
//! }
//! ```
//!
//! Response | Reason
//! ---|---
//! `400` | No `image` field, the file is empty, it is not a JPEG, PNG, GIF or WebP image, or it exceeds `http_api.max_upload_size`.
//! `401` | Missing or invalid credential.
//! `500` | The blob store failed, with `{"error": "Failed to upload image"}`.
pub mod handlers;
pub mod routes;
