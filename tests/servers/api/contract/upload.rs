use campus_quest_test_helpers::configuration::{self, PLAYER_TOKEN};
use reqwest::multipart::{Form, Part};
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::common::logging::{tracing_stderr_init, INIT};
use crate::servers::api::asserts::{assert_bad_request, assert_ok, assert_unauthorized};
use crate::servers::api::Started;

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 1, 2, 3, 4];

fn image_form(field: &str, mime: &str, bytes: &[u8]) -> Form {
    named_image_form(field, "clock.png", mime, bytes)
}

fn named_image_form(field: &str, file_name: &str, mime: &str, bytes: &[u8]) -> Form {
    let part = Part::bytes(bytes.to_vec())
        .file_name(file_name.to_string())
        .mime_str(mime)
        .unwrap();

    Form::new().part(field.to_string(), part)
}

#[tokio::test]
async fn should_store_an_image_and_serve_it_at_the_returned_url() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());

    let body = assert_ok(env.client(PLAYER_TOKEN).upload_image(image_form("image", "image/png", PNG_BYTES)).await).await;

    assert_eq!(body["message"], "Image uploaded");

    let image_url = Url::parse(body["imageUrl"].as_str().unwrap()).unwrap();
    assert!(image_url.path().starts_with("/blobs/images/u1/"));
    assert!(image_url.path().ends_with(".png"));

    let download = env.anonymous_client().get_path(image_url.path()).await;
    assert_eq!(download.status(), 200);
    assert_eq!(download.bytes().await.unwrap().as_ref(), PNG_BYTES);

    env.stop().await;
}

#[tokio::test]
async fn should_serve_an_image_with_an_html_file_name_as_an_image() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());

    let form = named_image_form("image", "evil.html", "image/png", b"<script>alert(1)</script>");

    let body = assert_ok(env.client(PLAYER_TOKEN).upload_image(form).await).await;

    let image_url = Url::parse(body["imageUrl"].as_str().unwrap()).unwrap();
    assert!(image_url.path().ends_with(".png"));

    let download = env.anonymous_client().get_path(image_url.path()).await;
    assert_eq!(download.status(), 200);
    assert_eq!(download.headers().get("content-type").unwrap(), "image/png");

    env.stop().await;
}

#[tokio::test]
async fn should_refuse_svg_images() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());

    let form = named_image_form("image", "logo.svg", "image/svg+xml", b"<svg onload=\"alert(1)\"/>");

    assert_bad_request(env.client(PLAYER_TOKEN).upload_image(form).await).await;

    env.stop().await;
}

#[tokio::test]
async fn should_only_accept_images() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());

    let response = env
        .client(PLAYER_TOKEN)
        .upload_image(image_form("image", "text/plain", b"not an image"))
        .await;

    assert_bad_request(response).await;

    env.stop().await;
}

#[tokio::test]
async fn should_require_a_field_named_image() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());

    let response = env
        .client(PLAYER_TOKEN)
        .upload_image(image_form("file", "image/png", PNG_BYTES))
        .await;

    let body = assert_bad_request(response).await;
    assert_eq!(body["error"], "No file uploaded");

    env.stop().await;
}

#[tokio::test]
async fn should_not_accept_files_over_the_upload_limit() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral_with_max_upload_size(8).into());

    assert_eq!(env.config.http_api.max_upload_size, 8);

    let response = env
        .client(PLAYER_TOKEN)
        .upload_image(image_form("image", "image/png", PNG_BYTES))
        .await;

    assert_bad_request(response).await;

    env.stop().await;
}

#[tokio::test]
async fn should_not_accept_uploads_from_anonymous_users() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());

    let response = env
        .anonymous_client()
        .upload_image(image_form("image", "image/png", PNG_BYTES))
        .await;

    assert_unauthorized(response).await;

    env.stop().await;
}
