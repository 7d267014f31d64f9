use campus_quest_test_helpers::configuration::{self, PLAYER_ID, PLAYER_TOKEN};
use reqwest::header::AUTHORIZATION;
use tracing::level_filters::LevelFilter;

use crate::common::logging::{tracing_stderr_init, INIT};
use crate::servers::api::asserts::{assert_ok, assert_unauthorized};
use crate::servers::api::contract::{register, sample_quest};
use crate::servers::api::Started;

#[tokio::test]
async fn should_authenticate_requests_with_a_bearer_token() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());

    register(&env, PLAYER_TOKEN, PLAYER_ID, "Player").await;

    let profile = assert_ok(env.client(PLAYER_TOKEN).get_profile().await).await;

    assert_eq!(profile["Name"], "Player");

    env.stop().await;
}

#[tokio::test]
async fn should_not_authenticate_requests_without_a_token() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());

    let response = env.anonymous_client().create_quest(&sample_quest()).await;

    assert_unauthorized(response).await;

    env.stop().await;
}

#[tokio::test]
async fn should_not_authenticate_requests_with_an_unknown_token() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());

    let response = env.client("INVALID TOKEN").get_profile().await;

    assert_unauthorized(response).await;

    env.stop().await;
}

#[tokio::test]
async fn should_not_authenticate_requests_with_another_scheme() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());

    let response = reqwest::Client::new()
        .get(format!("http://{}/users/profile", env.bind_address()))
        .header(AUTHORIZATION, format!("Basic {PLAYER_TOKEN}"))
        .send()
        .await
        .unwrap();

    assert_unauthorized(response).await;

    env.stop().await;
}

#[tokio::test]
async fn should_allow_public_endpoints_without_a_token() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());

    let client = env.anonymous_client();

    assert_ok(client.get_quests().await).await;
    assert_ok(client.get_leaderboard("").await).await;
    assert_ok(client.health_check().await).await;

    env.stop().await;
}
