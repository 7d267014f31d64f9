use campus_quest_test_helpers::configuration::{self, CREATOR_ID, CREATOR_TOKEN, OTHER_PLAYER_ID, OTHER_PLAYER_TOKEN, PLAYER_ID, PLAYER_TOKEN};
use serde_json::{json, Value};
use tracing::level_filters::LevelFilter;

use crate::common::logging::{tracing_stderr_init, INIT};
use crate::servers::api::asserts::{assert_bad_request, assert_forbidden, assert_not_found, assert_ok};
use crate::servers::api::contract::{create_sample_quest, register, register_everybody, user_document};
use crate::servers::api::Started;

/// It gives the player 100 spendable points by approving a submission.
async fn earn_100_points(env: &Started) {
    register_everybody(env).await;
    let quest_id = create_sample_quest(env).await;

    assert_ok(
        env.client(CREATOR_TOKEN)
            .approve(&quest_id, &json!({"approvedUserId": PLAYER_ID}))
            .await,
    )
    .await;
}

#[tokio::test]
async fn should_register_a_user_with_every_accumulator_at_zero() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());

    let response = env
        .client(PLAYER_TOKEN)
        .register_user(&json!({"userId": PLAYER_ID, "email": "a@b.com", "name": "A", "role": "player"}))
        .await;

    assert_eq!(assert_ok(response).await["message"], "User created");

    let user = user_document(&env, PLAYER_TOKEN, PLAYER_ID).await;

    assert_eq!(user["Email"], "a@b.com");
    assert_eq!(user["Name"], "A");
    assert_eq!(user["Level"], 0);
    assert_eq!(user["SpendablePoints"], 0);
    assert_eq!(user["LeaderboardPoints"], 0);
    assert_eq!(user["AcceptedQuests"], json!([]));

    env.stop().await;
}

#[tokio::test]
async fn should_keep_the_points_when_a_user_registers_again() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());
    earn_100_points(&env).await;

    let response = env
        .client(PLAYER_TOKEN)
        .register_user(&json!({"userId": PLAYER_ID, "email": "new@b.com", "name": "Renamed", "role": "player"}))
        .await;

    assert_eq!(assert_ok(response).await["message"], "User updated");

    let user = user_document(&env, PLAYER_TOKEN, PLAYER_ID).await;
    assert_eq!(user["Name"], "Renamed");
    assert_eq!(user["SpendablePoints"], 100);

    env.stop().await;
}

#[tokio::test]
async fn should_not_allow_registering_another_user() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());

    let response = env
        .client(PLAYER_TOKEN)
        .register_user(&json!({"userId": OTHER_PLAYER_ID, "email": "a@b.com", "name": "A", "role": "player"}))
        .await;

    assert_forbidden(response).await;
    assert_not_found(env.client(OTHER_PLAYER_TOKEN).get_user(OTHER_PLAYER_ID).await).await;

    env.stop().await;
}

#[tokio::test]
async fn should_only_allow_reading_the_own_user_document() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());
    register_everybody(&env).await;

    assert_forbidden(env.client(PLAYER_TOKEN).get_user(CREATOR_ID).await).await;
    assert_ok(env.client(PLAYER_TOKEN).get_user(PLAYER_ID).await).await;

    env.stop().await;
}

#[tokio::test]
async fn should_return_not_found_for_the_profile_of_an_unregistered_user() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());

    assert_not_found(env.client(PLAYER_TOKEN).get_profile().await).await;

    env.stop().await;
}

#[tokio::test]
async fn should_allow_updating_the_profile() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());
    register(&env, PLAYER_TOKEN, PLAYER_ID, "Player").await;

    let profile = assert_ok(
        env.client(PLAYER_TOKEN)
            .update_profile(&json!({"Bio": "Clock hunter", "profilePictureUrl": "http://127.0.0.1/blobs/me.png"}))
            .await,
    )
    .await;

    assert_eq!(profile["Name"], "Player");
    assert_eq!(profile["Bio"], "Clock hunter");
    assert_eq!(profile["ProfilePictureUrl"], "http://127.0.0.1/blobs/me.png");

    env.stop().await;
}

#[tokio::test]
async fn should_allow_unlocking_an_inventory_item_once() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());
    earn_100_points(&env).await;
    let player = env.client(PLAYER_TOKEN);

    let inventory = assert_ok(player.unlock_item(&json!({"itemId": "hat", "cost": 60})).await).await;
    assert_eq!(inventory["spendablePoints"], 40);
    assert_eq!(inventory["inventoryItems"], json!({"hat": true}));

    assert_bad_request(player.unlock_item(&json!({"itemId": "hat", "cost": 10})).await).await;

    let inventory = assert_ok(player.get_inventory().await).await;
    assert_eq!(inventory["spendablePoints"], 40);

    env.stop().await;
}

#[tokio::test]
async fn should_not_allow_unlocking_an_item_priced_above_the_spendable_points() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());
    earn_100_points(&env).await;
    let player = env.client(PLAYER_TOKEN);

    assert_bad_request(player.unlock_item(&json!({"itemId": "crown", "cost": 500})).await).await;

    let inventory = assert_ok(player.get_inventory().await).await;
    assert_eq!(inventory["spendablePoints"], 100);
    assert_eq!(inventory["inventoryItems"], json!({}));

    env.stop().await;
}

#[tokio::test]
async fn should_merge_the_customisation() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());
    register(&env, PLAYER_TOKEN, PLAYER_ID, "Player").await;
    let player = env.client(PLAYER_TOKEN);

    assert_ok(player.customise(&json!({"hat": "red", "shirt": "blue"})).await).await;
    let body = assert_ok(player.customise(&json!({"hat": "green"})).await).await;

    assert_eq!(body["customisation"], json!({"hat": "green", "shirt": "blue"}));

    assert_bad_request(player.customise(&json!({"hat": 1})).await).await;

    env.stop().await;
}

#[tokio::test]
async fn should_walk_a_journey_from_start_to_completion() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());
    register(&env, PLAYER_TOKEN, PLAYER_ID, "Player").await;
    let player = env.client(PLAYER_TOKEN);

    assert_bad_request(player.advance_journey().await).await;

    let journey = assert_ok(player.start_journey(&json!({"questId": "q1"})).await).await;
    assert_eq!(journey["currentJourneyQuestId"], "q1");
    assert_eq!(journey["currentStop"], 1);

    assert_bad_request(player.start_journey(&json!({"questId": "q2"})).await).await;

    let journey = assert_ok(player.advance_journey().await).await;
    assert_eq!(journey["currentStop"], 2);

    let journey = assert_ok(player.complete_journey().await).await;
    assert_eq!(journey["currentJourneyQuestId"], Value::Null);
    assert_eq!(journey["currentStop"], 1);
    assert_eq!(journey["completedJourneyQuests"], json!(["q1"]));

    assert_bad_request(player.complete_journey().await).await;

    env.stop().await;
}

#[tokio::test]
async fn should_rank_the_users_by_leaderboard_points() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());
    earn_100_points(&env).await;

    let leaderboard = assert_ok(env.anonymous_client().get_leaderboard("").await).await;

    assert_eq!(leaderboard.as_array().unwrap().len(), 3);
    assert_eq!(leaderboard[0]["userId"], PLAYER_ID);
    assert_eq!(leaderboard[0]["leaderboardPoints"], 100);
    assert_eq!(leaderboard[1]["userId"], CREATOR_ID);
    assert_eq!(leaderboard[1]["leaderboardPoints"], 50);

    let leaderboard = assert_ok(env.anonymous_client().get_leaderboard("?limit=1").await).await;
    assert_eq!(leaderboard.as_array().unwrap().len(), 1);

    assert_bad_request(env.anonymous_client().get_leaderboard("?limit=many").await).await;

    env.stop().await;
}
