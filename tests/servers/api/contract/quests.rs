use campus_quest_test_helpers::configuration::{self, CREATOR_ID, CREATOR_TOKEN, OTHER_PLAYER_ID, OTHER_PLAYER_TOKEN, PLAYER_ID, PLAYER_TOKEN};
use serde_json::json;
use tracing::level_filters::LevelFilter;

use crate::common::logging::{tracing_stderr_init, INIT};
use crate::servers::api::asserts::{
    assert_bad_request, assert_forbidden, assert_internal_server_error, assert_json, assert_not_found, assert_ok,
};
use crate::servers::api::contract::{create_sample_quest, listed_quest_ids, register_everybody, user_document};
use crate::servers::api::{force_database_error, Started};

#[tokio::test]
async fn should_allow_creating_a_quest_owned_by_the_caller() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());

    let response = env
        .client(CREATOR_TOKEN)
        .create_quest(&json!({
            "name": "Find the Clock",
            "radius": 50,
            "reward": 100,
            "type": "landmark",
            "lat": -26.19,
            "lng": 28.03,
            "creatorId": "someone-else"
        }))
        .await;

    let body = assert_json(response, 201).await;
    assert_eq!(body["message"], "Quest created");
    let quest_id = body["questId"].as_str().unwrap();

    let quests = assert_ok(env.anonymous_client().get_quests().await).await;
    let quest = quests
        .as_array()
        .unwrap()
        .iter()
        .find(|quest| quest["id"] == quest_id)
        .unwrap();

    assert_eq!(quest["creatorId"], CREATOR_ID);
    assert_eq!(quest["name"], "Find the Clock");
    assert_eq!(quest["reward"], 100);
    assert_eq!(quest["active"], true);

    env.stop().await;
}

#[tokio::test]
async fn should_not_allow_creating_a_quest_without_a_positive_radius() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());

    for quest in [json!({"name": "No radius"}), json!({"name": "Negative radius", "radius": -5})] {
        assert_bad_request(env.client(CREATOR_TOKEN).create_quest(&quest).await).await;
    }

    assert!(listed_quest_ids(&env).await.is_empty());

    env.stop().await;
}

#[tokio::test]
async fn should_return_not_found_for_an_unknown_quest() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());

    assert_not_found(env.anonymous_client().get_quest("missing").await).await;
    assert_not_found(env.client(PLAYER_TOKEN).accept_quest("missing").await).await;

    env.stop().await;
}

#[tokio::test]
async fn should_link_the_quest_and_the_user_when_the_quest_is_accepted() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());
    register_everybody(&env).await;
    let quest_id = create_sample_quest(&env).await;

    assert_ok(env.client(OTHER_PLAYER_TOKEN).accept_quest(&quest_id).await).await;

    let quest = assert_ok(env.anonymous_client().get_quest(&quest_id).await).await;
    assert_eq!(quest["acceptedBy"], json!([OTHER_PLAYER_ID]));

    let user = user_document(&env, OTHER_PLAYER_TOKEN, OTHER_PLAYER_ID).await;
    assert_eq!(user["AcceptedQuests"], json!([quest_id]));

    env.stop().await;
}

#[tokio::test]
async fn should_restore_both_sides_when_an_accepted_quest_is_abandoned() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());
    register_everybody(&env).await;
    let quest_id = create_sample_quest(&env).await;

    assert_ok(env.client(PLAYER_TOKEN).accept_quest(&quest_id).await).await;
    assert_ok(env.client(PLAYER_TOKEN).abandon_quest(&quest_id).await).await;

    let quest = assert_ok(env.anonymous_client().get_quest(&quest_id).await).await;
    assert_eq!(quest["acceptedBy"], json!([]));

    let user = user_document(&env, PLAYER_TOKEN, PLAYER_ID).await;
    assert_eq!(user["AcceptedQuests"], json!([]));

    env.stop().await;
}

#[tokio::test]
async fn should_not_allow_the_creator_to_accept_their_own_quest() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());
    register_everybody(&env).await;
    let quest_id = create_sample_quest(&env).await;

    assert_forbidden(env.client(CREATOR_TOKEN).accept_quest(&quest_id).await).await;

    env.stop().await;
}

#[tokio::test]
async fn should_only_show_the_submissions_to_the_creator() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());
    register_everybody(&env).await;
    let quest_id = create_sample_quest(&env).await;

    let body = assert_ok(
        env.client(PLAYER_TOKEN)
            .submit(&quest_id, &json!({"imageUrl": "http://127.0.0.1/blobs/images/u1/proof.png"}))
            .await,
    )
    .await;
    assert_eq!(body["submission"]["userId"], PLAYER_ID);
    assert_eq!(body["submission"]["displayName"], "Player");
    assert_eq!(body["submission"]["status"], "pending");

    assert_forbidden(env.client(PLAYER_TOKEN).get_submissions(&quest_id).await).await;

    let submissions = assert_ok(env.client(CREATOR_TOKEN).get_submissions(&quest_id).await).await;
    assert_eq!(submissions.as_array().unwrap().len(), 1);

    env.stop().await;
}

#[tokio::test]
async fn should_keep_one_submission_per_user() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());
    register_everybody(&env).await;
    let quest_id = create_sample_quest(&env).await;

    for image in ["first.png", "second.png"] {
        assert_ok(
            env.client(PLAYER_TOKEN)
                .submit(&quest_id, &json!({"imageUrl": image}))
                .await,
        )
        .await;
    }

    let submissions = assert_ok(env.client(CREATOR_TOKEN).get_submissions(&quest_id).await).await;
    assert_eq!(submissions.as_array().unwrap().len(), 1);
    assert_eq!(submissions[0]["imageUrl"], "second.png");

    env.stop().await;
}

#[tokio::test]
async fn should_not_allow_submitting_without_an_image() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());
    register_everybody(&env).await;
    let quest_id = create_sample_quest(&env).await;

    assert_bad_request(env.client(PLAYER_TOKEN).submit(&quest_id, &json!({})).await).await;

    env.stop().await;
}

#[tokio::test]
async fn should_allow_the_creator_to_remove_a_submission() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());
    register_everybody(&env).await;
    let quest_id = create_sample_quest(&env).await;

    for token in [PLAYER_TOKEN, OTHER_PLAYER_TOKEN] {
        assert_ok(env.client(token).submit(&quest_id, &json!({"imageUrl": "proof.png"})).await).await;
    }

    let creator = env.client(CREATOR_TOKEN);

    assert_bad_request(creator.remove_submission(&quest_id, &json!({"index": 5})).await).await;
    assert_bad_request(creator.remove_submission(&quest_id, &json!({})).await).await;
    assert_forbidden(
        env.client(PLAYER_TOKEN)
            .remove_submission(&quest_id, &json!({"index": 0}))
            .await,
    )
    .await;

    let body = assert_ok(creator.remove_submission(&quest_id, &json!({"index": 0})).await).await;
    assert_eq!(body["submissions"].as_array().unwrap().len(), 1);
    assert_eq!(body["submissions"][0]["userId"], OTHER_PLAYER_ID);

    let body = assert_ok(creator.remove_submission(&quest_id, &json!({"userId": OTHER_PLAYER_ID})).await).await;
    assert_eq!(body["submissions"], json!([]));

    env.stop().await;
}

#[tokio::test]
async fn should_award_the_reward_and_delete_the_quest_when_a_submission_is_approved() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());
    register_everybody(&env).await;
    let quest_id = create_sample_quest(&env).await;
    assert_ok(env.client(OTHER_PLAYER_TOKEN).accept_quest(&quest_id).await).await;

    let body = assert_ok(
        env.client(CREATOR_TOKEN)
            .approve(&quest_id, &json!({"approvedUserId": OTHER_PLAYER_ID}))
            .await,
    )
    .await;

    assert_eq!(body["reward"], 100);
    assert_eq!(body["creatorBonus"], 50);

    let approved = user_document(&env, OTHER_PLAYER_TOKEN, OTHER_PLAYER_ID).await;
    assert_eq!(approved["SpendablePoints"], 100);
    assert_eq!(approved["LeaderboardPoints"], 100);
    assert_eq!(approved["AcceptedQuests"], json!([]));
    assert_eq!(approved["CompletedQuests"][0]["questId"], quest_id);

    let creator = user_document(&env, CREATOR_TOKEN, CREATOR_ID).await;
    assert_eq!(creator["SpendablePoints"], 50);

    assert!(!listed_quest_ids(&env).await.contains(&quest_id));
    assert_not_found(env.anonymous_client().get_quest(&quest_id).await).await;

    env.stop().await;
}

#[tokio::test]
async fn should_not_award_the_creator_bonus_when_it_is_disabled() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral_without_creator_bonus().into());
    register_everybody(&env).await;
    let quest_id = create_sample_quest(&env).await;

    let body = assert_ok(
        env.client(CREATOR_TOKEN)
            .approve(&quest_id, &json!({"approvedUserId": PLAYER_ID}))
            .await,
    )
    .await;

    assert_eq!(body["creatorBonus"], 0);
    assert_eq!(user_document(&env, CREATOR_TOKEN, CREATOR_ID).await["SpendablePoints"], 0);

    env.stop().await;
}

#[tokio::test]
async fn should_only_allow_the_creator_to_approve_a_submission() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());
    register_everybody(&env).await;
    let quest_id = create_sample_quest(&env).await;

    assert_forbidden(
        env.client(PLAYER_TOKEN)
            .approve(&quest_id, &json!({"approvedUserId": PLAYER_ID}))
            .await,
    )
    .await;

    let player = user_document(&env, PLAYER_TOKEN, PLAYER_ID).await;
    assert_eq!(player["SpendablePoints"], 0);
    assert_eq!(player["LeaderboardPoints"], 0);
    assert!(listed_quest_ids(&env).await.contains(&quest_id));

    env.stop().await;
}

#[tokio::test]
async fn should_require_the_approved_user_id() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());
    register_everybody(&env).await;
    let quest_id = create_sample_quest(&env).await;

    assert_bad_request(env.client(CREATOR_TOKEN).approve(&quest_id, &json!({})).await).await;

    env.stop().await;
}

#[tokio::test]
async fn should_remove_the_quest_from_every_acceptor_when_it_is_closed() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());
    register_everybody(&env).await;
    let quest_id = create_sample_quest(&env).await;

    for token in [PLAYER_TOKEN, OTHER_PLAYER_TOKEN] {
        assert_ok(env.client(token).accept_quest(&quest_id).await).await;
    }

    assert_forbidden(env.client(PLAYER_TOKEN).close_quest(&quest_id).await).await;
    assert_ok(env.client(CREATOR_TOKEN).close_quest(&quest_id).await).await;

    for (token, user_id) in [(PLAYER_TOKEN, PLAYER_ID), (OTHER_PLAYER_TOKEN, OTHER_PLAYER_ID)] {
        assert_eq!(user_document(&env, token, user_id).await["AcceptedQuests"], json!([]));
    }

    assert_not_found(env.anonymous_client().get_quest(&quest_id).await).await;
    assert_not_found(env.client(CREATOR_TOKEN).close_quest(&quest_id).await).await;

    env.stop().await;
}

#[tokio::test]
async fn should_fail_with_an_internal_error_when_the_store_fails() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());

    force_database_error(&env.campus);

    assert_internal_server_error(env.anonymous_client().get_quests().await, "Internal server error").await;

    env.stop().await;
}
