pub mod authentication;
pub mod health_check;
pub mod quests;
pub mod upload;
pub mod users;

use campus_quest_test_helpers::configuration::{CREATOR_ID, CREATOR_TOKEN, OTHER_PLAYER_ID, OTHER_PLAYER_TOKEN, PLAYER_ID, PLAYER_TOKEN};
use serde_json::{json, Value};

use super::asserts::{assert_json, assert_ok};
use super::Started;

/// The quest of the game walkthrough: "Find the Clock" with a 100 points
/// reward.
pub fn sample_quest() -> Value {
    json!({
        "name": "Find the Clock",
        "radius": 50,
        "reward": 100,
        "type": "landmark",
        "lat": -26.19,
        "lng": 28.03
    })
}

pub async fn register(env: &Started, token: &str, user_id: &str, name: &str) {
    let response = env
        .client(token)
        .register_user(&json!({
            "userId": user_id,
            "email": format!("{user_id}@campus.test"),
            "name": name,
            "role": "player"
        }))
        .await;

    assert_ok(response).await;
}

/// It registers the creator and both players.
pub async fn register_everybody(env: &Started) {
    register(env, CREATOR_TOKEN, CREATOR_ID, "Creator").await;
    register(env, PLAYER_TOKEN, PLAYER_ID, "Player").await;
    register(env, OTHER_PLAYER_TOKEN, OTHER_PLAYER_ID, "Other Player").await;
}

/// It creates the sample quest as the creator and returns its id.
pub async fn create_sample_quest(env: &Started) -> String {
    let body = assert_json(env.client(CREATOR_TOKEN).create_quest(&sample_quest()).await, 201).await;

    body["questId"].as_str().unwrap().to_string()
}

pub async fn user_document(env: &Started, token: &str, user_id: &str) -> Value {
    assert_ok(env.client(token).get_user(user_id).await).await
}

/// The ids of the listed quests.
pub async fn listed_quest_ids(env: &Started) -> Vec<String> {
    let quests = assert_ok(env.anonymous_client().get_quests().await).await;

    quests
        .as_array()
        .unwrap()
        .iter()
        .map(|quest| quest["id"].as_str().unwrap().to_string())
        .collect()
}
