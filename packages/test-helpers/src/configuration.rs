//! Configurations for testing.
use std::env;

use campus_quest_configuration::{Configuration, Threshold};
use url::Url;

use crate::random;

/// Bearer token of the test user that creates quests.
pub const CREATOR_TOKEN: &str = "CreatorToken";
/// User id authenticated by [`CREATOR_TOKEN`].
pub const CREATOR_ID: &str = "c1";

/// Bearer token of a test player.
pub const PLAYER_TOKEN: &str = "PlayerToken";
/// User id authenticated by [`PLAYER_TOKEN`].
pub const PLAYER_ID: &str = "u1";

/// Bearer token of a second test player.
pub const OTHER_PLAYER_TOKEN: &str = "OtherPlayerToken";
/// User id authenticated by [`OTHER_PLAYER_TOKEN`].
pub const OTHER_PLAYER_ID: &str = "u2";

/// This configuration is used for testing. It generates random config values
/// so they do not collide if you run more than one backend at the same time.
///
/// - The API binds to a random port.
/// - The `SQLite3` database and the blob store live in the temp dir.
/// - The static identity verifier knows the three test users.
///
/// # Panics
///
/// Will panic if it can't convert the temp file path to string.
#[must_use]
pub fn ephemeral() -> Configuration {
    let mut config = Configuration::default();

    config.logging.threshold = Threshold::Off; // Change to `debug` for tests debugging

    // Ephemeral socket address for API
    let api_port = 0u16;
    config.http_api.bind_address = format!("127.0.0.1:{api_port}").parse().expect("it should be a valid socket address");

    // Ephemeral sqlite database
    let temp_directory = env::temp_dir();
    let random_db_id = random::string(16);
    let temp_file = temp_directory.join(format!("campus_quest_{random_db_id}.db"));
    temp_file.to_str().unwrap().clone_into(&mut config.core.database.path);

    // Ephemeral blob store
    let random_blob_dir = random::string(16);
    let blob_root = temp_directory.join(format!("campus_quest_blobs_{random_blob_dir}"));
    config.blob_store.root = blob_root.to_str().unwrap().into();
    config.blob_store.public_base_url =
        Url::parse("http://127.0.0.1/blobs/").expect("it should be a valid blob store base url");

    config.identity.add_token(CREATOR_TOKEN, CREATOR_ID);
    config.identity.add_token(PLAYER_TOKEN, PLAYER_ID);
    config.identity.add_token(OTHER_PLAYER_TOKEN, OTHER_PLAYER_ID);

    config
}

/// Ephemeral configuration where the creator is not rewarded for approving
/// submissions.
#[must_use]
pub fn ephemeral_without_creator_bonus() -> Configuration {
    let mut config = ephemeral();

    config.core.rewards.creator_bonus = false;

    config
}

/// Ephemeral configuration with a tiny upload limit.
#[must_use]
pub fn ephemeral_with_max_upload_size(max_upload_size: usize) -> Configuration {
    let mut config = ephemeral();

    config.http_api.max_upload_size = max_upload_size;

    config
}
