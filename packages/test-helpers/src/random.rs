use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};

/// Returns a random alphanumeric string of a certain size.
pub fn string(size: usize) -> String {
    thread_rng().sample_iter(&Alphanumeric).take(size).map(char::from).collect()
}

/// Returns a random user id. Tests use it to avoid collisions between users
/// created by different tests on the same database.
#[must_use]
pub fn user_id() -> String {
    format!("user-{}", string(12))
}
