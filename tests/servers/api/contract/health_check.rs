use campus_quest_test_helpers::configuration;
use tracing::level_filters::LevelFilter;

use crate::common::logging::{tracing_stderr_init, INIT};
use crate::servers::api::asserts::{assert_json, assert_ok};
use crate::servers::api::{force_database_error, Started};

#[tokio::test]
async fn health_check_endpoint_should_return_status_ok_if_api_is_running() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());

    let report = assert_ok(env.anonymous_client().health_check().await).await;

    assert_eq!(report["status"], "Ok");

    env.stop().await;
}

#[tokio::test]
async fn health_check_endpoint_should_report_an_error_when_the_store_fails() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());

    force_database_error(&env.campus);

    let report = assert_json(env.anonymous_client().health_check().await, 500).await;

    assert_eq!(report["status"], "Error");

    env.stop().await;
}
