//! Job that backfills missing fields in the user documents.
//!
//! User documents written by older clients may lack some fields, for example
//! `InventoryItems` or `CurrentStop`. The job rewrites every user document
//! with the missing fields set to their defaults and the level recomputed
//! from the experience.
//!
//! The writes are applied as one non-atomic batch: each document is written
//! atomically, but a failure leaves the remaining documents untouched. The
//! job is idempotent, so it is safe to run again on the next start-up.
//!
//! It only runs when the `core.backfill_user_fields` option is enabled.
use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinHandle;

use crate::core;

const BACKFILL_LOG_TARGET: &str = "USER BACKFILL";

/// It starts the one-shot backfill of the user documents.
#[must_use]
pub fn start_job(campus: &Arc<core::Campus>) -> JoinHandle<()> {
    let weak_campus = Arc::downgrade(campus);

    tokio::spawn(async move {
        let Some(campus) = weak_campus.upgrade() else {
            return;
        };

        let start_time = Utc::now().time();
        tracing::info!(target: BACKFILL_LOG_TARGET, "Backfilling user fields..");

        match campus.users.backfill_defaults() {
            Ok(updated) => tracing::info!(
                target: BACKFILL_LOG_TARGET,
                "Backfilled {updated} user documents in: {}ms",
                (Utc::now().time() - start_time).num_milliseconds()
            ),
            Err(err) => tracing::error!(target: BACKFILL_LOG_TARGET, %err, "User fields backfill failed"),
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use campus_quest_test_helpers::configuration;
    use serde_json::json;

    use crate::bootstrap::jobs::user_backfill::start_job;
    use crate::core::databases::Collection;
    use crate::core::services::campus_factory;

    #[tokio::test]
    async fn it_should_add_the_missing_fields_to_old_user_documents() {
        let campus = Arc::new(campus_factory(&configuration::ephemeral()));

        let old_document = json!({"Email": "a@b.com", "Name": "A"}).as_object().unwrap().clone();
        campus.database.set(Collection::Users, "u1", &old_document).unwrap();

        start_job(&campus).await.unwrap();

        let document = campus.database.get(Collection::Users, "u1").unwrap().unwrap();

        assert_eq!(document.get("SpendablePoints"), Some(&json!(0)));
        assert_eq!(document.get("CurrentStop"), Some(&json!(1)));
        assert_eq!(document.get("Email"), Some(&json!("a@b.com")));
    }
}
