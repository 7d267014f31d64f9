//! The reconciliation sweeper.
//!
//! When a quest closes, users outside the closing transaction may still list
//! it in their `AcceptedQuests`. The sweeper finds them with an
//! array-contains query and removes the reference with one non-atomic
//! batch.
//!
//! The query and the batch are not atomic: an acceptance committed between
//! them leaves a dangling reference. Closing the quest first (see
//! [`Quest::close`](crate::core::quests::quest::Quest::close)) rejects new
//! acceptances, which narrows that window to transactions already running.
//! Removing an absent element is a no-op, so sweeping again is always safe.
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::core::databases::{Collection, Database, DocumentWrite, Write};
use crate::core::error::Error;
use crate::core::quests::quest::QuestId;

const SWEEPER_LOG_TARGET: &str = "SWEEPER";

/// The user field holding the accepted quest ids.
pub const ACCEPTED_QUESTS_FIELD: &str = "AcceptedQuests";

pub struct Sweeper {
    database: Arc<Box<dyn Database>>,
}

impl Sweeper {
    #[must_use]
    pub fn new(database: Arc<Box<dyn Database>>) -> Self {
        Self { database }
    }

    /// It removes the quest id from every user still holding it and returns
    /// how many users were found.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the query or a write of the batch fails.
    pub fn sweep(&self, quest_id: &QuestId) -> Result<usize, Error> {
        let holders = self
            .database
            .query_array_contains(Collection::Users, ACCEPTED_QUESTS_FIELD, quest_id.as_str())?;

        let writes: Vec<DocumentWrite> = holders
            .iter()
            .map(|(user_id, _)| {
                DocumentWrite::new(
                    Collection::Users,
                    user_id,
                    Write::ArrayRemove {
                        field: ACCEPTED_QUESTS_FIELD.to_owned(),
                        value: Value::String(quest_id.to_string()),
                    },
                )
            })
            .collect();

        self.database.batch(&writes)?;

        debug!(target: SWEEPER_LOG_TARGET, quest_id = %quest_id, users = writes.len(), "stale quest references removed");

        Ok(writes.len())
    }
}
