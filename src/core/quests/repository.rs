//! CRUD over quest documents.
use std::sync::Arc;

use tracing::debug;

use super::quest::{Quest, QuestId, QuestInput, QuestWithId};
use crate::core::databases::{Collection, Database, Transaction};
use crate::core::error::Error;
use crate::core::records::{self, Record};
use crate::core::users::user::UserId;
use crate::shared::clock::Time;
use crate::CurrentClock;

const QUEST_REPOSITORY_LOG_TARGET: &str = "QUEST REPOSITORY";

pub struct QuestRepository {
    database: Arc<Box<dyn Database>>,
}

impl QuestRepository {
    #[must_use]
    pub fn new(database: Arc<Box<dyn Database>>) -> Self {
        Self { database }
    }

    /// It validates the input and stores a new open quest owned by the
    /// authenticated caller.
    ///
    /// # Errors
    ///
    /// Will return a validation error for malformed input, or an internal
    /// error if the quest cannot be stored.
    pub fn create(&self, input: QuestInput, creator_id: &UserId, creator_name: &str) -> Result<QuestId, Error> {
        let quest = input.into_quest(creator_id, creator_name, CurrentClock::now_rfc3339())?;

        let key = self.database.insert(Collection::Quests, &records::encode(&quest)?)?;

        debug!(target: QUEST_REPOSITORY_LOG_TARGET, quest_id = %key, creator_id = %creator_id, "quest created");

        Ok(QuestId::from(key))
    }

    /// All the quests, in store order.
    ///
    /// # Errors
    ///
    /// Will return an internal error if the quests cannot be loaded.
    pub fn list(&self) -> Result<Vec<QuestWithId>, Error> {
        self.database
            .list(Collection::Quests)?
            .into_iter()
            .map(|(key, document)| {
                let record = Record::<Quest>::from_document(key, document)?;
                Ok(QuestWithId {
                    id: QuestId::from(record.key),
                    quest: record.value,
                })
            })
            .collect()
    }

    /// # Errors
    ///
    /// Will return [`Error::QuestNotFound`] if the quest does not exist.
    pub fn get(&self, quest_id: &QuestId) -> Result<QuestWithId, Error> {
        let Some(document) = self.database.get(Collection::Quests, quest_id.as_str())? else {
            return Err(Error::QuestNotFound {
                quest_id: quest_id.clone(),
            });
        };

        let record = Record::<Quest>::from_document(quest_id.to_string(), document)?;

        Ok(QuestWithId {
            id: quest_id.clone(),
            quest: record.value,
        })
    }

    /// It deletes the quest unconditionally. Callers check authorization.
    ///
    /// # Errors
    ///
    /// Will return an internal error if the store fails.
    pub fn delete(&self, quest_id: &QuestId) -> Result<(), Error> {
        self.database.delete(Collection::Quests, quest_id.as_str())?;

        debug!(target: QUEST_REPOSITORY_LOG_TARGET, quest_id = %quest_id, "quest deleted");

        Ok(())
    }

    /// It loads a quest inside a transaction.
    ///
    /// # Errors
    ///
    /// Will return [`Error::QuestNotFound`] if the quest does not exist.
    pub fn load(tx: &mut dyn Transaction, quest_id: &QuestId) -> Result<Record<Quest>, Error> {
        Record::<Quest>::load(tx, quest_id.as_str())?.ok_or_else(|| Error::QuestNotFound {
            quest_id: quest_id.clone(),
        })
    }
}
