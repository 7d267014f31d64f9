//! The user ledger: user documents, points, inventory and journeys.
//!
//! Every mutation is a read-modify-write inside one transaction on the user
//! document, so concurrent requests never lose an update.
//!
//! The ledger does not authorize. Callers must have checked that the acting
//! user owns the document (see [`authorize_owner`](super::authorize_owner)),
//! except for the approval path which is system initiated.
use std::collections::BTreeMap;
use std::sync::Arc;

use campus_quest_configuration::Rewards;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use super::user::{InventoryView, LeaderboardEntry, PointsAccount, ProfileUpdate, ProfileView, User, UserId};
use crate::core::databases::{self, Collection, Database, Document, DocumentWrite, Transaction, Write};
use crate::core::error::Error;
use crate::core::quests::quest::QuestId;
use crate::core::records::Record;
use crate::shared::clock::Time;
use crate::CurrentClock;

const USER_LEDGER_LOG_TARGET: &str = "USER LEDGER";

/// Default number of entries in the leaderboard.
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;
/// Maximum number of entries in the leaderboard.
pub const MAX_LEADERBOARD_LIMIT: usize = 100;

/// The journey progress of a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyView {
    pub current_journey_quest_id: Option<QuestId>,
    pub current_stop: u64,
    pub completed_journey_quests: Vec<QuestId>,
}

impl From<&User> for JourneyView {
    fn from(user: &User) -> Self {
        Self {
            current_journey_quest_id: user.current_journey_quest_id.clone(),
            current_stop: user.current_stop,
            completed_journey_quests: user.completed_journey_quests.clone(),
        }
    }
}

/// Whether `create` made a new account or refreshed an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Created,
    Refreshed,
}

pub struct UserLedger {
    database: Arc<Box<dyn Database>>,
    rewards: Rewards,
}

impl UserLedger {
    #[must_use]
    pub fn new(database: Arc<Box<dyn Database>>, rewards: Rewards) -> Self {
        Self { database, rewards }
    }

    /// It registers a user with every accumulator at zero.
    ///
    /// Registering an existing user only refreshes `Email`, `Name` and
    /// `Role`; points, inventory and quests are kept.
    ///
    /// # Errors
    ///
    /// Will return an internal error if the store fails.
    pub fn create(&self, user_id: &UserId, email: &str, name: &str, role: &str) -> Result<Registration, Error> {
        let registration = databases::transaction(&**self.database, |tx| {
            match Record::<User>::load(tx, user_id.as_str())? {
                Some(mut record) => {
                    email.clone_into(&mut record.value.email);
                    name.clone_into(&mut record.value.name);
                    role.clone_into(&mut record.value.role);
                    record.save(tx)?;
                    Ok(Registration::Refreshed)
                }
                None => {
                    let user = User::new(email.to_owned(), name.to_owned(), role.to_owned(), CurrentClock::now_rfc3339());
                    Record::new(user_id.to_string(), user).save(tx)?;
                    Ok::<_, Error>(Registration::Created)
                }
            }
        })?;

        info!(target: USER_LEDGER_LOG_TARGET, user_id = %user_id, ?registration, "user registered");

        Ok(registration)
    }

    /// The raw user document.
    ///
    /// # Errors
    ///
    /// Will return [`Error::UserNotFound`] if the user does not exist.
    pub fn document(&self, user_id: &UserId) -> Result<Document, Error> {
        self.database
            .get(Collection::Users, user_id.as_str())?
            .ok_or_else(|| Error::UserNotFound {
                user_id: user_id.clone(),
            })
    }

    /// The typed user.
    ///
    /// # Errors
    ///
    /// Will return [`Error::UserNotFound`] if the user does not exist.
    pub fn user(&self, user_id: &UserId) -> Result<User, Error> {
        let document = self.document(user_id)?;

        Ok(Record::<User>::from_document(user_id.to_string(), document)?.value)
    }

    /// # Errors
    ///
    /// Will return [`Error::UserNotFound`] if the user does not exist.
    pub fn profile(&self, user_id: &UserId) -> Result<ProfileView, Error> {
        Ok(ProfileView::from(&self.user(user_id)?))
    }

    /// It changes `Name`, `Bio` and `ProfilePictureUrl`. Absent fields are
    /// kept.
    ///
    /// # Errors
    ///
    /// Will return [`Error::UserNotFound`] if the user does not exist.
    pub fn update_profile(&self, user_id: &UserId, update: &ProfileUpdate) -> Result<ProfileView, Error> {
        self.modify(user_id, |user| {
            if let Some(name) = &update.name {
                name.clone_into(&mut user.name);
            }
            if let Some(bio) = &update.bio {
                bio.clone_into(&mut user.bio);
            }
            if let Some(url) = &update.profile_picture_url {
                user.profile_picture_url = Some(url.clone());
            }
            Ok(ProfileView::from(&*user))
        })
    }

    /// # Errors
    ///
    /// Will return [`Error::UserNotFound`] if the user does not exist.
    pub fn inventory(&self, user_id: &UserId) -> Result<InventoryView, Error> {
        let user = self.user(user_id)?;

        Ok(InventoryView {
            spendable_points: user.spendable_points,
            inventory_items: user.inventory_items,
        })
    }

    /// It spends `cost` spendable points on an inventory item.
    ///
    /// # Errors
    ///
    /// Will return [`Error::AlreadyUnlocked`] or [`Error::InsufficientPoints`]
    /// without changing the document, or [`Error::UserNotFound`].
    pub fn unlock_inventory_item(&self, user_id: &UserId, item_id: &str, cost: u64) -> Result<InventoryView, Error> {
        let experience_per_level = self.rewards.experience_per_level;

        let inventory = self.modify(user_id, |user| {
            user.unlock_inventory_item(item_id, cost, experience_per_level)?;

            Ok(InventoryView {
                spendable_points: user.spendable_points,
                inventory_items: user.inventory_items.clone(),
            })
        })?;

        info!(target: USER_LEDGER_LOG_TARGET, user_id = %user_id, item_id, cost, "inventory item unlocked");

        Ok(inventory)
    }

    /// It merges string cosmetic preferences into the customisation map.
    ///
    /// # Errors
    ///
    /// Will return [`Error::InvalidField`] if a value is not a string, or
    /// [`Error::UserNotFound`].
    pub fn customise(&self, user_id: &UserId, preferences: &serde_json::Map<String, Value>) -> Result<BTreeMap<String, String>, Error> {
        let mut changes = BTreeMap::new();

        for (key, value) in preferences {
            let Value::String(value) = value else {
                return Err(Error::InvalidField {
                    field: "customisation",
                    reason: format!("the value of `{key}` must be a string"),
                });
            };
            changes.insert(key.clone(), value.clone());
        }

        self.modify(user_id, |user| {
            user.customisation.extend(changes.clone());
            Ok(user.customisation.clone())
        })
    }

    /// # Errors
    ///
    /// Will return [`Error::JourneyInProgress`] if another journey has not
    /// been completed, or [`Error::UserNotFound`].
    pub fn start_journey(&self, user_id: &UserId, quest_id: &QuestId) -> Result<JourneyView, Error> {
        self.modify(user_id, |user| {
            if let Some(current) = &user.current_journey_quest_id {
                return Err(Error::JourneyInProgress {
                    quest_id: current.clone(),
                });
            }

            user.current_journey_quest_id = Some(quest_id.clone());
            user.current_stop = 1;

            Ok(JourneyView::from(&*user))
        })
    }

    /// # Errors
    ///
    /// Will return [`Error::NoJourneyInProgress`] or [`Error::UserNotFound`].
    pub fn advance_journey(&self, user_id: &UserId) -> Result<JourneyView, Error> {
        self.modify(user_id, |user| {
            if user.current_journey_quest_id.is_none() {
                return Err(Error::NoJourneyInProgress);
            }

            user.current_stop = user.current_stop.saturating_add(1);

            Ok(JourneyView::from(&*user))
        })
    }

    /// # Errors
    ///
    /// Will return [`Error::NoJourneyInProgress`] or [`Error::UserNotFound`].
    pub fn complete_journey(&self, user_id: &UserId) -> Result<JourneyView, Error> {
        self.modify(user_id, |user| {
            let Some(quest_id) = user.current_journey_quest_id.take() else {
                return Err(Error::NoJourneyInProgress);
            };

            if !user.completed_journey_quests.contains(&quest_id) {
                user.completed_journey_quests.push(quest_id);
            }
            user.current_stop = 1;

            Ok(JourneyView::from(&*user))
        })
    }

    /// It adds a quest to the user's accepted set. Idempotent.
    ///
    /// # Errors
    ///
    /// Will return [`Error::UserNotFound`] if the user does not exist.
    pub fn add_accepted_quest(&self, user_id: &UserId, quest_id: &QuestId) -> Result<(), Error> {
        self.modify(user_id, |user| {
            user.add_accepted_quest(quest_id);
            Ok(())
        })
    }

    /// It removes a quest from the user's accepted set. Idempotent.
    ///
    /// # Errors
    ///
    /// Will return [`Error::UserNotFound`] if the user does not exist.
    pub fn remove_accepted_quest(&self, user_id: &UserId, quest_id: &QuestId) -> Result<(), Error> {
        self.modify(user_id, |user| {
            user.remove_accepted_quest(quest_id);
            Ok(())
        })
    }

    /// It adds `delta` to one accumulator of a user loaded in the caller's
    /// transaction. The caller saves the record in the same transaction.
    ///
    /// # Errors
    ///
    /// Will return [`Error::InsufficientPoints`] if the accumulator would go
    /// below zero.
    pub fn adjust_points(&self, record: &mut Record<User>, delta: i64, account: PointsAccount) -> Result<(), Error> {
        record.value.adjust_points(delta, account, self.rewards.experience_per_level)
    }

    /// It adds `points` to the three accumulators of a user loaded in the
    /// caller's transaction.
    pub fn award(&self, record: &mut Record<User>, points: u64) {
        record.value.award(points, self.rewards.experience_per_level);
    }

    /// It loads a user inside a transaction.
    ///
    /// # Errors
    ///
    /// Will return [`Error::UserNotFound`] if the user does not exist.
    pub fn load(tx: &mut dyn Transaction, user_id: &UserId) -> Result<Record<User>, Error> {
        Record::<User>::load(tx, user_id.as_str())?.ok_or_else(|| Error::UserNotFound {
            user_id: user_id.clone(),
        })
    }

    /// The users with the most leaderboard points, at most `limit` (capped
    /// to [`MAX_LEADERBOARD_LIMIT`]). Ties are ordered by user id.
    ///
    /// # Errors
    ///
    /// Will return an internal error if the users cannot be loaded.
    pub fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, Error> {
        let mut entries = self
            .database
            .list(Collection::Users)?
            .into_iter()
            .map(|(key, document)| {
                let record = Record::<User>::from_document(key, document)?;
                Ok(LeaderboardEntry {
                    user_id: UserId::from(record.key),
                    name: record.value.name,
                    leaderboard_points: record.value.leaderboard_points,
                    level: record.value.level,
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;

        entries.sort_by(|a, b| {
            b.leaderboard_points
                .cmp(&a.leaderboard_points)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        entries.truncate(limit.min(MAX_LEADERBOARD_LIMIT));

        Ok(entries)
    }

    /// It rewrites every user document that is missing a field, adding the
    /// field with its default value. Runs as one non-atomic batch and returns
    /// the number of documents rewritten.
    ///
    /// # Errors
    ///
    /// Will return the first error. Documents rewritten before it are kept.
    pub fn backfill_defaults(&self) -> Result<usize, Error> {
        let mut writes = vec![];

        for (key, document) in self.database.list(Collection::Users)? {
            let mut record = Record::<User>::from_document(key, document)?;

            record.value.level = record
                .value
                .experience
                .checked_div(self.rewards.experience_per_level)
                .unwrap_or_default();

            if record.is_dirty()? {
                writes.push(DocumentWrite::new(Collection::Users, &record.key, Write::Set(record.to_document()?)));
            }
        }

        self.database.batch(&writes)?;

        info!(target: USER_LEDGER_LOG_TARGET, rewritten = writes.len(), "user fields backfilled");

        Ok(writes.len())
    }

    /// Read-modify-write of one user document in a transaction. Nothing is
    /// written when `change` fails.
    fn modify<T, F>(&self, user_id: &UserId, mut change: F) -> Result<T, Error>
    where
        F: FnMut(&mut User) -> Result<T, Error>,
    {
        databases::transaction(&**self.database, |tx| {
            let mut record = Self::load(tx, user_id)?;

            let result = change(&mut record.value)?;

            record.save(tx)?;

            debug!(target: USER_LEDGER_LOG_TARGET, user_id = %user_id, "user document updated");

            Ok(result)
        })
    }
}
