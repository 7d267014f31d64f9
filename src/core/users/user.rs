//! The user document.
//!
//! Stored user documents use `PascalCase` field names and are keyed by the
//! user id returned by the identity verifier.
use std::collections::BTreeMap;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::core::databases::Collection;
use crate::core::error::Error;
use crate::core::quests::quest::{Quest, QuestId};
use crate::core::records::Stored;

/// The stable identifier of an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[serde(transparent)]
#[display(fmt = "{_0}")]
pub struct UserId(String);

impl UserId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The point accumulators of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointsAccount {
    Spendable,
    Leaderboard,
    Experience,
}

/// A snapshot of a quest taken when a submission is approved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedQuest {
    pub quest_id: QuestId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub reward: u64,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub completed_at: String,
}

impl CompletedQuest {
    #[must_use]
    pub fn of(quest_id: &QuestId, quest: &Quest, completed_at: String) -> Self {
        Self {
            quest_id: quest_id.clone(),
            name: quest.name.clone(),
            reward: quest.reward_points(),
            kind: quest.kind.clone(),
            completed_at,
        }
    }
}

/// A player or creator account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub join_date: String,
    #[serde(default)]
    pub leaderboard_points: u64,
    #[serde(default)]
    pub level: u64,
    #[serde(default)]
    pub completed_quests: Vec<CompletedQuest>,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub spendable_points: u64,
    #[serde(default)]
    pub experience: u64,
    #[serde(default)]
    pub accepted_quests: Vec<QuestId>,
    #[serde(default)]
    pub inventory_items: BTreeMap<String, bool>,
    #[serde(default)]
    pub customisation: BTreeMap<String, String>,
    #[serde(default)]
    pub current_journey_quest_id: Option<QuestId>,
    #[serde(default = "User::first_stop")]
    pub current_stop: u64,
    #[serde(default)]
    pub completed_journey_quests: Vec<QuestId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
}

impl Stored for User {
    const COLLECTION: Collection = Collection::Users;
}

impl User {
    /// A new account with every accumulator at zero.
    #[must_use]
    pub fn new(email: String, name: String, role: String, join_date: String) -> Self {
        Self {
            email,
            name,
            role,
            join_date,
            leaderboard_points: 0,
            level: 0,
            completed_quests: vec![],
            bio: String::new(),
            spendable_points: 0,
            experience: 0,
            accepted_quests: vec![],
            inventory_items: BTreeMap::new(),
            customisation: BTreeMap::new(),
            current_journey_quest_id: None,
            current_stop: Self::first_stop(),
            completed_journey_quests: vec![],
            profile_picture_url: None,
        }
    }

    fn first_stop() -> u64 {
        1
    }

    /// It adds `delta` to one accumulator and recomputes the level when the
    /// experience changes.
    ///
    /// # Errors
    ///
    /// Will return [`Error::InsufficientPoints`] if the accumulator would go
    /// below zero. Nothing changes in that case.
    pub fn adjust_points(&mut self, delta: i64, account: PointsAccount, experience_per_level: u64) -> Result<(), Error> {
        let balance = match account {
            PointsAccount::Spendable => &mut self.spendable_points,
            PointsAccount::Leaderboard => &mut self.leaderboard_points,
            PointsAccount::Experience => &mut self.experience,
        };

        let adjusted = if delta >= 0 {
            balance.saturating_add(delta.unsigned_abs())
        } else {
            balance.checked_sub(delta.unsigned_abs()).ok_or(Error::InsufficientPoints {
                available: *balance,
                cost: delta.unsigned_abs(),
            })?
        };

        *balance = adjusted;

        if account == PointsAccount::Experience {
            self.recompute_level(experience_per_level);
        }

        Ok(())
    }

    /// It adds `points` to the three accumulators.
    pub fn award(&mut self, points: u64, experience_per_level: u64) {
        self.spendable_points = self.spendable_points.saturating_add(points);
        self.leaderboard_points = self.leaderboard_points.saturating_add(points);
        self.experience = self.experience.saturating_add(points);

        self.recompute_level(experience_per_level);
    }

    fn recompute_level(&mut self, experience_per_level: u64) {
        self.level = self.experience.checked_div(experience_per_level).unwrap_or_default();
    }

    /// Set semantics: returns `false` if the quest was already there.
    pub fn add_accepted_quest(&mut self, quest_id: &QuestId) -> bool {
        if self.accepted_quests.contains(quest_id) {
            return false;
        }

        self.accepted_quests.push(quest_id.clone());
        true
    }

    /// Set semantics: returns `false` if the quest was not there.
    pub fn remove_accepted_quest(&mut self, quest_id: &QuestId) -> bool {
        let before = self.accepted_quests.len();
        self.accepted_quests.retain(|accepted| accepted != quest_id);
        self.accepted_quests.len() != before
    }

    /// # Errors
    ///
    /// Will return [`Error::AlreadyUnlocked`] if the item is already
    /// unlocked, or [`Error::InsufficientPoints`] if the spendable points do
    /// not cover the cost. Nothing changes on error.
    pub fn unlock_inventory_item(&mut self, item_id: &str, cost: u64, experience_per_level: u64) -> Result<(), Error> {
        if self.inventory_items.get(item_id).copied().unwrap_or_default() {
            return Err(Error::AlreadyUnlocked {
                item_id: item_id.to_owned(),
            });
        }

        let delta = i64::try_from(cost).map_or(i64::MIN, |cost| -cost);

        self.adjust_points(delta, PointsAccount::Spendable, experience_per_level)
            .map_err(|_| Error::InsufficientPoints {
                available: self.spendable_points,
                cost,
            })?;

        self.inventory_items.insert(item_id.to_owned(), true);

        Ok(())
    }
}

/// The public part of a user document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProfileView {
    pub name: String,
    pub bio: String,
    pub leaderboard_points: u64,
    pub spendable_points: u64,
    pub level: u64,
    pub experience: u64,
    pub accepted_quests: Vec<QuestId>,
    pub completed_quests: Vec<CompletedQuest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
}

impl From<&User> for ProfileView {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            bio: user.bio.clone(),
            leaderboard_points: user.leaderboard_points,
            spendable_points: user.spendable_points,
            level: user.level,
            experience: user.experience,
            accepted_quests: user.accepted_quests.clone(),
            completed_quests: user.completed_quests.clone(),
            profile_picture_url: user.profile_picture_url.clone(),
        }
    }
}

/// The fields a user may change on their own profile. Absent fields are
/// left untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProfileUpdate {
    #[serde(alias = "name")]
    pub name: Option<String>,
    #[serde(alias = "bio")]
    pub bio: Option<String>,
    #[serde(alias = "profilePictureUrl")]
    pub profile_picture_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryView {
    pub spendable_points: u64,
    pub inventory_items: BTreeMap<String, bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub user_id: UserId,
    pub name: String,
    pub leaderboard_points: u64,
    pub level: u64,
}
