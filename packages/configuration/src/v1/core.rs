use serde::{Deserialize, Serialize};

use super::database::Database;

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct Core {
    /// When `true` the application runs the user-fields backfill on start-up.
    /// It rewrites every user document adding the fields it is missing with
    /// their default values.
    #[serde(default = "Core::default_backfill_user_fields")]
    pub backfill_user_fields: bool,

    // Database configuration.
    #[serde(default = "Core::default_database")]
    pub database: Database,

    // Reward policy applied when a quest submission is approved.
    #[serde(default = "Core::default_rewards")]
    pub rewards: Rewards,
}

impl Default for Core {
    fn default() -> Self {
        Self {
            database: Self::default_database(),
            rewards: Self::default_rewards(),
            backfill_user_fields: Self::default_backfill_user_fields(),
        }
    }
}

impl Core {
    fn default_database() -> Database {
        Database::default()
    }

    fn default_rewards() -> Rewards {
        Rewards::default()
    }

    fn default_backfill_user_fields() -> bool {
        false
    }
}

/// How points are awarded when the creator approves a submission.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Copy)]
pub struct Rewards {
    /// If enabled, the creator of the quest receives half of the reward when
    /// they approve another user's submission.
    #[serde(default = "Rewards::default_creator_bonus")]
    pub creator_bonus: bool,

    /// Experience needed to go up one level. The user level is always
    /// `experience / experience_per_level`.
    #[serde(default = "Rewards::default_experience_per_level")]
    pub experience_per_level: u64,
}

impl Default for Rewards {
    fn default() -> Self {
        Self {
            creator_bonus: Self::default_creator_bonus(),
            experience_per_level: Self::default_experience_per_level(),
        }
    }
}

impl Rewards {
    fn default_creator_bonus() -> bool {
        true
    }

    fn default_experience_per_level() -> u64 {
        100
    }
}
