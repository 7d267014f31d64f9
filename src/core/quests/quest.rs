//! The quest document and its state machine.
//!
//! Stored quest documents use `camelCase` field names:
//!
//! ```json
//! {
//!   "name": "Find the Clock",
//!   "radius": 50.0,
//!   "reward": 100,
//!   "type": "landmark",
//!   "location": { "latitude": -26.19, "longitude": 28.03 },
//!   "imageUrl": "",
//!   "creatorId": "c1",
//!   "creatorName": "Creator",
//!   "createdAt": "2024-05-01T10:00:00.000Z",
//!   "active": true,
//!   "acceptedBy": ["u2"],
//!   "submissions": []
//! }
//! ```
use derive_more::Display;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::core::databases::Collection;
use crate::core::error::Error;
use crate::core::records::Stored;
use crate::core::users::user::UserId;

/// The key of a quest document, assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[serde(transparent)]
#[display(fmt = "{_0}")]
pub struct QuestId(String);

impl QuestId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for QuestId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for QuestId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// A point only when both coordinates are finite numbers in range.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);

        valid.then_some(Self { latitude, longitude })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// A proof-of-completion entry embedded in a quest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub user_id: UserId,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub submitted_at: String,
    #[serde(default)]
    pub status: SubmissionStatus,
}

/// The state of a quest.
///
/// `Closed` quests are deleted once their references have been swept, so a
/// stored quest is only seen `Closed` between the commit that closes it and
/// its deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestState {
    Open,
    Closed,
}

/// The operations on a stored quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Operation {
    #[display(fmt = "accept")]
    Accept,
    #[display(fmt = "abandon")]
    Abandon,
    #[display(fmt = "submit to")]
    Submit,
    #[display(fmt = "remove submissions from")]
    RemoveSubmission,
    #[display(fmt = "approve")]
    Approve,
    #[display(fmt = "close")]
    Close,
    #[display(fmt = "view the submissions of")]
    ViewSubmissions,
}

impl QuestState {
    /// Whether the operation may run on a quest in this state.
    #[must_use]
    pub fn allows(self, operation: Operation) -> bool {
        match (self, operation) {
            (QuestState::Open, _)
            | (
                QuestState::Closed,
                Operation::Abandon | Operation::RemoveSubmission | Operation::Close | Operation::ViewSubmissions,
            ) => true,
            (QuestState::Closed, Operation::Accept | Operation::Submit | Operation::Approve) => false,
        }
    }
}

/// A location-bound task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub name: String,
    pub radius: f64,
    pub reward: Number,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub image_url: String,
    pub creator_id: UserId,
    #[serde(default)]
    pub creator_name: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default = "Quest::default_active")]
    pub active: bool,
    #[serde(default)]
    pub accepted_by: Vec<UserId>,
    #[serde(default)]
    pub submissions: Vec<Submission>,
}

impl Stored for Quest {
    const COLLECTION: Collection = Collection::Quests;
}

impl Quest {
    fn default_active() -> bool {
        true
    }

    /// The points credited for the reward. Fractions are rounded down.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn reward_points(&self) -> u64 {
        self.reward
            .as_u64()
            .or_else(|| self.reward.as_f64().filter(|reward| *reward > 0.0).map(|reward| reward.floor() as u64))
            .unwrap_or(0)
    }

    #[must_use]
    pub fn state(&self) -> QuestState {
        if self.active {
            QuestState::Open
        } else {
            QuestState::Closed
        }
    }

    /// It checks the operation against the current state.
    ///
    /// # Errors
    ///
    /// Will return [`Error::QuestClosed`] if the state does not allow it.
    pub fn ensure_allows(&self, quest_id: &QuestId, operation: Operation) -> Result<(), Error> {
        if self.state().allows(operation) {
            Ok(())
        } else {
            Err(Error::QuestClosed {
                quest_id: quest_id.clone(),
            })
        }
    }

    /// # Errors
    ///
    /// Will return [`Error::NotQuestCreator`] if `caller` did not create the
    /// quest.
    pub fn ensure_creator(&self, quest_id: &QuestId, caller: &UserId, operation: Operation) -> Result<(), Error> {
        if &self.creator_id == caller {
            Ok(())
        } else {
            Err(Error::NotQuestCreator {
                action: operation,
                quest_id: quest_id.clone(),
            })
        }
    }

    /// Moves the quest to the `Closed` state. Nobody may accept it after
    /// this.
    pub fn close(&mut self) {
        self.active = false;
        self.accepted_by.clear();
    }

    /// Adds the user to the accepted-by set. Returns `false` if already there.
    pub fn add_participant(&mut self, user_id: &UserId) -> bool {
        if self.accepted_by.contains(user_id) {
            return false;
        }

        self.accepted_by.push(user_id.clone());
        true
    }

    /// Removes the user from the accepted-by set. Returns `false` if absent.
    pub fn remove_participant(&mut self, user_id: &UserId) -> bool {
        let before = self.accepted_by.len();
        self.accepted_by.retain(|participant| participant != user_id);
        self.accepted_by.len() != before
    }

    /// Replaces the pending submission of the same user, if any.
    pub fn put_submission(&mut self, submission: Submission) {
        self.submissions.retain(|existing| existing.user_id != submission.user_id);
        self.submissions.push(submission);
    }
}

/// A quest with its key, as returned to clients: `{"id": ..., ...fields}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestWithId {
    pub id: QuestId,
    #[serde(flatten)]
    pub quest: Quest,
}

/// The client input to create a quest. Unknown fields, `creatorId` among
/// them, are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestInput {
    pub name: Option<String>,
    pub radius: Option<Value>,
    pub reward: Option<Value>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub lat: Option<Value>,
    pub lng: Option<Value>,
    pub image_url: Option<String>,
    pub creator_name: Option<String>,
}

impl QuestInput {
    /// It validates the input and builds an open quest owned by `creator_id`.
    ///
    /// # Errors
    ///
    /// Will return a validation error if the name is missing or empty, the
    /// radius is not a positive number, or the reward is not a non-negative
    /// number.
    pub fn into_quest(self, creator_id: &UserId, creator_name: &str, created_at: String) -> Result<Quest, Error> {
        let name = match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => return Err(Error::MissingField { field: "name" }),
        };

        let radius = match self.radius.as_ref() {
            None | Some(Value::Null) => return Err(Error::MissingField { field: "radius" }),
            Some(value) => match number(value) {
                Some(radius) if radius.is_finite() && radius > 0.0 => radius,
                _ => {
                    return Err(Error::InvalidField {
                        field: "radius",
                        reason: format!("expected a positive number, got {value}"),
                    })
                }
            },
        };

        let reward = match self.reward.as_ref() {
            None | Some(Value::Null) => Number::from(0u64),
            Some(value) => reward(value).ok_or_else(|| Error::InvalidField {
                field: "reward",
                reason: format!("expected a non-negative number, got {value}"),
            })?,
        };

        let location = match (self.lat.as_ref().and_then(number), self.lng.as_ref().and_then(number)) {
            (Some(latitude), Some(longitude)) => GeoPoint::new(latitude, longitude),
            _ => None,
        };

        Ok(Quest {
            name,
            radius,
            reward,
            kind: self.kind.unwrap_or_default(),
            location,
            image_url: self.image_url.unwrap_or_default(),
            creator_id: creator_id.clone(),
            creator_name: creator_name.to_owned(),
            created_at,
            active: true,
            accepted_by: vec![],
            submissions: vec![],
        })
    }
}

/// A number, or a string holding one.
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// A non-negative number, or a string holding one. Integers keep their
/// integer representation.
fn reward(value: &Value) -> Option<Number> {
    let reward = match value {
        Value::Number(number) => number.clone(),
        Value::String(text) => match text.trim().parse::<u64>() {
            Ok(reward) => Number::from(reward),
            Err(_) => Number::from_f64(text.trim().parse::<f64>().ok()?)?,
        },
        _ => return None,
    };

    reward.as_f64().filter(|number| number.is_finite() && *number >= 0.0).map(|_| reward)
}
