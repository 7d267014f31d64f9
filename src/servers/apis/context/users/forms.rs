use serde::Deserialize;

use crate::core::error::Error;
use crate::core::quests::quest::QuestId;
use crate::core::users::user::UserId;

fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, Error> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::MissingField { field }),
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
}

impl RegistrationForm {
    /// # Errors
    ///
    /// Will return `Error::MissingField` without a `userId`.
    pub fn user_id(&self) -> Result<UserId, Error> {
        required(self.user_id.as_deref(), "userId").map(UserId::from)
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UnlockForm {
    pub item_id: Option<String>,
    pub cost: Option<u64>,
}

impl UnlockForm {
    /// # Errors
    ///
    /// Will return `Error::MissingField` without an `itemId` or a `cost`.
    pub fn item(&self) -> Result<(&str, u64), Error> {
        let item_id = required(self.item_id.as_deref(), "itemId")?;
        let cost = self.cost.ok_or(Error::MissingField { field: "cost" })?;

        Ok((item_id, cost))
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct StartJourneyForm {
    pub quest_id: Option<String>,
}

impl StartJourneyForm {
    /// # Errors
    ///
    /// Will return `Error::MissingField` without a `questId`.
    pub fn quest_id(&self) -> Result<QuestId, Error> {
        required(self.quest_id.as_deref(), "questId").map(QuestId::from)
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct LeaderboardQueryParams {
    pub limit: Option<usize>,
}
