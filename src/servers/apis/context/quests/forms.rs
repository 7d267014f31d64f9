use serde::Deserialize;

use crate::core::error::Error;
use crate::core::lifecycle::SubmissionSelector;
use crate::core::users::user::UserId;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ApproveForm {
    pub approved_user_id: Option<String>,
}

impl ApproveForm {
    /// # Errors
    ///
    /// Will return `Error::MissingField` without an `approvedUserId`.
    pub fn approved_user_id(&self) -> Result<UserId, Error> {
        match self.approved_user_id.as_deref() {
            Some(user_id) if !user_id.is_empty() => Ok(UserId::from(user_id)),
            _ => Err(Error::MissingField { field: "approvedUserId" }),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct RemoveSubmissionForm {
    pub index: Option<i64>,
    pub user_id: Option<String>,
}

impl RemoveSubmissionForm {
    /// The index wins when both fields are present.
    ///
    /// # Errors
    ///
    /// Will return `Error::MissingField` when neither field is present.
    pub fn selector(&self) -> Result<SubmissionSelector, Error> {
        match (self.index, self.user_id.as_deref()) {
            (Some(index), _) => Ok(SubmissionSelector::Index(index)),
            (None, Some(user_id)) if !user_id.is_empty() => Ok(SubmissionSelector::User(UserId::from(user_id))),
            _ => Err(Error::MissingField { field: "index" }),
        }
    }
}
