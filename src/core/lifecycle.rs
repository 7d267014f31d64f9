//! The quest lifecycle engine.
//!
//! It runs the operations that touch a quest and one or more users:
//!
//! Operation | Checks | Effect | Atomicity
//! ---|---|---|---
//! Accept | quest and user exist, caller is not the creator, quest open | caller added to `acceptedBy` and quest id to `AcceptedQuests` | one transaction
//! Abandon | quest and user exist | caller removed from both sides | one transaction
//! Submit | quest exists and is open | the caller's submission replaces their previous one | one transaction
//! Remove submission | caller is the creator | submission removed by index or by user | one transaction
//! Approve | caller is the creator, quest open, approved user exists | reward awarded, completed quest recorded, quest closed | one transaction, then sweep and delete
//! Close | caller is the creator | quest closed | one transaction, then sweep and delete
//!
//! Validation and authorization that need no stored state run before any
//! transaction. Checks that need stored state run inside the transaction and
//! abort it with a typed [`Error`].
//!
//! Approve and close end with the best-effort [`Sweeper`] pass followed by
//! the unconditional deletion of the quest. They do not share the atomicity
//! of the first step: the quest is already `Closed` when the sweep runs, so a
//! failed sweep or delete can be finished by closing the quest again.
use std::sync::Arc;

use campus_quest_configuration::Rewards;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::databases::{self, Database};
use crate::core::error::Error;
use crate::core::quests::quest::{Operation, QuestId, QuestInput, Submission, SubmissionStatus};
use crate::core::quests::repository::QuestRepository;
use crate::core::records::Record;
use crate::core::sweeper::Sweeper;
use crate::core::users::ledger::UserLedger;
use crate::core::users::user::{CompletedQuest, User, UserId};
use crate::shared::clock::Time;
use crate::CurrentClock;

const QUEST_LIFECYCLE_LOG_TARGET: &str = "QUEST LIFECYCLE";

/// The client input to submit a proof of completion.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionInput {
    pub image_url: Option<String>,
    pub display_name: Option<String>,
}

/// Which submission to remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionSelector {
    /// The position in the submissions list.
    Index(i64),
    /// Every submission of a user.
    User(UserId),
}

/// The points awarded by an approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Approval {
    pub quest_id: QuestId,
    pub approved_user_id: UserId,
    pub reward: u64,
    pub creator_bonus: u64,
}

pub struct QuestLifecycle {
    database: Arc<Box<dyn Database>>,
    quests: Arc<QuestRepository>,
    users: Arc<UserLedger>,
    sweeper: Sweeper,
    rewards: Rewards,
}

impl QuestLifecycle {
    #[must_use]
    pub fn new(database: Arc<Box<dyn Database>>, quests: Arc<QuestRepository>, users: Arc<UserLedger>, rewards: Rewards) -> Self {
        Self {
            sweeper: Sweeper::new(database.clone()),
            database,
            quests,
            users,
            rewards,
        }
    }

    /// It creates a quest owned by the caller. The creator name is the
    /// caller's stored name, or the one in the input if the caller has no
    /// user document yet.
    ///
    /// # Errors
    ///
    /// Will return a validation error for malformed input, or an internal
    /// error if the store fails.
    pub fn create(&self, mut input: QuestInput, caller: &UserId) -> Result<QuestId, Error> {
        let creator_name = match self.users.user(caller) {
            Ok(user) => user.name,
            Err(Error::UserNotFound { .. }) => input.creator_name.take().unwrap_or_default(),
            Err(err) => return Err(err),
        };

        let quest_id = self.quests.create(input, caller, &creator_name)?;

        info!(target: QUEST_LIFECYCLE_LOG_TARGET, quest_id = %quest_id, creator_id = %caller, "quest created");

        Ok(quest_id)
    }

    /// # Errors
    ///
    /// Will return [`Error::QuestNotFound`], [`Error::CreatorCannotAccept`],
    /// [`Error::QuestClosed`] or [`Error::UserNotFound`]. Accepting twice is
    /// not an error.
    pub fn accept(&self, quest_id: &QuestId, caller: &UserId) -> Result<(), Error> {
        databases::transaction(&**self.database, |tx| {
            let mut quest = QuestRepository::load(tx, quest_id)?;

            if &quest.value.creator_id == caller {
                return Err(Error::CreatorCannotAccept {
                    quest_id: quest_id.clone(),
                });
            }

            quest.value.ensure_allows(quest_id, Operation::Accept)?;

            let mut user = UserLedger::load(tx, caller)?;

            quest.value.add_participant(caller);
            user.value.add_accepted_quest(quest_id);

            quest.save(tx)?;
            user.save(tx)?;

            Ok::<_, Error>(())
        })?;

        info!(target: QUEST_LIFECYCLE_LOG_TARGET, quest_id = %quest_id, user_id = %caller, "quest accepted");

        Ok(())
    }

    /// # Errors
    ///
    /// Will return [`Error::QuestNotFound`] or [`Error::UserNotFound`].
    /// Abandoning a quest that was not accepted is not an error.
    pub fn abandon(&self, quest_id: &QuestId, caller: &UserId) -> Result<(), Error> {
        databases::transaction(&**self.database, |tx| {
            let mut quest = QuestRepository::load(tx, quest_id)?;

            quest.value.ensure_allows(quest_id, Operation::Abandon)?;

            let mut user = UserLedger::load(tx, caller)?;

            quest.value.remove_participant(caller);
            user.value.remove_accepted_quest(quest_id);

            quest.save(tx)?;
            user.save(tx)?;

            Ok::<_, Error>(())
        })?;

        info!(target: QUEST_LIFECYCLE_LOG_TARGET, quest_id = %quest_id, user_id = %caller, "quest abandoned");

        Ok(())
    }

    /// It stores the caller's pending submission, replacing the previous one
    /// of the same caller.
    ///
    /// # Errors
    ///
    /// Will return [`Error::MissingField`] without an image, or
    /// [`Error::QuestNotFound`], or [`Error::QuestClosed`].
    pub fn submit(&self, quest_id: &QuestId, caller: &UserId, input: &SubmissionInput) -> Result<Submission, Error> {
        let image_url = match input.image_url.as_deref().map(str::trim) {
            Some(image_url) if !image_url.is_empty() => image_url.to_owned(),
            _ => return Err(Error::MissingField { field: "imageUrl" }),
        };

        let submission = databases::transaction(&**self.database, |tx| {
            let mut quest = QuestRepository::load(tx, quest_id)?;

            quest.value.ensure_allows(quest_id, Operation::Submit)?;

            let display_name = match input.display_name.as_deref().map(str::trim) {
                Some(display_name) if !display_name.is_empty() => display_name.to_owned(),
                _ => Record::<User>::load(tx, caller.as_str())?
                    .map(|user| user.value.name)
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| caller.to_string()),
            };

            let submission = Submission {
                user_id: caller.clone(),
                display_name,
                image_url: image_url.clone(),
                submitted_at: CurrentClock::now_rfc3339(),
                status: SubmissionStatus::Pending,
            };

            quest.value.put_submission(submission.clone());
            quest.save(tx)?;

            Ok::<_, Error>(submission)
        })?;

        info!(target: QUEST_LIFECYCLE_LOG_TARGET, quest_id = %quest_id, user_id = %caller, "submission received");

        Ok(submission)
    }

    /// The pending submissions. Only the creator may see them.
    ///
    /// # Errors
    ///
    /// Will return [`Error::QuestNotFound`] or [`Error::NotQuestCreator`].
    pub fn submissions(&self, quest_id: &QuestId, caller: &UserId) -> Result<Vec<Submission>, Error> {
        let quest = self.quests.get(quest_id)?.quest;

        quest.ensure_creator(quest_id, caller, Operation::ViewSubmissions)?;

        Ok(quest.submissions)
    }

    /// It removes a submission and returns the remaining ones.
    ///
    /// # Errors
    ///
    /// Will return [`Error::QuestNotFound`], [`Error::NotQuestCreator`], or
    /// [`Error::InvalidSubmissionIndex`] for an index out of range.
    pub fn remove_submission(&self, quest_id: &QuestId, caller: &UserId, selector: &SubmissionSelector) -> Result<Vec<Submission>, Error> {
        let submissions = databases::transaction(&**self.database, |tx| {
            let mut quest = QuestRepository::load(tx, quest_id)?;

            quest.value.ensure_creator(quest_id, caller, Operation::RemoveSubmission)?;
            quest.value.ensure_allows(quest_id, Operation::RemoveSubmission)?;

            match selector {
                SubmissionSelector::Index(index) => {
                    let position = usize::try_from(*index)
                        .ok()
                        .filter(|position| *position < quest.value.submissions.len())
                        .ok_or(Error::InvalidSubmissionIndex { index: *index })?;
                    quest.value.submissions.remove(position);
                }
                SubmissionSelector::User(user_id) => {
                    quest.value.submissions.retain(|submission| &submission.user_id != user_id);
                }
            }

            quest.save(tx)?;

            Ok::<_, Error>(quest.value.submissions)
        })?;

        info!(target: QUEST_LIFECYCLE_LOG_TARGET, quest_id = %quest_id, ?selector, "submission removed");

        Ok(submissions)
    }

    /// It awards the quest reward to the approved user and closes the quest.
    ///
    /// In one transaction: the approved user gets the reward in the three
    /// accumulators and a completed-quest snapshot, the creator gets half of
    /// the reward when the creator bonus is enabled and the creator is not
    /// the approved user, both lose the quest from their accepted set, and
    /// the quest is marked `Closed`. Then the quest is swept and deleted.
    ///
    /// # Errors
    ///
    /// Will return [`Error::QuestNotFound`], [`Error::NotQuestCreator`],
    /// [`Error::QuestClosed`] (so points are never awarded twice), or
    /// [`Error::UserNotFound`] for the approved user. No points move on error.
    pub fn approve(&self, quest_id: &QuestId, caller: &UserId, approved_user_id: &UserId) -> Result<Approval, Error> {
        let approval = databases::transaction(&**self.database, |tx| {
            let mut quest = QuestRepository::load(tx, quest_id)?;

            quest.value.ensure_creator(quest_id, caller, Operation::Approve)?;
            quest.value.ensure_allows(quest_id, Operation::Approve)?;

            let mut approved = UserLedger::load(tx, approved_user_id)?;

            let reward = quest.value.reward_points();

            self.users.award(&mut approved, reward);
            approved
                .value
                .completed_quests
                .push(CompletedQuest::of(quest_id, &quest.value, CurrentClock::now_rfc3339()));
            approved.value.remove_accepted_quest(quest_id);
            approved.save(tx)?;

            let mut creator_bonus = 0;

            if self.rewards.creator_bonus && &quest.value.creator_id != approved_user_id {
                if let Some(mut creator) = Record::<User>::load(tx, quest.value.creator_id.as_str())? {
                    creator_bonus = reward / 2;
                    self.users.award(&mut creator, creator_bonus);
                    creator.value.remove_accepted_quest(quest_id);
                    creator.save(tx)?;
                }
            }

            quest.value.close();
            quest.save(tx)?;

            Ok::<_, Error>(Approval {
                quest_id: quest_id.clone(),
                approved_user_id: approved_user_id.clone(),
                reward,
                creator_bonus,
            })
        })?;

        info!(
            target: QUEST_LIFECYCLE_LOG_TARGET,
            quest_id = %quest_id,
            approved_user_id = %approved_user_id,
            reward = approval.reward,
            creator_bonus = approval.creator_bonus,
            "submission approved"
        );

        self.sweep_and_delete(quest_id)?;

        Ok(approval)
    }

    /// It closes the quest without approving anybody.
    ///
    /// # Errors
    ///
    /// Will return [`Error::QuestNotFound`] or [`Error::NotQuestCreator`], or
    /// an internal error if the quest cannot be deleted.
    pub fn close(&self, quest_id: &QuestId, caller: &UserId) -> Result<(), Error> {
        databases::transaction(&**self.database, |tx| {
            let mut quest = QuestRepository::load(tx, quest_id)?;

            quest.value.ensure_creator(quest_id, caller, Operation::Close)?;
            quest.value.ensure_allows(quest_id, Operation::Close)?;

            quest.value.close();
            quest.save(tx)?;

            Ok::<_, Error>(())
        })?;

        info!(target: QUEST_LIFECYCLE_LOG_TARGET, quest_id = %quest_id, "quest closed");

        self.sweep_and_delete(quest_id)
    }

    fn sweep_and_delete(&self, quest_id: &QuestId) -> Result<(), Error> {
        if let Err(err) = self.sweeper.sweep(quest_id) {
            warn!(target: QUEST_LIFECYCLE_LOG_TARGET, quest_id = %quest_id, %err, "sweep failed, stale references may remain");
        }

        self.quests.delete(quest_id)
    }
}
