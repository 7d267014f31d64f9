//! API handlers for the [`quests`](crate::servers::apis::context::quests) API context.
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::{Extension, Json};

use super::forms::{ApproveForm, RemoveSubmissionForm};
use super::responses::{
    quest_created_response, submission_approved_response, submission_received_response, submission_removed_response,
};
use crate::core::lifecycle::SubmissionInput;
use crate::core::quests::quest::{QuestId, QuestInput};
use crate::core::Campus;
use crate::servers::apis::middlewares::auth::Caller;
use crate::servers::apis::responses::{error_response, invalid_body_response, message_response, ok_response};

/// It handles the request to create a quest owned by the caller.
///
/// It returns `201` with the new quest id, or `400` if the input is invalid.
///
/// Refer to the [API endpoint documentation](crate::servers::apis::context::quests#create-a-quest)
/// for more information about this endpoint.
pub async fn create_quest_handler(
    State(campus): State<Arc<Campus>>,
    Extension(Caller(caller)): Extension<Caller>,
    payload: Result<Json<QuestInput>, JsonRejection>,
) -> Response {
    let Json(input) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return invalid_body_response(&rejection),
    };

    match campus.lifecycle.create(input, &caller) {
        Ok(quest_id) => quest_created_response(&quest_id),
        Err(err) => error_response(&err),
    }
}

/// It handles the request to list every quest.
pub async fn list_quests_handler(State(campus): State<Arc<Campus>>) -> Response {
    match campus.quests.list() {
        Ok(quests) => ok_response(&quests),
        Err(err) => error_response(&err),
    }
}

/// It handles the request to get one quest. It returns `404` if the quest
/// does not exist.
pub async fn get_quest_handler(State(campus): State<Arc<Campus>>, Path(quest_id): Path<QuestId>) -> Response {
    match campus.quests.get(&quest_id) {
        Ok(quest) => ok_response(&quest),
        Err(err) => error_response(&err),
    }
}

pub async fn close_quest_handler(
    State(campus): State<Arc<Campus>>,
    Extension(Caller(caller)): Extension<Caller>,
    Path(quest_id): Path<QuestId>,
) -> Response {
    match campus.lifecycle.close(&quest_id, &caller) {
        Ok(()) => message_response("Quest closed"),
        Err(err) => error_response(&err),
    }
}

pub async fn accept_quest_handler(
    State(campus): State<Arc<Campus>>,
    Extension(Caller(caller)): Extension<Caller>,
    Path(quest_id): Path<QuestId>,
) -> Response {
    match campus.lifecycle.accept(&quest_id, &caller) {
        Ok(()) => message_response("Quest accepted"),
        Err(err) => error_response(&err),
    }
}

pub async fn abandon_quest_handler(
    State(campus): State<Arc<Campus>>,
    Extension(Caller(caller)): Extension<Caller>,
    Path(quest_id): Path<QuestId>,
) -> Response {
    match campus.lifecycle.abandon(&quest_id, &caller) {
        Ok(()) => message_response("Quest abandoned"),
        Err(err) => error_response(&err),
    }
}

/// It handles the request to submit a proof of completion.
///
/// The submission replaces any previous submission of the caller.
pub async fn submit_quest_handler(
    State(campus): State<Arc<Campus>>,
    Extension(Caller(caller)): Extension<Caller>,
    Path(quest_id): Path<QuestId>,
    payload: Result<Json<SubmissionInput>, JsonRejection>,
) -> Response {
    let Json(input) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return invalid_body_response(&rejection),
    };

    match campus.lifecycle.submit(&quest_id, &caller, &input) {
        Ok(submission) => submission_received_response(&submission),
        Err(err) => error_response(&err),
    }
}

/// It handles the request to list the submissions of a quest. Only the
/// creator can see them.
pub async fn list_submissions_handler(
    State(campus): State<Arc<Campus>>,
    Extension(Caller(caller)): Extension<Caller>,
    Path(quest_id): Path<QuestId>,
) -> Response {
    match campus.lifecycle.submissions(&quest_id, &caller) {
        Ok(submissions) => ok_response(&submissions),
        Err(err) => error_response(&err),
    }
}

/// It handles the request to remove a submission by index or by user.
///
/// Refer to the [API endpoint documentation](crate::servers::apis::context::quests#remove-a-submission)
/// for more information about this endpoint.
pub async fn remove_submission_handler(
    State(campus): State<Arc<Campus>>,
    Extension(Caller(caller)): Extension<Caller>,
    Path(quest_id): Path<QuestId>,
    payload: Result<Json<RemoveSubmissionForm>, JsonRejection>,
) -> Response {
    let Json(form) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return invalid_body_response(&rejection),
    };

    let result = form
        .selector()
        .and_then(|selector| campus.lifecycle.remove_submission(&quest_id, &caller, &selector));

    match result {
        Ok(submissions) => submission_removed_response(&submissions),
        Err(err) => error_response(&err),
    }
}

/// It handles the request to approve the submission of a user.
///
/// It returns `200` with the awarded points, `400` without an
/// `approvedUserId`, `403` if the caller is not the creator and `404` if the
/// quest does not exist.
pub async fn approve_submission_handler(
    State(campus): State<Arc<Campus>>,
    Extension(Caller(caller)): Extension<Caller>,
    Path(quest_id): Path<QuestId>,
    payload: Result<Json<ApproveForm>, JsonRejection>,
) -> Response {
    let Json(form) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return invalid_body_response(&rejection),
    };

    let result = form
        .approved_user_id()
        .and_then(|approved_user_id| campus.lifecycle.approve(&quest_id, &caller, &approved_user_id));

    match result {
        Ok(approval) => submission_approved_response(&approval),
        Err(err) => error_response(&err),
    }
}
