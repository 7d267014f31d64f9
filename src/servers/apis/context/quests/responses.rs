//! API responses for the [`quests`](crate::servers::apis::context::quests) API context.
use axum::http::StatusCode;
use axum::response::Response;
use serde::Serialize;

use crate::core::lifecycle::Approval;
use crate::core::quests::quest::{QuestId, Submission};
use crate::servers::apis::responses::{json_response, ok_response};

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct QuestCreated<'a> {
    pub message: &'a str,
    pub quest_id: &'a QuestId,
}

#[derive(Serialize, Debug)]
pub struct SubmissionReceived<'a> {
    pub message: &'a str,
    pub submission: &'a Submission,
}

#[derive(Serialize, Debug)]
pub struct SubmissionRemoved<'a> {
    pub message: &'a str,
    pub submissions: &'a [Submission],
}

#[derive(Serialize, Debug)]
pub struct SubmissionApproved<'a> {
    pub message: &'a str,
    #[serde(flatten)]
    pub approval: &'a Approval,
}

#[must_use]
pub fn quest_created_response(quest_id: &QuestId) -> Response {
    json_response(
        StatusCode::CREATED,
        &QuestCreated {
            message: "Quest created",
            quest_id,
        },
    )
}

#[must_use]
pub fn submission_received_response(submission: &Submission) -> Response {
    ok_response(&SubmissionReceived {
        message: "Submission received",
        submission,
    })
}

#[must_use]
pub fn submission_removed_response(submissions: &[Submission]) -> Response {
    ok_response(&SubmissionRemoved {
        message: "Submission removed",
        submissions,
    })
}

#[must_use]
pub fn submission_approved_response(approval: &Approval) -> Response {
    ok_response(&SubmissionApproved {
        message: "Submission approved",
        approval,
    })
}
