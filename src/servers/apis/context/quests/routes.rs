//! API routes for the [`quests`](crate::servers::apis::context::quests) API
//! context.
//!
//! - `POST /quests`
//! - `GET /quests`
//! - `GET /quests/{id}`
//! - `DELETE /quests/{id}`
//! - `PATCH /quests/{id}/accept`
//! - `PATCH /quests/{id}/abandon`
//! - `PATCH /quests/{id}/submit`
//! - `GET /quests/{id}/submissions`
//! - `PATCH /quests/{id}/submissions/remove`
//! - `POST /quests/{id}/approve`
//!
//! Refer to the [API endpoint documentation](crate::servers::apis::context::quests).
use std::sync::Arc;

use axum::routing::{delete, get, patch, post};
use axum::Router;

use super::handlers::{
    abandon_quest_handler, accept_quest_handler, approve_submission_handler, close_quest_handler, create_quest_handler,
    get_quest_handler, list_quests_handler, list_submissions_handler, remove_submission_handler, submit_quest_handler,
};
use crate::core::Campus;
use crate::servers::apis::middlewares::auth::authenticated;

/// It adds the routes to the router for the [`quests`](crate::servers::apis::context::quests) API context.
pub fn add(prefix: &str, router: Router, campus: &Arc<Campus>) -> Router {
    router
        .route(
            &format!("{prefix}/quests"),
            get(list_quests_handler)
                .with_state(campus.clone())
                .merge(authenticated(post(create_quest_handler), campus)),
        )
        .route(
            &format!("{prefix}/quests/{{id}}"),
            get(get_quest_handler)
                .with_state(campus.clone())
                .merge(authenticated(delete(close_quest_handler), campus)),
        )
        .route(
            &format!("{prefix}/quests/{{id}}/accept"),
            authenticated(patch(accept_quest_handler), campus),
        )
        .route(
            &format!("{prefix}/quests/{{id}}/abandon"),
            authenticated(patch(abandon_quest_handler), campus),
        )
        .route(
            &format!("{prefix}/quests/{{id}}/submit"),
            authenticated(patch(submit_quest_handler), campus),
        )
        .route(
            &format!("{prefix}/quests/{{id}}/submissions"),
            authenticated(get(list_submissions_handler), campus),
        )
        .route(
            &format!("{prefix}/quests/{{id}}/submissions/remove"),
            authenticated(patch(remove_submission_handler), campus),
        )
        .route(
            &format!("{prefix}/quests/{{id}}/approve"),
            authenticated(post(approve_submission_handler), campus),
        )
}
