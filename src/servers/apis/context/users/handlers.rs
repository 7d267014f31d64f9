//! API handlers for the [`users`](crate::servers::apis::context::users) API context.
//!
//! Every handler but the leaderboard acts on the document of the caller.
use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::{Extension, Json};
use serde_json::{Map, Value};

use super::forms::{LeaderboardQueryParams, RegistrationForm, StartJourneyForm, UnlockForm};
use super::responses::{customisation_response, user_registered_response};
use crate::core::users::authorize_owner;
use crate::core::users::ledger::DEFAULT_LEADERBOARD_LIMIT;
use crate::core::users::user::{ProfileUpdate, UserId};
use crate::core::Campus;
use crate::servers::apis::middlewares::auth::Caller;
use crate::servers::apis::responses::{error_response, invalid_body_response, invalid_query_response, ok_response};

/// It handles the request to register the caller.
///
/// It returns `403` if `userId` is not the id of the caller.
///
/// Refer to the [API endpoint documentation](crate::servers::apis::context::users#register-a-user)
/// for more information about this endpoint.
pub async fn register_user_handler(
    State(campus): State<Arc<Campus>>,
    Extension(Caller(caller)): Extension<Caller>,
    payload: Result<Json<RegistrationForm>, JsonRejection>,
) -> Response {
    let Json(form) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return invalid_body_response(&rejection),
    };

    let result = form.user_id().and_then(|user_id| {
        authorize_owner(&caller, &user_id)?;

        campus.users.create(
            &user_id,
            form.email.as_deref().unwrap_or_default(),
            form.name.as_deref().unwrap_or_default(),
            form.role.as_deref().unwrap_or_default(),
        )
    });

    match result {
        Ok(registration) => user_registered_response(registration),
        Err(err) => error_response(&err),
    }
}

/// It handles the request to get a raw user document. Only the owner can
/// read it.
pub async fn get_user_handler(
    State(campus): State<Arc<Campus>>,
    Extension(Caller(caller)): Extension<Caller>,
    Path(user_id): Path<UserId>,
) -> Response {
    let result = authorize_owner(&caller, &user_id).and_then(|()| campus.users.document(&user_id));

    match result {
        Ok(document) => ok_response(&document),
        Err(err) => error_response(&err),
    }
}

pub async fn get_profile_handler(State(campus): State<Arc<Campus>>, Extension(Caller(caller)): Extension<Caller>) -> Response {
    match campus.users.profile(&caller) {
        Ok(profile) => ok_response(&profile),
        Err(err) => error_response(&err),
    }
}

/// It handles the request to change the name, bio or picture of the caller.
/// Fields not in the body are kept.
pub async fn update_profile_handler(
    State(campus): State<Arc<Campus>>,
    Extension(Caller(caller)): Extension<Caller>,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> Response {
    let Json(update) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return invalid_body_response(&rejection),
    };

    match campus.users.update_profile(&caller, &update) {
        Ok(profile) => ok_response(&profile),
        Err(err) => error_response(&err),
    }
}

pub async fn get_inventory_handler(State(campus): State<Arc<Campus>>, Extension(Caller(caller)): Extension<Caller>) -> Response {
    match campus.users.inventory(&caller) {
        Ok(inventory) => ok_response(&inventory),
        Err(err) => error_response(&err),
    }
}

/// It handles the request to spend points on an inventory item.
///
/// Refer to the [API endpoint documentation](crate::servers::apis::context::users#unlock-an-inventory-item)
/// for more information about this endpoint.
pub async fn unlock_item_handler(
    State(campus): State<Arc<Campus>>,
    Extension(Caller(caller)): Extension<Caller>,
    payload: Result<Json<UnlockForm>, JsonRejection>,
) -> Response {
    let Json(form) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return invalid_body_response(&rejection),
    };

    let result = form
        .item()
        .and_then(|(item_id, cost)| campus.users.unlock_inventory_item(&caller, item_id, cost));

    match result {
        Ok(inventory) => ok_response(&inventory),
        Err(err) => error_response(&err),
    }
}

pub async fn customise_handler(
    State(campus): State<Arc<Campus>>,
    Extension(Caller(caller)): Extension<Caller>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Response {
    let Json(preferences) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return invalid_body_response(&rejection),
    };

    match campus.users.customise(&caller, &preferences) {
        Ok(customisation) => customisation_response(&customisation),
        Err(err) => error_response(&err),
    }
}

pub async fn start_journey_handler(
    State(campus): State<Arc<Campus>>,
    Extension(Caller(caller)): Extension<Caller>,
    payload: Result<Json<StartJourneyForm>, JsonRejection>,
) -> Response {
    let Json(form) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return invalid_body_response(&rejection),
    };

    let result = form
        .quest_id()
        .and_then(|quest_id| campus.users.start_journey(&caller, &quest_id));

    match result {
        Ok(journey) => ok_response(&journey),
        Err(err) => error_response(&err),
    }
}

pub async fn advance_journey_handler(State(campus): State<Arc<Campus>>, Extension(Caller(caller)): Extension<Caller>) -> Response {
    match campus.users.advance_journey(&caller) {
        Ok(journey) => ok_response(&journey),
        Err(err) => error_response(&err),
    }
}

pub async fn complete_journey_handler(
    State(campus): State<Arc<Campus>>,
    Extension(Caller(caller)): Extension<Caller>,
) -> Response {
    match campus.users.complete_journey(&caller) {
        Ok(journey) => ok_response(&journey),
        Err(err) => error_response(&err),
    }
}

/// It handles the request for the users with the most leaderboard points.
///
/// It returns `400` if `limit` is not a non-negative integer.
pub async fn leaderboard_handler(
    State(campus): State<Arc<Campus>>,
    params: Result<Query<LeaderboardQueryParams>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => return invalid_query_response(&rejection),
    };

    match campus.users.leaderboard(params.limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT)) {
        Ok(entries) => ok_response(&entries),
        Err(err) => error_response(&err),
    }
}
