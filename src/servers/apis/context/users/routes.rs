//! API routes for the [`users`](crate::servers::apis::context::users) API
//! context.
//!
//! - `POST /users`
//! - `GET /users/{id}`
//! - `GET /users/profile`
//! - `PATCH /users/profile`
//! - `GET /users/inventory`
//! - `POST /users/inventory/unlock`
//! - `PATCH /users/customisation`
//! - `POST /users/journey/start`
//! - `POST /users/journey/advance`
//! - `POST /users/journey/complete`
//! - `GET /users/leaderboard`
//!
//! Refer to the [API endpoint documentation](crate::servers::apis::context::users).
use std::sync::Arc;

use axum::routing::{get, patch, post};
use axum::Router;

use super::handlers::{
    advance_journey_handler, complete_journey_handler, customise_handler, get_inventory_handler, get_profile_handler,
    get_user_handler, leaderboard_handler, register_user_handler, start_journey_handler, unlock_item_handler,
    update_profile_handler,
};
use crate::core::Campus;
use crate::servers::apis::middlewares::auth::authenticated;

/// It adds the routes to the router for the [`users`](crate::servers::apis::context::users) API context.
pub fn add(prefix: &str, router: Router, campus: &Arc<Campus>) -> Router {
    router
        .route(&format!("{prefix}/users"), authenticated(post(register_user_handler), campus))
        // Static segments win over `{id}`
        .route(
            &format!("{prefix}/users/leaderboard"),
            get(leaderboard_handler).with_state(campus.clone()),
        )
        .route(
            &format!("{prefix}/users/profile"),
            authenticated(get(get_profile_handler).patch(update_profile_handler), campus),
        )
        .route(
            &format!("{prefix}/users/inventory"),
            authenticated(get(get_inventory_handler), campus),
        )
        .route(
            &format!("{prefix}/users/inventory/unlock"),
            authenticated(post(unlock_item_handler), campus),
        )
        .route(
            &format!("{prefix}/users/customisation"),
            authenticated(patch(customise_handler), campus),
        )
        .route(
            &format!("{prefix}/users/journey/start"),
            authenticated(post(start_journey_handler), campus),
        )
        .route(
            &format!("{prefix}/users/journey/advance"),
            authenticated(post(advance_journey_handler), campus),
        )
        .route(
            &format!("{prefix}/users/journey/complete"),
            authenticated(post(complete_journey_handler), campus),
        )
        .route(&format!("{prefix}/users/{{id}}"), authenticated(get(get_user_handler), campus))
}
