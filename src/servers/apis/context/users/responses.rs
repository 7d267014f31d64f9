//! API responses for the [`users`](crate::servers::apis::context::users) API context.
use std::collections::BTreeMap;

use axum::response::Response;
use serde::Serialize;

use crate::core::users::ledger::Registration;
use crate::servers::apis::responses::{message_response, ok_response};

#[derive(Serialize, Debug)]
pub struct Customisation<'a> {
    pub customisation: &'a BTreeMap<String, String>,
}

#[must_use]
pub fn user_registered_response(registration: Registration) -> Response {
    match registration {
        Registration::Created => message_response("User created"),
        Registration::Refreshed => message_response("User updated"),
    }
}

#[must_use]
pub fn customisation_response(customisation: &BTreeMap<String, String>) -> Response {
    ok_response(&Customisation { customisation })
}
