//! Identity verification.
//!
//! Requests carry a bearer credential in the `Authorization` header:
//!
//! ```text
//! Authorization: Bearer PlayerToken
//! ```
//!
//! An [`IdentityVerifier`] turns the credential into the stable [`UserId`]
//! of the caller. There are two verifiers:
//!
//! - [`StaticTokenVerifier`]: a fixed token to user id map from the
//!   configuration. Useful for development and tests.
//! - [`RemoteVerifier`]: asks an external identity service. The service
//!   receives the same `Authorization` header and answers a `2xx` response
//!   with a JSON body like `{"uid": "u1"}` for valid credentials.
//!
//! Every verification failure is reported to clients as `401 Unauthorized`.
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use campus_quest_configuration::{Identity, IdentityVerifier as VerifierKind};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::core::users::user::UserId;
use crate::shared::DynError;

const AUTH_LOG_TARGET: &str = "AUTH";

/// Verification error. The credential is not accepted.
#[derive(Debug, Error, Clone)]
pub enum Error {
    #[error("missing bearer credential")]
    MissingCredential,
    #[error("malformed authorization header")]
    MalformedCredential,
    #[error("unknown credential")]
    UnknownCredential,
    #[error("the identity service rejected the credential with status {status}")]
    Rejected { status: u16 },
    #[error("the identity service could not be reached: {err}")]
    Unavailable { err: DynError },
}

/// It extracts the credential from an `Authorization` header value.
///
/// # Errors
///
/// Will return `Error::MissingCredential` without a header, or
/// `Error::MalformedCredential` if the scheme is not `Bearer` or the
/// credential is empty.
pub fn parse_bearer(header: Option<&str>) -> Result<&str, Error> {
    let header = header.ok_or(Error::MissingCredential)?;

    let (scheme, credential) = header.trim().split_once(' ').ok_or(Error::MalformedCredential)?;

    if !scheme.eq_ignore_ascii_case("bearer") || credential.trim().is_empty() {
        return Err(Error::MalformedCredential);
    }

    Ok(credential.trim())
}

/// Maps a bearer credential to the stable id of a user.
#[async_trait]
pub trait IdentityVerifier: Sync + Send {
    /// # Errors
    ///
    /// Will return an `Error` if the credential is not valid.
    async fn verify(&self, credential: &str) -> Result<UserId, Error>;
}

/// A verifier with a fixed set of credentials.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, UserId>,
}

impl StaticTokenVerifier {
    #[must_use]
    pub fn new(tokens: &HashMap<String, String>) -> Self {
        Self {
            tokens: tokens
                .iter()
                .map(|(token, user_id)| (token.clone(), UserId::from(user_id.as_str())))
                .collect(),
        }
    }
}

#[async_trait]
impl IdentityVerifier for StaticTokenVerifier {
    async fn verify(&self, credential: &str) -> Result<UserId, Error> {
        self.tokens.get(credential).cloned().ok_or(Error::UnknownCredential)
    }
}

#[derive(Deserialize)]
struct VerifiedIdentity {
    uid: String,
}

/// A verifier backed by an external identity service.
#[derive(Debug, Clone)]
pub struct RemoteVerifier {
    client: reqwest::Client,
    url: Url,
}

impl RemoteVerifier {
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl IdentityVerifier for RemoteVerifier {
    async fn verify(&self, credential: &str) -> Result<UserId, Error> {
        let response = self
            .client
            .get(self.url.clone())
            .bearer_auth(credential)
            .send()
            .await
            .map_err(|err| Error::Unavailable { err: Arc::new(err) })?;

        if !response.status().is_success() {
            debug!(target: AUTH_LOG_TARGET, status = %response.status(), "credential rejected by the identity service");
            return Err(Error::Rejected {
                status: response.status().as_u16(),
            });
        }

        let identity = response
            .json::<VerifiedIdentity>()
            .await
            .map_err(|err| Error::Unavailable { err: Arc::new(err) })?;

        if identity.uid.is_empty() {
            return Err(Error::UnknownCredential);
        }

        Ok(UserId::from(identity.uid))
    }
}

/// It builds the verifier selected in the configuration.
///
/// # Panics
///
/// Will panic if the remote verifier is selected without a URL. The
/// configuration validator rejects that combination.
#[must_use]
pub fn verifier_factory(config: &Identity) -> Arc<dyn IdentityVerifier> {
    match config.verifier {
        VerifierKind::Static => Arc::new(StaticTokenVerifier::new(&config.tokens)),
        VerifierKind::Remote => {
            let url = config
                .remote_url
                .clone()
                .expect("the remote identity verifier requires `identity.remote_url`");
            Arc::new(RemoteVerifier::new(url))
        }
    }
}

#[cfg(test)]
mod tests {

    mod parsing_the_authorization_header {
        use crate::core::auth::{parse_bearer, Error};

        #[test]
        fn it_should_return_the_bearer_credential() {
            assert_eq!(parse_bearer(Some("Bearer PlayerToken")).unwrap(), "PlayerToken");
            assert_eq!(parse_bearer(Some("bearer  PlayerToken ")).unwrap(), "PlayerToken");
        }

        #[test]
        fn it_should_fail_without_a_header() {
            assert!(matches!(parse_bearer(None), Err(Error::MissingCredential)));
        }

        #[test]
        fn it_should_fail_with_another_scheme_or_an_empty_credential() {
            assert!(matches!(parse_bearer(Some("Basic dXNlcjpwYXNz")), Err(Error::MalformedCredential)));
            assert!(matches!(parse_bearer(Some("Bearer")), Err(Error::MalformedCredential)));
            assert!(matches!(parse_bearer(Some("Bearer  ")), Err(Error::MalformedCredential)));
        }
    }

    mod the_static_verifier {
        use std::collections::HashMap;

        use crate::core::auth::{Error, IdentityVerifier, StaticTokenVerifier};
        use crate::core::users::user::UserId;

        #[tokio::test]
        async fn it_should_map_known_tokens_to_user_ids() {
            let verifier = StaticTokenVerifier::new(&HashMap::from([("PlayerToken".to_string(), "u1".to_string())]));

            assert_eq!(verifier.verify("PlayerToken").await.unwrap(), UserId::from("u1"));
            assert!(matches!(verifier.verify("Unknown").await, Err(Error::UnknownCredential)));
        }
    }

    mod the_remote_verifier {
        use axum::http::{HeaderMap, StatusCode};
        use axum::routing::get;
        use axum::{Json, Router};
        use serde_json::{json, Value};
        use url::Url;

        use crate::core::auth::{Error, IdentityVerifier, RemoteVerifier};
        use crate::core::users::user::UserId;

        async fn verify(headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
            match headers.get("authorization").and_then(|value| value.to_str().ok()) {
                Some("Bearer GoodToken") => Ok(Json(json!({"uid": "remote-user"}))),
                _ => Err(StatusCode::UNAUTHORIZED),
            }
        }

        async fn identity_service() -> Url {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let address = listener.local_addr().unwrap();

            tokio::spawn(async move {
                axum::serve(listener, Router::new().route("/verify", get(verify)))
                    .await
                    .unwrap();
            });

            Url::parse(&format!("http://{address}/verify")).unwrap()
        }

        #[tokio::test]
        async fn it_should_return_the_user_id_of_a_valid_credential() {
            let verifier = RemoteVerifier::new(identity_service().await);

            assert_eq!(verifier.verify("GoodToken").await.unwrap(), UserId::from("remote-user"));
        }

        #[tokio::test]
        async fn it_should_fail_when_the_service_rejects_the_credential() {
            let verifier = RemoteVerifier::new(identity_service().await);

            assert!(matches!(verifier.verify("BadToken").await, Err(Error::Rejected { status: 401 })));
        }

        #[tokio::test]
        async fn it_should_fail_when_the_service_is_unreachable() {
            let verifier = RemoteVerifier::new(Url::parse("http://127.0.0.1:1/verify").unwrap());

            assert!(matches!(verifier.verify("GoodToken").await, Err(Error::Unavailable { .. })));
        }
    }
}
