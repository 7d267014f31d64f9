use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use url::Url;

/// Bearer token to user id.
pub type Tokens = HashMap<String, String>;

/// Configuration for the identity verifier that maps a bearer credential to
/// a stable user id.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct Identity {
    /// Which verifier implementation to use.
    #[serde(default = "Identity::default_verifier")]
    pub verifier: Verifier,

    /// Endpoint used by the `remote` verifier. It receives the bearer token in
    /// the `Authorization` header and answers `{"uid": "<user id>"}`.
    #[serde(default = "Identity::default_remote_url")]
    pub remote_url: Option<Url>,

    /// Tokens accepted by the `static` verifier. The key is the bearer token
    /// and the value is the user id it authenticates.
    #[serde(default = "Identity::default_tokens")]
    pub tokens: Tokens,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            verifier: Self::default_verifier(),
            tokens: Self::default_tokens(),
            remote_url: Self::default_remote_url(),
        }
    }
}

impl Identity {
    fn default_verifier() -> Verifier {
        Verifier::Static
    }

    fn default_tokens() -> Tokens {
        Tokens::new()
    }

    fn default_remote_url() -> Option<Url> {
        None
    }

    pub fn add_token(&mut self, token: &str, user_id: &str) {
        self.tokens.insert(token.to_string(), user_id.to_string());
    }

    /// Replaces the tokens with a placeholder. The user ids are kept because
    /// they are not secret.
    pub fn mask_secrets(&mut self) {
        self.tokens = self
            .tokens
            .drain()
            .enumerate()
            .map(|(index, (_token, user_id))| (format!("***{index}"), user_id))
            .collect();
    }
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Verifier {
    /// Tokens are looked up in the `identity.tokens` table.
    Static,
    /// Tokens are verified by an external HTTP service.
    Remote,
}
