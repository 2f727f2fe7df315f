//! Credentials file shared with the collector container.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

const TOKEN_KEY: &str = "twitter_token";

#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("credentials file has no 'twitter_token' entry")]
    MissingToken,
}

/// Flat key/value credentials mapping.
///
/// The collector reads the same file, so unknown keys are kept rather than
/// rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Credentials(BTreeMap<String, String>);

impl Credentials {
    /// Bearer token for the Twitter API.
    pub fn twitter_token(&self) -> Result<&str, CredentialsError> {
        self.0
            .get(TOKEN_KEY)
            .map(String::as_str)
            .ok_or(CredentialsError::MissingToken)
    }
}
