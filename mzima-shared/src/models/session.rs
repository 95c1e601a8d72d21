//! Session token and its persisted field table.

use serde::{Deserialize, Serialize};
use std::num::ParseIntError;
use strum::EnumIter;

/// Authentication token data held by the current session.
///
/// All four fields are always present. An unauthenticated session is
/// represented by empty strings and a zero expiry, never by missing fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionToken {
    /// Bearer token sent with API requests.
    pub access_token: String,
    /// Expiry of the access token, in epoch seconds.
    pub access_token_expires: i64,
    /// OAuth grant type used to obtain the token.
    pub grant_type: String,
    /// Token type, usually `Bearer`.
    pub token_type: String,
}

impl SessionToken {
    /// Returns `true` when an access token is held.
    #[must_use]
    pub fn has_access_token(&self) -> bool {
        !self.access_token.is_empty()
    }
}

/// One persisted field of a [`SessionToken`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum SessionField {
    /// [`SessionToken::access_token`].
    AccessToken,
    /// [`SessionToken::access_token_expires`].
    AccessTokenExpires,
    /// [`SessionToken::grant_type`].
    GrantType,
    /// [`SessionToken::token_type`].
    TokenType,
}

impl SessionField {
    /// Logical storage key for this field.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::AccessToken => "accessToken",
            Self::AccessTokenExpires => "accessTokenExpires",
            Self::GrantType => "grantType",
            Self::TokenType => "tokenType",
        }
    }

    /// Encodes the field's value from `token` for storage.
    #[must_use]
    pub fn encode(self, token: &SessionToken) -> String {
        match self {
            Self::AccessToken => token.access_token.clone(),
            Self::AccessTokenExpires => token.access_token_expires.to_string(),
            Self::GrantType => token.grant_type.clone(),
            Self::TokenType => token.token_type.clone(),
        }
    }

    /// Decodes a stored value into this field of `token`.
    ///
    /// # Errors
    /// Returns the parse error when the expiry is neither blank nor an
    /// integer; `token` is left unchanged in that case.
    pub fn decode(self, token: &mut SessionToken, raw: &str) -> Result<(), ParseIntError> {
        match self {
            Self::AccessToken => token.access_token = raw.to_string(),
            Self::AccessTokenExpires => {
                let trimmed = raw.trim();
                token.access_token_expires = if trimmed.is_empty() {
                    0
                } else {
                    trimmed.parse()?
                };
            }
            Self::GrantType => token.grant_type = raw.to_string(),
            Self::TokenType => token.token_type = raw.to_string(),
        }
        Ok(())
    }
}
