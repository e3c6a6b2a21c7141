use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::TokenExchangeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
    AuthorizationCode,
    RefreshToken,
}

impl GrantType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthorizationCode => "authorization_code",
            Self::RefreshToken => "refresh_token",
        }
    }
}

impl fmt::Display for GrantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inbound exchange request, read either from a JSON body or the query string.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TokenRequest {
    #[serde(default, alias = "grantType")]
    pub grant_type: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, alias = "refreshToken")]
    pub refresh_token: Option<String>,
}

impl TokenRequest {
    /// Explicit grant type wins, then a present refresh token implies
    /// `refresh_token`, otherwise `authorization_code`.
    pub fn grant_type(&self) -> Result<GrantType, TokenExchangeError> {
        match non_empty(&self.grant_type) {
            Some("authorization_code") => Ok(GrantType::AuthorizationCode),
            Some("refresh_token") => Ok(GrantType::RefreshToken),
            Some(other) => Err(TokenExchangeError::InvalidRequest(format!(
                "unsupported grant_type: {}",
                other
            ))),
            None if non_empty(&self.refresh_token).is_some() => Ok(GrantType::RefreshToken),
            None => Ok(GrantType::AuthorizationCode),
        }
    }

    pub fn into_grant(self) -> Result<TokenGrant, TokenExchangeError> {
        match self.grant_type()? {
            GrantType::AuthorizationCode => match self.code.filter(|c| !c.is_empty()) {
                Some(code) => Ok(TokenGrant::AuthorizationCode { code }),
                None => Err(TokenExchangeError::InvalidRequest(
                    "authorization_code grant requires code".to_string(),
                )),
            },
            GrantType::RefreshToken => match self.refresh_token.filter(|t| !t.is_empty()) {
                Some(refresh_token) => Ok(TokenGrant::RefreshToken { refresh_token }),
                None => Err(TokenExchangeError::InvalidRequest(
                    "refresh_token grant requires refresh_token".to_string(),
                )),
            },
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// A validated grant, carrying exactly the one credential its type needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenGrant {
    AuthorizationCode { code: String },
    RefreshToken { refresh_token: String },
}

impl TokenGrant {
    pub fn grant_type(&self) -> GrantType {
        match self {
            Self::AuthorizationCode { .. } => GrantType::AuthorizationCode,
            Self::RefreshToken { .. } => GrantType::RefreshToken,
        }
    }

    /// Form parameters sent to the provider's token endpoint.
    pub fn form_params(&self) -> [(&'static str, &str); 2] {
        match self {
            Self::AuthorizationCode { code } => {
                [("grant_type", "authorization_code"), ("code", code.as_str())]
            }
            Self::RefreshToken { refresh_token } => [
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
            ],
        }
    }
}

/// Provider response body. JSON is relayed as-is; anything else is wrapped
/// as `{ "raw": <text> }` so callers always receive JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UpstreamBody {
    Parsed(Value),
    Raw { raw: String },
}

impl UpstreamBody {
    pub fn from_text(text: String) -> Self {
        match serde_json::from_str(&text) {
            Ok(value) => Self::Parsed(value),
            Err(_) => Self::Raw { raw: text },
        }
    }
}

/// Confidential client secret. Not serializable, and redacted from `Debug`.
#[derive(Clone)]
pub struct ClientSecret(String);

impl ClientSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientSecret(***)")
    }
}

#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: ClientSecret,
}

impl ClientCredentials {
    pub fn new(client_id: String, client_secret: ClientSecret) -> Self {
        Self {
            client_id,
            client_secret,
        }
    }
}
