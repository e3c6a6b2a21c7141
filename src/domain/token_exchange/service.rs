use super::error::TokenExchangeError;
use super::model::{ClientCredentials, TokenRequest, UpstreamBody};
use crate::infrastructure::oauth::BlingOAuthClient;
use async_trait::async_trait;
use std::sync::Arc;

pub struct TokenExchangeService {
    credentials: Option<ClientCredentials>,
    bling_client: Arc<BlingOAuthClient>,
}

impl TokenExchangeService {
    pub fn new(credentials: Option<ClientCredentials>, bling_client: Arc<BlingOAuthClient>) -> Self {
        Self {
            credentials,
            bling_client,
        }
    }
}

#[async_trait]
pub trait TokenExchangeApi: Send + Sync {
    /// Exchange an authorization code or refresh token for provider tokens.
    async fn exchange(&self, request: TokenRequest) -> Result<UpstreamBody, TokenExchangeError>;
}

#[async_trait]
impl TokenExchangeApi for TokenExchangeService {
    async fn exchange(&self, request: TokenRequest) -> Result<UpstreamBody, TokenExchangeError> {
        // Checked on every call so nothing leaves the process without credentials.
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            TokenExchangeError::Misconfigured("Bling client credentials are not configured".to_string())
        })?;

        let grant = request.into_grant()?;
        tracing::info!(grant_type = %grant.grant_type(), "Exchanging Bling token");

        let body = self.bling_client.exchange(credentials, &grant).await?;
        tracing::info!(grant_type = %grant.grant_type(), "Bling token exchange succeeded");

        Ok(body)
    }
}
