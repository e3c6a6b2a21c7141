use std::time::Duration;

use reqwest::header::ACCEPT;

use crate::domain::token_exchange::{
    ClientCredentials, TokenExchangeError, TokenGrant, UpstreamBody,
};

/// Bling pins its API version through the Accept header.
const BLING_API_VERSION: &str = "1.0";

pub struct BlingOAuthClient {
    token_url: String,
    http_client: reqwest::Client,
}

impl BlingOAuthClient {
    pub fn new(token_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            token_url,
            http_client,
        })
    }

    /// POST the grant to the token endpoint with HTTP Basic client
    /// authentication. Single attempt: a consumed authorization code cannot
    /// be replayed.
    pub async fn exchange(
        &self,
        credentials: &ClientCredentials,
        grant: &TokenGrant,
    ) -> Result<UpstreamBody, TokenExchangeError> {
        let response = self
            .http_client
            .post(&self.token_url)
            .basic_auth(
                &credentials.client_id,
                Some(credentials.client_secret.expose()),
            )
            .header(ACCEPT, BLING_API_VERSION)
            .form(&grant.form_params())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Bling token request failed");
                TokenExchangeError::Transport(format!("Bling token request failed: {}", e))
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to read Bling token response");
            TokenExchangeError::Transport(format!("Failed to read Bling token response: {}", e))
        })?;
        let body = UpstreamBody::from_text(text);

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Bling rejected token exchange");
            return Err(TokenExchangeError::UpstreamRejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}
