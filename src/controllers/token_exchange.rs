use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Query, State},
    http::Uri,
    Json,
};
use serde_json::Value;
use std::sync::Arc;

use crate::{
    domain::token_exchange::{TokenExchangeApi, TokenRequest, UpstreamBody},
    error::AppResult,
};

/// A place a token request can be read from. Sources are tried in order and
/// the first one that yields a request wins.
#[derive(Debug)]
pub enum InputSource<'a> {
    JsonBody(&'a [u8]),
    QueryString(&'a Uri),
}

impl InputSource<'_> {
    pub fn read(&self) -> Option<TokenRequest> {
        match self {
            // Empty, malformed or non-object bodies fall through.
            Self::JsonBody(bytes) => match serde_json::from_slice::<Value>(bytes).ok()? {
                value @ Value::Object(_) => serde_json::from_value(value).ok(),
                _ => None,
            },
            Self::QueryString(uri) => Query::<TokenRequest>::try_from_uri(uri)
                .ok()
                .map(|Query(request)| request),
        }
    }
}

pub fn read_token_request(sources: &[InputSource<'_>]) -> TokenRequest {
    sources
        .iter()
        .find_map(InputSource::read)
        .unwrap_or_default()
}

pub struct TokenExchangeController {
    token_exchange_service: Arc<dyn TokenExchangeApi>,
}

impl TokenExchangeController {
    pub fn new(token_exchange_service: Arc<dyn TokenExchangeApi>) -> Self {
        Self {
            token_exchange_service,
        }
    }

    /// POST /api/bling/exchange - Exchange an authorization code or refresh token
    ///
    /// Reads `grant_type`, `code` and `refresh_token` from a JSON body, or from
    /// the query string when the body is empty or not a JSON object. The
    /// provider's token payload is relayed unchanged.
    pub async fn exchange(
        State(controller): State<Arc<TokenExchangeController>>,
        uri: Uri,
        body: Result<Bytes, BytesRejection>,
    ) -> AppResult<Json<UpstreamBody>> {
        // An unreadable body (e.g. over the size limit) counts as absent
        let body = body.unwrap_or_else(|rejection| {
            tracing::debug!(error = %rejection, "Ignoring unreadable request body");
            Bytes::new()
        });

        let request = read_token_request(&[
            InputSource::JsonBody(&body),
            InputSource::QueryString(&uri),
        ]);

        let tokens = controller.token_exchange_service.exchange(request).await?;

        Ok(Json(tokens))
    }
}
