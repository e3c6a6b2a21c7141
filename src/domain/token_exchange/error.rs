use crate::error::AppError;

use super::model::UpstreamBody;

#[derive(Debug, thiserror::Error)]
pub enum TokenExchangeError {
    #[error("{0}")]
    InvalidRequest(String),
    #[error("{0}")]
    Misconfigured(String),
    #[error("provider rejected exchange with status {status}")]
    UpstreamRejected { status: u16, body: UpstreamBody },
    #[error("{0}")]
    Transport(String),
}

impl From<TokenExchangeError> for AppError {
    fn from(err: TokenExchangeError) -> Self {
        match err {
            TokenExchangeError::InvalidRequest(msg) => AppError::BadRequest(msg),
            TokenExchangeError::Misconfigured(msg) => AppError::ServerMisconfigured(msg),
            TokenExchangeError::UpstreamRejected { status, body } => {
                AppError::UpstreamRejected { status, data: body }
            }
            TokenExchangeError::Transport(msg) => AppError::Transport(msg),
        }
    }
}
