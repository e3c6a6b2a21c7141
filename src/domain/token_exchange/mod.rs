pub mod error;
pub mod model;
pub mod service;

pub use error::TokenExchangeError;
pub use model::{
    ClientCredentials, ClientSecret, GrantType, TokenGrant, TokenRequest, UpstreamBody,
};
pub use service::{TokenExchangeApi, TokenExchangeService};
