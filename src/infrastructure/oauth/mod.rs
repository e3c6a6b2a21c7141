pub mod bling;

pub use bling::BlingOAuthClient;
