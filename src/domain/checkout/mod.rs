pub mod error;
pub mod model;
pub mod service;

pub use error::CheckoutError;
pub use model::{CheckoutRequest, CheckoutResponse, OrderIntake, OrderIntakeReceipt};
pub use service::{CheckoutApi, CheckoutService};
