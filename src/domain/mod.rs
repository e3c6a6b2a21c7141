pub mod checkout;
pub mod token_exchange;
