pub mod order_intake_repository;

pub use order_intake_repository::OrderIntakeRepository;
