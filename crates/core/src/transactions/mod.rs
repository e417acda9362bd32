//! Transactions module - orchestration of event-log mutations.

mod transactions_model;
mod transactions_service;
mod transactions_traits;


pub use transactions_model::{CorporateAction, EventTarget, EventUpdate, SellOrder};
pub use transactions_service::TransactionService;
pub use transactions_traits::TransactionServiceTrait;
