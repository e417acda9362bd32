//! History module - the typed event log each asset carries.

mod history_model;

#[cfg(test)]
mod history_model_tests;

pub use history_model::{EventPayload, SplitFactor, TradeEvent};
