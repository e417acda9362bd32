//! Ledger module - pure recomputation of derived holdings state.

mod ledger_engine;
mod ledger_model;


pub use ledger_engine::LedgerEngine;
pub use ledger_model::LedgerSnapshot;
