use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Derived numeric state of an asset after replaying its history.
///
/// `average_price` is always `invested_value / quantity` (zero when the
/// quantity is not significant); it is never carried independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSnapshot {
    pub quantity: Decimal,
    pub invested_value: Decimal,
    pub average_price: Decimal,
    pub current_balance: Decimal,
}
