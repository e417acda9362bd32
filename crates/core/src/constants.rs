use rust_decimal::Decimal;

/// Quantity at or below this threshold counts as zero for liquidation
/// and average-price purposes.
pub const QUANTITY_EPSILON: &str = "0.000001";

/// Decimal precision for percentage values exposed to dashboards.
pub const PERCENT_DECIMAL_PRECISION: u32 = 2;

/// Parses [`QUANTITY_EPSILON`] into a `Decimal`.
pub fn quantity_epsilon() -> Decimal {
    Decimal::from_str_radix(QUANTITY_EPSILON, 10).unwrap_or_else(|_| Decimal::new(1, 6))
}

/// A quantity strictly above the epsilon threshold is considered held.
/// The ledger engine and the liquidation monitor must agree on this,
/// so both go through here.
pub fn is_quantity_significant(quantity: &Decimal) -> bool {
    quantity.abs() > quantity_epsilon()
}
