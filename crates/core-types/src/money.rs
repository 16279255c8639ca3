use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a monetary amount or a percentage to two decimal places.
///
/// Midpoints round away from zero, the way the till and the database do it.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Strips value-added tax from a tax-inclusive total.
///
/// `vat_rate` is a percentage (19 means 19%). The result is rounded to cents.
pub fn excl_tax(total_incl_tax: Decimal, vat_rate: Decimal) -> Decimal {
    let divisor = Decimal::ONE + vat_rate / Decimal::ONE_HUNDRED;
    round2(total_incl_tax / divisor)
}
