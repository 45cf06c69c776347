use rust_decimal::Decimal;

// plain aliases rather than newtypes, ids and money never mix in this crate
pub type ExpenseId = u32;
pub type Currency = Decimal;

/// Amounts are kept in cents.
pub const CURRENCY_SCALE: u32 = 2;
