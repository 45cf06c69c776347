use chrono::{Datelike, NaiveDate};

use crate::{
    error::{Error, Result},
    types::{Currency, ExpenseId, CURRENCY_SCALE},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expense {
    pub id: ExpenseId,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Currency,
}

impl Expense {
    /// Builds a validated expense. The amount is rounded to cents first,
    /// so anything that rounds to zero is rejected.
    pub fn new(
        id: ExpenseId,
        date: NaiveDate,
        description: String,
        amount: Currency,
    ) -> Result<Self> {
        if description.trim().is_empty() {
            return Err(Error::validation("description must not be empty"));
        }

        let amount = to_cents(amount);
        if amount.scale() != CURRENCY_SCALE {
            return Err(Error::validation(format!(
                "amount {} is too large to keep in cents",
                amount
            )));
        }
        if amount <= Currency::ZERO {
            return Err(Error::validation(format!(
                "amount must be positive, got {}",
                amount
            )));
        }

        Ok(Self {
            id,
            date,
            description,
            amount,
        })
    }

    pub fn in_month(&self, year: i32, month: u32) -> bool {
        self.date.year() == year && self.date.month() == month
    }

    pub fn in_year(&self, year: i32) -> bool {
        self.date.year() == year
    }
}

pub fn to_cents(amount: Currency) -> Currency {
    let mut amount = amount.round_dp(CURRENCY_SCALE);
    amount.rescale(CURRENCY_SCALE);
    amount
}
