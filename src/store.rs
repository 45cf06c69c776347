use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate, Utc};

use crate::{
    csv,
    error::{Error, Result},
    expense::Expense,
    types::{Currency, ExpenseId},
};

/// Expenses in insertion order plus the id counter, backed by one data file.
/// Every mutation is written through before it returns.
pub struct ExpenseStore {
    path: PathBuf,
    expenses: Vec<Expense>,
    next_id: ExpenseId,
}

impl ExpenseStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = csv::load(&path)?;

        let after_last = state
            .expenses
            .iter()
            .map(|e| e.id.saturating_add(1))
            .max()
            .unwrap_or(1);
        let next_id = match state.counter {
            Some(counter) if counter < after_last => {
                tracing::warn!(counter, after_last, "id counter behind stored expenses");
                after_last
            }
            Some(counter) => counter,
            None => after_last,
        };

        tracing::debug!(
            path = %path.display(),
            expenses = state.expenses.len(),
            next_id,
            "loaded expenses"
        );

        Ok(Self {
            path,
            expenses: state.expenses,
            next_id,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn next_id(&self) -> ExpenseId {
        self.next_id
    }

    pub fn add(
        &mut self,
        description: String,
        amount: Currency,
        date: Option<NaiveDate>,
    ) -> Result<Expense> {
        let date = date.unwrap_or_else(|| Utc::now().date_naive());
        let id = self.next_id;
        let next_id = id
            .checked_add(1)
            .ok_or_else(|| Error::validation("no expense IDs left"))?;
        let expense = Expense::new(id, date, description, amount)?;

        self.expenses.push(expense.clone());
        self.next_id = next_id;
        if let Err(e) = self.flush() {
            self.expenses.pop();
            self.next_id = id;
            return Err(e);
        }

        tracing::debug!(id, amount = %expense.amount, "added expense");
        Ok(expense)
    }

    pub fn list(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn delete(&mut self, id: ExpenseId) -> Result<Expense> {
        let pos = self
            .expenses
            .iter()
            .position(|e| e.id == id)
            .ok_or(Error::NotFound(id))?;

        let removed = self.expenses.remove(pos);
        if let Err(e) = self.flush() {
            self.expenses.insert(pos, removed);
            return Err(e);
        }

        tracing::debug!(id, "deleted expense");
        Ok(removed)
    }

    /// Total of all expenses, or of one month (of `year`, defaulting to the
    /// current year), or of a whole `year` when no month is given.
    pub fn summary(&self, month: Option<u32>, year: Option<i32>) -> Result<Currency> {
        if let Some(m) = month {
            if !(1..=12).contains(&m) {
                return Err(Error::validation(format!(
                    "month must be between 1 and 12, got {}",
                    m
                )));
            }
        }

        match (month, year) {
            (None, None) => self.sum_where(|_| true),
            (None, Some(y)) => self.sum_where(|e| e.in_year(y)),
            (Some(m), y) => {
                let y = y.unwrap_or_else(|| Utc::now().year());
                self.sum_where(|e| e.in_month(y, m))
            }
        }
    }

    fn sum_where(&self, pred: impl Fn(&Expense) -> bool) -> Result<Currency> {
        self.expenses
            .iter()
            .filter(|e| pred(e))
            .try_fold(Currency::ZERO, |total, e| total.checked_add(e.amount))
            .ok_or(Error::Overflow)
    }

    fn flush(&self) -> Result<()> {
        csv::save(&self.path, &self.expenses, self.next_id)
    }
}
