//! Command-line interface definitions. No logic lives here; see `commands`.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::types::{Currency, ExpenseId};

/// Track expenses in a local file
#[derive(Parser, Debug)]
#[command(name = "expense-tracker", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Data file to use instead of the per-user default
    #[arg(long, global = true, env = "EXPENSES_FILE", value_name = "PATH")]
    pub file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record a new expense
    Add(AddArgs),

    /// Show all expenses
    List(ListArgs),

    /// Show the total, optionally for one month
    Summary(SummaryArgs),

    /// Remove an expense
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// What the money was spent on
    #[arg(long)]
    pub description: String,

    /// Positive amount, rounded to cents
    #[arg(long, allow_negative_numbers = true)]
    pub amount: Currency,

    /// Day of the expense (YYYY-MM-DD), today if omitted
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[arg(long, value_enum, default_value_t = Format::Table)]
    pub format: Format,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Aligned columns for reading
    #[default]
    Table,
    /// Comma separated, with a header row
    Csv,
}

#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Month number, 1 to 12
    #[arg(long)]
    pub month: Option<u32>,

    /// Year to total, the current one if only a month is given
    #[arg(long)]
    pub year: Option<i32>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// ID shown by `list`
    #[arg(long)]
    pub id: ExpenseId,
}
