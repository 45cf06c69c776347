use std::io::{self, Write};

use chrono::{Datelike, Month, Utc};

use crate::{
    cli::{AddArgs, Command, DeleteArgs, Format, ListArgs, SummaryArgs},
    csv,
    error::{Error, Result},
    expense::Expense,
    store::ExpenseStore,
};

/// Runs one verb against the store, printing the outcome to `out`.
pub fn dispatch<W: Write>(command: Command, store: &mut ExpenseStore, out: &mut W) -> Result<()> {
    match command {
        Command::Add(args) => add(args, store, out),
        Command::List(args) => list(args, store, out),
        Command::Summary(args) => summary(args, store, out),
        Command::Delete(args) => delete(args, store, out),
    }
}

fn add<W: Write>(args: AddArgs, store: &mut ExpenseStore, out: &mut W) -> Result<()> {
    let e = store.add(args.description, args.amount, args.date)?;
    writeln!(
        out,
        "Expense added successfully (ID: {}): {}",
        e.id, e.description
    )
    .map_err(Error::Output)
}

fn list<W: Write>(args: ListArgs, store: &ExpenseStore, out: &mut W) -> Result<()> {
    let expenses = store.list();
    match args.format {
        Format::Csv => csv::export(out, expenses).map_err(|e| Error::Output(e.into())),
        Format::Table if expenses.is_empty() => {
            writeln!(out, "No expenses to display.").map_err(Error::Output)
        }
        Format::Table => write_table(out, expenses).map_err(Error::Output),
    }
}

fn summary<W: Write>(args: SummaryArgs, store: &ExpenseStore, out: &mut W) -> Result<()> {
    let total = store.summary(args.month, args.year)?;

    let written = match (args.month, args.year) {
        (None, None) => writeln!(out, "Total expenses: ${:.2}", total),
        (None, Some(year)) => writeln!(out, "Total expenses for {}: ${:.2}", year, total),
        (Some(month), year) => {
            let year = year.unwrap_or_else(|| Utc::now().year());
            writeln!(out, "Total expenses for {} {}: ${:.2}", month_name(month), year, total)
        }
    };
    written.map_err(Error::Output)
}

fn delete<W: Write>(args: DeleteArgs, store: &mut ExpenseStore, out: &mut W) -> Result<()> {
    let e = store.delete(args.id)?;
    writeln!(out, "Expense {} deleted successfully", e.id).map_err(Error::Output)
}

fn month_name(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name().to_string())
        .unwrap_or_else(|| month.to_string())
}

const HEADERS: [&str; 4] = ["ID", "Date", "Description", "Amount"];

fn write_table<W: Write>(out: &mut W, expenses: &[Expense]) -> io::Result<()> {
    let rows: Vec<[String; 4]> = expenses
        .iter()
        .map(|e| {
            [
                e.id.to_string(),
                e.date.to_string(),
                e.description.clone(),
                format!("${:.2}", e.amount),
            ]
        })
        .collect();

    let widths: Vec<usize> = (0..HEADERS.len())
        .map(|i| {
            rows.iter()
                .map(|r| r[i].chars().count())
                .fold(HEADERS[i].len(), usize::max)
        })
        .collect();

    let line = |cells: [&str; 4]| {
        cells
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (c, w))| match i {
                // numbers right aligned
                0 | 3 => format!("{:>w$}", c, w = *w),
                _ => format!("{:<w$}", c, w = *w),
            })
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let header = line(HEADERS);
    writeln!(out, "{}", header)?;
    writeln!(out, "{}", "-".repeat(header.len()))?;
    for r in &rows {
        writeln!(out, "{}", line([r[0].as_str(), r[1].as_str(), r[2].as_str(), r[3].as_str()]))?;
    }

    Ok(())
}
