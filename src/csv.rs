use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::{
    error::{Error, Result},
    expense::Expense,
    types::{Currency, ExpenseId},
};

/// One row of the data file. Expense rows carry every column, the single
/// counter row only `id`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RecordRaw {
    #[serde(rename = "type")]
    typ: String,
    id: ExpenseId,
    date: Option<NaiveDate>,
    description: Option<String>,
    // read as text, a float detour would lose cents
    #[serde(with = "rust_decimal::serde::str_option")]
    amount: Option<Currency>,
}

#[derive(Debug)]
pub enum Record {
    Expense(Expense),
    Counter(ExpenseId),
}

impl RecordRaw {
    pub fn to_record(&self) -> std::result::Result<Record, String> {
        if self.id == 0 {
            return Err(format!("{} row has ID 0", self.typ));
        }

        match (
            self.typ.as_str(),
            self.date,
            self.description.as_ref(),
            self.amount,
        ) {
            ("expense", Some(date), Some(description), Some(amount)) => {
                Expense::new(self.id, date, description.clone(), amount)
                    .map(Record::Expense)
                    .map_err(|e| e.to_string())
            }
            ("expense", ..) => Err(format!("expense {} has empty columns", self.id)),
            ("counter", None, None, None) => Ok(Record::Counter(self.id)),
            (typ, ..) => Err(format!("unexpected record type {:?}", typ)),
        }
    }

    fn expense(e: &Expense) -> Self {
        Self {
            typ: "expense".into(),
            id: e.id,
            date: Some(e.date),
            description: Some(e.description.clone()),
            amount: Some(e.amount),
        }
    }

    fn counter(next_id: ExpenseId) -> Self {
        Self {
            typ: "counter".into(),
            id: next_id,
            ..Default::default()
        }
    }
}

/// Contents of the data file.
#[derive(Debug, Default)]
pub struct StoreState {
    pub expenses: Vec<Expense>,
    pub counter: Option<ExpenseId>,
}

/// Reads the data file. A missing file is an empty state; any malformed row
/// fails the whole load.
pub fn load(path: &Path) -> Result<StoreState> {
    let mut rdr = match csv::Reader::from_path(path) {
        Ok(rdr) => rdr,
        Err(e) => {
            if let csv::ErrorKind::Io(io) = e.kind() {
                if io.kind() == io::ErrorKind::NotFound {
                    return Ok(StoreState::default());
                }
            }
            return Err(Error::storage(path, e));
        }
    };

    let headers = rdr
        .headers()
        .map_err(|e| read_error(path, e))?
        .clone();

    let mut state = StoreState::default();
    for record in rdr.records() {
        let record = record.map_err(|e| read_error(path, e))?;
        let line = record.position().map_or(0, |p| p.line());
        let raw: RecordRaw = record
            .deserialize(Some(&headers))
            .map_err(|e| corrupt(path, line, e.to_string()))?;
        match raw.to_record().map_err(|reason| corrupt(path, line, reason))? {
            Record::Expense(e) => {
                if state.expenses.iter().any(|x| x.id == e.id) {
                    return Err(corrupt(path, line, format!("duplicate ID {}", e.id)));
                }
                state.expenses.push(e);
            }
            Record::Counter(_) if state.counter.is_some() => {
                return Err(corrupt(path, line, "second counter row".into()));
            }
            Record::Counter(next) => state.counter = Some(next),
        }
    }

    Ok(state)
}

/// I/O failures mean the file could not be read, anything else is bad content.
fn read_error(path: &Path, e: csv::Error) -> Error {
    if matches!(e.kind(), csv::ErrorKind::Io(_)) {
        return Error::storage(path, e);
    }
    let line = e.position().map_or(0, |p| p.line());
    corrupt(path, line, e.to_string())
}

fn corrupt(path: &Path, line: u64, reason: String) -> Error {
    Error::Corrupt {
        path: path.to_path_buf(),
        line,
        reason,
    }
}

/// Replaces the data file with the given expenses and counter. The rows go to
/// a temp file next to the target which is then renamed over it, so the old
/// file survives any failure.
pub fn save(path: &Path, expenses: &[Expense], next_id: ExpenseId) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| Error::storage(dir, e))?;

    let tmp = NamedTempFile::new_in(dir).map_err(|e| Error::storage(dir, e))?;
    let mut wrtr = csv::Writer::from_writer(tmp);

    expenses
        .iter()
        .map(RecordRaw::expense)
        .chain(std::iter::once(RecordRaw::counter(next_id)))
        .map(|r| wrtr.serialize(r))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::storage(path, e))?;

    let tmp = wrtr
        .into_inner()
        .map_err(|e| Error::storage(path, e.into_error()))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| Error::storage(path, e))?;
    tmp.persist(path).map_err(|e| Error::storage(path, e.error))?;

    Ok(())
}

#[derive(Debug, Serialize)]
struct ExpenseExport<'a> {
    id: ExpenseId,
    date: NaiveDate,
    description: &'a str,
    amount: Currency,
}

/// Writes the expenses as plain CSV, without the bookkeeping columns.
pub fn export<W: Write>(out: W, expenses: &[Expense]) -> std::result::Result<(), csv::Error> {
    let mut wrtr = csv::Writer::from_writer(out);

    expenses
        .iter()
        .map(|e| ExpenseExport {
            id: e.id,
            date: e.date,
            description: &e.description,
            amount: e.amount,
        })
        .map(|e| wrtr.serialize(e))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    wrtr.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn expense(id: ExpenseId, description: &str, amount: Currency) -> Expense {
        let date = NaiveDate::from_ymd_opt(2026, 7, 3).unwrap();
        Expense::new(id, date, description.into(), amount).unwrap()
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let state = load(&dir.path().join("nope.csv")).unwrap();
        assert!(state.expenses.is_empty());
        assert_eq!(state.counter, None);
    }

    #[test]
    fn save_then_load_keeps_everything() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("expenses.csv");
        let expenses = vec![
            expense(1, "Coffee, large", dec!(3.50)),
            expense(4, "\"Quoted\" books", dec!(29.99)),
            expense(2, "  padded  ", dec!(12)),
        ];

        save(&path, &expenses, 9).unwrap();
        let state = load(&path).unwrap();

        assert_eq!(state.expenses, expenses);
        assert_eq!(state.counter, Some(9));
    }

    #[test]
    fn file_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("expenses.csv");
        save(&path, &[expense(1, "Coffee", dec!(3.5))], 2).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "type,id,date,description,amount\n\
             expense,1,2026-07-03,Coffee,3.50\n\
             counter,2,,,\n"
        );
    }

    #[test]
    fn rejects_unknown_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("expenses.csv");
        fs::write(
            &path,
            "type,id,date,description,amount\n\
             expense,1,2026-07-03,Coffee,3.50\n\
             refund,2,2026-07-03,Coffee,3.50\n",
        )
        .unwrap();

        match load(&path).unwrap_err() {
            Error::Corrupt { line, reason, .. } => {
                assert_eq!(line, 3);
                assert!(reason.contains("refund"), "{reason}");
            }
            e => panic!("unexpected error {e:?}"),
        }
    }

    #[test]
    fn rejects_invalid_amounts_and_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("expenses.csv");

        fs::write(
            &path,
            "type,id,date,description,amount\nexpense,1,2026-07-03,Coffee,-1\n",
        )
        .unwrap();
        assert!(matches!(load(&path), Err(Error::Corrupt { line: 2, .. })));

        fs::write(
            &path,
            "type,id,date,description,amount\n\
             expense,1,2026-07-03,Coffee,1\n\
             expense,1,2026-07-03,Tea,1\n",
        )
        .unwrap();
        assert!(matches!(load(&path), Err(Error::Corrupt { line: 3, .. })));
    }

    #[test]
    fn unreadable_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Storage { .. }), "{err:?}");
    }

    #[test]
    fn rejects_zero_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("expenses.csv");
        fs::write(
            &path,
            "type,id,date,description,amount
expense,0,2026-07-03,Zero,1
",
        )
        .unwrap();

        assert!(matches!(load(&path), Err(Error::Corrupt { line: 2, .. })));
    }

    #[test]
    fn reports_lines_past_multiline_descriptions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("expenses.csv");
        fs::write(
            &path,
            "type,id,date,description,amount\n\
             expense,1,2026-07-03,\"two\nlines\",3.50\n\
             refund,2,,,\n",
        )
        .unwrap();

        assert!(matches!(load(&path), Err(Error::Corrupt { line: 4, .. })));
    }

    #[test]
    fn failed_save_keeps_old_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("expenses.csv");
        save(&path, &[expense(1, "Coffee", dec!(3.5))], 2).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        // a directory where the temp file should go makes the write fail
        let blocked = dir.path().join("blocked");
        fs::write(&blocked, "not a dir").unwrap();
        let err = save(&blocked.join("expenses.csv"), &[], 1).unwrap_err();
        assert!(err.is_storage());

        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn export_drops_bookkeeping() {
        let mut out = Vec::new();
        export(&mut out, &[expense(3, "Lunch", dec!(12))]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id,date,description,amount\n3,2026-07-03,Lunch,12.00\n"
        );
    }
}
