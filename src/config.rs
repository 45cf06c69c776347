use std::path::PathBuf;

pub const APP_DIR: &str = "expense-tracker";
pub const DATA_FILE: &str = "expenses.csv";

/// Where the data file lives when neither `--file` nor `EXPENSES_FILE` is set:
/// the per-user data directory, or the working directory if there is none.
pub fn default_data_file() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join(APP_DIR).join(DATA_FILE),
        None => {
            tracing::warn!("no user data directory, using ./{}", DATA_FILE);
            PathBuf::from(DATA_FILE)
        }
    }
}

pub fn resolve_data_file(flag: Option<PathBuf>) -> PathBuf {
    flag.unwrap_or_else(default_data_file)
}
