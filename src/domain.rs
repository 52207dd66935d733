use std::fmt;
use std::io::Error;

use polars::error::PolarsError;
use ratatui::crossterm::event::KeyEvent;

use crate::data_view::{DEFAULT_ITEMS_PER_PAGE, DEFAULT_MAX_COLUMN_WIDTH, DEFAULT_MOBILE_BREAKPOINT};

pub const HELP_TEXT: &str = "\
Navigation
  ← / PgUp      previous page
  → / PgDn      next page
  g / G         first / last page
  ↑ / k         previous row
  ↓ / j         next row

Search
  /             focus the search bar
  Esc           clear the query
  Enter         leave the search bar

Rows
  Enter         show row details
  y             copy row as CSV

  ?             this help
  q             quit";

#[derive(Debug)]
pub enum DVError {
    IoError(Error),
    PolarsError(PolarsError),
    LoadingFailed(String),
    FileNotFound,
    PermissionDenied,
    UnknownFileType,
    InvalidConfig(String),
    Logging(String),
}

impl fmt::Display for DVError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DVError::IoError(e) => write!(f, "io error: {e}"),
            DVError::PolarsError(e) => write!(f, "could not read data: {e}"),
            DVError::LoadingFailed(msg) => write!(f, "loading failed: {msg}"),
            DVError::FileNotFound => write!(f, "file not found"),
            DVError::PermissionDenied => write!(f, "permission denied"),
            DVError::UnknownFileType => write!(f, "unknown file type"),
            DVError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            DVError::Logging(msg) => write!(f, "could not set up logging: {msg}"),
        }
    }
}

impl std::error::Error for DVError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DVError::IoError(e) => Some(e),
            DVError::PolarsError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Error> for DVError {
    fn from(err: Error) -> Self {
        DVError::IoError(err)
    }
}

impl From<PolarsError> for DVError {
    fn from(err: PolarsError) -> Self {
        DVError::PolarsError(err)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DVConfig {
    pub event_poll_time: u64,
    pub items_per_page: usize,
    pub searchable: bool,
    /// Columns searched. `None` searches every column.
    pub search_keys: Option<Vec<String>>,
    pub mobile_breakpoint: u16,
    pub max_column_width: usize,
}

impl Default for DVConfig {
    fn default() -> Self {
        Self {
            event_poll_time: 100,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            searchable: true,
            search_keys: None,
            mobile_breakpoint: DEFAULT_MOBILE_BREAKPOINT,
            max_column_width: DEFAULT_MAX_COLUMN_WIDTH,
        }
    }
}

impl DVConfig {
    pub fn validate(self) -> Result<Self, DVError> {
        if self.items_per_page == 0 {
            return Err(DVError::InvalidConfig(
                "items per page must be at least 1".into(),
            ));
        }
        if self.max_column_width < 3 {
            return Err(DVError::InvalidConfig(
                "max column width must be at least 3".into(),
            ));
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Quit,
    NextPage,
    PreviousPage,
    FirstPage,
    LastPage,
    MoveUp,
    MoveDown,
    Enter,
    Exit,
    Help,
    Search,
    CopyRow,
    Resize(u16, u16),
    RawKey(KeyEvent),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(DVConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_items_per_page_is_rejected() {
        let cfg = DVConfig {
            items_per_page: 0,
            ..DVConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(DVError::InvalidConfig(_))));
    }

    #[test]
    fn io_errors_convert() {
        let err: DVError = Error::other("boom").into();
        assert!(matches!(err, DVError::IoError(_)));
        assert_eq!(err.to_string(), "io error: boom");
    }
}
