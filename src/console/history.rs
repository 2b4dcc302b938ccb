/// Audit history table.
use crate::gateway::{Gateway, HistoryRecord, Transport};

pub const HISTORY_LOADING: &str = "Fetching data...";
pub const HISTORY_EMPTY: &str = "No analysis history found yet.";
pub const HISTORY_FAILED: &str = "Failed to load history.";

/// Table body: a single placeholder row, or one row per record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HistoryTable {
    #[default]
    Loading,
    Rows(Vec<HistoryRecord>),
    Empty,
    Failed,
}

impl HistoryTable {
    /// Text of the placeholder row, when the table shows one.
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            Self::Loading => Some(HISTORY_LOADING),
            Self::Rows(_) => None,
            Self::Empty => Some(HISTORY_EMPTY),
            Self::Failed => Some(HISTORY_FAILED),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HistoryView {
    table: HistoryTable,
}

impl HistoryView {
    pub fn table(&self) -> &HistoryTable {
        &self.table
    }

    /// Show the loading row, then replace it with the fetched records.
    pub fn load<T: Transport>(&mut self, gateway: &Gateway<T>) {
        self.table = HistoryTable::Loading;
        self.table = match gateway.history() {
            Ok(records) if records.is_empty() => HistoryTable::Empty,
            Ok(records) => HistoryTable::Rows(records),
            Err(_) => HistoryTable::Failed,
        };
    }
}
