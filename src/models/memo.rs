use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Free-text note attached to a calendar date. One memo per date,
/// replace-on-write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateMemo {
    pub date: NaiveDate,
    pub text: String,
}

impl DateMemo {
    pub fn new(date: NaiveDate, text: impl Into<String>) -> Self {
        Self {
            date,
            text: text.into(),
        }
    }

    /// Blank memos are stored but never produce a calendar mark.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
