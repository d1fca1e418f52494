//! Dated log file names.
//!
//! Names look like `Log_7_3_2024.log`: base name, day, month, year, extension.
//! Day and month are not zero-padded, so lexical order of names does not
//! follow chronological order. Rotated files carry an extra `_N` counter
//! before the extension.

use chrono::{Datelike, Local, NaiveDate, Utc};

/// Today's date from the configured clock source.
pub fn today(use_utc: bool) -> NaiveDate {
    if use_utc {
        Utc::now().date_naive()
    } else {
        Local::now().date_naive()
    }
}

/// The name of a log file for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileName {
    stem: String,
    extension: String,
}

impl LogFileName {
    pub fn new(base_name: &str, date: NaiveDate, extension: &str) -> Self {
        Self {
            stem: format!(
                "{base_name}_{}_{}_{}",
                date.day(),
                date.month(),
                date.year()
            ),
            extension: extension.to_string(),
        }
    }

    /// The canonical name, without any rotation counter.
    pub fn canonical(&self) -> String {
        format!("{}{}", self.stem, self.extension)
    }

    /// The name a rotated file receives for `counter` (1-based).
    pub fn numbered(&self, counter: u32) -> String {
        format!("{}_{counter}{}", self.stem, self.extension)
    }
}
