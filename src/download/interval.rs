// src/download/interval.rs
use anyhow::{anyhow, Result};
use chrono::{Datelike, NaiveDate};
use std::fmt;

/// Half-open calendar range `[start, end)` with a stable label used in file names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DateInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
    label: String,
}

impl DateInterval {
    /// Calendar month; `end` is the first day of the following month.
    pub fn month(year: i32, month: u32) -> Result<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| anyhow!("invalid month {year}-{month}"))?;
        let end = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(|| anyhow!("month {year}-{month} has no successor"))?;

        Ok(Self {
            start,
            end,
            label: format!("{year:04}-{month:02}"),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Display for DateInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// All twelve months of `year`, January first.
pub fn months_of_year(year: i32) -> Result<Vec<DateInterval>> {
    (1..=12).map(|m| DateInterval::month(year, m)).collect()
}

/// Month label (`YYYY-MM`) for any date; the grouping key used by the frequency step.
pub fn month_label<D: Datelike>(d: &D) -> String {
    format!("{:04}-{:02}", d.year(), d.month())
}
