// Filing quarters ("2026Q1")

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quarter {
    pub year: i32,
    pub quarter: u32,
}

impl Quarter {
    /// Quarter containing today's local date.
    pub fn current() -> Self {
        Self::containing(Local::now().date_naive())
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            quarter: (date.month() - 1) / 3 + 1,
        }
    }

    /// First and last calendar day of the quarter.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first_month = (self.quarter - 1) * 3 + 1;
        let start = NaiveDate::from_ymd_opt(self.year, first_month, 1)?;
        let next = if self.quarter == 4 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(self.year, first_month + 3, 1)?
        };
        Some((start, next.pred_opt()?))
    }
}

impl FromStr for Quarter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || format!("invalid quarter '{s}' (expected YYYYQn, e.g. 2026Q1)");

        let (year, quarter) = s
            .split_once(['Q', 'q'])
            .ok_or_else(invalid)?;
        if year.len() != 4 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let quarter: u32 = quarter.parse().map_err(|_| invalid())?;
        if !(1..=4).contains(&quarter) {
            return Err(invalid());
        }
        Ok(Self { year, quarter })
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Q{}", self.year, self.quarter)
    }
}
