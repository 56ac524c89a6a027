//! Derived output rows.

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};

/// Output format of `created_dt` / `updated_dt`.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row of the `people` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonSummary {
    /// Primary email address (`email`).
    #[serde(rename = "email")]
    pub email_address: String,
    /// Constituent source code (`code`).
    #[serde(rename = "code")]
    pub source_code: String,
    /// Unsubscribed from the target chapter (`is_unsub`).
    #[serde(rename = "is_unsub")]
    pub is_unsubscribed: bool,
    /// Earlier of the two constituent timestamps (`created_dt`).
    #[serde(rename = "created_dt", serialize_with = "ser_datetime")]
    pub created_date: NaiveDateTime,
    /// Later of the two constituent timestamps (`updated_dt`).
    #[serde(rename = "updated_dt", serialize_with = "ser_datetime")]
    pub updated_date: NaiveDateTime,
}

fn ser_datetime<S: Serializer>(dt: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&dt.format(DATETIME_FORMAT))
}

/// A calendar day with the year discarded.
///
/// Ordering is by month, then day, so a sorted list runs 01-01 through 12-31.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthDay {
    month: u32,
    day: u32,
}

impl MonthDay {
    /// Build from explicit month (1..=12) and day; `None` if no year has that day.
    pub fn new(month: u32, day: u32) -> Option<Self> {
        // 2000 is a leap year, so Feb 29 is accepted.
        NaiveDate::from_ymd_opt(2000, month, day).map(|_| Self { month, day })
    }

    /// Month component (1..=12).
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Day-of-month component.
    pub fn day(&self) -> u32 {
        self.day
    }
}

impl<D: Datelike> From<&D> for MonthDay {
    fn from(d: &D) -> Self {
        Self {
            month: d.month(),
            day: d.day(),
        }
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

impl Serialize for MonthDay {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

/// One row of the `acquisition_facts` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AcquisitionCount {
    /// Month-day bucket (`acquisition_date`).
    #[serde(rename = "acquisition_date")]
    pub acquisition_day: MonthDay,
    /// People first recorded on that month-day in any year (`acquisitions`).
    #[serde(rename = "acquisitions")]
    pub count: u32,
}
