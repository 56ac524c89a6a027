//! Acquisitions per calendar day, year ignored.
//!
//! Each `created_date` is reduced to its [`MonthDay`]; rows sharing a month-day
//! are counted together whatever their year. Output is ascending by month-day.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::models::{AcquisitionCount, MonthDay, PersonSummary};

/// Count `people` rows per month-day of their `created_date`.
pub fn aggregate_acquisitions(people: &[PersonSummary]) -> Vec<AcquisitionCount> {
    count_by_month_day(people.iter().map(|p| p.created_date))
}

/// Count timestamps per month-day.
pub fn count_by_month_day<I>(created: I) -> Vec<AcquisitionCount>
where
    I: IntoIterator<Item = NaiveDateTime>,
{
    let mut counts: BTreeMap<MonthDay, u32> = BTreeMap::new();
    for dt in created {
        *counts.entry(MonthDay::from(&dt)).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(acquisition_day, count)| AcquisitionCount {
            acquisition_day,
            count,
        })
        .collect()
}
