//! Per-column profile of a raw extract: size, distinct values, missing values.
//!
//! Used before coercion to get a quick view of what an extract contains.

use std::fmt;

use polars::prelude::*;
use tracing::debug;

/// Summary of one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnProfile {
    /// Column name as found in the header.
    pub name: String,
    /// Polars dtype (always `str` for extracts read by [`crate::io::source`]).
    pub dtype: String,
    /// Number of rows.
    pub size: usize,
    /// Distinct values, a missing value counting as one.
    pub unique: usize,
    /// Empty cells.
    pub missing: usize,
}

impl fmt::Display for ColumnProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "column: {}, dtype: {}, size: {}, unique values: {}, missing values: {}",
            self.name, self.dtype, self.size, self.unique, self.missing
        )
    }
}

/// Profile every column of `df`, in column order.
pub fn profile_table(df: &DataFrame) -> PolarsResult<Vec<ColumnProfile>> {
    df.get_columns()
        .iter()
        .map(|col| {
            let s = col.as_materialized_series();
            Ok(ColumnProfile {
                name: s.name().to_string(),
                dtype: s.dtype().to_string(),
                size: s.len(),
                unique: s.n_unique()?,
                missing: s.null_count(),
            })
        })
        .collect()
}

/// Log the profile of `df` at debug level.
pub fn log_profile(table: &str, df: &DataFrame) -> PolarsResult<()> {
    for p in profile_table(df)? {
        debug!(table, "{p}");
    }
    Ok(())
}
