//! CSV extracts into typed records.

use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::info;

use super::{TABLE_CHAPTER, TABLE_CONS, TABLE_CONS_EMAIL};
use crate::config::InputsCfg;
use crate::errors::{DataFormatError, Error};
use crate::models::{ChapterId, EmailId, EmailRecord, PersonId, PersonRecord, SubscriptionRecord};
use crate::timestamp::{parse_flag, parse_id, parse_int, parse_timestamp};

/// The three extracts as read from disk, every column a string column.
#[derive(Debug, Clone)]
pub struct RawTables {
    /// `cons`
    pub cons: DataFrame,
    /// `cons_email`
    pub cons_email: DataFrame,
    /// `chapter`
    pub chapter: DataFrame,
}

/// The three extracts after type coercion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTables {
    /// Constituents.
    pub persons: Vec<PersonRecord>,
    /// Constituent emails, primary or not.
    pub emails: Vec<EmailRecord>,
    /// Chapter subscription rows, all chapters.
    pub subscriptions: Vec<SubscriptionRecord>,
}

/// Read one CSV file with a header row; no type inference.
pub fn read_csv(table: &'static str, path: &Path) -> Result<DataFrame, Error> {
    let read = || -> PolarsResult<DataFrame> {
        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()
    };
    let df = read().map_err(|source| Error::Read {
        table,
        path: PathBuf::from(path),
        source,
    })?;
    info!(table, path = %path.display(), rows = df.height(), "extract loaded");
    Ok(df)
}

/// Read all three configured extracts.
pub fn read_raw_tables(inputs: &InputsCfg) -> Result<RawTables, Error> {
    Ok(RawTables {
        cons: read_csv(TABLE_CONS, &inputs.cons_path())?,
        cons_email: read_csv(TABLE_CONS_EMAIL, &inputs.cons_email_path())?,
        chapter: read_csv(TABLE_CHAPTER, &inputs.chapter_path())?,
    })
}

impl RawTables {
    /// Coerce every extract into typed records.
    pub fn decode(&self) -> Result<SourceTables, Error> {
        Ok(SourceTables {
            persons: decode_persons(&self.cons)?,
            emails: decode_emails(&self.cons_email)?,
            subscriptions: decode_subscriptions(&self.chapter)?,
        })
    }
}

/// A string column of one extract, with enough context to report bad cells.
struct Cells<'a> {
    table: &'static str,
    column: &'static str,
    values: &'a StringChunked,
}

impl<'a> Cells<'a> {
    fn new(df: &'a DataFrame, table: &'static str, column: &'static str) -> Result<Self, Error> {
        let col = df
            .column(column)
            .map_err(|_| Error::MissingColumn { table, column })?;
        let values = col.as_materialized_series().str()?;
        Ok(Self {
            table,
            column,
            values,
        })
    }

    fn error(&self, row: usize, value: &str, reason: &str) -> DataFormatError {
        DataFormatError {
            table: self.table,
            column: self.column,
            row: row + 1,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Cell value, `None` when empty.
    fn opt(&self, row: usize) -> Option<&'a str> {
        self.values.get(row).filter(|s| !s.trim().is_empty())
    }

    fn required(&self, row: usize) -> Result<&'a str, DataFormatError> {
        self.opt(row)
            .ok_or_else(|| self.error(row, "", "missing required value"))
    }

    fn parse<T>(
        &self,
        row: usize,
        expected: &str,
        f: impl Fn(&str) -> Option<T>,
    ) -> Result<T, DataFormatError> {
        let raw = self.required(row)?;
        f(raw).ok_or_else(|| self.error(row, raw, expected))
    }
}

/// `cons`: `cons_id, source, create_dt, modified_dt`.
pub fn decode_persons(df: &DataFrame) -> Result<Vec<PersonRecord>, Error> {
    let id = Cells::new(df, TABLE_CONS, "cons_id")?;
    let source = Cells::new(df, TABLE_CONS, "source")?;
    let created = Cells::new(df, TABLE_CONS, "create_dt")?;
    let modified = Cells::new(df, TABLE_CONS, "modified_dt")?;

    let mut out = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        out.push(PersonRecord {
            person_id: PersonId(id.parse(row, "expected a constituent id", parse_id)?),
            source_code: source.opt(row).unwrap_or_default().trim().to_string(),
            created_at: created.parse(row, "expected a timestamp", parse_timestamp)?,
            modified_at: modified.parse(row, "expected a timestamp", parse_timestamp)?,
        });
    }
    Ok(out)
}

/// `cons_email`: `cons_email_id, cons_id, is_primary, email`.
///
/// The address is only required on primary rows. Key columns (`cons_email_id`,
/// `cons_id`) and the flag are validated on every row, primary or not.
pub fn decode_emails(df: &DataFrame) -> Result<Vec<EmailRecord>, Error> {
    let email_id = Cells::new(df, TABLE_CONS_EMAIL, "cons_email_id")?;
    let person_id = Cells::new(df, TABLE_CONS_EMAIL, "cons_id")?;
    let primary = Cells::new(df, TABLE_CONS_EMAIL, "is_primary")?;
    let address = Cells::new(df, TABLE_CONS_EMAIL, "email")?;

    let mut out = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let is_primary = primary.parse(row, "expected a 0/1 flag", parse_flag)?;
        let address = if is_primary {
            address.required(row)?
        } else {
            address.opt(row).unwrap_or_default()
        };
        out.push(EmailRecord {
            person_id: PersonId(person_id.parse(row, "expected a constituent id", parse_id)?),
            email_id: EmailId(email_id.parse(row, "expected an email id", parse_id)?),
            address: address.trim().to_string(),
            is_primary,
        });
    }
    Ok(out)
}

/// `chapter`: `cons_email_id, chapter_id, isunsub`.
///
/// A blank `isunsub` reads as subscribed, the same default used for emails with
/// no chapter row at all. Keys are validated on every row, whatever its chapter.
pub fn decode_subscriptions(df: &DataFrame) -> Result<Vec<SubscriptionRecord>, Error> {
    let email_id = Cells::new(df, TABLE_CHAPTER, "cons_email_id")?;
    let chapter = Cells::new(df, TABLE_CHAPTER, "chapter_id")?;
    let unsub = Cells::new(df, TABLE_CHAPTER, "isunsub")?;

    let mut out = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let is_unsubscribed = match unsub.opt(row) {
            None => false,
            Some(raw) => {
                parse_flag(raw).ok_or_else(|| unsub.error(row, raw, "expected a 0/1 flag"))?
            }
        };
        out.push(SubscriptionRecord {
            email_id: EmailId(email_id.parse(row, "expected an email id", parse_id)?),
            chapter_id: ChapterId(chapter.parse(row, "expected a chapter id", parse_int)?),
            is_unsubscribed,
        });
    }
    Ok(out)
}
