//! Writing the two output tables.
//!
//! Outputs are first written to temporary files next to their destination and
//! only renamed into place by [`StagedOutputs::commit`], after both tables have
//! been serialized. A run that fails earlier leaves existing outputs untouched.

use std::fs;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use tempfile::NamedTempFile;
use tracing::info;

use crate::config::OutputsCfg;
use crate::errors::Error;
use crate::models::summary::DATETIME_FORMAT;
use crate::models::{AcquisitionCount, PersonSummary};

/// `people` rows as a frame: `email, code, is_unsub, created_dt, updated_dt`.
pub fn people_frame(rows: &[PersonSummary]) -> PolarsResult<DataFrame> {
    let email: Vec<&str> = rows.iter().map(|r| r.email_address.as_str()).collect();
    let code: Vec<&str> = rows.iter().map(|r| r.source_code.as_str()).collect();
    let is_unsub: Vec<bool> = rows.iter().map(|r| r.is_unsubscribed).collect();
    let created: Vec<String> = rows
        .iter()
        .map(|r| r.created_date.format(DATETIME_FORMAT).to_string())
        .collect();
    let updated: Vec<String> = rows
        .iter()
        .map(|r| r.updated_date.format(DATETIME_FORMAT).to_string())
        .collect();

    df!(
        "email" => email,
        "code" => code,
        "is_unsub" => is_unsub,
        "created_dt" => created,
        "updated_dt" => updated,
    )
}

/// `acquisition_facts` rows as a frame: `acquisition_date, acquisitions`.
pub fn acquisitions_frame(rows: &[AcquisitionCount]) -> PolarsResult<DataFrame> {
    let day: Vec<String> = rows.iter().map(|r| r.acquisition_day.to_string()).collect();
    let count: Vec<u32> = rows.iter().map(|r| r.count).collect();
    df!(
        "acquisition_date" => day,
        "acquisitions" => count,
    )
}

/// Serialized outputs waiting to be moved into place.
#[derive(Debug)]
pub struct StagedOutputs {
    staged: Vec<(NamedTempFile, PathBuf)>,
}

impl StagedOutputs {
    /// Rename every staged file onto its destination. Returns the destinations.
    pub fn commit(self) -> Result<Vec<PathBuf>, Error> {
        let mut written = Vec::with_capacity(self.staged.len());
        for (tmp, dest) in self.staged {
            tmp.persist(&dest)?;
            info!(path = %dest.display(), "output written");
            written.push(dest);
        }
        Ok(written)
    }
}

fn stage_csv(df: &mut DataFrame, dest: &Path) -> Result<NamedTempFile, Error> {
    let dir = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if !dir.exists() {
        fs::create_dir_all(&dir)?;
    }
    let mut tmp = NamedTempFile::new_in(&dir)?;
    CsvWriter::new(tmp.as_file_mut())
        .include_header(true)
        .finish(df)?;
    Ok(tmp)
}

/// Serialize both tables into temporary files beside their destinations.
pub fn stage_outputs(
    outputs: &OutputsCfg,
    people: &[PersonSummary],
    acquisitions: &[AcquisitionCount],
) -> Result<StagedOutputs, Error> {
    let people_path = outputs.people_path();
    let facts_path = outputs.acquisition_facts_path();

    let people_tmp = stage_csv(&mut people_frame(people)?, &people_path)?;
    let facts_tmp = stage_csv(&mut acquisitions_frame(acquisitions)?, &facts_path)?;

    Ok(StagedOutputs {
        staged: vec![(people_tmp, people_path), (facts_tmp, facts_path)],
    })
}
