//! End-to-end run: load → build `people` → aggregate `acquisition_facts` → write.
//!
//! [`transform`] is the pure middle and can be driven from in-memory records;
//! [`run`] adds the file edges. Nothing is written unless both tables were
//! produced, and with `dry_run` nothing is written at all.

use std::path::PathBuf;

use tracing::{info, info_span};

use crate::config::PipelineConfig;
use crate::errors::Error;
use crate::io::{
    SourceTables, TABLE_CHAPTER, TABLE_CONS, TABLE_CONS_EMAIL, read_raw_tables, stage_outputs,
};
use crate::models::{AcquisitionCount, ChapterId, PersonSummary};
use crate::profile::log_profile;
use crate::transform::{JoinReport, aggregate_acquisitions, build_people};

/// Both derived tables plus the join findings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineOutput {
    /// `people` rows.
    pub people: Vec<PersonSummary>,
    /// `acquisition_facts` rows, ascending by month-day.
    pub acquisitions: Vec<AcquisitionCount>,
    /// Non-fatal join findings.
    pub report: JoinReport,
}

/// Options for [`run`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Compute both tables but do not write them.
    pub dry_run: bool,
}

/// What a completed [`run`] produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Tables computed.
    pub output: PipelineOutput,
    /// Files written; empty on a dry run.
    pub written: Vec<PathBuf>,
}

/// Derive both output tables from typed extracts.
pub fn transform(tables: &SourceTables, chapter: ChapterId) -> PipelineOutput {
    let build = build_people(
        &tables.persons,
        &tables.emails,
        &tables.subscriptions,
        chapter,
    );
    let acquisitions = aggregate_acquisitions(&build.people);
    PipelineOutput {
        people: build.people,
        acquisitions,
        report: build.report,
    }
}

/// Load the configured extracts, transform them and write both outputs.
pub fn run(cfg: &PipelineConfig, opt: RunOptions) -> Result<RunSummary, Error> {
    let span = info_span!("run", chapter = %cfg.chapter_id, dry_run = opt.dry_run);
    let _enter = span.enter();

    let raw = read_raw_tables(&cfg.inputs)?;
    log_profile(TABLE_CONS, &raw.cons)?;
    log_profile(TABLE_CONS_EMAIL, &raw.cons_email)?;
    log_profile(TABLE_CHAPTER, &raw.chapter)?;

    let tables = raw.decode()?;
    let output = transform(&tables, cfg.chapter_id);
    output.report.log();
    info!(
        people = output.people.len(),
        acquisition_days = output.acquisitions.len(),
        "tables computed"
    );

    if opt.dry_run {
        return Ok(RunSummary {
            output,
            written: Vec::new(),
        });
    }

    let written = stage_outputs(&cfg.outputs, &output.people, &output.acquisitions)?.commit()?;
    Ok(RunSummary { output, written })
}
