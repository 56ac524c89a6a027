//! File edges of the pipeline.
//!
//! - [`source`]: CSV extracts -> typed records ([`SourceTables`]).
//! - [`sink`]: `people` / `acquisition_facts` rows -> CSV, staged then renamed.
//!
//! Both sides use the Polars CSV engine. Cells are read as strings and coerced
//! by [`crate::timestamp`] so every failure names its table and column.

pub mod sink;
pub mod source;

pub use sink::{StagedOutputs, acquisitions_frame, people_frame, stage_outputs};
pub use source::{RawTables, SourceTables, read_raw_tables};

/// Constituent extract.
pub const TABLE_CONS: &str = "cons";
/// Constituent email extract.
pub const TABLE_CONS_EMAIL: &str = "cons_email";
/// Chapter subscription extract.
pub const TABLE_CHAPTER: &str = "chapter";
