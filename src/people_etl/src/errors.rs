//! Error taxonomy for the people pipeline.
//!
//! - [`DataFormatError`]: a single cell of an extract cannot be coerced to its
//!   declared type. Fatal; the run aborts and no output is written.
//! - [`Error`]: everything that can end a run, wrapping [`DataFormatError`]
//!   together with configuration, I/O and CSV engine failures.
//!
//! Missing join matches are not errors; they are counted in
//! [`JoinReport`](crate::transform::people::JoinReport).

use thiserror::Error;

/// A cell could not be parsed into the type its column requires.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{table}.{column} (row {row}): {reason}: {value:?}")]
pub struct DataFormatError {
    /// Source table name (e.g. "cons").
    pub table: &'static str,
    /// Source column name (e.g. "create_dt").
    pub column: &'static str,
    /// 1-based data row, header excluded.
    pub row: usize,
    /// Raw cell contents, empty for a missing value.
    pub value: String,
    /// What was expected.
    pub reason: String,
}

/// The unified error type for the `people_etl` crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A cell failed type coercion.
    #[error(transparent)]
    DataFormat(#[from] DataFormatError),

    /// A required column is absent from an extract.
    #[error("{table}: missing required column `{column}`")]
    MissingColumn {
        /// Source table name.
        table: &'static str,
        /// Column that was expected.
        column: &'static str,
    },

    /// Invalid pipeline configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file could not be parsed.
    #[error("failed to parse pipeline config TOML")]
    Toml(#[from] toml::de::Error),

    /// An environment override is set to an unusable value.
    #[error(transparent)]
    Env(#[from] shared_utils::env::InvalidEnvVarError),

    /// An extract could not be opened or parsed as CSV.
    #[error("{table}: cannot read {}", .path.display())]
    Read {
        /// Source table name.
        table: &'static str,
        /// File that was being read.
        path: std::path::PathBuf,
        /// Underlying CSV engine failure.
        #[source]
        source: polars::prelude::PolarsError,
    },

    /// A generic I/O error.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// A staged output file could not be moved into place.
    #[error("failed to persist output file")]
    Persist(#[from] tempfile::PersistError),

    /// An error from the Polars CSV engine.
    #[error("Polars operation failed")]
    Polars(#[from] polars::prelude::PolarsError),
}
