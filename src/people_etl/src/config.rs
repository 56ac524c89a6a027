//! Pipeline configuration: parsing, normalization, and loading.
//!
//! The TOML file names the three input extracts, the two output tables and the
//! chapter whose subscription state is reported:
//!
//! ```toml
//! chapter_id = 1
//!
//! [inputs]
//! dir = "exports"
//! cons = "cons.csv"
//! cons_email = "cons_email.csv"
//! chapter = "chapter.csv"
//!
//! [outputs]
//! dir = "out"
//! people = "people.csv"
//! acquisition_facts = "acquisition_facts.csv"
//! ```
//!
//! Every key is optional; defaults are the reference file names in the current
//! directory and chapter 1.
//!
//! Key behaviors:
//! - Normalization trims every path and rejects empty ones.
//! - Relative file names are resolved against the section's `dir`.
//! - [`CHAPTER_ENV_VAR`] overrides `chapter_id` (see [`apply_env_overrides`]).
//!
//! Entrypoints:
//! - Parse + normalize from a TOML string: [`load_config_str`]
//! - Parse + normalize from a file path: [`load_config_path`]

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shared_utils::env::get_env_parsed;

use crate::errors::Error;
use crate::models::ChapterId;

/// Environment variable that overrides [`PipelineConfig::chapter_id`].
pub const CHAPTER_ENV_VAR: &str = "PEOPLE_ETL_CHAPTER_ID";

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct PipelineConfig {
    /// Chapter whose subscription state goes into `is_unsub`.
    pub chapter_id: ChapterId,
    /// Source extracts.
    pub inputs: InputsCfg,
    /// Output tables.
    pub outputs: OutputsCfg,
}

/// Locations of the three source extracts.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct InputsCfg {
    /// Base directory for relative file names.
    pub dir: PathBuf,
    /// Constituent extract.
    pub cons: PathBuf,
    /// Constituent email extract.
    pub cons_email: PathBuf,
    /// Chapter subscription extract.
    pub chapter: PathBuf,
}

impl Default for InputsCfg {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            cons: PathBuf::from("cons.csv"),
            cons_email: PathBuf::from("cons_email.csv"),
            chapter: PathBuf::from("chapter.csv"),
        }
    }
}

impl InputsCfg {
    /// Resolved path of the constituent extract.
    pub fn cons_path(&self) -> PathBuf {
        self.dir.join(&self.cons)
    }

    /// Resolved path of the email extract.
    pub fn cons_email_path(&self) -> PathBuf {
        self.dir.join(&self.cons_email)
    }

    /// Resolved path of the chapter extract.
    pub fn chapter_path(&self) -> PathBuf {
        self.dir.join(&self.chapter)
    }
}

/// Locations of the two output tables.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct OutputsCfg {
    /// Base directory for relative file names.
    pub dir: PathBuf,
    /// `people` table.
    pub people: PathBuf,
    /// `acquisition_facts` table.
    pub acquisition_facts: PathBuf,
}

impl Default for OutputsCfg {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            people: PathBuf::from("people.csv"),
            acquisition_facts: PathBuf::from("acquisition_facts.csv"),
        }
    }
}

impl OutputsCfg {
    /// Resolved path of the `people` table.
    pub fn people_path(&self) -> PathBuf {
        self.dir.join(&self.people)
    }

    /// Resolved path of the `acquisition_facts` table.
    pub fn acquisition_facts_path(&self) -> PathBuf {
        self.dir.join(&self.acquisition_facts)
    }
}

fn normalize_path(field: &str, p: &mut PathBuf) -> Result<(), Error> {
    let trimmed = p.to_string_lossy().trim().to_string();
    if trimmed.is_empty() {
        return Err(Error::Config(format!("{field} cannot be empty")));
    }
    *p = PathBuf::from(trimmed);
    Ok(())
}

/// Normalize a config in-place: trim paths, reject empty ones, and make sure the
/// two outputs do not collide.
pub fn normalize_config(cfg: &mut PipelineConfig) -> Result<(), Error> {
    normalize_path("inputs.dir", &mut cfg.inputs.dir)?;
    normalize_path("inputs.cons", &mut cfg.inputs.cons)?;
    normalize_path("inputs.cons_email", &mut cfg.inputs.cons_email)?;
    normalize_path("inputs.chapter", &mut cfg.inputs.chapter)?;
    normalize_path("outputs.dir", &mut cfg.outputs.dir)?;
    normalize_path("outputs.people", &mut cfg.outputs.people)?;
    normalize_path("outputs.acquisition_facts", &mut cfg.outputs.acquisition_facts)?;

    if cfg.outputs.people_path() == cfg.outputs.acquisition_facts_path() {
        return Err(Error::Config(format!(
            "outputs.people and outputs.acquisition_facts both point to {}",
            cfg.outputs.people_path().display()
        )));
    }
    Ok(())
}

/// Apply [`CHAPTER_ENV_VAR`] if it is set.
pub fn apply_env_overrides(cfg: &mut PipelineConfig) -> Result<(), Error> {
    if let Some(id) = get_env_parsed::<i64>(CHAPTER_ENV_VAR)? {
        cfg.chapter_id = ChapterId(id);
    }
    Ok(())
}

/// Parse and normalize a config from a TOML string.
///
/// Environment overrides are not applied here; see [`load_config_path`].
pub fn load_config_str(toml_str: &str) -> Result<PipelineConfig, Error> {
    let mut cfg: PipelineConfig = toml::from_str(toml_str)?;
    normalize_config(&mut cfg)?;
    Ok(cfg)
}

/// Read a config file (or use defaults when `path` is `None`), then apply
/// environment overrides.
pub fn load_config_path(path: Option<&Path>) -> Result<PipelineConfig, Error> {
    let mut cfg = match path {
        Some(p) => load_config_str(&std::fs::read_to_string(p)?)?,
        None => {
            let mut cfg = PipelineConfig::default();
            normalize_config(&mut cfg)?;
            cfg
        }
    };
    apply_env_overrides(&mut cfg)?;
    Ok(cfg)
}
