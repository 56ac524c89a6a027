//! Constituent reporting pipeline.
//!
//! Turns three relational extracts (constituents, their emails, and chapter
//! subscriptions) into a per-person `people` table and a per-calendar-day
//! `acquisition_facts` table. See [`pipeline`] for the end-to-end run and
//! [`transform`] for the two pure steps.

#![deny(missing_docs)]

pub mod config;
pub mod errors;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod profile;
pub mod timestamp;
pub mod transform;

pub use errors::{DataFormatError, Error};
