//! The two pure transformations of the pipeline.
//!
//! ```text
//! cons + cons_email + chapter ──→ people::build_people ──→ people
//!                                                     │
//!                                                     └──→ acquisition::aggregate_acquisitions ──→ acquisition_facts
//! ```
//!
//! Neither step reads files or holds state; both take borrowed, already-typed
//! rows and return fresh vectors.

pub mod acquisition;
pub mod people;

pub use acquisition::{aggregate_acquisitions, count_by_month_day};
pub use people::{JoinReport, PeopleBuild, build_people, resolve_dates};
