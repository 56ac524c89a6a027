//! Typed rows flowing through the pipeline.
//!
//! - [`records`]: the three source extracts after type coercion
//!   (constituents, their emails, and chapter subscriptions).
//! - [`summary`]: the derived `people` and `acquisition_facts` rows.

pub mod records;
pub mod summary;

pub use records::{ChapterId, EmailId, EmailRecord, PersonId, PersonRecord, SubscriptionRecord};
pub use summary::{AcquisitionCount, MonthDay, PersonSummary};
