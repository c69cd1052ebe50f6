//! Resource types and their operations.
//!
//! Each type here implements [`Resource`](crate::collection::Resource), so
//! it can be produced by a [`PagedCollection`](crate::PagedCollection).
//! Operations that only make sense for one resource are inherent methods on
//! that resource's collection, e.g. `PagedCollection<Project>::create`.

pub mod charges;
pub mod files;
pub mod jobs;
pub mod metrics;
pub mod pricing;
pub mod projects;
pub mod reference;

pub use charges::Charge;
pub use files::{File, FileRecord};
pub use jobs::{Job, JobRecord};
pub use metrics::Metric;
pub use pricing::{Money, Price, TotalPrice};
pub use projects::{Project, ProjectRecord, ProjectStatus};
pub use reference::{Domain, Locale, Service};
