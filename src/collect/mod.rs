//! Record normalization and enrichment for the collector pipeline.

mod age;
mod record;

pub use age::age_years;
pub use record::{CSV_COLUMNS, RepoRecord, write_csv};
