//! Source analysis: repository selection, Java source-root detection,
//! CK invocation, and metric aggregation

mod aggregate;
mod ck;
mod java_root;
mod selector;

pub use aggregate::{AGG_COLUMNS, ClassMetricsAggregate, aggregate_class_metrics, append_aggregate_row, append_with_repo};
pub use ck::{build_args, check_java, ensure_tool, run_ck};
pub use java_root::find_java_root;
pub use selector::{CsvRow, full_name_of, load_rows, select};
