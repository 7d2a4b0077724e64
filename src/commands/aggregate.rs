//! The aggregate command: fold one repository's CK output into the
//! accumulated tables

use super::Host;
use super::common::CommonArgs;
use crate::Result;
use crate::analyze::{aggregate_class_metrics, append_aggregate_row, append_with_repo};
use clap::Parser;
use log::debug;
use ohno::bail;
use std::io::Write;

const LOG_TARGET: &str = "      agg";

#[derive(Parser, Debug)]
pub struct AggregateArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Repository whose CK output should be aggregated, as `owner/name`
    #[arg(value_name = "OWNER/NAME")]
    pub repo: String,
}

pub fn aggregate_metrics<H: Host>(host: &mut H, args: &AggregateArgs) -> Result<()> {
    let config = args.common.init()?;

    let Some((owner, repo)) = args.repo.split_once('/') else {
        bail!("'{}' is not an owner/name pair", args.repo);
    };

    let out_dir = config.ck_output_dir.as_std_path().join(owner).join(repo);
    let class_csv = out_dir.join("class.csv");
    let method_csv = out_dir.join("method.csv");
    debug!(target: LOG_TARGET, "Aggregating CK output from '{}'", out_dir.display());

    // Missing tables are tolerated; the aggregate row records zeros
    let agg_dir = config.aggregate_dir.as_std_path();
    append_with_repo(&class_csv, &agg_dir.join("ck_class_all.csv"), &args.repo)?;
    append_with_repo(&method_csv, &agg_dir.join("ck_method_all.csv"), &args.repo)?;

    let agg = aggregate_class_metrics(&class_csv)?;
    append_aggregate_row(&agg_dir.join("repos_ck_agg.csv"), &args.repo, &agg)?;

    let _ = writeln!(host.output(), "Aggregated {} classes from {}", agg.num_classes, args.repo);
    Ok(())
}
