//! Aggregation of CK metric CSVs
//!
//! CK's column names drift between releases (`cbo` vs `cboModified`,
//! `loc` vs `locClass`), so each metric resolves through an alias list.
//! All output files are append-only so repeated runs accumulate rows
//! across repositories.

use crate::Result;
use log::debug;
use ohno::IntoAppError;
use std::fs::OpenOptions;
use std::path::Path;

const LOG_TARGET: &str = "      agg";

/// Header of the per-repository aggregate table
pub const AGG_COLUMNS: [&str; 8] = [
    "repo_full_name",
    "num_classes",
    "sum_class_loc",
    "avg_class_wmc",
    "avg_class_cbo",
    "avg_class_rfc",
    "avg_class_lcom",
    "max_class_dit",
];

/// Accepted header spellings per metric, in priority order
const WMC_ALIASES: &[&str] = &["wmc", "WMC"];
const CBO_ALIASES: &[&str] = &["cbo", "CBO", "cboModified", "CBOModified"];
const RFC_ALIASES: &[&str] = &["rfc", "RFC"];
const LCOM_ALIASES: &[&str] = &["lcom", "LCOM"];
const DIT_ALIASES: &[&str] = &["dit", "DIT"];
const LOC_ALIASES: &[&str] = &["loc", "LOC", "locClass"];

/// Summary of one repository's CK class table: a class count, summed lines
/// of code, averaged complexity/coupling metrics, and the deepest
/// inheritance chain. All zero when there is nothing to aggregate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassMetricsAggregate {
    pub num_classes: usize,
    pub sum_class_loc: f64,
    pub avg_class_wmc: f64,
    pub avg_class_cbo: f64,
    pub avg_class_rfc: f64,
    pub avg_class_lcom: f64,
    pub max_class_dit: f64,
}

/// Find the index of the first alias present in the header
fn resolve_column(header: &csv::StringRecord, aliases: &[&str]) -> Option<usize> {
    aliases
        .iter()
        .find_map(|alias| header.iter().position(|column| column == *alias))
}

fn parse_cell(row: &csv::StringRecord, column: Option<usize>) -> Option<f64> {
    column.and_then(|i| row.get(i)).and_then(|cell| cell.trim().parse::<f64>().ok())
}

/// Aggregate a CK class table. A missing file or empty table yields the
/// all-zero aggregate rather than an error. Cells that fail to parse
/// contribute nothing to the sums but still count toward the average's
/// divisor, matching the long-standing behavior of downstream consumers.
pub fn aggregate_class_metrics(class_csv: &Path) -> Result<ClassMetricsAggregate> {
    if !class_csv.is_file() {
        debug!(target: LOG_TARGET, "No class table at '{}', aggregating zeros", class_csv.display());
        return Ok(ClassMetricsAggregate::default());
    }

    let mut reader = csv::Reader::from_path(class_csv).into_app_err_with(|| format!("opening '{}'", class_csv.display()))?;
    let header = reader
        .headers()
        .into_app_err_with(|| format!("reading header of '{}'", class_csv.display()))?
        .clone();

    let c_wmc = resolve_column(&header, WMC_ALIASES);
    let c_cbo = resolve_column(&header, CBO_ALIASES);
    let c_rfc = resolve_column(&header, RFC_ALIASES);
    let c_lcom = resolve_column(&header, LCOM_ALIASES);
    let c_dit = resolve_column(&header, DIT_ALIASES);
    let c_loc = resolve_column(&header, LOC_ALIASES);

    let (mut wmc, mut cbo, mut rfc, mut lcom, mut loc) = (0.0_f64, 0.0_f64, 0.0_f64, 0.0_f64, 0.0_f64);
    let mut max_dit: Option<f64> = None;
    let mut row_count = 0_usize;

    for row in reader.records() {
        let row = row.into_app_err_with(|| format!("reading '{}'", class_csv.display()))?;
        row_count += 1;

        wmc += parse_cell(&row, c_wmc).unwrap_or(0.0);
        cbo += parse_cell(&row, c_cbo).unwrap_or(0.0);
        rfc += parse_cell(&row, c_rfc).unwrap_or(0.0);
        lcom += parse_cell(&row, c_lcom).unwrap_or(0.0);
        loc += parse_cell(&row, c_loc).unwrap_or(0.0);

        if let Some(dit) = parse_cell(&row, c_dit) {
            max_dit = Some(max_dit.map_or(dit, |m| m.max(dit)));
        }
    }

    if row_count == 0 {
        return Ok(ClassMetricsAggregate::default());
    }

    #[expect(clippy::cast_precision_loss, reason = "class counts are far below 2^52")]
    let divisor = row_count as f64;

    Ok(ClassMetricsAggregate {
        num_classes: row_count,
        sum_class_loc: loc,
        avg_class_wmc: wmc / divisor,
        avg_class_cbo: cbo / divisor,
        avg_class_rfc: rfc / divisor,
        avg_class_lcom: lcom / divisor,
        max_class_dit: max_dit.unwrap_or(0.0),
    })
}

/// Append one repository's aggregate to the running table, writing the
/// header only when the file does not exist yet
pub fn append_aggregate_row(agg_csv: &Path, repo_full_name: &str, agg: &ClassMetricsAggregate) -> Result<()> {
    let write_header = !agg_csv.exists();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(agg_csv)
        .into_app_err_with(|| format!("opening '{}'", agg_csv.display()))?;

    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    if write_header {
        writer.write_record(AGG_COLUMNS).into_app_err("writing aggregate header")?;
    }

    writer
        .write_record([
            repo_full_name,
            &agg.num_classes.to_string(),
            &agg.sum_class_loc.to_string(),
            &agg.avg_class_wmc.to_string(),
            &agg.avg_class_cbo.to_string(),
            &agg.avg_class_rfc.to_string(),
            &agg.avg_class_lcom.to_string(),
            &agg.max_class_dit.to_string(),
        ])
        .into_app_err("writing aggregate row")?;

    writer.flush().into_app_err("flushing aggregate table")?;
    Ok(())
}

/// Append every row of a CK output CSV to a combined table, with the
/// repository name in a trailing `repo_full_name` column. A missing source
/// file is a no-op; the combined header is taken from the first file ever
/// appended.
pub fn append_with_repo(source_csv: &Path, combined_csv: &Path, repo_full_name: &str) -> Result<()> {
    if !source_csv.is_file() {
        debug!(target: LOG_TARGET, "No table at '{}', nothing to append", source_csv.display());
        return Ok(());
    }

    let mut reader = csv::Reader::from_path(source_csv).into_app_err_with(|| format!("opening '{}'", source_csv.display()))?;
    let source_header = reader
        .headers()
        .into_app_err_with(|| format!("reading header of '{}'", source_csv.display()))?
        .clone();

    let write_header = !combined_csv.exists();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(combined_csv)
        .into_app_err_with(|| format!("opening '{}'", combined_csv.display()))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(file);

    if write_header {
        let mut header: Vec<String> = source_header.iter().map(String::from).collect();
        header.push("repo_full_name".to_string());
        writer.write_record(&header).into_app_err("writing combined header")?;
    }

    let mut appended = 0_usize;
    for row in reader.records() {
        let row = row.into_app_err_with(|| format!("reading '{}'", source_csv.display()))?;

        let mut cells: Vec<String> = row.iter().map(String::from).collect();
        cells.push(repo_full_name.to_string());

        writer.write_record(&cells).into_app_err("writing combined row")?;
        appended += 1;
    }

    writer.flush().into_app_err("flushing combined table")?;
    debug!(target: LOG_TARGET, "Appended {appended} row(s) from '{}'", source_csv.display());
    Ok(())
}
