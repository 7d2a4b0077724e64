//! CK metrics tool invocation
//!
//! CK is a Java jar that takes its options positionally:
//! `java -jar ck.jar <src> <use_jars> <max_files_per_partition>
//! <variables_and_fields> <out_dir> [ignored_dirs...]`. Its stdout and
//! stderr are preserved next to the metric CSVs for later inspection.

use crate::Result;
use crate::commands::Config;
use log::{debug, info};
use ohno::{IntoAppError, bail};
use std::fs;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

const LOG_TARGET: &str = "       ck";

/// Verify the configured jar exists before any download work starts
pub fn ensure_tool(ck_jar: &Path) -> Result<()> {
    if !ck_jar.is_file() {
        bail!("CK jar '{}' not found; set ck_jar in the config or pass --ck-jar", ck_jar.display());
    }

    Ok(())
}

/// Verify a Java runtime is on the path
pub async fn check_java() -> Result<()> {
    let output = Command::new("java")
        .arg("-version")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .into_app_err("could not run 'java -version'; a Java runtime is required")?;

    if !output.status.success() {
        bail!("'java -version' exited with {}", output.status);
    }

    // Java prints its version banner on stderr
    debug!(target: LOG_TARGET, "java runtime: {}", String::from_utf8_lossy(&output.stderr).lines().next().unwrap_or(""));
    Ok(())
}

/// Assemble the positional argument list for a CK run
#[must_use]
pub fn build_args(config: &Config, src_root: &Path, out_dir: &Path) -> Vec<String> {
    let mut args = vec![
        "-jar".to_string(),
        config.ck_jar.to_string(),
        src_root.display().to_string(),
        config.ck_use_jars.to_string(),
        config.ck_max_files_per_partition.to_string(),
        config.ck_variables_and_fields.to_string(),
        out_dir.display().to_string(),
    ];

    args.extend(config.ignored_dirs.iter().cloned());
    args
}

/// Run CK against a source root, writing metric CSVs and the captured
/// stdout/stderr into `out_dir`.
pub async fn run_ck(config: &Config, src_root: &Path, out_dir: &Path) -> Result<()> {
    fs::create_dir_all(out_dir).into_app_err_with(|| format!("creating '{}'", out_dir.display()))?;

    let args = build_args(config, src_root, out_dir);
    info!(target: LOG_TARGET, "running CK on '{}'", src_root.display());
    debug!(target: LOG_TARGET, "java {}", args.join(" "));

    let child = Command::new("java")
        .args(&args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .into_app_err("could not spawn the CK process")?;

    let output = match tokio::time::timeout(config.ck_timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => return Err(e).into_app_err("CK process failed to run"),
        Err(_) => {
            bail!("CK timed out after {} seconds", config.ck_timeout.as_secs());
        }
    };

    let stdout_log = out_dir.join("ck_stdout.log");
    let stderr_log = out_dir.join("ck_stderr.log");
    fs::write(&stdout_log, &output.stdout).into_app_err_with(|| format!("writing '{}'", stdout_log.display()))?;
    fs::write(&stderr_log, &output.stderr).into_app_err_with(|| format!("writing '{}'", stderr_log.display()))?;

    if !output.status.success() {
        bail!("CK exited with {}; see '{}'", output.status, stderr_log.display());
    }

    Ok(())
}
