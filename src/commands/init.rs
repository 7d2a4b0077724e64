use super::Host;
use super::config::Config;
use crate::Result;
use camino::Utf8PathBuf;
use clap::Parser;
use ohno::bail;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Output configuration file path
    #[arg(value_name = "PATH", default_value = "repo-miner.toml")]
    pub output: Utf8PathBuf,

    /// Overwrite an existing configuration file
    #[arg(long)]
    pub force: bool,
}

pub fn init_config<H: Host>(host: &mut H, args: &InitArgs) -> Result<()> {
    if args.output.exists() && !args.force {
        bail!("'{}' already exists; pass --force to overwrite it", args.output);
    }

    Config::save_default(&args.output)?;
    let _ = writeln!(host.output(), "Generated default configuration file: {}", args.output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::host::TestHost;

    #[test]
    fn test_init_writes_config() {
        let dir = tempfile::tempdir().unwrap();
        let output = Utf8PathBuf::from(dir.path().join("repo-miner.toml").to_str().unwrap());
        let mut host = TestHost::new();

        init_config(&mut host, &InitArgs { output: output.clone(), force: false }).unwrap();

        assert!(output.exists());
        assert!(host.output_str().contains("repo-miner.toml"));
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let output = Utf8PathBuf::from(dir.path().join("repo-miner.toml").to_str().unwrap());
        std::fs::write(&output, "# existing").unwrap();
        let mut host = TestHost::new();

        let result = init_config(&mut host, &InitArgs { output: output.clone(), force: false });
        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "# existing");
    }

    #[test]
    fn test_init_force_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let output = Utf8PathBuf::from(dir.path().join("repo-miner.toml").to_str().unwrap());
        std::fs::write(&output, "# existing").unwrap();
        let mut host = TestHost::new();

        init_config(&mut host, &InitArgs { output: output.clone(), force: true }).unwrap();
        assert_ne!(std::fs::read_to_string(&output).unwrap(), "# existing");
    }
}
