//! Integration test for the `aggregate` command.
//!
//! Exercises the append-only aggregation workflow over a fixture CK output
//! directory, including repeated runs against the same repository.

use repo_miner::Host;
use std::path::Path;

/// Test host that captures output to in-memory buffers.
struct TestHost {
    output_buf: Vec<u8>,
    error_buf: Vec<u8>,
}

impl TestHost {
    const fn new() -> Self {
        Self {
            output_buf: Vec::new(),
            error_buf: Vec::new(),
        }
    }

    fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output_buf).into_owned()
    }
}

impl Host for TestHost {
    fn output(&mut self) -> impl std::io::Write {
        &mut self.output_buf
    }

    fn error(&mut self) -> impl std::io::Write {
        &mut self.error_buf
    }

    fn exit(&mut self, _code: i32) {}
}

fn write_fixture(root: &Path) {
    let ck_dir = root.join("ck_out/acme/widget");
    std::fs::create_dir_all(&ck_dir).expect("create CK output dir");

    std::fs::write(
        ck_dir.join("class.csv"),
        "file,class,type,wmc,cbo,rfc,lcom,dit,loc\n\
         A.java,com.acme.A,class,4,2,10,0,1,100\n\
         B.java,com.acme.B,class,6,4,20,2,3,200\n",
    )
    .expect("write class.csv");

    std::fs::write(
        ck_dir.join("method.csv"),
        "file,class,method,wmc,loc\n\
         A.java,com.acme.A,run/0,2,20\n",
    )
    .expect("write method.csv");
}

fn write_config(root: &Path) -> std::path::PathBuf {
    let config_path = root.join("repo-miner.toml");
    std::fs::write(
        &config_path,
        format!(
            "ck_output_dir = \"{}\"\naggregate_dir = \"{}\"\n",
            root.join("ck_out").display(),
            root.display()
        ),
    )
    .expect("write config");
    config_path
}

async fn run_aggregate(config_path: &Path) -> (TestHost, repo_miner::Result<()>) {
    let mut host = TestHost::new();
    let result = repo_miner::run(
        &mut host,
        [
            "repo-miner",
            "aggregate",
            "acme/widget",
            "--config",
            config_path.to_str().expect("valid path"),
        ],
    )
    .await;
    (host, result)
}

#[tokio::test]
async fn test_aggregate_command_end_to_end() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    write_fixture(temp_dir.path());
    let config_path = write_config(temp_dir.path());

    let (host, result) = run_aggregate(&config_path).await;
    assert!(result.is_ok(), "aggregate command failed: {result:?}");
    assert!(host.output_str().contains("Aggregated 2 classes from acme/widget"));

    let class_all = std::fs::read_to_string(temp_dir.path().join("ck_class_all.csv")).expect("read class table");
    let lines: Vec<&str> = class_all.lines().collect();
    assert_eq!(lines[0], "file,class,type,wmc,cbo,rfc,lcom,dit,loc,repo_full_name");
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("A.java,"));
    assert!(lines[1].ends_with(",acme/widget"));

    let method_all = std::fs::read_to_string(temp_dir.path().join("ck_method_all.csv")).expect("read method table");
    assert_eq!(method_all.lines().count(), 2);

    let agg = std::fs::read_to_string(temp_dir.path().join("repos_ck_agg.csv")).expect("read aggregate table");
    let agg_lines: Vec<&str> = agg.lines().collect();
    assert_eq!(
        agg_lines[0],
        "repo_full_name,num_classes,sum_class_loc,avg_class_wmc,avg_class_cbo,avg_class_rfc,avg_class_lcom,max_class_dit"
    );
    assert_eq!(agg_lines[1], "acme/widget,2,300,5,3,15,1,3");
}

#[tokio::test]
async fn test_aggregate_command_appends_on_rerun() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    write_fixture(temp_dir.path());
    let config_path = write_config(temp_dir.path());

    let (_, first) = run_aggregate(&config_path).await;
    assert!(first.is_ok(), "first run failed: {first:?}");
    let (_, second) = run_aggregate(&config_path).await;
    assert!(second.is_ok(), "second run failed: {second:?}");

    // Append-only: the same repository shows up twice, header stays single
    let agg = std::fs::read_to_string(temp_dir.path().join("repos_ck_agg.csv")).expect("read aggregate table");
    let repo_rows = agg.lines().filter(|line| line.starts_with("acme/widget,")).count();
    assert_eq!(repo_rows, 2);
    assert_eq!(agg.lines().filter(|line| line.starts_with("repo_full_name,")).count(), 1);

    let class_all = std::fs::read_to_string(temp_dir.path().join("ck_class_all.csv")).expect("read class table");
    assert_eq!(class_all.lines().count(), 5, "header plus two rows per run");
}

#[tokio::test]
async fn test_aggregate_command_without_ck_output_records_zeros() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path());

    let (host, result) = run_aggregate(&config_path).await;
    assert!(result.is_ok(), "missing CK output must aggregate to zeros: {result:?}");
    assert!(host.output_str().contains("Aggregated 0 classes"));

    let agg = std::fs::read_to_string(temp_dir.path().join("repos_ck_agg.csv")).expect("read aggregate table");
    assert_eq!(agg.lines().nth(1), Some("acme/widget,0,0,0,0,0,0,0"));

    // No combined tables when there was nothing to append
    assert!(!temp_dir.path().join("ck_class_all.csv").exists());
}
