//! Integration tests for the extraction pipeline against the real filesystem

use linesift_extractor::{
    extract, extract_blocking, ExtractError, ExtractorOptions, LineTransformer, PipelineConfig,
    TransformResult,
};
use std::fs;
use tempfile::TempDir;

/// Keeps lines containing a marker and strips it
struct MarkerFilter {
    marker: &'static str,
}

impl LineTransformer for MarkerFilter {
    fn transform(&self, line: &str) -> TransformResult {
        match line.strip_prefix(self.marker) {
            Some(rest) => TransformResult::accept(rest.trim_start()),
            None => TransformResult::reject(),
        }
    }
}

#[test]
fn test_extract_blocking_with_struct_transformer() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("log.txt");
    let dest = dir.path().join("errors.txt");
    fs::write(&src, "ERROR disk\nINFO ok\nERROR net\nWARN slow\n").unwrap();

    let config = PipelineConfig::new(&src, &dest, MarkerFilter { marker: "ERROR" })
        .with_options(ExtractorOptions::ordered());
    let report = extract_blocking(config).unwrap();

    assert_eq!(fs::read_to_string(&dest).unwrap(), "disk\nnet\n");
    assert_eq!(report.lines_read, 4);
    assert_eq!(report.lines_accepted, 2);
    assert_eq!(report.lines_written, 2);
}

#[tokio::test]
async fn test_destination_in_missing_directory() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("in.txt");
    fs::write(&src, "a\n").unwrap();
    let dest = dir.path().join("no-such-dir").join("out.txt");

    let err = extract(PipelineConfig::new(&src, &dest, |line: &str| {
        TransformResult::accept(line)
    }))
    .await
    .unwrap_err();

    match err {
        ExtractError::DestinationOpen { path, .. } => assert_eq!(path, dest),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(fs::read_to_string(&src).unwrap(), "a\n");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_large_source_multi_thread_runtime() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("big.txt");
    let dest = dir.path().join("even.txt");
    let source: String = (0..20_000).map(|i| format!("{}\n", i)).collect();
    fs::write(&src, source).unwrap();

    let mut options = ExtractorOptions::ordered();
    options.queue_capacity = 16;

    let report = extract(
        PipelineConfig::new(&src, &dest, |line: &str| {
            let n: u64 = line.parse().unwrap();
            TransformResult::from((n % 2 == 0).then(|| (n * 10).to_string()))
        })
        .with_options(options),
    )
    .await
    .unwrap();

    let written: Vec<u64> = fs::read_to_string(&dest)
        .unwrap()
        .lines()
        .map(|l| l.parse().unwrap())
        .collect();
    let expected: Vec<u64> = (0..20_000).filter(|n| n % 2 == 0).map(|n| n * 10).collect();
    assert_eq!(written, expected);
    assert_eq!(report.lines_accepted, 10_000);
    assert_eq!(report.lines_rejected, 10_000);
}

#[cfg(unix)]
#[tokio::test]
async fn test_unreadable_source_reports_read_error() {
    // Opening a directory succeeds on Unix, reading from it does not
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("out.txt");

    let err = extract(PipelineConfig::new(dir.path(), &dest, |line: &str| {
        TransformResult::accept(line)
    }))
    .await
    .unwrap_err();

    assert!(matches!(err, ExtractError::SourceRead { line: 0, .. }));
    assert_eq!(fs::read_to_string(&dest).unwrap(), "");
}

#[cfg(unix)]
#[tokio::test]
async fn test_destination_is_not_executable() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let src = dir.path().join("in.txt");
    let dest = dir.path().join("out.txt");
    fs::write(&src, "a\n").unwrap();

    extract(PipelineConfig::new(&src, &dest, |line: &str| {
        TransformResult::accept(line)
    }))
    .await
    .unwrap();

    let mode = fs::metadata(&dest).unwrap().permissions().mode();
    assert_eq!(mode & 0o700, 0o600);
    assert_eq!(mode & 0o111, 0);
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_full_device_reports_every_lost_line() {
    let full = std::path::Path::new("/dev/full");
    if !full.exists() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("in.txt");
    fs::write(&src, "keep 1\nskip\nkeep 2\nkeep 3\n").unwrap();

    let err = extract(
        PipelineConfig::new(&src, full, MarkerFilter { marker: "keep" })
            .with_options(ExtractorOptions::ordered()),
    )
    .await
    .unwrap_err();

    match err {
        ExtractError::PartialWrite {
            failed,
            first_line,
            first_error,
        } => {
            assert_eq!(failed, 3);
            assert_eq!(first_line, 1);
            assert_eq!(first_error.raw_os_error(), Some(28));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_worker_count_beyond_limit_is_configuration_error() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("in.txt");
    let dest = dir.path().join("out.txt");
    fs::write(&src, "a\n").unwrap();

    let mut options = ExtractorOptions::default();
    options.workers = usize::MAX;

    let err = extract(
        PipelineConfig::new(&src, &dest, |line: &str| TransformResult::accept(line))
            .with_options(options),
    )
    .await
    .unwrap_err();

    assert!(err.is_configuration());
    assert!(!dest.exists());
}
