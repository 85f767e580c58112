//! Integration tests for file-backed overlay series.

use std::path::{Path, PathBuf};

use kde_contour::overlay::{OverlaySource, read_series};
use kde_contour::prelude::*;

fn tempdir() -> PathBuf {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let id = COUNTER.fetch_add(1, Ordering::Relaxed);
    let dir =
        std::env::temp_dir().join(format!("kde_contour_overlay_test_{}_{id}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).unwrap();
}

fn catalogs() -> Vec<Dataset> {
    vec![
        Dataset::from_catalog(&MAIOLINO_2023).unwrap(),
        Dataset::from_catalog(&HARIKANE_2023).unwrap(),
    ]
}

fn small_config() -> DensityConfig {
    DensityConfig {
        resolution: Resolution::square(16),
        ..DensityConfig::catalog_comparison()
    }
}

#[test]
fn read_series_uses_first_line_only() {
    let dir = tempdir();
    write(&dir, "series.txt", "0.1, 0.2,0.4\n9,9,9\n");
    let values = read_series(dir.join("series.txt")).unwrap();
    assert_eq!(values, vec![0.1, 0.2, 0.4]);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn load_applies_log_and_offset() {
    let dir = tempdir();
    write(&dir, "eddington_ratios.txt", "0.1,1.0,10.0\n");
    write(&dir, "extinctions.txt", "23.0,23.3,23.8\n");

    let curve = OverlaySource::in_dir(&dir).load().unwrap();
    assert_eq!(curve.len(), 3);
    let expected_x = [-1.0, 0.0, 1.0];
    let expected_y = [0.2, 0.5, 1.0];
    for (got, want) in curve.xs().iter().zip(expected_x) {
        assert!((got - want).abs() < 1e-12, "x {got} != {want}");
    }
    for (got, want) in curve.ys().iter().zip(expected_y) {
        assert!((got - want).abs() < 1e-9, "y {got} != {want}");
    }
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn load_drops_non_positive_ratios() {
    let dir = tempdir();
    write(&dir, "eddington_ratios.txt", "0.5,0.0,-1.0,2.0\n");
    write(&dir, "extinctions.txt", "23.0,23.1,23.2,23.3\n");

    let curve = OverlaySource::in_dir(&dir).load().unwrap();
    assert_eq!(curve.len(), 2);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn custom_offset_is_honoured() {
    let dir = tempdir();
    write(&dir, "eddington_ratios.txt", "1.0\n");
    write(&dir, "extinctions.txt", "5.0\n");

    let source = OverlaySource {
        extinction_offset: 2.0,
        ..OverlaySource::in_dir(&dir)
    };
    let curve = source.load().unwrap();
    assert!((curve.ys()[0] - 3.0).abs() < 1e-12);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn mismatched_series_lengths_are_an_error() {
    let dir = tempdir();
    write(&dir, "eddington_ratios.txt", "0.1,0.2,0.3\n");
    write(&dir, "extinctions.txt", "23.0,23.1\n");

    let err = OverlaySource::in_dir(&dir).load().unwrap_err();
    assert!(matches!(err, Error::LengthMismatch { x_len: 3, y_len: 2 }));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_file_skips_overlay_with_warning() {
    let dir = tempdir();
    write(&dir, "eddington_ratios.txt", "0.1,0.2,0.3\n");

    let source = OverlaySource::in_dir(&dir);
    let err = source.load().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingResource);

    let comparison = compare(
        &catalogs(),
        Some(&source),
        &small_config(),
        FramePolicy::PerDataset,
    )
    .unwrap();
    assert_eq!(comparison.fields().len(), 2);
    assert!(comparison.overlay().is_none());
    assert_eq!(comparison.warnings().len(), 1);
    assert!(comparison.warnings()[0].contains("extinctions.txt"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn malformed_overlay_fails_the_comparison() {
    let dir = tempdir();
    write(&dir, "eddington_ratios.txt", "0.1,oops,0.3\n");
    write(&dir, "extinctions.txt", "23.0,23.1,23.2\n");

    let err = compare(
        &catalogs(),
        Some(&OverlaySource::in_dir(&dir)),
        &small_config(),
        FramePolicy::PerDataset,
    )
    .unwrap_err();
    assert!(matches!(err, Error::ParseValue { ref token, .. } if token == "oops"));
    assert!(!err.is_recoverable());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn overlay_is_attached_when_present() {
    let dir = tempdir();
    write(&dir, "eddington_ratios.txt", "0.05,0.1,0.5,1.0\n");
    write(&dir, "extinctions.txt", "23.0,23.2,23.4,23.6\n");

    let comparison = compare(
        &catalogs(),
        Some(&OverlaySource::in_dir(&dir)),
        &small_config(),
        FramePolicy::Shared,
    )
    .unwrap();
    assert!(comparison.warnings().is_empty());
    assert_eq!(comparison.overlay().map(|c| c.len()), Some(4));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn caller_io_errors_map_like_the_loader() {
    let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err = Error::from_io("out.csv", missing);
    assert_eq!(err.kind(), ErrorKind::MissingResource);
    assert!(err.to_string().contains("out.csv"));

    let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err = Error::from_io("out.csv", denied);
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(!err.is_recoverable());
}
