//! Bounded log behaviour against real files on disk

use std::fs;
use std::io::Cursor;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use logtail::format::LineFormat;
use logtail::ledger::{Bounds, Watermark};
use logtail::tail::{LogTail, TailSettings, TailStats};
use tempfile::TempDir;

fn log_path(dir: &TempDir) -> PathBuf {
    dir.path().join("out.log")
}

fn line_bounds(min: u64, max: u64) -> TailSettings {
    TailSettings {
        bounds: Bounds {
            lines: Some(Watermark::new(Some(min), max).unwrap()),
            bytes: None,
        },
        ..TailSettings::default()
    }
}

fn byte_bounds(min: u64, max: u64) -> TailSettings {
    TailSettings {
        bounds: Bounds {
            bytes: Some(Watermark::new(Some(min), max).unwrap()),
            lines: None,
        },
        ..TailSettings::default()
    }
}

/// Lines and bytes actually on disk
fn on_disk(path: &Path) -> TailStats {
    let data = fs::read(path).unwrap();
    TailStats {
        lines: data.iter().filter(|&&b| b == b'\n').count(),
        bytes: data.len() as u64,
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn test_creates_missing_file_and_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/deeper/out.log");

    let mut tail = LogTail::open(&path, TailSettings::default()).unwrap();
    tail.append_line("hello").unwrap();

    assert_eq!(read(&path), "hello\n");
}

#[test]
fn test_line_hysteresis_keeps_only_newest() {
    let dir = TempDir::new().unwrap();
    let path = log_path(&dir);
    let mut tail = LogTail::open(&path, line_bounds(1, 3)).unwrap();

    for text in ["a", "b", "c"] {
        tail.append_line(text).unwrap();
    }
    assert_eq!(read(&path), "a\nb\nc\n");

    // Crossing the ceiling drops to the floor of one line, the newest.
    tail.append_line("d").unwrap();
    assert_eq!(read(&path), "d\n");
    assert_eq!(tail.stats(), on_disk(&path));

    // Below the ceiling again, so the next arrival needs no trim.
    tail.append_line("e").unwrap();
    assert_eq!(read(&path), "d\ne\n");
    assert_eq!(tail.metrics().trim_passes, 1);
}

#[test]
fn test_byte_hysteresis_drops_to_floor() {
    let dir = TempDir::new().unwrap();
    let path = log_path(&dir);
    let mut tail = LogTail::open(&path, byte_bounds(5, 10)).unwrap();

    for text in ["aa", "bb", "cc"] {
        tail.append_line(text).unwrap();
    }
    assert_eq!(tail.stats().bytes, 9);
    assert_eq!(tail.metrics().trim_passes, 0);

    tail.append_line("dd").unwrap();
    assert_eq!(tail.metrics().trim_passes, 1);
    assert!(tail.stats().bytes <= 5);
    assert_eq!(read(&path), "dd\n");
    assert_eq!(tail.stats(), on_disk(&path));
}

#[test]
fn test_oversized_line_is_kept() {
    let dir = TempDir::new().unwrap();
    let path = log_path(&dir);
    let settings = TailSettings {
        bounds: Bounds {
            bytes: Some(Watermark::ceiling(5)),
            lines: None,
        },
        ..TailSettings::default()
    };
    let mut tail = LogTail::open(&path, settings).unwrap();

    tail.append_line("123456789").unwrap();
    assert_eq!(tail.stats(), TailStats { lines: 1, bytes: 10 });
    assert_eq!(read(&path), "123456789\n");

    tail.append_line("x").unwrap();
    assert_eq!(read(&path), "x\n");
}

#[test]
fn test_restart_settles_tightened_bounds() {
    let dir = TempDir::new().unwrap();
    let path = log_path(&dir);
    let existing: String = (0..10).map(|i| format!("line-{i:04}\n")).collect();
    assert_eq!(existing.len(), 100);
    fs::write(&path, &existing).unwrap();

    let mut tail = LogTail::open(&path, line_bounds(2, 5)).unwrap();
    assert_eq!(tail.stats(), TailStats { lines: 2, bytes: 20 });
    assert_eq!(read(&path), "line-0008\nline-0009\n");

    tail.append_line("line-0010").unwrap();
    assert_eq!(read(&path), "line-0008\nline-0009\nline-0010\n");
}

#[test]
fn test_settle_leaves_compliant_file_alone() {
    let dir = TempDir::new().unwrap();
    let path = log_path(&dir);
    fs::write(&path, "one\ntwo\nthree\n").unwrap();

    let settings = TailSettings {
        bounds: Bounds {
            lines: Some(Watermark::ceiling(3)),
            bytes: Some(Watermark::ceiling(14)),
        },
        ..TailSettings::default()
    };
    let mut tail = LogTail::open(&path, settings).unwrap();
    let ingested = tail.run(Cursor::new(Vec::new())).unwrap();

    assert_eq!(ingested, 0);
    assert_eq!(tail.metrics().trim_passes, 0);
    assert_eq!(read(&path), "one\ntwo\nthree\n");
}

#[test]
fn test_replay_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = log_path(&dir);

    let first_stats = {
        let mut tail = LogTail::open(&path, line_bounds(3, 6)).unwrap();
        tail.run(Cursor::new(b"alpha\nbeta\ngamma\ndelta\nepsilon\nzeta\neta\n".to_vec()))
            .unwrap();
        tail.stats()
    };
    assert_eq!(first_stats, on_disk(&path));

    let tail = LogTail::open(&path, line_bounds(3, 6)).unwrap();
    assert_eq!(tail.stats(), first_stats);
    assert_eq!(tail.ledger().iter().sum::<u64>(), first_stats.bytes);
}

#[test]
fn test_small_memory_bound_compacts_correctly() {
    let dir = TempDir::new().unwrap();
    let path = log_path(&dir);
    let settings = TailSettings {
        bounds: Bounds {
            bytes: Some(Watermark::new(Some(200), 400).unwrap()),
            lines: None,
        },
        max_memory: NonZeroUsize::new(7),
        format: LineFormat::Plain,
    };
    let mut tail = LogTail::open(&path, settings).unwrap();

    let lines: Vec<String> = (0..100).map(|i| format!("entry number {i}")).collect();
    for line in &lines {
        tail.append_line(line).unwrap();
        assert_eq!(tail.stats(), on_disk(&path));
        assert!(tail.stats().bytes <= 400);
    }

    // Whatever survived is a contiguous run of the newest lines.
    let kept: Vec<String> = read(&path).lines().map(str::to_string).collect();
    assert!(!kept.is_empty());
    assert_eq!(kept.as_slice(), &lines[lines.len() - kept.len()..]);
}

#[test]
fn test_prefix_applies_to_every_line() {
    let dir = TempDir::new().unwrap();
    let path = log_path(&dir);
    let settings = TailSettings {
        format: LineFormat::new(false, Some("[svc] ".to_string())),
        ..line_bounds(2, 2)
    };
    let mut tail = LogTail::open(&path, settings).unwrap();
    tail.run(Cursor::new(b"up\nready\nserving\n".to_vec())).unwrap();

    assert_eq!(read(&path), "[svc] ready\n[svc] serving\n");
}

#[test]
fn test_both_bounds_compose() {
    let dir = TempDir::new().unwrap();
    let path = log_path(&dir);
    let settings = TailSettings {
        bounds: Bounds {
            lines: Some(Watermark::new(Some(3), 4).unwrap()),
            bytes: Some(Watermark::new(Some(12), 20).unwrap()),
        },
        ..TailSettings::default()
    };
    let mut tail = LogTail::open(&path, settings).unwrap();

    for text in ["a", "b", "c", "dddddddddd", "e", "f"] {
        tail.append_line(text).unwrap();
        let stats = tail.stats();
        assert_eq!(stats, on_disk(&path));
        assert!(stats.lines <= 4);
        assert!(stats.bytes <= 20);
    }
}

#[test]
fn test_raw_bytes_reach_disk_unchanged() {
    let dir = TempDir::new().unwrap();
    let path = log_path(&dir);
    let mut tail = LogTail::open(&path, line_bounds(2, 2)).unwrap();

    tail.run(Cursor::new(b"caf\xe9\r\n\x80ok\n\xff".to_vec())).unwrap();

    assert_eq!(fs::read(&path).unwrap(), b"\x80ok\n\xff\n");
    assert_eq!(tail.stats(), on_disk(&path));
}
