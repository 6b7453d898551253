mod common;

use std::fs::{self, File};
use std::path::Path;

use approx::assert_relative_eq;
use common::{ScriptedTracker, far_away, target};
use tempfile::TempDir;
use tracker_bench_rs::error::{ConfigError, FrameError};
use tracker_bench_rs::tracker::InMemoryFrames;
use tracker_bench_rs::{
    BenchmarkRunner, DatasetInfo, Error, EvaluationConfig, Rect, StopReason, load_dataset_infos,
};

fn ground_truth_text(rect: Rect, frames: usize) -> String {
    (0..frames)
        .map(|_| format!("{},{},{},{}\n", rect.x, rect.y, rect.width, rect.height))
        .collect()
}

fn add_sequence(root: &Path, name: &str, rect: Rect, frames: usize) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    File::create(dir.join("video.mp4")).unwrap();
    fs::write(dir.join("groundtruth.txt"), ground_truth_text(rect, frames)).unwrap();
}

fn frames_for(info: &DatasetInfo) -> Result<InMemoryFrames, FrameError> {
    let frames = fs::read_to_string(info.ground_truth_paths[0].as_path())
        .map(|text| text.lines().count())
        .map_err(|e| FrameError(e.to_string()))?;
    Ok(InMemoryFrames::blank(frames, 100, 100))
}

fn immediate_config() -> EvaluationConfig {
    EvaluationConfig {
        reinit_strategy: Some("immediate".to_string()),
        ..Default::default()
    }
}

#[test]
fn test_run_writes_every_artifact() {
    let data = TempDir::new().unwrap();
    add_sequence(data.path(), "seq_a", target(), 5);
    add_sequence(data.path(), "seq_b", target(), 4);
    let out = TempDir::new().unwrap();

    let mut runner = BenchmarkRunner::new(immediate_config())
        .unwrap()
        .with_output_dir(out.path());
    runner
        .comparator_mut()
        .add_tracker(ScriptedTracker::fixed("perfect", target()));
    runner
        .comparator_mut()
        .add_tracker(ScriptedTracker::fixed("drift", far_away()));

    let datasets = load_dataset_infos(data.path());
    let report = runner.run(&datasets, frames_for).unwrap();

    assert!(!report.cancelled);
    assert!(report.export_failures.is_empty());
    assert_eq!(report.sequences.len(), 2);
    for sequence in &report.sequences {
        assert_eq!(sequence.stop_reason, Some(StopReason::SourceExhausted));
    }
    assert_eq!(report.sequences[0].frames_processed, 5);
    assert_eq!(report.sequences[0].summaries["perfect"].frame_count, 4);
    assert_eq!(report.sequences[1].summaries["drift"].reinit_count, 3);

    assert!(out.path().join("config.yaml").is_file());
    assert!(out.path().join("overall.yaml").is_file());
    for name in ["seq_a", "seq_b"] {
        let dir = out.path().join(name);
        assert!(dir.join("summary.yaml").is_file());
        assert!(dir.join("perfect_results.csv").is_file());
        assert!(dir.join("drift_results.csv").is_file());
    }

    let table = fs::read_to_string(out.path().join("seq_a/perfect_results.csv")).unwrap();
    let mut lines = table.lines();
    assert!(lines.next().unwrap().starts_with("frame,"));
    assert_eq!(lines.count(), 4);

    let perfect = report.overall.get("perfect").unwrap();
    assert_eq!(perfect.sequences, 2);
    assert_relative_eq!(perfect.average_overlap, 1.0);
    assert_relative_eq!(perfect.valid_frame_percent, 1.0);
    let drift = report.overall.get("drift").unwrap();
    assert_relative_eq!(drift.reinit_count, 3.5);
    assert_eq!(drift.valid_frame_percent, 0.0);
}

#[test]
fn test_export_failures_do_not_stop_run() {
    let data = TempDir::new().unwrap();
    add_sequence(data.path(), "seq_a", target(), 4);
    add_sequence(data.path(), "seq_b", target(), 3);
    let out = TempDir::new().unwrap();
    let not_a_dir = out.path().join("results");
    fs::write(&not_a_dir, "occupied").unwrap();

    let mut runner = BenchmarkRunner::new(immediate_config())
        .unwrap()
        .with_output_dir(&not_a_dir);
    runner
        .comparator_mut()
        .add_tracker(ScriptedTracker::fixed("perfect", target()));

    let report = runner
        .run(&load_dataset_infos(data.path()), frames_for)
        .unwrap();

    assert_eq!(report.sequences.len(), 2);
    for sequence in &report.sequences {
        assert_eq!(sequence.stop_reason, Some(StopReason::SourceExhausted));
        assert!(!sequence.summaries.is_empty());
    }
    // config.yaml, both sequence directories and overall.yaml
    assert_eq!(report.export_failures.len(), 4);
    let perfect = report.overall.get("perfect").unwrap();
    assert_eq!(perfect.sequences, 2);
    assert_relative_eq!(perfect.valid_frame_percent, 1.0);
    assert_eq!(fs::read_to_string(&not_a_dir).unwrap(), "occupied");
}

#[test]
fn test_saved_config_round_trips() {
    let data = TempDir::new().unwrap();
    add_sequence(data.path(), "seq_a", target(), 3);
    let out = TempDir::new().unwrap();

    let mut config = immediate_config();
    config.score_thresholds.insert("VIT".to_string(), 0.3);
    config.overlap_threshold = 0.5;

    let mut runner = BenchmarkRunner::new(config.clone())
        .unwrap()
        .with_output_dir(out.path());
    runner
        .comparator_mut()
        .add_tracker(ScriptedTracker::fixed("perfect", target()));
    runner
        .run(&load_dataset_infos(data.path()), frames_for)
        .unwrap();

    let saved = EvaluationConfig::from_file(out.path().join("config.yaml")).unwrap();
    assert_eq!(saved, config);
}

#[test]
fn test_missing_ground_truth_aborts_run() {
    let data = TempDir::new().unwrap();
    let dir = data.path().join("no_truth");
    fs::create_dir(&dir).unwrap();
    File::create(dir.join("video.mp4")).unwrap();

    let mut runner = BenchmarkRunner::new(EvaluationConfig::default()).unwrap();
    runner
        .comparator_mut()
        .add_tracker(ScriptedTracker::fixed("perfect", target()));
    let result = runner.run(&load_dataset_infos(data.path()), frames_for);
    assert!(matches!(result, Err(Error::GroundTruth(_))));
}

#[test]
fn test_unreadable_frames_skip_sequence() {
    let data = TempDir::new().unwrap();
    add_sequence(data.path(), "seq_a", target(), 5);
    add_sequence(data.path(), "seq_b", target(), 4);
    let out = TempDir::new().unwrap();

    let mut runner = BenchmarkRunner::new(EvaluationConfig::default())
        .unwrap()
        .with_output_dir(out.path());
    runner
        .comparator_mut()
        .add_tracker(ScriptedTracker::fixed("perfect", target()));

    let report = runner
        .run(&load_dataset_infos(data.path()), |info| {
            if info.name == "seq_a" {
                Err(FrameError("cannot open video".to_string()))
            } else {
                frames_for(info)
            }
        })
        .unwrap();

    assert_eq!(report.sequences[0].stop_reason, None);
    assert!(report.sequences[0].summaries.is_empty());
    assert_eq!(report.sequences[1].stop_reason, Some(StopReason::SourceExhausted));
    assert!(!out.path().join("seq_a").exists());
    assert!(out.path().join("seq_b/summary.yaml").is_file());
    assert_eq!(report.overall.get("perfect").unwrap().sequences, 1);
}

fn run_sequences(names: &[&str], data: &Path) -> Vec<tracker_bench_rs::orchestrator::SequenceReport> {
    let config = EvaluationConfig {
        reinit_strategy: Some("one_init".to_string()),
        ..Default::default()
    };
    let mut runner = BenchmarkRunner::new(config).unwrap();
    runner
        .comparator_mut()
        .add_tracker(ScriptedTracker::fixed("stuck", far_away()));

    let datasets: Vec<DatasetInfo> = load_dataset_infos(data)
        .into_iter()
        .filter(|d| names.contains(&d.name.as_str()))
        .collect();
    runner.run(&datasets, frames_for).unwrap().sequences
}

#[test]
fn test_sequences_are_independent() {
    let data = TempDir::new().unwrap();
    // The tracker is disabled in seq_a and must start fresh in seq_b.
    add_sequence(data.path(), "seq_a", target(), 5);
    add_sequence(data.path(), "seq_b", far_away(), 5);

    let both = run_sequences(&["seq_a", "seq_b"], data.path());
    let alone = run_sequences(&["seq_b"], data.path());

    let first = both[0].summaries["stuck"];
    assert_eq!(first.valid_frame_percent, 0.0);

    let after = both[1].summaries["stuck"];
    let fresh = alone[0].summaries["stuck"];
    assert_eq!(after.valid_frame_percent, 1.0);
    assert_eq!(after.valid_frame_percent, fresh.valid_frame_percent);
    assert_eq!(after.average_overlap, fresh.average_overlap);
    assert_eq!(after.average_error, fresh.average_error);
    assert_eq!(after.reinit_count, fresh.reinit_count);
    assert_eq!(after.frame_count, fresh.frame_count);
}

#[test]
fn test_cancelled_run_stops_early() {
    let data = TempDir::new().unwrap();
    add_sequence(data.path(), "seq_a", target(), 5);
    add_sequence(data.path(), "seq_b", target(), 5);

    let mut runner = BenchmarkRunner::new(EvaluationConfig::default()).unwrap();
    runner
        .comparator_mut()
        .add_tracker(ScriptedTracker::fixed("perfect", target()));
    runner.cancel_token().cancel();

    let report = runner
        .run(&load_dataset_infos(data.path()), frames_for)
        .unwrap();
    assert!(report.cancelled);
    assert_eq!(report.sequences.len(), 1);
    assert_eq!(report.sequences[0].stop_reason, Some(StopReason::Cancelled));
}

#[test]
fn test_run_requires_trackers() {
    let mut runner = BenchmarkRunner::new(EvaluationConfig::default()).unwrap();
    assert!(matches!(
        runner.run(&[], frames_for),
        Err(Error::NoTrackers)
    ));
}

#[test]
fn test_invalid_config_rejected_up_front() {
    let config = EvaluationConfig {
        reinit_strategy: Some("delayed".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        BenchmarkRunner::new(config),
        Err(ConfigError::MissingDelayFrames)
    ));
}
