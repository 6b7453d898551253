//! Multi-sequence benchmark runs.

use std::path::{Path, PathBuf};

use crate::config::EvaluationConfig;
use crate::dataset::{DatasetInfo, load_ground_truth};
use crate::error::{ConfigError, Error, ExportError, FrameError, GroundTruthError, Result};
use crate::evaluation::{self, OverallSummary, SequenceSummaries};
use crate::orchestrator::comparator::{CancelToken, StopReason, TrackerComparator};
use crate::tracker::FrameSource;

/// Outcome of one sequence of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceReport {
    pub name: String,
    /// `None` when the sequence could not be started
    pub stop_reason: Option<StopReason>,
    pub frames_processed: usize,
    pub summaries: SequenceSummaries,
}

/// Outcome of a whole run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub sequences: Vec<SequenceReport>,
    pub overall: OverallSummary,
    pub export_failures: Vec<ExportError>,
    pub cancelled: bool,
}

/// Evaluates the registered trackers over a list of sequences.
///
/// Sequences are independent: all per-sequence state is reset between them and
/// only the configuration carries over.
pub struct BenchmarkRunner {
    config: EvaluationConfig,
    comparator: TrackerComparator,
    output_dir: Option<PathBuf>,
    cancel: CancelToken,
}

impl BenchmarkRunner {
    /// Fails before any frame is read if the configuration is unusable.
    pub fn new(config: EvaluationConfig) -> std::result::Result<Self, ConfigError> {
        let resolved = config.resolve()?;
        Ok(Self {
            config,
            comparator: TrackerComparator::new(resolved),
            output_dir: None,
            cancel: CancelToken::new(),
        })
    }

    /// Write result files under `dir`, one sub-directory per sequence.
    pub fn with_output_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.output_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn comparator(&self) -> &TrackerComparator {
        &self.comparator
    }

    /// Register trackers through the comparator.
    pub fn comparator_mut(&mut self) -> &mut TrackerComparator {
        &mut self.comparator
    }

    /// Token that aborts the run between frames.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Evaluate every dataset in order.
    ///
    /// `frames_for` opens the frame source of a dataset; a failure there skips
    /// the sequence. A missing or unreadable ground truth aborts the run.
    pub fn run<F, S>(&mut self, datasets: &[DatasetInfo], mut frames_for: F) -> Result<RunReport>
    where
        F: FnMut(&DatasetInfo) -> std::result::Result<S, FrameError>,
        S: FrameSource,
    {
        if self.comparator.tracker_count() == 0 {
            return Err(Error::NoTrackers);
        }

        let mut report = RunReport::default();
        if let Some(dir) = &self.output_dir {
            let written = evaluation::ensure_dir(dir)
                .and_then(|dir| evaluation::write_yaml(dir.join("config.yaml"), &self.config));
            if let Err(e) = written {
                log::error!("{}", e);
                report.export_failures.push(e);
            }
        }

        for dataset in datasets {
            let gt_path = dataset
                .ground_truth_paths
                .first()
                .ok_or_else(|| GroundTruthError::Missing(dataset.name.clone()))?;
            let ground_truth = load_ground_truth(gt_path)?;

            log::info!("evaluating sequence {}", dataset.name);
            self.comparator.reset();

            let mut source = match frames_for(dataset) {
                Ok(source) => source,
                Err(e) => {
                    log::error!("skipping sequence {}: {}", dataset.name, e);
                    report.sequences.push(SequenceReport {
                        name: dataset.name.clone(),
                        stop_reason: None,
                        frames_processed: 0,
                        summaries: SequenceSummaries::new(),
                    });
                    continue;
                }
            };

            self.comparator.load_sequence(ground_truth);
            let stop_reason = match self.comparator.run(&mut source, &self.cancel) {
                Ok(reason) => Some(reason),
                Err(e) => {
                    log::error!("sequence {} failed to start: {}", dataset.name, e);
                    None
                }
            };

            if let (Some(dir), Some(_)) = (&self.output_dir, &stop_reason) {
                let failures = self.comparator.save_results(dir.join(&dataset.name));
                report.export_failures.extend(failures);
            }

            report.sequences.push(SequenceReport {
                name: dataset.name.clone(),
                stop_reason: stop_reason.clone(),
                frames_processed: self.comparator.frame_index(),
                summaries: self.comparator.summaries(),
            });
            self.comparator.reset();

            if stop_reason == Some(StopReason::Cancelled) {
                report.cancelled = true;
                break;
            }
        }

        report.overall = OverallSummary::from_sequences(
            report
                .sequences
                .iter()
                .filter(|s| s.stop_reason.is_some())
                .map(|s| &s.summaries),
        );
        if let Some(dir) = &self.output_dir {
            if let Err(e) = evaluation::write_yaml(dir.join("overall.yaml"), &report.overall) {
                log::error!("{}", e);
                report.export_failures.push(e);
            }
        }
        Ok(report)
    }
}
