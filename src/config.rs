//! Run configuration.
//!
//! Loaded from YAML, e.g.
//! ```yaml
//! reinit_strategy: immediate
//! overlap_threshold: 0.4
//! center_error_threshold: 0.2
//! score_thresholds:
//!   VIT: 0.3
//!   DaSiam: 0.9
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How a tracker is recovered after an invalid frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReinitStrategy {
    /// Reinitialize at the current ground truth as soon as it is unoccluded.
    Immediate,
    /// Reinitialize once the tracker stayed invalid for `delay_frames` frames in a row.
    Delayed { delay_frames: u32 },
    /// Never reinitialize; disable the tracker on its first failure.
    OneInit,
}

impl ReinitStrategy {
    /// Parse a strategy name. `delayed` needs `delay_frames >= 1`.
    pub fn parse(name: &str, delay_frames: Option<u32>) -> Result<Self, ConfigError> {
        match name.trim() {
            "immediate" => Ok(ReinitStrategy::Immediate),
            "one_init" => Ok(ReinitStrategy::OneInit),
            "delayed" => match delay_frames {
                Some(delay_frames) if delay_frames >= 1 => {
                    Ok(ReinitStrategy::Delayed { delay_frames })
                }
                _ => Err(ConfigError::MissingDelayFrames),
            },
            other => Err(ConfigError::UnknownStrategy(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReinitStrategy::Immediate => "immediate",
            ReinitStrategy::Delayed { .. } => "delayed",
            ReinitStrategy::OneInit => "one_init",
        }
    }
}

impl fmt::Display for ReinitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thresholds deciding whether a frame is valid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidityThresholds {
    /// Minimum IoU
    pub overlap: f64,
    /// Maximum center error as a fraction of the ground-truth diagonal
    pub center_error: f64,
}

impl Default for ValidityThresholds {
    fn default() -> Self {
        Self {
            overlap: 0.4,
            center_error: 0.2,
        }
    }
}

/// Configuration as written on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// `immediate`, `delayed` or `one_init`
    pub reinit_strategy: Option<String>,
    /// Consecutive invalid frames before a `delayed` reinit
    pub delay_frames: Option<u32>,
    pub overlap_threshold: f64,
    pub center_error_threshold: f64,
    /// Confidence threshold per tracker name
    pub score_thresholds: BTreeMap<String, f64>,
    /// Cosmetic per-frame pacing budget
    pub frame_interval_ms: Option<u64>,
    /// Update trackers of a frame on a thread pool
    pub parallel: bool,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        let thresholds = ValidityThresholds::default();
        Self {
            reinit_strategy: None,
            delay_frames: None,
            overlap_threshold: thresholds.overlap,
            center_error_threshold: thresholds.center_error,
            score_thresholds: BTreeMap::new(),
            frame_interval_ms: None,
            parallel: false,
        }
    }
}

impl EvaluationConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_yaml_str(&content)
    }

    /// Validate and resolve into the form handed to the comparator.
    ///
    /// An unrecognized strategy is logged and resolves to "never reinitialize".
    /// Invalid thresholds and a `delayed` strategy without `delay_frames` are
    /// hard errors.
    pub fn resolve(&self) -> Result<ResolvedConfig, ConfigError> {
        if !(0.0..=1.0).contains(&self.overlap_threshold) {
            return Err(ConfigError::InvalidThreshold {
                name: "overlap_threshold",
                value: self.overlap_threshold,
            });
        }
        if self.center_error_threshold.is_nan() || self.center_error_threshold < 0.0 {
            return Err(ConfigError::InvalidThreshold {
                name: "center_error_threshold",
                value: self.center_error_threshold,
            });
        }
        if let Some((_, &value)) = self
            .score_thresholds
            .iter()
            .find(|(_, value)| !value.is_finite())
        {
            return Err(ConfigError::InvalidThreshold {
                name: "score_thresholds",
                value,
            });
        }

        let strategy = match self.reinit_strategy.as_deref() {
            None => {
                log::info!("no reinit strategy configured, trackers are never reinitialized");
                None
            }
            Some(name) => match ReinitStrategy::parse(name, self.delay_frames) {
                Ok(strategy) => Some(strategy),
                Err(e @ ConfigError::UnknownStrategy(_)) => {
                    log::error!("{}; trackers are never reinitialized", e);
                    None
                }
                Err(e) => return Err(e),
            },
        };

        Ok(ResolvedConfig {
            strategy,
            thresholds: ValidityThresholds {
                overlap: self.overlap_threshold,
                center_error: self.center_error_threshold,
            },
            score_thresholds: self.score_thresholds.clone(),
            frame_interval: self.frame_interval_ms.map(Duration::from_millis),
            parallel: self.parallel,
        })
    }
}

/// Validated configuration shared by every sequence of a run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedConfig {
    /// `None` means trackers are never reinitialized
    pub strategy: Option<ReinitStrategy>,
    pub thresholds: ValidityThresholds,
    pub score_thresholds: BTreeMap<String, f64>,
    pub frame_interval: Option<Duration>,
    pub parallel: bool,
}

impl ResolvedConfig {
    pub fn with_strategy(strategy: ReinitStrategy) -> Self {
        Self {
            strategy: Some(strategy),
            ..Default::default()
        }
    }

    pub fn score_threshold(&self, tracker_name: &str) -> Option<f64> {
        self.score_thresholds.get(tracker_name).copied()
    }
}
