//! Dataset directory discovery.
//!
//! An instance directory holds either a video (`*.mp4`, custom datasets) or an
//! `img/` directory of frames (OTB layout), plus `*.txt` ground-truth files.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatasetType {
    /// Video file
    Custom,
    /// Directory of images
    Otb,
    #[default]
    Unknown,
}

/// One sequence found on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetInfo {
    pub name: String,
    pub media_path: PathBuf,
    pub dataset_type: DatasetType,
    pub ground_truth_paths: Vec<PathBuf>,
}

impl DatasetInfo {
    pub fn is_instance(&self) -> bool {
        self.dataset_type != DatasetType::Unknown
    }
}

impl fmt::Display for DatasetInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Media Path: {}", self.media_path.display())?;
        writeln!(f, "Dataset Type: {:?}", self.dataset_type)?;
        writeln!(f, "Ground Truth Paths:")?;
        for path in &self.ground_truth_paths {
            writeln!(f, "  - {}", path.display())?;
        }
        Ok(())
    }
}

/// Inspect one instance directory.
///
/// Anything that is not a readable directory yields an `Unknown` info.
pub fn dataset_info<P: AsRef<Path>>(path: P) -> DatasetInfo {
    let path = path.as_ref();
    let mut info = DatasetInfo {
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        ..Default::default()
    };

    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("{} is not a readable directory: {}", path.display(), e);
            return info;
        }
    };

    for entry in entries.flatten() {
        let entry_path = entry.path();
        let extension = entry_path.extension().and_then(|e| e.to_str());
        if entry_path.is_file() && extension == Some("mp4") {
            info.media_path = entry_path;
            info.dataset_type = DatasetType::Custom;
        } else if entry_path.is_dir() && entry.file_name() == "img" {
            info.media_path = entry_path;
            info.dataset_type = DatasetType::Otb;
        } else if entry_path.is_file() && extension == Some("txt") {
            info.ground_truth_paths.push(entry_path);
        }
    }
    info.ground_truth_paths.sort();
    info
}

/// Find every sequence under `root`.
///
/// `root` itself is returned when it is an instance; otherwise each instance
/// sub-directory, sorted by name.
pub fn load_dataset_infos<P: AsRef<Path>>(root: P) -> Vec<DatasetInfo> {
    let root = root.as_ref();
    if !root.is_dir() {
        log::warn!("{} is not a directory", root.display());
        return Vec::new();
    }

    let info = dataset_info(root);
    if info.is_instance() {
        return vec![info];
    }

    let mut infos: Vec<DatasetInfo> = match fs::read_dir(root) {
        Ok(entries) => entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .map(dataset_info)
            .filter(DatasetInfo::is_instance)
            .collect(),
        Err(e) => {
            log::warn!("failed to list {}: {}", root.display(), e);
            Vec::new()
        }
    };
    infos.sort_by(|a, b| a.name.cmp(&b.name));
    for info in &infos {
        log::debug!("found dataset instance\n{}", info);
    }
    infos
}
