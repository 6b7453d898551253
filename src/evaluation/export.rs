//! Result files: per-tracker CSV tables and YAML summaries.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::ExportError;
use crate::evaluation::frame_result::FrameResult;

/// File name of a tracker's per-frame table inside a sequence directory.
pub fn results_file_name(tracker_name: &str) -> String {
    format!("{}_results.csv", tracker_name)
}

/// Write a per-frame table with columns
/// `frame,overlap,center_error,processing_time,bbox_area,valid`.
pub fn write_frame_results<P: AsRef<Path>>(
    path: P,
    results: &[FrameResult],
) -> Result<(), ExportError> {
    let path = path.as_ref();
    let csv_err = |source| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    if results.is_empty() {
        writer
            .write_record([
                "frame",
                "overlap",
                "center_error",
                "processing_time",
                "bbox_area",
                "valid",
            ])
            .map_err(csv_err)?;
    }
    for result in results {
        writer.serialize(result).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize `value` as YAML into `path`.
pub fn write_yaml<P: AsRef<Path>, T: Serialize + ?Sized>(
    path: P,
    value: &T,
) -> Result<(), ExportError> {
    let path = path.as_ref();
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_yaml::to_writer(&mut writer, value).map_err(|source| ExportError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(io_err)
}

/// Create (if needed) and return a directory.
pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<PathBuf, ExportError> {
    let path = path.as_ref();
    fs::create_dir_all(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(path.to_path_buf())
}

/// Create `base/<YYYY-mm-dd_HH-MM-SS>` for a new run.
pub fn create_run_directory<P: AsRef<Path>>(base: P) -> Result<PathBuf, ExportError> {
    let stamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
    ensure_dir(base.as_ref().join(stamp))
}
