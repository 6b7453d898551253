//! Ground-truth text parsers.
//!
//! Two formats are recognized by the field count of the first row:
//! - pixel rows `x,y,w,h` (commas, tabs or spaces), one per frame
//! - normalized rows `frame,cx,cy,w,h,occluded`, where a row holding only
//!   `frame` marks that frame as unannotated

use std::fs;
use std::path::Path;

use crate::dataset::annotation::{Annotation, Coordinates, GroundTruth};
use crate::error::GroundTruthError;
use crate::tracker::Rect;

const PIXEL_FIELDS: usize = 4;
const NORMALIZED_FIELDS: usize = 6;
/// Frame indices may skip rows, but not beyond this multiple of the row count.
const MAX_INDEX_PER_ROW: usize = 64;

/// Read and parse a ground-truth file.
pub fn load_ground_truth<P: AsRef<Path>>(path: P) -> Result<GroundTruth, GroundTruthError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| GroundTruthError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let ground_truth = parse_ground_truth(&content)?;
    log::info!(
        "loaded {} ground truth frames ({} annotated) from {}",
        ground_truth.len(),
        ground_truth.annotated_frames(),
        path.display()
    );
    Ok(ground_truth)
}

/// Parse ground truth in either supported format.
pub fn parse_ground_truth(content: &str) -> Result<GroundTruth, GroundTruthError> {
    let rows: Vec<(usize, Vec<&str>)> = content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, split_fields(line)))
        .filter(|(_, fields)| !fields.is_empty())
        .collect();

    let Some((_, first)) = rows.first() else {
        return Err(GroundTruthError::Empty);
    };

    match first.len() {
        PIXEL_FIELDS => parse_pixel_rows(&rows),
        1 | NORMALIZED_FIELDS => parse_normalized_rows(&rows),
        n => Err(GroundTruthError::MalformedRow {
            line: rows[0].0,
            message: format!("unrecognized format with {} fields", n),
        }),
    }
}

fn split_fields(line: &str) -> Vec<&str> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|f| !f.is_empty())
        .collect()
}

fn parse_number(line: usize, field: &str) -> Result<f64, GroundTruthError> {
    field.parse().map_err(|_| GroundTruthError::MalformedRow {
        line,
        message: format!("'{}' is not a number", field),
    })
}

fn parse_pixel_rows(rows: &[(usize, Vec<&str>)]) -> Result<GroundTruth, GroundTruthError> {
    let mut rects = Vec::with_capacity(rows.len());
    for (line, fields) in rows {
        if fields.len() != PIXEL_FIELDS {
            return Err(GroundTruthError::MalformedRow {
                line: *line,
                message: format!("expected {} fields, got {}", PIXEL_FIELDS, fields.len()),
            });
        }
        let x = parse_number(*line, fields[0])?;
        let y = parse_number(*line, fields[1])?;
        let w = parse_number(*line, fields[2])?;
        let h = parse_number(*line, fields[3])?;
        rects.push(Rect::new(x, y, w, h));
    }
    Ok(GroundTruth::from_rects(rects))
}

fn parse_normalized_rows(rows: &[(usize, Vec<&str>)]) -> Result<GroundTruth, GroundTruthError> {
    let mut entries: Vec<Option<Annotation>> = Vec::with_capacity(rows.len());
    let mut seen: Vec<bool> = Vec::with_capacity(rows.len());
    let index_limit = rows.len().saturating_mul(MAX_INDEX_PER_ROW);

    for (line, fields) in rows {
        let line = *line;
        if fields.len() != 1 && fields.len() != NORMALIZED_FIELDS {
            return Err(GroundTruthError::MalformedRow {
                line,
                message: format!(
                    "expected 1 or {} fields, got {}",
                    NORMALIZED_FIELDS,
                    fields.len()
                ),
            });
        }

        let frame_index: usize = fields[0].parse().map_err(|_| GroundTruthError::MalformedRow {
            line,
            message: format!("'{}' is not a frame index", fields[0]),
        })?;
        if frame_index >= index_limit {
            return Err(GroundTruthError::MalformedRow {
                line,
                message: format!(
                    "frame index {} out of range for {} rows",
                    frame_index,
                    rows.len()
                ),
            });
        }
        if frame_index >= entries.len() {
            entries.resize(frame_index + 1, None);
            seen.resize(frame_index + 1, false);
        }
        if seen[frame_index] {
            return Err(GroundTruthError::MalformedRow {
                line,
                message: format!("duplicate frame {}", frame_index),
            });
        }
        seen[frame_index] = true;

        if fields.len() == 1 {
            continue;
        }

        let cx = parse_number(line, fields[1])?;
        let cy = parse_number(line, fields[2])?;
        let w = parse_number(line, fields[3])?;
        let h = parse_number(line, fields[4])?;
        let occluded = match fields[5] {
            "0" => Some(false),
            "1" => Some(true),
            _ => None,
        };

        entries[frame_index] = Some(Annotation {
            rect: Rect::new(cx, cy, w, h),
            frame_index,
            occluded,
        });
    }

    Ok(GroundTruth::new(entries, Coordinates::Normalized))
}
