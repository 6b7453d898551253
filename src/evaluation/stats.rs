//! Sample statistics over evaluation values.

use ndarray::{Array2, Axis, aview1};

/// Arithmetic mean, 0 for an empty sample.
pub fn mean(values: &[f64]) -> f64 {
    aview1(values).mean().unwrap_or(0.0)
}

/// Sample standard deviation (divides by N-1), 0 for fewer than two samples.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    aview1(values).std(1.0)
}

/// Column means of a row-major table, zeros for an empty table.
pub fn column_means(rows: &[Vec<f64>], columns: usize) -> Vec<f64> {
    if rows.is_empty() {
        return vec![0.0; columns];
    }
    let mut table = Array2::<f64>::zeros((rows.len(), columns));
    for (i, row) in rows.iter().enumerate() {
        for (j, value) in row.iter().take(columns).enumerate() {
            table[[i, j]] = *value;
        }
    }
    table
        .mean_axis(Axis(0))
        .map(|means| means.to_vec())
        .unwrap_or_else(|| vec![0.0; columns])
}
