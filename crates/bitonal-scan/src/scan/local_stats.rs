// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Windowed local statistics on top of a summed-area table.

use super::integral::{SummedAreaTable, Window};

/// Mean intensity of the clamped square window of `radius` around
/// `(row, col)`.
///
/// Border windows are smaller than `(2 * radius + 1)^2` and the mean is taken
/// over the pixels actually covered, so edges are neither darkened nor
/// brightened. `(row, col)` must lie inside the table's plane.
pub fn local_mean(table: &SummedAreaTable, row: u32, col: u32, radius: u32) -> f64 {
    let window = Window::clamped(table.height(), table.width(), row, col, radius);
    table.window_sum(&window) as f64 / window.area() as f64
}

/// [`local_mean`] for every pixel, row-major.
///
/// Column bounds are the same for every row, so they are computed once and
/// each row only resolves its vertical extent before running the four-cell
/// lookup across the whole row.
pub fn local_mean_plane(table: &SummedAreaTable, radius: u32) -> Vec<f32> {
    let (width, height) = (table.width(), table.height());
    let columns: Vec<(u32, u32)> = (0..width)
        .map(|col| {
            let w = Window::clamped(1, width, 0, col, radius);
            (w.left, w.right + 1)
        })
        .collect();

    let mut means = Vec::with_capacity(width as usize * height as usize);
    for row in 0..height {
        let rows = Window::clamped(height, 1, row, 0, radius);
        let (top, bottom) = (rows.top, rows.bottom + 1);
        let span = (bottom - top) as u64;
        means.extend(columns.iter().map(|&(left, right)| {
            let sum = table.at(bottom, right) + table.at(top, left)
                - table.at(top, right)
                - table.at(bottom, left);
            (sum as f64 / (span * (right - left) as u64) as f64) as f32
        }));
    }
    means
}
