// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Summed-area table (integral image) over a single plane.

use bitonal_core::error::{BitonalError, Result};
use image::GrayImage;

/// Inclusive, in-bounds pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub top: u32,
    pub left: u32,
    pub bottom: u32,
    pub right: u32,
}

impl Window {
    /// Square window of `radius` around `(row, col)`, clamped to a
    /// `height x width` plane. Near the border the window shrinks instead of
    /// reading padding.
    pub fn clamped(height: u32, width: u32, row: u32, col: u32, radius: u32) -> Self {
        Self {
            top: row.saturating_sub(radius),
            left: col.saturating_sub(radius),
            bottom: row.saturating_add(radius).min(height - 1),
            right: col.saturating_add(radius).min(width - 1),
        }
    }

    /// Number of pixels covered. Always at least 1.
    pub fn area(&self) -> u64 {
        (self.bottom - self.top + 1) as u64 * (self.right - self.left + 1) as u64
    }
}

/// Prefix-sum table of size `(height + 1) x (width + 1)`.
///
/// Cell `(i + 1, j + 1)` holds the sum of all samples in rows `0..=i` and
/// columns `0..=j`; row 0 and column 0 are zero.
#[derive(Debug, Clone)]
pub struct SummedAreaTable {
    width: u32,
    height: u32,
    stride: usize,
    table: Vec<u64>,
}

impl SummedAreaTable {
    /// Build the table for a grayscale plane.
    pub fn build(gray: &GrayImage) -> Result<Self> {
        let (width, height) = gray.dimensions();
        if width == 0 || height == 0 {
            return Err(BitonalError::invalid(
                "cannot build a summed-area table over an empty plane",
            ));
        }
        let raw = gray.as_raw();
        let w = width as usize;
        let mut sat = Self::zeroed(width, height);
        sat.fill(|x, y| raw[y as usize * w + x as usize] as u64);
        Ok(sat)
    }

    /// All-zero table for a non-empty `width x height` plane, to be filled
    /// with [`SummedAreaTable::fill`].
    pub(crate) fn zeroed(width: u32, height: u32) -> Self {
        let stride = width as usize + 1;
        Self {
            width,
            height,
            stride,
            table: vec![0; stride * (height as usize + 1)],
        }
    }

    /// Rebuild the table from per-pixel samples.
    ///
    /// Two passes: a running sum along each row, then a running sum down
    /// each column.
    pub(crate) fn fill(&mut self, mut sample: impl FnMut(u32, u32) -> u64) {
        let stride = self.stride;
        for y in 0..self.height {
            let row = (y as usize + 1) * stride;
            let mut run = 0u64;
            for x in 0..self.width {
                run += sample(x, y);
                self.table[row + x as usize + 1] = run;
            }
        }
        for y in 1..self.height as usize {
            let (above, below) = self.table.split_at_mut((y + 1) * stride);
            let prev = &above[y * stride..];
            for (cell, up) in below[..stride].iter_mut().zip(prev).skip(1) {
                *cell += *up;
            }
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw table cell; `row <= height`, `col <= width`.
    pub fn at(&self, row: u32, col: u32) -> u64 {
        self.table[row as usize * self.stride + col as usize]
    }

    /// Sum of the samples inside `window`, in O(1).
    pub fn window_sum(&self, window: &Window) -> u64 {
        let (t, l) = (window.top, window.left);
        let (b, r) = (window.bottom + 1, window.right + 1);
        self.at(b, r) + self.at(t, l) - self.at(t, r) - self.at(b, l)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn ramp(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| Luma([(x * 7 + y * 13) as u8]))
    }

    #[test]
    fn cells_are_inclusive_prefix_sums() {
        let gray = ramp(5, 4);
        let sat = SummedAreaTable::build(&gray).unwrap();
        for i in 0..4 {
            for j in 0..5 {
                let mut expected = 0u64;
                for y in 0..=i {
                    for x in 0..=j {
                        expected += gray.get_pixel(x, y).0[0] as u64;
                    }
                }
                assert_eq!(sat.at(i + 1, j + 1), expected, "cell ({}, {})", i + 1, j + 1);
            }
        }
        assert_eq!(sat.at(0, 3), 0);
        assert_eq!(sat.at(2, 0), 0);
    }

    #[test]
    fn window_sum_matches_brute_force() {
        let gray = ramp(9, 7);
        let sat = SummedAreaTable::build(&gray).unwrap();
        let window = Window {
            top: 2,
            left: 1,
            bottom: 5,
            right: 6,
        };
        let brute: u64 = (2..=5)
            .flat_map(|y| (1..=6).map(move |x| (x, y)))
            .map(|(x, y)| gray.get_pixel(x, y).0[0] as u64)
            .sum();
        assert_eq!(sat.window_sum(&window), brute);
    }

    #[test]
    fn empty_plane_is_rejected() {
        assert!(SummedAreaTable::build(&GrayImage::new(0, 3)).is_err());
    }

    #[test]
    fn clamped_window_shrinks_at_corners() {
        let w = Window::clamped(10, 8, 0, 7, 3);
        assert_eq!((w.top, w.left, w.bottom, w.right), (0, 4, 3, 7));
        assert_eq!(w.area(), 16);
        let single = Window::clamped(1, 1, 0, 0, 50);
        assert_eq!(single.area(), 1);
    }
}
