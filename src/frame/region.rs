// SPDX-License-Identifier: GPL-3.0-or-later
use ndarray::{s, ArrayView2};

use super::{Point, RegionStats};

/// A rectangular window of a frame, centered (as much as the frame edges allow) on a point.
#[derive(Clone, Debug)]
pub(crate) struct Region<'a> {
    /// The top-left corner of the window.
    origin: Point,
    view: ArrayView2<'a, f32>,
}

impl<'a> Region<'a> {
    /// `center` must lie inside `frame`.
    pub(super) fn around(frame: ArrayView2<'a, f32>, center: Point, margin: usize) -> Self {
        let (rows, columns) = frame.dim();
        debug_assert!(center.row < rows && center.column < columns);
        let up = margin.min(center.row);
        let down = margin.min(rows - 1 - center.row);
        let left = margin.min(center.column);
        let right = margin.min(columns - 1 - center.column);
        let top = center.row - up;
        let bottom = center.row + down;
        let first_column = center.column - left;
        let last_column = center.column + right;
        let view = frame.slice_move(s![top..=bottom, first_column..=last_column]);
        Self {
            origin: Point::new(top, first_column),
            view,
        }
    }

    pub(crate) fn origin(&self) -> Point {
        self.origin
    }

    /// The size of the window, as (rows, columns).
    pub(crate) fn dim(&self) -> (usize, usize) {
        self.view.dim()
    }

    pub(crate) fn view(&self) -> &ArrayView2<'a, f32> {
        &self.view
    }

    pub(crate) fn stats(&self) -> RegionStats {
        RegionStats::of(self.view()).expect("regions always contain their center")
    }
}
