// SPDX-License-Identifier: GPL-3.0-or-later
use ndarray::{Array2, ArrayView2};

use crate::error::{Error, Result};

mod loader;
mod point;
mod region;
mod stats;

pub(crate) use loader::{FrameLoader, FrameSettings};
pub(crate) use point::{Point, PointOfInterest};
pub(crate) use region::Region;
pub(crate) use stats::RegionStats;

/// Number of rows in a Lepton 3 frame.
pub(crate) const ROWS: usize = 120;
/// Number of columns in a Lepton 3 frame.
pub(crate) const COLUMNS: usize = 160;

/// A grid of temperatures in degrees Celsius.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Frame {
    temperatures: Array2<f32>,
}

impl Frame {
    pub(crate) fn new(temperatures: Array2<f32>) -> Self {
        Self { temperatures }
    }

    pub(crate) fn rows(&self) -> usize {
        self.temperatures.nrows()
    }

    pub(crate) fn columns(&self) -> usize {
        self.temperatures.ncols()
    }

    pub(crate) fn view(&self) -> ArrayView2<'_, f32> {
        self.temperatures.view()
    }

    pub(crate) fn contains(&self, point: Point) -> bool {
        point.row < self.rows() && point.column < self.columns()
    }

    fn check_bounds(&self, point: Point) -> Result<()> {
        if self.contains(point) {
            Ok(())
        } else {
            Err(Error::PointOutOfBounds {
                point,
                rows: self.rows(),
                columns: self.columns(),
            })
        }
    }

    /// The temperature at a single pixel.
    pub(crate) fn temperature_at(&self, point: Point) -> Result<f32> {
        self.check_bounds(point)?;
        Ok(self.temperatures[point.index()])
    }

    /// Extract the window extending `margin` pixels in every direction from `center`.
    ///
    /// Each side of the window is clamped independently at the frame edges, so a window near a
    /// corner is smaller than `2 * margin + 1` only on the sides that would fall off the frame.
    pub(crate) fn region(&self, center: Point, margin: usize) -> Result<Region<'_>> {
        self.check_bounds(center)?;
        Ok(Region::around(self.view(), center, margin))
    }
}
