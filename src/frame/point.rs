// SPDX-License-Identifier: GPL-3.0-or-later
use std::fmt;

use serde::Deserialize;

/// A pixel location in a frame, counted from the top-left corner.
#[derive(Copy, Clone, Debug, Deserialize, PartialEq, Eq, Hash)]
pub(crate) struct Point {
    pub(crate) row: usize,
    pub(crate) column: usize,
}

impl Point {
    pub(crate) fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// `ndarray` index for this point.
    pub(crate) fn index(&self) -> [usize; 2] {
        [self.row, self.column]
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(row {}, column {})", self.row, self.column)
    }
}

/// A [`Point`] with a human-readable label, as given in the configuration.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub(crate) struct PointOfInterest {
    pub(crate) name: String,

    #[serde(flatten)]
    pub(crate) point: Point,
}
