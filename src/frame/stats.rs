// SPDX-License-Identifier: GPL-3.0-or-later
use itertools::{Itertools, MinMaxResult};
use ndarray::{ArrayBase, Data, Dimension};

/// Summary statistics of a set of temperatures.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct RegionStats {
    pub(crate) max: f32,
    pub(crate) min: f32,
    pub(crate) mean: f32,
}

impl RegionStats {
    /// Compute the statistics of an array of any shape. Empty arrays have no statistics.
    pub(crate) fn of<S, D>(temperatures: &ArrayBase<S, D>) -> Option<Self>
    where
        S: Data<Elem = f32>,
        D: Dimension,
    {
        let (min, max) = match temperatures
            .iter()
            .copied()
            .minmax_by(|lhs, rhs| lhs.total_cmp(rhs))
        {
            MinMaxResult::NoElements => return None,
            MinMaxResult::OneElement(value) => (value, value),
            MinMaxResult::MinMax(min, max) => (min, max),
        };
        let mean = temperatures.mean()?;
        Some(Self { max, min, mean })
    }
}
