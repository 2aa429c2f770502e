// SPDX-License-Identifier: GPL-3.0-or-later
use std::fmt;

use chrono::NaiveDateTime;
use tracing::trace;

use crate::error::Result;
use crate::frame::{Frame, Point, PointOfInterest, RegionStats};
use crate::temperature::TemperatureUnit;

/// Everything written about a single point of interest.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PointSummary {
    pub(crate) name: String,
    pub(crate) point: Point,
    pub(crate) temperature: f32,
    /// The size of the window the statistics were taken over, as (rows, columns).
    pub(crate) window: (usize, usize),
    pub(crate) stats: RegionStats,
}

impl PointSummary {
    pub(crate) fn new(
        frame: &Frame,
        point_of_interest: &PointOfInterest,
        extension_size: usize,
    ) -> Result<Self> {
        let point = point_of_interest.point;
        let temperature = frame.temperature_at(point)?;
        let region = frame.region(point, extension_size)?;
        trace!(
            name = %point_of_interest.name,
            origin = %region.origin(),
            window = ?region.dim(),
            "Extracted region"
        );
        Ok(Self {
            name: point_of_interest.name.clone(),
            point,
            temperature,
            window: region.dim(),
            stats: region.stats(),
        })
    }
}

/// The text written to a log file for a single frame.
#[derive(Debug)]
pub(crate) struct Report<'a> {
    taken: NaiveDateTime,
    extension_size: usize,
    units: TemperatureUnit,
    summaries: Vec<PointSummary>,
    frame: &'a Frame,
}

impl<'a> Report<'a> {
    pub(crate) fn new(
        taken: NaiveDateTime,
        frame: &'a Frame,
        points: &[PointOfInterest],
        extension_size: usize,
        units: TemperatureUnit,
    ) -> Result<Self> {
        let summaries = points
            .iter()
            .map(|point| PointSummary::new(frame, point, extension_size))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            taken,
            extension_size,
            units,
            summaries,
            frame,
        })
    }

    pub(crate) fn summaries(&self) -> &[PointSummary] {
        &self.summaries
    }

    fn write_summary(&self, f: &mut fmt::Formatter<'_>, summary: &PointSummary) -> fmt::Result {
        let units = self.units;
        let (rows, columns) = summary.window;
        writeln!(f, "[{}]", summary.name)?;
        writeln!(
            f,
            "The temperature at row {} column {} is {} degree {}",
            summary.point.row,
            summary.point.column,
            units.convert(summary.temperature),
            units
        )?;
        let regional = [
            ("maximum", summary.stats.max),
            ("minimum", summary.stats.min),
            ("average", summary.stats.mean),
        ];
        for (label, value) in &regional {
            writeln!(
                f,
                "The {} temperature throughout a {}x{} area surrounding given location is {} degree {}",
                label,
                rows,
                columns,
                units.convert(*value),
                units
            )?;
        }
        writeln!(f)
    }
}

impl<'a> fmt::Display for Report<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Date: {}", self.taken.format("%m/%d/%Y"))?;
        writeln!(f, "Time: {}", self.taken.format("%H:%M:%S"))?;
        writeln!(f, "Extension size: {}", self.extension_size)?;
        writeln!(f)?;
        for summary in &self.summaries {
            self.write_summary(f, summary)?;
        }
        write!(f, "Full temperature array:")?;
        for row in self.frame.view().outer_iter() {
            writeln!(f)?;
            for value in row.iter() {
                write!(f, "{}  ", self.units.convert(*value))?;
            }
        }
        writeln!(f)
    }
}
