// SPDX-License-Identifier: GPL-3.0-or-later
use std::fs;
use std::path::Path;

use anyhow::Context as _;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

mod cli;

use crate::capture::CaptureSettings;
use crate::frame::{FrameSettings, PointOfInterest, COLUMNS, ROWS};
use crate::gpio::SwitchSettings;
use crate::logbook::{LogSettings, TestName};
use crate::temperature::TemperatureUnit;
pub(crate) use cli::{Args, Command};

fn default_extension_size() -> usize {
    3
}

/// Points of interest have to be inside the frame, and are checked as soon as they're parsed.
fn deserialize_points<'de, D>(deserializer: D) -> Result<Vec<PointOfInterest>, D::Error>
where
    D: Deserializer<'de>,
{
    let points = Vec::<PointOfInterest>::deserialize(deserializer)?;
    for point_of_interest in &points {
        let point = point_of_interest.point;
        if point.row >= ROWS || point.column >= COLUMNS {
            return Err(D::Error::custom(format!(
                "point of interest {:?} at {} is outside of a {}x{} frame",
                point_of_interest.name, point, ROWS, COLUMNS
            )));
        }
    }
    Ok(points)
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub(crate) struct Settings {
    /// Log files are written to a directory with this name.
    pub(crate) test_name: TestName,

    /// How far the statistics window extends from each point of interest.
    #[serde(default = "default_extension_size")]
    pub(crate) extension_size: usize,

    /// The unit temperatures are logged in.
    #[serde(default)]
    pub(crate) units: TemperatureUnit,

    /// The locations temperatures are logged for, in the order they are logged.
    #[serde(default, deserialize_with = "deserialize_points")]
    pub(crate) points: Vec<PointOfInterest>,

    #[serde(default)]
    pub(crate) frame: FrameSettings,

    /// Settings for running the vendor capture program.
    #[serde(default)]
    pub(crate) capture: CaptureSettings,

    /// Button and LED settings, only used by `watch`.
    #[serde(default)]
    pub(crate) switch: SwitchSettings,

    #[serde(default)]
    pub(crate) log: LogSettings,
}

impl Settings {
    pub(crate) fn load(path: &Path) -> anyhow::Result<Self> {
        let config_data = fs::read_to_string(path)
            .with_context(|| format!("Unable to read configuration file {}", path.display()))?;
        toml::from_str(&config_data)
            .with_context(|| format!("Invalid configuration file {}", path.display()))
    }
}
