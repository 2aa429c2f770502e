// SPDX-License-Identifier: GPL-3.0-or-later
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use serde_with::{formats::Flexible, serde_as, DurationSecondsWithFrac};

fn default_program() -> PathBuf {
    PathBuf::from("./raspberrypi_video")
}

fn default_sudo() -> bool {
    true
}

fn default_working_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_temperature_extension() -> String {
    "txt".to_string()
}

fn default_image_extension() -> String {
    "png".to_string()
}

fn default_settle_delay() -> Duration {
    Duration::from_secs(2)
}

/// How to run the vendor capture program, and where to find what it writes.
#[serde_as]
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub(crate) struct CaptureSettings {
    #[serde(default = "default_program")]
    pub(crate) program: PathBuf,

    #[serde(default)]
    pub(crate) args: Vec<String>,

    /// Run the capture program with `sudo`. The SPI device usually needs root.
    #[serde(default = "default_sudo")]
    pub(crate) sudo: bool,

    #[serde(default = "default_working_directory")]
    pub(crate) working_directory: PathBuf,

    /// Where the capture program writes its files. Defaults to `working_directory`.
    #[serde(default)]
    output_directory: Option<PathBuf>,

    #[serde(default = "default_temperature_extension")]
    pub(crate) temperature_extension: String,

    #[serde(default = "default_image_extension")]
    pub(crate) image_extension: String,

    /// How long to wait after the capture program exits before looking for its output.
    #[serde_as(as = "DurationSecondsWithFrac<f64, Flexible>")]
    #[serde(default = "default_settle_delay")]
    pub(crate) settle_delay: Duration,
}

impl CaptureSettings {
    pub(crate) fn output_directory(&self) -> &Path {
        self.output_directory
            .as_deref()
            .unwrap_or(&self.working_directory)
    }
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: Vec::new(),
            sudo: default_sudo(),
            working_directory: default_working_directory(),
            output_directory: None,
            temperature_extension: default_temperature_extension(),
            image_extension: default_image_extension(),
            settle_delay: default_settle_delay(),
        }
    }
}
