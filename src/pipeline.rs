// SPDX-License-Identifier: GPL-3.0-or-later
use std::path::PathBuf;

use chrono::{DateTime, Local};
use tracing::instrument;

use crate::capture::CaptureOutput;
use crate::error::Result;
use crate::frame::FrameLoader;
use crate::logbook::Logbook;
use crate::settings::Settings;

/// Everything that happens to a capture after the camera is done with it.
#[derive(Clone, Debug)]
pub(crate) struct Pipeline {
    loader: FrameLoader,
    logbook: Logbook,
}

impl Pipeline {
    pub(crate) fn new(loader: FrameLoader, logbook: Logbook) -> Self {
        Self { loader, logbook }
    }

    /// Load the temperature dump from a capture and write its log, returning the log's path.
    ///
    /// The log is stamped with the local time the capture started.
    #[instrument(level = "debug", skip(self, capture), fields(temperatures = %capture.temperature_path.display()))]
    pub(crate) fn process(&self, capture: &CaptureOutput) -> Result<PathBuf> {
        let frame = self.loader.load(&capture.temperature_path)?;
        let taken = DateTime::<Local>::from(capture.started).naive_local();
        self.logbook.record(taken, &frame)
    }
}

impl From<&Settings> for Pipeline {
    fn from(settings: &Settings) -> Self {
        let logbook = Logbook::new(
            settings.test_name.clone(),
            &settings.log,
            settings.points.clone(),
            settings.extension_size,
            settings.units,
        );
        Self::new(FrameLoader::from(&settings.frame), logbook)
    }
}
