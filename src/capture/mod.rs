// SPDX-License-Identifier: GPL-3.0-or-later
use std::path::PathBuf;
use std::time::SystemTime;

use async_trait::async_trait;

use crate::error::Result;

mod existing;
mod settings;
mod vendor;

pub(crate) use existing::ExistingDump;
pub(crate) use settings::CaptureSettings;
pub(crate) use vendor::VendorCapture;

/// The files produced by a single capture.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct CaptureOutput {
    /// When the capture was started.
    pub(crate) started: SystemTime,

    /// The temperature dump, one value per pixel in degrees Celsius.
    pub(crate) temperature_path: PathBuf,

    /// The false-color image, if the capture program wrote one.
    pub(crate) image_path: Option<PathBuf>,
}

/// Something that can take a thermal image.
#[async_trait]
pub(crate) trait Capturer {
    async fn capture(&self) -> Result<CaptureOutput>;
}
