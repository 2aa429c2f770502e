// SPDX-License-Identifier: GPL-3.0-or-later
use std::path::PathBuf;

use crate::capture::Capturer;
use crate::error::Result;
use crate::pipeline::Pipeline;

/// Take one capture and log it, returning the path of the log file.
pub(crate) async fn capture_once<C>(capturer: &C, pipeline: &Pipeline) -> Result<PathBuf>
where
    C: Capturer + ?Sized,
{
    let capture = capturer.capture().await?;
    pipeline.process(&capture)
}
