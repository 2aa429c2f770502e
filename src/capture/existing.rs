// SPDX-License-Identifier: GPL-3.0-or-later
use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;

use async_trait::async_trait;

use super::{CaptureOutput, Capturer};
use crate::error::{Error, Result};

/// A temperature dump that has already been captured, for processing captures after the fact.
#[derive(Clone, Debug)]
pub(crate) struct ExistingDump {
    path: PathBuf,
}

impl ExistingDump {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl Capturer for ExistingDump {
    async fn capture(&self) -> Result<CaptureOutput> {
        let metadata = fs::metadata(&self.path).map_err(|source| Error::FrameRead {
            path: self.path.clone(),
            source,
        })?;
        let started = metadata.modified().unwrap_or_else(|_| SystemTime::now());
        Ok(CaptureOutput {
            started,
            temperature_path: self.path.clone(),
            image_path: None,
        })
    }
}
