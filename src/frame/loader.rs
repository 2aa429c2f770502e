// SPDX-License-Identifier: GPL-3.0-or-later
use std::fs;
use std::path::Path;

use ndarray::Array2;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::{Frame, COLUMNS, ROWS};
use crate::error::{Error, Result};

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub(crate) struct FrameSettings {
    /// Accept temperature dumps with the wrong number of values.
    ///
    /// Short dumps are filled by repeating the values from the start of the dump, and extra
    /// values are ignored.
    #[serde(default)]
    pub(crate) lenient: bool,
}

/// Parses temperature dumps written by the capture program.
///
/// A dump is a list of temperatures in degrees Celsius, separated by whitespace, in row-major
/// order.
#[derive(Clone, Debug)]
pub(crate) struct FrameLoader {
    rows: usize,
    columns: usize,
    lenient: bool,
}

impl Default for FrameLoader {
    fn default() -> Self {
        Self::new(ROWS, COLUMNS)
    }
}

impl From<&FrameSettings> for FrameLoader {
    fn from(settings: &FrameSettings) -> Self {
        Self::default().lenient(settings.lenient)
    }
}

impl FrameLoader {
    pub(crate) fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            lenient: false,
        }
    }

    pub(crate) fn lenient(self, lenient: bool) -> Self {
        Self { lenient, ..self }
    }

    fn pixel_count(&self) -> usize {
        self.rows * self.columns
    }

    #[instrument(level = "debug", skip(self, path), fields(path = %path.as_ref().display()))]
    pub(crate) fn load<P: AsRef<Path>>(&self, path: P) -> Result<Frame> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::FrameRead {
            path: path.to_owned(),
            source,
        })?;
        self.parse(&text)
    }

    pub(crate) fn parse(&self, text: &str) -> Result<Frame> {
        let values = text
            .split_whitespace()
            .enumerate()
            .map(|(index, token)| {
                token.parse::<f32>().map_err(|_| Error::MalformedToken {
                    index,
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<f32>>>()?;
        let expected = self.pixel_count();
        let found = values.len();
        debug!(found, expected, "Parsed temperature values");
        let values = if found == expected {
            values
        } else if found == 0 {
            return Err(Error::EmptyFrame);
        } else if self.lenient {
            if found < expected {
                warn!(
                    found,
                    expected, "Temperature dump is short, repeating values to fill the frame"
                );
            } else {
                warn!(found, expected, "Ignoring extra temperature values");
            }
            values.into_iter().cycle().take(expected).collect()
        } else {
            return Err(Error::FrameSize { expected, found });
        };
        let temperatures = Array2::from_shape_vec((self.rows, self.columns), values)
            .expect("value count was checked against the frame size");
        Ok(Frame::new(temperatures))
    }
}
