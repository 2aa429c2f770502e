// SPDX-License-Identifier: GPL-3.0-or-later
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::frame::Point;

#[derive(Debug, Error)]
pub(crate) enum Error {
    #[error("Unable to start capture program {program:?}")]
    CaptureSpawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Capture program exited with {status}: {stderr}")]
    CaptureFailed { status: ExitStatus, stderr: String },

    #[error("No temperature file ending in .{extension} was written to {directory:?}")]
    CaptureOutputMissing {
        directory: PathBuf,
        extension: String,
    },

    #[error("Unable to look for capture output in {directory:?}")]
    CaptureOutputScan {
        directory: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unable to read temperature data from {path:?}")]
    FrameRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Temperature value {index} is not a number: {token:?}")]
    MalformedToken { index: usize, token: String },

    #[error("Expected {expected} temperature values, found {found}")]
    FrameSize { expected: usize, found: usize },

    #[error("Temperature data is empty")]
    EmptyFrame,

    #[error("{point} is outside of a {rows}x{columns} frame")]
    PointOutOfBounds {
        point: Point,
        rows: usize,
        columns: usize,
    },

    #[error("Unable to write log file {path:?}")]
    LogWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("GPIO error")]
    Gpio(#[from] gpio_cdev::Error),
}

pub(crate) type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use super::Error;
    use crate::frame::Point;

    #[test]
    fn size_message() {
        let err = Error::FrameSize {
            expected: 19200,
            found: 12,
        };
        assert_eq!(err.to_string(), "Expected 19200 temperature values, found 12");
    }

    #[test]
    fn out_of_bounds_message() {
        let err = Error::PointOutOfBounds {
            point: Point::new(120, 3),
            rows: 120,
            columns: 160,
        };
        assert_eq!(
            err.to_string(),
            "(row 120, column 3) is outside of a 120x160 frame"
        );
    }

    #[test]
    fn log_write_has_source() {
        use std::error::Error as _;
        let err = Error::LogWrite {
            path: PathBuf::from("/nonexistent"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(err.source().is_some());
    }
}
