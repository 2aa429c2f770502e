// SPDX-License-Identifier: GPL-3.0-or-later
use std::convert::TryFrom;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Component, Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::error::{Error, Result};
use crate::frame::{Frame, PointOfInterest};
use crate::temperature::TemperatureUnit;

mod report;

use report::Report;

/// The name of a test run. Log files are grouped into a directory with this name.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(try_from = "String")]
pub(crate) struct TestName(String);

impl TryFrom<String> for TestName {
    type Error = &'static str;

    fn try_from(name: String) -> std::result::Result<Self, Self::Error> {
        if name.chars().any(std::path::is_separator) {
            return Err("test name cannot contain path separators");
        }
        let mut components = Path::new(&name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(Self(name)),
            (None, _) => Err("test name cannot be empty"),
            _ => Err("test name must be usable as a single directory name"),
        }
    }
}

impl fmt::Display for TestName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub(crate) struct LogSettings {
    /// The directory the per-test directories are created in.
    #[serde(default = "default_directory")]
    pub(crate) directory: PathBuf,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            directory: default_directory(),
        }
    }
}

/// Writes a numbered log file for every frame it is given.
#[derive(Clone, Debug)]
pub(crate) struct Logbook {
    test_name: TestName,
    directory: PathBuf,
    points: Vec<PointOfInterest>,
    extension_size: usize,
    units: TemperatureUnit,
}

impl Logbook {
    pub(crate) fn new(
        test_name: TestName,
        settings: &LogSettings,
        points: Vec<PointOfInterest>,
        extension_size: usize,
        units: TemperatureUnit,
    ) -> Self {
        let directory = settings.directory.join(&test_name.0);
        Self {
            test_name,
            directory,
            points,
            extension_size,
            units,
        }
    }

    /// The directory log files are written to.
    pub(crate) fn directory(&self) -> &Path {
        &self.directory
    }

    fn file_name(&self, number: u32) -> String {
        format!("{}Lepton{}.txt", self.test_name, number)
    }

    /// Create the next unused log file, starting from `<test name>Lepton1.txt`.
    fn create_next(&self) -> Result<(PathBuf, File)> {
        let directory = self.directory();
        fs::create_dir_all(directory).map_err(|source| Error::LogWrite {
            path: directory.to_owned(),
            source,
        })?;
        let mut number = 1;
        loop {
            let path = directory.join(self.file_name(number));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                    debug!(path = %path.display(), "Log file already exists");
                    number += 1;
                }
                Err(source) => return Err(Error::LogWrite { path, source }),
            }
        }
    }

    /// Write the log for a frame taken at `taken`, returning the path of the new log file.
    #[instrument(level = "debug", skip(self, frame))]
    pub(crate) fn record(&self, taken: NaiveDateTime, frame: &Frame) -> Result<PathBuf> {
        // Build the report first so a bad point doesn't leave an empty log file behind.
        let report = Report::new(
            taken,
            frame,
            &self.points,
            self.extension_size,
            self.units,
        )?;
        let (path, file) = self.create_next()?;
        write_report(&path, BufWriter::new(file), &report)?;
        for summary in report.summaries() {
            debug!(
                name = %summary.name,
                temperature = summary.temperature,
                max = summary.stats.max,
                min = summary.stats.min,
                mean = summary.stats.mean,
                "Point of interest"
            );
        }
        info!(path = %path.display(), "Wrote temperature log");
        Ok(path)
    }
}

/// Write `report` to the log file at `path`, removing the file if the write fails.
fn write_report<W: Write>(path: &Path, mut writer: W, report: &Report<'_>) -> Result<()> {
    let written = write!(writer, "{}", report).and_then(|_| writer.flush());
    // Drop the writer so the file is closed before it is removed.
    drop(writer);
    written.map_err(|source| {
        if let Err(err) = fs::remove_file(path) {
            warn!(path = %path.display(), "Unable to remove partial log file: {}", err);
        }
        Error::LogWrite {
            path: path.to_owned(),
            source,
        }
    })
}

#[cfg(test)]
mod test {
    use std::convert::TryFrom;
    use std::fs;
    use std::io::{self, Write};

    use chrono::{NaiveDate, NaiveDateTime};
    use ndarray::Array2;

    use super::{write_report, LogSettings, Logbook, Report, TestName};
    use crate::error::Error;
    use crate::frame::{Frame, Point, PointOfInterest};
    use crate::temperature::TemperatureUnit;

    fn logbook(directory: &std::path::Path, points: Vec<PointOfInterest>) -> Logbook {
        let settings = LogSettings {
            directory: directory.to_owned(),
        };
        Logbook::new(
            TestName::try_from("oven".to_string()).unwrap(),
            &settings,
            points,
            3,
            TemperatureUnit::Celsius,
        )
    }

    fn frame() -> Frame {
        Frame::new(Array2::from_elem((120, 160), 25.0))
    }

    fn taken() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 7, 4)
            .and_then(|date| date.and_hms_opt(13, 5, 9))
            .unwrap()
    }

    fn center() -> Vec<PointOfInterest> {
        vec![PointOfInterest {
            name: "center".to_string(),
            point: Point::new(60, 80),
        }]
    }

    #[test]
    fn test_name_validation() {
        assert!(TestName::try_from("oven".to_string()).is_ok());
        assert!(TestName::try_from("oven run 2".to_string()).is_ok());
        for bad in &["", ".", "..", "a/b", "/abs", "oven/"] {
            assert!(
                TestName::try_from(bad.to_string()).is_err(),
                "Accepted {:?} as a test name",
                bad
            );
        }
    }

    #[test]
    fn numbers_increment() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let logbook = logbook(dir.path(), center());
        let first = logbook.record(taken(), &frame())?;
        let second = logbook.record(taken(), &frame())?;
        assert_eq!(first, dir.path().join("oven").join("ovenLepton1.txt"));
        assert_eq!(second, dir.path().join("oven").join("ovenLepton2.txt"));
        Ok(())
    }

    #[test]
    fn existing_files_kept() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let logbook = logbook(dir.path(), center());
        fs::create_dir_all(logbook.directory())?;
        let existing = logbook.directory().join("ovenLepton1.txt");
        fs::write(&existing, "keep me")?;
        let written = logbook.record(taken(), &frame())?;
        assert_eq!(written, logbook.directory().join("ovenLepton2.txt"));
        assert_eq!(fs::read_to_string(&existing)?, "keep me");
        Ok(())
    }

    #[test]
    fn contents() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let logbook = logbook(dir.path(), center());
        let written = logbook.record(taken(), &frame())?;
        let text = fs::read_to_string(written)?;
        assert!(text.starts_with("Date: 07/04/2021\nTime: 13:05:09\n"));
        assert!(text.contains("[center]"));
        assert!(text.contains("The temperature at row 60 column 80 is 25 degree C"));
        assert!(text.contains("The average temperature throughout a 7x7 area"));
        // One line per row of the frame after the header line.
        let dump: Vec<_> = text
            .split("Full temperature array:\n")
            .nth(1)
            .unwrap()
            .lines()
            .collect();
        assert_eq!(dump.len(), 120);
        assert_eq!(dump[0].split_whitespace().count(), 160);
        Ok(())
    }

    #[test]
    fn bad_point_leaves_no_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let points = vec![PointOfInterest {
            name: "outside".to_string(),
            point: Point::new(500, 0),
        }];
        let logbook = logbook(dir.path(), points);
        let result = logbook.record(taken(), &frame());
        assert!(matches!(result, Err(Error::PointOutOfBounds { .. })));
        assert!(!logbook.directory().exists());
        Ok(())
    }

    /// Accepts a few bytes, then fails like a full disk.
    struct FullDisk {
        room: usize,
    }

    impl Write for FullDisk {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.room == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "no space left on device"));
            }
            let written = buf.len().min(self.room);
            self.room -= written;
            Ok(written)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_write_removes_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let frame = frame();
        let report = Report::new(
            taken(),
            &frame,
            &center(),
            3,
            TemperatureUnit::Celsius,
        )?;
        let path = dir.path().join("ovenLepton1.txt");
        fs::write(&path, "")?;
        let result = write_report(&path, FullDisk { room: 16 }, &report);
        assert!(matches!(result, Err(Error::LogWrite { ref path, .. }) if path.ends_with("ovenLepton1.txt")));
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn unwritable_directory() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        // A file where the log directory should be.
        let blocker = dir.path().join("blocked");
        fs::write(&blocker, "")?;
        let logbook = logbook(&blocker, center());
        let result = logbook.record(taken(), &frame());
        assert!(matches!(result, Err(Error::LogWrite { .. })));
        Ok(())
    }
}
