// SPDX-License-Identifier: GPL-3.0-or-later
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time;
use tracing::{debug, info, instrument, trace};

use super::{CaptureOutput, CaptureSettings, Capturer};
use crate::error::{Error, Result};

/// Allowance for file systems that only store modification times to the second (or worse).
const MODIFIED_SLACK: Duration = Duration::from_secs(1);

/// Find the most recently modified file in `directory` with the given extension, ignoring files
/// last modified before `since`.
fn newest_with_extension(
    directory: &Path,
    extension: &str,
    since: SystemTime,
) -> io::Result<Option<PathBuf>> {
    let since = since.checked_sub(MODIFIED_SLACK).unwrap_or(since);
    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension() != Some(OsStr::new(extension)) {
            continue;
        }
        let metadata = entry.metadata()?;
        if !metadata.is_file() {
            continue;
        }
        let modified = metadata.modified()?;
        trace!(path = %path.display(), ?modified, "Capture output candidate");
        if modified < since {
            continue;
        }
        match &newest {
            Some((newest_modified, _)) if *newest_modified >= modified => (),
            _ => newest = Some((modified, path)),
        }
    }
    Ok(newest.map(|(_, path)| path))
}

/// Runs the camera vendor's capture program, which writes a temperature dump and an image.
#[derive(Clone, Debug)]
pub(crate) struct VendorCapture {
    settings: CaptureSettings,
}

impl VendorCapture {
    pub(crate) fn new(settings: CaptureSettings) -> Self {
        Self { settings }
    }

    fn command(&self) -> Command {
        let mut command = if self.settings.sudo {
            let mut sudo = Command::new("sudo");
            sudo.arg(&self.settings.program);
            sudo
        } else {
            Command::new(&self.settings.program)
        };
        command
            .args(&self.settings.args)
            .current_dir(&self.settings.working_directory)
            .stdin(Stdio::null());
        command
    }

    fn find_output(&self, started: SystemTime) -> Result<CaptureOutput> {
        let directory = self.settings.output_directory();
        let find = |extension: &str| {
            newest_with_extension(directory, extension, started).map_err(|source| {
                Error::CaptureOutputScan {
                    directory: directory.to_owned(),
                    source,
                }
            })
        };
        let temperature_path = find(&self.settings.temperature_extension)?.ok_or_else(|| {
            Error::CaptureOutputMissing {
                directory: directory.to_owned(),
                extension: self.settings.temperature_extension.clone(),
            }
        })?;
        let image_path = find(&self.settings.image_extension)?;
        Ok(CaptureOutput {
            started,
            temperature_path,
            image_path,
        })
    }
}

#[async_trait]
impl Capturer for VendorCapture {
    #[instrument(skip(self))]
    async fn capture(&self) -> Result<CaptureOutput> {
        let started = SystemTime::now();
        info!(program = %self.settings.program.display(), "Starting capture");
        let output = self
            .command()
            .output()
            .await
            .map_err(|source| Error::CaptureSpawn {
                program: self.settings.program.clone(),
                source,
            })?;
        debug!(status = %output.status, "Capture program exited");
        if !output.status.success() {
            return Err(Error::CaptureFailed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        time::sleep(self.settings.settle_delay).await;
        let capture = self.find_output(started)?;
        info!(
            temperatures = %capture.temperature_path.display(),
            image = ?capture.image_path,
            "Capture complete"
        );
        Ok(capture)
    }
}

#[cfg(test)]
mod test {
    use std::fs;
    use std::path::Path;
    use std::time::{Duration, SystemTime};

    use super::{newest_with_extension, VendorCapture};
    use crate::capture::{CaptureSettings, Capturer};
    use crate::error::Error;

    fn shell_capture(directory: &Path, script: &str) -> VendorCapture {
        let settings: CaptureSettings = toml::from_str(&format!(
            r#"
            program = "sh"
            args = ["-c", {:?}]
            sudo = false
            working_directory = {:?}
            settle_delay = 0
            "#,
            script,
            directory.display().to_string()
        ))
        .unwrap();
        VendorCapture::new(settings)
    }

    #[test]
    fn newest_file_chosen() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let since = SystemTime::now() - Duration::from_secs(60);
        let old = dir.path().join("a.txt");
        let new = dir.path().join("b.txt");
        fs::write(&old, "old")?;
        fs::write(&new, "new")?;
        let old_file = fs::File::options().write(true).open(&old)?;
        old_file.set_modified(SystemTime::now() - Duration::from_secs(30))?;
        fs::write(dir.path().join("c.png"), "image")?;
        let found = newest_with_extension(dir.path(), "txt", since)?;
        assert_eq!(found, Some(new));
        Ok(())
    }

    #[test]
    fn stale_files_ignored() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let stale = dir.path().join("stale.txt");
        fs::write(&stale, "old")?;
        let stale_file = fs::File::options().write(true).open(&stale)?;
        stale_file.set_modified(SystemTime::now() - Duration::from_secs(600))?;
        let found = newest_with_extension(dir.path(), "txt", SystemTime::now())?;
        assert_eq!(found, None);
        Ok(())
    }

    #[tokio::test]
    async fn capture_finds_outputs() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let capture = shell_capture(dir.path(), "printf '1 2 3 4' > frame.txt; printf x > frame.png");
        let output = capture.capture().await?;
        assert_eq!(output.temperature_path, dir.path().join("frame.txt"));
        assert_eq!(output.image_path, Some(dir.path().join("frame.png")));
        Ok(())
    }

    #[tokio::test]
    async fn capture_without_image() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let capture = shell_capture(dir.path(), "printf '1 2 3 4' > frame.txt");
        let output = capture.capture().await?;
        assert_eq!(output.image_path, None);
        Ok(())
    }

    #[tokio::test]
    async fn failing_program() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let capture = shell_capture(dir.path(), "echo 'no camera' >&2; exit 3");
        match capture.capture().await {
            Err(Error::CaptureFailed { status, stderr }) => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr, "no camera");
            }
            other => panic!("Expected the capture to fail, got {:?}", other),
        }
        Ok(())
    }

    #[tokio::test]
    async fn missing_program() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let mut settings = CaptureSettings::default();
        settings.program = dir.path().join("not-a-camera");
        settings.sudo = false;
        let result = VendorCapture::new(settings).capture().await;
        assert!(matches!(result, Err(Error::CaptureSpawn { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn missing_output_directory() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let settings: CaptureSettings = toml::from_str(&format!(
            r#"
            program = "true"
            sudo = false
            working_directory = {:?}
            output_directory = {:?}
            settle_delay = 0
            "#,
            dir.path().display().to_string(),
            dir.path().join("gone").display().to_string()
        ))?;
        let result = VendorCapture::new(settings).capture().await;
        assert!(matches!(
            result,
            Err(Error::CaptureOutputScan { ref directory, .. }) if directory.ends_with("gone")
        ));
        Ok(())
    }

    #[tokio::test]
    async fn no_temperature_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let capture = shell_capture(dir.path(), "printf x > frame.png");
        let result = capture.capture().await;
        assert!(matches!(
            result,
            Err(Error::CaptureOutputMissing { ref extension, .. }) if extension == "txt"
        ));
        Ok(())
    }
}
