// SPDX-License-Identifier: GPL-3.0-or-later
use std::fmt;
use std::future::Future;
use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use embedded_hal::digital::v2::OutputPin;
use tokio::sync::mpsc;
use tokio::task::{self, JoinError, JoinHandle};
use tokio::time::{self, Instant};
use tracing::{debug, error, info, warn};

use crate::capture::Capturer;
use crate::error::Result;
use crate::gpio::{Press, Trigger};
use crate::pipeline::Pipeline;

/// Read presses from `trigger` on a separate thread, sending them to `sender`.
///
/// Reading presses from GPIO blocks, so it can't happen on the runtime. The thread stops after
/// the first error (which is also sent along), or once the receiving side is closed and another
/// press comes in.
pub(crate) fn forward_presses<T>(
    mut trigger: T,
    sender: mpsc::Sender<Result<Press>>,
) -> io::Result<thread::JoinHandle<()>>
where
    T: 'static + Trigger + Send,
{
    thread::Builder::new()
        .name("button".to_string())
        .spawn(move || loop {
            let press = trigger.next_press();
            let failed = press.is_err();
            if sender.blocking_send(press).is_err() || failed {
                debug!("Stopping button thread");
                break;
            }
        })
}

fn flatten_join_result<T, E>(
    join_result: std::result::Result<std::result::Result<T, E>, JoinError>,
) -> anyhow::Result<T>
where
    anyhow::Error: From<E>,
{
    match join_result {
        Ok(inner_result) => Ok(inner_result?),
        Err(join_error) => {
            if join_error.is_panic() {
                panic::resume_unwind(join_error.into_panic());
            } else {
                Err(join_error.into())
            }
        }
    }
}

/// Captures and logs a frame for every button press, lighting an LED to acknowledge the press.
pub(crate) struct SwitchLoop<P> {
    capturer: Arc<dyn Capturer + Send + Sync>,
    pipeline: Arc<Pipeline>,
    indicator: P,
    indicator_duration: Duration,
    in_flight: Option<JoinHandle<anyhow::Result<PathBuf>>>,
}

impl<P> SwitchLoop<P>
where
    P: OutputPin,
    P::Error: fmt::Display,
{
    pub(crate) fn new(
        capturer: Arc<dyn Capturer + Send + Sync>,
        pipeline: Arc<Pipeline>,
        indicator: P,
        indicator_duration: Duration,
    ) -> Self {
        Self {
            capturer,
            pipeline,
            indicator,
            indicator_duration,
            in_flight: None,
        }
    }

    /// Handle presses until `shutdown` completes or the presses stop coming.
    ///
    /// Presses and `shutdown` are watched the whole time, including while the indicator is lit.
    /// A capture still running when the loop ends is waited for.
    pub(crate) async fn run<F>(
        mut self,
        mut presses: mpsc::Receiver<Result<Press>>,
        shutdown: F,
    ) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let indicator_off = time::sleep(Duration::ZERO);
        tokio::pin!(indicator_off);
        let mut indicator_lit = false;
        let result = loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutting down");
                    break Ok(());
                }
                _ = &mut indicator_off, if indicator_lit => {
                    self.set_indicator(false);
                    indicator_lit = false;
                }
                press = presses.recv() => match press {
                    Some(Ok(press)) => {
                        if self.start_capture(press) {
                            self.set_indicator(true);
                            indicator_off
                                .as_mut()
                                .reset(Instant::now() + self.indicator_duration);
                            indicator_lit = true;
                        }
                    }
                    Some(Err(err)) => break Err(err),
                    None => {
                        debug!("Button closed");
                        break Ok(());
                    }
                },
            }
        };
        if indicator_lit {
            self.set_indicator(false);
        }
        if let Some(capture) = self.in_flight.take() {
            info!("Waiting for the last capture to finish");
            // Failures have already been logged by the capture task.
            let _ = flatten_join_result(capture.await);
        }
        result
    }

    fn capture_running(&self) -> bool {
        self.in_flight
            .as_ref()
            .map_or(false, |capture| !capture.is_finished())
    }

    /// Start a capture in the background, unless one is already running.
    ///
    /// Returns `true` if a capture was started.
    fn start_capture(&mut self, press: Press) -> bool {
        if self.capture_running() {
            warn!(timestamp = ?press.timestamp, "Ignoring button press during a capture");
            return false;
        }
        info!(timestamp = ?press.timestamp, "Button pressed, starting capture");
        let capturer = Arc::clone(&self.capturer);
        let pipeline = Arc::clone(&self.pipeline);
        self.in_flight = Some(tokio::spawn(async move {
            let outcome: anyhow::Result<PathBuf> = async {
                let capture = capturer.capture().await?;
                flatten_join_result(task::spawn_blocking(move || pipeline.process(&capture)).await)
            }
            .await;
            match &outcome {
                Ok(path) => info!(path = %path.display(), "Capture logged"),
                Err(err) => error!("Capture failed: {:#}", err),
            }
            outcome
        }));
        true
    }

    fn set_indicator(&mut self, lit: bool) {
        let (result, action) = if lit {
            (self.indicator.set_high(), "on")
        } else {
            (self.indicator.set_low(), "off")
        };
        if let Err(err) = result {
            warn!("Unable to turn {} indicator: {}", action, err);
        }
    }
}
