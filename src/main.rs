// SPDX-License-Identifier: GPL-3.0-or-later
use std::convert::TryFrom;
use std::future;
use std::sync::Arc;

use anyhow::Context as _;
use structopt::StructOpt;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod capture;
mod error;
mod frame;
mod gpio;
mod logbook;
mod pipeline;
mod settings;
mod temperature;
mod trigger;

use crate::capture::{ExistingDump, VendorCapture};
use crate::gpio::Hardware;
use crate::logbook::TestName;
use crate::pipeline::Pipeline;
use crate::settings::{Args, Command, Settings};
use crate::trigger::{capture_once, forward_presses, SwitchLoop};

/// How many presses can be waiting to be handled. Presses past this are held by the button thread.
const PRESS_QUEUE: usize = 4;

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("lepton_logger={}", default_level)));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => (),
        Err(err) => {
            warn!("Unable to listen for Ctrl-C, only the button can stop this: {}", err);
            future::pending::<()>().await
        }
    }
}

async fn watch(settings: &Settings, pipeline: Pipeline) -> anyhow::Result<()> {
    let Hardware { button, indicator } = Hardware::acquire(&settings.switch)
        .context("Unable to set up the button and indicator GPIO lines")?;
    let (sender, receiver) = mpsc::channel(PRESS_QUEUE);
    forward_presses(button, sender).context("Unable to start the button thread")?;
    let switch_loop = SwitchLoop::new(
        Arc::new(VendorCapture::new(settings.capture.clone())),
        Arc::new(pipeline),
        indicator,
        settings.switch.indicator_duration,
    );
    info!("Waiting for button presses");
    switch_loop
        .run(receiver, shutdown_signal())
        .await
        .context("Unable to read the button")?;
    Ok(())
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut settings = Settings::load(&args.config_path)?;
    if let Some(test_name) = args.test_name {
        settings.test_name = TestName::try_from(test_name).map_err(anyhow::Error::msg)?;
    }
    if let Some(units) = args.units {
        settings.units = units;
    }
    let pipeline = Pipeline::from(&settings);
    match args.command {
        Command::Capture => {
            let capturer = VendorCapture::new(settings.capture.clone());
            let log_path = capture_once(&capturer, &pipeline)
                .await
                .context("Capture failed")?;
            info!(path = %log_path.display(), "Capture logged");
        }
        Command::Analyze { file } => {
            let dump = ExistingDump::new(file.clone());
            let log_path = capture_once(&dump, &pipeline)
                .await
                .with_context(|| format!("Unable to log {}", file.display()))?;
            info!(path = %log_path.display(), "Temperature dump logged");
        }
        Command::Watch => watch(&settings, pipeline).await?,
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::from_args();
    init_tracing(args.verbose);
    if let Err(err) = run(args).await {
        error!("{:#}", err);
        std::process::exit(1);
    }
}
