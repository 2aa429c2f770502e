// SPDX-License-Identifier: GPL-3.0-or-later
use structopt::StructOpt;

use std::path::PathBuf;

use crate::temperature::TemperatureUnit;

#[derive(Debug, StructOpt)]
#[structopt(about = "Capture thermal images from a Lepton camera and log point temperatures.")]
pub(crate) struct Args {
    /// Path to a configuration file.
    #[structopt(short, long, parse(from_os_str), default_value = "config.toml")]
    pub(crate) config_path: PathBuf,

    /// Log more details. Can be given multiple times. RUST_LOG overrides this.
    #[structopt(short, long, parse(from_occurrences))]
    pub(crate) verbose: u8,

    /// Use this test name instead of the one in the configuration file.
    #[structopt(short, long)]
    pub(crate) test_name: Option<String>,

    /// Log temperatures in this unit (celsius or fahrenheit).
    #[structopt(short, long)]
    pub(crate) units: Option<TemperatureUnit>,

    #[structopt(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, PartialEq, StructOpt)]
pub(crate) enum Command {
    /// Take a single capture and log it.
    Capture,

    /// Capture and log every time the button is pressed, until interrupted.
    Watch,

    /// Log a temperature dump that has already been captured.
    Analyze {
        #[structopt(parse(from_os_str))]
        file: PathBuf,
    },
}
