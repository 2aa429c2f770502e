// SPDX-License-Identifier: GPL-3.0-or-later
use std::time::Duration;

use crate::error::Result;

mod debounce;
mod hardware;
mod settings;

pub(crate) use debounce::Debouncer;
pub(crate) use hardware::Hardware;
pub(crate) use settings::SwitchSettings;

/// A single, debounced button press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Press {
    /// When the press happened, on the clock of whatever detected it.
    pub(crate) timestamp: Duration,
}

/// A source of button presses.
pub(crate) trait Trigger {
    /// Block until the next press.
    fn next_press(&mut self) -> Result<Press>;
}
