// SPDX-License-Identifier: GPL-3.0-or-later
use std::time::Duration;

use embedded_hal::digital::v2::OutputPin;
use gpio_cdev::{
    Chip, EventRequestFlags, EventType, LineEventHandle, LineHandle, LineRequestFlags,
};
use tracing::{debug, info, warn};

use super::{Debouncer, Press, SwitchSettings, Trigger};
use crate::error::Result;

/// The label the kernel shows for lines requested by this program.
const CONSUMER: &str = "lepton-logger";

/// A push button wired to a GPIO line, reporting one [`Press`] per debounced press.
pub(crate) struct Button {
    events: LineEventHandle,
    active_low: bool,
    debouncer: Debouncer,
}

impl Trigger for Button {
    fn next_press(&mut self) -> Result<Press> {
        loop {
            let event = self.events.get_event()?;
            // Kernel timestamps are monotonic nanoseconds.
            let timestamp = Duration::from_nanos(event.timestamp());
            let pressed = match event.event_type() {
                EventType::FallingEdge => self.active_low,
                EventType::RisingEdge => !self.active_low,
            };
            if self.debouncer.accept(timestamp, pressed) {
                return Ok(Press { timestamp });
            }
            if pressed {
                debug!(?timestamp, "Ignoring switch bounce");
            }
        }
    }
}

/// An LED wired to a GPIO line. The LED is turned off when this is dropped.
pub(crate) struct Indicator {
    line: LineHandle,
}

impl OutputPin for Indicator {
    type Error = gpio_cdev::Error;

    fn set_low(&mut self) -> std::result::Result<(), Self::Error> {
        self.line.set_value(0)
    }

    fn set_high(&mut self) -> std::result::Result<(), Self::Error> {
        self.line.set_value(1)
    }
}

impl Drop for Indicator {
    fn drop(&mut self) {
        if let Err(err) = self.set_low() {
            warn!("Unable to turn off indicator: {}", err);
        }
    }
}

/// The GPIO lines used by the switch trigger.
///
/// The lines are held for as long as this exists, and released by the kernel once the handles are
/// dropped.
pub(crate) struct Hardware {
    pub(crate) button: Button,
    pub(crate) indicator: Indicator,
}

impl Hardware {
    pub(crate) fn acquire(settings: &SwitchSettings) -> Result<Self> {
        let mut chip = Chip::new(&settings.chip)?;
        // Releases are watched too so their bounces can be filtered out.
        let events = chip.get_line(settings.button)?.events(
            LineRequestFlags::INPUT,
            EventRequestFlags::BOTH_EDGES,
            CONSUMER,
        )?;
        let line = chip
            .get_line(settings.indicator)?
            .request(LineRequestFlags::OUTPUT, 0, CONSUMER)?;
        info!(
            chip = %settings.chip.display(),
            button = settings.button,
            indicator = settings.indicator,
            "Acquired GPIO lines"
        );
        Ok(Self {
            button: Button {
                events,
                active_low: settings.active_low,
                debouncer: Debouncer::new(settings.debounce),
            },
            indicator: Indicator { line },
        })
    }
}
