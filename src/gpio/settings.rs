// SPDX-License-Identifier: GPL-3.0-or-later
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde_with::{formats::Flexible, serde_as, DurationSecondsWithFrac};

fn default_chip() -> PathBuf {
    PathBuf::from("/dev/gpiochip0")
}

fn default_button() -> u32 {
    14
}

fn default_indicator() -> u32 {
    15
}

fn default_active_low() -> bool {
    true
}

fn default_debounce() -> Duration {
    Duration::from_millis(50)
}

fn default_indicator_duration() -> Duration {
    Duration::from_secs(3)
}

/// The push button and LED used to trigger captures.
///
/// Line numbers are offsets on the GPIO chip, which on a Raspberry Pi are the BCM numbers.
#[serde_as]
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub(crate) struct SwitchSettings {
    #[serde(default = "default_chip")]
    pub(crate) chip: PathBuf,

    #[serde(default = "default_button")]
    pub(crate) button: u32,

    #[serde(default = "default_indicator")]
    pub(crate) indicator: u32,

    /// The button pulls the line to ground when pressed. The pull-up itself has to be set up
    /// outside of this program (for example in `config.txt` on a Raspberry Pi).
    #[serde(default = "default_active_low")]
    pub(crate) active_low: bool,

    #[serde_as(as = "DurationSecondsWithFrac<f64, Flexible>")]
    #[serde(default = "default_debounce")]
    pub(crate) debounce: Duration,

    /// How long the LED stays lit after a press.
    #[serde_as(as = "DurationSecondsWithFrac<f64, Flexible>")]
    #[serde(default = "default_indicator_duration")]
    pub(crate) indicator_duration: Duration,
}

impl Default for SwitchSettings {
    fn default() -> Self {
        Self {
            chip: default_chip(),
            button: default_button(),
            indicator: default_indicator(),
            active_low: default_active_low(),
            debounce: default_debounce(),
            indicator_duration: default_indicator_duration(),
        }
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;
    use std::time::Duration;

    use super::SwitchSettings;

    #[test]
    fn defaults() -> anyhow::Result<()> {
        let parsed: SwitchSettings = toml::from_str("")?;
        let expected = SwitchSettings {
            chip: PathBuf::from("/dev/gpiochip0"),
            button: 14,
            indicator: 15,
            active_low: true,
            debounce: Duration::from_millis(50),
            indicator_duration: Duration::from_secs(3),
        };
        assert_eq!(parsed, expected);
        Ok(())
    }

    #[test]
    fn custom() -> anyhow::Result<()> {
        let source = r#"
        chip = "/dev/gpiochip1"
        button = 17
        indicator = 27
        active_low = false
        debounce = 0.2
        indicator_duration = 1
        "#;
        let parsed: SwitchSettings = toml::from_str(source)?;
        assert_eq!(parsed.chip, PathBuf::from("/dev/gpiochip1"));
        assert_eq!(parsed.button, 17);
        assert_eq!(parsed.indicator, 27);
        assert!(!parsed.active_low);
        assert_eq!(parsed.debounce, Duration::from_millis(200));
        assert_eq!(parsed.indicator_duration, Duration::from_secs(1));
        Ok(())
    }

    #[test]
    fn error_negative_line() {
        let parsed: Result<SwitchSettings, _> = toml::from_str("button = -3");
        assert!(parsed.is_err(), "Accepted a negative line offset");
    }
}
