// SPDX-License-Identifier: GPL-3.0-or-later
use std::time::Duration;

use tracing::trace;

/// Filters out the extra edges a mechanical switch produces while its contacts settle.
///
/// Both press and release edges are fed in. A press edge is accepted only if the line has been
/// quiet for at least `window` since the last edge of either kind, so bounces on press and on
/// release are both dropped. Timestamps are from whatever monotonic clock the edges are stamped
/// with.
#[derive(Clone, Debug)]
pub(crate) struct Debouncer {
    window: Duration,
    last_edge: Option<Duration>,
}

impl Debouncer {
    pub(crate) fn new(window: Duration) -> Self {
        Self {
            window,
            last_edge: None,
        }
    }

    /// Record an edge at `timestamp`, returning `true` if it is a new press.
    ///
    /// `pressed` is `true` for edges moving the button into the pressed state.
    pub(crate) fn accept(&mut self, timestamp: Duration, pressed: bool) -> bool {
        let settled = match self.last_edge {
            None => true,
            // Clocks going backwards are treated as a settled line.
            Some(last) => match timestamp.checked_sub(last) {
                Some(elapsed) => elapsed >= self.window,
                None => true,
            },
        };
        self.last_edge = Some(timestamp);
        let accepted = pressed && settled;
        trace!(?timestamp, pressed, accepted, "Button edge");
        accepted
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use super::Debouncer;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn first_press_accepted() {
        let mut debouncer = Debouncer::new(ms(50));
        assert!(debouncer.accept(ms(1_000), true));
    }

    #[test]
    fn releases_never_accepted() {
        let mut debouncer = Debouncer::new(ms(50));
        assert!(!debouncer.accept(ms(1_000), false));
    }

    #[test]
    fn press_bounces_dropped() {
        let mut debouncer = Debouncer::new(ms(50));
        assert!(debouncer.accept(ms(1_000), true));
        assert!(!debouncer.accept(ms(1_002), false));
        assert!(!debouncer.accept(ms(1_004), true));
        assert!(!debouncer.accept(ms(1_010), false));
        assert!(!debouncer.accept(ms(1_012), true));
        // Released for good, then pressed again much later.
        assert!(!debouncer.accept(ms(1_500), false));
        assert!(debouncer.accept(ms(2_000), true));
    }

    #[test]
    fn release_bounces_dropped() {
        let mut debouncer = Debouncer::new(ms(50));
        assert!(debouncer.accept(ms(0), true));
        // Held for a second, then bouncing on release.
        assert!(!debouncer.accept(ms(1_000), false));
        assert!(!debouncer.accept(ms(1_003), true));
        assert!(!debouncer.accept(ms(1_005), false));
        assert!(!debouncer.accept(ms(1_020), true));
        assert!(!debouncer.accept(ms(1_022), false));
    }

    #[test]
    fn window_measured_from_last_edge() {
        let mut debouncer = Debouncer::new(ms(50));
        assert!(debouncer.accept(ms(0), true));
        assert!(!debouncer.accept(ms(40), false));
        // 60ms after the first press, but only 20ms after the release.
        assert!(!debouncer.accept(ms(60), true));
        assert!(!debouncer.accept(ms(100), false));
        assert!(debouncer.accept(ms(150), true));
    }

    #[test]
    fn zero_window_accepts_every_press() {
        let mut debouncer = Debouncer::new(Duration::ZERO);
        assert!(debouncer.accept(ms(5), true));
        assert!(!debouncer.accept(ms(5), false));
        assert!(debouncer.accept(ms(5), true));
    }

    #[test]
    fn clock_reset() {
        let mut debouncer = Debouncer::new(ms(50));
        assert!(debouncer.accept(ms(10_000), true));
        assert!(debouncer.accept(ms(3), true));
    }
}
