use crate::led::Indicator;

/// Blinks an indicator at a fixed interval, driven from the main loop.
///
/// Time is supplied by the caller as a millisecond counter; the arithmetic
/// is wrap-safe, so a `u32` tick source that rolls over keeps working.
pub struct Heartbeat<I: Indicator> {
    indicator: I,
    interval_ms: u32,
    last_toggle_ms: u32,
}

impl<I: Indicator> Heartbeat<I> {
    pub fn new(indicator: I, interval_ms: u32) -> Self {
        Self {
            indicator,
            interval_ms,
            last_toggle_ms: 0,
        }
    }

    /// Advance the blinker. Toggles the indicator whenever the interval has
    /// elapsed since the last toggle.
    pub fn tick(&mut self, now_ms: u32) {
        if now_ms.wrapping_sub(self.last_toggle_ms) >= self.interval_ms {
            self.indicator.toggle();
            self.last_toggle_ms = now_ms;
        }
    }

    /// Access the wrapped indicator, e.g. to force it on during an alarm.
    pub fn indicator_mut(&mut self) -> &mut I {
        &mut self.indicator
    }
}
