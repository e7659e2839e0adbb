//! LED indicator driver for the gateway's status light.
//!
//! [`Led`] drives a push-pull pin (active-high or active-low);
//! [`OpenDrainLed`] drives an open-drain pin that is pulled up externally.
//! [`Heartbeat`] blinks any indicator at a fixed interval to show the main
//! loop is alive.

mod blinker;
mod led;

pub use blinker::Heartbeat;
pub use led::{Indicator, Led, OpenDrainLed, PinDriver};
