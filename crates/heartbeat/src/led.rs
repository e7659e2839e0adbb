/// A digital output pin as the LED drivers need it.
///
/// Implementations wrap the platform's GPIO handle. `float_high` releases
/// the pin to its pulled-up input state, which open-drain wiring uses as
/// "not driven".
pub trait PinDriver {
    /// Drive the pin to the given logic level.
    fn write(&mut self, level: bool);

    /// Read back the current pin level.
    fn read(&self) -> bool;

    /// Stop driving the pin and let the pull-up float it high.
    fn float_high(&mut self);
}

/// Common surface of the LED variants.
pub trait Indicator {
    fn on(&mut self);
    fn off(&mut self);
    fn state(&self) -> bool;

    fn toggle(&mut self) {
        if self.state() {
            self.off();
        } else {
            self.on();
        }
    }

    fn set_state(&mut self, state: bool) {
        if state {
            self.on();
        } else {
            self.off();
        }
    }
}

/// Push-pull LED, lit by driving the pin to its active level.
pub struct Led<P: PinDriver> {
    pin: P,
    active_high: bool,
}

impl<P: PinDriver> Led<P> {
    /// Takes ownership of the pin and switches the LED off.
    pub fn new(pin: P, active_high: bool) -> Self {
        let mut led = Self { pin, active_high };
        led.off();
        led
    }
}

impl<P: PinDriver> Indicator for Led<P> {
    fn on(&mut self) {
        self.pin.write(self.active_high);
    }

    fn off(&mut self) {
        self.pin.write(!self.active_high);
    }

    fn state(&self) -> bool {
        self.pin.read() == self.active_high
    }
}

/// Open-drain LED: driven low for on, released to the pull-up for off.
///
/// `state` comes from a cached flag rather than the pin level, because a
/// released pin reads pulled-up high and an externally driven low would be
/// indistinguishable from "on" by a naive read.
pub struct OpenDrainLed<P: PinDriver> {
    pin: P,
    lit: bool,
}

impl<P: PinDriver> OpenDrainLed<P> {
    pub fn new(pin: P) -> Self {
        let mut led = Self { pin, lit: false };
        led.off();
        led
    }
}

impl<P: PinDriver> Indicator for OpenDrainLed<P> {
    fn on(&mut self) {
        // Open drain is always active low.
        self.pin.write(false);
        self.lit = true;
    }

    fn off(&mut self) {
        self.pin.float_high();
        self.lit = false;
    }

    fn state(&self) -> bool {
        self.lit
    }
}
