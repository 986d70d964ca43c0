//! Push button level reader
//!
//! Stateless poll of the button pin: no interrupt, no debounce, no
//! history. Bounce filtering, click/long-press detection and the like are
//! the caller's job. The pin can be wired active-low (default, with a
//! pull-up) or active-high.

use embedded_hal::digital::InputPin;

/// Stateless push button over one input pin
pub struct PushButton<P> {
    pin: P,
    /// If true, button pressed = pin LOW
    active_low: bool,
}

impl<P: InputPin> PushButton<P> {
    /// Create a button reader for an active-low (pulled-up) pin
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            active_low: true,
        }
    }

    /// Create a button reader for an active-high pin
    pub fn new_active_high(pin: P) -> Self {
        Self {
            pin,
            active_low: false,
        }
    }

    /// Instantaneous electrical level of the pin
    pub fn level(&mut self) -> bool {
        self.pin.is_high().unwrap_or(false)
    }

    /// Instantaneous pressed state, honoring the active level
    pub fn is_pressed(&mut self) -> bool {
        self.level() != self.active_low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    struct FixedPin(bool);

    impl embedded_hal::digital::ErrorType for FixedPin {
        type Error = Infallible;
    }

    impl InputPin for FixedPin {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.0)
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.0)
        }
    }

    #[test]
    fn active_low_button_is_pressed_at_low_level() {
        let mut button = PushButton::new(FixedPin(false));
        assert!(!button.level());
        assert!(button.is_pressed());

        let mut button = PushButton::new(FixedPin(true));
        assert!(button.level());
        assert!(!button.is_pressed());
    }

    #[test]
    fn active_high_button_is_pressed_at_high_level() {
        let mut button = PushButton::new_active_high(FixedPin(true));
        assert!(button.is_pressed());

        let mut button = PushButton::new_active_high(FixedPin(false));
        assert!(!button.is_pressed());
    }
}
