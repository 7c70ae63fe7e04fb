//! Unified error type for tomopet.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.

use core::fmt;

/// Top-level error type used across the application.
///
/// None of these are fatal: the state machine logs them and shows a
/// banner, collaborators turn them into absent readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Peripherals
    /// I²C transaction to the climate sensor failed.
    Sensor,

    /// I²C transaction to the display failed.
    Display,

    /// Weather request failed or returned garbage.
    Weather,

    // Application
    /// A menu action refused to run. Carries the banner text.
    Handler(&'static str),

    /// A minigame bailed out. Carries the banner text.
    Game(&'static str),

    /// Operation timed out.
    Timeout,
}

impl Error {
    /// Short text for the on-screen error banner.
    pub fn summary(&self) -> &'static str {
        match *self {
            Error::Sensor => "Sensor fault",
            Error::Display => "Display fault",
            Error::Weather => "No weather",
            Error::Handler(text) | Error::Game(text) => text,
            Error::Timeout => "Timed out",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.summary())
    }
}
