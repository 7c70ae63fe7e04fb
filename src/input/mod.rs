//! Rotary encoder input - decoder and the event channel it feeds.
//!
//! The decoder runs in the sampling task (ESP32 app core) and is the only
//! writer; the logic loop drains the channel once per pass.
//!
//! ## Components
//!
//! - **Decoder**: Gray-code quadrature decoding + press/release click detection
//! - **Channel**: lock-guarded step accumulator with exactly-once drain

pub mod channel;
pub mod encoder;

pub use channel::{CapGuard, EventChannel};
pub use encoder::{DebounceConfig, QuadratureDecoder};

/// Input drained from the channel in one `read()`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderEvent {
    /// Signed detent steps, already clamped to the channel's delta cap.
    /// Positive is clockwise.
    pub steps: i32,
    /// A full press-then-release happened since the previous read.
    pub clicked: bool,
}

impl EncoderEvent {
    pub const NONE: Self = Self {
        steps: 0,
        clicked: false,
    };

    /// `true` if the user touched the encoder at all.
    pub fn is_active(&self) -> bool {
        self.steps != 0 || self.clicked
    }
}
