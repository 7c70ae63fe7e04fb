//! Polled quadrature decoder with debounced push button.
//!
//! Both encoder lines (active-low with pull-ups) are sampled together and
//! packed as `(A << 1) | B`. A change is looked up in a Gray-code
//! transition table indexed by `(previous << 2) | current`:
//!
//! ```text
//!            current: 00  01  10  11
//! previous 00:         0  -1  +1   0
//! previous 01:        +1   0   0  -1
//! previous 10:        -1   0   0  +1
//! previous 11:         0  +1  -1   0
//! ```
//!
//! Entries where both lines flipped at once are physically impossible for a
//! mechanical encoder and decode to 0. They still move the stored code so a
//! bouncing contact is not re-evaluated against a stale reference.
//!
//! One detent is a full cycle of four transitions that ends back on the rest
//! code `11`. Transitions are summed locally and the channel only sees one
//! step per completed detent, so a turn spread over several reads still
//! moves a menu by one row. Coming back to rest short of a full cycle
//! clears the partial count.
//!
//! The button registers a click only on press-then-release, each edge
//! accepted no sooner than the button debounce window after the last one.

use embedded_hal::digital::InputPin;

use super::EventChannel;
use crate::clock::ticks_diff;
use crate::config::{BUTTON_DEBOUNCE_MS, STEP_DEBOUNCE_MS};

const TRANSITIONS: [i8; 16] = [
    0, -1, 1, 0, //
    1, 0, 0, -1, //
    -1, 0, 0, 1, //
    0, 1, -1, 0, //
];

/// Both lines high: where a detented encoder settles between clicks.
const REST_CODE: u8 = 0b11;

/// Gray-code transitions in one mechanical detent.
const TRANSITIONS_PER_DETENT: i8 = 4;

/// Direction of a single Gray-code transition: -1, 0 (none/invalid) or +1.
pub fn transition(previous: u8, current: u8) -> i8 {
    TRANSITIONS[(((previous & 0b11) << 2) | (current & 0b11)) as usize]
}

/// Debounce windows for rotation and button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebounceConfig {
    pub step_ms: u32,
    pub button_ms: u32,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            step_ms: STEP_DEBOUNCE_MS,
            button_ms: BUTTON_DEBOUNCE_MS,
        }
    }
}

/// Quadrature decoder state. Lives entirely in the sampling context; the
/// only thing it shares is the [`EventChannel`].
pub struct QuadratureDecoder<'a, A, B, BTN> {
    pin_a: A,
    pin_b: B,
    button: BTN,
    events: &'a EventChannel,
    debounce: DebounceConfig,
    last_code: u8,
    /// Transitions since the encoder last sat at rest.
    phase: i8,
    last_step_ms: u32,
    button_high: bool,
    last_button_ms: u32,
    pressed: bool,
}

impl<'a, A, B, BTN> QuadratureDecoder<'a, A, B, BTN>
where
    A: InputPin,
    B: InputPin,
    BTN: InputPin,
{
    pub fn new(
        pin_a: A,
        pin_b: B,
        button: BTN,
        events: &'a EventChannel,
        debounce: DebounceConfig,
        now_ms: u32,
    ) -> Self {
        let mut decoder = Self {
            pin_a,
            pin_b,
            button,
            events,
            debounce,
            last_code: 0,
            phase: 0,
            last_step_ms: now_ms,
            button_high: true,
            last_button_ms: now_ms,
            pressed: false,
        };
        decoder.resync(now_ms);
        decoder
    }

    /// One sampling pass. Call at a fixed high rate (1 kHz in the firmware).
    pub fn sample(&mut self, now_ms: u32) {
        if self.events.take_resync() {
            self.resync(now_ms);
            return;
        }
        self.sample_rotation(now_ms);
        self.sample_button(now_ms);
    }

    /// Re-read pin levels and restart both debounce windows.
    fn resync(&mut self, now_ms: u32) {
        self.last_code = self.read_code();
        self.phase = 0;
        self.button_high = level(&mut self.button);
        self.last_step_ms = now_ms;
        self.last_button_ms = now_ms;
        self.pressed = false;
    }

    fn read_code(&mut self) -> u8 {
        ((level(&mut self.pin_a) as u8) << 1) | level(&mut self.pin_b) as u8
    }

    fn sample_rotation(&mut self, now_ms: u32) {
        let code = self.read_code();
        if code == self.last_code {
            return;
        }
        if ticks_diff(now_ms, self.last_step_ms) < self.debounce.step_ms {
            return;
        }

        let direction = transition(self.last_code, code);
        if direction == 0 {
            debug!("encoder: rejected {=u8:b} -> {=u8:b}", self.last_code, code);
        }
        self.phase += direction;
        self.last_code = code;
        self.last_step_ms = now_ms;

        if self.phase.abs() >= TRANSITIONS_PER_DETENT {
            self.events.push_steps(self.phase.signum() as i32);
            self.phase = 0;
        } else if code == REST_CODE {
            self.phase = 0;
        }
    }

    fn sample_button(&mut self, now_ms: u32) {
        let high = level(&mut self.button);
        if high == self.button_high {
            return;
        }
        if ticks_diff(now_ms, self.last_button_ms) < self.debounce.button_ms {
            return;
        }

        self.button_high = high;
        self.last_button_ms = now_ms;

        if !high {
            self.pressed = true;
        } else if self.pressed {
            self.pressed = false;
            self.events.push_click();
        }
    }
}

/// Unreadable pins read as logic-low.
fn level<P: InputPin>(pin: &mut P) -> bool {
    pin.is_high().unwrap_or(false)
}
