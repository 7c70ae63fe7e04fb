//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and pet tuning
//! constants live here so they can be tuned in one place.

// GPIO pin assignments (ESP32 DevKitC defaults)
//
// These are logical names; the actual `esp_hal::peripherals::GPIOn` values
// are picked in `main.rs`.  Adjust for your own wiring.
//
//   Encoder A (CLK)  → GPIO25
//   Encoder B (DT)   → GPIO26
//   Encoder button   → GPIO27
//   I²C SDA          → GPIO21
//   I²C SCL          → GPIO22

/// I²C bus frequency (kHz).
pub const I2C_FREQUENCY_KHZ: u32 = 400;

/// SSD1306 7-bit address.
pub const DISPLAY_I2C_ADDR: u8 = 0x3C;

/// HTU21D 7-bit address.
pub const HTU21D_I2C_ADDR: u8 = 0x40;

/// Display geometry.
pub const SCREEN_WIDTH: u32 = 128;
pub const SCREEN_HEIGHT: u32 = 64;

// Encoder

/// Sampling rate of the encoder task (Hz).
pub const ENCODER_POLL_HZ: u64 = 1000;

/// Minimum time between accepted quadrature transitions (ms).
pub const STEP_DEBOUNCE_MS: u32 = 5;

/// Minimum time between accepted button level changes (ms).
pub const BUTTON_DEBOUNCE_MS: u32 = 35;

/// Largest step magnitude a single `read()` reports.
pub const DEFAULT_DELTA_CAP: i32 = 1;

// Screens

/// Menu/stats screens fall back to idle after this long without input (ms).
pub const MENU_TIMEOUT_MS: u32 = 6_000;

/// How long a message stays up before returning on its own (ms).
pub const MESSAGE_VIEW_MS: u32 = 3_000;

/// How long the error banner stays up (ms).
pub const ERROR_BANNER_MS: u32 = 1_500;

/// How long the boot splash stays up (ms).
pub const SPLASH_MS: u32 = 1_500;

/// Number of menu rows that fit under the title bar.
pub const MENU_VISIBLE_ROWS: usize = 4;

/// Deepest submenu nesting the navigator tracks.
pub const MAX_MENU_DEPTH: usize = 4;

/// Number of menus the static menu tree can hold.
pub const MAX_MENUS: usize = 8;

/// Number of minigame slots.
pub const MAX_GAMES: usize = 4;

// Background ticks

/// Indoor sensor refresh interval (ms).
pub const SENSOR_INTERVAL_MS: u32 = 2_000;

/// Mood change interval (ms). 5 minutes.
pub const MOOD_INTERVAL_MS: u32 = 5 * 60 * 1000;

/// Outdoor weather refresh interval (ms). 10 minutes.
pub const WEATHER_INTERVAL_MS: u32 = 10 * 60 * 1000;

/// Offset of the idle-screen clock from UTC (s).
pub const UTC_OFFSET_S: i32 = 0;

/// Stat decay interval (ms). 2 minutes.
pub const DECAY_INTERVAL_MS: u32 = 2 * 60 * 1000;

/// Animation frame period (ms).
pub const FRAME_TIME_MS: u32 = 800;

/// Display refresh target.
pub const TARGET_FPS: u32 = 10;

/// Pause between logic loop passes (ms).
pub const LOOP_PAUSE_MS: u64 = 5;

// Pet tuning

/// Amount every gauge loses per decay tick.
pub const STAT_DECAY_AMOUNT: u8 = 2;

/// Gauge value a freshly booted pet starts with.
pub const STAT_START_VALUE: u8 = 70;

/// Happiness gained and energy spent by finishing a minigame.
pub const PLAY_HAPPINESS_GAIN: i16 = 15;
pub const PLAY_ENERGY_COST: i16 = 10;

/// Timing knobs for the application state machine.
///
/// Defaults come from the constants above; tests shrink them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    pub menu_timeout_ms: u32,
    pub message_ms: u32,
    pub error_banner_ms: u32,
    pub sensor_ms: u32,
    pub mood_ms: u32,
    pub weather_ms: u32,
    pub decay_ms: u32,
    pub frame_ms: u32,
    pub render_ms: u32,
    pub decay_amount: u8,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            menu_timeout_ms: MENU_TIMEOUT_MS,
            message_ms: MESSAGE_VIEW_MS,
            error_banner_ms: ERROR_BANNER_MS,
            sensor_ms: SENSOR_INTERVAL_MS,
            mood_ms: MOOD_INTERVAL_MS,
            weather_ms: WEATHER_INTERVAL_MS,
            decay_ms: DECAY_INTERVAL_MS,
            frame_ms: FRAME_TIME_MS,
            render_ms: 1000 / TARGET_FPS,
            decay_amount: STAT_DECAY_AMOUNT,
        }
    }
}
