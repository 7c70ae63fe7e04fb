//! Library interface for tomopet.
//!
//! Everything except the board bring-up lives here so it can be tested on
//! the host (no ESP32 required): the quadrature decoder and its event
//! channel, the menu navigator, the application state machine, the pet
//! model, rendering and the minigames.
//!
//! Usage: `cargo test`
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main]
//! and needs `--features embedded`.

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible to every module.
#[macro_use]
mod fmt;

// ═══════════════════════════════════════════════════════════════════════════
// Core
// ═══════════════════════════════════════════════════════════════════════════

pub mod app;
pub mod clock;
pub mod config;
pub mod error;

// ═══════════════════════════════════════════════════════════════════════════
// Subsystems
// ═══════════════════════════════════════════════════════════════════════════

pub mod env;
pub mod games;
pub mod input;
pub mod pet;
pub mod ui;

#[cfg(test)]
mod testing;

pub use error::Error;
