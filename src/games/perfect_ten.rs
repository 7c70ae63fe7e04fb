//! "Perfect 10": stop a running timer at exactly 10.000 seconds.

use core::fmt::Write;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use heapless::String;

use super::{format_millis, Minigame};
use crate::clock::{ticks_diff, Clock};
use crate::error::Error;
use crate::input::EventChannel;
use crate::ui::display::centered_text;
use crate::ui::Surface;

const NAME: &str = "Perfect 10";

const TARGET_MS: u32 = 10_000;
/// The timer stops itself this long after starting.
const AUTO_STOP_MS: u32 = 15_000;
const INTRO_MS: u32 = 2_000;
const RESULT_MS: u32 = 4_000;
const TICK_MS: u32 = 10;

/// How close the player got, by digit of accuracy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Grade {
    Perfect,
    Amazing,
    Great,
    Good,
    TryAgain,
}

impl Grade {
    pub fn from_error(off_ms: u32) -> Self {
        match off_ms {
            0 => Grade::Perfect,
            1..=9 => Grade::Amazing,
            10..=99 => Grade::Great,
            100..=999 => Grade::Good,
            _ => Grade::TryAgain,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Grade::Perfect => "PERFECT!!!",
            Grade::Amazing => "Amazing!",
            Grade::Great => "Great!",
            Grade::Good => "Good",
            Grade::TryAgain => "Try again",
        }
    }
}

#[derive(Default)]
pub struct PerfectTen {
    last_ms: Option<u32>,
}

impl PerfectTen {
    pub const fn new() -> Self {
        Self { last_ms: None }
    }

    /// Stopped time of the most recent round.
    pub fn last_time_ms(&self) -> Option<u32> {
        self.last_ms
    }
}

impl<D: Surface> Minigame<D> for PerfectTen {
    fn name(&self) -> &'static str {
        NAME
    }

    fn run(
        &mut self,
        display: &mut D,
        input: &EventChannel,
        clock: &mut dyn Clock,
    ) -> Result<&'static str, Error> {
        let _ = display.clear(BinaryColor::Off);
        centered_text(display, "Stop at", 18);
        centered_text(display, "10.000", 32);
        centered_text(display, "seconds!", 46);
        display.present()?;
        clock.delay_ms(INTRO_MS);

        // Clicks during the intro don't count.
        input.reset();
        let start = clock.now_ms();

        let stopped = loop {
            let elapsed = ticks_diff(clock.now_ms(), start);
            if elapsed > AUTO_STOP_MS || input.read().clicked {
                break elapsed;
            }

            let _ = display.clear(BinaryColor::Off);
            centered_text(display, &format_millis(elapsed), 24);
            centered_text(display, "seconds", 38);
            centered_text(display, "Click to stop!", 54);
            display.present()?;
            clock.delay_ms(TICK_MS);
        };

        let off_ms = stopped.abs_diff(TARGET_MS);
        let grade = Grade::from_error(off_ms);
        self.last_ms = Some(stopped);
        info!("perfect10: stopped at {} ms, {} off, {}", stopped, off_ms, grade);

        let mut accuracy: String<20> = String::new();
        let _ = write!(accuracy, "{}s off", format_millis(off_ms));

        let _ = display.clear(BinaryColor::Off);
        centered_text(display, "Your time:", 10);
        centered_text(display, &format_millis(stopped), 24);
        centered_text(display, grade.label(), 40);
        centered_text(display, &accuracy, 54);
        display.present()?;
        clock.delay_ms(RESULT_MS);

        Ok(NAME)
    }
}
