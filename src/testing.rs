//! Host-side doubles shared by the unit tests.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_hal::delay::DelayNs;

use crate::clock::Clock;
use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::error::Error;
use crate::input::EventChannel;
use crate::ui::Surface;

/// In-memory 128×64 frame buffer.
pub struct Frame {
    pub pixels: Vec<bool>,
    pub presents: usize,
    pub fail_present: bool,
}

impl Frame {
    pub fn new() -> Self {
        Self {
            pixels: vec![false; (SCREEN_WIDTH * SCREEN_HEIGHT) as usize],
            presents: 0,
            fail_present: false,
        }
    }

    pub fn at(&self, x: i32, y: i32) -> bool {
        self.pixels[(y * SCREEN_WIDTH as i32 + x) as usize]
    }

    pub fn lit(&self) -> usize {
        self.pixels.iter().filter(|&&p| p).count()
    }
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        Size::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

impl DrawTarget for Frame {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (w, h) = (SCREEN_WIDTH as i32, SCREEN_HEIGHT as i32);
        for Pixel(p, color) in pixels {
            if (0..w).contains(&p.x) && (0..h).contains(&p.y) {
                self.pixels[(p.y * w + p.x) as usize] = color.is_on();
            }
        }
        Ok(())
    }
}

impl Surface for Frame {
    fn present(&mut self) -> Result<(), Error> {
        if self.fail_present {
            return Err(Error::Display);
        }
        self.presents += 1;
        Ok(())
    }
}

/// Something the user does at a scheduled time.
#[derive(Clone, Copy, Debug)]
pub enum Gesture {
    Click,
    Steps(i32),
}

/// Clock whose delays advance time and replay scheduled input, acting as
/// the encoder sampler for the channel it feeds.
pub struct ManualClock<'a> {
    now: u32,
    nanos: u32,
    input: Option<&'a EventChannel>,
    script: Vec<(u32, Gesture)>,
}

impl<'a> ManualClock<'a> {
    pub fn new(now: u32) -> Self {
        Self {
            now,
            nanos: 0,
            input: None,
            script: Vec::new(),
        }
    }

    pub fn with_input(mut self, input: &'a EventChannel) -> Self {
        self.input = Some(input);
        self
    }

    /// Schedule a gesture `at_ms` on the clock.
    pub fn at(mut self, at_ms: u32, gesture: Gesture) -> Self {
        self.script.push((at_ms, gesture));
        self
    }

    pub fn advance(&mut self, ms: u32) {
        self.now = self.now.wrapping_add(ms);
        let Some(input) = self.input else {
            return;
        };
        // Stands in for the sampler, which honours a pending resync
        // before it delivers anything new.
        input.take_resync();
        let now = self.now;
        self.script.retain(|&(at, gesture)| {
            if at > now {
                return true;
            }
            match gesture {
                Gesture::Click => input.push_click(),
                Gesture::Steps(n) => input.push_steps(n),
            }
            false
        });
    }
}

impl DelayNs for ManualClock<'_> {
    fn delay_ns(&mut self, ns: u32) {
        let total = self.nanos as u64 + ns as u64;
        self.nanos = (total % 1_000_000) as u32;
        self.advance((total / 1_000_000) as u32);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.advance(ms);
    }
}

impl Clock for ManualClock<'_> {
    fn now_ms(&self) -> u32 {
        self.now
    }
}
