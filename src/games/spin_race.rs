//! "Spin Race": turn the knob 40 detents before ten seconds run out.
//!
//! The channel's delta cap is raised for the duration of the race so fast
//! spinning is counted instead of clamped to one step per read.

use core::fmt::Write;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use heapless::String;

use super::{format_millis, Minigame};
use crate::clock::{ticks_diff, Clock};
use crate::error::Error;
use crate::input::EventChannel;
use crate::ui::display::centered_text;
use crate::ui::Surface;

const NAME: &str = "Spin Race";

const GOAL_STEPS: u32 = 40;
const TIME_LIMIT_MS: u32 = 10_000;
const RACE_DELTA_CAP: i32 = 8;
const INTRO_MS: u32 = 1_500;
const RESULT_MS: u32 = 2_500;
const TICK_MS: u32 = 10;

const BAR_X: i32 = 14;
const BAR_WIDTH: u32 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Goal reached after `ms`.
    Finished { ms: u32 },
    /// Time ran out with `steps` counted.
    TimeUp { steps: u32 },
    /// The player clicked out after `steps`.
    Quit { steps: u32 },
}

#[derive(Default)]
pub struct SpinRace {
    last: Option<Outcome>,
}

impl SpinRace {
    pub const fn new() -> Self {
        Self { last: None }
    }

    pub fn last_outcome(&self) -> Option<Outcome> {
        self.last
    }
}

fn draw_progress<D: Surface>(display: &mut D, steps: u32, remaining_ms: u32) -> Result<(), Error> {
    let _ = display.clear(BinaryColor::Off);
    centered_text(display, NAME, 10);

    let _ = Rectangle::new(Point::new(BAR_X, 22), Size::new(BAR_WIDTH, 10))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(display);
    let fill = (BAR_WIDTH - 2) * steps.min(GOAL_STEPS) / GOAL_STEPS;
    if fill > 0 {
        let _ = Rectangle::new(Point::new(BAR_X + 1, 23), Size::new(fill, 8))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(display);
    }

    let mut line: String<20> = String::new();
    let _ = write!(line, "{}/{}  {}s", steps, GOAL_STEPS, remaining_ms / 1000);
    centered_text(display, &line, 46);
    display.present()
}

impl<D: Surface> Minigame<D> for SpinRace {
    fn name(&self) -> &'static str {
        NAME
    }

    fn run(
        &mut self,
        display: &mut D,
        input: &EventChannel,
        clock: &mut dyn Clock,
    ) -> Result<&'static str, Error> {
        let _cap = input.raise_cap(RACE_DELTA_CAP);

        let _ = display.clear(BinaryColor::Off);
        centered_text(display, NAME, 14);
        centered_text(display, "40 steps in 10s!", 32);
        centered_text(display, "Click to quit", 50);
        display.present()?;
        clock.delay_ms(INTRO_MS);

        input.reset();
        let start = clock.now_ms();
        let mut steps = 0u32;

        let outcome = loop {
            let elapsed = ticks_diff(clock.now_ms(), start);
            let event = input.read();
            steps += event.steps.unsigned_abs();
            if event.clicked {
                break Outcome::Quit { steps };
            }
            if steps >= GOAL_STEPS {
                break Outcome::Finished { ms: elapsed };
            }
            if elapsed >= TIME_LIMIT_MS {
                break Outcome::TimeUp { steps };
            }

            draw_progress(display, steps, TIME_LIMIT_MS - elapsed)?;
            clock.delay_ms(TICK_MS);
        };

        self.last = Some(outcome);
        info!("spinrace: {}", outcome);

        let mut detail: String<20> = String::new();
        let _ = display.clear(BinaryColor::Off);
        match outcome {
            Outcome::Finished { ms } => {
                centered_text(display, "You made it!", 24);
                let _ = write!(detail, "{}s", format_millis(ms));
            }
            Outcome::TimeUp { steps } => {
                centered_text(display, "Time up!", 24);
                let _ = write!(detail, "{}/{} steps", steps, GOAL_STEPS);
            }
            Outcome::Quit { steps } => {
                centered_text(display, "Quit", 24);
                let _ = write!(detail, "{}/{} steps", steps, GOAL_STEPS);
            }
        }
        centered_text(display, &detail, 42);
        display.present()?;
        clock.delay_ms(RESULT_MS);

        Ok(NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_DELTA_CAP;
    use crate::testing::{Frame, Gesture, ManualClock};

    #[test]
    fn fast_spins_count_past_the_default_cap() {
        let input = EventChannel::new();
        let mut clock = ManualClock::new(0).with_input(&input);
        for i in 0..14 {
            clock = clock.at(2_000 + i * 100, Gesture::Steps(3));
        }
        let mut frame = Frame::new();
        let mut game = SpinRace::new();

        assert_eq!(game.run(&mut frame, &input, &mut clock), Ok(NAME));
        match game.last_outcome() {
            Some(Outcome::Finished { ms }) => assert!(ms < TIME_LIMIT_MS),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(input.delta_cap(), DEFAULT_DELTA_CAP);
    }

    #[test]
    fn counter_clockwise_counts_too() {
        let input = EventChannel::new();
        let mut clock = ManualClock::new(0).with_input(&input);
        for i in 0..5 {
            clock = clock.at(2_000 + i * 100, Gesture::Steps(-8));
        }
        let mut frame = Frame::new();
        let mut game = SpinRace::new();

        game.run(&mut frame, &input, &mut clock).unwrap();
        assert!(matches!(game.last_outcome(), Some(Outcome::Finished { .. })));
    }

    #[test]
    fn slow_spinning_runs_out_of_time() {
        let input = EventChannel::new();
        let mut clock = ManualClock::new(0)
            .with_input(&input)
            .at(3_000, Gesture::Steps(5))
            .at(4_000, Gesture::Steps(5));
        let mut frame = Frame::new();
        let mut game = SpinRace::new();

        game.run(&mut frame, &input, &mut clock).unwrap();
        assert_eq!(game.last_outcome(), Some(Outcome::TimeUp { steps: 10 }));
    }

    #[test]
    fn click_quits_normally_and_restores_cap() {
        let input = EventChannel::new();
        let mut clock = ManualClock::new(0)
            .with_input(&input)
            .at(2_500, Gesture::Steps(4))
            .at(3_000, Gesture::Click);
        let mut frame = Frame::new();
        let mut game = SpinRace::new();

        assert_eq!(game.run(&mut frame, &input, &mut clock), Ok(NAME));
        assert_eq!(game.last_outcome(), Some(Outcome::Quit { steps: 4 }));
        assert_eq!(input.delta_cap(), DEFAULT_DELTA_CAP);
        // Result screen still shown before handing back.
        assert!(clock.now_ms() >= 3_000 + RESULT_MS);
    }
}
