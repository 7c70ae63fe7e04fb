//! Minigames.
//!
//! A minigame takes over the display and the input channel until it is
//! done, then hands control back to the state machine. The state machine
//! resets the channel before and restores the delta cap after every run.

pub mod perfect_ten;
pub mod spin_race;

use heapless::Vec;

use crate::clock::Clock;
use crate::config::MAX_GAMES;
use crate::error::Error;
use crate::input::EventChannel;
use crate::ui::{GameSlot, Surface};

pub use perfect_ten::PerfectTen;
pub use spin_race::SpinRace;

/// Slot of "Perfect 10" in the standard table.
pub const PERFECT_TEN: GameSlot = GameSlot(0);
/// Slot of "Spin Race" in the standard table.
pub const SPIN_RACE: GameSlot = GameSlot(1);

pub trait Minigame<D: Surface> {
    fn name(&self) -> &'static str;

    /// Run to completion. Must return on its own: by click, timeout or a
    /// fixed duration. Returns the game's display name.
    fn run(
        &mut self,
        display: &mut D,
        input: &EventChannel,
        clock: &mut dyn Clock,
    ) -> Result<&'static str, Error>;
}

/// Minigames addressed by [`GameSlot`].
pub struct GameTable<'a, D: Surface> {
    games: Vec<&'a mut dyn Minigame<D>, MAX_GAMES>,
}

impl<'a, D: Surface> GameTable<'a, D> {
    pub fn new() -> Self {
        Self { games: Vec::new() }
    }

    /// Add a game in the next free slot. Fails if the table is full.
    pub fn register(&mut self, game: &'a mut dyn Minigame<D>) -> Result<GameSlot, Error> {
        let slot = GameSlot(self.games.len() as u8);
        self.games
            .push(game)
            .map_err(|_| Error::Game("Too many games"))?;
        Ok(slot)
    }

    pub fn get_mut(&mut self, slot: GameSlot) -> Option<&mut (dyn Minigame<D> + 'a)> {
        self.games.get_mut(slot.0 as usize).map(|game| &mut **game)
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

impl<D: Surface> Default for GameTable<'_, D> {
    fn default() -> Self {
        Self::new()
    }
}

/// Render `seconds.millis` into a small buffer, e.g. `9.874`.
pub(crate) fn format_millis(ms: u32) -> heapless::String<12> {
    use core::fmt::Write;

    let mut out = heapless::String::new();
    let _ = write!(out, "{}.{:03}", ms / 1000, ms % 1000);
    out
}
