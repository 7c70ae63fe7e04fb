//! The pet itself: stat gauges, mood, settings and cached readings.
//!
//! [`Pet`] is the single application context. Background ticks and menu
//! actions take it by `&mut` instead of reaching for globals.

pub mod actions;

use rand_core::RngCore;

use crate::config::STAT_START_VALUE;
use crate::env::Readings;

/// A value clamped to `0..=100`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Gauge(u8);

impl Gauge {
    pub const MAX: u8 = 100;

    pub const fn new(value: u8) -> Self {
        Self(if value > Self::MAX { Self::MAX } else { value })
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Add a signed amount, clamping at both ends.
    pub fn adjust(&mut self, delta: i16) {
        let next = (self.0 as i16 + delta).clamp(0, Self::MAX as i16);
        self.0 = next as u8;
    }

    pub fn is_full(self) -> bool {
        self.0 == Self::MAX
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Stat {
    Hunger,
    Energy,
    Happiness,
    Health,
}

impl Stat {
    pub const ALL: [Stat; 4] = [Stat::Hunger, Stat::Energy, Stat::Happiness, Stat::Health];

    /// Three-letter label for the stats screen.
    pub fn short_label(self) -> &'static str {
        match self {
            Stat::Hunger => "HUN",
            Stat::Energy => "ENG",
            Stat::Happiness => "JOY",
            Stat::Health => "HP",
        }
    }
}

/// The pet's gauges. Hunger reads as "how fed": 100 is full.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Stats {
    hunger: Gauge,
    energy: Gauge,
    happiness: Gauge,
    health: Gauge,
}

impl Stats {
    pub const fn uniform(value: u8) -> Self {
        Self {
            hunger: Gauge::new(value),
            energy: Gauge::new(value),
            happiness: Gauge::new(value),
            health: Gauge::new(value),
        }
    }

    pub fn get(&self, stat: Stat) -> Gauge {
        match stat {
            Stat::Hunger => self.hunger,
            Stat::Energy => self.energy,
            Stat::Happiness => self.happiness,
            Stat::Health => self.health,
        }
    }

    fn gauge_mut(&mut self, stat: Stat) -> &mut Gauge {
        match stat {
            Stat::Hunger => &mut self.hunger,
            Stat::Energy => &mut self.energy,
            Stat::Happiness => &mut self.happiness,
            Stat::Health => &mut self.health,
        }
    }

    pub fn adjust(&mut self, stat: Stat, delta: i16) {
        self.gauge_mut(stat).adjust(delta);
    }

    /// Lower every gauge by `amount`, stopping at 0.
    pub fn decay(&mut self, amount: u8) {
        for stat in Stat::ALL {
            self.adjust(stat, -(amount as i16));
        }
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::uniform(STAT_START_VALUE)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mood {
    #[default]
    Happy,
    Sad,
    Bored,
    Love,
    Pouting,
}

impl Mood {
    pub const ALL: [Mood; 5] = [Mood::Happy, Mood::Sad, Mood::Bored, Mood::Love, Mood::Pouting];

    pub fn random(rng: &mut dyn RngCore) -> Mood {
        Self::ALL[(rng.next_u32() % Self::ALL.len() as u32) as usize]
    }
}

/// User-facing switches flipped by toggle menu items.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    /// Draw rain regardless of the actual weather.
    pub rain_overlay: bool,
    /// Show temperatures in Celsius instead of Fahrenheit.
    pub celsius: bool,
}

/// Settings a toggle item can flip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Toggle {
    RainOverlay,
    Celsius,
}

impl Settings {
    pub fn get(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::RainOverlay => self.rain_overlay,
            Toggle::Celsius => self.celsius,
        }
    }

    /// Flip a setting and return its new value.
    pub fn flip(&mut self, toggle: Toggle) -> bool {
        let slot = match toggle {
            Toggle::RainOverlay => &mut self.rain_overlay,
            Toggle::Celsius => &mut self.celsius,
        };
        *slot = !*slot;
        *slot
    }
}

/// Text for the message screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Notice {
    pub title: &'static str,
    pub subtitle: &'static str,
}

impl Notice {
    pub const fn new(title: &'static str, subtitle: &'static str) -> Self {
        Self { title, subtitle }
    }
}

/// Everything the pet knows about itself and its surroundings.
#[derive(Clone, Debug, Default)]
pub struct Pet {
    pub stats: Stats,
    pub mood: Mood,
    pub settings: Settings,
    pub readings: Readings,
    frame: u8,
}

impl Pet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current animation frame, 0 or 1.
    pub fn frame(&self) -> u8 {
        self.frame
    }

    pub fn advance_frame(&mut self) {
        self.frame = (self.frame + 1) % 2;
    }

    /// Periodic mood drift. Half the time nothing happens so the pet does
    /// not change on a visible schedule. Returns `true` if a new mood was
    /// rolled.
    pub fn drift_mood(&mut self, rng: &mut dyn RngCore) -> bool {
        if rng.next_u32() & 1 == 0 {
            debug!("mood: change skipped");
            return false;
        }
        self.mood = Mood::random(rng);
        info!("mood: now {}", self.mood);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn gauge_clamps_on_construction_and_adjust() {
        assert_eq!(Gauge::new(250).value(), 100);
        let mut g = Gauge::new(95);
        g.adjust(20);
        assert_eq!(g.value(), 100);
        assert!(g.is_full());
        g.adjust(-300);
        assert_eq!(g.value(), 0);
    }

    #[test]
    fn repeated_decay_stops_at_zero() {
        let mut stats = Stats::uniform(7);
        for _ in 0..50 {
            stats.decay(3);
        }
        for stat in Stat::ALL {
            assert_eq!(stats.get(stat).value(), 0);
        }
    }

    #[test]
    fn decay_touches_every_gauge() {
        let mut stats = Stats::uniform(50);
        stats.decay(2);
        for stat in Stat::ALL {
            assert_eq!(stats.get(stat).value(), 48);
        }
    }

    #[test]
    fn settings_flip_round_trips() {
        let mut s = Settings::default();
        assert!(s.flip(Toggle::Celsius));
        assert!(s.get(Toggle::Celsius));
        assert!(!s.flip(Toggle::Celsius));
        assert!(!s.get(Toggle::RainOverlay));
    }

    #[test]
    fn animation_cycles_two_frames() {
        let mut pet = Pet::new();
        assert_eq!(pet.frame(), 0);
        pet.advance_frame();
        assert_eq!(pet.frame(), 1);
        pet.advance_frame();
        assert_eq!(pet.frame(), 0);
    }

    #[test]
    fn mood_drift_sometimes_skips() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut pet = Pet::new();
        let changed = (0..200).filter(|_| pet.drift_mood(&mut rng)).count();
        assert!(changed > 50 && changed < 150, "changed {changed} of 200");
    }
}
