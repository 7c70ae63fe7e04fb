//! Care actions invoked from the menu.
//!
//! Each handler mutates the pet and returns the notice to show. A handler
//! that refuses (e.g. medicine for a healthy pet) returns an error; the
//! state machine turns that into a banner.

use rand_core::RngCore;

use super::{Mood, Notice, Pet, Stat};
use crate::config::{PLAY_ENERGY_COST, PLAY_HAPPINESS_GAIN};
use crate::error::Error;

/// Signature shared by all menu action handlers.
pub type ActionFn = fn(&mut Pet, &mut dyn RngCore) -> Result<Notice, Error>;

pub fn feed(pet: &mut Pet, _rng: &mut dyn RngCore) -> Result<Notice, Error> {
    pet.stats.adjust(Stat::Hunger, 25);
    pet.stats.adjust(Stat::Health, 5);
    pet.mood = Mood::Happy;
    Ok(Notice::new("Yum!", "Hunger +25"))
}

pub fn snack(pet: &mut Pet, rng: &mut dyn RngCore) -> Result<Notice, Error> {
    pet.stats.adjust(Stat::Hunger, 10);
    pet.stats.adjust(Stat::Happiness, 10);
    pet.stats.adjust(Stat::Health, -3);
    // Treats only sometimes win the pet over.
    if rng.next_u32() % 3 == 0 {
        pet.mood = Mood::Love;
    }
    Ok(Notice::new("Crunch!", "Joy +10"))
}

pub fn rest(pet: &mut Pet, _rng: &mut dyn RngCore) -> Result<Notice, Error> {
    pet.stats.adjust(Stat::Energy, 30);
    pet.stats.adjust(Stat::Hunger, -5);
    Ok(Notice::new("Zzz...", "Energy +30"))
}

pub fn medicine(pet: &mut Pet, _rng: &mut dyn RngCore) -> Result<Notice, Error> {
    if pet.stats.get(Stat::Health).is_full() {
        return Err(Error::Handler("Not sick!"));
    }
    pet.stats.adjust(Stat::Health, 20);
    pet.stats.adjust(Stat::Happiness, -5);
    pet.mood = Mood::Pouting;
    Ok(Notice::new("Gulp.", "Health +20"))
}

pub fn cuddle(pet: &mut Pet, _rng: &mut dyn RngCore) -> Result<Notice, Error> {
    pet.stats.adjust(Stat::Happiness, 15);
    pet.mood = Mood::Love;
    Ok(Notice::new("<3", "Joy +15"))
}

/// Fixed effect of finishing any minigame.
pub fn play(pet: &mut Pet) {
    pet.stats.adjust(Stat::Happiness, PLAY_HAPPINESS_GAIN);
    pet.stats.adjust(Stat::Energy, -PLAY_ENERGY_COST);
    pet.mood = Mood::Happy;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pet::Stats;
    use rand_core::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn actions_never_push_gauges_past_100() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut pet = Pet::new();
        pet.stats = Stats::uniform(95);
        let handlers: [ActionFn; 4] = [feed, snack, rest, cuddle];
        for _ in 0..10 {
            for handler in handlers {
                handler(&mut pet, &mut rng).unwrap();
            }
        }
        for stat in Stat::ALL {
            assert!(pet.stats.get(stat).value() <= 100);
        }
        assert_eq!(pet.stats.get(Stat::Energy).value(), 100);
    }

    #[test]
    fn medicine_refuses_when_healthy() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut pet = Pet::new();
        pet.stats = Stats::uniform(100);
        assert_eq!(medicine(&mut pet, &mut rng), Err(Error::Handler("Not sick!")));
        assert_eq!(pet.stats.get(Stat::Happiness).value(), 100);
    }

    #[test]
    fn medicine_heals_a_sick_pet() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut pet = Pet::new();
        pet.stats = Stats::uniform(40);
        medicine(&mut pet, &mut rng).unwrap();
        assert_eq!(pet.stats.get(Stat::Health).value(), 60);
        assert_eq!(pet.mood, Mood::Pouting);
    }

    #[test]
    fn play_trades_energy_for_happiness() {
        let mut pet = Pet::new();
        pet.stats = Stats::uniform(50);
        pet.mood = Mood::Sad;
        play(&mut pet);
        assert_eq!(pet.stats.get(Stat::Happiness).value(), 65);
        assert_eq!(pet.stats.get(Stat::Energy).value(), 40);
        assert_eq!(pet.mood, Mood::Happy);
    }
}
