//! Catch probability and the random roll behind it

use rand::Rng;

use crate::data::Pokemon;

/// Chance of catching a pokemon with the given base experience
///
/// | base experience | chance |
/// |-----------------|--------|
/// | < 70            | 0.85   |
/// | < 160           | 0.50   |
/// | < 250           | 0.25   |
/// | otherwise       | 0.10   |
pub fn catch_chance(base_experience: u32) -> f64 {
    match base_experience {
        0..=69 => 0.85,
        70..=159 => 0.50,
        160..=249 => 0.25,
        _ => 0.10,
    }
}

/// Source of uniform floats in `[0, 1)`
pub trait Roll {
    fn roll(&mut self) -> f64;
}

/// `Roll` backed by the thread-local RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomRoll;

impl Roll for RandomRoll {
    fn roll(&mut self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// A pokemon stored in the pokedex together with the chance it was caught at
#[derive(Debug, Clone, PartialEq)]
pub struct CaughtPokemon {
    pub pokemon: Pokemon,
    pub catch_chance: f64,
}

/// Outcome of a single throw
#[derive(Debug, Clone, PartialEq)]
pub enum CatchOutcome {
    Caught(CaughtPokemon),
    Escaped { catch_chance: f64 },
}

/// Attempts a catch with one draw from `roll`
///
/// Succeeds iff the draw is strictly below the pokemon's catch chance.
pub fn attempt_catch<R: Roll + ?Sized>(pokemon: Pokemon, roll: &mut R) -> CatchOutcome {
    let chance = catch_chance(pokemon.base_experience);
    let draw = roll.roll();
    tracing::debug!(name = %pokemon.name, chance, draw, "catch roll");

    if draw < chance {
        CatchOutcome::Caught(CaughtPokemon {
            pokemon,
            catch_chance: chance,
        })
    } else {
        CatchOutcome::Escaped {
            catch_chance: chance,
        }
    }
}
