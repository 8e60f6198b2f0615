#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure combat resolver that rolls strikes against armor.
//!
//! Armor is a target number rather than a modifier: a strike lands when the
//! natural d20 meets or beats the defender's armor. Randomness is injected
//! through the [`Dice`] trait so callers decide between seeded generators and
//! scripted rolls.

use grid_tactics_core::{DamageRange, StatBlock, Strike, StrikeOutcome, D20};
use rand::Rng;

/// Source of die rolls.
pub trait Dice {
    /// Rolls a single die with the given number of sides, returning `1..=sides`.
    ///
    /// A die with zero sides yields `1`.
    fn roll(&mut self, sides: u32) -> u32;
}

/// Dice backed by a random number generator.
#[derive(Debug)]
pub struct RandomDice<R> {
    rng: R,
}

impl<R: Rng> RandomDice<R> {
    /// Wraps the provided generator.
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Returns the wrapped generator.
    #[must_use]
    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: Rng> Dice for RandomDice<R> {
    fn roll(&mut self, sides: u32) -> u32 {
        if sides == 0 {
            return 1;
        }
        self.rng.gen_range(1..=sides)
    }
}

/// Dice that replay a fixed script of results, cycling once exhausted.
#[derive(Clone, Debug)]
pub struct ScriptedDice {
    rolls: Vec<u32>,
    cursor: usize,
}

impl ScriptedDice {
    /// Creates dice that return `rolls` in order.
    #[must_use]
    pub fn new(rolls: Vec<u32>) -> Self {
        Self { rolls, cursor: 0 }
    }

    /// Number of rolls consumed so far.
    #[must_use]
    pub const fn consumed(&self) -> usize {
        self.cursor
    }
}

impl Dice for ScriptedDice {
    fn roll(&mut self, sides: u32) -> u32 {
        if self.rolls.is_empty() {
            return 1;
        }
        let value = self.rolls[self.cursor % self.rolls.len()];
        self.cursor += 1;
        value.clamp(1, sides.max(1))
    }
}

/// Reports whether a natural roll lands against the provided armor.
#[must_use]
pub const fn is_hit(d20: u32, armor: u32) -> bool {
    d20 >= armor
}

/// Rolls an amount uniformly within the inclusive damage range.
pub fn roll_damage<D: Dice + ?Sized>(dice: &mut D, range: DamageRange) -> u32 {
    let sides = range.max() - range.min() + 1;
    dice.roll(sides) + range.min() - 1
}

/// Rolls a complete strike from an attacker against the target's armor.
///
/// Damage is only rolled when the d20 lands.
pub fn resolve_strike<D: Dice + ?Sized>(
    dice: &mut D,
    attacker: &StatBlock,
    target_armor: u32,
) -> Strike {
    let d20 = dice.roll(D20);
    let outcome = if is_hit(d20, target_armor) {
        StrikeOutcome::Hit {
            damage: roll_damage(dice, attacker.damage),
        }
    } else {
        StrikeOutcome::Miss
    };

    Strike {
        d20,
        armor: target_armor,
        outcome,
    }
}
