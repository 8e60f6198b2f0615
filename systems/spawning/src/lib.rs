#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spawning system responsible for laying out the hero and each level's roster.

use grid_tactics_core::{CellCoord, Command, MonsterKind, MonsterSpawn};
use grid_tactics_system_bestiary::monster;
use rand::{seq::SliceRandom, Rng};

/// Roster size before the level is added.
pub const BASE_ROSTER_SIZE: u32 = 2;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    base_roster_size: u32,
}

impl Config {
    /// Creates a new configuration using the provided base roster size.
    #[must_use]
    pub const fn new(base_roster_size: u32) -> Self {
        Self { base_roster_size }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(BASE_ROSTER_SIZE)
    }
}

/// System that emits `Command::StartLevel` with randomly placed actors.
#[derive(Debug)]
pub struct Spawning {
    base_roster_size: u32,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            base_roster_size: config.base_roster_size,
        }
    }

    /// Number of monsters a level should field.
    #[must_use]
    pub fn roster_size(&self, level: u32) -> u32 {
        self.base_roster_size.saturating_add(level)
    }

    /// Plans the given level on an empty board of the provided dimensions.
    ///
    /// The hero lands first, then each monster takes a distinct free cell with
    /// a uniformly chosen kind scaled to `level`. A board too small for the
    /// whole roster receives as many monsters as it has room for; a board
    /// without cells receives no command at all.
    pub fn plan_level<R: Rng + ?Sized>(
        &self,
        level: u32,
        columns: u32,
        rows: u32,
        rng: &mut R,
        out: &mut Vec<Command>,
    ) {
        let mut free: Vec<CellCoord> = (0..rows)
            .flat_map(|row| (0..columns).map(move |column| CellCoord::new(column, row)))
            .collect();

        let Some(hero_cell) = take_random(&mut free, rng) else {
            return;
        };

        let mut monsters = Vec::new();
        for _ in 0..self.roster_size(level) {
            let Some(kind) = MonsterKind::ALL.choose(rng).copied() else {
                break;
            };
            let Some(cell) = take_random(&mut free, rng) else {
                break;
            };
            monsters.push(MonsterSpawn {
                kind,
                profile: monster(kind, level),
                cell,
            });
        }

        out.push(Command::StartLevel {
            hero_cell,
            monsters,
        });
    }
}

impl Default for Spawning {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

fn take_random<R: Rng + ?Sized>(cells: &mut Vec<CellCoord>, rng: &mut R) -> Option<CellCoord> {
    if cells.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..cells.len());
    Some(cells.swap_remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn empty_board_emits_nothing() {
        let spawning = Spawning::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut out = Vec::new();
        spawning.plan_level(1, 0, 0, &mut rng, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn roster_grows_with_level() {
        let spawning = Spawning::new(Config::default());
        assert_eq!(spawning.roster_size(1), 3);
        assert_eq!(spawning.roster_size(4), 6);
    }
}
