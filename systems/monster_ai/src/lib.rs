#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Greedy monster AI that walks toward the hero and strikes when adjacent.
//!
//! Each activated monster picks the free cell beside the hero that is closest
//! to it, then spends its movement one orthogonal step at a time, always
//! taking the free neighbour closest to that cell. Ties resolve in
//! [`Direction::SCAN_ORDER`], so the same board always yields the same moves.

use grid_tactics_core::{
    ActorId, CellCoord, CombatantSnapshot, Command, Direction, Event, MonsterId, OccupancyView,
    RosterView,
};
use grid_tactics_system_combat::{resolve_strike, Dice};

/// Progress reported after asking the active monster for its next action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pulse {
    /// The monster queued a step and will act again after the step delay.
    Stepped,
    /// The monster is done for this phase; the next one may be activated.
    Finished,
}

/// Monster AI system that turns activations into step and strike commands.
#[derive(Debug, Default)]
pub struct MonsterAi {
    active: Option<Activation>,
}

#[derive(Clone, Copy, Debug)]
struct Activation {
    monster: MonsterId,
    target: CellCoord,
}

impl MonsterAi {
    /// Creates a new monster AI with no active monster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes world events, choosing an approach target for each activation.
    ///
    /// The target is fixed for the whole activation: the attack position
    /// nearest to the monster at the moment it was activated, or the hero's
    /// cell when every attack position is taken.
    pub fn handle(
        &mut self,
        events: &[Event],
        hero: &CombatantSnapshot,
        roster: &RosterView,
        occupancy: OccupancyView<'_>,
    ) {
        for event in events {
            match event {
                Event::MonsterActivated { monster } => {
                    self.active = roster.get(*monster).map(|snapshot| {
                        let positions = attack_positions(hero.cell, occupancy);
                        Activation {
                            monster: *monster,
                            target: choose_target(snapshot.cell, &positions).unwrap_or(hero.cell),
                        }
                    });
                }
                Event::ActorSlain {
                    actor: ActorId::Monster(monster),
                    ..
                } if self.active_monster() == Some(*monster) => self.active = None,
                Event::TurnChanged { .. } | Event::LevelStarted { .. } | Event::HeroDefeated => {
                    self.active = None;
                }
                _ => {}
            }
        }
    }

    /// Emits the next command for the active monster.
    ///
    /// Returns [`Pulse::Stepped`] after queueing a step. Otherwise the monster
    /// strikes the hero if it stands beside it, and the activation ends.
    pub fn pulse<D: Dice + ?Sized>(
        &mut self,
        hero: &CombatantSnapshot,
        roster: &RosterView,
        occupancy: OccupancyView<'_>,
        dice: &mut D,
        out: &mut Vec<Command>,
    ) -> Pulse {
        let Some(activation) = self.active else {
            return Pulse::Finished;
        };
        let Some(monster) = roster.get(activation.monster) else {
            self.active = None;
            return Pulse::Finished;
        };
        if !hero.is_alive() {
            self.active = None;
            return Pulse::Finished;
        }

        let adjacent = monster.cell.is_adjacent(hero.cell);
        if monster.movement_left > 0 && !adjacent {
            if let Some(direction) = best_step(monster.cell, activation.target, occupancy) {
                out.push(Command::StepMonster {
                    monster: activation.monster,
                    direction,
                });
                return Pulse::Stepped;
            }
        }

        if adjacent {
            let strike = resolve_strike(dice, &monster.profile.stats, hero.profile.stats.armor);
            out.push(Command::Strike {
                attacker: monster.id,
                target: ActorId::Hero,
                strike,
            });
        }

        self.active = None;
        Pulse::Finished
    }

    /// Monster currently being driven and the cell it is heading for.
    #[must_use]
    pub fn active_target(&self) -> Option<(MonsterId, CellCoord)> {
        self.active
            .map(|activation| (activation.monster, activation.target))
    }

    fn active_monster(&self) -> Option<MonsterId> {
        self.active.map(|activation| activation.monster)
    }
}

/// Free cells orthogonally adjacent to the hero, in [`Direction::SCAN_ORDER`].
#[must_use]
pub fn attack_positions(hero: CellCoord, occupancy: OccupancyView<'_>) -> Vec<CellCoord> {
    Direction::SCAN_ORDER
        .into_iter()
        .filter_map(|direction| occupancy.free_neighbor(hero, direction))
        .collect()
}

/// Attack position closest to the monster; the earliest one wins ties.
#[must_use]
pub fn choose_target(monster: CellCoord, positions: &[CellCoord]) -> Option<CellCoord> {
    positions
        .iter()
        .enumerate()
        .min_by_key(|(index, cell)| (monster.manhattan_distance(**cell), *index))
        .map(|(_, cell)| *cell)
}

/// Free orthogonal step that ends closest to `target`.
///
/// The step is taken even when it does not shorten the distance; `None` only
/// when every neighbour is blocked or off the grid.
#[must_use]
pub fn best_step(from: CellCoord, target: CellCoord, occupancy: OccupancyView<'_>) -> Option<Direction> {
    Direction::SCAN_ORDER
        .into_iter()
        .enumerate()
        .filter_map(|(index, direction)| {
            occupancy
                .free_neighbor(from, direction)
                .map(|cell| (cell.manhattan_distance(target), index, direction))
        })
        .min_by_key(|(distance, index, _)| (*distance, *index))
        .map(|(_, _, direction)| direction)
}
