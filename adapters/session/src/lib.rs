#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn controller that runs a Grid Tactics combat session.
//!
//! The session wires the authoritative world to the spawning, combat and
//! monster AI systems. Player input arrives through [`Session::click`],
//! [`Session::move_hero`], [`Session::attack`] and [`Session::end_turn`];
//! paced work (the monster phase and level transitions) waits on a single
//! simulated timer that the host drives with [`Session::advance`]. Every call
//! returns the world events it produced, which is all a renderer needs.

mod config;
mod selection;

use std::{collections::VecDeque, fmt, time::Duration};

use grid_tactics_core::{
    ActorId, CellCoord, Command, EntityProfile, Event, MonsterId, TurnPhase, UnknownEntityType,
};
use grid_tactics_system_combat::{resolve_strike, RandomDice};
use grid_tactics_system_monster_ai::{MonsterAi, Pulse};
use grid_tactics_system_spawning::Spawning;
use grid_tactics_world::{self as world, query, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

pub use config::SessionConfig;
pub use selection::{selected_hero, EmptyStore, SelectionStore, PLAYER_CHARACTER_KEY};

/// Errors raised while constructing a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The stored character selection does not name a hero class.
    #[error("invalid stored character selection")]
    Selection(#[from] UnknownEntityType),
}

/// Lifecycle of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    /// Created but not yet started.
    Idle,
    /// Accepting input.
    Playing,
    /// The hero fell; no further input is accepted.
    GameOver,
}

/// What a click on a cell would do, so the host can confirm or alert first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClickIntent {
    /// Strike the adjacent monster standing on the cell.
    Attack {
        /// Monster that would be struck.
        monster: MonsterId,
    },
    /// The cell holds an adjacent monster but the hero already attacked.
    AttackSpent,
    /// Step onto the adjacent free cell.
    Move,
    /// Nothing happens.
    Ignore,
}

/// Status line describing the current turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TurnSummary {
    /// Level being played.
    pub level: u32,
    /// Phase that owns the board.
    pub phase: TurnPhase,
    /// Hero movement units left.
    pub movement_left: u32,
    /// Whether the hero may still attack.
    pub can_attack: bool,
}

impl fmt::Display for TurnSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.phase {
            TurnPhase::Player => write!(
                f,
                "Level {}: player | moves: {} | attack: {}",
                self.level,
                self.movement_left,
                if self.can_attack { "yes" } else { "no" }
            ),
            TurnPhase::Monsters => write!(f, "Level {}: monsters' turn", self.level),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Wake {
    MonsterPhase,
    MonsterStep,
    NextLevel,
}

#[derive(Clone, Copy, Debug)]
struct Timer {
    remaining: Duration,
    wake: Wake,
}

/// A single combat session from level one until the hero falls.
#[derive(Debug)]
pub struct Session<R = ChaCha8Rng> {
    config: SessionConfig,
    world: World,
    spawning: Spawning,
    monster_ai: MonsterAi,
    rng: R,
    status: SessionStatus,
    timer: Option<Timer>,
    pending_monsters: VecDeque<MonsterId>,
}

impl Session<ChaCha8Rng> {
    /// Creates a session for the hero chosen in `store`, seeding dice from the config.
    pub fn new<S: SelectionStore + ?Sized>(
        config: SessionConfig,
        store: &S,
    ) -> Result<Self, SessionError> {
        let hero = selected_hero(store)?;
        let rng = ChaCha8Rng::seed_from_u64(config.rng_seed);
        Ok(Self::with_rng(config, hero, rng))
    }
}

impl<R: Rng> Session<R> {
    /// Creates a session for the provided hero, drawing randomness from `rng`.
    #[must_use]
    pub fn with_rng(config: SessionConfig, hero: EntityProfile, rng: R) -> Self {
        Self {
            config,
            world: World::new(hero),
            spawning: Spawning::default(),
            monster_ai: MonsterAi::new(),
            rng,
            status: SessionStatus::Idle,
            timer: None,
            pending_monsters: VecDeque::new(),
        }
    }

    /// Lays out the arena and starts the first level. Later calls do nothing.
    pub fn start(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if self.status != SessionStatus::Idle {
            return events;
        }

        self.status = SessionStatus::Playing;
        tracing::info!(
            hero = %self.hero_profile().kind,
            board_size = self.config.board_size,
            seed = self.config.rng_seed,
            "session started"
        );
        self.dispatch(
            Command::ConfigureArena {
                columns: self.config.board_size,
                rows: self.config.board_size,
            },
            &mut events,
        );
        self.start_level(&mut events);
        events
    }

    /// Classifies a click on `cell` without changing any state.
    #[must_use]
    pub fn click(&self, cell: CellCoord) -> ClickIntent {
        if self.status != SessionStatus::Playing || query::phase(&self.world) != TurnPhase::Player
        {
            return ClickIntent::Ignore;
        }

        let hero = query::hero(&self.world);
        if !hero.cell.is_adjacent(cell) {
            return ClickIntent::Ignore;
        }

        match query::occupant(&self.world, cell) {
            Some(ActorId::Monster(monster)) if hero.can_attack => ClickIntent::Attack { monster },
            Some(ActorId::Monster(_)) => ClickIntent::AttackSpent,
            Some(ActorId::Hero) => ClickIntent::Ignore,
            None if hero.movement_left > 0 && query::occupancy_view(&self.world).is_free(cell) => {
                ClickIntent::Move
            }
            None => ClickIntent::Ignore,
        }
    }

    /// Steps the hero onto an adjacent free cell.
    pub fn move_hero(&mut self, to: CellCoord) -> Vec<Event> {
        let mut events = Vec::new();
        if self.status == SessionStatus::Playing {
            self.dispatch(Command::MoveHero { to }, &mut events);
        }
        events
    }

    /// Strikes the monster standing on `cell`.
    pub fn attack(&mut self, cell: CellCoord) -> Vec<Event> {
        let mut events = Vec::new();
        if self.status != SessionStatus::Playing {
            return events;
        }
        let Some(ActorId::Monster(monster)) = query::occupant(&self.world, cell) else {
            tracing::debug!(?cell, "attack ignored: no monster on the cell");
            return events;
        };
        let Some(target) = query::monster(&self.world, monster) else {
            return events;
        };

        let hero = query::hero(&self.world);
        let mut dice = RandomDice::new(&mut self.rng);
        let strike = resolve_strike(&mut dice, &hero.profile.stats, target.profile.stats.armor);
        self.dispatch(
            Command::Strike {
                attacker: ActorId::Hero,
                target: ActorId::Monster(monster),
                strike,
            },
            &mut events,
        );
        events
    }

    /// Hands control to the monsters after the phase start delay.
    ///
    /// Ignored outside the player turn and while the next level is pending.
    pub fn end_turn(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if self.status != SessionStatus::Playing || self.is_level_transition_pending() {
            tracing::debug!(status = ?self.status, "end turn ignored");
            return events;
        }

        self.dispatch(Command::EndPlayerTurn, &mut events);
        let entered_monster_phase = events.contains(&Event::TurnChanged {
            phase: TurnPhase::Monsters,
        });
        if entered_monster_phase {
            self.schedule(Wake::MonsterPhase, self.config.monster_phase_delay());
        }
        events
    }

    /// Advances simulated time, firing every timer that elapses within `dt`.
    pub fn advance(&mut self, dt: Duration) -> Vec<Event> {
        let mut events = Vec::new();
        let mut budget = dt;

        while let Some(timer) = self.timer.as_mut() {
            if timer.remaining > budget {
                timer.remaining -= budget;
                break;
            }
            budget -= timer.remaining;
            let wake = timer.wake;
            self.timer = None;
            self.wake(wake, &mut events);
        }

        events
    }

    /// Cells the hero may step onto, for highlighting.
    #[must_use]
    pub fn highlights(&self) -> Vec<CellCoord> {
        if self.status != SessionStatus::Playing {
            return Vec::new();
        }
        query::movement_options(&self.world)
    }

    /// Current status line.
    #[must_use]
    pub fn summary(&self) -> TurnSummary {
        let hero = query::hero(&self.world);
        TurnSummary {
            level: query::level(&self.world),
            phase: query::phase(&self.world),
            movement_left: hero.movement_left,
            can_attack: hero.can_attack,
        }
    }

    /// Lifecycle state of the session.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Reports whether a cleared level is waiting for the next one to start.
    #[must_use]
    pub fn is_level_transition_pending(&self) -> bool {
        matches!(
            self.timer,
            Some(Timer {
                wake: Wake::NextLevel,
                ..
            })
        )
    }

    /// Time left until the pending timer fires, if one is armed.
    #[must_use]
    pub fn time_until_wake(&self) -> Option<Duration> {
        self.timer.map(|timer| timer.remaining)
    }

    /// Authoritative world, for use with [`grid_tactics_world::query`].
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Configuration the session was created with.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn hero_profile(&self) -> EntityProfile {
        query::hero(&self.world).profile
    }

    fn schedule(&mut self, wake: Wake, delay: Duration) {
        tracing::debug!(?wake, ?delay, "timer armed");
        self.timer = Some(Timer {
            remaining: delay,
            wake,
        });
    }

    fn wake(&mut self, wake: Wake, events: &mut Vec<Event>) {
        match wake {
            Wake::MonsterPhase => {
                self.pending_monsters = query::roster_view(&self.world)
                    .iter()
                    .filter_map(|snapshot| match snapshot.id {
                        ActorId::Monster(monster) => Some(monster),
                        ActorId::Hero => None,
                    })
                    .collect();
                self.run_monster_phase(events);
            }
            Wake::MonsterStep => self.run_monster_phase(events),
            Wake::NextLevel => self.start_level(events),
        }
    }

    fn start_level(&mut self, events: &mut Vec<Event>) {
        let (columns, rows) = query::dimensions(&self.world);
        let mut commands = Vec::new();
        self.spawning.plan_level(
            query::level(&self.world),
            columns,
            rows,
            &mut self.rng,
            &mut commands,
        );
        for command in commands {
            self.dispatch(command, events);
        }
    }

    /// Drives monsters in roster order until one steps, which arms the step
    /// timer, or until every monster has acted.
    fn run_monster_phase(&mut self, events: &mut Vec<Event>) {
        while self.status == SessionStatus::Playing {
            if self.monster_ai.active_target().is_none() {
                let Some(monster) = self.pending_monsters.pop_front() else {
                    self.dispatch(Command::EndMonsterPhase, events);
                    return;
                };
                self.dispatch(Command::ActivateMonster { monster }, events);
                if self.monster_ai.active_target().is_none() {
                    continue;
                }
            }

            let mut commands = Vec::new();
            let pulse = {
                let hero = query::hero(&self.world);
                let roster = query::roster_view(&self.world);
                let mut dice = RandomDice::new(&mut self.rng);
                self.monster_ai.pulse(
                    &hero,
                    &roster,
                    query::occupancy_view(&self.world),
                    &mut dice,
                    &mut commands,
                )
            };
            for command in commands {
                self.dispatch(command, events);
            }

            if pulse == Pulse::Stepped && self.status == SessionStatus::Playing {
                self.schedule(Wake::MonsterStep, self.config.monster_step_delay());
                return;
            }
        }
    }

    /// Applies a command to the world and lets the session and the monster AI
    /// react to what happened.
    fn dispatch(&mut self, command: Command, events: &mut Vec<Event>) {
        let mut produced = Vec::new();
        world::apply(&mut self.world, command, &mut produced);
        if produced.is_empty() {
            return;
        }

        self.monster_ai.handle(
            &produced,
            &query::hero(&self.world),
            &query::roster_view(&self.world),
            query::occupancy_view(&self.world),
        );

        for event in &produced {
            match event {
                Event::LevelCleared { level } => {
                    tracing::info!(level, next = query::level(&self.world), "next level scheduled");
                    self.schedule(Wake::NextLevel, self.config.next_level_delay());
                }
                Event::HeroDefeated => {
                    tracing::info!(level = query::level(&self.world), "game over");
                    self.status = SessionStatus::GameOver;
                    self.timer = None;
                    self.pending_monsters.clear();
                }
                _ => {}
            }
        }

        events.append(&mut produced);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_reads_like_a_status_line() {
        let player = TurnSummary {
            level: 2,
            phase: TurnPhase::Player,
            movement_left: 3,
            can_attack: false,
        };
        assert_eq!(player.to_string(), "Level 2: player | moves: 3 | attack: no");

        let monsters = TurnSummary {
            phase: TurnPhase::Monsters,
            ..player
        };
        assert_eq!(monsters.to_string(), "Level 2: monsters' turn");
    }

    #[test]
    fn input_before_start_is_ignored() {
        let mut session =
            Session::new(SessionConfig::default(), &EmptyStore).expect("default hero");
        assert_eq!(session.status(), SessionStatus::Idle);
        assert_eq!(session.click(CellCoord::new(0, 0)), ClickIntent::Ignore);
        assert!(session.end_turn().is_empty());
        assert!(session.highlights().is_empty());
        assert!(session.advance(Duration::from_secs(5)).is_empty());
    }

    #[test]
    fn start_only_runs_once() {
        let mut session =
            Session::new(SessionConfig::default(), &EmptyStore).expect("default hero");
        assert!(!session.start().is_empty());
        assert!(session.start().is_empty());
    }
}
