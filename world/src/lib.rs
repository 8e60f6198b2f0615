#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative arena state management for Grid Tactics.
//!
//! The world owns the occupancy grid, the hero, the monster roster, the turn
//! phase and the level counter. It never rolls dice or picks cells on its own:
//! every mutation arrives as a [`Command`] and every observable consequence
//! leaves as an [`Event`]. Commands that break a movement rule are dropped
//! silently; commands that break a turn rule produce
//! [`Event::ActionRejected`].

use grid_tactics_core::{
    ActorId, CellCoord, Command, CombatantSnapshot, Direction, EntityProfile, Event, MonsterId,
    MonsterSpawn, Strike, TurnPhase, TurnViolation,
};

const DEFAULT_ARENA_COLUMNS: u32 = 10;
const DEFAULT_ARENA_ROWS: u32 = 10;
const FIRST_LEVEL: u32 = 1;

/// Represents the authoritative combat arena.
#[derive(Debug)]
pub struct World {
    columns: u32,
    rows: u32,
    occupancy: OccupancyGrid,
    hero: Combatant,
    monsters: Vec<Combatant>,
    phase: TurnPhase,
    level: u32,
    next_monster_id: u32,
    hero_defeated: bool,
}

impl World {
    /// Creates a new arena with the default dimensions and the provided hero.
    ///
    /// The hero joins the board once the first [`Command::StartLevel`] arrives.
    #[must_use]
    pub fn new(hero: EntityProfile) -> Self {
        Self {
            columns: DEFAULT_ARENA_COLUMNS,
            rows: DEFAULT_ARENA_ROWS,
            occupancy: OccupancyGrid::new(DEFAULT_ARENA_COLUMNS, DEFAULT_ARENA_ROWS),
            hero: Combatant::new(ActorId::Hero, hero, CellCoord::new(0, 0)),
            monsters: Vec::new(),
            phase: TurnPhase::Player,
            level: FIRST_LEVEL,
            next_monster_id: 0,
            hero_defeated: false,
        }
    }

    fn monster_index(&self, monster: MonsterId) -> Option<usize> {
        self.monsters
            .iter()
            .position(|combatant| combatant.id == ActorId::Monster(monster))
    }

    fn combatant(&self, actor: ActorId) -> Option<&Combatant> {
        match actor {
            ActorId::Hero => Some(&self.hero),
            ActorId::Monster(monster) => self.monster_index(monster).map(|index| &self.monsters[index]),
        }
    }

    fn combatant_mut(&mut self, actor: ActorId) -> Option<&mut Combatant> {
        match actor {
            ActorId::Hero => Some(&mut self.hero),
            ActorId::Monster(monster) => {
                let index = self.monster_index(monster)?;
                Some(&mut self.monsters[index])
            }
        }
    }

    fn allocate_monster_id(&mut self) -> MonsterId {
        let id = MonsterId::new(self.next_monster_id);
        self.next_monster_id = self.next_monster_id.saturating_add(1);
        id
    }

    fn restore_hero_budget(&mut self) {
        self.hero.movement_left = self.hero.profile.stats.movement_range;
        self.hero.can_attack = true;
    }

    fn start_level(&mut self, hero_cell: CellCoord, monsters: Vec<MonsterSpawn>, out: &mut Vec<Event>) {
        if !self.occupancy.contains(hero_cell) {
            tracing::debug!(?hero_cell, "level start refused: hero cell outside the arena");
            return;
        }

        self.occupancy.clear();
        self.monsters.clear();

        self.hero.cell = hero_cell;
        self.occupancy.occupy(ActorId::Hero, hero_cell);
        self.restore_hero_budget();
        tracing::info!(level = self.level, ?hero_cell, "level started");
        out.push(Event::LevelStarted {
            level: self.level,
            hero_cell,
        });

        for spawn in monsters {
            if !self.occupancy.is_free(spawn.cell) {
                tracing::debug!(cell = ?spawn.cell, kind = %spawn.kind, "spawn skipped: cell unavailable");
                continue;
            }

            let id = self.allocate_monster_id();
            let actor = ActorId::Monster(id);
            let monster = Combatant::new(actor, spawn.profile, spawn.cell);
            self.occupancy.occupy(actor, spawn.cell);
            out.push(Event::MonsterSpawned {
                monster: id,
                kind: spawn.kind,
                cell: spawn.cell,
                hp: monster.hp,
            });
            self.monsters.push(monster);
        }

        self.phase = TurnPhase::Player;
        out.push(Event::TurnChanged {
            phase: TurnPhase::Player,
        });
    }

    fn move_hero(&mut self, to: CellCoord, out: &mut Vec<Event>) {
        if self.phase != TurnPhase::Player {
            out.push(Event::ActionRejected {
                reason: TurnViolation::NotPlayerTurn,
            });
            return;
        }

        let from = self.hero.cell;
        if let Err(refusal) = self.check_step(&self.hero, to) {
            tracing::debug!(?from, ?to, ?refusal, "hero move ignored");
            return;
        }

        self.occupancy.vacate(from);
        self.occupancy.occupy(ActorId::Hero, to);
        self.hero.cell = to;
        self.hero.movement_left -= 1;
        out.push(Event::HeroMoved {
            from,
            to,
            movement_left: self.hero.movement_left,
        });
    }

    fn step_monster(&mut self, monster: MonsterId, direction: Direction, out: &mut Vec<Event>) {
        if self.phase != TurnPhase::Monsters {
            tracing::debug!(?monster, "monster step outside the monster phase");
            return;
        }
        let Some(index) = self.monster_index(monster) else {
            return;
        };

        let from = self.monsters[index].cell;
        let Some(to) = from.step(direction, self.columns, self.rows) else {
            tracing::debug!(?monster, ?direction, refusal = ?MoveRefusal::OutOfBounds, "monster step ignored");
            return;
        };
        if let Err(refusal) = self.check_step(&self.monsters[index], to) {
            tracing::debug!(?monster, ?to, ?refusal, "monster step ignored");
            return;
        }

        let actor = ActorId::Monster(monster);
        self.occupancy.vacate(from);
        self.occupancy.occupy(actor, to);
        let combatant = &mut self.monsters[index];
        combatant.cell = to;
        combatant.movement_left -= 1;
        out.push(Event::MonsterMoved { monster, from, to });
    }

    fn check_step(&self, mover: &Combatant, to: CellCoord) -> Result<(), MoveRefusal> {
        if !self.occupancy.contains(to) {
            return Err(MoveRefusal::OutOfBounds);
        }
        if mover.movement_left == 0 {
            return Err(MoveRefusal::NoMovementLeft);
        }
        if !mover.cell.is_adjacent(to) {
            return Err(MoveRefusal::NotAdjacent);
        }
        if !self.occupancy.is_free(to) {
            return Err(MoveRefusal::Occupied);
        }
        Ok(())
    }

    fn strike(&mut self, attacker: ActorId, target: ActorId, strike: Strike, out: &mut Vec<Event>) {
        match attacker {
            ActorId::Hero => {
                if self.phase != TurnPhase::Player {
                    out.push(Event::ActionRejected {
                        reason: TurnViolation::NotPlayerTurn,
                    });
                    return;
                }
                if !self.hero.can_attack {
                    out.push(Event::ActionRejected {
                        reason: TurnViolation::AttackSpent,
                    });
                    return;
                }
            }
            ActorId::Monster(_) => {
                if self.phase != TurnPhase::Monsters {
                    tracing::debug!(?attacker, "monster strike outside the monster phase");
                    return;
                }
            }
        }

        if attacker == target {
            return;
        }
        let (Some(striker), Some(defender)) = (self.combatant(attacker), self.combatant(target)) else {
            tracing::debug!(?attacker, ?target, "strike ignored: unknown actor");
            return;
        };
        if !striker.cell.is_adjacent(defender.cell) || !defender.is_alive() {
            tracing::debug!(?attacker, ?target, "strike ignored: target out of reach");
            return;
        }

        if attacker == ActorId::Hero {
            self.hero.can_attack = false;
        }

        let Some(defender) = self.combatant_mut(target) else {
            return;
        };
        defender.hp = defender.hp.saturating_sub(strike.damage());
        let remaining_hp = defender.hp;
        let cell = defender.cell;
        tracing::info!(
            ?attacker,
            ?target,
            d20 = strike.d20,
            armor = strike.armor,
            damage = strike.damage(),
            remaining_hp,
            "strike resolved"
        );
        out.push(Event::StrikeResolved {
            attacker,
            target,
            strike,
            remaining_hp,
        });

        if remaining_hp == 0 {
            self.slay(target, cell, out);
        }
    }

    fn slay(&mut self, actor: ActorId, cell: CellCoord, out: &mut Vec<Event>) {
        self.occupancy.vacate(cell);
        out.push(Event::ActorSlain { actor, cell });

        match actor {
            ActorId::Hero => {
                self.hero_defeated = true;
                tracing::info!(level = self.level, "hero defeated");
                out.push(Event::HeroDefeated);
            }
            ActorId::Monster(monster) => {
                if let Some(index) = self.monster_index(monster) {
                    let _ = self.monsters.remove(index);
                }
                if self.monsters.is_empty() {
                    let cleared = self.level;
                    self.level = self.level.saturating_add(1);
                    tracing::info!(level = cleared, "level cleared");
                    out.push(Event::LevelCleared { level: cleared });
                }
            }
        }
    }

    fn activate_monster(&mut self, monster: MonsterId, out: &mut Vec<Event>) {
        if self.phase != TurnPhase::Monsters {
            return;
        }
        let Some(index) = self.monster_index(monster) else {
            return;
        };
        let combatant = &mut self.monsters[index];
        combatant.movement_left = combatant.profile.stats.movement_range;
        out.push(Event::MonsterActivated { monster });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.hero_defeated && !matches!(command, Command::ConfigureArena { .. }) {
        tracing::debug!(?command, "command ignored after defeat");
        return;
    }

    match command {
        Command::ConfigureArena { columns, rows } => {
            world.columns = columns;
            world.rows = rows;
            world.occupancy = OccupancyGrid::new(columns, rows);
            world.monsters.clear();
            out_events.push(Event::ArenaConfigured { columns, rows });
        }
        Command::StartLevel {
            hero_cell,
            monsters,
        } => world.start_level(hero_cell, monsters, out_events),
        Command::MoveHero { to } => world.move_hero(to, out_events),
        Command::Strike {
            attacker,
            target,
            strike,
        } => world.strike(attacker, target, strike, out_events),
        Command::EndPlayerTurn => {
            if world.phase != TurnPhase::Player {
                tracing::debug!("end turn ignored outside the player phase");
                return;
            }
            world.phase = TurnPhase::Monsters;
            out_events.push(Event::TurnChanged {
                phase: TurnPhase::Monsters,
            });
        }
        Command::ActivateMonster { monster } => world.activate_monster(monster, out_events),
        Command::StepMonster { monster, direction } => {
            world.step_monster(monster, direction, out_events)
        }
        Command::EndMonsterPhase => {
            if world.phase != TurnPhase::Monsters {
                return;
            }
            world.phase = TurnPhase::Player;
            world.restore_hero_budget();
            out_events.push(Event::TurnChanged {
                phase: TurnPhase::Player,
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use grid_tactics_core::{
        ActorId, CellCoord, CombatantSnapshot, Direction, MonsterId, OccupancyView, RosterView,
        TurnPhase,
    };

    use super::World;

    /// Dimensions of the arena as `(columns, rows)`.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        (world.columns, world.rows)
    }

    /// Level currently being played, or about to start after a clear.
    #[must_use]
    pub fn level(world: &World) -> u32 {
        world.level
    }

    /// Phase that currently owns the board.
    #[must_use]
    pub fn phase(world: &World) -> TurnPhase {
        world.phase
    }

    /// Reports whether the hero has fallen.
    #[must_use]
    pub fn is_hero_defeated(world: &World) -> bool {
        world.hero_defeated
    }

    /// Captures the hero's current state.
    #[must_use]
    pub fn hero(world: &World) -> CombatantSnapshot {
        world.hero.snapshot()
    }

    /// Captures the state of a single monster.
    #[must_use]
    pub fn monster(world: &World, monster: MonsterId) -> Option<CombatantSnapshot> {
        world
            .monster_index(monster)
            .map(|index| world.monsters[index].snapshot())
    }

    /// Captures a read-only view of the monster roster in roster order.
    #[must_use]
    pub fn roster_view(world: &World) -> RosterView {
        RosterView::from_snapshots(world.monsters.iter().map(|monster| monster.snapshot()).collect())
    }

    /// Exposes a read-only view of the dense occupancy grid.
    #[must_use]
    pub fn occupancy_view(world: &World) -> OccupancyView<'_> {
        OccupancyView::new(world.occupancy.cells(), world.columns, world.rows)
    }

    /// Returns the actor standing on the provided cell, if any.
    #[must_use]
    pub fn occupant(world: &World, cell: CellCoord) -> Option<ActorId> {
        occupancy_view(world).occupant(cell)
    }

    /// Cells the hero may step onto right now, in `+x, -x, +y, -y` order.
    ///
    /// Empty outside the player phase or once the movement budget is spent.
    #[must_use]
    pub fn movement_options(world: &World) -> Vec<CellCoord> {
        if world.phase != TurnPhase::Player
            || world.hero_defeated
            || world.hero.movement_left == 0
        {
            return Vec::new();
        }

        let view = occupancy_view(world);
        Direction::SCAN_ORDER
            .into_iter()
            .filter_map(|direction| view.free_neighbor(world.hero.cell, direction))
            .collect()
    }

    /// Enumerates every unoccupied cell in row-major order.
    #[must_use]
    pub fn free_cells(world: &World) -> Vec<CellCoord> {
        let view = occupancy_view(world);
        (0..world.rows)
            .flat_map(|row| (0..world.columns).map(move |column| CellCoord::new(column, row)))
            .filter(|cell| view.is_free(*cell))
            .collect()
    }
}

#[derive(Clone, Copy, Debug)]
enum MoveRefusal {
    OutOfBounds,
    NoMovementLeft,
    NotAdjacent,
    Occupied,
}

#[derive(Clone, Debug)]
struct Combatant {
    id: ActorId,
    profile: EntityProfile,
    cell: CellCoord,
    hp: u32,
    movement_left: u32,
    can_attack: bool,
}

impl Combatant {
    fn new(id: ActorId, profile: EntityProfile, cell: CellCoord) -> Self {
        Self {
            id,
            profile,
            cell,
            hp: profile.stats.hp,
            movement_left: profile.stats.movement_range,
            can_attack: true,
        }
    }

    fn is_alive(&self) -> bool {
        self.hp > 0
    }

    fn snapshot(&self) -> CombatantSnapshot {
        CombatantSnapshot {
            id: self.id,
            profile: self.profile,
            cell: self.cell,
            hp: self.hp,
            movement_left: self.movement_left,
            can_attack: self.can_attack,
        }
    }
}

#[derive(Clone, Debug)]
struct OccupancyGrid {
    columns: u32,
    rows: u32,
    cells: Vec<Option<ActorId>>,
}

impl OccupancyGrid {
    fn new(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![None; capacity],
        }
    }

    fn clear(&mut self) {
        self.cells.fill(None);
    }

    fn contains(&self, cell: CellCoord) -> bool {
        self.index(cell).is_some()
    }

    fn is_free(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .is_some_and(|index| matches!(self.cells.get(index), Some(None)))
    }

    fn occupy(&mut self, actor: ActorId, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = Some(actor);
            }
        }
    }

    fn vacate(&mut self, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = None;
            }
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }

    fn cells(&self) -> &[Option<ActorId>] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_tactics_core::{HeroClass, MonsterKind, StrikeOutcome};
    use grid_tactics_system_bestiary::{hero, monster};

    fn world_with_level(hero_cell: CellCoord, monsters: &[(MonsterKind, CellCoord)]) -> World {
        let mut world = World::new(hero(HeroClass::Warrior));
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::StartLevel {
                hero_cell,
                monsters: spawns(monsters, 1),
            },
            &mut events,
        );
        world
    }

    fn spawns(monsters: &[(MonsterKind, CellCoord)], level: u32) -> Vec<MonsterSpawn> {
        monsters
            .iter()
            .map(|(kind, cell)| MonsterSpawn {
                kind: *kind,
                profile: monster(*kind, level),
                cell: *cell,
            })
            .collect()
    }

    fn hit(damage: u32) -> Strike {
        Strike {
            d20: 20,
            armor: 1,
            outcome: StrikeOutcome::Hit { damage },
        }
    }

    #[test]
    fn start_level_places_hero_and_roster() {
        let mut world = World::new(hero(HeroClass::Rogue));
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::StartLevel {
                hero_cell: CellCoord::new(5, 5),
                monsters: spawns(
                    &[
                        (MonsterKind::Goblin, CellCoord::new(0, 0)),
                        (MonsterKind::Orc, CellCoord::new(9, 9)),
                    ],
                    1,
                ),
            },
            &mut events,
        );

        assert_eq!(query::occupant(&world, CellCoord::new(5, 5)), Some(ActorId::Hero));
        assert_eq!(query::roster_view(&world).len(), 2);
        assert_eq!(
            events.first(),
            Some(&Event::LevelStarted {
                level: 1,
                hero_cell: CellCoord::new(5, 5),
            })
        );
        assert_eq!(
            events.last(),
            Some(&Event::TurnChanged {
                phase: TurnPhase::Player,
            })
        );
    }

    #[test]
    fn spawns_onto_occupied_cells_are_skipped() {
        let world = world_with_level(
            CellCoord::new(1, 1),
            &[
                (MonsterKind::Goblin, CellCoord::new(1, 1)),
                (MonsterKind::Goblin, CellCoord::new(2, 2)),
                (MonsterKind::Troll, CellCoord::new(2, 2)),
                (MonsterKind::Orc, CellCoord::new(10, 2)),
            ],
        );

        let roster = query::roster_view(&world);
        assert_eq!(roster.len(), 1);
        let survivor = roster.iter().next().expect("one monster spawned");
        assert_eq!(survivor.cell, CellCoord::new(2, 2));
    }

    #[test]
    fn hero_moves_one_orthogonal_step_per_unit() {
        let mut world = world_with_level(CellCoord::new(5, 5), &[(MonsterKind::Goblin, CellCoord::new(0, 0))]);
        let mut events = Vec::new();

        apply(&mut world, Command::MoveHero { to: CellCoord::new(7, 5) }, &mut events);
        apply(&mut world, Command::MoveHero { to: CellCoord::new(6, 6) }, &mut events);
        apply(&mut world, Command::MoveHero { to: CellCoord::new(6, 5) }, &mut events);
        assert_eq!(
            events,
            vec![Event::HeroMoved {
                from: CellCoord::new(5, 5),
                to: CellCoord::new(6, 5),
                movement_left: 2,
            }]
        );

        apply(&mut world, Command::MoveHero { to: CellCoord::new(7, 5) }, &mut events);
        apply(&mut world, Command::MoveHero { to: CellCoord::new(8, 5) }, &mut events);
        apply(&mut world, Command::MoveHero { to: CellCoord::new(9, 5) }, &mut events);
        assert_eq!(query::hero(&world).cell, CellCoord::new(8, 5));
        assert_eq!(query::hero(&world).movement_left, 0);
        assert!(query::movement_options(&world).is_empty());
    }

    #[test]
    fn movement_options_follow_scan_order_and_skip_blocked_cells() {
        let world = world_with_level(
            CellCoord::new(0, 5),
            &[(MonsterKind::Goblin, CellCoord::new(0, 6))],
        );

        assert_eq!(
            query::movement_options(&world),
            vec![CellCoord::new(1, 5), CellCoord::new(0, 4)]
        );
    }

    #[test]
    fn second_hero_strike_in_a_turn_is_rejected() {
        let mut world = world_with_level(CellCoord::new(5, 5), &[(MonsterKind::Troll, CellCoord::new(6, 5))]);
        let troll = ActorId::Monster(MonsterId::new(0));
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::Strike { attacker: ActorId::Hero, target: troll, strike: hit(3) },
            &mut events,
        );
        apply(
            &mut world,
            Command::Strike { attacker: ActorId::Hero, target: troll, strike: hit(3) },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::StrikeResolved {
                    attacker: ActorId::Hero,
                    target: troll,
                    strike: hit(3),
                    remaining_hp: 19,
                },
                Event::ActionRejected {
                    reason: TurnViolation::AttackSpent,
                },
            ]
        );
    }

    #[test]
    fn hero_cannot_act_during_monster_phase() {
        let mut world = world_with_level(CellCoord::new(5, 5), &[(MonsterKind::Orc, CellCoord::new(6, 5))]);
        let mut events = Vec::new();
        apply(&mut world, Command::EndPlayerTurn, &mut events);
        events.clear();

        apply(&mut world, Command::MoveHero { to: CellCoord::new(5, 4) }, &mut events);
        apply(
            &mut world,
            Command::Strike {
                attacker: ActorId::Hero,
                target: ActorId::Monster(MonsterId::new(0)),
                strike: hit(1),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::ActionRejected { reason: TurnViolation::NotPlayerTurn },
                Event::ActionRejected { reason: TurnViolation::NotPlayerTurn },
            ]
        );
        assert_eq!(query::hero(&world).cell, CellCoord::new(5, 5));
    }

    #[test]
    fn hp_saturates_at_zero_and_level_clears_once() {
        let mut world = world_with_level(
            CellCoord::new(5, 5),
            &[
                (MonsterKind::Goblin, CellCoord::new(6, 5)),
                (MonsterKind::Goblin, CellCoord::new(4, 5)),
            ],
        );
        let first = ActorId::Monster(MonsterId::new(0));
        let second = ActorId::Monster(MonsterId::new(1));
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::Strike { attacker: ActorId::Hero, target: first, strike: hit(50) },
            &mut events,
        );
        assert!(events.contains(&Event::StrikeResolved {
            attacker: ActorId::Hero,
            target: first,
            strike: hit(50),
            remaining_hp: 0,
        }));
        assert!(events.contains(&Event::ActorSlain { actor: first, cell: CellCoord::new(6, 5) }));
        assert!(!events.iter().any(|event| matches!(event, Event::LevelCleared { .. })));
        assert_eq!(query::level(&world), 1);
        assert_eq!(query::occupant(&world, CellCoord::new(6, 5)), None);

        let mut turn_events = Vec::new();
        apply(&mut world, Command::EndPlayerTurn, &mut turn_events);
        apply(&mut world, Command::EndMonsterPhase, &mut turn_events);
        events.clear();
        apply(
            &mut world,
            Command::Strike { attacker: ActorId::Hero, target: second, strike: hit(50) },
            &mut events,
        );

        let clears: Vec<_> = events
            .iter()
            .filter(|event| matches!(event, Event::LevelCleared { .. }))
            .collect();
        assert_eq!(clears, vec![&Event::LevelCleared { level: 1 }]);
        assert_eq!(query::level(&world), 2);
        assert!(query::roster_view(&world).is_empty());
    }

    #[test]
    fn lethal_strike_on_hero_ends_the_game() {
        let mut world = world_with_level(CellCoord::new(5, 5), &[(MonsterKind::Troll, CellCoord::new(5, 6))]);
        let troll = MonsterId::new(0);
        let mut events = Vec::new();
        apply(&mut world, Command::EndPlayerTurn, &mut events);
        apply(&mut world, Command::ActivateMonster { monster: troll }, &mut events);
        events.clear();

        apply(
            &mut world,
            Command::Strike {
                attacker: ActorId::Monster(troll),
                target: ActorId::Hero,
                strike: hit(25),
            },
            &mut events,
        );

        assert!(events.contains(&Event::HeroDefeated));
        assert!(query::is_hero_defeated(&world));
        assert_eq!(query::hero(&world).hp, 0);
        assert_eq!(query::occupant(&world, CellCoord::new(5, 5)), None);

        events.clear();
        apply(&mut world, Command::EndMonsterPhase, &mut events);
        assert!(events.is_empty());
        assert_eq!(query::phase(&world), TurnPhase::Monsters);
    }

    #[test]
    fn monster_steps_consume_movement_and_respect_occupancy() {
        let mut world = world_with_level(
            CellCoord::new(5, 5),
            &[(MonsterKind::Goblin, CellCoord::new(3, 5))],
        );
        let goblin = MonsterId::new(0);
        let mut events = Vec::new();
        apply(&mut world, Command::EndPlayerTurn, &mut events);
        apply(&mut world, Command::ActivateMonster { monster: goblin }, &mut events);
        events.clear();

        apply(&mut world, Command::StepMonster { monster: goblin, direction: Direction::East }, &mut events);
        apply(&mut world, Command::StepMonster { monster: goblin, direction: Direction::East }, &mut events);
        apply(&mut world, Command::StepMonster { monster: goblin, direction: Direction::North }, &mut events);
        apply(&mut world, Command::StepMonster { monster: goblin, direction: Direction::South }, &mut events);

        assert_eq!(
            events,
            vec![
                Event::MonsterMoved {
                    monster: goblin,
                    from: CellCoord::new(3, 5),
                    to: CellCoord::new(4, 5),
                },
                Event::MonsterMoved {
                    monster: goblin,
                    from: CellCoord::new(4, 5),
                    to: CellCoord::new(4, 4),
                },
            ]
        );
        let snapshot = query::monster(&world, goblin).expect("goblin alive");
        assert_eq!(snapshot.movement_left, 0);
    }

    #[test]
    fn ending_the_monster_phase_restores_the_hero_budget() {
        let mut world = world_with_level(CellCoord::new(5, 5), &[(MonsterKind::Orc, CellCoord::new(6, 5))]);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Strike {
                attacker: ActorId::Hero,
                target: ActorId::Monster(MonsterId::new(0)),
                strike: hit(1),
            },
            &mut events,
        );
        apply(&mut world, Command::MoveHero { to: CellCoord::new(5, 4) }, &mut events);
        apply(&mut world, Command::EndPlayerTurn, &mut events);
        apply(&mut world, Command::EndMonsterPhase, &mut events);

        let hero = query::hero(&world);
        assert_eq!(hero.movement_left, 3);
        assert!(hero.can_attack);
        assert_eq!(query::phase(&world), TurnPhase::Player);
        assert_eq!(query::movement_options(&world).len(), 4);
    }

    #[test]
    fn configure_arena_resizes_and_empties_the_board() {
        let mut world = world_with_level(CellCoord::new(5, 5), &[(MonsterKind::Orc, CellCoord::new(6, 5))]);
        let mut events = Vec::new();
        apply(&mut world, Command::ConfigureArena { columns: 4, rows: 3 }, &mut events);

        assert_eq!(events, vec![Event::ArenaConfigured { columns: 4, rows: 3 }]);
        assert_eq!(query::dimensions(&world), (4, 3));
        assert_eq!(query::free_cells(&world).len(), 12);
        assert!(query::roster_view(&world).is_empty());
    }
}
