#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Grid Tactics engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! renderers to react to. Systems consume event streams, query immutable
//! views, and respond exclusively with new command batches.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of faces on the die rolled to decide whether a strike lands.
pub const D20: u32 = 20;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Configures the arena grid using the provided dimensions.
    ConfigureArena {
        /// Number of columns laid out in the grid.
        columns: u32,
        /// Number of rows laid out in the grid.
        rows: u32,
    },
    /// Clears the board and populates it for the current level.
    StartLevel {
        /// Cell the hero occupies when the level begins.
        hero_cell: CellCoord,
        /// Monsters composing the level roster, in roster order.
        monsters: Vec<MonsterSpawn>,
    },
    /// Requests that the hero advance a single step onto the provided cell.
    MoveHero {
        /// Destination cell, which must be orthogonally adjacent to the hero.
        to: CellCoord,
    },
    /// Applies an already rolled strike from one actor to another.
    Strike {
        /// Actor delivering the strike.
        attacker: ActorId,
        /// Actor receiving the strike.
        target: ActorId,
        /// Dice outcome produced by the combat resolver.
        strike: Strike,
    },
    /// Ends the player's turn and hands control to the monsters.
    EndPlayerTurn,
    /// Prepares a monster to act, restoring its movement budget.
    ActivateMonster {
        /// Monster about to act.
        monster: MonsterId,
    },
    /// Requests that a monster advance a single step in the specified direction.
    StepMonster {
        /// Monster attempting to move.
        monster: MonsterId,
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Concludes the monster phase and returns control to the player.
    EndMonsterPhase,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the arena was (re)configured and emptied.
    ArenaConfigured {
        /// Number of columns in the grid.
        columns: u32,
        /// Number of rows in the grid.
        rows: u32,
    },
    /// Announces that a level began and the hero was placed.
    LevelStarted {
        /// Level that started.
        level: u32,
        /// Cell the hero occupies.
        hero_cell: CellCoord,
    },
    /// Confirms that a monster joined the roster.
    MonsterSpawned {
        /// Identifier assigned to the monster.
        monster: MonsterId,
        /// Kind of monster that spawned.
        kind: MonsterKind,
        /// Cell the monster occupies.
        cell: CellCoord,
        /// Hit points the monster starts with.
        hp: u32,
    },
    /// Announces the phase that became active.
    TurnChanged {
        /// Phase now in control of the board.
        phase: TurnPhase,
    },
    /// Confirms that the hero moved between two cells.
    HeroMoved {
        /// Cell the hero occupied before moving.
        from: CellCoord,
        /// Cell the hero occupies after moving.
        to: CellCoord,
        /// Movement units remaining this turn.
        movement_left: u32,
    },
    /// Announces that a monster is about to act.
    MonsterActivated {
        /// Monster that was activated.
        monster: MonsterId,
    },
    /// Confirms that a monster moved between two cells.
    MonsterMoved {
        /// Monster that moved.
        monster: MonsterId,
        /// Cell the monster occupied before moving.
        from: CellCoord,
        /// Cell the monster occupies after moving.
        to: CellCoord,
    },
    /// Reports the outcome of a strike, hit or miss.
    StrikeResolved {
        /// Actor that delivered the strike.
        attacker: ActorId,
        /// Actor that received the strike.
        target: ActorId,
        /// Dice outcome of the strike.
        strike: Strike,
        /// Hit points the target has left, never below zero.
        remaining_hp: u32,
    },
    /// Confirms that an actor was slain and removed from the board.
    ActorSlain {
        /// Actor that was slain.
        actor: ActorId,
        /// Cell the actor occupied.
        cell: CellCoord,
    },
    /// Announces that the monster roster emptied and the level counter advanced.
    LevelCleared {
        /// Level that was completed.
        level: u32,
    },
    /// Announces that the hero fell and the game is over.
    HeroDefeated,
    /// Reports a turn rule violation the player should be told about.
    ActionRejected {
        /// Rule that refused the action.
        reason: TurnViolation,
    },
}

/// Phase of play that currently owns the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnPhase {
    /// The hero may move and attack.
    Player,
    /// Monsters act one after another.
    Monsters,
}

/// Turn rules whose violation is surfaced to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum TurnViolation {
    /// The action was attempted outside the player's turn.
    #[error("it is not the player's turn")]
    NotPlayerTurn,
    /// The hero already attacked during this turn.
    #[error("the hero already attacked this turn")]
    AttackSpent,
}

/// Cardinal movement directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Fixed scan order used wherever neighbouring cells compete: `+x, -x, +y, -y`.
    pub const SCAN_ORDER: [Direction; 4] = [
        Direction::East,
        Direction::West,
        Direction::South,
        Direction::North,
    ];
}

/// Unique identifier assigned to a monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonsterId(u32);

impl MonsterId {
    /// Creates a new monster identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifies any actor that can occupy a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorId {
    /// The player's hero.
    Hero,
    /// A monster from the current roster.
    Monster(MonsterId),
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Reports whether the two cells share an edge.
    #[must_use]
    pub fn is_adjacent(self, other: CellCoord) -> bool {
        self.manhattan_distance(other) == 1
    }

    /// Returns the neighbouring cell in the given direction if it lies inside
    /// a grid of the provided dimensions.
    #[must_use]
    pub fn step(self, direction: Direction, columns: u32, rows: u32) -> Option<CellCoord> {
        let (column, row) = match direction {
            Direction::North => (Some(self.column), self.row.checked_sub(1)),
            Direction::East => (self.column.checked_add(1), Some(self.row)),
            Direction::South => (Some(self.column), self.row.checked_add(1)),
            Direction::West => (self.column.checked_sub(1), Some(self.row)),
        };
        let (column, row) = (column?, row?);
        (column < columns && row < rows).then_some(CellCoord::new(column, row))
    }

    /// Direction of a single orthogonal step from `self` to `to`, if any.
    #[must_use]
    pub fn direction_to(self, to: CellCoord) -> Option<Direction> {
        if !self.is_adjacent(to) {
            return None;
        }

        if to.column() > self.column() {
            Some(Direction::East)
        } else if to.column() < self.column() {
            Some(Direction::West)
        } else if to.row() > self.row() {
            Some(Direction::South)
        } else {
            Some(Direction::North)
        }
    }
}

/// Raised when a class or monster name does not appear in the static tables.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown entity type `{name}`")]
pub struct UnknownEntityType {
    name: String,
}

impl UnknownEntityType {
    /// Creates the error for the offending name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Name that failed to resolve.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Playable hero classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeroClass {
    /// Sturdy melee fighter.
    Warrior,
    /// Fast skirmisher.
    Rogue,
    /// Fragile hard hitter.
    Mage,
}

impl HeroClass {
    /// Every playable class in table order.
    pub const ALL: [HeroClass; 3] = [HeroClass::Warrior, HeroClass::Rogue, HeroClass::Mage];

    /// Canonical lowercase name used by stored selections.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Warrior => "warrior",
            Self::Rogue => "rogue",
            Self::Mage => "mage",
        }
    }
}

impl FromStr for HeroClass {
    type Err = UnknownEntityType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|class| class.name() == value)
            .ok_or_else(|| UnknownEntityType::new(value))
    }
}

impl fmt::Display for HeroClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Monster kinds that populate level rosters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonsterKind {
    /// Weak and slow.
    Goblin,
    /// Balanced and quick.
    Orc,
    /// Tough and slow.
    Troll,
}

impl MonsterKind {
    /// Every monster kind in table order.
    pub const ALL: [MonsterKind; 3] = [MonsterKind::Goblin, MonsterKind::Orc, MonsterKind::Troll];

    /// Canonical lowercase name of the monster kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Goblin => "goblin",
            Self::Orc => "orc",
            Self::Troll => "troll",
        }
    }
}

impl FromStr for MonsterKind {
    type Err = UnknownEntityType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == value)
            .ok_or_else(|| UnknownEntityType::new(value))
    }
}

impl fmt::Display for MonsterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Type of an entity, hero or monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// A playable hero class.
    Hero(HeroClass),
    /// A monster kind.
    Monster(MonsterKind),
}

impl EntityKind {
    /// Canonical lowercase name of the entity type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hero(class) => class.name(),
            Self::Monster(kind) => kind.name(),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inclusive range of damage dealt by a successful strike.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DamageRange {
    min: u32,
    max: u32,
}

impl DamageRange {
    /// Creates a new damage range; bounds given in the wrong order are swapped.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Smallest damage a hit can deal.
    #[must_use]
    pub const fn min(&self) -> u32 {
        self.min
    }

    /// Largest damage a hit can deal.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// Reports whether the provided amount lies within the range.
    #[must_use]
    pub const fn contains(&self, amount: u32) -> bool {
        amount >= self.min && amount <= self.max
    }
}

/// Combat statistics of an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatBlock {
    /// Orthogonal steps the entity may take per turn.
    pub movement_range: u32,
    /// Hit points the entity starts with.
    pub hp: u32,
    /// Target number a d20 must meet or beat to hit the entity.
    pub armor: u32,
    /// Damage dealt by a successful strike.
    pub damage: DamageRange,
}

/// Complete stat record produced by the entity factory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityProfile {
    /// Type of the entity.
    pub kind: EntityKind,
    /// Sprite file name the renderer displays for the entity.
    pub sprite: &'static str,
    /// Combat statistics of the entity.
    pub stats: StatBlock,
}

/// Monster placement requested when a level starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonsterSpawn {
    /// Kind of monster to place.
    pub kind: MonsterKind,
    /// Level-scaled stat record of the monster.
    pub profile: EntityProfile,
    /// Cell the monster should occupy.
    pub cell: CellCoord,
}

/// Dice outcome of a single strike.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Strike {
    /// Natural d20 roll.
    pub d20: u32,
    /// Armor value the roll was compared against.
    pub armor: u32,
    /// Whether the strike hit and for how much.
    pub outcome: StrikeOutcome,
}

impl Strike {
    /// Damage dealt by the strike, zero on a miss.
    #[must_use]
    pub const fn damage(&self) -> u32 {
        match self.outcome {
            StrikeOutcome::Hit { damage } => damage,
            StrikeOutcome::Miss => 0,
        }
    }
}

/// Result of comparing a d20 roll against armor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrikeOutcome {
    /// The roll met the armor value.
    Hit {
        /// Damage rolled for the hit.
        damage: u32,
    },
    /// The roll fell short of the armor value.
    Miss,
}

/// Immutable representation of a single actor's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CombatantSnapshot {
    /// Identifier of the actor.
    pub id: ActorId,
    /// Stat record the actor was created from.
    pub profile: EntityProfile,
    /// Cell the actor occupies, or last occupied if it was slain.
    pub cell: CellCoord,
    /// Current hit points.
    pub hp: u32,
    /// Movement units left this turn.
    pub movement_left: u32,
    /// Whether the actor may still attack this turn.
    pub can_attack: bool,
}

impl CombatantSnapshot {
    /// Reports whether the actor still has hit points.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

/// Read-only snapshot of the monster roster in roster order.
#[derive(Clone, Debug, Default)]
pub struct RosterView {
    snapshots: Vec<CombatantSnapshot>,
}

impl RosterView {
    /// Creates a new roster view; the order of `snapshots` is preserved.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<CombatantSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in roster order.
    pub fn iter(&self) -> impl Iterator<Item = &CombatantSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a specific monster.
    #[must_use]
    pub fn get(&self, monster: MonsterId) -> Option<&CombatantSnapshot> {
        self.snapshots
            .iter()
            .find(|snapshot| snapshot.id == ActorId::Monster(monster))
    }

    /// Number of monsters on the roster.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<CombatantSnapshot> {
        self.snapshots
    }
}

/// Read-only view into the dense occupancy grid.
#[derive(Clone, Copy, Debug)]
pub struct OccupancyView<'a> {
    cells: &'a [Option<ActorId>],
    columns: u32,
    rows: u32,
}

impl<'a> OccupancyView<'a> {
    /// Captures a new occupancy view backed by the provided row-major cell slice.
    #[must_use]
    pub fn new(cells: &'a [Option<ActorId>], columns: u32, rows: u32) -> Self {
        Self {
            cells,
            columns,
            rows,
        }
    }

    /// Returns the actor occupying the provided cell, if any.
    #[must_use]
    pub fn occupant(&self, cell: CellCoord) -> Option<ActorId> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    /// Reports whether the cell lies inside the grid and holds no actor.
    #[must_use]
    pub fn is_free(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .is_some_and(|index| matches!(self.cells.get(index), Some(None)))
    }

    /// Neighbour of `cell` in `direction` when it is inside the grid and free.
    #[must_use]
    pub fn free_neighbor(&self, cell: CellCoord, direction: Direction) -> Option<CellCoord> {
        cell.step(direction, self.columns, self.rows)
            .filter(|neighbor| self.is_free(*neighbor))
    }

    /// Returns an iterator over all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Option<ActorId>> + 'a {
        self.cells.iter().copied()
    }

    /// Provides the dimensions of the underlying occupancy grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn step_stays_inside_grid() {
        let corner = CellCoord::new(0, 0);
        assert_eq!(corner.step(Direction::North, 3, 3), None);
        assert_eq!(corner.step(Direction::West, 3, 3), None);
        assert_eq!(
            corner.step(Direction::East, 3, 3),
            Some(CellCoord::new(1, 0))
        );
        assert_eq!(CellCoord::new(2, 2).step(Direction::South, 3, 3), None);
    }

    #[test]
    fn direction_to_requires_adjacency() {
        let origin = CellCoord::new(2, 2);
        assert_eq!(
            origin.direction_to(CellCoord::new(3, 2)),
            Some(Direction::East)
        );
        assert_eq!(
            origin.direction_to(CellCoord::new(2, 1)),
            Some(Direction::North)
        );
        assert_eq!(origin.direction_to(CellCoord::new(3, 3)), None);
        assert_eq!(origin.direction_to(origin), None);
    }

    #[test]
    fn names_parse_back_into_kinds() {
        for class in HeroClass::ALL {
            assert_eq!(class.name().parse::<HeroClass>(), Ok(class));
        }
        for kind in MonsterKind::ALL {
            assert_eq!(kind.name().parse::<MonsterKind>(), Ok(kind));
        }
        let error = "paladin".parse::<HeroClass>().unwrap_err();
        assert_eq!(error.name(), "paladin");
        assert!("Goblin".parse::<MonsterKind>().is_err());
    }

    #[test]
    fn damage_range_orders_bounds() {
        let range = DamageRange::new(6, 3);
        assert_eq!(range.min(), 3);
        assert_eq!(range.max(), 6);
        assert!(range.contains(3) && range.contains(6));
        assert!(!range.contains(7));
    }

    #[test]
    fn occupancy_treats_out_of_bounds_as_blocked() {
        let cells = [None, Some(ActorId::Hero), None, None];
        let view = OccupancyView::new(&cells, 2, 2);
        assert!(view.is_free(CellCoord::new(0, 0)));
        assert!(!view.is_free(CellCoord::new(1, 0)));
        assert!(!view.is_free(CellCoord::new(2, 0)));
        assert_eq!(view.occupant(CellCoord::new(1, 0)), Some(ActorId::Hero));
        assert_eq!(
            view.free_neighbor(CellCoord::new(0, 0), Direction::South),
            Some(CellCoord::new(0, 1))
        );
        assert_eq!(
            view.free_neighbor(CellCoord::new(0, 0), Direction::East),
            None
        );
    }
}
