#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Canonical entity tables and the factory that turns them into stat records.
//!
//! Hero classes and monster kinds are described once, here. Monsters grow with
//! the level through [`scale_for_level`]; level `0` leaves a record untouched.

use grid_tactics_core::{
    DamageRange, EntityKind, EntityProfile, HeroClass, MonsterKind, StatBlock, UnknownEntityType,
};

/// Hit points a monster gains per level.
pub const HP_PER_LEVEL: u32 = 2;

/// Levels required for a monster to gain one point of armor.
pub const LEVELS_PER_ARMOR: u32 = 2;

#[derive(Clone, Copy, Debug)]
struct TableEntry {
    sprite: &'static str,
    stats: StatBlock,
}

const fn entry(
    sprite: &'static str,
    movement_range: u32,
    hp: u32,
    armor: u32,
    damage_min: u32,
    damage_max: u32,
) -> TableEntry {
    TableEntry {
        sprite,
        stats: StatBlock {
            movement_range,
            hp,
            armor,
            damage: DamageRange::new(damage_min, damage_max),
        },
    }
}

const fn hero_entry(class: HeroClass) -> TableEntry {
    match class {
        HeroClass::Warrior => entry("warrior.png", 3, 20, 16, 3, 6),
        HeroClass::Rogue => entry("rogue.png", 4, 14, 14, 2, 4),
        HeroClass::Mage => entry("mage.png", 3, 12, 12, 4, 8),
    }
}

const fn monster_entry(kind: MonsterKind) -> TableEntry {
    match kind {
        MonsterKind::Goblin => entry("goblin.png", 2, 6, 8, 1, 3),
        MonsterKind::Orc => entry("orc.png", 3, 12, 12, 2, 5),
        MonsterKind::Troll => entry("troll.png", 2, 20, 14, 3, 8),
    }
}

/// Stat record of a hero class.
#[must_use]
pub const fn hero(class: HeroClass) -> EntityProfile {
    let entry = hero_entry(class);
    EntityProfile {
        kind: EntityKind::Hero(class),
        sprite: entry.sprite,
        stats: entry.stats,
    }
}

/// Stat record of a monster kind scaled to the provided level.
#[must_use]
pub const fn monster(kind: MonsterKind, level: u32) -> EntityProfile {
    let entry = monster_entry(kind);
    EntityProfile {
        kind: EntityKind::Monster(kind),
        sprite: entry.sprite,
        stats: scale_for_level(entry.stats, level),
    }
}

/// Applies level scaling to a base stat block.
///
/// Hit points grow by [`HP_PER_LEVEL`] per level and armor by one point every
/// [`LEVELS_PER_ARMOR`] levels. Movement and damage are unaffected.
#[must_use]
pub const fn scale_for_level(base: StatBlock, level: u32) -> StatBlock {
    StatBlock {
        hp: base.hp.saturating_add(level.saturating_mul(HP_PER_LEVEL)),
        armor: base.armor.saturating_add(level / LEVELS_PER_ARMOR),
        ..base
    }
}

/// Builds a hero from a class name such as `"warrior"`.
pub fn create_hero(name: &str) -> Result<EntityProfile, UnknownEntityType> {
    name.parse::<HeroClass>().map(hero)
}

/// Builds a level-scaled monster from a kind name such as `"goblin"`.
pub fn create_monster(name: &str, level: u32) -> Result<EntityProfile, UnknownEntityType> {
    name.parse::<MonsterKind>().map(|kind| monster(kind, level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_zero_leaves_stats_untouched() {
        for kind in MonsterKind::ALL {
            assert_eq!(monster(kind, 0).stats, monster_entry(kind).stats);
        }
    }

    #[test]
    fn armor_grows_every_other_level() {
        let base = monster_entry(MonsterKind::Orc).stats;
        let armors: Vec<u32> = (0..5).map(|level| scale_for_level(base, level).armor).collect();
        assert_eq!(armors, vec![12, 12, 13, 13, 14]);
    }
}
