use grid_tactics_core::{DamageRange, HeroClass, StatBlock, StrikeOutcome};
use grid_tactics_system_bestiary::hero;
use grid_tactics_system_combat::{is_hit, resolve_strike, roll_damage, RandomDice, ScriptedDice};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn attacker(min: u32, max: u32) -> StatBlock {
    StatBlock {
        movement_range: 2,
        hp: 10,
        armor: 10,
        damage: DamageRange::new(min, max),
    }
}

#[test]
fn every_roll_hits_armor_one_and_none_hits_armor_twenty_one() {
    for roll in 1..=20 {
        assert!(is_hit(roll, 1), "roll {roll} should hit armor 1");
        assert!(!is_hit(roll, 21), "roll {roll} should miss armor 21");
    }
}

#[test]
fn roll_hits_exactly_when_at_least_armor() {
    for armor in 1..=21 {
        for roll in 1..=20 {
            assert_eq!(is_hit(roll, armor), roll >= armor);
        }
    }
}

#[test]
fn damage_stays_within_range() {
    let mut dice = RandomDice::new(ChaCha8Rng::seed_from_u64(0x5eed_cafe));
    let range = DamageRange::new(3, 6);
    let mut seen = [false; 4];
    for _ in 0..500 {
        let damage = roll_damage(&mut dice, range);
        assert!(range.contains(damage), "damage {damage} escaped {range:?}");
        seen[(damage - 3) as usize] = true;
    }
    assert!(seen.iter().all(|hit| *hit), "every value should appear");
}

#[test]
fn high_roll_hits_warrior_armor_with_damage_in_range() {
    let warrior_armor = hero(HeroClass::Warrior).stats.armor;
    for damage_roll in 1..=4 {
        let mut dice = ScriptedDice::new(vec![18, damage_roll]);
        let strike = resolve_strike(&mut dice, &attacker(3, 6), warrior_armor);

        assert_eq!(strike.d20, 18);
        assert_eq!(strike.armor, 16);
        assert_eq!(
            strike.outcome,
            StrikeOutcome::Hit {
                damage: damage_roll + 2
            }
        );
        assert!((3..=6).contains(&strike.damage()));
    }
}

#[test]
fn miss_skips_the_damage_roll() {
    let mut dice = ScriptedDice::new(vec![7, 4]);
    let strike = resolve_strike(&mut dice, &attacker(1, 3), 8);

    assert_eq!(strike.outcome, StrikeOutcome::Miss);
    assert_eq!(strike.damage(), 0);
    assert_eq!(dice.consumed(), 1);
}
