//! Access to the character choice made before the session starts.

use std::collections::HashMap;

use grid_tactics_core::{EntityProfile, HeroClass, UnknownEntityType};
use grid_tactics_system_bestiary::{create_hero, hero};

/// Key under which the chosen hero class is stored.
pub const PLAYER_CHARACTER_KEY: &str = "playerCharacter";

/// Key-value storage holding choices made outside the session.
pub trait SelectionStore {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;
}

impl SelectionStore for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// Store that never holds a value.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyStore;

impl SelectionStore for EmptyStore {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }
}

/// Builds the hero named by the store's `playerCharacter` entry.
///
/// A missing entry selects the warrior; a name outside the class table is an
/// error rather than a silent fallback.
pub fn selected_hero<S: SelectionStore + ?Sized>(
    store: &S,
) -> Result<EntityProfile, UnknownEntityType> {
    match store.get(PLAYER_CHARACTER_KEY) {
        Some(name) => create_hero(&name),
        None => Ok(hero(HeroClass::Warrior)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_tactics_core::EntityKind;

    fn store(value: &str) -> HashMap<String, String> {
        HashMap::from([(PLAYER_CHARACTER_KEY.to_owned(), value.to_owned())])
    }

    #[test]
    fn missing_selection_picks_the_warrior() {
        let profile = selected_hero(&EmptyStore).expect("default class");
        assert_eq!(profile.kind, EntityKind::Hero(HeroClass::Warrior));
    }

    #[test]
    fn stored_selection_picks_that_class() {
        let profile = selected_hero(&store("rogue")).expect("known class");
        assert_eq!(profile, hero(HeroClass::Rogue));
    }

    #[test]
    fn unknown_selection_is_rejected() {
        let error = selected_hero(&store("paladin")).expect_err("unknown class");
        assert_eq!(error.name(), "paladin");
    }
}
