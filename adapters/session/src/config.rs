//! Session configuration loaded from TOML.

use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_BOARD_SIZE: u32 = 10;
const DEFAULT_RNG_SEED: u64 = 0x6772_6964_7461_6374;
const DEFAULT_MONSTER_PHASE_DELAY_MS: u64 = 300;
const DEFAULT_MONSTER_STEP_DELAY_MS: u64 = 200;
const DEFAULT_NEXT_LEVEL_DELAY_MS: u64 = 800;

/// Tunables for a combat session.
///
/// Every field is optional in the TOML document; missing fields keep their
/// defaults.
///
/// ```toml
/// board_size = 12
/// rng_seed = 7
/// monster_step_delay_ms = 150
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Number of cells along each side of the square arena.
    pub board_size: u32,
    /// Seed of the random number generator behind dice and spawn placement.
    pub rng_seed: u64,
    /// Pause between ending the player turn and the first monster acting.
    pub monster_phase_delay_ms: u64,
    /// Pause after every monster step.
    pub monster_step_delay_ms: u64,
    /// Pause between clearing a level and starting the next one.
    pub next_level_delay_ms: u64,
}

impl SessionConfig {
    /// Parses a configuration from TOML contents.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: SessionConfig =
            toml::from_str(contents).context("failed to parse session config toml contents")?;
        if config.board_size == 0 {
            bail!("session config board_size must be at least 1");
        }
        Ok(config)
    }

    /// Reads and parses the configuration stored at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read session config at {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("invalid session config at {}", path.display()))
    }

    /// Returns a copy of the configuration using the provided seed.
    #[must_use]
    pub const fn with_seed(mut self, rng_seed: u64) -> Self {
        self.rng_seed = rng_seed;
        self
    }

    pub(crate) const fn monster_phase_delay(&self) -> Duration {
        Duration::from_millis(self.monster_phase_delay_ms)
    }

    pub(crate) const fn monster_step_delay(&self) -> Duration {
        Duration::from_millis(self.monster_step_delay_ms)
    }

    pub(crate) const fn next_level_delay(&self) -> Duration {
        Duration::from_millis(self.next_level_delay_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            rng_seed: DEFAULT_RNG_SEED,
            monster_phase_delay_ms: DEFAULT_MONSTER_PHASE_DELAY_MS,
            monster_step_delay_ms: DEFAULT_MONSTER_STEP_DELAY_MS,
            next_level_delay_ms: DEFAULT_NEXT_LEVEL_DELAY_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_keep_defaults() {
        let config = SessionConfig::from_toml_str("board_size = 12\nrng_seed = 7\n")
            .expect("config parses");
        assert_eq!(config.board_size, 12);
        assert_eq!(config.rng_seed, 7);
        assert_eq!(config.monster_phase_delay(), Duration::from_millis(300));
        assert_eq!(config.monster_step_delay(), Duration::from_millis(200));
        assert_eq!(config.next_level_delay(), Duration::from_millis(800));
    }

    #[test]
    fn empty_document_is_the_default() {
        assert_eq!(
            SessionConfig::from_toml_str("").expect("config parses"),
            SessionConfig::default()
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = SessionConfig::from_toml_str("board_sise = 4").expect_err("typo rejected");
        assert!(error.to_string().contains("failed to parse session config"));
    }

    #[test]
    fn zero_sized_board_is_rejected() {
        let error = SessionConfig::from_toml_str("board_size = 0").expect_err("empty board");
        assert!(error.to_string().contains("board_size"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let error = SessionConfig::from_path("/nonexistent/grid-tactics/session.toml")
            .expect_err("file is missing");
        assert!(error
            .to_string()
            .contains("/nonexistent/grid-tactics/session.toml"));
    }
}
