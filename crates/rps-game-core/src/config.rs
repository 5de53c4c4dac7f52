//! Controller configuration.

use crate::error::{GameError, Result};
use crate::games::MoveSet;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Commit and reveal windows used when none are given
pub const DEFAULT_WINDOW_SECS: u64 = 5 * 60;

/// Longest accepted commit or reveal window (one year)
pub const MAX_WINDOW_SECS: u64 = 366 * 24 * 60 * 60;

/// Fixed parameters of a controller, chosen once at construction
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub move_set: MoveSet,
    /// Exact value each participant must attach when joining
    pub wager: u64,
    /// Seconds after the second join before an uncommitted session can be withdrawn
    #[serde(default = "default_window_secs")]
    pub commit_window_secs: u64,
    /// Seconds after the second commit before an unrevealed session can be withdrawn
    #[serde(default = "default_window_secs")]
    pub reveal_window_secs: u64,
}

fn default_window_secs() -> u64 {
    DEFAULT_WINDOW_SECS
}

impl GameConfig {
    pub fn new(move_set: MoveSet, wager: u64) -> Self {
        Self {
            move_set,
            wager,
            commit_window_secs: DEFAULT_WINDOW_SECS,
            reveal_window_secs: DEFAULT_WINDOW_SECS,
        }
    }

    pub fn with_commit_window(mut self, secs: u64) -> Self {
        self.commit_window_secs = secs;
        self
    }

    pub fn with_reveal_window(mut self, secs: u64) -> Self {
        self.reveal_window_secs = secs;
        self
    }

    pub fn commit_window(&self) -> Duration {
        window(self.commit_window_secs).unwrap_or(Duration::zero())
    }

    pub fn reveal_window(&self) -> Duration {
        window(self.reveal_window_secs).unwrap_or(Duration::zero())
    }

    pub fn validate(&self) -> Result<()> {
        if self.wager == 0 {
            return Err(GameError::InvalidConfig("wager must be positive".to_string()));
        }
        // The pot holds two wagers
        if self.wager.checked_mul(2).is_none() {
            return Err(GameError::InvalidConfig(format!(
                "wager {} is too large",
                self.wager
            )));
        }
        if window(self.commit_window_secs).is_none() {
            return Err(GameError::InvalidConfig(format!(
                "commit window of {}s is out of range",
                self.commit_window_secs
            )));
        }
        if window(self.reveal_window_secs).is_none() {
            return Err(GameError::InvalidConfig(format!(
                "reveal window of {}s is out of range",
                self.reveal_window_secs
            )));
        }
        Ok(())
    }
}

fn window(secs: u64) -> Option<Duration> {
    if secs > MAX_WINDOW_SECS {
        return None;
    }
    i64::try_from(secs).ok().and_then(Duration::try_seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = GameConfig::new(MoveSet::Extended, 1_000)
            .with_commit_window(0)
            .with_reveal_window(30);

        assert_eq!(config.move_set, MoveSet::Extended);
        assert_eq!(config.commit_window(), Duration::zero());
        assert_eq!(config.reveal_window(), Duration::seconds(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_wager_rejected() {
        let config = GameConfig::new(MoveSet::Classic, 0);
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn test_oversized_values_rejected() {
        assert!(GameConfig::new(MoveSet::Classic, u64::MAX).validate().is_err());
        assert!(GameConfig::new(MoveSet::Classic, 1)
            .with_reveal_window(u64::MAX)
            .validate()
            .is_err());
    }

    #[test]
    fn test_window_limit() {
        let at_limit = GameConfig::new(MoveSet::Classic, 1)
            .with_commit_window(MAX_WINDOW_SECS)
            .with_reveal_window(MAX_WINDOW_SECS);
        assert!(at_limit.validate().is_ok());
        assert_eq!(at_limit.commit_window(), Duration::seconds(MAX_WINDOW_SECS as i64));

        let past_limit = at_limit.clone().with_commit_window(MAX_WINDOW_SECS + 1);
        assert!(matches!(past_limit.validate(), Err(GameError::InvalidConfig(_))));
        assert!(GameConfig::new(MoveSet::Classic, 1)
            .with_commit_window(10_000_000_000_000)
            .validate()
            .is_err());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"wager": 100}"#).unwrap();

        assert_eq!(config.move_set, MoveSet::Classic);
        assert_eq!(config.commit_window_secs, DEFAULT_WINDOW_SECS);
        assert_eq!(config.reveal_window_secs, DEFAULT_WINDOW_SECS);
    }

    #[test]
    fn test_deserialize_full() {
        let json = r#"{
            "move_set": "extended",
            "wager": 5,
            "commit_window_secs": 10,
            "reveal_window_secs": 20
        }"#;
        let config: GameConfig = serde_json::from_str(json).unwrap();

        assert_eq!(
            config,
            GameConfig::new(MoveSet::Extended, 5)
                .with_commit_window(10)
                .with_reveal_window(20)
        );
    }
}
