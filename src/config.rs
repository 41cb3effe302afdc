use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    board::Marker,
    error::{Error, Result},
    strategy::Difficulty,
};

/// Settings for a [`GameController`](crate::controller::GameController).
///
/// ```text
/// (
///     difficulty: Pro,
///     user_marker: O,
///     thinking_delay_ms: 250,
/// )
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub difficulty: Difficulty,
    pub user_marker: Marker,
    /// How long the computer "thinks" before its move lands.
    pub thinking_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            user_marker: Marker::X,
            thinking_delay_ms: 500,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_ron(&fs::read_to_string(path)?)
    }

    pub fn from_ron(s: &str) -> Result<Self> {
        let config: Config = ron::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.user_marker.is_empty() {
            return Err(Error::InvalidConfig(
                "user_marker must be X or O".to_string(),
            ));
        }
        Ok(())
    }

    pub fn thinking_delay(&self) -> Duration {
        Duration::from_millis(self.thinking_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = Config::from_ron("(difficulty: Pro)").unwrap();
        assert_eq!(config.difficulty, Difficulty::Pro);
        assert_eq!(config.user_marker, Marker::X);
        assert_eq!(config.thinking_delay(), Duration::from_millis(500));
    }

    #[test]
    fn parses_a_full_config() {
        let config =
            Config::from_ron("(difficulty: Intermediate, user_marker: O, thinking_delay_ms: 0)")
                .unwrap();
        assert_eq!(
            config,
            Config {
                difficulty: Difficulty::Intermediate,
                user_marker: Marker::O,
                thinking_delay_ms: 0,
            }
        );
    }

    #[test]
    fn empty_user_marker_is_rejected() {
        let err = Config::from_ron("(user_marker: Empty)").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn malformed_ron_is_reported() {
        let err = Config::from_ron("(difficulty: Impossible)").unwrap_err();
        assert!(matches!(err, Error::Ron(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Config::load("/definitely/not/here.ron").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
