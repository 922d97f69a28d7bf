//! Engine configuration.
//!
//! Loaded from TOML. Every field has a default, so a file only needs to name
//! what it changes:
//!
//! ```toml
//! board_size = 3
//! depth = 4
//!
//! [eval.strategy]
//! kind = "layered_positional"
//! mobility_weight = 2
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::board::{DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE};
use crate::eval::{EvalConfig, Strategy};

/// Default search depth in plies.
pub const DEFAULT_DEPTH: u32 = 2;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Board size, search depth and evaluation weights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub board_size: usize,
    pub depth: u32,
    pub eval: EvalConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            board_size: DEFAULT_BOARD_SIZE,
            depth: DEFAULT_DEPTH,
            eval: EvalConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: EngineConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=MAX_BOARD_SIZE).contains(&self.board_size) {
            return Err(ConfigError::Validation(format!(
                "board_size must be in 2..={}",
                MAX_BOARD_SIZE
            )));
        }
        if self.depth == 0 {
            return Err(ConfigError::Validation("depth must be >= 1".into()));
        }
        validate_eval(&self.eval)
    }

    /// Generate a TOML string with all default values.
    pub fn default_toml() -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(&EngineConfig::default())?)
    }
}

/// Checks evaluation weights on their own, for callers that change them
/// without a full [`EngineConfig`].
pub fn validate_eval(eval: &EvalConfig) -> Result<(), ConfigError> {
    if eval.line_weight_base < 1 {
        return Err(ConfigError::Validation(
            "eval.line_weight_base must be >= 1".into(),
        ));
    }
    if eval.opponent_penalty_multiplier < 0 {
        return Err(ConfigError::Validation(
            "eval.opponent_penalty_multiplier must be >= 0".into(),
        ));
    }
    if eval.immediate_threat_multiplier < 0 {
        return Err(ConfigError::Validation(
            "eval.immediate_threat_multiplier must be >= 0".into(),
        ));
    }
    if let Strategy::LayeredPositional(layered) = &eval.strategy {
        if layered.mobility_weight < 0 {
            return Err(ConfigError::Validation(
                "eval.strategy.mobility_weight must be >= 0".into(),
            ));
        }
        if let Some(table) = &layered.positional_bonus_table {
            if !table.is_valid() {
                return Err(ConfigError::Validation(
                    "eval.strategy.positional_bonus_table weights must be >= 0".into(),
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::{LayeredConfig, PositionalTable};
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = EngineConfig::default();
        config.validate().expect("default config should be valid");
        assert_eq!(config.board_size, 4);
        assert_eq!(config.depth, 2);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let config: EngineConfig = toml::from_str("depth = 5").unwrap();
        assert_eq!(config.depth, 5);
        assert_eq!(config.board_size, DEFAULT_BOARD_SIZE);
        assert_eq!(config.eval, EvalConfig::default());
    }

    #[test]
    fn empty_toml_uses_all_defaults() {
        let config: EngineConfig = toml::from_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn layered_strategy_from_toml() {
        let toml_str = r#"
board_size = 3

[eval]
immediate_threat_multiplier = 4

[eval.strategy]
kind = "layered_positional"
enable_mobility = false

[eval.strategy.positional_bonus_table]
corner = 4
edge = 1
center = 9
plain = 0
"#;
        let config: EngineConfig = toml::from_str(toml_str).unwrap();
        config.validate().unwrap();
        assert_eq!(config.eval.immediate_threat_multiplier, 4);
        assert_eq!(config.eval.line_weight_base, 10);
        match config.eval.strategy {
            Strategy::LayeredPositional(layered) => {
                assert!(layered.enable_positional);
                assert!(!layered.enable_mobility);
                assert_eq!(layered.positional_bonus_table.map(|t| t.center), Some(9));
            }
            other => panic!("expected layered strategy, got {:?}", other),
        }
    }

    #[test]
    fn validation_rejects_bad_board_size() {
        let mut config = EngineConfig::default();
        config.board_size = 1;
        assert!(config.validate().is_err());
        config.board_size = MAX_BOARD_SIZE + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_rejects_zero_depth() {
        let mut config = EngineConfig::default();
        config.depth = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_rejects_bad_weights() {
        let mut config = EngineConfig::default();
        config.eval.line_weight_base = 0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.eval.opponent_penalty_multiplier = -1;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.eval.strategy = Strategy::LayeredPositional(LayeredConfig {
            mobility_weight: -3,
            ..LayeredConfig::default()
        });
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.eval.strategy = Strategy::LayeredPositional(LayeredConfig {
            positional_bonus_table: Some(PositionalTable {
                corner: -1,
                edge: 0,
                center: 0,
                plain: 0,
            }),
            ..LayeredConfig::default()
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_or_default_missing_file() {
        let config = EngineConfig::load_or_default(Path::new("nonexistent_qubic.toml")).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qubic.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "board_size = 5\ndepth = 3").unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.board_size, 5);
        assert_eq!(config.depth, 3);
    }

    #[test]
    fn load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "depth = 0").unwrap();
        assert!(matches!(
            EngineConfig::load(&path),
            Err(ConfigError::Validation(_))
        ));

        std::fs::write(&path, "depth = \"deep\"").unwrap();
        assert!(matches!(
            EngineConfig::load(&path),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn load_missing_file_is_an_error() {
        assert!(matches!(
            EngineConfig::load(Path::new("/nonexistent/qubic.toml")),
            Err(ConfigError::FileRead { .. })
        ));
    }

    #[test]
    fn default_toml_roundtrips() {
        let toml_str = EngineConfig::default_toml().unwrap();
        let config: EngineConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn layered_config_roundtrips() {
        let config = EngineConfig {
            eval: EvalConfig::layered(),
            ..EngineConfig::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let back: EngineConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(back, config);
    }
}
