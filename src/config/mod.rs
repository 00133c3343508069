// src/config/mod.rs

//! Runtime settings for the puzzle and its local simulator.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration:
//!
//! ```toml
//! mode = "noisy"
//! shots = 2048
//! seed = 42
//!
//! [noise]
//! gate_error = 0.005
//! readout_error = 0.01
//! ```

use crate::core::{DEFAULT_SHOTS, QuestError};
use crate::simulation::{ExecutionMode, NoiseParams, StatevectorSimulator};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestConfig {
    /// Execution model for Alice's measurement.
    pub mode: ExecutionMode,
    /// Shots per measurement.
    pub shots: u32,
    /// Seeds both the simulator and the vector dealer when set.
    pub seed: Option<u64>,
    /// Error rates used in noisy mode.
    pub noise: NoiseParams,
}

impl Default for QuestConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Ideal,
            shots: DEFAULT_SHOTS,
            seed: None,
            noise: NoiseParams::default(),
        }
    }
}

impl QuestConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, QuestError> {
        let config: Self = toml::from_str(source).map_err(|e| QuestError::Configuration {
            message: format!("Failed to parse configuration: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, QuestError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| QuestError::Configuration {
            message: format!("Failed to read {}: {}", path.display(), e),
        })?;
        debug!(path = %path.display(), "Loaded configuration file");
        Self::from_toml_str(&source)
    }

    /// Rejects zero shots and error rates outside [0, 1].
    pub fn validate(&self) -> Result<(), QuestError> {
        if self.shots == 0 {
            return Err(QuestError::Configuration {
                message: "shots must be at least 1".to_string(),
            });
        }
        self.noise.validate()
    }

    /// The local simulator these settings describe.
    pub fn simulator(&self) -> StatevectorSimulator {
        let simulator = StatevectorSimulator::new()
            .with_shots(self.shots)
            .with_noise(self.noise);
        match self.seed {
            Some(seed) => simulator.with_seed(seed),
            None => simulator,
        }
    }

    pub fn to_toml_string(&self) -> Result<String, QuestError> {
        toml::to_string(self).map_err(|e| QuestError::Configuration {
            message: format!("Failed to serialize configuration: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() -> Result<(), QuestError> {
        let config = QuestConfig::from_toml_str("")?;
        assert_eq!(config, QuestConfig::default());
        assert_eq!(config.mode, ExecutionMode::Ideal);
        assert_eq!(config.shots, 1024);
        assert_eq!(config.seed, None);
        assert_eq!(config.noise.gate_error, 0.01);
        assert_eq!(config.noise.readout_error, 0.02);
        Ok(())
    }

    #[test]
    fn test_partial_document() -> Result<(), QuestError> {
        let config = QuestConfig::from_toml_str(
            r#"
            mode = "noisy"
            seed = 42

            [noise]
            readout_error = 0.1
            "#,
        )?;
        assert_eq!(config.mode, ExecutionMode::Noisy);
        assert_eq!(config.shots, DEFAULT_SHOTS);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.noise.gate_error, 0.01);
        assert_eq!(config.noise.readout_error, 0.1);
        Ok(())
    }

    #[test]
    fn test_round_trip() -> Result<(), QuestError> {
        let config = QuestConfig {
            mode: ExecutionMode::Noisy,
            shots: 64,
            seed: Some(9),
            noise: NoiseParams::noiseless(),
        };
        let text = config.to_toml_string()?;
        assert_eq!(QuestConfig::from_toml_str(&text)?, config);
        Ok(())
    }

    #[test]
    fn test_rejects_bad_values() {
        let zero_shots = QuestConfig::from_toml_str("shots = 0");
        assert!(matches!(zero_shots, Err(QuestError::Configuration { .. })));

        let bad_noise = QuestConfig::from_toml_str("[noise]\ngate_error = 1.5");
        assert!(matches!(bad_noise, Err(QuestError::Configuration { .. })));

        let bad_mode = QuestConfig::from_toml_str("mode = \"quantum\"");
        assert!(matches!(bad_mode, Err(QuestError::Configuration { .. })));
    }

    #[test]
    fn test_missing_file() {
        let result = QuestConfig::load("/definitely/not/here/quest.toml");
        assert!(matches!(result, Err(QuestError::Configuration { .. })));
    }

    #[test]
    fn test_simulator_carries_settings() {
        let config = QuestConfig {
            shots: 32,
            ..QuestConfig::default()
        };
        let simulator = config.simulator();
        assert_eq!(simulator.shots(), 32);
        assert_eq!(simulator.noise(), NoiseParams::default());
    }
}
