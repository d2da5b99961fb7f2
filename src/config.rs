//! Training configuration, read from a JSON file.

use serde::Deserialize;
use std::{
    error::Error,
    fmt, fs, io,
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use crate::data::Partitioning;
use crate::feedforward::{Topology, DESIRED_ACCURACY, LEARNING_RATE, MAX_EPOCHS, MOMENTUM};

/// Everything a training session needs.
///
/// # Examples
/// ```
/// # use bpnnet::config::TrainingConfig;
/// # use bpnnet::data::Partitioning;
/// let config = TrainingConfig::from_json(r#"{
///     "data": { "path": "data.csv", "inputs": 16, "outputs": 3 },
///     "hidden": 20,
///     "partitioning": { "kind": "growing", "step_percent": 10 }
/// }"#).unwrap();
///
/// assert_eq!(config.learning_rate, 0.001);
/// assert_eq!(config.partitioning, Partitioning::Growing { step_percent: 10.0 });
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrainingConfig {
    pub data: DataConfig,
    pub hidden: usize,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    #[serde(default = "default_momentum")]
    pub momentum: f64,
    #[serde(default)]
    pub use_batch: bool,
    #[serde(default = "default_max_epochs")]
    pub max_epochs: usize,
    #[serde(default = "default_desired_accuracy")]
    pub desired_accuracy: f64,
    #[serde(default = "default_partitioning")]
    pub partitioning: Partitioning,
    pub log: Option<LogConfig>,
    /// Weights to start from instead of random ones.
    pub initial_weights: Option<PathBuf>,
    /// Where to save the trained weights.
    pub save_weights: Option<PathBuf>,
    /// Seed for weights initialization and data shuffling, random if absent.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    pub path: PathBuf,
    pub inputs: usize,
    pub outputs: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    pub path: PathBuf,
    #[serde(default = "default_resolution")]
    pub resolution: NonZeroUsize,
}

fn default_learning_rate() -> f64 {
    LEARNING_RATE
}

fn default_momentum() -> f64 {
    MOMENTUM
}

fn default_max_epochs() -> usize {
    MAX_EPOCHS
}

fn default_desired_accuracy() -> f64 {
    DESIRED_ACCURACY
}

fn default_partitioning() -> Partitioning {
    Partitioning::Static
}

fn default_resolution() -> NonZeroUsize {
    NonZeroUsize::MIN
}

impl TrainingConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<TrainingConfig, ConfigError> {
        let text = fs::read_to_string(path)?;
        TrainingConfig::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<TrainingConfig, ConfigError> {
        let config: TrainingConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn topology(&self) -> Topology {
        Topology::new(self.data.inputs, self.hidden, self.data.outputs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.data.inputs == 0 || self.hidden == 0 || self.data.outputs == 0 {
            return Err(ConfigError::Invalid(format!(
                "every layer needs at least one neuron, got {}",
                self.topology()
            )));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "learning rate must be finite and positive, got {}",
                self.learning_rate
            )));
        }
        if !(0.0..1.0).contains(&self.momentum) {
            return Err(ConfigError::Invalid(format!(
                "momentum must be in [0, 1), got {}",
                self.momentum
            )));
        }
        if !(0.0..=100.0).contains(&self.desired_accuracy) {
            return Err(ConfigError::Invalid(format!(
                "desired accuracy must be a percentage, got {}",
                self.desired_accuracy
            )));
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Json(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            ConfigError::Io(err) => write!(f, "Can't read config: {}", err),
            ConfigError::Json(err) => write!(f, "Can't parse config: {}", err),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Json(err) => Some(err),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "data": { "path": "data.csv", "inputs": 16, "outputs": 3 },
        "hidden": 20
    }"#;

    #[test]
    fn defaults() {
        let config = TrainingConfig::from_json(MINIMAL).unwrap();

        assert_eq!(config.topology(), Topology::new(16, 20, 3));
        assert_eq!(config.momentum, MOMENTUM);
        assert!(!config.use_batch);
        assert_eq!(config.max_epochs, MAX_EPOCHS);
        assert_eq!(config.desired_accuracy, DESIRED_ACCURACY);
        assert_eq!(config.partitioning, Partitioning::Static);
        assert!(config.log.is_none());
        assert!(config.seed.is_none());
    }

    #[test]
    fn full_config() {
        let config = TrainingConfig::from_json(
            r#"{
                "data": { "path": "data.csv", "inputs": 2, "outputs": 1 },
                "hidden": 3,
                "learning_rate": 0.5,
                "momentum": 0.0,
                "use_batch": true,
                "max_epochs": 200,
                "desired_accuracy": 95,
                "partitioning": { "kind": "windowing", "window_size": 30, "step_size": 10 },
                "log": { "path": "log.csv", "resolution": 5 },
                "initial_weights": "in.csv",
                "save_weights": "out.csv",
                "seed": 7
            }"#,
        )
        .unwrap();

        assert!(config.use_batch);
        assert_eq!(config.desired_accuracy, 95.0);
        assert_eq!(config.log.unwrap().resolution.get(), 5);
        assert_eq!(config.initial_weights, Some(PathBuf::from("in.csv")));
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn rejects_bad_values() {
        for patch in [
            r#""hidden": 0"#,
            r#""hidden": 2, "learning_rate": 0"#,
            r#""hidden": 2, "momentum": 1.5"#,
            r#""hidden": 2, "desired_accuracy": 120"#,
        ] {
            let json = format!(
                r#"{{ "data": {{ "path": "d.csv", "inputs": 1, "outputs": 1 }}, {} }}"#,
                patch
            );
            assert!(
                matches!(TrainingConfig::from_json(&json), Err(ConfigError::Invalid(_))),
                "{}",
                json
            );
        }

        assert!(matches!(
            TrainingConfig::from_json(r#"{ "hidden": 2 }"#),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            TrainingConfig::from_json(
                r#"{ "data": { "path": "d.csv", "inputs": 1, "outputs": 1 }, "hidden": 2, "log": { "path": "l.csv", "resolution": 0 } }"#
            ),
            Err(ConfigError::Json(_))
        ));
    }
}
