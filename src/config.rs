use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LawnError, Result};

fn finite(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LawnError::invalid(field, format!("{} is not a finite number", value)))
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<f64> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(LawnError::invalid(field, format!("{} must be >= 0", value)));
    }
    Ok(value)
}

fn rate(field: &'static str, value: f64) -> Result<f64> {
    non_negative(field, value)?;
    if value > 1.0 {
        return Err(LawnError::invalid(field, format!("{} must be <= 1", value)));
    }
    Ok(value)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LawnConfig {
    /// Cells from left to right.
    pub m: usize,
    /// Cells from down to up.
    pub n: usize,
    pub cell_capacity: f64,
    /// Uniform fill value, or the Poisson mean when `random_seed` is set.
    pub initial_seed: f64,
    pub random_seed: bool,
    /// Clamp transfers and removals so no cell drops below zero.
    pub non_negative: bool,
}

impl LawnConfig {
    pub fn validate(&self) -> Result<()> {
        if self.m == 0 {
            return Err(LawnError::invalid("m", "lawn width must be positive"));
        }
        if self.n == 0 {
            return Err(LawnError::invalid("n", "lawn height must be positive"));
        }
        non_negative("cell_capacity", self.cell_capacity)?;
        non_negative("initial_seed", self.initial_seed)?;
        // a Poisson mean may exceed capacity, the draws are clamped
        if !self.random_seed && self.initial_seed > self.cell_capacity {
            return Err(LawnError::invalid(
                "initial_seed",
                format!("{} exceeds cell_capacity {}", self.initial_seed, self.cell_capacity),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotConfig {
    pub init_x: i64,
    pub init_y: i64,
    pub move_reward: f64,
    pub initial_energy: f64,
}

impl RobotConfig {
    /// Bounds are checked against the lawn when the robot is placed.
    pub fn validate(&self) -> Result<()> {
        finite("move_reward", self.move_reward)?;
        finite("initial_energy", self.initial_energy)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RakeConfig {
    pub success_rate: f64,
    pub capacity: f64,
    pub reward: f64,
}

impl RakeConfig {
    pub fn validate(&self) -> Result<()> {
        rate("rake_success_rate", self.success_rate)?;
        non_negative("rake_capacity", self.capacity)?;
        finite("rake_reward", self.reward)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectConfig {
    pub success_rate: f64,
    pub capacity: f64,
    /// `(flat cost, bonus per collected leaf)`.
    pub reward: (f64, f64),
}

impl CollectConfig {
    pub fn validate(&self) -> Result<()> {
        rate("collect_success_rate", self.success_rate)?;
        non_negative("collect_capacity", self.capacity)?;
        finite("collect_reward", self.reward.0)?;
        finite("collect_reward", self.reward.1)?;
        Ok(())
    }
}

/// Flat option set as it appears in a JSON config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GameConfig {
    pub m: usize,
    pub n: usize,
    pub cell_capacity: f64,
    pub initial_seed: f64,
    #[serde(default)]
    pub random_seed: bool,
    #[serde(default)]
    pub rng_seed: Option<u64>,
    #[serde(default)]
    pub non_negative_cells: bool,

    pub init_x: i64,
    pub init_y: i64,
    pub move_reward: f64,
    pub initial_energy: f64,

    pub rake_success_rate: f64,
    pub rake_capacity: f64,
    pub rake_reward: f64,

    pub collect_success_rate: f64,
    pub collect_capacity: f64,
    pub collect_reward: (f64, f64),
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            m: 10,
            n: 10,
            cell_capacity: 10.0,
            initial_seed: 3.0,
            random_seed: false,
            rng_seed: None,
            non_negative_cells: false,
            init_x: 0,
            init_y: 0,
            move_reward: -1.0,
            initial_energy: 100.0,
            rake_success_rate: 0.8,
            rake_capacity: 5.0,
            rake_reward: -2.0,
            collect_success_rate: 0.9,
            collect_capacity: 4.0,
            collect_reward: (-1.0, 2.0),
        }
    }
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        self.lawn().validate()?;
        self.robot().validate()?;
        self.rake().validate()?;
        self.collect().validate()
    }

    pub fn lawn(&self) -> LawnConfig {
        LawnConfig {
            m: self.m,
            n: self.n,
            cell_capacity: self.cell_capacity,
            initial_seed: self.initial_seed,
            random_seed: self.random_seed,
            non_negative: self.non_negative_cells,
        }
    }

    pub fn robot(&self) -> RobotConfig {
        RobotConfig {
            init_x: self.init_x,
            init_y: self.init_y,
            move_reward: self.move_reward,
            initial_energy: self.initial_energy,
        }
    }

    pub fn rake(&self) -> RakeConfig {
        RakeConfig {
            success_rate: self.rake_success_rate,
            capacity: self.rake_capacity,
            reward: self.rake_reward,
        }
    }

    pub fn collect(&self) -> CollectConfig {
        CollectConfig {
            success_rate: self.collect_success_rate,
            capacity: self.collect_capacity,
            reward: self.collect_reward,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"{
        "m": 3, "n": 4, "cell_capacity": 10, "initial_seed": 5,
        "init_x": 1, "init_y": 2, "move_reward": -1, "initial_energy": 10,
        "rake_success_rate": 0.5, "rake_capacity": 100, "rake_reward": -2,
        "collect_success_rate": 0.5, "collect_capacity": 3, "collect_reward": [-1, 2]
    }"#;

    #[test]
    fn parses_json_with_defaults() {
        let config = GameConfig::from_json_str(CONFIG).unwrap();
        assert_eq!((config.m, config.n), (3, 4));
        assert!(!config.random_seed);
        assert!(!config.non_negative_cells);
        assert_eq!(config.rng_seed, None);
        assert_eq!(config.collect().reward, (-1.0, 2.0));
        assert_eq!(config.rake().capacity, 100.0);
    }

    #[test]
    fn rejects_unknown_fields() {
        let json = CONFIG.replace("\"m\": 3", "\"m\": 3, \"speed\": 2");
        match GameConfig::from_json_str(&json) {
            Err(LawnError::Json(_)) => {}
            other => panic!("expected json error, got {:?}", other),
        }
    }

    #[test]
    fn rejects_out_of_range_values() {
        let mut config = GameConfig::default();
        config.m = 0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.rake_success_rate = 1.5;
        match config.validate() {
            Err(LawnError::InvalidConfig { field, .. }) => assert_eq!(field, "rake_success_rate"),
            other => panic!("expected invalid config, got {:?}", other),
        }

        let mut config = GameConfig::default();
        config.initial_seed = config.cell_capacity + 1.0;
        assert!(config.validate().is_err());
        config.random_seed = true;
        assert!(config.validate().is_ok());

        let mut config = GameConfig::default();
        config.collect_reward = (std::f64::NAN, 1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }
}
