use crate::error::{Result, ScavengeError};
use serde::{Deserialize, Serialize};

/// Smallest width or height the generator can lay a board out on.
pub const MIN_SIDE: usize = 13;

/// Static configuration of an environment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Width of the board in cells.
    pub width: usize,
    /// Height of the board in cells.
    pub height: usize,
    /// Seed for the random number generator. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// How many centers are sampled for the food cluster before giving up.
    pub food_cluster_retries: usize,
    /// Chance for each free interior cell to receive food.
    pub food_scatter_probability: f64,
    /// Chance for each free interior cell to become a wall.
    pub wall_scatter_probability: f64,
    /// Whether ants carrying food still earn the exploration bonus or penalty.
    pub carrying_reward_shaping: bool,
    /// Where to write the JSON replay of the episode. `None` disables replays.
    pub replay_filename: Option<String>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            width: 25,
            height: 25,
            seed: None,
            food_cluster_retries: 10_000,
            food_scatter_probability: 0.02,
            wall_scatter_probability: 0.3,
            carrying_reward_shaping: true,
            replay_filename: None,
        }
    }
}

impl EnvironmentConfig {
    /// Reads a configuration from JSON, filling missing fields with their defaults.
    pub fn from_json(contents: &str) -> Result<EnvironmentConfig> {
        let config: EnvironmentConfig = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width < MIN_SIDE || self.height < MIN_SIDE {
            return Err(ScavengeError::Configuration(format!(
                "board shape ({}, {}) is smaller than {}x{}",
                self.width, self.height, MIN_SIDE, MIN_SIDE
            )));
        }
        check_generation(
            self.food_cluster_retries,
            self.food_scatter_probability,
            self.wall_scatter_probability,
        )
    }
}

/// Checks the settings the board generator samples with.
pub(crate) fn check_generation(
    food_cluster_retries: usize,
    food_scatter_probability: f64,
    wall_scatter_probability: f64,
) -> Result<()> {
    if food_cluster_retries == 0 {
        return Err(ScavengeError::Configuration(
            "food_cluster_retries must be at least 1".to_string(),
        ));
    }
    for (name, probability) in [
        ("food_scatter_probability", food_scatter_probability),
        ("wall_scatter_probability", wall_scatter_probability),
    ] {
        if !(0.0..=1.0).contains(&probability) {
            return Err(ScavengeError::Configuration(format!(
                "{} must be between 0.0 and 1.0, got {}",
                name, probability
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_reading_a_partial_json_config_missing_fields_use_defaults() {
        let config = EnvironmentConfig::from_json(r#"{ "width": 30, "seed": 7 }"#).unwrap();

        assert_eq!(config.width, 30);
        assert_eq!(config.height, 25);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.food_cluster_retries, 10_000);
        assert!(config.carrying_reward_shaping);
        assert!(config.replay_filename.is_none());
    }

    #[test]
    fn when_reading_malformed_json_an_error_is_returned() {
        assert!(matches!(
            EnvironmentConfig::from_json("{ width: }"),
            Err(ScavengeError::Json(_))
        ));
    }

    #[test]
    fn when_the_shape_is_too_small_validation_fails() {
        let config = EnvironmentConfig {
            height: 12,
            ..EnvironmentConfig::default()
        };

        assert!(matches!(
            config.validate(),
            Err(ScavengeError::Configuration(_))
        ));
    }

    #[test]
    fn when_a_probability_is_out_of_range_validation_fails() {
        let config = EnvironmentConfig {
            wall_scatter_probability: 1.5,
            ..EnvironmentConfig::default()
        };

        assert!(matches!(
            config.validate(),
            Err(ScavengeError::Configuration(_))
        ));
    }

    #[test]
    fn when_using_the_default_config_validation_passes() {
        assert!(EnvironmentConfig::default().validate().is_ok());
    }
}
