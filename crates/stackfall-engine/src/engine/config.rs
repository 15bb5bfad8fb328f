use serde::{Deserialize, Serialize};

use crate::{ConfigError, DEFAULT_SPEED, MAX_SPEED};

/// Dimensions and fall speed of a board.
///
/// Missing fields take their default when deserialised, so a config file only needs the
/// values it changes.
///
/// ```
/// use stackfall_engine::BoardConfig;
///
/// let config: BoardConfig = serde_json::from_str(r#"{ "height": 20 }"#).unwrap();
/// assert_eq!((config.width, config.height, config.speed), (10, 20, 1.0));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    /// World units a piece falls per tick without soft-drop.
    pub speed: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 16,
            speed: DEFAULT_SPEED,
        }
    }
}

impl BoardConfig {
    /// Checks that the board has cells and the speed lies in `(0, MAX_SPEED]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyBoard {
                width: self.width,
                height: self.height,
            });
        }
        validate_speed(self.speed)
    }
}

pub(crate) fn validate_speed(speed: f64) -> Result<(), ConfigError> {
    if !speed.is_finite() || speed <= 0.0 {
        return Err(ConfigError::InvalidSpeed { speed });
    }
    if speed > MAX_SPEED {
        return Err(ConfigError::SpeedTooHigh {
            speed,
            max: MAX_SPEED,
        });
    }
    Ok(())
}
