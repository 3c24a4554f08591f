use std::fmt;

use serde::{Deserialize, Serialize};

use crate::input_context::VrButton;

/// Tunables for the whole controller. Read once per session; every section
/// falls back to its defaults when missing from a config file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    pub input: InputConfig,
    pub gait: GaitConfig,
    pub motion: MotionConfig,
    pub jump: JumpConfig,
}

/// Hold-to-engage gate and button mapping
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// A trigger must read above this to count as held
    pub trigger_hold_threshold: f32,
    pub jump_button: VrButton,
    pub respawn_buttons: Vec<VrButton>,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            trigger_hold_threshold: 0.95,
            jump_button: VrButton::A,
            respawn_buttons: vec![VrButton::B, VrButton::Y],
        }
    }
}

/// Arm-swing estimation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaitConfig {
    pub enable_arm_swing: bool,
    /// Distance from the headset down to the abdomen reference point
    pub abdomen_offset_m: f32,
    /// Time constant of the resting-posture baseline
    pub baseline_tau: f32,
    /// Baseline stops tracking while |signal| is above this
    pub baseline_freeze_abs_signal: f32,
    /// Time constant for swing power and gait axis smoothing
    pub power_tau: f32,
    /// Swing power that maps to full speed
    pub power_at_run: f32,
    /// Swing power at or below which the gait decays
    pub power_dead: f32,
    /// Time constant used to decay the gait when idle or disengaged
    pub decay_tau: f32,
}

impl Default for GaitConfig {
    fn default() -> Self {
        GaitConfig {
            enable_arm_swing: true,
            abdomen_offset_m: 0.5,
            baseline_tau: 1.6,
            baseline_freeze_abs_signal: 0.08,
            power_tau: 0.18,
            power_at_run: 1.8,
            power_dead: 0.08,
            decay_tau: 0.3,
        }
    }
}

/// Horizontal movement of the player body
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub translation_gain: f32,
    /// Apply the desired velocity on the physics step
    pub use_rigidbody_movement: bool,
    /// Configure the body (dynamic, ccd, locked rotation) on start
    pub auto_configure_rigidbody: bool,
    pub enable_gravity: bool,
    pub max_speed_mps: f32,
    pub accel_mps2: f32,
    pub decel_mps2: f32,
    /// Horizontal speed ceiling applied on every physics step
    pub fixed_step_clamp_mps: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        MotionConfig {
            translation_gain: 1.0,
            use_rigidbody_movement: true,
            auto_configure_rigidbody: true,
            enable_gravity: true,
            max_speed_mps: 10.0,
            accel_mps2: 14.0,
            decel_mps2: 20.0,
            fixed_step_clamp_mps: 10.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    pub enabled: bool,
    pub speed_mps: f32,
    pub cooldown_s: f32,
}

impl Default for JumpConfig {
    fn default() -> Self {
        JumpConfig {
            enabled: true,
            speed_mps: 2.2,
            cooldown_s: 0.25,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    /// TOML could not be parsed or did not match the schema
    Parse(String),
    /// Config could not be written back out as TOML
    Serialize(String),
    NotFinite {
        field: &'static str,
    },
    NotPositive {
        field: &'static str,
        value: f32,
    },
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    /// `power_at_run` must sit above `power_dead`
    EmptyPowerRange {
        power_dead: f32,
        power_at_run: f32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(message) => write!(f, "Failed to parse config: {}", message),
            ConfigError::Serialize(message) => {
                write!(f, "Failed to serialize config: {}", message)
            }
            ConfigError::NotFinite { field } => write!(f, "'{}' must be a finite number", field),
            ConfigError::NotPositive { field, value } => {
                write!(f, "'{}' must be greater than zero (got {})", field, value)
            }
            ConfigError::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(
                f,
                "'{}' must be within [{}, {}] (got {})",
                field, min, max, value
            ),
            ConfigError::EmptyPowerRange {
                power_dead,
                power_at_run,
            } => write!(
                f,
                "'power_at_run' ({}) must be greater than 'power_dead' ({})",
                power_at_run, power_dead
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

fn finite(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NotFinite { field })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if finite(field, value)? > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn in_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if (min..=max).contains(&finite(field, value)?) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

impl LocomotionConfig {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: LocomotionConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        in_range(
            "trigger_hold_threshold",
            self.input.trigger_hold_threshold,
            0.0,
            1.0,
        )?;

        let gait = &self.gait;
        finite("abdomen_offset_m", gait.abdomen_offset_m)?;
        positive("baseline_tau", gait.baseline_tau)?;
        in_range(
            "baseline_freeze_abs_signal",
            gait.baseline_freeze_abs_signal,
            0.0,
            f32::MAX,
        )?;
        positive("power_tau", gait.power_tau)?;
        positive("decay_tau", gait.decay_tau)?;
        in_range("power_dead", gait.power_dead, 0.0, f32::MAX)?;
        finite("power_at_run", gait.power_at_run)?;
        if gait.power_at_run <= gait.power_dead {
            return Err(ConfigError::EmptyPowerRange {
                power_dead: gait.power_dead,
                power_at_run: gait.power_at_run,
            });
        }

        let motion = &self.motion;
        in_range("translation_gain", motion.translation_gain, 0.0, f32::MAX)?;
        positive("max_speed_mps", motion.max_speed_mps)?;
        positive("accel_mps2", motion.accel_mps2)?;
        positive("decel_mps2", motion.decel_mps2)?;
        positive("fixed_step_clamp_mps", motion.fixed_step_clamp_mps)?;

        in_range("jump_speed_mps", self.jump.speed_mps, 0.0, f32::MAX)?;
        in_range("jump_cooldown_s", self.jump.cooldown_s, 0.0, f32::MAX)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = LocomotionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.gait.baseline_tau, 1.6);
        assert_eq!(config.motion.accel_mps2, 14.0);
        assert_eq!(config.input.jump_button, VrButton::A);
        assert_eq!(config.input.respawn_buttons, vec![VrButton::B, VrButton::Y]);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = LocomotionConfig::from_toml_str(
            r#"
            [motion]
            max_speed_mps = 6.0

            [jump]
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.motion.max_speed_mps, 6.0);
        assert_eq!(config.motion.decel_mps2, 20.0);
        assert!(!config.jump.enabled);
        assert_eq!(config.gait, GaitConfig::default());
    }

    #[test]
    fn test_toml_round_trip_of_defaults() {
        let config = LocomotionConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(LocomotionConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_rejects_empty_power_range() {
        let mut config = LocomotionConfig::default();
        config.gait.power_at_run = config.gait.power_dead;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyPowerRange { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = LocomotionConfig::default();
        config.gait.power_tau = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "power_tau",
                ..
            })
        ));

        let mut config = LocomotionConfig::default();
        config.input.trigger_hold_threshold = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::OutOfRange { .. })));

        let mut config = LocomotionConfig::default();
        config.motion.max_speed_mps = f32::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::NotFinite { .. })));
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = LocomotionConfig::from_toml_str("[motion]\nmax_speed_mps = \"fast\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("Failed to parse config"));
    }

    #[test]
    fn test_serialize_error_is_not_a_parse_error() {
        let err = ConfigError::Serialize("unsupported value".to_owned());
        assert_eq!(
            err.to_string(),
            "Failed to serialize config: unsupported value"
        );
        assert!(!matches!(err, ConfigError::Parse(_)));
    }
}
