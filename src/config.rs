//! Configuration constants and the serde-backed experience configuration.
//!
//! Every tunable of the experience lives here with its default. Distances are
//! expressed in simulation units and in the simulation axis convention
//! (Z up) unless stated otherwise; durations are in milliseconds.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{ExperienceError, Result};

/// Fixed integration sub-step (in seconds).
pub const DEFAULT_TIME_STEP: f32 = 1.0 / 60.0;

/// Maximum number of sub-steps taken by a single `update` call.
pub const DEFAULT_MAX_SUB_STEPS: u32 = 3;

/// Gravity of the play area. Letters and shapes float.
pub const DEFAULT_GRAVITY: [f32; 3] = [0.0, 0.0, 0.0];

/// Mass given to every non-actuator body without caller options.
pub const DEFAULT_BODY_MASS: f32 = 5.0;

/// Angular damping given to every non-actuator body without caller options.
pub const DEFAULT_BODY_ANGULAR_DAMPING: f32 = 0.3;

/// Engine-level linear damping for bodies without caller options.
pub const DEFAULT_LINEAR_DAMPING: f32 = 0.01;

/// Engine-level angular damping applied when caller options omit it.
pub const DEFAULT_ANGULAR_DAMPING: f32 = 0.01;

/// Restitution used by the contact solver.
pub const DEFAULT_RESTITUTION: f32 = 0.3;

/// Cell size of the broad-phase uniform grid.
pub const DEFAULT_BROADPHASE_CELL_SIZE: f32 = 5.0;

/// Stiffness of every letter and starter spring.
pub const DEFAULT_SPRING_STIFFNESS: f32 = 50.0;

/// Damping of every letter and starter spring.
pub const DEFAULT_SPRING_DAMPING: f32 = 40.0;

/// Linear damping of a letter while a spring holds it.
pub const DEFAULT_TETHERED_LINEAR_DAMPING: f32 = 0.5;

/// Anchor-side attachment offset of a spring.
pub const DEFAULT_SPRING_LOCAL_ANCHOR: [f32; 3] = [0.0, 0.0, -0.4];

/// Position of the fixed point the starter body is tethered to.
pub const DEFAULT_STARTER_ANCHOR: [f32; 3] = [0.0, 0.0, 1.5];

/// Duration of the rest-length shrink of a fresh letter spring.
pub const DEFAULT_REST_LENGTH_SHRINK_MS: f64 = 2000.0;

/// Duration of the orientation-righting animation of a tethered letter.
pub const DEFAULT_RIGHTING_MS: f64 = 2000.0;

/// Duration of the starter fade-out.
pub const DEFAULT_STARTER_FADE_MS: f64 = 1000.0;

/// Minimum elapsed time before a starter collision may begin the experience.
pub const DEFAULT_START_GUARD_MS: f64 = 1000.0;

/// Base magnitude of the player-attraction impulse.
pub const DEFAULT_ATTRACTION_FORCE: f32 = 10.0;

/// Horizontal advance of one character in the message layout.
pub const DEFAULT_LETTER_WIDTH: f32 = 1.3;

/// Vertical advance of one line in the message layout.
pub const DEFAULT_LETTER_HEIGHT: f32 = 2.0;

/// Layout origin in the visual convention: x, height, depth.
pub const DEFAULT_MESSAGE_ORIGIN: [f32; 3] = [0.0, 5.0, -9.0];

/// Radius of the collision sphere following the viewpoint.
pub const DEFAULT_CAMERA_RADIUS: f32 = 0.25;

/// Initial position of the desktop viewpoint, in the visual convention.
pub const DEFAULT_DESKTOP_VIEWPOINT: [f32; 3] = [0.0, 0.5, 5.0];

/// Frame budget used for the over-budget warning.
pub const DEFAULT_FRAME_BUDGET_MS: f32 = 16.0;

/// Key code of the "assemble the message" key (Q).
pub const KEY_ASSEMBLE: u32 = 81;

/// Key code of the "release the message" key (Space).
pub const KEY_RELEASE: u32 = 32;

/// Spring parameters shared by letter springs and the starter tether.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringSettings {
    pub stiffness: f32,
    pub damping: f32,
    pub local_anchor: Vec3,
    pub starter_anchor: Vec3,
    pub tethered_linear_damping: f32,
}

impl Default for SpringSettings {
    fn default() -> Self {
        Self {
            stiffness: DEFAULT_SPRING_STIFFNESS,
            damping: DEFAULT_SPRING_DAMPING,
            local_anchor: Vec3::from_array(DEFAULT_SPRING_LOCAL_ANCHOR),
            starter_anchor: Vec3::from_array(DEFAULT_STARTER_ANCHOR),
            tethered_linear_damping: DEFAULT_TETHERED_LINEAR_DAMPING,
        }
    }
}

/// Character metrics of the message layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub letter_width: f32,
    pub letter_height: f32,
    /// Visual-convention origin (x, height, depth) of the first line.
    pub origin: Vec3,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            letter_width: DEFAULT_LETTER_WIDTH,
            letter_height: DEFAULT_LETTER_HEIGHT,
            origin: Vec3::from_array(DEFAULT_MESSAGE_ORIGIN),
        }
    }
}

/// Durations of the time-bounded animations, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    pub rest_length_shrink_ms: f64,
    pub righting_ms: f64,
    pub starter_fade_ms: f64,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            rest_length_shrink_ms: DEFAULT_REST_LENGTH_SHRINK_MS,
            righting_ms: DEFAULT_RIGHTING_MS,
            starter_fade_ms: DEFAULT_STARTER_FADE_MS,
        }
    }
}

/// Caller override of the physical properties of a registered body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyOptions {
    pub mass: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

impl Default for BodyOptions {
    fn default() -> Self {
        Self {
            mass: 0.0,
            linear_damping: DEFAULT_LINEAR_DAMPING,
            angular_damping: DEFAULT_ANGULAR_DAMPING,
        }
    }
}

impl BodyOptions {
    /// Options used for non-actuator bodies registered without an override.
    pub fn floating() -> Self {
        Self {
            mass: DEFAULT_BODY_MASS,
            angular_damping: DEFAULT_BODY_ANGULAR_DAMPING,
            ..Self::default()
        }
    }

    /// Options used for actuators: massless, driven by the host.
    pub fn kinematic() -> Self {
        Self {
            angular_damping: DEFAULT_BODY_ANGULAR_DAMPING,
            ..Self::default()
        }
    }
}

/// Key codes mapped to player actions on desktop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub assemble: u32,
    pub release: u32,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            assemble: KEY_ASSEMBLE,
            release: KEY_RELEASE,
        }
    }
}

/// Complete configuration of a [`PhysicsManager`](crate::PhysicsManager).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceConfig {
    pub time_step: f32,
    pub max_sub_steps: u32,
    pub gravity: Vec3,
    pub restitution: f32,
    pub broadphase_cell_size: f32,
    pub camera_radius: f32,
    pub attraction_force: f32,
    pub start_guard_ms: f64,
    pub frame_budget_ms: f32,
    pub springs: SpringSettings,
    pub layout: LayoutSettings,
    pub animations: AnimationSettings,
    pub keys: KeyBindings,
}

impl Default for ExperienceConfig {
    fn default() -> Self {
        Self {
            time_step: DEFAULT_TIME_STEP,
            max_sub_steps: DEFAULT_MAX_SUB_STEPS,
            gravity: Vec3::from_array(DEFAULT_GRAVITY),
            restitution: DEFAULT_RESTITUTION,
            broadphase_cell_size: DEFAULT_BROADPHASE_CELL_SIZE,
            camera_radius: DEFAULT_CAMERA_RADIUS,
            attraction_force: DEFAULT_ATTRACTION_FORCE,
            start_guard_ms: DEFAULT_START_GUARD_MS,
            frame_budget_ms: DEFAULT_FRAME_BUDGET_MS,
            springs: SpringSettings::default(),
            layout: LayoutSettings::default(),
            animations: AnimationSettings::default(),
            keys: KeyBindings::default(),
        }
    }
}

impl ExperienceConfig {
    /// Parses a JSON document; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the stepper or the layout cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(self.time_step > 0.0) {
            return Err(ExperienceError::InvalidConfig(format!(
                "time_step must be positive, got {}",
                self.time_step
            )));
        }
        if self.max_sub_steps == 0 {
            return Err(ExperienceError::InvalidConfig(
                "max_sub_steps must be at least 1".to_string(),
            ));
        }
        if !(self.broadphase_cell_size > 0.0) {
            return Err(ExperienceError::InvalidConfig(format!(
                "broadphase_cell_size must be positive, got {}",
                self.broadphase_cell_size
            )));
        }
        if !(self.layout.letter_width > 0.0) || !(self.layout.letter_height > 0.0) {
            return Err(ExperienceError::InvalidConfig(
                "letter metrics must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.springs.tethered_linear_damping) {
            return Err(ExperienceError::InvalidConfig(format!(
                "tethered_linear_damping must lie in [0, 1], got {}",
                self.springs.tethered_linear_damping
            )));
        }
        let animations = &self.animations;
        if animations.rest_length_shrink_ms < 0.0
            || animations.righting_ms < 0.0
            || animations.starter_fade_ms < 0.0
        {
            return Err(ExperienceError::InvalidConfig(
                "animation durations cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ExperienceConfig::from_json_str(
            r#"{ "max_sub_steps": 5, "springs": { "stiffness": 80.0 } }"#,
        )
        .expect("valid config");

        assert_eq!(config.max_sub_steps, 5);
        assert_eq!(config.springs.stiffness, 80.0);
        assert_eq!(config.springs.damping, DEFAULT_SPRING_DAMPING);
        assert_eq!(config.time_step, DEFAULT_TIME_STEP);
    }

    #[test]
    fn rejects_zero_sub_steps() {
        let err = ExperienceConfig::from_json_str(r#"{ "max_sub_steps": 0 }"#).unwrap_err();
        assert!(matches!(err, ExperienceError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_tethered_damping_above_one() {
        let json = r#"{ "springs": { "tethered_linear_damping": 1.5 } }"#;
        let err = ExperienceConfig::from_json_str(json).unwrap_err();
        assert!(matches!(err, ExperienceError::InvalidConfig(_)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = ExperienceConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ExperienceError::ConfigParse(_)));
    }
}
