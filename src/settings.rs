//! Simulation tuning
//!
//! Defaults come from [`crate::consts`]; a JSON document can override any
//! subset of fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors produced while loading tuning data
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid tuning json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("arc fraction range inverted: min {min} > max {max}")]
    ArcRange { min: f32, max: f32 },
}

/// Tunable gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Play field ===
    pub screen_width: f32,
    pub screen_height: f32,

    // === Bullets ===
    pub bullet_speed: f32,
    pub bullet_radius: f32,
    pub bullet_lifespan: i32,

    // === Guidance ===
    /// Steering cap for homing bullets (per tick)
    pub max_turn_rate: f32,
    /// Minimum cosine to count as "in front of" the ship
    pub cone_min_cosine: f32,
    pub obstacle_margin: f32,
    pub deflection_buffer: f32,
    pub arc_fraction_min: f32,
    pub arc_fraction_max: f32,

    // === Ricochet ===
    pub ricochet_spread: f32,
    pub ricochet_jitter: f32,
    pub ricochet_count_tier2: usize,
    pub ricochet_count_tier3: usize,

    // === Scoring ===
    pub asteroid_score: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,

            bullet_speed: BULLET_SPEED,
            bullet_radius: BULLET_RADIUS,
            bullet_lifespan: BULLET_LIFESPAN,

            max_turn_rate: MAX_TURN_RATE,
            cone_min_cosine: CONE_MIN_COSINE,
            obstacle_margin: OBSTACLE_MARGIN,
            deflection_buffer: DEFLECTION_BUFFER,
            arc_fraction_min: ARC_FRACTION_MIN,
            arc_fraction_max: ARC_FRACTION_MAX,

            ricochet_spread: RICOCHET_SPREAD,
            ricochet_jitter: RICOCHET_JITTER,
            ricochet_count_tier2: RICOCHET_COUNT_TIER2,
            ricochet_count_tier3: RICOCHET_COUNT_TIER3,

            asteroid_score: ASTEROID_SCORE,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    /// Reject values that would make the simulation degenerate
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("bullet_speed", self.bullet_speed),
            ("bullet_radius", self.bullet_radius),
            ("max_turn_rate", self.max_turn_rate),
        ];
        for (field, value) in positive {
            if value <= 0.0 || !value.is_finite() {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if self.bullet_lifespan <= 0 {
            return Err(ConfigError::NonPositive {
                field: "bullet_lifespan",
                value: self.bullet_lifespan as f32,
            });
        }
        if self.arc_fraction_min > self.arc_fraction_max {
            return Err(ConfigError::ArcRange {
                min: self.arc_fraction_min,
                max: self.arc_fraction_max,
            });
        }
        Ok(())
    }

    /// Ricochet bullets spawned for a given homing tier
    pub fn ricochet_count(&self, tier: u8) -> usize {
        if tier >= 3 {
            self.ricochet_count_tier3
        } else {
            self.ricochet_count_tier2
        }
    }
}
