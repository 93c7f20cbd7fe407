//! Session configuration and presets
//!
//! Supplied once per session by the controller. Everything deserializes with
//! defaults so a partial JSON document is a valid configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Configuration contract violations, caught before a session is built
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("ball_count must be at least 1")]
    NoBalls,
    #[error("ball_radius {0} must be positive")]
    BallRadius(f32),
    #[error("speed_multiplier {0} must be positive")]
    SpeedMultiplier(f32),
    #[error("arena dimensions must be positive")]
    ArenaSize,
    #[error("arena is too small for balls of radius {ball_radius}")]
    ArenaTooSmall { ball_radius: f32 },
    #[error("min_speed {min} exceeds max_speed {max}")]
    SpeedRange { min: f32, max: f32 },
    #[error("{name} {value} is out of range")]
    OutOfRange { name: &'static str, value: f32 },
    #[error("random_boost_range must be positive and ordered, got {0}..{1}")]
    BoostRange(f32, f32),
    #[error("max_live_lines must be at least 1")]
    LineCap,
    #[error("stalemate_ticks must be at least 1")]
    StalemateTicks,
    #[error("min_lines_to_win {min_lines} can never be reached with max_live_lines {cap}")]
    UnreachableWin { min_lines: usize, cap: usize },
    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Arena shape as chosen by the controller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArenaShape {
    /// Circle centered on the origin
    Circular { radius: f32 },
    /// Box spanning `[0, width] x [0, height]`
    Rectangular { width: f32, height: f32 },
}

impl Default for ArenaShape {
    fn default() -> Self {
        Self::medium()
    }
}

impl ArenaShape {
    /// The standard 250px circle
    pub fn medium() -> Self {
        ArenaShape::Circular {
            radius: ARENA_RADIUS,
        }
    }

    /// Largest circle fitting a viewport with a 5% margin on every edge
    pub fn fit_viewport(width: f32, height: f32) -> Self {
        let avail_w = width * 0.9;
        let avail_h = height * 0.9;
        ArenaShape::Circular {
            radius: avail_w.min(avail_h) / 2.0,
        }
    }

    /// Smallest distance from the center to the boundary
    pub fn inner_extent(&self) -> f32 {
        match *self {
            ArenaShape::Circular { radius } => radius,
            ArenaShape::Rectangular { width, height } => width.min(height) / 2.0,
        }
    }
}

/// Speed multiplier presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpeedPreset {
    #[default]
    Fast,
    SuperFast,
}

impl SpeedPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedPreset::Fast => "Fast",
            SpeedPreset::SuperFast => "Super Fast",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fast" => Some(SpeedPreset::Fast),
            "super-fast" | "superfast" | "super_fast" => Some(SpeedPreset::SuperFast),
            _ => None,
        }
    }

    pub fn multiplier(&self) -> f32 {
        match self {
            SpeedPreset::Fast => SPEED_FAST,
            SpeedPreset::SuperFast => SPEED_SUPER_FAST,
        }
    }
}

/// Motion and bounce tuning
///
/// Speeds are in arena units per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsPreset {
    /// Integrate downward gravity and air damping
    pub gravity: bool,
    /// Added to vertical velocity every tick when `gravity` is set
    pub gravity_strength: f32,
    /// Velocity multiplier per tick when `gravity` is set (close to 1.0)
    pub air_damping: f32,
    /// Slower balls are rescaled up to this speed
    pub min_speed: f32,
    /// Faster balls are rescaled down to this speed
    pub max_speed: Option<f32>,
    /// Speed multiplier applied on every wall bounce
    pub bounce_energy_factor: f32,
    /// Probability of an extra random boost on a wall bounce
    pub random_boost_chance: f32,
    /// Multiplier range for the random boost
    pub random_boost_range: (f32, f32),
}

impl Default for PhysicsPreset {
    fn default() -> Self {
        Self::classic()
    }
}

impl PhysicsPreset {
    /// Accelerating variant: +3% speed per bounce up to a cap
    pub fn classic() -> Self {
        Self {
            gravity: false,
            gravity_strength: 0.0,
            air_damping: 1.0,
            min_speed: 1.0,
            max_speed: Some(30.0),
            bounce_energy_factor: 1.03,
            random_boost_chance: 0.0,
            random_boost_range: (1.0, 1.0),
        }
    }

    /// Decaying variant: gravity, air resistance, -1% per bounce and
    /// occasional random kicks to keep balls lively
    pub fn gravity() -> Self {
        Self {
            gravity: true,
            gravity_strength: 0.15,
            air_damping: 0.999,
            min_speed: 2.0,
            max_speed: Some(12.0),
            bounce_energy_factor: 0.99,
            random_boost_chance: 0.1,
            random_boost_range: (1.1, 1.4),
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(Self::classic()),
            "gravity" => Some(Self::gravity()),
            _ => None,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_speed >= 0.0) {
            return Err(ConfigError::OutOfRange {
                name: "min_speed",
                value: self.min_speed,
            });
        }
        if let Some(max) = self.max_speed {
            if !(max > 0.0) {
                return Err(ConfigError::OutOfRange {
                    name: "max_speed",
                    value: max,
                });
            }
            if self.min_speed > max {
                return Err(ConfigError::SpeedRange {
                    min: self.min_speed,
                    max,
                });
            }
        }
        if !(self.bounce_energy_factor > 0.0) {
            return Err(ConfigError::OutOfRange {
                name: "bounce_energy_factor",
                value: self.bounce_energy_factor,
            });
        }
        if !(0.0..=1.0).contains(&self.random_boost_chance) {
            return Err(ConfigError::OutOfRange {
                name: "random_boost_chance",
                value: self.random_boost_chance,
            });
        }
        let (lo, hi) = self.random_boost_range;
        if !(lo > 0.0 && lo <= hi) {
            return Err(ConfigError::BoostRange(lo, hi));
        }
        if self.gravity && !(self.air_damping > 0.0 && self.air_damping <= 1.0) {
            return Err(ConfigError::OutOfRange {
                name: "air_damping",
                value: self.air_damping,
            });
        }
        Ok(())
    }
}

/// Energy policy for ball-ball collisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CollisionEnergy {
    /// Swap normal components and keep the result
    #[default]
    Elastic,
    /// After the swap, both balls move at the mean of their incoming speeds
    AverageSpeed,
}

/// Complete session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub ball_count: usize,
    pub arena: ArenaShape,
    pub speed_multiplier: f32,
    pub ball_radius: f32,
    pub physics: PhysicsPreset,
    /// Oldest lines are evicted beyond this many live lines
    pub max_live_lines: Option<usize>,
    /// Ball-ball collisions also leave a line on each ball
    pub lines_on_collision: bool,
    pub collision_energy: CollisionEnergy,
    /// The last ball must own this many lines before the run finishes
    pub min_lines_to_win: usize,
    /// Trail positions kept per ball (0 disables trails)
    pub trail_length: usize,
    /// Spawn dust particles where lines are cut
    pub dust: bool,
    /// Ticks without an elimination before the ball with the fewest lines is
    /// removed (`None` lets a stalemate run forever)
    pub stalemate_ticks: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            ball_count: 10,
            arena: ArenaShape::medium(),
            speed_multiplier: SPEED_FAST,
            ball_radius: BALL_RADIUS,
            physics: PhysicsPreset::classic(),
            max_live_lines: None,
            lines_on_collision: false,
            collision_energy: CollisionEnergy::Elastic,
            min_lines_to_win: 0,
            trail_length: 0,
            dust: false,
            stalemate_ticks: Some(STALEMATE_TICKS),
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_speed(mut self, preset: SpeedPreset) -> Self {
        self.speed_multiplier = preset.multiplier();
        self
    }

    /// Check the configuration contract
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ball_count == 0 {
            return Err(ConfigError::NoBalls);
        }
        if !(self.ball_radius > 0.0) {
            return Err(ConfigError::BallRadius(self.ball_radius));
        }
        if !(self.speed_multiplier > 0.0) {
            return Err(ConfigError::SpeedMultiplier(self.speed_multiplier));
        }
        let dims_ok = match self.arena {
            ArenaShape::Circular { radius } => radius > 0.0,
            ArenaShape::Rectangular { width, height } => width > 0.0 && height > 0.0,
        };
        if !dims_ok {
            return Err(ConfigError::ArenaSize);
        }
        // Circular placement samples distances in [0, R - 2r)
        if self.arena.inner_extent() <= 2.0 * self.ball_radius {
            return Err(ConfigError::ArenaTooSmall {
                ball_radius: self.ball_radius,
            });
        }
        self.physics.validate()?;
        if self.stalemate_ticks == Some(0) {
            return Err(ConfigError::StalemateTicks);
        }
        if let Some(cap) = self.max_live_lines {
            if cap == 0 {
                return Err(ConfigError::LineCap);
            }
            if self.min_lines_to_win > cap {
                return Err(ConfigError::UnreachableWin {
                    min_lines: self.min_lines_to_win,
                    cap,
                });
            }
        }
        Ok(())
    }
}
