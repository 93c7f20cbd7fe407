//! Last Ball - a bouncing-balls elimination simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, collisions, lines, elimination)
//! - `config`: Session configuration, presets and validation
//! - `driver`: Scheduler abstraction that drives ticks from outside the core
//! - `web`: wasm-bindgen surface for a browser session controller

pub mod config;
pub mod driver;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{
    ArenaShape, CollisionEnergy, ConfigError, PhysicsPreset, SimConfig, SpeedPreset,
};
pub use driver::{FrameBudget, Scheduler, run};
pub use sim::{RunState, Session, Snapshot, TickReport, tick};

use glam::Vec2;

/// Simulation constants
pub mod consts {
    /// Arena radius of the default ("medium") circular arena
    pub const ARENA_RADIUS: f32 = 250.0;
    /// Ball radius, constant for every arena size
    pub const BALL_RADIUS: f32 = 7.0;

    /// Initial speed is `(BASE + U * SPREAD) * speed_multiplier`
    pub const START_SPEED_BASE: f32 = 0.8;
    pub const START_SPEED_SPREAD: f32 = 0.7;

    /// Speed multipliers offered by the session controller
    pub const SPEED_FAST: f32 = 2.5;
    pub const SPEED_SUPER_FAST: f32 = 5.0;

    /// Rejection sampling budget for initial placement
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 100;

    /// Dust particles spawned per cut line
    pub const DUST_PER_LINE: usize = 6;
    /// Life lost per tick (life starts at 1.0)
    pub const DUST_DECAY: f32 = 0.03;
    /// Maximum live dust particles
    pub const MAX_DUST: usize = 256;

    /// Default ticks without an elimination before a stalemate is broken
    pub const STALEMATE_TICKS: u64 = 20_000;

    /// Tolerance used by containment checks
    pub const EPSILON: f32 = 1e-3;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Unit vector for a heading angle
#[inline]
pub fn heading(theta: f32) -> Vec2 {
    polar_to_cartesian(1.0, theta)
}
