//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One time unit per tick, no substepping
//! - Seeded RNG only (injected through the session seed)
//! - Stable iteration order (by ball id, lines by creation order)
//! - No rendering or platform dependencies

pub mod arena;
pub mod ball;
pub mod collision;
pub mod geometry;
pub mod lines;
pub mod state;
pub mod tick;

pub use arena::{Arena, WallContact};
pub use ball::{Ball, BallId, Line, LineId, LineOrigin};
pub use collision::{BallCollision, resolve_ball_collision};
pub use geometry::{
    collision_angle, distance, outward_normal, point_to_segment_distance, reflect,
    rotate_into_frame, rotate_out_of_frame,
};
pub use state::{
    BallView, DustParticle, LineRef, LineView, RunState, Session, SimEvent, Snapshot,
};
pub use tick::{TickReport, tick};
