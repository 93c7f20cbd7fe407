//! Arena bounds, wall contacts and placement
//!
//! Circular arenas are centered on the origin; rectangular arenas span
//! `[0, width] x [0, height]`.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::geometry::{outward_normal, reflect};
use crate::config::ArenaShape;
use crate::consts::MAX_PLACEMENT_ATTEMPTS;
use crate::polar_to_cartesian;

/// The region balls move in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Arena {
    Circular { center: Vec2, radius: f32 },
    Rectangular { width: f32, height: f32 },
}

/// A ball overlapping the arena boundary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallContact {
    /// Point on the boundary where the ball touches
    pub point: Vec2,
    /// Ball center pushed back so the ball is tangent to the boundary
    pub resolved: Vec2,
    /// Outward normal. Unit length for circles; for boxes each component is
    /// the sign of the wall hit on that axis (0 if none), so corners carry both.
    pub normal: Vec2,
    axis_aligned: bool,
}

impl WallContact {
    /// Velocity after bouncing, or `None` when the ball already heads back in
    pub fn reflect(&self, vel: Vec2) -> Option<Vec2> {
        if self.axis_aligned {
            let mut out = vel;
            let mut flipped = false;
            if self.normal.x != 0.0 && vel.x * self.normal.x > 0.0 {
                out.x = -out.x;
                flipped = true;
            }
            if self.normal.y != 0.0 && vel.y * self.normal.y > 0.0 {
                out.y = -out.y;
                flipped = true;
            }
            flipped.then_some(out)
        } else if vel.dot(self.normal) > 0.0 {
            Some(reflect(vel, self.normal))
        } else {
            None
        }
    }
}

impl Arena {
    pub fn from_shape(shape: ArenaShape) -> Self {
        match shape {
            ArenaShape::Circular { radius } => Arena::Circular {
                center: Vec2::ZERO,
                radius,
            },
            ArenaShape::Rectangular { width, height } => Arena::Rectangular { width, height },
        }
    }

    pub fn center(&self) -> Vec2 {
        match *self {
            Arena::Circular { center, .. } => center,
            Arena::Rectangular { width, height } => Vec2::new(width, height) / 2.0,
        }
    }

    /// Whether a ball of radius `r` at `pos` lies fully inside
    pub fn contains(&self, pos: Vec2, r: f32) -> bool {
        match *self {
            Arena::Circular { center, radius } => (pos - center).length() + r <= radius,
            Arena::Rectangular { width, height } => {
                pos.x >= r && pos.x <= width - r && pos.y >= r && pos.y <= height - r
            }
        }
    }

    /// Boundary contact for a ball that penetrates the wall
    pub fn wall_contact(&self, pos: Vec2, r: f32) -> Option<WallContact> {
        match *self {
            Arena::Circular { center, radius } => {
                let dist = (pos - center).length();
                if dist + r <= radius {
                    return None;
                }
                let normal = outward_normal(center, pos);
                Some(WallContact {
                    point: center + normal * radius,
                    resolved: center + normal * (radius - r),
                    normal,
                    axis_aligned: false,
                })
            }
            Arena::Rectangular { width, height } => {
                let (nx, rx, px) = axis_contact(pos.x, r, width);
                let (ny, ry, py) = axis_contact(pos.y, r, height);
                if nx == 0.0 && ny == 0.0 {
                    return None;
                }
                let resolved = Vec2::new(rx, ry);
                Some(WallContact {
                    point: Vec2::new(px.unwrap_or(rx), py.unwrap_or(ry)),
                    resolved,
                    normal: Vec2::new(nx, ny),
                    axis_aligned: true,
                })
            }
        }
    }

    /// Push a ball back inside without touching its velocity
    pub fn confine(&self, pos: Vec2, r: f32) -> Vec2 {
        self.wall_contact(pos, r).map_or(pos, |c| c.resolved)
    }

    /// Random position for a ball of radius `r`, by rejection sampling
    ///
    /// Gives up after [`MAX_PLACEMENT_ATTEMPTS`] and confines the last
    /// candidate instead.
    pub fn sample_point<R: Rng + ?Sized>(&self, r: f32, rng: &mut R) -> Vec2 {
        let mut candidate = self.center();
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            candidate = match *self {
                Arena::Circular { center, radius } => {
                    let angle = rng.random::<f32>() * TAU;
                    let dist = rng.random::<f32>() * (radius - 2.0 * r);
                    center + polar_to_cartesian(dist, angle)
                }
                Arena::Rectangular { width, height } => Vec2::new(
                    rng.random::<f32>() * width,
                    rng.random::<f32>() * height,
                ),
            };
            if self.contains(candidate, r) {
                return candidate;
            }
        }
        log::warn!(
            "placement gave up after {} attempts, using {:?}",
            MAX_PLACEMENT_ATTEMPTS,
            candidate
        );
        self.confine(candidate, r)
    }
}

/// Per-axis wall test: (normal sign, resolved coordinate, wall coordinate)
fn axis_contact(v: f32, r: f32, extent: f32) -> (f32, f32, Option<f32>) {
    if v - r < 0.0 {
        (-1.0, r, Some(0.0))
    } else if v + r > extent {
        (1.0, extent - r, Some(extent))
    } else {
        (0.0, v, None)
    }
}
