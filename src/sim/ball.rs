//! Balls and the lines they leave behind

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::arena::{Arena, WallContact};
use super::geometry::point_to_segment_distance;
use crate::config::PhysicsPreset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BallId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineId(pub u32);

/// What created a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineOrigin {
    Wall,
    Collision,
}

/// A segment from a fixed anchor to its owner's live position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub id: LineId,
    pub owner: BallId,
    /// Wall contact point (or the owner's center for collision lines)
    pub anchor: Vec2,
    /// Tracking endpoint, equal to the owner's position after each refresh
    pub tip: Vec2,
    pub hue: f32,
    pub created_tick: u64,
    pub origin: LineOrigin,
}

impl Line {
    /// Distance from `p` to this segment
    #[inline]
    pub fn distance_to(&self, p: Vec2) -> f32 {
        point_to_segment_distance(p, self.anchor, self.tip)
    }
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: BallId,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Position at the start of the last advance
    pub prev_pos: Vec2,
    pub radius: f32,
    /// Color/identity token (degrees)
    pub hue: f32,
    /// Lines owned by this ball, oldest first
    pub lines: Vec<Line>,
    /// Set once the ball has owned at least one line
    pub has_had_lines: bool,
    /// Wall bounces so far
    pub bounces: u32,
    /// Recent positions for rendering (newest first)
    #[serde(skip)]
    pub trail: VecDeque<Vec2>,
}

impl Ball {
    pub fn new(id: BallId, pos: Vec2, vel: Vec2, radius: f32, hue: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            prev_pos: pos,
            radius,
            hue,
            lines: Vec::new(),
            has_had_lines: false,
            bounces: 0,
            trail: VecDeque::new(),
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Out of lines after having had some
    pub fn is_spent(&self) -> bool {
        self.has_had_lines && self.lines.is_empty()
    }

    pub fn attach_line(&mut self, line: Line) {
        self.lines.push(line);
        self.has_had_lines = true;
    }

    pub fn remove_line(&mut self, id: LineId) -> Option<Line> {
        let idx = self.lines.iter().position(|l| l.id == id)?;
        Some(self.lines.remove(idx))
    }

    /// Move every owned line's tip to the current position
    pub fn refresh_line_tips(&mut self) {
        for line in &mut self.lines {
            line.tip = self.pos;
        }
    }

    /// Record current position to trail, keeping at most `capacity` points
    pub fn record_trail(&mut self, capacity: usize) {
        if capacity == 0 {
            return;
        }
        self.trail.push_front(self.pos);
        self.trail.truncate(capacity);
    }

    /// Rescale velocity into `[min, max]`
    ///
    /// A ball at rest is kicked along +X so it never stalls.
    pub fn clamp_speed(&mut self, min: f32, max: Option<f32>) {
        let speed = self.speed();
        if speed < min {
            self.vel = if speed > 0.0 {
                self.vel * (min / speed)
            } else {
                Vec2::X * min
            };
        } else if let Some(max) = max.filter(|&m| speed > m) {
            self.vel *= max / speed;
        }
    }

    /// Advance one tick: gravity, speed clamp, integration and wall bounce
    ///
    /// Returns the wall contact when the ball bounced; the caller turns it
    /// into a line.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        arena: &Arena,
        physics: &PhysicsPreset,
        rng: &mut R,
    ) -> Option<WallContact> {
        self.prev_pos = self.pos;

        if physics.gravity {
            self.vel.y += physics.gravity_strength;
            self.vel *= physics.air_damping;
        }
        self.clamp_speed(physics.min_speed, physics.max_speed);

        self.pos += self.vel;

        let contact = arena.wall_contact(self.pos, self.radius)?;
        self.pos = contact.resolved;
        // Pushed outward by a neighbour while already heading back in
        let bounced = contact.reflect(self.vel)?;

        let mut vel = bounced * physics.bounce_energy_factor;
        if physics.random_boost_chance > 0.0
            && rng.random_bool(physics.random_boost_chance as f64)
        {
            let (lo, hi) = physics.random_boost_range;
            let boost = if hi > lo { rng.random_range(lo..hi) } else { lo };
            vel *= boost;
        }
        self.vel = vel;
        self.clamp_speed(physics.min_speed, physics.max_speed);
        self.bounces += 1;

        Some(contact)
    }
}
