//! Session state and lifecycle
//!
//! A [`Session`] owns everything a run needs: balls (with their lines), the
//! global line registry, cosmetic dust, the run state and the seeded RNGs.
//! The controller drives it through `start`/`pause`/`resume`/`restart` and
//! [`tick`](super::tick::tick).

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::f32::consts::TAU;

use super::arena::Arena;
use super::ball::{Ball, BallId, Line, LineId, LineOrigin};
use crate::config::{ConfigError, SimConfig};
use crate::consts::*;
use crate::heading;

/// PCG stream for cosmetic effects, kept apart from the physics stream
const FX_STREAM: u64 = 0xda3e_39cb_94b9_5bdb;

/// Run state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    /// Created, never started
    Idle,
    /// Ticks advance the simulation
    Running,
    /// Stopped by the controller, state retained for resume
    Paused,
    /// One ball left
    Finished,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Paused => "paused",
            RunState::Finished => "finished",
        }
    }
}

/// Something that happened during the last tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    WallBounce { ball: BallId, point: Vec2 },
    /// `normal` points from `a` toward `b`
    BallCollision { a: BallId, b: BallId, normal: Vec2 },
    LineCreated { line: LineId, owner: BallId, origin: LineOrigin },
    /// `by` is `None` when the line aged out under the live-line cap
    LineCut { line: LineId, owner: BallId, by: Option<BallId> },
    BallEliminated { ball: BallId },
    Finished { winner: Option<BallId> },
}

/// Registry entry: a line and the ball that owns it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRef {
    pub line: LineId,
    pub owner: BallId,
}

/// A particle for visual effects (not gameplay-affecting)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DustParticle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub hue: f32,
    /// 0-1, decreases over time
    pub life: f32,
    pub size: f32,
}

/// Complete simulation session
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) config: SimConfig,
    pub(crate) arena: Arena,
    seed: u64,
    /// Physics stream: placement, velocities, random boosts
    pub(crate) rng: Pcg32,
    /// Cosmetic stream: dust
    pub(crate) fx_rng: Pcg32,
    pub(crate) state: RunState,
    pub(crate) winner: Option<BallId>,
    /// Simulation tick counter
    pub(crate) time_ticks: u64,
    /// Tick of the last elimination (0 before the first)
    pub(crate) last_elimination_tick: u64,
    /// Active balls (sorted by id for determinism)
    pub balls: Vec<Ball>,
    /// Global line registry, oldest first
    pub line_order: VecDeque<LineRef>,
    pub dust: Vec<DustParticle>,
    /// Events of the last tick
    pub events: Vec<SimEvent>,
    next_id: u32,
}

impl Session {
    /// Create an idle session; nothing is placed until `start`
    pub fn new(config: SimConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            arena: Arena::from_shape(config.arena),
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            fx_rng: Pcg32::new(seed, FX_STREAM),
            state: RunState::Idle,
            winner: None,
            time_ticks: 0,
            last_elimination_tick: 0,
            balls: Vec::new(),
            line_order: VecDeque::new(),
            dust: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// The last ball standing, once finished
    pub fn winner(&self) -> Option<BallId> {
        self.winner
    }

    pub fn active_ball_count(&self) -> usize {
        self.balls.len()
    }

    /// Reset both RNG streams so the next population replays a run
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.fx_rng = Pcg32::new(seed, FX_STREAM);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Idle -> Running with a fresh population
    pub fn start(&mut self) -> bool {
        if self.state != RunState::Idle {
            log::warn!("start ignored in state {}", self.state.as_str());
            return false;
        }
        self.populate();
        self.state = RunState::Running;
        true
    }

    /// Running -> Paused
    pub fn pause(&mut self) -> bool {
        if self.state != RunState::Running {
            log::warn!("pause ignored in state {}", self.state.as_str());
            return false;
        }
        self.state = RunState::Paused;
        log::info!("paused at tick {} with {} balls", self.time_ticks, self.balls.len());
        true
    }

    /// Paused -> Running, keeping balls and lines as they were
    pub fn resume(&mut self) -> bool {
        if self.state != RunState::Paused {
            log::warn!("resume ignored in state {}", self.state.as_str());
            return false;
        }
        self.state = RunState::Running;
        true
    }

    /// Any state -> Running with a fresh population
    pub fn restart(&mut self) -> bool {
        self.populate();
        self.state = RunState::Running;
        true
    }

    /// Drop everything and place `ball_count` new balls
    fn populate(&mut self) {
        self.balls.clear();
        self.line_order.clear();
        self.dust.clear();
        self.events.clear();
        self.winner = None;
        self.time_ticks = 0;
        self.last_elimination_tick = 0;

        let radius = self.config.ball_radius;
        for _ in 0..self.config.ball_count {
            let pos = self.arena.sample_point(radius, &mut self.rng);
            let speed = (START_SPEED_BASE + self.rng.random::<f32>() * START_SPEED_SPREAD)
                * self.config.speed_multiplier;
            let vel = heading(self.rng.random::<f32>() * TAU) * speed;
            let hue = self.rng.random::<f32>() * 360.0;
            self.spawn_ball(pos, vel, hue);
        }
        log::info!(
            "session started: {} balls, arena {:?}, seed {}",
            self.balls.len(),
            self.arena,
            self.seed
        );
    }

    fn spawn_ball(&mut self, pos: Vec2, vel: Vec2, hue: f32) -> BallId {
        let id = BallId(self.next_entity_id());
        self.balls
            .push(Ball::new(id, pos, vel, self.config.ball_radius, hue));
        id
    }

    /// Add a ball at a chosen position and velocity
    pub fn insert_ball(&mut self, pos: Vec2, vel: Vec2) -> BallId {
        let hue = self.fx_rng.random::<f32>() * 360.0;
        self.spawn_ball(pos, vel, hue)
    }

    /// Remove all balls and lines, leaving the session ready for hand-built
    /// scenarios (state is set to Running)
    pub fn clear_population(&mut self) {
        self.balls.clear();
        self.line_order.clear();
        self.dust.clear();
        self.events.clear();
        self.winner = None;
        self.last_elimination_tick = self.time_ticks;
        self.state = RunState::Running;
    }

    pub fn ball(&self, id: BallId) -> Option<&Ball> {
        self.balls
            .binary_search_by_key(&id, |b| b.id)
            .ok()
            .map(|i| &self.balls[i])
    }

    pub fn ball_mut(&mut self, id: BallId) -> Option<&mut Ball> {
        let i = self.balls.binary_search_by_key(&id, |b| b.id).ok()?;
        Some(&mut self.balls[i])
    }

    /// Live lines in registry (creation) order
    pub fn lines(&self) -> impl Iterator<Item = &Line> + '_ {
        self.line_order.iter().filter_map(|r| {
            self.ball(r.owner)?
                .lines
                .iter()
                .find(|l| l.id == r.line)
        })
    }

    /// Mark the run finished if one ball (or none) is left
    pub(crate) fn check_finished(&mut self) -> bool {
        let winner = match self.balls.as_slice() {
            [] => None,
            [last] if last.lines.len() >= self.config.min_lines_to_win => Some(last.id),
            _ => return false,
        };
        self.state = RunState::Finished;
        self.winner = winner;
        self.events.push(SimEvent::Finished { winner });
        log::info!(
            "finished after {} ticks, winner {:?} with {} lines",
            self.time_ticks,
            winner,
            self.line_order.len()
        );
        true
    }

    /// Scatter dust along a removed line
    pub(crate) fn spawn_dust(&mut self, line: &Line) {
        for k in 0..DUST_PER_LINE {
            let t = (k as f32 + 0.5) / DUST_PER_LINE as f32;
            let angle = self.fx_rng.random::<f32>() * TAU;
            let speed = self.fx_rng.random_range(0.3f32..1.5);
            self.dust.push(DustParticle {
                pos: line.anchor.lerp(line.tip, t),
                vel: heading(angle) * speed,
                hue: line.hue,
                life: 1.0,
                size: self.fx_rng.random_range(1.0f32..3.0),
            });
        }
        if self.dust.len() > MAX_DUST {
            let excess = self.dust.len() - MAX_DUST;
            self.dust.drain(..excess);
        }
    }

    /// Independent pass for dust; no effect on balls
    pub(crate) fn update_dust(&mut self) {
        for particle in &mut self.dust {
            particle.pos += particle.vel;
            particle.vel *= 0.95;
            particle.life -= DUST_DECAY;
        }
        self.dust.retain(|p| p.life > 0.0);
    }

    /// Copy of everything a renderer or status line needs
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state,
            tick: self.time_ticks,
            ball_count: self.balls.len(),
            winner: self.winner,
            balls: self
                .balls
                .iter()
                .map(|b| BallView {
                    id: b.id,
                    pos: b.pos,
                    prev_pos: b.prev_pos,
                    radius: b.radius,
                    hue: b.hue,
                    lines: b.lines.len(),
                    bounces: b.bounces,
                    trail: b.trail.iter().copied().collect(),
                })
                .collect(),
            lines: self
                .lines()
                .map(|l| LineView {
                    id: l.id,
                    owner: l.owner,
                    anchor: l.anchor,
                    tip: l.tip,
                    hue: l.hue,
                    created_tick: l.created_tick,
                    origin: l.origin,
                })
                .collect(),
            dust: self.dust.clone(),
            events: self.events.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallView {
    pub id: BallId,
    pub pos: Vec2,
    /// Position before the last move, for interpolating between ticks
    pub prev_pos: Vec2,
    pub radius: f32,
    pub hue: f32,
    pub lines: usize,
    pub bounces: u32,
    pub trail: Vec<Vec2>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineView {
    pub id: LineId,
    pub owner: BallId,
    pub anchor: Vec2,
    pub tip: Vec2,
    pub hue: f32,
    pub created_tick: u64,
    pub origin: LineOrigin,
}

/// Read-only view of a session after a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub state: RunState,
    pub tick: u64,
    pub ball_count: usize,
    pub winner: Option<BallId>,
    pub balls: Vec<BallView>,
    pub lines: Vec<LineView>,
    pub dust: Vec<DustParticle>,
    pub events: Vec<SimEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArenaShape;

    fn config(n: usize) -> SimConfig {
        SimConfig {
            ball_count: n,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_session_is_idle_and_empty() {
        let session = Session::new(config(5), 1).unwrap();
        assert_eq!(session.state(), RunState::Idle);
        assert_eq!(session.active_ball_count(), 0);
        assert!(Session::new(config(0), 1).is_err());
    }

    #[test]
    fn test_start_places_balls_inside() {
        let mut session = Session::new(config(25), 42).unwrap();
        assert!(session.start());
        assert_eq!(session.state(), RunState::Running);
        assert_eq!(session.active_ball_count(), 25);
        for ball in &session.balls {
            assert!(session.arena().contains(ball.pos, ball.radius));
            let speed = ball.speed();
            assert!(speed >= 0.8 * 2.5 - 1e-4 && speed <= 1.5 * 2.5 + 1e-4);
            assert!((0.0..360.0).contains(&ball.hue));
        }
        // Ids are sorted so lookups work
        assert!(session.balls.windows(2).all(|w| w[0].id < w[1].id));
        assert!(session.ball(session.balls[3].id).is_some());
    }

    #[test]
    fn test_transitions() {
        let mut session = Session::new(config(3), 7).unwrap();
        assert!(!session.pause());
        assert!(!session.resume());
        assert!(session.start());
        assert!(!session.start());
        assert!(session.pause());
        assert_eq!(session.state(), RunState::Paused);
        let before: Vec<Vec2> = session.balls.iter().map(|b| b.pos).collect();
        assert!(session.resume());
        let after: Vec<Vec2> = session.balls.iter().map(|b| b.pos).collect();
        assert_eq!(before, after);
        assert!(session.restart());
        assert_eq!(session.state(), RunState::Running);
        assert_eq!(session.active_ball_count(), 3);
    }

    #[test]
    fn test_same_seed_same_population() {
        let mut a = Session::new(config(8), 99999).unwrap();
        let mut b = Session::new(config(8), 99999).unwrap();
        a.start();
        b.start();
        for (x, y) in a.balls.iter().zip(&b.balls) {
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.vel, y.vel);
        }

        // Restart continues the stream, reseed replays it
        let first = a.balls[0].pos;
        a.restart();
        assert_ne!(a.balls[0].pos, first);
        a.reseed(99999);
        a.restart();
        assert_eq!(a.balls[0].pos, first);
    }

    #[test]
    fn test_rectangular_population() {
        let cfg = SimConfig {
            ball_count: 12,
            arena: ArenaShape::Rectangular {
                width: 300.0,
                height: 200.0,
            },
            ..Default::default()
        };
        let mut session = Session::new(cfg, 5).unwrap();
        session.start();
        for ball in &session.balls {
            assert!(session.arena().contains(ball.pos, ball.radius));
        }
    }

    #[test]
    fn test_snapshot_carries_bounce_details() {
        let mut session = Session::new(config(2), 3).unwrap();
        session.clear_population();
        let a = session.insert_ball(Vec2::new(242.0, 0.0), Vec2::new(3.0, 0.0));
        session.insert_ball(Vec2::new(-100.0, 0.0), Vec2::new(0.0, 1.0));
        crate::sim::tick(&mut session);

        let snapshot = session.snapshot();
        let ball = &snapshot.balls[0];
        assert_eq!(ball.id, a);
        assert_eq!(ball.prev_pos, Vec2::new(242.0, 0.0));
        assert_eq!(ball.bounces, 1);
        assert_eq!(snapshot.lines.len(), 1);
        assert_eq!(snapshot.lines[0].created_tick, 1);
        assert_eq!(snapshot.lines[0].origin, LineOrigin::Wall);
    }

    #[test]
    fn test_dust_decays_and_is_capped() {
        let mut session = Session::new(config(2), 3).unwrap();
        let line = Line {
            id: LineId(1),
            owner: BallId(1),
            anchor: Vec2::ZERO,
            tip: Vec2::new(10.0, 0.0),
            hue: 30.0,
            created_tick: 0,
            origin: LineOrigin::Wall,
        };
        for _ in 0..100 {
            session.spawn_dust(&line);
        }
        assert_eq!(session.dust.len(), MAX_DUST);
        for _ in 0..40 {
            session.update_dust();
        }
        assert!(session.dust.is_empty());
    }
}
