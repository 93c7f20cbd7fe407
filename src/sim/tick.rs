//! Simulation tick
//!
//! Core loop step that advances a running session deterministically. The
//! order is fixed: line cuts and eliminations are settled on the state left
//! by the previous tick before any ball moves again.

use glam::Vec2;

use super::ball::{BallId, LineOrigin};
use super::collision::{pair_mut, resolve_ball_collision};
use super::state::{RunState, Session, SimEvent};

/// What a single tick did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// False when the session was not running
    pub ran: bool,
    pub lines_cut: usize,
    pub eliminated: Vec<BallId>,
    pub finished: bool,
}

impl TickReport {
    pub fn skipped() -> Self {
        Self::default()
    }
}

/// Advance the session by one tick
pub fn tick(session: &mut Session) -> TickReport {
    // Don't tick if idle, paused or finished
    if session.state != RunState::Running {
        return TickReport::skipped();
    }

    session.events.clear();
    session.time_ticks += 1;

    session.refresh_line_tips();

    let cuts = session.find_crossings();
    let lines_cut = session.remove_lines(cuts.into_iter().map(|(r, by)| (r, Some(by))));

    let mut eliminated = session.eliminate_balls();
    if eliminated.is_empty() && session.stalemate_due() {
        eliminated.extend(session.break_stalemate());
    }

    if session.check_finished() {
        session.update_dust();
        return TickReport {
            ran: true,
            lines_cut,
            eliminated,
            finished: true,
        };
    }

    advance_balls(session);
    resolve_collisions(session);
    session.update_dust();

    TickReport {
        ran: true,
        lines_cut,
        eliminated,
        finished: false,
    }
}

/// Motion and wall bounces; every bounce becomes a line
fn advance_balls(session: &mut Session) {
    let physics = session.config.physics;
    let trail_length = session.config.trail_length;

    let mut bounces: Vec<(BallId, Vec2)> = Vec::new();
    for ball in &mut session.balls {
        if let Some(contact) = ball.advance(&session.arena, &physics, &mut session.rng) {
            bounces.push((ball.id, contact.point));
        }
        ball.record_trail(trail_length);
    }

    for (ball, point) in bounces {
        session.events.push(SimEvent::WallBounce { ball, point });
        session.add_line(ball, point, LineOrigin::Wall);
    }
}

/// Pairwise ball collisions, then push everyone back inside the arena
fn resolve_collisions(session: &mut Session) {
    let energy = session.config.collision_energy;
    let n = session.balls.len();

    let mut hits = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            let (a, b) = pair_mut(&mut session.balls, i, j);
            if let Some(hit) = resolve_ball_collision(a, b, energy) {
                hits.push((a.id, a.pos, b.id, b.pos, hit.normal));
            }
        }
    }

    // Separation may have pushed a ball through the wall
    let arena = session.arena;
    for ball in &mut session.balls {
        ball.pos = arena.confine(ball.pos, ball.radius);
    }

    let collision_lines = session.config.lines_on_collision;
    for (a, pa, b, pb, normal) in hits {
        session.events.push(SimEvent::BallCollision { a, b, normal });
        if collision_lines {
            session.add_line(a, pa, LineOrigin::Collision);
            session.add_line(b, pb, LineOrigin::Collision);
        }
    }
}
