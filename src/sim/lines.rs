//! Line-elimination rule
//!
//! Every bounce gives a ball a new line. A line is cut as soon as another
//! ball's circle touches it; a ball that once had lines and has none left is
//! eliminated while more than one ball remains. All cuts found in one pass
//! are applied together. A ball never cuts its own lines, standing at the tip
//! of every one of them.

use glam::Vec2;
use std::collections::HashSet;

use super::ball::{Ball, BallId, Line, LineId, LineOrigin};
use super::state::{LineRef, Session, SimEvent};

/// Whether `ball` cuts `line`
pub fn crosses(ball: &Ball, line: &Line) -> bool {
    ball.id != line.owner && line.distance_to(ball.pos) <= ball.radius
}

impl Session {
    /// Move every line tip to its owner's current position
    pub fn refresh_line_tips(&mut self) {
        for ball in &mut self.balls {
            ball.refresh_line_tips();
        }
    }

    /// Lines touched by a ball this tick, with the first ball (by id) that
    /// touches each one
    pub fn find_crossings(&self) -> Vec<(LineRef, BallId)> {
        let mut cuts = Vec::new();
        for r in &self.line_order {
            let Some(owner) = self.ball(r.owner) else {
                continue;
            };
            let Some(line) = owner.lines.iter().find(|l| l.id == r.line) else {
                continue;
            };
            if let Some(cutter) = self.balls.iter().find(|b| crosses(b, line)) {
                cuts.push((*r, cutter.id));
            }
        }
        cuts
    }

    /// Remove a batch of lines from their owners and the registry at once
    ///
    /// Returns how many lines were actually removed.
    pub fn remove_lines<I>(&mut self, cuts: I) -> usize
    where
        I: IntoIterator<Item = (LineRef, Option<BallId>)>,
    {
        let mut removed_ids = HashSet::new();
        for (r, by) in cuts {
            let removed = self.ball_mut(r.owner).and_then(|b| b.remove_line(r.line));
            let Some(line) = removed else {
                continue;
            };
            log::trace!("line {:?} of {:?} cut by {:?}", r.line, r.owner, by);
            if self.config.dust {
                self.spawn_dust(&line);
            }
            self.events.push(SimEvent::LineCut {
                line: r.line,
                owner: r.owner,
                by,
            });
            removed_ids.insert(r.line);
        }
        if !removed_ids.is_empty() {
            self.line_order.retain(|r| !removed_ids.contains(&r.line));
        }
        removed_ids.len()
    }

    /// Give `owner` a new line anchored at `anchor`, tip at its position
    ///
    /// Enforces the live-line cap by evicting the oldest lines.
    pub fn add_line(&mut self, owner: BallId, anchor: Vec2, origin: LineOrigin) -> Option<LineId> {
        let id = LineId(self.next_entity_id());
        let created_tick = self.time_ticks;
        let ball = self.ball_mut(owner)?;
        let line = Line {
            id,
            owner,
            anchor,
            tip: ball.pos,
            hue: ball.hue,
            created_tick,
            origin,
        };
        ball.attach_line(line);
        self.line_order.push_back(LineRef { line: id, owner });
        self.events.push(SimEvent::LineCreated {
            line: id,
            owner,
            origin,
        });
        self.enforce_line_cap();
        Some(id)
    }

    /// Evict the oldest lines beyond `max_live_lines`
    fn enforce_line_cap(&mut self) {
        let Some(cap) = self.config.max_live_lines else {
            return;
        };
        if self.line_order.len() <= cap {
            return;
        }
        let excess = self.line_order.len() - cap;
        let oldest: Vec<_> = self
            .line_order
            .iter()
            .take(excess)
            .map(|r| (*r, None))
            .collect();
        self.remove_lines(oldest);
    }

    /// Remove spent balls, newest first, while more than one remains
    pub fn eliminate_balls(&mut self) -> Vec<BallId> {
        let mut eliminated = Vec::new();
        let mut i = self.balls.len();
        while i > 0 {
            i -= 1;
            if self.balls.len() > 1 && self.balls[i].is_spent() {
                let ball = self.balls.remove(i);
                // Purge anything still registered to it
                self.line_order.retain(|r| r.owner != ball.id);
                log::debug!(
                    "ball {:?} eliminated at tick {}, {} left",
                    ball.id,
                    self.time_ticks,
                    self.balls.len()
                );
                self.events.push(SimEvent::BallEliminated { ball: ball.id });
                self.last_elimination_tick = self.time_ticks;
                eliminated.push(ball.id);
            }
        }
        eliminated
    }

    /// Whether the run has gone `stalemate_ticks` without an elimination
    pub fn stalemate_due(&self) -> bool {
        self.balls.len() > 1
            && self
                .config
                .stalemate_ticks
                .is_some_and(|limit| self.time_ticks - self.last_elimination_tick >= limit)
    }

    /// Remove the ball with the fewest lines (newest on ties)
    ///
    /// Used once no ball has been eliminated for `stalemate_ticks`.
    pub fn break_stalemate(&mut self) -> Option<BallId> {
        if self.balls.len() < 2 {
            return None;
        }
        let loser = self
            .balls
            .iter()
            .min_by_key(|b| (b.lines.len(), std::cmp::Reverse(b.id)))?
            .id;
        let i = self.balls.binary_search_by_key(&loser, |b| b.id).ok()?;
        self.balls.remove(i);
        self.line_order.retain(|r| r.owner != loser);
        log::info!(
            "stalemate after {} ticks without elimination, removing {:?}",
            self.time_ticks - self.last_elimination_tick,
            loser
        );
        self.events.push(SimEvent::BallEliminated { ball: loser });
        self.last_elimination_tick = self.time_ticks;
        Some(loser)
    }
}
