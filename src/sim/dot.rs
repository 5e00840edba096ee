//! The randomly walking dot
//!
//! The dot knows its own motion vector and arena bounds, but only moves when
//! told to. It has no notion of time; the session decides when a step happens.

use glam::{IVec2, Vec2};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;

/// The wandering dot the player chases
#[derive(Debug, Clone)]
pub struct Dot {
    /// Current position, always inside the arena
    pos: IVec2,
    /// Current direction of motion
    vel: Vec2,
    /// Visual diameter in pixels
    diameter: u32,
    /// Distance moved per update, derived from the diameter
    step: u32,
    /// Bottom-right corner of the playing field (top-left is the origin)
    arena: IVec2,
    /// Owned random source so runs are reproducible
    rng: Pcg32,
}

impl Dot {
    /// Create a dot at `pos` inside an `arena`-sized field
    pub fn new(seed: u64, arena: IVec2, pos: IVec2) -> Self {
        let mut dot = Self {
            pos,
            vel: Vec2::ZERO,
            diameter: DOT_DIAM_DEFAULT,
            step: step_for_diameter(DOT_DIAM_DEFAULT),
            arena: arena.max(IVec2::ZERO),
            rng: Pcg32::seed_from_u64(seed),
        };
        dot.pos = dot.clamped(pos);
        dot
    }

    pub fn pos(&self) -> IVec2 {
        self.pos
    }

    pub fn diameter(&self) -> u32 {
        self.diameter
    }

    /// Distance the dot covers per update
    pub fn step(&self) -> u32 {
        self.step
    }

    /// Move the dot one step in a smoothed random direction.
    ///
    /// Draws a random point on the circle of radius `step` and blends it with
    /// the previous motion vector, so the dot traces curved paths instead of
    /// jittering. Hitting an arena edge clamps the position and inverts that
    /// velocity component, which reads as a bounce. Returns the new position.
    pub fn advance(&mut self) -> IVec2 {
        let step = self.step as f32;
        let dx = self.rng.random_range(-(self.step as i32)..=self.step as i32) as f32;
        let dy_sign = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let random_vec = Vec2::new(dx, dy_sign * (step * step - dx * dx).sqrt());

        self.vel = self.vel * MOTION_WEIGHT + random_vec * (1.0 - MOTION_WEIGHT);
        self.vel = self.vel.normalize_or_zero() * step;

        self.pos += self.vel.round().as_ivec2();
        if self.pos.x < 0 {
            self.pos.x = 0;
            self.vel.x = -self.vel.x;
        } else if self.pos.x > self.arena.x {
            self.pos.x = self.arena.x;
            self.vel.x = -self.vel.x;
        }
        if self.pos.y < 0 {
            self.pos.y = 0;
            self.vel.y = -self.vel.y;
        } else if self.pos.y > self.arena.y {
            self.pos.y = self.arena.y;
            self.vel.y = -self.vel.y;
        }
        self.pos
    }

    /// Directly reposition the dot, still subject to the boundary clamp
    pub fn set_pos(&mut self, pos: IVec2) {
        self.pos = self.clamped(pos);
    }

    /// Resize the playing field.
    ///
    /// The dot keeps its offset from the arena center, so a window resize
    /// doesn't visibly teleport it.
    pub fn set_arena(&mut self, arena: IVec2) {
        let shift = (arena - self.arena) / 2;
        self.arena = arena.max(IVec2::ZERO);
        self.pos = self.clamped(self.pos + shift);
    }

    /// Change the dot's visual diameter, in pixels.
    ///
    /// Movement distance scales with the square root of the diameter so big
    /// dots don't also become fast dots. Returns false (state untouched) for
    /// values outside `DOT_DIAM_MIN..=DOT_DIAM_MAX`.
    pub fn set_diameter(&mut self, diameter: u32) -> bool {
        if !(DOT_DIAM_MIN..=DOT_DIAM_MAX).contains(&diameter) {
            return false;
        }
        self.diameter = diameter;
        self.step = step_for_diameter(diameter);
        true
    }

    /// Distance from `pointer` to the dot, in units of the dot's step distance
    pub fn error_ratio(&self, pointer: Vec2) -> f32 {
        (pointer - self.pos.as_vec2()).length() / self.step as f32
    }

    fn clamped(&self, pos: IVec2) -> IVec2 {
        pos.clamp(IVec2::ZERO, self.arena)
    }

    #[cfg(test)]
    pub(crate) fn vel(&self) -> Vec2 {
        self.vel
    }
}

/// Per-update movement distance for a given diameter.
///
/// Sub-linear on purpose: linear scaling made the big dots too fast.
/// Never below 1 for any legal diameter.
fn step_for_diameter(diameter: u32) -> u32 {
    ((diameter / 2) as f32).sqrt() as u32
}
