// Jets: fast, high flying dots with long contrails that buzz a glider

use glam::{Vec2, Vec3};

use super::flying_dot::{Airspace, FlyingDot};
use super::tail::Tail;
use crate::core::color::Color;
use crate::engine::scene::{Layer, Object3d};

const SPEED: f32 = 5.0;
const ALTITUDE: f32 = 6.0;
pub const TURN_RADIUS: f32 = 16.0;

/// Distance from the buzzed glider, in x or y, before turning back
const RANGE: f32 = 40.0;

const TAIL_LENGTH: usize = 240;
const TAIL_COLOR: Color = Color::gray(200);

#[derive(Debug, Clone)]
pub struct JetTrail {
    dot: FlyingDot,
}

impl JetTrail {
    /// A jet at (x, y) flying down the course
    pub fn new(x: f32, y: f32) -> Self {
        let start = Vec3::new(x, y, ALTITUDE);
        let tail = Tail::new(TAIL_LENGTH, 1, TAIL_COLOR, Layer::Background, start);
        Self {
            dot: FlyingDot::new(SPEED, TURN_RADIUS, tail),
        }
    }

    /// Fly across the course towards -x instead
    pub fn fly_across(mut self) -> Self {
        self.dot.set_heading(Vec3::NEG_X);
        self
    }

    #[cfg(test)]
    pub fn position(&self) -> Vec3 {
        self.dot.position()
    }

    #[cfg(test)]
    pub fn velocity(&self) -> Vec3 {
        self.dot.velocity()
    }

    pub fn trail(&self) -> &Object3d {
        self.dot.tail().object()
    }

    /// Level flight, turning back towards `buzz` when out of range
    pub fn update(&mut self, air: &Airspace, buzz: Vec3) {
        self.dot.advance(air);
        self.dot.set_climb(0.0);
        self.dot.finish();
        self.check_bounds(buzz);
    }

    fn check_bounds(&mut self, buzz: Vec3) {
        let p = self.dot.position();
        if (p.x - buzz.x).abs() > RANGE || (p.y - buzz.y).abs() > RANGE {
            self.dot
                .movement_mut()
                .set_target(Vec2::new(buzz.x, buzz.y + TURN_RADIUS));
        }
    }
}
