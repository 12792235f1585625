// Ridge-soaring beat: waypoints in front of a hill

use glam::{Vec2, Vec3};

/// Turn directions returned by steering; magnitude is a multiple of the turn rate
pub const LEFT: f32 = -1.0;
pub const STRAIGHT: f32 = 0.0;
pub const RIGHT: f32 = 1.0;

/// Waypoints relative to a hill origin, flown in order and repeated
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    origin: Vec2,
    points: Vec<Vec2>,
    next: usize,
    fall_line: Vec3,
}

impl Circuit {
    pub fn new(origin: Vec2, fall_line: Vec3) -> Self {
        Self {
            origin,
            points: Vec::with_capacity(2),
            next: 0,
            fall_line,
        }
    }

    /// Add a waypoint in the hill's local coordinates
    pub fn add(&mut self, local: Vec2) {
        self.points.push(local);
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Direction the beat leans back per unit of height gained
    pub fn fall_line(&self) -> Vec3 {
        self.fall_line
    }

    /// Turn away from the hill on reaching a waypoint
    pub fn turn_dir(&self) -> f32 {
        match self.next {
            0 => RIGHT,
            1 => LEFT,
            _ => STRAIGHT,
        }
    }

    /// The next waypoint in world coordinates
    pub fn next_point(&mut self) -> Vec2 {
        if self.points.is_empty() {
            return self.origin;
        }
        let p = self.points[self.next];
        self.next = (self.next + 1) % self.points.len();
        self.origin + p
    }
}
