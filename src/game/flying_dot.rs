// Shared flight model: a point with a velocity, a local frame and a tail

use glam::Vec3;

use super::circuit::{LEFT, RIGHT, STRAIGHT};
use super::clock::TIME_PER_FRAME;
use super::landscape::Landscape;
use super::movement::{DotState, MovementManager};
use super::sky::Sky;
use super::tail::Tail;

/// Roll steps either side of level
const ROLL_STEPS: i32 = 15;

/// Bank angle at full roll
const ROLL_MAX_ANGLE: f32 = std::f32::consts::FRAC_PI_4;

/// Read-only view of the world a flying dot moves through
#[derive(Clone, Copy)]
pub struct Airspace<'a> {
    pub landscape: &'a Landscape,
    pub sky: &'a Sky,
    /// Model minutes per update
    pub model_dt: f32,
}

/// Local frame: x right wing, y along the velocity, z up, with roll applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFrame {
    pub x: Vec3,
    pub y: Vec3,
    pub z: Vec3,
}

impl LocalFrame {
    /// Local coordinates to a world offset
    pub fn apply(&self, p: Vec3) -> Vec3 {
        self.x * p.x + self.y * p.y + self.z * p.z
    }
}

/// Position, velocity and steering of anything that flies
#[derive(Debug, Clone)]
pub struct FlyingDot {
    position: Vec3,
    /// Displacement per update; horizontal length is `ds`
    velocity: Vec3,
    speed: f32,
    ds: f32,
    model_dt: f32,
    turn_radius: f32,
    frame: LocalFrame,
    roll: i32,
    movement: MovementManager,
    tail: Tail,
}

impl FlyingDot {
    /// `speed` in distance units per model minute; the tail starts at `tail.head()`
    pub fn new(speed: f32, turn_radius: f32, tail: Tail) -> Self {
        let ds = speed * TIME_PER_FRAME;
        let mut dot = Self {
            position: tail.head().unwrap_or(Vec3::ZERO),
            velocity: Vec3::new(0.0, ds, 0.0),
            speed,
            ds,
            model_dt: TIME_PER_FRAME,
            turn_radius,
            frame: LocalFrame {
                x: Vec3::X,
                y: Vec3::Y,
                z: Vec3::Z,
            },
            roll: 0,
            movement: MovementManager::new(),
            tail,
        };
        dot.set_local_frame();
        dot
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Point the dot along `direction` (horizontal part only)
    pub fn set_heading(&mut self, direction: Vec3) {
        let h = Vec3::new(direction.x, direction.y, 0.0);
        self.velocity = h.try_normalize().unwrap_or(Vec3::Y) * self.ds;
        self.set_local_frame();
    }

    #[cfg(test)]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Change speed, e.g. on moving along the polar
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
        self.ds = speed * self.model_dt;
    }

    pub fn ds(&self) -> f32 {
        self.ds
    }

    #[cfg(test)]
    pub fn turn_radius(&self) -> f32 {
        self.turn_radius
    }

    pub fn frame(&self) -> &LocalFrame {
        &self.frame
    }

    #[cfg(test)]
    pub fn roll(&self) -> i32 {
        self.roll
    }

    pub fn movement(&self) -> &MovementManager {
        &self.movement
    }

    pub fn movement_mut(&mut self) -> &mut MovementManager {
        &mut self.movement
    }

    pub fn tail(&self) -> &Tail {
        &self.tail
    }

    pub fn state(&self) -> DotState {
        DotState {
            position: self.position,
            velocity: self.velocity,
            ds: self.ds,
            turn_radius: self.turn_radius,
        }
    }

    /// Set down at `p` flying along +y, level, with the tail collapsed onto it
    pub fn place(&mut self, p: Vec3) {
        self.position = p;
        self.velocity = Vec3::new(0.0, self.ds, 0.0);
        self.roll = 0;
        self.tail.reset(p);
        self.set_local_frame();
    }

    /// Stop dead: level wings and a collapsed tail
    pub fn ground(&mut self) {
        self.velocity.z = 0.0;
        self.roll = 0;
        self.tail.reset(self.position);
        self.set_local_frame();
    }

    pub fn set_climb(&mut self, dz: f32) {
        self.velocity.z = dz;
    }

    /// First half of an update: move, drift, turn and keep clear of the ground
    pub fn advance(&mut self, air: &Airspace) {
        self.position += self.velocity;
        self.position.y += air.sky.wind() * air.model_dt;

        self.model_dt = air.model_dt;
        self.ds = self.speed * air.model_dt;

        let dir = self.movement.next_move(&self.state(), air.sky);
        self.make_turn(dir);
        self.avoid_hills(air.landscape);
    }

    /// Second half, once the vehicle has set its climb: frame and tail
    pub fn finish(&mut self) {
        self.set_local_frame();
        self.tail.move_to(self.position);
    }

    /// Turn: > 0 right, < 0 left, magnitude a multiple of the turn rate.
    ///
    /// For circular motion dv is normal to v with |dv| = v * v / r.
    pub fn make_turn(&mut self, dir: f32) {
        self.velocity.z = 0.0;
        let w = Vec3::Z.cross(self.velocity) * (-dir * self.ds / self.turn_radius);
        self.velocity = (self.velocity + w).try_normalize().unwrap_or(Vec3::Y) * self.ds;
        self.bank(dir);
    }

    fn bank(&mut self, dir: f32) {
        if dir != STRAIGHT {
            self.roll = ((self.roll as f32 + dir) as i32).clamp(-ROLL_STEPS, ROLL_STEPS);
        } else if self.roll > 1 {
            self.roll -= 1;
        } else if self.roll < -1 {
            self.roll += 1;
        } else {
            self.roll = 0;
        }
    }

    /// If the ground ahead rises within a turn radius of us, turn for the lower side
    fn avoid_hills(&mut self, landscape: &Landscape) {
        if self.movement.joined_circuit() {
            return;
        }

        let p = self.position;
        let ahead = p + self.velocity;
        let clearance = p.z - landscape.height(p.x, p.y);
        let clearance_ahead = p.z - landscape.height(ahead.x, ahead.y);

        if clearance < 0.0 {
            return;
        }
        if clearance_ahead < clearance && clearance < self.turn_radius {
            let w = self.velocity.cross(Vec3::Z) * (self.ds / self.turn_radius);
            let right = ahead + w;
            let clearance_right = p.z - landscape.height(right.x, right.y);
            self.make_turn(if clearance_right >= clearance_ahead { RIGHT } else { LEFT });
        }
    }

    /// Axes from the velocity with the current roll applied
    fn set_local_frame(&mut self) {
        let x = self.velocity.cross(Vec3::Z).normalize_or_zero();
        let y = self.velocity.normalize_or_zero();
        let z = x.cross(y);

        if self.roll == 0 {
            self.frame = LocalFrame { x, y, z };
            return;
        }

        let theta = self.roll as f32 / ROLL_STEPS as f32 * ROLL_MAX_ANGLE;
        let (sin, cos) = theta.sin_cos();
        self.frame = LocalFrame {
            x: x * cos - z * sin,
            y,
            z: x * sin + z * cos,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::Color;
    use crate::engine::scene::Layer;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn dot(start: Vec3) -> FlyingDot {
        let tail = Tail::new(10, 2, Color::LIGHT_GRAY, Layer::Default, start);
        FlyingDot::new(1.0, 0.3, tail)
    }

    fn world() -> (Landscape, Sky) {
        let mut rng = StdRng::seed_from_u64(8);
        let mut sky = Sky::new();
        let landscape = Landscape::new(&mut sky, &mut rng);
        // keep lift out of the way
        sky.update(1000.0, |_, _| 0.0);
        (landscape, sky)
    }

    #[test]
    fn test_flies_straight_and_drifts() {
        let (landscape, sky) = world();
        let air = Airspace {
            landscape: &landscape,
            sky: &sky,
            model_dt: TIME_PER_FRAME,
        };
        let mut d = dot(Vec3::new(0.0, -5.0, 1.0));
        for _ in 0..10 {
            d.advance(&air);
            d.finish();
        }
        let p = d.position();
        assert_abs_diff_eq!(p.x, 0.0, epsilon = 1e-5);
        // ten steps of ds plus wind
        assert_abs_diff_eq!(p.y, -5.0 + 10.0 * (0.02 + 0.3 * 0.02), epsilon = 1e-4);
        assert_eq!(d.tail().head(), Some(p));
    }

    #[test]
    fn test_turn_keeps_horizontal_speed() {
        let mut d = dot(Vec3::new(0.0, 0.0, 1.0));
        d.make_turn(RIGHT);
        let v = d.velocity();
        assert!(v.x > 0.0);
        assert_abs_diff_eq!(v.truncate().length(), d.ds(), epsilon = 1e-6);
        assert_eq!(d.roll(), 1);
    }

    #[test]
    fn test_roll_limits_and_levels_out() {
        let mut d = dot(Vec3::ZERO);
        for _ in 0..20 {
            d.make_turn(LEFT);
        }
        assert_eq!(d.roll(), -ROLL_STEPS);

        // fractional turns truncate towards zero
        let mut e = dot(Vec3::ZERO);
        e.make_turn(0.6);
        assert_eq!(e.roll(), 0);
        e.make_turn(2.0);
        assert_eq!(e.roll(), 2);

        for _ in 0..20 {
            d.make_turn(STRAIGHT);
        }
        assert_eq!(d.roll(), 0);
    }

    #[test]
    fn test_local_frame_banks_into_turn() {
        let mut d = dot(Vec3::ZERO);
        d.finish();
        assert_abs_diff_eq!(d.frame().z.z, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(d.frame().x.x, 1.0, epsilon = 1e-6);

        for _ in 0..15 {
            d.make_turn(RIGHT);
        }
        d.finish();
        let up = d.frame().z;
        let bank = up.z.acos();
        assert_abs_diff_eq!(bank, ROLL_MAX_ANGLE, epsilon = 1e-4);
        // right turn: the up axis leans right of the velocity
        assert!(up.dot(d.frame().y.cross(Vec3::Z)) > 0.0);
        assert_abs_diff_eq!(d.frame().x.dot(d.frame().z), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_avoids_rising_ground() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut sky = Sky::new();
        let mut landscape = Landscape::new(&mut sky, &mut rng);
        landscape.load_tiles_around(Vec3::new(0.0, 81.0, 1.0), &mut sky, &mut rng);
        sky.update(1000.0, |_, _| 0.0);
        let air = Airspace {
            landscape: &landscape,
            sky: &sky,
            model_dt: TIME_PER_FRAME,
        };

        // low over the face of the tile 4 ridge heading into it
        let start = Vec3::new(3.0, 83.2, 0.2);
        let mut d = dot(start);
        let ground = landscape.height(start.x, start.y + 0.02);
        assert!(ground > landscape.height(start.x, start.y));
        assert!(0.2 - landscape.height(start.x, start.y) < 0.3);

        d.advance(&air);
        assert!(d.velocity().x.abs() > 0.0);
        assert_ne!(d.roll(), 0);
    }

    #[test]
    fn test_place_resets() {
        let mut d = dot(Vec3::new(0.0, 0.0, 1.0));
        d.make_turn(RIGHT);
        d.place(Vec3::new(4.0, 4.0, 1.5));
        assert_eq!(d.position(), Vec3::new(4.0, 4.0, 1.5));
        assert_eq!(d.roll(), 0);
        assert_eq!(d.velocity(), Vec3::new(0.0, d.ds(), 0.0));
        assert_eq!(d.tail().head(), Some(Vec3::new(4.0, 4.0, 1.5)));
    }
}
