// Cumulus clouds: life cycle, shape and the thermal underneath

use glam::Vec3;
use rand::Rng;

use super::camera_man::CameraTarget;
use super::glider::SINK_RATE;
use super::landscape::TILE_WIDTH;
use crate::core::color::Color;
use crate::core::math::rnd;
use crate::engine::scene::{Layer, Object3d, WireStyle};

/// Model minutes spent growing
pub const NOSE: f32 = 10.0;

/// Model minutes spent dying
pub const TAIL: f32 = 8.0;

/// Cloud tops and thermal columns lean downwind this much per unit height
pub const WIND_SLOPE: f32 = 0.5;

/// Lift reaches zero at this distance from the thermal core
const LIFT_OUTER: f32 = 1.0;

/// Full lift within this distance of the thermal core
const LIFT_INNER: f32 = 0.5;

const CLOUD_COLOR: i32 = 230;

/// Stronger clouds are darker by this much per unit of strength
const CLOUD_COLOR_STEP: i32 = 20;

/// Identifies a cloud within the sky
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CloudId(pub u64);

/// A cloud with the thermal feeding it
#[derive(Debug, Clone)]
pub struct Cloud {
    id: CloudId,
    /// Centre of the cloud base; z is the cloud base
    center: Vec3,
    max_radius: f32,
    lift_max: f32,
    color: Color,
    in_foreground: bool,
    decaying: bool,
    age: f32,
    mature: f32,
    theta: [f32; 4],
    lambda: [f32; 4],
    /// Picks one of the camera framings
    framing: f32,
    object: Object3d,
}

impl Cloud {
    /// `duration` is the mature phase in model minutes; `strength` scales size and lift
    pub fn new<R: Rng + ?Sized>(
        id: CloudId,
        x: f32,
        y: f32,
        cloud_base: f32,
        duration: i32,
        strength: i32,
        rng: &mut R,
    ) -> Self {
        let mut theta = [0.0; 4];
        let mut lambda = [0.0; 4];
        for quad in 0..4 {
            let lower = quad as f32 * 90.0;
            theta[quad] = rnd(rng, lower, lower + 80.0);
        }
        for l in &mut lambda {
            *l = rnd(rng, 20.0, 50.0);
        }

        let shade = (CLOUD_COLOR - (strength - 1) * CLOUD_COLOR_STEP).clamp(0, 255) as u8;
        let half_tile = TILE_WIDTH / 2.0;

        let mut cloud = Self {
            id,
            center: Vec3::new(x, y, cloud_base),
            // strength is measured in multiples of the glider sink rate
            max_radius: strength as f32,
            lift_max: -(1.0 + strength as f32) * SINK_RATE,
            color: Color::gray(shade),
            in_foreground: x < half_tile && x > -half_tile,
            decaying: false,
            age: 0.1,
            mature: duration as f32,
            theta,
            lambda,
            framing: rnd(rng, 0.0, 1.0),
            object: Object3d::new(Layer::Default),
        };
        cloud.rebuild(|_, _| 0.0);
        cloud
    }

    pub fn id(&self) -> CloudId {
        self.id
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn age(&self) -> f32 {
        self.age
    }

    pub fn is_decaying(&self) -> bool {
        self.decaying
    }

    /// Only clouds over the central strip produce lift
    pub fn in_foreground(&self) -> bool {
        self.in_foreground
    }

    #[cfg(test)]
    pub fn lift_max(&self) -> f32 {
        self.lift_max
    }

    #[cfg(test)]
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn object(&self) -> &Object3d {
        &self.object
    }

    fn lifetime(&self) -> f32 {
        NOSE + self.mature + TAIL
    }

    /// Thermal column y at height z; it leans upwind below the cloud
    pub fn y_at(&self, z: f32) -> f32 {
        self.center.y - (self.center.z - z) * WIND_SLOPE
    }

    /// Climb rate at p
    pub fn lift(&self, p: Vec3) -> f32 {
        if p.z > self.center.z {
            return 0.0;
        }
        let dx = self.center.x - p.x;
        let dy = self.y_at(p.z) - p.y;
        let r = (dx * dx + dy * dy).sqrt();

        if r >= LIFT_OUTER {
            0.0
        } else if r > LIFT_INNER {
            self.lift_max * (1.0 - (r - LIFT_INNER) / (LIFT_OUTER - LIFT_INNER))
        } else {
            self.lift_max
        }
    }

    /// True when p is in this cloud's lift
    pub fn is_under(&self, p: Vec3) -> bool {
        let y = self.y_at(p.z);
        if (p.x - self.center.x).abs() > LIFT_OUTER || (p.y - y).abs() > LIFT_OUTER {
            return false;
        }
        self.lift(p) > 0.0
    }

    /// Radius by age: sqrt growth, steady when mature, sqrt decay
    pub fn radius(&self) -> f32 {
        let f = if self.age <= NOSE {
            (self.age / NOSE).sqrt()
        } else if self.age <= NOSE + self.mature {
            1.0
        } else if self.age <= self.lifetime() {
            (1.0 - (self.age - self.mature - NOSE) / TAIL).sqrt()
        } else {
            0.0
        };
        f * self.max_radius
    }

    /// The base evaporates faster than the top
    fn base_radius(&self, radius: f32) -> f32 {
        if self.age <= NOSE + self.mature {
            return radius;
        }
        let f = (1.0 - (self.age - self.mature - NOSE) / TAIL).max(0.0).sqrt();
        radius * (2.0 * (f - 0.5)).max(0.2)
    }

    /// Age, drift and reshape; returns false once the cloud has gone
    pub fn update<F: Fn(f32, f32) -> f32>(&mut self, dt: f32, wind: f32, cloud_base: f32, ground: F) -> bool {
        self.age += dt;
        if self.age > NOSE + self.mature + TAIL * 0.5 {
            self.decaying = true;
        }
        if self.age > self.lifetime() {
            return false;
        }

        self.center.y += wind * dt;
        self.center.z = cloud_base;
        self.rebuild(ground);
        true
    }

    /// Skip what is left of the mature phase
    pub fn hurry(&mut self) {
        if self.age < NOSE + self.mature {
            self.mature = if self.age > NOSE {
                self.age.floor() - NOSE
            } else {
                0.0
            };
        }
    }

    /// Expire at the next update
    pub fn expire(&mut self) {
        self.age = self.lifetime();
    }

    /// Spherical angles in degrees to an offset, tops pushed downwind
    fn spherical(r: f32, theta: f32, lambda: f32) -> Vec3 {
        let (a, b) = (theta.to_radians(), lambda.to_radians());
        let mut v = Vec3::new(r * b.cos() * a.cos(), r * b.cos() * a.sin(), r * b.sin());
        v.y += WIND_SLOPE * v.z;
        v
    }

    fn corners(&self) -> [Vec3; 8] {
        let r = self.radius();
        let rb = self.base_radius(r);
        let (t, l) = (&self.theta, &self.lambda);
        let c = self.center;

        [
            c + Self::spherical(rb, t[0], 0.0),
            c + Self::spherical(r, t[0], l[0]),
            c + Self::spherical(r, t[3], l[3]),
            c + Self::spherical(rb, t[3], 0.0),
            c + Self::spherical(rb, t[1], 0.0),
            c + Self::spherical(r, t[1], l[1]),
            c + Self::spherical(r, t[2], l[2]),
            c + Self::spherical(rb, t[2], 0.0),
        ]
    }

    fn rebuild<F: Fn(f32, f32) -> f32>(&mut self, ground: F) {
        let c = self.corners();
        let color = self.color;
        let mut o = Object3d::new(Layer::Default);

        // front, back
        o.add_wire(&[c[1], c[0], c[3], c[2], c[1]], color, WireStyle::SURFACE);
        o.add_wire(&[c[4], c[5], c[6], c[7], c[4]], color, WireStyle::SURFACE);
        // base
        o.add_wire_with_shadow(&[c[0], c[4], c[7], c[3], c[0]], color, WireStyle::SURFACE);
        // top
        o.add_tile([c[1], c[2], c[6], c[5]], color, true, false);
        // right, left
        o.add_wire(&[c[0], c[1], c[5], c[4], c[0]], color, WireStyle::SURFACE);
        o.add_wire(&[c[2], c[3], c[7], c[6], c[2]], color, WireStyle::SURFACE);

        o.update_shadow(ground);
        self.object = o;
    }
}

impl CameraTarget for Cloud {
    fn focus(&self) -> Vec3 {
        Vec3::new(self.center.x, self.center.y + 2.0, 1.0)
    }

    fn eye(&self) -> Vec3 {
        let (x, y) = (self.center.x, self.center.y);
        let dx = if x > 0.0 { 1.0 } else { -1.0 };
        if self.framing > 0.7 {
            Vec3::new(x + 3.0 * dx, y - 3.0, 0.1)
        } else if self.framing > 0.3 {
            Vec3::new(x + dx, y - 5.0, 1.5)
        } else {
            Vec3::new(x, y - 2.5, 1.2)
        }
    }
}
