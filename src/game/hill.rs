// Ridges built from cubic sine approximations, with lift on the windward face

use glam::{Vec2, Vec3};

use super::camera_man::CameraTarget;
use super::circuit::Circuit;
use super::glider::SINK_RATE;
use super::landscape::TILE_WIDTH;
use crate::core::color::Color;
use crate::core::math::cubic_sin;
use crate::engine::scene::{Layer, Object3d};

/// Height band above the surface with full ridge lift
const LIFT_FULL_BAND: f32 = 0.1;

/// Which horizontal axis the spine runs along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    X,
    Y,
}

/// Shape of the windward face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    /// Quadratic, one unit wide
    Spiky,
    /// Cubic sine, two units wide
    Curvy,
}

impl Face {
    pub fn width(self) -> f32 {
        match self {
            Face::Spiky => 1.0,
            Face::Curvy => 2.0,
        }
    }
}

/// A ridge whose spine starts at (x0, y0)
#[derive(Debug, Clone)]
pub struct Hill {
    x0: f32,
    y0: f32,
    orientation: Orientation,
    spine_length: i32,
    phase: f32,
    h0: f32,
    face: Face,
    tile_width: f32,
    in_foreground: bool,
    max_height: f32,
    object: Object3d,
}

impl Hill {
    pub fn new(
        x0: i32,
        y0: i32,
        orientation: Orientation,
        spine_length: i32,
        phase: f32,
        h0: f32,
        face: Face,
    ) -> Self {
        let half_tile = TILE_WIDTH / 2.0;
        let in_foreground = (x0 as f32) < half_tile && (x0 as f32) > -half_tile;

        let mut hill = Self {
            x0: x0 as f32,
            y0: y0 as f32,
            orientation,
            spine_length,
            phase,
            h0,
            face,
            // finer mesh on the central strip
            tile_width: if in_foreground { 0.5 } else { 1.0 },
            in_foreground,
            max_height: 0.0,
            object: Object3d::new(Layer::Default),
        };
        hill.tile();
        hill
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x0, self.y0)
    }

    pub fn in_foreground(&self) -> bool {
        self.in_foreground
    }

    /// Highest tiled point
    pub fn max_height(&self) -> f32 {
        self.max_height
    }

    pub fn object(&self) -> &Object3d {
        &self.object
    }

    fn spine_end(&self) -> f32 {
        self.spine_length as f32 + 2.0
    }

    fn tile(&mut self) {
        let tw = self.tile_width;
        let slices = (self.spine_end() / tw) as i32;
        let rows = ((self.face.width() + 1.0) / tw) as i32;

        for s in 0..slices {
            for r in 1..=rows {
                self.add_tile(s as f32 * tw, -1.0 + r as f32 * tw);
            }
        }

        if self.orientation == Orientation::Y {
            self.object.reverse();
        }
    }

    /// Tile at distance i along the spine and j in front of it
    fn add_tile(&mut self, i: f32, j: f32) {
        let tw = self.tile_width;
        let z = |a: f32, b: f32| self.local_height(a, b);

        let corners = match self.orientation {
            Orientation::X => {
                let (x1, y1) = (self.x0 + i, self.y0 - j);
                let (x2, y2) = (x1 + tw, y1 + tw);
                [
                    Vec3::new(x1, y1, z(i, j)),
                    Vec3::new(x1, y2, z(i, j - tw)),
                    Vec3::new(x2, y2, z(i + tw, j - tw)),
                    Vec3::new(x2, y1, z(i + tw, j)),
                ]
            }
            Orientation::Y => {
                let (x1, y1) = (self.x0 + j - tw, self.y0 + i);
                let (x2, y2) = (x1 + tw, y1 + tw);
                [
                    Vec3::new(x1, y1, z(i, j - tw)),
                    Vec3::new(x1, y2, z(i + tw, j - tw)),
                    Vec3::new(x2, y2, z(i + tw, j)),
                    Vec3::new(x2, y1, z(i, j)),
                ]
            }
        };

        for c in &corners {
            self.max_height = self.max_height.max(c.z);
        }
        self.object.add_tile(corners, Color::WHITE, true, true);
    }

    /// Height at i along the spine and j in front of it (negative j is the back face)
    fn local_height(&self, i: f32, j: f32) -> f32 {
        let across = if j < 0.0 {
            1.0 + j
        } else {
            match self.face {
                Face::Curvy => cubic_sin(2.0 - j),
                Face::Spiky => (1.0 - j) * (1.0 - j),
            }
        };
        across * self.spine_height(i)
    }

    /// Spine height a distance i along it
    pub fn spine_height(&self, i: f32) -> f32 {
        let end = self.spine_end();
        if !(0.0..=end).contains(&i) {
            return 0.0;
        }
        if i <= 1.0 {
            return i * i * self.h0;
        }
        let last = self.spine_length as f32 + 1.0;
        if i > last {
            let ii = end - i;
            return ii * ii * self.spine_height(last);
        }
        self.h0 + cubic_sin(i - 1.0 + self.phase) - cubic_sin(self.phase)
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        let face = self.face.width();
        match self.orientation {
            Orientation::X => {
                y >= self.y0 - face && y <= self.y0 + 1.0 && x > self.x0 && x < self.x0 + self.spine_end()
            }
            Orientation::Y => {
                x <= self.x0 + face && x >= self.x0 - 1.0 && y > self.y0 && y < self.y0 + self.spine_end()
            }
        }
    }

    /// Ground height at a world point over this hill
    pub fn height(&self, x: f32, y: f32) -> f32 {
        match self.orientation {
            Orientation::X => self.local_height(x - self.x0, self.y0 - y),
            Orientation::Y => self.local_height(y - self.y0, x - self.x0),
        }
    }

    /// Ridge lift: strongest close to the windward face, none above 1.1 units
    pub fn lift(&self, p: Vec3) -> f32 {
        let lift_max = -3.0 * SINK_RATE;
        if p.y >= self.y0 {
            return 0.0;
        }

        let h = p.z - self.height(p.x, p.y);
        if h < LIFT_FULL_BAND {
            lift_max
        } else if h < 1.0 + LIFT_FULL_BAND {
            let f = (2.0 + LIFT_FULL_BAND - h) / 2.0;
            f * f * f * lift_max
        } else {
            0.0
        }
    }

    /// Beat along the windward face, leaning back as height is gained
    pub fn circuit(&self) -> Circuit {
        let face = self.face.width();
        let end = 1.0 + self.spine_length as f32;
        match self.orientation {
            Orientation::X => {
                let mut circuit = Circuit::new(self.origin(), Vec3::Y);
                circuit.add(Vec2::new(1.0, -face));
                circuit.add(Vec2::new(end, -face));
                circuit
            }
            Orientation::Y => {
                let mut circuit = Circuit::new(self.origin(), Vec3::NEG_X);
                circuit.add(Vec2::new(face, 1.0));
                circuit.add(Vec2::new(face, end));
                circuit
            }
        }
    }
}

impl CameraTarget for Hill {
    fn eye(&self) -> Vec3 {
        let reach = 2.0 + self.spine_length as f32;
        match self.orientation {
            Orientation::X => Vec3::new(self.x0 + reach, self.y0 - reach, 0.8),
            Orientation::Y => Vec3::new(self.x0 + reach, self.y0, 0.8),
        }
    }

    fn focus(&self) -> Vec3 {
        let mid = (2.0 + self.spine_length as f32) / 2.0;
        match self.orientation {
            Orientation::X => Vec3::new(self.x0 + mid, self.y0, self.h0 / 2.0),
            Orientation::Y => Vec3::new(self.x0, self.y0 + mid, self.h0 / 2.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn ridge() -> Hill {
        Hill::new(2, 45, Orientation::X, 2, 0.3, 0.5, Face::Curvy)
    }

    #[test]
    fn test_foreground_resolution() {
        let near = ridge();
        assert!(near.in_foreground());
        assert_eq!(near.tile_width, 0.5);
        // 8 slices by 6 rows, two triangles each
        assert_eq!(near.object().wires().len(), 96);

        let far = Hill::new(-14, 60, Orientation::Y, 6, 1.0, 1.0, Face::Spiky);
        assert!(!far.in_foreground());
        assert_eq!(far.tile_width, 1.0);
        assert_eq!(far.object().wires().len(), 8 * 2 * 2);
    }

    #[test]
    fn test_spine_height_profile() {
        let hill = ridge();
        assert_eq!(hill.spine_height(-0.1), 0.0);
        assert_eq!(hill.spine_height(4.1), 0.0);
        assert_abs_diff_eq!(hill.spine_height(0.5), 0.125);
        assert_abs_diff_eq!(hill.spine_height(1.0), 0.5);
        assert_abs_diff_eq!(hill.spine_height(4.0), 0.0);
        // symmetric ramp down over the last unit
        let top_end = hill.spine_height(3.0);
        assert_abs_diff_eq!(hill.spine_height(3.5), 0.25 * top_end, epsilon = 1e-5);
    }

    #[test]
    fn test_height_faces() {
        let hill = ridge();
        // on the spine
        assert_abs_diff_eq!(hill.height(3.0, 45.0), hill.spine_height(1.0));
        // back face ends one unit behind
        assert_abs_diff_eq!(hill.height(3.0, 46.0), 0.0);
        // curvy front face ends two units in front
        assert_abs_diff_eq!(hill.height(3.0, 43.0), 0.0, epsilon = 1e-6);
        assert!(hill.height(3.0, 44.0) > 0.0);
    }

    #[test]
    fn test_contains() {
        let hill = ridge();
        assert!(hill.contains(3.0, 44.0));
        assert!(!hill.contains(2.0, 44.0));
        assert!(!hill.contains(3.0, 42.5));
        assert!(!hill.contains(3.0, 46.5));

        let side = Hill::new(-14, 60, Orientation::Y, 6, 1.0, 1.0, Face::Spiky);
        assert!(side.contains(-14.0, 61.0));
        assert!(!side.contains(-12.5, 61.0));
    }

    #[test]
    fn test_max_height_tracks_tiles() {
        let hill = ridge();
        assert!(hill.max_height() >= 0.5);
        assert!(hill.max_height() < 2.0);
    }

    #[test]
    fn test_lift_profile() {
        let hill = ridge();
        let lift_max = -3.0 * SINK_RATE;
        let ground = hill.height(3.0, 44.0);

        assert_abs_diff_eq!(hill.lift(Vec3::new(3.0, 44.0, ground + 0.05)), lift_max);
        let mid = hill.lift(Vec3::new(3.0, 44.0, ground + 0.6));
        assert!(mid > 0.0 && mid < lift_max);
        assert_eq!(hill.lift(Vec3::new(3.0, 44.0, ground + 1.2)), 0.0);
        // behind the spine
        assert_eq!(hill.lift(Vec3::new(3.0, 45.5, 0.1)), 0.0);
    }

    #[test]
    fn test_circuit_in_front_of_face() {
        let hill = ridge();
        let mut circuit = hill.circuit();
        assert_eq!(circuit.fall_line(), Vec3::Y);
        assert_eq!(circuit.next_point(), Vec2::new(3.0, 43.0));
        assert_eq!(circuit.next_point(), Vec2::new(5.0, 43.0));

        let side = Hill::new(-14, 60, Orientation::Y, 6, 1.0, 1.0, Face::Spiky);
        let mut circuit = side.circuit();
        assert_eq!(circuit.fall_line(), Vec3::NEG_X);
        assert_eq!(circuit.next_point(), Vec2::new(-13.0, 61.0));
    }

    #[test]
    fn test_camera_framing() {
        let hill = ridge();
        assert_eq!(hill.eye(), Vec3::new(6.0, 41.0, 0.8));
        assert_eq!(hill.focus(), Vec3::new(4.0, 45.0, 0.25));
    }
}
