// Glider mesh: two swept wing panels with anhedral, in the glider's local frame

use glam::Vec3;

use crate::core::color::Color;
use crate::engine::scene::{Layer, Object3d, WireStyle};

/// Mesh scale from unit wing span
const SCALE: f32 = 0.1;

const CHORD: f32 = 0.2;
const NOSE_Z: f32 = CHORD * 0.3;
const ANHEDRAL: f32 = 0.15;
const SWEEP: f32 = 0.4;

/// Height of the wing tips above the keel
pub const BODY_HEIGHT: f32 = (NOSE_Z + ANHEDRAL) * SCALE;

/// Nose, right tip (leading, trailing), keel, left tip (trailing, leading)
const POINTS: [[f32; 3]; 6] = [
    [0.0, CHORD, NOSE_Z],
    [1.0, CHORD - SWEEP, NOSE_Z + ANHEDRAL],
    [1.0, -SWEEP, ANHEDRAL],
    [0.0, 0.0, 0.0],
    [-1.0, -SWEEP, ANHEDRAL],
    [-1.0, CHORD - SWEEP, NOSE_Z + ANHEDRAL],
];

/// Counter-clockwise seen from above
const TRIANGLES: [[usize; 3]; 4] = [[0, 1, 2], [0, 2, 3], [3, 4, 5], [3, 5, 0]];

/// Template glider in local coordinates; bodies are transformed copies of it
#[derive(Debug, Clone)]
pub struct GliderShape {
    object: Object3d,
}

impl GliderShape {
    pub fn new(color: Color) -> Self {
        let p = |i: usize| Vec3::from_array(POINTS[i]) * SCALE;

        let mut object = Object3d::new(Layer::Default);
        for [a, b, c] in TRIANGLES {
            let (a, b, c) = (p(a), p(b), p(c));
            object.add_wire(&[a, b, c, a], color, WireStyle::SURFACE);
            // underside casts the shadow
            object.add_wire_with_shadow(&[a, c, b, a], color, WireStyle::SURFACE);
        }
        Self { object }
    }

    pub fn object(&self) -> &Object3d {
        &self.object
    }
}
