// 3D objects: shared points, wires and ground shadows

use glam::Vec3;

use super::camera::{Camera, ProjectedPoint};
use super::graphics::Graphics;
use super::wire::{Wire, WireStyle};
use crate::core::color::Color;

/// Shadows start just below ground so their points never merge with the caster's
const SHADOW_START_Z: f32 = -0.01;

/// Shadow colour
pub const SHADOW_COLOR: Color = Color::gray(180);

/// Draw layer; every background object is drawn before any default one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    Background = 0,
    Default = 1,
}

impl Layer {
    pub const COUNT: usize = 2;

    pub fn index(self) -> usize {
        self as usize
    }
}

/// A flat shadow following one downward-facing wire of its object
#[derive(Debug, Clone, PartialEq)]
pub struct Shadow {
    caster: usize,
    wire: Wire,
}

impl Shadow {
    pub fn wire(&self) -> &Wire {
        &self.wire
    }
}

/// Points plus the wires drawn over them
#[derive(Debug, Clone, PartialEq)]
pub struct Object3d {
    points: Vec<Vec3>,
    wires: Vec<Wire>,
    shadows: Vec<Shadow>,
    layer: Layer,
}

impl Object3d {
    pub fn new(layer: Layer) -> Self {
        Self {
            points: Vec::new(),
            wires: Vec::new(),
            shadows: Vec::new(),
            layer,
        }
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    pub fn shadows(&self) -> &[Shadow] {
        &self.shadows
    }

    /// Add a point, reusing an identical existing one
    pub fn add_point(&mut self, p: Vec3) -> usize {
        if let Some(i) = self.points.iter().position(|&q| q == p) {
            return i;
        }
        self.points.push(p);
        self.points.len() - 1
    }

    /// Add a wire through `points`; returns its index
    pub fn add_wire(&mut self, points: &[Vec3], color: Color, style: WireStyle) -> usize {
        let indices = points.iter().map(|&p| self.add_point(p)).collect();
        self.wires.push(Wire::new(indices, color, style));
        self.wires.len() - 1
    }

    /// Add a wire that casts a ground shadow; the wire should face down
    pub fn add_wire_with_shadow(&mut self, points: &[Vec3], color: Color, style: WireStyle) -> usize {
        let caster = self.add_wire(points, color, style);

        let indices = points
            .iter()
            .rev()
            .map(|p| self.add_point(Vec3::new(p.x, p.y, SHADOW_START_Z)))
            .collect();
        self.shadows.push(Shadow {
            caster,
            wire: Wire::new(indices, SHADOW_COLOR, WireStyle::SURFACE),
        });
        caster
    }

    /// Tessellate a quad into two triangles, choosing the diagonal that makes it concave or convex
    pub fn add_tile(&mut self, corners: [Vec3; 4], color: Color, solid: bool, concave: bool) {
        let h1 = corners[0].z + corners[2].z;
        let h2 = corners[1].z + corners[3].z;
        let style = WireStyle {
            solid,
            has_normal: true,
        };
        let [c0, c1, c2, c3] = corners;

        if (h1 < h2 && concave) || (h1 > h2 && !concave) {
            self.add_wire(&[c0, c1, c2, c0], color, style);
            self.add_wire(&[c2, c3, c0, c2], color, style);
        } else {
            self.add_wire(&[c0, c1, c3, c0], color, style);
            self.add_wire(&[c2, c3, c1, c2], color, style);
        }
    }

    /// Drop every shadow onto the ground below its caster
    pub fn update_shadow<F: Fn(f32, f32) -> f32>(&mut self, ground: F) {
        for shadow in &self.shadows {
            let caster = &self.wires[shadow.caster];
            let n = caster.indices().len();
            for (j, &from) in caster.indices().iter().enumerate() {
                let p = self.points[from];
                let to = shadow.wire.indices()[n - 1 - j];
                self.points[to] = Vec3::new(p.x, p.y, ground(p.x, p.y));
            }
        }
    }

    /// Set every point from the matching point of `template`, an earlier clone of this object
    pub fn transform_from<F: Fn(Vec3) -> Vec3>(&mut self, template: &Object3d, f: F) {
        for (p, &q) in self.points.iter_mut().zip(template.points.iter()) {
            *p = f(q);
        }
    }

    /// Reverse wire drawing order
    pub fn reverse(&mut self) {
        self.wires.reverse();
    }

    /// Sort key, smaller is further away
    pub fn depth_key(&self, camera: &Camera) -> f32 {
        self.points
            .first()
            .map(|&p| camera.to_camera_space(p).x)
            .unwrap_or(f32::MIN)
    }

    /// Project and draw: shadows first, then wires facing the eye
    pub fn draw(&self, camera: &Camera, g: &mut dyn Graphics) {
        let projected: Vec<ProjectedPoint> = self.points.iter().map(|&p| camera.project(p)).collect();
        if !projected.iter().any(|p| p.visible) {
            return;
        }

        let eye = camera.eye();
        let shadows = self.shadows.iter().map(|s| &s.wire);
        for wire in shadows.chain(self.wires.iter()) {
            if !wire.is_back_face(&self.points, eye) {
                wire.draw(&self.points, &projected, camera, g);
            }
        }
    }
}

impl Default for Object3d {
    fn default() -> Self {
        Self::new(Layer::Default)
    }
}

#[cfg(test)]
mod tests {
    use super::super::graphics::recording::{DrawOp, RecordingGraphics};
    use super::*;

    fn looking_down_camera() -> Camera {
        let mut camera = Camera::new(1000, 600);
        camera.set_eye(Vec3::new(0.5, -6.0, 4.0));
        camera.set_focus(Vec3::new(0.5, 0.5, 0.0));
        camera.update_matrix();
        camera
    }

    #[test]
    fn test_points_are_shared() {
        let mut o = Object3d::default();
        let a = Vec3::ZERO;
        let b = Vec3::X;
        o.add_wire(&[a, b], Color::WHITE, WireStyle::LINE);
        o.add_wire(&[b, a], Color::WHITE, WireStyle::LINE);
        assert_eq!(o.points().len(), 2);
        assert_eq!(o.wires()[1].indices(), &[1, 0]);
    }

    #[test]
    fn test_add_tile_concave_diagonal() {
        let low = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
        ];
        let mut concave = Object3d::default();
        concave.add_tile(low, Color::WHITE, true, true);
        assert_eq!(concave.wires().len(), 2);
        // diagonal 0-2 joins the low corners
        assert_eq!(concave.wires()[0].indices(), &[0, 1, 2, 0]);

        let mut convex = Object3d::default();
        convex.add_tile(low, Color::WHITE, true, false);
        // diagonal 1-3 joins the high corners
        assert_eq!(convex.points()[2], low[3]);
        assert_eq!(convex.wires()[0].indices(), &[0, 1, 2, 0]);
    }

    #[test]
    fn test_shadow_follows_ground() {
        let mut o = Object3d::default();
        let base = [
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(1.0, 0.0, 2.0),
            Vec3::new(1.0, 1.0, 2.0),
            Vec3::new(0.0, 0.0, 2.0),
        ];
        o.add_wire_with_shadow(&base, Color::GRAY, WireStyle::SURFACE);
        assert_eq!(o.shadows().len(), 1);

        o.update_shadow(|x, _| x * 0.5);
        let shadow = o.shadows()[0].wire();
        for &i in shadow.indices() {
            let p = o.points()[i];
            assert_eq!(p.z, p.x * 0.5);
        }
        assert_eq!(shadow.color(), SHADOW_COLOR);
    }

    #[test]
    fn test_transform_from_template() {
        let mut template = Object3d::default();
        template.add_wire(&[Vec3::ZERO, Vec3::Y], Color::WHITE, WireStyle::LINE);
        let mut body = template.clone();
        body.transform_from(&template, |p| p + Vec3::new(5.0, 0.0, 1.0));
        assert_eq!(body.points()[1], Vec3::new(5.0, 1.0, 1.0));
        assert_eq!(template.points()[1], Vec3::Y);
    }

    #[test]
    fn test_draw_skips_back_faces() {
        let camera = looking_down_camera();
        let square = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let mut o = Object3d::default();
        // faces up
        o.add_wire(&[square[0], square[3], square[2], square[1], square[0]], Color::WHITE, WireStyle::SURFACE);
        // faces down
        o.add_wire(&[square[0], square[1], square[2], square[3], square[0]], Color::rgb(255, 0, 0), WireStyle::SURFACE);

        let mut g = RecordingGraphics::default();
        o.draw(&camera, &mut g);
        assert_eq!(g.polygons(), 1);
        assert!(matches!(&g.ops[0], DrawOp::Polygon(c, _) if *c != Color::rgb(255, 0, 0)));
    }

    #[test]
    fn test_draw_nothing_when_out_of_view() {
        let camera = looking_down_camera();
        let mut o = Object3d::default();
        o.add_wire(&[Vec3::new(0.0, -20.0, 0.0), Vec3::new(1.0, -20.0, 0.0)], Color::gray(0), WireStyle::LINE);
        let mut g = RecordingGraphics::default();
        o.draw(&camera, &mut g);
        assert!(g.ops.is_empty());
    }

    #[test]
    fn test_reverse_wire_order() {
        let mut o = Object3d::new(Layer::Background);
        o.add_wire(&[Vec3::ZERO, Vec3::X], Color::WHITE, WireStyle::LINE);
        o.add_wire(&[Vec3::ZERO, Vec3::Y], Color::gray(0), WireStyle::LINE);
        o.reverse();
        assert_eq!(o.wires()[0].color(), Color::gray(0));
        assert_eq!(o.layer(), Layer::Background);
    }
}
