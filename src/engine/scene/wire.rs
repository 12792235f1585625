// Polylines and surfaces over the points of an object

use glam::{Vec2, Vec3};

use super::camera::{Camera, ProjectedPoint};
use super::graphics::Graphics;
use crate::core::color::Color;

/// How a wire is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireStyle {
    /// Filled polygon rather than a line strip
    pub solid: bool,
    /// One-sided: lit by its normal and culled when facing away
    pub has_normal: bool,
}

impl WireStyle {
    /// Unlit, two-sided line strip (roads, tails, cross hairs)
    pub const LINE: WireStyle = WireStyle {
        solid: false,
        has_normal: false,
    };

    /// Lit, one-sided filled polygon
    pub const SURFACE: WireStyle = WireStyle {
        solid: true,
        has_normal: true,
    };
}

/// A polyline (or polygon when solid) over point indices of its object
#[derive(Debug, Clone, PartialEq)]
pub struct Wire {
    indices: Vec<usize>,
    color: Color,
    style: WireStyle,
}

impl Wire {
    pub fn new(indices: Vec<usize>, color: Color, style: WireStyle) -> Self {
        Self {
            indices,
            color,
            style,
        }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    #[cfg(test)]
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn style(&self) -> WireStyle {
        self.style
    }

    /// Unit normal from the first three points (right-hand rule over p0-p1, p2-p1)
    pub fn normal(&self, points: &[Vec3]) -> Option<Vec3> {
        if !self.style.has_normal || self.indices.len() < 3 {
            return None;
        }
        let p0 = points[self.indices[0]];
        let p1 = points[self.indices[1]];
        let p2 = points[self.indices[2]];
        let n = (p0 - p1).cross(p2 - p1).normalize_or_zero();
        (n != Vec3::ZERO).then_some(n)
    }

    /// True when a one-sided wire faces away from the eye
    pub fn is_back_face(&self, points: &[Vec3], eye: Vec3) -> bool {
        match self.normal(points) {
            Some(normal) => normal.dot(points[self.indices[0]] - eye) >= 0.0,
            None => false,
        }
    }

    /// Lit and fogged colour; unlit wires keep their true colour
    pub fn apparent_color(&self, points: &[Vec3], camera: &Camera) -> Color {
        match self.normal(points) {
            Some(normal) => {
                let lit = self.color.scaled(camera.surface_light(normal));
                let depth = camera.to_camera_space(points[self.indices[0]]).x;
                camera.fog(depth, lit)
            }
            None => self.color,
        }
    }

    /// Draw using already projected points.
    ///
    /// A polygon needs every point in view; a line segment needs both ends.
    pub fn draw(
        &self,
        points: &[Vec3],
        projected: &[ProjectedPoint],
        camera: &Camera,
        g: &mut dyn Graphics,
    ) {
        if self.indices.len() <= 1 {
            return;
        }
        g.set_color(self.apparent_color(points, camera));

        if self.style.solid {
            if self.indices.iter().all(|&i| projected[i].visible) {
                let polygon: Vec<Vec2> = self.indices.iter().map(|&i| projected[i].screen).collect();
                g.fill_polygon(&polygon);
            }
            return;
        }

        for pair in self.indices.windows(2) {
            let (a, b) = (projected[pair[0]], projected[pair[1]]);
            if a.visible && b.visible {
                g.draw_line(a.screen, b.screen);
            }
        }
    }
}
