// CPU-side geometry rebuilt every frame and uploaded in one go

use font8x8::{UnicodeFonts, BASIC_FONTS};
use glam::{Mat4, Vec2, Vec3};

use super::vertex::Vertex;
use crate::core::color::Color;
use crate::engine::scene::camera::DEPTH_OF_VISION;
use crate::engine::scene::{Camera, Graphics, Object3d, RenderQueue};

/// Segments used to fill a circle
const CIRCLE_SEGMENTS: usize = 16;

/// Lift shadows off the ground they lie on
const SHADOW_LIFT: f32 = 0.002;

const NEAR_PLANE: f32 = 0.01;

/// Glyph cell of the bitmap font, in pixels
const GLYPH_SIZE: f32 = 8.0;

/// 2D drawing in screen pixels, turned into triangles.
///
/// Text is drawn from an 8x8 bitmap font and also kept aside for the window title.
#[derive(Debug, Default)]
pub struct CanvasBatch {
    color: Color,
    vertices: Vec<Vertex>,
    texts: Vec<(String, Vec2)>,
}

impl CanvasBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.texts.clear();
    }

    /// Triangle list
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// The status line: the leftmost string, instruments sit on the right
    pub fn status_line(&self) -> Option<&str> {
        self.texts
            .iter()
            .min_by(|a, b| a.1.x.total_cmp(&b.1.x))
            .map(|(t, _)| t.as_str())
    }

    /// One glyph with its baseline at `origin`; unknown characters draw nothing
    fn glyph(&mut self, ch: char, origin: Vec2) {
        let Some(rows) = BASIC_FONTS.get(ch) else {
            return;
        };
        let top = origin.y - GLYPH_SIZE;
        for (row, bits) in rows.iter().enumerate() {
            let y = top + row as f32;
            let mut col = 0;
            // bit 0 is the leftmost pixel; runs of set bits become one quad
            while col < 8 {
                if bits & (1 << col) == 0 {
                    col += 1;
                    continue;
                }
                let start = col;
                while col < 8 && bits & (1 << col) != 0 {
                    col += 1;
                }
                let a = Vec2::new(origin.x + start as f32, y);
                let c = Vec2::new(origin.x + col as f32, y + 1.0);
                self.triangle(a, Vec2::new(c.x, a.y), c);
                self.triangle(a, c, Vec2::new(a.x, c.y));
            }
        }
    }

    fn triangle(&mut self, a: Vec2, b: Vec2, c: Vec2) {
        let color = self.color;
        self.vertices.extend(
            [a, b, c]
                .into_iter()
                .map(|p| Vertex::new(p.extend(0.0), color)),
        );
    }
}

impl Graphics for CanvasBatch {
    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// A one pixel wide quad
    fn draw_line(&mut self, from: Vec2, to: Vec2) {
        let along = (to - from).normalize_or_zero();
        if along == Vec2::ZERO {
            return;
        }
        let side = along.perp() * 0.5;
        let (a, b, c, d) = (from + side, to + side, to - side, from - side);
        self.triangle(a, b, c);
        self.triangle(a, c, d);
    }

    fn fill_polygon(&mut self, points: &[Vec2]) {
        let points = match points {
            [first, .., last] if points.len() > 3 && first == last => &points[..points.len() - 1],
            _ => points,
        };
        if points.len() < 3 {
            return;
        }
        for pair in points[1..].windows(2) {
            self.triangle(points[0], pair[0], pair[1]);
        }
    }

    fn fill_circle(&mut self, top_left: Vec2, diameter: f32) {
        let r = diameter / 2.0;
        let center = top_left + Vec2::splat(r);
        let rim = |i: usize| {
            let angle = i as f32 / CIRCLE_SEGMENTS as f32 * std::f32::consts::TAU;
            center + Vec2::new(angle.cos(), angle.sin()) * r
        };
        for i in 0..CIRCLE_SEGMENTS {
            self.triangle(center, rim(i), rim(i + 1));
        }
    }

    fn draw_string(&mut self, text: &str, position: Vec2) {
        for (i, ch) in text.chars().enumerate() {
            self.glyph(ch, position + Vec2::X * (i as f32 * GLYPH_SIZE));
        }
        self.texts.push((text.to_string(), position));
    }
}

/// The scene as world-space triangles and lines for the depth-buffered pipeline
#[derive(Debug, Default)]
pub struct MeshBatch {
    triangles: Vec<Vertex>,
    lines: Vec<Vertex>,
}

impl MeshBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.triangles.clear();
        self.lines.clear();
    }

    pub fn triangles(&self) -> &[Vertex] {
        &self.triangles
    }

    pub fn lines(&self) -> &[Vertex] {
        &self.lines
    }

    pub fn add_queue(&mut self, queue: &RenderQueue, camera: &Camera) {
        for object in queue.sorted(camera) {
            self.add_object(object, camera);
        }
    }

    /// Same face culling and colours as the software path
    pub fn add_object(&mut self, object: &Object3d, camera: &Camera) {
        let points = object.points();
        let eye = camera.eye();

        for shadow in object.shadows() {
            let wire = shadow.wire();
            if wire.is_back_face(points, eye) {
                continue;
            }
            let color = wire.apparent_color(points, camera);
            let lifted: Vec<Vec3> = wire
                .indices()
                .iter()
                .map(|&i| points[i] + Vec3::Z * SHADOW_LIFT)
                .collect();
            self.fan(&lifted, color);
        }

        for wire in object.wires() {
            if wire.indices().len() < 2 || wire.is_back_face(points, eye) {
                continue;
            }
            let color = wire.apparent_color(points, camera);
            let corners: Vec<Vec3> = wire.indices().iter().map(|&i| points[i]).collect();

            if wire.style().solid {
                self.fan(&corners, color);
            } else {
                for pair in corners.windows(2) {
                    self.lines.push(Vertex::new(pair[0], color));
                    self.lines.push(Vertex::new(pair[1], color));
                }
            }
        }
    }

    /// Triangulate a convex polygon, closed or not
    fn fan(&mut self, corners: &[Vec3], color: Color) {
        let corners = match corners {
            [first, .., last] if corners.len() > 3 && first == last => &corners[..corners.len() - 1],
            _ => corners,
        };
        if corners.len() < 3 {
            return;
        }
        for pair in corners[1..].windows(2) {
            for p in [corners[0], pair[0], pair[1]] {
                self.triangles.push(Vertex::new(p, color));
            }
        }
    }
}

/// Perspective matching the software camera's lens
pub fn scene_view_proj(camera: &Camera) -> Mat4 {
    let size = camera.screen_size();
    let aspect = size.x / size.y.max(1.0);
    let view = Mat4::look_at_rh(camera.eye(), camera.focus(), Vec3::Z);
    let proj = Mat4::perspective_rh(camera.vertical_fov(), aspect, NEAR_PLANE, DEPTH_OF_VISION * 2.0);
    proj * view
}

/// Pixels, origin top left, to clip space
pub fn screen_proj(size: Vec2) -> Mat4 {
    Mat4::orthographic_rh(0.0, size.x, size.y, 0.0, -1.0, 1.0)
}
