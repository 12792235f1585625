// Drawing primitives the 2D front-end implements

use glam::Vec2;

use crate::core::color::Color;

/// A 2D drawing surface in screen pixels, origin top-left.
///
/// Calls are made in painter's order; later primitives cover earlier ones.
pub trait Graphics {
    fn set_color(&mut self, color: Color);
    fn draw_line(&mut self, from: Vec2, to: Vec2);
    fn fill_polygon(&mut self, points: &[Vec2]);
    /// Circle inscribed in the square at `top_left` with side `diameter`
    fn fill_circle(&mut self, top_left: Vec2, diameter: f32);
    fn draw_string(&mut self, text: &str, position: Vec2);
}

/// Records draw calls for assertions in tests
#[cfg(test)]
pub mod recording {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawOp {
        Line(Color, Vec2, Vec2),
        Polygon(Color, Vec<Vec2>),
        Circle(Color, Vec2, f32),
        Text(Color, String, Vec2),
    }

    #[derive(Debug, Default)]
    pub struct RecordingGraphics {
        pub color: Color,
        pub ops: Vec<DrawOp>,
    }

    impl RecordingGraphics {
        pub fn lines(&self) -> usize {
            self.ops.iter().filter(|op| matches!(op, DrawOp::Line(..))).count()
        }

        pub fn polygons(&self) -> usize {
            self.ops.iter().filter(|op| matches!(op, DrawOp::Polygon(..))).count()
        }

        pub fn texts(&self) -> Vec<&str> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Text(_, text, _) => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }
    }

    impl Graphics for RecordingGraphics {
        fn set_color(&mut self, color: Color) {
            self.color = color;
        }

        fn draw_line(&mut self, from: Vec2, to: Vec2) {
            self.ops.push(DrawOp::Line(self.color, from, to));
        }

        fn fill_polygon(&mut self, points: &[Vec2]) {
            self.ops.push(DrawOp::Polygon(self.color, points.to_vec()));
        }

        fn fill_circle(&mut self, top_left: Vec2, diameter: f32) {
            self.ops.push(DrawOp::Circle(self.color, top_left, diameter));
        }

        fn draw_string(&mut self, text: &str, position: Vec2) {
            self.ops.push(DrawOp::Text(self.color, text.to_string(), position));
        }
    }
}
