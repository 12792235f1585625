// Compass: an arrow along the user glider's heading, north up

use glam::Vec2;

use crate::core::color::Color;
use crate::engine::scene::Graphics;

/// Pixels below the dial kept for the "S" label
const LABEL_SPACE: f32 = 10.0;

/// Arrow head and tail on a grid of +-5, y up
const HEAD: [[f32; 2]; 3] = [[0.0, 5.0], [2.0, 2.0], [-2.0, 2.0]];
const TAIL: [[f32; 2]; 2] = [[0.0, 1.0], [0.0, -5.0]];

#[derive(Debug, Clone)]
pub struct Compass {
    radius: f32,
    /// Bottom centre, where the "S" label sits
    position: Vec2,
    head: [Vec2; 3],
    tail: [Vec2; 2],
    /// Unit heading, +y north
    heading: Vec2,
}

impl Compass {
    pub fn new(size: u32, x: f32, y: f32) -> Self {
        let radius = (size / 2) as f32;
        // scale to the dial and flip y for the screen
        let s = (radius - 2.0) / 5.0;
        let scale = |p: [f32; 2]| Vec2::new((p[0] * s).trunc(), (p[1] * -s).trunc());

        Self {
            radius,
            position: Vec2::new(x, y),
            head: HEAD.map(scale),
            tail: TAIL.map(scale),
            heading: Vec2::Y,
        }
    }

    /// Moved with the window's bottom right corner
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.position = Vec2::new(x, y);
    }

    /// Point along (x, y); a zero vector leaves the arrow where it was
    pub fn set_arrow(&mut self, x: f32, y: f32) {
        if let Some(heading) = Vec2::new(x, y).try_normalize() {
            self.heading = heading;
        }
    }

    #[cfg(test)]
    pub fn heading(&self) -> Vec2 {
        self.heading
    }

    /// Rotate a template point by the heading and move it to the dial centre
    fn place(&self, p: Vec2) -> Vec2 {
        let (vx, vy) = (self.heading.x, self.heading.y);
        let centre = self.position - Vec2::new(0.0, LABEL_SPACE + self.radius);
        Vec2::new(vy * p.x - vx * p.y, vx * p.x + vy * p.y) + centre
    }

    pub fn draw(&self, g: &mut dyn Graphics) {
        let (x, y) = (self.position.x, self.position.y);

        g.set_color(Color::LIGHT_GRAY);
        g.draw_line(self.place(self.tail[0]), self.place(self.tail[1]));
        g.draw_string("N", Vec2::new(x - 3.0, y - self.radius * 2.0 - LABEL_SPACE));
        g.draw_string("S", Vec2::new(x - 2.0, y));

        g.set_color(Color::GRAY);
        let head = self.head.map(|p| self.place(p));
        g.fill_polygon(&head);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scene::graphics::recording::{DrawOp, RecordingGraphics};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_arrow_points_north_by_default() {
        let compass = Compass::new(25, 100.0, 200.0);
        let mut g = RecordingGraphics::default();
        compass.draw(&mut g);

        assert_eq!(g.texts(), vec!["N", "S"]);
        assert_eq!(g.polygons(), 1);
        // head tip is above (smaller y than) the dial centre
        let tip = match &g.ops[3] {
            DrawOp::Polygon(color, points) => {
                assert_eq!(*color, Color::GRAY);
                points[0]
            }
            op => panic!("unexpected {:?}", op),
        };
        assert_abs_diff_eq!(tip.x, 100.0);
        assert_abs_diff_eq!(tip.y, 200.0 - 10.0 - 12.0 - 10.0);
    }

    #[test]
    fn test_arrow_turns_with_heading() {
        let mut compass = Compass::new(25, 0.0, 0.0);
        compass.set_arrow(3.0, 0.0);
        assert_eq!(compass.heading(), Vec2::X);

        // east: tip to the right of the centre
        let tip = compass.place(compass.head[0]);
        assert_abs_diff_eq!(tip.x, 10.0);
        assert_abs_diff_eq!(tip.y, -22.0);

        compass.set_arrow(0.0, 0.0);
        assert_eq!(compass.heading(), Vec2::X);
    }
}
