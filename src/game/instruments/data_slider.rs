// A vertical gauge with a sliding marker

use glam::Vec2;

use crate::core::color::Color;
use crate::engine::scene::Graphics;

/// Half width of the end ticks
const TICK: f32 = 2.0;

/// Pixels below the gauge kept for the label
const LABEL_SPACE: f32 = 10.0;

#[derive(Debug, Clone)]
pub struct DataSlider {
    label: String,
    min: f32,
    max: f32,
    /// Length in pixels
    size: f32,
    /// Bottom centre
    position: Vec2,
    /// Marker offset from the bottom, 0 to size
    slider: f32,
}

impl DataSlider {
    /// Starts half way
    pub fn new(label: &str, min: f32, max: f32, size: u32, x: f32, y: f32) -> Self {
        let mut slider = Self {
            label: label.to_string(),
            min,
            max,
            size: size as f32,
            position: Vec2::new(x, y),
            slider: 0.0,
        };
        slider.set_value((min + max) / 2.0);
        slider
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.position = Vec2::new(x, y);
    }

    /// Clamped to the range, then snapped to whole pixels
    pub fn set_value(&mut self, value: f32) {
        let v = value.clamp(self.min, self.max);
        self.slider = ((v - self.min) / (self.max - self.min) * self.size).trunc();
    }

    #[cfg(test)]
    pub fn slider(&self) -> f32 {
        self.slider
    }

    pub fn draw(&self, g: &mut dyn Graphics) {
        let (x, y) = (self.position.x, self.position.y);
        let top = y - self.size - LABEL_SPACE;
        let bottom = y - LABEL_SPACE;

        g.set_color(Color::LIGHT_GRAY);
        g.draw_line(Vec2::new(x - TICK, top), Vec2::new(x + TICK, top));
        g.draw_line(Vec2::new(x - TICK, bottom), Vec2::new(x + TICK, bottom));
        g.draw_line(Vec2::new(x, bottom), Vec2::new(x, top));
        g.draw_string(&self.label, Vec2::new(x - 10.0, y));

        g.set_color(Color::GRAY);
        g.fill_circle(Vec2::new(x - 1.0, bottom - self.slider - 1.0), 3.0);
    }
}
