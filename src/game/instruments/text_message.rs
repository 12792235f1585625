// One line of status text, bottom left

use glam::Vec2;

use crate::core::color::Color;
use crate::engine::scene::Graphics;

const PAUSED: &str = " [ paused ]";

#[derive(Debug, Clone, Default)]
pub struct TextMessage {
    message: String,
}

impl TextMessage {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    /// The line as shown, marked while paused
    pub fn message(&self, paused: bool) -> String {
        if paused {
            format!("{}{}", self.message, PAUSED)
        } else {
            self.message.clone()
        }
    }

    pub fn draw(&self, g: &mut dyn Graphics, screen_height: f32, paused: bool) {
        g.set_color(Color::LIGHT_GRAY);
        g.draw_string(&self.message(paused), Vec2::new(15.0, screen_height - 35.0));
    }
}
