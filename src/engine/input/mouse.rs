// Mouse drag tracking for orbiting the camera

use glam::Vec2;

/// Where a drag started and where the pointer is now
#[derive(Debug, Clone, Default)]
pub struct MouseTracker {
    cursor: Vec2,
    drag_start: Option<Vec2>,
}

impl MouseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn moved(&mut self, position: Vec2) {
        self.cursor = position;
    }

    pub fn pressed(&mut self) {
        self.drag_start = Some(self.cursor);
    }

    pub fn released(&mut self) {
        self.drag_start = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_start.is_some()
    }

    /// Pointer offset from where the drag started, zero when not dragging
    pub fn drag_delta(&self) -> Vec2 {
        self.drag_start.map_or(Vec2::ZERO, |start| self.cursor - start)
    }
}
