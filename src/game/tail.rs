// Trail of recent positions drawn behind a flying dot

use std::collections::VecDeque;

use glam::Vec3;

use crate::core::color::Color;
use crate::engine::scene::{Layer, Object3d, WireStyle};

/// A fixed-length trail, newest position first
#[derive(Debug, Clone)]
pub struct Tail {
    points: VecDeque<Vec3>,
    wire_every: usize,
    color: Color,
    object: Object3d,
}

impl Tail {
    /// `wire_every` of 1 draws a continuous line, larger values draw dashes
    pub fn new(length: usize, wire_every: usize, color: Color, layer: Layer, start: Vec3) -> Self {
        let points = (0..length)
            .map(|i| start - Vec3::new(0.0, i as f32 / 1000.0, 0.0))
            .collect();
        let mut tail = Self {
            points,
            wire_every: wire_every.max(1),
            color,
            object: Object3d::new(layer),
        };
        tail.rebuild();
        tail
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn head(&self) -> Option<Vec3> {
        self.points.front().copied()
    }

    pub fn object(&self) -> &Object3d {
        &self.object
    }

    /// Push the current position, dropping the oldest
    pub fn move_to(&mut self, p: Vec3) {
        if self.points.is_empty() {
            return;
        }
        self.points.pop_back();
        self.points.push_front(p);
        self.rebuild();
    }

    /// Collapse the whole trail onto `p` (after landing or relaunch)
    pub fn reset(&mut self, p: Vec3) {
        for q in &mut self.points {
            *q = p;
        }
        self.rebuild();
    }

    /// One short segment every `wire_every` points, starting at `wire_every`
    fn segments(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let every = self.wire_every;
        (every..)
            .step_by(every)
            .take_while(move |&s| s + every < self.points.len())
            .map(|s| (s, s + 1))
    }

    fn rebuild(&mut self) {
        let mut object = Object3d::new(self.object.layer());
        for (a, b) in self.segments() {
            object.add_wire(&[self.points[a], self.points[b]], self.color, WireStyle::LINE);
        }
        self.object = object;
    }
}
