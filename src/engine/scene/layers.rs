// Per-frame draw queue: layers drawn back to front, objects far to near

use super::camera::Camera;
use super::graphics::Graphics;
use super::object3d::{Layer, Object3d};

/// Objects queued for one frame
pub struct RenderQueue<'a> {
    layers: [Vec<&'a Object3d>; Layer::COUNT],
}

impl<'a> RenderQueue<'a> {
    pub fn new() -> Self {
        Self {
            layers: Default::default(),
        }
    }

    pub fn push(&mut self, object: &'a Object3d) {
        self.layers[object.layer().index()].push(object);
    }

    pub fn len(&self) -> usize {
        self.layers.iter().map(Vec::len).sum()
    }

    /// Objects in painter's order for this camera
    pub fn sorted(&self, camera: &Camera) -> Vec<&'a Object3d> {
        let mut ordered = Vec::with_capacity(self.len());
        for layer in &self.layers {
            let mut keyed: Vec<(f32, &'a Object3d)> =
                layer.iter().map(|&o| (o.depth_key(camera), o)).collect();
            keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
            ordered.extend(keyed.into_iter().map(|(_, o)| o));
        }
        ordered
    }

    pub fn draw(&self, camera: &Camera, g: &mut dyn Graphics) {
        for object in self.sorted(camera) {
            object.draw(camera, g);
        }
    }
}

impl<'a> Default for RenderQueue<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Extend<&'a Object3d> for RenderQueue<'a> {
    fn extend<I: IntoIterator<Item = &'a Object3d>>(&mut self, iter: I) {
        for object in iter {
            self.push(object);
        }
    }
}
