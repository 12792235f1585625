// Thermal triggers: ground sources that release a cloud every cycle

use glam::Vec3;
use rand::Rng;

use super::cloud::CloudId;
use super::sky::Sky;
use crate::core::color::Color;
use crate::core::math::rnd;
use crate::engine::scene::{Layer, Object3d, WireStyle};

/// Clouds are spread this far around the trigger
pub const SPREAD: f32 = 1.2;

/// Model minutes per cycle at a cycle factor of 1
const CYCLE_LENGTH: f32 = 20.0;

/// Mature phase of a cloud in model minutes at a duration factor of 1
const CLOUD_DURATION: f32 = 10.0;

/// A new trigger releases a cloud straight away unless its next one is this close
const MAX_WAIT: f32 = 7.0;

const CROSS_HAIR_COLOR: Color = Color::gray(230);

/// A ground source of thermals
#[derive(Debug, Clone)]
pub struct ThermalTrigger {
    x: i32,
    y: i32,
    strength: i32,
    cycle: i32,
    duration: i32,
    time: f32,
    /// Rotates through three y offsets so successive clouds don't overlap
    next_cloud: u8,
    clouds: Vec<CloudId>,
    cross_hair: Object3d,
}

impl ThermalTrigger {
    /// Cycle and duration factors scale the default cycle length and cloud life
    pub fn new<R: Rng + ?Sized>(
        x: i32,
        y: i32,
        strength: i32,
        cycle_factor: f32,
        duration_factor: f32,
        sky: &mut Sky,
        rng: &mut R,
    ) -> Self {
        let cycle = (cycle_factor * CYCLE_LENGTH) as i32;
        let mut trigger = Self {
            x,
            y,
            strength,
            cycle,
            duration: (duration_factor * CLOUD_DURATION) as i32,
            time: rnd(rng, 0.0, (cycle - 1) as f32).trunc(),
            next_cloud: rnd(rng, 0.0, 2.0) as u8,
            clouds: Vec::new(),
            cross_hair: cross_hair(x as f32, y as f32),
        };

        if trigger.time < cycle as f32 - MAX_WAIT {
            trigger.make_cloud(sky, rng);
        }
        trigger
    }

    #[cfg(test)]
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, 0.0)
    }

    #[cfg(test)]
    pub fn strength(&self) -> i32 {
        self.strength
    }

    #[cfg(test)]
    pub fn cycle(&self) -> i32 {
        self.cycle
    }

    #[cfg(test)]
    pub fn duration(&self) -> i32 {
        self.duration
    }

    /// Clouds released and still in the sky
    #[cfg(test)]
    pub fn clouds(&self) -> &[CloudId] {
        &self.clouds
    }

    pub fn cross_hair(&self) -> &Object3d {
        &self.cross_hair
    }

    /// Advance by `dt` model minutes; a cloud is released at the start of each cycle
    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, sky: &mut Sky, rng: &mut R) {
        self.clouds.retain(|&id| sky.contains(id));

        if self.time <= 0.0 {
            self.make_cloud(sky, rng);
        }
        self.time += dt;
        if self.time > self.cycle as f32 {
            self.time = 0.0;
        }
    }

    fn make_cloud<R: Rng + ?Sized>(&mut self, sky: &mut Sky, rng: &mut R) {
        let dy = match self.next_cloud {
            0 => SPREAD,
            1 => 0.0,
            _ => -SPREAD,
        };
        self.next_cloud = (self.next_cloud + 1) % 3;

        let dx = rnd(rng, -SPREAD, SPREAD);
        let id = sky.spawn_cloud(
            self.x as f32 + dx,
            self.y as f32 + dy,
            self.duration,
            self.strength,
            rng,
        );
        self.clouds.push(id);
    }

    /// Stop releasing: hurry every cloud into its tail, or remove them outright if `really`
    pub fn retire(&self, really: bool, sky: &mut Sky) {
        for &id in &self.clouds {
            if let Some(cloud) = sky.cloud_mut(id) {
                cloud.hurry();
                if really {
                    cloud.expire();
                }
            }
        }
    }
}

/// Ground marker at a trigger
fn cross_hair(x: f32, y: f32) -> Object3d {
    let hair = 1.0;
    let mut o = Object3d::new(Layer::Background);
    o.add_wire(
        &[Vec3::new(x, y - hair, 0.0), Vec3::new(x, y + hair, 0.0)],
        CROSS_HAIR_COLOR,
        WireStyle::LINE,
    );
    o.add_wire(
        &[Vec3::new(x - hair, y, 0.0), Vec3::new(x + hair, y, 0.0)],
        CROSS_HAIR_COLOR,
        WireStyle::LINE,
    );
    o
}
