// The sky: wind, cloud base and every cloud in it

use glam::Vec3;
use rand::Rng;

use super::cloud::{Cloud, CloudId};

pub const CLOUD_BASE_HIGH: f32 = 3.0;
pub const CLOUD_BASE_LOW: f32 = 2.0;

/// Wind speed along +y in distance units per model minute
pub const WIND_SPEED: f32 = 0.3;

/// Glide range per unit height when looking for the next cloud
pub const GLIDE_RANGE: f32 = 8.0;

/// Age limit for clouds worth going back upwind to
const MAX_BACKTRACK_AGE: f32 = 10.0;

/// Owns all clouds; foreground clouds also make up the lift profile
#[derive(Debug)]
pub struct Sky {
    clouds: Vec<Cloud>,
    cloud_base: f32,
    next_id: u64,
}

impl Sky {
    pub fn new() -> Self {
        Self {
            clouds: Vec::new(),
            cloud_base: CLOUD_BASE_LOW,
            next_id: 0,
        }
    }

    pub fn cloud_base(&self) -> f32 {
        self.cloud_base
    }

    pub fn wind(&self) -> f32 {
        WIND_SPEED
    }

    pub fn set_high(&mut self) {
        self.cloud_base = CLOUD_BASE_HIGH;
        log::info!("Cloud base raised to {}", self.cloud_base);
    }

    pub fn set_low(&mut self) {
        self.cloud_base = CLOUD_BASE_LOW;
        log::info!("Cloud base lowered to {}", self.cloud_base);
    }

    pub fn spawn_cloud<R: Rng + ?Sized>(
        &mut self,
        x: f32,
        y: f32,
        duration: i32,
        strength: i32,
        rng: &mut R,
    ) -> CloudId {
        let id = CloudId(self.next_id);
        self.next_id += 1;
        self.clouds
            .push(Cloud::new(id, x, y, self.cloud_base, duration, strength, rng));
        id
    }

    pub fn cloud(&self, id: CloudId) -> Option<&Cloud> {
        self.clouds.iter().find(|c| c.id() == id)
    }

    pub fn cloud_mut(&mut self, id: CloudId) -> Option<&mut Cloud> {
        self.clouds.iter_mut().find(|c| c.id() == id)
    }

    pub fn contains(&self, id: CloudId) -> bool {
        self.cloud(id).is_some()
    }

    pub fn clouds(&self) -> impl Iterator<Item = &Cloud> {
        self.clouds.iter()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.clouds.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.clouds.is_empty()
    }

    fn lift_clouds(&self) -> impl Iterator<Item = &Cloud> {
        self.clouds.iter().filter(|c| c.in_foreground())
    }

    /// Nearest growing cloud downwind of p within glide range
    pub fn next_cloud(&self, p: Vec3) -> Option<CloudId> {
        let range = GLIDE_RANGE * p.z;
        self.lift_clouds()
            .filter(|c| !c.is_decaying())
            .map(|c| (c.y_at(p.z) - p.y, c))
            .filter(|&(dy, _)| dy >= 0.0 && dy < range)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, c)| c.id())
    }

    /// Nearest young cloud upwind of p within glide range
    pub fn prev_cloud(&self, p: Vec3) -> Option<CloudId> {
        let range = GLIDE_RANGE * p.z;
        self.lift_clouds()
            .filter(|c| c.age() < MAX_BACKTRACK_AGE)
            .map(|c| (p.y - c.y_at(p.z), c))
            .filter(|&(dy, _)| dy >= 0.0 && dy < range)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, c)| c.id())
    }

    /// First cloud whose lift p is in
    pub fn cloud_at(&self, p: Vec3) -> Option<&Cloud> {
        self.lift_clouds().find(|c| c.is_under(p))
    }

    /// Age and drift every cloud, dropping those that have gone
    pub fn update<F: Fn(f32, f32) -> f32>(&mut self, dt: f32, ground: F) {
        let (wind, base) = (self.wind(), self.cloud_base);
        let before = self.clouds.len();
        self.clouds.retain_mut(|c| c.update(dt, wind, base, &ground));
        let gone = before - self.clouds.len();
        if gone > 0 {
            log::debug!("{} cloud(s) evaporated, {} left", gone, self.clouds.len());
        }
    }
}

impl Default for Sky {
    fn default() -> Self {
        Self::new()
    }
}
