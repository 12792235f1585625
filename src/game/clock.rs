// Game clock: fixed update rate and model time

/// Game updates per second
pub const FRAME_RATE: u32 = 25;

/// Model minutes per update at normal speed
pub const TIME_PER_FRAME: f32 = (1.0 / FRAME_RATE as f32) / 2.0;

/// Time multiplier while fast-forwarding
pub const FAST_FORWARD_MULTIPLIER: f32 = 5.0;

/// Timing of one update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdateContext {
    /// Real seconds covered by this update
    pub delta_time: f32,
    /// 1 normally, more when fast-forwarding
    pub time_multiplier: f32,
}

impl UpdateContext {
    pub fn new(delta_time: f32, time_multiplier: f32) -> Self {
        Self {
            delta_time,
            time_multiplier,
        }
    }

    /// Model minutes that pass during this update
    pub fn model_time_step(&self) -> f32 {
        self.delta_time * self.time_multiplier / 2.0
    }
}

impl Default for UpdateContext {
    fn default() -> Self {
        Self::new(1.0 / FRAME_RATE as f32, 1.0)
    }
}
