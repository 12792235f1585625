// Variometer: beeps while climbing, higher for stronger lift

use crate::engine::audio::AudioPlayer;
use crate::game::glider::SINK_RATE;

/// Strongest lift in the game, under big clouds
pub const LIFT_MAX: f32 = -2.0 * SINK_RATE;

const NUM_BEEPS: usize = 4;

/// Real seconds between beeps
const SECONDS_PER_BEEP: f32 = 0.2;

#[derive(Debug, Clone, Default)]
pub struct Variometer {
    time: f32,
}

impl Variometer {
    pub fn new() -> Self {
        Self::default()
    }

    /// `climb` is the vertical displacement per update, `model_dt` the model minutes per update
    pub fn tick(&mut self, delta_time: f32, climb: f32, model_dt: f32, audio: &mut dyn AudioPlayer) {
        self.time += delta_time;
        if self.time < SECONDS_PER_BEEP {
            return;
        }
        self.time = 0.0;

        if model_dt > 0.0 {
            if let Some(clip) = clip_for_lift(climb / model_dt) {
                audio.play(&clip);
            }
        }
    }
}

/// Beep for the highest step the lift exceeds; none when sinking
fn clip_for_lift(lift: f32) -> Option<String> {
    (0..NUM_BEEPS)
        .rev()
        .find(|&i| lift > i as f32 * LIFT_MAX / NUM_BEEPS as f32)
        .map(|i| format!("beep{}.wav", i))
}
