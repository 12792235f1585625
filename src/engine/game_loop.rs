/// Game loop timing
///
/// Fixed-rate model updates with rendering once per window redraw.
/// The model always advances in whole update steps; a slow frame is
/// caught up with a bounded number of extra steps.
use std::time::{Duration, Instant};

/// Maximum number of catch-up steps per frame
const MAX_UPDATE_STEPS: u32 = 5;

/// Game loop timing state
pub struct GameLoop {
    /// Real time per update
    step: Duration,

    /// Time not yet consumed by updates
    accumulator: Duration,

    last_frame_time: Instant,

    /// Suspended, e.g. while the window is hidden
    paused: bool,
}

impl GameLoop {
    /// A loop running `updates_per_second` model updates
    pub fn new(updates_per_second: u32) -> Self {
        Self {
            step: Duration::from_secs_f64(1.0 / updates_per_second.max(1) as f64),
            accumulator: Duration::ZERO,
            last_frame_time: Instant::now(),
            paused: false,
        }
    }

    /// Begin a new frame, returns the number of updates to run
    pub fn begin_frame(&mut self) -> u32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.advance(frame_time)
    }

    /// Account for `frame_time` of real time passing
    fn advance(&mut self, frame_time: Duration) -> u32 {
        if self.paused {
            return 0;
        }

        self.accumulator += frame_time;
        let mut updates = 0;
        while self.accumulator >= self.step && updates < MAX_UPDATE_STEPS {
            self.accumulator -= self.step;
            updates += 1;
        }
        // drop what could not be caught up
        if updates == MAX_UPDATE_STEPS {
            log::debug!("Dropped {:?} of backlog", self.accumulator);
            self.accumulator = self.accumulator.min(self.step);
        }
        updates
    }

    /// Real seconds per update
    pub fn timestep(&self) -> f32 {
        self.step.as_secs_f32()
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Game loop suspended");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // time spent hidden is not caught up
            self.accumulator = Duration::ZERO;
            self.last_frame_time = Instant::now();
            log::info!("Game loop resumed");
        }
    }
}
