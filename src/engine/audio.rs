// Sound output; there is no mixer, so clips are logged

/// Plays short sound clips by name
pub trait AudioPlayer {
    fn play(&mut self, clip: &str);
}

/// Writes each clip to the debug log
#[derive(Debug, Default)]
pub struct LogAudioPlayer;

impl LogAudioPlayer {
    pub fn new() -> Self {
        Self
    }
}

impl AudioPlayer for LogAudioPlayer {
    fn play(&mut self, clip: &str) {
        log::debug!("Playing {}", clip);
    }
}

/// Keeps the clips it was asked to play
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingAudioPlayer {
    pub clips: Vec<String>,
}

#[cfg(test)]
impl AudioPlayer for RecordingAudioPlayer {
    fn play(&mut self, clip: &str) {
        self.clips.push(clip.to_string());
    }
}
