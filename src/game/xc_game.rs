// The cross-country game: world, gaggle, jets, camera and instruments

use glam::{Vec2, Vec3};
use rand::rngs::StdRng;

use super::camera_man::{CameraMan, CameraMode, CameraSubject, CameraTarget, CutRequest, Shot, SubjectLocator};
use super::clock::{UpdateContext, FAST_FORWARD_MULTIPLIER, TIME_PER_FRAME};
use super::controls;
use super::flying_dot::Airspace;
use super::glider::{Glider, GliderId, GliderKind, SINK_RATE};
use super::instruments::{Compass, DataSlider, TextMessage, Variometer};
use super::jet_trail::{JetTrail, TURN_RADIUS as JET_TURN_RADIUS};
use super::landscape::Landscape;
use super::sky::Sky;
use crate::engine::audio::AudioPlayer;
use crate::engine::input::Action;
use crate::engine::scene::{Camera, Graphics, Object3d, RenderQueue};

pub const GAGGLE_SIZE: usize = 10;

/// Gaggle members flying rigid wings
const RIGID_WINGS: [usize; 2] = [3, 7];

/// The gaggle member the demo follows
const WATCHED: usize = 5;

const USER_LAUNCH: Vec3 = Vec3::new(-1.0, -2.0, 1.8);
const GAGGLE_LAUNCH_Z: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// The gaggle flies itself while the camera watches
    Demo,
    /// The user is flying
    User,
}

/// Resolves camera subjects against the gliders, clouds and landscape
pub struct Actors<'a> {
    pub user: &'a Glider,
    pub gaggle: &'a [Glider],
    pub sky: &'a Sky,
    pub landscape: &'a Landscape,
}

impl SubjectLocator for Actors<'_> {
    fn locate(&self, subject: CameraSubject) -> Option<Shot> {
        match subject {
            CameraSubject::Glider(GliderId::User) => Some(self.user.shot()),
            CameraSubject::Glider(GliderId::Gaggle(i)) => self.gaggle.get(i).map(|g| g.shot()),
            CameraSubject::Cloud(id) => self.sky.cloud(id).map(|c| c.shot()),
            CameraSubject::Fixed(shot) => Some(shot),
            CameraSubject::Landscape => Some(self.landscape.shot()),
        }
    }
}

/// Everything needed to draw one frame
pub struct Frame<'a> {
    pub camera: &'a Camera,
    pub queue: RenderQueue<'a>,
}

pub struct XcGame {
    rng: StdRng,
    sky: Sky,
    landscape: Landscape,
    user: Glider,
    gaggle: Vec<Glider>,
    jets: [JetTrail; 2],
    /// The glider the jets fly past
    buzzed: GliderId,
    camera_man: CameraMan,

    compass: Compass,
    slider: DataSlider,
    vario: Variometer,
    text: TextMessage,
    audio: Box<dyn AudioPlayer>,

    mode: GameMode,
    paused: bool,
    fast_forward: bool,
    /// Model minutes since the user launched
    time: f32,
    cuts: Vec<CutRequest>,
}

impl XcGame {
    /// A new game in demo mode with the gaggle already airborne
    pub fn new(screen_width: u32, screen_height: u32, mut rng: StdRng, audio: Box<dyn AudioPlayer>) -> Self {
        let mut sky = Sky::new();
        let landscape = Landscape::new(&mut sky, &mut rng);

        let mut camera_man = CameraMan::new(Camera::new(screen_width, screen_height));
        camera_man.set_user_subject(CameraSubject::Glider(GliderId::User));
        camera_man.set_gaggle_subject(CameraSubject::Glider(GliderId::Gaggle(WATCHED)));
        controls::launch_view(camera_man.camera_mut());

        let gaggle = (0..GAGGLE_SIZE)
            .map(|i| {
                let kind = if RIGID_WINGS.contains(&i) {
                    GliderKind::Rigid
                } else {
                    GliderKind::Regular
                };
                let mut glider = Glider::new(GliderId::Gaggle(i), kind);
                glider.set_trigger_loading(i == WATCHED);
                glider
            })
            .collect();

        let (w, h) = (screen_width as f32, screen_height as f32);
        let vmax = -2.0 * SINK_RATE;

        let mut game = Self {
            rng,
            sky,
            landscape,
            user: Glider::new(GliderId::User, GliderKind::User),
            gaggle,
            jets: [
                JetTrail::new(-JET_TURN_RADIUS, -JET_TURN_RADIUS),
                JetTrail::new(0.0, JET_TURN_RADIUS).fly_across(),
            ],
            buzzed: GliderId::Gaggle(WATCHED),
            camera_man,
            compass: Compass::new(25, w - 30.0, h - 35.0),
            slider: DataSlider::new("vario", -vmax, vmax, 30, w - 60.0, h - 35.0),
            vario: Variometer::new(),
            text: TextMessage::new("Demo mode"),
            audio,
            mode: GameMode::Demo,
            paused: false,
            fast_forward: false,
            time: 0.0,
            cuts: Vec::new(),
        };

        game.launch_gaggle();
        game.set_camera_mode(CameraMode::Gaggle);
        log::info!("Demo started with a gaggle of {}", GAGGLE_SIZE);
        game
    }

    /// Model time per second of play
    pub fn time_multiplier(&self) -> f32 {
        if self.fast_forward {
            FAST_FORWARD_MULTIPLIER
        } else {
            1.0
        }
    }

    pub fn camera(&self) -> &Camera {
        self.camera_man.camera()
    }

    /// The status line as shown
    pub fn message(&self) -> String {
        self.text.message(self.paused)
    }

    /// Advance by `delta_time` real seconds.
    ///
    /// The camera and instruments keep going while paused; the world does not.
    pub fn update(&mut self, delta_time: f32) {
        let context = UpdateContext::new(delta_time, self.time_multiplier());
        let model_dt = context.model_time_step();

        {
            let actors = Actors {
                user: &self.user,
                gaggle: &self.gaggle,
                sky: &self.sky,
                landscape: &self.landscape,
            };
            self.camera_man.tick(&actors);
        }
        self.update_instruments(delta_time, model_dt);

        if self.paused {
            return;
        }
        self.time += model_dt;

        self.landscape.update(model_dt, &mut self.sky, &mut self.rng);
        let landscape = &self.landscape;
        self.sky.update(model_dt, |x, y| landscape.height(x, y));

        if !self.user.is_demo_mode() {
            self.text.set_message(self.user.status(self.time));
            controls::keep_on_course(&mut self.user);
        }

        let air = Airspace {
            landscape: &self.landscape,
            sky: &self.sky,
            model_dt,
        };
        self.user.update(&air, &mut self.cuts);
        for glider in &mut self.gaggle {
            glider.update(&air, &mut self.cuts);
        }

        let buzz = match self.buzzed {
            GliderId::User => self.user.position(),
            GliderId::Gaggle(i) => self.gaggle.get(i).map_or(Vec3::ZERO, |g| g.position()),
        };
        for jet in &mut self.jets {
            jet.update(&air, buzz);
        }

        self.load_tiles();
        self.apply_cuts();
    }

    fn update_instruments(&mut self, delta_time: f32, model_dt: f32) {
        let v = self.user.velocity();
        self.compass.set_arrow(v.x, v.y);
        if model_dt > 0.0 {
            self.slider.set_value(v.z / model_dt);
        }
        self.vario.tick(delta_time, v.z, model_dt, self.audio.as_mut());
    }

    /// Keep the course loaded ahead of whichever glider is flagged to trigger it
    fn load_tiles(&mut self) {
        let trigger = std::iter::once(&self.user)
            .chain(self.gaggle.iter())
            .find(|g| g.trigger_loading() && !g.is_landed() && !g.reached_goal())
            .map(|g| g.position());

        if let Some(p) = trigger {
            self.landscape
                .load_tiles_around(p, &mut self.sky, &mut self.rng);
        }
    }

    fn apply_cuts(&mut self) {
        if self.cuts.is_empty() {
            return;
        }
        let cuts = std::mem::take(&mut self.cuts);
        let actors = Actors {
            user: &self.user,
            gaggle: &self.gaggle,
            sky: &self.sky,
            landscape: &self.landscape,
        };
        for cut in cuts {
            self.camera_man.apply(cut, &actors);
        }
    }

    /// React to a key going down or up. Quitting is left to the caller.
    pub fn handle_action(&mut self, action: Action, pressed: bool) {
        match action {
            Action::TurnLeft | Action::TurnRight | Action::WorkLift | Action::FastPolar | Action::SlowPolar => {
                let model_dt = TIME_PER_FRAME * self.time_multiplier();
                let air = Airspace {
                    landscape: &self.landscape,
                    sky: &self.sky,
                    model_dt,
                };
                if let Some(cut) = controls::steer_user(&mut self.user, action, pressed, &air) {
                    self.cuts.push(cut);
                    self.apply_cuts();
                }
            }
            _ if !pressed => {}
            Action::CameraUser => self.set_camera_mode(CameraMode::User),
            Action::CameraGaggle => self.set_camera_mode(CameraMode::Gaggle),
            Action::CameraPlan => self.set_camera_mode(CameraMode::Plan),
            Action::CameraTile => self.set_camera_mode(CameraMode::Tile),
            Action::PanLeft | Action::PanRight | Action::PanForward | Action::PanBack => {
                controls::pan_camera(self.camera_man.camera_mut(), action);
            }
            Action::CloudBaseHigh => self.sky.set_high(),
            Action::CloudBaseLow => self.sky.set_low(),
            Action::Pause => self.toggle_pause(),
            Action::StartPlay => self.start_play(),
            Action::FastForward => self.toggle_fast_forward(),
            Action::Quit => {}
        }
    }

    pub fn set_camera_mode(&mut self, mode: CameraMode) {
        let actors = Actors {
            user: &self.user,
            gaggle: &self.gaggle,
            sky: &self.sky,
            landscape: &self.landscape,
        };
        self.camera_man
            .set_mode(mode, self.mode == GameMode::User, &actors);
    }

    /// Launch the user behind the gaggle on a fresh course
    pub fn start_play(&mut self) {
        self.mode = GameMode::User;
        self.landscape.remove_all(&mut self.sky);

        self.user.set_trigger_loading(true);
        if let Some(watched) = self.gaggle.get_mut(WATCHED) {
            watched.set_trigger_loading(false);
        }

        self.launch_user();
        self.launch_gaggle();

        controls::launch_view(self.camera_man.camera_mut());
        self.set_camera_mode(CameraMode::User);
        self.buzzed = GliderId::User;

        self.paused = false;
        self.fast_forward = false;
        log::info!("Play started");
    }

    fn launch_user(&mut self) {
        let air = Airspace {
            landscape: &self.landscape,
            sky: &self.sky,
            model_dt: TIME_PER_FRAME * self.time_multiplier(),
        };
        self.user.take_off(USER_LAUNCH, &air);
        self.time = 0.0;
    }

    fn launch_gaggle(&mut self) {
        let air = Airspace {
            landscape: &self.landscape,
            sky: &self.sky,
            model_dt: TIME_PER_FRAME * self.time_multiplier(),
        };
        for (i, glider) in self.gaggle.iter_mut().enumerate() {
            let offset = 4.0 - i as f32;
            glider.take_off(Vec3::new(offset, offset, GAGGLE_LAUNCH_Z), &air);
        }
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        log::info!("Game {}", if self.paused { "paused" } else { "resumed" });
    }

    pub fn toggle_fast_forward(&mut self) {
        self.fast_forward = !self.fast_forward;
        log::info!("Time multiplier {}", self.time_multiplier());
    }

    /// Swing the camera while the mouse is dragged
    pub fn orbit_camera(&mut self, drag: Vec2, delta_time: f32) {
        controls::orbit_camera(self.camera_man.camera_mut(), drag, delta_time);
    }

    /// Follow a window resize: the camera and instruments anchored to the bottom right
    pub fn resize(&mut self, screen_width: u32, screen_height: u32) {
        self.camera_man
            .camera_mut()
            .resize(screen_width, screen_height);
        let (w, h) = (screen_width as f32, screen_height as f32);
        self.compass.set_position(w - 30.0, h - 35.0);
        self.slider.set_position(w - 60.0, h - 35.0);
    }

    /// Every object in the scene
    pub fn objects(&self) -> impl Iterator<Item = &Object3d> {
        self.landscape
            .objects()
            .chain(self.sky.clouds().map(|c| c.object()))
            .chain(self.jets.iter().map(|j| j.trail()))
            .chain(self.user.objects())
            .chain(self.gaggle.iter().flat_map(|g| g.objects()))
    }

    /// Settle the camera for this frame and gather what it sees
    pub fn frame(&mut self) -> Frame<'_> {
        self.camera_man.camera_mut().update_matrix();
        let this: &Self = self;
        let mut queue = RenderQueue::new();
        queue.extend(this.objects());
        Frame {
            camera: this.camera(),
            queue,
        }
    }

    /// Paint the 3D scene, back to front
    pub fn render_scene(&mut self, g: &mut dyn Graphics) {
        let frame = self.frame();
        frame.queue.draw(frame.camera, g);
    }

    /// Paint the instruments and status line over the scene
    pub fn render_hud(&self, g: &mut dyn Graphics) {
        self.compass.draw(g);
        self.slider.draw(g);
        self.text
            .draw(g, self.camera().screen_size().y, self.paused);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::audio::LogAudioPlayer;
    use crate::engine::scene::graphics::recording::RecordingGraphics;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;

    /// Real seconds per update at the normal frame rate
    const DELTA: f32 = 0.04;

    fn game() -> XcGame {
        XcGame::new(640, 480, StdRng::seed_from_u64(7), Box::new(LogAudioPlayer::new()))
    }

    #[test]
    fn test_demo_setup() {
        let game = game();
        assert_eq!(game.mode, GameMode::Demo);
        assert_eq!(game.gaggle.len(), GAGGLE_SIZE);
        assert_eq!(game.gaggle[3].kind(), GliderKind::Rigid);
        assert_eq!(game.gaggle[7].kind(), GliderKind::Rigid);
        assert_eq!(game.gaggle[0].kind(), GliderKind::Regular);
        assert!(game.gaggle[WATCHED].trigger_loading());
        assert!(game.gaggle.iter().all(|g| !g.is_landed()));

        assert_abs_diff_eq!(game.gaggle[0].position().z, 1.5);
        assert_abs_diff_eq!(game.gaggle[9].position().x, -5.0);

        assert!(game.user.is_landed());
        assert!(game.user.is_demo_mode());
        assert_eq!(game.camera_man.mode(), CameraMode::Gaggle);
        assert_eq!(game.message(), "Demo mode");
        assert!(!game.fast_forward);
    }

    #[test]
    fn test_update_moves_the_gaggle() {
        let mut game = game();
        let before = game.gaggle[0].position();
        for _ in 0..10 {
            game.update(DELTA);
        }
        assert_ne!(game.gaggle[0].position(), before);
        // the user glider waits on the ground
        assert_eq!(game.user.position(), Vec3::ZERO);
        assert_abs_diff_eq!(game.time, 10.0 * TIME_PER_FRAME, epsilon = 1e-5);
    }

    #[test]
    fn test_pause_freezes_the_world() {
        let mut game = game();
        game.handle_action(Action::Pause, true);
        assert!(game.paused);
        assert_eq!(game.message(), "Demo mode [ paused ]");

        let before = game.gaggle[0].position();
        for _ in 0..10 {
            game.update(DELTA);
        }
        assert_eq!(game.gaggle[0].position(), before);
        assert_abs_diff_eq!(game.time, 0.0);

        // releases are ignored
        game.handle_action(Action::Pause, false);
        assert!(game.paused);
        game.handle_action(Action::Pause, true);
        assert!(!game.paused);
    }

    #[test]
    fn test_fast_forward() {
        let mut game = game();
        game.handle_action(Action::FastForward, true);
        assert!(game.fast_forward);
        assert_abs_diff_eq!(game.time_multiplier(), 5.0);

        game.update(DELTA);
        assert_abs_diff_eq!(game.time, 5.0 * TIME_PER_FRAME, epsilon = 1e-5);

        game.toggle_fast_forward();
        assert_abs_diff_eq!(game.time_multiplier(), 1.0);
    }

    #[test]
    fn test_start_play() {
        let mut game = game();
        game.toggle_pause();
        game.toggle_fast_forward();
        for _ in 0..5 {
            game.update(DELTA);
        }

        game.handle_action(Action::StartPlay, true);
        assert_eq!(game.mode, GameMode::User);
        assert!(!game.paused);
        assert!(!game.fast_forward);
        assert_abs_diff_eq!(game.time, 0.0);

        assert!(!game.user.is_landed());
        assert!(!game.user.is_demo_mode());
        assert!(game.user.trigger_loading());
        assert!(!game.gaggle[WATCHED].trigger_loading());
        assert_eq!(game.user.position(), USER_LAUNCH);
        assert_eq!(game.camera_man.mode(), CameraMode::User);

        game.update(DELTA);
        assert!(game.message().starts_with("D: "));
        assert!(game.landscape.is_loaded(0));
    }

    #[test]
    fn test_camera_keys() {
        let mut game = game();
        game.handle_action(Action::CameraPlan, true);
        assert_eq!(game.camera_man.mode(), CameraMode::Plan);
        game.handle_action(Action::CameraTile, true);
        assert_eq!(game.camera_man.mode(), CameraMode::Tile);

        let eye = game.camera().eye();
        game.handle_action(Action::PanRight, true);
        assert_abs_diff_eq!(game.camera().eye().x, eye.x + 0.1, epsilon = 1e-5);
    }

    #[test]
    fn test_cloud_base_keys() {
        let mut game = game();
        game.handle_action(Action::CloudBaseLow, true);
        assert_abs_diff_eq!(game.sky.cloud_base(), crate::game::sky::CLOUD_BASE_LOW);
        game.handle_action(Action::CloudBaseHigh, true);
        assert_abs_diff_eq!(game.sky.cloud_base(), crate::game::sky::CLOUD_BASE_HIGH);
    }

    #[test]
    fn test_user_turn_takes_control() {
        let mut game = game();
        game.start_play();
        game.handle_action(Action::TurnRight, true);
        assert_eq!(game.user.dot().movement().user_turn(), 1.0);
        assert_eq!(
            game.camera_man.subject(),
            Some(CameraSubject::Glider(GliderId::User))
        );
        game.handle_action(Action::TurnRight, false);
        assert_eq!(game.user.dot().movement().user_turn(), 0.0);
    }

    #[test]
    fn test_focus_loss_straightens_turn() {
        use crate::engine::input::InputManager;
        use winit::event::ElementState;
        use winit::keyboard::KeyCode;

        let mut game = game();
        game.start_play();
        let mut input = InputManager::new();
        input.handle_key(KeyCode::KeyA, ElementState::Pressed, false);
        // the window loses focus with A still down
        input.release_all();

        let events: Vec<_> = input.drain().collect();
        for event in events {
            game.handle_action(event.action, event.pressed);
        }
        for _ in 0..50 {
            game.update(DELTA);
        }
        assert_eq!(game.user.dot().movement().user_turn(), 0.0);
    }

    #[test]
    fn test_render() {
        let mut game = game();
        game.update(DELTA);

        let mut g = RecordingGraphics::default();
        game.render_scene(&mut g);
        assert!(g.lines() + g.polygons() > 0);

        let mut hud = RecordingGraphics::default();
        game.render_hud(&mut hud);
        let texts = hud.texts();
        assert!(texts.contains(&"vario"));
        assert!(texts.contains(&"Demo mode"));
    }

    #[test]
    fn test_resize_moves_instruments() {
        let mut game = game();
        game.resize(800, 600);
        assert_eq!(game.camera().screen_size(), Vec2::new(800.0, 600.0));
    }
}
