// Camera direction: which subject to watch and gliding cuts between them

use glam::Vec3;

use super::cloud::CloudId;
use super::glider::GliderId;
use super::landscape::TILE_WIDTH;
use crate::engine::scene::Camera;

/// Updates a cut takes to glide between two points of view
pub const CUT_LEN: i32 = 75;

/// Updates spent accelerating into and slowing out of a cut
const CUT_RAMP: i32 = 12;

const PLAN_HEIGHT: f32 = 20.0;
const PLAN_Y_OFFSET: f32 = 4.0;

/// Anything the camera can be pointed at
pub trait CameraTarget {
    fn eye(&self) -> Vec3;
    fn focus(&self) -> Vec3;

    fn shot(&self) -> Shot {
        Shot {
            eye: self.eye(),
            focus: self.focus(),
        }
    }
}

/// Eye and focus for one point of view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub eye: Vec3,
    pub focus: Vec3,
}

impl CameraTarget for Shot {
    fn eye(&self) -> Vec3 {
        self.eye
    }

    fn focus(&self) -> Vec3 {
        self.focus
    }
}

/// What the camera follows; resolved to a shot every update
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraSubject {
    Glider(GliderId),
    Cloud(CloudId),
    /// A subject that never moves, such as a hill
    Fixed(Shot),
    /// The tile the watched glider is over
    Landscape,
}

/// Resolves subjects against the current state of the world
pub trait SubjectLocator {
    /// None once the subject has gone
    fn locate(&self, subject: CameraSubject) -> Option<Shot>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    /// Follow the user's glider
    User,
    /// Follow the watched glider and take cuts from the whole gaggle
    Gaggle,
    /// Look straight down the course from above
    Plan,
    /// Show the current tile
    Tile,
}

/// A glider asking for the camera to cut to something
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutRequest {
    pub subject: CameraSubject,
    pub from_user: bool,
}

/// Moves the camera around after its subject
#[derive(Debug, Clone)]
pub struct CameraMan {
    camera: Camera,
    mode: CameraMode,
    subject: Option<CameraSubject>,
    user_subject: Option<CameraSubject>,
    gaggle_subject: Option<CameraSubject>,
    cut_count: i32,
    /// Quiet period after a gaggle cut
    cut2_count: i32,
    d_eye: Vec3,
    d_focus: Vec3,
    eye_goto: Vec3,
    focus_goto: Vec3,
}

impl CameraMan {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            mode: CameraMode::User,
            subject: None,
            user_subject: None,
            gaggle_subject: None,
            cut_count: 0,
            cut2_count: 0,
            d_eye: Vec3::ZERO,
            d_focus: Vec3::ZERO,
            eye_goto: Vec3::ZERO,
            focus_goto: Vec3::ZERO,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    #[cfg(test)]
    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    #[cfg(test)]
    pub fn subject(&self) -> Option<CameraSubject> {
        self.subject
    }

    #[cfg(test)]
    pub fn is_cutting(&self) -> bool {
        self.cut_count > 0
    }

    pub fn set_user_subject(&mut self, subject: CameraSubject) {
        self.user_subject = Some(subject);
    }

    pub fn set_gaggle_subject(&mut self, subject: CameraSubject) {
        self.gaggle_subject = Some(subject);
    }

    /// Switch mode and cut to the matching subject. `user_playing` picks the plan view subject.
    pub fn set_mode(&mut self, mode: CameraMode, user_playing: bool, actors: &dyn SubjectLocator) {
        self.mode = mode;
        log::info!("Camera mode: {:?}", mode);

        match mode {
            CameraMode::User => {
                if let Some(subject) = self.user_subject {
                    self.cut_count = 0;
                    self.cut_setup(subject, true, actors);
                }
            }
            CameraMode::Gaggle => {
                if let Some(subject) = self.gaggle_subject {
                    self.cut_count = 0;
                    self.cut2_count = 0;
                    self.cut_setup(subject, false, actors);
                }
            }
            CameraMode::Plan => {
                let subject = self
                    .user_subject
                    .filter(|_| user_playing)
                    .or(self.gaggle_subject);
                let located = subject.and_then(|s| actors.locate(s).map(|shot| (s, shot)));

                match located {
                    Some((subject, shot)) => {
                        self.camera.set_focus(shot.focus);
                        self.camera.offset_focus(0.0, PLAN_Y_OFFSET);
                        let y = self.camera.focus().y;
                        self.camera.set_eye(Vec3::new(TILE_WIDTH / 2.0, y, PLAN_HEIGHT));
                        self.subject = Some(subject);
                    }
                    None => {
                        self.camera.set_focus(Vec3::new(0.0, TILE_WIDTH, 0.0));
                        self.camera.set_eye(Vec3::new(10.0, TILE_WIDTH, PLAN_HEIGHT));
                        self.subject = None;
                    }
                }
                self.cut_count = 0;
            }
            CameraMode::Tile => {
                self.cut_count = 0;
                self.cut2_count = 0;
                self.cut_setup(CameraSubject::Landscape, true, actors);
            }
        }
    }

    /// Start gliding eye and focus over to `subject`; the cut unwinds over the next updates.
    ///
    /// Ignored in plan view, from the gaggle unless watching it, and in gaggle
    /// mode while a cut is running or has only just finished.
    pub fn cut_setup(&mut self, subject: CameraSubject, from_user: bool, actors: &dyn SubjectLocator) {
        if self.mode == CameraMode::Plan {
            return;
        }
        if self.mode == CameraMode::Gaggle && (self.cut_count > 0 || self.cut2_count > 0) {
            return;
        }
        if !from_user && self.mode != CameraMode::Gaggle {
            return;
        }
        let Some(shot) = actors.locate(subject) else {
            return;
        };

        self.subject = Some(subject);
        self.cut_count = CUT_LEN;
        self.cut2_count = CUT_LEN * 2;
        self.eye_goto = shot.eye;
        self.focus_goto = shot.focus;

        // the ramps at either end together cover one ramp of full speed
        let steps = (CUT_LEN - CUT_RAMP) as f32;
        self.d_eye = (shot.eye - self.camera.eye()) / steps;
        self.d_focus = (shot.focus - self.camera.focus()) / steps;
    }

    pub fn apply(&mut self, request: CutRequest, actors: &dyn SubjectLocator) {
        self.cut_setup(request.subject, request.from_user, actors);
    }

    /// One update: step any cut and follow the subject
    pub fn tick(&mut self, actors: &dyn SubjectLocator) {
        let Some(subject) = self.subject else {
            return;
        };

        if self.cut2_count > 0 {
            self.cut2_count -= 1;
        }
        if self.cut_count > 0 {
            self.cut_step();
        }
        self.follow_subject(subject, actors);
    }

    fn cut_step(&mut self) {
        let s = if self.cut_count > CUT_LEN - CUT_RAMP {
            (CUT_LEN - self.cut_count) as f32 / CUT_RAMP as f32
        } else if self.cut_count < CUT_RAMP {
            self.cut_count as f32 / CUT_RAMP as f32
        } else {
            1.0
        };

        let (eye, focus) = (self.camera.eye(), self.camera.focus());
        self.camera.set_eye(eye + self.d_eye * s);
        self.camera.set_focus(focus + self.d_focus * s);
        self.cut_count -= 1;
    }

    /// Add in the subject's own movement since the last update
    fn follow_subject(&mut self, subject: CameraSubject, actors: &dyn SubjectLocator) {
        let Some(shot) = actors.locate(subject) else {
            return;
        };

        if self.mode == CameraMode::Plan {
            let mut f = shot.focus;
            f.x = 0.0;
            f.y += PLAN_Y_OFFSET;
            self.camera.move_focus(f);
            return;
        }

        let (eye, focus) = (self.camera.eye(), self.camera.focus());
        self.camera.set_eye(eye + shot.eye - self.eye_goto);
        self.camera.set_focus(focus + shot.focus - self.focus_goto);
        self.eye_goto = shot.eye;
        self.focus_goto = shot.focus;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::cell::Cell;

    /// One moving subject plus the landscape
    struct Stage {
        glider: Cell<Shot>,
        landscape: Shot,
    }

    impl Stage {
        fn new() -> Self {
            Self {
                glider: Cell::new(Shot {
                    eye: Vec3::new(0.0, 10.0, 2.0),
                    focus: Vec3::new(0.0, 12.0, 1.0),
                }),
                landscape: Shot {
                    eye: Vec3::new(10.0, 0.0, 2.0),
                    focus: Vec3::new(0.0, 10.0, 0.0),
                },
            }
        }
    }

    impl SubjectLocator for Stage {
        fn locate(&self, subject: CameraSubject) -> Option<Shot> {
            match subject {
                CameraSubject::Glider(_) => Some(self.glider.get()),
                CameraSubject::Fixed(shot) => Some(shot),
                CameraSubject::Landscape => Some(self.landscape),
                CameraSubject::Cloud(_) => None,
            }
        }
    }

    fn camera_man() -> CameraMan {
        let mut cm = CameraMan::new(Camera::default());
        cm.set_user_subject(CameraSubject::Glider(GliderId::User));
        cm.set_gaggle_subject(CameraSubject::Glider(GliderId::Gaggle(5)));
        cm
    }

    #[test]
    fn test_cut_arrives_after_cut_len() {
        let stage = Stage::new();
        let mut cm = camera_man();
        cm.set_mode(CameraMode::User, true, &stage);
        assert!(cm.is_cutting());

        for _ in 0..CUT_LEN {
            cm.tick(&stage);
        }
        assert!(!cm.is_cutting());
        let target = stage.glider.get();
        assert_abs_diff_eq!(cm.camera().eye().distance(target.eye), 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(cm.camera().focus().distance(target.focus), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_cut_accelerates_then_slows() {
        let stage = Stage::new();
        let mut cm = camera_man();
        cm.set_mode(CameraMode::User, true, &stage);

        let mut steps = Vec::new();
        for _ in 0..CUT_LEN {
            let before = cm.camera().eye();
            cm.tick(&stage);
            steps.push(cm.camera().eye().distance(before));
        }
        // first step has zero speed, middle steps full speed
        assert_abs_diff_eq!(steps[0], 0.0);
        assert!(steps[1] < steps[30]);
        assert!(steps[CUT_LEN as usize - 2] < steps[30]);
    }

    #[test]
    fn test_follows_subject_movement() {
        let stage = Stage::new();
        let mut cm = camera_man();
        cm.set_mode(CameraMode::User, true, &stage);
        for _ in 0..CUT_LEN {
            cm.tick(&stage);
        }

        let before = cm.camera().eye();
        let mut shot = stage.glider.get();
        shot.eye.y += 1.0;
        shot.focus.y += 1.0;
        stage.glider.set(shot);
        cm.tick(&stage);
        assert_abs_diff_eq!(cm.camera().eye().y, before.y + 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_gaggle_cuts_filtered() {
        let stage = Stage::new();
        let hill = CameraSubject::Fixed(Shot {
            eye: Vec3::new(5.0, 5.0, 1.0),
            focus: Vec3::new(3.0, 8.0, 0.5),
        });

        // npc cuts are ignored unless watching the gaggle
        let mut cm = camera_man();
        cm.set_mode(CameraMode::User, true, &stage);
        cm.cut_setup(hill, false, &stage);
        assert_eq!(cm.subject(), Some(CameraSubject::Glider(GliderId::User)));

        // and while a gaggle cut is running
        cm.set_mode(CameraMode::Gaggle, false, &stage);
        cm.cut_setup(hill, false, &stage);
        assert_eq!(cm.subject(), Some(CameraSubject::Glider(GliderId::Gaggle(5))));

        // and for a while after it ends
        for _ in 0..CUT_LEN {
            cm.tick(&stage);
        }
        cm.cut_setup(hill, false, &stage);
        assert_eq!(cm.subject(), Some(CameraSubject::Glider(GliderId::Gaggle(5))));

        for _ in 0..CUT_LEN {
            cm.tick(&stage);
        }
        cm.apply(
            CutRequest {
                subject: hill,
                from_user: false,
            },
            &stage,
        );
        assert_eq!(cm.subject(), Some(hill));
    }

    #[test]
    fn test_plan_view() {
        let stage = Stage::new();
        let mut cm = camera_man();
        cm.set_mode(CameraMode::Plan, true, &stage);
        assert!(!cm.is_cutting());
        assert_eq!(cm.camera().focus(), Vec3::new(0.0, 16.0, 1.0));
        assert_eq!(cm.camera().eye(), Vec3::new(TILE_WIDTH / 2.0, 16.0, PLAN_HEIGHT));

        // cuts are ignored; the view tracks the subject's y
        cm.cut_setup(CameraSubject::Landscape, true, &stage);
        let mut shot = stage.glider.get();
        shot.focus.y += 2.0;
        stage.glider.set(shot);
        cm.tick(&stage);
        assert_eq!(cm.camera().focus(), Vec3::new(0.0, 18.0, 1.0));
        assert_eq!(cm.subject(), Some(CameraSubject::Glider(GliderId::User)));
    }

    #[test]
    fn test_plan_view_without_subject() {
        let stage = Stage::new();
        let mut cm = CameraMan::new(Camera::default());
        cm.set_mode(CameraMode::Plan, false, &stage);
        assert_eq!(cm.camera().focus(), Vec3::new(0.0, TILE_WIDTH, 0.0));
        assert_eq!(cm.subject(), None);
    }

    #[test]
    fn test_tile_view_and_vanished_subject() {
        let stage = Stage::new();
        let mut cm = camera_man();
        cm.set_mode(CameraMode::Tile, true, &stage);
        assert_eq!(cm.subject(), Some(CameraSubject::Landscape));

        // a cloud that has gone is not cut to
        cm.cut_setup(CameraSubject::Cloud(CloudId(3)), true, &stage);
        assert_eq!(cm.subject(), Some(CameraSubject::Landscape));
    }
}
