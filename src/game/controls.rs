// Player controls: flying the user glider, panning and orbiting the camera

use glam::{Vec2, Vec3};

use super::camera_man::{CameraSubject, CutRequest};
use super::circuit::{LEFT, RIGHT, STRAIGHT};
use super::flying_dot::Airspace;
use super::glider::Glider;
use super::landscape::TILE_WIDTH;
use crate::engine::input::Action;
use crate::engine::scene::Camera;

/// Camera pan per key press
const PAN_STEP: f32 = 0.1;

/// Pixels a drag has to cover before the camera moves
const DRAG_THRESHOLD: f32 = 20.0;

/// Steer the user glider back over the course when it strays
pub fn keep_on_course(glider: &mut Glider) {
    let p = glider.position();
    let half = TILE_WIDTH / 2.0;

    if p.x > half || p.x < -half {
        glider.set_target(Vec2::new(0.0, p.y));
    }
    if p.y < -half {
        glider.set_target(Vec2::new(p.x, 0.0));
    }
}

/// Apply a flying action to the user glider; returns any camera cut it calls for
pub fn steer_user(glider: &mut Glider, action: Action, pressed: bool, air: &Airspace) -> Option<CutRequest> {
    let self_cut = CutRequest {
        subject: CameraSubject::Glider(glider.id()),
        from_user: true,
    };

    match (action, pressed) {
        (Action::TurnLeft | Action::TurnRight, true) => {
            glider.set_demo_mode(false);
            glider.set_user_turn(if action == Action::TurnLeft { LEFT } else { RIGHT });
            Some(self_cut)
        }
        (Action::TurnLeft | Action::TurnRight, false) => {
            glider.set_user_turn(STRAIGHT);
            None
        }
        (Action::WorkLift, true) => {
            // slow down first
            glider.set_polar_index(0);
            glider.work_lift(air).map(|subject| CutRequest {
                subject,
                from_user: true,
            })
        }
        (Action::FastPolar, true) => {
            glider.set_polar_index(1);
            None
        }
        (Action::SlowPolar, true) => {
            glider.set_polar_index(0);
            None
        }
        _ => None,
    }
}

/// Move the camera sideways or along the course; false for other actions
pub fn pan_camera(camera: &mut Camera, action: Action) -> bool {
    let (dx, dy) = match action {
        Action::PanLeft => (-PAN_STEP, 0.0),
        Action::PanRight => (PAN_STEP, 0.0),
        Action::PanForward => (0.0, PAN_STEP),
        Action::PanBack => (0.0, -PAN_STEP),
        _ => return false,
    };
    camera.translate(dx, dy);
    true
}

/// Orbit the eye round the focus while dragging sideways, raise or lower it dragging up or down.
///
/// A quarter turn takes four seconds.
pub fn orbit_camera(camera: &mut Camera, drag: Vec2, delta_time: f32) {
    let unit = std::f32::consts::PI * delta_time / 8.0;

    let dtheta = if drag.x > DRAG_THRESHOLD {
        -unit
    } else if drag.x < -DRAG_THRESHOLD {
        unit
    } else {
        0.0
    };
    let dz = if drag.y > DRAG_THRESHOLD {
        delta_time / 4.0
    } else if drag.y < -DRAG_THRESHOLD {
        -delta_time / 4.0
    } else {
        0.0
    };

    if dtheta != 0.0 {
        camera.rotate_eye_about_focus(-dtheta);
    }
    if dz != 0.0 {
        camera.update_matrix();
        camera.translate_z(-dz);
    }
}

/// Eye and focus the game starts from and returns to on every launch
pub fn launch_view(camera: &mut Camera) {
    camera.set_eye(Vec3::new(TILE_WIDTH / 2.0, -TILE_WIDTH / 4.0, 6.0));
    camera.set_focus(Vec3::ZERO);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::clock::TIME_PER_FRAME;
    use crate::game::glider::{GliderId, GliderKind};
    use crate::game::landscape::Landscape;
    use crate::game::movement::Controller;
    use crate::game::sky::Sky;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn launched_user(p: Vec3) -> (Glider, Landscape, Sky) {
        let mut rng = StdRng::seed_from_u64(11);
        let mut sky = Sky::new();
        let landscape = Landscape::new(&mut sky, &mut rng);
        let mut user = Glider::new(GliderId::User, GliderKind::User);
        {
            let air = Airspace {
                landscape: &landscape,
                sky: &sky,
                model_dt: TIME_PER_FRAME,
            };
            user.take_off(p, &air);
        }
        (user, landscape, sky)
    }

    #[test]
    fn test_keep_on_course() {
        let (mut user, _, _) = launched_user(Vec3::new(12.0, 30.0, 1.0));
        keep_on_course(&mut user);
        assert_eq!(
            user.dot().movement().controller(),
            &Controller::Target(Vec2::new(0.0, 30.0))
        );

        let (mut user, _, _) = launched_user(Vec3::new(3.0, -11.0, 1.0));
        keep_on_course(&mut user);
        assert_eq!(
            user.dot().movement().controller(),
            &Controller::Target(Vec2::new(3.0, 0.0))
        );
    }

    #[test]
    fn test_turn_keys() {
        let (mut user, landscape, sky) = launched_user(Vec3::new(0.0, 0.0, 1.0));
        let air = Airspace {
            landscape: &landscape,
            sky: &sky,
            model_dt: TIME_PER_FRAME,
        };

        let cut = steer_user(&mut user, Action::TurnLeft, true, &air);
        assert_eq!(
            cut,
            Some(CutRequest {
                subject: CameraSubject::Glider(GliderId::User),
                from_user: true
            })
        );
        assert_eq!(user.dot().movement().user_turn(), LEFT);

        assert_eq!(steer_user(&mut user, Action::TurnLeft, false, &air), None);
        assert_eq!(user.dot().movement().user_turn(), STRAIGHT);
    }

    #[test]
    fn test_polar_keys() {
        let (mut user, landscape, sky) = launched_user(Vec3::new(0.0, 0.0, 1.0));
        let air = Airspace {
            landscape: &landscape,
            sky: &sky,
            model_dt: TIME_PER_FRAME,
        };

        steer_user(&mut user, Action::FastPolar, true, &air);
        assert_eq!(user.polar_index(), 1);
        // releases do nothing
        steer_user(&mut user, Action::SlowPolar, false, &air);
        assert_eq!(user.polar_index(), 1);
        steer_user(&mut user, Action::SlowPolar, true, &air);
        assert_eq!(user.polar_index(), 0);

        steer_user(&mut user, Action::FastPolar, true, &air);
        steer_user(&mut user, Action::WorkLift, true, &air);
        assert_eq!(user.polar_index(), 0);
    }

    #[test]
    fn test_pan() {
        let mut camera = Camera::new(640, 480);
        launch_view(&mut camera);
        assert!(pan_camera(&mut camera, Action::PanLeft));
        assert!(pan_camera(&mut camera, Action::PanForward));
        assert!(!pan_camera(&mut camera, Action::Pause));
        assert_abs_diff_eq!(camera.eye().x, 9.9, epsilon = 1e-5);
        assert_abs_diff_eq!(camera.focus().y, 0.1, epsilon = 1e-5);
    }

    #[test]
    fn test_orbit_needs_a_real_drag() {
        let mut camera = Camera::new(640, 480);
        launch_view(&mut camera);
        let eye = camera.eye();

        orbit_camera(&mut camera, Vec2::new(10.0, -15.0), 0.04);
        assert_eq!(camera.eye(), eye);

        orbit_camera(&mut camera, Vec2::new(50.0, 0.0), 0.04);
        assert_ne!(camera.eye(), eye);
        // orbiting keeps the distance to the focus
        assert_abs_diff_eq!(camera.eye().length(), eye.length(), epsilon = 1e-4);

        let z = camera.eye().z;
        orbit_camera(&mut camera, Vec2::new(0.0, 50.0), 0.04);
        assert!(camera.eye().z < z);
    }
}
