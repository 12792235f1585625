// Steering for flying dots: targets, thermals, ridge circuits and user turns

use glam::{Vec2, Vec3};

use super::camera_man::{CameraSubject, CameraTarget};
use super::circuit::{Circuit, LEFT, RIGHT, STRAIGHT};
use super::cloud::CloudId;
use super::flying_dot::Airspace;
use super::sky::Sky;

/// Steps per leg of a wiggle
const WIGGLE_SIZE: i32 = 5;

/// Close enough to a target, as a fraction of the turn radius
const ARRIVAL_FRACTION: f32 = 0.25;

/// Flying straight at the target when the heading is this well aligned
const ON_COURSE_COS: f32 = 0.99;

/// A committed circuit turn ends once the heading is this well aligned with the next waypoint
const CIRCUIT_RELEASE_COS: f32 = 0.9;

/// Where a flying dot needs to be and what it knows about itself
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DotState {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Horizontal distance per update
    pub ds: f32,
    pub turn_radius: f32,
}

/// Result of steering towards a point
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Heading {
    Arrived,
    /// Turn amount: > 0 right, < 0 left, in multiples of the turn rate
    Turn(f32),
}

/// Working a ridge: the beat, the waypoint being flown to and any turn in progress
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitRun {
    circuit: Circuit,
    waypoint: Vec2,
    joined: bool,
    committed_turn: Option<f32>,
}

impl CircuitRun {
    fn new(mut circuit: Circuit) -> Self {
        let waypoint = circuit.next_point();
        Self {
            circuit,
            waypoint,
            joined: false,
            committed_turn: None,
        }
    }

    /// True once the first waypoint has been reached
    pub fn joined(&self) -> bool {
        self.joined
    }

    /// Waypoint shifted back along the fall line by the current height
    fn leaning_waypoint(&self, z: f32) -> Vec2 {
        self.waypoint + (self.circuit.fall_line() * z).truncate()
    }

    fn steer(&mut self, dot: &DotState) -> f32 {
        let target = self.leaning_waypoint(dot.position.z);

        if let Some(turn) = self.committed_turn {
            let heading = dot.velocity.truncate().normalize_or_zero();
            let to_target = (target - dot.position.truncate()).normalize_or_zero();
            if heading.dot(to_target) < CIRCUIT_RELEASE_COS {
                return turn;
            }
            self.committed_turn = None;
        }

        match head_towards(target, dot, true) {
            Heading::Turn(dir) => dir,
            Heading::Arrived => {
                self.committed_turn = Some(self.circuit.turn_dir());
                self.waypoint = self.circuit.next_point();
                self.joined = true;
                STRAIGHT
            }
        }
    }
}

/// What the dot is currently doing
#[derive(Debug, Clone, PartialEq)]
pub enum Controller {
    /// Fly straight on
    Idle,
    /// Head for a point, then fly straight on
    Target(Vec2),
    /// Circle in a cloud's thermal
    Cloud(CloudId),
    /// Ridge soar
    Circuit(CircuitRun),
}

/// Decides each update whether to turn
#[derive(Debug, Clone)]
pub struct MovementManager {
    controller: Controller,
    user_turn: f32,
    wiggle_count: i32,
}

impl MovementManager {
    pub fn new() -> Self {
        Self {
            controller: Controller::Idle,
            user_turn: STRAIGHT,
            wiggle_count: 0,
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn cloud(&self) -> Option<CloudId> {
        match self.controller {
            Controller::Cloud(id) => Some(id),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn user_turn(&self) -> f32 {
        self.user_turn
    }

    #[cfg(test)]
    pub fn is_wiggling(&self) -> bool {
        self.wiggle_count > 0
    }

    /// On a ridge circuit and past its first waypoint
    pub fn joined_circuit(&self) -> bool {
        matches!(&self.controller, Controller::Circuit(run) if run.joined())
    }

    pub fn clear_controllers(&mut self) {
        self.controller = Controller::Idle;
    }

    pub fn set_target(&mut self, target: Vec2) {
        self.controller = Controller::Target(target);
    }

    pub fn set_cloud(&mut self, cloud: CloudId) {
        self.controller = Controller::Cloud(cloud);
    }

    /// Put the dot on a circuit it has already reached
    #[cfg(test)]
    pub fn join_circuit(&mut self, circuit: Circuit) {
        let mut run = CircuitRun::new(circuit);
        run.joined = true;
        self.controller = Controller::Circuit(run);
    }

    pub fn set_circuit(&mut self, circuit: Circuit) {
        self.controller = Controller::Circuit(CircuitRun::new(circuit));
    }

    /// The user steering; drops whatever the dot was doing
    pub fn set_user_turn(&mut self, dir: f32) {
        self.clear_controllers();
        self.user_turn = dir;
    }

    /// Turn for this update: > 0 right, < 0 left, 0 straight
    pub fn next_move(&mut self, dot: &DotState, sky: &Sky) -> f32 {
        if self.wiggle_count > 0 {
            return self.wiggle();
        }
        if self.user_turn != STRAIGHT {
            return self.user_turn;
        }

        let mut release = false;
        let turn = match &mut self.controller {
            Controller::Idle => STRAIGHT,
            Controller::Target(target) => match head_towards(*target, dot, false) {
                Heading::Turn(dir) => dir,
                Heading::Arrived => {
                    release = true;
                    STRAIGHT
                }
            },
            Controller::Cloud(id) => match sky.cloud(*id) {
                Some(cloud) => {
                    let core = Vec2::new(cloud.center().x, cloud.y_at(dot.position.z));
                    circle_around(core, dot)
                }
                None => {
                    release = true;
                    STRAIGHT
                }
            },
            Controller::Circuit(run) => run.steer(dot),
        };

        if release {
            self.controller = Controller::Idle;
        }
        turn
    }

    /// Rock left, right, right, left
    fn wiggle(&mut self) -> f32 {
        self.wiggle_count -= 1;
        let c = self.wiggle_count;
        if c > WIGGLE_SIZE * 3 {
            -2.0
        } else if c > WIGGLE_SIZE {
            2.0
        } else if c > 0 {
            -2.0
        } else {
            STRAIGHT
        }
    }

    /// Join the ridge or thermal under the dot, else wiggle.
    ///
    /// Returns the lift source joined, for the camera.
    pub fn work_lift(&mut self, dot: &DotState, air: &Airspace) -> Option<CameraSubject> {
        if matches!(self.controller, Controller::Cloud(_) | Controller::Circuit(_)) {
            return None;
        }

        if let Some(hill) = air.landscape.hill_at(dot.position) {
            self.set_circuit(hill.circuit());
            return Some(CameraSubject::Fixed(hill.shot()));
        }
        if let Some(cloud) = air.sky.cloud_at(dot.position) {
            let id = cloud.id();
            self.set_cloud(id);
            return Some(CameraSubject::Cloud(id));
        }

        log::debug!("No lift at {:?}, wiggling", dot.position);
        self.wiggle_count = WIGGLE_SIZE * 4 + 1;
        None
    }
}

impl Default for MovementManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Steer towards a point using the sign of the cross product for the side.
///
/// Within twice the per-step turn angle of the target the turn is fine tuned to
/// avoid wobble; otherwise turns are at the full rate, doubled on a circuit.
pub fn head_towards(target: Vec2, dot: &DotState, on_circuit: bool) -> Heading {
    let u = target - dot.position.truncate();
    let v = dot.velocity.truncate();
    let d = u.length();

    if d < dot.turn_radius * ARRIVAL_FRACTION {
        return Heading::Arrived;
    }
    if dot.ds <= 0.0 {
        return Heading::Turn(STRAIGHT);
    }

    if u.dot(v) / (dot.ds * d) > ON_COURSE_COS {
        return Heading::Turn(STRAIGHT);
    }

    // z of v x u: positive when the target is to the left
    let c = v.perp_dot(u);
    let sin = c.abs() / (dot.ds * d);
    let sin_step = dot.ds / dot.turn_radius;

    if sin <= 2.0 * sin_step {
        // ds = r * dtheta and dtheta ~ sin(dtheta)
        let sin = if c > 0.0 { -sin } else { sin };
        return Heading::Turn(dot.turn_radius * sin / dot.ds);
    }

    let rate = if on_circuit { 2.0 } else { 1.0 };
    Heading::Turn(if c > 0.0 { LEFT * rate } else { RIGHT * rate })
}

/// Circle left around a point, closing in from a distance first
pub fn circle_around(center: Vec2, dot: &DotState) -> f32 {
    let r = dot.position.truncate() - center;
    let v = dot.velocity.truncate();
    let d = r.length();

    if d > dot.turn_radius * 3.0 {
        return match head_towards(center, dot, false) {
            Heading::Turn(dir) => dir,
            Heading::Arrived => STRAIGHT,
        };
    }
    if dot.ds <= 0.0 {
        return LEFT;
    }

    let cross = r.perp_dot(v);
    let d_perp = cross.abs() / dot.ds;
    let along = r.dot(v);

    if cross >= 0.0 {
        // going round the right way
        if along > 0.0 || d_perp > dot.turn_radius {
            LEFT
        } else {
            STRAIGHT
        }
    } else if d < dot.turn_radius || along > 0.0 {
        LEFT
    } else {
        RIGHT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::landscape::Landscape;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const DS: f32 = 0.02;

    fn dot_at(x: f32, y: f32, heading: Vec2) -> DotState {
        let v = heading.normalize() * DS;
        DotState {
            position: Vec3::new(x, y, 1.0),
            velocity: Vec3::new(v.x, v.y, 0.0),
            ds: DS,
            turn_radius: 0.3,
        }
    }

    #[test]
    fn test_head_towards_sides() {
        let dot = dot_at(0.0, 0.0, Vec2::Y);
        assert_eq!(head_towards(Vec2::new(5.0, 0.0), &dot, false), Heading::Turn(RIGHT));
        assert_eq!(head_towards(Vec2::new(-5.0, 0.0), &dot, false), Heading::Turn(LEFT));
        assert_eq!(head_towards(Vec2::new(-5.0, 0.0), &dot, true), Heading::Turn(-2.0));
        assert_eq!(head_towards(Vec2::new(0.0, 5.0), &dot, false), Heading::Turn(STRAIGHT));
        assert_eq!(head_towards(Vec2::new(0.05, 0.0), &dot, false), Heading::Arrived);
    }

    #[test]
    fn test_head_towards_fine_tunes_near_heading() {
        let dot = dot_at(0.0, 0.0, Vec2::Y);
        // under 6 degrees off counts as straight on
        assert_eq!(head_towards(Vec2::new(0.5, 5.0), &dot, false), Heading::Turn(STRAIGHT));

        // fast enough that 10 degrees is within twice the per-step turn
        let fast = DotState {
            velocity: Vec3::new(0.0, 0.1, 0.0),
            ds: 0.1,
            ..dot
        };
        let (s, c) = 10f32.to_radians().sin_cos();
        match head_towards(Vec2::new(3.0 * s, 3.0 * c), &fast, false) {
            Heading::Turn(dir) => assert_abs_diff_eq!(dir, 0.3 * s / 0.1, epsilon = 1e-4),
            Heading::Arrived => panic!("not there yet"),
        }
        match head_towards(Vec2::new(-3.0 * s, 3.0 * c), &fast, false) {
            Heading::Turn(dir) => assert_abs_diff_eq!(dir, -0.3 * s / 0.1, epsilon = 1e-4),
            Heading::Arrived => panic!("not there yet"),
        }
    }

    #[test]
    fn test_circle_around_turns_left() {
        // core to the left, flying tangentially anticlockwise
        let dot = dot_at(0.25, 0.0, Vec2::Y);
        assert_eq!(circle_around(Vec2::ZERO, &dot), STRAIGHT);

        // wrong way round
        let dot = dot_at(0.25, 0.0, Vec2::NEG_Y);
        assert_eq!(circle_around(Vec2::ZERO, &dot), LEFT);

        // far off: head in
        let dot = dot_at(5.0, 0.0, Vec2::Y);
        assert_eq!(circle_around(Vec2::ZERO, &dot), LEFT);
    }

    #[test]
    fn test_wiggle_sequence() {
        let mut mm = MovementManager::new();
        mm.wiggle_count = WIGGLE_SIZE * 4 + 1;
        let sky = Sky::new();
        let dot = dot_at(0.0, 0.0, Vec2::Y);
        let moves: Vec<f32> = (0..21).map(|_| mm.next_move(&dot, &sky)).collect();
        assert_eq!(&moves[..5], &[-2.0; 5]);
        assert_eq!(&moves[5..15], &[2.0; 10]);
        assert_eq!(&moves[15..20], &[-2.0; 5]);
        assert_eq!(moves[20], STRAIGHT);
        assert!(!mm.is_wiggling());
    }

    #[test]
    fn test_user_turn_overrides_controller() {
        let mut mm = MovementManager::new();
        mm.set_target(Vec2::new(5.0, 0.0));
        mm.set_user_turn(LEFT);
        assert_eq!(mm.controller(), &Controller::Idle);
        let sky = Sky::new();
        assert_eq!(mm.next_move(&dot_at(0.0, 0.0, Vec2::Y), &sky), LEFT);
    }

    #[test]
    fn test_target_cleared_on_arrival() {
        let mut mm = MovementManager::new();
        mm.set_target(Vec2::new(0.0, 0.05));
        let sky = Sky::new();
        assert_eq!(mm.next_move(&dot_at(0.0, 0.0, Vec2::Y), &sky), STRAIGHT);
        assert_eq!(mm.controller(), &Controller::Idle);
    }

    #[test]
    fn test_vanished_cloud_releases_controller() {
        let mut mm = MovementManager::new();
        mm.set_cloud(CloudId(99));
        let sky = Sky::new();
        mm.next_move(&dot_at(0.0, 0.0, Vec2::Y), &sky);
        assert_eq!(mm.cloud(), None);
    }

    #[test]
    fn test_circuit_turn_is_committed_then_released() {
        let mut circuit = Circuit::new(Vec2::ZERO, Vec3::Y);
        circuit.add(Vec2::new(0.0, 0.0));
        circuit.add(Vec2::new(5.0, 0.0));
        let mut mm = MovementManager::new();
        mm.set_circuit(circuit);
        let sky = Sky::new();

        // at the first waypoint, flying west, at z 0 so nothing leans
        let mut dot = dot_at(0.0, 0.0, Vec2::NEG_X);
        dot.position.z = 0.0;
        assert_eq!(mm.next_move(&dot, &sky), STRAIGHT);
        assert!(mm.joined_circuit());

        // still facing away from the next waypoint: keep turning
        let turn = mm.next_move(&dot, &sky);
        assert_eq!(turn, LEFT);

        // facing it: back to normal steering
        let dot = DotState {
            position: Vec3::ZERO,
            ..dot_at(0.0, 0.0, Vec2::X)
        };
        assert_eq!(mm.next_move(&dot, &sky), STRAIGHT);
        match mm.controller() {
            Controller::Circuit(run) => assert_eq!(run.committed_turn, None),
            other => panic!("unexpected controller {:?}", other),
        }
    }

    #[test]
    fn test_work_lift() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut sky = Sky::new();
        let landscape = Landscape::new(&mut sky, &mut rng);
        let id = sky.spawn_cloud(0.0, 10.0, 10, 1, &mut rng);
        let air = Airspace {
            landscape: &landscape,
            sky: &sky,
            model_dt: 0.02,
        };

        let mut mm = MovementManager::new();
        let under = dot_at(0.0, 9.5, Vec2::Y);
        assert_eq!(mm.work_lift(&under, &air), Some(CameraSubject::Cloud(id)));
        assert_eq!(mm.cloud(), Some(id));
        // already working lift
        assert_eq!(mm.work_lift(&under, &air), None);

        let mut mm = MovementManager::new();
        let nowhere = dot_at(0.0, -8.0, Vec2::Y);
        assert_eq!(mm.work_lift(&nowhere, &air), None);
        assert!(mm.is_wiggling());
    }
}
