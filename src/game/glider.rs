// Gliders: the flight model plus sink, lift hunting and a shaded body

use glam::{Vec2, Vec3};

use super::camera_man::{CameraSubject, CameraTarget, CutRequest, CUT_LEN};
use super::circuit::STRAIGHT;
use super::flying_dot::{Airspace, FlyingDot};
use super::glider_shape::{GliderShape, BODY_HEIGHT};
use super::movement::Controller;
use super::tail::Tail;
use crate::core::color::Color;
use crate::engine::scene::{Layer, Object3d};

/// Distance units (2 km) per model minute
pub const SPEED: f32 = 1.0;

/// Glide angle of 8
pub const SINK_RATE: f32 = -1.0 / 8.0;

pub const TURN_RADIUS: f32 = 0.3;

/// Speed and sink multipliers: best glide, then fast
pub const POLAR: [[f32; 2]; 2] = [[1.0, 1.0], [1.5, 2.1]];

pub const TAIL_LENGTH: usize = 40;
const TAIL_WIRE_EVERY: usize = 4;
const TAIL_COLOR: Color = Color::LIGHT_GRAY;

/// Updates to fly downwind before looking for lift again
const TRY_LATER: i32 = 25;

/// How far downwind (and upwind) of the glider to start looking for lift
const LOOK_AHEAD: f32 = 2.0;

/// Downwind leg flown when there is no lift in range
const DOWNWIND_LEG: f32 = 8.0;

/// Which glider: the user's or one of the gaggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GliderId {
    User,
    Gaggle(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GliderKind {
    Regular,
    /// Faster and wider turning
    Rigid,
    User,
}

impl GliderKind {
    pub fn color(self) -> Color {
        match self {
            GliderKind::Regular => Color::WHITE,
            GliderKind::Rigid => Color::PINK,
            GliderKind::User => Color::YELLOW,
        }
    }

    fn speed(self) -> f32 {
        match self {
            GliderKind::Rigid => SPEED * 1.5,
            _ => SPEED,
        }
    }

    fn turn_radius(self) -> f32 {
        match self {
            GliderKind::Rigid => TURN_RADIUS * 1.2,
            _ => TURN_RADIUS,
        }
    }
}

/// A camera cut held back until the glider is nearly at its new lift source
#[derive(Debug, Clone, Copy)]
struct PendingCut {
    subject: CameraSubject,
    when: i32,
    count: i32,
}

#[derive(Debug, Clone)]
pub struct Glider {
    id: GliderId,
    kind: GliderKind,
    dot: FlyingDot,
    shape: GliderShape,
    body: Object3d,
    polar_index: usize,
    landed: bool,
    reached_goal: bool,
    /// Hunting lift on its own; the user glider leaves this once launched
    demo_mode: bool,
    try_later: i32,
    pending_cut: Option<PendingCut>,
    /// Tiles are loaded around this glider
    trigger_loading: bool,
}

impl Glider {
    /// A landed glider at the origin
    pub fn new(id: GliderId, kind: GliderKind) -> Self {
        let tail = Tail::new(TAIL_LENGTH, TAIL_WIRE_EVERY, TAIL_COLOR, Layer::Default, Vec3::ZERO);
        let dot = FlyingDot::new(kind.speed(), kind.turn_radius(), tail);
        let shape = GliderShape::new(kind.color());
        let body = shape.object().clone();

        let mut glider = Self {
            id,
            kind,
            dot,
            shape,
            body,
            polar_index: 0,
            landed: true,
            reached_goal: false,
            demo_mode: true,
            try_later: 0,
            pending_cut: None,
            trigger_loading: false,
        };
        glider.place_body(|_, _| 0.0);
        glider
    }

    pub fn id(&self) -> GliderId {
        self.id
    }

    #[cfg(test)]
    pub fn kind(&self) -> GliderKind {
        self.kind
    }

    pub fn is_user(&self) -> bool {
        self.id == GliderId::User
    }

    pub fn dot(&self) -> &FlyingDot {
        &self.dot
    }

    pub fn position(&self) -> Vec3 {
        self.dot.position()
    }

    pub fn velocity(&self) -> Vec3 {
        self.dot.velocity()
    }

    pub fn is_landed(&self) -> bool {
        self.landed
    }

    pub fn reached_goal(&self) -> bool {
        self.reached_goal
    }

    pub fn is_demo_mode(&self) -> bool {
        self.demo_mode
    }

    pub fn set_demo_mode(&mut self, demo_mode: bool) {
        self.demo_mode = demo_mode;
    }

    pub fn trigger_loading(&self) -> bool {
        self.trigger_loading
    }

    pub fn set_trigger_loading(&mut self, trigger_loading: bool) {
        self.trigger_loading = trigger_loading;
    }

    #[cfg(test)]
    pub fn polar_index(&self) -> usize {
        self.polar_index
    }

    /// Pick a point on the polar; sets speed, and sink at the next update
    pub fn set_polar_index(&mut self, index: usize) {
        self.polar_index = index.min(POLAR.len() - 1);
        self.dot
            .set_speed(POLAR[self.polar_index][0] * self.kind.speed());
    }

    /// Turn on the user's command; overrides any controller
    pub fn set_user_turn(&mut self, dir: f32) {
        self.dot.movement_mut().set_user_turn(dir);
    }

    /// Steer for a point, e.g. back towards the course
    pub fn set_target(&mut self, target: Vec2) {
        self.dot.movement_mut().set_target(target);
    }

    /// Join whatever lift is under the glider; the joined source is returned for the camera
    pub fn work_lift(&mut self, air: &Airspace) -> Option<CameraSubject> {
        let state = self.dot.state();
        self.dot.movement_mut().work_lift(&state, air)
    }

    /// Body, shadow and tail
    pub fn objects(&self) -> impl Iterator<Item = &Object3d> {
        [&self.body, self.dot.tail().object()].into_iter()
    }

    #[cfg(test)]
    pub fn body(&self) -> &Object3d {
        &self.body
    }

    /// Launch from `p` at best glide, off to the first lift source
    pub fn take_off(&mut self, p: Vec3, air: &Airspace) {
        self.set_polar_index(0);
        self.dot.place(p);
        self.landed = false;
        self.reached_goal = false;
        self.dot.movement_mut().set_user_turn(STRAIGHT);

        self.demo_mode = true;
        self.goto_next_lift_source(air);
        if self.is_user() {
            self.demo_mode = false;
        }
        self.place_body(|x, y| air.landscape.height(x, y));
        log::debug!("{:?} took off at {:?}", self.id, p);
    }

    /// One update; delayed camera cuts are queued on `cuts`
    pub fn update(&mut self, air: &Airspace, cuts: &mut Vec<CutRequest>) {
        if self.is_user() && self.demo_mode {
            return;
        }
        if self.landed || self.reached_goal {
            return;
        }

        self.dot.advance(air);
        self.sink(air, cuts);
        self.dot.finish();
        self.place_body(|x, y| air.landscape.height(x, y));

        if let Some(cut) = &mut self.pending_cut {
            cut.count += 1;
            if cut.count >= cut.when {
                cuts.push(CutRequest {
                    subject: cut.subject,
                    from_user: self.id == GliderId::User,
                });
                self.pending_cut = None;
            }
        }

        if air.landscape.reached_goal(self.position()) {
            log::info!("{:?} reached goal", self.id);
            self.reached_goal = true;
        }
    }

    /// Polar sink plus ridge and thermal lift
    fn sink(&mut self, air: &Airspace, cuts: &mut Vec<CutRequest>) {
        let mut lift = POLAR[self.polar_index][1] * SINK_RATE;
        let p = self.position();

        if let Some(hill) = air.landscape.hill_at(p) {
            lift += hill.lift(p);
            if p.z >= hill.max_height() + 0.1 && self.demo_mode && self.dot.movement().joined_circuit() {
                // top of the ridge
                self.dot.movement_mut().clear_controllers();
                self.goto_next_lift_source(air);
            }
        }

        if let Some(cloud) = air.sky.cloud_at(p) {
            if p.z < air.sky.cloud_base() - BODY_HEIGHT {
                lift += cloud.lift(p);
            } else {
                // stuck at cloud base
                lift = 0.0;
                if self.demo_mode {
                    self.dot.movement_mut().clear_controllers();
                    self.goto_next_lift_source(air);
                }
            }
        }

        self.dot.set_climb(lift * air.model_dt);

        if p.z <= 0.0 && self.dot.velocity().z < 0.0 {
            self.dot.set_climb(0.0);
            if !self.landed {
                self.land();
            }
        }

        if self.try_later > 0 {
            self.try_later -= 1;
            if self.try_later == 0 {
                self.goto_next_lift_source(air);
            }
        }

        let decaying = self
            .dot
            .movement()
            .cloud()
            .and_then(|id| air.sky.cloud(id))
            .is_some_and(|c| c.is_decaying());
        if decaying {
            self.dot.movement_mut().clear_controllers();
            if self.is_user() {
                cuts.push(CutRequest {
                    subject: CameraSubject::Glider(self.id),
                    from_user: true,
                });
            } else {
                self.goto_next_lift_source(air);
            }
        } else if self.demo_mode && self.try_later == 0 && *self.dot.movement().controller() == Controller::Idle {
            // lift source vanished from under it
            self.goto_next_lift_source(air);
        }
    }

    fn land(&mut self) {
        self.dot.ground();
        self.landed = true;
        log::debug!("{:?} landed at {:?}", self.id, self.position());
    }

    /// Head for the next hill downwind, else the next cloud, else back to the last one.
    ///
    /// With nothing in range fly downwind for a while and look again.
    fn goto_next_lift_source(&mut self, air: &Airspace) {
        if !self.demo_mode {
            return;
        }

        let p = self.position();
        self.pending_cut = None;

        if let Some(hill) = air.landscape.next_hill(p + Vec3::Y * LOOK_AHEAD) {
            self.dot.movement_mut().set_circuit(hill.circuit());
            self.pending_cut = Some(self.cut_on_arrival(CameraSubject::Fixed(hill.shot()), hill.origin()));
            log::debug!("{:?} heading for hill at {:?}", self.id, hill.origin());
            return;
        }

        let cloud = air
            .sky
            .next_cloud(p + Vec3::Y * LOOK_AHEAD)
            .or_else(|| air.sky.prev_cloud(p - Vec3::Y * LOOK_AHEAD))
            .and_then(|id| air.sky.cloud(id));

        match cloud {
            Some(cloud) => {
                let id = cloud.id();
                self.dot.movement_mut().set_cloud(id);
                self.pending_cut = Some(self.cut_on_arrival(CameraSubject::Cloud(id), cloud.center().truncate()));
                log::debug!("{:?} heading for cloud {:?}", self.id, id);
            }
            None => {
                self.dot
                    .movement_mut()
                    .set_target(Vec2::new(p.x, p.y + DOWNWIND_LEG));
                self.try_later = TRY_LATER;
                log::debug!("{:?} found no lift, flying downwind", self.id);
            }
        }
    }

    /// Cut about two cut lengths before arriving, ignoring wind and target motion
    fn cut_on_arrival(&self, subject: CameraSubject, target: Vec2) -> PendingCut {
        let d = self.position().truncate().distance(target);
        let updates = (d / self.dot.ds()) as i32;
        PendingCut {
            subject,
            when: updates - CUT_LEN * 2,
            count: 0,
        }
    }

    /// Move the body to the dot and drop its shadow onto the ground
    fn place_body<F: Fn(f32, f32) -> f32>(&mut self, ground: F) {
        let frame = *self.dot.frame();
        let p = self.dot.position();
        self.body
            .transform_from(self.shape.object(), |q| frame.apply(q) + p);
        self.body.update_shadow(ground);
    }

    /// Status line for the user glider
    pub fn status(&self, time: f32) -> String {
        let p = self.position();
        let km = (p.y / 2.0) as i32;
        let mins = time as i32 / 2;

        if self.reached_goal {
            format!(
                "Well done ! You have reached goal. You flew {}km in {} mins. Press <y> to fly again.",
                km, mins
            )
        } else if self.landed {
            format!("You have landed - you flew {}km. Press <y> to fly again.", km)
        } else {
            let height = ((p.z / 2.0) * 1500.0) as i32;
            format!("D: {}km  T: {}mins  H: {}m ", km, mins, height)
        }
    }
}

impl CameraTarget for Glider {
    fn eye(&self) -> Vec3 {
        let p = self.position();
        Vec3::new(p.x + 0.2, p.y - 2.0, p.z + 0.3)
    }

    fn focus(&self) -> Vec3 {
        let p = self.position();
        let z = if p.z < 0.5 { 0.5 } else { 0.5 + (p.z - 0.5) / 2.0 };
        Vec3::new(p.x, p.y + 1.0, z)
    }
}
