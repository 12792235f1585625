// Camera for the software 3D scene: view rotation, projection and lighting

use glam::{Mat3, Vec2, Vec3};

use crate::core::color::Color;

/// Light not reaching a surface directly still lights it this much
pub const AMBIENT_LIGHT: f32 = 0.3;

/// Sky colour; distant surfaces fade into it
pub const BACKGROUND: Color = Color::WHITE;

/// Camera-space depth beyond the focus at which surfaces are fully fogged
pub const DEPTH_OF_VISION: f32 = 50.0;

/// Points further off-axis than this (tan squared) are outside the field of view
const MAX_TAN_SQUARED: f32 = 25.0;

/// Lens scale relative to screen height; smaller gives a wider angle
const LENS_FACTOR: f32 = 1.1;

/// A point after projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    /// Screen position in pixels, origin top-left
    pub screen: Vec2,
    /// Camera-space x; the focus is at 0 and the eye at `distance`
    pub depth: f32,
    /// False when the point is behind the eye or too far off-axis
    pub visible: bool,
}

/// Rotation taking `ray` onto the +x axis: first about z, then about y.
///
/// Up stays up for any ray that is not vertical.
pub fn look_rotation(ray: Vec3) -> Mat3 {
    let mut about_z = Mat3::IDENTITY;
    let mut about_y = Mat3::IDENTITY;

    let horizontal = (ray.x * ray.x + ray.y * ray.y).sqrt();
    if horizontal != 0.0 {
        let (c, s) = (ray.x / horizontal, ray.y / horizontal);
        about_z = Mat3::from_cols(Vec3::new(c, -s, 0.0), Vec3::new(s, c, 0.0), Vec3::Z);

        let length = ray.length();
        let (c, s) = (horizontal / length, ray.z / length);
        about_y = Mat3::from_cols(Vec3::new(c, 0.0, -s), Vec3::Y, Vec3::new(s, 0.0, c));
    }

    about_y * about_z
}

/// Eye, focus and light of the scene
#[derive(Debug, Clone)]
pub struct Camera {
    eye: Vec3,
    focus: Vec3,
    light_ray: Vec3,
    matrix: Mat3,
    distance: f32,
    screen_width: f32,
    screen_height: f32,
    scale: f32,
}

impl Camera {
    pub fn new(screen_width: u32, screen_height: u32) -> Self {
        let mut camera = Self {
            eye: Vec3::new(3.0, 0.0, 0.0),
            focus: Vec3::ZERO,
            light_ray: Vec3::new(1.0, 1.0, -3.0).normalize(),
            matrix: Mat3::IDENTITY,
            distance: 0.0,
            screen_width: screen_width as f32,
            screen_height: screen_height as f32,
            scale: screen_height as f32 * LENS_FACTOR,
        };
        camera.update_matrix();
        camera
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn focus(&self) -> Vec3 {
        self.focus
    }

    pub fn set_eye(&mut self, eye: Vec3) {
        self.eye = eye;
    }

    pub fn set_focus(&mut self, focus: Vec3) {
        self.focus = focus;
    }

    /// Unit direction light travels in
    #[cfg(test)]
    pub fn light_ray(&self) -> Vec3 {
        self.light_ray
    }

    /// Eye to focus distance, as of the last `update_matrix`
    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn screen_size(&self) -> Vec2 {
        Vec2::new(self.screen_width, self.screen_height)
    }

    /// Vertical field of view (radians) matching the software projection
    pub fn vertical_fov(&self) -> f32 {
        2.0 * (0.5 / LENS_FACTOR).atan()
    }

    pub fn resize(&mut self, screen_width: u32, screen_height: u32) {
        self.screen_width = screen_width as f32;
        self.screen_height = screen_height as f32;
        self.scale = self.screen_height * LENS_FACTOR;
    }

    /// Move eye and focus together
    pub fn translate(&mut self, dx: f32, dy: f32) {
        let delta = Vec3::new(dx, dy, 0.0);
        self.eye += delta;
        self.focus += delta;
    }

    pub fn offset_focus(&mut self, dx: f32, dy: f32) {
        self.focus += Vec3::new(dx, dy, 0.0);
    }

    /// Move the focus, keeping the angle of view
    pub fn move_focus(&mut self, focus: Vec3) {
        let ray = self.eye - self.focus;
        self.focus = focus;
        self.eye = focus + ray;
    }

    /// Swing the eye round the vertical through the focus
    pub fn rotate_eye_about_focus(&mut self, dtheta: f32) {
        let ray = Mat3::from_rotation_z(-dtheta.atan()) * (self.eye - self.focus);
        self.eye = self.focus + ray;
    }

    /// Raise (or lower) the eye by `dz` eye distances; never below ground
    pub fn translate_z(&mut self, dz: f32) {
        let mut ray = self.eye - self.focus;
        ray.z += self.distance * dz;
        self.eye = self.focus + ray;
        if self.eye.z < 0.0 {
            self.eye.z = 0.0;
        }
    }

    /// Recompute the view rotation; call once per frame before projecting
    pub fn update_matrix(&mut self) {
        let ray = self.eye - self.focus;
        self.matrix = look_rotation(ray);
        self.distance = ray.length();
    }

    /// World point into camera space (eye on +x at `distance`, looking back at the focus)
    pub fn to_camera_space(&self, p: Vec3) -> Vec3 {
        self.matrix * (p - self.focus)
    }

    pub fn project(&self, p: Vec3) -> ProjectedPoint {
        let c = self.to_camera_space(p);
        let depth = self.distance - c.x;
        let mut projected = ProjectedPoint {
            screen: self.scale_to_screen(c.y, c.z),
            depth: c.x,
            visible: false,
        };

        if depth <= 0.0 {
            return projected;
        }

        let (tan_y, tan_z) = (c.y / depth, c.z / depth);
        if tan_y * tan_y > MAX_TAN_SQUARED || tan_z * tan_z > MAX_TAN_SQUARED {
            return projected;
        }

        projected.screen = self.scale_to_screen(tan_y, tan_z);
        projected.visible = true;
        projected
    }

    /// Origin at centre screen; screen y grows downwards
    pub fn scale_to_screen(&self, y: f32, z: f32) -> Vec2 {
        Vec2::new(
            y * self.scale + self.screen_width / 2.0,
            -z * self.scale + self.screen_height / 2.0,
        )
    }

    /// Light falling on a surface with this unit normal, between ambient and 1
    pub fn surface_light(&self, normal: Vec3) -> f32 {
        let mut light = (1.0 - self.light_ray.dot(normal)) / 2.0;

        // cloud bases get some light from below
        if normal.z < -0.99 {
            light += 0.3;
        }

        light * (1.0 - AMBIENT_LIGHT) + AMBIENT_LIGHT
    }

    /// Fade a colour towards the background by camera-space depth
    pub fn fog(&self, depth: f32, color: Color) -> Color {
        if depth >= 0.0 {
            return color;
        }
        let f = -depth / DEPTH_OF_VISION;
        if f > 1.0 {
            BACKGROUND
        } else {
            color.lerp_to(BACKGROUND, f)
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(1000, 600)
    }
}
