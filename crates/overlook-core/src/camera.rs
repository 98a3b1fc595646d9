//! Perspective Camera
//!
//! A plain pinhole camera used by the sandbox and the headless binary.

use bevy_math::{Mat4, Vec4};
use overlook_model::{Vec2, Vec3};

use crate::host::Camera;

/// Right-handed perspective camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    /// Look direction, need not be normalized
    pub forward: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov_y: f32,
    pub width: f32,
    pub height: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.7, 0.0),
            forward: Vec3::Z,
            up: Vec3::Y,
            fov_y: 60.0,
            width: 1920.0,
            height: 1080.0,
            near: 0.1,
            far: 2000.0,
        }
    }
}

impl PerspectiveCamera {
    pub fn looking(position: Vec3, forward: Vec3) -> Self {
        Self {
            position,
            forward,
            ..Self::default()
        }
    }

    pub fn with_screen(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    fn view_projection(&self) -> Mat4 {
        let forward = self.forward.normalize_or_zero();
        let view = Mat4::look_to_rh(self.position, forward, self.up);
        let aspect = if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        };
        let projection =
            Mat4::perspective_rh(self.fov_y.to_radians(), aspect, self.near, self.far);
        projection * view
    }
}

impl Camera for PerspectiveCamera {
    fn world_to_screen(&self, point: Vec3) -> Vec3 {
        let clip: Vec4 = self.view_projection() * point.extend(1.0);
        if clip.w.abs() < f32::EPSILON {
            return Vec3::new(f32::NAN, f32::NAN, 0.0);
        }
        let ndc = clip.truncate() / clip.w;
        Vec3::new(
            (ndc.x + 1.0) * 0.5 * self.width,
            (ndc.y + 1.0) * 0.5 * self.height,
            clip.w,
        )
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn forward(&self) -> Vec3 {
        self.forward.normalize_or_zero()
    }

    fn screen_size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}
