//! Tick Context
//!
//! Built once at the start of every tick and passed to each component, so no
//! component looks up the camera or the viewer on its own.

use overlook_model::{FrameTime, Vec2, Vec3};

use crate::host::{Camera, Snapshot};
use crate::projection::{is_on_screen, project};

/// Per-tick view of the viewer and camera.
pub struct TickContext<'a, H> {
    pub now: FrameTime,
    pub camera: &'a dyn Camera,
    pub viewer: Option<H>,
    /// Base position distances are measured from
    pub origin: Vec3,
    /// Eye position line-of-sight rays start from
    pub eye: Vec3,
    pub screen: Vec2,
}

impl<'a, H: Copy + Eq> TickContext<'a, H> {
    /// Capture the viewer and camera state for this tick.
    ///
    /// Falls back to the camera position when there is no viewer or the
    /// viewer cannot be described.
    pub fn capture<S>(host: &S, camera: &'a dyn Camera, now: FrameTime) -> Self
    where
        S: Snapshot<Handle = H>,
    {
        let viewer = host.viewer().filter(|v| host.is_valid(*v));
        let view = viewer.and_then(|v| host.describe(v).ok());
        let origin = view
            .as_ref()
            .map(|v| v.position)
            .unwrap_or_else(|| camera.position());
        let eye = view
            .as_ref()
            .and_then(|v| v.head)
            .unwrap_or_else(|| camera.position());

        Self {
            now,
            camera,
            viewer,
            origin,
            eye,
            screen: camera.screen_size(),
        }
    }

    pub fn is_viewer(&self, handle: H) -> bool {
        self.viewer == Some(handle)
    }

    /// Screen position of a world point when it is in front of the camera
    /// and within `margin` pixels of the visible rectangle.
    pub fn on_screen(&self, world: Vec3, margin: f32) -> Option<Vec2> {
        let p = project(world, self.camera);
        if p.in_front && is_on_screen(p.screen, self.screen.x, self.screen.y, margin) {
            Some(p.screen)
        } else {
            None
        }
    }
}
