//! Screen Projection
//!
//! Converts world points into top-left-origin screen coordinates and decides
//! which of them are worth labelling.

use overlook_model::{Vec2, Vec3};

use crate::host::{Camera, EntityView};

/// Lift above the head bone for participant labels.
pub const HEAD_OFFSET: f32 = 0.25;
/// Lift above the base transform when there is no head bone.
pub const BASE_OFFSET: f32 = 1.8;
/// Lift above the base transform for objects and zones.
pub const OBJECT_OFFSET: f32 = 0.3;

/// A projected point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Pixels, origin top-left
    pub screen: Vec2,
    /// False when the point is on or behind the camera plane
    pub in_front: bool,
}

/// Project a world point through the camera.
///
/// The camera reports bottom-left-origin pixels; the y axis is flipped so
/// labels can be drawn with a top-left origin.
pub fn project(world: Vec3, camera: &dyn Camera) -> Projection {
    let raw = camera.world_to_screen(world);
    let size = camera.screen_size();
    Projection {
        screen: Vec2::new(raw.x, size.y - raw.y),
        in_front: raw.z > 0.0,
    }
}

/// True iff `-margin <= x <= width + margin` and `-margin <= y <= height + margin`.
///
/// NaN coordinates are never on screen.
pub fn is_on_screen(p: Vec2, width: f32, height: f32, margin: f32) -> bool {
    p.x >= -margin && p.x <= width + margin && p.y >= -margin && p.y <= height + margin
}

/// World point a participant label hangs from.
pub fn participant_anchor(view: &EntityView) -> Vec3 {
    match view.head {
        Some(head) => head + Vec3::Y * HEAD_OFFSET,
        None => view.position + Vec3::Y * BASE_OFFSET,
    }
}

/// World point an object or zone label hangs from.
pub fn object_anchor(view: &EntityView) -> Vec3 {
    view.position + Vec3::Y * OBJECT_OFFSET
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlook_model::{EntityKind, Role};

    struct FixedCamera {
        out: Vec3,
    }

    impl Camera for FixedCamera {
        fn world_to_screen(&self, _point: Vec3) -> Vec3 {
            self.out
        }

        fn position(&self) -> Vec3 {
            Vec3::ZERO
        }

        fn forward(&self) -> Vec3 {
            Vec3::Z
        }

        fn screen_size(&self) -> Vec2 {
            Vec2::new(1920.0, 1080.0)
        }
    }

    fn view(head: Option<Vec3>) -> EntityView {
        EntityView {
            kind: EntityKind::Participant,
            position: Vec3::new(1.0, 0.0, 1.0),
            head,
            alive: true,
            name: "p".into(),
            stable_id: "p".into(),
            faction: None,
            role: Role::Standard,
            examined: false,
        }
    }

    #[test]
    fn test_on_screen_margin_boundary() {
        // 1920x1080 with a 50px margin
        assert!(!is_on_screen(Vec2::new(-60.0, 500.0), 1920.0, 1080.0, 50.0));
        assert!(is_on_screen(Vec2::new(-50.0, 500.0), 1920.0, 1080.0, 50.0));
        assert!(is_on_screen(Vec2::new(1970.0, 500.0), 1920.0, 1080.0, 50.0));
        assert!(!is_on_screen(Vec2::new(1970.01, 500.0), 1920.0, 1080.0, 50.0));
        assert!(is_on_screen(Vec2::new(500.0, -50.0), 1920.0, 1080.0, 50.0));
        assert!(is_on_screen(Vec2::new(500.0, 1130.0), 1920.0, 1080.0, 50.0));
        assert!(!is_on_screen(Vec2::new(500.0, 1130.5), 1920.0, 1080.0, 50.0));
    }

    #[test]
    fn test_on_screen_symmetry() {
        let (w, h, m) = (800.0, 600.0, 20.0);
        for x in [-30.0, -20.0, -10.0, 0.0, 400.0, 800.0, 810.0, 820.0, 830.0] {
            for y in [-21.0, -20.0, 0.0, 300.0, 620.0, 621.0] {
                let expected = (-m..=w + m).contains(&x) && (-m..=h + m).contains(&y);
                assert_eq!(is_on_screen(Vec2::new(x, y), w, h, m), expected, "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_nan_is_off_screen() {
        assert!(!is_on_screen(Vec2::new(f32::NAN, 10.0), 100.0, 100.0, 10.0));
    }

    #[test]
    fn test_project_flips_y() {
        let cam = FixedCamera {
            out: Vec3::new(100.0, 80.0, 12.0),
        };
        let p = project(Vec3::ZERO, &cam);
        assert_eq!(p.screen, Vec2::new(100.0, 1000.0));
        assert!(p.in_front);
    }

    #[test]
    fn test_project_behind_camera() {
        let cam = FixedCamera {
            out: Vec3::new(100.0, 80.0, -3.0),
        };
        assert!(!project(Vec3::ZERO, &cam).in_front);
        let on_plane = FixedCamera {
            out: Vec3::new(100.0, 80.0, 0.0),
        };
        assert!(!project(Vec3::ZERO, &on_plane).in_front);
    }

    #[test]
    fn test_anchor_prefers_head() {
        let with_head = view(Some(Vec3::new(1.0, 1.7, 1.0)));
        assert!((participant_anchor(&with_head).y - (1.7 + HEAD_OFFSET)).abs() < 1e-6);

        let without = view(None);
        assert!((participant_anchor(&without).y - BASE_OFFSET).abs() < 1e-6);
        assert!((object_anchor(&without).y - OBJECT_OFFSET).abs() < 1e-6);
    }
}
