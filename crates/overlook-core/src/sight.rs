//! Line of Sight
//!
//! Visibility checks against static geometry. The layer mask is resolved
//! once when the engine starts; if the host does not know the layer names a
//! fixed fallback mask is used for the rest of the session.

use overlook_model::{offset_toward, Vec3};

use crate::host::{LayerMask, Physics};

/// Layers that block line of sight.
pub const STATIC_LAYERS: [&str; 2] = ["static", "terrain"];

/// Mask used when the named layers cannot be resolved (layers 0, 11 and 12).
pub const FALLBACK_MASK: LayerMask = LayerMask((1 << 0) | (1 << 11) | (1 << 12));

/// Distance the ray origin is moved toward the target, so the ray does not
/// start inside the viewer's own geometry.
pub const ORIGIN_STEP: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineOfSight {
    mask: LayerMask,
    fallback: bool,
}

impl LineOfSight {
    pub fn resolve<P: Physics + ?Sized>(host: &P) -> Self {
        match host.resolve_layer_mask(&STATIC_LAYERS) {
            Some(mask) => {
                tracing::debug!("Resolved line of sight mask {:#x}", mask.0);
                Self {
                    mask,
                    fallback: false,
                }
            }
            None => {
                tracing::warn!(
                    "Could not resolve layers {:?}, using fallback mask {:#x}",
                    STATIC_LAYERS,
                    FALLBACK_MASK.0
                );
                Self {
                    mask: FALLBACK_MASK,
                    fallback: true,
                }
            }
        }
    }

    pub fn mask(&self) -> LayerMask {
        self.mask
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    /// True when nothing blocks the segment from `eye` to `point`, or the
    /// first thing hit belongs to `target` itself.
    pub fn is_visible<P: Physics + ?Sized>(
        &self,
        host: &P,
        eye: Vec3,
        target: P::Handle,
        point: Vec3,
    ) -> bool {
        let from = offset_toward(eye, point, ORIGIN_STEP);
        match host.raycast(from, point, self.mask) {
            None => true,
            Some(hit) => hit.root == Some(target),
        }
    }
}
