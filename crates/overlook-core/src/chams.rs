//! Visual Override Engine
//!
//! Replaces the material on renderer surfaces so their owners stay visible
//! through solid geometry. Every surface this engine writes is recorded in an
//! ownership map together with the material it had before; only those
//! surfaces are ever restored.
//!
//! A surface moves between two states:
//! - unowned to owned when its owner becomes eligible: the original material
//!   is saved, the override is written, occlusion culling is switched off
//! - owned to unowned when the owner stops being eligible, the feature is
//!   switched off, or a sweep finds the surface destroyed
//!
//! While owned, the render flags are re-asserted every pass because other
//! systems reset them.

use std::collections::HashSet;

use overlook_model::Rgba;

use crate::config::{ChamsConfig, ChamsMode};
use crate::error::HostResult;
use crate::fault::{FaultLog, Feature};
use crate::host::{DepthTest, FaceCull, MaterialId, OutlineSpec, OverrideMaterial, ShaderId, Surfaces};
use crate::ownership::OwnershipMap;
use crate::throttle::Throttle;

/// Render queue used by overridden surfaces, after all opaque geometry.
pub const OVERLAY_RENDER_QUEUE: i32 = 4000;

/// Shader used by the override material.
pub const OVERRIDE_SHADER: &str = "overlay/flat_through";

/// Which entities an override engine works on. Each category has its own
/// engine and map, so switching one off never touches the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverrideCategory {
    Participants,
    LooseItems,
}

impl OverrideCategory {
    pub fn feature(self) -> Feature {
        match self {
            OverrideCategory::Participants => Feature::Chams,
            OverrideCategory::LooseItems => Feature::LootChams,
        }
    }
}

/// State saved for one overridden surface.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedSurface<H, O> {
    pub owner: H,
    /// Material before the first override
    pub original: MaterialId,
    /// Color currently written
    pub color: Rgba,
    pub outline: Option<O>,
    pub outline_scale: f32,
}

pub struct OverrideEngine<S: Surfaces + ?Sized> {
    category: OverrideCategory,
    shader: Option<ShaderId>,
    owned: OwnershipMap<S::Surface, OwnedSurface<S::Handle, S::Outline>>,
    sweep: Throttle,
}

impl<S: Surfaces + ?Sized> OverrideEngine<S> {
    pub fn new(category: OverrideCategory, shader: Option<ShaderId>) -> Self {
        Self {
            category,
            shader,
            owned: OwnershipMap::new(),
            sweep: Throttle::new(),
        }
    }

    pub fn category(&self) -> OverrideCategory {
        self.category
    }

    pub fn owns(&self, surface: S::Surface) -> bool {
        self.owned.owns(surface)
    }

    pub fn owned(&self) -> &OwnershipMap<S::Surface, OwnedSurface<S::Handle, S::Outline>> {
        &self.owned
    }

    pub fn len(&self) -> usize {
        self.owned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owned.is_empty()
    }

    pub fn outline_count(&self) -> usize {
        self.owned
            .keys()
            .into_iter()
            .filter(|s| self.owned.get(*s).is_some_and(|e| e.outline.is_some()))
            .count()
    }

    /// Run one pass over the eligible owners and their base colors.
    ///
    /// Owned surfaces whose owner is not in `eligible` are restored.
    pub fn pass(
        &mut self,
        host: &mut S,
        now: f64,
        settings: &ChamsConfig,
        eligible: &[(S::Handle, Rgba)],
        faults: &mut FaultLog,
    ) {
        let feature = self.category.feature();
        if !settings.enabled {
            self.release_all(host, faults);
            return;
        }
        let Some(shader) = self.shader else {
            faults.note(feature, "shader_missing", OVERRIDE_SHADER);
            self.release_all(host, faults);
            return;
        };

        let mut seen = HashSet::new();
        for &(owner, base) in eligible {
            if !host.is_valid(owner) {
                continue;
            }
            let surfaces = match host.surfaces(owner) {
                Ok(surfaces) => surfaces,
                Err(err) => {
                    faults.report(feature, owner, &err);
                    continue;
                }
            };
            let color = settings.shade(base);
            for surface in surfaces {
                if !host.surface_valid(surface) {
                    continue;
                }
                seen.insert(surface);
                let result = if self.owned.owns(surface) {
                    self.maintain(host, surface, shader, color, settings)
                } else {
                    self.acquire(host, owner, surface, shader, color, settings)
                };
                if let Err(err) = result {
                    faults.report(feature, surface, &err);
                }
            }
        }

        // Negative eligibility. Destroyed surfaces are left for the sweep.
        for surface in self.owned.keys() {
            if !seen.contains(&surface) && host.surface_valid(surface) {
                self.release(host, surface, faults);
            }
        }

        if self.sweep.ready(now, settings.sweep_interval()) {
            self.sweep_destroyed(host);
        }
    }

    fn override_material(shader: ShaderId, color: Rgba) -> OverrideMaterial {
        OverrideMaterial {
            shader,
            color,
            depth_test: DepthTest::Always,
            depth_write: false,
            render_queue: OVERLAY_RENDER_QUEUE,
        }
    }

    fn acquire(
        &mut self,
        host: &mut S,
        owner: S::Handle,
        surface: S::Surface,
        shader: ShaderId,
        color: Rgba,
        settings: &ChamsConfig,
    ) -> HostResult<()> {
        let original = host.material(surface)?;
        host.apply_override(surface, &Self::override_material(shader, color))?;
        // Owned from here on, whatever happens to the remaining writes
        self.owned.claim(
            surface,
            OwnedSurface {
                owner,
                original,
                color,
                outline: None,
                outline_scale: settings.outline_scale(),
            },
        );
        host.set_forced_invisible(surface, false)?;
        host.set_occlusion_culling(surface, false)?;
        self.sync_outline(host, surface, shader, color, settings)
    }

    fn maintain(
        &mut self,
        host: &mut S,
        surface: S::Surface,
        shader: ShaderId,
        color: Rgba,
        settings: &ChamsConfig,
    ) -> HostResult<()> {
        host.set_forced_invisible(surface, false)?;
        host.set_occlusion_culling(surface, false)?;

        let current = self.owned.get(surface).map(|e| e.color);
        if current != Some(color) {
            host.apply_override(surface, &Self::override_material(shader, color))?;
            if let Some(entry) = self.owned.get_mut(surface) {
                entry.color = color;
            }
        }
        self.sync_outline(host, surface, shader, color, settings)
    }

    /// Bring the outline in line with the mode, scale and color.
    fn sync_outline(
        &mut self,
        host: &mut S,
        surface: S::Surface,
        shader: ShaderId,
        color: Rgba,
        settings: &ChamsConfig,
    ) -> HostResult<()> {
        let scale = settings.outline_scale();
        let Some(entry) = self.owned.get_mut(surface) else {
            return Ok(());
        };

        match (settings.mode, entry.outline) {
            (ChamsMode::Flat, Some(outline)) => {
                entry.outline = None;
                host.destroy_outline(outline);
            }
            (ChamsMode::Flat, None) => {}
            (ChamsMode::Outline, Some(outline)) if entry.outline_scale == scale => {
                host.recolor_outline(outline, color)?;
            }
            (ChamsMode::Outline, existing) => {
                if let Some(outline) = existing {
                    entry.outline = None;
                    host.destroy_outline(outline);
                }
                let spec = OutlineSpec {
                    shader,
                    color,
                    scale,
                    cull: FaceCull::Front,
                };
                entry.outline = Some(host.spawn_outline(surface, &spec)?);
                entry.outline_scale = scale;
            }
        }
        Ok(())
    }

    /// Restore one owned surface. Ownership is only dropped once the original
    /// material is back; a rejected restore keeps the entry for the next pass.
    /// Returns true when the entry was released.
    fn release(&mut self, host: &mut S, surface: S::Surface, faults: &mut FaultLog) -> bool {
        let Some(original) = self.owned.get(surface).map(|e| e.original) else {
            return false;
        };
        let feature = self.category.feature();
        if let Err(err) = host.restore_material(surface, original) {
            faults.report(feature, surface, &err);
            return false;
        }
        if let Some(outline) = self.owned.release(surface).and_then(|e| e.outline) {
            host.destroy_outline(outline);
        }
        if let Err(err) = host.set_occlusion_culling(surface, true) {
            faults.report(feature, surface, &err);
        }
        true
    }

    /// Drop entries whose surface no longer exists. A surviving surface of a
    /// destroyed owner is not eligible and was already restored this pass.
    fn sweep_destroyed(&mut self, host: &mut S) {
        let mut dropped = Vec::new();
        self.owned.retain(|surface, entry| {
            let alive = host.surface_valid(surface);
            if !alive {
                dropped.push(entry.outline);
            }
            alive
        });
        if dropped.is_empty() {
            return;
        }
        for outline in dropped.iter().flatten() {
            host.destroy_outline(*outline);
        }
        tracing::debug!(
            "Swept {} destroyed {:?} overrides",
            dropped.len(),
            self.category
        );
    }

    /// Restore every surface this engine still owns. Entries whose restore is
    /// rejected stay owned and are retried on the next call.
    pub fn release_all(&mut self, host: &mut S, faults: &mut FaultLog) {
        if self.owned.is_empty() {
            return;
        }
        let mut released = 0usize;
        for surface in self.owned.keys() {
            if host.surface_valid(surface) {
                if self.release(host, surface, faults) {
                    released += 1;
                }
            } else if let Some(entry) = self.owned.release(surface) {
                if let Some(outline) = entry.outline {
                    host.destroy_outline(outline);
                }
                released += 1;
            }
        }
        tracing::debug!(
            "Released {} {:?} overrides, {} still owned",
            released,
            self.category,
            self.owned.len()
        );
    }
}
