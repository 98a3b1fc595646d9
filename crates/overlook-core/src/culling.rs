//! Distance Culling Engine
//!
//! Deactivates distant entities and tracks exactly which ones it switched
//! off. An entity that was already inactive when inspected belongs to some
//! other system and is never touched.

use overlook_model::{distance, EntityKind};

use crate::config::CullingConfig;
use crate::context::TickContext;
use crate::fault::{FaultLog, Feature};
use crate::host::Activation;
use crate::ownership::OwnershipMap;

/// Lower bound for the render distance. Entities this close to the viewer
/// are never deactivated, whatever the configuration says.
// TODO: make this configurable once a product decision on the keep-alive radius is made
pub const KEEP_ALIVE_MARGIN: f32 = 30.0;

/// Effective render distance for a configuration.
pub fn render_limit(config: &CullingConfig) -> f32 {
    if config.render_distance.is_nan() {
        KEEP_ALIVE_MARGIN
    } else {
        config.render_distance.max(KEEP_ALIVE_MARGIN)
    }
}

pub struct CullingEngine<H> {
    /// Entities this engine deactivated
    owned: OwnershipMap<H, ()>,
}

impl<H> Default for CullingEngine<H> {
    fn default() -> Self {
        Self {
            owned: OwnershipMap::default(),
        }
    }
}

impl<H: Copy + Ord + std::fmt::Debug> CullingEngine<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owns(&self, handle: H) -> bool {
        self.owned.owns(handle)
    }

    pub fn len(&self) -> usize {
        self.owned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owned.is_empty()
    }

    pub fn pass<A>(
        &mut self,
        host: &mut A,
        ctx: &TickContext<'_, H>,
        config: &CullingConfig,
        faults: &mut FaultLog,
    ) where
        A: Activation<Handle = H> + ?Sized,
    {
        // Stale handles are dropped without being dereferenced
        self.owned.retain(|h, _| host.is_valid(h));

        if !config.enabled {
            self.release_all(host, faults);
            return;
        }

        let limit = render_limit(config);
        for handle in host.entities() {
            if ctx.is_viewer(handle) || !host.is_valid(handle) {
                continue;
            }
            if let Err(err) = self.inspect(host, ctx, handle, limit) {
                faults.report(Feature::Culling, handle, &err);
            }
        }
    }

    fn inspect<A>(
        &mut self,
        host: &mut A,
        ctx: &TickContext<'_, H>,
        handle: H,
        limit: f32,
    ) -> crate::error::HostResult<()>
    where
        A: Activation<Handle = H> + ?Sized,
    {
        let view = host.describe(handle)?;
        // Zones and colliders are not rendered
        if matches!(view.kind, EntityKind::Zone | EntityKind::Obstacle) {
            return Ok(());
        }
        let active = host.is_active(handle)?;
        let far = distance(ctx.origin, view.position) > limit;
        let owned = self.owned.owns(handle);

        match (far, active, owned) {
            (true, true, _) => {
                host.set_active(handle, false)?;
                self.owned.claim(handle, ());
            }
            (false, false, true) => {
                host.set_active(handle, true)?;
                self.owned.release(handle);
            }
            // Someone else switched it back on
            (_, true, true) => {
                self.owned.release(handle);
            }
            _ => {}
        }
        Ok(())
    }

    /// Reactivate everything this engine deactivated. An entity whose
    /// reactivation fails stays owned and is retried on the next call.
    pub fn release_all<A>(&mut self, host: &mut A, faults: &mut FaultLog)
    where
        A: Activation<Handle = H> + ?Sized,
    {
        if self.owned.is_empty() {
            return;
        }
        let mut restored = 0usize;
        for handle in self.owned.keys() {
            if !host.is_valid(handle) {
                self.owned.release(handle);
                continue;
            }
            let result = match host.is_active(handle) {
                Ok(true) => Ok(()),
                Ok(false) => host.set_active(handle, true).map(|()| restored += 1),
                Err(err) => Err(err),
            };
            match result {
                Ok(()) => {
                    self.owned.release(handle);
                }
                Err(err) => {
                    faults.report(Feature::Culling, handle, &err);
                }
            }
        }
        tracing::debug!(
            "Reactivated {} culled entities, {} still owned",
            restored,
            self.owned.len()
        );
    }
}
