//! Sandbox Host
//!
//! An in-memory host built on a `bevy_ecs` world. It implements every host
//! trait so the engine can be driven headless, and exposes inspection and
//! fault-injection helpers for tests and the demo binary.

pub mod components;
pub mod setup;

use std::collections::HashMap;

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use overlook_model::{
    Aabb, EntityKind, Faction, ItemFixture, Objective, ParticipantFixture, Rgba, Vec3,
    WorldFixture,
};

use crate::chams::OVERRIDE_SHADER;
use crate::error::{HostError, HostResult};
use crate::host::{
    Activation, EntityView, Interact, ItemInfo, LayerMask, MaterialId, OutlineSpec,
    OverrideMaterial, Physics, RayHit, ShaderId, Snapshot, Surfaces, Tuning, TuningKey,
};

use components::*;

/// Seed used for identifiers generated while loading a fixture.
const FIXTURE_SEED: u64 = 0x5eed;

/// Host capabilities that can be withheld to exercise fallbacks.
#[derive(Debug, Clone)]
pub struct SandboxOptions {
    /// When false, named layers cannot be resolved
    pub layers_resolvable: bool,
    pub shaders: HashMap<String, ShaderId>,
}

impl Default for SandboxOptions {
    fn default() -> Self {
        let mut shaders = HashMap::new();
        shaders.insert("standard".to_string(), STANDARD_SHADER);
        shaders.insert(OVERRIDE_SHADER.to_string(), ShaderId(7));
        Self {
            layers_resolvable: true,
            shaders,
        }
    }
}

impl SandboxOptions {
    pub fn without_shaders(mut self) -> Self {
        self.shaders.clear();
        self
    }

    pub fn without_layers(mut self) -> Self {
        self.layers_resolvable = false;
        self
    }
}

/// Current render state of a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceState {
    pub material: MaterialId,
    pub base: MaterialId,
    pub props: Option<MaterialProps>,
    pub forced_invisible: bool,
    pub occlusion_culling: bool,
}

/// What one churn step changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChurnReport {
    pub despawned: usize,
    pub spawned: usize,
}

pub struct Sandbox {
    world: World,
    viewer: Option<Entity>,
    options: SandboxOptions,
    rng: SmallRng,
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Sandbox {
    pub fn new() -> Self {
        Self::with_options(SandboxOptions::default())
    }

    pub fn with_options(options: SandboxOptions) -> Self {
        let mut world = World::new();
        world.insert_resource(MaterialRegistry::default());
        world.insert_resource(TuningValues::default());
        world.insert_resource(Objectives::default());
        Self {
            world,
            viewer: None,
            options,
            rng: SmallRng::seed_from_u64(FIXTURE_SEED),
        }
    }

    pub fn from_fixture(fixture: &WorldFixture) -> Self {
        Self::from_fixture_with(fixture, SandboxOptions::default())
    }

    pub fn from_fixture_with(fixture: &WorldFixture, options: SandboxOptions) -> Self {
        let mut sandbox = Self::with_options(options);
        sandbox.load(fixture);
        sandbox
    }

    fn load(&mut self, fixture: &WorldFixture) {
        if let Some(viewer) = &fixture.viewer {
            let id = setup::spawn_participant(&mut self.world, &mut self.rng, viewer);
            self.viewer = Some(id);
        }
        for p in &fixture.participants {
            setup::spawn_participant(&mut self.world, &mut self.rng, p);
        }
        for item in &fixture.items {
            setup::spawn_item(&mut self.world, item);
        }
        for container in &fixture.containers {
            setup::spawn_container(&mut self.world, &mut self.rng, container);
        }
        for zone in &fixture.zones {
            setup::spawn_zone(&mut self.world, zone);
        }
        for door in &fixture.doors {
            setup::spawn_door(&mut self.world, door);
        }
        for (i, collider) in fixture.colliders.iter().enumerate() {
            setup::spawn_collider(&mut self.world, i, collider);
        }
        self.world
            .resource_mut::<Objectives>()
            .0
            .clone_from(&fixture.objectives);

        tracing::info!(
            "Loaded sandbox with {} entities, {} objectives",
            fixture.entity_count(),
            fixture.objectives.len()
        );
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn set_viewer(&mut self, viewer: Option<Entity>) {
        self.viewer = viewer;
    }

    pub fn set_objectives(&mut self, objectives: Vec<Objective>) {
        self.world.resource_mut::<Objectives>().0 = objectives;
    }

    pub fn spawn_participant(&mut self, fixture: &ParticipantFixture) -> Entity {
        setup::spawn_participant(&mut self.world, &mut self.rng, fixture)
    }

    pub fn spawn_item(&mut self, fixture: &ItemFixture) -> Entity {
        setup::spawn_item(&mut self.world, fixture)
    }

    /// First entity with this display name.
    pub fn find(&self, name: &str) -> Option<Entity> {
        self.entities()
            .into_iter()
            .find(|e| self.world.get::<Identity>(*e).is_some_and(|i| i.name == name))
    }

    pub fn position(&self, entity: Entity) -> Option<Vec3> {
        self.world.get::<Position>(entity).map(|p| p.0)
    }

    /// Move an entity and its head bone.
    pub fn move_entity(&mut self, entity: Entity, to: Vec3) {
        let Some(mut position) = self.world.get_mut::<Position>(entity) else {
            return;
        };
        let delta = to - position.0;
        position.0 = to;
        if let Some(mut head) = self.world.get_mut::<HeadBone>(entity) {
            head.0 += delta;
        }
    }

    /// Despawn an entity together with its surfaces.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        if let Some(list) = self.world.get::<SurfaceList>(entity).cloned() {
            for surface in list.0 {
                self.world.despawn(surface);
            }
        }
        self.world.despawn(entity)
    }

    pub fn surface_handles(&self, owner: Entity) -> Vec<Entity> {
        self.world
            .get::<SurfaceList>(owner)
            .map(|l| l.0.clone())
            .unwrap_or_default()
    }

    pub fn surface_state(&self, surface: Entity) -> Option<SurfaceState> {
        let s = self.world.get::<RenderSurface>(surface)?;
        Some(SurfaceState {
            material: s.material,
            base: s.base,
            props: self.world.resource::<MaterialRegistry>().get(s.material).copied(),
            forced_invisible: s.forced_invisible,
            occlusion_culling: s.occlusion_culling,
        })
    }

    fn render_surfaces(&self) -> impl Iterator<Item = &RenderSurface> {
        self.world
            .iter_entities()
            .filter_map(|e| e.get::<RenderSurface>())
    }

    /// Surfaces whose material differs from the one they spawned with.
    pub fn overridden_count(&self) -> usize {
        self.render_surfaces()
            .filter(|s| s.material != s.base)
            .count()
    }

    /// Surfaces with occlusion culling switched off.
    pub fn unculled_count(&self) -> usize {
        self.render_surfaces()
            .filter(|s| !s.occlusion_culling)
            .count()
    }

    pub fn outline_count(&self) -> usize {
        self.world
            .iter_entities()
            .filter(|e| e.contains::<OutlineShell>())
            .count()
    }

    pub fn outline_spec(&self, outline: Entity) -> Option<OutlineSpec> {
        self.world.get::<OutlineShell>(outline).map(|o| o.spec)
    }

    pub fn inactive_count(&self) -> usize {
        self.world
            .iter_entities()
            .filter(|e| e.get::<Active>().is_some_and(|a| !a.0))
            .count()
    }

    pub fn tuning_value(&self, key: TuningKey) -> f32 {
        self.world
            .resource::<TuningValues>()
            .values
            .get(&key)
            .copied()
            .unwrap_or_else(|| key.default_value())
    }

    /// Every tuning write made through the host trait.
    pub fn tuning_writes(&self) -> &[(TuningKey, f32)] {
        &self.world.resource::<TuningValues>().writes
    }

    /// Reset a tuning scalar the way the host itself would.
    pub fn reset_tuning_external(&mut self, key: TuningKey) {
        self.world
            .resource_mut::<TuningValues>()
            .values
            .insert(key, key.default_value());
    }

    /// Another system swaps the material on a surface.
    pub fn set_material_external(&mut self, surface: Entity, color: Rgba) -> Option<MaterialId> {
        let id = self
            .world
            .resource_mut::<MaterialRegistry>()
            .register(MaterialProps::standard(color));
        let mut s = self.world.get_mut::<RenderSurface>(surface)?;
        s.material = id;
        Some(id)
    }

    /// Another system resets the render flags on a surface.
    pub fn reset_render_flags_external(&mut self, surface: Entity) {
        if let Some(mut s) = self.world.get_mut::<RenderSurface>(surface) {
            s.forced_invisible = true;
            s.occlusion_culling = true;
        }
    }

    pub fn set_active_external(&mut self, entity: Entity, active: bool) {
        if let Some(mut a) = self.world.get_mut::<Active>(entity) {
            a.0 = active;
        }
    }

    /// Make material writes on a surface fail.
    pub fn reject_writes(&mut self, surface: Entity, reject: bool) {
        if let Some(mut s) = self.world.get_mut::<RenderSurface>(surface) {
            s.reject_writes = reject;
        }
    }

    /// Strip the position so every read of this entity faults.
    pub fn break_entity(&mut self, entity: Entity) {
        if let Some(mut e) = self.world.get_entity_mut(entity) {
            e.remove::<Position>();
        }
    }

    /// Attach a body collider on a named layer.
    pub fn attach_collider(&mut self, entity: Entity, half_extents: Vec3, layer: &str) {
        let layer = setup::layer_index(layer).unwrap_or(0);
        if let Some(mut e) = self.world.get_entity_mut(entity) {
            e.insert(Collider {
                half_extents,
                offset: Vec3::ZERO,
                layer,
            });
        }
    }

    /// Destroy a few random entities and spawn replacements, the way a live
    /// world loses and gains entities between ticks.
    pub fn churn(&mut self, rng: &mut SmallRng) -> ChurnReport {
        let candidates: Vec<Entity> = self
            .entities()
            .into_iter()
            .filter(|e| {
                Some(*e) != self.viewer
                    && matches!(
                        self.world.get::<Kind>(*e).map(|k| k.0),
                        Some(EntityKind::Participant | EntityKind::LooseItem)
                    )
            })
            .collect();

        let mut report = ChurnReport::default();
        if !candidates.is_empty() {
            let count = rng.gen_range(0..=candidates.len().min(3));
            for _ in 0..count {
                let victim = candidates[rng.gen_range(0..candidates.len())];
                if self.world.get_entity(victim).is_some() && self.despawn(victim) {
                    report.despawned += 1;
                }
            }
        }

        for _ in 0..report.despawned {
            let position = Vec3::new(
                rng.gen_range(-150.0..150.0),
                0.0,
                rng.gen_range(-50.0..450.0),
            );
            let serial: u32 = rng.gen();
            if rng.gen_bool(0.5) {
                let faction = match rng.gen_range(0..3) {
                    0 => Faction::Blue,
                    1 => Faction::Red,
                    _ => Faction::Unaligned,
                };
                let fixture = ParticipantFixture::new(format!("Drifter {}", serial % 1000), position, faction)
                    .with_head(position + Vec3::new(0.0, 1.7, 0.0));
                self.spawn_participant(&fixture);
            } else {
                let fixture = ItemFixture::new(format!("scrap_{}", serial % 50), "Scrap", position);
                self.spawn_item(&fixture);
            }
            report.spawned += 1;
        }
        report
    }

    fn describe_entity(&self, entity: Entity) -> HostResult<EntityView> {
        let e = self.world.get_entity(entity).ok_or(HostError::StaleHandle)?;
        let kind = e.get::<Kind>().ok_or(HostError::MissingComponent("kind"))?.0;
        let position = e
            .get::<Position>()
            .ok_or(HostError::MissingComponent("position"))?
            .0;
        let identity = e
            .get::<Identity>()
            .ok_or(HostError::MissingComponent("identity"))?;
        let allegiance = e.get::<Allegiance>();
        Ok(EntityView {
            kind,
            position,
            head: e.get::<HeadBone>().map(|h| h.0),
            alive: e.get::<Vitals>().map_or(true, |v| v.alive),
            name: identity.name.clone(),
            stable_id: identity.stable_id.clone(),
            faction: allegiance.map(|a| a.faction),
            role: allegiance.map(|a| a.role).unwrap_or_default(),
            examined: e.contains::<Examined>(),
        })
    }

    fn surface_mut(&mut self, surface: Entity) -> HostResult<Mut<'_, RenderSurface>> {
        self.world
            .get_mut::<RenderSurface>(surface)
            .ok_or(HostError::StaleHandle)
    }
}

impl Snapshot for Sandbox {
    type Handle = Entity;

    fn entities(&self) -> Vec<Entity> {
        let mut out: Vec<Entity> = self
            .world
            .iter_entities()
            .filter(|e| e.contains::<Kind>())
            .map(|e| e.id())
            .collect();
        out.sort();
        out
    }

    fn viewer(&self) -> Option<Entity> {
        self.viewer
    }

    fn is_valid(&self, handle: Entity) -> bool {
        self.world.get_entity(handle).is_some()
    }

    fn describe(&self, handle: Entity) -> HostResult<EntityView> {
        self.describe_entity(handle)
    }

    fn container_contents(&self, handle: Entity) -> HostResult<Vec<ItemInfo>> {
        let e = self.world.get_entity(handle).ok_or(HostError::StaleHandle)?;
        e.get::<Contents>()
            .map(|c| c.0.clone())
            .ok_or(HostError::MissingComponent("contents"))
    }

    fn viewer_objectives(&self) -> HostResult<Vec<Objective>> {
        Ok(self.world.resource::<Objectives>().0.clone())
    }
}

impl Physics for Sandbox {
    fn resolve_layer_mask(&self, layers: &[&str]) -> Option<LayerMask> {
        if !self.options.layers_resolvable {
            return None;
        }
        layers.iter().try_fold(LayerMask(0), |mask, name| {
            setup::layer_index(name).map(|i| LayerMask(mask.0 | (1 << i)))
        })
    }

    fn raycast(&self, from: Vec3, to: Vec3, mask: LayerMask) -> Option<RayHit<Entity>> {
        let mut best: Option<(f32, Option<Entity>)> = None;
        for e in self.world.iter_entities() {
            let (Some(collider), Some(position)) = (e.get::<Collider>(), e.get::<Position>()) else {
                continue;
            };
            if !mask.contains(collider.layer) {
                continue;
            }
            let bounds = Aabb::from_center(position.0 + collider.offset, collider.half_extents);
            let Some(t) = bounds.segment_hit(from, to) else {
                continue;
            };
            if best.map_or(true, |(b, _)| t < b) {
                let root = match e.get::<Kind>() {
                    Some(Kind(EntityKind::Obstacle)) | None => None,
                    Some(_) => Some(e.id()),
                };
                best = Some((t, root));
            }
        }
        best.map(|(t, root)| RayHit {
            point: from + (to - from) * t,
            root,
        })
    }
}

impl Surfaces for Sandbox {
    type Surface = Entity;
    type Outline = Entity;

    fn surfaces(&self, owner: Entity) -> HostResult<Vec<Entity>> {
        let e = self.world.get_entity(owner).ok_or(HostError::StaleHandle)?;
        e.get::<SurfaceList>()
            .map(|l| l.0.clone())
            .ok_or(HostError::MissingComponent("surfaces"))
    }

    fn surface_valid(&self, surface: Entity) -> bool {
        self.world.get::<RenderSurface>(surface).is_some()
    }

    fn resolve_shader(&self, name: &str) -> Option<ShaderId> {
        self.options.shaders.get(name).copied()
    }

    fn material(&self, surface: Entity) -> HostResult<MaterialId> {
        self.world
            .get::<RenderSurface>(surface)
            .map(|s| s.material)
            .ok_or(HostError::StaleHandle)
    }

    fn apply_override(&mut self, surface: Entity, material: &OverrideMaterial) -> HostResult<()> {
        if self.surface_mut(surface)?.reject_writes {
            return Err(HostError::Rejected("material slot locked".into()));
        }
        let id = self.world.resource_mut::<MaterialRegistry>().register(MaterialProps {
            shader: material.shader,
            color: material.color,
            depth_test: material.depth_test,
            depth_write: material.depth_write,
            render_queue: material.render_queue,
        });
        self.surface_mut(surface)?.material = id;
        Ok(())
    }

    fn restore_material(&mut self, surface: Entity, original: MaterialId) -> HostResult<()> {
        let mut s = self.surface_mut(surface)?;
        if s.reject_writes {
            return Err(HostError::Rejected("material slot locked".into()));
        }
        s.material = original;
        Ok(())
    }

    fn set_forced_invisible(&mut self, surface: Entity, invisible: bool) -> HostResult<()> {
        self.surface_mut(surface)?.forced_invisible = invisible;
        Ok(())
    }

    fn set_occlusion_culling(&mut self, surface: Entity, enabled: bool) -> HostResult<()> {
        self.surface_mut(surface)?.occlusion_culling = enabled;
        Ok(())
    }

    fn spawn_outline(&mut self, surface: Entity, spec: &OutlineSpec) -> HostResult<Entity> {
        if !self.surface_valid(surface) {
            return Err(HostError::StaleHandle);
        }
        Ok(self
            .world
            .spawn(OutlineShell {
                surface,
                spec: *spec,
            })
            .id())
    }

    fn recolor_outline(&mut self, outline: Entity, color: Rgba) -> HostResult<()> {
        let mut shell = self
            .world
            .get_mut::<OutlineShell>(outline)
            .ok_or(HostError::StaleHandle)?;
        shell.spec.color = color;
        Ok(())
    }

    fn destroy_outline(&mut self, outline: Entity) {
        if self.world.get::<OutlineShell>(outline).is_some() {
            self.world.despawn(outline);
        }
    }
}

impl Activation for Sandbox {
    fn is_active(&self, handle: Entity) -> HostResult<bool> {
        let e = self.world.get_entity(handle).ok_or(HostError::StaleHandle)?;
        e.get::<Active>()
            .map(|a| a.0)
            .ok_or(HostError::MissingComponent("active"))
    }

    fn set_active(&mut self, handle: Entity, active: bool) -> HostResult<()> {
        let mut a = self
            .world
            .get_mut::<Active>(handle)
            .ok_or(HostError::MissingComponent("active"))?;
        a.0 = active;
        Ok(())
    }
}

impl Tuning for Sandbox {
    fn write_tuning(&mut self, key: TuningKey, value: f32) -> HostResult<()> {
        let mut tuning = self.world.resource_mut::<TuningValues>();
        tuning.values.insert(key, value);
        tuning.writes.push((key, value));
        Ok(())
    }
}

impl Interact for Sandbox {
    fn lock_class(&self, handle: Entity) -> HostResult<Option<String>> {
        let e = self.world.get_entity(handle).ok_or(HostError::StaleHandle)?;
        Ok(e.get::<Lock>().map(|l| l.class.clone()))
    }

    fn is_locked(&self, handle: Entity) -> HostResult<bool> {
        let e = self.world.get_entity(handle).ok_or(HostError::StaleHandle)?;
        e.get::<Lock>()
            .map(|l| l.locked)
            .ok_or(HostError::MissingComponent("lock"))
    }

    fn set_locked(&mut self, handle: Entity, locked: bool) -> HostResult<()> {
        let mut lock = self
            .world
            .get_mut::<Lock>(handle)
            .ok_or(HostError::MissingComponent("lock"))?;
        lock.locked = locked;
        Ok(())
    }

    fn teleport(&mut self, handle: Entity, to: Vec3) -> HostResult<()> {
        if self.world.get::<Position>(handle).is_none() {
            return Err(HostError::MissingComponent("position"));
        }
        self.move_entity(handle, to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlook_model::{Faction, ParticipantFixture};

    fn one_participant() -> (Sandbox, Entity) {
        let mut sandbox = Sandbox::new();
        let e = sandbox.spawn_participant(
            &ParticipantFixture::new("Guard", Vec3::new(0.0, 0.0, 10.0), Faction::Red)
                .with_head(Vec3::new(0.0, 1.7, 10.0)),
        );
        (sandbox, e)
    }

    #[test]
    fn test_describe_participant() {
        let (sandbox, e) = one_participant();
        let view = sandbox.describe(e).unwrap();
        assert_eq!(view.kind, EntityKind::Participant);
        assert_eq!(view.name, "Guard");
        assert_eq!(view.faction, Some(Faction::Red));
        assert_eq!(view.stable_id.len(), 32);
        assert!(view.alive);
        assert_eq!(sandbox.surface_handles(e).len(), 1);
    }

    #[test]
    fn test_despawn_invalidates_handles() {
        let (mut sandbox, e) = one_participant();
        let surface = sandbox.surface_handles(e)[0];
        assert!(sandbox.despawn(e));
        assert!(!sandbox.is_valid(e));
        assert!(!sandbox.surface_valid(surface));
        assert_eq!(sandbox.describe(e), Err(HostError::StaleHandle));
        assert!(sandbox.entities().is_empty());
    }

    #[test]
    fn test_broken_entity_faults() {
        let (mut sandbox, e) = one_participant();
        sandbox.break_entity(e);
        assert!(sandbox.is_valid(e));
        assert_eq!(
            sandbox.describe(e),
            Err(HostError::MissingComponent("position"))
        );
    }

    #[test]
    fn test_override_and_restore_material() {
        let (mut sandbox, e) = one_participant();
        let surface = sandbox.surface_handles(e)[0];
        let original = sandbox.material(surface).unwrap();
        let material = OverrideMaterial {
            shader: ShaderId(7),
            color: Rgba::RED,
            depth_test: crate::host::DepthTest::Always,
            depth_write: false,
            render_queue: 4000,
        };
        sandbox.apply_override(surface, &material).unwrap();
        assert_ne!(sandbox.material(surface).unwrap(), original);
        assert_eq!(sandbox.overridden_count(), 1);

        sandbox.restore_material(surface, original).unwrap();
        assert_eq!(sandbox.material(surface).unwrap(), original);
        assert_eq!(sandbox.overridden_count(), 0);
    }

    #[test]
    fn test_layer_mask_resolution() {
        let sandbox = Sandbox::new();
        let mask = sandbox.resolve_layer_mask(&["static", "terrain"]).unwrap();
        assert_eq!(mask, LayerMask((1 << 11) | (1 << 12)));
        assert!(sandbox.resolve_layer_mask(&["static", "water"]).is_none());

        let blind = Sandbox::with_options(SandboxOptions::default().without_layers());
        assert!(blind.resolve_layer_mask(&["static"]).is_none());
    }

    #[test]
    fn test_churn_is_deterministic() {
        let world = WorldFixture {
            participants: (0..10)
                .map(|i| {
                    ParticipantFixture::new(
                        format!("P{}", i),
                        Vec3::new(i as f32, 0.0, 20.0),
                        Faction::Unaligned,
                    )
                })
                .collect(),
            ..WorldFixture::default()
        };
        let run = || {
            let mut sandbox = Sandbox::from_fixture(&world);
            let mut rng = SmallRng::seed_from_u64(9);
            let reports: Vec<ChurnReport> = (0..20).map(|_| sandbox.churn(&mut rng)).collect();
            (reports, sandbox.entities().len())
        };
        let (a, count_a) = run();
        let (b, count_b) = run();
        assert_eq!(a, b);
        assert_eq!(count_a, count_b);
        assert!(a.iter().all(|r| r.despawned == r.spawned));
        assert_eq!(count_a, 10);
    }
}
