//! Overlay Engine
//!
//! Owns every per-tick component and drives them in a fixed order:
//! discovery, participant overrides, loot overrides, culling, tuning.
//! Host resources that cannot be resolved at construction (the line of
//! sight layers, the override shader) are resolved exactly once here.

use serde::Serialize;

use overlook_model::{distance, EntityKind, Faction, FrameTime, ParticipantClass, Rgba};

use crate::actions::{run_action, Action, ActionReport};
use crate::chams::{OverrideCategory, OverrideEngine, OVERRIDE_SHADER};
use crate::config::OverlayConfig;
use crate::context::TickContext;
use crate::culling::CullingEngine;
use crate::discovery::{Discovery, TargetLists};
use crate::fault::{FaultLog, Feature};
use crate::host::{Camera, Host};
use crate::sight::LineOfSight;
use crate::toggle::TuningOverrides;

/// Diagnostic counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    pub ticks: u64,
    pub participants: usize,
    pub loose_items: usize,
    pub containers: usize,
    pub quest: usize,
    pub chams_owned: usize,
    pub loot_chams_owned: usize,
    pub outlines: usize,
    pub culled: usize,
    pub forced: usize,
    pub faults: u64,
    pub faults_suppressed: u64,
}

pub struct OverlayEngine<H: Host> {
    sight: LineOfSight,
    shader_resolved: bool,
    discovery: Discovery<H::Handle>,
    chams: OverrideEngine<H>,
    loot_chams: OverrideEngine<H>,
    culling: CullingEngine<H::Handle>,
    tuning: TuningOverrides,
    faults: FaultLog,
    ticks: u64,
}

impl<H: Host> OverlayEngine<H> {
    pub fn new(host: &H) -> Self {
        let sight = LineOfSight::resolve(host);
        let shader = host.resolve_shader(OVERRIDE_SHADER);
        let mut faults = FaultLog::new();
        if shader.is_none() {
            faults.note(
                Feature::Chams,
                "shader_missing",
                format_args!("{} not found, visual override disabled", OVERRIDE_SHADER),
            );
        }
        tracing::info!(
            "Overlay engine ready (fallback mask: {}, shader: {})",
            sight.is_fallback(),
            shader.is_some()
        );

        Self {
            sight,
            shader_resolved: shader.is_some(),
            discovery: Discovery::new(),
            chams: OverrideEngine::new(OverrideCategory::Participants, shader),
            loot_chams: OverrideEngine::new(OverrideCategory::LooseItems, shader),
            culling: CullingEngine::new(),
            tuning: TuningOverrides::new(),
            faults,
            ticks: 0,
        }
    }

    /// Run one tick. The configuration is read fresh every call.
    pub fn tick(&mut self, host: &mut H, camera: &dyn Camera, config: &OverlayConfig, now: FrameTime) {
        let ctx = TickContext::capture(&*host, camera, now);

        self.discovery
            .pass(&*host, &ctx, config, &self.sight, &mut self.faults);

        let eligible = if config.chams.enabled {
            self.participant_candidates(host, &ctx, config)
        } else {
            Vec::new()
        };
        self.chams
            .pass(host, now.seconds, &config.chams, &eligible, &mut self.faults);

        let eligible = if config.loot_chams.enabled {
            self.loot_candidates(host, &ctx, config)
        } else {
            Vec::new()
        };
        self.loot_chams
            .pass(host, now.seconds, &config.loot_chams, &eligible, &mut self.faults);

        self.culling
            .pass(host, &ctx, &config.culling, &mut self.faults);
        self.tuning.pass(host, &config.tuning, &mut self.faults);

        self.ticks += 1;
    }

    fn participant_candidates(
        &mut self,
        host: &H,
        ctx: &TickContext<'_, H::Handle>,
        config: &OverlayConfig,
    ) -> Vec<(H::Handle, Rgba)> {
        let max_distance = config.chams.max_distance();
        let mut out = Vec::new();
        for handle in host.entities() {
            if ctx.is_viewer(handle) || !host.is_valid(handle) {
                continue;
            }
            let view = match host.describe(handle) {
                Ok(view) => view,
                Err(err) => {
                    self.faults.report(Feature::Chams, handle, &err);
                    continue;
                }
            };
            if view.kind != EntityKind::Participant
                || !view.alive
                || distance(ctx.origin, view.position) > max_distance
            {
                continue;
            }
            let class =
                ParticipantClass::resolve(view.faction.unwrap_or(Faction::Unaligned), view.role);
            out.push((handle, config.colors.for_class(class)));
        }
        out
    }

    fn loot_candidates(
        &mut self,
        host: &H,
        ctx: &TickContext<'_, H::Handle>,
        config: &OverlayConfig,
    ) -> Vec<(H::Handle, Rgba)> {
        let max_distance = config.loot_chams.max_distance();
        let mut out = Vec::new();
        for handle in host.entities() {
            if !host.is_valid(handle) {
                continue;
            }
            let view = match host.describe(handle) {
                Ok(view) => view,
                Err(err) => {
                    self.faults.report(Feature::LootChams, handle, &err);
                    continue;
                }
            };
            if view.kind == EntityKind::LooseItem
                && distance(ctx.origin, view.position) <= max_distance
            {
                out.push((handle, config.colors.loose_item));
            }
        }
        out
    }

    pub fn targets(&self) -> &TargetLists {
        self.discovery.lists()
    }

    pub fn run_action(&mut self, host: &mut H, action: &Action) -> ActionReport {
        run_action(host, action, &mut self.faults)
    }

    /// Restore everything the engine still owns. Call before the host shuts
    /// down or the engine is dropped.
    pub fn release_all(&mut self, host: &mut H) {
        self.chams.release_all(host, &mut self.faults);
        self.loot_chams.release_all(host, &mut self.faults);
        self.culling.release_all(host, &mut self.faults);
        self.tuning.release_all(host, &mut self.faults);
        self.discovery.clear();
        tracing::info!("Released all overrides after {} ticks", self.ticks);
    }

    pub fn stats(&self) -> EngineStats {
        let lists = self.discovery.lists();
        EngineStats {
            ticks: self.ticks,
            participants: lists.participants.len(),
            loose_items: lists.loose_items.len(),
            containers: lists.containers.len(),
            quest: lists.quest.len(),
            chams_owned: self.chams.len(),
            loot_chams_owned: self.loot_chams.len(),
            outlines: self.chams.outline_count() + self.loot_chams.outline_count(),
            culled: self.culling.len(),
            forced: self.tuning.forced_count(),
            faults: self.faults.total(),
            faults_suppressed: self.faults.suppressed(),
        }
    }

    pub fn faults(&self) -> &FaultLog {
        &self.faults
    }

    pub fn line_of_sight(&self) -> &LineOfSight {
        &self.sight
    }

    pub fn shader_resolved(&self) -> bool {
        self.shader_resolved
    }

    pub fn chams(&self) -> &OverrideEngine<H> {
        &self.chams
    }

    pub fn loot_chams(&self) -> &OverrideEngine<H> {
        &self.loot_chams
    }

    pub fn culling(&self) -> &CullingEngine<H::Handle> {
        &self.culling
    }

    pub fn tuning(&self) -> &TuningOverrides {
        &self.tuning
    }
}
