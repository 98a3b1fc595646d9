//! Target Discovery
//!
//! Builds the per-category label lists. Each category has its own refresh
//! throttle; between refreshes the previous list is served unchanged. A
//! category that is switched off drops its list immediately so stale labels
//! never outlive the setting.

pub mod loot;
pub mod participants;
pub mod quest;

use serde::{Deserialize, Serialize};

use overlook_model::TargetRecord;

use crate::config::OverlayConfig;
use crate::context::TickContext;
use crate::fault::FaultLog;
use crate::host::Physics;
use crate::sight::LineOfSight;
use crate::throttle::{Cached, Throttle};

/// Current label lists, one per category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetLists {
    pub participants: Vec<TargetRecord>,
    pub loose_items: Vec<TargetRecord>,
    pub containers: Vec<TargetRecord>,
    pub quest: Vec<TargetRecord>,
}

impl TargetLists {
    /// All records across categories.
    pub fn iter(&self) -> impl Iterator<Item = &TargetRecord> {
        self.participants
            .iter()
            .chain(self.loose_items.iter())
            .chain(self.containers.iter())
            .chain(self.quest.iter())
    }

    pub fn len(&self) -> usize {
        self.participants.len() + self.loose_items.len() + self.containers.len() + self.quest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Throttled scanners and their cached output.
#[derive(Debug)]
pub struct Discovery<H> {
    lists: TargetLists,
    participants: Throttle,
    loose_items: Throttle,
    containers: Throttle,
    quest: Throttle,
    /// Container handles, rebuilt on a coarser interval than their contents
    container_cache: Cached<H>,
}

impl<H> Default for Discovery<H> {
    fn default() -> Self {
        Self {
            lists: TargetLists::default(),
            participants: Throttle::new(),
            loose_items: Throttle::new(),
            containers: Throttle::new(),
            quest: Throttle::new(),
            container_cache: Cached::new(),
        }
    }
}

impl<H: Copy + Eq + std::hash::Hash + std::fmt::Debug> Discovery<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lists(&self) -> &TargetLists {
        &self.lists
    }

    /// Run every scanner whose interval has elapsed.
    pub fn pass<S>(
        &mut self,
        host: &S,
        ctx: &TickContext<'_, H>,
        config: &OverlayConfig,
        sight: &LineOfSight,
        faults: &mut FaultLog,
    ) where
        S: Physics<Handle = H> + ?Sized,
    {
        let now = ctx.now.seconds;

        if !config.participants.enabled {
            self.lists.participants.clear();
            self.participants.reset();
        } else if self
            .participants
            .ready(now, config.participants.refresh_interval())
        {
            self.lists.participants = participants::scan(host, ctx, config, sight, faults);
        }

        if !config.loose_items.enabled {
            self.lists.loose_items.clear();
            self.loose_items.reset();
        } else if self
            .loose_items
            .ready(now, config.loose_items.refresh_interval())
        {
            self.lists.loose_items = loot::scan_loose(host, ctx, config, faults);
        }

        if !config.containers.enabled {
            self.lists.containers.clear();
            self.containers.reset();
            self.container_cache.clear();
        } else if self
            .containers
            .ready(now, config.containers.refresh_interval())
        {
            let rebuilt = self.container_cache.refresh(
                now,
                config.containers.cache_interval(),
                || loot::find_containers(host),
            );
            if rebuilt {
                tracing::debug!(
                    "Cached {} containers",
                    self.container_cache.items().len()
                );
            }
            self.lists.containers =
                loot::scan_containers(host, ctx, config, self.container_cache.items(), faults);
        }

        if !config.quest.enabled {
            self.lists.quest.clear();
            self.quest.reset();
        } else if self.quest.ready(now, config.quest.refresh_interval()) {
            self.lists.quest = quest::scan(host, ctx, config, faults);
        }
    }

    /// Drop every list and schedule.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
