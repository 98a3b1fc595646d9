//! Quest item and zone scanner.
//!
//! A target qualifies when its stable identifier is referenced by one of the
//! viewer's active or completable objectives.

use std::collections::HashMap;

use overlook_model::{
    distance, interesting_items, interesting_zones, EntityKind, QuestRecord, TargetRecord,
};

use crate::config::OverlayConfig;
use crate::context::TickContext;
use crate::fault::{FaultLog, Feature};
use crate::host::Snapshot;
use crate::projection::object_anchor;

pub fn scan<S>(
    host: &S,
    ctx: &TickContext<'_, S::Handle>,
    config: &OverlayConfig,
    faults: &mut FaultLog,
) -> Vec<TargetRecord>
where
    S: Snapshot + ?Sized,
{
    let settings = &config.quest;
    let objectives = match host.viewer_objectives() {
        Ok(objectives) => objectives,
        Err(err) => {
            faults.report(Feature::Quest, "objectives", &err);
            return Vec::new();
        }
    };

    let items: HashMap<String, String> = if settings.show_items {
        interesting_items(&objectives).into_iter().collect()
    } else {
        HashMap::new()
    };
    let zones: HashMap<String, String> = if settings.show_zones {
        interesting_zones(&objectives).into_iter().collect()
    } else {
        HashMap::new()
    };
    if items.is_empty() && zones.is_empty() {
        return Vec::new();
    }

    let max_distance = settings.max_distance();
    let margin = config.screen.margin();
    let mut out = Vec::new();

    for handle in host.entities() {
        if !host.is_valid(handle) {
            continue;
        }
        let view = match host.describe(handle) {
            Ok(view) => view,
            Err(err) => {
                faults.report(Feature::Quest, handle, &err);
                continue;
            }
        };
        let (objective, is_zone, color) = match view.kind {
            EntityKind::LooseItem => match items.get(&view.stable_id) {
                Some(name) => (name, false, config.colors.quest_item),
                None => continue,
            },
            EntityKind::Zone => match zones.get(&view.stable_id) {
                Some(name) => (name, true, config.colors.quest_zone),
                None => continue,
            },
            _ => continue,
        };

        let dist = distance(ctx.origin, view.position);
        if dist > max_distance {
            continue;
        }
        let Some(screen) = ctx.on_screen(object_anchor(&view), margin) else {
            continue;
        };

        out.push(TargetRecord::Quest(QuestRecord {
            screen,
            distance: dist,
            name: view.name,
            objective: objective.clone(),
            is_zone,
            color,
        }));
    }

    out
}
