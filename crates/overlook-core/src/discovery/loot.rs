//! Loose item and container scanners.

use overlook_model::{distance, EntityKind, ObjectCategory, ObjectRecord, TargetRecord};

use crate::config::OverlayConfig;
use crate::context::TickContext;
use crate::fault::{FaultLog, Feature};
use crate::filter::NameFilter;
use crate::host::Snapshot;
use crate::projection::object_anchor;

pub fn scan_loose<S>(
    host: &S,
    ctx: &TickContext<'_, S::Handle>,
    config: &OverlayConfig,
    faults: &mut FaultLog,
) -> Vec<TargetRecord>
where
    S: Snapshot + ?Sized,
{
    let settings = &config.loose_items;
    let filter = NameFilter::parse(&settings.filter);
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
                faults.report(Feature::LooseItems, handle, &err);
                continue;
            }
        };
        if view.kind != EntityKind::LooseItem {
            continue;
        }
        let dist = distance(ctx.origin, view.position);
        if dist > max_distance || !filter.matches(&view.name, &view.stable_id) {
            continue;
        }
        if settings.known_only && !view.examined {
            continue;
        }
        let Some(screen) = ctx.on_screen(object_anchor(&view), margin) else {
            continue;
        };

        out.push(TargetRecord::Object(ObjectRecord {
            screen,
            distance: dist,
            category: ObjectCategory::LooseItem,
            name: view.name,
            detail: None,
            color: config.colors.loose_item,
        }));
    }

    out
}

/// Every container currently in the world.
pub fn find_containers<S>(host: &S) -> Vec<S::Handle>
where
    S: Snapshot + ?Sized,
{
    host.entities()
        .into_iter()
        .filter(|h| {
            host.is_valid(*h)
                && host
                    .describe(*h)
                    .map(|v| v.kind == EntityKind::Container)
                    .unwrap_or(false)
        })
        .collect()
}

pub fn scan_containers<S>(
    host: &S,
    ctx: &TickContext<'_, S::Handle>,
    config: &OverlayConfig,
    containers: &[S::Handle],
    faults: &mut FaultLog,
) -> Vec<TargetRecord>
where
    S: Snapshot + ?Sized,
{
    let settings = &config.containers;
    let filter = NameFilter::parse(&settings.filter);
    let max_distance = settings.max_distance();
    let margin = config.screen.margin();
    let mut out = Vec::new();

    for &handle in containers {
        // Cached handles may have been destroyed since the cache was built
        if !host.is_valid(handle) {
            continue;
        }
        let view = match host.describe(handle) {
            Ok(view) => view,
            Err(err) => {
                faults.report(Feature::Containers, handle, &err);
                continue;
            }
        };
        let dist = distance(ctx.origin, view.position);
        if dist > max_distance {
            continue;
        }
        let contents = match host.container_contents(handle) {
            Ok(contents) => contents,
            Err(err) => {
                faults.report(Feature::Containers, handle, &err);
                continue;
            }
        };
        let names: Vec<&str> = contents
            .iter()
            .filter(|item| filter.matches(&item.name, &item.item_id))
            .map(|item| item.name.as_str())
            .collect();
        if names.is_empty() {
            continue;
        }
        let Some(screen) = ctx.on_screen(object_anchor(&view), margin) else {
            continue;
        };

        out.push(TargetRecord::Object(ObjectRecord {
            screen,
            distance: dist,
            category: ObjectCategory::Container,
            name: view.name,
            detail: Some(summarize(&names, settings.max_listed)),
            color: config.colors.container,
        }));
    }

    out
}

/// First `max_listed` names joined by commas, then `+N` for the rest.
pub fn summarize(names: &[&str], max_listed: usize) -> String {
    let listed = names.iter().take(max_listed).copied().collect::<Vec<_>>().join(", ");
    let extra = names.len().saturating_sub(max_listed);
    match (listed.is_empty(), extra) {
        (_, 0) => listed,
        (true, n) => format!("+{}", n),
        (false, n) => format!("{} +{}", listed, n),
    }
}
