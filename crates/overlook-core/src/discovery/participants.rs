//! Participant scanner.

use overlook_model::{
    distance, EntityKind, Faction, ParticipantClass, ParticipantRecord, TargetRecord,
};

use crate::config::OverlayConfig;
use crate::context::TickContext;
use crate::fault::{FaultLog, Feature};
use crate::host::Physics;
use crate::projection::participant_anchor;
use crate::sight::LineOfSight;

pub fn scan<S>(
    host: &S,
    ctx: &TickContext<'_, S::Handle>,
    config: &OverlayConfig,
    sight: &LineOfSight,
    faults: &mut FaultLog,
) -> Vec<TargetRecord>
where
    S: Physics + ?Sized,
{
    let settings = &config.participants;
    let max_distance = settings.max_distance();
    let margin = config.screen.margin();
    let mut out = Vec::new();

    for handle in host.entities() {
        if ctx.is_viewer(handle) || !host.is_valid(handle) {
            continue;
        }
        let view = match host.describe(handle) {
            Ok(view) => view,
            Err(err) => {
                faults.report(Feature::Participants, handle, &err);
                continue;
            }
        };
        if view.kind != EntityKind::Participant || !view.alive {
            continue;
        }

        let dist = distance(ctx.origin, view.position);
        if dist > max_distance {
            continue;
        }

        let anchor = participant_anchor(&view);
        if settings.visible_only && !sight.is_visible(host, ctx.eye, handle, anchor) {
            continue;
        }
        let Some(screen) = ctx.on_screen(anchor, margin) else {
            continue;
        };

        let class = ParticipantClass::resolve(view.faction.unwrap_or(Faction::Unaligned), view.role);
        out.push(TargetRecord::Participant(ParticipantRecord {
            screen,
            distance: dist,
            name: view.name,
            class,
            color: config.colors.for_class(class),
        }));
    }

    out
}
