//! One-shot Actions
//!
//! Plain data commands sent by hotkey or menu glue. Unlike the per-tick
//! engines, actions keep no state and restore nothing.

use serde::{Deserialize, Serialize};

use overlook_model::{EntityKind, Vec3};

use crate::error::HostResult;
use crate::fault::{FaultLog, Feature};
use crate::host::Interact;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelocateCategory {
    LooseItems,
    /// Every participant except the viewer
    Participants,
}

impl RelocateCategory {
    fn matches(self, kind: EntityKind) -> bool {
        match self {
            RelocateCategory::LooseItems => kind == EntityKind::LooseItem,
            RelocateCategory::Participants => kind == EntityKind::Participant,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Unlock every locked object with this lock class (case-insensitive)
    Unlock { class: String },
    /// Move every live entity of a category to a point
    Relocate { category: RelocateCategory, to: Vec3 },
}

/// Outcome of an action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionReport {
    pub affected: usize,
    /// Entities that matched but faulted
    pub skipped: usize,
}

pub fn run_action<I>(host: &mut I, action: &Action, faults: &mut FaultLog) -> ActionReport
where
    I: Interact + ?Sized,
{
    let viewer = host.viewer();
    let mut report = ActionReport::default();

    for handle in host.entities() {
        if !host.is_valid(handle) || Some(handle) == viewer {
            continue;
        }
        let outcome = match action {
            Action::Unlock { class } => unlock(host, handle, class),
            Action::Relocate { category, to } => relocate(host, handle, *category, *to),
        };
        match outcome {
            Ok(true) => report.affected += 1,
            Ok(false) => {}
            Err(err) => {
                report.skipped += 1;
                faults.report(Feature::Actions, handle, &err);
            }
        }
    }

    tracing::info!(
        "Action {:?}: {} affected, {} skipped",
        action,
        report.affected,
        report.skipped
    );
    report
}

fn unlock<I: Interact + ?Sized>(host: &mut I, handle: I::Handle, class: &str) -> HostResult<bool> {
    let matches = host
        .lock_class(handle)?
        .is_some_and(|lock| lock.eq_ignore_ascii_case(class));
    if !matches || !host.is_locked(handle)? {
        return Ok(false);
    }
    host.set_locked(handle, false)?;
    Ok(true)
}

fn relocate<I: Interact + ?Sized>(
    host: &mut I,
    handle: I::Handle,
    category: RelocateCategory,
    to: Vec3,
) -> HostResult<bool> {
    let view = host.describe(handle)?;
    if !category.matches(view.kind) || !view.alive {
        return Ok(false);
    }
    host.teleport(handle, to)?;
    Ok(true)
}
