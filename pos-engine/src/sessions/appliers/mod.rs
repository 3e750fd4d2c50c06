//! Event applier implementations.
//!
//! Each applier implements the `EventApplier` trait and handles one
//! specific event type. Appliers are PURE functions of (floor, event):
//! replicas replaying the same events converge on the engine's state.

use shared::session::{EventPayload, SessionEvent};

mod order_voided;
mod orders_added;
mod package_selected;
mod pax_changed;
mod session_closed;
mod table_merged;
mod table_merged_out;
mod table_opened;
mod table_transferred;
mod table_voided;

pub use order_voided::OrderVoidedApplier;
pub use orders_added::OrdersAddedApplier;
pub use package_selected::PackageSelectedApplier;
pub use pax_changed::PaxChangedApplier;
pub use session_closed::SessionClosedApplier;
pub use table_merged::TableMergedApplier;
pub use table_merged_out::TableMergedOutApplier;
pub use table_opened::TableOpenedApplier;
pub use table_transferred::TableTransferredApplier;
pub use table_voided::TableVoidedApplier;

use crate::sessions::traits::EventApplier;

/// EventAction enum - dispatches to concrete applier implementations.
pub enum EventAction {
    TableOpened(TableOpenedApplier),
    PackageSelected(PackageSelectedApplier),
    OrdersAdded(OrdersAddedApplier),
    OrderVoided(OrderVoidedApplier),
    PaxChanged(PaxChangedApplier),
    TableMerged(TableMergedApplier),
    TableMergedOut(TableMergedOutApplier),
    TableTransferred(TableTransferredApplier),
    TableVoided(TableVoidedApplier),
    SessionClosed(SessionClosedApplier),
}

impl EventApplier for EventAction {
    fn apply(&self, floor: &mut shared::session::FloorPlan, event: &SessionEvent) {
        match self {
            EventAction::TableOpened(a) => a.apply(floor, event),
            EventAction::PackageSelected(a) => a.apply(floor, event),
            EventAction::OrdersAdded(a) => a.apply(floor, event),
            EventAction::OrderVoided(a) => a.apply(floor, event),
            EventAction::PaxChanged(a) => a.apply(floor, event),
            EventAction::TableMerged(a) => a.apply(floor, event),
            EventAction::TableMergedOut(a) => a.apply(floor, event),
            EventAction::TableTransferred(a) => a.apply(floor, event),
            EventAction::TableVoided(a) => a.apply(floor, event),
            EventAction::SessionClosed(a) => a.apply(floor, event),
        }
    }
}

/// Convert a SessionEvent reference to its applier.
///
/// This is the ONLY place with a match on EventPayload.
impl From<&SessionEvent> for EventAction {
    fn from(event: &SessionEvent) -> Self {
        match &event.payload {
            EventPayload::TableOpened { .. } => EventAction::TableOpened(TableOpenedApplier),
            EventPayload::PackageSelected { .. } => {
                EventAction::PackageSelected(PackageSelectedApplier)
            }
            EventPayload::OrdersAdded { .. } => EventAction::OrdersAdded(OrdersAddedApplier),
            EventPayload::OrderVoided { .. } => EventAction::OrderVoided(OrderVoidedApplier),
            EventPayload::PaxChanged { .. } => EventAction::PaxChanged(PaxChangedApplier),
            EventPayload::TableMerged { .. } => EventAction::TableMerged(TableMergedApplier),
            EventPayload::TableMergedOut { .. } => {
                EventAction::TableMergedOut(TableMergedOutApplier)
            }
            EventPayload::TableTransferred { .. } => {
                EventAction::TableTransferred(TableTransferredApplier)
            }
            EventPayload::TableVoided { .. } => EventAction::TableVoided(TableVoidedApplier),
            EventPayload::SessionClosed { .. } => EventAction::SessionClosed(SessionClosedApplier),
        }
    }
}

/// Shared bookkeeping after a payload lands: bump the replay cursor and
/// refresh the drift checksum.
pub(crate) fn finish(floor: &mut shared::session::FloorPlan, event: &SessionEvent) {
    if event.sequence > floor.last_sequence {
        floor.last_sequence = event.sequence;
    }
    floor.update_checksum();
}
