//! Command action implementations.
//!
//! Each action implements the `CommandHandler` trait and handles one
//! specific command type.

use shared::session::{CommandPayload, SessionCommand, SessionEvent};

use crate::sessions::traits::{CommandContext, CommandHandler, CommandMetadata, SessionError};

mod add_meat;
mod add_paid_item;
mod add_side;
mod change_pax;
mod close_session;
mod merge_table;
mod open_table;
mod select_package;
mod transfer_table;
mod void_order;
mod void_table;

pub use add_meat::AddMeatAction;
pub use add_paid_item::AddPaidItemAction;
pub use add_side::AddSideAction;
pub use change_pax::ChangePaxAction;
pub use close_session::CloseSessionAction;
pub use merge_table::MergeTableAction;
pub use open_table::OpenTableAction;
pub use select_package::SelectPackageAction;
pub use transfer_table::TransferTableAction;
pub use void_order::VoidOrderAction;
pub use void_table::VoidTableAction;

/// CommandAction enum - dispatches to concrete action implementations.
pub enum CommandAction {
    OpenTable(OpenTableAction),
    SelectPackage(SelectPackageAction),
    AddMeat(AddMeatAction),
    AddSide(AddSideAction),
    AddPaidItem(AddPaidItemAction),
    VoidOrder(VoidOrderAction),
    ChangePax(ChangePaxAction),
    MergeTable(MergeTableAction),
    TransferTable(TransferTableAction),
    VoidTable(VoidTableAction),
    CloseSession(CloseSessionAction),
}

impl CommandHandler for CommandAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<SessionEvent>, SessionError> {
        match self {
            CommandAction::OpenTable(action) => action.execute(ctx, metadata),
            CommandAction::SelectPackage(action) => action.execute(ctx, metadata),
            CommandAction::AddMeat(action) => action.execute(ctx, metadata),
            CommandAction::AddSide(action) => action.execute(ctx, metadata),
            CommandAction::AddPaidItem(action) => action.execute(ctx, metadata),
            CommandAction::VoidOrder(action) => action.execute(ctx, metadata),
            CommandAction::ChangePax(action) => action.execute(ctx, metadata),
            CommandAction::MergeTable(action) => action.execute(ctx, metadata),
            CommandAction::TransferTable(action) => action.execute(ctx, metadata),
            CommandAction::VoidTable(action) => action.execute(ctx, metadata),
            CommandAction::CloseSession(action) => action.execute(ctx, metadata),
        }
    }
}

/// Convert a command into its action.
///
/// This is the ONLY place with a match on CommandPayload.
impl From<&SessionCommand> for CommandAction {
    fn from(cmd: &SessionCommand) -> Self {
        match &cmd.payload {
            CommandPayload::OpenTable { table_id, persons } => {
                CommandAction::OpenTable(OpenTableAction {
                    table_id: table_id.clone(),
                    persons: *persons,
                })
            }
            CommandPayload::SelectPackage {
                table_id,
                package_id,
            } => CommandAction::SelectPackage(SelectPackageAction {
                table_id: table_id.clone(),
                package_id: package_id.clone(),
            }),
            CommandPayload::AddMeat {
                table_id,
                meat_id,
                grams,
            } => CommandAction::AddMeat(AddMeatAction {
                table_id: table_id.clone(),
                meat_id: meat_id.clone(),
                grams: *grams,
            }),
            CommandPayload::AddSide {
                table_id,
                item_id,
                name,
                quantity,
                unit_price,
            } => CommandAction::AddSide(AddSideAction {
                table_id: table_id.clone(),
                item_id: item_id.clone(),
                name: name.clone(),
                quantity: *quantity,
                unit_price: *unit_price,
            }),
            CommandPayload::AddPaidItem {
                table_id,
                item_id,
                name,
                kind,
                quantity,
                unit_price,
            } => CommandAction::AddPaidItem(AddPaidItemAction {
                table_id: table_id.clone(),
                item_id: item_id.clone(),
                name: name.clone(),
                kind: *kind,
                quantity: *quantity,
                unit_price: *unit_price,
            }),
            CommandPayload::VoidOrder {
                table_id,
                line_id,
                reason,
            } => CommandAction::VoidOrder(VoidOrderAction {
                table_id: table_id.clone(),
                line_id: line_id.clone(),
                reason: reason.clone(),
            }),
            CommandPayload::ChangePax { table_id, persons } => {
                CommandAction::ChangePax(ChangePaxAction {
                    table_id: table_id.clone(),
                    persons: *persons,
                })
            }
            CommandPayload::MergeTable {
                source_table_id,
                target_table_id,
            } => CommandAction::MergeTable(MergeTableAction {
                source_table_id: source_table_id.clone(),
                target_table_id: target_table_id.clone(),
            }),
            CommandPayload::TransferTable {
                source_table_id,
                target_table_id,
            } => CommandAction::TransferTable(TransferTableAction {
                source_table_id: source_table_id.clone(),
                target_table_id: target_table_id.clone(),
            }),
            CommandPayload::VoidTable { table_id, reason } => {
                CommandAction::VoidTable(VoidTableAction {
                    table_id: table_id.clone(),
                    reason: reason.clone(),
                })
            }
            CommandPayload::CloseSession {
                table_id,
                method,
                discount_pct,
                leftover_penalty,
            } => CommandAction::CloseSession(CloseSessionAction {
                table_id: table_id.clone(),
                method: *method,
                discount_pct: *discount_pct,
                leftover_penalty: *leftover_penalty,
            }),
        }
    }
}
