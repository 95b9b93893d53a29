//! CLI command handlers for the t2sc application.

mod list;
mod sync;

pub(crate) use list::handle_list_command;
pub(crate) use sync::handle_sync_command;
