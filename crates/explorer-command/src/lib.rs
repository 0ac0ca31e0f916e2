//! Explorer context-menu command shim, portable core.
//!
//! A shell UI renders a custom context-menu entry from a registry record
//! (title, icon, command-line template) and invokes it against the current
//! file selection. This crate holds everything that does not need the OS:
//! the capability interface, the concrete command, template expansion, the
//! configuration-store and launcher seams, and the module activation table.
//! The Windows registry/COM/process glue lives in `platform-windows`.

mod command;
mod error;
mod launch;
mod module;
mod selection;
mod store;
mod template;

pub use command::{CommandFlags, CommandState, ContextMenuCommand, ExplorerCommand};
pub use error::{CommandError, Result};
pub use launch::{split_command_line, DetachedLauncher, Launcher};
pub use module::{ComModule, InstanceGuard};
pub use selection::Selection;
pub use store::{CommandStore, MemoryStore, COMMAND_SUBKEY, ICON_VALUE};
pub use template::{expand_command_line, PLACEHOLDER};
