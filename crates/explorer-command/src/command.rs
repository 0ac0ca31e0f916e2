//! The explorer-command capability interface and its one concrete command.

use std::sync::Arc;

use bitflags::bitflags;
use uuid::Uuid;

use crate::error::{CommandError, Result};
use crate::launch::Launcher;
use crate::selection::Selection;
use crate::store::CommandStore;
use crate::template::expand_command_line;

/// Enabled-state the host uses when rendering the menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandState {
    Enabled,
    Disabled,
    Hidden,
}

bitflags! {
    /// Display-behavior flags reported to the host. Bit values follow the
    /// shell's EXPCMDFLAGS word.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CommandFlags: u32 {
        const HAS_SUBCOMMANDS = 0x1;
        const HAS_SPLIT_BUTTON = 0x2;
        const HIDE_LABEL = 0x4;
        const IS_SEPARATOR = 0x8;
        const SEPARATOR_BEFORE = 0x20;
        const SEPARATOR_AFTER = 0x40;
    }
}

/// The capability interface a shell UI uses to render and execute a custom
/// context-menu action.
///
/// Every method is a stateless one-shot transaction; the host may call them
/// in any order, any number of times, from any thread. Defaults declare the
/// optional capabilities (tooltip, sub-commands) as not implemented.
pub trait ExplorerCommand: Send + Sync {
    /// Menu label for the current selection.
    fn title(&self, selection: &Selection) -> Result<String>;

    /// Icon resource path for the current selection.
    fn icon(&self, _selection: &Selection) -> Result<String> {
        Err(CommandError::NotImplemented)
    }

    fn tooltip(&self, _selection: &Selection) -> Result<String> {
        Err(CommandError::NotImplemented)
    }

    /// Stable identifier of this command; the nil id means the command has
    /// no canonical identity.
    fn canonical_name(&self) -> Result<Uuid> {
        Ok(Uuid::nil())
    }

    /// `ok_to_be_slow` is the host's hint that expensive checks are
    /// acceptable; commands with cheap state logic may ignore it.
    fn state(&self, _selection: &Selection, _ok_to_be_slow: bool) -> Result<CommandState> {
        Ok(CommandState::Enabled)
    }

    fn flags(&self) -> CommandFlags {
        CommandFlags::empty()
    }

    fn subcommands(&self) -> Result<Vec<Arc<dyn ExplorerCommand>>> {
        Err(CommandError::NotImplemented)
    }

    /// Executes the action against the selection.
    fn invoke(&self, selection: &Selection) -> Result<()>;
}

/// The context-menu command: title and icon come from the configuration
/// record, Invoke expands the record's command-line template with the
/// selection and launches the result detached.
///
/// Holds no mutable state; concurrent calls from multiple host references
/// are safe.
pub struct ContextMenuCommand {
    store: Arc<dyn CommandStore>,
    launcher: Arc<dyn Launcher>,
}

impl ContextMenuCommand {
    pub fn new(store: Arc<dyn CommandStore>, launcher: Arc<dyn Launcher>) -> Self {
        Self { store, launcher }
    }
}

impl ExplorerCommand for ContextMenuCommand {
    fn title(&self, _selection: &Selection) -> Result<String> {
        self.store.title()
    }

    fn icon(&self, _selection: &Selection) -> Result<String> {
        self.store.icon()
    }

    fn invoke(&self, selection: &Selection) -> Result<()> {
        if selection.is_empty() {
            // Contract: an empty selection is a silent no-op, not an error.
            tracing::debug!("invoke with empty selection, nothing to launch");
            return Ok(());
        }

        let template = self.store.command_template()?;
        let command_line = expand_command_line(&template, selection)?;
        tracing::debug!(
            items = selection.len(),
            command_line = %command_line,
            "launching context menu command"
        );
        self.launcher.spawn(&command_line)
    }
}
