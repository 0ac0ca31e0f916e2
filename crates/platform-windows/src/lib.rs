//! Windows adapter for the explorer context-menu command.
//!
//! Built as an in-process COM server (`cdylib`): the shell activates
//! [`com::ComExplorerCommand`] through `DllGetClassObject`, queries it for
//! title, icon, and state, and calls `Invoke` when the user picks the menu
//! entry. Configuration comes from the registry record at
//! [`REGISTRY_LOCATION`] under `HKEY_CLASSES_ROOT`; invocation goes through
//! `CreateProcessW`. Everything OS-facing is `cfg(windows)`; on other
//! targets the crate only carries the build-time identity constants.

#[cfg(windows)]
mod com;
#[cfg(windows)]
mod exports;
#[cfg(windows)]
mod factory;
#[cfg(windows)]
mod launcher;
#[cfg(windows)]
mod registry;

#[cfg(windows)]
pub use com::ComExplorerCommand;
#[cfg(windows)]
pub use factory::CommandClassFactory;
#[cfg(windows)]
pub use launcher::ProcessLauncher;
#[cfg(windows)]
pub use registry::RegistryStore;

use uuid::Uuid;

/// Class identifier of the command object, fixed at build time. Matches the
/// CLSID the external installer writes when registering the handler.
pub const COMMAND_CLSID: u128 = 0x8a3c1f6e_5dba_4d41_9c2b_7f12e4a90d63;

/// Registry record describing the menu entry, relative to
/// `HKEY_CLASSES_ROOT`. Overridable at build time so one binary recipe can
/// serve differently-branded installs.
pub const REGISTRY_LOCATION: &str = match option_env!("CONTEXT_MENU_REGISTRY_LOCATION") {
    Some(location) => location,
    None => "*\\shell\\ContextMenuCommand",
};

/// The command CLSID as a [`Uuid`].
pub fn command_clsid() -> Uuid {
    Uuid::from_u128(COMMAND_CLSID)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clsid_is_stable_and_non_nil() {
        assert!(!command_clsid().is_nil());
        assert_eq!(command_clsid().as_u128(), COMMAND_CLSID);
    }

    #[test]
    fn registry_location_is_a_relative_classes_path() {
        assert!(!REGISTRY_LOCATION.is_empty());
        assert!(!REGISTRY_LOCATION.starts_with('\\'));
    }
}
