//! COM wrapper implementing `IExplorerCommand` over the core command trait.

use std::ffi::c_void;
use std::path::PathBuf;
use std::sync::Arc;

use explorer_command::{CommandError, CommandState, ExplorerCommand, InstanceGuard, Selection};
use windows::core::{implement, Error, Result, GUID, HSTRING, PWSTR};
use windows::Win32::Foundation::{
    BOOL, CLASS_E_CLASSNOTAVAILABLE, ERROR_FILE_NOT_FOUND, E_FAIL, E_INVALIDARG, E_NOTIMPL,
    HRESULT, WIN32_ERROR,
};
use windows::Win32::System::Com::IBindCtx;
use windows::Win32::UI::Shell::{
    IEnumExplorerCommand, IExplorerCommand, IExplorerCommand_Impl, IShellItemArray, SHStrDupW,
    ECS_DISABLED, ECS_ENABLED, ECS_HIDDEN, EXPCMDFLAGS, EXPCMDSTATE, SIGDN_FILESYSPATH,
};

/// Maps a core error to the HRESULT the host expects. OS-sourced errors keep
/// their verbatim Win32 status code.
pub(crate) fn error_code(error: &CommandError) -> HRESULT {
    match error {
        CommandError::NotImplemented => E_NOTIMPL,
        CommandError::InvalidArgument(_) | CommandError::MissingPlaceholder => E_INVALIDARG,
        CommandError::ClassNotAvailable(_) | CommandError::ActivatableClassNotAvailable(_) => {
            CLASS_E_CLASSNOTAVAILABLE
        }
        CommandError::KeyNotFound { .. } | CommandError::ValueNotFound { .. } => {
            ERROR_FILE_NOT_FOUND.to_hresult()
        }
        CommandError::Registry { .. } | CommandError::Launch(_) => match error.raw_os_error() {
            Some(code) => WIN32_ERROR(code as u32).to_hresult(),
            None => E_FAIL,
        },
    }
}

pub(crate) fn com_error(error: CommandError) -> Error {
    tracing::warn!(error = %error, "explorer command operation failed");
    error_code(&error).into()
}

/// In-proc COM object the shell talks to; every method delegates to the core
/// [`ExplorerCommand`] trait object. The instance guard keeps
/// `DllCanUnloadNow` honest while the shell holds references.
#[implement(IExplorerCommand)]
pub struct ComExplorerCommand {
    inner: Arc<dyn ExplorerCommand>,
    _guard: InstanceGuard,
}

impl ComExplorerCommand {
    pub fn new(inner: Arc<dyn ExplorerCommand>, guard: InstanceGuard) -> Self {
        Self {
            inner,
            _guard: guard,
        }
    }
}

fn duplicate_string(text: &str) -> Result<PWSTR> {
    unsafe { SHStrDupW(&HSTRING::from(text)) }
}

/// Converts the host's item array into the core selection type. Items come
/// back in host order; each display-name buffer is freed after conversion.
fn selection_from_items(items: Option<&IShellItemArray>) -> Result<Selection> {
    let Some(items) = items else {
        return Ok(Selection::empty());
    };
    let count = unsafe { items.GetCount()? };
    let mut paths = Vec::with_capacity(count as usize);
    for index in 0..count {
        let item = unsafe { items.GetItemAt(index)? };
        let name = unsafe { item.GetDisplayName(SIGDN_FILESYSPATH)? };
        let converted = unsafe { name.to_string() };
        unsafe {
            windows::Win32::System::Com::CoTaskMemFree(Some(name.0 as *const c_void));
        }
        let path = converted.map_err(|_| Error::from(E_INVALIDARG))?;
        paths.push(PathBuf::from(path));
    }
    Ok(Selection::new(paths))
}

impl IExplorerCommand_Impl for ComExplorerCommand_Impl {
    fn GetTitle(&self, _items: Option<&IShellItemArray>) -> Result<PWSTR> {
        let title = self
            .inner
            .title(&Selection::empty())
            .map_err(com_error)?;
        duplicate_string(&title)
    }

    fn GetIcon(&self, _items: Option<&IShellItemArray>) -> Result<PWSTR> {
        let icon = self.inner.icon(&Selection::empty()).map_err(com_error)?;
        duplicate_string(&icon)
    }

    fn GetToolTip(&self, _items: Option<&IShellItemArray>) -> Result<PWSTR> {
        match self.inner.tooltip(&Selection::empty()) {
            Ok(tooltip) => duplicate_string(&tooltip),
            Err(error) => Err(error_code(&error).into()),
        }
    }

    fn GetCanonicalName(&self) -> Result<GUID> {
        let name = self.inner.canonical_name().map_err(com_error)?;
        Ok(GUID::from_u128(name.as_u128()))
    }

    fn GetState(
        &self,
        _items: Option<&IShellItemArray>,
        ok_to_be_slow: BOOL,
    ) -> Result<EXPCMDSTATE> {
        let state = self
            .inner
            .state(&Selection::empty(), ok_to_be_slow.as_bool())
            .map_err(com_error)?;
        Ok(match state {
            CommandState::Enabled => ECS_ENABLED,
            CommandState::Disabled => ECS_DISABLED,
            CommandState::Hidden => ECS_HIDDEN,
        })
    }

    fn Invoke(&self, items: Option<&IShellItemArray>, _bind_ctx: Option<&IBindCtx>) -> Result<()> {
        let selection = selection_from_items(items)?;
        self.inner.invoke(&selection).map_err(com_error)
    }

    fn GetFlags(&self) -> Result<EXPCMDFLAGS> {
        Ok(EXPCMDFLAGS(self.inner.flags().bits()))
    }

    fn EnumSubCommands(&self) -> Result<IEnumExplorerCommand> {
        match self.inner.subcommands() {
            // The core command never reports sub-commands; surfacing them
            // through IEnumExplorerCommand is not needed.
            Ok(_) => Err(E_NOTIMPL.into()),
            Err(error) => Err(error_code(&error).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use explorer_command::CommandError;
    use uuid::Uuid;
    use windows::core::GUID;
    use windows::Win32::Foundation::{ERROR_ACCESS_DENIED, E_INVALIDARG, E_NOTIMPL};

    use super::error_code;
    use crate::{command_clsid, COMMAND_CLSID};

    #[test]
    fn nil_uuid_maps_to_the_null_guid() {
        assert_eq!(GUID::from_u128(Uuid::nil().as_u128()), GUID::zeroed());
    }

    #[test]
    fn clsid_round_trips_through_guid() {
        let guid = GUID::from_u128(command_clsid().as_u128());
        assert_eq!(guid.to_u128(), COMMAND_CLSID);
        assert_eq!(Uuid::from_u128(guid.to_u128()), command_clsid());
    }

    #[test]
    fn error_codes_match_the_host_contract() {
        assert_eq!(error_code(&CommandError::NotImplemented), E_NOTIMPL);
        assert_eq!(error_code(&CommandError::MissingPlaceholder), E_INVALIDARG);
        let denied = CommandError::Registry {
            key: "*\\shell\\ContextMenuCommand".to_string(),
            source: std::io::Error::from_raw_os_error(ERROR_ACCESS_DENIED.0 as i32),
        };
        assert_eq!(error_code(&denied), ERROR_ACCESS_DENIED.to_hresult());
    }
}
