//! Class factory handed out through `DllGetClassObject`.

use std::ffi::c_void;

use explorer_command::ComModule;
use uuid::Uuid;
use windows::core::{implement, Interface, IUnknown, Result, GUID};
use windows::Win32::Foundation::{BOOL, CLASS_E_NOAGGREGATION};
use windows::Win32::System::Com::{IClassFactory, IClassFactory_Impl};
use windows::Win32::UI::Shell::IExplorerCommand;

use crate::com::{com_error, ComExplorerCommand};

#[implement(IClassFactory)]
pub struct CommandClassFactory {
    clsid: Uuid,
}

impl CommandClassFactory {
    pub fn new(clsid: Uuid) -> Self {
        Self { clsid }
    }
}

impl IClassFactory_Impl for CommandClassFactory_Impl {
    fn CreateInstance(
        &self,
        outer: Option<&IUnknown>,
        riid: *const GUID,
        object: *mut *mut c_void,
    ) -> Result<()> {
        if outer.is_some() {
            return Err(CLASS_E_NOAGGREGATION.into());
        }
        let (inner, guard) = ComModule::global()
            .create_instance(&self.clsid)
            .map_err(com_error)?;
        let command: IExplorerCommand = ComExplorerCommand::new(inner, guard).into();
        unsafe { command.query(riid, object).ok() }
    }

    fn LockServer(&self, lock: BOOL) -> Result<()> {
        ComModule::global().lock_server(lock.as_bool());
        Ok(())
    }
}
