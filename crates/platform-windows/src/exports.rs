//! In-proc server entry points.
//!
//! The host resolves the class object through `DllGetClassObject`, polls
//! `DllCanUnloadNow` before unloading, and may probe
//! `DllGetActivationFactory` for WinRT activation (which this classic-COM
//! module never satisfies). Class registration into the module table happens
//! explicitly on first use, not in static initializers.

use std::ffi::c_void;
use std::mem::ManuallyDrop;
use std::sync::{Arc, Once};

use explorer_command::{ComModule, ContextMenuCommand};
use uuid::Uuid;
use windows::core::{Interface, GUID, HSTRING};
use windows::Win32::Foundation::{
    CLASS_E_CLASSNOTAVAILABLE, E_POINTER, HRESULT, S_FALSE, S_OK,
};
use windows::Win32::System::Com::IClassFactory;

use crate::com::error_code;
use crate::factory::CommandClassFactory;
use crate::launcher::ProcessLauncher;
use crate::registry::RegistryStore;
use crate::{command_clsid, REGISTRY_LOCATION};

/// The process-wide module with this DLL's classes registered.
fn module() -> &'static ComModule {
    static REGISTER: Once = Once::new();
    let module = ComModule::global();
    REGISTER.call_once(|| {
        module.register_class(command_clsid(), || {
            Arc::new(ContextMenuCommand::new(
                Arc::new(RegistryStore::new(REGISTRY_LOCATION)),
                Arc::new(ProcessLauncher::new()),
            ))
        });
    });
    module
}

#[no_mangle]
pub extern "system" fn DllGetClassObject(
    rclsid: *const GUID,
    riid: *const GUID,
    ppv: *mut *mut c_void,
) -> HRESULT {
    if ppv.is_null() {
        return E_POINTER;
    }
    unsafe { *ppv = std::ptr::null_mut() };
    if rclsid.is_null() || riid.is_null() {
        return E_POINTER;
    }

    let clsid = Uuid::from_u128(unsafe { *rclsid }.to_u128());
    let module = module();
    if !module.has_class(&clsid) {
        return CLASS_E_CLASSNOTAVAILABLE;
    }

    let factory: IClassFactory = CommandClassFactory::new(clsid).into();
    unsafe { factory.query(riid, ppv) }
}

#[no_mangle]
pub extern "system" fn DllCanUnloadNow() -> HRESULT {
    if module().can_unload_now() {
        S_OK
    } else {
        S_FALSE
    }
}

#[no_mangle]
pub extern "system" fn DllGetActivationFactory(
    activatable_class_id: ManuallyDrop<HSTRING>,
    factory: *mut *mut c_void,
) -> HRESULT {
    if factory.is_null() {
        return E_POINTER;
    }
    unsafe { *factory = std::ptr::null_mut() };
    match module().activation_factory(&activatable_class_id.to_string_lossy()) {
        Ok(()) => S_OK,
        Err(error) => error_code(&error),
    }
}
