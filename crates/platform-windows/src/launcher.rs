//! `CreateProcessW`-backed [`Launcher`].

use std::io;
use std::mem;

use explorer_command::{CommandError, Launcher, Result};
use windows::core::{PCWSTR, PWSTR};
use windows::Win32::Foundation::CloseHandle;
use windows::Win32::System::Threading::{
    CreateProcessW, PROCESS_CREATION_FLAGS, PROCESS_INFORMATION, STARTUPINFOW,
};

/// Launches the substituted command line as a detached process: no explicit
/// executable path (the leading template token is the program), default
/// inheritance, environment, and working directory.
#[derive(Debug, Default)]
pub struct ProcessLauncher;

impl ProcessLauncher {
    pub fn new() -> Self {
        Self
    }
}

impl Launcher for ProcessLauncher {
    fn spawn(&self, command_line: &str) -> Result<()> {
        // CreateProcessW may rewrite the buffer, so it must be mutable.
        let mut command_w: Vec<u16> = command_line
            .encode_utf16()
            .chain(std::iter::once(0))
            .collect();

        let startup_info = STARTUPINFOW {
            cb: mem::size_of::<STARTUPINFOW>() as u32,
            ..Default::default()
        };
        let mut process_info = PROCESS_INFORMATION::default();

        unsafe {
            CreateProcessW(
                PCWSTR::null(),
                PWSTR(command_w.as_mut_ptr()),
                None,
                None,
                false,
                PROCESS_CREATION_FLAGS(0),
                None,
                PCWSTR::null(),
                &startup_info,
                &mut process_info,
            )
        }
        .map_err(launch_error)?;

        // The child is not tracked after creation; release both handles
        // immediately.
        unsafe {
            let _ = CloseHandle(process_info.hProcess);
            let _ = CloseHandle(process_info.hThread);
        }
        tracing::debug!(pid = process_info.dwProcessId, "process launched");
        Ok(())
    }
}

/// Only FACILITY_WIN32 results carry an OS error code in the low word;
/// anything else is passed through untranslated.
fn launch_error(error: windows::core::Error) -> CommandError {
    let code = error.code().0 as u32;
    if code & 0xFFFF_0000 == 0x8007_0000 {
        CommandError::Launch(io::Error::from_raw_os_error((code & 0xFFFF) as i32))
    } else {
        CommandError::Launch(io::Error::other(error))
    }
}

#[cfg(test)]
mod tests {
    use windows::Win32::Foundation::{ERROR_FILE_NOT_FOUND, E_FAIL};

    use super::*;

    #[test]
    fn win32_facility_results_keep_the_os_code() {
        let error = launch_error(ERROR_FILE_NOT_FOUND.to_hresult().into());
        assert!(matches!(&error, CommandError::Launch(_)));
        assert_eq!(error.raw_os_error(), Some(ERROR_FILE_NOT_FOUND.0 as i32));
    }

    #[test]
    fn non_win32_facility_results_are_not_masked_into_os_codes() {
        let error = launch_error(E_FAIL.into());
        assert!(matches!(&error, CommandError::Launch(_)));
        assert_eq!(error.raw_os_error(), None);
    }
}
