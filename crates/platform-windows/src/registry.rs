//! Registry-backed [`CommandStore`].
//!
//! One fresh read per call, `KEY_QUERY_VALUE` access only. Key handles are
//! held in a drop guard so they are closed on every exit path, error paths
//! included.

use std::io;

use explorer_command::{CommandError, CommandStore, Result, COMMAND_SUBKEY, ICON_VALUE};
use windows::core::PCWSTR;
use windows::Win32::Foundation::ERROR_FILE_NOT_FOUND;
use windows::Win32::System::Registry::{
    RegCloseKey, RegGetValueW, RegOpenKeyExW, HKEY, HKEY_CLASSES_ROOT, KEY_QUERY_VALUE,
    RRF_RT_REG_SZ, RRF_ZEROONFAILURE,
};

/// Reads the menu-entry record under `HKEY_CLASSES_ROOT`.
pub struct RegistryStore {
    location: String,
}

impl RegistryStore {
    /// `location` is the record path relative to the classes root, e.g.
    /// `*\shell\ContextMenuCommand`.
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }
}

impl CommandStore for RegistryStore {
    fn title(&self) -> Result<String> {
        read_string_value(&self.location, "")
    }

    fn icon(&self) -> Result<String> {
        read_string_value(&self.location, ICON_VALUE)
    }

    fn command_template(&self) -> Result<String> {
        read_string_value(&format!("{}\\{COMMAND_SUBKEY}", self.location), "")
    }
}

/// Open registry key, closed on drop.
struct OpenKey {
    hkey: HKEY,
}

impl Drop for OpenKey {
    fn drop(&mut self) {
        unsafe {
            let _ = RegCloseKey(self.hkey);
        }
    }
}

fn wide(text: &str) -> Vec<u16> {
    text.encode_utf16().chain(std::iter::once(0)).collect()
}

fn registry_error(location: &str, code: u32) -> CommandError {
    CommandError::Registry {
        key: location.to_string(),
        source: io::Error::from_raw_os_error(code as i32),
    }
}

fn open_key(location: &str) -> Result<OpenKey> {
    let subkey = wide(location);
    let mut hkey = HKEY::default();
    let status = unsafe {
        RegOpenKeyExW(
            HKEY_CLASSES_ROOT,
            PCWSTR(subkey.as_ptr()),
            0,
            KEY_QUERY_VALUE,
            &mut hkey,
        )
    };
    if status.is_err() {
        return Err(if status == ERROR_FILE_NOT_FOUND {
            CommandError::KeyNotFound {
                key: location.to_string(),
            }
        } else {
            registry_error(location, status.0)
        });
    }
    Ok(OpenKey { hkey })
}

/// Reads a `REG_SZ`/`REG_EXPAND_SZ` value (expanded) with the usual
/// size-then-data two-call pattern.
fn read_string_value(location: &str, value: &str) -> Result<String> {
    let key = open_key(location)?;
    let value_w = wide(value);

    // RRF_ZEROONFAILURE is rejected with ERROR_INVALID_PARAMETER when pvData
    // is null, so the size probe must not carry it.
    let mut size = 0u32;
    let status = unsafe {
        RegGetValueW(
            key.hkey,
            PCWSTR::null(),
            PCWSTR(value_w.as_ptr()),
            RRF_RT_REG_SZ,
            None,
            None,
            Some(&mut size),
        )
    };
    if status.is_err() {
        return Err(if status == ERROR_FILE_NOT_FOUND {
            CommandError::ValueNotFound {
                key: location.to_string(),
                value: value.to_string(),
            }
        } else {
            registry_error(location, status.0)
        });
    }

    let mut buffer = vec![0u16; size as usize / 2 + 1];
    let mut size = (buffer.len() * 2) as u32;
    let status = unsafe {
        RegGetValueW(
            key.hkey,
            PCWSTR::null(),
            PCWSTR(value_w.as_ptr()),
            RRF_RT_REG_SZ | RRF_ZEROONFAILURE,
            None,
            Some(buffer.as_mut_ptr().cast()),
            Some(&mut size),
        )
    };
    if status.is_err() {
        return Err(registry_error(location, status.0));
    }

    let length = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
    String::from_utf16(&buffer[..length]).map_err(|error| CommandError::Registry {
        key: location.to_string(),
        source: io::Error::new(io::ErrorKind::InvalidData, error),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_strings_are_nul_terminated_utf16() {
        let encoded = wide("abc");
        assert_eq!(encoded, [b'a' as u16, b'b' as u16, b'c' as u16, 0]);
        assert_eq!(wide(""), [0]);

        let text = "C:\\Per\u{00e4}\\app.exe";
        let encoded = wide(text);
        assert_eq!(encoded.last(), Some(&0));
        let decoded =
            String::from_utf16(&encoded[..encoded.len() - 1]).expect("round-trip should hold");
        assert_eq!(decoded, text);
    }

    #[test]
    fn size_probe_reads_a_well_formed_record() {
        // `.txt` has carried a default string value since forever; a failure
        // here means the probing call itself is malformed.
        let value = read_string_value(".txt", "").expect("default value of .txt should read");
        assert!(!value.is_empty());
    }

    #[test]
    fn missing_record_is_key_not_found() {
        let store = RegistryStore::new("*\\shell\\NoSuchContextMenuCommand-5f0d");
        let error = store.title().expect_err("record should not exist");
        assert!(matches!(error, CommandError::KeyNotFound { .. }));
    }

    #[test]
    fn missing_command_record_fails_template_lookup() {
        let store = RegistryStore::new("*\\shell\\NoSuchContextMenuCommand-5f0d");
        let error = store
            .command_template()
            .expect_err("command record should not exist");
        assert!(matches!(error, CommandError::KeyNotFound { .. }));
    }
}
