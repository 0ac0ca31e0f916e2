use std::io;

use uuid::Uuid;

use crate::template::PLACEHOLDER;

/// Unified error type for the explorer-command crates.
///
/// OS failures are carried as [`io::Error`] sources so the original status
/// code stays available through [`CommandError::raw_os_error`]; the Windows
/// glue maps that code back to an HRESULT unchanged.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Capability declaration for operations this command does not provide
    /// (tooltip, sub-commands).
    #[error("not implemented")]
    NotImplemented,

    /// Invalid input provided by the caller.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested class identifier is not in the registration table.
    #[error("class {0} is not available from this module")]
    ClassNotAvailable(Uuid),

    /// The requested activatable class id is not provided by this module.
    #[error("activatable class {0:?} is not available from this module")]
    ActivatableClassNotAvailable(String),

    /// The configuration record (registry key) does not exist.
    #[error("configuration key {key:?} not found")]
    KeyNotFound { key: String },

    /// The configuration record exists but lacks the requested value.
    #[error("value {value:?} missing under configuration key {key:?}")]
    ValueNotFound { key: String, value: String },

    /// Reading the configuration record failed at the OS level.
    #[error("failed to read configuration key {key:?}")]
    Registry {
        key: String,
        #[source]
        source: io::Error,
    },

    /// The command template has no placeholder to substitute the selection
    /// into. Launching the unmodified template would silently drop the
    /// selected paths, so this is treated as a configuration error.
    #[error("command template contains no {PLACEHOLDER} placeholder")]
    MissingPlaceholder,

    /// Process creation failed.
    #[error("failed to launch process")]
    Launch(#[source] io::Error),
}

impl CommandError {
    /// The verbatim OS status code behind this error, if one exists.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            CommandError::Registry { source, .. } | CommandError::Launch(source) => {
                source.raw_os_error()
            }
            _ => None,
        }
    }
}

/// Result type alias using [`CommandError`].
pub type Result<T> = std::result::Result<T, CommandError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_os_error_survives_registry_wrapping() {
        let error = CommandError::Registry {
            key: "Software\\Classes\\test".to_string(),
            source: io::Error::from_raw_os_error(5),
        };
        assert_eq!(error.raw_os_error(), Some(5));
    }

    #[test]
    fn raw_os_error_survives_launch_wrapping() {
        let error = CommandError::Launch(io::Error::from_raw_os_error(2));
        assert_eq!(error.raw_os_error(), Some(2));
    }

    #[test]
    fn non_os_errors_have_no_code() {
        assert_eq!(CommandError::NotImplemented.raw_os_error(), None);
        assert_eq!(CommandError::MissingPlaceholder.raw_os_error(), None);
    }
}
