//! Configuration-store seam.
//!
//! The menu entry is described by a single registry record: its default value
//! is the display title, the `Icon` value is the icon resource path, and the
//! `command` sub-key's default value is the command-line template. The store
//! trait abstracts that record so the command logic can be exercised without
//! a live registry; the Windows adapter reads the real record.

use crate::error::{CommandError, Result};

/// Value name of the icon resource path inside the record.
pub const ICON_VALUE: &str = "Icon";

/// Name of the sub-key holding the command-line template.
pub const COMMAND_SUBKEY: &str = "command";

/// Read-only view of the command's configuration record.
///
/// Implementations perform one fresh read per call; nothing is cached across
/// calls and no handle outlives a single method invocation.
pub trait CommandStore: Send + Sync {
    /// The record's default value, shown as the menu label.
    fn title(&self) -> Result<String>;

    /// The record's `Icon` value, an icon resource path in implementation
    /// format. Returned verbatim, never parsed.
    fn icon(&self) -> Result<String>;

    /// The `command` sub-record's default value, a template containing the
    /// `%1` placeholder.
    fn command_template(&self) -> Result<String>;
}

/// In-memory store backing tests and non-registry hosts. Missing fields
/// surface the same value-not-found error shape the registry adapter uses.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    key: String,
    title: Option<String>,
    icon: Option<String>,
    command_template: Option<String>,
}

impl MemoryStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_command_template(mut self, template: impl Into<String>) -> Self {
        self.command_template = Some(template.into());
        self
    }

    fn value(&self, field: &Option<String>, key: String, value: &str) -> Result<String> {
        field
            .clone()
            .ok_or_else(|| CommandError::ValueNotFound {
                key,
                value: value.to_string(),
            })
    }
}

impl CommandStore for MemoryStore {
    fn title(&self) -> Result<String> {
        self.value(&self.title, self.key.clone(), "")
    }

    fn icon(&self) -> Result<String> {
        self.value(&self.icon, self.key.clone(), ICON_VALUE)
    }

    fn command_template(&self) -> Result<String> {
        self.value(
            &self.command_template,
            format!("{}\\{COMMAND_SUBKEY}", self.key),
            "",
        )
    }
}
