//! Command-line template expansion.
//!
//! The registry record's `command` value is a template containing a `%1`
//! placeholder. At invoke time the first occurrence of the placeholder is
//! replaced with the selected paths, each prefixed by a single space and in
//! host-provided order, so `app.exe "%1"` with `a.txt` and `b.txt` selected
//! becomes `app.exe " a.txt b.txt"`.

use crate::error::{CommandError, Result};
use crate::selection::Selection;

/// Placeholder token the template must contain.
pub const PLACEHOLDER: &str = "%1";

/// Expands `template` by substituting the selection for the first `%1`.
///
/// A template without the placeholder is a configuration error: launching it
/// unmodified would drop the selection on the floor, so expansion fails with
/// [`CommandError::MissingPlaceholder`] instead.
pub fn expand_command_line(template: &str, selection: &Selection) -> Result<String> {
    let at = template
        .find(PLACEHOLDER)
        .ok_or(CommandError::MissingPlaceholder)?;

    let mut joined = String::new();
    for path in selection.paths() {
        joined.push(' ');
        joined.push_str(&path.display().to_string());
    }

    let mut command_line =
        String::with_capacity(template.len() - PLACEHOLDER.len() + joined.len());
    command_line.push_str(&template[..at]);
    command_line.push_str(&joined);
    command_line.push_str(&template[at + PLACEHOLDER.len()..]);
    Ok(command_line)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn selection_of(paths: &[&str]) -> Selection {
        paths.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn single_item_replaces_placeholder_with_space_prefixed_path() {
        let expanded =
            expand_command_line("app.exe%1", &selection_of(&["a.txt"])).expect("should expand");
        assert_eq!(expanded, "app.exe a.txt");
    }

    #[test]
    fn multiple_items_are_space_joined_in_host_order() {
        let expanded = expand_command_line("app.exe%1", &selection_of(&["a.txt", "b.txt", "c.txt"]))
            .expect("should expand");
        assert_eq!(expanded, "app.exe a.txt b.txt c.txt");
    }

    #[test]
    fn only_first_placeholder_occurrence_is_replaced() {
        let expanded =
            expand_command_line("app.exe%1 --log %1", &selection_of(&["a.txt"]))
                .expect("should expand");
        assert_eq!(expanded, "app.exe a.txt --log %1");
    }

    #[test]
    fn trailing_template_text_is_kept() {
        let expanded = expand_command_line("app.exe%1 --verbose", &selection_of(&["a.txt"]))
            .expect("should expand");
        assert_eq!(expanded, "app.exe a.txt --verbose");
    }

    #[test]
    fn missing_placeholder_is_a_configuration_error() {
        let error = expand_command_line("app.exe --no-token", &selection_of(&["a.txt"]))
            .expect_err("expansion should fail");
        assert!(matches!(error, CommandError::MissingPlaceholder));
    }

    #[test]
    fn empty_selection_yields_bare_substitution() {
        // Invoke never reaches expansion with an empty selection; the
        // function itself still behaves predictably.
        let expanded =
            expand_command_line("app.exe%1", &Selection::empty()).expect("should expand");
        assert_eq!(expanded, "app.exe");
    }
}
