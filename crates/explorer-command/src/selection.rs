use std::path::{Path, PathBuf};

/// The ordered set of filesystem items the user had selected when the menu
/// action was invoked. Provided by the host per call and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    items: Vec<PathBuf>,
}

impl Selection {
    pub fn new(items: Vec<PathBuf>) -> Self {
        Self { items }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in host-provided order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.items.iter().map(PathBuf::as_path)
    }
}

impl From<Vec<PathBuf>> for Selection {
    fn from(items: Vec<PathBuf>) -> Self {
        Self::new(items)
    }
}

impl FromIterator<PathBuf> for Selection {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
