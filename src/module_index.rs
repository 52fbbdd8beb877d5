/// Module name → file path index.
///
/// Sails injects every file under `api/services` and `api/models` as a
/// global named after the file (`api/services/UserService.js` becomes
/// `UserService`).  This module scans the configured directories once and
/// remembers where each of those globals is defined.
///
/// The scan is shallow: only the immediate files of each directory are
/// indexed.  When two directories contain a file with the same module
/// name, the directory listed later wins.
///
/// The index is built once per session and never refreshed.  Files added
/// or removed afterwards are not picked up until the server restarts.
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::IndexError;
use crate::syntax::SOURCE_EXTENSION;

#[derive(Debug, Default)]
pub struct ModuleIndex {
    modules: HashMap<String, PathBuf>,
    errors: Vec<IndexError>,
}

impl ModuleIndex {
    /// Scan every directory in `roots` (relative to `base`) in order.
    ///
    /// Unreadable directories are skipped and recorded in
    /// [`errors`](Self::errors); they never abort the build.
    pub fn build<S: AsRef<str>>(base: &Path, roots: &[S]) -> Self {
        let mut index = ModuleIndex::default();

        for root in roots {
            let directory = base.join(root.as_ref());
            if let Err(source) = index.scan_directory(&directory) {
                warn!(root = %directory.display(), error = %source, "skipping definition directory");
                index.errors.push(IndexError::RootUnreadable {
                    root: directory,
                    source,
                });
            }
        }

        info!(count = index.len(), "loaded module definitions");
        index
    }

    fn scan_directory(&mut self, directory: &Path) -> std::io::Result<()> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(directory)? {
            let entry = entry?;
            // Follows symlinks, so a link to a directory is skipped too.
            if !entry.path().is_file() {
                continue;
            }
            files.push(entry.file_name());
        }
        files.sort();

        for file_name in files {
            let module_name = module_name_for(&file_name.to_string_lossy()).to_string();
            self.modules.insert(module_name, directory.join(&file_name));
        }
        Ok(())
    }

    pub fn get(&self, module_name: &str) -> Option<&Path> {
        self.modules.get(module_name).map(PathBuf::as_path)
    }

    pub fn contains(&self, module_name: &str) -> bool {
        self.modules.contains_key(module_name)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// All entries, sorted by module name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        let mut entries: Vec<(&str, &Path)> = self
            .modules
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_path()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter()
    }

    /// Directories that could not be read while building.
    pub fn errors(&self) -> &[IndexError] {
        &self.errors
    }
}

/// Strip a single trailing `.js` from a file name.  Other names are kept
/// whole.
fn module_name_for(file_name: &str) -> &str {
    file_name
        .strip_suffix(SOURCE_EXTENSION)
        .and_then(|stem| stem.strip_suffix('.'))
        .filter(|stem| !stem.is_empty())
        .unwrap_or(file_name)
}

// ─── Tests ──────────────────────────────────────────────────────────────────
