//! Finding mocap files under a root folder.

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::provider::SceneLoader;

/// Recognized files under one folder, sorted by path.
#[derive(Debug, Clone, Default)]
pub struct MocapFolder {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl MocapFolder {
    /// Walk `root` recursively, keeping files `loader` recognizes.
    /// Links are followed; unreadable subfolders and link cycles are skipped
    /// with a warning. An unreadable root is an error.
    pub fn scan(root: impl Into<PathBuf>, loader: &dyn SceneLoader) -> io::Result<Self> {
        let root = root.into();
        let mut files = Vec::new();

        for entry in WalkDir::new(&root).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => return Err(err.into()),
                Err(err) => {
                    log::warn!("skipping {}: {err}", err.path().unwrap_or(root.as_path()).display());
                    continue;
                }
            };
            if entry.file_type().is_file() && loader.recognizes(entry.path()) {
                files.push(entry.into_path());
            }
        }
        files.sort();
        log::info!("found {} mocap file(s) under {}", files.len(), root.display());
        Ok(MocapFolder { root, files })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Files whose path relative to the root contains `text`, ignoring case.
    /// An empty filter matches everything.
    pub fn filter(&self, text: &str) -> Vec<&Path> {
        let needle = text.to_lowercase();
        self.files
            .iter()
            .filter(|path| {
                let relative = path.strip_prefix(&self.root).unwrap_or(path.as_path());
                relative.to_string_lossy().to_lowercase().contains(&needle)
            })
            .map(PathBuf::as_path)
            .collect()
    }
}
