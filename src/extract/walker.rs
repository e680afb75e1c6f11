//! File discovery for Ruby sources.

use super::FileDiscovery;
use crate::core::errors::Result;
use crate::core::SigdriftError;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Walks a root for `.rb` files, honoring gitignore rules
pub struct RubyWalker {
    ignore_patterns: Vec<String>,
}

impl RubyWalker {
    pub fn new() -> Self {
        Self {
            ignore_patterns: vec![],
        }
    }

    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    fn should_process(&self, path: &Path) -> bool {
        let is_ruby = path
            .extension()
            .map(|ext| ext.to_string_lossy() == "rb")
            .unwrap_or(false);
        if !is_ruby {
            return false;
        }
        let path_str = path.to_string_lossy();
        for pattern in &self.ignore_patterns {
            if glob::Pattern::new(pattern)
                .map(|p| p.matches(&path_str))
                .unwrap_or(false)
            {
                return false;
            }
        }
        true
    }
}

impl Default for RubyWalker {
    fn default() -> Self {
        Self::new()
    }
}

impl FileDiscovery for RubyWalker {
    fn discover(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let walker = WalkBuilder::new(root)
            .hidden(false)
            .git_ignore(true)
            .build();

        for entry in walker {
            let entry = entry.map_err(|source| SigdriftError::Discovery {
                root: root.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.is_file() && self.should_process(path) {
                files.push(path.to_path_buf());
            }
        }

        Ok(files)
    }
}
