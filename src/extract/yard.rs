//! Documentation extractor over YARD-style comment tags.

use super::{ruby, DocExtractor, MethodDoc};
use crate::core::errors::Result;
use std::fs;
use std::path::Path;

/// Reads `@param`/`@return` tags from the doc comment block above each
/// `def`. Every method yields a record, tagged or not, so that
/// undocumented methods are still checked against their declared
/// signatures.
#[derive(Default)]
pub struct YardExtractor;

impl YardExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl DocExtractor for YardExtractor {
    fn extract(&self, path: &Path) -> Result<Vec<MethodDoc>> {
        let content = fs::read_to_string(path)?;
        Ok(ruby::parse_ruby_source(&content)
            .into_iter()
            .map(|method| MethodDoc {
                namespace: method.namespace,
                name: method.name,
                visibility: method.visibility,
                file: path.to_path_buf(),
                line: method.line,
                tags: method.tags,
            })
            .collect())
    }
}
