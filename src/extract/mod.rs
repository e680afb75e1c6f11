//! Source extraction: file discovery, documentation tags, and declared
//! signatures. The scanner only sees these traits; the Ruby frontend
//! below is one implementation of them.

pub mod ruby;
pub mod sorbet;
pub mod walker;
pub mod yard;

use crate::core::errors::Result;
use crate::core::{DocTag, MethodSignature, Visibility};
use std::path::{Path, PathBuf};

/// One documented method as found in source, before any conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDoc {
    pub namespace: String,
    pub name: String,
    pub visibility: Visibility,
    pub file: PathBuf,
    pub line: usize,
    pub tags: Vec<DocTag>,
}

/// Yields the set of source files to scan under a root
pub trait FileDiscovery {
    fn discover(&self, root: &Path) -> Result<Vec<PathBuf>>;
}

/// Yields the documented methods of one source file
pub trait DocExtractor {
    fn extract(&self, path: &Path) -> Result<Vec<MethodDoc>>;
}

/// Produces the declared signature for a documented method.
///
/// Failure means `IntrospectionUnavailable`; callers catch it and treat
/// the method as carrying no declared signature.
pub trait SignatureSource {
    fn signature_for(&self, doc: &MethodDoc) -> Result<MethodSignature>;
}
