//! Shared error types for the application

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sigdrift operations.
///
/// Only `Discovery` is fatal; the other kinds are recovered inside the
/// converter, crosswalk, and scanner and folded into verdicts.
#[derive(Debug, Error)]
pub enum SigdriftError {
    /// A documented type tag's text matches no recognized grammar
    #[error("unrecognized type tag: {text}")]
    Conversion { text: String },

    /// The declared-signature source cannot produce a signature; the
    /// caller degrades the method to "no declared signature"
    #[error("no declared signature for {namespace}#{name}")]
    IntrospectionUnavailable { namespace: String, name: String },

    /// A documentation tag is present but unusable; the affected field
    /// is treated as undocumented
    #[error("malformed documentation: {detail}")]
    MalformedDocumentation { detail: String },

    /// File discovery failed; the whole run aborts
    #[error("discovery failed under {root}")]
    Discovery {
        root: PathBuf,
        #[source]
        source: ignore::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SigdriftError {
    pub fn conversion(text: impl Into<String>) -> Self {
        Self::Conversion { text: text.into() }
    }

    pub fn introspection_unavailable(
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self::IntrospectionUnavailable {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn malformed_documentation(detail: impl Into<String>) -> Self {
        Self::MalformedDocumentation {
            detail: detail.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SigdriftError>;
