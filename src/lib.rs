// Export modules for library usage
pub mod cli;
pub mod convert;
pub mod core;
pub mod crosswalk;
pub mod equivalence;
pub mod extract;
pub mod io;
pub mod scan;

// Re-export commonly used types
pub use crate::core::{
    DocSignature, DocTag, DocType, MethodIdentity, MethodSignature, Mismatch, ParamSet,
    SigdriftError, TagKind, TypeExpr, Verdict, VerifiedMethod, Visibility,
};

pub use crate::convert::{doc_signature_from_tags, parse_tag_type, parse_tag_types, render};
pub use crate::crosswalk::crosswalk;
pub use crate::equivalence::{equivalent, CheckPolicy};
pub use crate::extract::{
    sorbet::SorbetSigSource, walker::RubyWalker, yard::YardExtractor, DocExtractor, FileDiscovery,
    MethodDoc, SignatureSource,
};
pub use crate::io::output::{create_writer, OutputFormat, ReportWriter};
pub use crate::scan::{Finding, Report, RunState, Scanner};
