pub mod errors;
pub mod types;

pub use errors::{Result, SigdriftError};
pub use types::{
    DocSignature, DocTag, DocType, MethodIdentity, MethodSignature, Mismatch, ParamSet, TagKind,
    TypeExpr, Verdict, VerifiedMethod, Visibility,
};
