//! Shared type definitions for signature checking

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

/// Canonical type expression shared by both annotation sides.
///
/// Every type, whether it came from a Sorbet sig or a YARD tag, is
/// normalized into this algebra before comparison. Expressions are
/// immutable and finite by construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeExpr {
    /// A named nominal type; `Simple("nil")` is the nil atom
    Simple(String),
    Array(Box<TypeExpr>),
    Map(Box<TypeExpr>, Box<TypeExpr>),
    /// Ordered alternatives, always >= 2 members
    Union(Vec<TypeExpr>),
    /// No meaningful return value
    Void,
    /// No constraint / unknown
    Untyped,
}

impl TypeExpr {
    pub fn simple(name: impl Into<String>) -> Self {
        TypeExpr::Simple(name.into())
    }

    /// The nil atom, shared by `NilClass` on the declared side and the
    /// bare `nil` identifier on the documented side
    pub fn nil() -> Self {
        TypeExpr::Simple("nil".to_string())
    }

    pub fn array(element: TypeExpr) -> Self {
        TypeExpr::Array(Box::new(element))
    }

    pub fn map(key: TypeExpr, value: TypeExpr) -> Self {
        TypeExpr::Map(Box::new(key), Box::new(value))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, TypeExpr::Simple(name) if name == "nil")
    }
}

/// Method visibility as declared in source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

/// Insertion-ordered parameter map: identifier -> type.
///
/// Order mirrors declaration order; lookup is by name. The value type is
/// generic so the documented side can carry conversion outcomes instead
/// of bare expressions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSet<T = TypeExpr> {
    entries: Vec<(String, T)>,
}

impl<T> Default for ParamSet<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> ParamSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter. A repeated identifier replaces the earlier
    /// value but keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, value: T) {
        let name = name.into();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> FromIterator<(String, T)> for ParamSet<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (name, value) in iter {
            set.insert(name, value);
        }
        set
    }
}

/// Declared-side signature, as extracted from a Sorbet sig
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSignature {
    pub params: ParamSet,
    pub returns: Option<TypeExpr>,
}

/// Outcome of converting one documented tag's type text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocType {
    Known(TypeExpr),
    /// The tag's text matched no recognized grammar; the raw text is
    /// kept so the report can show what failed
    Unparseable(String),
}

/// Documentation-side signature, built from `@param`/`@return` tags.
/// `tags` preserves the tags as written for report rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocSignature {
    pub params: ParamSet<DocType>,
    pub returns: Option<DocType>,
    pub tags: Vec<DocTag>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TagKind {
    Param,
    Return,
}

/// One documentation tag as written in source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocTag {
    pub kind: TagKind,
    pub name: Option<String>,
    pub types: Vec<String>,
}

impl fmt::Display for DocTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TagKind::Return => write!(f, "return {}", self.types.join(", ")),
            TagKind::Param => write!(
                f,
                "{}: {}",
                self.name.as_deref().unwrap_or("?"),
                self.types.join(", ")
            ),
        }
    }
}

/// Identity of a method within one scan.
///
/// Equality and hashing cover namespace and name only; the location
/// rides along for reporting. Private methods never become identities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodIdentity {
    pub namespace: String,
    pub name: String,
    pub file: PathBuf,
    pub line: usize,
}

impl MethodIdentity {
    /// Full title in `Namespace#name` form
    pub fn title(&self) -> String {
        if self.namespace.is_empty() {
            format!("#{}", self.name)
        } else {
            format!("{}#{}", self.namespace, self.name)
        }
    }
}

impl PartialEq for MethodIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.namespace == other.namespace && self.name == other.name
    }
}

impl Eq for MethodIdentity {}

impl Hash for MethodIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.namespace.hash(state);
        self.name.hash(state);
    }
}

/// One drift reason. Conversion failures carry the raw tag text so the
/// report can distinguish them from structural differences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mismatch {
    Return { unparseable: Option<String> },
    ParameterSet,
    ParameterType { name: String, unparseable: Option<String> },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Return { unparseable: None } => write!(f, "return mismatch"),
            Mismatch::Return {
                unparseable: Some(text),
            } => write!(f, "return mismatch (unparseable tag: {text})"),
            Mismatch::ParameterSet => write!(f, "parameter set mismatch"),
            Mismatch::ParameterType {
                name,
                unparseable: None,
            } => write!(f, "parameter type mismatch: {name}"),
            Mismatch::ParameterType {
                name,
                unparseable: Some(text),
            } => write!(f, "parameter type mismatch: {name} (unparseable tag: {text})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Pass,
    Fail,
}

/// Per-method crosswalk outcome; folded into run state immediately
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedMethod {
    pub identity: MethodIdentity,
    pub verdict: Verdict,
    pub mismatches: Vec<Mismatch>,
}

impl VerifiedMethod {
    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }
}
