//! Declared-signature source backed by inline Sorbet `sig` blocks.
//!
//! The sig text found next to a `def` is parsed into the canonical
//! algebra: `T::Array[...]`, `T::Hash[...]`, `T.any`, `T.nilable`,
//! `T.untyped`, `void`, and bare constants. A method without a sig, or
//! with a sig this parser does not understand, is reported as
//! introspection-unavailable and the scanner degrades it to "no
//! declared signature".

use super::{ruby, MethodDoc, SignatureSource};
use crate::core::errors::Result;
use crate::core::{MethodSignature, ParamSet, SigdriftError, TypeExpr};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

static PARAM_PAIR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([a-z_]\w*):\s*(.+)$").unwrap());
static CONST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(::[A-Za-z_][A-Za-z0-9_]*)*$").unwrap());

/// Looks up sigs by re-reading the method's source file, with a
/// per-file cache so each file is parsed once
#[derive(Default)]
pub struct SorbetSigSource {
    cache: RefCell<HashMap<PathBuf, HashMap<(String, String), Option<String>>>>,
}

impl SorbetSigSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn sig_text_for(&self, doc: &MethodDoc) -> Result<Option<String>> {
        let mut cache = self.cache.borrow_mut();
        if !cache.contains_key(&doc.file) {
            let content = fs::read_to_string(&doc.file)?;
            let sigs = ruby::parse_ruby_source(&content)
                .into_iter()
                .map(|method| ((method.namespace, method.name), method.sig_text))
                .collect();
            cache.insert(doc.file.clone(), sigs);
        }
        let sigs = &cache[&doc.file];
        Ok(sigs
            .get(&(doc.namespace.clone(), doc.name.clone()))
            .cloned()
            .flatten())
    }
}

impl SignatureSource for SorbetSigSource {
    fn signature_for(&self, doc: &MethodDoc) -> Result<MethodSignature> {
        let unavailable =
            || SigdriftError::introspection_unavailable(&doc.namespace, &doc.name);
        let text = self.sig_text_for(doc)?.ok_or_else(unavailable)?;
        parse_sig(&text).map_err(|err| {
            debug!("{}#{}: sig not understood: {err}", doc.namespace, doc.name);
            unavailable()
        })
    }
}

/// Parse the body of a `sig { ... }` block
pub fn parse_sig(text: &str) -> Result<MethodSignature> {
    let text = text.trim();

    let mut params = ParamSet::new();
    if let Some(inner) = extract_call(text, "params") {
        for pair in split_args(inner) {
            let captures = PARAM_PAIR_RE
                .captures(pair)
                .ok_or_else(|| SigdriftError::conversion(pair))?;
            params.insert(&captures[1], parse_sorbet_type(&captures[2])?);
        }
    }

    let returns = if let Some(inner) = extract_call(text, "returns") {
        Some(parse_sorbet_type(inner)?)
    } else if text == "void" || text.ends_with(".void") {
        Some(TypeExpr::Void)
    } else {
        None
    };

    Ok(MethodSignature { params, returns })
}

/// Parse one Sorbet type expression
pub fn parse_sorbet_type(text: &str) -> Result<TypeExpr> {
    let text = text.trim();
    if text == "T.untyped" {
        return Ok(TypeExpr::Untyped);
    }
    if text == "NilClass" {
        return Ok(TypeExpr::nil());
    }
    if let Some(inner) = extract_exact_call(text, "T.nilable") {
        let mut members = vec![parse_sorbet_type(inner)?];
        members.push(TypeExpr::nil());
        return Ok(TypeExpr::Union(members));
    }
    if let Some(inner) = extract_exact_call(text, "T.any") {
        let members = split_args(inner)
            .into_iter()
            .map(parse_sorbet_type)
            .collect::<Result<Vec<_>>>()?;
        if members.len() < 2 {
            return Err(SigdriftError::conversion(text));
        }
        return Ok(TypeExpr::Union(members));
    }
    if let Some(inner) = extract_brackets(text, "T::Array") {
        return Ok(TypeExpr::array(parse_sorbet_type(inner)?));
    }
    if let Some(inner) = extract_brackets(text, "T::Hash") {
        let args = split_args(inner);
        if args.len() != 2 {
            return Err(SigdriftError::conversion(text));
        }
        return Ok(TypeExpr::map(
            parse_sorbet_type(args[0])?,
            parse_sorbet_type(args[1])?,
        ));
    }
    if CONST_RE.is_match(text) {
        return Ok(TypeExpr::simple(text));
    }
    Err(SigdriftError::conversion(text))
}

/// Find `name(...)` anywhere in the text and return the balanced
/// parenthesized content
fn extract_call<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!("{name}(");
    let mut search_from = 0;
    while let Some(found) = text[search_from..].find(&needle) {
        let start = search_from + found;
        // reject a longer identifier ending in `name`
        let preceded_by_word = start > 0
            && text
                .as_bytes()
                .get(start - 1)
                .is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'_');
        if !preceded_by_word {
            let open = start + needle.len() - 1;
            return balanced(text, open, b'(', b')');
        }
        search_from = start + needle.len();
    }
    None
}

/// Like `extract_call` but only at the very start of the text
fn extract_exact_call<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(name)?;
    if !rest.starts_with('(') || !text.ends_with(')') {
        return None;
    }
    balanced(text, name.len(), b'(', b')')
}

fn extract_brackets<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(name)?;
    if !rest.starts_with('[') || !text.ends_with(']') {
        return None;
    }
    balanced(text, name.len(), b'[', b']')
}

/// Content between the opener at `open` and its matching closer
fn balanced(text: &str, open: usize, opener: u8, closer: u8) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    for idx in open..bytes.len() {
        let byte = bytes[idx];
        if byte == opener || byte == b'(' || byte == b'[' {
            depth += 1;
        } else if byte == closer || byte == b')' || byte == b']' {
            depth -= 1;
            if depth == 0 {
                return Some(text[open + 1..idx].trim());
            }
        }
    }
    None
}

/// Split on commas outside any parentheses or brackets
fn split_args(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, ch) in text.char_indices() {
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(text[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    let last = text[start..].trim();
    if !last.is_empty() {
        parts.push(last);
    }
    parts
}
