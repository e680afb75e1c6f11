//! Conversion between documented type-tag text and the canonical
//! [`TypeExpr`] algebra.
//!
//! The documented grammar is the YARD tag vocabulary: bare constants,
//! `Array<T>`, `Hash<K,V>`, the `nil`/`void`/`untyped` atoms, and
//! comma-joined alternatives forming a union. Anything else is a
//! conversion failure, never a silent `Untyped`.

use crate::core::errors::Result;
use crate::core::{DocSignature, DocTag, DocType, SigdriftError, TagKind, TypeExpr};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

static IDENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(::[A-Za-z_][A-Za-z0-9_]*)*$").unwrap());

/// Parse one tag type token into a canonical expression.
///
/// A token containing top-level commas is an implicit union in textual
/// order; tokens are otherwise a single grammar production.
pub fn parse_tag_type(text: &str) -> Result<TypeExpr> {
    let text = text.trim();
    let parts = split_top_level(text, ',');
    if parts.len() > 1 {
        let members = parts
            .iter()
            .map(|part| parse_single(part.trim()))
            .collect::<Result<Vec<_>>>()?;
        Ok(TypeExpr::Union(members))
    } else {
        parse_single(text)
    }
}

/// Parse a tag's full token list. One token stands alone; two or more
/// form a union in textual order.
pub fn parse_tag_types(texts: &[String]) -> Result<TypeExpr> {
    match texts {
        [] => Err(SigdriftError::conversion("<empty tag>")),
        [single] => parse_tag_type(single),
        many => {
            let members = many
                .iter()
                .map(|text| parse_tag_type(text))
                .collect::<Result<Vec<_>>>()?;
            Ok(TypeExpr::Union(members))
        }
    }
}

fn parse_single(token: &str) -> Result<TypeExpr> {
    let token = token.trim();
    match token {
        "" => return Err(SigdriftError::conversion("<empty tag>")),
        "nil" => return Ok(TypeExpr::nil()),
        "void" => return Ok(TypeExpr::Void),
        "untyped" => return Ok(TypeExpr::Untyped),
        _ => {}
    }

    if let Some((head, inner)) = split_generic(token) {
        let args = split_top_level(inner, ',');
        return match (head, args.len()) {
            // a comma-joined element list is a union element
            ("Array", _) => Ok(TypeExpr::array(parse_tag_type(inner)?)),
            ("Hash", 2) => Ok(TypeExpr::map(parse_single(args[0])?, parse_single(args[1])?)),
            _ => Err(SigdriftError::conversion(token)),
        };
    }

    if IDENT_RE.is_match(token) {
        Ok(TypeExpr::simple(token))
    } else {
        Err(SigdriftError::conversion(token))
    }
}

/// Split `Head<inner>` into its head and bracket content
fn split_generic(token: &str) -> Option<(&str, &str)> {
    let open = token.find('<')?;
    if !token.ends_with('>') || open == 0 {
        return None;
    }
    Some((&token[..open], &token[open + 1..token.len() - 1]))
}

/// Split on a separator at angle-bracket depth zero
pub(crate) fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, ch) in text.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                parts.push(text[start..idx].trim());
                start = idx + ch.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(text[start..].trim());
    parts
}

/// Render a canonical expression back into the tag-like textual grammar.
/// Declared-side types map 1:1 into the same forms the documentation
/// uses, which is what the report's diff blocks print.
pub fn render(expr: &TypeExpr) -> String {
    match expr {
        TypeExpr::Simple(name) => name.clone(),
        TypeExpr::Array(element) => format!("Array<{}>", render(element)),
        TypeExpr::Map(key, value) => format!("Hash<{},{}>", render(key), render(value)),
        TypeExpr::Union(members) => members
            .iter()
            .map(render)
            .collect::<Vec<_>>()
            .join(", "),
        TypeExpr::Void => "void".to_string(),
        TypeExpr::Untyped => "untyped".to_string(),
    }
}

/// Build the documented-side signature from a method's tags.
///
/// Only `@param` tags with a name contribute parameters; the first
/// `@return` tag wins, matching how YARD consumers read it. Type text
/// that fails to convert is kept as [`DocType::Unparseable`] so the
/// crosswalk reports it as a conversion failure rather than dropping
/// the tag.
pub fn doc_signature_from_tags(tags: &[DocTag]) -> DocSignature {
    let mut signature = DocSignature {
        params: Default::default(),
        returns: None,
        tags: tags.to_vec(),
    };

    for tag in tags {
        match tag.kind {
            TagKind::Param => {
                let Some(name) = tag.name.as_deref() else {
                    warn!("@param tag without a name, skipping");
                    continue;
                };
                signature.params.insert(name, convert_tag(tag));
            }
            TagKind::Return => {
                if signature.returns.is_none() {
                    signature.returns = Some(convert_tag(tag));
                }
            }
        }
    }

    signature
}

fn convert_tag(tag: &DocTag) -> DocType {
    match parse_tag_types(&tag.types) {
        Ok(expr) => DocType::Known(expr),
        Err(err) => {
            warn!("tag conversion failed: {err}");
            DocType::Unparseable(tag.types.join(", "))
        }
    }
}
