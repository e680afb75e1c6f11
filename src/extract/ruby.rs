//! Line-oriented Ruby source scanner.
//!
//! Walks a file once, tracking `module`/`class` nesting, visibility
//! modifiers, doc-comment blocks, and `sig` blocks, and yields one
//! record per `def`. This is a structural scan, not a Ruby parser:
//! openers and `end` are matched heuristically at line granularity,
//! which holds for conventionally formatted code.

use crate::convert::split_top_level;
use crate::core::{DocTag, SigdriftError, TagKind, Visibility};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

/// One `def` with everything the extractors need: its doc tags as
/// written and the raw text of an adjacent `sig` block, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMethod {
    pub namespace: String,
    pub name: String,
    pub visibility: Visibility,
    pub line: usize,
    pub tags: Vec<DocTag>,
    pub sig_text: Option<String>,
}

static NAMESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:module|class)\s+([A-Z][A-Za-z0-9_:]*)").unwrap());
static SINGLETON_CLASS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*class\s*<<").unwrap());
static DEF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:(private|protected|public)\s+)?def\s+(?:self\.)?([a-zA-Z_][A-Za-z0-9_]*[?!=]?)\s*(\([^)]*\))?\s*(=)?",
    )
    .unwrap()
});
static VISIBILITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(private|protected|public)\s*(#.*)?$").unwrap());
static VISIBILITY_SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(private|protected|public)\s+((?::\w+[?!=]?,?\s*)+)$").unwrap());
static SIG_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*sig\s*\{(.*)\}\s*$").unwrap());
static SIG_DO_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*sig\s+do\s*$").unwrap());
static BLOCK_OPEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:if|unless|while|until|case|begin|for)\b").unwrap());
// conditional expressions opening on an assignment or boolean-chain RHS
// (`x = if …`, `y ||= begin …`) carry their own `end` too; a modifier
// conditional (`x = 1 if y`) has a value between the operator and the
// keyword and stays unmatched
static RHS_BLOCK_OPEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:=|\|\||&&)\s*(?:if|unless|case|begin)\b").unwrap());
static DO_TAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bdo\s*(\|[^|]*\|)?\s*$").unwrap());
static END_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*end\b").unwrap());
static COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*#").unwrap());
static PARAM_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*#\s*@param\s+(\w+)\s+\[([^\]]*)\]").unwrap());
static RETURN_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*#\s*@return\s+\[([^\]]*)\]").unwrap());
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*#\s*@(param|return)\b").unwrap());

enum Frame {
    Namespace { name: String, visibility: Visibility },
    Def,
    Block,
}

fn parse_visibility(word: &str) -> Visibility {
    match word {
        "private" => Visibility::Private,
        "protected" => Visibility::Protected,
        _ => Visibility::Public,
    }
}

/// Scan one file's content into its method records
pub fn parse_ruby_source(content: &str) -> Vec<RawMethod> {
    let mut methods: Vec<RawMethod> = Vec::new();
    let mut frames: Vec<Frame> = Vec::new();
    let mut pending_tags: Vec<DocTag> = Vec::new();
    let mut pending_sig: Option<String> = None;
    let mut sig_body: Option<Vec<String>> = None;

    for (index, line) in content.lines().enumerate() {
        let lineno = index + 1;

        // inside a multi-line `sig do` block: collect until its end
        if let Some(body) = sig_body.as_mut() {
            if END_RE.is_match(line) {
                pending_sig = Some(body.join(" "));
                sig_body = None;
            } else {
                body.push(line.trim().to_string());
            }
            continue;
        }

        if COMMENT_RE.is_match(line) {
            if let Some(tag) = parse_tag_line(line) {
                pending_tags.push(tag);
            } else if TAG_RE.is_match(line) {
                // the affected field stays undocumented
                let err = SigdriftError::malformed_documentation(format!(
                    "line {lineno}: {}",
                    line.trim()
                ));
                warn!("{err}");
            }
            continue;
        }

        if line.trim().is_empty() {
            // a blank line detaches the doc block from what follows
            pending_tags.clear();
            pending_sig = None;
            continue;
        }

        if let Some(captures) = SIG_LINE_RE.captures(line) {
            pending_sig = Some(captures[1].trim().to_string());
            continue;
        }
        if SIG_DO_RE.is_match(line) {
            sig_body = Some(Vec::new());
            continue;
        }

        if let Some(captures) = DEF_RE.captures(line) {
            let name = captures[2].to_string();
            let visibility = captures
                .get(1)
                .map(|m| parse_visibility(m.as_str()))
                .unwrap_or_else(|| current_visibility(&frames));
            methods.push(RawMethod {
                namespace: current_namespace(&frames),
                name,
                visibility,
                line: lineno,
                tags: std::mem::take(&mut pending_tags),
                sig_text: pending_sig.take(),
            });
            // an endless def (`def foo = expr`) has no matching end
            if captures.get(4).is_none() {
                frames.push(Frame::Def);
            }
            continue;
        }

        pending_tags.clear();
        pending_sig = None;

        if let Some(captures) = VISIBILITY_RE.captures(line) {
            let visibility = parse_visibility(&captures[1]);
            set_current_visibility(&mut frames, visibility);
            continue;
        }
        if let Some(captures) = VISIBILITY_SYMBOL_RE.captures(line) {
            let visibility = parse_visibility(&captures[1]);
            let namespace = current_namespace(&frames);
            for symbol in captures[2].split(',') {
                let name = symbol.trim().trim_start_matches(':');
                for method in methods
                    .iter_mut()
                    .filter(|m| m.namespace == namespace && m.name == name)
                {
                    method.visibility = visibility;
                }
            }
            continue;
        }

        if SINGLETON_CLASS_RE.is_match(line) {
            frames.push(Frame::Block);
            continue;
        }
        if let Some(captures) = NAMESPACE_RE.captures(line) {
            frames.push(Frame::Namespace {
                name: captures[1].to_string(),
                visibility: Visibility::Public,
            });
            continue;
        }
        if END_RE.is_match(line) {
            frames.pop();
            continue;
        }
        if BLOCK_OPEN_RE.is_match(line)
            || RHS_BLOCK_OPEN_RE.is_match(line)
            || DO_TAIL_RE.is_match(line)
        {
            frames.push(Frame::Block);
        }
    }

    methods
}

fn current_namespace(frames: &[Frame]) -> String {
    frames
        .iter()
        .filter_map(|frame| match frame {
            Frame::Namespace { name, .. } => Some(name.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("::")
}

fn current_visibility(frames: &[Frame]) -> Visibility {
    frames
        .iter()
        .rev()
        .find_map(|frame| match frame {
            Frame::Namespace { visibility, .. } => Some(*visibility),
            _ => None,
        })
        .unwrap_or(Visibility::Public)
}

fn set_current_visibility(frames: &mut [Frame], new: Visibility) {
    if let Some(Frame::Namespace { visibility, .. }) = frames
        .iter_mut()
        .rev()
        .find(|frame| matches!(frame, Frame::Namespace { .. }))
    {
        *visibility = new;
    }
}

fn parse_tag_line(line: &str) -> Option<DocTag> {
    if let Some(captures) = PARAM_TAG_RE.captures(line) {
        return Some(DocTag {
            kind: TagKind::Param,
            name: Some(captures[1].to_string()),
            types: split_types(&captures[2]),
        });
    }
    if let Some(captures) = RETURN_TAG_RE.captures(line) {
        return Some(DocTag {
            kind: TagKind::Return,
            name: None,
            types: split_types(&captures[1]),
        });
    }
    None
}

fn split_types(bracket_content: &str) -> Vec<String> {
    split_top_level(bracket_content, ',')
        .into_iter()
        .filter(|part| !part.is_empty())
        .map(|part| part.to_string())
        .collect()
}
