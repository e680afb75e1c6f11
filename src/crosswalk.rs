//! Per-method comparison of the declared signature against the
//! documented one, producing a verdict with its drift reasons.

use crate::core::{
    DocSignature, DocType, MethodIdentity, MethodSignature, Mismatch, TypeExpr, Verdict,
    VerifiedMethod,
};
use crate::equivalence::{equivalent, CheckPolicy};
use log::debug;
use std::collections::HashSet;

/// Compare one method's two signatures.
///
/// The return types are compared first, then the parameter identifier
/// sets, then each shared parameter's type. A parameter-set discrepancy
/// short-circuits the per-parameter comparisons. With no declared
/// signature at all, the exemption policy decides wholesale.
pub fn crosswalk(
    identity: MethodIdentity,
    declared: Option<&MethodSignature>,
    documented: &DocSignature,
    policy: &CheckPolicy,
) -> VerifiedMethod {
    let Some(declared) = declared else {
        if policy.pass_without_declared {
            return VerifiedMethod {
                identity,
                verdict: Verdict::Pass,
                mismatches: Vec::new(),
            };
        }
        // strict mode treats a missing signature as an empty one
        let empty = MethodSignature {
            params: Default::default(),
            returns: None,
        };
        return crosswalk(identity, Some(&empty), documented, policy);
    };

    let mut mismatches = Vec::new();

    let (doc_return, doc_return_failure) = split_doc_type(documented.returns.as_ref());
    // an unparseable documented return only counts once the declared
    // side actually constrains it; absence rules take priority
    let returns_ok = match declared.returns.as_ref() {
        None => equivalent(None, doc_return, policy),
        Some(_) if doc_return_failure.is_some() => false,
        Some(declared_return) => equivalent(Some(declared_return), doc_return, policy),
    };
    if !returns_ok {
        debug!("{}: returns mismatch", identity.title());
        mismatches.push(Mismatch::Return {
            unparseable: declared.returns.as_ref().and(doc_return_failure),
        });
    }

    let declared_keys: HashSet<&str> = declared.params.names().collect();
    let documented_keys: HashSet<&str> = documented.params.names().collect();
    if declared_keys != documented_keys {
        debug!("{}: parameter keys mismatch", identity.title());
        mismatches.push(Mismatch::ParameterSet);
    } else {
        for (name, declared_type) in declared.params.iter() {
            let (doc_type, doc_failure) = split_doc_type(documented.params.get(name));
            let ok =
                doc_failure.is_none() && equivalent(Some(declared_type), doc_type, policy);
            if !ok {
                debug!("{}: parameter {name} mismatch", identity.title());
                mismatches.push(Mismatch::ParameterType {
                    name: name.to_string(),
                    unparseable: doc_failure,
                });
            }
        }
    }

    let verdict = if mismatches.is_empty() {
        Verdict::Pass
    } else {
        Verdict::Fail
    };
    VerifiedMethod {
        identity,
        verdict,
        mismatches,
    }
}

/// Separate a documented entry into a comparable expression and, for
/// conversion failures, the raw text to surface in the report
fn split_doc_type(entry: Option<&DocType>) -> (Option<&TypeExpr>, Option<String>) {
    match entry {
        None => (None, None),
        Some(DocType::Known(expr)) => (Some(expr), None),
        Some(DocType::Unparseable(text)) => (None, Some(text.clone())),
    }
}
