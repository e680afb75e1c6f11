//! Equivalence rules between declared and documented type expressions.
//!
//! The relation is deliberately asymmetric: a missing declared type
//! exempts the pair (policy default), while a missing documented type
//! against a present declared one is drift.

use crate::core::TypeExpr;
use serde::{Deserialize, Serialize};

/// Knobs for the equivalence relation. Defaults reproduce the historic
/// checker behavior exactly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CheckPolicy {
    /// Methods with no declared type information pass unconditionally
    pub pass_without_declared: bool,
    /// Union member order is significant when comparing
    pub ordered_unions: bool,
}

impl Default for CheckPolicy {
    fn default() -> Self {
        Self {
            pass_without_declared: true,
            ordered_unions: true,
        }
    }
}

/// Decide whether a declared and a documented expression denote the
/// same type. Rules in priority order:
///
/// 1. declared absent: equivalent iff the exemption policy is on
/// 2. documented absent while declared present: not equivalent
/// 3. declared `Void`: equivalent iff documented is the `Void` atom
/// 4. otherwise exact structural equality, union order per policy
pub fn equivalent(
    declared: Option<&TypeExpr>,
    documented: Option<&TypeExpr>,
    policy: &CheckPolicy,
) -> bool {
    let Some(declared) = declared else {
        return policy.pass_without_declared;
    };
    let Some(documented) = documented else {
        return false;
    };
    if matches!(declared, TypeExpr::Void) {
        return matches!(documented, TypeExpr::Void);
    }
    structural_eq(declared, documented, policy)
}

fn structural_eq(a: &TypeExpr, b: &TypeExpr, policy: &CheckPolicy) -> bool {
    match (a, b) {
        (TypeExpr::Simple(x), TypeExpr::Simple(y)) => x == y,
        (TypeExpr::Array(x), TypeExpr::Array(y)) => structural_eq(x, y, policy),
        (TypeExpr::Map(xk, xv), TypeExpr::Map(yk, yv)) => {
            structural_eq(xk, yk, policy) && structural_eq(xv, yv, policy)
        }
        (TypeExpr::Union(xs), TypeExpr::Union(ys)) => {
            if xs.len() != ys.len() {
                return false;
            }
            if policy.ordered_unions {
                xs.iter()
                    .zip(ys.iter())
                    .all(|(x, y)| structural_eq(x, y, policy))
            } else {
                unions_match_unordered(xs, ys, policy)
            }
        }
        (TypeExpr::Void, TypeExpr::Void) => true,
        (TypeExpr::Untyped, TypeExpr::Untyped) => true,
        _ => false,
    }
}

/// Equal-length multiset match: every left member consumes exactly one
/// structurally equal right member
fn unions_match_unordered(xs: &[TypeExpr], ys: &[TypeExpr], policy: &CheckPolicy) -> bool {
    let mut used = vec![false; ys.len()];
    'outer: for x in xs {
        for (idx, y) in ys.iter().enumerate() {
            if !used[idx] && structural_eq(x, y, policy) {
                used[idx] = true;
                continue 'outer;
            }
        }
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::parse_tag_type;

    fn default_policy() -> CheckPolicy {
        CheckPolicy::default()
    }

    #[test]
    fn absent_declared_is_exempt() {
        let policy = default_policy();
        assert!(equivalent(None, Some(&TypeExpr::simple("Integer")), &policy));
        assert!(equivalent(None, None, &policy));
    }

    #[test]
    fn strict_policy_fails_absent_declared() {
        let policy = CheckPolicy {
            pass_without_declared: false,
            ..default_policy()
        };
        assert!(!equivalent(None, Some(&TypeExpr::simple("Integer")), &policy));
    }

    #[test]
    fn absent_documented_fails_against_present_declared() {
        let policy = default_policy();
        assert!(!equivalent(Some(&TypeExpr::simple("Integer")), None, &policy));
    }

    #[test]
    fn void_round_trip() {
        let policy = default_policy();
        let void_doc = parse_tag_type("void").unwrap();
        let untyped_doc = parse_tag_type("untyped").unwrap();
        assert!(equivalent(Some(&TypeExpr::Void), Some(&void_doc), &policy));
        assert!(!equivalent(Some(&TypeExpr::Void), Some(&untyped_doc), &policy));
    }

    #[test]
    fn composites_compare_structurally() {
        let policy = default_policy();
        let declared = TypeExpr::array(TypeExpr::simple("Integer"));
        let documented = parse_tag_type("Array<Integer>").unwrap();
        assert!(equivalent(Some(&declared), Some(&documented), &policy));

        let declared = TypeExpr::map(TypeExpr::simple("String"), TypeExpr::simple("Integer"));
        let documented = parse_tag_type("Hash<String,Integer>").unwrap();
        assert!(equivalent(Some(&declared), Some(&documented), &policy));
    }

    #[test]
    fn no_case_insensitivity_or_coercion() {
        let policy = default_policy();
        assert!(!equivalent(
            Some(&TypeExpr::simple("Integer")),
            Some(&TypeExpr::simple("integer")),
            &policy
        ));
        assert!(!equivalent(
            Some(&TypeExpr::Untyped),
            Some(&TypeExpr::simple("Integer")),
            &policy
        ));
    }

    #[test]
    fn union_order_significant_by_default() {
        let policy = default_policy();
        let declared = TypeExpr::Union(vec![TypeExpr::simple("Integer"), TypeExpr::nil()]);
        let same_order = parse_tag_type("Integer, nil").unwrap();
        let reversed = parse_tag_type("nil, Integer").unwrap();
        assert!(equivalent(Some(&declared), Some(&same_order), &policy));
        assert!(!equivalent(Some(&declared), Some(&reversed), &policy));
    }

    #[test]
    fn unordered_union_toggle() {
        let policy = CheckPolicy {
            ordered_unions: false,
            ..default_policy()
        };
        let declared = TypeExpr::Union(vec![TypeExpr::simple("Integer"), TypeExpr::nil()]);
        let reversed = parse_tag_type("nil, Integer").unwrap();
        assert!(equivalent(Some(&declared), Some(&reversed), &policy));

        let repeated = TypeExpr::Union(vec![
            TypeExpr::simple("Integer"),
            TypeExpr::simple("Integer"),
        ]);
        assert!(!equivalent(Some(&declared), Some(&repeated), &policy));
    }
}
