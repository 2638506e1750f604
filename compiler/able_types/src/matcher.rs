//! Template matcher.
//!
//! Unifies a declared impl template against the type of a concrete value,
//! binding generic placeholders along the way. Failure is a plain `false`;
//! the binding map may hold partial results afterwards and callers discard it.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{ensure_sufficient_stack, Name, TypeExpr};

/// Generic parameter name to the type it was bound to.
pub type Bindings = FxHashMap<Name, TypeExpr>;

/// The set of names treated as generic placeholders during a match.
pub type GenericNames = FxHashSet<Name>;

/// Match `template` against `actual`, extending `bindings`.
///
/// A generic name binds on first occurrence; every later occurrence must
/// agree with that binding. Missing type arguments on `actual` are treated as
/// wildcards so an uninstantiated container still matches `Array<T>`.
pub fn match_template(
    template: &TypeExpr,
    actual: &TypeExpr,
    generics: &GenericNames,
    bindings: &mut Bindings,
) -> bool {
    ensure_sufficient_stack(|| match_inner(template, actual, generics, bindings))
}

fn match_inner(
    template: &TypeExpr,
    actual: &TypeExpr,
    generics: &GenericNames,
    bindings: &mut Bindings,
) -> bool {
    match template {
        TypeExpr::Wildcard => true,
        TypeExpr::Simple(name) if generics.contains(name) => {
            if let Some(existing) = bindings.get(name) {
                return existing.agrees_with(actual);
            }
            bindings.insert(name.clone(), actual.clone());
            true
        }
        _ if actual.is_wildcard() => true,
        TypeExpr::Simple(name) => matches!(actual, TypeExpr::Simple(other) if other == name),
        TypeExpr::Generic { base, args } => match actual {
            TypeExpr::Generic {
                base: actual_base,
                args: actual_args,
            } => {
                if actual_args.len() > args.len()
                    || !match_template(base, actual_base, generics, bindings)
                {
                    return false;
                }
                let wildcard = TypeExpr::Wildcard;
                args.iter().enumerate().all(|(i, arg)| {
                    let actual_arg = actual_args.get(i).unwrap_or(&wildcard);
                    match_template(arg, actual_arg, generics, bindings)
                })
            }
            TypeExpr::Simple(_) => {
                match_template(base, actual, generics, bindings)
                    && args
                        .iter()
                        .all(|arg| match_template(arg, &TypeExpr::Wildcard, generics, bindings))
            }
            _ => false,
        },
        TypeExpr::Nullable(inner) => match actual {
            TypeExpr::Nullable(actual_inner) => {
                match_template(inner, actual_inner, generics, bindings)
            }
            _ => false,
        },
        TypeExpr::Result(inner) => match actual {
            TypeExpr::Result(actual_inner) => match_template(inner, actual_inner, generics, bindings),
            _ => false,
        },
        TypeExpr::Union(members) => match actual {
            TypeExpr::Union(actual_members) if actual_members.len() == members.len() => members
                .iter()
                .zip(actual_members)
                .all(|(m, a)| match_template(m, a, generics, bindings)),
            _ => false,
        },
        TypeExpr::Function { params, ret } => match actual {
            TypeExpr::Function {
                params: actual_params,
                ret: actual_ret,
            } if actual_params.len() == params.len() => {
                params
                    .iter()
                    .zip(actual_params)
                    .all(|(p, a)| match_template(p, a, generics, bindings))
                    && match_template(ret, actual_ret, generics, bindings)
            }
            _ => false,
        },
    }
}

/// Whether `actual` is an instance of `template`, with no generic names.
pub fn type_expr_matches(template: &TypeExpr, actual: &TypeExpr) -> bool {
    match_template(template, actual, &GenericNames::default(), &mut Bindings::default())
}
