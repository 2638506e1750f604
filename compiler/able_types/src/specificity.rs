//! Template concreteness.

use crate::{GenericNames, TypeExpr};

/// How concrete a template is: the number of non-generic names it mentions.
///
/// Generic placeholders and wildcards count zero, a concrete simple name
/// counts one, and every compound shape sums its parts. `Wrap<T>` scores 1,
/// `Wrap<i32>` scores 2, `Map<String, V>?` scores 2.
pub fn concreteness(template: &TypeExpr, generics: &GenericNames) -> u32 {
    match template {
        TypeExpr::Simple(name) => u32::from(!generics.contains(name)),
        TypeExpr::Generic { base, args } => {
            let args: u32 = args.iter().map(|a| concreteness(a, generics)).sum();
            concreteness(base, generics) + args
        }
        TypeExpr::Nullable(inner) | TypeExpr::Result(inner) => concreteness(inner, generics),
        TypeExpr::Union(members) => members.iter().map(|m| concreteness(m, generics)).sum(),
        TypeExpr::Function { params, ret } => {
            let params: u32 = params.iter().map(|p| concreteness(p, generics)).sum();
            concreteness(ret, generics) + params
        }
        TypeExpr::Wildcard => 0,
    }
}
