//! Generic-name collection for impl declarations.

use crate::{GenericNames, Name, TypeExpr};

/// Collect implicit placeholders (`T`, `U`, ...) mentioned anywhere in `expr`.
pub fn collect_placeholders(expr: &TypeExpr, out: &mut GenericNames) {
    match expr {
        TypeExpr::Simple(name) => {
            if name.is_placeholder() {
                out.insert(name.clone());
            }
        }
        TypeExpr::Generic { base, args } => {
            collect_placeholders(base, out);
            for arg in args {
                collect_placeholders(arg, out);
            }
        }
        TypeExpr::Nullable(inner) | TypeExpr::Result(inner) => collect_placeholders(inner, out),
        TypeExpr::Union(members) => {
            for member in members {
                collect_placeholders(member, out);
            }
        }
        TypeExpr::Function { params, ret } => {
            for param in params {
                collect_placeholders(param, out);
            }
            collect_placeholders(ret, out);
        }
        TypeExpr::Wildcard => {}
    }
}

/// The full generic-name set of an impl: declared parameters plus any
/// placeholders used in its target or interface arguments.
pub fn impl_generic_names<'a>(
    declared: &[Name],
    templates: impl IntoIterator<Item = &'a TypeExpr>,
) -> GenericNames {
    let mut names: GenericNames = declared.iter().cloned().collect();
    for template in templates {
        collect_placeholders(template, &mut names);
    }
    names
}
