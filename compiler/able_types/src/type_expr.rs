//! Type expressions.
//!
//! `TypeExpr` is the single representation used for impl templates, interface
//! references, constraint bounds, and the descriptors of concrete runtime
//! values. Equality is structural and recurses member-wise.

use std::fmt;

use crate::{Bindings, GenericNames, Name};

/// A type expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeExpr {
    /// A named type or generic placeholder: `i32`, `Point`, `T`.
    Simple(Name),
    /// An applied generic type: `Wrap<T>`, `Map<String, V>`.
    Generic {
        base: Box<TypeExpr>,
        args: Vec<TypeExpr>,
    },
    /// `T?`
    Nullable(Box<TypeExpr>),
    /// `!T`
    Result(Box<TypeExpr>),
    /// `A | B | C`
    Union(Vec<TypeExpr>),
    /// `fn(A, B) -> R`
    Function {
        params: Vec<TypeExpr>,
        ret: Box<TypeExpr>,
    },
    /// `_`: unifies with anything.
    Wildcard,
}

impl TypeExpr {
    #[inline]
    pub fn simple(name: impl Into<Name>) -> Self {
        TypeExpr::Simple(name.into())
    }

    /// `base<args...>`; with no arguments this collapses to `Simple(base)`.
    pub fn generic(base: impl Into<Name>, args: Vec<TypeExpr>) -> Self {
        let base = TypeExpr::Simple(base.into());
        if args.is_empty() {
            return base;
        }
        TypeExpr::Generic {
            base: Box::new(base),
            args,
        }
    }

    #[inline]
    pub fn nullable(inner: TypeExpr) -> Self {
        TypeExpr::Nullable(Box::new(inner))
    }

    #[inline]
    pub fn result(inner: TypeExpr) -> Self {
        TypeExpr::Result(Box::new(inner))
    }

    #[inline]
    pub fn union(members: Vec<TypeExpr>) -> Self {
        TypeExpr::Union(members)
    }

    #[inline]
    pub fn function(params: Vec<TypeExpr>, ret: TypeExpr) -> Self {
        TypeExpr::Function {
            params,
            ret: Box::new(ret),
        }
    }

    /// The head name of a simple or applied type.
    ///
    /// Returns `None` for wrappers, unions, functions, and wildcards, which
    /// have no single nominal head.
    pub fn head_name(&self) -> Option<&Name> {
        match self {
            TypeExpr::Simple(name) => Some(name),
            TypeExpr::Generic { base, .. } => base.head_name(),
            _ => None,
        }
    }

    /// Type arguments of an applied type (empty for everything else).
    pub fn type_args(&self) -> &[TypeExpr] {
        match self {
            TypeExpr::Generic { args, .. } => args,
            _ => &[],
        }
    }

    #[inline]
    pub fn is_wildcard(&self) -> bool {
        matches!(self, TypeExpr::Wildcard)
    }

    /// Whether any generic name from `generics` occurs in this expression.
    pub fn uses_generics(&self, generics: &GenericNames) -> bool {
        match self {
            TypeExpr::Simple(name) => generics.contains(name),
            TypeExpr::Generic { base, args } => {
                base.uses_generics(generics) || args.iter().any(|a| a.uses_generics(generics))
            }
            TypeExpr::Nullable(inner) | TypeExpr::Result(inner) => inner.uses_generics(generics),
            TypeExpr::Union(members) => members.iter().any(|m| m.uses_generics(generics)),
            TypeExpr::Function { params, ret } => {
                ret.uses_generics(generics) || params.iter().any(|p| p.uses_generics(generics))
            }
            TypeExpr::Wildcard => false,
        }
    }

    /// Replace bound generic names with their bindings.
    #[must_use]
    pub fn substitute(&self, bindings: &Bindings) -> TypeExpr {
        match self {
            TypeExpr::Simple(name) => bindings
                .get(name)
                .cloned()
                .unwrap_or_else(|| self.clone()),
            TypeExpr::Generic { base, args } => TypeExpr::Generic {
                base: Box::new(base.substitute(bindings)),
                args: args.iter().map(|a| a.substitute(bindings)).collect(),
            },
            TypeExpr::Nullable(inner) => TypeExpr::nullable(inner.substitute(bindings)),
            TypeExpr::Result(inner) => TypeExpr::result(inner.substitute(bindings)),
            TypeExpr::Union(members) => {
                TypeExpr::Union(members.iter().map(|m| m.substitute(bindings)).collect())
            }
            TypeExpr::Function { params, ret } => TypeExpr::Function {
                params: params.iter().map(|p| p.substitute(bindings)).collect(),
                ret: Box::new(ret.substitute(bindings)),
            },
            TypeExpr::Wildcard => TypeExpr::Wildcard,
        }
    }

    /// Structural agreement where a wildcard on either side is a hole.
    ///
    /// Used when a generic name is bound twice: the second occurrence must
    /// agree with the first, but an uninstantiated argument (`_`) agrees with
    /// everything.
    pub fn agrees_with(&self, other: &TypeExpr) -> bool {
        match (self, other) {
            (TypeExpr::Wildcard, _) | (_, TypeExpr::Wildcard) => true,
            (TypeExpr::Simple(a), TypeExpr::Simple(b)) => a == b,
            (
                TypeExpr::Generic { base: ab, args: aa },
                TypeExpr::Generic { base: bb, args: ba },
            ) => ab.agrees_with(bb) && all_agree(aa, ba),
            (TypeExpr::Nullable(a), TypeExpr::Nullable(b))
            | (TypeExpr::Result(a), TypeExpr::Result(b)) => a.agrees_with(b),
            (TypeExpr::Union(a), TypeExpr::Union(b)) => all_agree(a, b),
            (
                TypeExpr::Function { params: ap, ret: ar },
                TypeExpr::Function { params: bp, ret: br },
            ) => ar.agrees_with(br) && all_agree(ap, bp),
            _ => false,
        }
    }
}

fn all_agree(a: &[TypeExpr], b: &[TypeExpr]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.agrees_with(y))
}

impl From<Name> for TypeExpr {
    fn from(name: Name) -> Self {
        TypeExpr::Simple(name)
    }
}

impl From<&str> for TypeExpr {
    fn from(name: &str) -> Self {
        TypeExpr::Simple(Name::new(name))
    }
}

/// Renders the signature form used in registry keys and diagnostics.
impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Simple(name) => write!(f, "{name}"),
            TypeExpr::Generic { base, args } => {
                write!(f, "{base}<")?;
                write_joined(f, args, ", ")?;
                f.write_str(">")
            }
            TypeExpr::Nullable(inner) => write!(f, "{inner}?"),
            TypeExpr::Result(inner) => write!(f, "!{inner}"),
            TypeExpr::Union(members) => write_joined(f, members, " | "),
            TypeExpr::Function { params, ret } => {
                f.write_str("fn(")?;
                write_joined(f, params, ", ")?;
                write!(f, ") -> {ret}")
            }
            TypeExpr::Wildcard => f.write_str("_"),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[TypeExpr], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests;
