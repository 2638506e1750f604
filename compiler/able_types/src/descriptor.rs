//! Type descriptors of runtime values.

use std::fmt;

use crate::{Name, TypeExpr};

/// The nominal type of a runtime value: a name plus its type arguments.
///
/// Derived on demand from a value and never stored in the registry.
/// Uninstantiated containers carry `Wildcard` arguments, or none at all.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    pub name: Name,
    pub type_args: Vec<TypeExpr>,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<Name>, type_args: Vec<TypeExpr>) -> Self {
        TypeDescriptor {
            name: name.into(),
            type_args,
        }
    }

    /// Descriptor with no type arguments.
    pub fn simple(name: impl Into<Name>) -> Self {
        Self::new(name, Vec::new())
    }

    /// Builds a descriptor from a simple or applied type expression.
    ///
    /// Returns `None` for shapes with no nominal head (wrappers, unions,
    /// function types, wildcards).
    pub fn from_type_expr(expr: &TypeExpr) -> Option<Self> {
        let name = expr.head_name()?;
        Some(TypeDescriptor {
            name: name.clone(),
            type_args: expr.type_args().to_vec(),
        })
    }

    /// The type expression a template is matched against.
    pub fn to_type_expr(&self) -> TypeExpr {
        TypeExpr::generic(self.name.clone(), self.type_args.clone())
    }

    #[inline]
    pub fn is_generic(&self) -> bool {
        !self.type_args.is_empty()
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_type_expr(), f)
    }
}
