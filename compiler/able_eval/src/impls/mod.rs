//! Implementation registry, candidate collection, and selection.
//!
//! An `impl` declaration is registered once at load time and expanded into
//! one slot per concrete target type. Lookups walk the slots for a receiver's
//! type name (plus blanket impls), keep those whose template matches and
//! whose constraints hold, and rank the survivors by specificity.

mod candidates;
mod entry;
mod registry;
mod select;

pub use candidates::{ImplCandidate, ImplMatch, MethodMatch};
pub use entry::{ImplEntry, ImplSlot, ImplVariant};
pub use registry::ImplRegistry;
pub use select::{compare_candidates, select, Selection};

use able_types::{Name, TypeExpr};

use crate::Function;

/// A generic parameter with its inline bounds: `T: Show + Eq`.
#[derive(Clone, Debug, PartialEq)]
pub struct GenericParam {
    pub name: Name,
    pub bounds: Vec<TypeExpr>,
}

/// One `param: Interface` requirement, from a bound or a where-clause.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConstraintSpec {
    pub type_param: Name,
    pub interface: TypeExpr,
}

impl ConstraintSpec {
    pub fn new(type_param: impl Into<Name>, interface: impl Into<TypeExpr>) -> Self {
        ConstraintSpec {
            type_param: type_param.into(),
            interface: interface.into(),
        }
    }
}

/// An impl declaration as handed over by the module loader.
#[derive(Debug)]
pub struct ImplDecl {
    pub interface: Name,
    /// Arguments of a generic interface: the `i32` in `impl Into<i32> for T`.
    pub interface_args: Vec<TypeExpr>,
    pub target: TypeExpr,
    pub generic_params: Vec<GenericParam>,
    pub where_clause: Vec<ConstraintSpec>,
    pub methods: Vec<Function>,
    /// Set for `impl Name = Interface for T`.
    pub impl_name: Option<Name>,
}

impl ImplDecl {
    pub fn new(interface: impl Into<Name>, target: impl Into<TypeExpr>) -> Self {
        ImplDecl {
            interface: interface.into(),
            interface_args: Vec::new(),
            target: target.into(),
            generic_params: Vec::new(),
            where_clause: Vec::new(),
            methods: Vec::new(),
            impl_name: None,
        }
    }

    #[must_use]
    pub fn interface_arg(mut self, arg: impl Into<TypeExpr>) -> Self {
        self.interface_args.push(arg.into());
        self
    }

    /// Declare an unbounded generic parameter.
    #[must_use]
    pub fn generic(mut self, name: impl Into<Name>) -> Self {
        self.generic_params.push(GenericParam {
            name: name.into(),
            bounds: Vec::new(),
        });
        self
    }

    /// Declare a generic parameter bounded by `interface`.
    #[must_use]
    pub fn bounded(mut self, name: impl Into<Name>, interface: impl Into<TypeExpr>) -> Self {
        let name = name.into();
        let bound = interface.into();
        match self.generic_params.iter_mut().find(|p| p.name == name) {
            Some(param) => param.bounds.push(bound),
            None => self.generic_params.push(GenericParam {
                name,
                bounds: vec![bound],
            }),
        }
        self
    }

    #[must_use]
    pub fn where_bound(mut self, param: impl Into<Name>, interface: impl Into<TypeExpr>) -> Self {
        self.where_clause.push(ConstraintSpec::new(param, interface));
        self
    }

    #[must_use]
    pub fn method(mut self, method: Function) -> Self {
        self.methods.push(method);
        self
    }

    #[must_use]
    pub fn named(mut self, impl_name: impl Into<Name>) -> Self {
        self.impl_name = Some(impl_name.into());
        self
    }

    /// Bounds and where-clauses flattened into one list.
    pub fn constraints(&self) -> Vec<ConstraintSpec> {
        let inline = self.generic_params.iter().flat_map(|param| {
            param
                .bounds
                .iter()
                .map(|bound| ConstraintSpec::new(param.name.clone(), bound.clone()))
        });
        inline.chain(self.where_clause.iter().cloned()).collect()
    }
}

/// Order-independent signature of a constraint list, `<none>` when empty.
pub(crate) fn constraint_signature(constraints: &[ConstraintSpec]) -> String {
    if constraints.is_empty() {
        return "<none>".to_string();
    }
    let mut parts: Vec<String> = constraints
        .iter()
        .map(|c| format!("{}->{}", c.type_param, c.interface))
        .collect();
    parts.sort();
    parts.dedup();
    parts.join("&")
}
