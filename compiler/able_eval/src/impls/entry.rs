//! Registered impl entries and the per-type slots that reference them.

use std::fmt::Write as _;
use std::sync::Arc;

use able_types::{GenericNames, Name, TypeExpr};
use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};

use super::ConstraintSpec;
use crate::interface::InterfaceTable;
use crate::Callable;

/// One registered implementation.
///
/// A union-target impl is a single entry shared by every member's slot, so
/// one method table serves all of them. The table only grows after
/// registration, when an interface default is first used.
#[derive(Debug)]
pub struct ImplEntry {
    pub interface: Name,
    pub interface_args: Vec<TypeExpr>,
    pub impl_name: Option<Name>,
    /// The target as declared, used in diagnostics.
    pub target: TypeExpr,
    pub declared_params: Vec<Name>,
    pub generic_names: GenericNames,
    pub constraints: Vec<ConstraintSpec>,
    /// Sorted signatures of every member when the target was a union.
    pub union_signatures: Vec<String>,
    /// No explicit methods: everything comes from interface defaults.
    pub default_only: bool,
    explicit: FxHashSet<Name>,
    methods: RwLock<FxHashMap<Name, Callable>>,
}

impl ImplEntry {
    #[allow(clippy::too_many_arguments, reason = "one argument per declaration field")]
    pub(crate) fn new(
        interface: Name,
        interface_args: Vec<TypeExpr>,
        impl_name: Option<Name>,
        target: TypeExpr,
        declared_params: Vec<Name>,
        generic_names: GenericNames,
        constraints: Vec<ConstraintSpec>,
        union_signatures: Vec<String>,
        methods: FxHashMap<Name, Callable>,
    ) -> Self {
        let explicit: FxHashSet<Name> = methods.keys().cloned().collect();
        ImplEntry {
            interface,
            interface_args,
            impl_name,
            target,
            declared_params,
            generic_names,
            constraints,
            union_signatures,
            default_only: explicit.is_empty(),
            explicit,
            methods: RwLock::new(methods),
        }
    }

    /// Whether the impl body itself defines `method`.
    pub fn defines_method(&self, method: &str) -> bool {
        self.explicit.contains(method)
    }

    /// The current table entry for `method`, without consulting defaults.
    pub fn method(&self, method: &str) -> Option<Callable> {
        self.methods.read().get(method).cloned()
    }

    /// Whether `method` is available, directly or as an interface default.
    pub fn provides_method(&self, method: &str, interfaces: &InterfaceTable) -> bool {
        self.methods.read().contains_key(method)
            || interfaces.default_method(&self.interface, method).is_some()
    }

    /// `method` from the table, materializing the interface default on
    /// first use. Concurrent first uses insert the same body once.
    pub fn method_or_default(&self, method: &Name, interfaces: &InterfaceTable) -> Option<Callable> {
        if let Some(found) = self.method(method) {
            return Some(found);
        }
        let default = interfaces.default_method(&self.interface, method)?;
        let mut table = self.methods.write();
        let callable = table
            .entry(method.clone())
            .or_insert_with(|| {
                tracing::debug!(
                    interface = %self.interface,
                    target = %self.target,
                    method = %method,
                    "materialized interface default"
                );
                Callable::Single(Arc::clone(default))
            })
            .clone();
        Some(callable)
    }

    /// Names currently in the method table, sorted.
    pub fn method_names(&self) -> Vec<Name> {
        let mut names: Vec<Name> = self.methods.read().keys().cloned().collect();
        names.sort();
        names
    }

    #[inline]
    pub fn is_union(&self) -> bool {
        !self.union_signatures.is_empty()
    }

    /// Whether `param` only occurs in the interface arguments, where no
    /// receiver can bind it.
    pub(crate) fn param_bound_by_interface(&self, param: &Name) -> bool {
        let lookup: GenericNames = std::iter::once(param.clone()).collect();
        !self.target.uses_generics(&lookup)
            && self.interface_args.iter().any(|arg| arg.uses_generics(&lookup))
    }

    /// `impl I for T`, with the where-clause when there is one.
    pub fn description(&self) -> String {
        let mut out = format!("impl {}", self.interface);
        if !self.interface_args.is_empty() {
            let args: Vec<String> = self.interface_args.iter().map(ToString::to_string).collect();
            let _ = write!(out, "<{}>", args.join(", "));
        }
        let _ = write!(out, " for {}", self.target);
        if !self.constraints.is_empty() {
            let bounds: Vec<String> = self
                .constraints
                .iter()
                .map(|c| format!("{}: {}", c.type_param, c.interface))
                .collect();
            let _ = write!(out, " where {}", bounds.join(", "));
        }
        out
    }
}

/// One concrete member of an impl target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImplVariant {
    /// Bucket name; `None` for a blanket impl over a bare generic.
    pub type_name: Option<Name>,
    /// `Point`, `Wrap<T>`, or the bare `T` of a blanket impl.
    pub template: TypeExpr,
    pub signature: String,
}

impl ImplVariant {
    /// Whether matching has to unify the template at all. A plain concrete
    /// name matches every value whose type has that name.
    pub fn needs_match(&self) -> bool {
        self.type_name.is_none() || !self.template.type_args().is_empty()
    }
}

/// An entry as seen from one registry bucket.
#[derive(Clone, Debug)]
pub struct ImplSlot {
    pub entry: Arc<ImplEntry>,
    pub variant: ImplVariant,
}
