//! Interface satisfaction.
//!
//! A type satisfies an interface when it satisfies every base and every
//! signature the interface declares resolves for it. Marker interfaces (no
//! signatures, no bases) need an explicit impl.

use able_types::{ensure_sufficient_stack, Name, TypeDescriptor, TypeExpr};
use rustc_hash::FxHashSet;

use crate::errors::{
    missing_interface_method, missing_marker_impl, unknown_interface, ResolveResult,
};
use crate::interface::InterfaceDef;
use crate::resolver::Resolver;

/// Primitive type names with total equality, ordering, and hashing.
const COMPARABLE_PRIMITIVES: &[&str] = &[
    "String", "bool", "char", "i8", "i16", "i32", "i64", "i128", "u8", "u16", "u32", "u64",
    "u128",
];

/// Whether the primitive `type_name` provides `interface.method` natively.
pub fn primitive_implements(type_name: &str, interface: &str, method: &str) -> bool {
    let comparable = COMPARABLE_PRIMITIVES.contains(&type_name);
    let float = matches!(type_name, "f32" | "f64");
    match (interface, method) {
        ("Hash", "hash") | ("Eq", "eq" | "ne") | ("Ord", "cmp") => comparable,
        ("PartialEq", "eq" | "ne") | ("PartialOrd", "partial_cmp") | ("Clone", "clone") => {
            comparable || float
        }
        _ => false,
    }
}

impl Resolver<'_> {
    /// `Ok(())` when `descriptor` satisfies `interface`; otherwise the first
    /// reason it does not. `subject` names the constrained parameter in
    /// diagnostics.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(type_name = %descriptor, interface = %interface)
    )]
    pub(crate) fn ensure_satisfies(
        &self,
        descriptor: &TypeDescriptor,
        interface: &TypeExpr,
        subject: &Name,
    ) -> ResolveResult<()> {
        let mut visited = FxHashSet::default();
        self.ensure_satisfies_in(descriptor, interface, subject, &mut visited)
    }

    /// Boolean form of [`ensure_satisfies`](Self::ensure_satisfies). Only a
    /// failed requirement maps to `false`; unknown interfaces and ambiguous
    /// impls stay errors.
    pub(crate) fn satisfies(
        &self,
        descriptor: &TypeDescriptor,
        interface: &Name,
    ) -> ResolveResult<bool> {
        let expr = TypeExpr::Simple(interface.clone());
        match self.ensure_satisfies(descriptor, &expr, &descriptor.name) {
            Ok(()) => Ok(true),
            Err(err) if err.is_constraint_failure() => Ok(false),
            Err(err) => Err(err),
        }
    }

    fn ensure_satisfies_in(
        &self,
        descriptor: &TypeDescriptor,
        interface: &TypeExpr,
        subject: &Name,
        visited: &mut FxHashSet<Name>,
    ) -> ResolveResult<()> {
        let Some(name) = interface.head_name() else {
            return Ok(());
        };
        if !visited.insert(name.clone()) {
            return Ok(());
        }
        let Some(def) = self.interfaces.get(name) else {
            return Err(unknown_interface(name, subject));
        };

        // A goal that depends on itself is not proven by that dependency.
        let goal = format!("{name}::{descriptor}");
        if !self.active.borrow_mut().insert(goal.clone()) {
            return Err(missing_marker_impl(descriptor, name));
        }
        let result =
            ensure_sufficient_stack(|| self.check_interface(descriptor, def, subject, visited));
        self.active.borrow_mut().remove(&goal);
        result
    }

    fn check_interface(
        &self,
        descriptor: &TypeDescriptor,
        def: &InterfaceDef,
        subject: &Name,
        visited: &mut FxHashSet<Name>,
    ) -> ResolveResult<()> {
        for base in &def.base_interfaces {
            self.ensure_satisfies_in(descriptor, base, subject, visited)?;
        }
        if def.is_marker() {
            return match self.lookup_impl(descriptor, &def.name)? {
                Some(_) => Ok(()),
                None => Err(missing_marker_impl(descriptor, &def.name)),
            };
        }
        for signature in &def.signatures {
            if !self.type_has_method(descriptor, &signature.name, &def.name)? {
                return Err(missing_interface_method(descriptor, &def.name, &signature.name));
            }
        }
        Ok(())
    }

    /// Whether `method` of `interface` resolves for `descriptor`, through the
    /// primitive table, an inherent method, or an impl.
    ///
    /// A failed constraint on the impl side counts as "no method"; an
    /// ambiguous or private impl method is an error.
    pub(crate) fn type_has_method(
        &self,
        descriptor: &TypeDescriptor,
        method: &Name,
        interface: &Name,
    ) -> ResolveResult<bool> {
        if self.config.primitive_interfaces
            && primitive_implements(&descriptor.name, interface, method)
        {
            return Ok(true);
        }
        if self.inherent.has_method(&descriptor.name, method) {
            return Ok(true);
        }
        match self.find_method(descriptor, method, Some(interface)) {
            Ok(found) => Ok(found.is_some()),
            Err(err) if err.is_constraint_failure() => Ok(false),
            Err(err) => Err(err),
        }
    }
}
