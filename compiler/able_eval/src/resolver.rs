//! Method resolution.
//!
//! # Resolution Order
//!
//! A call `receiver.method(...)` is resolved by the first stage that
//! produces a callable:
//! 1. The active method-set context, when its target accepts the receiver
//! 2. Inherent methods of the receiver's type, when visible from the scope
//! 3. The impl pool, ranked by specificity, when the winning method takes
//!    the receiver as `self`
//! 4. A scope-level function whose first parameter accepts the receiver
//!
//! A [`Resolver`] borrows the registries for the duration of one lookup and
//! never runs a callable itself.

use std::cell::RefCell;
use std::sync::Arc;

use able_types::{Bindings, Name, TypeDescriptor};
use rustc_hash::FxHashSet;

use crate::config::ResolverConfig;
use crate::errors::{private_method, ResolveResult};
use crate::impls::{ImplEntry, ImplRegistry};
use crate::inherent::InherentMethods;
use crate::interface::InterfaceTable;
use crate::scope::Scope;
use crate::{Callable, Function, Value};

/// Where a resolved method came from.
#[derive(Clone, Debug)]
pub enum MethodSource {
    /// The enclosing `methods`/`impl` block being evaluated.
    MethodSet,
    /// A method declared directly on the receiver's type.
    Inherent,
    /// A registered impl, with the bindings of its generic parameters.
    Impl {
        entry: Arc<ImplEntry>,
        bindings: Bindings,
    },
    /// A free function called with method syntax.
    ScopeFunction,
}

/// A callable picked for a receiver, not yet bound to it.
#[derive(Clone, Debug)]
pub struct ResolvedMethod {
    pub callable: Callable,
    pub source: MethodSource,
}

/// Read-only view of the registries for one resolution.
pub(crate) struct Resolver<'a> {
    pub(crate) interfaces: &'a InterfaceTable,
    pub(crate) impls: &'a ImplRegistry,
    pub(crate) inherent: &'a InherentMethods,
    pub(crate) config: &'a ResolverConfig,
    /// `Interface::Type` goals currently being proven.
    pub(crate) active: RefCell<FxHashSet<String>>,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(
        interfaces: &'a InterfaceTable,
        impls: &'a ImplRegistry,
        inherent: &'a InherentMethods,
        config: &'a ResolverConfig,
    ) -> Self {
        Resolver {
            interfaces,
            impls,
            inherent,
            config,
            active: RefCell::new(FxHashSet::default()),
        }
    }

    /// Find `method` for `receiver`, or `None` when no stage has it.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(method = %method, receiver = %receiver.type_label())
    )]
    pub(crate) fn lookup_method(
        &self,
        receiver: &Value,
        method: &Name,
        interface: Option<&Name>,
        scope: &Scope,
    ) -> ResolveResult<Option<ResolvedMethod>> {
        if let Some(found) = self.from_method_set(receiver, method, interface, scope)? {
            return Ok(Some(found));
        }

        let descriptor = receiver.descriptor();
        if let Some(descriptor) = &descriptor {
            if let Some(found) = self.from_inherent(receiver, descriptor, method, scope)? {
                return Ok(Some(found));
            }
            if let Some(found) = self.find_method(descriptor, method, interface)? {
                // Static functions and overloads whose `self` rejects the
                // receiver are not methods of this value.
                if let Some(callable) = self.select_ufcs(&found.callable, receiver, true) {
                    tracing::debug!(candidate = %found.entry.description(), "resolved from impl");
                    return Ok(Some(ResolvedMethod {
                        callable,
                        source: MethodSource::Impl {
                            entry: found.entry,
                            bindings: found.bindings,
                        },
                    }));
                }
            }
        }

        Ok(self.from_scope_function(receiver, method, scope))
    }

    fn from_method_set(
        &self,
        receiver: &Value,
        method: &Name,
        interface: Option<&Name>,
        scope: &Scope,
    ) -> ResolveResult<Option<ResolvedMethod>> {
        let Some(context) = scope.method_set() else {
            return Ok(None);
        };
        if !context.accepts_filter(interface) || !self.value_matches_type(&context.target, receiver) {
            return Ok(None);
        }
        let Some(callable) = context.methods.get(method) else {
            return Ok(None);
        };
        let Some(callable) = self.select_ufcs(callable, receiver, true) else {
            return Ok(None);
        };
        if callable.is_private() {
            return Err(private_method(method, context.owner_label()));
        }
        Ok(Some(ResolvedMethod {
            callable,
            source: MethodSource::MethodSet,
        }))
    }

    fn from_inherent(
        &self,
        receiver: &Value,
        descriptor: &TypeDescriptor,
        method: &Name,
        scope: &Scope,
    ) -> ResolveResult<Option<ResolvedMethod>> {
        let Some(callable) = self.inherent.get(&descriptor.name, method) else {
            return Ok(None);
        };
        let visible = scope.lookup_callable(method).is_some()
            || scope.has(&descriptor.name)
            || receiver.is_primitive();
        if !visible {
            return Ok(None);
        }
        let Some(callable) = self.select_ufcs(callable, receiver, true) else {
            return Ok(None);
        };
        if callable.is_private() {
            return Err(private_method(method, descriptor));
        }
        Ok(Some(ResolvedMethod {
            callable,
            source: MethodSource::Inherent,
        }))
    }

    /// Uniform call syntax: `x.f()` as `f(x)`. Type-qualified functions
    /// (`fn Point.origin`) never take part.
    fn from_scope_function(
        &self,
        receiver: &Value,
        method: &Name,
        scope: &Scope,
    ) -> Option<ResolvedMethod> {
        let callable = scope.lookup_callable(method)?;
        let eligible = Callable::from_overloads(
            callable
                .functions()
                .iter()
                .filter(|f| !f.type_qualified)
                .cloned()
                .collect(),
        )?;
        let callable = self.select_ufcs(&eligible, receiver, false)?;
        Some(ResolvedMethod {
            callable,
            source: MethodSource::ScopeFunction,
        })
    }

    /// The overloads of `callable` whose receiver position accepts
    /// `receiver`. When several remain, those declared for exactly the
    /// receiver's type win.
    pub(crate) fn select_ufcs(
        &self,
        callable: &Callable,
        receiver: &Value,
        require_self: bool,
    ) -> Option<Callable> {
        let mut matching: Vec<Arc<Function>> = callable
            .functions()
            .iter()
            .filter(|f| !require_self || f.expects_self())
            .filter(|f| self.first_param_matches(f, receiver))
            .cloned()
            .collect();
        if matching.len() > 1 {
            if let Some(receiver_type) = receiver.descriptor().map(|d| d.to_type_expr()) {
                let exact: Vec<Arc<Function>> = matching
                    .iter()
                    .filter(|f| f.first_param_type() == Some(&receiver_type))
                    .cloned()
                    .collect();
                if !exact.is_empty() {
                    matching = exact;
                }
            }
        }
        Callable::from_overloads(matching)
    }

    fn first_param_matches(&self, function: &Function, receiver: &Value) -> bool {
        if function.is_method_shorthand {
            return true;
        }
        let Some(first) = function.params.first() else {
            return false;
        };
        match &first.ty {
            None => true,
            Some(ty) => self.value_matches_type(ty, receiver),
        }
    }

    /// `filter`, its transitive bases, then every interface extending it.
    pub(crate) fn related_interfaces(&self, filter: &Name) -> Vec<Name> {
        let mut related = self.interfaces.search_names(filter);
        let mut extending: Vec<Name> = self
            .interfaces
            .names()
            .filter(|name| **name != *filter && !related.contains(*name))
            .filter(|name| self.interfaces.search_names(name).contains(filter))
            .cloned()
            .collect();
        extending.sort();
        related.extend(extending);
        related
    }
}
