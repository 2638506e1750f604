//! The runtime facade: registries, configuration, and lookup entry points.

use std::sync::Arc;

use able_types::{Name, TypeDescriptor, TypeExpr};

use crate::config::{ResolverConfig, SpecificityWeights};
use crate::errors::{no_implementation, EvalResult, ResolveResult};
use crate::impls::{ImplDecl, ImplEntry, ImplMatch, ImplRegistry, MethodMatch};
use crate::inherent::InherentMethods;
use crate::interface::{InterfaceDef, InterfaceTable};
use crate::resolver::{ResolvedMethod, Resolver};
use crate::scope::Scope;
use crate::shared::SharedMutableRegistry;
use crate::{BoundMethod, Callable, Function, Value};

/// Everything registered at load time.
#[derive(Debug, Default)]
pub(crate) struct Registries {
    pub(crate) interfaces: InterfaceTable,
    pub(crate) impls: ImplRegistry,
    pub(crate) inherent: InherentMethods,
}

/// Owns the interface, impl, and inherent-method registries of one program.
///
/// Cloning is cheap and every clone shares the same registries, so one
/// runtime can serve several evaluator threads. Lookups hold a read lock for
/// the duration of the resolution only; callables always run unlocked, so a
/// method body may itself resolve or register.
#[derive(Clone, Debug)]
pub struct Runtime {
    state: SharedMutableRegistry<Registries>,
    config: Arc<ResolverConfig>,
}

impl Default for Runtime {
    fn default() -> Self {
        Runtime::new()
    }
}

impl Runtime {
    pub fn new() -> Self {
        RuntimeBuilder::new().build()
    }

    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Run `f` against a read-locked view of the registries.
    pub(crate) fn with_resolver<R>(&self, f: impl FnOnce(&Resolver<'_>) -> R) -> R {
        let state = self.state.read();
        let resolver = Resolver::new(&state.interfaces, &state.impls, &state.inherent, &self.config);
        f(&resolver)
    }

    // Registration

    pub fn register_interface(&self, def: InterfaceDef) {
        tracing::debug!(interface = %def.name, "registered interface");
        self.state.write().interfaces.insert(def);
    }

    /// Register an impl. The interface must already be declared.
    pub fn register_impl(&self, decl: ImplDecl) -> ResolveResult<Arc<ImplEntry>> {
        let mut state = self.state.write();
        let Registries {
            interfaces, impls, ..
        } = &mut *state;
        impls.register(decl, interfaces)
    }

    /// Declare `function` as a method of `type_name` outside any interface.
    pub fn register_inherent(&self, type_name: impl Into<Name>, function: Function) {
        self.state.write().inherent.register(type_name, function);
    }

    // Method lookup

    /// Find `method` for `receiver` without binding it.
    pub fn lookup_method(
        &self,
        receiver: &Value,
        method: &str,
        interface: Option<&str>,
        scope: &Scope,
    ) -> ResolveResult<Option<ResolvedMethod>> {
        let method = Name::new(method);
        let interface = interface.map(Name::new);
        self.with_resolver(|r| r.lookup_method(receiver, &method, interface.as_ref(), scope))
    }

    /// Resolve `receiver.method` to a callable bound to the receiver.
    pub fn resolve(
        &self,
        receiver: &Value,
        method: &str,
        interface: Option<&str>,
        scope: &Scope,
    ) -> ResolveResult<BoundMethod> {
        match self.lookup_method(receiver, method, interface, scope)? {
            Some(found) => Ok(BoundMethod::new(receiver.clone(), found.callable)),
            None => Err(no_implementation(
                interface.map(Name::new).as_ref(),
                &Name::new(method),
                receiver.type_label(),
            )),
        }
    }

    /// Resolve and invoke `receiver.method(args)`.
    pub fn call_method(
        &self,
        receiver: &Value,
        method: &str,
        args: &[Value],
        scope: &Scope,
    ) -> EvalResult {
        let bound = self.resolve(receiver, method, None, scope)?;
        bound.call(args)
    }

    /// Impl-pool lookup only, skipping scopes and inherent methods.
    pub fn find_method(
        &self,
        descriptor: &TypeDescriptor,
        method: &str,
        interface: Option<&str>,
    ) -> ResolveResult<Option<MethodMatch>> {
        let method = Name::new(method);
        let interface = interface.map(Name::new);
        self.with_resolver(|r| r.find_method(descriptor, &method, interface.as_ref()))
    }

    /// The impl of `interface` that applies to `descriptor`.
    pub fn lookup_impl(
        &self,
        descriptor: &TypeDescriptor,
        interface: &str,
    ) -> ResolveResult<Option<ImplMatch>> {
        let interface = Name::new(interface);
        self.with_resolver(|r| r.lookup_impl(descriptor, &interface))
    }

    // Satisfaction and type tests

    pub fn satisfies(&self, descriptor: &TypeDescriptor, interface: &str) -> ResolveResult<bool> {
        let interface = Name::new(interface);
        self.with_resolver(|r| r.satisfies(descriptor, &interface))
    }

    /// Like [`satisfies`](Self::satisfies), but reports why not.
    pub fn ensure_satisfies(
        &self,
        descriptor: &TypeDescriptor,
        interface: &TypeExpr,
    ) -> ResolveResult<()> {
        self.with_resolver(|r| r.ensure_satisfies(descriptor, interface, &descriptor.name))
    }

    pub fn value_matches_type(&self, ty: &TypeExpr, value: &Value) -> bool {
        self.with_resolver(|r| r.value_matches_type(ty, value))
    }

    // Named impls

    pub fn named_impl(&self, impl_name: &str) -> Option<Arc<ImplEntry>> {
        self.state.read().impls.named(impl_name).cloned()
    }

    /// `Name.method` on a named impl, interface defaults included.
    pub fn named_impl_method(&self, impl_name: &str, method: &str) -> Option<Callable> {
        let state = self.state.read();
        let entry = state.impls.named(impl_name)?;
        entry.method_or_default(&Name::new(method), &state.interfaces)
    }

    pub fn descriptor_of(&self, value: &Value) -> Option<TypeDescriptor> {
        value.descriptor()
    }
}

/// Builder for a [`Runtime`].
#[derive(Clone, Debug, Default)]
pub struct RuntimeBuilder {
    config: ResolverConfig,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        RuntimeBuilder::default()
    }

    #[must_use]
    pub fn weights(mut self, weights: SpecificityWeights) -> Self {
        self.config.weights = weights;
        self
    }

    #[must_use]
    pub fn primitive_interfaces(mut self, enabled: bool) -> Self {
        self.config.primitive_interfaces = enabled;
        self
    }

    #[must_use]
    pub fn config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Runtime {
        Runtime {
            state: SharedMutableRegistry::default(),
            config: Arc::new(self.config),
        }
    }
}
