//! Lexical scopes as seen by method resolution.
//!
//! The resolver reads scopes but never writes them: the evaluator builds the
//! chain and hands the innermost frame to each lookup.

use std::sync::Arc;

use able_types::{Name, TypeExpr};
use rustc_hash::FxHashMap;

use crate::{Callable, Value};

/// Methods defined inside a `methods` or `impl` block body.
///
/// While evaluating that body, calls on a receiver of the block's target type
/// resolve against this table before anything else.
#[derive(Clone, Debug)]
pub struct MethodSetContext {
    /// Name of a named impl (`impl Fancy = Show for T`).
    pub impl_name: Option<Name>,
    /// Interface of an impl block; `None` for inherent `methods` blocks.
    pub interface: Option<Name>,
    pub target: TypeExpr,
    pub methods: FxHashMap<Name, Callable>,
}

impl MethodSetContext {
    pub fn new(target: TypeExpr) -> Self {
        MethodSetContext {
            impl_name: None,
            interface: None,
            target,
            methods: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn for_interface(mut self, interface: impl Into<Name>) -> Self {
        self.interface = Some(interface.into());
        self
    }

    #[must_use]
    pub fn named(mut self, impl_name: impl Into<Name>) -> Self {
        self.impl_name = Some(impl_name.into());
        self
    }

    #[must_use]
    pub fn with_method(mut self, method: impl Into<Callable>) -> Self {
        let method = method.into();
        if let Some(name) = method.name().cloned() {
            let merged = match self.methods.remove(&name) {
                Some(existing) => existing.merge(method),
                None => method,
            };
            self.methods.insert(name, merged);
        }
        self
    }

    /// Whether a lookup with `interface_filter` may use this context.
    pub fn accepts_filter(&self, interface_filter: Option<&Name>) -> bool {
        match interface_filter {
            None => true,
            Some(filter) => self.interface.as_ref() == Some(filter),
        }
    }

    /// Label used in privacy errors.
    pub fn owner_label(&self) -> String {
        match (&self.impl_name, &self.interface) {
            (Some(name), _) => name.to_string(),
            (None, Some(interface)) => format!("impl {interface} for {}", self.target),
            (None, None) => self.target.to_string(),
        }
    }
}

/// One frame of bindings with a link to its enclosing frame.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    bindings: FxHashMap<Name, Value>,
    parent: Option<Arc<Scope>>,
    method_set: Option<Arc<MethodSetContext>>,
}

impl Scope {
    pub fn new() -> Self {
        Scope::default()
    }

    pub fn with_parent(parent: Arc<Scope>) -> Self {
        Scope {
            bindings: FxHashMap::default(),
            parent: Some(parent),
            method_set: None,
        }
    }

    /// Attach a method-set context to this frame.
    #[must_use]
    pub fn with_method_set(mut self, context: MethodSetContext) -> Self {
        self.method_set = Some(Arc::new(context));
        self
    }

    #[inline]
    pub fn define(&mut self, name: impl Into<Name>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    /// Make a type name visible in this frame.
    pub fn define_type(&mut self, name: impl Into<Name>) {
        let name = name.into();
        self.bindings.insert(name.clone(), Value::TypeRef(name));
    }

    /// Define a free function, merging with an existing one of the same name.
    pub fn define_function(&mut self, function: impl Into<Callable>) {
        let callable = function.into();
        let Some(name) = callable.name().cloned() else {
            return;
        };
        let merged = match self.bindings.remove(&name) {
            Some(Value::Function(existing)) => existing.merge(callable),
            _ => callable,
        };
        self.bindings.insert(name, Value::Function(merged));
    }

    pub fn lookup(&self, name: &str) -> Option<&Value> {
        let mut current = Some(self);
        while let Some(scope) = current {
            if let Some(value) = scope.bindings.get(name) {
                return Some(value);
            }
            current = scope.parent.as_deref();
        }
        None
    }

    #[inline]
    pub fn has(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// The callable bound to `name`, if the binding is a function.
    pub fn lookup_callable(&self, name: &str) -> Option<&Callable> {
        match self.lookup(name) {
            Some(Value::Function(callable)) => Some(callable),
            _ => None,
        }
    }

    /// The nearest method-set context on the chain.
    pub fn method_set(&self) -> Option<&MethodSetContext> {
        let mut current = Some(self);
        while let Some(scope) = current {
            if let Some(context) = &scope.method_set {
                return Some(context);
            }
            current = scope.parent.as_deref();
        }
        None
    }
}
