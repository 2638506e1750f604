//! Methods declared directly on a type in `methods` blocks.

use able_types::Name;
use rustc_hash::FxHashMap;

use crate::{Callable, Function};

/// Type name to method name to callable.
#[derive(Debug, Default)]
pub struct InherentMethods {
    by_type: FxHashMap<Name, FxHashMap<Name, Callable>>,
}

impl InherentMethods {
    pub fn new() -> Self {
        InherentMethods::default()
    }

    /// Add `function` to `type_name`, merging with a same-named method.
    pub fn register(&mut self, type_name: impl Into<Name>, function: Function) {
        let type_name = type_name.into();
        let name = function.name.clone();
        let callable = Callable::single(function);
        let methods = self.by_type.entry(type_name).or_default();
        let merged = match methods.remove(&name) {
            Some(existing) => existing.merge(callable),
            None => callable,
        };
        methods.insert(name, merged);
    }

    pub fn get(&self, type_name: &str, method: &str) -> Option<&Callable> {
        self.by_type.get(type_name)?.get(method)
    }

    #[inline]
    pub fn has_method(&self, type_name: &str, method: &str) -> bool {
        self.get(type_name, method).is_some()
    }
}
