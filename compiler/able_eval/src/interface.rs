//! Interface declarations and the interface table.

use std::sync::Arc;

use able_types::{Name, TypeExpr};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::Function;

/// A method required by an interface, optionally with a default body.
#[derive(Clone, Debug)]
pub struct MethodSignature {
    pub name: Name,
    pub default_body: Option<Arc<Function>>,
}

/// A declared interface.
#[derive(Clone, Debug)]
pub struct InterfaceDef {
    pub name: Name,
    pub generic_params: Vec<Name>,
    pub base_interfaces: Vec<TypeExpr>,
    pub signatures: Vec<MethodSignature>,
}

impl InterfaceDef {
    pub fn new(name: impl Into<Name>) -> Self {
        InterfaceDef {
            name: name.into(),
            generic_params: Vec::new(),
            base_interfaces: Vec::new(),
            signatures: Vec::new(),
        }
    }

    #[must_use]
    pub fn generic(mut self, param: impl Into<Name>) -> Self {
        self.generic_params.push(param.into());
        self
    }

    #[must_use]
    pub fn extends(mut self, base: impl Into<TypeExpr>) -> Self {
        self.base_interfaces.push(base.into());
        self
    }

    /// A required method with no default.
    #[must_use]
    pub fn signature(mut self, name: impl Into<Name>) -> Self {
        self.signatures.push(MethodSignature {
            name: name.into(),
            default_body: None,
        });
        self
    }

    /// A method with a default body, named after the function.
    #[must_use]
    pub fn default_method(mut self, body: Function) -> Self {
        self.signatures.push(MethodSignature {
            name: body.name.clone(),
            default_body: Some(Arc::new(body)),
        });
        self
    }

    pub fn signature_named(&self, method: &str) -> Option<&MethodSignature> {
        self.signatures.iter().find(|s| s.name == method)
    }

    /// No methods and no bases: satisfied only by an explicit impl.
    pub fn is_marker(&self) -> bool {
        self.signatures.is_empty() && self.base_interfaces.is_empty()
    }
}

/// All interfaces declared in a program, by name.
#[derive(Clone, Debug, Default)]
pub struct InterfaceTable {
    defs: FxHashMap<Name, Arc<InterfaceDef>>,
}

impl InterfaceTable {
    pub fn new() -> Self {
        InterfaceTable::default()
    }

    /// Declare an interface, replacing any earlier declaration of the name.
    pub fn insert(&mut self, def: InterfaceDef) {
        self.defs.insert(def.name.clone(), Arc::new(def));
    }

    pub fn get(&self, name: &str) -> Option<&Arc<InterfaceDef>> {
        self.defs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.defs.contains_key(name)
    }

    /// Declared interface names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &Name> {
        self.defs.keys()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// The default body `interface` declares for `method`, if any.
    pub fn default_method(&self, interface: &str, method: &str) -> Option<&Arc<Function>> {
        self.get(interface)?
            .signature_named(method)?
            .default_body
            .as_ref()
    }

    /// `interface` followed by every transitive base, in discovery order.
    ///
    /// Unknown names are kept (they cannot contribute bases). Cycles in the
    /// base graph are visited once.
    pub fn search_names(&self, interface: &Name) -> Vec<Name> {
        let mut visited = FxHashSet::default();
        let mut out = Vec::new();
        self.collect_search_names(interface, &mut visited, &mut out);
        out
    }

    fn collect_search_names(
        &self,
        interface: &Name,
        visited: &mut FxHashSet<Name>,
        out: &mut Vec<Name>,
    ) {
        if !visited.insert(interface.clone()) {
            return;
        }
        out.push(interface.clone());
        let Some(def) = self.get(interface) else {
            return;
        };
        for base in &def.base_interfaces {
            if let Some(base_name) = base.head_name() {
                self.collect_search_names(base_name, visited, out);
            }
        }
    }

    /// Rendered `interface` plus every transitive base, for constraint
    /// comparison. `T: ShinyShow` covers `ShinyShow`, `FancyShow`, `Show`.
    pub fn constraint_closure(&self, interface: &TypeExpr) -> Vec<String> {
        let mut memo = FxHashSet::default();
        let mut out = Vec::new();
        self.collect_closure(interface, &mut memo, &mut out);
        out
    }

    fn collect_closure(
        &self,
        interface: &TypeExpr,
        memo: &mut FxHashSet<String>,
        out: &mut Vec<String>,
    ) {
        let key = interface.to_string();
        if !memo.insert(key.clone()) {
            return;
        }
        out.push(key);
        let Some(def) = interface.head_name().and_then(|name| self.get(name)) else {
            return;
        };
        for base in &def.base_interfaces {
            self.collect_closure(base, memo, out);
        }
    }
}
