//! The implementation registry.

use std::sync::Arc;

use able_types::{impl_generic_names, GenericNames, Name, TypeExpr};
use rustc_hash::{FxHashMap, FxHashSet};

use super::{constraint_signature, ImplDecl, ImplEntry, ImplSlot, ImplVariant};
use crate::errors::{
    duplicate_impl, empty_union_target, target_requires_simple_base, undefined_interface,
    unsupported_target, ResolveResult,
};
use crate::interface::InterfaceTable;
use crate::Callable;

/// Every impl registered by the program, indexed by target type name.
#[derive(Debug, Default)]
pub struct ImplRegistry {
    by_type: FxHashMap<Name, Vec<ImplSlot>>,
    /// Impls over a bare generic (`impl<T: Show> Debug for T`).
    blanket: Vec<ImplSlot>,
    /// Named impls live outside the implicit pool.
    named: FxHashMap<Name, Arc<ImplEntry>>,
    /// `interface::type` to the `(template key, constraint key)` pairs seen
    /// for unnamed impls.
    unnamed_keys: FxHashMap<String, FxHashSet<(String, String)>>,
}

impl ImplRegistry {
    pub fn new() -> Self {
        ImplRegistry::default()
    }

    /// Register one impl declaration.
    ///
    /// Validates the target and the uniqueness of unnamed impls for every
    /// target member before anything is inserted, so a failed registration
    /// leaves the registry untouched.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(interface = %decl.interface, target = %decl.target)
    )]
    pub fn register(
        &mut self,
        decl: ImplDecl,
        interfaces: &InterfaceTable,
    ) -> ResolveResult<Arc<ImplEntry>> {
        if !interfaces.contains(&decl.interface) {
            return Err(undefined_interface(&decl.interface));
        }

        let declared: Vec<Name> = decl.generic_params.iter().map(|p| p.name.clone()).collect();
        let generic_names = impl_generic_names(
            &declared,
            std::iter::once(&decl.target).chain(decl.interface_args.iter()),
        );
        let variants = expand_target(&decl.target, &generic_names)?;
        let union_signatures = if matches!(decl.target, TypeExpr::Union(_)) {
            let mut sigs: Vec<String> = variants.iter().map(|v| v.signature.clone()).collect();
            sigs.sort();
            sigs
        } else {
            Vec::new()
        };
        let constraints = decl.constraints();

        let entry_key = |variant: &ImplVariant| -> (String, (String, String)) {
            let composite = format!("{}::{}", decl.interface, variant.signature_head());
            let iface_key = join_or_none(&decl.interface_args);
            let mut template_key = format!(
                "{iface_key}::{}",
                join_or_none(variant.template.type_args())
            );
            if !union_signatures.is_empty() {
                template_key = format!("{}::{template_key}", union_signatures.join("::"));
            }
            (composite, (template_key, constraint_signature(&constraints)))
        };

        if decl.impl_name.is_none() {
            for variant in &variants {
                let (composite, nested) = entry_key(variant);
                if self
                    .unnamed_keys
                    .get(&composite)
                    .is_some_and(|seen| seen.contains(&nested))
                {
                    return Err(duplicate_impl(&decl.interface, variant.signature_head()));
                }
            }
        }

        let keys: Vec<(String, (String, String))> = if decl.impl_name.is_none() {
            variants.iter().map(entry_key).collect()
        } else {
            Vec::new()
        };

        let mut methods: FxHashMap<Name, Callable> = FxHashMap::default();
        for function in decl.methods {
            let name = function.name.clone();
            let callable = Callable::single(function);
            let merged = match methods.remove(&name) {
                Some(existing) => existing.merge(callable),
                None => callable,
            };
            methods.insert(name, merged);
        }

        let entry = Arc::new(ImplEntry::new(
            decl.interface,
            decl.interface_args,
            decl.impl_name,
            decl.target,
            declared,
            generic_names,
            constraints,
            union_signatures,
            methods,
        ));

        if let Some(name) = &entry.impl_name {
            tracing::debug!(impl_name = %name, "registered named impl");
            self.named.insert(name.clone(), Arc::clone(&entry));
            return Ok(entry);
        }

        for (composite, nested) in keys {
            self.unnamed_keys.entry(composite).or_default().insert(nested);
        }
        for variant in variants {
            let slot = ImplSlot {
                entry: Arc::clone(&entry),
                variant,
            };
            match slot.variant.type_name.clone() {
                Some(type_name) => self.by_type.entry(type_name).or_default().push(slot),
                None => self.blanket.push(slot),
            }
        }
        tracing::debug!(description = %entry.description(), "registered impl");
        Ok(entry)
    }

    /// Slots that may apply to a value of type `type_name`: its own bucket,
    /// then every blanket impl.
    pub fn slots_for<'a>(&'a self, type_name: &str) -> impl Iterator<Item = &'a ImplSlot> + 'a {
        self.by_type
            .get(type_name)
            .into_iter()
            .flatten()
            .chain(self.blanket.iter())
    }

    /// A named impl, for explicit `Name.method(...)` calls.
    pub fn named(&self, impl_name: &str) -> Option<&Arc<ImplEntry>> {
        self.named.get(impl_name)
    }

    /// Number of slots across all buckets, blanket impls included.
    pub fn slot_count(&self) -> usize {
        self.by_type.values().map(Vec::len).sum::<usize>() + self.blanket.len()
    }
}

impl ImplVariant {
    /// The type name used in uniqueness keys and duplicate diagnostics.
    fn signature_head(&self) -> String {
        match &self.type_name {
            Some(name) => name.to_string(),
            None => self.signature.clone(),
        }
    }
}

fn join_or_none(exprs: &[TypeExpr]) -> String {
    if exprs.is_empty() {
        return "<none>".to_string();
    }
    let parts: Vec<String> = exprs.iter().map(ToString::to_string).collect();
    parts.join("|")
}

/// Split an impl target into its concrete members.
///
/// Simple and applied types yield one variant, unions one per distinct
/// member. A bare generic parameter yields a blanket variant. Anything else
/// is rejected.
pub(crate) fn expand_target(
    target: &TypeExpr,
    generics: &GenericNames,
) -> ResolveResult<Vec<ImplVariant>> {
    match target {
        TypeExpr::Union(members) => {
            let mut flat = Vec::new();
            flatten_union(members, &mut flat);
            let mut seen = FxHashSet::default();
            let mut variants = Vec::new();
            for member in flat {
                let variant = expand_single(member, generics)?;
                if variant.type_name.is_none() {
                    return Err(unsupported_target(target));
                }
                if seen.insert(variant.signature.clone()) {
                    variants.push(variant);
                }
            }
            if variants.is_empty() {
                return Err(empty_union_target());
            }
            Ok(variants)
        }
        _ => expand_single(target, generics).map(|v| vec![v]),
    }
}

fn flatten_union<'a>(members: &'a [TypeExpr], out: &mut Vec<&'a TypeExpr>) {
    for member in members {
        match member {
            TypeExpr::Union(nested) => flatten_union(nested, out),
            other => out.push(other),
        }
    }
}

fn expand_single(target: &TypeExpr, generics: &GenericNames) -> ResolveResult<ImplVariant> {
    match target {
        TypeExpr::Simple(name) => Ok(ImplVariant {
            type_name: (!generics.contains(name)).then(|| name.clone()),
            template: target.clone(),
            signature: name.to_string(),
        }),
        TypeExpr::Generic { base, .. } => match base.as_ref() {
            TypeExpr::Simple(name) if !generics.contains(name) => Ok(ImplVariant {
                type_name: Some(name.clone()),
                template: target.clone(),
                signature: target.to_string(),
            }),
            _ => Err(target_requires_simple_base(target)),
        },
        _ => Err(unsupported_target(target)),
    }
}
