//! Runtime type tests: does a value inhabit a type expression?

use able_types::{
    collect_placeholders, ensure_sufficient_stack, match_template, Bindings, GenericNames, Name,
    TypeExpr,
};

use crate::resolver::Resolver;
use crate::value::IntKind;
use crate::Value;

impl Resolver<'_> {
    /// Whether `value` is acceptable where `ty` is declared.
    ///
    /// Integers widen to any kind that holds them, and floats accept integers.
    /// Interface names are checked by satisfaction, everything else by
    /// unifying the value's descriptor with `ty`.
    pub(crate) fn value_matches_type(&self, ty: &TypeExpr, value: &Value) -> bool {
        ensure_sufficient_stack(|| self.matches_inner(ty, value))
    }

    fn matches_inner(&self, ty: &TypeExpr, value: &Value) -> bool {
        match ty {
            TypeExpr::Wildcard => true,
            TypeExpr::Simple(name) => self.matches_simple(name, value),
            TypeExpr::Nullable(inner) => {
                matches!(value.unwrap_interface(), Value::Nil) || self.value_matches_type(inner, value)
            }
            TypeExpr::Result(inner) => self.value_matches_type(inner, value),
            TypeExpr::Union(members) => members.iter().any(|m| self.value_matches_type(m, value)),
            TypeExpr::Function { .. } => {
                matches!(value.unwrap_interface(), Value::Function(_) | Value::BoundMethod(_))
            }
            TypeExpr::Generic { .. } => {
                if let Some(head) = ty.head_name() {
                    if self.interfaces.contains(head) {
                        return self.value_satisfies(head, value);
                    }
                }
                let Some(descriptor) = value.descriptor() else {
                    return false;
                };
                let mut generics = GenericNames::default();
                collect_placeholders(ty, &mut generics);
                let mut bindings = Bindings::default();
                match_template(ty, &descriptor.to_type_expr(), &generics, &mut bindings)
            }
        }
    }

    fn matches_simple(&self, name: &Name, value: &Value) -> bool {
        if name.is_self_type() || name.is_placeholder() {
            return true;
        }
        if self.interfaces.contains(name) {
            return self.value_satisfies(name, value);
        }
        let value = value.unwrap_interface();
        if let Some(expected) = IntKind::from_name(name) {
            return match value {
                Value::Int { value, kind } => {
                    *kind == expected || kind.fits_within(expected) || expected.contains(*value)
                }
                _ => false,
            };
        }
        if matches!(name.as_str(), "f32" | "f64") {
            return matches!(value, Value::Float { .. } | Value::Int { .. });
        }
        value.descriptor().is_some_and(|d| d.name == *name)
    }

    /// An interface-typed position: the value either is wrapped as that
    /// interface or its type satisfies it.
    fn value_satisfies(&self, interface: &Name, value: &Value) -> bool {
        if let Value::Interface(wrapped) = value {
            if wrapped.interface == *interface {
                return true;
            }
        }
        value
            .descriptor()
            .is_some_and(|d| matches!(self.satisfies(&d, interface), Ok(true)))
    }
}
