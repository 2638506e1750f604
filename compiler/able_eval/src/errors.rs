//! Resolution and evaluation errors.
//!
//! Every failure the resolver can report is a [`ResolveError`]. The factory
//! functions below are the only place messages are spelled out; call sites
//! use them instead of building variants inline.

use std::fmt;

use able_types::Name;

/// Result alias for resolver operations.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Result of invoking a callable.
pub type EvalResult = Result<crate::Value, EvalError>;

/// A failure while registering or resolving implementations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// Two unnamed impls share interface, target, and constraint signature.
    #[error("Unnamed impl for ({interface}, {target}) already exists")]
    DuplicateImpl { interface: Name, target: String },

    /// The impl target is not a simple, generic, or union type.
    #[error("{message}")]
    InvalidImplTarget { message: String },

    /// An impl names an interface that was never declared.
    #[error("Interface '{interface}' is not defined")]
    UndefinedInterface { interface: Name },

    /// A constraint references an undeclared interface.
    #[error("Unknown interface '{interface}' in constraint on '{subject}'")]
    UnknownInterface { interface: Name, subject: Name },

    /// A bound type argument does not satisfy its constraint.
    #[error("{}", unresolved_message(type_name, interface, missing.as_ref()))]
    UnresolvedConstraint {
        type_name: String,
        interface: Name,
        missing: Option<Name>,
    },

    /// Several candidates remain undominated after every tie-break.
    #[error("ambiguous implementations of {interface} for {type_name}: {}", candidates.join(", "))]
    Ambiguous {
        interface: Name,
        type_name: String,
        candidates: Vec<String>,
    },

    /// More than one overload accepts the same call.
    #[error("Ambiguous overload for {method}")]
    AmbiguousOverload { method: Name },

    /// The selected method is private to its defining type.
    #[error("Method '{method}' on {owner} is private")]
    PrivateMethod { method: Name, owner: String },

    /// No resolution stage produced a method.
    #[error("{}", no_implementation_message(interface.as_ref(), method, type_name))]
    NoImplementation {
        interface: Option<Name>,
        method: Name,
        type_name: String,
    },

    /// An operator method returned a value of the wrong shape.
    #[error("comparison '{op}' requires {expected} result from {interface}.{method}")]
    InvalidOperatorResult {
        op: String,
        expected: &'static str,
        interface: Name,
        method: Name,
    },
}

fn unresolved_message(type_name: &str, interface: &Name, missing: Option<&Name>) -> String {
    match missing {
        Some(method) => format!(
            "Type '{type_name}' does not satisfy interface '{interface}': missing method '{method}'"
        ),
        None => format!(
            "Type '{type_name}' does not satisfy interface '{interface}': no implementation found"
        ),
    }
}

fn no_implementation_message(interface: Option<&Name>, method: &Name, type_name: &str) -> String {
    match interface {
        Some(interface) => {
            format!("No implementation of {interface}.{method} for type '{type_name}'")
        }
        None => format!("No implementation of method '{method}' for type '{type_name}'"),
    }
}

impl ResolveError {
    /// Whether this error only reports a failed constraint on one candidate.
    pub fn is_constraint_failure(&self) -> bool {
        matches!(self, ResolveError::UnresolvedConstraint { .. })
    }
}

/// A failure raised while running a callable body.
///
/// Bodies are opaque to the resolver; they report failures as a message and,
/// when the failure came from a nested resolution, the underlying cause.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct EvalError {
    pub message: String,
    #[source]
    pub source: Option<ResolveError>,
}

impl EvalError {
    pub fn new(message: impl Into<String>) -> Self {
        EvalError {
            message: message.into(),
            source: None,
        }
    }

    /// The resolver error behind this failure, if any.
    pub fn resolve_error(&self) -> Option<&ResolveError> {
        self.source.as_ref()
    }
}

impl From<ResolveError> for EvalError {
    fn from(err: ResolveError) -> Self {
        EvalError {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

// Registration errors

#[cold]
pub fn duplicate_impl(interface: &Name, target: impl fmt::Display) -> ResolveError {
    ResolveError::DuplicateImpl {
        interface: interface.clone(),
        target: target.to_string(),
    }
}

#[cold]
pub fn target_requires_simple_base(target: impl fmt::Display) -> ResolveError {
    ResolveError::InvalidImplTarget {
        message: format!("Implementation target requires simple base type: {target}"),
    }
}

#[cold]
pub fn unsupported_target(target: impl fmt::Display) -> ResolveError {
    ResolveError::InvalidImplTarget {
        message: format!("Implementation target type {target} is not supported"),
    }
}

#[cold]
pub fn empty_union_target() -> ResolveError {
    ResolveError::InvalidImplTarget {
        message: "Union target must contain at least one concrete type".to_string(),
    }
}

#[cold]
pub fn undefined_interface(interface: &Name) -> ResolveError {
    ResolveError::UndefinedInterface {
        interface: interface.clone(),
    }
}

// Constraint errors

#[cold]
pub fn unknown_interface(interface: &Name, subject: &Name) -> ResolveError {
    ResolveError::UnknownInterface {
        interface: interface.clone(),
        subject: subject.clone(),
    }
}

#[cold]
pub fn missing_interface_method(
    type_name: impl fmt::Display,
    interface: &Name,
    method: &Name,
) -> ResolveError {
    ResolveError::UnresolvedConstraint {
        type_name: type_name.to_string(),
        interface: interface.clone(),
        missing: Some(method.clone()),
    }
}

#[cold]
pub fn missing_marker_impl(type_name: impl fmt::Display, interface: &Name) -> ResolveError {
    ResolveError::UnresolvedConstraint {
        type_name: type_name.to_string(),
        interface: interface.clone(),
        missing: None,
    }
}

// Lookup errors

#[cold]
pub fn ambiguous_impls(
    interface: &Name,
    type_name: impl fmt::Display,
    candidates: Vec<String>,
) -> ResolveError {
    ResolveError::Ambiguous {
        interface: interface.clone(),
        type_name: type_name.to_string(),
        candidates,
    }
}

#[cold]
pub fn ambiguous_overload(method: &Name) -> ResolveError {
    ResolveError::AmbiguousOverload {
        method: method.clone(),
    }
}

#[cold]
pub fn private_method(method: &Name, owner: impl fmt::Display) -> ResolveError {
    ResolveError::PrivateMethod {
        method: method.clone(),
        owner: owner.to_string(),
    }
}

#[cold]
pub fn no_implementation(
    interface: Option<&Name>,
    method: &Name,
    type_name: impl fmt::Display,
) -> ResolveError {
    ResolveError::NoImplementation {
        interface: interface.cloned(),
        method: method.clone(),
        type_name: type_name.to_string(),
    }
}

// Operator errors

#[cold]
pub fn invalid_operator_result(
    op: &str,
    expected: &'static str,
    interface: &str,
    method: &str,
) -> ResolveError {
    ResolveError::InvalidOperatorResult {
        op: op.to_string(),
        expected,
        interface: Name::new(interface),
        method: Name::new(method),
    }
}

// Call errors

#[cold]
pub fn wrong_arg_count(name: &Name, expected: usize, got: usize) -> EvalError {
    EvalError::new(format!(
        "function '{name}' expects {expected} arguments, got {got}"
    ))
}

#[cold]
pub fn no_matching_overload(name: &Name, got: usize) -> EvalError {
    EvalError::new(format!("no overload of '{name}' accepts {got} arguments"))
}

#[cfg(test)]
mod tests;
