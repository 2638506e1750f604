//! Type expressions and template matching for the Able runtime.
//!
//! This crate is the leaf of the resolver: it knows nothing about values,
//! interfaces, or impls. It provides:
//!
//! - [`Name`]: cheap, shared identifiers
//! - [`TypeExpr`]: the closed type-expression variant used for templates and
//!   concrete types alike
//! - [`TypeDescriptor`]: the nominal type of a runtime value
//! - [`match_template`]: unification of a template against a concrete type
//! - [`concreteness`]: the specificity measure of a template

mod descriptor;
mod generics;
mod matcher;
mod name;
mod specificity;
mod stack;
mod type_expr;

pub use descriptor::TypeDescriptor;
pub use generics::{collect_placeholders, impl_generic_names};
pub use matcher::{match_template, type_expr_matches, Bindings, GenericNames};
pub use name::Name;
pub use specificity::concreteness;
pub use stack::ensure_sufficient_stack;
pub use type_expr::TypeExpr;
