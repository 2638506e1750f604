//! Runtime method and implementation resolution for the Able interpreter.
//!
//! Given a runtime value and a method or operator name, decides which
//! implementation applies: inherent methods, interface impls ranked by
//! specificity, or a scope-level function called with method syntax.
//!
//! # Architecture
//!
//! - [`Runtime`]: owns the registries and exposes every entry point
//! - [`ImplRegistry`]: impl declarations expanded into per-type slots
//! - `resolver`: the staged lookup behind [`Runtime::resolve`]
//! - `satisfies`: interface satisfaction for constraints and `is` tests
//! - `operators`: operator symbols routed to interface methods
//!
//! Values, callables, and scopes are the evaluator's; this crate only reads
//! them.

mod callable;
mod config;
mod errors;
mod impls;
mod inherent;
mod interface;
mod operators;
mod resolver;
mod runtime;
mod satisfies;
mod scope;
mod shared;
mod type_matching;
mod value;

pub use callable::{BoundMethod, Callable, Function, NativeBody, Param};
pub use config::{ResolverConfig, SpecificityWeights};
pub use errors::{EvalError, EvalResult, ResolveError, ResolveResult};
pub use impls::{
    compare_candidates, select, ConstraintSpec, GenericParam, ImplCandidate, ImplDecl, ImplEntry,
    ImplMatch, ImplRegistry, ImplSlot, ImplVariant, MethodMatch, Selection,
};
pub use inherent::InherentMethods;
pub use interface::{InterfaceDef, InterfaceTable, MethodSignature};
pub use operators::{binary_method, canonical_operator, unary_method};
pub use resolver::{MethodSource, ResolvedMethod};
pub use runtime::{Runtime, RuntimeBuilder};
pub use satisfies::primitive_implements;
pub use scope::{MethodSetContext, Scope};
pub use shared::SharedMutableRegistry;
pub use value::{FloatKind, IntKind, InterfaceValue, StructValue, Value};

pub use able_types::{Name, TypeDescriptor, TypeExpr};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber for resolver diagnostics.
///
/// Does nothing unless `ABLE_LOG` or `RUST_LOG` is set; `ABLE_LOG` wins when
/// both are. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let directives = std::env::var("ABLE_LOG").or_else(|_| std::env::var("RUST_LOG"));
        if let Ok(directives) = directives {
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::new(directives))
                .try_init();
        }
    });
}
