//! Callables: functions, overload sets, and receiver-bound methods.

use std::fmt;
use std::sync::Arc;

use able_types::{Name, TypeExpr};

use crate::errors::{ambiguous_overload, no_matching_overload, wrong_arg_count, EvalResult};
use crate::Value;

/// Native body of a function. Receives the receiver first for methods.
pub type NativeBody = Arc<dyn Fn(&[Value]) -> EvalResult + Send + Sync>;

/// A declared parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: Name,
    /// Declared type; `None` accepts any value.
    pub ty: Option<TypeExpr>,
}

impl Param {
    pub fn new(name: impl Into<Name>, ty: Option<TypeExpr>) -> Self {
        Param {
            name: name.into(),
            ty,
        }
    }

    /// An untyped `self` parameter.
    pub fn receiver() -> Self {
        Param::new("self", None)
    }
}

/// A function value.
pub struct Function {
    pub name: Name,
    pub params: Vec<Param>,
    pub body: NativeBody,
    pub is_private: bool,
    /// Declared with `fn #name` shorthand; the receiver is implicit.
    pub is_method_shorthand: bool,
    /// Declared as `fn Type.name`; never eligible for call-syntax fallback.
    pub type_qualified: bool,
}

impl Function {
    pub fn new(
        name: impl Into<Name>,
        params: Vec<Param>,
        body: impl Fn(&[Value]) -> EvalResult + Send + Sync + 'static,
    ) -> Self {
        Function {
            name: name.into(),
            params,
            body: Arc::new(body),
            is_private: false,
            is_method_shorthand: false,
            type_qualified: false,
        }
    }

    /// A method taking `self` followed by `extra` untyped parameters.
    pub fn method(
        name: impl Into<Name>,
        extra: &[&str],
        body: impl Fn(&[Value]) -> EvalResult + Send + Sync + 'static,
    ) -> Self {
        let mut params = vec![Param::receiver()];
        params.extend(extra.iter().map(|p| Param::new(*p, None)));
        Function::new(name, params, body)
    }

    #[must_use]
    pub fn private(mut self) -> Self {
        self.is_private = true;
        self
    }

    #[must_use]
    pub fn shorthand(mut self) -> Self {
        self.is_method_shorthand = true;
        self
    }

    #[must_use]
    pub fn qualified(mut self) -> Self {
        self.type_qualified = true;
        self
    }

    /// Number of arguments the body receives, including an implicit receiver.
    pub fn arity(&self) -> usize {
        self.params.len() + usize::from(self.is_method_shorthand)
    }

    /// Whether the function takes the receiver as its first argument.
    pub fn expects_self(&self) -> bool {
        if self.is_method_shorthand {
            return true;
        }
        let Some(first) = self.params.first() else {
            return false;
        };
        first.name.eq_ignore_ascii_case("self")
            || matches!(&first.ty, Some(TypeExpr::Simple(name)) if name.is_self_type())
    }

    /// Declared type of the receiver position, if any.
    pub fn first_param_type(&self) -> Option<&TypeExpr> {
        if self.is_method_shorthand {
            return None;
        }
        self.params.first().and_then(|p| p.ty.as_ref())
    }

    pub fn call(&self, args: &[Value]) -> EvalResult {
        if args.len() != self.arity() {
            return Err(wrong_arg_count(&self.name, self.arity(), args.len()));
        }
        (self.body)(args)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("is_private", &self.is_private)
            .finish_non_exhaustive()
    }
}

/// A single function or an overload set sharing one name.
#[derive(Clone)]
pub enum Callable {
    Single(Arc<Function>),
    Overloads(Vec<Arc<Function>>),
}

impl Callable {
    pub fn single(function: Function) -> Self {
        Callable::Single(Arc::new(function))
    }

    /// Build from a filtered overload list; `None` when empty.
    pub fn from_overloads(mut overloads: Vec<Arc<Function>>) -> Option<Self> {
        match overloads.len() {
            0 => None,
            1 => overloads.pop().map(Callable::Single),
            _ => Some(Callable::Overloads(overloads)),
        }
    }

    pub fn name(&self) -> Option<&Name> {
        self.functions().first().map(|f| &f.name)
    }

    pub fn functions(&self) -> &[Arc<Function>] {
        match self {
            Callable::Single(f) => std::slice::from_ref(f),
            Callable::Overloads(fs) => fs,
        }
    }

    pub fn is_private(&self) -> bool {
        self.functions().iter().any(|f| f.is_private)
    }

    /// Merge another definition of the same name into an overload set.
    #[must_use]
    pub fn merge(self, other: Callable) -> Callable {
        let mut functions = self.into_functions();
        for function in other.into_functions() {
            if !functions.iter().any(|f| Arc::ptr_eq(f, &function)) {
                functions.push(function);
            }
        }
        if functions.len() == 1 {
            Callable::Single(functions.swap_remove(0))
        } else {
            Callable::Overloads(functions)
        }
    }

    fn into_functions(self) -> Vec<Arc<Function>> {
        match self {
            Callable::Single(f) => vec![f],
            Callable::Overloads(fs) => fs,
        }
    }

    /// Identity comparison: the same function objects in the same order.
    pub fn same_callable(&self, other: &Callable) -> bool {
        let (a, b) = (self.functions(), other.functions());
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| Arc::ptr_eq(x, y))
    }

    /// Call with `args`, picking an overload by arity.
    pub fn call(&self, args: &[Value]) -> EvalResult {
        match self {
            Callable::Single(function) => function.call(args),
            Callable::Overloads(functions) => {
                let mut matching = functions.iter().filter(|f| f.arity() == args.len());
                match (matching.next(), matching.next()) {
                    (Some(function), None) => function.call(args),
                    (Some(function), Some(_)) => Err(ambiguous_overload(&function.name).into()),
                    (None, _) => {
                        let name = self.name().cloned().unwrap_or_else(|| Name::new("<anonymous>"));
                        Err(no_matching_overload(&name, args.len()))
                    }
                }
            }
        }
    }
}

impl From<Function> for Callable {
    fn from(function: Function) -> Self {
        Callable::single(function)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Single(function) => write!(f, "fn {}", function.name),
            Callable::Overloads(functions) => {
                let name = functions.first().map_or("<empty>", |f| f.name.as_str());
                write!(f, "fn {name} ({} overloads)", functions.len())
            }
        }
    }
}

/// A callable with its receiver captured.
#[derive(Clone)]
pub struct BoundMethod {
    pub receiver: Value,
    pub callable: Callable,
}

impl BoundMethod {
    pub fn new(receiver: Value, callable: Callable) -> Self {
        BoundMethod { receiver, callable }
    }

    /// Invoke with the receiver prepended to `args`.
    pub fn call(&self, args: &[Value]) -> EvalResult {
        let mut full = Vec::with_capacity(args.len() + 1);
        full.push(self.receiver.clone());
        full.extend_from_slice(args);
        self.callable.call(&full)
    }

    /// The function that would run for `extra_args` arguments, if unique.
    pub fn function_for(&self, extra_args: usize) -> Option<&Arc<Function>> {
        let mut matching = self
            .callable
            .functions()
            .iter()
            .filter(|f| f.arity() == extra_args + 1);
        match (matching.next(), matching.next()) {
            (Some(function), None) => Some(function),
            _ => None,
        }
    }
}

impl fmt::Debug for BoundMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} bound to {:?}", self.callable, self.receiver)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests use unwrap to panic on unexpected state")]
mod tests;
