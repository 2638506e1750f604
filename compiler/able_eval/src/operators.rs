//! Operator dispatch through interfaces.
//!
//! Each operator symbol maps to an interface method. The left operand's type
//! is resolved through the impl pool; when no impl exists the dispatcher
//! reports "not handled" and the evaluator falls back to built-in arithmetic.

use std::cmp::Ordering;

use able_types::Name;

use crate::errors::{invalid_operator_result, EvalError};
use crate::runtime::Runtime;
use crate::{Callable, Value};

/// Binary operator symbol to `(interface, method)`.
pub fn binary_method(op: &str) -> Option<(&'static str, &'static str)> {
    Some(match op {
        "+" => ("Add", "add"),
        "-" => ("Sub", "sub"),
        "*" => ("Mul", "mul"),
        "/" => ("Div", "div"),
        "%" => ("Rem", "rem"),
        ".&" => ("BitAnd", "bit_and"),
        ".|" => ("BitOr", "bit_or"),
        ".^" => ("BitXor", "bit_xor"),
        ".<<" => ("Shl", "shl"),
        ".>>" => ("Shr", "shr"),
        _ => return None,
    })
}

/// Unary operator symbol to `(interface, method)`.
pub fn unary_method(op: &str) -> Option<(&'static str, &'static str)> {
    match op {
        "-" => Some(("Neg", "neg")),
        "~" | ".~" => Some(("Not", "not")),
        _ => None,
    }
}

/// An operator's resolved interface, method, and callable.
type OperatorMethod = (&'static str, &'static str, Callable);

const EQUALITY: &[(&str, &str)] = &[("Eq", "eq"), ("PartialEq", "eq")];
const ORDERING: &[(&str, &str)] = &[("Ord", "cmp"), ("PartialOrd", "partial_cmp")];

/// Canonical form of an operator symbol: compound assignment drops its `=`
/// and the plain bitwise spellings gain their dot.
pub fn canonical_operator(op: &str) -> &str {
    let op = match op {
        "==" | "!=" | "<=" | ">=" => op,
        _ => op.strip_suffix('=').filter(|s| !s.is_empty()).unwrap_or(op),
    };
    match op {
        "&" => ".&",
        "|" => ".|",
        "^" => ".^",
        "<<" => ".<<",
        ">>" => ".>>",
        other => other,
    }
}

fn ordering_holds(op: &str, ordering: Ordering) -> bool {
    match op {
        "<" => ordering.is_lt(),
        "<=" => ordering.is_le(),
        ">" => ordering.is_gt(),
        _ => ordering.is_ge(),
    }
}

impl Runtime {
    /// Dispatch a binary operator. `Ok(None)` when no impl handles it.
    #[tracing::instrument(level = "debug", skip(self, left, right))]
    pub fn dispatch_operator(
        &self,
        op: &str,
        left: &Value,
        right: &Value,
    ) -> Result<Option<Value>, EvalError> {
        let op = canonical_operator(op);
        let (left, right) = (left.unwrap_interface(), right.unwrap_interface());
        let args = [left.clone(), right.clone()];
        match op {
            "==" | "!=" => {
                let Some((interface, method, callable)) = self.operator_method(left, EQUALITY)?
                else {
                    return Ok(None);
                };
                let result = callable.call(&args)?;
                let Some(equal) = result.as_bool() else {
                    return Err(invalid_operator_result(op, "bool", interface, method).into());
                };
                Ok(Some(Value::Bool(if op == "==" { equal } else { !equal })))
            }
            "<" | "<=" | ">" | ">=" => {
                let Some((interface, method, callable)) = self.operator_method(left, ORDERING)?
                else {
                    return Ok(None);
                };
                let result = callable.call(&args)?;
                let Some(ordering) = result.as_ordering() else {
                    return Err(invalid_operator_result(op, "Ordering", interface, method).into());
                };
                Ok(Some(Value::Bool(ordering_holds(op, ordering))))
            }
            _ => {
                let Some(pair) = binary_method(op) else {
                    return Ok(None);
                };
                match self.operator_method(left, &[pair])? {
                    Some((_, _, callable)) => callable.call(&args).map(Some),
                    None => Ok(None),
                }
            }
        }
    }

    /// Dispatch a unary operator. `Ok(None)` when no impl handles it.
    #[tracing::instrument(level = "debug", skip(self, operand))]
    pub fn dispatch_unary(&self, op: &str, operand: &Value) -> Result<Option<Value>, EvalError> {
        let Some(pair) = unary_method(op) else {
            return Ok(None);
        };
        let operand = operand.unwrap_interface();
        match self.operator_method(operand, &[pair])? {
            Some((_, _, callable)) => callable.call(std::slice::from_ref(operand)).map(Some),
            None => Ok(None),
        }
    }

    /// The first `(interface, method)` of `pairs` with an impl for `value`.
    /// The registry lock is released before the caller invokes the result.
    fn operator_method(
        &self,
        value: &Value,
        pairs: &[(&'static str, &'static str)],
    ) -> Result<Option<OperatorMethod>, EvalError> {
        let Some(descriptor) = value.descriptor() else {
            return Ok(None);
        };
        self.with_resolver(|resolver| -> Result<Option<OperatorMethod>, EvalError> {
            for &(interface, method) in pairs {
                let found = resolver.find_method(
                    &descriptor,
                    &Name::new(method),
                    Some(&Name::new(interface)),
                )?;
                if let Some(found) = found {
                    return Ok(Some((interface, method, found.callable)));
                }
            }
            Ok(None)
        })
    }
}
