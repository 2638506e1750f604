use super::*;
use crate::errors::ResolveError;

fn constant(name: &str, params: &[&str], result: i32) -> Function {
    let params = params.iter().map(|p| Param::new(*p, None)).collect();
    Function::new(name, params, move |_| Ok(Value::i32(result)))
}

#[test]
fn expects_self_forms() {
    assert!(Function::method("m", &[], |_| Ok(Value::Void)).expects_self());
    assert!(constant("m", &[], 0).shorthand().expects_self());
    assert!(Function::new(
        "m",
        vec![Param::new("other", Some(TypeExpr::simple("Self")))],
        |_| Ok(Value::Void)
    )
    .expects_self());
    assert!(!constant("m", &["x"], 0).expects_self());
    assert!(!constant("m", &[], 0).expects_self());
}

#[test]
fn shorthand_counts_the_implicit_receiver() {
    let f = constant("m", &["x"], 0).shorthand();
    assert_eq!(f.arity(), 2);
    assert_eq!(f.first_param_type(), None);
}

#[test]
fn call_checks_arity() {
    let f = constant("two", &["a", "b"], 7);
    assert_eq!(f.call(&[Value::Nil, Value::Nil]), Ok(Value::i32(7)));
    let err = f.call(&[Value::Nil]).unwrap_err();
    assert_eq!(err.message, "function 'two' expects 2 arguments, got 1");
}

#[test]
fn overloads_pick_by_arity() {
    let callable = Callable::single(constant("f", &["a"], 1)).merge(constant("f", &["a", "b"], 2).into());
    assert_eq!(callable.functions().len(), 2);
    assert_eq!(callable.call(&[Value::Nil]), Ok(Value::i32(1)));
    assert_eq!(callable.call(&[Value::Nil, Value::Nil]), Ok(Value::i32(2)));

    let err = callable.call(&[]).unwrap_err();
    assert_eq!(err.message, "no overload of 'f' accepts 0 arguments");
}

#[test]
fn equal_arity_overloads_are_ambiguous() {
    let callable = Callable::single(constant("f", &["a"], 1)).merge(constant("f", &["b"], 2).into());
    let err = callable.call(&[Value::Nil]).unwrap_err();
    assert!(matches!(
        err.resolve_error(),
        Some(ResolveError::AmbiguousOverload { .. })
    ));
}

#[test]
fn merge_skips_the_same_function() {
    let callable = Callable::single(constant("f", &[], 1));
    let merged = callable.clone().merge(callable.clone());
    assert!(matches!(merged, Callable::Single(_)));
    assert!(merged.same_callable(&callable));
}

#[test]
fn from_overloads_collapses() {
    assert!(Callable::from_overloads(Vec::new()).is_none());
    let one = Callable::from_overloads(vec![Arc::new(constant("f", &[], 1))]);
    assert!(matches!(one, Some(Callable::Single(_))));
}

#[test]
fn bound_method_prepends_receiver() {
    let method = Function::method("echo_receiver", &["x"], |args| Ok(args[0].clone()));
    let bound = BoundMethod::new(Value::str("me"), method.into());
    assert_eq!(bound.call(&[Value::i32(1)]), Ok(Value::str("me")));
    assert!(bound.function_for(1).is_some());
    assert!(bound.function_for(0).is_none());
}

#[test]
fn privacy_is_any_overload() {
    let callable = Callable::single(constant("f", &[], 1)).merge(constant("f", &["a"], 2).private().into());
    assert!(callable.is_private());
    assert!(!Callable::single(constant("g", &[], 1)).is_private());
}
