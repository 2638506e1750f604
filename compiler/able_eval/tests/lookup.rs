//! Lookup stages, privacy, call-syntax fallback, and operator dispatch.

#![allow(clippy::unwrap_used, reason = "Tests can panic")]

mod common;

use std::cmp::Ordering;

use able_eval::{
    EvalError, Function, ImplDecl, InterfaceDef, MethodSetContext, MethodSource, Param,
    ResolveError, Runtime, Scope, TypeExpr, Value,
};
use common::{call_text, record, register_show_family, text_method};
use pretty_assertions::assert_eq;

// Privacy

#[test]
fn private_impl_method_is_reported() {
    let runtime = Runtime::new();
    register_show_family(&runtime);
    runtime
        .register_impl(
            ImplDecl::new("Show", "Point").method(text_method("to_string", "hidden").private()),
        )
        .unwrap();
    let err = runtime
        .resolve(&record("Point"), "to_string", None, &Scope::new())
        .unwrap_err();
    assert_eq!(err.to_string(), "Method 'to_string' on Point is private");
}

#[test]
fn private_method_set_member_names_the_block() {
    let context = MethodSetContext::new(TypeExpr::simple("Point"))
        .for_interface("Show")
        .with_method(text_method("secret", "s").private());
    let scope = Scope::new().with_method_set(context);
    let err = Runtime::new()
        .resolve(&record("Point"), "secret", None, &scope)
        .unwrap_err();
    assert_eq!(
        err,
        ResolveError::PrivateMethod {
            method: "secret".into(),
            owner: "impl Show for Point".to_string(),
        }
    );
}

// Inherent methods

#[test]
fn inherent_method_needs_the_type_in_scope() {
    let runtime = Runtime::new();
    runtime.register_inherent("Point", text_method("describe", "a point"));

    let err = runtime
        .resolve(&record("Point"), "describe", None, &Scope::new())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "No implementation of method 'describe' for type 'Point'"
    );

    let mut scope = Scope::new();
    scope.define_type("Point");
    let value = runtime
        .call_method(&record("Point"), "describe", &[], &scope)
        .unwrap();
    assert_eq!(value, Value::str("a point"));
}

#[test]
fn inherent_method_on_primitive_is_always_visible() {
    let runtime = Runtime::new();
    runtime.register_inherent("String", text_method("shout", "LOUD"));
    assert_eq!(call_text(&runtime, &Value::str("quiet"), "shout"), "LOUD");
}

#[test]
fn inherent_method_visible_through_parent_scope() {
    let runtime = Runtime::new();
    runtime.register_inherent("Point", text_method("describe", "a point"));
    let mut outer = Scope::new();
    outer.define_function(Function::new("describe", vec![Param::new("x", None)], |_| {
        Ok(Value::str("free"))
    }));
    let inner = Scope::with_parent(std::sync::Arc::new(outer));
    let found = runtime
        .lookup_method(&record("Point"), "describe", None, &inner)
        .unwrap()
        .unwrap();
    assert!(matches!(found.source, MethodSource::Inherent));
}

#[test]
fn non_callable_binding_does_not_reveal_inherent_method() {
    let runtime = Runtime::new();
    runtime.register_inherent("Point", text_method("size", "inherent"));
    let mut scope = Scope::new();
    scope.define("size", Value::i32(3));
    let found = runtime
        .lookup_method(&record("Point"), "size", None, &scope)
        .unwrap();
    assert!(found.is_none());
}

#[test]
fn inherent_method_beats_impl_method() {
    let runtime = Runtime::new();
    register_show_family(&runtime);
    runtime
        .register_impl(ImplDecl::new("Show", "Point").method(text_method("to_string", "impl")))
        .unwrap();
    runtime.register_inherent("Point", text_method("to_string", "inherent"));

    let mut scope = Scope::new();
    scope.define_type("Point");
    let found = runtime
        .lookup_method(&record("Point"), "to_string", None, &scope)
        .unwrap()
        .unwrap();
    assert!(matches!(found.source, MethodSource::Inherent));
    assert_eq!(call_text(&runtime, &record("Point"), "to_string"), "impl");
}

#[test]
fn inherent_method_satisfies_interface_structurally() {
    let runtime = Runtime::new();
    register_show_family(&runtime);
    runtime.register_inherent("Point", text_method("to_string", "inherent"));
    let point = runtime.descriptor_of(&record("Point")).unwrap();
    assert_eq!(runtime.satisfies(&point, "Show"), Ok(true));
    assert_eq!(runtime.satisfies(&point, "FancyShow"), Ok(false));
}

// Impl methods and the receiver

#[test]
fn impl_function_without_self_is_not_a_method() {
    let runtime = Runtime::new();
    runtime.register_interface(InterfaceDef::new("Make").signature("make"));
    runtime
        .register_impl(
            ImplDecl::new("Make", "Point")
                .method(Function::new("make", Vec::new(), |_| Ok(record("Point")))),
        )
        .unwrap();
    let found = runtime
        .lookup_method(&record("Point"), "make", None, &Scope::new())
        .unwrap();
    assert!(found.is_none());

    // Still reachable as a plain function through the impl pool.
    let descriptor = runtime.descriptor_of(&record("Point")).unwrap();
    let direct = runtime.find_method(&descriptor, "make", None).unwrap().unwrap();
    assert_eq!(direct.callable.call(&[]), Ok(record("Point")));
}

fn area_of(shape: &'static str, result: &'static str) -> Function {
    Function::new(
        "area",
        vec![Param::new("self", Some(TypeExpr::simple(shape)))],
        move |_| Ok(Value::str(result)),
    )
}

#[test]
fn impl_method_with_typed_self_rejects_other_receivers() {
    let runtime = Runtime::new();
    runtime.register_interface(InterfaceDef::new("Area").signature("area"));
    runtime
        .register_impl(
            ImplDecl::new("Area", TypeExpr::union(vec!["Circle".into(), "Square".into()]))
                .method(area_of("Circle", "circle")),
        )
        .unwrap();
    assert_eq!(call_text(&runtime, &record("Circle"), "area"), "circle");
    let err = runtime
        .resolve(&record("Square"), "area", None, &Scope::new())
        .unwrap_err();
    assert!(matches!(err, ResolveError::NoImplementation { .. }));
}

#[test]
fn impl_overloads_are_narrowed_by_receiver() {
    let runtime = Runtime::new();
    runtime.register_interface(InterfaceDef::new("Area").signature("area"));
    runtime
        .register_impl(
            ImplDecl::new("Area", TypeExpr::union(vec!["Circle".into(), "Square".into()]))
                .method(area_of("Circle", "circle"))
                .method(area_of("Square", "square")),
        )
        .unwrap();
    assert_eq!(call_text(&runtime, &record("Circle"), "area"), "circle");
    assert_eq!(call_text(&runtime, &record("Square"), "area"), "square");
}

#[test]
fn rejected_impl_method_falls_back_to_scope_function() {
    let runtime = Runtime::new();
    runtime.register_interface(InterfaceDef::new("Area").signature("area"));
    runtime
        .register_impl(
            ImplDecl::new("Area", TypeExpr::union(vec!["Circle".into(), "Square".into()]))
                .method(area_of("Circle", "circle")),
        )
        .unwrap();
    let mut scope = Scope::new();
    scope.define_function(Function::new(
        "area",
        vec![Param::new("shape", Some(TypeExpr::simple("Square")))],
        |_| Ok(Value::str("free square")),
    ));
    let found = runtime
        .lookup_method(&record("Square"), "area", None, &scope)
        .unwrap()
        .unwrap();
    assert!(matches!(found.source, MethodSource::ScopeFunction));
}

// Call-syntax fallback

fn area_function() -> Function {
    Function::new(
        "area",
        vec![Param::new("shape", Some(TypeExpr::simple("Circle")))],
        |_| Ok(Value::i32(314)),
    )
}

#[test]
fn free_function_is_callable_with_method_syntax() {
    let runtime = Runtime::new();
    let mut scope = Scope::new();
    scope.define_function(area_function());

    let area = runtime
        .call_method(&record("Circle"), "area", &[], &scope)
        .unwrap();
    assert_eq!(area, Value::i32(314));

    let found = runtime
        .lookup_method(&record("Circle"), "area", None, &scope)
        .unwrap()
        .unwrap();
    assert!(matches!(found.source, MethodSource::ScopeFunction));

    // The first parameter is typed, so a Square is not accepted.
    let err = runtime
        .resolve(&record("Square"), "area", None, &scope)
        .unwrap_err();
    assert!(matches!(err, ResolveError::NoImplementation { .. }));
}

#[test]
fn type_qualified_function_is_not_a_method() {
    let runtime = Runtime::new();
    let mut scope = Scope::new();
    scope.define_function(
        Function::new("origin", vec![Param::receiver()], |_| Ok(Value::Nil)).qualified(),
    );
    let found = runtime
        .lookup_method(&record("Point"), "origin", None, &scope)
        .unwrap();
    assert!(found.is_none());
}

#[test]
fn overloads_prefer_the_exact_receiver_type() {
    let runtime = Runtime::new();
    let mut scope = Scope::new();
    scope.define_function(Function::new("label", vec![Param::new("x", None)], |_| {
        Ok(Value::str("any"))
    }));
    scope.define_function(Function::new(
        "label",
        vec![Param::new("x", Some(TypeExpr::simple("Point")))],
        |_| Ok(Value::str("point")),
    ));
    assert_eq!(
        runtime.call_method(&record("Point"), "label", &[], &scope),
        Ok(Value::str("point"))
    );
    let line = runtime
        .call_method(&record("Line"), "label", &[], &scope)
        .unwrap();
    assert_eq!(line, Value::str("any"));
}

// Method-set contexts

fn point_block_scope() -> Scope {
    let context = MethodSetContext::new(TypeExpr::simple("Point"))
        .for_interface("Show")
        .with_method(text_method("helper", "inner"));
    Scope::new().with_method_set(context)
}

#[test]
fn method_set_context_resolves_first() {
    let runtime = Runtime::new();
    register_show_family(&runtime);
    runtime
        .register_impl(ImplDecl::new("Show", "Point").method(text_method("helper", "outer")))
        .unwrap();
    let scope = point_block_scope();
    let found = runtime
        .lookup_method(&record("Point"), "helper", None, &scope)
        .unwrap()
        .unwrap();
    assert!(matches!(found.source, MethodSource::MethodSet));

    // A nested frame still sees the enclosing block.
    let nested = Scope::with_parent(std::sync::Arc::new(scope));
    let value = runtime
        .call_method(&record("Point"), "helper", &[], &nested)
        .unwrap();
    assert_eq!(value, Value::str("inner"));
}

#[test]
fn method_set_context_respects_target_and_filter() {
    let runtime = Runtime::new();
    register_show_family(&runtime);
    runtime.register_interface(InterfaceDef::new("Debug").signature("debug"));
    let scope = point_block_scope();

    let other = runtime
        .lookup_method(&record("Line"), "helper", None, &scope)
        .unwrap();
    assert!(other.is_none());

    let same_interface = runtime
        .resolve(&record("Point"), "helper", Some("Show"), &scope)
        .unwrap();
    assert_eq!(same_interface.call(&[]), Ok(Value::str("inner")));

    let err = runtime
        .resolve(&record("Point"), "helper", Some("Debug"), &scope)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "No implementation of Debug.helper for type 'Point'"
    );
}

// Re-entrant resolution

#[test]
fn callable_body_may_resolve_again() {
    let runtime = Runtime::new();
    register_show_family(&runtime);
    runtime
        .register_impl(ImplDecl::new("Show", "Line").method(text_method("to_string", "line")))
        .unwrap();
    let inner = runtime.clone();
    runtime
        .register_impl(ImplDecl::new("Show", "Point").method(Function::method(
            "to_string",
            &[],
            move |_| {
                let line = inner.call_method(&record("Line"), "to_string", &[], &Scope::new())?;
                Ok(Value::str(format!("point on {}", line.as_str().unwrap_or("?"))))
            },
        )))
        .unwrap();
    assert_eq!(
        call_text(&runtime, &record("Point"), "to_string"),
        "point on line"
    );
}

#[test]
fn nested_failure_keeps_its_cause() {
    let runtime = Runtime::new();
    register_show_family(&runtime);
    let inner = runtime.clone();
    runtime
        .register_impl(ImplDecl::new("Show", "Point").method(Function::method(
            "to_string",
            &[],
            move |_| inner.call_method(&record("Ghost"), "to_string", &[], &Scope::new()),
        )))
        .unwrap();
    let err = runtime
        .call_method(&record("Point"), "to_string", &[], &Scope::new())
        .unwrap_err();
    assert!(matches!(
        err.resolve_error(),
        Some(ResolveError::NoImplementation { .. })
    ));
}

// Operators

fn money(cents: i32) -> Value {
    Value::record("Money", vec![("cents".into(), Value::i32(cents))])
}

fn cents(value: &Value) -> i128 {
    match value.unwrap_interface() {
        Value::Struct(s) => match s.field("cents") {
            Some(Value::Int { value, .. }) => *value,
            _ => 0,
        },
        _ => 0,
    }
}

fn money_runtime() -> Runtime {
    let runtime = Runtime::new();
    for (interface, method) in [("Add", "add"), ("Eq", "eq"), ("Ord", "cmp"), ("Neg", "neg")] {
        runtime.register_interface(InterfaceDef::new(interface).signature(method));
    }
    runtime.register_interface(InterfaceDef::new("PartialEq").signature("eq"));
    runtime
        .register_impl(ImplDecl::new("Add", "Money").method(Function::method(
            "add",
            &["other"],
            |args| {
                let total = cents(&args[0]) + cents(&args[1]);
                Ok(money(i32::try_from(total).unwrap_or(i32::MAX)))
            },
        )))
        .unwrap();
    runtime
        .register_impl(ImplDecl::new("Eq", "Money").method(Function::method(
            "eq",
            &["other"],
            |args| Ok(Value::Bool(cents(&args[0]) == cents(&args[1]))),
        )))
        .unwrap();
    runtime
        .register_impl(ImplDecl::new("Ord", "Money").method(Function::method(
            "cmp",
            &["other"],
            |args| Ok(Value::ordering(cents(&args[0]).cmp(&cents(&args[1])))),
        )))
        .unwrap();
    runtime
        .register_impl(ImplDecl::new("Neg", "Money").method(Function::method(
            "neg",
            &[],
            |args| Ok(money(-i32::try_from(cents(&args[0])).unwrap_or(0))),
        )))
        .unwrap();
    runtime
}

#[test]
fn arithmetic_operators_dispatch_to_impls() {
    let runtime = money_runtime();
    let sum = runtime.dispatch_operator("+", &money(150), &money(250)).unwrap().unwrap();
    assert_eq!(cents(&sum), 400);

    let compound = runtime.dispatch_operator("+=", &money(1), &money(2)).unwrap().unwrap();
    assert_eq!(cents(&compound), 3);

    let negated = runtime.dispatch_unary("-", &money(7)).unwrap().unwrap();
    assert_eq!(cents(&negated), -7);
}

#[test]
fn comparison_operators_use_eq_and_ord() {
    let runtime = money_runtime();
    let (a, b) = (money(5), money(9));
    assert_eq!(runtime.dispatch_operator("==", &a, &a), Ok(Some(Value::Bool(true))));
    assert_eq!(runtime.dispatch_operator("!=", &a, &b), Ok(Some(Value::Bool(true))));
    assert_eq!(runtime.dispatch_operator("<", &a, &b), Ok(Some(Value::Bool(true))));
    assert_eq!(runtime.dispatch_operator(">=", &a, &b), Ok(Some(Value::Bool(false))));
    assert_eq!(runtime.dispatch_operator("<=", &b, &b), Ok(Some(Value::Bool(true))));
}

#[test]
fn interface_wrapped_operands_are_unwrapped() {
    let runtime = money_runtime();
    let wrapped = Value::wrap_interface("Add", money(10));
    let sum = runtime.dispatch_operator("+", &wrapped, &money(5)).unwrap().unwrap();
    assert_eq!(cents(&sum), 15);
}

#[test]
fn unhandled_operators_fall_through() {
    let runtime = money_runtime();
    assert_eq!(runtime.dispatch_operator("+", &Value::i32(1), &Value::i32(2)), Ok(None));
    assert_eq!(runtime.dispatch_operator("*", &money(1), &money(2)), Ok(None));
    assert_eq!(runtime.dispatch_unary("!", &money(1)), Ok(None));
    assert_eq!(runtime.dispatch_unary("~", &money(1)), Ok(None));
}

#[test]
fn equality_falls_back_to_partial_eq() {
    let runtime = money_runtime();
    runtime
        .register_impl(ImplDecl::new("PartialEq", "Approx").method(Function::method(
            "eq",
            &["other"],
            |_| Ok(Value::Bool(true)),
        )))
        .unwrap();
    let result = runtime.dispatch_operator("==", &record("Approx"), &record("Approx"));
    assert_eq!(result, Ok(Some(Value::Bool(true))));
}

#[test]
fn comparison_with_wrong_result_shape_is_an_error() {
    let runtime = money_runtime();
    runtime
        .register_impl(ImplDecl::new("Eq", "Broken").method(Function::method(
            "eq",
            &["other"],
            |_| Ok(Value::i32(1)),
        )))
        .unwrap();
    runtime
        .register_impl(ImplDecl::new("Ord", "Broken").method(Function::method(
            "cmp",
            &["other"],
            |_| Ok(Value::Bool(true)),
        )))
        .unwrap();

    let err: EvalError = runtime
        .dispatch_operator("==", &record("Broken"), &record("Broken"))
        .unwrap_err();
    assert_eq!(err.to_string(), "comparison '==' requires bool result from Eq.eq");

    let err = runtime
        .dispatch_operator("<", &record("Broken"), &record("Broken"))
        .unwrap_err();
    assert_eq!(
        err.resolve_error(),
        Some(&ResolveError::InvalidOperatorResult {
            op: "<".to_string(),
            expected: "Ordering",
            interface: "Ord".into(),
            method: "cmp".into(),
        })
    );
}

#[test]
fn ordering_sentinels_round_trip() {
    for ordering in [Ordering::Less, Ordering::Equal, Ordering::Greater] {
        assert_eq!(Value::ordering(ordering).as_ordering(), Some(ordering));
    }
}
