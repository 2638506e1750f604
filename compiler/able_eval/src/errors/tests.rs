use super::*;

fn name(s: &str) -> Name {
    Name::new(s)
}

#[test]
fn duplicate_impl_message() {
    let err = duplicate_impl(&name("Show"), "Point");
    assert_eq!(err.to_string(), "Unnamed impl for (Show, Point) already exists");
}

#[test]
fn ambiguity_lists_every_candidate() {
    let err = ambiguous_impls(
        &name("Show"),
        "Wrap<i32>",
        vec!["impl Show for Wrap<T>".to_string(), "impl Show for Wrap<i32>".to_string()],
    );
    assert_eq!(
        err.to_string(),
        "ambiguous implementations of Show for Wrap<i32>: impl Show for Wrap<T>, impl Show for Wrap<i32>"
    );
}

#[test]
fn unresolved_constraint_messages() {
    let missing = missing_interface_method("Point", &name("Show"), &name("to_string"));
    assert_eq!(
        missing.to_string(),
        "Type 'Point' does not satisfy interface 'Show': missing method 'to_string'"
    );
    assert!(missing.is_constraint_failure());

    let marker = missing_marker_impl("Point", &name("Copy"));
    assert_eq!(
        marker.to_string(),
        "Type 'Point' does not satisfy interface 'Copy': no implementation found"
    );
    assert!(marker.is_constraint_failure());
}

#[test]
fn lookup_messages() {
    assert_eq!(
        private_method(&name("secret"), "Point").to_string(),
        "Method 'secret' on Point is private"
    );
    assert_eq!(
        no_implementation(None, &name("area"), "Point").to_string(),
        "No implementation of method 'area' for type 'Point'"
    );
    assert_eq!(
        no_implementation(Some(&name("Shape")), &name("area"), "Point").to_string(),
        "No implementation of Shape.area for type 'Point'"
    );
    assert_eq!(
        unknown_interface(&name("Shiny"), &name("T")).to_string(),
        "Unknown interface 'Shiny' in constraint on 'T'"
    );
    assert_eq!(ambiguous_overload(&name("add")).to_string(), "Ambiguous overload for add");
}

#[test]
fn operator_result_message() {
    let err = invalid_operator_result("<", "Ordering", "Ord", "cmp");
    assert_eq!(
        err.to_string(),
        "comparison '<' requires Ordering result from Ord.cmp"
    );
}

#[test]
fn only_unresolved_constraints_are_constraint_failures() {
    assert!(!undefined_interface(&name("Show")).is_constraint_failure());
    assert!(!unknown_interface(&name("Show"), &name("T")).is_constraint_failure());
    assert!(!ambiguous_impls(&name("Show"), "T", Vec::new()).is_constraint_failure());
}

#[test]
fn eval_error_keeps_resolve_source() {
    let err: EvalError = private_method(&name("secret"), "Point").into();
    assert_eq!(err.message, "Method 'secret' on Point is private");
    assert!(matches!(
        err.resolve_error(),
        Some(ResolveError::PrivateMethod { .. })
    ));

    let plain = EvalError::new("boom");
    assert_eq!(plain.to_string(), "boom");
    assert!(plain.resolve_error().is_none());
}

#[test]
fn target_errors() {
    assert_eq!(
        unsupported_target("i32?").to_string(),
        "Implementation target type i32? is not supported"
    );
    assert_eq!(
        target_requires_simple_base("T<i32>").to_string(),
        "Implementation target requires simple base type: T<i32>"
    );
    assert_eq!(
        empty_union_target().to_string(),
        "Union target must contain at least one concrete type"
    );
}
