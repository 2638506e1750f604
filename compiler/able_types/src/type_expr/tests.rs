use super::*;
use pretty_assertions::assert_eq;

fn ty(name: &str) -> TypeExpr {
    TypeExpr::simple(name)
}

#[test]
fn display_forms() {
    let map = TypeExpr::generic("Map", vec![ty("String"), ty("V")]);
    assert_eq!(map.to_string(), "Map<String, V>");
    assert_eq!(TypeExpr::nullable(ty("i32")).to_string(), "i32?");
    assert_eq!(TypeExpr::result(ty("Point")).to_string(), "!Point");
    assert_eq!(
        TypeExpr::union(vec![ty("A"), ty("B"), ty("C")]).to_string(),
        "A | B | C"
    );
    assert_eq!(
        TypeExpr::function(vec![ty("i32"), ty("bool")], ty("String")).to_string(),
        "fn(i32, bool) -> String"
    );
    assert_eq!(TypeExpr::Wildcard.to_string(), "_");
}

#[test]
fn generic_without_args_is_simple() {
    assert_eq!(TypeExpr::generic("Point", vec![]), ty("Point"));
}

#[test]
fn head_name_and_args() {
    let wrap = TypeExpr::generic("Wrap", vec![ty("T")]);
    assert_eq!(wrap.head_name().map(Name::as_str), Some("Wrap"));
    assert_eq!(wrap.type_args(), &[ty("T")]);
    assert_eq!(TypeExpr::nullable(ty("i32")).head_name(), None);
    assert!(ty("i32").type_args().is_empty());
}

#[test]
fn uses_generics_looks_through_wrappers() {
    let generics: GenericNames = [Name::new("T")].into_iter().collect();
    let nested = TypeExpr::nullable(TypeExpr::generic("Array", vec![ty("T")]));
    assert!(nested.uses_generics(&generics));
    assert!(!TypeExpr::generic("Array", vec![ty("i32")]).uses_generics(&generics));
    assert!(!TypeExpr::Wildcard.uses_generics(&generics));
}

#[test]
fn substitute_replaces_bound_names_only() {
    let mut bindings = Bindings::default();
    bindings.insert(Name::new("T"), ty("i32"));
    let template = TypeExpr::generic("Pair", vec![ty("T"), ty("U")]);
    assert_eq!(
        template.substitute(&bindings),
        TypeExpr::generic("Pair", vec![ty("i32"), ty("U")])
    );
}

#[test]
fn agreement_treats_wildcards_as_holes() {
    let a = TypeExpr::generic("Array", vec![TypeExpr::Wildcard]);
    let b = TypeExpr::generic("Array", vec![ty("i32")]);
    assert!(a.agrees_with(&b));
    assert!(b.agrees_with(&a));
    assert!(!ty("i32").agrees_with(&ty("i64")));
    assert!(!TypeExpr::nullable(ty("i32")).agrees_with(&TypeExpr::result(ty("i32"))));
}
