//! Shared fixtures for resolver integration tests.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use able_eval::{Function, ImplDecl, InterfaceDef, Runtime, Scope, TypeExpr, Value};

/// A method taking only `self` and returning fixed text.
pub fn text_method(name: &str, text: &'static str) -> Function {
    Function::method(name, &[], move |_| Ok(Value::str(text)))
}

pub fn record(type_name: &str) -> Value {
    Value::record(type_name, Vec::new())
}

/// `Wrap<arg>` with no fields.
pub fn wrap(arg: &str) -> Value {
    Value::generic_record("Wrap", vec![TypeExpr::simple(arg)], Vec::new())
}

pub fn wrap_t() -> TypeExpr {
    TypeExpr::generic("Wrap", vec![TypeExpr::simple("T")])
}

/// Call `method` with no extra arguments and read back a string result.
pub fn call_text(runtime: &Runtime, receiver: &Value, method: &str) -> String {
    let result = runtime
        .call_method(receiver, method, &[], &Scope::new())
        .unwrap();
    result.as_str().unwrap().to_string()
}

/// `Show`, `FancyShow: Show`, `ShinyShow: FancyShow`.
pub fn register_show_family(runtime: &Runtime) {
    runtime.register_interface(InterfaceDef::new("Show").signature("to_string"));
    runtime.register_interface(InterfaceDef::new("FancyShow").extends("Show").signature("fancy"));
    runtime.register_interface(
        InterfaceDef::new("ShinyShow")
            .extends("FancyShow")
            .signature("shine"),
    );
}

/// The `FancyBase`/`FancySpecial` types and two constrained `Show` impls
/// for `Wrap<T>`.
pub fn shine_scenario_impls() -> Vec<ImplDecl> {
    vec![
        ImplDecl::new("Show", "FancyBase").method(text_method("to_string", "base")),
        ImplDecl::new("FancyShow", "FancyBase").method(text_method("fancy", "fancy base")),
        ImplDecl::new("Show", "FancySpecial").method(text_method("to_string", "special")),
        ImplDecl::new("FancyShow", "FancySpecial").method(text_method("fancy", "fancy special")),
        ImplDecl::new("ShinyShow", "FancySpecial").method(text_method("shine", "shiny special")),
        ImplDecl::new("Show", wrap_t())
            .bounded("T", "FancyShow")
            .method(text_method("to_string", "fancy")),
        ImplDecl::new("Show", wrap_t())
            .bounded("T", "ShinyShow")
            .method(text_method("to_string", "shine")),
    ]
}

pub fn shine_runtime() -> Runtime {
    let runtime = Runtime::new();
    register_show_family(&runtime);
    for decl in shine_scenario_impls() {
        runtime.register_impl(decl).unwrap();
    }
    runtime
}

/// `Greet` and its child `Polite`, each carrying its own `greet` default,
/// with one impl of each for `Point`. Neither impl writes `greet` itself;
/// only the `Polite` impl defines any method at all.
pub fn register_greeting_defaults(runtime: &Runtime) {
    runtime.register_interface(
        InterfaceDef::new("Greet")
            .default_method(Function::method("greet", &[], |_| Ok(Value::str("hello")))),
    );
    runtime.register_interface(
        InterfaceDef::new("Polite")
            .extends("Greet")
            .signature("bow")
            .default_method(Function::method("greet", &[], |_| Ok(Value::str("good day")))),
    );
    runtime.register_impl(ImplDecl::new("Greet", "Point")).unwrap();
    runtime
        .register_impl(ImplDecl::new("Polite", "Point").method(text_method("bow", "bows")))
        .unwrap();
}
