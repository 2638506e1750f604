//! Runtime values as seen by the resolver.
//!
//! The evaluator owns the full value model; the resolver only needs enough of
//! it to derive a [`TypeDescriptor`], test values against type expressions,
//! and pass receivers through to callables.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use able_types::{Name, TypeDescriptor, TypeExpr};

use crate::callable::{BoundMethod, Callable};

/// Integer type suffix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntKind {
    I8,
    I16,
    I32,
    I64,
    I128,
    U8,
    U16,
    U32,
    U64,
    U128,
}

impl IntKind {
    pub const ALL: [IntKind; 10] = [
        IntKind::I8,
        IntKind::I16,
        IntKind::I32,
        IntKind::I64,
        IntKind::I128,
        IntKind::U8,
        IntKind::U16,
        IntKind::U32,
        IntKind::U64,
        IntKind::U128,
    ];

    pub fn type_name(self) -> &'static str {
        match self {
            IntKind::I8 => "i8",
            IntKind::I16 => "i16",
            IntKind::I32 => "i32",
            IntKind::I64 => "i64",
            IntKind::I128 => "i128",
            IntKind::U8 => "u8",
            IntKind::U16 => "u16",
            IntKind::U32 => "u32",
            IntKind::U64 => "u64",
            IntKind::U128 => "u128",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        IntKind::ALL.into_iter().find(|k| k.type_name() == name)
    }

    /// Inclusive value range, clamped to what an `i128` can hold.
    pub fn range(self) -> (i128, i128) {
        match self {
            IntKind::I8 => (i8::MIN.into(), i8::MAX.into()),
            IntKind::I16 => (i16::MIN.into(), i16::MAX.into()),
            IntKind::I32 => (i32::MIN.into(), i32::MAX.into()),
            IntKind::I64 => (i64::MIN.into(), i64::MAX.into()),
            IntKind::I128 => (i128::MIN, i128::MAX),
            IntKind::U8 => (0, u8::MAX.into()),
            IntKind::U16 => (0, u16::MAX.into()),
            IntKind::U32 => (0, u32::MAX.into()),
            IntKind::U64 => (0, u64::MAX.into()),
            IntKind::U128 => (0, i128::MAX),
        }
    }

    #[inline]
    pub fn contains(self, value: i128) -> bool {
        let (min, max) = self.range();
        (min..=max).contains(&value)
    }

    /// Whether every value of `self` is representable in `other`.
    pub fn fits_within(self, other: IntKind) -> bool {
        let (min, max) = self.range();
        let (other_min, other_max) = other.range();
        other_min <= min && max <= other_max
    }
}

/// Float type suffix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FloatKind {
    F32,
    F64,
}

impl FloatKind {
    pub fn type_name(self) -> &'static str {
        match self {
            FloatKind::F32 => "f32",
            FloatKind::F64 => "f64",
        }
    }
}

/// Instance of a user-declared struct.
#[derive(Clone, Debug, PartialEq)]
pub struct StructValue {
    pub type_name: Name,
    /// Concrete type arguments of a generic struct, empty otherwise.
    pub type_args: Vec<TypeExpr>,
    pub fields: Vec<(Name, Value)>,
}

impl StructValue {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }
}

/// A value viewed through an interface. Resolution sees through it.
#[derive(Clone, Debug, PartialEq)]
pub struct InterfaceValue {
    pub interface: Name,
    pub underlying: Value,
}

/// A runtime value.
#[derive(Clone)]
pub enum Value {
    Int { value: i128, kind: IntKind },
    Float { value: f64, kind: FloatKind },
    Bool(bool),
    Char(char),
    Str(Arc<str>),
    Nil,
    Void,
    Struct(Arc<StructValue>),
    Interface(Arc<InterfaceValue>),
    Array(Arc<Vec<Value>>),
    Function(Callable),
    BoundMethod(Arc<BoundMethod>),
    /// A type name bound in scope, as a value.
    TypeRef(Name),
}

impl Value {
    #[inline]
    pub fn int(value: i128, kind: IntKind) -> Self {
        Value::Int { value, kind }
    }

    #[inline]
    pub fn i32(value: i32) -> Self {
        Value::Int {
            value: value.into(),
            kind: IntKind::I32,
        }
    }

    #[inline]
    pub fn f64(value: f64) -> Self {
        Value::Float {
            value,
            kind: FloatKind::F64,
        }
    }

    pub fn str(s: impl AsRef<str>) -> Self {
        Value::Str(Arc::from(s.as_ref()))
    }

    /// A struct instance with no type arguments.
    pub fn record(type_name: impl Into<Name>, fields: Vec<(Name, Value)>) -> Self {
        Value::Struct(Arc::new(StructValue {
            type_name: type_name.into(),
            type_args: Vec::new(),
            fields,
        }))
    }

    /// A generic struct instance such as `Wrap<Point>`.
    pub fn generic_record(
        type_name: impl Into<Name>,
        type_args: Vec<TypeExpr>,
        fields: Vec<(Name, Value)>,
    ) -> Self {
        Value::Struct(Arc::new(StructValue {
            type_name: type_name.into(),
            type_args,
            fields,
        }))
    }

    pub fn wrap_interface(interface: impl Into<Name>, underlying: Value) -> Self {
        Value::Interface(Arc::new(InterfaceValue {
            interface: interface.into(),
            underlying,
        }))
    }

    /// The `Less`/`Equal`/`Greater` sentinel returned by `cmp`.
    pub fn ordering(ordering: Ordering) -> Self {
        let name = match ordering {
            Ordering::Less => "Less",
            Ordering::Equal => "Equal",
            Ordering::Greater => "Greater",
        };
        Value::record(name, Vec::new())
    }

    /// Reads back an ordering sentinel.
    pub fn as_ordering(&self) -> Option<Ordering> {
        match self.unwrap_interface() {
            Value::Struct(s) => match s.type_name.as_str() {
                "Less" => Some(Ordering::Less),
                "Equal" => Some(Ordering::Equal),
                "Greater" => Some(Ordering::Greater),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.unwrap_interface() {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.unwrap_interface() {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Strip any interface wrappers.
    pub fn unwrap_interface(&self) -> &Value {
        let mut current = self;
        while let Value::Interface(iface) = current {
            current = &iface.underlying;
        }
        current
    }

    /// Language primitives: numbers, strings, booleans, chars, nil, and arrays.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self.unwrap_interface(),
            Value::Int { .. }
                | Value::Float { .. }
                | Value::Bool(_)
                | Value::Char(_)
                | Value::Str(_)
                | Value::Nil
                | Value::Array(_)
        )
    }

    /// The nominal type of this value, if it has one.
    ///
    /// Interface wrappers are transparent. Arrays report an uninstantiated
    /// `Array`; functions and type references have no descriptor.
    pub fn descriptor(&self) -> Option<TypeDescriptor> {
        match self {
            Value::Int { kind, .. } => Some(TypeDescriptor::simple(kind.type_name())),
            Value::Float { kind, .. } => Some(TypeDescriptor::simple(kind.type_name())),
            Value::Bool(_) => Some(TypeDescriptor::simple("bool")),
            Value::Char(_) => Some(TypeDescriptor::simple("char")),
            Value::Str(_) => Some(TypeDescriptor::simple("String")),
            Value::Nil => Some(TypeDescriptor::simple("nil")),
            Value::Void => Some(TypeDescriptor::simple("void")),
            Value::Struct(s) => Some(TypeDescriptor::new(s.type_name.clone(), s.type_args.clone())),
            Value::Interface(iface) => iface.underlying.descriptor(),
            Value::Array(_) => Some(TypeDescriptor::simple("Array")),
            Value::Function(_) | Value::BoundMethod(_) | Value::TypeRef(_) => None,
        }
    }

    /// Short type label for diagnostics.
    pub fn type_label(&self) -> String {
        match self.descriptor() {
            Some(descriptor) => descriptor.to_string(),
            None => match self {
                Value::TypeRef(_) => "type".to_string(),
                _ => "function".to_string(),
            },
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int { value: a, kind: ak }, Value::Int { value: b, kind: bk }) => {
                a == b && ak == bk
            }
            (Value::Float { value: a, kind: ak }, Value::Float { value: b, kind: bk }) => {
                a == b && ak == bk
            }
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Nil, Value::Nil) | (Value::Void, Value::Void) => true,
            (Value::Struct(a), Value::Struct(b)) => a == b,
            (Value::Interface(a), Value::Interface(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.same_callable(b),
            (Value::BoundMethod(a), Value::BoundMethod(b)) => Arc::ptr_eq(a, b),
            (Value::TypeRef(a), Value::TypeRef(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int { value, kind } => write!(f, "{value}_{}", kind.type_name()),
            Value::Float { value, kind } => write!(f, "{value}_{}", kind.type_name()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Char(c) => write!(f, "{c:?}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Nil => f.write_str("nil"),
            Value::Void => f.write_str("void"),
            Value::Struct(s) => {
                write!(f, "{}", s.type_name)?;
                if !s.type_args.is_empty() {
                    let args: Vec<String> = s.type_args.iter().map(ToString::to_string).collect();
                    write!(f, "<{}>", args.join(", "))?;
                }
                if s.fields.is_empty() {
                    return Ok(());
                }
                let mut map = f.debug_map();
                for (name, value) in &s.fields {
                    map.entry(&name.as_str(), value);
                }
                map.finish()
            }
            Value::Interface(iface) => write!(f, "{}({:?})", iface.interface, iface.underlying),
            Value::Array(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Function(callable) => write!(f, "{callable:?}"),
            Value::BoundMethod(bound) => write!(f, "{bound:?}"),
            Value::TypeRef(name) => write!(f, "type {name}"),
        }
    }
}
