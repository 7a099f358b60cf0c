//! Annotations (custom attributes) attached to declarations.

use crate::TypeSig;

/// One annotation instance: its kind's full name plus constructor arguments.
///
/// Annotations compare structurally, so two identical annotations on the
/// same declaration collapse when collected into a set.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Annotation {
    /// Full name of the annotation kind (e.g. `System.FlagsAttribute`).
    pub kind: String,

    /// Constructor arguments in declaration order.
    pub args: Vec<AnnotationArg>,
}

impl Annotation {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_arg(mut self, arg: AnnotationArg) -> Self {
        self.args.push(arg);
        self
    }
}

/// A constructor argument of an annotation.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum AnnotationArg {
    Str(String),
    Int(i64),
    Bool(bool),
    /// A `typeof(...)` argument.
    Type(TypeSig),
    /// A value of an enum type, stored as its underlying integer.
    Enum { enum_type: String, value: i64 },
    Array(Vec<AnnotationArg>),
}

impl AnnotationArg {
    pub fn str(value: impl Into<String>) -> Self {
        AnnotationArg::Str(value.into())
    }

    pub fn enum_value(enum_type: impl Into<String>, value: i64) -> Self {
        AnnotationArg::Enum {
            enum_type: enum_type.into(),
            value,
        }
    }

    /// Full name of the argument's declared type.
    ///
    /// Arrays report their first element's type with a `[]` suffix, or
    /// `System.Object[]` when empty.
    pub fn type_name(&self) -> String {
        match self {
            AnnotationArg::Str(_) => "System.String".to_owned(),
            AnnotationArg::Int(_) => "System.Int64".to_owned(),
            AnnotationArg::Bool(_) => "System.Boolean".to_owned(),
            AnnotationArg::Type(_) => "System.Type".to_owned(),
            AnnotationArg::Enum { enum_type, .. } => enum_type.clone(),
            AnnotationArg::Array(items) => match items.first() {
                Some(first) => format!("{}[]", first.type_name()),
                None => "System.Object[]".to_owned(),
            },
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnnotationArg::Str(s) => Some(s),
            _ => None,
        }
    }
}
