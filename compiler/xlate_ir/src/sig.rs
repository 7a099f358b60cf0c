//! Type signatures as they appear in member declarations.

use std::fmt;

/// Where an unbound generic parameter was declared.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum GenericOwner {
    /// Declared by the enclosing type (`!0` in IL notation).
    Type,
    /// Declared by the method itself (`!!0` in IL notation).
    Method,
}

/// A type reference inside a field, property, event or method signature.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeSig {
    /// A named type, possibly instantiated with generic arguments.
    Named { full_name: String, args: Vec<TypeSig> },

    /// An unbound generic parameter.
    GenericParam {
        owner: GenericOwner,
        position: u32,
        name: String,
    },

    /// A managed reference (`ref`/`out` parameter).
    ByRef(Box<TypeSig>),

    /// An unmanaged pointer.
    Pointer(Box<TypeSig>),

    /// A single-dimensional array.
    Array(Box<TypeSig>),
}

impl TypeSig {
    /// A non-generic named type.
    pub fn named(full_name: impl Into<String>) -> Self {
        TypeSig::Named {
            full_name: full_name.into(),
            args: Vec::new(),
        }
    }

    /// A generic type instantiated with `args`.
    pub fn instantiated(full_name: impl Into<String>, args: Vec<TypeSig>) -> Self {
        TypeSig::Named {
            full_name: full_name.into(),
            args,
        }
    }

    /// `System.Void`, the return type of procedures.
    pub fn void() -> Self {
        Self::named("System.Void")
    }

    /// A generic parameter declared on the enclosing type.
    pub fn type_param(position: u32, name: impl Into<String>) -> Self {
        TypeSig::GenericParam {
            owner: GenericOwner::Type,
            position,
            name: name.into(),
        }
    }

    /// A generic parameter declared on the method.
    pub fn method_param(position: u32, name: impl Into<String>) -> Self {
        TypeSig::GenericParam {
            owner: GenericOwner::Method,
            position,
            name: name.into(),
        }
    }

    pub fn by_ref(inner: TypeSig) -> Self {
        TypeSig::ByRef(Box::new(inner))
    }

    pub fn pointer(inner: TypeSig) -> Self {
        TypeSig::Pointer(Box::new(inner))
    }

    pub fn array(element: TypeSig) -> Self {
        TypeSig::Array(Box::new(element))
    }

    /// Strip a managed reference, if any.
    pub fn dereferenced(&self) -> &TypeSig {
        match self {
            TypeSig::ByRef(inner) => inner,
            other => other,
        }
    }

    /// Whether this is an unbound generic parameter.
    pub fn is_generic_param(&self) -> bool {
        matches!(self, TypeSig::GenericParam { .. })
    }

    /// Whether an unmanaged pointer appears anywhere in this signature.
    pub fn contains_pointer(&self) -> bool {
        match self {
            TypeSig::Pointer(_) => true,
            TypeSig::ByRef(inner) | TypeSig::Array(inner) => inner.contains_pointer(),
            TypeSig::Named { args, .. } => args.iter().any(TypeSig::contains_pointer),
            TypeSig::GenericParam { .. } => false,
        }
    }
}

impl fmt::Display for TypeSig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSig::Named { full_name, args } => {
                write!(f, "{full_name}")?;
                if !args.is_empty() {
                    write!(f, "<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            TypeSig::GenericParam { name, .. } => write!(f, "{name}"),
            TypeSig::ByRef(inner) => write!(f, "{inner}&"),
            TypeSig::Pointer(inner) => write!(f, "{inner}*"),
            TypeSig::Array(inner) => write!(f, "{inner}[]"),
        }
    }
}
