//! Declarations as produced by the metadata reader.
//!
//! All declarations are plain data owned by the `DeclStore`. Cross-links
//! (declaring type, accessors, override targets) are handles, never
//! references.

use bitflags::bitflags;

use crate::{Annotation, EventId, FieldId, MethodId, ModuleId, PropertyId, TypeId, TypeSig};

bitflags! {
    /// Member attributes relevant to semantic model construction.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct MemberFlags: u16 {
        /// Belongs to the type rather than an instance.
        const STATIC = 1 << 0;
        /// Has no body; must be supplied by a derived type.
        const ABSTRACT = 1 << 1;
        /// Dispatched through the virtual table.
        const VIRTUAL = 1 << 2;
        /// Name has special meaning to the runtime (accessors, constructors).
        const SPECIAL_NAME = 1 << 3;
        /// Compile-time constant field.
        const LITERAL = 1 << 4;
    }
}

/// A module (translation unit).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleDecl {
    /// Qualified module name.
    pub name: String,
    pub annotations: Vec<Annotation>,
}

/// The kind of a type declaration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
}

/// A type declaration and its own (non-inherited) members.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDecl {
    pub module: ModuleId,
    pub namespace: String,
    /// Short name, including any generic arity suffix (`List`1`).
    pub name: String,
    /// Namespace-qualified name; nested types are joined with `+`.
    pub full_name: String,
    pub kind: TypeKind,
    /// Enclosing type for nested types.
    pub declaring_type: Option<TypeId>,
    pub generic_params: Vec<String>,
    pub fields: Vec<FieldId>,
    pub properties: Vec<PropertyId>,
    pub events: Vec<EventId>,
    pub methods: Vec<MethodId>,
    pub annotations: Vec<Annotation>,
}

impl TypeDecl {
    #[inline]
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    #[inline]
    pub fn is_enum(&self) -> bool {
        self.kind == TypeKind::Enum
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDecl {
    pub declaring_type: TypeId,
    pub name: String,
    pub ty: TypeSig,
    pub flags: MemberFlags,
    /// Declared constant value (enum literals, `const` fields).
    pub constant: Option<i64>,
    pub annotations: Vec<Annotation>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyDecl {
    pub declaring_type: TypeId,
    pub name: String,
    pub ty: TypeSig,
    pub getter: Option<MethodId>,
    pub setter: Option<MethodId>,
    pub annotations: Vec<Annotation>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventDecl {
    pub declaring_type: TypeId,
    pub name: String,
    pub ty: TypeSig,
    pub add: Option<MethodId>,
    pub remove: Option<MethodId>,
    pub annotations: Vec<Annotation>,
}

/// A method parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParamDecl {
    pub name: String,
    pub ty: TypeSig,
}

impl ParamDecl {
    pub fn new(name: impl Into<String>, ty: TypeSig) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodDecl {
    pub declaring_type: TypeId,
    pub name: String,
    pub return_type: TypeSig,
    pub params: Vec<ParamDecl>,
    pub flags: MemberFlags,
    /// Explicit override targets (`.override` directives), e.g. the
    /// interface method an explicit interface implementation fulfils.
    pub overrides: Vec<MethodId>,
    pub generic_params: Vec<String>,
    pub annotations: Vec<Annotation>,
}

impl MethodDecl {
    #[inline]
    pub fn is_static(&self) -> bool {
        self.flags.contains(MemberFlags::STATIC)
    }

    #[inline]
    pub fn is_abstract(&self) -> bool {
        self.flags.contains(MemberFlags::ABSTRACT)
    }

    /// Whether this is an instance constructor.
    #[inline]
    pub fn is_constructor(&self) -> bool {
        self.name == crate::CTOR_NAME
    }
}
