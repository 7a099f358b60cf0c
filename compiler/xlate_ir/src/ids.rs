//! Declaration handles.
//!
//! Every declaration lives in the `DeclStore` and is referenced by a 32-bit
//! index. Handles are `Copy` and compare by index, so they double as the
//! identity keys for memoized record construction.

use std::fmt;

macro_rules! decl_handle {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Create a handle from a raw u32 value.
            #[inline]
            pub const fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            /// Get the raw u32 value.
            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            /// Position in the owning store's declaration list.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

decl_handle!(
    /// Handle to a module (one translation unit).
    ModuleId,
    "module"
);
decl_handle!(
    /// Handle to a type declaration.
    TypeId,
    "type"
);
decl_handle!(
    /// Handle to a field declaration.
    FieldId,
    "field"
);
decl_handle!(
    /// Handle to a property declaration.
    PropertyId,
    "property"
);
decl_handle!(
    /// Handle to an event declaration.
    EventId,
    "event"
);
decl_handle!(
    /// Handle to a method declaration (including accessors and constructors).
    MethodId,
    "method"
);

/// A handle to any declaration the metadata reader hands out.
///
/// Only the four member variants describe members; code that needs a member
/// must reject `Module` and `Type` explicitly.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum DeclRef {
    Module(ModuleId),
    Type(TypeId),
    Field(FieldId),
    Property(PropertyId),
    Event(EventId),
    Method(MethodId),
}

impl DeclRef {
    /// Human-readable kind name, used in diagnostics.
    pub const fn kind_name(self) -> &'static str {
        match self {
            DeclRef::Module(_) => "module",
            DeclRef::Type(_) => "type",
            DeclRef::Field(_) => "field",
            DeclRef::Property(_) => "property",
            DeclRef::Event(_) => "event",
            DeclRef::Method(_) => "method",
        }
    }

    /// Whether this handle names a field, property, event or method.
    pub const fn is_member(self) -> bool {
        matches!(
            self,
            DeclRef::Field(_) | DeclRef::Property(_) | DeclRef::Event(_) | DeclRef::Method(_)
        )
    }
}

impl From<FieldId> for DeclRef {
    fn from(id: FieldId) -> Self {
        DeclRef::Field(id)
    }
}

impl From<PropertyId> for DeclRef {
    fn from(id: PropertyId) -> Self {
        DeclRef::Property(id)
    }
}

impl From<EventId> for DeclRef {
    fn from(id: EventId) -> Self {
        DeclRef::Event(id)
    }
}

impl From<MethodId> for DeclRef {
    fn from(id: MethodId) -> Self {
        DeclRef::Method(id)
    }
}

impl From<TypeId> for DeclRef {
    fn from(id: TypeId) -> Self {
        DeclRef::Type(id)
    }
}

impl From<ModuleId> for DeclRef {
    fn from(id: ModuleId) -> Self {
        DeclRef::Module(id)
    }
}
