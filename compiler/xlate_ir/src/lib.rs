//! Xlate IR - declaration model for the semantic front-end.
//!
//! This crate contains the raw assembly metadata the front-end consumes:
//! - Handles (`ModuleId`, `TypeId`, member ids, `DeclRef`)
//! - Type signatures as they appear in member declarations
//! - Attached annotations and their constructor-style arguments
//! - The `DeclStore` arena that owns every declaration
//!
//! # Design Philosophy
//!
//! - **Handles, not pointers**: declarations are referenced by 32-bit ids
//!   into the store, so records built on top can be shared across threads
//!   without lifetimes.
//! - **Declaration order is preserved**: every list in the store keeps the
//!   order the metadata reader registered it in. Overload indices and proxy
//!   registration order depend on it.

mod annotation;
mod decl;
mod ids;
mod sig;
mod store;

pub use annotation::{Annotation, AnnotationArg};
pub use decl::{
    EventDecl, FieldDecl, MemberFlags, MethodDecl, ModuleDecl, ParamDecl, PropertyDecl, TypeDecl,
    TypeKind,
};
pub use ids::{DeclRef, EventId, FieldId, MethodId, ModuleId, PropertyId, TypeId};
pub use sig::{GenericOwner, TypeSig};
pub use store::DeclStore;

/// Name of the instance constructor.
pub const CTOR_NAME: &str = ".ctor";

/// Name of the static constructor (type initializer).
pub const CCTOR_NAME: &str = ".cctor";

/// Name of the runtime-reserved field holding an enum's underlying value.
pub const ENUM_VALUE_FIELD: &str = "value__";

/// Compile-time assertion that a type has a specific size.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{DeclRef, TypeId};
    static_assert_size!(TypeId, 4);
    static_assert_size!(DeclRef, 8);
}
