//! Visible names of emitted declarations.
//!
//! A member's visible name starts from its declared name:
//! - properties and events declared on an interface are qualified with the
//!   interface's full name, so two interfaces can declare the same member;
//! - a method with explicit override targets takes the qualified name of
//!   its first target (explicit interface implementations);
//! - everything else keeps its short name.
//!
//! A rename annotation replaces the result outright. Otherwise an
//! overloaded method gets a `$<index>` suffix unless it is marked for
//! runtime dispatch.

use xlate_ir::{DeclRef, DeclStore};

use crate::{AnnotationNames, MetadataCollection, SemaError};

/// Separator between a method name and its overload index.
pub const OVERLOAD_SEPARATOR: char = '$';

/// The name a member is known by before renaming and overload suffixing.
///
/// Modules and types use their qualified names.
pub fn declared_name(store: &DeclStore, decl: DeclRef) -> String {
    let interface_qualified = |owner| {
        let owner = store.type_decl(owner);
        if owner.is_interface() {
            format!("{}.{}", owner.full_name, store.name_of(decl))
        } else {
            store.name_of(decl).to_owned()
        }
    };

    match decl {
        DeclRef::Module(_) | DeclRef::Type(_) => store.qualified_name(decl),
        DeclRef::Field(id) => store.field(id).name.clone(),
        DeclRef::Property(id) => interface_qualified(store.property(id).declaring_type),
        DeclRef::Event(id) => interface_qualified(store.event(id).declaring_type),
        DeclRef::Method(id) => {
            let method = store.method(id);
            match method.overrides.first() {
                Some(&target) => store.qualified_name(DeclRef::Method(target)),
                None => method.name.clone(),
            }
        }
    }
}

/// Apply renaming and overload suffixing to a declared name.
///
/// Fails when the rename annotation is ambiguous or carries no string.
pub fn visible_name(
    names: &AnnotationNames,
    metadata: &MetadataCollection,
    declared: &str,
    overload_index: Option<usize>,
) -> Result<String, SemaError> {
    if let Some(renamed) = metadata.get_single_string(&names.rename)? {
        return Ok(renamed.to_owned());
    }

    match overload_index {
        Some(index) if !metadata.has(&names.runtime_dispatch) => {
            Ok(format!("{declared}{OVERLOAD_SEPARATOR}{index}"))
        }
        _ => Ok(declared.to_owned()),
    }
}
