//! Structural member identity.
//!
//! A `MemberIdentifier` is the key used to match a member of one type
//! against a member of an independently declared type (a proxy overlay).
//! Declaration handles are never used for this: two declarations are "the
//! same member" when kind, name and signature agree.
//!
//! # Generic tolerance
//!
//! A type position holding an unbound generic parameter (directly or behind
//! a `ByRef`) matches any type. This lets a generic proxy match a concrete
//! instantiation in its target. The relation is reflexive and symmetric
//! but not transitive, so the hash only covers kind, name and parameter
//! count.

use std::fmt;
use std::hash::{Hash, Hasher};

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use xlate_ir::{DeclRef, DeclStore, EventId, FieldId, MethodId, PropertyId, TypeSig};

use crate::SemaError;

/// Parameter types of a method or indexed property.
pub type ParamTypes = SmallVec<[TypeSig; 4]>;

/// The four member kinds the model recognizes.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum MemberKind {
    Field,
    Property,
    Event,
    Method,
}

impl MemberKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            MemberKind::Field => "field",
            MemberKind::Property => "property",
            MemberKind::Event => "event",
            MemberKind::Method => "method",
        }
    }
}

/// Generics-tolerant structural key for a member declaration.
#[derive(Clone, Debug)]
pub struct MemberIdentifier {
    kind: MemberKind,
    name: String,
    /// Field/property/event value type, or method return type.
    ty: TypeSig,
    /// `None` for fields, events and accessor-less properties.
    params: Option<ParamTypes>,
}

impl MemberIdentifier {
    /// Build the identifier of any member declaration.
    ///
    /// Module and type handles are rejected with `UnsupportedKind`.
    pub fn new(store: &DeclStore, decl: DeclRef) -> Result<Self, SemaError> {
        match decl {
            DeclRef::Field(id) => Ok(Self::of_field(store, id)),
            DeclRef::Property(id) => Ok(Self::of_property(store, id)),
            DeclRef::Event(id) => Ok(Self::of_event(store, id)),
            DeclRef::Method(id) => Ok(Self::of_method(store, id)),
            DeclRef::Module(_) | DeclRef::Type(_) => Err(SemaError::UnsupportedKind {
                name: store.qualified_name(decl),
                found: decl.kind_name(),
                expected: "a field, property, event or method",
            }),
        }
    }

    pub fn of_field(store: &DeclStore, id: FieldId) -> Self {
        let field = store.field(id);
        Self {
            kind: MemberKind::Field,
            name: field.name.clone(),
            ty: field.ty.clone(),
            params: None,
        }
    }

    /// Parameters come from the getter, else from the setter minus its
    /// trailing value parameter, else are absent.
    pub fn of_property(store: &DeclStore, id: PropertyId) -> Self {
        let property = store.property(id);
        let params = if let Some(getter) = property.getter {
            Some(param_types(store, getter, 0))
        } else {
            property.setter.map(|setter| param_types(store, setter, 1))
        };
        Self {
            kind: MemberKind::Property,
            name: property.name.clone(),
            ty: property.ty.clone(),
            params,
        }
    }

    pub fn of_event(store: &DeclStore, id: EventId) -> Self {
        let event = store.event(id);
        Self {
            kind: MemberKind::Event,
            name: event.name.clone(),
            ty: event.ty.clone(),
            params: None,
        }
    }

    pub fn of_method(store: &DeclStore, id: MethodId) -> Self {
        let method = store.method(id);
        Self {
            kind: MemberKind::Method,
            name: method.name.clone(),
            ty: method.return_type.clone(),
            params: Some(param_types(store, id, 0)),
        }
    }

    #[inline]
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value type, or return type for methods.
    #[inline]
    pub fn value_type(&self) -> &TypeSig {
        &self.ty
    }

    #[inline]
    pub fn params(&self) -> Option<&[TypeSig]> {
        self.params.as_deref()
    }

    /// Strict structural equality: every type position must be the same,
    /// generic parameters included.
    pub fn is_identical(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.name == other.name
            && self.ty == other.ty
            && self.params == other.params
    }

    /// The parts equality compares exactly.
    fn bucket(&self) -> Bucket {
        (self.kind, self.name.clone(), self.params.as_ref().map(SmallVec::len))
    }
}

/// Parameter types of `method`, dropping `skip_last` trailing parameters.
fn param_types(store: &DeclStore, method: MethodId, skip_last: usize) -> ParamTypes {
    let params = &store.method(method).params;
    let keep = params.len().saturating_sub(skip_last);
    params[..keep].iter().map(|p| p.ty.clone()).collect()
}

/// Compare two signature types, treating unbound generic parameters as
/// wildcards.
pub fn types_match(a: &TypeSig, b: &TypeSig) -> bool {
    if a.dereferenced().is_generic_param() || b.dereferenced().is_generic_param() {
        return true;
    }

    match (a, b) {
        (
            TypeSig::Named {
                full_name: a_name,
                args: a_args,
            },
            TypeSig::Named {
                full_name: b_name,
                args: b_args,
            },
        ) => {
            a_name == b_name
                && a_args.len() == b_args.len()
                && a_args.iter().zip(b_args).all(|(x, y)| types_match(x, y))
        }
        (TypeSig::ByRef(x), TypeSig::ByRef(y))
        | (TypeSig::Pointer(x), TypeSig::Pointer(y))
        | (TypeSig::Array(x), TypeSig::Array(y)) => types_match(x, y),
        _ => false,
    }
}

impl PartialEq for MemberIdentifier {
    fn eq(&self, other: &Self) -> bool {
        if self.kind != other.kind || self.name != other.name {
            return false;
        }
        if !types_match(&self.ty, &other.ty) {
            return false;
        }
        match (&self.params, &other.params) {
            (None, None) => true,
            (Some(a), Some(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| types_match(x, y))
            }
            _ => false,
        }
    }
}

impl Eq for MemberIdentifier {}

impl Hash for MemberIdentifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.name.hash(state);
        self.params.as_ref().map(SmallVec::len).hash(state);
    }
}

impl fmt::Display for MemberIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.as_str(), self.name)?;
        if let Some(params) = &self.params {
            write!(f, "(")?;
            for (i, param) in params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{param}")?;
            }
            write!(f, ")")?;
        }
        write!(f, ": {}", self.ty)
    }
}

type Bucket = (MemberKind, String, Option<usize>);

/// Ordered map keyed by `MemberIdentifier`.
///
/// Entries keep insertion order. Several entries may have equal
/// identifiers (overloads that differ only in a generic position). Lookup
/// prefers an entry identical to the key and otherwise finds the first
/// equal one registered.
#[derive(Clone, Debug)]
pub struct MemberTable<V> {
    entries: Vec<(MemberIdentifier, V)>,
    buckets: FxHashMap<Bucket, SmallVec<[usize; 2]>>,
}

impl<V> Default for MemberTable<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            buckets: FxHashMap::default(),
        }
    }
}

impl<V> MemberTable<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry; returns its position.
    pub fn push(&mut self, id: MemberIdentifier, value: V) -> usize {
        let position = self.entries.len();
        self.buckets.entry(id.bucket()).or_default().push(position);
        self.entries.push((id, value));
        position
    }

    pub fn get(&self, id: &MemberIdentifier) -> Option<&V> {
        self.position(id).map(|position| &self.entries[position].1)
    }

    pub fn position(&self, id: &MemberIdentifier) -> Option<usize> {
        let candidates = self.buckets.get(&id.bucket())?;
        let key = |position: usize| &self.entries[position].0;
        candidates
            .iter()
            .find(|p| key(**p).is_identical(id))
            .or_else(|| candidates.iter().find(|p| key(**p) == id))
            .copied()
    }

    pub fn contains(&self, id: &MemberIdentifier) -> bool {
        self.position(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MemberIdentifier, &V)> {
        self.entries.iter().map(|(id, value)| (id, value))
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests;
