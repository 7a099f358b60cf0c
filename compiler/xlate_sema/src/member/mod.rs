//! Member records.
//!
//! `MemberInfo` is a closed sum over the four member kinds. Every variant
//! wraps a `MemberCore` with the data all kinds share, and the `Member`
//! trait exposes that data uniformly so downstream passes can ask for a
//! member's visible name or ignore flag without matching on its kind.
//!
//! Narrowing comes in two flavors: `as_*` returns `None` on a kind
//! mismatch, `expect_*` fails with `UnsupportedKind` for callers that treat
//! a mismatch as a metadata defect.

use xlate_ir::{DeclRef, EventId, FieldId, MethodId, PropertyId, TypeId, TypeSig};

use crate::{MetadataCollection, SemaError};

/// Data shared by every member kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberCore {
    /// The type whose record owns this member.
    pub(crate) declaring_type: TypeId,
    /// The member's own declaration (a proxy's, for contributed members).
    pub(crate) decl: DeclRef,
    /// The declaration that supplies the implementation after proxy
    /// resolution.
    pub(crate) backing: DeclRef,
    /// Qualified name, for diagnostics and name heuristics.
    pub(crate) qualified_name: String,
    pub(crate) name: String,
    pub(crate) visible_name: String,
    pub(crate) metadata: MetadataCollection,
    pub(crate) is_ignored: bool,
}

/// Read access to the data every member kind carries.
pub trait Member {
    fn core(&self) -> &MemberCore;

    fn declaring_type(&self) -> TypeId {
        self.core().declaring_type
    }

    fn decl(&self) -> DeclRef {
        self.core().decl
    }

    /// Declaration that backs this member once proxies are applied.
    fn backing(&self) -> DeclRef {
        self.core().backing
    }

    /// Whether a proxy supplies this member's implementation.
    fn is_substituted(&self) -> bool {
        self.core().backing != self.core().decl
    }

    fn qualified_name(&self) -> &str {
        &self.core().qualified_name
    }

    /// Declared name before renaming and overload suffixing.
    fn name(&self) -> &str {
        &self.core().name
    }

    /// Name used by code generation.
    fn visible_name(&self) -> &str {
        &self.core().visible_name
    }

    fn metadata(&self) -> &MetadataCollection {
        &self.core().metadata
    }

    /// Whether the member must not be emitted.
    fn is_ignored(&self) -> bool {
        self.core().is_ignored
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldInfo {
    pub(crate) core: MemberCore,
    pub(crate) id: FieldId,
    pub(crate) ty: TypeSig,
    pub(crate) is_static: bool,
}

impl FieldInfo {
    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn ty(&self) -> &TypeSig {
        &self.ty
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyInfo {
    pub(crate) core: MemberCore,
    pub(crate) id: PropertyId,
    pub(crate) ty: TypeSig,
    pub(crate) getter: Option<MethodId>,
    pub(crate) setter: Option<MethodId>,
}

impl PropertyInfo {
    pub fn id(&self) -> PropertyId {
        self.id
    }

    pub fn ty(&self) -> &TypeSig {
        &self.ty
    }

    pub fn getter(&self) -> Option<MethodId> {
        self.getter
    }

    pub fn setter(&self) -> Option<MethodId> {
        self.setter
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventInfo {
    pub(crate) core: MemberCore,
    pub(crate) id: EventId,
    pub(crate) ty: TypeSig,
    pub(crate) add: Option<MethodId>,
    pub(crate) remove: Option<MethodId>,
}

impl EventInfo {
    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn ty(&self) -> &TypeSig {
        &self.ty
    }

    pub fn add(&self) -> Option<MethodId> {
        self.add
    }

    pub fn remove(&self) -> Option<MethodId> {
        self.remove
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodInfo {
    pub(crate) core: MemberCore,
    /// `None` for a synthesized static constructor.
    pub(crate) id: Option<MethodId>,
    pub(crate) is_static: bool,
    pub(crate) is_constructor: bool,
    /// Dense index within the method's group, if it is overloaded.
    pub(crate) overload_index: Option<usize>,
    /// Property accessed by this method, if it is a getter or setter.
    pub(crate) property: Option<PropertyId>,
    /// Event accessed by this method, if it is an add or remove accessor.
    pub(crate) event: Option<EventId>,
}

impl MethodInfo {
    /// A static constructor with no declaration behind it.
    ///
    /// Lowering synthesizes one when static field initializers need a home
    /// and the type declares none. The type's own handle stands in for the
    /// missing declaration.
    pub fn synthesized_static_constructor(
        declaring_type: TypeId,
        type_name: &str,
        is_ignored: bool,
    ) -> Self {
        let decl = DeclRef::Type(declaring_type);
        let qualified_name = format!("{type_name}.{}", xlate_ir::CCTOR_NAME);
        Self {
            core: MemberCore {
                declaring_type,
                decl,
                backing: decl,
                metadata: MetadataCollection::new(qualified_name.clone()),
                qualified_name,
                name: xlate_ir::CCTOR_NAME.to_owned(),
                visible_name: xlate_ir::CCTOR_NAME.to_owned(),
                is_ignored,
            },
            id: None,
            is_static: true,
            is_constructor: false,
            overload_index: None,
            property: None,
            event: None,
        }
    }

    /// The method declaration; `None` when synthesized.
    pub fn id(&self) -> Option<MethodId> {
        self.id
    }

    pub fn is_synthesized(&self) -> bool {
        self.id.is_none()
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Whether this is an instance constructor.
    pub fn is_constructor(&self) -> bool {
        self.is_constructor
    }

    pub fn overload_index(&self) -> Option<usize> {
        self.overload_index
    }

    pub fn property(&self) -> Option<PropertyId> {
        self.property
    }

    pub fn event(&self) -> Option<EventId> {
        self.event
    }

    /// Whether this is a property or event accessor.
    pub fn is_accessor(&self) -> bool {
        self.property.is_some() || self.event.is_some()
    }
}

/// The semantic record of one member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MemberInfo {
    Field(FieldInfo),
    Property(PropertyInfo),
    Event(EventInfo),
    Method(MethodInfo),
}

macro_rules! impl_member {
    ($($ty:ident),*) => {
        $(
            impl Member for $ty {
                #[inline]
                fn core(&self) -> &MemberCore {
                    &self.core
                }
            }
        )*
    };
}

impl_member!(FieldInfo, PropertyInfo, EventInfo, MethodInfo);

impl Member for MemberInfo {
    fn core(&self) -> &MemberCore {
        match self {
            MemberInfo::Field(info) => &info.core,
            MemberInfo::Property(info) => &info.core,
            MemberInfo::Event(info) => &info.core,
            MemberInfo::Method(info) => &info.core,
        }
    }
}

impl MemberInfo {
    pub(crate) fn core_mut(&mut self) -> &mut MemberCore {
        match self {
            MemberInfo::Field(info) => &mut info.core,
            MemberInfo::Property(info) => &mut info.core,
            MemberInfo::Event(info) => &mut info.core,
            MemberInfo::Method(info) => &mut info.core,
        }
    }

    /// Kind name used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            MemberInfo::Field(_) => "field",
            MemberInfo::Property(_) => "property",
            MemberInfo::Event(_) => "event",
            MemberInfo::Method(_) => "method",
        }
    }

    pub fn as_field(&self) -> Option<&FieldInfo> {
        match self {
            MemberInfo::Field(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_property(&self) -> Option<&PropertyInfo> {
        match self {
            MemberInfo::Property(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_event(&self) -> Option<&EventInfo> {
        match self {
            MemberInfo::Event(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_method(&self) -> Option<&MethodInfo> {
        match self {
            MemberInfo::Method(info) => Some(info),
            _ => None,
        }
    }

    pub fn expect_field(&self) -> Result<&FieldInfo, SemaError> {
        self.as_field().ok_or_else(|| self.mismatch("a field"))
    }

    pub fn expect_property(&self) -> Result<&PropertyInfo, SemaError> {
        self.as_property().ok_or_else(|| self.mismatch("a property"))
    }

    pub fn expect_event(&self) -> Result<&EventInfo, SemaError> {
        self.as_event().ok_or_else(|| self.mismatch("an event"))
    }

    pub fn expect_method(&self) -> Result<&MethodInfo, SemaError> {
        self.as_method().ok_or_else(|| self.mismatch("a method"))
    }

    fn mismatch(&self, expected: &'static str) -> SemaError {
        SemaError::UnsupportedKind {
            name: self.qualified_name().to_owned(),
            found: self.kind_name(),
            expected,
        }
    }
}

/// Methods of one type sharing a name and static-ness.
///
/// Only overloaded names form a group; `methods[i]` has overload index `i`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodGroup {
    pub(crate) name: String,
    pub(crate) is_static: bool,
    pub(crate) methods: Vec<MethodId>,
}

impl MethodGroup {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Members in overload-index order.
    pub fn methods(&self) -> &[MethodId] {
        &self.methods
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

/// One literal of an enum type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumMember {
    pub(crate) declaring_type: TypeId,
    pub(crate) field: FieldId,
    pub(crate) full_name: String,
    pub(crate) name: String,
    pub(crate) value: i64,
}

impl EnumMember {
    pub fn declaring_type(&self) -> TypeId {
        self.declaring_type
    }

    pub fn field(&self) -> FieldId {
        self.field
    }

    /// `Enum.Type.FullName.Literal`.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> i64 {
        self.value
    }
}
