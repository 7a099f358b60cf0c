//! Module and type records.
//!
//! A `TypeInfo` is the resolved view of one type declaration: its own
//! members with proxy substitutions applied, members contributed by its
//! proxies, merged metadata, overload groups and enum tables. It is built
//! once (see `builder`) and is immutable afterwards, except for the
//! write-once static-constructor slot.

mod builder;

use std::sync::{Arc, OnceLock};

use rustc_hash::FxHashMap;
use xlate_ir::{DeclRef, DeclStore, MethodId, ModuleId, TypeId, TypeKind, CCTOR_NAME};

use crate::ignored::is_ignored_name;
use crate::member::{EnumMember, Member, MemberInfo, MethodGroup, MethodInfo};
use crate::member_id::{MemberIdentifier, MemberTable};
use crate::proxy::ProxyInfo;
use crate::source::MetadataSource;
use crate::{AnnotationNames, MetadataCollection, SemaError};

/// The semantic record of one module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleInfo {
    id: ModuleId,
    name: String,
    metadata: MetadataCollection,
    is_ignored: bool,
}

impl ModuleInfo {
    #[tracing::instrument(level = "debug", skip_all, fields(module = %store.module(id).name))]
    pub fn build(store: &DeclStore, names: &AnnotationNames, id: ModuleId) -> Self {
        let decl = DeclRef::Module(id);
        let metadata = MetadataCollection::from_declaration(store, decl);
        let name = store.qualified_name(decl);
        let is_ignored = is_ignored_name(&name) || metadata.has(&names.ignore);
        Self {
            id,
            name,
            metadata,
            is_ignored,
        }
    }

    pub fn id(&self) -> ModuleId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metadata(&self) -> &MetadataCollection {
        &self.metadata
    }

    pub fn is_ignored(&self) -> bool {
        self.is_ignored
    }
}

/// The semantic record of one type.
#[derive(Debug)]
pub struct TypeInfo {
    id: TypeId,
    full_name: String,
    visible_name: String,
    kind: TypeKind,
    proxies: Vec<Arc<ProxyInfo>>,
    metadata: MetadataCollection,

    /// Every member in build order, keyed by structural identity.
    members: MemberTable<Arc<MemberInfo>>,
    by_decl: FxHashMap<DeclRef, Arc<MemberInfo>>,

    constructors: Vec<Arc<MemberInfo>>,
    static_constructor: OnceLock<Arc<MemberInfo>>,

    method_groups: Vec<MethodGroup>,
    group_of: FxHashMap<MethodId, usize>,

    enum_members: Vec<EnumMember>,
    enum_by_value: FxHashMap<i64, usize>,
    enum_by_name: FxHashMap<String, usize>,
    is_flags_enum: bool,

    is_ignored: bool,
}

impl TypeInfo {
    /// Build the record for `id`, fetching its module and proxies from
    /// `source`.
    #[tracing::instrument(level = "debug", skip_all, fields(ty = %source.decls().type_decl(id).full_name))]
    pub fn build<S: MetadataSource + ?Sized>(source: &S, id: TypeId) -> Result<Self, SemaError> {
        let store = source.decls();
        let module = source.get_module(store.type_decl(id).module)?;
        let proxies = source.get_proxies(id)?;
        builder::TypeInfoBuilder::new(
            store,
            &source.config().annotations,
            id,
            module.is_ignored(),
            proxies.to_vec(),
        )
        .build()
    }

    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Name used by code generation: the rename annotation's value, else
    /// the full name.
    pub fn visible_name(&self) -> &str {
        &self.visible_name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Proxies applied to this type, in registration order.
    pub fn proxies(&self) -> &[Arc<ProxyInfo>] {
        &self.proxies
    }

    /// The type's annotations merged with its proxies'.
    pub fn metadata(&self) -> &MetadataCollection {
        &self.metadata
    }

    pub fn is_ignored(&self) -> bool {
        self.is_ignored
    }

    // Members

    /// The member with an identifier equal to `id`.
    pub fn member(&self, id: &MemberIdentifier) -> Option<&Arc<MemberInfo>> {
        self.members.get(id)
    }

    /// The member built from declaration `decl` (own or proxy-contributed).
    pub fn member_for(&self, decl: DeclRef) -> Option<&Arc<MemberInfo>> {
        self.by_decl.get(&decl)
    }

    /// All members in build order: own fields, properties (with their
    /// accessors), events (with theirs), methods, then proxy contributions.
    pub fn members(&self) -> impl Iterator<Item = &Arc<MemberInfo>> {
        self.members.values()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Instance constructors, including proxy-contributed ones.
    pub fn constructors(&self) -> &[Arc<MemberInfo>] {
        &self.constructors
    }

    pub fn static_constructor(&self) -> Option<&Arc<MemberInfo>> {
        self.static_constructor.get()
    }

    /// Fill the static-constructor slot with a synthesized initializer.
    ///
    /// The slot is write-once: a type that declares a static constructor,
    /// or already had one attached, rejects the call.
    pub fn attach_static_constructor(&self) -> Result<Arc<MemberInfo>, SemaError> {
        let method = Arc::new(MemberInfo::Method(
            MethodInfo::synthesized_static_constructor(self.id, &self.full_name, self.is_ignored),
        ));
        self.static_constructor
            .set(Arc::clone(&method))
            .map_err(|_| {
                SemaError::configuration(
                    &self.full_name,
                    format!("`{CCTOR_NAME}` is already present"),
                )
            })?;
        Ok(method)
    }

    pub fn method_groups(&self) -> &[MethodGroup] {
        &self.method_groups
    }

    /// The overload group a method belongs to, if it is overloaded.
    pub fn method_group_of(&self, method: MethodId) -> Option<&MethodGroup> {
        self.group_of
            .get(&method)
            .map(|&index| &self.method_groups[index])
    }

    // Enums

    /// Enum literals in declaration order; empty for non-enum types.
    pub fn enum_members(&self) -> &[EnumMember] {
        &self.enum_members
    }

    /// The first literal declared with `value`.
    pub fn enum_member_by_value(&self, value: i64) -> Option<&EnumMember> {
        self.enum_by_value
            .get(&value)
            .map(|&index| &self.enum_members[index])
    }

    pub fn enum_member_by_name(&self, name: &str) -> Option<&EnumMember> {
        self.enum_by_name
            .get(name)
            .map(|&index| &self.enum_members[index])
    }

    pub fn is_flags_enum(&self) -> bool {
        self.is_flags_enum
    }

    /// Members that will be emitted.
    pub fn emitted_members(&self) -> impl Iterator<Item = &Arc<MemberInfo>> {
        self.members().filter(|member| !member.is_ignored())
    }
}
