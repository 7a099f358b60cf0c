//! Type record construction.
//!
//! The builder runs in a fixed order because later steps read what
//! earlier ones produced:
//!
//! 1. own fields, properties (plus accessors), events (plus accessors) and
//!    remaining methods, each backed by its proxy resolution;
//! 2. overload groups over the type's own non-ignored methods, which also
//!    finds the declared static constructor;
//! 3. enum tables;
//! 4. per proxy: metadata merge, then members the proxy adds;
//! 5. the type-level ignore flag, cascaded onto every member;
//! 6. visible names, once overload indices are known.

use std::sync::{Arc, OnceLock};

use rustc_hash::FxHashMap;
use xlate_ir::{
    DeclRef, DeclStore, EventId, FieldId, MemberFlags, MethodId, PropertyId, TypeId, CCTOR_NAME,
    ENUM_VALUE_FIELD,
};

use super::TypeInfo;
use crate::ignored::is_ignored_name;
use crate::member::{
    EnumMember, EventInfo, FieldInfo, Member, MemberCore, MemberInfo, MethodGroup, MethodInfo,
    PropertyInfo,
};
use crate::member_id::{MemberIdentifier, MemberTable};
use crate::naming::{declared_name, visible_name};
use crate::proxy::{resolve, AttributePolicy, ProxyInfo};
use crate::{AnnotationNames, MetadataCollection, SemaError};

/// Where a member declaration comes from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Origin {
    /// Declared on the type; proxies may substitute it.
    Own,
    /// Declared on a proxy; it backs itself.
    Proxy,
}

/// What an accessor method belongs to.
#[derive(Copy, Clone, Debug)]
enum Accessor {
    Standalone,
    Property(PropertyId),
    Event(EventId),
}

pub(super) struct TypeInfoBuilder<'a> {
    store: &'a DeclStore,
    names: &'a AnnotationNames,
    id: TypeId,
    module_ignored: bool,
    proxies: Vec<Arc<ProxyInfo>>,

    metadata: MetadataCollection,
    members: Vec<(MemberIdentifier, MemberInfo)>,
    index: MemberTable<usize>,
    by_decl: FxHashMap<DeclRef, usize>,
    constructors: Vec<usize>,
    static_constructor: Option<usize>,
    method_groups: Vec<MethodGroup>,
    group_of: FxHashMap<MethodId, usize>,
    enum_members: Vec<EnumMember>,
    enum_by_value: FxHashMap<i64, usize>,
    enum_by_name: FxHashMap<String, usize>,
    is_flags_enum: bool,
}

impl<'a> TypeInfoBuilder<'a> {
    pub(super) fn new(
        store: &'a DeclStore,
        names: &'a AnnotationNames,
        id: TypeId,
        module_ignored: bool,
        proxies: Vec<Arc<ProxyInfo>>,
    ) -> Self {
        Self {
            store,
            names,
            id,
            module_ignored,
            proxies,
            metadata: MetadataCollection::from_declaration(store, DeclRef::Type(id)),
            members: Vec::new(),
            index: MemberTable::new(),
            by_decl: FxHashMap::default(),
            constructors: Vec::new(),
            static_constructor: None,
            method_groups: Vec::new(),
            group_of: FxHashMap::default(),
            enum_members: Vec::new(),
            enum_by_value: FxHashMap::default(),
            enum_by_name: FxHashMap::default(),
            is_flags_enum: false,
        }
    }

    pub(super) fn build(mut self) -> Result<TypeInfo, SemaError> {
        let store = self.store;
        let decl = store.type_decl(self.id);

        for &field in &decl.fields {
            self.add_field(field, Origin::Own)?;
        }
        for &property in &decl.properties {
            self.add_property(property, Origin::Own)?;
        }
        for &event in &decl.events {
            self.add_event(event, Origin::Own)?;
        }
        for &method in &decl.methods {
            if !self.by_decl.contains_key(&DeclRef::Method(method)) {
                self.add_method(method, Origin::Own, Accessor::Standalone, false)?;
            }
        }

        self.group_overloads();
        self.build_enum_tables();

        for proxy in self.proxies.clone() {
            self.apply_proxy(&proxy)?;
        }

        let is_ignored = self.module_ignored
            || is_ignored_name(&decl.full_name)
            || self.metadata.has(&self.names.ignore);
        if is_ignored {
            for (_, member) in &mut self.members {
                member.core_mut().is_ignored = true;
            }
        }

        self.finish(is_ignored)
    }

    // Member construction

    fn backing(&self, origin: Origin, decl: DeclRef) -> Result<DeclRef, SemaError> {
        match origin {
            Origin::Own => resolve(self.store, &self.proxies, decl),
            Origin::Proxy => Ok(decl),
        }
    }

    /// Shared payload; the visible name is filled in by `finish`.
    fn core(
        &self,
        decl: DeclRef,
        origin: Origin,
        signature_has_pointer: bool,
    ) -> Result<MemberCore, SemaError> {
        let backing = self.backing(origin, decl)?;
        let mut metadata = MetadataCollection::from_declaration(self.store, decl);
        if backing != decl {
            metadata.update(
                &MetadataCollection::from_declaration(self.store, backing),
                false,
            );
        }
        let qualified_name = self.store.qualified_name(decl);
        let is_ignored = is_ignored_name(&qualified_name)
            || metadata.has(&self.names.ignore)
            || signature_has_pointer;

        Ok(MemberCore {
            declaring_type: self.id,
            decl,
            backing,
            qualified_name,
            name: declared_name(self.store, decl),
            visible_name: String::new(),
            metadata,
            is_ignored,
        })
    }

    fn push(&mut self, id: MemberIdentifier, member: MemberInfo) -> usize {
        let position = self.members.len();
        self.by_decl.insert(member.core().decl, position);
        self.index.push(id.clone(), position);
        self.members.push((id, member));
        position
    }

    fn add_field(&mut self, id: FieldId, origin: Origin) -> Result<(), SemaError> {
        let store = self.store;
        let field = store.field(id);
        let core = self.core(DeclRef::Field(id), origin, field.ty.contains_pointer())?;
        let info = FieldInfo {
            core,
            id,
            ty: field.ty.clone(),
            is_static: field.flags.contains(MemberFlags::STATIC),
        };
        self.push(
            MemberIdentifier::of_field(store, id),
            MemberInfo::Field(info),
        );
        Ok(())
    }

    fn add_property(&mut self, id: PropertyId, origin: Origin) -> Result<(), SemaError> {
        let store = self.store;
        let property = store.property(id);
        let core = self.core(
            DeclRef::Property(id),
            origin,
            property.ty.contains_pointer(),
        )?;
        let is_ignored = core.is_ignored;
        let info = PropertyInfo {
            core,
            id,
            ty: property.ty.clone(),
            getter: property.getter,
            setter: property.setter,
        };
        self.push(
            MemberIdentifier::of_property(store, id),
            MemberInfo::Property(info),
        );

        for accessor in [property.getter, property.setter].into_iter().flatten() {
            self.add_accessor(accessor, origin, Accessor::Property(id), is_ignored)?;
        }
        Ok(())
    }

    fn add_event(&mut self, id: EventId, origin: Origin) -> Result<(), SemaError> {
        let store = self.store;
        let event = store.event(id);
        let core = self.core(DeclRef::Event(id), origin, event.ty.contains_pointer())?;
        let is_ignored = core.is_ignored;
        let info = EventInfo {
            core,
            id,
            ty: event.ty.clone(),
            add: event.add,
            remove: event.remove,
        };
        self.push(
            MemberIdentifier::of_event(store, id),
            MemberInfo::Event(info),
        );

        for accessor in [event.add, event.remove].into_iter().flatten() {
            self.add_accessor(accessor, origin, Accessor::Event(id), is_ignored)?;
        }
        Ok(())
    }

    fn add_accessor(
        &mut self,
        method: MethodId,
        origin: Origin,
        owner: Accessor,
        owner_ignored: bool,
    ) -> Result<(), SemaError> {
        if self.by_decl.contains_key(&DeclRef::Method(method)) {
            return Ok(());
        }
        if origin == Origin::Proxy
            && self
                .index
                .contains(&MemberIdentifier::of_method(self.store, method))
        {
            return Ok(());
        }
        self.add_method(method, origin, owner, owner_ignored)
    }

    fn add_method(
        &mut self,
        id: MethodId,
        origin: Origin,
        accessor: Accessor,
        inherited_ignore: bool,
    ) -> Result<(), SemaError> {
        let store = self.store;
        let method = store.method(id);
        let has_pointer = method.return_type.contains_pointer()
            || method.params.iter().any(|p| p.ty.contains_pointer());
        let mut core = self.core(DeclRef::Method(id), origin, has_pointer)?;
        core.is_ignored |= inherited_ignore;

        let (property, event) = match accessor {
            Accessor::Standalone => (None, None),
            Accessor::Property(property) => (Some(property), None),
            Accessor::Event(event) => (None, Some(event)),
        };
        let info = MethodInfo {
            core,
            id: Some(id),
            is_static: method.is_static(),
            is_constructor: method.is_constructor(),
            overload_index: None,
            property,
            event,
        };
        let position = self.push(
            MemberIdentifier::of_method(store, id),
            MemberInfo::Method(info),
        );
        if method.is_constructor() {
            self.constructors.push(position);
        }
        Ok(())
    }

    // Overloads and enums

    /// Group the type's own non-ignored methods by name and static-ness.
    fn group_overloads(&mut self) {
        let store = self.store;
        let mut order: Vec<(&str, bool)> = Vec::new();
        let mut groups: FxHashMap<(&str, bool), Vec<MethodId>> = FxHashMap::default();

        for &id in &store.type_decl(self.id).methods {
            let Some(&position) = self.by_decl.get(&DeclRef::Method(id)) else {
                continue;
            };
            if self.members[position].1.core().is_ignored {
                continue;
            }
            let method = store.method(id);
            let key = (method.name.as_str(), method.is_static());
            groups
                .entry(key)
                .or_insert_with(|| {
                    order.push(key);
                    Vec::new()
                })
                .push(id);
        }

        for key in order {
            let Some(methods) = groups.remove(&key) else {
                continue;
            };
            let (name, is_static) = key;
            if let [single] = methods[..] {
                if name == CCTOR_NAME {
                    self.static_constructor = self.by_decl.get(&DeclRef::Method(single)).copied();
                }
                continue;
            }

            tracing::trace!(name, is_static, overloads = methods.len(), "overload group");
            let group_index = self.method_groups.len();
            for (overload_index, &id) in methods.iter().enumerate() {
                self.group_of.insert(id, group_index);
                if let Some(&position) = self.by_decl.get(&DeclRef::Method(id)) {
                    if let MemberInfo::Method(info) = &mut self.members[position].1 {
                        info.overload_index = Some(overload_index);
                    }
                }
            }
            self.method_groups.push(MethodGroup {
                name: name.to_owned(),
                is_static,
                methods,
            });
        }
    }

    fn build_enum_tables(&mut self) {
        let store = self.store;
        let decl = store.type_decl(self.id);
        if !decl.is_enum() {
            return;
        }
        self.is_flags_enum = self.metadata.has(&self.names.flags);

        let mut previous: Option<i64> = None;
        for &id in &decl.fields {
            let field = store.field(id);
            if field.name == ENUM_VALUE_FIELD {
                continue;
            }
            let value = field
                .constant
                .unwrap_or_else(|| previous.map_or(0, |p| p.wrapping_add(1)));
            previous = Some(value);

            let index = self.enum_members.len();
            self.enum_by_value.entry(value).or_insert(index);
            self.enum_by_name.entry(field.name.clone()).or_insert(index);
            self.enum_members.push(EnumMember {
                declaring_type: self.id,
                field: id,
                full_name: store.qualified_name(DeclRef::Field(id)),
                name: field.name.clone(),
                value,
            });
        }
    }

    // Proxies

    fn apply_proxy(&mut self, proxy: &ProxyInfo) -> Result<(), SemaError> {
        let replace = proxy.attribute_policy() == AttributePolicy::Replace;
        self.metadata.update(proxy.metadata(), replace);

        for (id, &property) in proxy.properties().iter() {
            if !self.index.contains(id) {
                log_contribution(proxy, id);
                self.add_property(property, Origin::Proxy)?;
            }
        }
        for (id, &event) in proxy.events().iter() {
            if !self.index.contains(id) {
                log_contribution(proxy, id);
                self.add_event(event, Origin::Proxy)?;
            }
        }
        for (id, &field) in proxy.fields().iter() {
            if !self.index.contains(id) {
                log_contribution(proxy, id);
                self.add_field(field, Origin::Proxy)?;
            }
        }
        for (id, &method) in proxy.methods().iter() {
            if !self.index.contains(id) && !self.by_decl.contains_key(&DeclRef::Method(method)) {
                log_contribution(proxy, id);
                self.add_method(method, Origin::Proxy, Accessor::Standalone, false)?;
            }
        }
        Ok(())
    }

    // Finishing

    fn finish(self, is_ignored: bool) -> Result<TypeInfo, SemaError> {
        let decl = self.store.type_decl(self.id);
        let visible = visible_name(self.names, &self.metadata, &decl.full_name, None)?;

        let mut members = MemberTable::new();
        let mut by_position = Vec::with_capacity(self.members.len());
        let mut by_decl = FxHashMap::default();
        for (id, mut member) in self.members {
            let overload_index = member.as_method().and_then(MethodInfo::overload_index);
            let core = member.core_mut();
            core.visible_name = visible_name(self.names, &core.metadata, &core.name, overload_index)?;

            let member = Arc::new(member);
            by_decl.insert(member.core().decl, Arc::clone(&member));
            by_position.push(Arc::clone(&member));
            members.push(id, member);
        }

        let static_constructor = match self.static_constructor {
            Some(position) => OnceLock::from(Arc::clone(&by_position[position])),
            None => OnceLock::new(),
        };
        let constructors = self
            .constructors
            .iter()
            .map(|&position| Arc::clone(&by_position[position]))
            .collect();

        Ok(TypeInfo {
            id: self.id,
            full_name: decl.full_name.clone(),
            visible_name: visible,
            kind: decl.kind,
            proxies: self.proxies,
            metadata: self.metadata,
            members,
            by_decl,
            constructors,
            static_constructor,
            method_groups: self.method_groups,
            group_of: self.group_of,
            enum_members: self.enum_members,
            enum_by_value: self.enum_by_value,
            enum_by_name: self.enum_by_name,
            is_flags_enum: self.is_flags_enum,
            is_ignored,
        })
    }
}

fn log_contribution(proxy: &ProxyInfo, id: &MemberIdentifier) {
    tracing::debug!(
        member = %id,
        proxy = proxy.full_name(),
        "proxy contributes member"
    );
}
