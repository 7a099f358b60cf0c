//! Proxy overlays and member resolution.
//!
//! A proxy is an auxiliary type declaration, marked by the proxy
//! annotation, whose members substitute or extend the members of one or
//! more target types. Proxies never inherit: only members declared on the
//! proxy itself take part.
//!
//! # Argument recovery
//!
//! The order of the proxy annotation's arguments is not fixed, so the
//! configuration is recovered by each argument's declared type:
//! - `System.Type` (or an array of them): proxied type
//! - `System.String` (or an array of them): proxied type by full name
//! - the attribute-policy enum: `AttributePolicy`
//! - the member-policy enum: `MemberPolicy`
//!
//! Anything else is a malformed proxy.

use std::sync::Arc;

use xlate_ir::{
    AnnotationArg, DeclRef, DeclStore, EventId, FieldId, MethodId, PropertyId, TypeId, TypeSig,
    CTOR_NAME,
};

use crate::member_id::{MemberIdentifier, MemberKind, MemberTable};
use crate::{AnnotationNames, MetadataCollection, SemaError};

/// How a proxy's annotations combine with its target's.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum AttributePolicy {
    /// Union the proxy's annotations into the target's.
    #[default]
    Merge,
    /// Drop the target's annotations and use the proxy's.
    Replace,
}

impl AttributePolicy {
    fn from_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(AttributePolicy::Merge),
            1 => Some(AttributePolicy::Replace),
            _ => None,
        }
    }
}

/// Whether a proxy's members may substitute its target's members.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum MemberPolicy {
    /// Substitute matching members.
    #[default]
    Default,
    /// Substitute every matching member.
    ReplaceAll,
    /// Never substitute; the proxy may still contribute new members.
    ReplaceNone,
}

impl MemberPolicy {
    fn from_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(MemberPolicy::Default),
            1 => Some(MemberPolicy::ReplaceAll),
            2 => Some(MemberPolicy::ReplaceNone),
            _ => None,
        }
    }
}

/// Proxy settings recovered from a proxy annotation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Full names of the proxied types, in argument order.
    pub proxied_types: Vec<String>,
    pub attribute_policy: AttributePolicy,
    pub member_policy: MemberPolicy,
}

impl ProxyConfig {
    /// Read the proxy configuration from a type's metadata.
    ///
    /// Returns `None` if the type is not a proxy.
    pub fn from_metadata(
        metadata: &MetadataCollection,
        names: &AnnotationNames,
    ) -> Result<Option<Self>, SemaError> {
        let Some(args) = metadata.get_single_constructor_args(&names.proxy)? else {
            return Ok(None);
        };

        let mut parser = ConfigParser {
            owner: metadata.owner(),
            names,
            config: ProxyConfig::default(),
            attribute_policy: None,
            member_policy: None,
        };
        for arg in args {
            parser.argument(arg)?;
        }

        let mut config = parser.config;
        if config.proxied_types.is_empty() {
            return Err(SemaError::MalformedProxy {
                proxy: metadata.owner().to_owned(),
                detail: "no proxied type given".to_owned(),
            });
        }
        config.attribute_policy = parser.attribute_policy.unwrap_or_default();
        config.member_policy = parser.member_policy.unwrap_or_default();
        Ok(Some(config))
    }
}

/// Proxied type names named by a proxy annotation's arguments.
///
/// Unlike `ProxyConfig::from_metadata` this never fails: arguments that do
/// not name a type are skipped. Used to find a type's proxies without
/// building unrelated proxy records.
pub fn declared_targets(args: &[AnnotationArg]) -> Vec<&str> {
    let mut targets = Vec::new();
    for arg in args {
        match arg {
            AnnotationArg::Type(TypeSig::Named { full_name, .. })
            | AnnotationArg::Str(full_name) => targets.push(full_name.as_str()),
            AnnotationArg::Array(items) => targets.extend(declared_targets(items)),
            _ => {}
        }
    }
    targets
}

struct ConfigParser<'a> {
    owner: &'a str,
    names: &'a AnnotationNames,
    config: ProxyConfig,
    attribute_policy: Option<AttributePolicy>,
    member_policy: Option<MemberPolicy>,
}

impl ConfigParser<'_> {
    fn argument(&mut self, arg: &AnnotationArg) -> Result<(), SemaError> {
        match arg {
            AnnotationArg::Type(TypeSig::Named { full_name, .. }) => {
                self.config.proxied_types.push(full_name.clone());
            }
            AnnotationArg::Str(full_name) => {
                self.config.proxied_types.push(full_name.clone());
            }
            AnnotationArg::Array(items) => {
                for item in items {
                    match item {
                        AnnotationArg::Type(_) | AnnotationArg::Str(_) => self.argument(item)?,
                        _ => return Err(self.malformed(item)),
                    }
                }
            }
            AnnotationArg::Enum { enum_type, value }
                if *enum_type == self.names.attribute_policy_enum =>
            {
                let policy =
                    AttributePolicy::from_value(*value).ok_or_else(|| self.malformed(arg))?;
                if self.attribute_policy.replace(policy).is_some() {
                    return Err(self.conflict("attribute policy"));
                }
            }
            AnnotationArg::Enum { enum_type, value }
                if *enum_type == self.names.member_policy_enum =>
            {
                let policy =
                    MemberPolicy::from_value(*value).ok_or_else(|| self.malformed(arg))?;
                if self.member_policy.replace(policy).is_some() {
                    return Err(self.conflict("member policy"));
                }
            }
            _ => return Err(self.malformed(arg)),
        }
        Ok(())
    }

    fn malformed(&self, arg: &AnnotationArg) -> SemaError {
        SemaError::MalformedProxy {
            proxy: self.owner.to_owned(),
            detail: format!("unexpected argument {arg:?} of type `{}`", arg.type_name()),
        }
    }

    fn conflict(&self, what: &str) -> SemaError {
        SemaError::configuration(self.owner, format!("more than one {what} given"))
    }
}

/// The semantic record of one proxy type.
#[derive(Clone, Debug)]
pub struct ProxyInfo {
    type_id: TypeId,
    full_name: String,
    config: ProxyConfig,
    metadata: MetadataCollection,
    fields: MemberTable<FieldId>,
    properties: MemberTable<PropertyId>,
    events: MemberTable<EventId>,
    methods: MemberTable<MethodId>,
}

impl ProxyInfo {
    /// Build the record for a proxy type.
    ///
    /// A type without the proxy annotation is rejected; the source only
    /// builds proxies it found through the annotation.
    #[tracing::instrument(level = "debug", skip_all, fields(proxy = %store.type_decl(type_id).full_name))]
    pub fn build(
        store: &DeclStore,
        names: &AnnotationNames,
        type_id: TypeId,
    ) -> Result<Self, SemaError> {
        let decl = store.type_decl(type_id);
        let metadata = MetadataCollection::from_declaration(store, DeclRef::Type(type_id));
        let Some(config) = ProxyConfig::from_metadata(&metadata, names)? else {
            return Err(SemaError::configuration(
                &decl.full_name,
                format!("type is used as a proxy but has no `{}` annotation", names.proxy),
            ));
        };

        let mut fields = MemberTable::new();
        for &id in &decl.fields {
            fields.push(MemberIdentifier::of_field(store, id), id);
        }
        let mut properties = MemberTable::new();
        for &id in &decl.properties {
            properties.push(MemberIdentifier::of_property(store, id), id);
        }
        let mut events = MemberTable::new();
        for &id in &decl.events {
            events.push(MemberIdentifier::of_event(store, id), id);
        }
        let mut methods = MemberTable::new();
        for &id in &decl.methods {
            methods.push(MemberIdentifier::of_method(store, id), id);
        }

        Ok(Self {
            type_id,
            full_name: decl.full_name.clone(),
            config,
            metadata,
            fields,
            properties,
            events,
            methods,
        })
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn proxied_types(&self) -> &[String] {
        &self.config.proxied_types
    }

    pub fn attribute_policy(&self) -> AttributePolicy {
        self.config.attribute_policy
    }

    pub fn member_policy(&self) -> MemberPolicy {
        self.config.member_policy
    }

    /// Annotations lent to targets, the proxy marker included.
    pub fn metadata(&self) -> &MetadataCollection {
        &self.metadata
    }

    pub fn fields(&self) -> &MemberTable<FieldId> {
        &self.fields
    }

    pub fn properties(&self) -> &MemberTable<PropertyId> {
        &self.properties
    }

    pub fn events(&self) -> &MemberTable<EventId> {
        &self.events
    }

    pub fn methods(&self) -> &MemberTable<MethodId> {
        &self.methods
    }

    /// The proxy's own member with an identifier equal to `id`.
    pub fn find(&self, id: &MemberIdentifier) -> Option<DeclRef> {
        match id.kind() {
            MemberKind::Field => self.fields.get(id).copied().map(DeclRef::Field),
            MemberKind::Property => self.properties.get(id).copied().map(DeclRef::Property),
            MemberKind::Event => self.events.get(id).copied().map(DeclRef::Event),
            MemberKind::Method => self.methods.get(id).copied().map(DeclRef::Method),
        }
    }
}

/// Decide which declaration backs `member` once `proxies` are applied.
///
/// Proxies are consulted in registration order and a later substitution
/// overrides an earlier one. Returns `member` itself when nothing applies.
pub fn resolve(
    store: &DeclStore,
    proxies: &[Arc<ProxyInfo>],
    member: DeclRef,
) -> Result<DeclRef, SemaError> {
    let id = MemberIdentifier::new(store, member)?;
    if proxies.is_empty() || is_parameterless_constructor(store, member) {
        return Ok(member);
    }

    let mut resolved = member;
    for proxy in proxies {
        if proxy.member_policy() == MemberPolicy::ReplaceNone {
            continue;
        }
        let Some(candidate) = proxy.find(&id) else {
            continue;
        };
        if is_substitutable(store, candidate) {
            tracing::debug!(
                member = %id,
                proxy = proxy.full_name(),
                "proxy member substitutes target member"
            );
            resolved = candidate;
        }
    }
    Ok(resolved)
}

/// No way to tell a compiler-generated default constructor from a
/// user-written one, so neither is ever proxied.
fn is_parameterless_constructor(store: &DeclStore, member: DeclRef) -> bool {
    match member {
        DeclRef::Method(id) => {
            let method = store.method(id);
            method.name == CTOR_NAME && method.params.is_empty()
        }
        _ => false,
    }
}

/// Kind-specific guard: abstract proxy members carry no implementation.
fn is_substitutable(store: &DeclStore, candidate: DeclRef) -> bool {
    let is_abstract =
        |method: Option<MethodId>| method.is_some_and(|m| store.method(m).is_abstract());

    match candidate {
        DeclRef::Method(id) => !store.method(id).is_abstract(),
        DeclRef::Property(id) => {
            let property = store.property(id);
            let getter = property.getter.or(property.setter);
            let setter = property.setter.or(property.getter);
            !is_abstract(getter) && !is_abstract(setter)
        }
        DeclRef::Event(id) => {
            let event = store.event(id);
            let add = event.add.or(event.remove);
            let remove = event.remove.or(event.add);
            !is_abstract(add) && !is_abstract(remove)
        }
        DeclRef::Field(_) => true,
        DeclRef::Module(_) | DeclRef::Type(_) => false,
    }
}
