//! Arena owning every declaration handed to the semantic front-end.
//!
//! The metadata reader populates a `DeclStore` once; afterwards it is only
//! read. Lists keep registration order, and the full-name index gives O(1)
//! lookup of the types named by annotation arguments.

use rustc_hash::FxHashMap;

use crate::{
    Annotation, DeclRef, EventDecl, EventId, FieldDecl, FieldId, MemberFlags, MethodDecl,
    MethodId, ModuleDecl, ModuleId, ParamDecl, PropertyDecl, PropertyId, TypeDecl, TypeId,
    TypeKind, TypeSig,
};

/// Owner of all module, type and member declarations.
#[derive(Clone, Debug, Default)]
pub struct DeclStore {
    modules: Vec<ModuleDecl>,
    types: Vec<TypeDecl>,
    fields: Vec<FieldDecl>,
    properties: Vec<PropertyDecl>,
    events: Vec<EventDecl>,
    methods: Vec<MethodDecl>,

    /// Full name -> type. Later registrations shadow earlier ones.
    types_by_name: FxHashMap<String, TypeId>,
}

/// Allocate the next handle for a list, keeping ids 32-bit.
fn next_id(len: usize) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("declaration store overflow: {len} entries"))
}

impl DeclStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Registration

    pub fn add_module(&mut self, name: impl Into<String>) -> ModuleId {
        let id = ModuleId::from_raw(next_id(self.modules.len()));
        self.modules.push(ModuleDecl {
            name: name.into(),
            annotations: Vec::new(),
        });
        id
    }

    /// Register a top-level type.
    pub fn add_type(
        &mut self,
        module: ModuleId,
        namespace: &str,
        name: &str,
        kind: TypeKind,
    ) -> TypeId {
        let full_name = if namespace.is_empty() {
            name.to_owned()
        } else {
            format!("{namespace}.{name}")
        };
        self.push_type(module, namespace, name, full_name, kind, None)
    }

    /// Register a type nested inside `outer`.
    pub fn add_nested_type(&mut self, outer: TypeId, name: &str, kind: TypeKind) -> TypeId {
        let outer_decl = &self.types[outer.index()];
        let full_name = format!("{}+{name}", outer_decl.full_name);
        let module = outer_decl.module;
        let namespace = outer_decl.namespace.clone();
        self.push_type(module, &namespace, name, full_name, kind, Some(outer))
    }

    fn push_type(
        &mut self,
        module: ModuleId,
        namespace: &str,
        name: &str,
        full_name: String,
        kind: TypeKind,
        declaring_type: Option<TypeId>,
    ) -> TypeId {
        let id = TypeId::from_raw(next_id(self.types.len()));
        self.types_by_name.insert(full_name.clone(), id);
        self.types.push(TypeDecl {
            module,
            namespace: namespace.to_owned(),
            name: name.to_owned(),
            full_name,
            kind,
            declaring_type,
            generic_params: Vec::new(),
            fields: Vec::new(),
            properties: Vec::new(),
            events: Vec::new(),
            methods: Vec::new(),
            annotations: Vec::new(),
        });
        id
    }

    pub fn add_field(&mut self, owner: TypeId, name: &str, ty: TypeSig) -> FieldId {
        let id = FieldId::from_raw(next_id(self.fields.len()));
        self.fields.push(FieldDecl {
            declaring_type: owner,
            name: name.to_owned(),
            ty,
            flags: MemberFlags::empty(),
            constant: None,
            annotations: Vec::new(),
        });
        self.types[owner.index()].fields.push(id);
        id
    }

    pub fn add_method(
        &mut self,
        owner: TypeId,
        name: &str,
        return_type: TypeSig,
        params: Vec<ParamDecl>,
    ) -> MethodId {
        let id = MethodId::from_raw(next_id(self.methods.len()));
        self.methods.push(MethodDecl {
            declaring_type: owner,
            name: name.to_owned(),
            return_type,
            params,
            flags: MemberFlags::empty(),
            overrides: Vec::new(),
            generic_params: Vec::new(),
            annotations: Vec::new(),
        });
        self.types[owner.index()].methods.push(id);
        id
    }

    /// Register a property. Accessors must already be registered as methods
    /// of the same type.
    pub fn add_property(
        &mut self,
        owner: TypeId,
        name: &str,
        ty: TypeSig,
        getter: Option<MethodId>,
        setter: Option<MethodId>,
    ) -> PropertyId {
        let id = PropertyId::from_raw(next_id(self.properties.len()));
        self.properties.push(PropertyDecl {
            declaring_type: owner,
            name: name.to_owned(),
            ty,
            getter,
            setter,
            annotations: Vec::new(),
        });
        self.types[owner.index()].properties.push(id);
        id
    }

    /// Register an event. Accessors must already be registered as methods
    /// of the same type.
    pub fn add_event(
        &mut self,
        owner: TypeId,
        name: &str,
        ty: TypeSig,
        add: Option<MethodId>,
        remove: Option<MethodId>,
    ) -> EventId {
        let id = EventId::from_raw(next_id(self.events.len()));
        self.events.push(EventDecl {
            declaring_type: owner,
            name: name.to_owned(),
            ty,
            add,
            remove,
            annotations: Vec::new(),
        });
        self.types[owner.index()].events.push(id);
        id
    }

    /// Attach an annotation to any declaration.
    pub fn annotate(&mut self, decl: impl Into<DeclRef>, annotation: Annotation) {
        let list = match decl.into() {
            DeclRef::Module(id) => &mut self.modules[id.index()].annotations,
            DeclRef::Type(id) => &mut self.types[id.index()].annotations,
            DeclRef::Field(id) => &mut self.fields[id.index()].annotations,
            DeclRef::Property(id) => &mut self.properties[id.index()].annotations,
            DeclRef::Event(id) => &mut self.events[id.index()].annotations,
            DeclRef::Method(id) => &mut self.methods[id.index()].annotations,
        };
        list.push(annotation);
    }

    pub fn type_mut(&mut self, id: TypeId) -> &mut TypeDecl {
        &mut self.types[id.index()]
    }

    pub fn field_mut(&mut self, id: FieldId) -> &mut FieldDecl {
        &mut self.fields[id.index()]
    }

    pub fn method_mut(&mut self, id: MethodId) -> &mut MethodDecl {
        &mut self.methods[id.index()]
    }

    // Lookup

    #[inline]
    pub fn module(&self, id: ModuleId) -> &ModuleDecl {
        &self.modules[id.index()]
    }

    #[inline]
    pub fn type_decl(&self, id: TypeId) -> &TypeDecl {
        &self.types[id.index()]
    }

    #[inline]
    pub fn field(&self, id: FieldId) -> &FieldDecl {
        &self.fields[id.index()]
    }

    #[inline]
    pub fn property(&self, id: PropertyId) -> &PropertyDecl {
        &self.properties[id.index()]
    }

    #[inline]
    pub fn event(&self, id: EventId) -> &EventDecl {
        &self.events[id.index()]
    }

    #[inline]
    pub fn method(&self, id: MethodId) -> &MethodDecl {
        &self.methods[id.index()]
    }

    /// Look up a type by namespace-qualified full name.
    pub fn find_type(&self, full_name: &str) -> Option<TypeId> {
        self.types_by_name.get(full_name).copied()
    }

    /// All modules in registration order.
    pub fn modules(&self) -> impl Iterator<Item = ModuleId> + '_ {
        (0..self.modules.len()).map(|i| ModuleId::from_raw(next_id(i)))
    }

    /// All types in registration order.
    pub fn types(&self) -> impl Iterator<Item = TypeId> + '_ {
        (0..self.types.len()).map(|i| TypeId::from_raw(next_id(i)))
    }

    /// Annotations attached directly to a declaration.
    pub fn annotations(&self, decl: DeclRef) -> &[Annotation] {
        match decl {
            DeclRef::Module(id) => &self.module(id).annotations,
            DeclRef::Type(id) => &self.type_decl(id).annotations,
            DeclRef::Field(id) => &self.field(id).annotations,
            DeclRef::Property(id) => &self.property(id).annotations,
            DeclRef::Event(id) => &self.event(id).annotations,
            DeclRef::Method(id) => &self.method(id).annotations,
        }
    }

    /// Short name of a declaration.
    pub fn name_of(&self, decl: DeclRef) -> &str {
        match decl {
            DeclRef::Module(id) => &self.module(id).name,
            DeclRef::Type(id) => &self.type_decl(id).name,
            DeclRef::Field(id) => &self.field(id).name,
            DeclRef::Property(id) => &self.property(id).name,
            DeclRef::Event(id) => &self.event(id).name,
            DeclRef::Method(id) => &self.method(id).name,
        }
    }

    /// The type a member is declared on; `None` for modules and types.
    pub fn declaring_type(&self, decl: DeclRef) -> Option<TypeId> {
        match decl {
            DeclRef::Module(_) | DeclRef::Type(_) => None,
            DeclRef::Field(id) => Some(self.field(id).declaring_type),
            DeclRef::Property(id) => Some(self.property(id).declaring_type),
            DeclRef::Event(id) => Some(self.event(id).declaring_type),
            DeclRef::Method(id) => Some(self.method(id).declaring_type),
        }
    }

    /// Fully qualified name used for diagnostics and name heuristics.
    ///
    /// Members render as `Declaring.Type.FullName.Member`.
    pub fn qualified_name(&self, decl: DeclRef) -> String {
        match decl {
            DeclRef::Module(id) => self.module(id).name.clone(),
            DeclRef::Type(id) => self.type_decl(id).full_name.clone(),
            member => match self.declaring_type(member) {
                Some(owner) => format!(
                    "{}.{}",
                    self.type_decl(owner).full_name,
                    self.name_of(member)
                ),
                None => self.name_of(member).to_owned(),
            },
        }
    }
}
