//! End-to-end checks of the semantic model over small in-memory assemblies.

#![allow(clippy::expect_used, reason = "Tests can panic")]

use std::sync::Arc;

use pretty_assertions::assert_eq;
use xlate_ir::{
    Annotation, AnnotationArg, DeclRef, DeclStore, MemberFlags, ModuleId, ParamDecl, TypeId,
    TypeKind, TypeSig,
};
use xlate_sema::{
    is_ignored_name, AnnotationNames, AttributePolicy, Member, MemberIdentifier, MemberPolicy,
    MetadataSource, SemaConfig, SemaDb, SemaError,
};

fn names() -> AnnotationNames {
    AnnotationNames::default()
}

fn int() -> TypeSig {
    TypeSig::named("System.Int32")
}

fn param(ty: TypeSig) -> Vec<ParamDecl> {
    vec![ParamDecl::new("value", ty)]
}

fn new_store() -> (DeclStore, ModuleId) {
    let mut store = DeclStore::new();
    let module = store.add_module("App.dll");
    (store, module)
}

fn proxy_of(target: &str, args: Vec<AnnotationArg>) -> Annotation {
    let mut annotation =
        Annotation::new(names().proxy).with_arg(AnnotationArg::Type(TypeSig::named(target)));
    annotation.args.extend(args);
    annotation
}

fn db(store: DeclStore) -> SemaDb {
    xlate_sema::init_tracing();
    SemaDb::new(store, SemaConfig::default())
}

#[test]
fn classifier_examples() {
    assert!(is_ignored_name("<Module>"));
    assert!(!is_ignored_name("MyClass+<>c__DisplayClass1"));
    assert!(!is_ignored_name("Namespace.Foo__BackingField"));
    assert!(is_ignored_name("Runtime.CompilerServices.CallSite`1"));
    assert!(!is_ignored_name("Namespace.MyClass.Method"));
}

#[test]
fn static_overloads_group_apart_from_instance_method() {
    let (mut store, module) = new_store();
    let calc = store.add_type(module, "App", "Calc", TypeKind::Class);
    let a = store.add_method(calc, "F", TypeSig::void(), vec![]);
    let b = store.add_method(calc, "F", TypeSig::void(), param(int()));
    let c = store.add_method(calc, "F", TypeSig::void(), param(TypeSig::named("System.Double")));
    store.method_mut(a).flags |= MemberFlags::STATIC;
    store.method_mut(c).flags |= MemberFlags::STATIC;

    let db = db(store);
    let info = db.get_type(calc).expect("builds");

    let groups = info.method_groups();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].methods(), &[a, c]);
    assert!(groups[0].is_static());

    let name_of = |id| {
        db.get_member(DeclRef::Method(id))
            .expect("member")
            .visible_name()
            .to_owned()
    };
    assert_eq!(name_of(a), "F$0");
    assert_eq!(name_of(b), "F");
    assert_eq!(name_of(c), "F$1");
}

#[test]
fn second_overload_and_rename() {
    let (mut store, module) = new_store();
    let list = store.add_type(module, "App", "List", TypeKind::Class);
    store.add_method(list, "Add", TypeSig::void(), param(int()));
    let second = store.add_method(list, "Add", TypeSig::void(), param(TypeSig::named("System.String")));
    let third = store.add_method(list, "Add", TypeSig::void(), param(TypeSig::named("System.Object")));
    store.annotate(
        third,
        Annotation::new(names().rename).with_arg(AnnotationArg::str("addAny")),
    );

    let db = db(store);
    let second = db.get_member(DeclRef::Method(second)).expect("second");
    let third = db.get_member(DeclRef::Method(third)).expect("third");
    assert_eq!(second.visible_name(), "Add$1");
    assert_eq!(third.visible_name(), "addAny");
    assert_eq!(third.as_method().and_then(|m| m.overload_index()), Some(2));
}

#[test]
fn enum_table_end_to_end() {
    let (mut store, module) = new_store();
    let level = store.add_type(module, "App", "Level", TypeKind::Enum);
    store.add_field(level, "value__", int());
    for (name, constant) in [("A", None), ("B", Some(5)), ("C", None)] {
        let field = store.add_field(level, name, TypeSig::named("App.Level"));
        store.field_mut(field).constant = constant;
    }

    let db = db(store);
    let info = db.get_type(level).expect("builds");
    let values: Vec<_> = info
        .enum_members()
        .iter()
        .map(|m| (m.name().to_owned(), m.value()))
        .collect();
    assert_eq!(
        values,
        vec![("A".to_owned(), 0), ("B".to_owned(), 5), ("C".to_owned(), 6)]
    );
    assert_eq!(
        info.enum_member_by_name("C").map(|m| m.full_name().to_owned()),
        Some("App.Level.C".to_owned())
    );
}

#[test]
fn concurrent_queries_share_one_record() {
    let (mut store, module) = new_store();
    let widget = store.add_type(module, "App", "Widget", TypeKind::Class);
    for i in 0..16 {
        store.add_method(widget, &format!("M{i}"), TypeSig::void(), vec![]);
    }
    let db = db(store);

    let records: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| db.get_type(widget).expect("builds")))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("thread finished"))
            .collect()
    });

    for record in &records[1..] {
        assert!(Arc::ptr_eq(&records[0], record));
    }
    assert_eq!(db.built_type_count(), 1);
}

struct ProxyScene {
    store: DeclStore,
    widget: TypeId,
    proxy: TypeId,
}

/// `App.Widget` with `Run` and `Size`, plus a proxy declaring a concrete
/// `Run`, a new `Reset` and a new `Label` property.
fn proxy_scene(args: Vec<AnnotationArg>) -> ProxyScene {
    let (mut store, module) = new_store();
    let widget = store.add_type(module, "App", "Widget", TypeKind::Class);
    let proxy = store.add_type(module, "App.Shims", "WidgetShim", TypeKind::Class);
    store.annotate(proxy, proxy_of("App.Widget", args));

    store.add_method(widget, "Run", TypeSig::void(), vec![]);
    let getter = store.add_method(widget, "get_Size", int(), vec![]);
    store.add_property(widget, "Size", int(), Some(getter), None);
    store.annotate(widget, Annotation::new("App.SerializableAttribute"));

    store.add_method(proxy, "Run", TypeSig::void(), vec![]);
    store.add_method(proxy, "Reset", TypeSig::void(), vec![]);
    let label_getter = store.add_method(proxy, "get_Label", TypeSig::named("System.String"), vec![]);
    store.add_property(
        proxy,
        "Label",
        TypeSig::named("System.String"),
        Some(label_getter),
        None,
    );
    store.annotate(proxy, Annotation::new("App.ShimmedAttribute"));

    ProxyScene {
        store,
        widget,
        proxy,
    }
}

fn method_key(store: &DeclStore, owner: TypeId, name: &str) -> MemberIdentifier {
    let id = store
        .type_decl(owner)
        .methods
        .iter()
        .copied()
        .find(|&m| store.method(m).name == name)
        .expect("method declared");
    MemberIdentifier::of_method(store, id)
}

#[test]
fn proxy_substitutes_and_contributes() {
    let ProxyScene {
        store,
        widget,
        proxy,
    } = proxy_scene(vec![]);
    let run_key = method_key(&store, widget, "Run");
    let reset_key = method_key(&store, proxy, "Reset");
    let db = db(store);

    let info = db.get_type(widget).expect("builds");
    assert_eq!(info.proxies().len(), 1);
    assert_eq!(info.proxies()[0].member_policy(), MemberPolicy::Default);

    let run = info.member(&run_key).expect("run");
    assert!(run.is_substituted());
    assert_eq!(
        db.decls().declaring_type(run.backing()),
        Some(proxy),
        "backed by the proxy"
    );

    let reset = info.member(&reset_key).expect("contributed");
    assert_eq!(reset.declaring_type(), widget);
    assert_eq!(reset.backing(), reset.decl());

    let label = info
        .members()
        .find(|m| m.name() == "Label")
        .expect("contributed property");
    assert!(label.as_property().is_some());
    assert!(info.members().any(|m| m.name() == "get_Label"));

    // Merge policy: both sets of type annotations survive, the proxy's
    // marker included.
    assert!(info.metadata().has("App.SerializableAttribute"));
    assert!(info.metadata().has("App.ShimmedAttribute"));
    assert!(info.metadata().has(&names().proxy));
}

#[test]
fn replace_attribute_policy_replaces_type_metadata() {
    let ProxyScene { store, widget, .. } = proxy_scene(vec![AnnotationArg::enum_value(
        names().attribute_policy_enum,
        1,
    )]);
    let db = db(store);

    let info = db.get_type(widget).expect("builds");
    assert_eq!(info.proxies()[0].attribute_policy(), AttributePolicy::Replace);
    assert!(!info.metadata().has("App.SerializableAttribute"));
    assert!(info.metadata().has("App.ShimmedAttribute"));
    assert!(info.metadata().has(&names().proxy));
}

#[test]
fn replace_none_still_contributes() {
    let ProxyScene {
        store,
        widget,
        proxy,
    } = proxy_scene(vec![AnnotationArg::enum_value(names().member_policy_enum, 2)]);
    let run_key = method_key(&store, widget, "Run");
    let reset_key = method_key(&store, proxy, "Reset");
    let db = db(store);

    let info = db.get_type(widget).expect("builds");
    assert!(!info.member(&run_key).expect("run").is_substituted());
    assert!(info.member(&reset_key).is_some());
}

#[test]
fn malformed_proxy_is_fatal() {
    let ProxyScene { store, widget, .. } = proxy_scene(vec![AnnotationArg::Int(3)]);
    let db = db(store);

    let err = db.get_type(widget).expect_err("malformed");
    assert!(matches!(err, SemaError::MalformedProxy { ref proxy, .. } if proxy == "App.Shims.WidgetShim"));
    let diagnostic = err.to_diagnostic();
    assert!(diagnostic.is_error());
    assert_eq!(diagnostic.subject.as_deref(), Some("App.Shims.WidgetShim"));
    assert!(db.resolve_all().is_err());
}

#[test]
fn substituted_member_merges_backing_metadata() {
    let (mut store, module) = new_store();
    let widget = store.add_type(module, "App", "Widget", TypeKind::Class);
    let proxy = store.add_type(module, "App", "WidgetShim", TypeKind::Class);
    store.annotate(proxy, proxy_of("App.Widget", vec![]));
    let own = store.add_method(widget, "Draw", TypeSig::void(), vec![]);
    let shim = store.add_method(proxy, "Draw", TypeSig::void(), vec![]);
    store.annotate(own, Annotation::new("App.ObsoleteAttribute"));
    store.annotate(shim, Annotation::new(names().ignore));

    let db = db(store);
    let draw = db.get_member(DeclRef::Method(own)).expect("member");
    assert_eq!(draw.backing(), DeclRef::Method(shim));
    assert!(draw.metadata().has("App.ObsoleteAttribute"));
    assert!(draw.is_ignored(), "ignore annotation comes from the backing declaration");
}

#[test]
fn identical_proxy_overload_backs_concrete_member() {
    let (mut store, module) = new_store();
    let widget = store.add_type(module, "App", "Widget", TypeKind::Class);
    let proxy = store.add_type(module, "App", "WidgetShim", TypeKind::Class);
    store.annotate(proxy, proxy_of("App.Widget", vec![]));
    let own = store.add_method(widget, "Put", TypeSig::void(), param(int()));
    let generic = store.add_method(
        proxy,
        "Put",
        TypeSig::void(),
        param(TypeSig::method_param(0, "T")),
    );
    let exact = store.add_method(proxy, "Put", TypeSig::void(), param(int()));

    let db = db(store);
    let info = db.get_type(widget).expect("builds");
    let put = info.member_for(DeclRef::Method(own)).expect("own Put");
    assert_eq!(put.backing(), DeclRef::Method(exact));
    // Both proxy overloads match the target's `Put`, so neither is added.
    assert!(info.member_for(DeclRef::Method(generic)).is_none());
    assert!(info.member_for(DeclRef::Method(exact)).is_none());
}
