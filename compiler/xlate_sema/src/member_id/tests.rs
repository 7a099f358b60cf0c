#![allow(clippy::expect_used, reason = "Tests can panic")]

use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use xlate_ir::{MemberFlags, ParamDecl, TypeId, TypeKind};

fn int() -> TypeSig {
    TypeSig::named("System.Int32")
}

fn string() -> TypeSig {
    TypeSig::named("System.String")
}

struct Fixture {
    store: DeclStore,
    target: TypeId,
    proxy: TypeId,
}

fn fixture() -> Fixture {
    let mut store = DeclStore::new();
    let module = store.add_module("App.dll");
    let target = store.add_type(module, "App", "Widget", TypeKind::Class);
    let proxy = store.add_type(module, "App", "WidgetProxy", TypeKind::Class);
    Fixture {
        store,
        target,
        proxy,
    }
}

fn method_id(
    store: &mut DeclStore,
    owner: TypeId,
    name: &str,
    params: &[TypeSig],
) -> MemberIdentifier {
    let params = params
        .iter()
        .enumerate()
        .map(|(i, ty)| ParamDecl::new(format!("p{i}"), ty.clone()))
        .collect();
    let id = store.add_method(owner, name, TypeSig::void(), params);
    MemberIdentifier::of_method(store, id)
}

#[test]
fn independent_declarations_of_one_signature_are_equal() {
    let Fixture {
        mut store,
        target,
        proxy,
    } = fixture();
    let a = method_id(&mut store, target, "Add", &[int(), string()]);
    let b = method_id(&mut store, proxy, "Add", &[int(), string()]);

    assert_eq!(a, b);
    assert_eq!(b, a);
    assert_eq!(a, a.clone());
}

#[test]
fn generic_parameter_matches_concrete_type() {
    let Fixture {
        mut store,
        target,
        proxy,
    } = fixture();
    let concrete = method_id(&mut store, target, "Put", &[int()]);
    let generic = method_id(&mut store, proxy, "Put", &[TypeSig::type_param(0, "T")]);
    let by_ref = method_id(
        &mut store,
        proxy,
        "Put",
        &[TypeSig::by_ref(TypeSig::method_param(0, "U"))],
    );

    assert_eq!(concrete, generic);
    assert_eq!(generic, concrete);
    assert_eq!(concrete, by_ref);
}

#[test]
fn generic_return_type_matches_concrete_return() {
    let Fixture {
        mut store,
        target,
        proxy,
    } = fixture();
    let concrete = store.add_method(target, "Get", int(), vec![]);
    let generic = store.add_method(proxy, "Get", TypeSig::type_param(0, "T"), vec![]);

    assert_eq!(
        MemberIdentifier::of_method(&store, concrete),
        MemberIdentifier::of_method(&store, generic)
    );
}

#[test]
fn name_kind_and_arity_distinguish_concrete_members() {
    let Fixture {
        mut store,
        target,
        proxy,
    } = fixture();
    let base = method_id(&mut store, target, "Add", &[int()]);
    let renamed = method_id(&mut store, proxy, "add", &[int()]);
    let wider = method_id(&mut store, proxy, "Add", &[int(), int()]);
    let other_type = method_id(&mut store, proxy, "Add", &[string()]);
    let field = store.add_field(proxy, "Add", TypeSig::void());

    assert_ne!(base, renamed);
    assert_ne!(base, wider);
    assert_ne!(base, other_type);
    assert_ne!(base, MemberIdentifier::of_field(&store, field));
}

#[test]
fn nested_generic_arguments_are_compared_structurally() {
    let list_of = |arg| TypeSig::instantiated("System.Collections.Generic.List`1", vec![arg]);
    assert!(types_match(&list_of(int()), &list_of(TypeSig::type_param(0, "T"))));
    assert!(!types_match(&list_of(int()), &list_of(string())));
    assert!(!types_match(&TypeSig::array(int()), &int()));
}

#[test]
fn property_params_fall_back_to_setter_without_value() {
    let Fixture {
        mut store,
        target,
        ..
    } = fixture();
    let getter = store.add_method(
        target,
        "get_Item",
        string(),
        vec![ParamDecl::new("index", int())],
    );
    let setter = store.add_method(
        target,
        "set_Item",
        TypeSig::void(),
        vec![
            ParamDecl::new("index", int()),
            ParamDecl::new("value", string()),
        ],
    );
    let with_getter = store.add_property(target, "Item", string(), Some(getter), Some(setter));
    let setter_only = store.add_property(target, "Item", string(), None, Some(setter));
    let bare = store.add_property(target, "Item", string(), None, None);

    let from_getter = MemberIdentifier::of_property(&store, with_getter);
    let from_setter = MemberIdentifier::of_property(&store, setter_only);
    let absent = MemberIdentifier::of_property(&store, bare);

    assert_eq!(from_getter.params(), Some(&[int()][..]));
    assert_eq!(from_setter.params(), Some(&[int()][..]));
    assert_eq!(absent.params(), None);
    assert_eq!(from_getter, from_setter);
    assert_ne!(from_getter, absent);
}

#[test]
fn module_and_type_handles_are_unsupported() {
    let Fixture { store, target, .. } = fixture();
    let err = MemberIdentifier::new(&store, DeclRef::Type(target))
        .expect_err("types are not members");
    assert_eq!(
        err,
        SemaError::UnsupportedKind {
            name: "App.Widget".to_owned(),
            found: "type",
            expected: "a field, property, event or method",
        }
    );
}

#[test]
fn display_is_readable() {
    let Fixture {
        mut store,
        target,
        ..
    } = fixture();
    let id = method_id(&mut store, target, "Add", &[int(), TypeSig::type_param(0, "T")]);
    assert_eq!(id.to_string(), "method Add(System.Int32, T): System.Void");
}

#[test]
fn member_table_prefers_identical_entry() {
    let Fixture {
        mut store,
        target,
        ..
    } = fixture();
    let generic = method_id(&mut store, target, "Put", &[TypeSig::method_param(0, "T")]);
    let concrete = method_id(&mut store, target, "Put", &[int()]);
    let text = method_id(&mut store, target, "Put", &[string()]);
    let other = method_id(&mut store, target, "Take", &[]);

    let mut table = MemberTable::new();
    assert_eq!(table.push(generic.clone(), "generic"), 0);
    assert_eq!(table.push(concrete.clone(), "concrete"), 1);
    table.push(other.clone(), "other");

    assert_eq!(table.len(), 3);
    assert_eq!(table.get(&concrete), Some(&"concrete"));
    assert_eq!(table.get(&generic), Some(&"generic"));
    // Only the wildcard overload matches `Put(string)`.
    assert_eq!(table.get(&text), Some(&"generic"));
    assert_eq!(table.position(&other), Some(2));
    assert_eq!(
        table.values().copied().collect::<Vec<_>>(),
        vec!["generic", "concrete", "other"]
    );
}

#[test]
fn member_table_falls_back_to_first_equal_entry() {
    let Fixture {
        mut store,
        target,
        ..
    } = fixture();
    let concrete = method_id(&mut store, target, "Put", &[int()]);
    let text = method_id(&mut store, target, "Put", &[string()]);
    let generic = method_id(&mut store, target, "Put", &[TypeSig::type_param(1, "U")]);

    let mut table = MemberTable::new();
    table.push(concrete, "int");
    table.push(text, "string");

    assert_eq!(table.get(&generic), Some(&"int"));
    assert!(table.contains(&generic));
}

#[test]
fn static_flag_does_not_affect_identity() {
    let Fixture {
        mut store,
        target,
        proxy,
    } = fixture();
    let a = store.add_method(target, "F", TypeSig::void(), vec![]);
    let b = store.add_method(proxy, "F", TypeSig::void(), vec![]);
    store.method_mut(b).flags |= MemberFlags::STATIC;
    assert_eq!(
        MemberIdentifier::of_method(&store, a),
        MemberIdentifier::of_method(&store, b)
    );
}

fn arb_type_sig() -> impl Strategy<Value = TypeSig> {
    let leaf = prop_oneof![
        prop::sample::select(vec!["System.Int32", "System.String", "App.Widget"])
            .prop_map(|name| TypeSig::named(name)),
        (0u32..2).prop_map(|position| TypeSig::type_param(position, "T")),
    ];
    leaf.prop_recursive(3, 12, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(TypeSig::by_ref),
            inner.clone().prop_map(TypeSig::array),
            prop::collection::vec(inner, 1..3)
                .prop_map(|args| TypeSig::instantiated("App.Box`1", args)),
        ]
    })
}

proptest! {
    #[test]
    fn types_match_is_reflexive(sig in arb_type_sig()) {
        prop_assert!(types_match(&sig, &sig));
    }

    #[test]
    fn types_match_is_symmetric(a in arb_type_sig(), b in arb_type_sig()) {
        prop_assert_eq!(types_match(&a, &b), types_match(&b, &a));
    }

    #[test]
    fn identifier_equality_is_reflexive(id in arb_identifier()) {
        prop_assert_eq!(&id, &id);
    }

    #[test]
    fn identifier_equality_is_symmetric(a in arb_identifier(), b in arb_identifier()) {
        prop_assert_eq!(a == b, b == a);
    }
}

fn arb_identifier() -> impl Strategy<Value = MemberIdentifier> {
    let kind = prop::sample::select(vec![
        MemberKind::Field,
        MemberKind::Property,
        MemberKind::Event,
        MemberKind::Method,
    ]);
    let name = prop::sample::select(vec!["Put", "Take"]);
    let params = prop::option::of(prop::collection::vec(arb_type_sig(), 0..3));
    (kind, name, arb_type_sig(), params).prop_map(|(kind, name, ty, params)| MemberIdentifier {
        kind,
        name: name.to_owned(),
        ty,
        params: params.map(ParamTypes::from_vec),
    })
}
