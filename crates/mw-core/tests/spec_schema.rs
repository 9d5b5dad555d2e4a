//! Serde roundtrip and JsonSchema validation for the IR handed to renderers.

use pretty_assertions::assert_eq;
use schemars::schema_for;

use mw_core::{
    Access, BaseRef, CtorDecl, CtorSignature, CtorStrategy, DispatchKey, InterfaceDecl,
    MethodDecl, MockMethod, MockSpec, Qualifiers, RefQualifier, TemplateParam, TemplateParamKind,
    TypeAlias, TypeRef, Virtuality,
};

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(recovered, val, "serde roundtrip failed for {}", stringify!($ty));

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn method(name: &str, params: &[&str], qualifiers: Qualifiers, virtuality: Virtuality) -> MethodDecl {
    MethodDecl {
        name: name.to_string(),
        return_type: TypeRef::parse("void"),
        params: params.iter().map(|p| TypeRef::parse(p)).collect(),
        qualifiers,
        virtuality,
        declaring_class: "outer::Derived".to_string(),
        access: Access::Public,
        is_slot: false,
        is_static: false,
        is_template: false,
        is_noexcept: false,
        is_operator: name.starts_with("operator"),
        line: 7,
    }
}

fn interface() -> InterfaceDecl {
    InterfaceDecl {
        name: "Derived".into(),
        qualified_name: "outer::Derived".into(),
        namespace: "outer".into(),
        template_params: vec![
            TemplateParam::new(TemplateParamKind::Type, "T"),
            TemplateParam::new(TemplateParamKind::NonType, "N").with_declaration("std::size_t N"),
            TemplateParam::new(TemplateParamKind::Pack, "Ts"),
        ],
        base_classes: vec![BaseRef {
            spelling: "Base<T>".into(),
            qualified_name: Some("outer::Base".into()),
            access: Access::Public,
            is_virtual: false,
        }],
        methods: vec![
            method("f", &["int"], Qualifiers::default(), Virtuality::Virtual),
            method("f", &["int"], Qualifiers::constant(), Virtuality::PureVirtual),
            method(
                "operator==",
                &["const Derived &"],
                Qualifiers {
                    is_const: true,
                    is_volatile: false,
                    ref_qualifier: RefQualifier::Lvalue,
                },
                Virtuality::Virtual,
            ),
        ],
        ctors: vec![
            CtorDecl::Signature(CtorSignature {
                params: vec![TypeRef::parse("const T&")],
                access: Access::Protected,
                is_explicit: true,
            }),
            CtorDecl::ForwardingVariadic,
        ],
        type_aliases: vec![TypeAlias {
            name: "value_type".into(),
            target: TypeRef::parse("std::vector<T>"),
            template_params: Vec::new(),
        }],
        is_qobject: false,
        header: Some("include/derived.h".into()),
    }
}

fn spec() -> MockSpec {
    let decl = interface();
    let count = decl.methods.iter().filter(|m| m.name == "f").count();
    let mockable_methods = decl
        .methods
        .iter()
        .enumerate()
        .map(|(idx, m)| {
            let (index, total) = if m.name == "f" { (idx, count) } else { (0, 1) };
            MockMethod::new(m.clone(), DispatchKey::of(m), index, total)
        })
        .collect();
    MockSpec {
        ctor_strategy: CtorStrategy::from_ctors(&decl.ctors),
        template_params: decl.template_params.clone(),
        interface: decl,
        mockable_methods,
        mock_name: "MockDerived".into(),
        mock_namespace: "outer".into(),
        controller: "control".into(),
    }
}

roundtrip_and_validate!(type_ref_roundtrip, TypeRef, TypeRef::parse("const T * const &"));

roundtrip_and_validate!(
    dispatch_key_roundtrip,
    DispatchKey,
    DispatchKey::new(vec![TypeRef::parse("int")], Qualifiers::constant())
);

roundtrip_and_validate!(interface_decl_roundtrip, InterfaceDecl, interface());

roundtrip_and_validate!(mock_spec_roundtrip, MockSpec, spec());

roundtrip_and_validate!(
    exact_ctor_strategy_roundtrip,
    CtorStrategy,
    CtorStrategy::Exact {
        signatures: vec![CtorSignature {
            params: vec![],
            access: Access::Public,
            is_explicit: false,
        }],
    }
);

#[test]
fn mock_spec_json_shape() {
    let json = serde_json::to_value(spec()).unwrap();
    assert_eq!(json["mock_name"], "MockDerived");
    assert_eq!(json["ctor_strategy"]["kind"], "forwarding_variadic");
    assert_eq!(json["mockable_methods"][2]["mangled_name"], "operatorEqual");
    assert_eq!(
        json["mockable_methods"][2]["decayed_params"],
        serde_json::json!(["Derived"])
    );
    assert_eq!(
        json["template_params"][2],
        serde_json::json!({ "kind": "pack", "name": "Ts", "declaration": "typename ... Ts" })
    );
    assert_eq!(json["interface"]["methods"][1]["virtuality"], "pure_virtual");
}

#[test]
fn qualified_mock_name_joins_namespace() {
    let mut spec = spec();
    assert_eq!(spec.qualified_mock_name(), "outer::MockDerived");
    spec.mock_namespace.clear();
    assert_eq!(spec.qualified_mock_name(), "MockDerived");
}
