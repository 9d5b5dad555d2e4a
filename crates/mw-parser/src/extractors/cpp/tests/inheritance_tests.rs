use super::*;
use pretty_assertions::assert_eq;

#[test]
fn base_access_defaults_by_kind() {
    let source = "class Base {};\nclass A : Base {};\nstruct B : Base {};\n";
    let classes = parse_and_extract(source);
    assert_eq!(find_by_name(&classes, "A").bases[0].access, Access::Private);
    assert_eq!(find_by_name(&classes, "B").bases[0].access, Access::Public);
}

#[test]
fn multiple_bases_keep_order_and_access() {
    let source = "class D : public A, protected virtual B, private ns::C {};";
    let classes = parse_and_extract(source);
    let bases = &find_by_name(&classes, "D").bases;
    let summary: Vec<(String, Access, bool)> = bases
        .iter()
        .map(|b| (b.spelling.clone(), b.access, b.is_virtual))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("A".to_string(), Access::Public, false),
            ("B".to_string(), Access::Protected, true),
            ("ns::C".to_string(), Access::Private, false),
        ]
    );
}

#[test]
fn template_base_arguments() {
    let source = "template <typename T> class D : public Base<T, std::vector<int>> {};";
    let classes = parse_and_extract(source);
    let base = &find_by_name(&classes, "D").bases[0];
    assert_eq!(base.name, "Base");
    assert_eq!(
        base.template_args,
        vec!["T".to_string(), "std::vector<int>".to_string()]
    );
}

#[test]
fn struct_defaults_apply_to_each_base() {
    let source = "struct D : private A, B {};";
    let classes = parse_and_extract(source);
    let bases = &find_by_name(&classes, "D").bases;
    assert_eq!(bases[0].access, Access::Private);
    assert_eq!(bases[1].access, Access::Public);
}
