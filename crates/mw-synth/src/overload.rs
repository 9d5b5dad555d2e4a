//! Overload Resolver: one [`DispatchKey`] per mockable method.
//!
//! Mockable methods are grouped by name. Within a group every key must be
//! unique; two declarations that collapse onto the same parameter types and
//! qualifiers are reported instead of one of them being picked.

use std::collections::HashMap;

use mw_core::{DispatchKey, MethodDecl};

use crate::error::MockError;

/// All mockable methods sharing one name, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverloadGroup<'m> {
    pub name: &'m str,
    /// Indices into the method slice handed to [`group`].
    pub members: Vec<usize>,
}

impl OverloadGroup<'_> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Group the mockable methods by name, groups ordered by first appearance.
#[must_use]
pub fn group(methods: &[MethodDecl]) -> Vec<OverloadGroup<'_>> {
    let mut groups: Vec<OverloadGroup<'_>> = Vec::new();
    let mut by_name: HashMap<&str, usize> = HashMap::new();
    for (index, method) in methods.iter().enumerate() {
        if !method.is_mockable() {
            continue;
        }
        let slot = *by_name.entry(method.name.as_str()).or_insert_with(|| {
            groups.push(OverloadGroup {
                name: method.name.as_str(),
                members: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].members.push(index);
    }
    groups
}

/// The key of one mockable method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchEntry {
    /// Index of the method in the resolved slice.
    pub method_index: usize,
    pub key: DispatchKey,
    /// Position within the overload group.
    pub overload_index: usize,
    pub overload_count: usize,
}

/// Dispatch keys of every mockable method, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchTable {
    entries: Vec<DispatchEntry>,
}

impl DispatchTable {
    #[must_use]
    pub fn entries(&self) -> &[DispatchEntry] {
        &self.entries
    }

    /// Key of the method at `method_index`, if it is mockable.
    #[must_use]
    pub fn key_of(&self, method_index: usize) -> Option<&DispatchKey> {
        self.entries
            .iter()
            .find(|e| e.method_index == method_index)
            .map(|e| &e.key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Compute the dispatch keys of the mockable methods of `interface`.
///
/// # Errors
/// `AmbiguousOverload` naming the first conflicting pair of a group.
pub fn resolve(interface: &str, methods: &[MethodDecl]) -> Result<DispatchTable, MockError> {
    let mut entries = Vec::new();
    for overloads in group(methods) {
        let mut seen: HashMap<DispatchKey, usize> = HashMap::with_capacity(overloads.len());
        for (position, &index) in overloads.members.iter().enumerate() {
            let key = DispatchKey::of(&methods[index]);
            if let Some(&first) = seen.get(&key) {
                return Err(MockError::AmbiguousOverload {
                    interface: interface.to_string(),
                    first: methods[first].signature(),
                    second: methods[index].signature(),
                    key: key.to_string(),
                });
            }
            seen.insert(key.clone(), index);
            entries.push(DispatchEntry {
                method_index: index,
                key,
                overload_index: position,
                overload_count: overloads.len(),
            });
        }
    }
    entries.sort_by_key(|e| e.method_index);
    tracing::debug!(interface, keys = entries.len(), "resolved dispatch keys");
    Ok(DispatchTable { entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mw_core::{Access, Qualifiers, RefQualifier, TypeRef, Virtuality};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn method(name: &str, params: &[&str], qualifiers: Qualifiers) -> MethodDecl {
        MethodDecl {
            name: name.to_string(),
            return_type: TypeRef::parse("void"),
            params: params.iter().map(|p| TypeRef::parse(p)).collect(),
            qualifiers,
            virtuality: Virtuality::Virtual,
            declaring_class: "I".to_string(),
            access: Access::Public,
            is_slot: false,
            is_static: false,
            is_template: false,
            is_noexcept: false,
            is_operator: false,
            line: 1,
        }
    }

    fn plain(name: &str, params: &[&str]) -> MethodDecl {
        method(name, params, Qualifiers::default())
    }

    fn keys(table: &DispatchTable) -> Vec<String> {
        table.entries().iter().map(|e| e.key.to_string()).collect()
    }

    #[test]
    fn single_method_gets_a_key() {
        let methods = vec![plain("f", &["float"])];
        let table = resolve("I", &methods).expect("resolve");
        assert_eq!(keys(&table), vec!["(float)"]);
        assert_eq!(table.entries()[0].overload_count, 1);
    }

    #[test]
    fn qualifiers_distinguish_overloads() {
        let volatile = Qualifiers {
            is_volatile: true,
            ..Qualifiers::default()
        };
        let rvalue = Qualifiers {
            ref_qualifier: RefQualifier::Rvalue,
            ..Qualifiers::default()
        };
        let methods = vec![
            plain("f", &["int"]),
            method("f", &["int"], Qualifiers::constant()),
            method("f", &["int"], volatile),
            method("f", &["int"], rvalue),
        ];
        let table = resolve("I", &methods).expect("resolve");
        assert_eq!(
            keys(&table),
            vec!["(int)", "(int, const)", "(int, volatile)", "(int, &&)"]
        );
        let positions: Vec<(usize, usize)> = table
            .entries()
            .iter()
            .map(|e| (e.overload_index, e.overload_count))
            .collect();
        assert_eq!(positions, vec![(0, 4), (1, 4), (2, 4), (3, 4)]);
    }

    #[test]
    fn parameter_order_matters() {
        let methods = vec![plain("f", &["int", "double"]), plain("f", &["double", "int"])];
        assert_eq!(resolve("I", &methods).expect("resolve").len(), 2);
    }

    #[rstest]
    #[case::identical(&["int"], &["int"])]
    #[case::top_level_const(&["int"], &["const int"])]
    #[case::spelling(&["const T&"], &["T const &"])]
    fn colliding_signatures_are_ambiguous(#[case] first: &[&str], #[case] second: &[&str]) {
        let methods = vec![plain("f", first), plain("g", &[]), plain("f", second)];
        let err = resolve("ns::I", &methods).unwrap_err();
        let MockError::AmbiguousOverload {
            interface,
            first: reported_first,
            second: reported_second,
            ..
        } = &err
        else {
            panic!("expected AmbiguousOverload, got {err:?}");
        };
        assert_eq!(interface, "ns::I");
        assert!(reported_first.starts_with("void f("));
        assert!(reported_second.starts_with("void f("));
    }

    #[test]
    fn ambiguity_message_names_both_signatures() {
        let methods = vec![plain("f", &["int"]), plain("f", &["int"])];
        let err = resolve("I", &methods).unwrap_err();
        assert_eq!(
            err.to_string(),
            "ambiguous overload in I: `void f(int)` and `void f(int)` share dispatch key (int)"
        );
    }

    #[test]
    fn non_mockable_methods_get_no_key() {
        let mut helper = plain("helper", &[]);
        helper.virtuality = Virtuality::NonVirtual;
        let mut duplicate = plain("helper", &[]);
        duplicate.virtuality = Virtuality::NonVirtual;
        let methods = vec![helper, plain("f", &[]), duplicate];
        let table = resolve("I", &methods).expect("resolve");
        assert_eq!(table.len(), 1);
        assert_eq!(table.key_of(1).map(ToString::to_string), Some("()".to_string()));
        assert_eq!(table.key_of(0), None);
    }

    #[test]
    fn entries_follow_declaration_order() {
        let methods = vec![plain("f", &["int"]), plain("g", &[]), plain("f", &["char"])];
        let table = resolve("I", &methods).expect("resolve");
        let order: Vec<usize> = table.entries().iter().map(|e| e.method_index).collect();
        assert_eq!(order, vec![0, 1, 2]);
        assert_eq!(table.entries()[2].overload_index, 1);
    }

    #[test]
    fn groups_by_name() {
        let methods = vec![plain("f", &["int"]), plain("g", &[]), plain("f", &["char"])];
        let groups = group(&methods);
        let summary: Vec<(&str, Vec<usize>)> =
            groups.iter().map(|g| (g.name, g.members.clone())).collect();
        assert_eq!(summary, vec![("f", vec![0, 2]), ("g", vec![1])]);
    }
}
