//! Mock Spec Assembler: interface model + dispatch keys into a [`MockSpec`].

use mw_core::{CtorStrategy, InterfaceDecl, MockMethod, MockSpec};

use crate::naming::MockNames;
use crate::overload::DispatchTable;

/// Merge `interface` and its dispatch keys into the spec handed to
/// rendering. Every mockable method of the interface, pure virtuals
/// included, appears exactly once, in declaration order.
#[must_use]
pub fn assemble(interface: InterfaceDecl, table: &DispatchTable, names: MockNames) -> MockSpec {
    let mockable_methods = table
        .entries()
        .iter()
        .filter_map(|entry| {
            let method = interface.methods.get(entry.method_index)?;
            Some(MockMethod::new(
                method.clone(),
                entry.key.clone(),
                entry.overload_index,
                entry.overload_count,
            ))
        })
        .collect();

    MockSpec {
        ctor_strategy: CtorStrategy::from_ctors(&interface.ctors),
        template_params: interface.template_params.clone(),
        mockable_methods,
        mock_name: names.mock_name,
        mock_namespace: names.mock_namespace,
        controller: names.controller,
        interface,
    }
}
