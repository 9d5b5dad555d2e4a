//! Dispatch keys: the compile-time tag that routes a call on a mock to the
//! mock object of the right overload.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::decl::{MethodDecl, Qualifiers};
use crate::type_ref::TypeRef;

/// Parameter types in declaration order plus the method qualifiers.
///
/// Parameters are stored in signature form, so two declarations the C++
/// compiler treats as the same function (`f(int)`, `f(const int)`) have
/// equal keys.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub struct DispatchKey {
    pub params: Vec<TypeRef>,
    pub qualifiers: Qualifiers,
}

impl DispatchKey {
    #[must_use]
    pub fn new(params: Vec<TypeRef>, qualifiers: Qualifiers) -> Self {
        Self {
            params: params.iter().map(TypeRef::signature_form).collect(),
            qualifiers,
        }
    }

    #[must_use]
    pub fn of(method: &MethodDecl) -> Self {
        Self::new(method.params.clone(), method.qualifiers)
    }

    /// Key elements as rendered in generated code: parameter types followed
    /// by qualifier markers.
    #[must_use]
    pub fn elements(&self) -> Vec<String> {
        self.params
            .iter()
            .map(ToString::to_string)
            .chain(self.qualifiers.tokens().into_iter().map(str::to_string))
            .collect()
    }
}

impl fmt::Display for DispatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.elements().join(", "))
    }
}
