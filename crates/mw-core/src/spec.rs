//! The finalized mock specification handed to template rendering.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::decl::{CtorDecl, CtorSignature, InterfaceDecl, MethodDecl, TemplateParam};
use crate::dispatch::DispatchKey;
use crate::type_ref::TypeRef;

/// How the generated mock is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CtorStrategy {
    /// One forwarding constructor per captured signature.
    Exact { signatures: Vec<CtorSignature> },
    /// A single variadic constructor forwarding everything to the base.
    ForwardingVariadic,
}

impl CtorStrategy {
    /// Derive the strategy from captured constructors. Any forwarding
    /// marker, or no constructor at all, selects variadic forwarding.
    #[must_use]
    pub fn from_ctors(ctors: &[CtorDecl]) -> Self {
        if ctors.is_empty() || ctors.iter().any(CtorDecl::is_forwarding) {
            return Self::ForwardingVariadic;
        }
        let signatures = ctors
            .iter()
            .filter_map(|ctor| match ctor {
                CtorDecl::Signature(sig) => Some(sig.clone()),
                CtorDecl::ForwardingVariadic => None,
            })
            .collect();
        Self::Exact { signatures }
    }
}

/// A mockable method together with its dispatch key and naming data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MockMethod {
    pub method: MethodDecl,
    pub key: DispatchKey,
    /// Identifier-safe name (`operatorEqual` for `operator==`).
    pub mangled_name: String,
    /// Position of this overload within its group, in declaration order.
    pub overload_index: usize,
    pub overload_count: usize,
    /// Parameter types with references and cv-qualifiers removed.
    pub decayed_params: Vec<TypeRef>,
}

impl MockMethod {
    #[must_use]
    pub fn new(method: MethodDecl, key: DispatchKey, overload_index: usize, overload_count: usize) -> Self {
        let mangled_name = method.mangled_name();
        let decayed_params = method.params.iter().map(TypeRef::decayed).collect();
        Self {
            method,
            key,
            mangled_name,
            overload_index,
            overload_count,
            decayed_params,
        }
    }

    #[must_use]
    pub const fn is_overloaded(&self) -> bool {
        self.overload_count > 1
    }
}

/// Everything a renderer needs to emit one mock class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MockSpec {
    pub interface: InterfaceDecl,
    pub mockable_methods: Vec<MockMethod>,
    pub ctor_strategy: CtorStrategy,
    /// Equal to `interface.template_params`, in order and kind.
    pub template_params: Vec<TemplateParam>,
    /// Name of the generated mock class.
    pub mock_name: String,
    /// Namespace of the generated mock class, empty for the global namespace.
    pub mock_namespace: String,
    /// Name of the member that exposes the mock objects.
    pub controller: String,
}

impl MockSpec {
    /// Fully qualified name of the generated mock.
    #[must_use]
    pub fn qualified_mock_name(&self) -> String {
        if self.mock_namespace.is_empty() {
            self.mock_name.clone()
        } else {
            format!("{}::{}", self.mock_namespace, self.mock_name)
        }
    }

    /// Mock methods sharing `name`, in declaration order.
    pub fn overloads<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MockMethod> + 'a {
        self.mockable_methods
            .iter()
            .filter(move |m| m.method.name == name)
    }
}
