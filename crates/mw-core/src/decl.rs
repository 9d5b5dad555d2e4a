//! Declarations of one C++ interface, as seen by the mock generator.
//!
//! An [`InterfaceDecl`] is built once per translated class and never
//! mutated afterwards. Base classes are referenced by qualified name,
//! not owned, so shared bases are not duplicated across interfaces.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::mangle;
use crate::type_ref::TypeRef;

// ---------------------------------------------------------------------------
// Access
// ---------------------------------------------------------------------------

/// Member or base-specifier access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    Public,
    Protected,
    Private,
}

impl Access {
    pub const ALL: [Self; 3] = [Self::Public, Self::Protected, Self::Private];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Access {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "public" => Ok(Self::Public),
            "protected" => Ok(Self::Protected),
            "private" => Ok(Self::Private),
            other => Err(format!(
                "unknown access specifier '{other}' (expected public, protected or private)"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Virtuality
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Virtuality {
    NonVirtual,
    Virtual,
    PureVirtual,
}

impl Virtuality {
    #[must_use]
    pub const fn is_virtual(self) -> bool {
        matches!(self, Self::Virtual | Self::PureVirtual)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NonVirtual => "non_virtual",
            Self::Virtual => "virtual",
            Self::PureVirtual => "pure_virtual",
        }
    }
}

impl fmt::Display for Virtuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Qualifiers
// ---------------------------------------------------------------------------

/// Ref-qualifier of a member function (`void f() &`, `void f() &&`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum RefQualifier {
    #[default]
    None,
    Lvalue,
    Rvalue,
}

impl RefQualifier {
    /// The qualifier token, empty for [`RefQualifier::None`].
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Lvalue => "&",
            Self::Rvalue => "&&",
        }
    }
}

/// Method qualifiers that take part in overload identity.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    JsonSchema,
)]
pub struct Qualifiers {
    pub is_const: bool,
    pub is_volatile: bool,
    #[serde(default)]
    pub ref_qualifier: RefQualifier,
}

impl Qualifiers {
    #[must_use]
    pub const fn constant() -> Self {
        Self {
            is_const: true,
            is_volatile: false,
            ref_qualifier: RefQualifier::None,
        }
    }

    /// Qualifier tokens in declaration order, e.g. `["const", "&&"]`.
    #[must_use]
    pub fn tokens(&self) -> Vec<&'static str> {
        let mut tokens = Vec::new();
        if self.is_const {
            tokens.push("const");
        }
        if self.is_volatile {
            tokens.push("volatile");
        }
        if self.ref_qualifier != RefQualifier::None {
            tokens.push(self.ref_qualifier.token());
        }
        tokens
    }
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TemplateParamKind {
    /// `typename T`, `class T`, template template parameters.
    Type,
    /// `int N`, `auto V`.
    NonType,
    /// `typename... Ts`, `int... Ns`.
    Pack,
}

/// One template parameter, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct TemplateParam {
    pub kind: TemplateParamKind,
    pub name: String,
    /// Declaration as written without any default argument,
    /// e.g. `typename ... Ts` or `std::size_t N`.
    pub declaration: String,
}

impl TemplateParam {
    #[must_use]
    pub fn new(kind: TemplateParamKind, name: impl Into<String>) -> Self {
        let name = name.into();
        let declaration = match kind {
            TemplateParamKind::Type => format!("typename {name}"),
            TemplateParamKind::NonType => format!("int {name}"),
            TemplateParamKind::Pack => format!("typename ... {name}"),
        };
        Self {
            kind,
            name,
            declaration,
        }
    }

    #[must_use]
    pub fn with_declaration(mut self, declaration: impl Into<String>) -> Self {
        self.declaration = declaration.into();
        self
    }

    /// How the parameter is spelled as a template argument (`Ts ...` for packs).
    #[must_use]
    pub fn argument(&self) -> String {
        match self.kind {
            TemplateParamKind::Pack => format!("{} ...", self.name),
            TemplateParamKind::Type | TemplateParamKind::NonType => self.name.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Methods
// ---------------------------------------------------------------------------

/// One member function.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct MethodDecl {
    /// Normalised name: `operator==` for operators, `operator int` for
    /// conversion operators.
    pub name: String,
    pub return_type: TypeRef,
    pub params: Vec<TypeRef>,
    pub qualifiers: Qualifiers,
    pub virtuality: Virtuality,
    /// Qualified name of the class that declares the method. Differs from
    /// the interface name for methods inherited from a mockable base.
    pub declaring_class: String,
    pub access: Access,
    /// Matched the slot convention of the run.
    #[serde(default)]
    pub is_slot: bool,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_template: bool,
    #[serde(default)]
    pub is_noexcept: bool,
    #[serde(default)]
    pub is_operator: bool,
    pub line: usize,
}

impl MethodDecl {
    /// Whether the method is eligible for mocking.
    ///
    /// Static members and member templates are never eligible: neither can
    /// be overridden.
    #[must_use]
    pub const fn is_mockable(&self) -> bool {
        if self.is_static || self.is_template {
            return false;
        }
        self.virtuality.is_virtual() || self.is_slot
    }

    #[must_use]
    pub const fn is_pure_virtual(&self) -> bool {
        matches!(self.virtuality, Virtuality::PureVirtual)
    }

    /// Name usable as a C++ identifier (operators are spelled out).
    #[must_use]
    pub fn mangled_name(&self) -> String {
        mangle::mangle(&self.name)
    }

    /// `void f(int) const`, for diagnostics.
    #[must_use]
    pub fn signature(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MethodDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<&str> = self.params.iter().map(TypeRef::as_str).collect();
        write!(f, "{} {}({})", self.return_type, self.name, params.join(", "))?;
        for token in self.qualifiers.tokens() {
            write!(f, " {token}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Constructors
// ---------------------------------------------------------------------------

/// A constructor signature that can be forwarded exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct CtorSignature {
    pub params: Vec<TypeRef>,
    pub access: Access,
    #[serde(default)]
    pub is_explicit: bool,
}

/// A captured constructor. Deleted constructors are never captured.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CtorDecl {
    Signature(CtorSignature),
    /// No constrained signature can be derived (template or inheriting
    /// constructor, or only the implicit default constructor).
    ForwardingVariadic,
}

impl CtorDecl {
    #[must_use]
    pub const fn is_forwarding(&self) -> bool {
        matches!(self, Self::ForwardingVariadic)
    }
}

// ---------------------------------------------------------------------------
// Bases, aliases, interface
// ---------------------------------------------------------------------------

/// Non-owning reference to a base class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct BaseRef {
    /// The base as written, template arguments included (`Base<T, int>`).
    pub spelling: String,
    /// Qualified name of the base if it was declared in the same header.
    pub qualified_name: Option<String>,
    pub access: Access,
    #[serde(default)]
    pub is_virtual: bool,
}

/// `using name = target;` or `typedef target name;` inside the class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct TypeAlias {
    pub name: String,
    pub target: TypeRef,
    #[serde(default)]
    pub template_params: Vec<TemplateParam>,
}

/// One C++ interface: the class to be mocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct InterfaceDecl {
    /// Unqualified class name.
    pub name: String,
    /// `ns::inner::Name`.
    pub qualified_name: String,
    /// Enclosing namespace path, empty at global scope.
    pub namespace: String,
    pub template_params: Vec<TemplateParam>,
    pub base_classes: Vec<BaseRef>,
    pub methods: Vec<MethodDecl>,
    pub ctors: Vec<CtorDecl>,
    #[serde(default)]
    pub type_aliases: Vec<TypeAlias>,
    /// Declared with the `Q_OBJECT` macro.
    #[serde(default)]
    pub is_qobject: bool,
    pub header: Option<PathBuf>,
}

impl InterfaceDecl {
    pub fn mockable_methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.methods.iter().filter(|m| m.is_mockable())
    }

    pub fn pure_virtual_methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.methods.iter().filter(|m| m.is_pure_virtual())
    }

    #[must_use]
    pub fn is_template(&self) -> bool {
        !self.template_params.is_empty()
    }

    /// The interface as a type, template arguments included
    /// (`ns::Derived<T, Ts ...>`).
    #[must_use]
    pub fn type_spelling(&self) -> String {
        if self.template_params.is_empty() {
            return self.qualified_name.clone();
        }
        let args: Vec<String> = self.template_params.iter().map(TemplateParam::argument).collect();
        format!("{}<{}>", self.qualified_name, args.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn method(name: &str, params: &[&str], virtuality: Virtuality) -> MethodDecl {
        MethodDecl {
            name: name.to_string(),
            return_type: TypeRef::parse("void"),
            params: params.iter().map(|p| TypeRef::parse(p)).collect(),
            qualifiers: Qualifiers::default(),
            virtuality,
            declaring_class: "Foo".to_string(),
            access: Access::Public,
            is_slot: false,
            is_static: false,
            is_template: false,
            is_noexcept: false,
            is_operator: false,
            line: 1,
        }
    }

    #[test]
    fn access_parses_from_str() {
        assert_eq!("protected".parse::<Access>(), Ok(Access::Protected));
        assert!("friend".parse::<Access>().is_err());
    }

    #[test]
    fn mockable_requires_virtual_or_slot() {
        let plain = method("f", &[], Virtuality::NonVirtual);
        assert!(!plain.is_mockable());

        let slot = MethodDecl {
            is_slot: true,
            ..plain.clone()
        };
        assert!(slot.is_mockable());

        assert!(method("f", &[], Virtuality::Virtual).is_mockable());
        assert!(method("f", &[], Virtuality::PureVirtual).is_mockable());
    }

    #[test]
    fn static_and_template_methods_are_not_mockable() {
        let stat = MethodDecl {
            is_static: true,
            is_slot: true,
            ..method("f", &[], Virtuality::NonVirtual)
        };
        assert!(!stat.is_mockable());

        let templ = MethodDecl {
            is_template: true,
            ..method("g", &[], Virtuality::NonVirtual)
        };
        assert!(!templ.is_mockable());
    }

    #[test]
    fn signature_includes_qualifiers() {
        let mut m = method("f", &["int", "const std::string&"], Virtuality::Virtual);
        m.qualifiers = Qualifiers {
            is_const: true,
            is_volatile: false,
            ref_qualifier: RefQualifier::Rvalue,
        };
        assert_eq!(m.signature(), "void f(int, const std::string &) const &&");
    }

    #[test]
    fn template_param_argument_spelling() {
        assert_eq!(TemplateParam::new(TemplateParamKind::Type, "T").argument(), "T");
        assert_eq!(
            TemplateParam::new(TemplateParamKind::Pack, "Ts").argument(),
            "Ts ..."
        );
    }

    #[test]
    fn type_spelling_includes_template_arguments() {
        let decl = InterfaceDecl {
            name: "Derived".into(),
            qualified_name: "outer::Derived".into(),
            namespace: "outer".into(),
            template_params: vec![
                TemplateParam::new(TemplateParamKind::Type, "T"),
                TemplateParam::new(TemplateParamKind::Pack, "Ts"),
            ],
            base_classes: Vec::new(),
            methods: Vec::new(),
            ctors: Vec::new(),
            type_aliases: Vec::new(),
            is_qobject: false,
            header: None,
        };
        assert_eq!(decl.type_spelling(), "outer::Derived<T, Ts ...>");
    }

    #[test]
    fn ctor_decl_serializes_with_kind_tag() {
        let json = serde_json::to_value(CtorDecl::ForwardingVariadic).expect("serialize");
        assert_eq!(json, serde_json::json!({ "kind": "forwarding_variadic" }));

        let exact = CtorDecl::Signature(CtorSignature {
            params: vec![TypeRef::parse("int")],
            access: Access::Public,
            is_explicit: true,
        });
        let json = serde_json::to_value(&exact).expect("serialize");
        assert_eq!(json["kind"], "signature");
        assert_eq!(json["params"], serde_json::json!(["int"]));
    }
}
