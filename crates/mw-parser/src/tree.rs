//! The declaration tree produced from one header.
//!
//! A [`TranslationUnit`] owns every class found in the header, in source
//! order. Classes refer to each other only by qualified name; the unit is
//! the registry those names are looked up in.

use std::collections::HashSet;
use std::path::PathBuf;

use mw_core::{Access, Qualifiers, TemplateParam, TypeRef};
use regex::Regex;

use crate::error::ParseError;

/// `class` or `struct`; decides the default member and base access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Struct,
}

impl ClassKind {
    #[must_use]
    pub const fn default_access(self) -> Access {
        match self {
            Self::Class => Access::Private,
            Self::Struct => Access::Public,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseSpecifier {
    /// As written, template arguments included.
    pub spelling: String,
    /// Spelling without template arguments (`ns::Base` for `ns::Base<T>`).
    pub name: String,
    pub template_args: Vec<String>,
    pub access: Access,
    pub is_virtual: bool,
    /// Qualified name of the class in this unit the base refers to.
    pub resolved: Option<String>,
}

/// A member function other than a constructor or destructor.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodNode {
    pub name: String,
    pub return_type: TypeRef,
    pub params: Vec<TypeRef>,
    pub qualifiers: Qualifiers,
    /// Declared with the `virtual` keyword.
    pub is_virtual: bool,
    pub is_pure: bool,
    pub is_override: bool,
    pub is_final: bool,
    pub is_static: bool,
    pub is_template: bool,
    pub is_deleted: bool,
    pub is_defaulted: bool,
    pub is_noexcept: bool,
    pub is_conversion: bool,
    pub access: Access,
    /// Framework markers attached to the declaration (`slots`, `Q_SLOT`, ...).
    pub markers: Vec<String>,
    pub line: usize,
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CtorNode {
    pub params: Vec<TypeRef>,
    pub access: Access,
    pub is_deleted: bool,
    pub is_defaulted: bool,
    pub is_template: bool,
    pub is_explicit: bool,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DtorNode {
    pub is_virtual: bool,
    pub is_pure: bool,
    pub is_deleted: bool,
    pub access: Access,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasNode {
    pub name: String,
    pub target: TypeRef,
    pub template_params: Vec<TemplateParam>,
    pub access: Access,
    pub line: usize,
}

/// One member declaration of a class body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberNode {
    Method(MethodNode),
    Ctor(CtorNode),
    Dtor(DtorNode),
    /// `using Base::Base;`
    InheritingCtor { base: String, access: Access, line: usize },
    /// `using Base::name;`
    Using { name: String, access: Access, line: usize },
    Alias(AliasNode),
    Field { name: String, access: Access, line: usize },
}

impl MemberNode {
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::Method(m) => m.line,
            Self::Ctor(c) => c.line,
            Self::Dtor(d) => d.line,
            Self::Alias(a) => a.line,
            Self::InheritingCtor { line, .. }
            | Self::Using { line, .. }
            | Self::Field { line, .. } => *line,
        }
    }
}

/// A class or struct definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNode {
    pub name: String,
    pub qualified_name: String,
    /// Enclosing namespaces, outermost first.
    pub namespace: Vec<String>,
    /// Enclosing namespaces and classes, outermost first. Used for name lookup.
    pub scope: Vec<String>,
    pub kind: ClassKind,
    pub template_params: Vec<TemplateParam>,
    pub bases: Vec<BaseSpecifier>,
    pub members: Vec<MemberNode>,
    pub is_qobject: bool,
    pub is_final: bool,
    pub line: usize,
}

impl ClassNode {
    pub fn methods(&self) -> impl Iterator<Item = &MethodNode> {
        self.members.iter().filter_map(|m| match m {
            MemberNode::Method(method) => Some(method),
            _ => None,
        })
    }

    pub fn ctors(&self) -> impl Iterator<Item = &CtorNode> {
        self.members.iter().filter_map(|m| match m {
            MemberNode::Ctor(ctor) => Some(ctor),
            _ => None,
        })
    }

    pub fn aliases(&self) -> impl Iterator<Item = &AliasNode> {
        self.members.iter().filter_map(|m| match m {
            MemberNode::Alias(alias) => Some(alias),
            _ => None,
        })
    }

    #[must_use]
    pub fn has_inheriting_ctor(&self) -> bool {
        self.members
            .iter()
            .any(|m| matches!(m, MemberNode::InheritingCtor { .. }))
    }

    /// Names brought into scope with `using Base::name;`.
    pub fn using_names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().filter_map(|m| match m {
            MemberNode::Using { name, .. } => Some(name.as_str()),
            _ => None,
        })
    }

    #[must_use]
    pub fn namespace_path(&self) -> String {
        self.namespace.join("::")
    }
}

/// Every class of one header, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationUnit {
    pub path: Option<PathBuf>,
    pub classes: Vec<ClassNode>,
}

impl TranslationUnit {
    #[must_use]
    pub fn new(path: Option<PathBuf>, mut classes: Vec<ClassNode>) -> Self {
        resolve_bases(&mut classes);
        Self { path, classes }
    }

    #[must_use]
    pub fn display_path(&self) -> String {
        self.path
            .as_ref()
            .map_or_else(|| "<memory>".to_string(), |p| p.display().to_string())
    }

    /// Look up a class by qualified name.
    #[must_use]
    pub fn get(&self, qualified_name: &str) -> Option<&ClassNode> {
        self.classes
            .iter()
            .find(|c| c.qualified_name == qualified_name)
    }

    /// Classes whose simple name matches `pattern` at its start, in
    /// source order.
    ///
    /// # Errors
    /// `InvalidPattern` if the pattern does not compile, `NoMatchingClass`
    /// if nothing matches.
    pub fn matching(&self, pattern: &str) -> Result<Vec<&ClassNode>, ParseError> {
        let regex = anchored(pattern)?;
        let found: Vec<&ClassNode> = self
            .classes
            .iter()
            .filter(|c| regex.is_match(&c.name))
            .collect();
        if found.is_empty() {
            return Err(ParseError::NoMatchingClass {
                pattern: pattern.to_string(),
                path: self.display_path(),
            });
        }
        Ok(found)
    }
}

/// Compile `pattern` so it only matches at the start of the haystack.
///
/// # Errors
/// `InvalidPattern` if the pattern does not compile.
pub fn anchored(pattern: &str) -> Result<Regex, ParseError> {
    Regex::new(&format!(r"\A(?:{pattern})")).map_err(|e| ParseError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

/// Resolve every base specifier against the classes of the unit,
/// searching from the innermost enclosing scope outwards.
fn resolve_bases(classes: &mut [ClassNode]) {
    let known: HashSet<String> = classes.iter().map(|c| c.qualified_name.clone()).collect();

    for class in classes.iter_mut() {
        let scope = class.scope.clone();
        for base in &mut class.bases {
            base.resolved = lookup(&known, &scope, &base.name);
            if base.resolved.is_none() {
                tracing::debug!(
                    class = %class.qualified_name,
                    base = %base.spelling,
                    "base not declared in this header"
                );
            }
        }
    }
}

fn lookup(known: &HashSet<String>, scope: &[String], name: &str) -> Option<String> {
    if let Some(absolute) = name.strip_prefix("::") {
        return known.contains(absolute).then(|| absolute.to_string());
    }
    (0..=scope.len()).rev().find_map(|depth| {
        let candidate = if depth == 0 {
            name.to_string()
        } else {
            format!("{}::{name}", scope[..depth].join("::"))
        };
        known.contains(&candidate).then_some(candidate)
    })
}
