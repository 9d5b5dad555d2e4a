//! # mw-core
//!
//! Intermediate representation shared across mockwright crates.
//!
//! This crate holds the data that flows between the pipeline stages:
//! - [`TypeRef`]: canonical C++ type spellings
//! - Declarations of one interface ([`InterfaceDecl`], [`MethodDecl`],
//!   [`CtorDecl`], [`TemplateParam`])
//! - [`DispatchKey`]: the compile-time tag distinguishing overloads
//! - [`MockSpec`]: the finalized artifact handed to template rendering
//! - Operator name mangling
//!
//! Everything here is plain data. All types are `serde` serializable and
//! derive `JsonSchema` so renderers outside this workspace can validate
//! what they consume.

pub mod decl;
pub mod dispatch;
pub mod mangle;
pub mod spec;
pub mod type_ref;

pub use decl::{
    Access, BaseRef, CtorDecl, CtorSignature, InterfaceDecl, MethodDecl, Qualifiers,
    RefQualifier, TemplateParam, TemplateParamKind, TypeAlias, Virtuality,
};
pub use dispatch::DispatchKey;
pub use spec::{CtorStrategy, MockMethod, MockSpec};
pub use type_ref::TypeRef;
