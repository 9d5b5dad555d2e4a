//! # mw-synth
//!
//! Interface model building and mock spec synthesis for mockwright.
//!
//! For every requested class of a parsed header:
//! - [`builder::ModelBuilder`] turns the declaration tree into an
//!   [`mw_core::InterfaceDecl`], inheriting from at most one mockable base
//! - [`overload::resolve`] gives every mockable method a
//!   [`mw_core::DispatchKey`] and rejects overloads that collapse onto one key
//! - [`assemble::assemble`] merges both into the [`mw_core::MockSpec`]
//!   handed to rendering
//!
//! [`pipeline::Translator`] runs the three steps for every class of a
//! header and collects failures into a [`pipeline::RunReport`].

pub mod assemble;
pub mod builder;
pub mod error;
pub mod naming;
pub mod overload;
pub mod pipeline;
pub mod slots;

pub use assemble::assemble;
pub use builder::ModelBuilder;
pub use error::MockError;
pub use naming::{MockNames, MockNaming};
pub use overload::{DispatchEntry, DispatchTable, OverloadGroup, group, resolve};
pub use pipeline::{Failure, RunReport, Translator, TranslatorSettings};
pub use slots::{MarkerSlotPredicate, NoSlots, SlotPredicate};
