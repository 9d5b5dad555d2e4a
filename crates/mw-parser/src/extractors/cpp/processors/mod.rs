//! Node processors for the C++ extractor.

pub(super) mod classes;
mod declarators;
mod helpers;
mod members;
pub(super) mod templates;
