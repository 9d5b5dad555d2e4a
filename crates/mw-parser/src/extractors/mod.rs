//! Language extractors. mockwright reads C++ headers only.

pub mod cpp;
