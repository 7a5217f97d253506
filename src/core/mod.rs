//! Core domain models for pipebench
//!
//! This module defines the step union, the canonical workflow document,
//! and the compile/validate pair that projects builder state into the
//! form the job runner accepts.

pub mod document;
pub mod duration;
pub mod step;
pub mod validate;

pub use document::*;
pub use duration::*;
pub use step::*;
pub use validate::*;
