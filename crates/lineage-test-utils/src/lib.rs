//! Utilities shared by Lineage tests.
//!
//! - [`ClassWriter`] emits minimal but valid classfile bytes, so classfile and loader tests do not
//!   need `javac`.
//! - [`fixtures`] builds the canonical hierarchies (linear chain, interface diamond, generic
//!   chain) both as [`lineage_types::ClassTable`]s and as classfiles.

mod classwriter;
pub mod fixtures;

#[cfg(feature = "fixture-fs")]
mod fixture_fs;

pub use classwriter::{ClassWriter, MemberWriter};

#[cfg(feature = "fixture-fs")]
pub use fixture_fs::write_class_dir;
