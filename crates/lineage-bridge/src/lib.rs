//! Populates a [`lineage_types::ClassTable`] from compiled classfiles.
//!
//! ```no_run
//! use lineage_bridge::{ClassfileLoader, DirectoryProvider};
//! use lineage_types::ClassTable;
//!
//! let provider = DirectoryProvider::new("target/classes");
//! let mut table = ClassTable::new();
//! let mut loader = ClassfileLoader::new(&mut table, &provider);
//! loader.ensure_class("com.example.Baz")?;
//! # Ok::<(), lineage_bridge::LoadError>(())
//! ```

#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod provider;

pub use config::{AnnotationRetention, LoaderConfig, MissingClassPolicy};
pub use error::{LoadError, Result};
pub use loader::ClassfileLoader;
pub use provider::{ChainProvider, ClassProvider, DirectoryProvider, MemoryProvider};
