//! Type-hierarchy analysis over a [`TypeEnv`].
//!
//! [`Hierarchy`] answers three kinds of questions about a class and one of its ancestors:
//!
//! - **chains**: the paths of direct superclass/interface links from the class to the ancestor
//!   ([`Hierarchy::find_one_chain`], [`Hierarchy::find_all_chains`]);
//! - **members**: the fields declared along the superclass chain and the annotated members
//!   ([`Hierarchy::collect_fields`], [`Hierarchy::collect_annotated_fields`],
//!   [`Hierarchy::collect_annotated_methods`]);
//! - **generics**: which concrete types the class binds to the ancestor's type parameters
//!   ([`Hierarchy::resolve_type_arguments`]).
//!
//! ```
//! use lineage_hierarchy::Hierarchy;
//! use lineage_types::{ClassDef, ClassTable, ClassType, Type};
//!
//! let mut table = ClassTable::with_minimal_jdk();
//! let string = table.class_id("java.lang.String").unwrap();
//! let list = table.class_id("java.util.List").unwrap();
//! let names = table.add_class(
//!     ClassDef::interface("com.example.Names")
//!         .implements(ClassType::new(list, vec![Type::class(string, vec![])])),
//! );
//!
//! let hierarchy = Hierarchy::new(&table);
//! let args = hierarchy.resolve_type_arguments(names, list)?;
//! assert_eq!(args[0].as_ref().and_then(|t| t.class_id()), Some(string));
//! # Ok::<(), lineage_hierarchy::HierarchyError>(())
//! ```
//!
//! All queries are read-only and allocate only per-call state.

#![forbid(unsafe_code)]

mod chain;
mod error;
mod generics;
mod members;

pub use chain::{ChainDisplay, SuperclassChain};
pub use error::{HierarchyError, Result};
pub use generics::{ResolvedType, ResolvedTypeDisplay};

use lineage_types::{TypeEnv, TypeId};

/// Hierarchy queries against a borrowed type environment.
pub struct Hierarchy<'env, E: TypeEnv + ?Sized> {
    env: &'env E,
}

impl<E: TypeEnv + ?Sized> Clone for Hierarchy<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: TypeEnv + ?Sized> Copy for Hierarchy<'_, E> {}

impl<'env, E: TypeEnv + ?Sized> Hierarchy<'env, E> {
    pub fn new(env: &'env E) -> Self {
        Self { env }
    }

    pub fn env(&self) -> &'env E {
        self.env
    }

    /// Fails with [`HierarchyError::InvalidArgument`] unless `id` has a definition.
    fn require_defined(&self, id: TypeId, what: &str) -> Result<()> {
        if self.env.is_defined(id) {
            Ok(())
        } else {
            Err(HierarchyError::InvalidArgument(format!(
                "`{what}` ({}) is not defined in the type environment",
                self.env.display_name(id)
            )))
        }
    }
}
