use std::collections::HashMap;
use std::fmt;

use lineage_types::{format_type, PrimitiveType, Type, TypeEnv, TypeId, TypeVar};

use crate::{Hierarchy, HierarchyError, Result};

/// A concrete type bound to a type parameter. Parameterized arguments are recorded by their raw
/// class.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResolvedType {
    Class(TypeId),
    Primitive(PrimitiveType),
    Array(Box<ResolvedType>),
}

impl ResolvedType {
    /// The class, if this is a (non-array) class type.
    pub fn class_id(&self) -> Option<TypeId> {
        match self {
            ResolvedType::Class(id) => Some(*id),
            _ => None,
        }
    }

    pub fn display<'a, E: TypeEnv + ?Sized>(&'a self, env: &'a E) -> ResolvedTypeDisplay<'a, E> {
        ResolvedTypeDisplay { ty: self, env }
    }
}

pub struct ResolvedTypeDisplay<'a, E: ?Sized> {
    ty: &'a ResolvedType,
    env: &'a E,
}

impl<E: TypeEnv + ?Sized> fmt::Display for ResolvedTypeDisplay<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            ResolvedType::Class(id) => f.write_str(&self.env.display_name(*id)),
            ResolvedType::Primitive(prim) => f.write_str(prim.java_name()),
            ResolvedType::Array(component) => {
                write!(f, "{}[]", component.display(self.env))
            }
        }
    }
}

type Bindings = HashMap<TypeVar, ResolvedType>;

impl<'env, E: TypeEnv + ?Sized> Hierarchy<'env, E> {
    /// The concrete types `typed_class` binds to each type parameter of `typed_superclass`, in
    /// declaration order. A parameter is `None` when it is bound to a wildcard or left as a type
    /// variable of `typed_class`.
    ///
    /// `typed_superclass` must be a supertype of `typed_class`, and every generic supertype on the
    /// way must be declared with type arguments; a raw link is an `InternalConsistency` error.
    pub fn resolve_type_arguments(
        &self,
        typed_class: TypeId,
        typed_superclass: TypeId,
    ) -> Result<Vec<Option<ResolvedType>>> {
        self.require_defined(typed_class, "typed_class")?;
        self.require_defined(typed_superclass, "typed_superclass")?;
        if !self.assignable(typed_superclass, typed_class) {
            return Err(self.inconsistency(format!(
                "`{}` is not a supertype of `{}`",
                self.env.display_name(typed_superclass),
                self.env.display_name(typed_class)
            )));
        }

        let param_count = self.env.type_params(typed_superclass).len();
        if param_count == 0 {
            return Ok(Vec::new());
        }

        let chain = self.require_chain(typed_class, typed_superclass)?;
        let mut bindings = Bindings::new();
        for (child, parent) in chain.links() {
            self.bind_link(child, parent, &mut bindings)?;
        }

        Ok((0..param_count)
            .map(|idx| {
                bindings
                    .get(&TypeVar::new(typed_superclass, idx as u32))
                    .cloned()
            })
            .collect())
    }

    /// Records what `child`'s declaration of `parent` binds each of `parent`'s parameters to.
    fn bind_link(&self, child: TypeId, parent: TypeId, bindings: &mut Bindings) -> Result<()> {
        let params = self.env.type_params(parent);
        if params.is_empty() {
            return Ok(());
        }

        let Some(declared) = self.env.generic_supertype(child, parent) else {
            return Err(self.inconsistency(format!(
                "`{}` does not declare `{}` as a direct supertype",
                self.env.display_name(child),
                self.env.display_name(parent)
            )));
        };
        if declared.args.is_empty() {
            return Err(self.inconsistency(format!(
                "`{}` extends the generic `{}` as a raw type",
                self.env.display_name(child),
                self.env.display_name(parent)
            )));
        }
        if declared.args.len() != params.len() {
            return Err(self.inconsistency(format!(
                "`{}` passes {} type arguments to `{}`, which declares {}",
                self.env.display_name(child),
                declared.args.len(),
                self.env.display_name(parent),
                params.len()
            )));
        }

        for (idx, arg) in declared.args.iter().enumerate() {
            match concretize(arg, bindings) {
                Some(resolved) => {
                    tracing::trace!(
                        supertype = %self.env.display_name(parent),
                        param = %params[idx].name,
                        bound = %resolved.display(self.env),
                        "type argument resolved"
                    );
                    bindings.insert(TypeVar::new(parent, idx as u32), resolved);
                }
                None => tracing::trace!(
                    supertype = %self.env.display_name(parent),
                    param = %params[idx].name,
                    argument = %format_type(self.env, arg),
                    "type argument does not resolve"
                ),
            }
        }
        Ok(())
    }

    fn inconsistency(&self, msg: String) -> HierarchyError {
        tracing::error!("{msg}");
        HierarchyError::InternalConsistency(msg)
    }
}

fn concretize(ty: &Type, bindings: &Bindings) -> Option<ResolvedType> {
    match ty {
        Type::Class(class) => Some(ResolvedType::Class(class.def)),
        Type::TypeVar(var) => bindings.get(var).cloned(),
        Type::Array(component) => {
            concretize(component, bindings).map(|c| ResolvedType::Array(Box::new(c)))
        }
        Type::Primitive(prim) => Some(ResolvedType::Primitive(*prim)),
        Type::Wildcard(_) => None,
    }
}
