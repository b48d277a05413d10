use std::fmt;

use crate::{ClassType, Type, TypeEnv, WildcardBound};

/// Java-like rendering of a [`Type`] (`java.util.List<? extends T>`), for diagnostics and logs.
pub struct TypeDisplay<'a, E: TypeEnv + ?Sized> {
    env: &'a E,
    ty: &'a Type,
}

impl<'a, E: TypeEnv + ?Sized> TypeDisplay<'a, E> {
    pub fn new(env: &'a E, ty: &'a Type) -> Self {
        Self { env, ty }
    }
}

impl<E: TypeEnv + ?Sized> fmt::Display for TypeDisplay<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_type(self.env, self.ty, f)
    }
}

pub fn format_type<E: TypeEnv + ?Sized>(env: &E, ty: &Type) -> String {
    TypeDisplay::new(env, ty).to_string()
}

fn write_type<E: TypeEnv + ?Sized>(env: &E, ty: &Type, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match ty {
        Type::Class(class) => write_class(env, class, f),
        Type::TypeVar(tv) => match env.type_params(tv.owner).get(tv.index as usize) {
            Some(param) => f.write_str(&param.name),
            None => write!(f, "<T{}#{}>", tv.index, env.display_name(tv.owner)),
        },
        Type::Array(component) => {
            write_type(env, component, f)?;
            f.write_str("[]")
        }
        Type::Primitive(prim) => f.write_str(prim.java_name()),
        Type::Wildcard(WildcardBound::Unbounded) => f.write_str("?"),
        Type::Wildcard(WildcardBound::Extends(bound)) => {
            f.write_str("? extends ")?;
            write_type(env, bound, f)
        }
        Type::Wildcard(WildcardBound::Super(bound)) => {
            f.write_str("? super ")?;
            write_type(env, bound, f)
        }
    }
}

fn write_class<E: TypeEnv + ?Sized>(
    env: &E,
    class: &ClassType,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    f.write_str(&env.display_name(class.def))?;
    if class.args.is_empty() {
        return Ok(());
    }
    f.write_str("<")?;
    for (idx, arg) in class.args.iter().enumerate() {
        if idx > 0 {
            f.write_str(", ")?;
        }
        write_type(env, arg, f)?;
    }
    f.write_str(">")
}
