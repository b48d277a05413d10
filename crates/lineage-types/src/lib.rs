//! The type model that hierarchy analysis runs against.
//!
//! [`TypeEnv`] is the read-only capability interface: it answers "what is the superclass of X",
//! "which interfaces does X declare, and with which type arguments", "which fields and methods
//! does X declare". [`ClassTable`] is the in-memory implementation; it can be populated by hand
//! (see [`ClassDef`]'s builder methods) or from compiled classfiles via `lineage-bridge`.

#![forbid(unsafe_code)]

mod format;
mod jdk;
mod table;

use std::fmt;

pub use format::{format_type, TypeDisplay};
pub use table::ClassTable;

/// Binary name of the root of the class hierarchy.
pub const OBJECT: &str = "java.lang.Object";

/// Opaque handle to a class or interface in a [`TypeEnv`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).unwrap_or(u32::MAX))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

/// A type parameter, identified by the generic declaration that introduces it and its position
/// in that declaration's parameter list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeVar {
    pub owner: TypeId,
    pub index: u32,
}

impl TypeVar {
    pub fn new(owner: TypeId, index: u32) -> Self {
        Self { owner, index }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    pub fn java_name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Char => "char",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum WildcardBound {
    Unbounded,
    Extends(Box<Type>),
    Super(Box<Type>),
}

/// A (possibly parameterized) reference to a class or interface.
///
/// Empty `args` on a generic class is a raw usage.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClassType {
    pub def: TypeId,
    pub args: Vec<Type>,
}

impl ClassType {
    pub fn new(def: TypeId, args: Vec<Type>) -> Self {
        Self { def, args }
    }

    pub fn raw(def: TypeId) -> Self {
        Self {
            def,
            args: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Class(ClassType),
    TypeVar(TypeVar),
    Array(Box<Type>),
    Primitive(PrimitiveType),
    Wildcard(WildcardBound),
}

impl Type {
    pub fn class(def: TypeId, args: Vec<Type>) -> Self {
        Type::Class(ClassType::new(def, args))
    }

    pub fn array(component: Type) -> Self {
        Type::Array(Box::new(component))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParamDef {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub ty: Type,
    pub is_static: bool,
    /// Binary names of the annotations present on the field.
    pub annotations: Vec<String>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            is_static: false,
            annotations: Vec::new(),
        }
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_annotation(mut self, binary_name: impl Into<String>) -> Self {
        self.annotations.push(binary_name.into());
        self
    }

    pub fn has_annotation(&self, binary_name: &str) -> bool {
        self.annotations.iter().any(|a| a == binary_name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodDef {
    pub name: String,
    /// JVM method descriptor, e.g. `(Ljava/lang/String;)V`. Name plus descriptor identify a
    /// method for override purposes.
    pub descriptor: String,
    pub is_public: bool,
    pub is_static: bool,
    pub annotations: Vec<String>,
}

impl MethodDef {
    /// A public instance method.
    pub fn new(name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descriptor: descriptor.into(),
            is_public: true,
            is_static: false,
            annotations: Vec::new(),
        }
    }

    pub fn with_public(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_annotation(mut self, binary_name: impl Into<String>) -> Self {
        self.annotations.push(binary_name.into());
        self
    }

    pub fn has_annotation(&self, binary_name: &str) -> bool {
        self.annotations.iter().any(|a| a == binary_name)
    }

    /// Constructors and static initializers are never members.
    pub fn is_initializer(&self) -> bool {
        self.name == "<init>" || self.name == "<clinit>"
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassDef {
    /// Binary name, e.g. `java.util.Map$Entry`.
    pub name: String,
    pub kind: ClassKind,
    pub type_params: Vec<TypeParamDef>,
    /// `None` for `java.lang.Object`, interfaces, and classes whose superclass is unknown.
    pub super_class: Option<ClassType>,
    pub interfaces: Vec<ClassType>,
    pub fields: Vec<FieldDef>,
    pub methods: Vec<MethodDef>,
    pub annotations: Vec<String>,
}

impl ClassDef {
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, ClassKind::Class)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, ClassKind::Interface)
    }

    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            type_params: Vec::new(),
            super_class: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// Declares type parameters, in order.
    pub fn with_type_params<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_params
            .extend(names.into_iter().map(|name| TypeParamDef { name: name.into() }));
        self
    }

    pub fn extends(mut self, super_class: ClassType) -> Self {
        self.super_class = Some(super_class);
        self
    }

    pub fn implements(mut self, interface: ClassType) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_method(mut self, method: MethodDef) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_annotation(mut self, binary_name: impl Into<String>) -> Self {
        self.annotations.push(binary_name.into());
        self
    }

    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }
}

/// Handle to the `index`th declared field of `owner`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldRef {
    pub owner: TypeId,
    pub index: usize,
}

/// Handle to the `index`th declared method of `owner`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodRef {
    pub owner: TypeId,
    pub index: usize,
}

/// Read-only access to class metadata.
///
/// Implementors only need [`TypeEnv::class`] and [`TypeEnv::lookup_class`]; every other query is
/// derived from the [`ClassDef`].
pub trait TypeEnv {
    fn class(&self, id: TypeId) -> Option<&ClassDef>;
    fn lookup_class(&self, binary_name: &str) -> Option<TypeId>;

    fn is_defined(&self, id: TypeId) -> bool {
        self.class(id).is_some()
    }

    fn is_interface(&self, id: TypeId) -> bool {
        self.class(id).is_some_and(ClassDef::is_interface)
    }

    /// `java.lang.Object`, if the environment knows it.
    fn root_class(&self) -> Option<TypeId> {
        self.lookup_class(OBJECT)
    }

    fn super_class(&self, id: TypeId) -> Option<TypeId> {
        self.class(id)?.super_class.as_ref().map(|sc| sc.def)
    }

    fn interfaces(&self, id: TypeId) -> &[ClassType] {
        self.class(id)
            .map(|def| def.interfaces.as_slice())
            .unwrap_or_default()
    }

    fn declared_fields(&self, id: TypeId) -> &[FieldDef] {
        self.class(id)
            .map(|def| def.fields.as_slice())
            .unwrap_or_default()
    }

    fn declared_methods(&self, id: TypeId) -> &[MethodDef] {
        self.class(id)
            .map(|def| def.methods.as_slice())
            .unwrap_or_default()
    }

    fn type_params(&self, id: TypeId) -> &[TypeParamDef] {
        self.class(id)
            .map(|def| def.type_params.as_slice())
            .unwrap_or_default()
    }

    /// The parameterization `child` declares for its direct supertype `parent`: the superclass
    /// slot when `parent` is a class, the matching `implements`/`extends` entry when it is an
    /// interface.
    fn generic_supertype(&self, child: TypeId, parent: TypeId) -> Option<&ClassType> {
        let def = self.class(child)?;
        if self.is_interface(parent) {
            def.interfaces.iter().find(|iface| iface.def == parent)
        } else {
            def.super_class.as_ref().filter(|sc| sc.def == parent)
        }
    }

    fn field(&self, field: FieldRef) -> Option<&FieldDef> {
        self.declared_fields(field.owner).get(field.index)
    }

    fn method(&self, method: MethodRef) -> Option<&MethodDef> {
        self.declared_methods(method.owner).get(method.index)
    }

    fn display_name(&self, id: TypeId) -> String {
        match self.class(id) {
            Some(def) => def.name.clone(),
            None => format!("<undefined {id:?}>"),
        }
    }
}

impl<T: TypeEnv + ?Sized> TypeEnv for &T {
    fn class(&self, id: TypeId) -> Option<&ClassDef> {
        (**self).class(id)
    }

    fn lookup_class(&self, binary_name: &str) -> Option<TypeId> {
        (**self).lookup_class(binary_name)
    }
}
