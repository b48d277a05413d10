use std::collections::{HashMap, HashSet};

use lineage_classfile::{
    Annotation, BaseType, ClassStub, ClassTypeSignature, FieldStub, FieldType, MethodStub,
    TypeArgument, TypeSignature, ACC_PUBLIC, ACC_STATIC,
};
use lineage_types::{
    ClassDef, ClassKind, ClassTable, ClassType, FieldDef, MethodDef, PrimitiveType, Type, TypeEnv,
    TypeId, TypeParamDef, TypeVar, WildcardBound, OBJECT,
};

use crate::config::{AnnotationRetention, LoaderConfig, MissingClassPolicy};
use crate::error::{LoadError, Result};
use crate::provider::ClassProvider;

/// Loads classes from a [`ClassProvider`] into a [`ClassTable`] on demand.
///
/// Classes the table already defines are never reloaded or replaced.
///
/// Loading a class eagerly loads its whole supertype graph, so chain searches never hit a class
/// the loader has not seen. Classes that only appear in type arguments or member types are
/// interned but not loaded.
pub struct ClassfileLoader<'a> {
    table: &'a mut ClassTable,
    provider: &'a dyn ClassProvider,
    config: LoaderConfig,
    in_progress: HashSet<String>,
    loaded: HashSet<String>,
    /// Names the provider could not supply, so they are only looked up (and reported) once.
    missing: HashSet<String>,
}

/// How a missing class was referenced; decides the kind of its placeholder.
#[derive(Clone, Copy)]
enum Reference {
    Requested,
    SuperClass,
    Interface,
}

impl<'a> ClassfileLoader<'a> {
    pub fn new(table: &'a mut ClassTable, provider: &'a dyn ClassProvider) -> Self {
        Self::with_config(table, provider, LoaderConfig::default())
    }

    pub fn with_config(
        table: &'a mut ClassTable,
        provider: &'a dyn ClassProvider,
        config: LoaderConfig,
    ) -> Self {
        Self {
            table,
            provider,
            config,
            in_progress: HashSet::new(),
            loaded: HashSet::new(),
            missing: HashSet::new(),
        }
    }

    pub fn table(&self) -> &ClassTable {
        self.table
    }

    /// Ensures `binary_name` and its supertypes are defined in the table.
    ///
    /// Returns `Ok(None)` when the class cannot be found and the policy is
    /// [`MissingClassPolicy::Skip`].
    pub fn ensure_class(&mut self, binary_name: &str) -> Result<Option<TypeId>> {
        self.ensure(binary_name, Reference::Requested)
    }

    /// Loads every name in `names`, returning the handles that could be loaded.
    pub fn load_all<I, S>(&mut self, names: I) -> Result<Vec<TypeId>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = Vec::new();
        for name in names {
            if let Some(id) = self.ensure_class(name.as_ref())? {
                out.push(id);
            }
        }
        Ok(out)
    }

    fn ensure(&mut self, binary_name: &str, reference: Reference) -> Result<Option<TypeId>> {
        if self.loaded.contains(binary_name) || self.in_progress.contains(binary_name) {
            return Ok(self.table.class_id(binary_name));
        }
        // Definitions already in the table (e.g. `ClassTable::with_minimal_jdk`) take precedence.
        if let Some(id) = self.table.class_id(binary_name) {
            if self.table.is_defined(id) {
                return Ok(Some(id));
            }
        }
        if self.missing.contains(binary_name) {
            return Ok(match reference {
                Reference::Requested => None,
                Reference::SuperClass | Reference::Interface => self.table.class_id(binary_name),
            });
        }

        let Some(stub) = self.provider.lookup(binary_name)? else {
            return self.handle_missing(binary_name, reference);
        };

        let id = self.table.intern_class_id(binary_name);
        self.in_progress.insert(binary_name.to_string());
        let def = self.build_class_def(binary_name, &stub);
        self.in_progress.remove(binary_name);
        let def = def?;

        tracing::debug!(
            class = binary_name,
            kind = ?def.kind,
            type_params = def.type_params.len(),
            "loaded class"
        );
        self.table.define_class(id, def);
        self.loaded.insert(binary_name.to_string());
        Ok(Some(id))
    }

    fn handle_missing(&mut self, binary_name: &str, reference: Reference) -> Result<Option<TypeId>> {
        match self.config.missing_classes {
            MissingClassPolicy::Error => Err(LoadError::MissingClass(binary_name.to_string())),
            MissingClassPolicy::Skip => {
                tracing::warn!(class = binary_name, "class not found; leaving it undefined");
                self.missing.insert(binary_name.to_string());
                match reference {
                    Reference::Requested => Ok(None),
                    Reference::SuperClass | Reference::Interface => {
                        Ok(Some(self.table.intern_class_id(binary_name)))
                    }
                }
            }
            MissingClassPolicy::Placeholder => {
                let kind = match reference {
                    Reference::Interface => ClassKind::Interface,
                    Reference::Requested | Reference::SuperClass => ClassKind::Class,
                };
                tracing::warn!(class = binary_name, ?kind, "class not found; using a placeholder");
                let id = self.table.intern_class_id(binary_name);
                self.loaded.insert(binary_name.to_string());
                let mut def = ClassDef::new(binary_name, kind);
                if kind == ClassKind::Class && binary_name != OBJECT {
                    let object = self.ensure_supertype(OBJECT, Reference::SuperClass)?;
                    def.super_class = Some(ClassType::raw(object));
                }
                self.table.define_class(id, def);
                Ok(Some(id))
            }
        }
    }

    fn build_class_def(&mut self, binary_name: &str, stub: &ClassStub) -> Result<ClassDef> {
        if stub.binary_name() != binary_name {
            return Err(LoadError::NameMismatch {
                expected: binary_name.to_string(),
                found: stub.binary_name(),
            });
        }

        let id = self.table.intern_class_id(binary_name);
        let kind = if stub.is_interface() {
            ClassKind::Interface
        } else {
            ClassKind::Class
        };

        let mut scope = HashMap::<String, TypeVar>::new();
        let mut def = ClassDef::new(binary_name, kind);

        match &stub.signature {
            Some(sig) => {
                for (idx, tp) in sig.type_parameters.iter().enumerate() {
                    scope.insert(tp.name.clone(), TypeVar::new(id, idx as u32));
                    def.type_params.push(TypeParamDef {
                        name: tp.name.clone(),
                    });
                }

                if kind == ClassKind::Class {
                    self.ensure_supertype(&sig.super_class.internal_name(), Reference::SuperClass)?;
                    def.super_class = Some(self.class_type(&sig.super_class, &scope));
                }
                for iface in &sig.interfaces {
                    self.ensure_supertype(&iface.internal_name(), Reference::Interface)?;
                    def.interfaces.push(self.class_type(iface, &scope));
                }
            }
            None => {
                if kind == ClassKind::Class {
                    if let Some(super_class) = &stub.super_class {
                        let sc = self.ensure_supertype(super_class, Reference::SuperClass)?;
                        def.super_class = Some(ClassType::raw(sc));
                    }
                }
                for iface in &stub.interfaces {
                    let iface = self.ensure_supertype(iface, Reference::Interface)?;
                    def.interfaces.push(ClassType::raw(iface));
                }
            }
        }

        def.fields = stub
            .fields
            .iter()
            .map(|field| self.field_def(field, &scope))
            .collect();
        def.methods = stub.methods.iter().map(|method| self.method_def(method)).collect();
        def.annotations = self.annotation_names(&stub.visible_annotations, &stub.invisible_annotations);

        Ok(def)
    }

    /// Loads a supertype given by internal name; always yields a handle (possibly undefined).
    fn ensure_supertype(&mut self, internal_name: &str, reference: Reference) -> Result<TypeId> {
        let binary = internal_to_binary(internal_name);
        match self.ensure(&binary, reference)? {
            Some(id) => Ok(id),
            None => Ok(self.table.intern_class_id(&binary)),
        }
    }

    fn field_def(&mut self, field: &FieldStub, scope: &HashMap<String, TypeVar>) -> FieldDef {
        let ty = match &field.signature {
            Some(sig) => self.type_signature(sig, scope),
            None => self.field_type(&field.descriptor),
        };
        FieldDef {
            name: field.name.clone(),
            ty,
            is_static: field.access_flags & ACC_STATIC != 0,
            annotations: self.annotation_names(&field.visible_annotations, &field.invisible_annotations),
        }
    }

    fn method_def(&mut self, method: &MethodStub) -> MethodDef {
        MethodDef {
            name: method.name.clone(),
            descriptor: method.descriptor.clone(),
            is_public: method.access_flags & ACC_PUBLIC != 0,
            is_static: method.access_flags & ACC_STATIC != 0,
            annotations: self
                .annotation_names(&method.visible_annotations, &method.invisible_annotations),
        }
    }

    fn annotation_names(&self, visible: &[Annotation], invisible: &[Annotation]) -> Vec<String> {
        let invisible: &[Annotation] = match self.config.annotation_retention {
            AnnotationRetention::Runtime => &[][..],
            AnnotationRetention::All => invisible,
        };
        visible
            .iter()
            .chain(invisible)
            .filter_map(|ann| {
                let name = ann.binary_name();
                if name.is_none() {
                    tracing::warn!(descriptor = %ann.type_descriptor, "skipping annotation with malformed type");
                }
                name
            })
            .collect()
    }

    fn class_type(&mut self, sig: &ClassTypeSignature, scope: &HashMap<String, TypeVar>) -> ClassType {
        let def = self
            .table
            .intern_class_id(&internal_to_binary(&sig.internal_name()));
        // Type arguments of enclosing classes (`Outer<T>.Inner`) are not modelled.
        let args = sig
            .type_arguments()
            .iter()
            .map(|arg| self.type_argument(arg, scope))
            .collect();
        ClassType { def, args }
    }

    fn type_argument(&mut self, arg: &TypeArgument, scope: &HashMap<String, TypeVar>) -> Type {
        match arg {
            TypeArgument::Any => Type::Wildcard(WildcardBound::Unbounded),
            TypeArgument::Exact(ty) => self.type_signature(ty, scope),
            TypeArgument::Extends(ty) => {
                Type::Wildcard(WildcardBound::Extends(Box::new(self.type_signature(ty, scope))))
            }
            TypeArgument::Super(ty) => {
                Type::Wildcard(WildcardBound::Super(Box::new(self.type_signature(ty, scope))))
            }
        }
    }

    fn type_signature(&mut self, sig: &TypeSignature, scope: &HashMap<String, TypeVar>) -> Type {
        match sig {
            TypeSignature::Base(base) => Type::Primitive(primitive(*base)),
            TypeSignature::Array(component) => Type::array(self.type_signature(component, scope)),
            TypeSignature::Class(cls) => Type::Class(self.class_type(cls, scope)),
            TypeSignature::TypeVariable(name) => match scope.get(name) {
                Some(tv) => Type::TypeVar(*tv),
                None => {
                    // Method or enclosing-class type variables. Nothing in the class hierarchy
                    // can bind them, so they load as an unbounded wildcard.
                    tracing::debug!(type_var = %name, "type variable not in class scope");
                    Type::Wildcard(WildcardBound::Unbounded)
                }
            },
        }
    }

    fn field_type(&mut self, ty: &FieldType) -> Type {
        match ty {
            FieldType::Base(base) => Type::Primitive(primitive(*base)),
            FieldType::Object(internal) => {
                Type::class(self.table.intern_class_id(&internal_to_binary(internal)), vec![])
            }
            FieldType::Array(component) => Type::array(self.field_type(component)),
        }
    }
}

fn internal_to_binary(internal: &str) -> String {
    internal.replace('/', ".")
}

fn primitive(base: BaseType) -> PrimitiveType {
    match base {
        BaseType::Byte => PrimitiveType::Byte,
        BaseType::Char => PrimitiveType::Char,
        BaseType::Double => PrimitiveType::Double,
        BaseType::Float => PrimitiveType::Float,
        BaseType::Int => PrimitiveType::Int,
        BaseType::Long => PrimitiveType::Long,
        BaseType::Short => PrimitiveType::Short,
        BaseType::Boolean => PrimitiveType::Boolean,
    }
}
