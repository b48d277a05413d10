use std::collections::HashMap;

use crate::{ClassDef, TypeEnv, TypeId};

/// In-memory class table.
///
/// Handles are allocated by name with [`ClassTable::intern_class_id`] before the definition is
/// known, so mutually referencing classes (`class A extends B<A>`) can be built in two passes.
#[derive(Clone, Debug, Default)]
pub struct ClassTable {
    names: Vec<String>,
    defs: Vec<Option<ClassDef>>,
    by_name: HashMap<String, TypeId>,
}

impl ClassTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handle for `binary_name`, allocating an undefined slot on first use.
    pub fn intern_class_id(&mut self, binary_name: &str) -> TypeId {
        if let Some(id) = self.by_name.get(binary_name) {
            return *id;
        }
        let id = TypeId::from_index(self.names.len());
        self.names.push(binary_name.to_string());
        self.defs.push(None);
        self.by_name.insert(binary_name.to_string(), id);
        id
    }

    /// Installs (or replaces) the definition behind `id`.
    ///
    /// The definition's name wins over the interned one if they disagree.
    pub fn define_class(&mut self, id: TypeId, def: ClassDef) {
        let Some(slot) = self.defs.get_mut(id.index()) else {
            tracing::warn!(?id, name = %def.name, "define_class with a handle from another table");
            return;
        };
        if slot.is_some() {
            tracing::debug!(name = %def.name, "replacing class definition");
        }
        let interned = &mut self.names[id.index()];
        if *interned != def.name {
            self.by_name.remove(interned.as_str());
            *interned = def.name.clone();
            self.by_name.insert(def.name.clone(), id);
        }
        *slot = Some(def);
    }

    /// Interns `def.name` and defines it in one step.
    pub fn add_class(&mut self, def: ClassDef) -> TypeId {
        let id = self.intern_class_id(&def.name);
        self.define_class(id, def);
        id
    }

    pub fn class_id(&self, binary_name: &str) -> Option<TypeId> {
        self.by_name.get(binary_name).copied()
    }

    /// Binary name a handle was interned under, whether or not it has been defined.
    pub fn interned_name(&self, id: TypeId) -> Option<&str> {
        self.names.get(id.index()).map(String::as_str)
    }

    /// Handles that were interned (referenced) but never defined.
    pub fn undefined_classes(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.defs
            .iter()
            .enumerate()
            .filter(|(_, def)| def.is_none())
            .map(|(idx, _)| TypeId::from_index(idx))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &ClassDef)> + '_ {
        self.defs
            .iter()
            .enumerate()
            .filter_map(|(idx, def)| Some((TypeId::from_index(idx), def.as_ref()?)))
    }
}

impl TypeEnv for ClassTable {
    fn class(&self, id: TypeId) -> Option<&ClassDef> {
        self.defs.get(id.index())?.as_ref()
    }

    fn lookup_class(&self, binary_name: &str) -> Option<TypeId> {
        self.class_id(binary_name)
    }

    fn display_name(&self, id: TypeId) -> String {
        match self.interned_name(id) {
            Some(name) => name.to_string(),
            None => format!("<unknown {id:?}>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClassType, ClassKind};
    use pretty_assertions::assert_eq;

    #[test]
    fn forward_references_resolve_once_defined() {
        let mut table = ClassTable::new();
        let base = table.intern_class_id("com.example.Base");
        let derived =
            table.add_class(ClassDef::class("com.example.Derived").extends(ClassType::raw(base)));

        assert_eq!(table.super_class(derived), Some(base));
        assert!(!table.is_defined(base));
        assert_eq!(table.undefined_classes().collect::<Vec<_>>(), vec![base]);
        assert_eq!(table.display_name(base), "com.example.Base");

        table.define_class(base, ClassDef::class("com.example.Base"));
        assert!(table.is_defined(base));
        assert_eq!(table.undefined_classes().count(), 0);
        assert_eq!(table.iter().count(), 2);
    }

    #[test]
    fn interning_is_idempotent() {
        let mut table = ClassTable::new();
        let a = table.intern_class_id("a.A");
        assert_eq!(table.intern_class_id("a.A"), a);
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup_class("a.A"), Some(a));
        assert_eq!(table.lookup_class("a.B"), None);
    }

    #[test]
    fn foreign_handles_are_ignored() {
        let mut other = ClassTable::new();
        other.intern_class_id("x.X");
        let foreign = other.intern_class_id("x.Y");

        let mut table = ClassTable::new();
        table.define_class(foreign, ClassDef::new("x.Y", ClassKind::Class));
        assert!(table.is_empty());
        assert_eq!(table.class(foreign), None);
    }
}
