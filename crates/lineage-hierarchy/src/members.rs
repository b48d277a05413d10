use std::collections::{HashSet, VecDeque};

use indexmap::{IndexMap, IndexSet};
use lineage_types::{FieldRef, MethodRef, TypeEnv, TypeId};

use crate::{Hierarchy, HierarchyError, Result};

/// Methods are matched for overriding by name and erased descriptor.
type MethodKey<'a> = (&'a str, &'a str);

impl<'env, E: TypeEnv + ?Sized> Hierarchy<'env, E> {
    /// Fields declared by every type on the chain from `class` up to and including `stop_at`,
    /// most-derived first, each type's fields in declaration order.
    pub fn collect_fields(&self, class: TypeId, stop_at: TypeId) -> Result<Vec<FieldRef>> {
        self.require_defined(class, "class")?;
        self.require_defined(stop_at, "stop_at")?;
        let Some(chain) = self.find_one_chain(class, stop_at)? else {
            return Err(HierarchyError::InvalidArgument(format!(
                "`{}` is not an ancestor of `{}`",
                self.env.display_name(stop_at),
                self.env.display_name(class)
            )));
        };
        Ok(chain.iter().flat_map(|owner| self.declared_field_refs(owner)).collect())
    }

    /// Fields declared by `class` and every superclass up to the root.
    pub fn collect_all_fields(&self, class: TypeId) -> Result<Vec<FieldRef>> {
        self.require_defined(class, "class")?;
        Ok(self
            .superclass_spine(class)
            .into_iter()
            .flat_map(|owner| self.declared_field_refs(owner))
            .collect())
    }

    /// [`Hierarchy::collect_all_fields`] filtered to fields annotated with `annotation` (a binary
    /// name such as `javax.persistence.Id`).
    pub fn collect_annotated_fields(&self, class: TypeId, annotation: &str) -> Result<Vec<FieldRef>> {
        self.require_defined(class, "class")?;
        if annotation.trim().is_empty() {
            return Err(HierarchyError::InvalidArgument(
                "annotation name is blank".to_string(),
            ));
        }
        let mut fields = self.collect_all_fields(class)?;
        fields.retain(|&field| {
            self.env
                .field(field)
                .is_some_and(|def| def.has_annotation(annotation))
        });
        Ok(fields)
    }

    /// The public member methods of `class`, declared or inherited, in discovery order: the
    /// superclass spine from most-derived up, then superinterfaces breadth-first.
    ///
    /// A method hides any inherited method with the same name and descriptor. Class methods hide
    /// interface methods; among interface methods, one declared by a subinterface hides the one it
    /// overrides. Initializers and the static methods of superinterfaces are not members.
    pub fn visible_methods(&self, class: TypeId) -> Result<IndexSet<MethodRef>> {
        self.require_defined(class, "class")?;

        let mut by_key: IndexMap<MethodKey<'env>, Vec<MethodRef>> = IndexMap::new();
        let spine = self.superclass_spine(class);
        for &owner in &spine {
            for (method, def) in self.declared_method_refs(owner) {
                if !def.is_public || def.is_initializer() {
                    continue;
                }
                // Most-derived class declaration wins.
                by_key
                    .entry((def.name.as_str(), def.descriptor.as_str()))
                    .or_insert_with(|| vec![method]);
            }
        }

        let from_classes: HashSet<MethodKey<'env>> = by_key.keys().copied().collect();
        for owner in self.superinterfaces(&spine) {
            for (method, def) in self.declared_method_refs(owner) {
                if !def.is_public || def.is_initializer() {
                    continue;
                }
                if def.is_static && owner != class {
                    continue;
                }
                let key = (def.name.as_str(), def.descriptor.as_str());
                if from_classes.contains(&key) {
                    continue;
                }
                let candidates = by_key.entry(key).or_default();
                if candidates
                    .iter()
                    .any(|other| self.assignable(owner, other.owner))
                {
                    // Already overridden by a more specific interface.
                    continue;
                }
                candidates.retain(|other| !self.assignable(other.owner, owner));
                candidates.push(method);
            }
        }

        Ok(by_key.into_values().flatten().collect())
    }

    /// The visible methods of `class` annotated with `annotation`. `None` or a blank name selects
    /// nothing.
    pub fn collect_annotated_methods(
        &self,
        class: TypeId,
        annotation: Option<&str>,
    ) -> Result<IndexSet<MethodRef>> {
        self.require_defined(class, "class")?;
        let Some(annotation) = annotation.filter(|name| !name.trim().is_empty()) else {
            return Ok(IndexSet::new());
        };
        let mut methods = self.visible_methods(class)?;
        methods.retain(|&method| {
            self.env
                .method(method)
                .is_some_and(|def| def.has_annotation(annotation))
        });
        Ok(methods)
    }

    fn declared_field_refs(&self, owner: TypeId) -> impl Iterator<Item = FieldRef> {
        (0..self.env.declared_fields(owner).len()).map(move |index| FieldRef { owner, index })
    }

    fn declared_method_refs(
        &self,
        owner: TypeId,
    ) -> impl Iterator<Item = (MethodRef, &'env lineage_types::MethodDef)> {
        self.env
            .declared_methods(owner)
            .iter()
            .enumerate()
            .map(move |(index, def)| (MethodRef { owner, index }, def))
    }

    /// `class` followed by its superclasses, stopping at the root or the first undefined type.
    fn superclass_spine(&self, class: TypeId) -> Vec<TypeId> {
        let mut spine = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(class);
        while let Some(id) = current {
            if !self.env.is_defined(id) {
                break;
            }
            if !seen.insert(id) {
                tracing::warn!(class = %self.env.display_name(id), "superclass cycle");
                break;
            }
            spine.push(id);
            current = self.env.super_class(id);
        }
        spine
    }

    /// Every interface implemented by a type in `spine`, transitively, breadth-first. An
    /// interface in `spine` (i.e. `class` itself) comes first.
    fn superinterfaces(&self, spine: &[TypeId]) -> Vec<TypeId> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let mut queue: VecDeque<TypeId> = spine
            .iter()
            .copied()
            .filter(|&id| self.env.is_interface(id))
            .collect();
        for &id in spine {
            queue.extend(self.env.interfaces(id).iter().map(|iface| iface.def));
        }
        while let Some(id) = queue.pop_front() {
            if !seen.insert(id) || !self.env.is_defined(id) {
                continue;
            }
            out.push(id);
            queue.extend(self.env.interfaces(id).iter().map(|iface| iface.def));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineage_types::{ClassDef, ClassTable, ClassType, FieldDef, MethodDef, Type};
    use pretty_assertions::assert_eq;

    fn names<E: TypeEnv>(env: &E, methods: &IndexSet<MethodRef>) -> Vec<String> {
        methods
            .iter()
            .map(|&m| {
                format!(
                    "{}.{}",
                    env.display_name(m.owner),
                    env.method(m).map(|def| def.name.as_str()).unwrap_or("?")
                )
            })
            .collect()
    }

    #[test]
    fn interface_fields_are_its_own() {
        let mut table = ClassTable::with_minimal_jdk();
        let int = Type::Primitive(lineage_types::PrimitiveType::Int);
        let constants = table.add_class(
            ClassDef::interface("com.example.Constants")
                .with_field(FieldDef::new("LIMIT", int).with_static(true)),
        );
        let hierarchy = Hierarchy::new(&table);

        assert_eq!(
            hierarchy.collect_all_fields(constants).unwrap(),
            vec![FieldRef {
                owner: constants,
                index: 0
            }]
        );
    }

    #[test]
    fn stop_at_must_be_an_ancestor() {
        let table = ClassTable::with_minimal_jdk();
        let string = table.class_id("java.lang.String").unwrap();
        let number = table.class_id("java.lang.Number").unwrap();
        let hierarchy = Hierarchy::new(&table);

        let err = hierarchy.collect_fields(string, number).unwrap_err();
        assert!(matches!(err, HierarchyError::InvalidArgument(_)), "{err}");
    }

    #[test]
    fn blank_annotation_names() {
        let table = ClassTable::with_minimal_jdk();
        let string = table.class_id("java.lang.String").unwrap();
        let hierarchy = Hierarchy::new(&table);

        assert!(matches!(
            hierarchy.collect_annotated_fields(string, "  "),
            Err(HierarchyError::InvalidArgument(_))
        ));
        assert!(hierarchy
            .collect_annotated_methods(string, Some(""))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn more_specific_interface_method_hides_the_overridden_one() {
        let mut table = ClassTable::new();
        let base = table.add_class(
            ClassDef::interface("com.example.Base")
                .with_method(MethodDef::new("run", "()V")),
        );
        let sub = table.add_class(
            ClassDef::interface("com.example.Sub")
                .implements(ClassType::raw(base))
                .with_method(MethodDef::new("run", "()V")),
        );
        // `Base` is listed first, so it is discovered before `Sub`.
        let task = table.add_class(
            ClassDef::interface("com.example.Task")
                .implements(ClassType::raw(base))
                .implements(ClassType::raw(sub)),
        );
        let other = table.add_class(
            ClassDef::interface("com.example.Other")
                .with_method(MethodDef::new("run", "()V")),
        );
        let both = table.add_class(
            ClassDef::interface("com.example.Both")
                .implements(ClassType::raw(task))
                .implements(ClassType::raw(other)),
        );
        let hierarchy = Hierarchy::new(&table);

        let methods = hierarchy.visible_methods(task).unwrap();
        assert_eq!(names(&table, &methods), vec!["com.example.Sub.run"]);

        // Unrelated declarations are both members.
        let methods = hierarchy.visible_methods(both).unwrap();
        assert_eq!(
            names(&table, &methods),
            vec!["com.example.Other.run", "com.example.Sub.run"]
        );
    }

    #[test]
    fn static_interface_methods_are_not_inherited() {
        let table = ClassTable::with_minimal_jdk();
        let list = table.class_id("java.util.List").unwrap();
        let array_list = table.class_id("java.util.ArrayList").unwrap();
        let hierarchy = Hierarchy::new(&table);

        let own = names(&table, &hierarchy.visible_methods(list).unwrap());
        assert!(own.contains(&"java.util.List.of".to_string()), "{own:?}");

        let inherited = names(&table, &hierarchy.visible_methods(array_list).unwrap());
        assert!(!inherited.iter().any(|m| m.ends_with(".of")), "{inherited:?}");
        assert!(!inherited.iter().any(|m| m.ends_with(".<init>")), "{inherited:?}");
        assert!(!inherited.iter().any(|m| m.ends_with(".clone")), "{inherited:?}");
        assert!(inherited.contains(&"java.lang.Object.hashCode".to_string()));
    }
}
