use indexmap::IndexSet;
use lineage_hierarchy::{Hierarchy, HierarchyError};
use lineage_test_utils::fixtures::{self, ACCESSOR, COLUMN, FACTORY, ID, POST_LOAD};
use lineage_types::{ClassDef, ClassTable, ClassType, FieldRef, MethodRef, TypeEnv, OBJECT};

use pretty_assertions::assert_eq;

fn field_names<E: TypeEnv>(env: &E, fields: &[FieldRef]) -> Vec<String> {
    fields
        .iter()
        .map(|&f| {
            let name = env.field(f).map(|def| def.name.as_str()).unwrap_or("?");
            format!("{}.{name}", short(&env.display_name(f.owner)))
        })
        .collect()
}

fn method_names<E: TypeEnv>(env: &E, methods: &IndexSet<MethodRef>) -> Vec<String> {
    methods
        .iter()
        .map(|&m| {
            let name = env.method(m).map(|def| def.name.as_str()).unwrap_or("?");
            format!("{}.{name}", short(&env.display_name(m.owner)))
        })
        .collect()
}

fn short(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

#[test]
fn fields_follow_the_chain_in_declaration_order() {
    let fx = fixtures::linear();
    let hierarchy = Hierarchy::new(&fx.table);

    let fields = hierarchy.collect_fields(fx.baz, fx.foo).unwrap();
    assert_eq!(
        field_names(&fx.table, &fields),
        vec![
            "Baz.nickname",
            "Baz.counter",
            "Bar.name",
            "Foo.id",
            "Foo.version"
        ]
    );

    let fields = hierarchy.collect_fields(fx.baz, fx.bar).unwrap();
    assert_eq!(
        field_names(&fx.table, &fields),
        vec!["Baz.nickname", "Baz.counter", "Bar.name"]
    );

    let fields = hierarchy.collect_fields(fx.foo, fx.foo).unwrap();
    assert_eq!(field_names(&fx.table, &fields), vec!["Foo.id", "Foo.version"]);
}

#[test]
fn all_fields_stop_at_the_root() {
    let fx = fixtures::linear();
    let object = fx.table.class_id(OBJECT).unwrap();
    let hierarchy = Hierarchy::new(&fx.table);

    assert_eq!(
        hierarchy.collect_all_fields(fx.baz).unwrap(),
        hierarchy.collect_fields(fx.baz, object).unwrap()
    );
}

#[test]
fn annotated_fields() {
    let fx = fixtures::linear();
    let hierarchy = Hierarchy::new(&fx.table);

    let ids = hierarchy.collect_annotated_fields(fx.baz, ID).unwrap();
    assert_eq!(field_names(&fx.table, &ids), vec!["Foo.id"]);

    let columns = hierarchy.collect_annotated_fields(fx.baz, COLUMN).unwrap();
    assert_eq!(
        field_names(&fx.table, &columns),
        vec!["Baz.nickname", "Bar.name"]
    );

    assert!(hierarchy
        .collect_annotated_fields(fx.foo, COLUMN)
        .unwrap()
        .is_empty());
}

#[test]
fn overriding_drops_inherited_annotations() {
    let fx = fixtures::linear();
    let hierarchy = Hierarchy::new(&fx.table);

    // `Bar.load()` overrides `Foo.load()` without repeating `@PostLoad`.
    assert!(hierarchy
        .collect_annotated_methods(fx.baz, Some(POST_LOAD))
        .unwrap()
        .is_empty());
    let on_foo = hierarchy
        .collect_annotated_methods(fx.foo, Some(POST_LOAD))
        .unwrap();
    assert_eq!(method_names(&fx.table, &on_foo), vec!["Foo.load"]);
}

#[test]
fn annotated_methods_are_public_members() {
    let fx = fixtures::linear();
    let hierarchy = Hierarchy::new(&fx.table);

    let accessors = hierarchy
        .collect_annotated_methods(fx.baz, Some(ACCESSOR))
        .unwrap();
    // The private `Bar.helper()` is not a member.
    assert_eq!(
        method_names(&fx.table, &accessors),
        vec!["Bar.getName", "Foo.getId"]
    );

    let factories = hierarchy
        .collect_annotated_methods(fx.baz, Some(FACTORY))
        .unwrap();
    assert_eq!(method_names(&fx.table, &factories), vec!["Baz.create"]);

    assert!(hierarchy
        .collect_annotated_methods(fx.baz, None)
        .unwrap()
        .is_empty());
}

#[test]
fn visible_methods_on_a_class() {
    let fx = fixtures::linear();
    let hierarchy = Hierarchy::new(&fx.table);

    let methods = hierarchy.visible_methods(fx.baz).unwrap();
    assert_eq!(
        method_names(&fx.table, &methods),
        vec![
            "Baz.create",
            "Baz.validate",
            "Bar.load",
            "Bar.getName",
            "Foo.getId",
            "Object.hashCode",
            "Object.equals",
            "Object.toString",
        ]
    );
}

#[test]
fn interface_diamond_members() {
    let fx = fixtures::diamond();
    let hierarchy = Hierarchy::new(&fx.table);

    let methods = hierarchy.visible_methods(fx.baz).unwrap();
    assert_eq!(method_names(&fx.table, &methods), vec!["Bar1.bar1", "Bar2.foo"]);

    let accessors = hierarchy
        .collect_annotated_methods(fx.baz, Some(ACCESSOR))
        .unwrap();
    assert_eq!(accessors, methods);

    let on_foo = hierarchy.visible_methods(fx.foo).unwrap();
    assert_eq!(method_names(&fx.table, &on_foo), vec!["Foo.foo"]);
}

#[test]
fn absent_arguments_are_rejected() {
    let mut fx = fixtures::linear();
    let ghost = fx.table.intern_class_id("com.example.Ghost");
    let string = fx.table.class_id("java.lang.String").unwrap();
    let hierarchy = Hierarchy::new(&fx.table);

    let invalid = |result: Result<(), HierarchyError>| {
        assert!(
            matches!(result, Err(HierarchyError::InvalidArgument(_))),
            "{result:?}"
        )
    };
    invalid(hierarchy.collect_fields(ghost, fx.foo).map(drop));
    invalid(hierarchy.collect_fields(fx.baz, ghost).map(drop));
    invalid(hierarchy.collect_fields(fx.baz, string).map(drop));
    invalid(hierarchy.collect_all_fields(ghost).map(drop));
    invalid(hierarchy.collect_annotated_fields(ghost, ID).map(drop));
    invalid(hierarchy.collect_annotated_fields(fx.baz, "").map(drop));
    invalid(hierarchy.visible_methods(ghost).map(drop));
    invalid(hierarchy.collect_annotated_methods(ghost, None).map(drop));
}

#[test]
fn superclass_cycles_terminate() {
    let mut table = ClassTable::new();
    let first = table.intern_class_id("com.example.First");
    let second = table.intern_class_id("com.example.Second");
    table.define_class(
        first,
        ClassDef::class("com.example.First").extends(ClassType::raw(second)),
    );
    table.define_class(
        second,
        ClassDef::class("com.example.Second").extends(ClassType::raw(first)),
    );
    let hierarchy = Hierarchy::new(&table);

    assert!(hierarchy.collect_all_fields(first).unwrap().is_empty());
    assert!(hierarchy.visible_methods(second).unwrap().is_empty());
}
