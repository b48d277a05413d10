//! The canonical hierarchies used throughout the test suites.
//!
//! ```text
//! linear:   class Foo; class Bar extends Foo; class Baz extends Bar
//! diamond:  interface Foo; interface Bar1, Bar2 extends Foo; interface Baz extends Bar1, Bar2
//! generic:  class Foo<U, V>; class Bar<W> extends Foo<String, W>; class Baz extends Bar<Long>
//! ```
//!
//! Every table is built on top of [`ClassTable::with_minimal_jdk`].

use lineage_types::{
    ClassDef, ClassTable, ClassType, FieldDef, MethodDef, PrimitiveType, Type, TypeId, TypeVar,
};

use crate::{ClassWriter, MemberWriter};

pub const ID: &str = "javax.persistence.Id";
pub const COLUMN: &str = "javax.persistence.Column";
pub const POST_LOAD: &str = "javax.persistence.PostLoad";
pub const ACCESSOR: &str = "com.example.Accessor";
pub const FACTORY: &str = "com.example.Factory";

pub struct Linear {
    pub table: ClassTable,
    pub foo: TypeId,
    pub bar: TypeId,
    pub baz: TypeId,
}

/// `Foo <- Bar <- Baz`, with annotated fields and methods on every level:
///
/// - `Foo`: fields `@Id long id`, `int version`; methods `@Accessor getId()`,
///   `@PostLoad load()`
/// - `Bar`: field `@Column String name`; methods `load()` (overrides, unannotated),
///   `@Accessor getName()`, private `@Accessor helper()`
/// - `Baz`: fields `@Column String nickname`, `static int counter`; methods
///   `@Factory static create()`, `validate()`
pub fn linear() -> Linear {
    let mut table = ClassTable::with_minimal_jdk();
    let object = table.class_id(lineage_types::OBJECT).expect("minimal JDK has Object");
    let string = table.class_id("java.lang.String").expect("minimal JDK has String");
    let string_ty = || Type::class(string, vec![]);

    let foo = table.add_class(
        ClassDef::class("com.example.Foo")
            .extends(ClassType::raw(object))
            .with_field(FieldDef::new("id", Type::Primitive(PrimitiveType::Long)).with_annotation(ID))
            .with_field(FieldDef::new("version", Type::Primitive(PrimitiveType::Int)))
            .with_method(MethodDef::new("<init>", "()V"))
            .with_method(MethodDef::new("getId", "()J").with_annotation(ACCESSOR))
            .with_method(MethodDef::new("load", "()V").with_annotation(POST_LOAD)),
    );
    let bar = table.add_class(
        ClassDef::class("com.example.Bar")
            .extends(ClassType::raw(foo))
            .with_field(FieldDef::new("name", string_ty()).with_annotation(COLUMN))
            .with_method(MethodDef::new("load", "()V"))
            .with_method(
                MethodDef::new("getName", "()Ljava/lang/String;").with_annotation(ACCESSOR),
            )
            .with_method(
                MethodDef::new("helper", "()V")
                    .with_public(false)
                    .with_annotation(ACCESSOR),
            ),
    );
    let baz = table.add_class(
        ClassDef::class("com.example.Baz")
            .extends(ClassType::raw(bar))
            .with_field(FieldDef::new("nickname", string_ty()).with_annotation(COLUMN))
            .with_field(
                FieldDef::new("counter", Type::Primitive(PrimitiveType::Int)).with_static(true),
            )
            .with_method(
                MethodDef::new("create", "()Lcom/example/Baz;")
                    .with_static(true)
                    .with_annotation(FACTORY),
            )
            .with_method(MethodDef::new("validate", "()V")),
    );

    Linear {
        table,
        foo,
        bar,
        baz,
    }
}

pub struct Diamond {
    pub table: ClassTable,
    pub foo: TypeId,
    pub bar1: TypeId,
    pub bar2: TypeId,
    pub baz: TypeId,
}

/// `interface Foo; interface Bar1 extends Foo; interface Bar2 extends Foo;
/// interface Baz extends Bar1, Bar2`.
pub fn diamond() -> Diamond {
    let mut table = ClassTable::with_minimal_jdk();
    let foo = table.add_class(
        ClassDef::interface("com.example.Foo").with_method(MethodDef::new("foo", "()V")),
    );
    let bar1 = table.add_class(
        ClassDef::interface("com.example.Bar1")
            .implements(ClassType::raw(foo))
            .with_method(MethodDef::new("bar1", "()V").with_annotation(ACCESSOR)),
    );
    let bar2 = table.add_class(
        ClassDef::interface("com.example.Bar2")
            .implements(ClassType::raw(foo))
            .with_method(MethodDef::new("foo", "()V").with_annotation(ACCESSOR)),
    );
    let baz = table.add_class(
        ClassDef::interface("com.example.Baz")
            .implements(ClassType::raw(bar1))
            .implements(ClassType::raw(bar2)),
    );

    Diamond {
        table,
        foo,
        bar1,
        bar2,
        baz,
    }
}

pub struct Generic {
    pub table: ClassTable,
    pub foo: TypeId,
    pub bar: TypeId,
    pub baz: TypeId,
    pub string: TypeId,
    pub long: TypeId,
}

/// `class Foo<U, V>; class Bar<W> extends Foo<String, W>; class Baz extends Bar<Long>`.
pub fn generic() -> Generic {
    let mut table = ClassTable::with_minimal_jdk();
    let object = table.class_id(lineage_types::OBJECT).expect("minimal JDK has Object");
    let string = table.class_id("java.lang.String").expect("minimal JDK has String");
    let long = table.class_id("java.lang.Long").expect("minimal JDK has Long");

    let foo = table.intern_class_id("com.example.Foo");
    let bar = table.intern_class_id("com.example.Bar");
    let baz = table.intern_class_id("com.example.Baz");

    table.define_class(
        foo,
        ClassDef::class("com.example.Foo")
            .with_type_params(["U", "V"])
            .extends(ClassType::raw(object))
            .with_field(FieldDef::new("first", Type::TypeVar(TypeVar::new(foo, 0))))
            .with_field(FieldDef::new("second", Type::TypeVar(TypeVar::new(foo, 1)))),
    );
    table.define_class(
        bar,
        ClassDef::class("com.example.Bar")
            .with_type_params(["W"])
            .extends(ClassType::new(
                foo,
                vec![
                    Type::class(string, vec![]),
                    Type::TypeVar(TypeVar::new(bar, 0)),
                ],
            )),
    );
    table.define_class(
        baz,
        ClassDef::class("com.example.Baz")
            .extends(ClassType::new(bar, vec![Type::class(long, vec![])])),
    );

    Generic {
        table,
        foo,
        bar,
        baz,
        string,
        long,
    }
}

/// The generic hierarchy as classfiles (internal names under `com/example`). JDK classes are not
/// included; loaders see them as missing.
pub fn generic_classfiles() -> Vec<ClassWriter> {
    vec![
        ClassWriter::class("com/example/Foo")
            .signature("<U:Ljava/lang/Object;V:Ljava/lang/Object;>Ljava/lang/Object;")
            .field(
                MemberWriter::new("first", "Ljava/lang/Object;")
                    .signature("TU;")
                    .annotation("Ljavax/persistence/Id;"),
            )
            .field(MemberWriter::new("second", "Ljava/lang/Object;").signature("TV;")),
        ClassWriter::class("com/example/Bar")
            .super_class("com/example/Foo")
            .signature("<W:Ljava/lang/Object;>Lcom/example/Foo<Ljava/lang/String;TW;>;")
            .method(
                MemberWriter::new("<init>", "()V").code(&[0x00, 0x01, 0x00, 0x01, 0xB1]),
            ),
        ClassWriter::class("com/example/Baz")
            .super_class("com/example/Bar")
            .signature("Lcom/example/Bar<Ljava/lang/Long;>;")
            .field(
                MemberWriter::new("tags", "Ljava/util/List;")
                    .signature("Ljava/util/List<Ljava/lang/String;>;")
                    .annotation("Ljavax/persistence/Column;")
                    .invisible_annotation("Lcom/example/SourceOnly;"),
            )
            .method(
                MemberWriter::new("load", "()V")
                    .annotation("Ljavax/persistence/PostLoad;")
                    .code(&[0xB1]),
            ),
    ]
}

/// The interface diamond as classfiles.
pub fn diamond_classfiles() -> Vec<ClassWriter> {
    vec![
        ClassWriter::interface("com/example/Foo"),
        ClassWriter::interface("com/example/Bar1").interface_ref("com/example/Foo"),
        ClassWriter::interface("com/example/Bar2").interface_ref("com/example/Foo"),
        ClassWriter::interface("com/example/Baz")
            .interface_ref("com/example/Bar1")
            .interface_ref("com/example/Bar2"),
    ]
}
