use std::fs;

use lineage_bridge::{
    AnnotationRetention, ChainProvider, ClassProvider, ClassfileLoader, DirectoryProvider,
    LoadError, LoaderConfig, MemoryProvider, MissingClassPolicy,
};
use lineage_test_utils::{fixtures, write_class_dir, ClassWriter, MemberWriter};
use lineage_types::{
    ClassKind, ClassTable, ClassType, Type, TypeEnv, TypeVar, WildcardBound, OBJECT,
};

use pretty_assertions::assert_eq;

fn memory_provider(classes: &[ClassWriter]) -> MemoryProvider {
    let mut provider = MemoryProvider::new();
    for class in classes {
        provider.insert_bytes(&class.build()).unwrap();
    }
    provider
}

fn config(missing_classes: MissingClassPolicy) -> LoaderConfig {
    LoaderConfig {
        missing_classes,
        ..LoaderConfig::default()
    }
}

#[test]
fn loads_generic_signatures() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let provider = memory_provider(&fixtures::generic_classfiles());
    let mut table = ClassTable::with_minimal_jdk();
    let baz = ClassfileLoader::new(&mut table, &provider)
        .ensure_class("com.example.Baz")
        .unwrap()
        .unwrap();

    let foo = table.class_id("com.example.Foo").unwrap();
    let bar = table.class_id("com.example.Bar").unwrap();
    let string = table.class_id("java.lang.String").unwrap();
    let long = table.class_id("java.lang.Long").unwrap();
    let list = table.class_id("java.util.List").unwrap();

    let foo_def = table.class(foo).unwrap();
    let params: Vec<_> = foo_def.type_params.iter().map(|tp| tp.name.as_str()).collect();
    assert_eq!(params, vec!["U", "V"]);
    assert_eq!(foo_def.fields[0].ty, Type::TypeVar(TypeVar::new(foo, 0)));
    assert_eq!(foo_def.fields[0].annotations, vec![fixtures::ID.to_string()]);
    assert_eq!(foo_def.fields[1].ty, Type::TypeVar(TypeVar::new(foo, 1)));

    let bar_def = table.class(bar).unwrap();
    assert_eq!(
        bar_def.super_class,
        Some(ClassType::new(
            foo,
            vec![Type::class(string, vec![]), Type::TypeVar(TypeVar::new(bar, 0))]
        ))
    );
    assert_eq!(bar_def.methods[0].name, "<init>");

    let baz_def = table.class(baz).unwrap();
    assert_eq!(baz_def.kind, ClassKind::Class);
    assert_eq!(
        baz_def.super_class,
        Some(ClassType::new(bar, vec![Type::class(long, vec![])]))
    );
    assert_eq!(
        baz_def.fields[0].ty,
        Type::class(list, vec![Type::class(string, vec![])])
    );
    // Invisible annotations are dropped by default.
    assert_eq!(
        baz_def.fields[0].annotations,
        vec![fixtures::COLUMN.to_string()]
    );
    assert_eq!(
        baz_def.methods[0].annotations,
        vec![fixtures::POST_LOAD.to_string()]
    );
    assert!(baz_def.methods[0].is_public);
}

#[test]
fn enclosing_type_variables_load_as_wildcards() {
    // `class Outer<T> { class Inner extends ArrayList<T> { T current; } }`
    let provider = memory_provider(&[ClassWriter::class("com/example/Outer$Inner")
        .super_class("java/util/ArrayList")
        .signature("Ljava/util/ArrayList<TT;>;")
        .field(MemberWriter::new("current", "Ljava/lang/Object;").signature("TT;"))]);
    let mut table = ClassTable::with_minimal_jdk();
    let inner = ClassfileLoader::new(&mut table, &provider)
        .ensure_class("com.example.Outer$Inner")
        .unwrap()
        .unwrap();

    let array_list = table.class_id("java.util.ArrayList").unwrap();
    let def = table.class(inner).unwrap();
    assert!(def.type_params.is_empty());
    assert_eq!(
        def.super_class,
        Some(ClassType::new(
            array_list,
            vec![Type::Wildcard(WildcardBound::Unbounded)]
        ))
    );
    assert_eq!(def.fields[0].ty, Type::Wildcard(WildcardBound::Unbounded));
}

#[test]
fn invisible_annotations_are_kept_on_request() {
    let provider = memory_provider(&fixtures::generic_classfiles());
    let mut table = ClassTable::with_minimal_jdk();
    let config = LoaderConfig {
        annotation_retention: AnnotationRetention::All,
        ..LoaderConfig::default()
    };
    let baz = ClassfileLoader::with_config(&mut table, &provider, config)
        .ensure_class("com.example.Baz")
        .unwrap()
        .unwrap();

    assert_eq!(
        table.class(baz).unwrap().fields[0].annotations,
        vec![
            fixtures::COLUMN.to_string(),
            "com.example.SourceOnly".to_string()
        ]
    );
}

#[test]
fn erased_classes_use_descriptors() {
    let provider = memory_provider(&[ClassWriter::class("com/example/Plain")
        .interface_ref("java/lang/Comparable")
        .field(MemberWriter::new("values", "[J"))
        .field(MemberWriter::new("name", "Ljava/lang/String;"))
        .method(MemberWriter::new("run", "()V").access(0x0008))]);
    let mut table = ClassTable::with_minimal_jdk();
    let plain = ClassfileLoader::new(&mut table, &provider)
        .ensure_class("com.example.Plain")
        .unwrap()
        .unwrap();

    let object = table.class_id(OBJECT).unwrap();
    let string = table.class_id("java.lang.String").unwrap();
    let comparable = table.class_id("java.lang.Comparable").unwrap();
    let def = table.class(plain).unwrap();
    assert_eq!(def.super_class, Some(ClassType::raw(object)));
    assert_eq!(def.interfaces, vec![ClassType::raw(comparable)]);
    assert_eq!(
        def.fields[0].ty,
        Type::array(Type::Primitive(lineage_types::PrimitiveType::Long))
    );
    assert_eq!(def.fields[1].ty, Type::class(string, vec![]));
    // ACC_STATIC without ACC_PUBLIC.
    assert!(def.methods[0].is_static);
    assert!(!def.methods[0].is_public);
}

#[test]
fn missing_supertypes_become_placeholders() {
    let provider = memory_provider(&[ClassWriter::class("com/example/Impl")
        .super_class("com/example/Base")
        .interface_ref("com/example/Api")]);
    let mut table = ClassTable::new();
    let imp = ClassfileLoader::new(&mut table, &provider)
        .ensure_class("com.example.Impl")
        .unwrap()
        .unwrap();

    let base = table.class_id("com.example.Base").unwrap();
    let api = table.class_id("com.example.Api").unwrap();
    let object = table.class_id(OBJECT).unwrap();

    assert_eq!(table.super_class(imp), Some(base));
    assert_eq!(table.class(base).unwrap().kind, ClassKind::Class);
    assert_eq!(table.super_class(base), Some(object));
    assert_eq!(table.class(api).unwrap().kind, ClassKind::Interface);
    assert_eq!(table.super_class(api), None);
    assert!(table.is_defined(object));
    assert_eq!(table.super_class(object), None);
}

#[test]
fn skip_policy_leaves_holes() {
    let provider = memory_provider(&[ClassWriter::class("com/example/Impl")]);
    let mut table = ClassTable::new();
    let mut loader =
        ClassfileLoader::with_config(&mut table, &provider, config(MissingClassPolicy::Skip));

    assert_eq!(loader.ensure_class("com.example.Missing").unwrap(), None);
    let imp = loader.ensure_class("com.example.Impl").unwrap().unwrap();

    let object = table.class_id(OBJECT).unwrap();
    assert_eq!(table.super_class(imp), Some(object));
    assert!(!table.is_defined(object));
    assert_eq!(table.undefined_classes().count(), 1);
}

#[test]
fn error_policy_reports_the_missing_class() {
    let provider = memory_provider(&fixtures::generic_classfiles());
    let mut table = ClassTable::new();
    let err = ClassfileLoader::with_config(&mut table, &provider, config(MissingClassPolicy::Error))
        .ensure_class("com.example.Baz")
        .unwrap_err();

    assert!(
        matches!(&err, LoadError::MissingClass(name) if name == OBJECT),
        "{err}"
    );
}

#[test]
fn existing_definitions_are_not_replaced() {
    // A classfile claiming to be java.lang.String must not shadow the table's definition.
    let provider = memory_provider(&[ClassWriter::class("java/lang/String")]);
    let mut table = ClassTable::with_minimal_jdk();
    let string = table.class_id("java.lang.String").unwrap();
    let before = table.class(string).cloned();

    let loaded = ClassfileLoader::new(&mut table, &provider)
        .ensure_class("java.lang.String")
        .unwrap();
    assert_eq!(loaded, Some(string));
    assert_eq!(table.class(string).cloned(), before);
}

#[test]
fn directory_provider_lists_and_reads_classes() {
    let dir = write_class_dir(&fixtures::diamond_classfiles());
    let provider = DirectoryProvider::new(dir.path());

    assert_eq!(
        provider.binary_names().unwrap(),
        vec![
            "com.example.Bar1",
            "com.example.Bar2",
            "com.example.Baz",
            "com.example.Foo"
        ]
    );
    let stub = provider.lookup("com.example.Baz").unwrap().unwrap();
    assert!(stub.is_interface());
    assert_eq!(stub.interfaces, vec!["com/example/Bar1", "com/example/Bar2"]);
    assert!(provider.lookup("com.example.Nope").unwrap().is_none());
}

#[test]
fn directory_provider_rejects_misplaced_classfiles() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("com/example/Bar.class");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, ClassWriter::class("com/example/Foo").build()).unwrap();
    fs::write(dir.path().join("com/example/Broken.class"), b"\xCA\xFE").unwrap();

    let provider = DirectoryProvider::new(dir.path());
    let err = provider.lookup("com.example.Bar").unwrap_err();
    assert!(
        matches!(&err, LoadError::NameMismatch { found, .. } if found == "com.example.Foo"),
        "{err}"
    );
    assert!(matches!(
        provider.lookup("com.example.Broken"),
        Err(LoadError::Classfile { .. })
    ));
}

#[test]
fn chain_provider_prefers_earlier_providers() {
    let first = memory_provider(&[ClassWriter::interface("com/example/Shape")]);
    let second = memory_provider(&[
        ClassWriter::class("com/example/Shape"),
        ClassWriter::class("com/example/Circle"),
    ]);
    let providers: Vec<&dyn ClassProvider> = vec![&first, &second];
    let chain = ChainProvider::new(providers);

    assert!(chain.lookup("com.example.Shape").unwrap().unwrap().is_interface());
    assert!(chain.lookup("com.example.Circle").unwrap().is_some());
    assert!(chain.lookup("com.example.Square").unwrap().is_none());
}

#[test]
fn config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lineage.toml");
    fs::write(&path, "missing_classes = \"skip\"\n").unwrap();

    let config = LoaderConfig::load(&path).unwrap();
    assert_eq!(config.missing_classes, MissingClassPolicy::Skip);
    assert_eq!(config.annotation_retention, AnnotationRetention::Runtime);

    assert!(matches!(
        LoaderConfig::load(&dir.path().join("absent.toml")),
        Err(LoadError::Io { .. })
    ));
}
