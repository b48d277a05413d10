use lineage_classfile::{
    ClassFile, ClassStub, Error, FieldType, SimpleClassTypeSignature, TypeArgument, TypeSignature,
    ACC_PUBLIC, ACC_STATIC,
};
use lineage_test_utils::{fixtures, ClassWriter, MemberWriter};

use pretty_assertions::assert_eq;

fn class_sig(name: &str, type_arguments: Vec<TypeArgument>) -> TypeSignature {
    TypeSignature::Class(lineage_classfile::ClassTypeSignature {
        segments: vec![SimpleClassTypeSignature {
            name: name.to_string(),
            type_arguments,
        }],
    })
}

#[test]
fn parses_writer_output() {
    let bytes = ClassWriter::class("com/example/Widget")
        .interface_ref("java/io/Serializable")
        .annotation("Lcom/example/Marker;")
        .field(MemberWriter::new("SIZE", "I").access(ACC_PUBLIC | ACC_STATIC))
        .method(MemberWriter::new("<init>", "()V").code(&[0x00, 0x01, 0x00, 0x01, 0xB1]))
        .build();

    let class = ClassFile::parse(&bytes).unwrap();
    assert_eq!(class.major_version, 61);
    assert_eq!(class.this_class, "com/example/Widget");
    assert_eq!(class.super_class.as_deref(), Some("java/lang/Object"));
    assert_eq!(class.interfaces, vec!["java/io/Serializable"]);
    assert!(!class.is_interface());
    assert_eq!(class.signature, None);
    assert_eq!(class.runtime_visible_annotations.len(), 1);
    assert_eq!(
        class.runtime_visible_annotations[0].binary_name().as_deref(),
        Some("com.example.Marker")
    );
    assert_eq!(class.fields[0].name, "SIZE");
    assert_eq!(class.fields[0].access_flags, ACC_PUBLIC | ACC_STATIC);
    assert_eq!(class.methods[0].descriptor, "()V");
}

#[test]
fn stubs_carry_parsed_signatures() {
    let classes = fixtures::generic_classfiles();
    let bar = ClassStub::parse(&classes[1].build()).unwrap();
    assert_eq!(bar.binary_name(), "com.example.Bar");

    let sig = bar.signature.expect("Bar is generic");
    assert_eq!(sig.type_parameters.len(), 1);
    assert_eq!(sig.type_parameters[0].name, "W");
    assert_eq!(sig.super_class.internal_name(), "com/example/Foo");
    assert_eq!(
        sig.super_class.type_arguments(),
        &[
            TypeArgument::Exact(class_sig("java/lang/String", vec![])),
            TypeArgument::Exact(TypeSignature::TypeVariable("W".to_string())),
        ]
    );

    let baz = ClassStub::parse(&classes[2].build()).unwrap();
    let tags = &baz.fields[0];
    assert_eq!(tags.descriptor, FieldType::Object("java/util/List".to_string()));
    assert_eq!(
        tags.signature,
        Some(class_sig(
            "java/util/List",
            vec![TypeArgument::Exact(class_sig("java/lang/String", vec![]))]
        ))
    );
    assert_eq!(tags.visible_annotations.len(), 1);
    assert_eq!(tags.invisible_annotations.len(), 1);
    assert_eq!(baz.methods[0].parsed_descriptor.params, vec![]);
}

#[test]
fn interfaces_are_flagged() {
    let stub = ClassStub::parse(&fixtures::diamond_classfiles()[3].build()).unwrap();
    assert!(stub.is_interface());
    assert_eq!(stub.interfaces, vec!["com/example/Bar1", "com/example/Bar2"]);
}

#[test]
fn rejects_truncated_and_foreign_input() {
    let bytes = ClassWriter::class("com/example/Widget").build();

    assert!(matches!(
        ClassFile::parse(&bytes[..bytes.len() - 1]),
        Err(Error::UnexpectedEof)
    ));

    let mut trailing = bytes.clone();
    trailing.push(0);
    assert!(matches!(
        ClassFile::parse(&trailing),
        Err(Error::TrailingBytes(_))
    ));

    let mut wrong_magic = bytes;
    wrong_magic[0] = 0xCB;
    assert!(matches!(
        ClassFile::parse(&wrong_magic),
        Err(Error::InvalidMagic(0xCBFE_BABE))
    ));
}

#[test]
fn malformed_signatures_are_errors() {
    let bytes = ClassWriter::class("com/example/Widget")
        .signature("<T:>Ljava/lang/Object")
        .build();
    assert!(ClassFile::parse(&bytes).is_ok());
    assert!(matches!(
        ClassStub::parse(&bytes),
        Err(Error::InvalidSignature(_))
    ));
}
