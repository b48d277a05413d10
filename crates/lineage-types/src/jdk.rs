//! A tiny hand-written slice of `java.base`, enough for tests and examples that need realistic
//! JDK supertypes without a JDK on disk.

use crate::{
    ClassDef, ClassTable, ClassType, FieldDef, MethodDef, PrimitiveType, Type, TypeId, TypeVar,
    OBJECT,
};

impl ClassTable {
    pub fn with_minimal_jdk() -> Self {
        let mut table = ClassTable::new();

        let object = table.intern_class_id(OBJECT);
        let serializable = table.intern_class_id("java.io.Serializable");
        let cloneable = table.intern_class_id("java.lang.Cloneable");
        let char_sequence = table.intern_class_id("java.lang.CharSequence");
        let comparable = table.intern_class_id("java.lang.Comparable");
        let number = table.intern_class_id("java.lang.Number");
        let string = table.intern_class_id("java.lang.String");
        let long = table.intern_class_id("java.lang.Long");
        let integer = table.intern_class_id("java.lang.Integer");
        let iterable = table.intern_class_id("java.lang.Iterable");
        let collection = table.intern_class_id("java.util.Collection");
        let list = table.intern_class_id("java.util.List");
        let random_access = table.intern_class_id("java.util.RandomAccess");
        let abstract_collection = table.intern_class_id("java.util.AbstractCollection");
        let abstract_list = table.intern_class_id("java.util.AbstractList");
        let array_list = table.intern_class_id("java.util.ArrayList");

        let raw = ClassType::raw;
        let of = |def: TypeId, arg: Type| ClassType::new(def, vec![arg]);
        let var = |owner: TypeId| Type::TypeVar(TypeVar::new(owner, 0));
        let int = || Type::Primitive(PrimitiveType::Int);

        table.define_class(
            object,
            ClassDef::class(OBJECT)
                .with_method(MethodDef::new("<init>", "()V"))
                .with_method(MethodDef::new("hashCode", "()I"))
                .with_method(MethodDef::new("equals", "(Ljava/lang/Object;)Z"))
                .with_method(MethodDef::new("toString", "()Ljava/lang/String;"))
                .with_method(MethodDef::new("clone", "()Ljava/lang/Object;").with_public(false)),
        );
        table.define_class(serializable, ClassDef::interface("java.io.Serializable"));
        table.define_class(cloneable, ClassDef::interface("java.lang.Cloneable"));
        table.define_class(
            char_sequence,
            ClassDef::interface("java.lang.CharSequence")
                .with_method(MethodDef::new("length", "()I"))
                .with_method(MethodDef::new("charAt", "(I)C")),
        );
        table.define_class(
            comparable,
            ClassDef::interface("java.lang.Comparable")
                .with_type_params(["T"])
                .with_method(MethodDef::new("compareTo", "(Ljava/lang/Object;)I")),
        );
        table.define_class(
            number,
            ClassDef::class("java.lang.Number")
                .extends(raw(object))
                .implements(raw(serializable))
                .with_method(MethodDef::new("intValue", "()I"))
                .with_method(MethodDef::new("longValue", "()J")),
        );
        table.define_class(
            string,
            ClassDef::class("java.lang.String")
                .extends(raw(object))
                .implements(raw(serializable))
                .implements(of(comparable, Type::class(string, vec![])))
                .implements(raw(char_sequence))
                .with_field(FieldDef::new(
                    "value",
                    Type::array(Type::Primitive(PrimitiveType::Byte)),
                ))
                .with_method(MethodDef::new("length", "()I"))
                .with_method(MethodDef::new("charAt", "(I)C"))
                .with_method(MethodDef::new("isEmpty", "()Z"))
                .with_method(MethodDef::new("compareTo", "(Ljava/lang/String;)I"))
                .with_method(MethodDef::new("compareTo", "(Ljava/lang/Object;)I"))
                .with_method(
                    MethodDef::new("valueOf", "(I)Ljava/lang/String;").with_static(true),
                ),
        );
        for (id, name, prim, desc) in [
            (long, "java.lang.Long", PrimitiveType::Long, "J"),
            (integer, "java.lang.Integer", PrimitiveType::Int, "I"),
        ] {
            table.define_class(
                id,
                ClassDef::class(name)
                    .extends(raw(number))
                    .implements(of(comparable, Type::class(id, vec![])))
                    .with_field(
                        FieldDef::new("MAX_VALUE", Type::Primitive(prim)).with_static(true),
                    )
                    .with_field(FieldDef::new("value", Type::Primitive(prim)))
                    .with_method(MethodDef::new("intValue", "()I"))
                    .with_method(MethodDef::new("longValue", "()J"))
                    .with_method(MethodDef::new(
                        "compareTo",
                        format!("(Ljava/lang/{};)I", &name["java.lang.".len()..]),
                    ))
                    .with_method(MethodDef::new(
                        "valueOf",
                        format!("({desc})L{};", name.replace('.', "/")),
                    )
                    .with_static(true)),
            );
        }
        table.define_class(
            iterable,
            ClassDef::interface("java.lang.Iterable")
                .with_type_params(["T"])
                .with_method(MethodDef::new("iterator", "()Ljava/util/Iterator;")),
        );
        table.define_class(
            collection,
            ClassDef::interface("java.util.Collection")
                .with_type_params(["E"])
                .implements(of(iterable, var(collection)))
                .with_method(MethodDef::new("size", "()I"))
                .with_method(MethodDef::new("isEmpty", "()Z"))
                .with_method(MethodDef::new("add", "(Ljava/lang/Object;)Z")),
        );
        table.define_class(
            list,
            ClassDef::interface("java.util.List")
                .with_type_params(["E"])
                .implements(of(collection, var(list)))
                .with_method(MethodDef::new("get", "(I)Ljava/lang/Object;"))
                .with_method(MethodDef::new("of", "()Ljava/util/List;").with_static(true)),
        );
        table.define_class(random_access, ClassDef::interface("java.util.RandomAccess"));
        table.define_class(
            abstract_collection,
            ClassDef::class("java.util.AbstractCollection")
                .with_type_params(["E"])
                .extends(raw(object))
                .implements(of(collection, var(abstract_collection)))
                .with_method(MethodDef::new("size", "()I"))
                .with_method(MethodDef::new("isEmpty", "()Z"))
                .with_method(MethodDef::new("toString", "()Ljava/lang/String;")),
        );
        table.define_class(
            abstract_list,
            ClassDef::class("java.util.AbstractList")
                .with_type_params(["E"])
                .extends(of(abstract_collection, var(abstract_list)))
                .implements(of(list, var(abstract_list)))
                .with_field(FieldDef::new("modCount", int()))
                .with_method(MethodDef::new("get", "(I)Ljava/lang/Object;"))
                .with_method(MethodDef::new("add", "(Ljava/lang/Object;)Z")),
        );
        table.define_class(
            array_list,
            ClassDef::class("java.util.ArrayList")
                .with_type_params(["E"])
                .extends(of(abstract_list, var(array_list)))
                .implements(of(list, var(array_list)))
                .implements(raw(random_access))
                .implements(raw(cloneable))
                .implements(raw(serializable))
                .with_field(FieldDef::new(
                    "elementData",
                    Type::array(Type::class(object, vec![])),
                ))
                .with_field(FieldDef::new("size", int()))
                .with_method(MethodDef::new("<init>", "()V"))
                .with_method(MethodDef::new("get", "(I)Ljava/lang/Object;"))
                .with_method(MethodDef::new("size", "()I"))
                .with_method(MethodDef::new("add", "(Ljava/lang/Object;)Z")),
        );

        table
    }
}
