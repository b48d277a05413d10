use crate::annotation::Annotation;
use crate::classfile::{ClassFile, ClassMember, ACC_INTERFACE};
use crate::descriptor::{parse_field_descriptor, parse_method_descriptor, FieldType, MethodDescriptor};
use crate::error::Result;
use crate::signature::{
    parse_class_signature, parse_field_signature, parse_method_signature, ClassSignature,
    FieldTypeSignature, MethodSignature,
};

/// A classfile with its descriptors and signatures parsed, ready to be turned into a type model
/// definition.
#[derive(Debug, Clone)]
pub struct ClassStub {
    pub internal_name: String,
    pub access_flags: u16,
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub signature: Option<ClassSignature>,
    pub visible_annotations: Vec<Annotation>,
    pub invisible_annotations: Vec<Annotation>,
    pub fields: Vec<FieldStub>,
    pub methods: Vec<MethodStub>,
}

#[derive(Debug, Clone)]
pub struct FieldStub {
    pub access_flags: u16,
    pub name: String,
    pub descriptor: FieldType,
    pub signature: Option<FieldTypeSignature>,
    pub visible_annotations: Vec<Annotation>,
    pub invisible_annotations: Vec<Annotation>,
}

#[derive(Debug, Clone)]
pub struct MethodStub {
    pub access_flags: u16,
    pub name: String,
    /// Raw descriptor string; together with `name` this is the JVM-level method identity.
    pub descriptor: String,
    pub parsed_descriptor: MethodDescriptor,
    pub signature: Option<MethodSignature>,
    pub visible_annotations: Vec<Annotation>,
    pub invisible_annotations: Vec<Annotation>,
}

impl ClassStub {
    pub fn from_classfile(class: &ClassFile) -> Result<Self> {
        let signature = class
            .signature
            .as_deref()
            .map(parse_class_signature)
            .transpose()?;

        let fields = class
            .fields
            .iter()
            .map(FieldStub::from_member)
            .collect::<Result<Vec<_>>>()?;
        let methods = class
            .methods
            .iter()
            .map(MethodStub::from_member)
            .collect::<Result<Vec<_>>>()?;

        Ok(ClassStub {
            internal_name: class.this_class.clone(),
            access_flags: class.access_flags,
            super_class: class.super_class.clone(),
            interfaces: class.interfaces.clone(),
            signature,
            visible_annotations: class.runtime_visible_annotations.clone(),
            invisible_annotations: class.runtime_invisible_annotations.clone(),
            fields,
            methods,
        })
    }

    /// Parses classfile bytes straight into a stub.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        Self::from_classfile(&ClassFile::parse(bytes)?)
    }

    /// `com/example/Outer$Inner` -> `com.example.Outer$Inner`.
    pub fn binary_name(&self) -> String {
        self.internal_name.replace('/', ".")
    }

    pub fn is_interface(&self) -> bool {
        self.access_flags & ACC_INTERFACE != 0
    }
}

impl FieldStub {
    fn from_member(member: &ClassMember) -> Result<Self> {
        Ok(FieldStub {
            access_flags: member.access_flags,
            name: member.name.clone(),
            descriptor: parse_field_descriptor(&member.descriptor)?,
            signature: member
                .signature
                .as_deref()
                .map(parse_field_signature)
                .transpose()?,
            visible_annotations: member.runtime_visible_annotations.clone(),
            invisible_annotations: member.runtime_invisible_annotations.clone(),
        })
    }
}

impl MethodStub {
    fn from_member(member: &ClassMember) -> Result<Self> {
        Ok(MethodStub {
            access_flags: member.access_flags,
            name: member.name.clone(),
            descriptor: member.descriptor.clone(),
            parsed_descriptor: parse_method_descriptor(&member.descriptor)?,
            signature: member
                .signature
                .as_deref()
                .map(parse_method_signature)
                .transpose()?,
            visible_annotations: member.runtime_visible_annotations.clone(),
            invisible_annotations: member.runtime_invisible_annotations.clone(),
        })
    }
}

impl ClassFile {
    pub fn stub(&self) -> Result<ClassStub> {
        ClassStub::from_classfile(self)
    }
}
