//! Read-only JVM classfile parsing for hierarchy analysis.
//!
//! Only the structural parts of a classfile are decoded: the constant pool, access flags,
//! supertypes, field and method declarations, and the `Signature` and annotation attributes.
//! Method bodies are skipped.

#![forbid(unsafe_code)]

mod annotation;
mod classfile;
mod constant_pool;
mod descriptor;
mod error;
mod reader;
mod signature;
mod stub;

pub use crate::annotation::{Annotation, ConstValue, ElementValue};
pub use crate::classfile::{
    ClassFile, ClassMember, ACC_ABSTRACT, ACC_ANNOTATION, ACC_ENUM, ACC_FINAL, ACC_INTERFACE,
    ACC_PRIVATE, ACC_PROTECTED, ACC_PUBLIC, ACC_STATIC,
};
pub use crate::descriptor::{parse_field_descriptor, parse_method_descriptor};
pub use crate::descriptor::{BaseType, FieldType, MethodDescriptor, ReturnType};
pub use crate::error::{Error, Result};
pub use crate::signature::{
    parse_class_signature, parse_field_signature, parse_method_signature, ClassSignature,
    ClassTypeSignature, FieldTypeSignature, MethodSignature, SimpleClassTypeSignature,
    TypeArgument, TypeParameter, TypeSignature,
};
pub use crate::stub::{ClassStub, FieldStub, MethodStub};
