use crate::annotation::Annotation;
use crate::constant_pool::ConstantPool;
use crate::error::{Error, Result};
use crate::reader::Reader;

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_PRIVATE: u16 = 0x0002;
pub const ACC_PROTECTED: u16 = 0x0004;
pub const ACC_STATIC: u16 = 0x0008;
pub const ACC_FINAL: u16 = 0x0010;
pub const ACC_INTERFACE: u16 = 0x0200;
pub const ACC_ABSTRACT: u16 = 0x0400;
pub const ACC_ANNOTATION: u16 = 0x2000;
pub const ACC_ENUM: u16 = 0x4000;

const MAGIC: u32 = 0xCAFE_BABE;

/// The parts of a classfile relevant to type-hierarchy analysis. Code and debug attributes are
/// skipped without being decoded.
#[derive(Debug, Clone)]
pub struct ClassFile {
    pub minor_version: u16,
    pub major_version: u16,
    pub access_flags: u16,
    /// Internal name, e.g. `com/example/Foo`.
    pub this_class: String,
    /// `None` only for `java/lang/Object` (and `module-info`).
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub fields: Vec<ClassMember>,
    pub methods: Vec<ClassMember>,
    pub signature: Option<String>,
    pub runtime_visible_annotations: Vec<Annotation>,
    pub runtime_invisible_annotations: Vec<Annotation>,
}

#[derive(Debug, Clone)]
pub struct ClassMember {
    pub access_flags: u16,
    pub name: String,
    pub descriptor: String,
    pub signature: Option<String>,
    pub runtime_visible_annotations: Vec<Annotation>,
    pub runtime_invisible_annotations: Vec<Annotation>,
}

impl ClassFile {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes);
        let magic = reader.read_u4()?;
        if magic != MAGIC {
            return Err(Error::InvalidMagic(magic));
        }

        let minor_version = reader.read_u2()?;
        let major_version = reader.read_u2()?;
        let cp = ConstantPool::parse(&mut reader)?;

        let access_flags = reader.read_u2()?;
        let this_class = cp.get_class_name(reader.read_u2()?)?;
        let super_class = match reader.read_u2()? {
            0 => None,
            index => Some(cp.get_class_name(index)?),
        };

        let interfaces_count = reader.read_u2()? as usize;
        let interfaces = (0..interfaces_count)
            .map(|_| cp.get_class_name(reader.read_u2()?))
            .collect::<Result<Vec<_>>>()?;

        let fields = parse_members(&mut reader, &cp)?;
        let methods = parse_members(&mut reader, &cp)?;
        let attrs = Attributes::parse(&mut reader, &cp)?;
        reader.ensure_empty("ClassFile")?;

        Ok(Self {
            minor_version,
            major_version,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            signature: attrs.signature,
            runtime_visible_annotations: attrs.runtime_visible_annotations,
            runtime_invisible_annotations: attrs.runtime_invisible_annotations,
        })
    }

    pub fn is_interface(&self) -> bool {
        self.access_flags & ACC_INTERFACE != 0
    }
}

fn parse_members(reader: &mut Reader<'_>, cp: &ConstantPool) -> Result<Vec<ClassMember>> {
    let count = reader.read_u2()? as usize;
    let mut members = Vec::with_capacity(count);
    for _ in 0..count {
        let access_flags = reader.read_u2()?;
        let name = cp.get_utf8(reader.read_u2()?)?.to_string();
        let descriptor = cp.get_utf8(reader.read_u2()?)?.to_string();
        let attrs = Attributes::parse(reader, cp)?;
        members.push(ClassMember {
            access_flags,
            name,
            descriptor,
            signature: attrs.signature,
            runtime_visible_annotations: attrs.runtime_visible_annotations,
            runtime_invisible_annotations: attrs.runtime_invisible_annotations,
        });
    }
    Ok(members)
}

#[derive(Default)]
struct Attributes {
    signature: Option<String>,
    runtime_visible_annotations: Vec<Annotation>,
    runtime_invisible_annotations: Vec<Annotation>,
}

impl Attributes {
    fn parse(reader: &mut Reader<'_>, cp: &ConstantPool) -> Result<Self> {
        let count = reader.read_u2()? as usize;
        let mut attrs = Attributes::default();
        for _ in 0..count {
            let name = cp.get_utf8(reader.read_u2()?)?;
            let length = reader.read_u4()? as usize;
            let mut body = Reader::new(reader.read_bytes(length)?);
            match name {
                "Signature" => {
                    if attrs.signature.is_some() {
                        return Err(Error::MalformedAttribute("Signature"));
                    }
                    attrs.signature = Some(cp.get_utf8(body.read_u2()?)?.to_string());
                    body.ensure_empty("Signature")?;
                }
                "RuntimeVisibleAnnotations" => {
                    attrs
                        .runtime_visible_annotations
                        .extend(Annotation::parse_all(&mut body, cp)?);
                    body.ensure_empty("RuntimeVisibleAnnotations")?;
                }
                "RuntimeInvisibleAnnotations" => {
                    attrs
                        .runtime_invisible_annotations
                        .extend(Annotation::parse_all(&mut body, cp)?);
                    body.ensure_empty("RuntimeInvisibleAnnotations")?;
                }
                // Code, LineNumberTable, InnerClasses, ...
                _ => {}
            }
        }
        Ok(attrs)
    }
}
