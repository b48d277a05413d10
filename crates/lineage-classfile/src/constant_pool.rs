use crate::error::{Error, Result};
use crate::reader::Reader;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CpInfo {
    /// Slot 0 and the shadow slot following a `Long`/`Double`.
    Unusable,
    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class { name_index: u16 },
    String { string_index: u16 },
    FieldRef,
    MethodRef,
    InterfaceMethodRef,
    NameAndType,
    MethodHandle,
    MethodType,
    Dynamic,
    InvokeDynamic,
    Module { name_index: u16 },
    Package { name_index: u16 },
}

impl CpInfo {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            CpInfo::Unusable => "Unusable",
            CpInfo::Utf8(_) => "Utf8",
            CpInfo::Integer(_) => "Integer",
            CpInfo::Float(_) => "Float",
            CpInfo::Long(_) => "Long",
            CpInfo::Double(_) => "Double",
            CpInfo::Class { .. } => "Class",
            CpInfo::String { .. } => "String",
            CpInfo::FieldRef => "Fieldref",
            CpInfo::MethodRef => "Methodref",
            CpInfo::InterfaceMethodRef => "InterfaceMethodref",
            CpInfo::NameAndType => "NameAndType",
            CpInfo::MethodHandle => "MethodHandle",
            CpInfo::MethodType => "MethodType",
            CpInfo::Dynamic => "Dynamic",
            CpInfo::InvokeDynamic => "InvokeDynamic",
            CpInfo::Module { .. } => "Module",
            CpInfo::Package { .. } => "Package",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ConstantPool {
    entries: Vec<CpInfo>,
}

impl ConstantPool {
    pub(crate) fn parse(reader: &mut Reader<'_>) -> Result<Self> {
        let count = reader.read_u2()? as usize;
        let mut entries = Vec::with_capacity(count.max(1));
        entries.push(CpInfo::Unusable);

        while entries.len() < count {
            let tag = reader.read_u1()?;
            let entry = match tag {
                1 => {
                    let len = reader.read_u2()? as usize;
                    CpInfo::Utf8(decode_modified_utf8(reader.read_bytes(len)?)?)
                }
                3 => CpInfo::Integer(reader.read_u4()? as i32),
                4 => CpInfo::Float(f32::from_bits(reader.read_u4()?)),
                5 => CpInfo::Long(reader.read_u8()? as i64),
                6 => CpInfo::Double(f64::from_bits(reader.read_u8()?)),
                7 => CpInfo::Class {
                    name_index: reader.read_u2()?,
                },
                8 => CpInfo::String {
                    string_index: reader.read_u2()?,
                },
                9 | 10 | 11 | 12 => {
                    reader.read_u4()?;
                    match tag {
                        9 => CpInfo::FieldRef,
                        10 => CpInfo::MethodRef,
                        11 => CpInfo::InterfaceMethodRef,
                        _ => CpInfo::NameAndType,
                    }
                }
                15 => {
                    reader.read_u1()?;
                    reader.read_u2()?;
                    CpInfo::MethodHandle
                }
                16 => {
                    reader.read_u2()?;
                    CpInfo::MethodType
                }
                17 | 18 => {
                    reader.read_u4()?;
                    if tag == 17 {
                        CpInfo::Dynamic
                    } else {
                        CpInfo::InvokeDynamic
                    }
                }
                19 => CpInfo::Module {
                    name_index: reader.read_u2()?,
                },
                20 => CpInfo::Package {
                    name_index: reader.read_u2()?,
                },
                other => return Err(Error::InvalidConstantPoolTag(other)),
            };

            let wide = matches!(entry, CpInfo::Long(_) | CpInfo::Double(_));
            entries.push(entry);
            if wide {
                // JVMS 4.4.5: 8-byte constants take up two entries.
                entries.push(CpInfo::Unusable);
            }
        }

        if entries.len() != count.max(1) {
            // A wide constant in the final slot overflows the declared count.
            return Err(Error::InvalidConstantPoolIndex(count as u16));
        }

        Ok(Self { entries })
    }

    pub(crate) fn get(&self, index: u16) -> Result<&CpInfo> {
        match self.entries.get(index as usize) {
            Some(CpInfo::Unusable) | None => Err(Error::InvalidConstantPoolIndex(index)),
            Some(entry) => Ok(entry),
        }
    }

    pub(crate) fn get_utf8(&self, index: u16) -> Result<&str> {
        match self.get(index)? {
            CpInfo::Utf8(value) => Ok(value),
            other => Err(mismatch(index, "Utf8", other)),
        }
    }

    /// Internal name (`java/lang/Object`) of a `CONSTANT_Class` entry.
    pub(crate) fn get_class_name(&self, index: u16) -> Result<String> {
        match self.get(index)? {
            CpInfo::Class { name_index } => Ok(self.get_utf8(*name_index)?.to_string()),
            other => Err(mismatch(index, "Class", other)),
        }
    }

    pub(crate) fn get_string_constant(&self, index: u16) -> Result<String> {
        match self.get(index)? {
            CpInfo::String { string_index } => Ok(self.get_utf8(*string_index)?.to_string()),
            // Annotation `s` elements point straight at a Utf8 entry.
            CpInfo::Utf8(value) => Ok(value.clone()),
            other => Err(mismatch(index, "String", other)),
        }
    }
}

fn mismatch(index: u16, expected: &'static str, found: &CpInfo) -> Error {
    Error::ConstantPoolTypeMismatch {
        index,
        expected,
        found: found.kind(),
    }
}

/// Decodes the JVM's "modified UTF-8" (JVMS 4.4.7): NUL is two bytes and supplementary
/// characters are encoded as surrogate pairs of three bytes each.
pub(crate) fn decode_modified_utf8(bytes: &[u8]) -> Result<String> {
    if bytes.iter().all(|b| *b != 0 && *b < 0x80) {
        return std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|_| Error::InvalidModifiedUtf8);
    }

    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut idx = 0;
    while idx < bytes.len() {
        let b0 = bytes[idx] as u16;
        if b0 & 0x80 == 0 {
            if b0 == 0 {
                return Err(Error::InvalidModifiedUtf8);
            }
            units.push(b0);
            idx += 1;
        } else if b0 & 0xE0 == 0xC0 {
            let b1 = continuation(bytes, idx + 1)?;
            units.push(((b0 & 0x1F) << 6) | b1);
            idx += 2;
        } else if b0 & 0xF0 == 0xE0 {
            let b1 = continuation(bytes, idx + 1)?;
            let b2 = continuation(bytes, idx + 2)?;
            units.push(((b0 & 0x0F) << 12) | (b1 << 6) | b2);
            idx += 3;
        } else {
            return Err(Error::InvalidModifiedUtf8);
        }
    }

    String::from_utf16(&units).map_err(|_| Error::InvalidModifiedUtf8)
}

fn continuation(bytes: &[u8], idx: usize) -> Result<u16> {
    match bytes.get(idx) {
        Some(b) if b & 0xC0 == 0x80 => Ok((*b & 0x3F) as u16),
        _ => Err(Error::InvalidModifiedUtf8),
    }
}
