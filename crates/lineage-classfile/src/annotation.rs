use crate::constant_pool::{ConstantPool, CpInfo};
use crate::error::{Error, Result};
use crate::reader::Reader;

/// A single `annotation` structure (JVMS 4.7.16).
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Field descriptor of the annotation interface, e.g. `Ljavax/persistence/Id;`.
    pub type_descriptor: String,
    pub elements: Vec<(String, ElementValue)>,
}

impl Annotation {
    /// Binary name of the annotation interface (`javax.persistence.Id`), if the descriptor is a
    /// well-formed object type.
    pub fn binary_name(&self) -> Option<String> {
        let internal = self
            .type_descriptor
            .strip_prefix('L')?
            .strip_suffix(';')?;
        if internal.is_empty() {
            return None;
        }
        Some(internal.replace('/', "."))
    }

    pub fn element(&self, name: &str) -> Option<&ElementValue> {
        self.elements
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub(crate) fn parse(reader: &mut Reader<'_>, cp: &ConstantPool) -> Result<Self> {
        let type_descriptor = cp.get_utf8(reader.read_u2()?)?.to_string();
        let count = reader.read_u2()? as usize;
        let mut elements = Vec::with_capacity(count);
        for _ in 0..count {
            let name = cp.get_utf8(reader.read_u2()?)?.to_string();
            let value = ElementValue::parse(reader, cp)?;
            elements.push((name, value));
        }
        Ok(Self {
            type_descriptor,
            elements,
        })
    }

    /// Parses a `Runtime{Visible,Invisible}Annotations` attribute body.
    pub(crate) fn parse_all(reader: &mut Reader<'_>, cp: &ConstantPool) -> Result<Vec<Self>> {
        let count = reader.read_u2()? as usize;
        (0..count).map(|_| Self::parse(reader, cp)).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementValue {
    Const(ConstValue),
    Enum {
        type_descriptor: String,
        const_name: String,
    },
    /// Return descriptor of a class literal, e.g. `Ljava/lang/String;` or `V`.
    Class(String),
    Annotation(Box<Annotation>),
    Array(Vec<ElementValue>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Byte(i8),
    Char(char),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    String(String),
}

impl ElementValue {
    fn parse(reader: &mut Reader<'_>, cp: &ConstantPool) -> Result<Self> {
        let tag = reader.read_u1()?;
        let value = match tag {
            b'B' | b'C' | b'I' | b'S' | b'Z' => {
                let index = reader.read_u2()?;
                let CpInfo::Integer(raw) = cp.get(index)? else {
                    return Err(type_mismatch(cp, index, "Integer"));
                };
                let raw = *raw;
                ElementValue::Const(match tag {
                    b'B' => ConstValue::Byte(raw as i8),
                    b'C' => ConstValue::Char(
                        char::from_u32(raw as u32)
                            .ok_or(Error::MalformedAttribute("annotation element"))?,
                    ),
                    b'S' => ConstValue::Short(raw as i16),
                    b'Z' => ConstValue::Boolean(raw != 0),
                    _ => ConstValue::Int(raw),
                })
            }
            b'J' => {
                let index = reader.read_u2()?;
                let CpInfo::Long(raw) = cp.get(index)? else {
                    return Err(type_mismatch(cp, index, "Long"));
                };
                ElementValue::Const(ConstValue::Long(*raw))
            }
            b'F' => {
                let index = reader.read_u2()?;
                let CpInfo::Float(raw) = cp.get(index)? else {
                    return Err(type_mismatch(cp, index, "Float"));
                };
                ElementValue::Const(ConstValue::Float(*raw))
            }
            b'D' => {
                let index = reader.read_u2()?;
                let CpInfo::Double(raw) = cp.get(index)? else {
                    return Err(type_mismatch(cp, index, "Double"));
                };
                ElementValue::Const(ConstValue::Double(*raw))
            }
            b's' => ElementValue::Const(ConstValue::String(
                cp.get_string_constant(reader.read_u2()?)?,
            )),
            b'e' => {
                let type_descriptor = cp.get_utf8(reader.read_u2()?)?.to_string();
                let const_name = cp.get_utf8(reader.read_u2()?)?.to_string();
                ElementValue::Enum {
                    type_descriptor,
                    const_name,
                }
            }
            b'c' => ElementValue::Class(cp.get_utf8(reader.read_u2()?)?.to_string()),
            b'@' => ElementValue::Annotation(Box::new(Annotation::parse(reader, cp)?)),
            b'[' => {
                let count = reader.read_u2()? as usize;
                let values = (0..count)
                    .map(|_| ElementValue::parse(reader, cp))
                    .collect::<Result<Vec<_>>>()?;
                ElementValue::Array(values)
            }
            _ => return Err(Error::MalformedAttribute("annotation element")),
        };
        Ok(value)
    }
}

fn type_mismatch(cp: &ConstantPool, index: u16, expected: &'static str) -> Error {
    Error::ConstantPoolTypeMismatch {
        index,
        expected,
        found: cp.get(index).map(CpInfo::kind).unwrap_or("Unusable"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_name_from_descriptor() {
        let ann = Annotation {
            type_descriptor: "Ljavax/persistence/Id;".to_string(),
            elements: Vec::new(),
        };
        assert_eq!(ann.binary_name().as_deref(), Some("javax.persistence.Id"));

        let bogus = Annotation {
            type_descriptor: "I".to_string(),
            elements: Vec::new(),
        };
        assert_eq!(bogus.binary_name(), None);
    }
}
