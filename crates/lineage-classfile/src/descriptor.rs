use std::fmt;

use crate::error::{Error, Result};

/// The JVM rejects array types with more dimensions than this (JVMS 4.3.2).
pub(crate) const MAX_ARRAY_DIMENSIONS: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
}

impl BaseType {
    pub(crate) fn from_tag(tag: u8) -> Option<Self> {
        Some(match tag {
            b'B' => BaseType::Byte,
            b'C' => BaseType::Char,
            b'D' => BaseType::Double,
            b'F' => BaseType::Float,
            b'I' => BaseType::Int,
            b'J' => BaseType::Long,
            b'S' => BaseType::Short,
            b'Z' => BaseType::Boolean,
            _ => return None,
        })
    }

    pub fn java_name(self) -> &'static str {
        match self {
            BaseType::Byte => "byte",
            BaseType::Char => "char",
            BaseType::Double => "double",
            BaseType::Float => "float",
            BaseType::Int => "int",
            BaseType::Long => "long",
            BaseType::Short => "short",
            BaseType::Boolean => "boolean",
        }
    }
}

/// A parsed field descriptor (JVMS 4.3.2).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Base(BaseType),
    /// Internal name, e.g. `java/lang/String`.
    Object(String),
    Array(Box<FieldType>),
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Base(base) => f.write_str(base.java_name()),
            FieldType::Object(internal) => f.write_str(&internal.replace('/', ".")),
            FieldType::Array(component) => write!(f, "{component}[]"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReturnType {
    Void,
    Type(FieldType),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    pub params: Vec<FieldType>,
    pub return_type: ReturnType,
}

pub fn parse_field_descriptor(desc: &str) -> Result<FieldType> {
    let (ty, rest) =
        parse_field_type(desc).ok_or_else(|| Error::InvalidDescriptor(desc.to_string()))?;
    if !rest.is_empty() {
        return Err(Error::InvalidDescriptor(desc.to_string()));
    }
    Ok(ty)
}

pub fn parse_method_descriptor(desc: &str) -> Result<MethodDescriptor> {
    let invalid = || Error::InvalidDescriptor(desc.to_string());

    let mut rest = desc.strip_prefix('(').ok_or_else(invalid)?;
    let mut params = Vec::new();
    loop {
        if let Some(after) = rest.strip_prefix(')') {
            rest = after;
            break;
        }
        let (param, after) = parse_field_type(rest).ok_or_else(invalid)?;
        params.push(param);
        rest = after;
    }

    let return_type = if rest == "V" {
        ReturnType::Void
    } else {
        ReturnType::Type(parse_field_descriptor(rest).map_err(|_| invalid())?)
    };

    Ok(MethodDescriptor {
        params,
        return_type,
    })
}

/// Parses one field type off the front of `input`, returning the remainder.
fn parse_field_type(input: &str) -> Option<(FieldType, &str)> {
    let tag = *input.as_bytes().first()?;
    if let Some(base) = BaseType::from_tag(tag) {
        return Some((FieldType::Base(base), &input[1..]));
    }
    match tag {
        b'L' => {
            let end = input.find(';')?;
            let name = &input[1..end];
            if name.is_empty() {
                return None;
            }
            Some((FieldType::Object(name.to_string()), &input[end + 1..]))
        }
        b'[' => {
            let dims = input.bytes().take_while(|&b| b == b'[').count();
            if dims > MAX_ARRAY_DIMENSIONS {
                return None;
            }
            let (mut ty, rest) = parse_field_type(&input[dims..])?;
            for _ in 0..dims {
                ty = FieldType::Array(Box::new(ty));
            }
            Some((ty, rest))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_descriptors_cover_primitives_objects_and_arrays() {
        assert_eq!(parse_field_descriptor("J").unwrap(), FieldType::Base(BaseType::Long));
        let ty = parse_field_descriptor("[[Ljava/lang/String;").unwrap();
        assert_eq!(ty.to_string(), "java.lang.String[][]");
        assert!(parse_field_descriptor("L;").is_err());
        assert!(parse_field_descriptor("II").is_err());
    }

    #[test]
    fn method_descriptor_with_params_and_void_return() {
        let desc = parse_method_descriptor("(I[JLjava/util/List;)V").unwrap();
        assert_eq!(desc.params.len(), 3);
        assert_eq!(desc.params[2], FieldType::Object("java/util/List".to_string()));
        assert_eq!(desc.return_type, ReturnType::Void);

        assert!(parse_method_descriptor("()").is_err());
        assert!(parse_method_descriptor("(I").is_err());
        assert!(parse_method_descriptor("()VV").is_err());
    }

    #[test]
    fn array_dimensions_are_capped() {
        let deepest = format!("{}I", "[".repeat(MAX_ARRAY_DIMENSIONS));
        let parsed = parse_field_descriptor(&deepest).unwrap();
        let mut ty = &parsed;
        let mut dims = 0;
        while let FieldType::Array(component) = ty {
            dims += 1;
            ty = &**component;
        }
        assert_eq!(dims, MAX_ARRAY_DIMENSIONS);
        assert_eq!(*ty, FieldType::Base(BaseType::Int));

        let too_deep = format!("{}I", "[".repeat(MAX_ARRAY_DIMENSIONS + 1));
        assert!(matches!(
            parse_field_descriptor(&too_deep),
            Err(Error::InvalidDescriptor(_))
        ));
        let huge = format!("({}Ljava/lang/Object;)V", "[".repeat(60_000));
        assert!(parse_method_descriptor(&huge).is_err());
    }
}
