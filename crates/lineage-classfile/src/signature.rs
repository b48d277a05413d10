//! Parser for the generic `Signature` attribute grammar (JVMS 4.7.9.1).

use crate::descriptor::{BaseType, MAX_ARRAY_DIMENSIONS};
use crate::error::{Error, Result};

/// How deeply type argument lists may nest (`A<B<C<...>>>`) before a signature is rejected.
const MAX_TYPE_ARGUMENT_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSignature {
    pub type_parameters: Vec<TypeParameter>,
    pub super_class: ClassTypeSignature,
    pub interfaces: Vec<ClassTypeSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub type_parameters: Vec<TypeParameter>,
    pub parameters: Vec<TypeSignature>,
    /// `None` for `void`.
    pub return_type: Option<TypeSignature>,
    pub throws: Vec<TypeSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParameter {
    pub name: String,
    pub class_bound: Option<TypeSignature>,
    pub interface_bounds: Vec<TypeSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassTypeSignature {
    /// Outermost first. The first segment carries the package prefix (`java/util/Map`).
    pub segments: Vec<SimpleClassTypeSignature>,
}

impl ClassTypeSignature {
    /// Internal name of the referenced class, e.g. `java/util/Map$Entry`.
    pub fn internal_name(&self) -> String {
        let names: Vec<&str> = self.segments.iter().map(|s| s.name.as_str()).collect();
        names.join("$")
    }

    /// Type arguments applied to the innermost class.
    pub fn type_arguments(&self) -> &[TypeArgument] {
        self.segments
            .last()
            .map(|seg| seg.type_arguments.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleClassTypeSignature {
    pub name: String,
    pub type_arguments: Vec<TypeArgument>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeArgument {
    /// `*`
    Any,
    Exact(TypeSignature),
    /// `+T`, i.e. `? extends T`
    Extends(TypeSignature),
    /// `-T`, i.e. `? super T`
    Super(TypeSignature),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSignature {
    Base(BaseType),
    Array(Box<TypeSignature>),
    Class(ClassTypeSignature),
    TypeVariable(String),
}

/// Field signatures are always reference types.
pub type FieldTypeSignature = TypeSignature;

pub fn parse_class_signature(sig: &str) -> Result<ClassSignature> {
    let mut parser = Parser::new(sig);
    let type_parameters = parser.type_parameters()?;
    let super_class = parser.class_type()?;
    let mut interfaces = Vec::new();
    while !parser.at_end() {
        interfaces.push(parser.class_type()?);
    }
    Ok(ClassSignature {
        type_parameters,
        super_class,
        interfaces,
    })
}

pub fn parse_field_signature(sig: &str) -> Result<FieldTypeSignature> {
    let mut parser = Parser::new(sig);
    let ty = parser.reference_type()?;
    parser.finish()?;
    Ok(ty)
}

pub fn parse_method_signature(sig: &str) -> Result<MethodSignature> {
    let mut parser = Parser::new(sig);
    let type_parameters = parser.type_parameters()?;
    parser.expect(b'(')?;
    let mut parameters = Vec::new();
    while !parser.eat(b')') {
        parameters.push(parser.java_type()?);
    }
    let return_type = if parser.eat(b'V') {
        None
    } else {
        Some(parser.java_type()?)
    };
    let mut throws = Vec::new();
    while parser.eat(b'^') {
        throws.push(parser.reference_type()?);
    }
    parser.finish()?;
    Ok(MethodSignature {
        type_parameters,
        parameters,
        return_type,
        throws,
    })
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    /// Open type argument lists.
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            depth: 0,
        }
    }

    fn error(&self) -> Error {
        Error::InvalidSignature(self.input.to_string())
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, b: u8) -> Result<()> {
        if self.eat(b) {
            Ok(())
        } else {
            Err(self.error())
        }
    }

    fn finish(&self) -> Result<()> {
        if self.at_end() {
            Ok(())
        } else {
            Err(self.error())
        }
    }

    /// Reads an identifier; `allow_slash` admits the package separators of a class name.
    fn identifier(&mut self, allow_slash: bool) -> Result<&'a str> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            let stop = match b {
                b'.' | b';' | b'[' | b'<' | b'>' | b':' => true,
                b'/' => !allow_slash,
                _ => false,
            };
            if stop {
                break;
            }
            // Identifiers may contain multi-byte characters; advance a whole char.
            let ch_len = self.input[self.pos..]
                .chars()
                .next()
                .map(char::len_utf8)
                .unwrap_or(1);
            self.pos += ch_len;
        }
        if self.pos == start {
            return Err(self.error());
        }
        Ok(&self.input[start..self.pos])
    }

    fn type_parameters(&mut self) -> Result<Vec<TypeParameter>> {
        let mut out = Vec::new();
        if !self.eat(b'<') {
            return Ok(out);
        }
        while !self.eat(b'>') {
            let name = self.identifier(false)?.to_string();
            self.expect(b':')?;
            let class_bound = match self.peek() {
                Some(b'L' | b'T' | b'[') => Some(self.reference_type()?),
                _ => None,
            };
            let mut interface_bounds = Vec::new();
            while self.eat(b':') {
                interface_bounds.push(self.reference_type()?);
            }
            out.push(TypeParameter {
                name,
                class_bound,
                interface_bounds,
            });
        }
        if out.is_empty() {
            return Err(self.error());
        }
        Ok(out)
    }

    fn java_type(&mut self) -> Result<TypeSignature> {
        if let Some(base) = self.peek().and_then(BaseType::from_tag) {
            self.pos += 1;
            return Ok(TypeSignature::Base(base));
        }
        self.reference_type()
    }

    fn reference_type(&mut self) -> Result<TypeSignature> {
        match self.peek() {
            Some(b'L') => Ok(TypeSignature::Class(self.class_type()?)),
            Some(b'T') => {
                self.pos += 1;
                let name = self.identifier(false)?.to_string();
                self.expect(b';')?;
                Ok(TypeSignature::TypeVariable(name))
            }
            Some(b'[') => {
                let mut dims = 0;
                while self.eat(b'[') {
                    dims += 1;
                    if dims > MAX_ARRAY_DIMENSIONS {
                        return Err(self.error());
                    }
                }
                let mut ty = self.java_type()?;
                for _ in 0..dims {
                    ty = TypeSignature::Array(Box::new(ty));
                }
                Ok(ty)
            }
            _ => Err(self.error()),
        }
    }

    fn class_type(&mut self) -> Result<ClassTypeSignature> {
        self.expect(b'L')?;
        let mut segments = vec![self.simple_class_type(true)?];
        while self.eat(b'.') {
            segments.push(self.simple_class_type(false)?);
        }
        self.expect(b';')?;
        Ok(ClassTypeSignature { segments })
    }

    fn simple_class_type(&mut self, allow_slash: bool) -> Result<SimpleClassTypeSignature> {
        let name = self.identifier(allow_slash)?.to_string();
        let mut type_arguments = Vec::new();
        if self.eat(b'<') {
            self.depth += 1;
            if self.depth > MAX_TYPE_ARGUMENT_DEPTH {
                return Err(self.error());
            }
            while !self.eat(b'>') {
                let arg = match self.peek() {
                    Some(b'*') => {
                        self.pos += 1;
                        TypeArgument::Any
                    }
                    Some(b'+') => {
                        self.pos += 1;
                        TypeArgument::Extends(self.reference_type()?)
                    }
                    Some(b'-') => {
                        self.pos += 1;
                        TypeArgument::Super(self.reference_type()?)
                    }
                    _ => TypeArgument::Exact(self.reference_type()?),
                };
                type_arguments.push(arg);
            }
            if type_arguments.is_empty() {
                return Err(self.error());
            }
            self.depth -= 1;
        }
        Ok(SimpleClassTypeSignature {
            name,
            type_arguments,
        })
    }
}
