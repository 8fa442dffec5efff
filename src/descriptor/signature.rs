// Mon Oct 19 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Malformed descriptor: {0}")]
    Malformed(String),
    #[error("Unexpected descriptor tag '{0}'")]
    UnexpectedTag(char),
}

/// One decoded JVM field type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Primitive(char),
    Object(String),
    Array(Box<FieldType>, usize),
}

impl FieldType {
    /// Operand stack slots taken by a value of this type.
    pub fn slots(&self) -> u8 {
        match self {
            FieldType::Primitive('J') | FieldType::Primitive('D') => 2,
            _ => 1,
        }
    }

    pub fn readable(&self) -> String {
        match self {
            FieldType::Primitive(c) => primitive_name(*c).to_string(),
            FieldType::Object(internal) => {
                let simple = internal.rsplit('/').next().unwrap_or(internal);
                simple.replace('$', ".")
            }
            FieldType::Array(element, dims) => format!("{}{}", element.readable(), "[]".repeat(*dims)),
        }
    }
}

fn primitive_name(c: char) -> &'static str {
    match c {
        'B' => "byte",
        'C' => "char",
        'D' => "double",
        'F' => "float",
        'I' => "int",
        'J' => "long",
        'S' => "short",
        'Z' => "boolean",
        _ => "void",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub parameters: Vec<FieldType>,
    pub return_type: Option<FieldType>,
}

impl MethodSignature {
    pub fn parse(descriptor: &str) -> Result<Self, SignatureError> {
        let mut parser = DescriptorParser::new(descriptor);
        parser.expect(b'(')?;
        let mut parameters = Vec::new();
        while !parser.peek(b')')? {
            parameters.push(parser.parse_type()?);
        }
        parser.expect(b')')?;
        let return_type = if parser.peek(b'V')? {
            parser.pos += 1;
            None
        } else {
            Some(parser.parse_type()?)
        };
        if parser.remaining() != 0 {
            return Err(SignatureError::Malformed(descriptor.to_string()));
        }
        Ok(Self {
            parameters,
            return_type,
        })
    }

    pub fn argument_slots(&self) -> u8 {
        self.parameters.iter().map(|p| p.slots()).sum()
    }
}

pub fn parse_field_type(descriptor: &str) -> Result<FieldType, SignatureError> {
    let mut parser = DescriptorParser::new(descriptor);
    let ty = parser.parse_type()?;
    if parser.remaining() != 0 {
        return Err(SignatureError::Malformed(descriptor.to_string()));
    }
    Ok(ty)
}

/// Array class names (`[Ljava/lang/String;`) as they appear as owners of
/// `clone()` calls.
pub fn is_array_internal_name(internal: &str) -> bool {
    internal.starts_with('[')
}

/// Renders `name` + descriptor the way a Java reader would, `run(int, String)`.
pub fn readable_method(name: &str, descriptor: &str) -> String {
    match MethodSignature::parse(descriptor) {
        Ok(sig) => {
            let params: Vec<String> = sig.parameters.iter().map(|p| p.readable()).collect();
            format!("{}({})", name, params.join(", "))
        }
        Err(_) => format!("{}{}", name, descriptor),
    }
}

struct DescriptorParser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> DescriptorParser<'a> {
    fn new(descriptor: &'a str) -> Self {
        Self {
            bytes: descriptor.as_bytes(),
            pos: 0,
        }
    }

    fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    fn peek(&self, ch: u8) -> Result<bool, SignatureError> {
        match self.bytes.get(self.pos) {
            Some(b) => Ok(*b == ch),
            None => Err(SignatureError::Malformed("unexpected end of descriptor".into())),
        }
    }

    fn expect(&mut self, ch: u8) -> Result<(), SignatureError> {
        if !self.peek(ch)? {
            return Err(SignatureError::Malformed(format!("expected '{}'", ch as char)));
        }
        self.pos += 1;
        Ok(())
    }

    fn parse_type(&mut self) -> Result<FieldType, SignatureError> {
        let start = *self
            .bytes
            .get(self.pos)
            .ok_or_else(|| SignatureError::Malformed("unexpected end of descriptor".into()))?;
        match start {
            b'B' | b'C' | b'D' | b'F' | b'I' | b'J' | b'S' | b'Z' => {
                self.pos += 1;
                Ok(FieldType::Primitive(start as char))
            }
            b'L' => {
                self.pos += 1;
                let begin = self.pos;
                while self.pos < self.bytes.len() && self.bytes[self.pos] != b';' {
                    self.pos += 1;
                }
                if self.pos >= self.bytes.len() {
                    return Err(SignatureError::Malformed("unterminated reference type".into()));
                }
                let name = String::from_utf8_lossy(&self.bytes[begin..self.pos]).into_owned();
                self.pos += 1;
                Ok(FieldType::Object(name))
            }
            b'[' => {
                let mut dims = 0;
                while self.pos < self.bytes.len() && self.bytes[self.pos] == b'[' {
                    dims += 1;
                    self.pos += 1;
                }
                let element = self.parse_type()?;
                Ok(FieldType::Array(Box::new(element), dims))
            }
            other => Err(SignatureError::UnexpectedTag(other as char)),
        }
    }
}
