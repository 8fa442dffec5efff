// Mon Oct 19 2026 - Alex

use super::access::AccessFlags;
use super::constant_pool::ConstantPool;
use super::error::ClassFileError;
use super::reader::ByteReader;
use crate::descriptor::TypeDescriptor;

pub const ATTR_CODE: &str = "Code";
pub const ATTR_LINE_NUMBER_TABLE: &str = "LineNumberTable";

#[derive(Debug, Clone)]
pub struct AttributeInfo {
    pub name: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineNumber {
    pub start_pc: u16,
    pub line: u16,
}

#[derive(Debug, Clone)]
pub struct CodeAttribute {
    pub max_stack: u16,
    pub max_locals: u16,
    pub code: Vec<u8>,
    pub line_numbers: Vec<LineNumber>,
}

impl CodeAttribute {
    /// Source line covering `pc`: the entry with the greatest start pc not
    /// past it.
    pub fn line_for(&self, pc: usize) -> Option<u16> {
        self.line_numbers
            .iter()
            .filter(|ln| ln.start_pc as usize <= pc)
            .max_by_key(|ln| ln.start_pc)
            .map(|ln| ln.line)
    }

    pub fn first_line(&self) -> Option<u16> {
        self.line_numbers.iter().map(|ln| ln.line).min()
    }
}

#[derive(Debug, Clone)]
pub struct FieldInfo {
    pub access_flags: AccessFlags,
    pub name: String,
    pub descriptor: String,
}

#[derive(Debug, Clone)]
pub struct MethodInfo {
    pub access_flags: AccessFlags,
    pub name: String,
    pub descriptor: String,
    pub code: Option<CodeAttribute>,
}

impl MethodInfo {
    pub fn is_constructor(&self) -> bool {
        self.name == "<init>"
    }

    pub fn is_class_initializer(&self) -> bool {
        self.name == "<clinit>"
    }
}

/// A decoded class file. Only the parts needed for reference extraction are
/// kept; unknown attributes of members are skipped.
#[derive(Debug, Clone)]
pub struct ClassFile {
    pub minor_version: u16,
    pub major_version: u16,
    pub constant_pool: ConstantPool,
    pub access_flags: AccessFlags,
    pub this_class: String,
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub fields: Vec<FieldInfo>,
    pub methods: Vec<MethodInfo>,
    pub attributes: Vec<AttributeInfo>,
}

impl ClassFile {
    pub fn parse(bytes: &[u8]) -> Result<Self, ClassFileError> {
        let mut reader = ByteReader::new(bytes);
        reader.expect_magic()?;
        let minor_version = reader.read_u2()?;
        let major_version = reader.read_u2()?;
        let constant_pool = ConstantPool::parse(&mut reader)?;

        let access_flags = AccessFlags::from_bits_retain(reader.read_u2()?);
        let this_class = constant_pool.class_name(reader.read_u2()?)?.to_string();
        let super_index = reader.read_u2()?;
        let super_class = if super_index == 0 {
            None
        } else {
            Some(constant_pool.class_name(super_index)?.to_string())
        };

        let interface_count = reader.read_u2()?;
        let mut interfaces = Vec::with_capacity(interface_count as usize);
        for _ in 0..interface_count {
            interfaces.push(constant_pool.class_name(reader.read_u2()?)?.to_string());
        }

        let field_count = reader.read_u2()?;
        let mut fields = Vec::with_capacity(field_count as usize);
        for _ in 0..field_count {
            let access_flags = AccessFlags::from_bits_retain(reader.read_u2()?);
            let name = constant_pool.utf8(reader.read_u2()?)?.to_string();
            let descriptor = constant_pool.utf8(reader.read_u2()?)?.to_string();
            skip_attributes(&mut reader)?;
            fields.push(FieldInfo {
                access_flags,
                name,
                descriptor,
            });
        }

        let method_count = reader.read_u2()?;
        let mut methods = Vec::with_capacity(method_count as usize);
        for _ in 0..method_count {
            methods.push(parse_method(&mut reader, &constant_pool)?);
        }

        let attributes = read_attributes(&mut reader, &constant_pool)?;

        Ok(Self {
            minor_version,
            major_version,
            constant_pool,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            attributes,
        })
    }

    pub fn type_descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::from_internal_name(&self.this_class)
    }

    pub fn super_descriptor(&self) -> Option<TypeDescriptor> {
        self.super_class.as_deref().map(TypeDescriptor::from_internal_name)
    }

    pub fn interface_descriptors(&self) -> Vec<TypeDescriptor> {
        self.interfaces
            .iter()
            .map(|i| TypeDescriptor::from_internal_name(i))
            .collect()
    }

    pub fn is_interface(&self) -> bool {
        self.access_flags.is_interface()
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeInfo> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn find_method(&self, name: &str, descriptor: &str) -> Option<&MethodInfo> {
        self.methods
            .iter()
            .find(|m| m.name == name && m.descriptor == descriptor)
    }
}

fn parse_method(reader: &mut ByteReader<'_>, pool: &ConstantPool) -> Result<MethodInfo, ClassFileError> {
    let access_flags = AccessFlags::from_bits_retain(reader.read_u2()?);
    let name = pool.utf8(reader.read_u2()?)?.to_string();
    let descriptor = pool.utf8(reader.read_u2()?)?.to_string();

    let mut code = None;
    let count = reader.read_u2()?;
    for _ in 0..count {
        let name_index = reader.read_u2()?;
        let length = reader.read_u4()? as usize;
        let data = reader.read_slice(length)?;
        if pool.utf8(name_index)? == ATTR_CODE {
            code = Some(parse_code(data, pool)?);
        }
    }

    Ok(MethodInfo {
        access_flags,
        name,
        descriptor,
        code,
    })
}

fn parse_code(data: &[u8], pool: &ConstantPool) -> Result<CodeAttribute, ClassFileError> {
    let mut reader = ByteReader::new(data);
    let max_stack = reader.read_u2()?;
    let max_locals = reader.read_u2()?;
    let code_length = reader.read_u4()? as usize;
    let code = reader.read_slice(code_length)?.to_vec();

    let handlers = reader.read_u2()? as usize;
    reader.skip(handlers * 8)?;

    let mut line_numbers = Vec::new();
    let count = reader.read_u2()?;
    for _ in 0..count {
        let name_index = reader.read_u2()?;
        let length = reader.read_u4()? as usize;
        let body = reader.read_slice(length)?;
        if pool.utf8(name_index)? != ATTR_LINE_NUMBER_TABLE {
            continue;
        }
        let mut table = ByteReader::new(body);
        let entries = table.read_u2()?;
        for _ in 0..entries {
            line_numbers.push(LineNumber {
                start_pc: table.read_u2()?,
                line: table.read_u2()?,
            });
        }
    }

    Ok(CodeAttribute {
        max_stack,
        max_locals,
        code,
        line_numbers,
    })
}

fn read_attributes(reader: &mut ByteReader<'_>, pool: &ConstantPool) -> Result<Vec<AttributeInfo>, ClassFileError> {
    let count = reader.read_u2()?;
    let mut attributes = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let name = pool.utf8(reader.read_u2()?)?.to_string();
        let length = reader.read_u4()? as usize;
        let data = reader.read_slice(length)?.to_vec();
        attributes.push(AttributeInfo { name, data });
    }
    Ok(attributes)
}

fn skip_attributes(reader: &mut ByteReader<'_>) -> Result<(), ClassFileError> {
    let count = reader.read_u2()?;
    for _ in 0..count {
        reader.read_u2()?;
        let length = reader.read_u4()? as usize;
        reader.skip(length)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classfile::writer::ClassFileBuilder;

    #[test]
    fn test_interface_header() {
        let bytes = ClassFileBuilder::interface("a/b/I").implements("a/b/J").build().unwrap();
        let class = ClassFile::parse(&bytes).unwrap();
        assert!(class.is_interface());
        assert_eq!(class.type_descriptor(), TypeDescriptor::new("a.b", "I"));
        assert_eq!(class.interface_descriptors(), vec![TypeDescriptor::new("a.b", "J")]);
    }

    #[test]
    fn test_truncated_class_file() {
        let bytes = ClassFileBuilder::new("p/A").default_constructor().build().unwrap();
        let result = ClassFile::parse(&bytes[..bytes.len() - 5]);
        assert!(matches!(result, Err(ClassFileError::UnexpectedEof(_))));
    }

    #[test]
    fn test_not_a_class_file() {
        assert!(matches!(
            ClassFile::parse(b"PK\x03\x04 not a class"),
            Err(ClassFileError::InvalidMagic(_))
        ));
    }
}
