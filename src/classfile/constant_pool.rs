// Mon Oct 19 2026 - Alex

use super::error::ClassFileError;
use super::reader::ByteReader;

pub const TAG_UTF8: u8 = 1;
pub const TAG_INTEGER: u8 = 3;
pub const TAG_FLOAT: u8 = 4;
pub const TAG_LONG: u8 = 5;
pub const TAG_DOUBLE: u8 = 6;
pub const TAG_CLASS: u8 = 7;
pub const TAG_STRING: u8 = 8;
pub const TAG_FIELDREF: u8 = 9;
pub const TAG_METHODREF: u8 = 10;
pub const TAG_INTERFACE_METHODREF: u8 = 11;
pub const TAG_NAME_AND_TYPE: u8 = 12;
pub const TAG_METHOD_HANDLE: u8 = 15;
pub const TAG_METHOD_TYPE: u8 = 16;
pub const TAG_DYNAMIC: u8 = 17;
pub const TAG_INVOKE_DYNAMIC: u8 = 18;
pub const TAG_MODULE: u8 = 19;
pub const TAG_PACKAGE: u8 = 20;

#[derive(Debug, Clone)]
pub enum Constant {
    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class { name_index: u16 },
    String { string_index: u16 },
    FieldRef { class_index: u16, name_and_type_index: u16 },
    MethodRef { class_index: u16, name_and_type_index: u16 },
    InterfaceMethodRef { class_index: u16, name_and_type_index: u16 },
    NameAndType { name_index: u16, descriptor_index: u16 },
    MethodHandle { kind: u8, reference_index: u16 },
    MethodType { descriptor_index: u16 },
    Dynamic { bootstrap_index: u16, name_and_type_index: u16 },
    InvokeDynamic { bootstrap_index: u16, name_and_type_index: u16 },
    Module { name_index: u16 },
    Package { name_index: u16 },
    /// Slot 0 and the second slot of a Long/Double.
    Unusable,
}

/// A symbolic field or method reference recovered from the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRef {
    pub owner: String,
    pub name: String,
    pub descriptor: String,
    pub interface: bool,
}

#[derive(Debug, Clone)]
pub struct ConstantPool {
    entries: Vec<Constant>,
}

impl ConstantPool {
    pub fn parse(reader: &mut ByteReader<'_>) -> Result<Self, ClassFileError> {
        let count = reader.read_u2()? as usize;
        let mut entries = Vec::with_capacity(count.max(1));
        entries.push(Constant::Unusable);

        while entries.len() < count {
            let index = entries.len() as u16;
            let tag = reader.read_u1()?;
            let entry = match tag {
                TAG_UTF8 => {
                    let length = reader.read_u2()? as usize;
                    let bytes = reader.read_slice(length)?;
                    Constant::Utf8(decode_modified_utf8(bytes).ok_or(ClassFileError::InvalidUtf8(index))?)
                }
                TAG_INTEGER => Constant::Integer(reader.read_i4()?),
                TAG_FLOAT => Constant::Float(f32::from_bits(reader.read_u4()?)),
                TAG_LONG => Constant::Long(reader.read_u8()? as i64),
                TAG_DOUBLE => Constant::Double(f64::from_bits(reader.read_u8()?)),
                TAG_CLASS => Constant::Class {
                    name_index: reader.read_u2()?,
                },
                TAG_STRING => Constant::String {
                    string_index: reader.read_u2()?,
                },
                TAG_FIELDREF => Constant::FieldRef {
                    class_index: reader.read_u2()?,
                    name_and_type_index: reader.read_u2()?,
                },
                TAG_METHODREF => Constant::MethodRef {
                    class_index: reader.read_u2()?,
                    name_and_type_index: reader.read_u2()?,
                },
                TAG_INTERFACE_METHODREF => Constant::InterfaceMethodRef {
                    class_index: reader.read_u2()?,
                    name_and_type_index: reader.read_u2()?,
                },
                TAG_NAME_AND_TYPE => Constant::NameAndType {
                    name_index: reader.read_u2()?,
                    descriptor_index: reader.read_u2()?,
                },
                TAG_METHOD_HANDLE => Constant::MethodHandle {
                    kind: reader.read_u1()?,
                    reference_index: reader.read_u2()?,
                },
                TAG_METHOD_TYPE => Constant::MethodType {
                    descriptor_index: reader.read_u2()?,
                },
                TAG_DYNAMIC => Constant::Dynamic {
                    bootstrap_index: reader.read_u2()?,
                    name_and_type_index: reader.read_u2()?,
                },
                TAG_INVOKE_DYNAMIC => Constant::InvokeDynamic {
                    bootstrap_index: reader.read_u2()?,
                    name_and_type_index: reader.read_u2()?,
                },
                TAG_MODULE => Constant::Module {
                    name_index: reader.read_u2()?,
                },
                TAG_PACKAGE => Constant::Package {
                    name_index: reader.read_u2()?,
                },
                other => return Err(ClassFileError::UnsupportedConstant { tag: other, index }),
            };

            let wide = matches!(entry, Constant::Long(_) | Constant::Double(_));
            entries.push(entry);
            if wide {
                entries.push(Constant::Unusable);
            }
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }

    pub fn get(&self, index: u16) -> Result<&Constant, ClassFileError> {
        match self.entries.get(index as usize) {
            Some(Constant::Unusable) | None => Err(ClassFileError::InvalidConstantIndex(index)),
            Some(entry) => Ok(entry),
        }
    }

    pub fn utf8(&self, index: u16) -> Result<&str, ClassFileError> {
        match self.get(index)? {
            Constant::Utf8(value) => Ok(value.as_str()),
            _ => Err(ClassFileError::ConstantTypeMismatch { index, expected: "Utf8" }),
        }
    }

    pub fn class_name(&self, index: u16) -> Result<&str, ClassFileError> {
        match self.get(index)? {
            Constant::Class { name_index } => self.utf8(*name_index),
            _ => Err(ClassFileError::ConstantTypeMismatch { index, expected: "Class" }),
        }
    }

    pub fn string(&self, index: u16) -> Result<&str, ClassFileError> {
        match self.get(index)? {
            Constant::String { string_index } => self.utf8(*string_index),
            _ => Err(ClassFileError::ConstantTypeMismatch { index, expected: "String" }),
        }
    }

    pub fn name_and_type(&self, index: u16) -> Result<(&str, &str), ClassFileError> {
        match self.get(index)? {
            Constant::NameAndType {
                name_index,
                descriptor_index,
            } => Ok((self.utf8(*name_index)?, self.utf8(*descriptor_index)?)),
            _ => Err(ClassFileError::ConstantTypeMismatch { index, expected: "NameAndType" }),
        }
    }

    pub fn field_ref(&self, index: u16) -> Result<MemberRef, ClassFileError> {
        match self.get(index)? {
            Constant::FieldRef {
                class_index,
                name_and_type_index,
            } => self.member_ref(*class_index, *name_and_type_index, false),
            _ => Err(ClassFileError::ConstantTypeMismatch { index, expected: "Fieldref" }),
        }
    }

    /// Methodref or InterfaceMethodref; `invokestatic` and `invokespecial`
    /// may name either.
    pub fn method_ref(&self, index: u16) -> Result<MemberRef, ClassFileError> {
        match self.get(index)? {
            Constant::MethodRef {
                class_index,
                name_and_type_index,
            } => self.member_ref(*class_index, *name_and_type_index, false),
            Constant::InterfaceMethodRef {
                class_index,
                name_and_type_index,
            } => self.member_ref(*class_index, *name_and_type_index, true),
            _ => Err(ClassFileError::ConstantTypeMismatch { index, expected: "Methodref" }),
        }
    }

    fn member_ref(&self, class_index: u16, nat_index: u16, interface: bool) -> Result<MemberRef, ClassFileError> {
        let owner = self.class_name(class_index)?;
        let (name, descriptor) = self.name_and_type(nat_index)?;
        Ok(MemberRef {
            owner: owner.to_string(),
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            interface,
        })
    }
}

/// Decodes the JVM's modified UTF-8: `0xC0 0x80` for NUL and supplementary
/// characters as surrogate pairs.
pub fn decode_modified_utf8(bytes: &[u8]) -> Option<String> {
    if let Ok(s) = std::str::from_utf8(bytes) {
        return Some(s.to_string());
    }

    let mut units = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b & 0x80 == 0 {
            units.push(b as u16);
            i += 1;
        } else if b & 0xE0 == 0xC0 {
            let b2 = *bytes.get(i + 1)?;
            units.push((((b & 0x1F) as u16) << 6) | (b2 & 0x3F) as u16);
            i += 2;
        } else if b & 0xF0 == 0xE0 {
            let b2 = *bytes.get(i + 1)?;
            let b3 = *bytes.get(i + 2)?;
            units.push((((b & 0x0F) as u16) << 12) | (((b2 & 0x3F) as u16) << 6) | (b3 & 0x3F) as u16);
            i += 3;
        } else {
            return None;
        }
    }
    String::from_utf16(&units).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_bytes() -> Vec<u8> {
        let mut data = vec![0x00, 0x07];
        // #1 Utf8 "p/A"
        data.extend_from_slice(&[TAG_UTF8, 0x00, 0x03, b'p', b'/', b'A']);
        // #2 Class #1
        data.extend_from_slice(&[TAG_CLASS, 0x00, 0x01]);
        // #3 Long (takes #3 and #4)
        data.extend_from_slice(&[TAG_LONG, 0, 0, 0, 0, 0, 0, 0, 42]);
        // #5 Utf8 "f"
        data.extend_from_slice(&[TAG_UTF8, 0x00, 0x01, b'f']);
        // #6 Utf8 "I"
        data.extend_from_slice(&[TAG_UTF8, 0x00, 0x01, b'I']);
        data
    }

    #[test]
    fn test_parse_pool_with_wide_entries() {
        let data = pool_bytes();
        let mut reader = ByteReader::new(&data);
        let pool = ConstantPool::parse(&mut reader).unwrap();
        assert_eq!(pool.len(), 7);
        assert_eq!(pool.class_name(2).unwrap(), "p/A");
        assert!(matches!(pool.get(3).unwrap(), Constant::Long(42)));
        assert!(matches!(pool.get(4), Err(ClassFileError::InvalidConstantIndex(4))));
        assert_eq!(pool.utf8(6).unwrap(), "I");
    }

    #[test]
    fn test_type_mismatch() {
        let data = pool_bytes();
        let mut reader = ByteReader::new(&data);
        let pool = ConstantPool::parse(&mut reader).unwrap();
        assert!(matches!(
            pool.class_name(1),
            Err(ClassFileError::ConstantTypeMismatch { index: 1, .. })
        ));
        assert!(pool.field_ref(2).is_err());
    }

    #[test]
    fn test_unsupported_tag() {
        let data = [0x00, 0x02, 0x02, 0x00];
        let mut reader = ByteReader::new(&data);
        assert!(matches!(
            ConstantPool::parse(&mut reader),
            Err(ClassFileError::UnsupportedConstant { tag: 2, index: 1 })
        ));
    }

    #[test]
    fn test_modified_utf8_nul() {
        assert_eq!(decode_modified_utf8(&[b'a', 0xC0, 0x80, b'b']).unwrap(), "a\u{0}b");
        assert!(decode_modified_utf8(&[0xFF]).is_none());
    }
}
