// Mon Oct 19 2026 - Alex

use super::error::ClassFileError;
use super::reader::ByteReader;

pub const ACONST_NULL: u8 = 0x01;
pub const ICONST_0: u8 = 0x03;
pub const LDC: u8 = 0x12;
pub const LDC_W: u8 = 0x13;
pub const ALOAD_0: u8 = 0x2a;
pub const POP: u8 = 0x57;
pub const DUP: u8 = 0x59;
pub const IINC: u8 = 0x84;
pub const TABLESWITCH: u8 = 0xaa;
pub const LOOKUPSWITCH: u8 = 0xab;
pub const IRETURN: u8 = 0xac;
pub const ARETURN: u8 = 0xb0;
pub const RETURN: u8 = 0xb1;
pub const GETSTATIC: u8 = 0xb2;
pub const PUTSTATIC: u8 = 0xb3;
pub const GETFIELD: u8 = 0xb4;
pub const PUTFIELD: u8 = 0xb5;
pub const INVOKEVIRTUAL: u8 = 0xb6;
pub const INVOKESPECIAL: u8 = 0xb7;
pub const INVOKESTATIC: u8 = 0xb8;
pub const INVOKEINTERFACE: u8 = 0xb9;
pub const INVOKEDYNAMIC: u8 = 0xba;
pub const NEW: u8 = 0xbb;
pub const ANEWARRAY: u8 = 0xbd;
pub const CHECKCAST: u8 = 0xc0;
pub const INSTANCEOF: u8 = 0xc1;
pub const WIDE: u8 = 0xc4;
pub const MULTIANEWARRAY: u8 = 0xc5;

/// Fixed instruction lengths, 0 for variable-length and invalid opcodes.
fn fixed_length(opcode: u8) -> Option<usize> {
    let len = match opcode {
        0x00..=0x0f => 1,
        0x10 => 2,
        0x11 => 3,
        LDC => 2,
        LDC_W | 0x14 => 3,
        0x15..=0x19 => 2,
        0x1a..=0x35 => 1,
        0x36..=0x3a => 2,
        0x3b..=0x83 => 1,
        IINC => 3,
        0x85..=0x98 => 1,
        0x99..=0xa8 => 3,
        0xa9 => 2,
        TABLESWITCH | LOOKUPSWITCH | WIDE => 0,
        0xac..=0xb1 => 1,
        GETSTATIC..=INVOKESTATIC => 3,
        INVOKEINTERFACE | INVOKEDYNAMIC => 5,
        NEW => 3,
        0xbc => 2,
        ANEWARRAY => 3,
        0xbe | 0xbf => 1,
        CHECKCAST | INSTANCEOF => 3,
        0xc2 | 0xc3 => 1,
        MULTIANEWARRAY => 4,
        0xc6 | 0xc7 => 3,
        0xc8 | 0xc9 => 5,
        0xca | 0xfe | 0xff => 1,
        _ => return None,
    };
    Some(len)
}

/// Length in bytes of the instruction starting at `pc`.
pub fn instruction_length(code: &[u8], pc: usize) -> Result<usize, ClassFileError> {
    let opcode = *code.get(pc).ok_or(ClassFileError::TruncatedCode(pc))?;
    let len = match fixed_length(opcode) {
        None => return Err(ClassFileError::InvalidOpcode { opcode, pc }),
        Some(0) => variable_length(code, pc, opcode)?,
        Some(len) => len,
    };
    if pc + len > code.len() {
        return Err(ClassFileError::TruncatedCode(pc));
    }
    Ok(len)
}

fn variable_length(code: &[u8], pc: usize, opcode: u8) -> Result<usize, ClassFileError> {
    if opcode == WIDE {
        let modified = *code.get(pc + 1).ok_or(ClassFileError::TruncatedCode(pc))?;
        return Ok(if modified == IINC { 6 } else { 4 });
    }

    let pad = (4 - (pc + 1) % 4) % 4;
    let mut reader = ByteReader::at(code, pc + 1 + pad);
    let truncated = |_| ClassFileError::TruncatedCode(pc);
    reader.read_i4().map_err(truncated)?;

    if opcode == TABLESWITCH {
        let low = reader.read_i4().map_err(truncated)? as i64;
        let high = reader.read_i4().map_err(truncated)? as i64;
        if high < low {
            return Err(ClassFileError::MalformedSwitch(pc));
        }
        Ok(1 + pad + 12 + ((high - low + 1) as usize) * 4)
    } else {
        let pairs = reader.read_i4().map_err(truncated)?;
        if pairs < 0 {
            return Err(ClassFileError::MalformedSwitch(pc));
        }
        Ok(1 + pad + 8 + (pairs as usize) * 8)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub pc: usize,
    pub opcode: u8,
    pub length: usize,
}

impl Instruction {
    /// The u2 operand following the opcode (constant pool index for field,
    /// method and type instructions).
    pub fn index_operand(&self, code: &[u8]) -> u16 {
        u16::from_be_bytes([code[self.pc + 1], code[self.pc + 2]])
    }

    pub fn is_field_access(&self) -> bool {
        (GETSTATIC..=PUTFIELD).contains(&self.opcode)
    }

    pub fn is_invocation(&self) -> bool {
        (INVOKEVIRTUAL..=INVOKEINTERFACE).contains(&self.opcode)
    }
}

/// Walks a `Code` array one instruction at a time. Stops after the first
/// error.
pub struct Instructions<'a> {
    code: &'a [u8],
    pc: usize,
    failed: bool,
}

impl<'a> Iterator for Instructions<'a> {
    type Item = Result<Instruction, ClassFileError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pc >= self.code.len() {
            return None;
        }
        match instruction_length(self.code, self.pc) {
            Ok(length) => {
                let insn = Instruction {
                    pc: self.pc,
                    opcode: self.code[self.pc],
                    length,
                };
                self.pc += length;
                Some(Ok(insn))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

pub fn instructions(code: &[u8]) -> Instructions<'_> {
    Instructions {
        code,
        pc: 0,
        failed: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_lengths() {
        let code = [ALOAD_0, INVOKEVIRTUAL, 0x00, 0x01, RETURN];
        let pcs: Vec<usize> = instructions(&code).map(|i| i.unwrap().pc).collect();
        assert_eq!(pcs, vec![0, 1, 4]);
    }

    #[test]
    fn test_tableswitch_padding() {
        // pc 0 = iconst_0, pc 1 = tableswitch, pad to 4
        let mut code = vec![ICONST_0, TABLESWITCH, 0, 0];
        code.extend_from_slice(&0i32.to_be_bytes());
        code.extend_from_slice(&1i32.to_be_bytes());
        code.extend_from_slice(&2i32.to_be_bytes());
        for _ in 0..2 {
            code.extend_from_slice(&0i32.to_be_bytes());
        }
        code.push(RETURN);
        assert_eq!(instruction_length(&code, 1).unwrap(), 3 + 12 + 8);
        assert_eq!(instructions(&code).count(), 3);
    }

    #[test]
    fn test_lookupswitch() {
        // pc 0 = lookupswitch, pad 3
        let mut code = vec![LOOKUPSWITCH, 0, 0, 0];
        code.extend_from_slice(&0i32.to_be_bytes());
        code.extend_from_slice(&1i32.to_be_bytes());
        code.extend_from_slice(&7i32.to_be_bytes());
        code.extend_from_slice(&0i32.to_be_bytes());
        assert_eq!(instruction_length(&code, 0).unwrap(), 4 + 8 + 8);
    }

    #[test]
    fn test_wide() {
        let code = [WIDE, IINC, 0, 1, 0, 1, WIDE, 0x15, 0, 1];
        assert_eq!(instruction_length(&code, 0).unwrap(), 6);
        assert_eq!(instruction_length(&code, 6).unwrap(), 4);
    }

    #[test]
    fn test_invalid_and_truncated() {
        assert!(matches!(
            instruction_length(&[0xd0], 0),
            Err(ClassFileError::InvalidOpcode { opcode: 0xd0, pc: 0 })
        ));
        assert!(matches!(
            instruction_length(&[INVOKESTATIC, 0x00], 0),
            Err(ClassFileError::TruncatedCode(0))
        ));
        let results: Vec<_> = instructions(&[RETURN, 0xd0, RETURN]).collect();
        assert_eq!(results.len(), 2);
        assert!(results[1].is_err());
    }
}
