// Mon Oct 19 2026 - Alex

use crate::descriptor::SignatureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassFileError {
    #[error("Unexpected end of class file at offset {0}")]
    UnexpectedEof(usize),
    #[error("Invalid class file magic: 0x{0:08x}")]
    InvalidMagic(u32),
    #[error("Unsupported constant pool tag {tag} at index {index}")]
    UnsupportedConstant { tag: u8, index: u16 },
    #[error("Invalid constant pool index {0}")]
    InvalidConstantIndex(u16),
    #[error("Constant pool entry {index} is not a {expected}")]
    ConstantTypeMismatch { index: u16, expected: &'static str },
    #[error("Invalid modified UTF-8 in constant pool entry {0}")]
    InvalidUtf8(u16),
    #[error("Invalid descriptor: {0}")]
    InvalidDescriptor(#[from] SignatureError),
    #[error("Invalid opcode 0x{opcode:02x} at pc {pc}")]
    InvalidOpcode { opcode: u8, pc: usize },
    #[error("Truncated instruction at pc {0}")]
    TruncatedCode(usize),
    #[error("Malformed switch table at pc {0}")]
    MalformedSwitch(usize),
    #[error("Code attribute too large: {0} bytes")]
    CodeTooLarge(usize),
    #[error("Constant pool overflow")]
    ConstantPoolOverflow,
}
