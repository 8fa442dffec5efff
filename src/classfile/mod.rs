// Mon Oct 19 2026 - Alex

pub mod access;
pub mod constant_pool;
pub mod error;
pub mod opcode;
pub mod parser;
pub mod reader;
pub mod writer;

pub use access::AccessFlags;
pub use constant_pool::{Constant, ConstantPool, MemberRef};
pub use error::ClassFileError;
pub use opcode::{instructions, Instruction};
pub use parser::{ClassFile, CodeAttribute, FieldInfo, LineNumber, MethodInfo};
pub use writer::{ClassFileBuilder, Insn, MethodBuilder};
