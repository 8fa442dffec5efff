// Mon Oct 19 2026 - Alex

use super::access::AccessFlags;
use super::error::ClassFileError;
use super::opcode::{ALOAD_0, INVOKEINTERFACE, INVOKESPECIAL, LDC, LDC_W, NEW, DUP, RETURN};
use super::parser::{ATTR_CODE, ATTR_LINE_NUMBER_TABLE};
use super::reader::MAGIC;
use crate::descriptor::MethodSignature;
use ahash::AHashMap;
use bytes::{BufMut, BytesMut};

pub const JAVA_8: u16 = 52;
pub const OBJECT: &str = "java/lang/Object";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum PoolEntry {
    Utf8(String),
    Integer(i32),
    Class(u16),
    String(u16),
    NameAndType(u16, u16),
    FieldRef(u16, u16),
    MethodRef(u16, u16),
    InterfaceMethodRef(u16, u16),
}

#[derive(Default)]
struct PoolBuilder {
    entries: Vec<PoolEntry>,
    index: AHashMap<PoolEntry, u16>,
    overflow: bool,
}

impl PoolBuilder {
    fn intern(&mut self, entry: PoolEntry) -> u16 {
        if let Some(index) = self.index.get(&entry) {
            return *index;
        }
        let next = self.entries.len() + 1;
        if next >= 0xFFFF {
            self.overflow = true;
            return 0;
        }
        self.entries.push(entry.clone());
        self.index.insert(entry, next as u16);
        next as u16
    }

    fn utf8(&mut self, value: &str) -> u16 {
        self.intern(PoolEntry::Utf8(value.to_string()))
    }

    fn class(&mut self, internal_name: &str) -> u16 {
        let name = self.utf8(internal_name);
        self.intern(PoolEntry::Class(name))
    }

    fn string(&mut self, value: &str) -> u16 {
        let utf8 = self.utf8(value);
        self.intern(PoolEntry::String(utf8))
    }

    fn name_and_type(&mut self, name: &str, descriptor: &str) -> u16 {
        let name = self.utf8(name);
        let descriptor = self.utf8(descriptor);
        self.intern(PoolEntry::NameAndType(name, descriptor))
    }

    fn field_ref(&mut self, owner: &str, name: &str, descriptor: &str) -> u16 {
        let class = self.class(owner);
        let nat = self.name_and_type(name, descriptor);
        self.intern(PoolEntry::FieldRef(class, nat))
    }

    fn method_ref(&mut self, owner: &str, name: &str, descriptor: &str, interface: bool) -> u16 {
        let class = self.class(owner);
        let nat = self.name_and_type(name, descriptor);
        if interface {
            self.intern(PoolEntry::InterfaceMethodRef(class, nat))
        } else {
            self.intern(PoolEntry::MethodRef(class, nat))
        }
    }

    fn write(&self, buf: &mut BytesMut) {
        buf.put_u16((self.entries.len() + 1) as u16);
        for entry in &self.entries {
            match entry {
                PoolEntry::Utf8(value) => {
                    let bytes = encode_modified_utf8(value);
                    buf.put_u8(1);
                    buf.put_u16(bytes.len() as u16);
                    buf.put_slice(&bytes);
                }
                PoolEntry::Integer(value) => {
                    buf.put_u8(3);
                    buf.put_i32(*value);
                }
                PoolEntry::Class(name) => {
                    buf.put_u8(7);
                    buf.put_u16(*name);
                }
                PoolEntry::String(utf8) => {
                    buf.put_u8(8);
                    buf.put_u16(*utf8);
                }
                PoolEntry::FieldRef(class, nat) => {
                    buf.put_u8(9);
                    buf.put_u16(*class);
                    buf.put_u16(*nat);
                }
                PoolEntry::MethodRef(class, nat) => {
                    buf.put_u8(10);
                    buf.put_u16(*class);
                    buf.put_u16(*nat);
                }
                PoolEntry::InterfaceMethodRef(class, nat) => {
                    buf.put_u8(11);
                    buf.put_u16(*class);
                    buf.put_u16(*nat);
                }
                PoolEntry::NameAndType(name, descriptor) => {
                    buf.put_u8(12);
                    buf.put_u16(*name);
                    buf.put_u16(*descriptor);
                }
            }
        }
    }
}

fn encode_modified_utf8(value: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.len());
    for c in value.chars() {
        if c == '\0' {
            out.extend_from_slice(&[0xC0, 0x80]);
        } else if (c as u32) >= 0x10000 {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units).iter() {
                out.push(0xE0 | ((unit >> 12) & 0x0F) as u8);
                out.push(0x80 | ((unit >> 6) & 0x3F) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
        } else {
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
        }
    }
    out
}

/// One symbolic instruction. Pool indices are assigned when the class is
/// built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insn {
    Simple(u8),
    Field {
        opcode: u8,
        owner: String,
        name: String,
        descriptor: String,
    },
    Method {
        opcode: u8,
        owner: String,
        name: String,
        descriptor: String,
        interface: bool,
    },
    Type {
        opcode: u8,
        class: String,
    },
    Ldc(String),
    /// Marks the start of a source line at the current pc.
    Line(u16),
}

#[derive(Debug, Clone)]
pub struct MethodBuilder {
    access: AccessFlags,
    name: String,
    descriptor: String,
    max_stack: u16,
    max_locals: u16,
    code: Option<Vec<Insn>>,
}

impl MethodBuilder {
    pub fn new(access: AccessFlags, name: &str, descriptor: &str) -> Self {
        Self {
            access,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            max_stack: 8,
            max_locals: 8,
            code: Some(Vec::new()),
        }
    }

    /// Abstract and native methods carry no `Code` attribute.
    pub fn without_code(mut self) -> Self {
        self.code = None;
        self
    }

    pub fn max_stack(mut self, max_stack: u16) -> Self {
        self.max_stack = max_stack;
        self
    }

    pub fn max_locals(mut self, max_locals: u16) -> Self {
        self.max_locals = max_locals;
        self
    }

    pub fn insn(mut self, insn: Insn) -> Self {
        self.code.get_or_insert_with(Vec::new).push(insn);
        self
    }

    pub fn op(self, opcode: u8) -> Self {
        self.insn(Insn::Simple(opcode))
    }

    pub fn line(self, line: u16) -> Self {
        self.insn(Insn::Line(line))
    }

    pub fn invoke(self, opcode: u8, owner: &str, name: &str, descriptor: &str) -> Self {
        self.insn(Insn::Method {
            opcode,
            owner: owner.to_string(),
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            interface: opcode == INVOKEINTERFACE,
        })
    }

    pub fn field(self, opcode: u8, owner: &str, name: &str, descriptor: &str) -> Self {
        self.insn(Insn::Field {
            opcode,
            owner: owner.to_string(),
            name: name.to_string(),
            descriptor: descriptor.to_string(),
        })
    }

    /// `new` + `dup` + `invokespecial <init>` for a no-argument constructor.
    pub fn instantiate(self, class: &str) -> Self {
        self.insn(Insn::Type {
            opcode: NEW,
            class: class.to_string(),
        })
        .op(DUP)
        .invoke(INVOKESPECIAL, class, "<init>", "()V")
    }

    pub fn ldc(self, value: &str) -> Self {
        self.insn(Insn::Ldc(value.to_string()))
    }

    fn encode(&self, pool: &mut PoolBuilder, body: &mut BytesMut) -> Result<(), ClassFileError> {
        body.put_u16(self.access.bits());
        body.put_u16(pool.utf8(&self.name));
        body.put_u16(pool.utf8(&self.descriptor));

        let insns = match &self.code {
            Some(insns) => insns,
            None => {
                body.put_u16(0);
                return Ok(());
            }
        };

        let mut code = BytesMut::new();
        let mut lines: Vec<(u16, u16)> = Vec::new();
        for insn in insns {
            match insn {
                Insn::Simple(opcode) => code.put_u8(*opcode),
                Insn::Field {
                    opcode,
                    owner,
                    name,
                    descriptor,
                } => {
                    code.put_u8(*opcode);
                    code.put_u16(pool.field_ref(owner, name, descriptor));
                }
                Insn::Method {
                    opcode,
                    owner,
                    name,
                    descriptor,
                    interface,
                } => {
                    code.put_u8(*opcode);
                    code.put_u16(pool.method_ref(owner, name, descriptor, *interface));
                    if *opcode == INVOKEINTERFACE {
                        let slots = MethodSignature::parse(descriptor)?.argument_slots();
                        code.put_u8(slots.saturating_add(1));
                        code.put_u8(0);
                    }
                }
                Insn::Type { opcode, class } => {
                    code.put_u8(*opcode);
                    code.put_u16(pool.class(class));
                }
                Insn::Ldc(value) => {
                    let index = pool.string(value);
                    if index <= 0xFF {
                        code.put_u8(LDC);
                        code.put_u8(index as u8);
                    } else {
                        code.put_u8(LDC_W);
                        code.put_u16(index);
                    }
                }
                Insn::Line(line) => lines.push((code.len() as u16, *line)),
            }
        }
        if code.len() > 0xFFFF {
            return Err(ClassFileError::CodeTooLarge(code.len()));
        }

        let line_table_len = if lines.is_empty() { 0 } else { 6 + 2 + 4 * lines.len() };
        let attr_len = 2 + 2 + 4 + code.len() + 2 + 2 + line_table_len;

        body.put_u16(1);
        body.put_u16(pool.utf8(ATTR_CODE));
        body.put_u32(attr_len as u32);
        body.put_u16(self.max_stack);
        body.put_u16(self.max_locals);
        body.put_u32(code.len() as u32);
        body.put_slice(&code);
        body.put_u16(0);
        if lines.is_empty() {
            body.put_u16(0);
        } else {
            body.put_u16(1);
            body.put_u16(pool.utf8(ATTR_LINE_NUMBER_TABLE));
            body.put_u32((2 + 4 * lines.len()) as u32);
            body.put_u16(lines.len() as u16);
            for (start_pc, line) in lines {
                body.put_u16(start_pc);
                body.put_u16(line);
            }
        }
        Ok(())
    }
}

/// Assembles a class file from symbolic parts.
#[derive(Debug, Clone)]
pub struct ClassFileBuilder {
    major_version: u16,
    minor_version: u16,
    access: AccessFlags,
    this_class: String,
    super_class: Option<String>,
    interfaces: Vec<String>,
    fields: Vec<(AccessFlags, String, String)>,
    methods: Vec<MethodBuilder>,
    attributes: Vec<(String, Vec<u8>)>,
}

impl ClassFileBuilder {
    pub fn new(this_class: &str) -> Self {
        Self {
            major_version: JAVA_8,
            minor_version: 0,
            access: AccessFlags::PUBLIC | AccessFlags::SUPER,
            this_class: this_class.to_string(),
            super_class: Some(OBJECT.to_string()),
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            attributes: Vec::new(),
        }
    }

    pub fn interface(this_class: &str) -> Self {
        Self::new(this_class).access(AccessFlags::PUBLIC | AccessFlags::INTERFACE | AccessFlags::ABSTRACT)
    }

    pub fn version(mut self, major: u16, minor: u16) -> Self {
        self.major_version = major;
        self.minor_version = minor;
        self
    }

    pub fn access(mut self, access: AccessFlags) -> Self {
        self.access = access;
        self
    }

    pub fn super_class(mut self, super_class: &str) -> Self {
        self.super_class = Some(super_class.to_string());
        self
    }

    pub fn no_super_class(mut self) -> Self {
        self.super_class = None;
        self
    }

    pub fn implements(mut self, interface: &str) -> Self {
        self.interfaces.push(interface.to_string());
        self
    }

    pub fn field(mut self, access: AccessFlags, name: &str, descriptor: &str) -> Self {
        self.fields.push((access, name.to_string(), descriptor.to_string()));
        self
    }

    pub fn method(mut self, method: MethodBuilder) -> Self {
        self.methods.push(method);
        self
    }

    /// `<init>()V` that only calls the superclass constructor.
    pub fn default_constructor(self) -> Self {
        let super_class = self.super_class.clone().unwrap_or_else(|| OBJECT.to_string());
        self.method(
            MethodBuilder::new(AccessFlags::PUBLIC, "<init>", "()V")
                .op(ALOAD_0)
                .invoke(INVOKESPECIAL, &super_class, "<init>", "()V")
                .op(RETURN),
        )
    }

    pub fn attribute(mut self, name: &str, data: Vec<u8>) -> Self {
        self.attributes.push((name.to_string(), data));
        self
    }

    pub fn build(&self) -> Result<Vec<u8>, ClassFileError> {
        let mut pool = PoolBuilder::default();
        let mut body = BytesMut::new();

        body.put_u16(self.access.bits());
        body.put_u16(pool.class(&self.this_class));
        match &self.super_class {
            Some(super_class) => body.put_u16(pool.class(super_class)),
            None => body.put_u16(0),
        }
        body.put_u16(self.interfaces.len() as u16);
        for interface in &self.interfaces {
            body.put_u16(pool.class(interface));
        }

        body.put_u16(self.fields.len() as u16);
        for (access, name, descriptor) in &self.fields {
            body.put_u16(access.bits());
            body.put_u16(pool.utf8(name));
            body.put_u16(pool.utf8(descriptor));
            body.put_u16(0);
        }

        body.put_u16(self.methods.len() as u16);
        for method in &self.methods {
            method.encode(&mut pool, &mut body)?;
        }

        body.put_u16(self.attributes.len() as u16);
        for (name, data) in &self.attributes {
            body.put_u16(pool.utf8(name));
            body.put_u32(data.len() as u32);
            body.put_slice(data);
        }

        if pool.overflow {
            return Err(ClassFileError::ConstantPoolOverflow);
        }

        let mut out = BytesMut::with_capacity(body.len() + 64);
        out.put_u32(MAGIC);
        out.put_u16(self.minor_version);
        out.put_u16(self.major_version);
        pool.write(&mut out);
        out.put_slice(&body);
        Ok(out.to_vec())
    }
}
