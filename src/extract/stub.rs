// Mon Oct 19 2026 - Alex

use crate::classfile::opcode::{NEW, RETURN};
use crate::classfile::{instructions, ClassFile, ClassFileBuilder, ClassFileError, Insn, MethodBuilder};
use crate::model::{Component, MemoryStore, ModelError};

pub const STUB_MARKER: &str = "StubMarker";

/// Rewrites class files down to what reference extraction reads: the class
/// header, members and, per method, the reference-bearing instructions with
/// their line numbers.
pub struct StubConverter;

impl StubConverter {
    pub fn convert(bytes: &[u8]) -> Result<Vec<u8>, ClassFileError> {
        let class = ClassFile::parse(bytes)?;
        let mut builder = ClassFileBuilder::new(&class.this_class)
            .version(class.major_version, class.minor_version)
            .access(class.access_flags);
        builder = match &class.super_class {
            Some(super_class) => builder.super_class(super_class),
            None => builder.no_super_class(),
        };
        for interface in &class.interfaces {
            builder = builder.implements(interface);
        }
        for field in &class.fields {
            builder = builder.field(field.access_flags, &field.name, &field.descriptor);
        }

        for method in &class.methods {
            let mut stub = MethodBuilder::new(method.access_flags, &method.name, &method.descriptor);
            let code = match &method.code {
                Some(code) => code,
                None => {
                    builder = builder.method(stub.without_code());
                    continue;
                }
            };
            stub = stub.max_stack(code.max_stack).max_locals(code.max_locals);

            let mut current_line = code.first_line();
            if let Some(line) = current_line {
                stub = stub.line(line);
            }
            for insn in instructions(&code.code) {
                let insn = insn?;
                let kept = if insn.is_field_access() {
                    let field = class.constant_pool.field_ref(insn.index_operand(&code.code))?;
                    Insn::Field {
                        opcode: insn.opcode,
                        owner: field.owner,
                        name: field.name,
                        descriptor: field.descriptor,
                    }
                } else if insn.is_invocation() {
                    let target = class.constant_pool.method_ref(insn.index_operand(&code.code))?;
                    Insn::Method {
                        opcode: insn.opcode,
                        owner: target.owner,
                        name: target.name,
                        descriptor: target.descriptor,
                        interface: target.interface,
                    }
                } else if insn.opcode == NEW {
                    Insn::Type {
                        opcode: NEW,
                        class: class.constant_pool.class_name(insn.index_operand(&code.code))?.to_string(),
                    }
                } else {
                    continue;
                };

                let line = code.line_for(insn.pc);
                if line.is_some() && line != current_line {
                    current_line = line;
                    if let Some(line) = line {
                        stub = stub.line(line);
                    }
                }
                stub = stub.insn(kept);
            }
            builder = builder.method(stub.op(RETURN));
        }

        builder.attribute(STUB_MARKER, Vec::new()).build()
    }
}

pub fn is_stub(bytes: &[u8]) -> bool {
    ClassFile::parse(bytes)
        .map(|class| class.attribute(STUB_MARKER).is_some())
        .unwrap_or(false)
}

/// Converts every type of `component` into an in-memory component `id` with
/// the same version and API description.
pub fn stub_component(component: &Component, id: &str) -> Result<Component, ModelError> {
    let mut store = MemoryStore::new();
    for ty in component.types()? {
        let bytes = component.read_type(&ty)?;
        let stub = StubConverter::convert(&bytes)
            .map_err(|e| ModelError::Resource(format!("Cannot stub {}: {}", ty, e)))?;
        store.insert(ty, stub);
    }
    log::debug!("Stubbed {} types of {} into {}", store.len(), component.id(), id);

    let mut stubbed = Component::in_memory(id, component.version(), store)
        .with_api_description(component.api_description().clone());
    if component.is_system() {
        stubbed = stubbed.as_system();
    }
    if let Some(host) = component.host() {
        stubbed = stubbed.as_fragment_of(host);
    }
    Ok(stubbed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classfile::opcode::{ALOAD_0, GETSTATIC, ICONST_0, INVOKESPECIAL, INVOKEVIRTUAL, POP, PUTFIELD};
    use crate::classfile::AccessFlags;
    use crate::descriptor::TypeDescriptor;
    use crate::extract::extractor::extract;

    fn sample() -> Vec<u8> {
        ClassFileBuilder::new("p/Worker")
            .super_class("q/Base")
            .implements("q/Task")
            .field(AccessFlags::PRIVATE, "size", "I")
            .default_constructor()
            .method(
                MethodBuilder::new(AccessFlags::PUBLIC, "run", "()V")
                    .line(7)
                    .op(ALOAD_0)
                    .op(ICONST_0)
                    .field(PUTFIELD, "q/Base", "size", "I")
                    .line(8)
                    .instantiate("q/Widget")
                    .op(POP)
                    .field(GETSTATIC, "q/Base", "COUNT", "I")
                    .op(POP)
                    .line(9)
                    .op(ALOAD_0)
                    .invoke(INVOKEVIRTUAL, "q/Base", "go", "()V")
                    .op(RETURN),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_stub_keeps_references_and_lines() {
        let original = sample();
        let stub = StubConverter::convert(&original).unwrap();
        assert!(is_stub(&stub));
        assert!(!is_stub(&original));

        let before = extract(&original).unwrap();
        let after = extract(&stub).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_stub_drops_plain_instructions() {
        let stub = StubConverter::convert(&sample()).unwrap();
        let class = ClassFile::parse(&stub).unwrap();
        let run = class.find_method("run", "()V").unwrap();
        let code = &run.code.as_ref().unwrap().code;
        let opcodes: Vec<u8> = instructions(code).map(|i| i.unwrap().opcode).collect();
        assert_eq!(opcodes, vec![PUTFIELD, NEW, INVOKESPECIAL, GETSTATIC, INVOKEVIRTUAL, RETURN]);
    }

    #[test]
    fn test_stub_component_copies_annotations() {
        let mut description = crate::model::ApiDescription::new();
        description.set_visibility(TypeDescriptor::new("p", "Worker"), crate::model::Visibility::Spi);
        let component = Component::in_memory(
            "orig",
            "2.0.0",
            MemoryStore::new().with_type(TypeDescriptor::new("p", "Worker"), sample()),
        )
        .with_api_description(description);

        let stubbed = stub_component(&component, "orig.stub").unwrap();
        assert_eq!(stubbed.id(), "orig.stub");
        assert_eq!(stubbed.version(), "2.0.0");
        assert!(stubbed.contains_type(&TypeDescriptor::new("p", "Worker")));
        assert_eq!(stubbed.api_description().len(), 1);
    }

    #[test]
    fn test_invalid_bytes_are_not_stubs() {
        assert!(!is_stub(&[0xCA, 0xFE]));
        assert!(StubConverter::convert(&[0, 1, 2, 3]).is_err());
    }
}
