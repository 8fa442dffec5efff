// Mon Oct 19 2026 - Alex

use super::reference::RawReference;
use crate::classfile::opcode::{
    GETFIELD, GETSTATIC, INVOKEINTERFACE, INVOKESPECIAL, INVOKESTATIC, INVOKEVIRTUAL, NEW, PUTFIELD, PUTSTATIC,
};
use crate::classfile::{instructions, AccessFlags, ClassFile, ClassFileError, MethodInfo};
use crate::descriptor::signature::is_array_internal_name;
use crate::descriptor::{ElementDescriptor, TypeDescriptor};
use crate::model::{ReferenceKind, ReferenceKindMask};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    pub kinds: ReferenceKindMask,
    /// Keep references whose target is the scanned type or one of its nested
    /// types.
    pub include_self_references: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            kinds: ReferenceKindMask::all(),
            include_self_references: false,
        }
    }
}

impl ExtractOptions {
    pub fn with_kinds(mut self, kinds: ReferenceKindMask) -> Self {
        self.kinds = kinds;
        self
    }

    pub fn with_self_references(mut self, include: bool) -> Self {
        self.include_self_references = include;
        self
    }
}

/// Reads the references whose source is a member of one type binary.
///
/// Extraction is a pure function of the bytes, so one extractor may be shared
/// by any number of threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceExtractor {
    options: ExtractOptions,
}

impl ReferenceExtractor {
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    pub fn extract(&self, bytes: &[u8]) -> Result<Vec<RawReference>, ClassFileError> {
        let class = ClassFile::parse(bytes)?;
        self.extract_class(&class)
    }

    pub fn extract_class(&self, class: &ClassFile) -> Result<Vec<RawReference>, ClassFileError> {
        let this = class.type_descriptor();
        let mut sink = Sink {
            this: &this,
            options: &self.options,
            refs: Vec::new(),
        };

        if class.is_interface() {
            for interface in class.interface_descriptors() {
                sink.push(this.clone(), interface, ReferenceKind::Extends, None);
            }
        } else {
            if let Some(super_type) = class.super_descriptor() {
                sink.push(this.clone(), super_type, ReferenceKind::Extends, None);
            }
            for interface in class.interface_descriptors() {
                sink.push(this.clone(), interface, ReferenceKind::Implements, None);
            }
        }

        let super_type = class.super_descriptor();
        for method in &class.methods {
            let source = this.method(&method.name, &method.descriptor);

            if let Some(super_type) = &super_type {
                if !class.is_interface() && is_override_candidate(method) {
                    let line = method.code.as_ref().and_then(|c| c.first_line());
                    sink.push(
                        source.clone(),
                        super_type.method(&method.name, &method.descriptor),
                        ReferenceKind::Override,
                        line,
                    );
                }
            }

            walk_code(class, method, &source.into(), &mut sink)?;
        }

        Ok(sink.refs)
    }
}

/// Methods that can override an inherited declaration. Package-private
/// methods are left out.
fn is_override_candidate(method: &MethodInfo) -> bool {
    let flags = method.access_flags;
    flags.intersects(AccessFlags::PUBLIC | AccessFlags::PROTECTED)
        && !flags.is_static()
        && !flags.is_synthetic_method()
        && !method.is_constructor()
        && !method.is_class_initializer()
}

fn walk_code(class: &ClassFile, method: &MethodInfo, source: &ElementDescriptor, sink: &mut Sink<'_>) -> Result<(), ClassFileError> {
    let code = match &method.code {
        Some(code) => code,
        None => return Ok(()),
    };
    let pool = &class.constant_pool;
    let bytes = &code.code;
    // Classes named by `new` whose constructor call is still to come.
    let mut pending_new: Vec<String> = Vec::new();

    for insn in instructions(bytes) {
        let insn = insn?;
        let line = code.line_for(insn.pc);
        match insn.opcode {
            NEW => {
                let class_name = pool.class_name(insn.index_operand(bytes))?;
                pending_new.push(class_name.to_string());
            }
            GETFIELD | PUTFIELD | GETSTATIC | PUTSTATIC => {
                let field = pool.field_ref(insn.index_operand(bytes))?;
                let kind = match insn.opcode {
                    GETFIELD => ReferenceKind::GetField,
                    PUTFIELD => ReferenceKind::PutField,
                    GETSTATIC => ReferenceKind::GetStatic,
                    _ => ReferenceKind::PutStatic,
                };
                let owner = TypeDescriptor::from_internal_name(&field.owner);
                sink.push(source.clone(), owner.field(&field.name), kind, line);
            }
            INVOKEVIRTUAL | INVOKESPECIAL | INVOKESTATIC | INVOKEINTERFACE => {
                let method_ref = pool.method_ref(insn.index_operand(bytes))?;
                if is_array_internal_name(&method_ref.owner) {
                    continue;
                }
                let owner = TypeDescriptor::from_internal_name(&method_ref.owner);
                let kind = match insn.opcode {
                    INVOKEVIRTUAL => ReferenceKind::VirtualMethodCall,
                    INVOKESPECIAL => ReferenceKind::SpecialMethodCall,
                    INVOKESTATIC => ReferenceKind::StaticMethodCall,
                    _ => ReferenceKind::InterfaceMethodCall,
                };
                sink.push(
                    source.clone(),
                    owner.method(&method_ref.name, &method_ref.descriptor),
                    kind,
                    line,
                );

                if insn.opcode == INVOKESPECIAL && method_ref.name == "<init>" {
                    // A constructor call without a matching `new` is this()/super().
                    if let Some(pos) = pending_new.iter().rposition(|n| *n == method_ref.owner) {
                        pending_new.remove(pos);
                        sink.push(source.clone(), owner, ReferenceKind::Instantiate, line);
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}

struct Sink<'a> {
    this: &'a TypeDescriptor,
    options: &'a ExtractOptions,
    refs: Vec<RawReference>,
}

impl<'a> Sink<'a> {
    fn push(&mut self, source: impl Into<ElementDescriptor>, target: impl Into<ElementDescriptor>, kind: ReferenceKind, line: Option<u16>) {
        if !self.options.kinds.contains_kind(kind) {
            return;
        }
        let target = target.into();
        if !self.options.include_self_references && self.is_self_reference(&target, kind) {
            return;
        }
        self.refs.push(RawReference::new(source, target, kind).with_line(line));
    }

    /// References to the type itself or its nested types. Virtual calls,
    /// instance field accesses and overrides are kept since they may land on
    /// an inherited declaration.
    fn is_self_reference(&self, target: &ElementDescriptor, kind: ReferenceKind) -> bool {
        if matches!(
            kind,
            ReferenceKind::VirtualMethodCall | ReferenceKind::Override | ReferenceKind::GetField | ReferenceKind::PutField
        ) {
            return false;
        }
        match target.type_descriptor() {
            Some(ty) => ty == self.this || ty.is_nested_in(self.this),
            None => false,
        }
    }
}

/// Extracts with the default options: every kind, no self references.
pub fn extract(bytes: &[u8]) -> Result<Vec<RawReference>, ClassFileError> {
    ReferenceExtractor::default().extract(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classfile::opcode::{ALOAD_0, DUP, POP, RETURN};
    use crate::classfile::{AccessFlags, ClassFileBuilder, MethodBuilder};

    fn kinds(refs: &[RawReference]) -> Vec<ReferenceKind> {
        refs.iter().map(|r| r.kind()).collect()
    }

    #[test]
    fn test_supertype_edges() {
        let bytes = ClassFileBuilder::new("p/B")
            .super_class("p/A")
            .implements("p/I")
            .implements("p/J")
            .build()
            .unwrap();
        let refs = extract(&bytes).unwrap();
        assert_eq!(
            kinds(&refs),
            vec![ReferenceKind::Extends, ReferenceKind::Implements, ReferenceKind::Implements]
        );
        assert_eq!(refs[0].target(), &ElementDescriptor::Type(TypeDescriptor::new("p", "A")));
        assert_eq!(refs[0].source(), &ElementDescriptor::Type(TypeDescriptor::new("p", "B")));
    }

    #[test]
    fn test_interface_superinterfaces_extend() {
        let bytes = ClassFileBuilder::interface("p/I").implements("p/J").build().unwrap();
        let refs = extract(&bytes).unwrap();
        assert_eq!(kinds(&refs), vec![ReferenceKind::Extends]);
        assert_eq!(refs[0].target().qualified_name(), "p.J");
    }

    #[test]
    fn test_code_references_and_lines() {
        let bytes = ClassFileBuilder::new("p/User")
            .method(
                MethodBuilder::new(AccessFlags::PUBLIC | AccessFlags::STATIC, "use", "()V")
                    .line(20)
                    .instantiate("q/Widget")
                    .line(21)
                    .invoke(INVOKEVIRTUAL, "q/Widget", "draw", "()V")
                    .invoke(INVOKESTATIC, "q/Util", "help", "()V")
                    .invoke(INVOKEINTERFACE, "q/Shape", "area", "()D")
                    .field(GETSTATIC, "q/Util", "COUNT", "I")
                    .op(POP)
                    .field(PUTFIELD, "q/Widget", "size", "I")
                    .op(RETURN),
            )
            .build()
            .unwrap();
        let refs = extract(&bytes).unwrap();
        assert_eq!(
            kinds(&refs),
            vec![
                ReferenceKind::Extends,
                ReferenceKind::SpecialMethodCall,
                ReferenceKind::Instantiate,
                ReferenceKind::VirtualMethodCall,
                ReferenceKind::StaticMethodCall,
                ReferenceKind::InterfaceMethodCall,
                ReferenceKind::GetStatic,
                ReferenceKind::PutField,
            ]
        );
        assert_eq!(refs[2].line(), Some(20));
        assert_eq!(refs[3].line(), Some(21));
        assert_eq!(refs[3].source().name(), "use");
        assert_eq!(refs[2].target(), &ElementDescriptor::Type(TypeDescriptor::new("q", "Widget")));
    }

    #[test]
    fn test_super_constructor_is_not_instantiation() {
        let bytes = ClassFileBuilder::new("p/B")
            .super_class("p/A")
            .default_constructor()
            .build()
            .unwrap();
        let refs = extract(&bytes).unwrap();
        assert_eq!(kinds(&refs), vec![ReferenceKind::Extends, ReferenceKind::SpecialMethodCall]);
    }

    #[test]
    fn test_override_candidates() {
        let bytes = ClassFileBuilder::new("p/B")
            .super_class("p/A")
            .default_constructor()
            .method(MethodBuilder::new(AccessFlags::PUBLIC, "run", "()V").op(RETURN))
            .method(MethodBuilder::new(AccessFlags::PRIVATE, "hidden", "()V").op(RETURN))
            .method(MethodBuilder::new(AccessFlags::empty(), "local", "()V").op(RETURN))
            .method(MethodBuilder::new(AccessFlags::PUBLIC | AccessFlags::STATIC, "util", "()V").op(RETURN))
            .method(MethodBuilder::new(AccessFlags::PUBLIC | AccessFlags::BRIDGE | AccessFlags::SYNTHETIC, "run", "()Ljava/lang/Object;").op(RETURN))
            .build()
            .unwrap();
        let refs = extract(&bytes).unwrap();
        let overrides: Vec<_> = refs.iter().filter(|r| r.kind() == ReferenceKind::Override).collect();
        assert_eq!(overrides.len(), 1);
        assert_eq!(
            overrides[0].target(),
            &ElementDescriptor::Method(TypeDescriptor::new("p", "A").method("run", "()V"))
        );
    }

    #[test]
    fn test_self_references_skipped_by_default() {
        let builder = ClassFileBuilder::new("p/A").method(
            MethodBuilder::new(AccessFlags::PUBLIC, "go", "()V")
                .invoke(INVOKESTATIC, "p/A", "helper", "()V")
                .instantiate("p/A$Inner")
                .op(ALOAD_0)
                .invoke(INVOKEVIRTUAL, "p/A", "go", "()V")
                .op(RETURN),
        );
        let bytes = builder.build().unwrap();

        let refs = extract(&bytes).unwrap();
        assert_eq!(
            kinds(&refs),
            vec![ReferenceKind::Extends, ReferenceKind::Override, ReferenceKind::VirtualMethodCall]
        );

        let all = ReferenceExtractor::new(ExtractOptions::default().with_self_references(true))
            .extract(&bytes)
            .unwrap();
        assert_eq!(all.len(), 6);
    }

    #[test]
    fn test_kind_mask_limits_output() {
        let bytes = ClassFileBuilder::new("p/B")
            .super_class("p/A")
            .implements("p/I")
            .default_constructor()
            .build()
            .unwrap();
        let extractor = ReferenceExtractor::new(ExtractOptions::default().with_kinds(ReferenceKindMask::IMPLEMENTS));
        let refs = extractor.extract(&bytes).unwrap();
        assert_eq!(kinds(&refs), vec![ReferenceKind::Implements]);
    }

    #[test]
    fn test_array_clone_skipped() {
        let bytes = ClassFileBuilder::new("p/C")
            .method(
                MethodBuilder::new(AccessFlags::PUBLIC | AccessFlags::STATIC, "copy", "([I)[I")
                    .invoke(INVOKEVIRTUAL, "[I", "clone", "()Ljava/lang/Object;")
                    .op(DUP)
                    .op(RETURN),
            )
            .build()
            .unwrap();
        let refs = extract(&bytes).unwrap();
        assert_eq!(kinds(&refs), vec![ReferenceKind::Extends]);
    }

    #[test]
    fn test_malformed_code_is_an_error() {
        let bytes = ClassFileBuilder::new("p/Bad")
            .method(MethodBuilder::new(AccessFlags::PUBLIC | AccessFlags::STATIC, "x", "()V").op(0xd1))
            .build()
            .unwrap();
        assert!(matches!(extract(&bytes), Err(ClassFileError::InvalidOpcode { .. })));
    }
}
