// Mon Oct 19 2026 - Alex

//! Components assembled from `ClassFileBuilder` output, shared by the tests.
//!
//! `component.a` provides restricted API, `component.b` uses it.
//! `component.c` holds several overriders of one restricted method.

use crate::classfile::opcode::{
    ACONST_NULL, ALOAD_0, GETSTATIC, ICONST_0, INVOKESTATIC, INVOKEVIRTUAL, POP, PUTSTATIC, RETURN,
};
use crate::classfile::{AccessFlags, ClassFileBuilder, MethodBuilder};
use crate::descriptor::{ElementDescriptor, TypeDescriptor};
use crate::model::{ApiDescription, Baseline, Component, MemoryStore, RestrictionMask, Visibility};
use std::fs;
use std::path::Path;

pub const COMPONENT_A: &str = "component.a";
pub const COMPONENT_B: &str = "component.b";
pub const COMPONENT_C: &str = "component.c";

pub const MALFORMED_TYPE: &str = "Broken";

fn empty_method(access: AccessFlags, name: &str, descriptor: &str) -> MethodBuilder {
    MethodBuilder::new(access, name, descriptor).op(RETURN)
}

fn insert(store: &mut MemoryStore, builder: ClassFileBuilder, internal_name: &str) {
    let bytes = builder.build().expect("fixture class builds");
    store.insert(TypeDescriptor::from_internal_name(internal_name), bytes);
}

pub fn component_a_types() -> MemoryStore {
    let public = AccessFlags::PUBLIC;
    let mut store = MemoryStore::new();

    insert(
        &mut store,
        ClassFileBuilder::new("component/a/A")
            .default_constructor()
            .method(empty_method(public, "noOverride1", "()V"))
            .method(empty_method(public, "noOverride2", "(I)V"))
            .method(empty_method(public, "noOverride3", "(Ljava/lang/String;)V"))
            .method(empty_method(public, "annotated", "()V")),
        "component/a/A",
    );
    insert(
        &mut store,
        ClassFileBuilder::new("component/a/NoExtend").default_constructor(),
        "component/a/NoExtend",
    );
    insert(
        &mut store,
        ClassFileBuilder::new("component/a/NoInstantiate").default_constructor(),
        "component/a/NoInstantiate",
    );
    insert(
        &mut store,
        ClassFileBuilder::interface("component/a/INoImplement").method(
            MethodBuilder::new(public | AccessFlags::ABSTRACT, "work", "()V").without_code(),
        ),
        "component/a/INoImplement",
    );
    insert(
        &mut store,
        ClassFileBuilder::new("component/a/InternalImpl")
            .implements("component/a/INoImplement")
            .default_constructor()
            .method(empty_method(public, "work", "()V")),
        "component/a/InternalImpl",
    );
    insert(
        &mut store,
        ClassFileBuilder::new("component/a/MethodNoReference")
            .field(public | AccessFlags::STATIC, "FIELD", "I")
            .field(public, "value", "I")
            .default_constructor()
            .method(empty_method(public, "instanceMethod", "()V"))
            .method(empty_method(public | AccessFlags::STATIC, "staticMethod", "()V")),
        "component/a/MethodNoReference",
    );
    insert(
        &mut store,
        ClassFileBuilder::new("component/a/internal/Hidden")
            .default_constructor()
            .method(empty_method(public | AccessFlags::STATIC, "help", "()V")),
        "component/a/internal/Hidden",
    );
    store
}

pub fn component_a_description() -> ApiDescription {
    let a = TypeDescriptor::new("component.a", "A");
    let no_reference = TypeDescriptor::new("component.a", "MethodNoReference");
    let mut description = ApiDescription::new();
    description.set_restrictions(a.method("noOverride1", "()V"), RestrictionMask::NO_OVERRIDE);
    description.set_restrictions(a.method("noOverride2", "(I)V"), RestrictionMask::NO_OVERRIDE);
    description.set_restrictions(a.method("noOverride3", "(Ljava/lang/String;)V"), RestrictionMask::NO_OVERRIDE);
    description.set_restrictions(TypeDescriptor::new("component.a", "NoExtend"), RestrictionMask::NO_EXTEND);
    description.set_restrictions(
        TypeDescriptor::new("component.a", "NoInstantiate"),
        RestrictionMask::NO_INSTANTIATE,
    );
    description.set_restrictions(
        TypeDescriptor::new("component.a", "INoImplement"),
        RestrictionMask::NO_IMPLEMENT,
    );
    description.set_restrictions(no_reference.method("instanceMethod", "()V"), RestrictionMask::NO_REFERENCE);
    description.set_restrictions(no_reference.method("staticMethod", "()V"), RestrictionMask::NO_REFERENCE);
    description.set_restrictions(no_reference.field("FIELD"), RestrictionMask::NO_REFERENCE);
    description.set_visibility(
        ElementDescriptor::Package(crate::descriptor::PackageDescriptor::new("component.a.internal")),
        Visibility::Private,
    );
    description
}

pub fn component_a() -> Component {
    Component::in_memory(COMPONENT_A, "1.0.0", component_a_types()).with_api_description(component_a_description())
}

pub fn component_b_types() -> MemoryStore {
    let public = AccessFlags::PUBLIC;
    let mut store = MemoryStore::new();

    insert(
        &mut store,
        ClassFileBuilder::new("component/b/B")
            .super_class("component/a/A")
            .default_constructor()
            .method(empty_method(public, "noOverride1", "()V"))
            .method(empty_method(public, "noOverride2", "(I)V"))
            .method(empty_method(public, "noOverride3", "(Ljava/lang/String;)V"))
            .method(
                MethodBuilder::new(public, "caller", "()V")
                    .line(30)
                    .op(ALOAD_0)
                    .invoke(INVOKEVIRTUAL, "component/a/A", "noOverride1", "()V")
                    .line(31)
                    .op(ALOAD_0)
                    .op(ICONST_0)
                    .invoke(INVOKEVIRTUAL, "component/a/A", "noOverride2", "(I)V")
                    .line(32)
                    .op(ALOAD_0)
                    .op(ACONST_NULL)
                    .invoke(INVOKEVIRTUAL, "component/a/A", "noOverride3", "(Ljava/lang/String;)V")
                    .line(33)
                    .invoke(INVOKESTATIC, "component/a/internal/Hidden", "help", "()V")
                    .op(RETURN),
            ),
        "component/b/B",
    );
    insert(
        &mut store,
        ClassFileBuilder::new("component/b/TestSubclass")
            .super_class("component/a/NoExtend")
            .default_constructor(),
        "component/b/TestSubclass",
    );
    insert(
        &mut store,
        ClassFileBuilder::new("component/b/TestInstantiate")
            .default_constructor()
            .method(
                MethodBuilder::new(public, "make", "()V")
                    .line(12)
                    .instantiate("component/a/NoInstantiate")
                    .op(POP)
                    .op(RETURN),
            ),
        "component/b/TestInstantiate",
    );
    insert(
        &mut store,
        ClassFileBuilder::new("component/b/TestImplement")
            .implements("component/a/INoImplement")
            .default_constructor()
            .method(empty_method(public, "work", "()V")),
        "component/b/TestImplement",
    );
    insert(
        &mut store,
        ClassFileBuilder::new("component/b/TestReference")
            .default_constructor()
            .method(
                MethodBuilder::new(public, "callInstance", "()V")
                    .line(20)
                    .instantiate("component/a/MethodNoReference")
                    .invoke(INVOKEVIRTUAL, "component/a/MethodNoReference", "instanceMethod", "()V")
                    .op(RETURN),
            )
            .method(
                MethodBuilder::new(public | AccessFlags::STATIC, "callStatic", "()V")
                    .line(25)
                    .invoke(INVOKESTATIC, "component/a/MethodNoReference", "staticMethod", "()V")
                    .line(26)
                    .field(GETSTATIC, "component/a/MethodNoReference", "FIELD", "I")
                    .field(PUTSTATIC, "component/a/MethodNoReference", "FIELD", "I")
                    .line(27)
                    .invoke(INVOKESTATIC, "java/lang/System", "gc", "()V")
                    .op(RETURN),
            ),
        "component/b/TestReference",
    );
    store
}

pub fn component_b() -> Component {
    Component::in_memory(COMPONENT_B, "1.0.0", component_b_types())
}

/// `component.b` plus one type whose bytes are not a class file.
pub fn component_b_with_malformed_type() -> Component {
    let mut store = component_b_types();
    store.insert(
        TypeDescriptor::new("component.b", MALFORMED_TYPE),
        vec![0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x00],
    );
    Component::in_memory(COMPONENT_B, "1.0.0", store)
}

pub fn baseline() -> Baseline {
    Baseline::new("fixture")
        .with_component(component_a())
        .with_component(component_b())
}

/// Three subclasses overriding `A.noOverride1()V`, one of them through
/// `component.b.B`, plus a package-private `noOverride2(I)V` that overrides
/// nothing.
pub fn component_c_types() -> MemoryStore {
    let public = AccessFlags::PUBLIC;
    let mut store = MemoryStore::new();

    for (name, super_class) in [
        ("component/c/First", "component/a/A"),
        ("component/c/Second", "component/a/A"),
        ("component/c/Third", "component/b/B"),
    ] {
        insert(
            &mut store,
            ClassFileBuilder::new(name)
                .super_class(super_class)
                .default_constructor()
                .method(empty_method(public, "noOverride1", "()V")),
            name,
        );
    }
    insert(
        &mut store,
        ClassFileBuilder::new("component/c/Local")
            .super_class("component/a/A")
            .default_constructor()
            .method(empty_method(AccessFlags::empty(), "noOverride2", "(I)V")),
        "component/c/Local",
    );
    store
}

pub fn component_c() -> Component {
    Component::in_memory(COMPONENT_C, "1.0.0", component_c_types())
}

/// `baseline()` plus `component.c`.
pub fn overriders_baseline() -> Baseline {
    baseline().with_component(component_c())
}

/// Writes every type of `component` under `dir` as `.class` files.
pub fn write_component(component: &Component, dir: &Path) {
    for ty in component.types().expect("fixture component lists types") {
        let mut path = dir.to_path_buf();
        for segment in ty.package_name().split('.').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        fs::create_dir_all(&path).expect("fixture directory");
        path.push(format!("{}.class", ty.name()));
        let bytes = component.read_type(&ty).expect("fixture type reads");
        fs::write(&path, bytes).expect("fixture class written");
    }
}
