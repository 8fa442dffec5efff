// Mon Oct 19 2026 - Alex

use bitflags::bitflags;

bitflags! {
    /// Class, field and method access flags. Some bits mean different things
    /// depending on the member kind, see the associated aliases.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AccessFlags: u16 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const SUPER = 0x0020;
        const VOLATILE = 0x0040;
        const TRANSIENT = 0x0080;
        const NATIVE = 0x0100;
        const INTERFACE = 0x0200;
        const ABSTRACT = 0x0400;
        const STRICT = 0x0800;
        const SYNTHETIC = 0x1000;
        const ANNOTATION = 0x2000;
        const ENUM = 0x4000;
        const MODULE = 0x8000;
    }
}

impl AccessFlags {
    pub const SYNCHRONIZED: Self = Self::SUPER;
    pub const BRIDGE: Self = Self::VOLATILE;
    pub const VARARGS: Self = Self::TRANSIENT;

    pub fn is_interface(&self) -> bool {
        self.contains(Self::INTERFACE)
    }

    pub fn is_static(&self) -> bool {
        self.contains(Self::STATIC)
    }

    pub fn is_private(&self) -> bool {
        self.contains(Self::PRIVATE)
    }

    /// Method-only: compiler generated bridge or synthetic accessor.
    pub fn is_synthetic_method(&self) -> bool {
        self.intersects(Self::SYNTHETIC | Self::BRIDGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_aliases() {
        let flags = AccessFlags::from_bits_retain(0x0041);
        assert!(flags.contains(AccessFlags::BRIDGE));
        assert!(flags.is_synthetic_method());
        assert!(!AccessFlags::PUBLIC.is_synthetic_method());
    }
}
