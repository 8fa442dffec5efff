// Mon Oct 19 2026 - Alex

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a referencing member uses its target. Every kind owns one bit of
/// [`ReferenceKindMask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferenceKind {
    Extends,
    Implements,
    Instantiate,
    Override,
    VirtualMethodCall,
    SpecialMethodCall,
    StaticMethodCall,
    InterfaceMethodCall,
    GetField,
    PutField,
    GetStatic,
    PutStatic,
}

/// Coarse grouping of reference kinds used by the report writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceType {
    Type,
    Method,
    Field,
}

impl ReferenceType {
    pub fn name(&self) -> &'static str {
        match self {
            ReferenceType::Type => "type",
            ReferenceType::Method => "method",
            ReferenceType::Field => "field",
        }
    }
}

impl ReferenceKind {
    pub const ALL: [ReferenceKind; 12] = [
        ReferenceKind::Extends,
        ReferenceKind::Implements,
        ReferenceKind::Instantiate,
        ReferenceKind::Override,
        ReferenceKind::VirtualMethodCall,
        ReferenceKind::SpecialMethodCall,
        ReferenceKind::StaticMethodCall,
        ReferenceKind::InterfaceMethodCall,
        ReferenceKind::GetField,
        ReferenceKind::PutField,
        ReferenceKind::GetStatic,
        ReferenceKind::PutStatic,
    ];

    pub fn mask(self) -> ReferenceKindMask {
        match self {
            ReferenceKind::Extends => ReferenceKindMask::EXTENDS,
            ReferenceKind::Implements => ReferenceKindMask::IMPLEMENTS,
            ReferenceKind::Instantiate => ReferenceKindMask::INSTANTIATE,
            ReferenceKind::Override => ReferenceKindMask::OVERRIDE,
            ReferenceKind::VirtualMethodCall => ReferenceKindMask::VIRTUAL_METHOD_CALL,
            ReferenceKind::SpecialMethodCall => ReferenceKindMask::SPECIAL_METHOD_CALL,
            ReferenceKind::StaticMethodCall => ReferenceKindMask::STATIC_METHOD_CALL,
            ReferenceKind::InterfaceMethodCall => ReferenceKindMask::INTERFACE_METHOD_CALL,
            ReferenceKind::GetField => ReferenceKindMask::GET_FIELD,
            ReferenceKind::PutField => ReferenceKindMask::PUT_FIELD,
            ReferenceKind::GetStatic => ReferenceKindMask::GET_STATIC,
            ReferenceKind::PutStatic => ReferenceKindMask::PUT_STATIC,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ReferenceKind::Extends => "EXTENDS",
            ReferenceKind::Implements => "IMPLEMENTS",
            ReferenceKind::Instantiate => "INSTANTIATE",
            ReferenceKind::Override => "OVERRIDE",
            ReferenceKind::VirtualMethodCall => "VIRTUAL_METHOD_CALL",
            ReferenceKind::SpecialMethodCall => "SPECIAL_METHOD_CALL",
            ReferenceKind::StaticMethodCall => "STATIC_METHOD_CALL",
            ReferenceKind::InterfaceMethodCall => "INTERFACE_METHOD_CALL",
            ReferenceKind::GetField => "GET_FIELD",
            ReferenceKind::PutField => "PUT_FIELD",
            ReferenceKind::GetStatic => "GET_STATIC",
            ReferenceKind::PutStatic => "PUT_STATIC",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let wanted = s.trim().to_uppercase().replace('-', "_");
        Self::ALL.iter().copied().find(|k| k.name() == wanted)
    }

    pub fn reference_type(self) -> ReferenceType {
        match self {
            ReferenceKind::Extends | ReferenceKind::Implements | ReferenceKind::Instantiate => ReferenceType::Type,
            ReferenceKind::GetField | ReferenceKind::PutField | ReferenceKind::GetStatic | ReferenceKind::PutStatic => {
                ReferenceType::Field
            }
            _ => ReferenceType::Method,
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ReferenceKindMask: u32 {
        const EXTENDS = 0x0001;
        const IMPLEMENTS = 0x0002;
        const INSTANTIATE = 0x0004;
        const OVERRIDE = 0x0008;
        const VIRTUAL_METHOD_CALL = 0x0010;
        const SPECIAL_METHOD_CALL = 0x0020;
        const STATIC_METHOD_CALL = 0x0040;
        const INTERFACE_METHOD_CALL = 0x0080;
        const GET_FIELD = 0x0100;
        const PUT_FIELD = 0x0200;
        const GET_STATIC = 0x0400;
        const PUT_STATIC = 0x0800;

        const METHOD_CALLS = Self::VIRTUAL_METHOD_CALL.bits()
            | Self::SPECIAL_METHOD_CALL.bits()
            | Self::STATIC_METHOD_CALL.bits()
            | Self::INTERFACE_METHOD_CALL.bits();
        const FIELD_ACCESS = Self::GET_FIELD.bits()
            | Self::PUT_FIELD.bits()
            | Self::GET_STATIC.bits()
            | Self::PUT_STATIC.bits();
    }
}

impl ReferenceKindMask {
    pub fn contains_kind(&self, kind: ReferenceKind) -> bool {
        self.contains(kind.mask())
    }

    pub fn kinds(&self) -> Vec<ReferenceKind> {
        ReferenceKind::ALL
            .iter()
            .copied()
            .filter(|k| self.contains_kind(*k))
            .collect()
    }

    /// Parses names such as `EXTENDS`, `method_calls` or `ALL`.
    pub fn parse_names<S: AsRef<str>>(names: &[S]) -> Result<Self, String> {
        let mut mask = Self::empty();
        for name in names {
            let name = name.as_ref();
            mask |= match name.trim().to_uppercase().as_str() {
                "ALL" => Self::all(),
                "METHOD_CALLS" => Self::METHOD_CALLS,
                "FIELD_ACCESS" => Self::FIELD_ACCESS,
                _ => ReferenceKind::parse(name)
                    .ok_or_else(|| format!("Unknown reference kind: {}", name))?
                    .mask(),
            };
        }
        Ok(mask)
    }
}

impl From<ReferenceKind> for ReferenceKindMask {
    fn from(kind: ReferenceKind) -> Self {
        kind.mask()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    Api,
    Private,
    Spi,
    PrivatePermissible,
}

impl Visibility {
    pub fn mask(self) -> VisibilityMask {
        match self {
            Visibility::Api => VisibilityMask::API,
            Visibility::Private => VisibilityMask::PRIVATE,
            Visibility::Spi => VisibilityMask::SPI,
            Visibility::PrivatePermissible => VisibilityMask::PRIVATE_PERMISSIBLE,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Visibility::Api => "API",
            Visibility::Private => "PRIVATE",
            Visibility::Spi => "SPI",
            Visibility::PrivatePermissible => "PRIVATE_PERMISSIBLE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "API" => Some(Visibility::Api),
            "PRIVATE" => Some(Visibility::Private),
            "SPI" => Some(Visibility::Spi),
            "PRIVATE_PERMISSIBLE" => Some(Visibility::PrivatePermissible),
            _ => None,
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct VisibilityMask: u16 {
        const API = 0x0001;
        const PRIVATE = 0x0002;
        const SPI = 0x0004;
        const PRIVATE_PERMISSIBLE = 0x0008;
    }
}

impl VisibilityMask {
    pub fn contains_visibility(&self, visibility: Visibility) -> bool {
        self.contains(visibility.mask())
    }

    pub fn parse_names<S: AsRef<str>>(names: &[S]) -> Result<Self, String> {
        let mut mask = Self::empty();
        for name in names {
            let name = name.as_ref();
            if name.trim().eq_ignore_ascii_case("ALL") {
                mask |= Self::all();
                continue;
            }
            mask |= Visibility::parse(name)
                .ok_or_else(|| format!("Unknown visibility: {}", name))?
                .mask();
        }
        Ok(mask)
    }
}

bitflags! {
    /// Declared usage restrictions. The empty mask means "no restrictions".
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RestrictionMask: u16 {
        const NO_EXTEND = 0x0001;
        const NO_IMPLEMENT = 0x0002;
        const NO_INSTANTIATE = 0x0004;
        const NO_REFERENCE = 0x0008;
        const NO_OVERRIDE = 0x0010;
    }
}

impl RestrictionMask {
    pub const NO_RESTRICTIONS: Self = Self::empty();

    pub fn names(&self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }

    pub fn parse_names<S: AsRef<str>>(names: &[S]) -> Result<Self, String> {
        let mut mask = Self::empty();
        for name in names {
            let name = name.as_ref();
            let upper = name.trim().to_uppercase().replace('-', "_");
            if upper == "ALL" {
                mask |= Self::all();
                continue;
            }
            mask |= Self::from_name(&upper).ok_or_else(|| format!("Unknown restriction: {}", name))?;
        }
        Ok(mask)
    }
}

impl fmt::Display for RestrictionMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "NO_RESTRICTIONS")
        } else {
            write!(f, "{}", self.names().join("|"))
        }
    }
}

/// Visibility and restrictions of a resolved reference target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ApiAnnotations {
    pub visibility: Visibility,
    #[serde(serialize_with = "serialize_restrictions")]
    pub restrictions: RestrictionMask,
}

fn serialize_restrictions<S: serde::Serializer>(mask: &RestrictionMask, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(mask.names())
}

impl ApiAnnotations {
    pub fn new(visibility: Visibility, restrictions: RestrictionMask) -> Self {
        Self {
            visibility,
            restrictions,
        }
    }
}

impl Default for ApiAnnotations {
    fn default() -> Self {
        Self::new(Visibility::Api, RestrictionMask::NO_RESTRICTIONS)
    }
}
