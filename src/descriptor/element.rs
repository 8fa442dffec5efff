// Mon Oct 19 2026 - Alex

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Package,
    Type,
    Method,
    Field,
}

impl ElementKind {
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Package => "package",
            ElementKind::Type => "type",
            ElementKind::Method => "method",
            ElementKind::Field => "field",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "package" => Some(ElementKind::Package),
            "type" => Some(ElementKind::Type),
            "method" => Some(ElementKind::Method),
            "field" => Some(ElementKind::Field),
            _ => None,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageDescriptor {
    name: String,
}

impl PackageDescriptor {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_default(&self) -> bool {
        self.name.is_empty()
    }

    pub fn type_named(&self, name: &str) -> TypeDescriptor {
        TypeDescriptor::new(&self.name, name)
    }
}

/// A type identified by its package and its (possibly `$`-nested) name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeDescriptor {
    package: String,
    name: String,
}

impl TypeDescriptor {
    pub fn new(package: &str, name: &str) -> Self {
        Self {
            package: package.to_string(),
            name: name.to_string(),
        }
    }

    /// Builds a descriptor from a JVM internal name such as `a/b/C$D`.
    pub fn from_internal_name(internal: &str) -> Self {
        match internal.rfind('/') {
            Some(idx) => Self::new(&internal[..idx].replace('/', "."), &internal[idx + 1..]),
            None => Self::new("", internal),
        }
    }

    pub fn from_qualified_name(qualified: &str) -> Self {
        match qualified.rfind('.') {
            Some(idx) => Self::new(&qualified[..idx], &qualified[idx + 1..]),
            None => Self::new("", qualified),
        }
    }

    pub fn package_name(&self) -> &str {
        &self.package
    }

    pub fn package(&self) -> PackageDescriptor {
        PackageDescriptor::new(&self.package)
    }

    /// Name within the package, `Outer$Inner` for nested types.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn simple_name(&self) -> &str {
        match self.name.rfind('$') {
            Some(idx) => &self.name[idx + 1..],
            None => &self.name,
        }
    }

    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }

    pub fn internal_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.package.replace('.', "/"), self.name)
        }
    }

    pub fn is_nested(&self) -> bool {
        self.enclosing_type().is_some()
    }

    pub fn enclosing_type(&self) -> Option<TypeDescriptor> {
        let idx = self.name.rfind('$')?;
        if idx == 0 {
            return None;
        }
        Some(Self::new(&self.package, &self.name[..idx]))
    }

    /// True when `self` is declared (at any depth) inside `outer`.
    pub fn is_nested_in(&self, outer: &TypeDescriptor) -> bool {
        self.package == outer.package
            && self.name.len() > outer.name.len() + 1
            && self.name.starts_with(&outer.name)
            && self.name.as_bytes()[outer.name.len()] == b'$'
    }

    pub fn method(&self, name: &str, signature: &str) -> MethodDescriptor {
        MethodDescriptor::new(self.clone(), name, signature)
    }

    pub fn field(&self, name: &str) -> FieldDescriptor {
        FieldDescriptor::new(self.clone(), name)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodDescriptor {
    owner: TypeDescriptor,
    name: String,
    signature: String,
}

impl MethodDescriptor {
    pub fn new(owner: TypeDescriptor, name: &str, signature: &str) -> Self {
        Self {
            owner,
            name: name.to_string(),
            signature: signature.to_string(),
        }
    }

    pub fn owner(&self) -> &TypeDescriptor {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn is_constructor(&self) -> bool {
        self.name == "<init>"
    }

    pub fn is_class_initializer(&self) -> bool {
        self.name == "<clinit>"
    }

    pub fn with_owner(&self, owner: TypeDescriptor) -> Self {
        Self::new(owner, &self.name, &self.signature)
    }

    pub fn same_name_and_signature(&self, other: &MethodDescriptor) -> bool {
        self.name == other.name && self.signature == other.signature
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldDescriptor {
    owner: TypeDescriptor,
    name: String,
}

impl FieldDescriptor {
    pub fn new(owner: TypeDescriptor, name: &str) -> Self {
        Self {
            owner,
            name: name.to_string(),
        }
    }

    pub fn owner(&self) -> &TypeDescriptor {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn with_owner(&self, owner: TypeDescriptor) -> Self {
        Self::new(owner, &self.name)
    }
}

/// Identity of a package, type, method or field.
///
/// Descriptors are plain values: two descriptors naming the same element are
/// equal regardless of which component produced them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementDescriptor {
    Package(PackageDescriptor),
    Type(TypeDescriptor),
    Method(MethodDescriptor),
    Field(FieldDescriptor),
}

impl ElementDescriptor {
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementDescriptor::Package(_) => ElementKind::Package,
            ElementDescriptor::Type(_) => ElementKind::Type,
            ElementDescriptor::Method(_) => ElementKind::Method,
            ElementDescriptor::Field(_) => ElementKind::Field,
        }
    }

    pub fn qualified_name(&self) -> String {
        match self {
            ElementDescriptor::Package(p) => p.name().to_string(),
            ElementDescriptor::Type(t) => t.qualified_name(),
            ElementDescriptor::Method(m) => format!("{}.{}", m.owner().qualified_name(), m.name()),
            ElementDescriptor::Field(f) => format!("{}.{}", f.owner().qualified_name(), f.name()),
        }
    }

    /// Simple name of the element: package name, type name, member name.
    pub fn name(&self) -> &str {
        match self {
            ElementDescriptor::Package(p) => p.name(),
            ElementDescriptor::Type(t) => t.name(),
            ElementDescriptor::Method(m) => m.name(),
            ElementDescriptor::Field(f) => f.name(),
        }
    }

    pub fn signature(&self) -> Option<&str> {
        match self {
            ElementDescriptor::Method(m) => Some(m.signature()),
            _ => None,
        }
    }

    pub fn package_name(&self) -> &str {
        match self {
            ElementDescriptor::Package(p) => p.name(),
            ElementDescriptor::Type(t) => t.package_name(),
            ElementDescriptor::Method(m) => m.owner().package_name(),
            ElementDescriptor::Field(f) => f.owner().package_name(),
        }
    }

    /// The type this element is or belongs to. `None` for packages.
    pub fn type_descriptor(&self) -> Option<&TypeDescriptor> {
        match self {
            ElementDescriptor::Package(_) => None,
            ElementDescriptor::Type(t) => Some(t),
            ElementDescriptor::Method(m) => Some(m.owner()),
            ElementDescriptor::Field(f) => Some(f.owner()),
        }
    }

    pub fn parent(&self) -> Option<ElementDescriptor> {
        match self {
            ElementDescriptor::Package(_) => None,
            ElementDescriptor::Type(t) => Some(match t.enclosing_type() {
                Some(outer) => ElementDescriptor::Type(outer),
                None => ElementDescriptor::Package(t.package()),
            }),
            ElementDescriptor::Method(m) => Some(ElementDescriptor::Type(m.owner().clone())),
            ElementDescriptor::Field(f) => Some(ElementDescriptor::Type(f.owner().clone())),
        }
    }

    /// Containment path from the package down to this element, inclusive.
    pub fn path(&self) -> Vec<ElementDescriptor> {
        let mut path = vec![self.clone()];
        let mut current = self.parent();
        while let Some(element) = current {
            current = element.parent();
            path.push(element);
        }
        path.reverse();
        path
    }

    /// True when `other` is this element or lies inside it.
    pub fn encloses(&self, other: &ElementDescriptor) -> bool {
        if self == other {
            return true;
        }
        let mut current = other.parent();
        while let Some(element) = current {
            if &element == self {
                return true;
            }
            current = element.parent();
        }
        false
    }

    fn sort_key(&self) -> (String, ElementKind, &str) {
        (self.qualified_name(), self.kind(), self.signature().unwrap_or(""))
    }
}

impl PartialOrd for ElementDescriptor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ElementDescriptor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl fmt::Display for ElementDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementDescriptor::Method(m) => write!(f, "{}{}", self.qualified_name(), m.signature()),
            _ => write!(f, "{}", self.qualified_name()),
        }
    }
}

impl From<PackageDescriptor> for ElementDescriptor {
    fn from(p: PackageDescriptor) -> Self {
        ElementDescriptor::Package(p)
    }
}

impl From<TypeDescriptor> for ElementDescriptor {
    fn from(t: TypeDescriptor) -> Self {
        ElementDescriptor::Type(t)
    }
}

impl From<MethodDescriptor> for ElementDescriptor {
    fn from(m: MethodDescriptor) -> Self {
        ElementDescriptor::Method(m)
    }
}

impl From<FieldDescriptor> for ElementDescriptor {
    fn from(f: FieldDescriptor) -> Self {
        ElementDescriptor::Field(f)
    }
}
