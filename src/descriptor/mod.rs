// Mon Oct 19 2026 - Alex

pub mod element;
pub mod signature;

pub use element::{
    ElementDescriptor, ElementKind, FieldDescriptor, MethodDescriptor, PackageDescriptor,
    TypeDescriptor,
};
pub use signature::{FieldType, MethodSignature, SignatureError};
