// Mon Oct 19 2026 - Alex

pub mod api_description;
pub mod baseline;
pub mod component;
pub mod error;
pub mod location;
pub mod modifiers;
pub mod store;

pub use api_description::ApiDescription;
pub use baseline::Baseline;
pub use component::Component;
pub use error::ModelError;
pub use location::Location;
pub use modifiers::{
    ApiAnnotations, ReferenceKind, ReferenceKindMask, ReferenceType, RestrictionMask, Visibility,
    VisibilityMask,
};
pub use store::{is_archive, ArchiveStore, DirectoryStore, MemoryStore, PackageListing, TypeStore};
