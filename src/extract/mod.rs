// Mon Oct 19 2026 - Alex

pub mod extractor;
pub mod reference;
pub mod resolver;
pub mod stub;

pub use extractor::{extract, ExtractOptions, ReferenceExtractor};
pub use reference::{RawReference, Reference};
pub use resolver::ReferenceResolver;
pub use stub::{is_stub, stub_component, StubConverter};
