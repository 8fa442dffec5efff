// Mon Oct 19 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Resource error: {0}")]
    Resource(String),
    #[error("Type not found: {0}")]
    TypeNotFound(String),
    #[error("Component disposed: {0}")]
    Disposed(String),
    #[error("Component not found: {0}")]
    ComponentNotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Archive error in {path}: {source}")]
    Archive {
        path: String,
        #[source]
        source: zip::result::ZipError,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid annotation: {0}")]
    InvalidAnnotation(String),
}
