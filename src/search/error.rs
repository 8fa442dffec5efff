// Mon Oct 19 2026 - Alex

use crate::model::ModelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid criteria: {0}")]
    InvalidCriteria(String),
    #[error("Model error: {0}")]
    Model(#[from] ModelError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}
