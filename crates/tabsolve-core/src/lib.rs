//! tabsolve-core - Document model, configuration and table storage.

pub mod config;
pub mod document;
pub mod error;
pub mod storage;

pub use config::Config;
pub use document::Document;
pub use error::{Result, TabsolveError};

pub use tabsolve_engine::engine::{CellRef, SolveReport, SolveStatus};
