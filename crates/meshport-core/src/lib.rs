//! # meshport-core
//!
//! The import pipeline for meshport - THE LOGIC.
//!
//! This crate decides how an artifact is uploaded to a model registry and
//! makes sense of what the registry answers:
//!
//! ```text
//! path / URL ─► input ─► payload ─► (transport, app layer) ─► response ─► grouping ─► report
//! ```
//!
//! ## Architectural Constraints
//!
//! - NO async, NO network dependencies (pure Rust)
//! - Filesystem access only to select the ingestion mode
//! - Classification is total: malformed reply entries are logged and skipped
//! - Output ordering is deterministic

// =============================================================================
// MODULES
// =============================================================================

pub mod grouping;
pub mod input;
pub mod payload;
pub mod primitives;
pub mod record;
pub mod report;
pub mod response;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{ErrorHints, ImportError, UploadType};

// =============================================================================
// RE-EXPORTS: Pipeline
// =============================================================================

pub use grouping::{
    ComponentRow, Edge, EntityFailure, ImportReport, ModelGroup, RelationshipKey, classify,
};
pub use input::{
    ConventionCsvLocator, CsvLocator, CsvSet, FileSource, InputClassifier, InputMode,
    has_csv_files, is_valid_url,
};
pub use payload::{
    ImportBody, ImportRequest, IngestionRequest, Payload, decode_csv_data_uri,
    encode_csv_data_uri,
};
pub use record::{CastError, Field, Record};
pub use report::{Block, Renderer, Table, to_text};
pub use response::{EntityCount, EntityTypeSummary, RegistryResponse};
