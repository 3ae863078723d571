//! # Protocol Primitives
//!
//! Fixed constants shared by the payload builder, the classifier and the
//! renderer. They mirror what the registry expects on the wire and are
//! immutable at runtime.

/// Path of the registration endpoint, relative to the registry base URL.
pub const REGISTER_ENDPOINT: &str = "/api/meshmodels/register";

/// Prefix of every CSV buffer sent in `csv` mode.
pub const CSV_DATA_URI_PREFIX: &str = "data:text/csv;base64,";

/// Extension (without the dot) that marks a directory as a CSV set.
pub const CSV_EXTENSION: &str = "csv";

/// Suffix appended to a directory name once it is bundled.
pub const ARCHIVE_SUFFIX: &str = ".tar.gz";

/// File name reported to the registry for CSV imports.
pub const CSV_FILE_NAME: &str = "model.csv";

/// Public model catalog the user is referred to for unknown entities.
pub const MODEL_CATALOG_URL: &str = "https://meshery.io/catalog/models";

/// Entity type the registry assigns to entities it could not attribute.
///
/// Compared case-insensitively.
pub const UNKNOWN_ENTITY_TYPE: &str = "unknown";

/// Entity type of a failed component. Compared case-insensitively.
pub const COMPONENT_ENTITY_TYPE: &str = "component";

/// Entity type of a failed relationship. Compared case-insensitively.
pub const RELATIONSHIP_ENTITY_TYPE: &str = "relationship";

// =============================================================================
// CSV ROLES
// =============================================================================

/// File stem fragment identifying the relationship CSV.
pub const RELATIONSHIP_CSV_MARKER: &str = "relationship";

/// File stem fragment identifying the component CSV.
pub const COMPONENT_CSV_MARKER: &str = "component";

/// File stem fragment identifying the model CSV.
pub const MODEL_CSV_MARKER: &str = "model";
