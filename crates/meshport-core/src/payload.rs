//! # Payload Builder
//!
//! Builds the single upload request sent to the registry.
//!
//! An [`IngestionRequest`] is a tagged union over the three upload kinds, so a
//! request can only ever carry the fields that belong to its kind. The wire
//! form ([`ImportRequest`]) is derived from it on demand:
//!
//! | Kind        | `importBody` fields                                   |
//! |-------------|-------------------------------------------------------|
//! | `file`      | `modelFile` (base64 of the raw bytes), `fileName`      |
//! | `csv`       | `modelCsv`, `componentCsv`, `relationshipCsv`, `fileName` |
//! | `urlImport` | `url`, `fileName` (empty), optional `model`            |
//!
//! Building a request performs no I/O.

use crate::primitives::{CSV_DATA_URI_PREFIX, CSV_FILE_NAME};
use crate::{ImportError, UploadType};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

// =============================================================================
// INGESTION REQUEST
// =============================================================================

/// Mode-specific content of a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Model file or tar.gz bundle, carried unmodified.
    File {
        /// Raw artifact bytes.
        bytes: Vec<u8>,
        /// Name reported to the registry.
        file_name: String,
    },
    /// CSV triplet. Empty buffers are still sent.
    Csv {
        /// Model CSV contents.
        model: Vec<u8>,
        /// Component CSV contents.
        component: Vec<u8>,
        /// Relationship CSV contents.
        relationship: Vec<u8>,
    },
    /// Remote location fetched by the registry.
    Url {
        /// Source URL.
        url: String,
        /// Pre-parsed structured model, if one was supplied.
        model: Option<serde_json::Value>,
    },
}

/// One upload to the registry. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestionRequest {
    payload: Payload,
    register: bool,
}

impl IngestionRequest {
    /// Request for a model file or bundle.
    #[must_use]
    pub fn file(bytes: Vec<u8>, file_name: impl Into<String>, register: bool) -> Self {
        Self {
            payload: Payload::File {
                bytes,
                file_name: file_name.into(),
            },
            register,
        }
    }

    /// Request for a CSV triplet.
    #[must_use]
    pub fn csv(model: Vec<u8>, component: Vec<u8>, relationship: Vec<u8>, register: bool) -> Self {
        Self {
            payload: Payload::Csv {
                model,
                component,
                relationship,
            },
            register,
        }
    }

    /// Request for a remote URL.
    #[must_use]
    pub fn url(url: impl Into<String>, register: bool) -> Self {
        Self {
            payload: Payload::Url {
                url: url.into(),
                model: None,
            },
            register,
        }
    }

    /// Request for a remote URL that also carries a pre-parsed model.
    ///
    /// # Errors
    /// `ImportError::Decode` if `model` is not valid JSON. Nothing is sent
    /// in that case.
    pub fn url_with_model(
        url: impl Into<String>,
        model: &[u8],
        register: bool,
    ) -> Result<Self, ImportError> {
        let model: serde_json::Value =
            serde_json::from_slice(model).map_err(|e| ImportError::decode("model", e))?;

        Ok(Self {
            payload: Payload::Url {
                url: url.into(),
                model: Some(model),
            },
            register,
        })
    }

    /// Mode-specific content.
    #[must_use]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Whether the registry should register what it imports.
    #[must_use]
    pub fn register(&self) -> bool {
        self.register
    }

    /// Upload discriminator of this request.
    #[must_use]
    pub fn upload_type(&self) -> UploadType {
        match self.payload {
            Payload::File { .. } => UploadType::File,
            Payload::Csv { .. } => UploadType::Csv,
            Payload::Url { .. } => UploadType::UrlImport,
        }
    }

    /// File name reported to the registry (empty for URL imports).
    #[must_use]
    pub fn file_name(&self) -> &str {
        match &self.payload {
            Payload::File { file_name, .. } => file_name,
            Payload::Csv { .. } => CSV_FILE_NAME,
            Payload::Url { .. } => "",
        }
    }

    /// Wire representation of the request.
    #[must_use]
    pub fn to_wire(&self) -> ImportRequest {
        let mut body = ImportBody {
            file_name: self.file_name().to_string(),
            ..ImportBody::default()
        };

        match &self.payload {
            Payload::File { bytes, .. } => {
                body.model_file = Some(STANDARD.encode(bytes));
            }
            Payload::Csv {
                model,
                component,
                relationship,
            } => {
                body.model_csv = Some(encode_csv_data_uri(model));
                body.component_csv = Some(encode_csv_data_uri(component));
                body.relationship_csv = Some(encode_csv_data_uri(relationship));
            }
            Payload::Url { url, model } => {
                body.url = Some(url.clone());
                body.model.clone_from(model);
            }
        }

        ImportRequest {
            upload_type: self.upload_type(),
            register: self.register,
            import_body: body,
        }
    }

    /// JSON body of the request.
    pub fn to_json(&self) -> Result<Vec<u8>, ImportError> {
        serde_json::to_vec(&self.to_wire()).map_err(|e| ImportError::decode("import request", e))
    }
}

// =============================================================================
// WIRE FORMAT
// =============================================================================

/// JSON body of `POST /api/meshmodels/register`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    /// Upload discriminator.
    pub upload_type: UploadType,
    /// Register flag, passed through verbatim.
    pub register: bool,
    /// Mode-specific body.
    pub import_body: ImportBody,
}

/// `importBody` of an [`ImportRequest`]. Absent fields are not serialized.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportBody {
    /// Base64 of the raw model file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_file: Option<String>,
    /// Data URI of the model CSV.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_csv: Option<String>,
    /// Data URI of the component CSV.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_csv: Option<String>,
    /// Data URI of the relationship CSV.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_csv: Option<String>,
    /// Structured model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<serde_json::Value>,
    /// Source URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Name of the uploaded artifact.
    #[serde(default)]
    pub file_name: String,
}

// =============================================================================
// DATA URIS
// =============================================================================

/// Encode CSV bytes as a `data:text/csv;base64,` URI.
#[must_use]
pub fn encode_csv_data_uri(bytes: &[u8]) -> String {
    format!("{CSV_DATA_URI_PREFIX}{}", STANDARD.encode(bytes))
}

/// Decode a `data:text/csv;base64,` URI back into bytes.
///
/// # Errors
/// `ImportError::Decode` if the prefix is missing or the base64 is invalid.
pub fn decode_csv_data_uri(uri: &str) -> Result<Vec<u8>, ImportError> {
    let encoded = uri
        .strip_prefix(CSV_DATA_URI_PREFIX)
        .ok_or_else(|| ImportError::decode("CSV data URI", "missing data:text/csv;base64, prefix"))?;
    STANDARD
        .decode(encoded)
        .map_err(|e| ImportError::decode("CSV data URI", e))
}

// =============================================================================
// TESTS
// =============================================================================
