//! # Registry Response
//!
//! Decoding of the registry's import summary.
//!
//! Only the top-level shape is enforced here: a reply that does not parse as
//! the structure below is a `Decode` error. The entity lists stay as raw JSON
//! and are validated entry by entry by the grouping stage.
//!
//! Every field defaults when missing or `null`. Field names follow the
//! registry's snake_case form; camelCase and PascalCase spellings are
//! accepted as aliases.

use crate::ImportError;
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// RESPONSE TYPES
// =============================================================================

/// Per-type entity counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityCount {
    /// Models seen.
    #[serde(alias = "modelCount", alias = "ModelCount", deserialize_with = "nullable")]
    pub model_count: i64,
    /// Components imported.
    #[serde(alias = "compCount", alias = "CompCount", deserialize_with = "nullable")]
    pub comp_count: i64,
    /// Relationships imported.
    #[serde(alias = "relCount", alias = "RelCount", deserialize_with = "nullable")]
    pub rel_count: i64,
    /// Entities that failed.
    #[serde(
        alias = "totalErrCount",
        alias = "TotalErrCount",
        deserialize_with = "nullable"
    )]
    pub total_err_count: i64,
}

/// What was imported and what failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityTypeSummary {
    /// Names of the registered models.
    #[serde(
        alias = "successfulModels",
        alias = "SuccessfulModels",
        deserialize_with = "nullable"
    )]
    pub successful_models: Vec<String>,
    /// Imported components, loosely typed.
    #[serde(
        alias = "successfulComponents",
        alias = "SuccessfulComponents",
        deserialize_with = "nullable"
    )]
    pub successful_components: Vec<serde_json::Value>,
    /// Imported relationships, loosely typed.
    #[serde(
        alias = "successfulRelationships",
        alias = "SuccessfulRelationships",
        deserialize_with = "nullable"
    )]
    pub successful_relationships: Vec<serde_json::Value>,
    /// Failed entities with their error, loosely typed.
    #[serde(
        alias = "unsuccessfulEntityNameWithError",
        alias = "UnsuccessfulEntityNameWithError",
        deserialize_with = "nullable"
    )]
    pub unsuccessful_entity_name_with_error: Vec<serde_json::Value>,
}

/// Decoded reply of `POST /api/meshmodels/register`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryResponse {
    /// Models named by the import, in order. May repeat or be empty strings.
    #[serde(
        rename = "model_name",
        alias = "modelName",
        alias = "ModelName",
        alias = "modelNames",
        deserialize_with = "nullable"
    )]
    pub model_names: Vec<String>,
    /// Entity counters.
    #[serde(alias = "entityCount", alias = "EntityCount", deserialize_with = "nullable")]
    pub entity_count: EntityCount,
    /// Human summary supplied by the registry.
    #[serde(
        rename = "err_msg",
        alias = "errMsg",
        alias = "ErrMsg",
        alias = "summaryMessage",
        deserialize_with = "nullable"
    )]
    pub summary_message: String,
    /// Entity details.
    #[serde(
        alias = "entityTypeSummary",
        alias = "EntityTypeSummary",
        deserialize_with = "nullable"
    )]
    pub entity_type_summary: EntityTypeSummary,
}

impl RegistryResponse {
    /// Decode a raw reply body.
    ///
    /// # Errors
    /// `ImportError::Decode` if the body is not JSON or its top-level
    /// shape does not match.
    pub fn decode(bytes: &[u8]) -> Result<Self, ImportError> {
        serde_json::from_slice(bytes).map_err(|e| ImportError::decode("response body", e))
    }

    /// Fail unless at least one model was registered.
    ///
    /// # Errors
    /// `ImportError::NoModelRegistered` when `successful_models` is empty,
    /// whatever the HTTP status was.
    pub fn ensure_registered(&self) -> Result<(), ImportError> {
        if self.entity_type_summary.successful_models.is_empty() {
            return Err(ImportError::NoModelRegistered);
        }
        Ok(())
    }

    /// A model was named but nothing was imported and nothing failed.
    #[must_use]
    pub fn is_empty_import(&self) -> bool {
        let counts = &self.entity_count;
        !self.model_names.is_empty()
            && counts.comp_count == 0
            && counts.rel_count == 0
            && counts.total_err_count == 0
    }

    /// Distinct non-empty model names, in first-seen order.
    #[must_use]
    pub fn distinct_model_names(&self) -> Vec<&str> {
        let mut seen = std::collections::BTreeSet::new();
        self.model_names
            .iter()
            .map(String::as_str)
            .filter(|name| !name.is_empty() && seen.insert(*name))
            .collect()
    }
}

/// Deserialize `null` as the type's default.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// TESTS
// =============================================================================
