//! # Response Classifier
//!
//! Turns a decoded [`RegistryResponse`] into an ordered list of
//! [`ModelGroup`]s, ready for rendering.
//!
//! ## Totality
//!
//! The entity lists are untyped. Each entry is read through the checked
//! accessors of [`crate::record`]; an entry that does not have the expected
//! shape is logged at `warn` and dropped. One bad entry never prevents the
//! others from being reported.
//!
//! ## Ordering
//!
//! - Models without a file extension come first, then models whose name looks
//!   like a file (`my-model.yaml`), each in first-seen order
//! - A trailing unattributed group collects failures of `unknown` type when the
//!   registry reported an empty model name
//! - Relationship tables are keyed by `(kind, subtype, type)` in a `BTreeMap`

use crate::primitives::{COMPONENT_ENTITY_TYPE, RELATIONSHIP_ENTITY_TYPE, UNKNOWN_ENTITY_TYPE};
use crate::record::{CastError, Field, Record};
use crate::response::RegistryResponse;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// REPORT TYPES
// =============================================================================

/// One row of a component table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRow {
    /// Display name of the component.
    pub display_name: String,
    /// Component version.
    pub version: String,
}

impl ComponentRow {
    /// Create a row.
    #[must_use]
    pub fn new(display_name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            version: version.into(),
        }
    }
}

/// Grouping key of a relationship table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelationshipKey {
    /// Relationship kind (e.g. `edge`).
    pub kind: String,
    /// Relationship subtype (e.g. `network`).
    pub subtype: String,
    /// Relationship type (e.g. `binding`).
    pub relationship_type: String,
}

impl RelationshipKey {
    /// Create a key.
    #[must_use]
    pub fn new(
        kind: impl Into<String>,
        subtype: impl Into<String>,
        relationship_type: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            subtype: subtype.into(),
            relationship_type: relationship_type.into(),
        }
    }
}

/// A `from → to` pair of component kinds.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge {
    /// Kind of the source component.
    pub from: String,
    /// Kind of the target component.
    pub to: String,
}

impl Edge {
    /// Create an edge.
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Failed entities of one error entry, attributed to one model.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntityFailure {
    /// Failed components.
    pub components: usize,
    /// Failed relationships.
    pub relationships: usize,
    /// Names of entities the registry could not attribute to any model.
    pub unknown: Vec<String>,
    /// Long description of the error.
    pub long_description: String,
    /// Probable causes.
    pub probable_cause: Vec<String>,
    /// Suggested remediations.
    pub suggested_remediation: Vec<String>,
}

/// Everything reported for one model.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModelGroup {
    /// Model name; empty for the unattributed group.
    pub model_name: String,
    /// The name carries a file extension.
    pub is_file_like: bool,
    /// Imported components.
    pub components: Vec<ComponentRow>,
    /// Imported relationships, deduplicated.
    pub relationships: BTreeMap<RelationshipKey, Vec<Edge>>,
    /// Failures attributed to this model.
    pub failures: Vec<EntityFailure>,
}

impl ModelGroup {
    /// Empty group for `model_name`.
    #[must_use]
    pub fn new(model_name: impl Into<String>) -> Self {
        let model_name = model_name.into();
        Self {
            is_file_like: has_extension(&model_name),
            model_name,
            ..Self::default()
        }
    }

    /// Group collecting failures that belong to no model.
    #[must_use]
    pub fn is_unattributed(&self) -> bool {
        self.model_name.is_empty()
    }

    /// Whether a `MODEL:` header is rendered for this group.
    #[must_use]
    pub fn has_header(&self) -> bool {
        !self.is_file_like && !self.is_unattributed()
    }
}

/// The classified reply: what the renderer prints.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportReport {
    /// Registry summary, present when at least one model was seen.
    pub summary: Option<String>,
    /// Per-model groups in render order.
    pub groups: Vec<ModelGroup>,
}

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Classify a registry reply into per-model groups.
///
/// Never fails: malformed entries are logged and skipped.
#[must_use]
pub fn classify(response: &RegistryResponse) -> ImportReport {
    let summary = (response.entity_count.model_count > 0)
        .then(|| response.summary_message.clone());

    if response.is_empty_import() {
        tracing::debug!("Registry named a model but imported nothing");
        return ImportReport {
            summary,
            groups: Vec::new(),
        };
    }

    let summary_lists = &response.entity_type_summary;
    let components = parse_all(&summary_lists.successful_components, "component", parse_component);
    let relationships = parse_all(
        &summary_lists.successful_relationships,
        "relationship",
        parse_relationship,
    );
    let failures = parse_all(
        &summary_lists.unsuccessful_entity_name_with_error,
        "unsuccessful entity",
        parse_failure,
    );

    let names = response.distinct_model_names();
    let (plain, file_like): (Vec<&str>, Vec<&str>) =
        names.into_iter().partition(|name| !has_extension(name));

    let mut groups: Vec<ModelGroup> = plain
        .into_iter()
        .chain(file_like)
        .map(|name| {
            let mut group = ModelGroup::new(name);
            group.components = components_for(&components, name);
            group.relationships = relationships_for(&relationships, name);
            group.failures = failures_for(&failures, name);
            group
        })
        .collect();

    let has_blank_name = response.model_names.iter().any(String::is_empty);
    if has_blank_name || (response.model_names.is_empty() && !failures.is_empty()) {
        let mut unattributed = ModelGroup::new("");
        unattributed.failures = failures_for(&failures, "");
        if !unattributed.failures.is_empty() {
            groups.push(unattributed);
        }
    }

    ImportReport { summary, groups }
}

/// True if the last path segment of `name` carries a `.` suffix.
#[must_use]
pub fn has_extension(name: &str) -> bool {
    let last = name.rsplit('/').next().unwrap_or(name);
    last.contains('.')
}

// =============================================================================
// ENTRY PARSING
// =============================================================================

struct ParsedComponent {
    model: String,
    row: ComponentRow,
}

struct ParsedRelationship {
    model: String,
    key: RelationshipKey,
    edges: Vec<Edge>,
}

struct ParsedEntity {
    name: String,
    entity_type: String,
}

struct ParsedFailure {
    entities: Vec<ParsedEntity>,
    long_description: String,
    probable_cause: Vec<String>,
    suggested_remediation: Vec<String>,
}

/// Parse every entry, dropping (and logging) the ones that fail.
fn parse_all<T>(
    entries: &[Value],
    what: &str,
    parse: impl Fn(&Value) -> Result<T, CastError>,
) -> Vec<T> {
    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match parse(entry) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Skipping {} #{}: {}", what, index, e);
                None
            }
        })
        .collect()
}

fn parse_component(entry: &Value) -> Result<ParsedComponent, CastError> {
    let record = Record::from_value(entry, "component")?;
    Ok(ParsedComponent {
        model: record.text("Model")?.to_string(),
        row: ComponentRow::new(
            record.text_or_empty("DisplayName")?,
            record.text_or_empty("Version")?,
        ),
    })
}

fn parse_relationship(entry: &Value) -> Result<ParsedRelationship, CastError> {
    let record = Record::from_value(entry, "relationship")?;
    let key = RelationshipKey::new(
        record.text("Kind")?,
        record.text("Subtype")?,
        record.text("RelationshipType")?,
    );
    let model = record.text("Model")?.to_string();

    let edges = record
        .list("Selectors")?
        .iter()
        .enumerate()
        .filter_map(|(index, selector)| match selector_edge(selector) {
            Ok(edge) => Some(edge),
            Err(e) => {
                tracing::warn!("Skipping selector #{} of {} relationship: {}", index, model, e);
                None
            }
        })
        .collect();

    Ok(ParsedRelationship { model, key, edges })
}

/// Edge described by the first `from` and first `to` rule of a selector.
fn selector_edge(selector: &Value) -> Result<Edge, CastError> {
    let allow = Record::from_value(selector, "selector")?.record("allow")?;
    let from = first_kind(allow.list("from")?, "allow.from")?;
    let to = first_kind(allow.list("to")?, "allow.to")?;
    Ok(Edge::new(from, to))
}

fn first_kind<'a>(rules: &'a [Value], field: &str) -> Result<&'a str, CastError> {
    let first = Field::of(rules.first());
    if first.is_absent() {
        return Err(CastError {
            field: field.to_string(),
            expected: "at least one rule",
            found: "an empty sequence",
        });
    }
    first.record(field)?.text("kind")
}

fn parse_failure(entry: &Value) -> Result<ParsedFailure, CastError> {
    let record = Record::from_value(entry, "unsuccessful entity")?;
    let names = record.list("name")?;
    let entity_types = record.list("entityType")?;
    let error = record.record("error")?;
    if error.is_empty() {
        return Err(CastError {
            field: "error".to_string(),
            expected: "error details",
            found: "an empty mapping",
        });
    }

    let entities = names
        .iter()
        .enumerate()
        .filter_map(|(index, name)| {
            let name = match Field::from(name).text("name") {
                Ok(name) => name,
                Err(e) => {
                    tracing::warn!("Skipping entity #{}: {}", index, e);
                    return None;
                }
            };
            let entity_type = Field::of(entity_types.get(index))
                .text_or_empty("entityType")
                .unwrap_or_else(|e| {
                    tracing::warn!("Entity {} has no usable type: {}", name, e);
                    ""
                });
            Some(ParsedEntity {
                name: name.to_string(),
                entity_type: entity_type.to_string(),
            })
        })
        .collect();

    Ok(ParsedFailure {
        entities,
        long_description: text_items(error.field("LongDescription"), "LongDescription").join(" "),
        probable_cause: text_items(error.field("ProbableCause"), "ProbableCause"),
        suggested_remediation: text_items(
            error.field("SuggestedRemediation"),
            "SuggestedRemediation",
        ),
    })
}

/// String items of a description list. Non-strings are logged and skipped.
fn text_items(field: Field<'_>, name: &str) -> Vec<String> {
    match field {
        Field::Absent => Vec::new(),
        Field::Text(text) => vec![text.to_string()],
        Field::List(items) => items
            .iter()
            .filter_map(|item| match Field::from(item).text(name) {
                Ok(text) => Some(text.trim().to_string()),
                Err(e) => {
                    tracing::info!("Ignoring {} item: {}", name, e);
                    None
                }
            })
            .filter(|text| !text.is_empty())
            .collect(),
        other => {
            tracing::info!("Ignoring {}: expected sequence, found {}", name, other.kind());
            Vec::new()
        }
    }
}

// =============================================================================
// ATTRIBUTION
// =============================================================================

fn components_for(components: &[ParsedComponent], model: &str) -> Vec<ComponentRow> {
    components
        .iter()
        .filter(|c| c.model == model)
        .map(|c| c.row.clone())
        .collect()
}

fn relationships_for(
    relationships: &[ParsedRelationship],
    model: &str,
) -> BTreeMap<RelationshipKey, Vec<Edge>> {
    let mut seen: BTreeSet<(&RelationshipKey, &Edge)> = BTreeSet::new();
    let mut grouped: BTreeMap<RelationshipKey, Vec<Edge>> = BTreeMap::new();

    for relationship in relationships.iter().filter(|r| r.model == model) {
        for edge in &relationship.edges {
            if !seen.insert((&relationship.key, edge)) {
                continue;
            }
            grouped
                .entry(relationship.key.clone())
                .or_default()
                .push(edge.clone());
        }
    }

    grouped
}

fn failures_for(failures: &[ParsedFailure], model: &str) -> Vec<EntityFailure> {
    failures
        .iter()
        .filter_map(|failure| attribute_failure(failure, model))
        .collect()
}

/// Count the entities of `failure` that belong to `model`.
///
/// For the unattributed group (`model` empty) only `unknown` entities count.
fn attribute_failure(failure: &ParsedFailure, model: &str) -> Option<EntityFailure> {
    let mut attributed = EntityFailure::default();

    for entity in &failure.entities {
        let is_unknown = entity.entity_type.eq_ignore_ascii_case(UNKNOWN_ENTITY_TYPE);
        let belongs = if model.is_empty() {
            is_unknown
        } else {
            entity.name == model
        };
        if !belongs {
            continue;
        }

        if is_unknown {
            attributed.unknown.push(entity.name.clone());
        } else if entity.entity_type.eq_ignore_ascii_case(COMPONENT_ENTITY_TYPE) {
            attributed.components += 1;
        } else if entity.entity_type.eq_ignore_ascii_case(RELATIONSHIP_ENTITY_TYPE) {
            attributed.relationships += 1;
        } else {
            tracing::debug!(
                "Entity {} has unrecognized type {:?}",
                entity.name,
                entity.entity_type
            );
        }
    }

    if attributed.components == 0 && attributed.relationships == 0 && attributed.unknown.is_empty()
    {
        return None;
    }

    attributed.long_description.clone_from(&failure.long_description);
    attributed.probable_cause.clone_from(&failure.probable_cause);
    attributed
        .suggested_remediation
        .clone_from(&failure.suggested_remediation);
    Some(attributed)
}

// =============================================================================
// TESTS
// =============================================================================
