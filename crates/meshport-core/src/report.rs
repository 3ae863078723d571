//! # Report Renderer
//!
//! Pure rendering of an [`ImportReport`] into output blocks.
//!
//! The renderer knows nothing about the registry reply; it works from
//! [`ModelGroup`]s only, so it can be exercised with literal fixtures.
//! Writing the blocks to a terminal is the caller's job.
//!
//! Output order:
//! 1. `SUMMARY:` line
//! 2. per model: `MODEL:` header (plain names only), component table,
//!    relationship tables, error narratives

use crate::grouping::{EntityFailure, ImportReport, ModelGroup};
use crate::primitives::MODEL_CATALOG_URL;
use crate::{ErrorHints, ImportError};

// =============================================================================
// BLOCKS
// =============================================================================

/// A left-aligned text table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Column titles.
    pub header: Vec<String>,
    /// Cells, row by row.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Create a table.
    #[must_use]
    pub fn new(header: &[&str], rows: Vec<Vec<String>>) -> Self {
        Self {
            header: header.iter().map(|h| (*h).to_string()).collect(),
            rows,
        }
    }

    /// Render as lines: upper-cased header, then rows, columns padded to
    /// the widest cell and separated by two spaces.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let header: Vec<String> = self.header.iter().map(|h| h.to_uppercase()).collect();
        let columns = self.rows.iter().map(Vec::len).fold(header.len(), usize::max);

        let mut widths = vec![0usize; columns];
        for row in std::iter::once(&header).chain(&self.rows) {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        std::iter::once(&header)
            .chain(&self.rows)
            .map(|row| {
                let line = row
                    .iter()
                    .zip(&widths)
                    .map(|(cell, width)| format!("{cell:<width$}"))
                    .collect::<Vec<_>>()
                    .join("  ");
                line.trim_end().to_string()
            })
            .collect()
    }
}

/// One unit of output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// An empty line.
    Blank,
    /// A line of text (may contain embedded newlines).
    Line(String),
    /// A table.
    Table(Table),
}

/// Flatten blocks into text, one line per row, newline-terminated.
#[must_use]
pub fn to_text(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        match block {
            Block::Blank => out.push('\n'),
            Block::Line(line) => {
                out.push_str(line);
                out.push('\n');
            }
            Block::Table(table) => {
                for line in table.lines() {
                    out.push_str(&line);
                    out.push('\n');
                }
            }
        }
    }
    out
}

// =============================================================================
// RENDERER
// =============================================================================

/// Renders reports and errors, with or without ANSI styling.
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    styled: bool,
}

impl Renderer {
    /// Plain text renderer.
    #[must_use]
    pub const fn plain() -> Self {
        Self { styled: false }
    }

    /// Renderer emitting bold labels and terminal hyperlinks.
    #[must_use]
    pub const fn styled() -> Self {
        Self { styled: true }
    }

    /// Bold `text` when styling is enabled.
    #[must_use]
    pub fn bold(&self, text: &str) -> String {
        if self.styled {
            format!("\x1b[1m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    /// Render a classified reply.
    #[must_use]
    pub fn render(&self, report: &ImportReport) -> Vec<Block> {
        let mut blocks = Vec::new();

        if let Some(summary) = &report.summary {
            blocks.push(Block::Line(format!("{}: {}", self.bold("SUMMARY"), summary)));
        }

        for group in &report.groups {
            self.render_group(group, &mut blocks);
        }

        blocks
    }

    /// Render one model group.
    pub fn render_group(&self, group: &ModelGroup, blocks: &mut Vec<Block>) {
        if group.has_header() {
            blocks.push(Block::Blank);
            blocks.push(Block::Line(format!(
                "{}: {}",
                self.bold("MODEL"),
                group.model_name
            )));
        }

        if !group.components.is_empty() {
            let rows = group
                .components
                .iter()
                .map(|c| vec![c.display_name.clone(), c.version.clone()])
                .collect();
            blocks.push(Block::Blank);
            blocks.push(Block::Table(Table::new(&["Component", "Version"], rows)));
        }

        for (key, edges) in &group.relationships {
            if edges.is_empty() {
                continue;
            }
            let label = if edges.len() > 1 {
                "RELATIONSHIPS:"
            } else {
                "RELATIONSHIP:"
            };
            let rows = edges
                .iter()
                .map(|e| vec![e.from.clone(), e.to.clone()])
                .collect();
            blocks.push(Block::Blank);
            blocks.push(Block::Line(format!(
                "  {} Kind of {}, sub type {} and type {}",
                self.bold(label),
                key.kind,
                key.subtype,
                key.relationship_type
            )));
            blocks.push(Block::Table(Table::new(&["From", "To"], rows)));
        }

        for failure in &group.failures {
            self.render_failure(failure, blocks);
        }
    }

    fn render_failure(&self, failure: &EntityFailure, blocks: &mut Vec<Block>) {
        for name in &failure.unknown {
            blocks.push(Block::Blank);
            blocks.push(Block::Line(format!(
                "{}: Error encountered while importing model {}: \n    {}\n\n    \
                 Ensure that you are importing an existing model.\n    \
                 Create a new model to import or find an existing model in the Meshery {}.",
                self.bold("ERROR"),
                name,
                failure.long_description,
                self.catalog_link()
            )));
        }

        let counts = entity_count_phrase(failure.components, failure.relationships);
        if !counts.is_empty() {
            blocks.push(Block::Blank);
            blocks.push(Block::Line(format!(
                "  {}: Import did not occur for {} error: \n  {}",
                self.bold("ERROR"),
                counts,
                failure.long_description
            )));
        }

        if !failure.unknown.is_empty() || !counts.is_empty() {
            self.render_guidance(&failure.probable_cause, &failure.suggested_remediation, blocks);
        }
    }

    fn render_guidance(&self, cause: &[String], remediation: &[String], blocks: &mut Vec<Block>) {
        if !cause.is_empty() {
            blocks.push(Block::Line(format!(
                "\n  {}:\n{}",
                self.bold("PROBABLE CAUSE"),
                bullet_list(cause)
            )));
        }
        if !remediation.is_empty() {
            blocks.push(Block::Line(format!(
                "\n  {}:\n{}",
                self.bold("SUGGESTED REMEDIATION"),
                bullet_list(remediation)
            )));
        }
    }

    fn catalog_link(&self) -> String {
        if self.styled {
            format!("\x1b]8;;{MODEL_CATALOG_URL}\x1b\\catalog\x1b]8;;\x1b\\")
        } else {
            format!("catalog ({MODEL_CATALOG_URL})")
        }
    }

    /// Render a fatal error with its guidance.
    #[must_use]
    pub fn render_error(&self, error: &ImportError) -> Vec<Block> {
        let mut blocks = vec![Block::Line(format!("{}: {}", self.bold("ERROR"), error))];
        if let Some(ErrorHints {
            probable_cause,
            suggested_remediation,
        }) = error.hints()
        {
            self.render_guidance(probable_cause, suggested_remediation, &mut blocks);
        }
        blocks
    }
}

/// `"1 entity of type component and 2 entities of type relationship"`.
#[must_use]
pub fn entity_count_phrase(components: usize, relationships: usize) -> String {
    let mut parts = Vec::new();
    if components > 0 {
        parts.push(format!(
            "{} {} of type component",
            components,
            pluralize(components, "entity", "entities")
        ));
    }
    if relationships > 0 {
        parts.push(format!(
            "{} {} of type relationship",
            relationships,
            pluralize(relationships, "entity", "entities")
        ));
    }
    parts.join(" and ")
}

fn pluralize<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("  - {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// TESTS
// =============================================================================
