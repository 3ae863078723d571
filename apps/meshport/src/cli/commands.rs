//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::client::RegistryClient;
use crate::config::{Config, meshery_folder};
use crate::source::build_request;
use meshport_core::{
    Block, ImportError, ImportReport, InputClassifier, InputMode, RegistryResponse, Renderer,
    classify, to_text,
};
use std::path::Path;

// =============================================================================
// IMPORT PIPELINE
// =============================================================================

/// Everything learned from one import, before anything is printed.
#[derive(Debug)]
pub struct ImportOutcome {
    /// How the input was packaged.
    pub mode: InputMode,
    /// The decoded registry reply.
    pub response: RegistryResponse,
    /// The reply grouped per model.
    pub report: ImportReport,
}

/// Classify `input`, upload it and make sense of the reply.
///
/// A reply that registered nothing is still returned here; the caller
/// decides when to turn it into an error.
pub async fn import_model(
    client: &RegistryClient,
    input: &str,
) -> Result<ImportOutcome, ImportError> {
    let mode = InputClassifier::new().classify(input)?;
    let request = build_request(&mode, true)?;
    tracing::info!("Importing {:?} as {} upload", input, request.upload_type());

    let body = client.register(&request).await?;
    let response = RegistryResponse::decode(&body)?;
    let report = classify(&response);

    Ok(ImportOutcome {
        mode,
        response,
        report,
    })
}

// =============================================================================
// MODEL IMPORT COMMAND
// =============================================================================

/// Import a model and print the registry's report.
pub async fn cmd_model_import(
    config: &Config,
    input: &str,
    renderer: Renderer,
) -> Result<(), ImportError> {
    let client = RegistryClient::from_config(config);
    let outcome = import_model(&client, input).await?;

    print!("{}", to_text(&renderer.render(&outcome.report)));

    outcome.response.ensure_registered()?;
    tracing::info!(
        "Registered models: {}",
        outcome.response.distinct_model_names().join(", ")
    );

    print!(
        "{}",
        to_text(&csv_follow_up(&outcome.mode, meshery_folder().as_deref()))
    );

    Ok(())
}

/// Where a CSV import left the generated model and its generation logs.
///
/// Empty for every other mode, or when no Meshery folder is known.
pub fn csv_follow_up(mode: &InputMode, meshery: Option<&Path>) -> Vec<Block> {
    let (InputMode::Csv(_), Some(folder)) = (mode, meshery) else {
        return Vec::new();
    };
    vec![
        Block::Line(format!(
            "Model can be accessed from {}",
            folder.join("models").display()
        )),
        Block::Line(format!(
            "Logs for the csv generation can be accessed {}",
            folder.join("logs").join("registry").display()
        )),
    ]
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use meshport_core::{CsvSet, FileSource};
    use std::path::PathBuf;

    fn csv_mode() -> InputMode {
        InputMode::Csv(CsvSet {
            model: PathBuf::from("export/models.csv"),
            component: PathBuf::from("export/components.csv"),
            relationship: PathBuf::from("export/relationships.csv"),
        })
    }

    #[test]
    fn csv_import_names_model_and_log_folders() {
        let folder = Path::new("/home/dev/.meshery");
        let text = to_text(&csv_follow_up(&csv_mode(), Some(folder)));

        let models = folder.join("models");
        let logs = folder.join("logs").join("registry");
        assert_eq!(
            text,
            format!(
                "Model can be accessed from {}\nLogs for the csv generation can be accessed {}\n",
                models.display(),
                logs.display()
            )
        );
    }

    #[test]
    fn other_modes_have_no_follow_up() {
        let folder = Path::new("/home/dev/.meshery");
        let url = InputMode::Url("https://example.com/model.tar".to_string());
        let file = InputMode::File(FileSource::File(PathBuf::from("model.yaml")));
        assert!(csv_follow_up(&url, Some(folder)).is_empty());
        assert!(csv_follow_up(&file, Some(folder)).is_empty());
    }

    #[test]
    fn unknown_home_has_no_follow_up() {
        assert!(csv_follow_up(&csv_mode(), None).is_empty());
    }
}
