//! # Input Classifier
//!
//! Decides how a user-supplied path or URL is imported.
//!
//! - Absolute URLs are imported by the registry itself (`InputMode::Url`)
//! - Directories holding CSV files are imported as a CSV triplet (`InputMode::Csv`)
//! - Anything else is a model file or a model directory (`InputMode::File`)
//!
//! URLs are recognized before the filesystem is consulted, so a URL never
//! triggers a `stat`.

use crate::primitives::{
    ARCHIVE_SUFFIX, COMPONENT_CSV_MARKER, CSV_EXTENSION, MODEL_CSV_MARKER,
    RELATIONSHIP_CSV_MARKER,
};
use crate::{ErrorHints, ImportError};
use std::path::{Path, PathBuf};

// =============================================================================
// INPUT MODES
// =============================================================================

/// The three paths of a CSV import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvSet {
    /// Model definitions.
    pub model: PathBuf,
    /// Component definitions.
    pub component: PathBuf,
    /// Relationship definitions.
    pub relationship: PathBuf,
}

/// A filesystem artifact imported as a model file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// A single file, sent as-is.
    File(PathBuf),
    /// A directory, bundled as tar.gz before upload.
    Directory(PathBuf),
}

impl FileSource {
    /// Path of the artifact.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::File(path) | Self::Directory(path) => path,
        }
    }

    /// File name reported to the registry.
    ///
    /// `<basename>.tar.gz` for directories, the base name for files.
    #[must_use]
    pub fn file_name(&self) -> String {
        let base = base_name(self.path());
        match self {
            Self::File(_) => base,
            Self::Directory(_) => format!("{base}{ARCHIVE_SUFFIX}"),
        }
    }
}

/// How an input is packaged for the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    /// Remote location, fetched by the registry.
    Url(String),
    /// Directory with a model/component/relationship CSV triplet.
    Csv(CsvSet),
    /// Model file or model directory.
    File(FileSource),
}

// =============================================================================
// CSV LOCATION
// =============================================================================

/// Resolves the CSV triplet inside a directory.
///
/// Implementations must fail with `ImportError::CsvLocation` and
/// carry hints the user can act on.
pub trait CsvLocator {
    /// Locate the model, component and relationship CSVs in `dir`.
    fn locate(&self, dir: &Path) -> Result<CsvSet, ImportError>;
}

/// Locates CSVs by file name.
///
/// A `.csv` file whose stem contains `relationship` is the relationship CSV,
/// then `component` is the component CSV, then `model` is the model CSV.
/// Matching is case-insensitive; other CSV files are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConventionCsvLocator;

impl CsvLocator for ConventionCsvLocator {
    fn locate(&self, dir: &Path) -> Result<CsvSet, ImportError> {
        let mut model = Vec::new();
        let mut component = Vec::new();
        let mut relationship = Vec::new();

        for path in csv_files(dir)? {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_lowercase())
                .unwrap_or_default();

            if stem.contains(RELATIONSHIP_CSV_MARKER) {
                relationship.push(path);
            } else if stem.contains(COMPONENT_CSV_MARKER) {
                component.push(path);
            } else if stem.contains(MODEL_CSV_MARKER) {
                model.push(path);
            } else {
                tracing::debug!("Ignoring CSV without a known role: {:?}", path);
            }
        }

        Ok(CsvSet {
            model: single_role(model, MODEL_CSV_MARKER, dir)?,
            component: single_role(component, COMPONENT_CSV_MARKER, dir)?,
            relationship: single_role(relationship, RELATIONSHIP_CSV_MARKER, dir)?,
        })
    }
}

/// Pick the only candidate for a CSV role, or explain why there is none.
fn single_role(mut candidates: Vec<PathBuf>, role: &str, dir: &Path) -> Result<PathBuf, ImportError> {
    match candidates.len() {
        1 => Ok(candidates.remove(0)),
        0 => Err(ImportError::CsvLocation {
            message: format!("no {role} CSV found in {}", dir.display()),
            hints: ErrorHints::new(
                [format!(
                    "The directory does not contain a CSV file whose name includes \"{role}\""
                )],
                [format!(
                    "Add the {role} CSV to {} and name it after its role, e.g. {role}s.csv",
                    dir.display()
                )],
            ),
        }),
        n => {
            let names = candidates
                .iter()
                .map(|p| base_name(p))
                .collect::<Vec<_>>()
                .join(", ");
            Err(ImportError::CsvLocation {
                message: format!("{n} candidate {role} CSVs found in {}: {names}", dir.display()),
                hints: ErrorHints::new(
                    [format!("More than one CSV file name includes \"{role}\"")],
                    [format!("Keep exactly one {role} CSV in the directory")],
                ),
            })
        }
    }
}

/// List the `.csv` files directly inside `dir`, sorted by path.
fn csv_files(dir: &Path) -> Result<Vec<PathBuf>, ImportError> {
    let entries = std::fs::read_dir(dir).map_err(|e| ImportError::FolderStat {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| !path.is_dir() && is_csv(path))
        .collect();
    files.sort();
    Ok(files)
}

// =============================================================================
// CLASSIFIER
// =============================================================================

/// Selects the ingestion mode of an input.
#[derive(Debug, Clone, Default)]
pub struct InputClassifier<L = ConventionCsvLocator> {
    locator: L,
}

impl InputClassifier {
    /// Classifier using the file-name convention for CSV sets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<L: CsvLocator> InputClassifier<L> {
    /// Classifier using a custom CSV locator.
    pub fn with_locator(locator: L) -> Self {
        Self { locator }
    }

    /// Decide how `input` is imported.
    ///
    /// # Errors
    /// - `FolderStat` if the path does not exist or cannot be inspected
    /// - `CsvLocation` if a CSV directory does not hold a usable triplet
    pub fn classify(&self, input: &str) -> Result<InputMode, ImportError> {
        if is_valid_url(input) {
            return Ok(InputMode::Url(input.to_string()));
        }

        let path = Path::new(input);

        if has_csv_files(path) {
            let set = self.locator.locate(path)?;
            tracing::debug!("CSV set resolved: {:?}", set);
            return Ok(InputMode::Csv(set));
        }

        let metadata = std::fs::metadata(path).map_err(|e| ImportError::FolderStat {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let source = if metadata.is_dir() {
            FileSource::Directory(path.to_path_buf())
        } else {
            FileSource::File(path.to_path_buf())
        };
        Ok(InputMode::File(source))
    }
}

// =============================================================================
// HELPERS
// =============================================================================

/// True for syntactically valid absolute URLs (scheme and host present).
#[must_use]
pub fn is_valid_url(input: &str) -> bool {
    url::Url::parse(input).is_ok_and(|u| u.has_host() && !u.cannot_be_a_base())
}

/// True if `path` is a readable directory with at least one `.csv` file
/// (extension compared case-insensitively).
#[must_use]
pub fn has_csv_files(path: &Path) -> bool {
    let Ok(entries) = std::fs::read_dir(path) else {
        return false;
    };

    entries.filter_map(Result::ok).any(|entry| {
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        !is_dir && is_csv(&entry.path())
    })
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(CSV_EXTENSION))
}

/// Last path component, resolving `.`/`..` through the filesystem if needed.
fn base_name(path: &Path) -> String {
    if let Some(name) = path.file_name() {
        return name.to_string_lossy().into_owned();
    }
    path.canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "model".to_string())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"header\n").expect("write");
        path
    }

    #[test]
    fn urls_are_recognized() {
        assert!(is_valid_url("https://github.com/meshery/meshery"));
        assert!(is_valid_url("http://localhost:9081/model.tar.gz"));
        assert!(is_valid_url("oci://ghcr.io/org/model:v1"));
    }

    #[test]
    fn paths_are_not_urls() {
        assert!(!is_valid_url("./models/k8s"));
        assert!(!is_valid_url("/tmp/model.yaml"));
        assert!(!is_valid_url("model.tar.gz"));
        assert!(!is_valid_url("C:\\models\\k8s"));
        assert!(!is_valid_url("mailto:someone@example.com"));
    }

    #[test]
    fn url_input_selects_url_mode() {
        let mode = InputClassifier::new()
            .classify("https://example.com/does/not/exist")
            .expect("classify");
        assert_eq!(
            mode,
            InputMode::Url("https://example.com/does/not/exist".to_string())
        );
    }

    #[test]
    fn missing_path_is_folder_stat_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope");
        let result = InputClassifier::new().classify(&missing.to_string_lossy());
        assert!(matches!(result, Err(ImportError::FolderStat { .. })));
    }

    #[test]
    fn single_file_keeps_base_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = touch(dir.path(), "model.yaml");

        let mode = InputClassifier::new()
            .classify(&file.to_string_lossy())
            .expect("classify");
        let InputMode::File(source) = mode else {
            panic!("expected file mode, got {mode:?}");
        };
        assert!(matches!(source, FileSource::File(_)));
        assert_eq!(source.file_name(), "model.yaml");
    }

    #[test]
    fn directory_without_csv_is_bundled() {
        let dir = tempfile::tempdir().expect("tempdir");
        let model_dir = dir.path().join("kubernetes");
        fs::create_dir(&model_dir).expect("mkdir");
        touch(&model_dir, "model.json");

        let mode = InputClassifier::new()
            .classify(&model_dir.to_string_lossy())
            .expect("classify");
        let InputMode::File(source) = mode else {
            panic!("expected file mode, got {mode:?}");
        };
        assert!(matches!(source, FileSource::Directory(_)));
        assert_eq!(source.file_name(), "kubernetes.tar.gz");
    }

    #[test]
    fn csv_extension_is_case_insensitive() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "Models.CSV");
        assert!(has_csv_files(dir.path()));
    }

    #[test]
    fn csv_named_directory_does_not_count() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir(dir.path().join("archive.csv")).expect("mkdir");
        assert!(!has_csv_files(dir.path()));
    }

    #[test]
    fn file_is_never_a_csv_set() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = touch(dir.path(), "components.csv");
        assert!(!has_csv_files(&file));
    }

    #[test]
    fn convention_locator_resolves_triplet() {
        let dir = tempfile::tempdir().expect("tempdir");
        let model = touch(dir.path(), "Models.csv");
        let component = touch(dir.path(), "Components.csv");
        let relationship = touch(dir.path(), "Relationships.csv");
        touch(dir.path(), "README.md");

        let mode = InputClassifier::new()
            .classify(&dir.path().to_string_lossy())
            .expect("classify");
        assert_eq!(
            mode,
            InputMode::Csv(CsvSet {
                model,
                component,
                relationship,
            })
        );
    }

    #[test]
    fn missing_role_carries_hints() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "models.csv");
        touch(dir.path(), "components.csv");

        let err = InputClassifier::new()
            .classify(&dir.path().to_string_lossy())
            .expect_err("relationship csv is missing");
        let ImportError::CsvLocation { message, hints } = err else {
            panic!("expected csv location error");
        };
        assert!(message.contains("relationship"));
        assert!(!hints.probable_cause.is_empty());
        assert!(!hints.suggested_remediation.is_empty());
    }

    #[test]
    fn ambiguous_role_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "models.csv");
        touch(dir.path(), "components.csv");
        touch(dir.path(), "relationships.csv");
        touch(dir.path(), "relationships-old.csv");

        let err = ConventionCsvLocator
            .locate(dir.path())
            .expect_err("two relationship csvs");
        assert!(matches!(err, ImportError::CsvLocation { .. }));
        assert!(err.to_string().contains("relationships-old.csv"));
    }

    #[test]
    fn custom_locator_is_used() {
        struct Fixed;
        impl CsvLocator for Fixed {
            fn locate(&self, dir: &Path) -> Result<CsvSet, ImportError> {
                Ok(CsvSet {
                    model: dir.join("a.csv"),
                    component: dir.join("b.csv"),
                    relationship: dir.join("c.csv"),
                })
            }
        }

        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "a.csv");

        let mode = InputClassifier::with_locator(Fixed)
            .classify(&dir.path().to_string_lossy())
            .expect("classify");
        let InputMode::Csv(set) = mode else {
            panic!("expected csv mode");
        };
        assert_eq!(set.component, dir.path().join("b.csv"));
    }
}
