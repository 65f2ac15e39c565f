use directories::ProjectDirs;
use doc_model::{AnnotationId, AnnotationStore, PageAnnotation};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const JOURNAL_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("unable to resolve local data directory")]
    NoDataDirectory,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("unsupported journal version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

/// Root directory holding one annotation journal per document.
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    pub fn from_default_project() -> Result<Self, StorageError> {
        let dirs =
            ProjectDirs::from("dev", "Folio", "Folio").ok_or(StorageError::NoDataDirectory)?;

        Ok(Self { root: dirs.data_local_dir().to_path_buf() })
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Journal location for a document, keyed by its file stem.
    pub fn journal_path(&self, document_stem: &str) -> PathBuf {
        self.root.join("annotations").join(format!("{document_stem}.json"))
    }

    pub fn open_journal(&self, document_stem: &str) -> Result<AnnotationJournal, StorageError> {
        AnnotationJournal::load(self.journal_path(document_stem))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct JournalEnvelope {
    version: u32,
    annotations: Vec<PageAnnotation>,
}

/// Normalized annotations of one document, persisted as a JSON file.
///
/// Mutations stay in memory until [`AnnotationJournal::save`].
#[derive(Debug, Clone)]
pub struct AnnotationJournal {
    path: PathBuf,
    annotations: Vec<PageAnnotation>,
}

impl AnnotationJournal {
    /// Read the journal at `path`; a missing file is an empty journal.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if !path.exists() {
            log::debug!("no journal at {}, starting empty", path.display());
            return Ok(Self { path, annotations: Vec::new() });
        }

        let bytes = fs::read(&path)?;
        let envelope: JournalEnvelope = serde_json::from_slice(&bytes)?;
        if envelope.version != JOURNAL_SCHEMA_VERSION {
            return Err(StorageError::UnsupportedVersion {
                found: envelope.version,
                expected: JOURNAL_SCHEMA_VERSION,
            });
        }

        Ok(Self { path, annotations: envelope.annotations })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn annotations(&self) -> &[PageAnnotation] {
        &self.annotations
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Add `annotation`, replacing a stored one with the same id in place.
    ///
    /// Returns the replaced annotation.
    pub fn upsert(&mut self, annotation: PageAnnotation) -> Option<PageAnnotation> {
        match self.annotations.iter_mut().find(|stored| stored.id == annotation.id) {
            Some(stored) => Some(std::mem::replace(stored, annotation)),
            None => {
                self.annotations.push(annotation);
                None
            }
        }
    }

    pub fn remove(&mut self, id: AnnotationId) -> Option<PageAnnotation> {
        let index = self.annotations.iter().position(|stored| stored.id == id)?;
        Some(self.annotations.remove(index))
    }

    pub fn save(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let envelope = JournalEnvelope {
            version: JOURNAL_SCHEMA_VERSION,
            annotations: self.annotations.clone(),
        };

        let bytes = serde_json::to_vec_pretty(&envelope)?;
        fs::write(&self.path, bytes)?;
        log::debug!("saved {} annotation(s) to {}", self.len(), self.path.display());
        Ok(())
    }
}

impl AnnotationStore for AnnotationJournal {
    fn get_annotations(&self, page_number: u32) -> Vec<PageAnnotation> {
        self.annotations.get_annotations(page_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::{Rect, Selector};

    fn annotation(id: u128, page_number: u32, x: f64) -> PageAnnotation {
        PageAnnotation {
            id: AnnotationId::from_u128(id),
            document_url: "doc.pdf".to_owned(),
            page_number,
            selector: Selector::Rect(Rect::new(x, 0.25, 0.5, 0.5)),
            body: serde_json::json!({ "label": format!("note {id}") }),
        }
    }

    #[test]
    fn journal_round_trip() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let storage = Storage::with_root(temp.path());

        let mut journal = storage.open_journal("doc").expect("open should succeed");
        assert!(journal.is_empty());
        journal.upsert(annotation(1, 1, 0.0));
        journal.upsert(annotation(2, 2, 0.5));
        journal.save().expect("save should succeed");

        let loaded = storage.open_journal("doc").expect("reopen should succeed");
        assert_eq!(loaded.annotations(), journal.annotations());
        assert_eq!(loaded.path(), temp.path().join("annotations").join("doc.json"));
    }

    #[test]
    fn upsert_replaces_in_place() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let mut journal =
            AnnotationJournal::load(temp.path().join("doc.json")).expect("load should succeed");

        journal.upsert(annotation(1, 1, 0.0));
        journal.upsert(annotation(2, 1, 0.0));
        let replaced = journal.upsert(annotation(1, 1, 0.25));

        assert_eq!(replaced, Some(annotation(1, 1, 0.0)));
        assert_eq!(journal.len(), 2);
        assert_eq!(journal.annotations()[0], annotation(1, 1, 0.25));
    }

    #[test]
    fn remove_returns_the_removed_annotation() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let mut journal =
            AnnotationJournal::load(temp.path().join("doc.json")).expect("load should succeed");
        journal.upsert(annotation(1, 1, 0.0));

        assert_eq!(journal.remove(AnnotationId::from_u128(1)), Some(annotation(1, 1, 0.0)));
        assert_eq!(journal.remove(AnnotationId::from_u128(1)), None);
        assert!(journal.is_empty());
    }

    #[test]
    fn serves_annotations_per_page_in_insertion_order() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let mut journal =
            AnnotationJournal::load(temp.path().join("doc.json")).expect("load should succeed");
        journal.upsert(annotation(3, 2, 0.0));
        journal.upsert(annotation(1, 1, 0.0));
        journal.upsert(annotation(2, 2, 0.0));

        let ids: Vec<_> =
            journal.get_annotations(2).into_iter().map(|stored| stored.id.as_u128()).collect();
        assert_eq!(ids, vec![3, 2]);
        assert!(journal.get_annotations(7).is_empty());
    }

    #[test]
    fn rejects_unknown_schema_version() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let path = temp.path().join("doc.json");
        fs::write(&path, r#"{ "version": 99, "annotations": [] }"#).expect("write should succeed");

        let err = AnnotationJournal::load(&path).expect_err("version 99 should be rejected");
        assert!(matches!(err, StorageError::UnsupportedVersion { found: 99, expected: 1 }));
    }

    #[test]
    fn corrupt_journal_is_a_serde_error() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let path = temp.path().join("doc.json");
        fs::write(&path, "not json").expect("write should succeed");

        assert!(matches!(AnnotationJournal::load(&path), Err(StorageError::Serde(_))));
    }
}
