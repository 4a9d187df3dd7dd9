//! Startup seeding of the record store.
//!
//! A seed directory is laid out as `<Type>/<patient>/<id>.<ext>`:
//!
//! ```text
//! seed/
//! ├── Claim/
//! │   └── 1/
//! │       └── minimal.json
//! └── ClaimResponse/
//!     └── 1/
//!         └── minimal-response.xml
//! ```
//!
//! `.json` files are read as FHIR JSON and `.xml` files as FHIR XML. Files
//! with other extensions, and directories not named after a supported type,
//! are skipped. Files are loaded in path order.

use std::path::{Path, PathBuf};

use priorauth_fhir::ResourceType;
use priorauth_persistence::core::RecordStorage;
use priorauth_persistence::error::StorageError;
use priorauth_persistence::types::NewRecord;
use priorauth_serde::{Codec, FhirCodec, Format, SerdeError};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// A directory or file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// The path being read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A file did not hold a parseable document.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// The offending file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: SerdeError,
    },

    /// The store rejected a document.
    #[error("failed to store {}: {source}", path.display())]
    Storage {
        /// The offending file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: StorageError,
    },
}

/// Loads every document under `dir` into `storage` and returns how many
/// records were written.
pub async fn seed_store<S>(storage: &S, dir: &Path) -> Result<usize, SeedError>
where
    S: RecordStorage,
{
    let codec = FhirCodec::new();
    let mut written = 0;

    for type_dir in sorted_entries(dir).await? {
        let Some(resource_type) = dir_name(&type_dir).and_then(|n| n.parse::<ResourceType>().ok())
        else {
            warn!(
                path = %type_dir.display(),
                "Skipping seed entry that is not a resource type directory"
            );
            continue;
        };
        if !type_dir.is_dir() {
            continue;
        }

        for patient_dir in sorted_entries(&type_dir).await? {
            let Some(patient) = dir_name(&patient_dir).filter(|_| patient_dir.is_dir()) else {
                continue;
            };

            for file in sorted_entries(&patient_dir).await? {
                let (Some(id), Some(format)) = (file_id(&file), file_format(&file)) else {
                    debug!(path = %file.display(), "Skipping non-document seed file");
                    continue;
                };

                let body = tokio::fs::read_to_string(&file)
                    .await
                    .map_err(|source| SeedError::Io {
                        path: file.clone(),
                        source,
                    })?;
                let document = codec
                    .deserialize(&body, format)
                    .map_err(|source| SeedError::Parse {
                        path: file.clone(),
                        source,
                    })?;

                storage
                    .write(resource_type, NewRecord::new(id, patient, document))
                    .await
                    .map_err(|source| SeedError::Storage {
                        path: file.clone(),
                        source,
                    })?;
                debug!(
                    resource_type = %resource_type,
                    id = %id,
                    patient = %patient,
                    "Seeded record"
                );
                written += 1;
            }
        }
    }

    info!(dir = %dir.display(), records = written, "Seeding complete");
    Ok(written)
}

async fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, SeedError> {
    let io_err = |source| SeedError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut reader = tokio::fs::read_dir(dir).await.map_err(io_err)?;
    let mut paths = Vec::new();
    while let Some(entry) = reader.next_entry().await.map_err(io_err)? {
        paths.push(entry.path());
    }
    paths.sort();
    Ok(paths)
}

fn dir_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

fn file_id(path: &Path) -> Option<&str> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
}

fn file_format(path: &Path) -> Option<Format> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Some(Format::Json),
        Some("xml") => Some(Format::Xml),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use priorauth_persistence::backends::memory::MemoryBackend;
    use priorauth_persistence::types::Constraints;
    use serde_json::json;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    #[tokio::test]
    async fn test_seed_json_and_xml() {
        let dir = tempfile::tempdir().unwrap();
        let claim = json!({"resourceType": "Claim", "id": "minimal", "status": "active"});
        write(dir.path(), "Claim/1/minimal.json", &claim.to_string());
        write(
            dir.path(),
            "ClaimResponse/1/answer.xml",
            r#"<ClaimResponse xmlns="http://hl7.org/fhir"><id value="answer"/><status value="active"/></ClaimResponse>"#,
        );

        let store = MemoryBackend::new();
        let written = seed_store(&store, dir.path()).await.unwrap();
        assert_eq!(written, 2);

        let record = store
            .read(ResourceType::Claim, &Constraints::for_key("minimal", "1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.status(), "active");

        let response = store
            .read(ResourceType::ClaimResponse, &Constraints::for_key("answer", "1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(response.document()["status"], "active");
    }

    #[tokio::test]
    async fn test_skips_unknown_entries() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "README.md", "seed data");
        write(dir.path(), "Patient/1/p.json", r#"{"resourceType":"Patient"}"#);
        write(dir.path(), "Claim/1/notes.txt", "not a document");

        let store = MemoryBackend::new();
        assert_eq!(seed_store(&store, dir.path()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_parse_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Claim/1/broken.json", "{not json");

        let err = seed_store(&MemoryBackend::new(), dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, SeedError::Parse { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[tokio::test]
    async fn test_unmodelled_xml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "Bundle/1/submission.xml",
            r#"<Bundle xmlns="http://hl7.org/fhir"><type value="collection"/>
                <entry><resource><Observation><status value="final"/></Observation></resource></entry>
            </Bundle>"#,
        );

        let store = MemoryBackend::new();
        let err = seed_store(&store, dir.path()).await.unwrap_err();
        assert!(matches!(err, SeedError::Parse { .. }));
        assert!(err.to_string().contains("submission.xml"));
        assert_eq!(store.count(ResourceType::Bundle).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_mismatched_type_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "Claim/1/wrong.json",
            r#"{"resourceType":"ClaimResponse","status":"active"}"#,
        );

        let err = seed_store(&MemoryBackend::new(), dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, SeedError::Storage { .. }));
    }

    #[tokio::test]
    async fn test_malformed_file_id_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "Claim/1/my claim.json",
            r#"{"resourceType":"Claim","status":"active"}"#,
        );

        let store = MemoryBackend::new();
        let err = seed_store(&store, dir.path()).await.unwrap_err();
        assert!(matches!(
            err,
            SeedError::Storage {
                source: StorageError::InvalidRecord { .. },
                ..
            }
        ));
        assert_eq!(store.count(ResourceType::Claim).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_dir() {
        let err = seed_store(&MemoryBackend::new(), Path::new("/no/such/seed/dir"))
            .await
            .unwrap_err();
        assert!(matches!(err, SeedError::Io { .. }));
    }
}
