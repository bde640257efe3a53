use crate::errors::AppError;
use serde::{Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error, warn};

pub const STUDENTS_KEY: &str = "attendance-students";
pub const ATTENDANCE_KEY: &str = "attendance-records";
pub const TRANSACTIONS_KEY: &str = "expense-tracker-data";

/// Key-value document store: every key is one JSON array on disk.
#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_root(&self) -> Result<(), AppError> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    pub fn document_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    /// `<key>.corrupt.json` for the first copy, `<key>.corrupt.<n>.json` after.
    pub fn quarantine_path(&self, key: &str, n: u32) -> PathBuf {
        match n {
            0 => self.root.join(format!("{key}.corrupt.json")),
            n => self.root.join(format!("{key}.corrupt.{n}.json")),
        }
    }

    /// Never fails: a missing, unreadable or malformed document yields
    /// `default()`. Malformed documents are moved aside first so the next
    /// save cannot destroy them; earlier copies are never replaced.
    pub async fn load<T: DeserializeOwned>(
        &self,
        key: &str,
        default: impl FnOnce() -> Vec<T>,
    ) -> Vec<T> {
        let path = self.document_path(key);
        match fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(items) => items,
                Err(err) => {
                    error!(key, "failed to parse stored document: {err}");
                    self.quarantine(key, &path).await;
                    default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(key, "no stored document, using defaults");
                default()
            }
            Err(err) => {
                error!(key, "failed to read stored document: {err}");
                default()
            }
        }
    }

    pub async fn save<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), AppError> {
        let payload = serde_json::to_vec_pretty(items).map_err(AppError::internal)?;
        let path = self.document_path(key);
        let staging = self.root.join(format!("{key}.json.tmp"));

        fs::write(&staging, payload).await?;
        fs::rename(&staging, &path).await?;

        debug!(key, count = items.len(), "saved document");
        Ok(())
    }

    async fn quarantine(&self, key: &str, path: &Path) {
        let mut n = 0;
        let mut target = self.quarantine_path(key, n);
        while fs::try_exists(&target).await.unwrap_or(false) {
            n += 1;
            target = self.quarantine_path(key, n);
        }
        match fs::rename(path, &target).await {
            Ok(()) => warn!(key, target = %target.display(), "moved malformed document aside"),
            Err(err) => error!(key, "failed to move malformed document aside: {err}"),
        }
    }
}
