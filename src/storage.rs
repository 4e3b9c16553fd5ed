use crate::errors::AppError;
use serde::{de::DeserializeOwned, Serialize};
use std::{
    marker::PhantomData,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{fs, sync::Mutex};
use tracing::error;

/// Reads a JSON document, treating a missing file as an empty store.
pub async fn load_data<T>(path: &Path) -> Result<T, AppError>
where
    T: DeserializeOwned + Default,
{
    match fs::read(path).await {
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(|err| {
            error!("failed to parse data file {}: {err}", path.display());
            AppError::CorruptStore {
                path: path.to_path_buf(),
            }
        }),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(err) => {
            error!("failed to read data file {}: {err}", path.display());
            Err(err.into())
        }
    }
}

/// Overwrites the file with indented JSON. The write is not atomic.
pub async fn persist_data<T: Serialize>(path: &Path, data: &T) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data)?;
    fs::write(path, payload).await?;
    Ok(())
}

/// A single JSON file holding the whole document for every user.
///
/// Each mutation re-reads the file, applies the change in memory and writes
/// the full document back. Access to one file is serialized by a mutex, so two
/// requests in this process cannot interleave their read and write halves.
pub struct JsonStore<T> {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
    _doc: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonStore<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            lock: Arc::clone(&self.lock),
            _doc: PhantomData,
        }
    }
}

impl<T> JsonStore<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
            _doc: PhantomData,
        }
    }

    pub async fn read(&self) -> Result<T, AppError> {
        let _guard = self.lock.lock().await;
        load_data(&self.path).await
    }

    /// Applies `apply` to the current document and persists the result.
    /// Nothing is written when loading or `apply` fails.
    pub async fn update<R, F>(&self, apply: F) -> Result<R, AppError>
    where
        F: FnOnce(&mut T) -> Result<R, AppError>,
    {
        let _guard = self.lock.lock().await;
        let mut data: T = load_data(&self.path).await?;
        let out = apply(&mut data)?;
        persist_data(&self.path, &data).await?;
        Ok(out)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::PathBuf;

    pub fn unique_path(label: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!(
            "task_tracker_{label}_{}_{}.json",
            std::process::id(),
            nanos
        ));
        path
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::unique_path;
    use super::*;
    use crate::models::{Accounts, PlannerData, Planners, Task};

    #[tokio::test]
    async fn missing_file_loads_as_empty_store() {
        let path = unique_path("missing");
        let accounts: Accounts = load_data(&path).await.unwrap();
        assert!(accounts.is_empty());
    }

    #[tokio::test]
    async fn saved_planner_loads_back_identically() {
        let path = unique_path("roundtrip");
        let mut planners = Planners::new();
        let mut data = PlannerData::default();
        data.daily.push(Task {
            name: "Buy milk".into(),
            done: true,
        });
        data.monthly.push("Read two books".into());
        data.history.insert("2026-01-05".into(), 100.0 / 3.0);
        planners.insert("alice".into(), data);

        persist_data(&path, &planners).await.unwrap();
        let loaded: Planners = load_data(&path).await.unwrap();
        assert_eq!(loaded, planners);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn corrupt_file_is_reported_and_left_alone() {
        let path = unique_path("corrupt");
        std::fs::write(&path, b"{not json").unwrap();

        let store: JsonStore<Accounts> = JsonStore::new(&path);
        let err = store
            .update(|accounts| {
                accounts.insert("bob".into(), "pw".into());
                Ok(())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CorruptStore { .. }));
        assert_eq!(std::fs::read(&path).unwrap(), b"{not json");

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn failed_update_writes_nothing() {
        let path = unique_path("failed_update");
        let store: JsonStore<Accounts> = JsonStore::new(&path);

        let result: Result<(), AppError> = store
            .update(|accounts| {
                accounts.insert("carol".into(), "pw".into());
                Err(AppError::InvalidInput)
            })
            .await;
        assert!(result.is_err());
        assert!(!path.exists());
    }
}
