//! Durable, append-only storage of token records.
//!
//! Callers go through [`TokenStore`]; the only implementation keeps the whole
//! collection in one pretty-printed JSON array and rewrites it on every create.

use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::RegistryResult;
use crate::models::{NewToken, TokenRecord};

#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Every persisted record, in insertion order.
    async fn list(&self) -> RegistryResult<Vec<TokenRecord>>;

    /// Append a record, assigning its `id` and `timestamp`.
    async fn create(&self, token: NewToken) -> RegistryResult<TokenRecord>;
}

pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-append-rewrite within this process. Other processes
    // writing the same file still race.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open the store at `path`, creating the parent directory and an empty
    /// array file if they do not exist yet. An existing file is left untouched.
    pub async fn open(path: impl Into<PathBuf>) -> RegistryResult<Self> {
        let path = path.into();

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }

        if !tokio::fs::try_exists(&path).await? {
            tracing::info!("initializing empty token file at {}", path.display());
            write_records(&path, &[]).await?;
        }

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenStore for JsonFileStore {
    async fn list(&self) -> RegistryResult<Vec<TokenRecord>> {
        read_records(&self.path).await
    }

    async fn create(&self, token: NewToken) -> RegistryResult<TokenRecord> {
        let _guard = self.write_lock.lock().await;

        let mut records = read_records(&self.path).await?;
        let record = TokenRecord::new(records.len() as u64 + 1, token, Utc::now());
        records.push(record.clone());

        write_records(&self.path, &records).await?;
        tracing::debug!(id = record.id, "token record appended");

        Ok(record)
    }
}

async fn read_records(path: &Path) -> RegistryResult<Vec<TokenRecord>> {
    let raw = tokio::fs::read(path).await?;
    let records = serde_json::from_slice(&raw)?;
    Ok(records)
}

/// Serialize the full collection to a sibling temp file, then rename it over
/// `path` so readers only ever see a complete array.
async fn write_records(path: &Path, records: &[TokenRecord]) -> RegistryResult<()> {
    let body = serde_json::to_vec_pretty(records)?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    if let Err(err) = write_synced(&tmp, &body).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(err.into());
    }
    if let Err(err) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(err.into());
    }
    Ok(())
}

// The bytes must be on disk before the rename makes them the data file.
async fn write_synced(path: &Path, body: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(body).await?;
    file.sync_all().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;
    use tempfile::TempDir;

    fn token(owner: &str) -> NewToken {
        NewToken {
            owner: owner.to_string(),
            token_name: format!("{owner}T"),
            balance: 10.0,
            funding_source: "F".to_string(),
            fee: 1.0,
            liquidity: 100.0,
            supply_percent_added: 1.0,
        }
    }

    async fn open_store(dir: &TempDir) -> JsonFileStore {
        JsonFileStore::open(dir.path().join("data").join("tokens.json"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn open_initializes_an_empty_array() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw.trim(), "[]");
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn open_keeps_existing_records() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        store.create(token("A")).await.unwrap();

        let reopened = open_store(&dir).await;
        assert_eq!(reopened.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn first_create_on_empty_store_gets_id_one() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let created = store.create(token("A")).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.owner, "A");
        assert_eq!(created.token_name, "AT");

        let listed = store.list().await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn ids_increase_and_order_is_preserved() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let owners = ["A", "B", "C", "D", "E", "F", "G"];
        let mut created = Vec::new();
        for owner in owners {
            created.push(store.create(token(owner)).await.unwrap());
        }

        assert!(created.windows(2).all(|w| w[0].id < w[1].id));

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), owners.len());
        assert_eq!(listed, created);
        let listed_owners: Vec<&str> = listed.iter().map(|r| r.owner.as_str()).collect();
        assert_eq!(listed_owners, owners);
    }

    #[tokio::test]
    async fn timestamp_is_assigned_at_creation() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let started = Utc::now();
        let created = store.create(token("A")).await.unwrap();
        assert!(created.timestamp >= started);
        assert!(created.timestamp <= Utc::now());

        // Survives a round trip through the file as a valid instant.
        let listed = store.list().await.unwrap();
        assert_eq!(listed[0].timestamp, created.timestamp);
    }

    #[tokio::test]
    async fn concurrent_creates_in_one_process_do_not_collide() {
        let dir = TempDir::new().unwrap();
        let store = std::sync::Arc::new(open_store(&dir).await);

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.create(token(&format!("owner{i}"))).await.unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let mut ids: Vec<u64> = store.list().await.unwrap().iter().map(|r| r.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=8).collect::<Vec<u64>>());
    }

    #[tokio::test]
    async fn file_is_pretty_printed_camel_case() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        store.create(token("A")).await.unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.starts_with("[\n  {\n    \"id\": 1,"));
        assert!(raw.contains("\"tokenName\": \"AT\""));
        assert!(raw.contains("\"supplyPercentAdded\": 1.0"));
    }

    #[tokio::test]
    async fn corrupt_file_is_storage_unavailable() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        std::fs::write(store.path(), "{ not an array").unwrap();

        assert!(matches!(
            store.list().await,
            Err(RegistryError::StorageUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn missing_file_is_storage_unavailable() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        std::fs::remove_file(store.path()).unwrap();

        assert!(matches!(
            store.list().await,
            Err(RegistryError::StorageUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn failed_create_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        std::fs::write(store.path(), "garbage").unwrap();

        assert!(matches!(
            store.create(token("A")).await,
            Err(RegistryError::StorageUnavailable(_))
        ));
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "garbage");
    }

    #[tokio::test]
    async fn blocked_commit_is_storage_unavailable_and_keeps_prior_records() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        let first = store.create(token("A")).await.unwrap();

        // A directory where the temp file goes makes the commit fail.
        let mut tmp = store.path().as_os_str().to_owned();
        tmp.push(".tmp");
        std::fs::create_dir(PathBuf::from(&tmp)).unwrap();

        assert!(matches!(
            store.create(token("B")).await,
            Err(RegistryError::StorageUnavailable(_))
        ));
        assert_eq!(store.list().await.unwrap(), vec![first.clone()]);

        // Once the obstacle is gone the next create takes the next id.
        std::fs::remove_dir(PathBuf::from(&tmp)).unwrap();
        let second = store.create(token("C")).await.unwrap();
        assert_eq!(second.id, 2);
        assert_eq!(store.list().await.unwrap(), vec![first, second]);
    }

    #[tokio::test]
    async fn draft_missing_balance_is_stopped_before_create() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        store.create(token("A")).await.unwrap();

        let draft: crate::models::TokenDraft = serde_json::from_value(serde_json::json!({
            "owner": "B",
            "tokenName": "BT",
            "fundingSource": "F",
            "fee": 1,
            "liquidity": 100,
            "supplyPercentAdded": 1
        }))
        .unwrap();

        let outcome = match draft.validate() {
            Ok(new_token) => store.create(new_token).await,
            Err(err) => Err(err),
        };
        assert!(matches!(outcome, Err(RegistryError::Validation(_))));

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].owner, "A");
    }
}
