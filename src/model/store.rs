//! Record store
//!
//! Holds the ordered list of wine records and rewrites the persisted JSON file in full
//! after every mutation. All mutation goes through [`RecordStore::add_record`],
//! [`RecordStore::replace_all`] and [`RecordStore::append_all`].

use crate::models::WineRecord;
use crate::storage::{StorageBackend, StorageError};
use tracing::{info, warn};

/// Default name of the persisted record file
pub const RECORDS_FILE_NAME: &str = "wine_records.json";

/// Error type for record store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Missing required field: {0}")]
    MissingRequiredField(&'static str),
    #[error("Malformed record file {path}: {reason}")]
    MalformedData { path: String, reason: String },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl StoreError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            StoreError::MissingRequiredField(_) => {
                "Please fill in the winery name and the wine name.".to_string()
            }
            StoreError::MalformedData { path, .. } => {
                format!("The saved records in {path} could not be read.")
            }
            StoreError::Storage(_) => "Could not save the records file.".to_string(),
        }
    }
}

/// Record store backed by a storage backend
pub struct RecordStore<B: StorageBackend> {
    storage: B,
    file_path: String,
    records: Vec<WineRecord>,
}

impl<B: StorageBackend> RecordStore<B> {
    /// Create an empty store that persists to `file_path`
    pub fn new(storage: B, file_path: impl Into<String>) -> Self {
        Self {
            storage,
            file_path: file_path.into(),
            records: Vec::new(),
        }
    }

    /// Open the store, loading the persisted file if it exists
    pub async fn open(storage: B, file_path: impl Into<String>) -> Result<Self, StoreError> {
        let mut store = Self::new(storage, file_path);

        if !store.storage.file_exists(&store.file_path).await? {
            info!("No record file at {}, starting empty", store.file_path);
            return Ok(store);
        }

        let content = store.storage.read_text(&store.file_path).await?;
        store.records =
            serde_json::from_str(&content).map_err(|e| StoreError::MalformedData {
                path: store.file_path.clone(),
                reason: e.to_string(),
            })?;

        info!(
            "Loaded {} records from {}",
            store.records.len(),
            store.file_path
        );
        Ok(store)
    }

    /// Storage backend used by this store
    pub fn storage(&self) -> &B {
        &self.storage
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    /// Records in insertion order
    pub fn list_records(&self) -> &[WineRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Add a record after checking the required fields
    pub async fn add_record(&mut self, record: WineRecord) -> Result<(), StoreError> {
        if let Some(field) = record.missing_required_field() {
            return Err(StoreError::MissingRequiredField(field));
        }

        let mut records = self.records.clone();
        records.push(record);
        self.commit(records).await
    }

    /// Replace the whole content of the store
    pub async fn replace_all(&mut self, records: Vec<WineRecord>) -> Result<(), StoreError> {
        self.commit(records).await
    }

    /// Append records after the existing ones
    pub async fn append_all(&mut self, incoming: Vec<WineRecord>) -> Result<(), StoreError> {
        let mut records = self.records.clone();
        records.extend(incoming);
        self.commit(records).await
    }

    /// Persist `records` and make them the store content; on failure nothing changes
    async fn commit(&mut self, records: Vec<WineRecord>) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(&records).map_err(|e| {
            StorageError::SerializationError(format!("Failed to serialize records: {}", e))
        })?;

        if let Err(e) = self
            .storage
            .write_file(&self.file_path, content.as_bytes())
            .await
        {
            warn!("Failed to persist records to {}: {}", self.file_path, e);
            return Err(e.into());
        }

        self.records = records;
        info!("Saved {} records to {}", self.records.len(), self.file_path);
        Ok(())
    }
}
