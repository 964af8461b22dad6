//! Merge policy applied when imported records meet an existing store

use crate::model::{RecordStore, StoreError};
use crate::models::WineRecord;
use crate::storage::StorageBackend;
use tracing::info;

/// What to do with imported records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Imported records become the whole store
    Replace,
    /// Imported records are added after the existing ones
    Append,
    /// Leave the store untouched
    Cancel,
}

impl std::fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            MergePolicy::Replace => "replace",
            MergePolicy::Append => "append",
            MergePolicy::Cancel => "cancel",
        })
    }
}

/// Store size after a merge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOutcome {
    pub policy: MergePolicy,
    pub imported: usize,
    pub total: usize,
}

impl MergePolicy {
    /// Apply this policy to `store`; Replace and Append rewrite the store file in full
    pub async fn apply<B: StorageBackend>(
        self,
        store: &mut RecordStore<B>,
        incoming: Vec<WineRecord>,
    ) -> Result<MergeOutcome, StoreError> {
        let imported = incoming.len();
        match self {
            MergePolicy::Replace => store.replace_all(incoming).await?,
            MergePolicy::Append => store.append_all(incoming).await?,
            MergePolicy::Cancel => {
                info!("Import cancelled, {} records discarded", imported);
                return Ok(MergeOutcome {
                    policy: self,
                    imported: 0,
                    total: store.len(),
                });
            }
        }

        info!(
            "Merged {} imported records ({}), store now holds {}",
            imported,
            self,
            store.len()
        );
        Ok(MergeOutcome {
            policy: self,
            imported,
            total: store.len(),
        })
    }
}
