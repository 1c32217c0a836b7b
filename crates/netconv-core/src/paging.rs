//! Request-size-limited reading

use crate::collaborators::{ChildQuery, ObservedStateReader, ReadRequest};
use crate::error::CollaboratorError;
use async_trait::async_trait;
use netconv_model::StateMap;
use std::sync::Arc;

/// Splits read requests into batches of at most `batch_size` ids
///
/// Batches are read one after another and merged; the first failing batch
/// fails the whole read.
#[derive(Clone)]
pub struct PagedReader {
    inner: Arc<dyn ObservedStateReader>,
    batch_size: usize,
}

impl PagedReader {
    /// Wrap a reader
    #[must_use]
    pub fn new(inner: Arc<dyn ObservedStateReader>, batch_size: usize) -> Self {
        Self {
            inner,
            batch_size: batch_size.max(1),
        }
    }

    /// Batch size in use
    #[inline]
    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }
}

impl std::fmt::Debug for PagedReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagedReader")
            .field("batch_size", &self.batch_size)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ObservedStateReader for PagedReader {
    async fn read(&self, request: &ReadRequest) -> Result<StateMap, CollaboratorError> {
        let mut merged = StateMap::new();
        for (n, batch) in request.batches(self.batch_size).iter().enumerate() {
            tracing::debug!(batch = n, ids = batch.len(), "reading batch");
            merged.extend(self.inner.read(batch).await?);
        }
        Ok(merged)
    }

    async fn read_children(&self, query: &ChildQuery) -> Result<StateMap, CollaboratorError> {
        self.inner.read_children(query).await
    }
}
