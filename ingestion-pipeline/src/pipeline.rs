use std::sync::Arc;

use common::{
    error::AppError,
    storage::vector_store::VectorStore,
    utils::{config::AppConfig, embedding::EmbeddingProvider},
};
use tracing::{debug, info};

use crate::converter::DocumentSource;

/// Whether the vector store still needs its one-off batch load.
///
/// The original tool keyed this on a nullable flag where any non-null value
/// skipped ingestion; the two recognised states are made explicit here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    NeedsIngest,
    AlreadyIngested,
}

/// The orchestrator's two exit paths, mutually exclusive and collectively
/// exhaustive over `StoreState`.
#[derive(Clone)]
pub enum IngestOutcome {
    Ingested {
        store: VectorStore,
        inserted_ids: Vec<String>,
    },
    Reused {
        store: VectorStore,
    },
}

impl IngestOutcome {
    pub fn store(&self) -> &VectorStore {
        match self {
            Self::Ingested { store, .. } | Self::Reused { store } => store,
        }
    }

    /// Ids of the documents inserted by this run; `None` on the skip path.
    pub fn inserted_ids(&self) -> Option<&[String]> {
        match self {
            Self::Ingested { inserted_ids, .. } => Some(inserted_ids),
            Self::Reused { .. } => None,
        }
    }
}

/// Connects to the vector store and either runs the full convert-embed-insert
/// cycle or hands back the connected store untouched.
///
/// Single-shot by design: no retries, no partial-failure recovery, and no
/// deduplication — ingesting twice inserts twice. Every failure from
/// configuration, connection, conversion or insertion propagates to the
/// caller unmodified.
pub async fn ingest(
    state: StoreState,
    config: &AppConfig,
    embedding: Arc<EmbeddingProvider>,
    source: &dyn DocumentSource,
) -> Result<IngestOutcome, AppError> {
    let store = VectorStore::connect(config, embedding).await?;
    ingest_into(state, store, source).await
}

/// The ingest-or-reuse decision against an already-connected store.
pub async fn ingest_into(
    state: StoreState,
    store: VectorStore,
    source: &dyn DocumentSource,
) -> Result<IngestOutcome, AppError> {
    match state {
        StoreState::AlreadyIngested => {
            debug!("store already ingested; reusing existing collection");
            Ok(IngestOutcome::Reused { store })
        }
        StoreState::NeedsIngest => {
            let documents = source.produce_documents()?;
            info!(documents = documents.len(), "ingesting documents");
            let inserted_ids = store.add_documents(documents).await?;
            Ok(IngestOutcome::Ingested {
                store,
                inserted_ids,
            })
        }
    }
}
