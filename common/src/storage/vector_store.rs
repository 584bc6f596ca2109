use std::sync::Arc;

use tracing::debug;

use crate::{
    error::AppError,
    storage::{
        db::SurrealDbClient,
        types::{
            product_document::{Document, ProductDocument},
            StoredObject,
        },
    },
    utils::{config::AppConfig, embedding::EmbeddingProvider},
};

/// Handle to the remote vector store.
///
/// Wraps the SurrealDB connection together with the embedding provider so
/// callers hand over plain documents; embedding happens inside the store
/// client on insert and on query. The handle is created once per ingestion
/// run and shared by reference afterwards.
#[derive(Clone)]
pub struct VectorStore {
    db: Arc<SurrealDbClient>,
    embedding: Arc<EmbeddingProvider>,
}

impl VectorStore {
    /// Establishes a fresh connection using the resolved configuration and
    /// ensures the similarity index matches the provider's dimension.
    pub async fn connect(
        config: &AppConfig,
        embedding: Arc<EmbeddingProvider>,
    ) -> Result<Self, AppError> {
        let db = Arc::new(
            SurrealDbClient::new(
                &config.surrealdb_address,
                &config.surrealdb_username,
                &config.surrealdb_password,
                &config.surrealdb_namespace,
                &config.surrealdb_database,
            )
            .await?,
        );
        Self::attach(db, embedding).await
    }

    /// Wraps an already-connected client. Used by `connect` and by tests
    /// running against an in-memory database.
    pub async fn attach(
        db: Arc<SurrealDbClient>,
        embedding: Arc<EmbeddingProvider>,
    ) -> Result<Self, AppError> {
        db.ensure_vector_index(ProductDocument::table_name(), embedding.dimension())
            .await?;
        Ok(Self { db, embedding })
    }

    /// Embeds and persists the given documents, returning one opaque id per
    /// document, in input order.
    pub async fn add_documents(&self, documents: Vec<Document>) -> Result<Vec<String>, AppError> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let texts = documents
            .iter()
            .map(|document| document.content.clone())
            .collect();
        let embeddings = self.embedding.embed_batch(texts).await?;
        if embeddings.len() != documents.len() {
            return Err(AppError::InternalError(format!(
                "embedding provider returned {} vectors for {} documents",
                embeddings.len(),
                documents.len()
            )));
        }

        let mut inserted_ids = Vec::with_capacity(documents.len());
        for (document, embedding) in documents.into_iter().zip(embeddings) {
            let record = ProductDocument::new(document, embedding);
            let created = self.db.store_item(record).await?.ok_or_else(|| {
                AppError::InternalError(
                    "vector store returned no record for an inserted document".into(),
                )
            })?;
            inserted_ids.push(created.id);
        }

        debug!(inserted = inserted_ids.len(), "documents inserted");
        Ok(inserted_ids)
    }

    /// Embeds the query text and returns the closest documents, nearest
    /// first, with their metadata intact.
    pub async fn similarity_search(
        &self,
        query_text: &str,
        take: u8,
    ) -> Result<Vec<Document>, AppError> {
        let query_embedding = self.embedding.embed(query_text).await?;

        let closest_query = format!(
            "SELECT *, vector::distance::knn() AS distance FROM {} WHERE embedding <|{},40|> $embedding ORDER BY distance",
            ProductDocument::table_name(),
            take
        );

        let records: Vec<ProductDocument> = self
            .db
            .query(closest_query)
            .bind(("embedding", query_embedding))
            .await?
            .take(0)?;

        Ok(records.into_iter().map(Document::from).collect())
    }
}
