use super::types::StoredObject;
use std::ops::Deref;
use surrealdb::{
    engine::any::{connect, Any},
    opt::auth::Root,
    Error, Surreal,
};

#[derive(Clone)]
pub struct SurrealDbClient {
    pub client: Surreal<Any>,
}

impl SurrealDbClient {
    /// Connects to the vector store endpoint, signs in with the configured
    /// credentials and selects the namespace/database pair.
    pub async fn new(
        address: &str,
        username: &str,
        password: &str,
        namespace: &str,
        database: &str,
    ) -> Result<Self, Error> {
        let db = connect(address).await?;

        // Sign in to database
        db.signin(Root { username, password }).await?;

        // Set namespace
        db.use_ns(namespace).use_db(database).await?;

        Ok(SurrealDbClient { client: db })
    }

    /// Defines the HNSW index used by similarity search. The dimension comes
    /// from the embedding provider resolved at startup, so it must be called
    /// before any documents are inserted.
    pub async fn ensure_vector_index(&self, table: &str, dimension: usize) -> Result<(), Error> {
        self.client
            .query(format!(
                "DEFINE INDEX IF NOT EXISTS idx_embedding_{table} ON {table} FIELDS embedding HNSW DIMENSION {dimension}"
            ))
            .await?
            .check()?;
        Ok(())
    }

    /// Operation to store a object in SurrealDB, requires the struct to implement StoredObject
    ///
    /// # Arguments
    /// * `item` - The item to be stored
    ///
    /// # Returns
    /// * `Result` - Item or Error
    pub async fn store_item<T>(&self, item: T) -> Result<Option<T>, Error>
    where
        T: StoredObject + Send + Sync + 'static,
    {
        self.client
            .create((T::table_name(), item.get_id()))
            .content(item)
            .await
    }

    /// Operation to retrieve all objects from a certain table, requires the struct to implement StoredObject
    ///
    /// # Returns
    /// * `Result` - Vec<T> or Error
    pub async fn get_all_stored_items<T>(&self) -> Result<Vec<T>, Error>
    where
        T: for<'de> StoredObject,
    {
        self.client.select(T::table_name()).await
    }

    /// Operation to retrieve a single object by its ID, requires the struct to implement StoredObject
    ///
    /// # Arguments
    /// * `id` - The ID of the item to retrieve
    ///
    /// # Returns
    /// * `Result<Option<T>, Error>` - The found item or Error
    pub async fn get_item<T>(&self, id: &str) -> Result<Option<T>, Error>
    where
        T: for<'de> StoredObject,
    {
        self.client.select((T::table_name(), id)).await
    }

    /// Operation to delete a single object by its ID, requires the struct to implement StoredObject
    ///
    /// # Arguments
    /// * `id` - The ID of the item to delete
    ///
    /// # Returns
    /// * `Result<Option<T>, Error>` - The deleted item or Error
    pub async fn delete_item<T>(&self, id: &str) -> Result<Option<T>, Error>
    where
        T: for<'de> StoredObject,
    {
        self.client.delete((T::table_name(), id)).await
    }
}

impl Deref for SurrealDbClient {
    type Target = Surreal<Any>;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl SurrealDbClient {
    /// Create an in-memory SurrealDB client for testing.
    pub async fn memory(namespace: &str, database: &str) -> Result<Self, Error> {
        let db = connect("mem://").await?;

        db.use_ns(namespace).use_db(database).await?;

        Ok(SurrealDbClient { client: db })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::types::product_document::{Document, ProductDocument};
    use std::collections::HashMap;
    use uuid::Uuid;

    async fn memory_db() -> SurrealDbClient {
        let database = Uuid::new_v4().to_string(); // ensures isolation per test run
        SurrealDbClient::memory("test_ns", &database)
            .await
            .expect("Failed to start in-memory surrealdb")
    }

    fn sample_record(content: &str) -> ProductDocument {
        let document = Document::new(
            content,
            HashMap::from([("category".to_string(), "audio".to_string())]),
        );
        ProductDocument::new(document, vec![0.1, 0.2, 0.3])
    }

    #[tokio::test]
    async fn crud_roundtrip_for_product_documents() {
        let db = memory_db().await;
        let record = sample_record("Solid bass for the price.");

        // Store
        let stored = db
            .store_item(record.clone())
            .await
            .expect("Failed to store");
        assert!(stored.is_some());

        // Read
        let fetched = db
            .get_item::<ProductDocument>(&record.id)
            .await
            .expect("Failed to fetch");
        assert_eq!(fetched, Some(record.clone()));

        // Read all
        let all = db
            .get_all_stored_items::<ProductDocument>()
            .await
            .expect("Failed to fetch all");
        assert!(all.contains(&record));

        // Delete
        let deleted = db
            .delete_item::<ProductDocument>(&record.id)
            .await
            .expect("Failed to delete");
        assert_eq!(deleted, Some(record.clone()));

        // After delete, should not be present
        let fetch_post = db
            .get_item::<ProductDocument>(&record.id)
            .await
            .expect("Failed fetch post delete");
        assert!(fetch_post.is_none());
    }

    #[tokio::test]
    async fn vector_index_definition_is_idempotent() {
        let db = memory_db().await;

        db.ensure_vector_index("product_document", 384)
            .await
            .expect("Failed to define vector index");
        db.ensure_vector_index("product_document", 384)
            .await
            .expect("Re-defining the vector index should be a no-op");
    }

    #[tokio::test]
    async fn failed_index_definition_surfaces_an_error() {
        let db = memory_db().await;

        // An invalid table identifier makes the DEFINE statement fail; the
        // failure must reach the caller instead of staying in the response.
        let result = db.ensure_vector_index("product document", 384).await;
        assert!(result.is_err(), "invalid index definition must not pass silently");
    }
}
