use std::sync::Arc;

use common::utils::{config::get_config, embedding::EmbeddingProvider};
use ingestion_pipeline::{ingest, JsonlProductSource, StoreState};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Demonstration query taken from the chatbot this store backs.
const DEMO_QUERY: &str = "can you tell me the low budget sound basshead.";
const DEMO_RESULT_COUNT: u8 = 4;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set up tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok();

    // Get config
    let config = get_config()?;

    let openai_client = Arc::new(async_openai::Client::with_config(
        async_openai::config::OpenAIConfig::new()
            .with_api_key(&config.openai_api_key)
            .with_api_base(&config.openai_base_url),
    ));

    let embedding_provider =
        Arc::new(EmbeddingProvider::from_config(&config, Some(openai_client)).await?);
    info!(
        embedding_backend = embedding_provider.backend_label(),
        embedding_model = ?embedding_provider.model_code(),
        embedding_dimension = embedding_provider.dimension(),
        "Embedding provider initialized"
    );

    let source = JsonlProductSource::new(&config.dataset_path);
    let outcome = ingest(StoreState::NeedsIngest, &config, embedding_provider, &source).await?;

    let inserted = outcome.inserted_ids().map_or(0, <[String]>::len);
    println!("\nInserted {inserted} documents.");

    let results = outcome
        .store()
        .similarity_search(DEMO_QUERY, DEMO_RESULT_COUNT)
        .await?;
    for result in &results {
        println!("* {} [{:?}]", result.content, result.metadata);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::storage::{db::SurrealDbClient, vector_store::VectorStore};
    use ingestion_pipeline::ingest_into;
    use std::io::Write;
    use uuid::Uuid;

    #[tokio::test]
    async fn smoke_ingest_and_query_with_in_memory_store() {
        let mut dataset = tempfile::NamedTempFile::new().expect("dataset fixture");
        writeln!(
            dataset,
            r#"{{"product_title":"ThunderPods","review":"Low budget basshead sound.","category":"audio"}}"#
        )
        .expect("writing dataset fixture");
        writeln!(
            dataset,
            r#"{{"product_title":"ClearTone Mini","review":"Bright treble earbuds.","category":"audio"}}"#
        )
        .expect("writing dataset fixture");

        let database = Uuid::new_v4().to_string();
        let db = Arc::new(
            SurrealDbClient::memory("test_ns", &database)
                .await
                .expect("in-memory surrealdb"),
        );
        let embedding = Arc::new(EmbeddingProvider::new_hashed(64).expect("hashed provider"));
        let store = VectorStore::attach(db, embedding)
            .await
            .expect("attaching vector store");

        let source = JsonlProductSource::new(dataset.path());
        let outcome = ingest_into(StoreState::NeedsIngest, store, &source)
            .await
            .expect("ingest run");
        assert_eq!(outcome.inserted_ids().map_or(0, <[String]>::len), 2);

        let results = outcome
            .store()
            .similarity_search(DEMO_QUERY, DEMO_RESULT_COUNT)
            .await
            .expect("similarity search");
        assert!(!results.is_empty());
        for result in &results {
            assert_eq!(
                result.metadata.get("category").map(String::as_str),
                Some("audio")
            );
        }
    }
}
