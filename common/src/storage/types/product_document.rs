use std::collections::HashMap;

use crate::stored_object;
use uuid::Uuid;

/// An immutable (content, metadata) record produced by the document converter.
///
/// The converter owns these until they are handed to the vector store, which
/// takes logical ownership by persisting them.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Document {
    pub content: String,
    pub metadata: HashMap<String, String>,
}

impl Document {
    pub fn new(content: impl Into<String>, metadata: HashMap<String, String>) -> Self {
        Self {
            content: content.into(),
            metadata,
        }
    }
}

stored_object!(ProductDocument, "product_document", {
    content: String,
    metadata: HashMap<String, String>,
    embedding: Vec<f32>
});

impl ProductDocument {
    pub fn new(document: Document, embedding: Vec<f32>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            content: document.content,
            metadata: document.metadata,
            embedding,
        }
    }
}

impl From<ProductDocument> for Document {
    fn from(record: ProductDocument) -> Self {
        Self {
            content: record.content,
            metadata: record.metadata,
        }
    }
}
