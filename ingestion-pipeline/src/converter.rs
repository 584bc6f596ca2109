use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::PathBuf,
};

use common::{error::AppError, storage::types::product_document::Document};
use serde::Deserialize;
use tracing::debug;

/// The document converter seam: a zero-argument call producing the full,
/// ordered document sequence. Failure is fatal and propagated.
pub trait DocumentSource: Send + Sync {
    fn produce_documents(&self) -> Result<Vec<Document>, AppError>;
}

/// One product review as stored in the fixed dataset file.
#[derive(Debug, Clone, Deserialize)]
struct ProductRecord {
    product_title: String,
    review: String,
    #[serde(default)]
    rating: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

impl ProductRecord {
    fn into_document(self) -> Document {
        let mut metadata = HashMap::new();
        metadata.insert("product_name".to_string(), self.product_title);
        if let Some(rating) = self.rating {
            metadata.insert("rating".to_string(), rating);
        }
        if let Some(summary) = self.summary {
            metadata.insert("summary".to_string(), summary);
        }
        if let Some(category) = self.category {
            metadata.insert("category".to_string(), category);
        }
        Document::new(self.review, metadata)
    }
}

/// Reads the product-review dataset (JSON Lines, one record per line) and
/// converts each record into a Document whose content is the review text and
/// whose metadata carries the product name plus any optional fields present.
pub struct JsonlProductSource {
    path: PathBuf,
}

impl JsonlProductSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DocumentSource for JsonlProductSource {
    fn produce_documents(&self) -> Result<Vec<Document>, AppError> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);

        let mut documents = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: ProductRecord = serde_json::from_str(&line).map_err(|err| {
                AppError::Validation(format!(
                    "malformed product record on line {}: {err}",
                    index + 1
                ))
            })?;
            documents.push(record.into_document());
        }

        debug!(
            path = %self.path.display(),
            documents = documents.len(),
            "converted dataset"
        );
        Ok(documents)
    }
}
