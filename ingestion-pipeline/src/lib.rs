#![allow(clippy::missing_docs_in_private_items)]

pub mod converter;
pub mod pipeline;

pub use converter::{DocumentSource, JsonlProductSource};
pub use pipeline::{ingest, ingest_into, IngestOutcome, StoreState};
