// Resume intake: document decoding and profile extraction.

pub mod extractor;
pub mod handlers;
pub mod ingest;
