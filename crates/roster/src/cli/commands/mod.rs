pub mod display;
pub mod ingest;
