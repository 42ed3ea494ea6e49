pub mod analytics;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod ingest;
pub mod ontology;
pub mod output;
pub mod query;
pub mod reader;
pub mod report;
pub mod schema;
pub mod store;
pub mod table;
pub mod text;
pub mod vocabulary;
