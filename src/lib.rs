pub mod api_docs;
pub mod app;
pub mod blockchain;
pub mod bootstrap;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod utils;
