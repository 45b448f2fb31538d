//! Plateful - Semantic Recipe Search
//!
//! Indexes Instagram-style food posts into an embedding index and serves
//! nearest-neighbor search over them, from the CLI or over HTTP.

pub mod commands;
pub mod compose;
pub mod config;
pub mod embedding;
pub mod fixtures;
pub mod index;
pub mod ingest;
pub mod record;
pub mod rest;
pub mod search;
