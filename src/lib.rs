//! Glossa - Chunked LLM Translation Service
//!
//! Translates text through an OpenAI-compatible chat completion API and
//! returns a fluent translation together with a per-word gloss. Long inputs
//! are split into sentence-aligned chunks that are translated one by one.

pub mod cli;
pub mod config;
pub mod chunker;
pub mod translate;
pub mod server;
pub mod error;
